//! Infrastructure layer constants
//!
//! Domain-level names are defined in `opbind_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "opbind.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "opbind";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "OPBIND";

/// Separator between prefix, section and field in environment keys
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "OPBIND_LOG";

/// File name stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "opbind";

// ============================================================================
// HOSTING CONSTANTS
// ============================================================================

/// Request/response binding without sessions
pub const BINDING_BASIC_HTTP: &str = "basic_http";

/// Connection-oriented binding with sessions
pub const BINDING_NET_TCP: &str = "net_tcp";
