//! Ambient operation context
//!
//! The dispatcher installs the [`OperationContext`] of a call as a
//! task-local for the duration of the adapter invocation. Delegation
//! wrappers read it back through [`current`].

use std::future::Future;
use std::sync::Arc;

use opbind_domain::OperationContext;

tokio::task_local! {
    static CURRENT_OPERATION: Arc<OperationContext>;
}

/// Run `future` with `context` as the current operation context
pub async fn scope<F: Future>(context: Arc<OperationContext>, future: F) -> F::Output {
    CURRENT_OPERATION.scope(context, future).await
}

/// Run `f` with `context` as the current operation context
pub fn sync_scope<R>(context: Arc<OperationContext>, f: impl FnOnce() -> R) -> R {
    CURRENT_OPERATION.sync_scope(context, f)
}

/// Operation context of the call being served, if any
pub fn current() -> Option<Arc<OperationContext>> {
    CURRENT_OPERATION.try_with(Arc::clone).ok()
}
