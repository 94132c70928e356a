//! Unit tests for resolution plans and the resolution session helpers

use std::collections::HashMap;
use std::sync::Arc;

use opbind_domain::{
    AnyService, Error, ResolutionPlan, ResolutionSession, ResolutionSessionExt, Result,
    ServiceKey, erase_service,
};

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct MapSession {
    services: HashMap<ServiceKey, AnyService>,
}

impl ResolutionSession for MapSession {
    fn resolve_service(&self, key: &ServiceKey) -> Result<Option<AnyService>> {
        Ok(self.services.get(key).cloned())
    }
}

fn session() -> MapSession {
    let mut session = MapSession::default();
    let utc: Arc<dyn Clock> = Arc::new(FixedClock(1));
    let local: Arc<dyn Clock> = Arc::new(FixedClock(2));
    session
        .services
        .insert(ServiceKey::of::<dyn Clock>(), erase_service(utc));
    session
        .services
        .insert(ServiceKey::keyed::<dyn Clock>("local"), erase_service(local));
    session
}

#[test]
fn test_resolve_default_and_keyed() {
    let session = session();
    assert_eq!(session.resolve::<dyn Clock>().expect("default").now(), 1);
    assert_eq!(
        session.resolve_keyed::<dyn Clock>("local").expect("keyed").now(),
        2
    );
}

#[test]
fn test_missing_keyed_service() {
    let session = session();
    assert!(
        session
            .try_resolve_keyed::<dyn Clock>("mars")
            .expect("lookup")
            .is_none()
    );
    match session.resolve_keyed::<dyn Clock>("mars") {
        Err(Error::ServiceNotRegistered { key, .. }) => assert_eq!(key.as_deref(), Some("mars")),
        Err(other) => panic!("Expected ServiceNotRegistered, got {other:?}"),
        Ok(_) => panic!("Expected ServiceNotRegistered"),
    }
}

#[test]
fn test_key_identity() {
    assert_eq!(ServiceKey::of::<dyn Clock>(), ServiceKey::of::<dyn Clock>());
    assert_ne!(
        ServiceKey::of::<dyn Clock>(),
        ServiceKey::keyed::<dyn Clock>("local")
    );
    assert_ne!(ServiceKey::of::<dyn Clock>(), ServiceKey::of::<FixedClock>());
}

#[test]
fn test_plan_fallibility() {
    let property = ResolutionPlan::MessageProperty {
        name: "tenant".into(),
        type_name: "String".into(),
    };
    assert!(!property.is_fallible());
    assert!(property.reads_message());
    assert!(ResolutionPlan::TransportRequest.is_fallible());
    assert!(ResolutionPlan::DefaultService.reads_container());
    assert!(
        ResolutionPlan::KeyedService {
            key: "local".into()
        }
        .reads_container()
    );
}
