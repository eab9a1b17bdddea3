//! Concurrency tests for deferred user type resolution

use cqlkit_types::{
    DataType, Field, ResolutionState, TypeRegistry, UnresolvedUserType, UserType, UserTypeLookup,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Lookup that counts calls and answers slowly, to widen the race window
struct CountingLookup {
    calls: AtomicUsize,
    known: Option<UserType>,
}

impl CountingLookup {
    fn new(known: Option<UserType>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            known,
        })
    }
}

impl UserTypeLookup for CountingLookup {
    fn keyspace(&self) -> &str {
        "ks"
    }

    fn user_type(&self, name: &str) -> Option<UserType> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        self.known.clone().filter(|t| t.type_name() == name)
    }
}

fn address() -> UserType {
    UserType::new(
        "ks",
        "address",
        vec![Field::new("street", DataType::text()), Field::new("zip", DataType::int())],
        true,
    )
    .unwrap()
}

const THREADS: usize = 16;

#[test]
fn concurrent_queries_resolve_exactly_once() {
    let counting = CountingLookup::new(Some(address()));
    let lookup: Arc<dyn UserTypeLookup> = counting.clone();
    let placeholder = UnresolvedUserType::new(&lookup, "address");
    let deferred = UserType::deferred(placeholder.clone(), true);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let deferred = deferred.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let fields = deferred.fields().unwrap();
                (fields.as_ptr() as usize, fields.len())
            })
        })
        .collect();

    let results: Vec<(usize, usize)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert_eq!(placeholder.state(), ResolutionState::Resolved);
    // every thread observed the same published definition
    assert!(results.iter().all(|r| *r == results[0]));
    assert_eq!(results[0].1, 2);
}

#[test]
fn concurrent_failures_are_identical() {
    let counting = CountingLookup::new(None);
    let lookup: Arc<dyn UserTypeLookup> = counting.clone();
    let deferred = UserType::deferred(UnresolvedUserType::new(&lookup, "address"), true);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let deferred = deferred.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                deferred.size().unwrap_err()
            })
        })
        .collect();

    let errors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert!(errors.iter().all(|e| e.is_unresolved_type()));
    assert!(errors.iter().all(|e| *e == errors[0]));
}

#[test]
fn resolved_type_is_shared_by_every_clone() {
    let registry = TypeRegistry::new("ks");
    let lookup: Arc<dyn UserTypeLookup> = registry.clone();
    let placeholder = UnresolvedUserType::new(&lookup, "address");
    let first = UserType::deferred(placeholder.clone(), true);
    let second = DataType::from(UserType::deferred(placeholder, false));
    registry.register(address()).unwrap();

    let resolved_first = first.definition().unwrap();
    let resolved_second = second.as_user_type().unwrap().definition().unwrap();
    assert!(std::ptr::eq(resolved_first, resolved_second));
    assert!(!second.is_frozen());
}
