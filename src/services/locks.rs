// src/services/locks.rs

//! Per-domain mutual exclusion.
//!
//! Only one traversal may touch a given domain at a time. Locks are created
//! lazily on first reference; the registry map itself is guarded by a single
//! short-held mutex so two workers resolving the same new domain cannot end
//! up with two distinct locks. The per-domain locks are async mutexes held
//! across the full traversal, network awaits included.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as DomainMutex, OwnedMutexGuard};

/// Registry of lazily created per-domain locks.
///
/// One instance is shared by every traversal of a crawl run.
#[derive(Debug, Default)]
pub struct DomainLockRegistry {
    locks: Mutex<HashMap<String, Arc<DomainMutex<()>>>>,
}

impl DomainLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a domain, waiting until no other traversal
    /// holds it. The returned guard releases the lock on drop.
    pub async fn acquire(&self, domain: &str) -> OwnedMutexGuard<()> {
        self.lock_for(domain).lock_owned().await
    }

    /// Look up the lock for a domain, creating it if absent.
    fn lock_for(&self, domain: &str) -> Arc<DomainMutex<()>> {
        let mut registry = self.locks.lock().expect("domain lock registry poisoned");
        Arc::clone(registry.entry(domain.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_domain_is_serialized() {
        let registry = DomainLockRegistry::new();
        let guard = registry.acquire("a.test").await;

        let blocked = timeout(Duration::from_millis(50), registry.acquire("a.test")).await;
        assert!(blocked.is_err(), "second acquire must wait for the first");

        drop(guard);
        let acquired = timeout(Duration::from_millis(50), registry.acquire("a.test")).await;
        assert!(acquired.is_ok(), "lock must be free after release");
    }

    #[tokio::test]
    async fn different_domains_are_independent() {
        let registry = DomainLockRegistry::new();
        let _guard = registry.acquire("a.test").await;

        let other = timeout(Duration::from_millis(50), registry.acquire("b.test")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn lazy_creation_yields_a_single_lock_per_domain() {
        let registry = DomainLockRegistry::new();
        let first = registry.lock_for("a.test");
        let second = registry.lock_for("a.test");
        assert!(Arc::ptr_eq(&first, &second));

        let other = registry.lock_for("b.test");
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn waiters_resume_in_turn() {
        let registry = Arc::new(DomainLockRegistry::new());
        let guard = registry.acquire("a.test").await;

        let contender = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let _guard = registry.acquire("a.test").await;
            })
        };

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .expect("waiter should acquire after release")
            .unwrap();
    }
}
