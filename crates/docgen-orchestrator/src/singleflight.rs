//! Single-flight: collapse concurrent identical-key renders into one.
//!
//! A cache miss for a popular résumé under load can otherwise fan out
//! into dozens of redundant Typst compiles. Keyed on the same string
//! the cache uses, so "identical key" means "identical request shape".

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SingleFlight {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, creating it on first use. Holding the
    /// returned guard serializes all callers racing on the same key;
    /// callers should re-check the cache after acquiring it.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn concurrent_same_key_acquisitions_serialize() {
        let flight = Arc::new(SingleFlight::new());
        let counter = Arc::new(AtomicU32::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let flight = flight.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = flight.acquire("same-key").await;
                let current = counter.fetch_add(1, Ordering::SeqCst);
                assert_eq!(current, 0, "overlapping critical section detected");
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                counter.store(0, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
