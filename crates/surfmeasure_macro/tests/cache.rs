use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use surfmeasure_macro::cache_access;

#[derive(Default)]
struct InnerCache {
    squares: Option<Vec<u64>>,
    total: Option<u64>,
}

#[derive(Default)]
struct Counter {
    values: Vec<u64>,
    calls: AtomicUsize,
    _cache: RwLock<InnerCache>,
}

impl Counter {
    // the body only tells `collect` what to build through the return type
    #[cache_access]
    fn squares(&self) -> Vec<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values.iter().map(|v| v * v).collect()
    }

    #[cache_access]
    fn total(&self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        self.squares().iter().sum()
    }
}

#[test]
fn test_cache_computes_once() {
    let counter = Counter {
        values: vec![1, 2, 3],
        ..Default::default()
    };

    assert_eq!(counter.squares(), vec![1, 4, 9]);
    assert_eq!(counter.squares(), vec![1, 4, 9]);
    assert_eq!(counter.total(), 14);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

    // resetting the field recomputes on the next access
    counter._cache.write().unwrap().squares = None;
    assert_eq!(counter.squares(), vec![1, 4, 9]);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cache_early_return() {
    let counter = Counter::default();
    assert_eq!(counter.total(), 0);
    assert_eq!(counter._cache.read().unwrap().total, Some(0));
    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
}
