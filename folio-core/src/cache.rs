//! Fixed-capacity LRU cache keyed by request signature.
//!
//! The bounded replacement for an unbounded per-view memo dictionary: its
//! only job is to avoid duplicate identical requests within one owner's
//! lifetime, so there is no TTL and no persistence.

use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    map: HashMap<String, V>,
    /// Recency order, most recent at the back.
    order: VecDeque<String>,
}

impl<V> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a key, refreshing its recency on hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if !self.map.contains_key(key) {
            return None;
        }
        self.promote(key);
        self.map.get(key)
    }

    /// Insert a value, evicting the least-recently-used entry at capacity.
    /// Re-inserting an existing key updates it in place.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if self.map.contains_key(&key) {
            self.map.insert(key.clone(), value);
            self.promote(&key);
            return;
        }
        if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    fn promote(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos).unwrap();
            self.order.push_back(k);
        }
    }
}
