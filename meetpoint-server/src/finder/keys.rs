//! Round-robin API key pool.
//!
//! Routing providers rate-limit per key. Spreading requests over several
//! keys, and moving to another key when one fails, keeps lookups flowing.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Errors building a key pool. These are startup configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyPoolError {
    #[error("API key pool is empty")]
    Empty,

    #[error("API key {0} is blank")]
    BlankKey(usize),
}

/// A fixed set of API keys handed out in rotation.
///
/// The rotation cursor is atomic, so concurrent lookups never lose updates.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Create a pool. Fails if there are no keys or any key is blank.
    pub fn new<I, S>(keys: I) -> Result<Self, KeyPoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();

        if keys.is_empty() {
            return Err(KeyPoolError::Empty);
        }
        if let Some(index) = keys.iter().position(|k| k.trim().is_empty()) {
            return Err(KeyPoolError::BlankKey(index));
        }

        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Parse a comma-separated key list, ignoring surrounding whitespace and
    /// empty entries.
    pub fn from_csv(list: &str) -> Result<Self, KeyPoolError> {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        )
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Start a rotation for one lookup.
    ///
    /// The starting key comes from the shared cursor; subsequent keys walk
    /// the pool from there, so the first `len()` keys yielded are distinct.
    pub fn rotation(&self) -> KeyRotation<'_> {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        KeyRotation {
            pool: self,
            start,
            offset: 0,
        }
    }
}

/// Endless iterator over a pool's keys, starting at a leased position.
#[derive(Debug)]
pub struct KeyRotation<'a> {
    pool: &'a KeyPool,
    start: usize,
    offset: usize,
}

impl<'a> Iterator for KeyRotation<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let keys = &self.pool.keys;
        let key = &keys[(self.start + self.offset) % keys.len()];
        self.offset += 1;
        Some(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn empty_pool_is_rejected() {
        assert_eq!(
            KeyPool::new(Vec::<String>::new()).unwrap_err(),
            KeyPoolError::Empty
        );
        assert_eq!(KeyPool::from_csv(" , ,").unwrap_err(), KeyPoolError::Empty);
    }

    #[test]
    fn blank_key_is_rejected() {
        assert_eq!(
            KeyPool::new(["a", "  "]).unwrap_err(),
            KeyPoolError::BlankKey(1)
        );
    }

    #[test]
    fn from_csv_trims_entries() {
        let pool = KeyPool::from_csv(" k1, k2 ,,k3 ").unwrap();
        assert_eq!(pool.len(), 3);
        let keys: Vec<&str> = pool.rotation().take(4).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3", "k1"]);
    }

    #[test]
    fn rotation_yields_distinct_keys_then_wraps() {
        let pool = KeyPool::new(["a", "b", "c"]).unwrap();
        pool.rotation(); // move the cursor off zero

        let keys: Vec<&str> = pool.rotation().take(4).collect();
        assert_eq!(keys, vec!["b", "c", "a", "b"]);
    }

    #[test]
    fn rotations_start_at_successive_keys() {
        let pool = KeyPool::new(["a", "b", "c"]).unwrap();
        let firsts: Vec<&str> = (0..3)
            .map(|_| pool.rotation().next().unwrap())
            .collect();
        assert_eq!(firsts, vec!["a", "b", "c"]);
    }

    #[test]
    fn concurrent_use_spreads_evenly() {
        let pool = Arc::new(KeyPool::new(["a", "b", "c", "d"]).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| pool.rotation().next().unwrap().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts = std::collections::HashMap::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        // 800 draws over 4 keys with no lost cursor updates
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&c| c == 200));
    }

    #[test]
    fn each_rotation_covers_the_pool() {
        let pool = KeyPool::new(["a", "b", "c"]).unwrap();
        for _ in 0..5 {
            let seen: HashSet<&str> = pool.rotation().take(3).collect();
            assert_eq!(seen.len(), 3);
        }
    }
}
