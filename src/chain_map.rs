//! ChainMap: separate-chaining table over an arena of entries.

use crate::config::{DuplicateKeys, MapConfig};
use crate::error::{AllocationError, ConfigError};
use crate::hash::bucket_index;
use log::{debug, trace, warn};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Entry {
    key: String,
    value: String,
    next: Option<DefaultKey>,
}

/// String-keyed hash map with one singly-linked chain per bucket.
///
/// Bucket heads and `next` links are arena keys into `slots`, so relinking
/// on resize never moves or reallocates an entry.
#[derive(Debug)]
pub struct ChainMap {
    buckets: Vec<Option<DefaultKey>>, // chain heads; len() is the capacity
    slots: SlotMap<DefaultKey, Entry>,
    config: MapConfig,
}

/// Walks one chain head to tail.
struct Chain<'a> {
    slots: &'a SlotMap<DefaultKey, Entry>,
    cur: Option<DefaultKey>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (DefaultKey, &'a Entry);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let e = self.slots.get(k)?;
        self.cur = e.next;
        Some((k, e))
    }
}

impl Default for ChainMap {
    fn default() -> Self {
        Self::new()
    }
}

fn copy_str(s: &str, what: &'static str) -> Result<String, AllocationError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|e| AllocationError::new(what, e))?;
    out.push_str(s);
    Ok(out)
}

fn empty_heads(n: usize) -> Option<Vec<Option<DefaultKey>>> {
    let mut heads = Vec::new();
    heads.try_reserve_exact(n).ok()?;
    heads.resize(n, None);
    Some(heads)
}

impl ChainMap {
    /// Empty map with the default configuration (100 buckets).
    pub fn new() -> Self {
        Self::build(MapConfig::default())
    }

    /// Empty map with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(MapConfig::default().initial_capacity(capacity.max(1)))
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MapConfig) -> Self {
        Self {
            buckets: vec![None; config.initial_capacity],
            slots: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Number of entries, shadowed duplicates included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Whether the load factor has reached the configured threshold. The map
    /// never resizes itself; callers use this to decide when to `resize`.
    pub fn needs_resize(&self) -> bool {
        self.load_factor() >= self.config.resize_threshold
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        (0..self.capacity())
            .map(|i| self.chain(i).count())
            .max()
            .unwrap_or(0)
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(key, self.capacity())
    }

    fn chain(&self, idx: usize) -> Chain<'_> {
        Chain {
            slots: &self.slots,
            cur: self.buckets[idx],
        }
    }

    fn find_in(&self, idx: usize, key: &str) -> Option<DefaultKey> {
        self.chain(idx).find(|(_, e)| e.key == key).map(|(k, _)| k)
    }

    /// Inserts a copy of `key` and `value`.
    ///
    /// Under `DuplicateKeys::Shadow` the new entry always becomes the head of
    /// its chain, hiding any older entry with the same key. Under
    /// `DuplicateKeys::Replace` an existing entry has its value overwritten.
    /// Arena room for the entry and both string copies are obtained before
    /// anything is linked, so on `AllocationError` the map is unchanged.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<(), AllocationError> {
        let idx = self.bucket_of(key);

        if self.config.duplicates == DuplicateKeys::Replace {
            if let Some(k) = self.find_in(idx, key) {
                let value = copy_str(value, "value")?;
                if let Some(e) = self.slots.get_mut(k) {
                    e.value = value;
                }
                trace!("replaced value for {key:?} in bucket {idx}");
                return Ok(());
            }
        }

        self.slots
            .try_reserve(1)
            .map_err(|e| AllocationError::new("entry", e))?;
        let key = copy_str(key, "key")?;
        let value = copy_str(value, "value")?;
        let next = self.buckets[idx];
        let k = self.slots.insert(Entry { key, value, next });
        self.buckets[idx] = Some(k);
        trace!("inserted entry at head of bucket {idx}");
        Ok(())
    }

    /// Value of the most recently inserted entry for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.chain(self.bucket_of(key))
            .find(|(_, e)| e.key == key)
            .map(|(_, e)| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_in(self.bucket_of(key), key).is_some()
    }

    /// Unlinks and frees the first entry for `key` in its chain, returning
    /// its value. An older shadowed entry for the same key, if any, becomes
    /// visible again. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.bucket_of(key);

        let mut prev = None;
        let mut found = None;
        for (k, e) in self.chain(idx) {
            if e.key == key {
                found = Some((k, e.next));
                break;
            }
            prev = Some(k);
        }
        let (k, next) = found?;

        match prev {
            Some(p) => {
                if let Some(pe) = self.slots.get_mut(p) {
                    pe.next = next;
                }
            }
            None => self.buckets[idx] = next,
        }
        let entry = self.slots.remove(k)?;
        trace!("removed {key:?} from bucket {idx}");
        Some(entry.value)
    }

    /// Doubles the bucket count and relinks every entry under the new
    /// capacity. Entries keep their relative chain order, so shadowing
    /// survives. If the doubled bucket array cannot be allocated the map is
    /// left as it was.
    pub fn resize(&mut self) {
        let old_cap = self.capacity();
        let Some(new_cap) = old_cap.checked_mul(2) else {
            warn!("bucket count {old_cap} cannot be doubled; resize skipped");
            return;
        };
        let (Some(heads), Some(mut tails)) = (empty_heads(new_cap), empty_heads(new_cap)) else {
            warn!("cannot allocate {new_cap} buckets; keeping {old_cap}");
            return;
        };
        let old = std::mem::replace(&mut self.buckets, heads);

        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let Some(entry) = self.slots.get_mut(k) else {
                    break;
                };
                cur = entry.next.take();
                let idx = bucket_index(&entry.key, new_cap);
                match tails[idx] {
                    Some(t) => {
                        if let Some(te) = self.slots.get_mut(t) {
                            te.next = Some(k);
                        }
                    }
                    None => self.buckets[idx] = Some(k),
                }
                tails[idx] = Some(k);
            }
        }

        debug!(
            "resized from {old_cap} to {new_cap} buckets ({} entries)",
            self.len()
        );
    }

    /// Frees every entry; capacity is kept.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        debug!("clearing {} entries", self.len());
        self.slots.clear();
        self.buckets.fill(None);
    }

    /// Consumes the map, freeing every entry and the bucket array.
    pub fn destroy(mut self) {
        self.clear();
    }

    /// Panics if a structural invariant does not hold.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut reachable = 0;
        for idx in 0..self.capacity() {
            for (_, e) in self.chain(idx) {
                assert_eq!(
                    bucket_index(&e.key, self.capacity()),
                    idx,
                    "entry {:?} linked into wrong bucket",
                    e.key
                );
                reachable += 1;
                assert!(reachable <= self.slots.len(), "cycle in chain {idx}");
            }
        }
        assert_eq!(reachable, self.len(), "unreachable entries in arena");
    }
}
