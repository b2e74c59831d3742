//! chain-hashmap: a single-threaded, string-keyed hash map using separate
//! chaining, with a caller-driven capacity-doubling resize.
//!
//! Internal Design:
//!
//! Summary
//! - One structure, `ChainMap`: a `Vec` of bucket heads, each head the start
//!   of a singly-linked chain of entries, plus an arena holding the entries.
//! - Entries live in a `slotmap::SlotMap`; chain links and bucket heads are
//!   arena keys. Relinking on resize touches only keys, never entry storage,
//!   and dropping the map never recurses down a chain.
//! - Bucket index is the sum of the key's code points modulo the live
//!   bucket count (`hash::bucket_index`). The bucket count is the length of
//!   the head array, so there is no separate capacity field to drift.
//!
//! Operations
//! - `insert` copies key and value, links a new head: O(1) regardless of
//!   chain length. Arena room and both string copies are reserved
//!   fallibly before linking; failure returns `AllocationError` with the
//!   map untouched.
//! - `get` walks one chain and returns the first match, i.e. the most
//!   recently inserted entry for that key.
//! - `remove` unlinks the first match and returns its value; absent keys
//!   are a no-op.
//! - `resize` doubles the head array and relinks every entry under the new
//!   count, preserving relative chain order.
//!
//! Duplicate keys
//! - `DuplicateKeys::Shadow` (default): a second insert of the same key adds
//!   a new head entry. Lookup sees the newest; `len` counts both; each
//!   `remove` peels one layer.
//! - `DuplicateKeys::Replace`: overwrite the existing value in place.
//!
//! Notes and non-goals
//! - No iteration API and no generic key/value types.
//! - The map never resizes on its own. Callers consult `load_factor` or
//!   `needs_resize` (threshold from `MapConfig`) and call `resize`.
//! - No internal locking. The map is plain owned data (`Send + Sync`); wrap
//!   it in a `Mutex` to share it between threads.

mod chain_map;
mod chain_map_proptest;
pub mod config;
mod error;
mod hash;

// Public surface
pub use chain_map::ChainMap;
pub use config::{DuplicateKeys, MapConfig};
pub use error::{AllocationError, ConfigError, ParseDuplicateKeysError};
