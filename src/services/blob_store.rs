//! Revocable in-memory byte storage.
//!
//! Every ingested file lives here behind a [`ByteHandle`]. A handle is owned
//! by exactly one record and is consumed by [`BlobStore::revoke`]; once
//! revoked, the bytes are released and the handle cannot be resolved again.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Exclusive, revocable reference to bytes held in a [`BlobStore`].
///
/// Not `Clone`: releasing the handle requires giving it up.
#[derive(Debug, PartialEq, Eq)]
pub struct ByteHandle {
    key: u64,
}

impl ByteHandle {
    /// URL-style name of the handle, e.g. `blob:glint/3`
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ByteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:glint/{}", self.key)
    }
}

/// Owner of all live byte buffers
#[derive(Debug, Default)]
pub struct BlobStore {
    next_key: u64,
    blobs: HashMap<u64, Arc<[u8]>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and hand out the only handle to them.
    pub fn create(&mut self, bytes: Vec<u8>) -> ByteHandle {
        let key = self.next_key;
        self.next_key += 1;
        self.blobs.insert(key, Arc::from(bytes));
        ByteHandle { key }
    }

    /// Shared view of the bytes behind `handle`, if still live.
    pub fn resolve(&self, handle: &ByteHandle) -> Option<Arc<[u8]>> {
        self.blobs.get(&handle.key).cloned()
    }

    /// Release the bytes behind `handle`. Returns false if the handle was
    /// issued by another store.
    pub fn revoke(&mut self, handle: ByteHandle) -> bool {
        let released = self.blobs.remove(&handle.key).is_some();
        if !released {
            tracing::warn!(handle = %handle, "Revoked unknown byte handle");
        }
        released
    }

    /// Number of handles not yet revoked
    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }
}
