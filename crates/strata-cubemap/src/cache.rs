//! Content-addressed memoization of cube map conversions.

use std::collections::HashMap;

use strata_core::content_key;

use crate::filter::{CubeMapFilter, DEFAULT_OUTPUT_WIDTH};

/// Memoizing wrapper around [`CubeMapFilter`].
///
/// Conversions are keyed by input length and rolling hash; repeated
/// conversions of identical bytes are served from memory. Entries are never
/// evicted, so the cache's footprint grows with the set of distinct inputs;
/// callers scope the cache's lifetime accordingly. Key collisions between
/// distinct inputs are accepted as-is (birthday bound on a 32-bit hash per
/// length class).
///
/// The cache is plain owned data; concurrent callers need their own
/// instance or an external lock.
pub struct CubeMapCache {
    filter: CubeMapFilter,
    entries: HashMap<u64, Vec<u8>>,
}

impl Default for CubeMapCache {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_WIDTH)
    }
}

impl CubeMapCache {
    /// Create a cache whose filter produces faces of `output_width` pixels.
    pub fn new(output_width: usize) -> Self {
        Self {
            filter: CubeMapFilter::new(output_width),
            entries: HashMap::new(),
        }
    }

    /// Convert a cube map in place, reusing a previous result when the
    /// input bytes have been seen before.
    ///
    /// On a hit the cached output is copied over the head of `buf`; the
    /// caller contract is that `buf` is at least as large as the input that
    /// produced the entry, which holds because converted output is always
    /// smaller than its input.
    pub fn convert(&mut self, buf: &mut [u8]) -> usize {
        let key = content_key(buf);
        if let Some(cached) = self.entries.get(&key) {
            tracing::debug!(key, len = cached.len(), "cube map cache hit");
            buf[..cached.len()].copy_from_slice(cached);
            return cached.len();
        }

        let new_len = self.filter.convert(buf);
        // Only converted outputs are worth remembering; a pass-through
        // (new_len == buf.len()) means the input was not applicable.
        if new_len > 0 && new_len < buf.len() {
            tracing::debug!(key, len = new_len, "caching cube map conversion");
            self.entries.insert(key, buf[..new_len].to_vec());
        }
        new_len
    }

    /// Number of cached conversions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
