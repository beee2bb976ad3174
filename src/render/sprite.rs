use std::collections::{HashMap, VecDeque};

use crate::render::surface::BoardImage;

/// Key identifying one rendered board sprite.
///
/// Sprites are raster, not vector: the target dimensions, pixel ratio and
/// oversampling factor are part of the key and never normalized away. The
/// board content rides along as canonical JSON, so a hit requires exact
/// content equality rather than a digest match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    template_id: String,
    info_json: String,
    target_w: u32,
    target_h: u32,
    pixel_ratio_bits: u64,
    oversample_bits: u64,
}

impl SpriteKey {
    /// Build a key; the pixel ratio and oversampling factor are captured
    /// bit-exactly.
    pub fn new(
        template_id: impl Into<String>,
        info_json: impl Into<String>,
        target_w: u32,
        target_h: u32,
        pixel_ratio: f64,
        oversample: f64,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            info_json: info_json.into(),
            target_w,
            target_h,
            pixel_ratio_bits: pixel_ratio.to_bits(),
            oversample_bits: oversample.to_bits(),
        }
    }
}

/// Fixed-capacity cache of rendered board sprites with LRU eviction.
///
/// Single-threaded shared state: a reference returned by
/// [`SpriteCache::get`] is valid only until the next
/// [`SpriteCache::put`], which may evict the entry behind it.
pub struct SpriteCache {
    entries: HashMap<SpriteKey, BoardImage>,
    lru: VecDeque<SpriteKey>,
    capacity: usize,
}

impl SpriteCache {
    /// Default sprite capacity.
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Create a cache holding at most [`SpriteCache::DEFAULT_CAPACITY`]
    /// sprites.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` sprites (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of cached sprites.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a sprite, marking it most-recently-used on a hit.
    pub fn get(&mut self, key: &SpriteKey) -> Option<&BoardImage> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    /// Insert a sprite, evicting the least-recently-used entry once over
    /// capacity.
    ///
    /// Re-inserting an existing key replaces its bitmap and marks the key
    /// most-recently-used.
    pub fn put(&mut self, key: SpriteKey, image: BoardImage) {
        if self.entries.insert(key.clone(), image).is_some() {
            self.touch(&key);
            return;
        }
        self.lru.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
    }

    /// Drop every cached sprite.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn touch(&mut self, key: &SpriteKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

impl Default for SpriteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sprite.rs"]
mod tests;
