use super::*;

fn pixel() -> BoardImage {
    BoardImage {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 0],
        premultiplied: true,
    }
}

fn key(n: u32) -> SpriteKey {
    SpriteKey::new("t1", format!("{{\"n\":{n}}}"), 400, 300, 2.0, 1.5)
}

#[test]
fn eviction_drops_the_oldest_entries_first() {
    let mut cache = SpriteCache::with_capacity(3);
    for n in 0..5 {
        cache.put(key(n), pixel());
    }
    assert_eq!(cache.len(), 3);
    assert!(cache.get(&key(0)).is_none());
    assert!(cache.get(&key(1)).is_none());
    for n in 2..5 {
        assert!(cache.get(&key(n)).is_some());
    }
}

#[test]
fn reinserting_a_key_refreshes_its_position() {
    let mut cache = SpriteCache::with_capacity(2);
    cache.put(key(0), pixel());
    cache.put(key(1), pixel());
    cache.put(key(0), pixel());
    cache.put(key(2), pixel());
    assert!(cache.get(&key(1)).is_none());
    assert!(cache.get(&key(0)).is_some());
    assert!(cache.get(&key(2)).is_some());
}

#[test]
fn lookups_protect_an_entry_from_eviction() {
    let mut cache = SpriteCache::with_capacity(2);
    cache.put(key(0), pixel());
    cache.put(key(1), pixel());
    assert!(cache.get(&key(0)).is_some());
    cache.put(key(2), pixel());
    assert!(cache.get(&key(0)).is_some());
    assert!(cache.get(&key(1)).is_none());
}

#[test]
fn keys_differ_on_every_raster_parameter() {
    let base = key(0);
    assert_ne!(
        base,
        SpriteKey::new("t2", "{\"n\":0}", 400, 300, 2.0, 1.5)
    );
    assert_ne!(
        base,
        SpriteKey::new("t1", "{\"n\":0}", 401, 300, 2.0, 1.5)
    );
    assert_ne!(
        base,
        SpriteKey::new("t1", "{\"n\":0}", 400, 301, 2.0, 1.5)
    );
    assert_ne!(
        base,
        SpriteKey::new("t1", "{\"n\":0}", 400, 300, 3.0, 1.5)
    );
    assert_ne!(
        base,
        SpriteKey::new("t1", "{\"n\":0}", 400, 300, 2.0, 1.0)
    );
    assert_eq!(base, key(0));
}

#[test]
fn clear_empties_the_cache() {
    let mut cache = SpriteCache::new();
    cache.put(key(0), pixel());
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get(&key(0)).is_none());
}
