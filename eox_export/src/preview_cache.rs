/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! bounded, time limited cache for preview thumbnails

use std::{sync::atomic::{AtomicU64, Ordering}, time::{Duration, Instant}};
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

type CacheKey = (String,String); // (collection, product)

struct CacheEntry {
    data: Bytes,
    inserted: Instant,
    seq: u64,
}

/// thumbnails keyed by (collection,product). Entries older than `ttl` are misses, inserting into a full
/// cache evicts the oldest entry. Safe to share between concurrent export tasks
pub struct PreviewCache {
    capacity: usize,
    ttl: Duration,
    entries: DashMap<CacheKey,CacheEntry>,
    seq: AtomicU64,
}

impl PreviewCache {
    pub fn new (capacity: usize, ttl: Duration)->Self {
        PreviewCache { capacity: capacity.max(1), ttl, entries: DashMap::new(), seq: AtomicU64::new(0) }
    }

    pub fn capacity (&self) -> usize { self.capacity }
    pub fn ttl (&self) -> Duration { self.ttl }
    pub fn len (&self) -> usize { self.entries.len() }
    pub fn is_empty (&self) -> bool { self.entries.is_empty() }

    pub fn get (&self, collection: &str, product: &str) -> Option<Bytes> {
        let key = (collection.to_string(), product.to_string());
        {
            let e = self.entries.get( &key)?;
            if e.inserted.elapsed() < self.ttl {
                return Some( e.data.clone())
            }
        }
        debug!("preview of {collection}/{product} expired");
        self.entries.remove( &key);
        None
    }

    pub fn insert (&self, collection: &str, product: &str, data: Bytes) {
        let key = (collection.to_string(), product.to_string());

        if !self.entries.contains_key( &key) {
            self.purge_expired();
            while self.entries.len() >= self.capacity {
                if !self.evict_oldest() { break }
            }
        }

        let seq = self.seq.fetch_add( 1, Ordering::Relaxed);
        self.entries.insert( key, CacheEntry { data, inserted: Instant::now(), seq });
    }

    fn purge_expired (&self) {
        let ttl = self.ttl;
        self.entries.retain( |_,e| e.inserted.elapsed() < ttl);
    }

    fn evict_oldest (&self) -> bool {
        let oldest = self.entries.iter()
            .min_by_key( |e| e.value().seq)
            .map( |e| e.key().clone());

        if let Some(key) = oldest {
            debug!("evicting preview of {}/{}", key.0, key.1);
            self.entries.remove( &key).is_some()
        } else {
            false
        }
    }
}
