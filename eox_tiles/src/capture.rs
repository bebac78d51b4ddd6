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

//! snapshots of live vector rendering surfaces
//!
//! Vector overlays are rendered by whoever owns the map view. They publish the current raster of each
//! surface here under the layer id, and the exporter grabs a snapshot when it composes an image.
//! Once a surface is detached it can no longer be captured

use std::sync::Arc;
use dashmap::DashMap;
use image::RgbaImage;
use tracing::debug;

use crate::errors::{Result, no_such_surface};

#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: DashMap<String, Arc<RgbaImage>>
}

impl SurfaceRegistry {
    pub fn new ()->Self {
        SurfaceRegistry { surfaces: DashMap::new() }
    }

    /// register a new surface, or replace the raster of an existing one
    pub fn attach (&self, id: impl ToString, raster: RgbaImage) {
        let id = id.to_string();
        debug!("attach rendering surface {} ({}x{})", id, raster.width(), raster.height());
        self.surfaces.insert( id, Arc::new(raster));
    }

    /// replace the raster of a live surface. Returns false if the surface is not attached
    pub fn update (&self, id: &str, raster: RgbaImage) -> bool {
        if let Some(mut e) = self.surfaces.get_mut(id) {
            *e.value_mut() = Arc::new(raster);
            true
        } else {
            false
        }
    }

    pub fn detach (&self, id: &str) -> bool {
        debug!("detach rendering surface {}", id);
        self.surfaces.remove(id).is_some()
    }

    pub fn is_attached (&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len (&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty (&self) -> bool {
        self.surfaces.is_empty()
    }

    /// current raster content of the surface `id`. Later updates do not affect the returned snapshot
    pub fn capture (&self, id: &str) -> Result<Arc<RgbaImage>> {
        self.surfaces.get(id)
            .map( |e| e.value().clone())
            .ok_or_else( || no_such_surface(id))
    }
}
