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

//! map overlay layers and how to turn them into rasters

use std::sync::Arc;
use image::RgbaImage;
use serde::{Serialize,Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use eox_common::net::AssetFetcher;

use crate::errors::{Result, EoxTilesError};
use crate::mercator::{Viewport, DEFAULT_TILE_SIZE};
use crate::mapper::tile_requests;
use crate::stitcher::{TileStitcher, TileUrlTemplate};
use crate::capture::SurfaceRegistry;

fn default_tile_size()->u32 { DEFAULT_TILE_SIZE }

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum OverlaySource {
    /// a raster tile service (labels, borders etc.)
    Tiled {
        url: TileUrlTemplate,

        #[serde(default="default_tile_size")]
        tile_size: u32,

        #[serde(default)]
        zoom_offset: i32,

        #[serde(default)]
        readability_filter: bool,
    },

    /// a vector layer that is rendered into a live surface
    VectorCapture {
        surface_id: String
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct OverlayLayer {
    pub id: String,
    pub z_index: i32,
    pub source: OverlaySource,
}

/// overlays in drawing order (ascending z_index). Layers with equal z_index keep their input order
pub fn sorted_by_z (layers: &[OverlayLayer]) -> Vec<&OverlayLayer> {
    let mut sorted: Vec<&OverlayLayer> = layers.iter().collect();
    sorted.sort_by_key( |l| l.z_index);
    sorted
}

pub struct OverlayRenderer {
    stitcher: TileStitcher,
    surfaces: Arc<SurfaceRegistry>,
}

impl OverlayRenderer {
    pub fn new (fetcher: Arc<dyn AssetFetcher>, surfaces: Arc<SurfaceRegistry>)->Self {
        OverlayRenderer { stitcher: TileStitcher::new(fetcher), surfaces }
    }

    pub fn surfaces (&self) -> &Arc<SurfaceRegistry> {
        &self.surfaces
    }

    /// produce the raster of `layer` for a `width` x `height` image. Tiled layers need the viewport of the image
    /// (which gets resized to the requested dimensions), vector layers are just captured as they are
    pub async fn render (&self, layer: &OverlayLayer, viewport: Option<&Viewport>, width: u32, height: u32,
                         cancel: &CancellationToken) -> Result<Arc<RgbaImage>>
    {
        match &layer.source {
            OverlaySource::Tiled { url, tile_size, zoom_offset, readability_filter } => {
                let vp = viewport.ok_or_else( || EoxTilesError::MissingViewport( layer.id.clone()))?.with_size( width, height);
                let tiles = tile_requests( &vp, *tile_size, *zoom_offset);
                debug!("rendering tiled overlay {} from {} tiles", layer.id, tiles.len());

                let img = self.stitcher.stitch( &tiles, url, *tile_size, width, height, *readability_filter, cancel).await?;
                Ok( Arc::new(img) )
            }
            OverlaySource::VectorCapture { surface_id } => {
                self.surfaces.capture( surface_id)
            }
        }
    }
}
