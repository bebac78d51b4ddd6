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

//! fetching basemap tiles and stitching them into a single raster

use std::sync::Arc;
use futures::future::join_all;
use image::{imageops::{self, FilterType}, RgbaImage};
use serde::{Serialize,Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug,warn};
use eox_common::net::AssetFetcher;

use crate::errors::{Result, EoxTilesError, cancelled};
use crate::mapper::TileRequest;

/// gain factor of the readability filter (applied to the red channel)
pub const READABILITY_GAIN: f32 = 1.7;

/// a tile URL pattern such as "https://{s}.tiles.org/{z}/{x}/{y}.png"
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TileUrlTemplate {
    pub template: String,

    #[serde(default)]
    pub subdomains: Vec<String>,
}

impl TileUrlTemplate {
    pub fn new (template: impl ToString, subdomains: Vec<String>)->Result<Self> {
        let t = TileUrlTemplate { template: template.to_string(), subdomains };
        t.check()?;
        Ok(t)
    }

    /// make sure we can expand the template for any tile
    pub fn check (&self)->Result<()> {
        for token in ["{z}", "{x}", "{y}"] {
            if !self.template.contains(token) {
                return Err( EoxTilesError::InvalidUrlTemplate( format!("{} lacks {token}", self.template)))
            }
        }
        if self.template.contains("{s}") && self.subdomains.is_empty() {
            return Err( EoxTilesError::InvalidUrlTemplate( format!("{} has no subdomains", self.template)))
        }
        Ok(())
    }

    /// expand the template. Subdomains are picked deterministically so that the same tile always maps to the same host
    pub fn url_for (&self, tile: &TileRequest)->String {
        let mut url = self.template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.column.to_string())
            .replace("{y}", &tile.row.to_string());

        if !self.subdomains.is_empty() {
            let idx = (tile.column as u64 + tile.row as u64) % self.subdomains.len() as u64;
            url = url.replace("{s}", &self.subdomains[idx as usize]);
        }
        url
    }
}

pub struct TileStitcher {
    fetcher: Arc<dyn AssetFetcher>
}

impl TileStitcher {
    pub fn new (fetcher: Arc<dyn AssetFetcher>)->Self {
        TileStitcher { fetcher }
    }

    /// fetch all `tiles` concurrently and draw them at their offsets onto a transparent `width` x `height` raster.
    /// Tiles that fail to load leave their area blank. The only error is cancellation (or an unusable template)
    pub async fn stitch (&self, tiles: &[TileRequest], template: &TileUrlTemplate, tile_size: u32,
                         width: u32, height: u32, readability_filter: bool, cancel: &CancellationToken) -> Result<RgbaImage>
    {
        template.check()?;

        let fetches = tiles.iter().map( |tile| self.fetch_tile( template.url_for( tile), tile_size, cancel));
        let images = join_all( fetches).await;

        if cancel.is_cancelled() {
            return Err( cancelled("tile overlay"))
        }

        let mut canvas = RgbaImage::new( width, height);
        let mut n_drawn = 0;
        for (tile, img) in tiles.iter().zip( images.iter()) {
            if let Some(img) = img {
                let (x,y) = tile.draw_pos();
                imageops::replace( &mut canvas, img, x, y);
                n_drawn += 1;
            }
        }
        debug!("stitched {} of {} tiles into {}x{} raster", n_drawn, tiles.len(), width, height);

        if readability_filter {
            apply_readability_filter( &mut canvas);
        }

        Ok(canvas)
    }

    async fn fetch_tile (&self, url: String, tile_size: u32, cancel: &CancellationToken) -> Option<RgbaImage> {
        match self.fetcher.fetch( &url, cancel).await {
            Ok(bytes) => match image::load_from_memory( &bytes) {
                Ok(img) => {
                    let img = img.to_rgba8();
                    if img.dimensions() != (tile_size,tile_size) {
                        Some( imageops::resize( &img, tile_size, tile_size, FilterType::Triangle))
                    } else {
                        Some(img)
                    }
                }
                Err(e) => {
                    warn!("failed to decode tile {url}: {e}");
                    None
                }
            }
            Err(e) => {
                warn!("failed to fetch tile {url}: {e}");
                None
            }
        }
    }
}

/// turn a (monochrome) label raster into a high contrast gray image: every color channel is set to
/// `READABILITY_GAIN * red`, saturating at 255. Alpha is kept
pub fn apply_readability_filter (img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let v = (READABILITY_GAIN * px[0] as f32).round().clamp( 0.0, 255.0) as u8;
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
}
