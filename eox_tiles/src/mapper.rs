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

//! viewport -> basemap tile grid computation

use serde::{Serialize,Deserialize};
use crate::mercator::{Viewport, MAX_ZOOM, grid_size, project};

/// one basemap tile and the offset (of its upper left corner) at which it has to be drawn onto the
/// destination raster. `column` is already wrapped into the valid range of `zoom`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TileRequest {
    pub zoom: u8,
    pub column: u32,
    pub row: u32,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

impl TileRequest {
    /// integer draw position (rounded)
    pub fn draw_pos (&self) -> (i64,i64) {
        (self.pixel_x.round() as i64, self.pixel_y.round() as i64)
    }
}

/// zoom level at which tiles are indexed for a source with a `zoom_offset` (e.g. +1 for providers that are
/// addressed one level deeper than the nominal map zoom)
pub fn effective_zoom (zoom: u8, zoom_offset: i32) -> u8 {
    (zoom as i32 + zoom_offset).clamp( 0, MAX_ZOOM as i32) as u8
}

/// the map repeats horizontally, hence columns wrap modulo the grid width
#[inline]
pub fn wrap_column (column: i64, zoom: u8) -> u32 {
    column.rem_euclid( grid_size(zoom)) as u32
}

/// rows do not wrap - anything outside the grid is not a valid tile
#[inline]
pub fn valid_row (row: i64, zoom: u8) -> Option<u32> {
    if row >= 0 && row < grid_size(zoom) { Some(row as u32) } else { None }
}

/// compute the tiles needed to cover the pixel rectangle of `viewport`.
/// The result is ordered row-major (north to south, west to east). Tiles with invalid rows (beyond the poles)
/// are omitted, which leaves a gap in the stitched raster
pub fn tile_requests (viewport: &Viewport, tile_size: u32, zoom_offset: i32) -> Vec<TileRequest> {
    let zoom = effective_zoom( viewport.zoom, zoom_offset);
    let ts = tile_size.max(1) as f64;

    let (ox,oy) = project( viewport.center_lat, viewport.center_lng, zoom, tile_size);
    let hw = viewport.pixel_width as f64 / 2.0;
    let hh = viewport.pixel_height as f64 / 2.0;

    // fractional tile coordinates of the viewport center
    let center_col = ox / ts;
    let center_row = oy / ts;

    // tiles that intersect [ox-hw,ox+hw) x [oy-hh,oy+hh)
    let min_col = ((ox - hw) / ts).floor() as i64;
    let max_col = (((ox + hw) / ts).ceil() as i64 - 1).max(min_col);
    let min_row = ((oy - hh) / ts).floor() as i64;
    let max_row = (((oy + hh) / ts).ceil() as i64 - 1).max(min_row);

    let mut tiles = Vec::with_capacity( ((max_col - min_col + 1) * (max_row - min_row + 1)) as usize);

    for j in min_row..=max_row {
        if let Some(row) = valid_row( j, zoom) {
            let pixel_y = hh + ts * (j as f64 - center_row);
            for i in min_col..=max_col {
                let pixel_x = hw + ts * (i as f64 - center_col);
                tiles.push( TileRequest { zoom, column: wrap_column( i, zoom), row, pixel_x, pixel_y });
            }
        }
    }

    tiles
}
