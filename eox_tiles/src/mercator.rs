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

//! Spherical Mercator (EPSG:3857) projection in the pixel space of a standard web tile pyramid

use serde::{Serialize,Deserialize};
use eox_common::{BoundingBox, PI, atan, cos, deg, rad, sinh, geo_constants::{EQUATORIAL_CIRCUMFERENCE, MAX_MERCATOR_LAT}};

pub const DEFAULT_TILE_SIZE: u32 = 256;
pub const MAX_ZOOM: u8 = 24;

/// number of tiles per row/column of the pyramid at `zoom`
#[inline]
pub fn grid_size (zoom: u8) -> i64 {
    1i64 << zoom.min(MAX_ZOOM)
}

/// width (and height) of the whole world in pixels at `zoom`
#[inline]
pub fn world_size (zoom: u8, tile_size: u32) -> f64 {
    tile_size as f64 * grid_size(zoom) as f64
}

/// project WGS84 degrees into world pixel coordinates (origin at the north-west corner).
/// Latitudes are clamped to the Mercator limits, longitudes are not normalized
pub fn project (lat: f64, lng: f64, zoom: u8, tile_size: u32) -> (f64,f64) {
    let size = world_size( zoom, tile_size);
    let lat = lat.clamp( -MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);

    let x = (lng + 180.0) / 360.0 * size;
    let y = (1.0 - rad(lat).tan().asinh() / PI) / 2.0 * size;
    (x,y)
}

/// inverse of [`project`], returns (lat,lng) in degrees
pub fn unproject (x: f64, y: f64, zoom: u8, tile_size: u32) -> (f64,f64) {
    let size = world_size( zoom, tile_size);

    let lng = x / size * 360.0 - 180.0;
    let lat = deg( atan( sinh( PI * (1.0 - 2.0 * y / size))));
    (lat,lng)
}

/// the map view that gets exported: a geographic center at a given zoom level, seen through a pixel rectangle
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Viewport {
    pub fn new (center_lat: f64, center_lng: f64, zoom: u8, pixel_width: u32, pixel_height: u32)->Self {
        Viewport { center_lat, center_lng, zoom, pixel_width, pixel_height }
    }

    /// same center and zoom, different pixel size
    pub fn with_size (&self, pixel_width: u32, pixel_height: u32)->Self {
        Viewport { pixel_width, pixel_height, ..*self }
    }

    /// world pixel coordinates of the center at our zoom level
    pub fn center_px (&self, tile_size: u32) -> (f64,f64) {
        project( self.center_lat, self.center_lng, self.zoom, tile_size)
    }

    /// WGS84 bounds of the pixel rectangle (in degrees). West can be < -180 or east > 180 if the
    /// view crosses the antimeridian
    pub fn bounds (&self) -> BoundingBox<f64> {
        let (cx,cy) = self.center_px( DEFAULT_TILE_SIZE);
        let hw = self.pixel_width as f64 / 2.0;
        let hh = self.pixel_height as f64 / 2.0;

        let (north,west) = unproject( cx - hw, cy - hh, self.zoom, DEFAULT_TILE_SIZE);
        let (south,east) = unproject( cx + hw, cy + hh, self.zoom, DEFAULT_TILE_SIZE);

        BoundingBox::new( west, south, east, north)
    }

    /// EPSG:3857 bounds of the pixel rectangle (in meters). Rasters requested for these bounds have rows that
    /// are linear in Mercator y, i.e. they line up with the tile grid
    pub fn mercator_bounds (&self) -> BoundingBox<f64> {
        let size = world_size( self.zoom, DEFAULT_TILE_SIZE);
        let (cx,cy) = self.center_px( DEFAULT_TILE_SIZE);
        let hw = self.pixel_width as f64 / 2.0;
        let hh = self.pixel_height as f64 / 2.0;

        let mx = |px: f64| (px / size - 0.5) * EQUATORIAL_CIRCUMFERENCE;
        let my = |py: f64| (0.5 - py / size) * EQUATORIAL_CIRCUMFERENCE;

        BoundingBox::new( mx(cx - hw), my(cy + hh), mx(cx + hw), my(cy - hh))
    }

    /// ground resolution at the center latitude
    pub fn meters_per_pixel (&self) -> f64 {
        let lat = self.center_lat.clamp( -MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        EQUATORIAL_CIRCUMFERENCE * cos( rad(lat)) / world_size( self.zoom, DEFAULT_TILE_SIZE)
    }
}
