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

//! attribution marks in the lower right corner

use image::{imageops::{self, FilterType}, RgbaImage};
use tracing::warn;

use crate::layout::{Zone, layout_logos};
use crate::surface::RasterSurface;

/// decode logo images, skipping the ones that are not valid rasters
pub fn decode_logos (data: &[(String,Vec<u8>)]) -> Vec<RgbaImage> {
    data.iter().filter_map( |(url,bytes)| {
        match image::load_from_memory( bytes) {
            Ok(img) => Some( img.to_rgba8()),
            Err(e) => { warn!("ignoring logo {url}: {e}"); None }
        }
    }).collect()
}

/// draw `logos` into the logo `zone` of the bottom strip, side by side if they fit, stacked otherwise
pub fn draw_logos (surface: &mut dyn RasterSurface, logos: &[RgbaImage], zone: Zone, strip_top: u32, strip_height: u32) {
    let sizes: Vec<(u32,u32)> = logos.iter().map( |l| l.dimensions()).collect();

    for (logo, p) in logos.iter().zip( layout_logos( &sizes, zone, strip_top, strip_height)) {
        if p.width == 0 || p.height == 0 { continue }

        if logo.dimensions() == (p.width, p.height) {
            surface.draw_image( logo, p.x, p.y);
        } else {
            let scaled = imageops::resize( logo, p.width, p.height, FilterType::Triangle);
            surface.draw_image( &scaled, p.x, p.y);
        }
    }
}
