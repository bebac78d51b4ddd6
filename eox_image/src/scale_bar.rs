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

//! the map scale ruler in the bottom strip

use image::Rgba;
use serde::{Serialize,Deserialize};
use eox_tiles::Viewport;

use crate::layout::{Zone, PAD};
use crate::surface::RasterSurface;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ScaleBar {
    pub text: String,
    pub width_px: u32,
}

impl ScaleBar {
    pub fn new (text: impl ToString, width_px: u32)->Self {
        ScaleBar { text: text.to_string(), width_px }
    }

    /// the longest "nice" distance that fits into `max_width_px` at the center of `viewport`
    pub fn for_viewport (viewport: &Viewport, max_width_px: u32) -> Option<ScaleBar> {
        let mpp = viewport.meters_per_pixel();
        let d = nice_distance( mpp * max_width_px as f64)?;
        let width_px = (d / mpp).round() as u32;

        let text = if d >= 1000.0 {
            format!("{} km", format_number( d / 1000.0))
        } else {
            format!("{} m", format_number( d))
        };

        Some( ScaleBar { text, width_px } )
    }

    /// horizontal space required for ruler and label, including padding
    pub fn measured_width (&self, surface: &dyn RasterSurface, font_size: f32) -> u32 {
        let (tw,_) = surface.measure_text( &self.text, font_size);
        PAD + self.width_px + PAD/2 + tw + PAD
    }

    /// draw a bracket shaped ruler with a half way tick into `zone` of the strip, label to its right
    pub fn draw (&self, surface: &mut dyn RasterSurface, zone: Zone, strip_top: u32, strip_height: u32, font_size: f32, color: Rgba<u8>) {
        let x0 = (zone.x + PAD) as f32;
        let x1 = x0 + self.width_px as f32;
        let xm = (x0 + x1) / 2.0;

        let y_base = (strip_top + strip_height) as f32 - (strip_height as f32 * 0.25).max(1.0);
        let tick_h = (strip_height as f32 * 0.5).max(2.0);

        surface.draw_line( x0, y_base, x1, y_base, color);
        surface.draw_line( x0, y_base - tick_h, x0, y_base, color);
        surface.draw_line( x1, y_base - tick_h, x1, y_base, color);
        surface.draw_line( xm, y_base - tick_h / 2.0, xm, y_base, color);

        let (_,th) = surface.measure_text( &self.text, font_size);
        let ty = strip_top as i32 + (strip_height as i32 - th as i32) / 2;
        surface.draw_text( &self.text, (x1 as u32 + PAD/2) as i32, ty, font_size, color, false);
    }
}

/// largest 1, 2, 3 or 5 times a power of ten that does not exceed `max_meters`
pub fn nice_distance (max_meters: f64) -> Option<f64> {
    if !max_meters.is_finite() || max_meters <= 0.0 {
        return None
    }

    let base = 10f64.powf( max_meters.log10().floor());
    [5.0, 3.0, 2.0, 1.0].into_iter()
        .map( |m| m * base)
        .find( |d| *d <= max_meters * (1.0 + 1e-9))
        .or( Some(base))
}

fn format_number (v: f64) -> String {
    let s = format!("{v:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
