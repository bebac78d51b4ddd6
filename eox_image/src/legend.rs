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

//! legend rendering. Legends are either a raster the caller points us to, or a discrete/continuous
//! color specification we render ourselves at a natural size that is then scaled to the canvas

use std::sync::Arc;
use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};
use serde::{Serialize,Deserialize};

use crate::surface::{ImageSurface, RasterSurface};

pub const LEGEND_FONT_SIZE: f32 = 12.0;
const MARKER_SIZE: u32 = 12;
const ROW_HEIGHT: u32 = 18;
const RAMP_WIDTH: u32 = 16;
const RAMP_HEIGHT: u32 = 150;
const INSET: u32 = 6;
const GAP: u32 = 6;

const BACKGROUND: Rgba<u8> = Rgba([255,255,255,200]);
const FOREGROUND: Rgba<u8> = Rgba([0,0,0,255]);

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct LegendItem {
    pub color: String, // "#rrggbb" or "#rrggbbaa"
    pub label: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct LegendTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum LegendSource {
    /// an existing legend raster (http(s) or file URL)
    ImageUrl(String),

    /// stacked color markers with labels
    Discrete(Vec<LegendItem>),

    /// vertical color ramp, highest value on top
    Continuous {
        stops: Vec<ColorStop>,
        ticks: Vec<LegendTick>,
    }
}

pub fn parse_hex_color (s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix( hex.get(i..i+2)?, 16).ok();

    match hex.len() {
        6 => Some( Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some( Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None
    }
}

/// render a legend spec at its natural size. Returns None for image URLs and for specs we cannot render
/// (no entries, invalid colors)
pub fn render_legend (source: &LegendSource, font: Option<Arc<FontVec>>) -> Option<RgbaImage> {
    match source {
        LegendSource::ImageUrl(_) => None,
        LegendSource::Discrete(items) => render_discrete( items, font),
        LegendSource::Continuous{stops,ticks} => render_continuous( stops, ticks, font)
    }
}

fn render_discrete (items: &[LegendItem], font: Option<Arc<FontVec>>) -> Option<RgbaImage> {
    if items.is_empty() { return None }

    let colors: Vec<Rgba<u8>> = items.iter().map( |i| parse_hex_color( &i.color)).collect::<Option<Vec<_>>>()?;

    let measure = ImageSurface::blank( 1, 1, font.clone());
    let label_w = items.iter().map( |i| measure.measure_text( &i.label, LEGEND_FONT_SIZE).0).max().unwrap_or(0);

    let width = INSET + MARKER_SIZE + GAP + label_w + INSET;
    let height = INSET + ROW_HEIGHT * items.len() as u32 + INSET;
    let mut surface = ImageSurface::blank( width, height, font);
    surface.fill_rect( 0, 0, width, height, BACKGROUND);

    for (k, (item, color)) in items.iter().zip( colors.iter()).enumerate() {
        let row_y = INSET + ROW_HEIGHT * k as u32;
        let marker_y = row_y + (ROW_HEIGHT - MARKER_SIZE) / 2;
        surface.fill_rect( INSET as i64, marker_y as i64, MARKER_SIZE, MARKER_SIZE, *color);

        let (_,th) = surface.measure_text( &item.label, LEGEND_FONT_SIZE);
        let ty = row_y as i32 + (ROW_HEIGHT as i32 - th as i32) / 2;
        surface.draw_text( &item.label, (INSET + MARKER_SIZE + GAP) as i32, ty, LEGEND_FONT_SIZE, FOREGROUND, false);
    }

    Some( surface.into_image() )
}

fn render_continuous (stops: &[ColorStop], ticks: &[LegendTick], font: Option<Arc<FontVec>>) -> Option<RgbaImage> {
    if stops.len() < 2 { return None }

    let mut stops: Vec<(f64,Rgba<u8>)> = stops.iter()
        .map( |s| parse_hex_color( &s.color).map( |c| (s.value, c)))
        .collect::<Option<Vec<_>>>()?;
    stops.sort_by( |a,b| a.0.total_cmp( &b.0));

    let v_min = stops[0].0;
    let v_max = stops[stops.len()-1].0;
    if !(v_max > v_min) { return None }

    let measure = ImageSurface::blank( 1, 1, font.clone());
    let label_w = ticks.iter().map( |t| measure.measure_text( &t.label, LEGEND_FONT_SIZE).0).max().unwrap_or(0);
    let label_h = LEGEND_FONT_SIZE.ceil() as u32;

    // leave room for half a label above and below the ramp
    let ramp_top = INSET + label_h / 2;
    let width = INSET + RAMP_WIDTH + GAP + label_w + INSET;
    let height = ramp_top + RAMP_HEIGHT + label_h / 2 + INSET;

    let mut surface = ImageSurface::blank( width, height, font);
    surface.fill_rect( 0, 0, width, height, BACKGROUND);

    for dy in 0..RAMP_HEIGHT {
        let v = v_max - (v_max - v_min) * (dy as f64 + 0.5) / RAMP_HEIGHT as f64;
        surface.fill_rect( INSET as i64, (ramp_top + dy) as i64, RAMP_WIDTH, 1, interpolate( &stops, v));
    }

    let x_tick = (INSET + RAMP_WIDTH) as f32;
    for tick in ticks {
        if tick.value < v_min || tick.value > v_max { continue }

        let y = ramp_top as f32 + ((v_max - tick.value) / (v_max - v_min) * RAMP_HEIGHT as f64) as f32;
        surface.draw_line( x_tick, y, x_tick + (GAP/2) as f32, y, FOREGROUND);

        let (_,th) = surface.measure_text( &tick.label, LEGEND_FONT_SIZE);
        surface.draw_text( &tick.label, (INSET + RAMP_WIDTH + GAP) as i32, y as i32 - th as i32 / 2, LEGEND_FONT_SIZE, FOREGROUND, false);
    }

    Some( surface.into_image() )
}

/// linear color interpolation between sorted stops
fn interpolate (stops: &[(f64,Rgba<u8>)], v: f64) -> Rgba<u8> {
    for w in stops.windows(2) {
        let (v0,c0) = w[0];
        let (v1,c1) = w[1];
        if v >= v0 && v <= v1 {
            let t = if v1 > v0 { (v - v0) / (v1 - v0) } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            return Rgba([ mix(c0[0],c1[0]), mix(c0[1],c1[1]), mix(c0[2],c1[2]), mix(c0[3],c1[3]) ])
        }
    }
    if v < stops[0].0 { stops[0].1 } else { stops[stops.len()-1].1 }
}
