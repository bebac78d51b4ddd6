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

//! resolution independent layout of the decoration elements. Everything in here is pure arithmetic
//! on canvas dimensions so that it can be checked without drawing anything

use serde::{Serialize,Deserialize};

/// fixed padding between layout zones (px)
pub const PAD: u32 = 10;

/// height of the top caption band and the bottom strip relative to the canvas height
pub const BAND_HEIGHT_FRACTION: f32 = 0.04;

/// the scale bar zone is at least this fraction of the canvas width
pub const SCALE_ZONE_MIN_FRACTION: f32 = 0.33;

/// share of the width right of the scale bar zone that goes to the copyright text (the rest is for logos)
pub const COPYRIGHT_SHARE: f32 = 0.6;

/// the legend is scaled to this fraction of the canvas width..
pub const LEGEND_WIDTH_FRACTION: f32 = 0.05;
/// ..but never below or above these ratios of its natural size
pub const LEGEND_MIN_RATIO: f32 = 0.6;
pub const LEGEND_MAX_RATIO: f32 = 1.0;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Zone {
    pub x: u32,
    pub width: u32,
}

impl Zone {
    pub fn end (&self) -> u32 { self.x + self.width }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct StripZones {
    pub scale_bar: Zone,
    pub copyright: Zone,
    pub logos: Zone,
}

impl StripZones {
    pub fn total_width (&self) -> u32 {
        self.scale_bar.width + self.copyright.width + self.logos.width
    }
}

/// split the bottom strip of a `canvas_width` wide canvas into (from the left) scale bar, copyright and logo zones.
/// The scale bar zone gets the larger of `scale_bar_width` and a third of the canvas, the remainder R is split 60/40 between
/// copyright and logos with one `PAD` subtracted from each. Zones are separated by `PAD`, hence for canvases that are at
/// least 5*PAD wide the zone widths add up to `canvas_width - 2*PAD`. Narrower canvases get three empty zones at x = 0
pub fn partition_bottom_strip (canvas_width: u32, scale_bar_width: u32) -> StripZones {
    if canvas_width < 5*PAD {
        let empty = Zone { x: 0, width: 0 };
        return StripZones { scale_bar: empty, copyright: empty, logos: empty }
    }

    let min_scale = (SCALE_ZONE_MIN_FRACTION * canvas_width as f32).round() as u32;
    let scale_w = scale_bar_width.max( min_scale).min( canvas_width - 5*PAD);

    let rest = canvas_width - scale_w;
    let copyright_share = (COPYRIGHT_SHARE * rest as f32).round() as u32;
    let copyright_w = copyright_share.saturating_sub( PAD);
    let logos_w = (rest - copyright_share).saturating_sub( PAD);

    let scale_bar = Zone { x: 0, width: scale_w };
    let copyright = Zone { x: scale_bar.end() + PAD, width: copyright_w };
    let logos = Zone { x: copyright.end() + PAD, width: logos_w };

    StripZones { scale_bar, copyright, logos }
}

/// height of the top caption band and of the bottom strip
pub fn band_height (canvas_height: u32, min_height: u32) -> u32 {
    let h = (BAND_HEIGHT_FRACTION * canvas_height as f32).round() as u32;
    h.max( min_height).min( canvas_height)
}

/// scale ratio for a legend of `natural_width`
pub fn legend_scale_ratio (canvas_width: u32, natural_width: u32) -> f32 {
    if natural_width == 0 {
        LEGEND_MAX_RATIO
    } else {
        let target = LEGEND_WIDTH_FRACTION * canvas_width as f32;
        (target / natural_width as f32).clamp( LEGEND_MIN_RATIO, LEGEND_MAX_RATIO)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
pub enum LegendAnchor {
    #[default]
    BottomLeft,
    BottomRight,
}

/// upper left corner of a `legend_width` x `legend_height` legend. It sits on top of the bottom strip if
/// there is one (`strip_top`), otherwise flush with the bottom edge
pub fn legend_position (canvas_width: u32, canvas_height: u32, legend_width: u32, legend_height: u32,
                        anchor: LegendAnchor, strip_top: Option<u32>) -> (i64,i64)
{
    let bottom = strip_top.unwrap_or( canvas_height) as i64;
    let y = bottom - legend_height as i64;
    let x = match anchor {
        LegendAnchor::BottomLeft => 0,
        LegendAnchor::BottomRight => canvas_width as i64 - legend_width as i64
    };
    (x,y)
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// lay out logos with natural `sizes` right aligned in `zone` of a strip that starts at `strip_top` and is `strip_height` high.
/// Logos are scaled to the usable strip height and placed side by side. If that does not fit into the zone they
/// are stacked vertically instead, each getting an equal share of the strip height
pub fn layout_logos (sizes: &[(u32,u32)], zone: Zone, strip_top: u32, strip_height: u32) -> Vec<Placement> {
    let n = sizes.len() as u32;
    if n == 0 {
        return Vec::new()
    }

    let avail_h = strip_height.saturating_sub( PAD/2).max(1);
    let side_by_side: Vec<(u32,u32)> = sizes.iter().map( |s| fit_height( *s, avail_h)).collect();
    let total_w: u32 = side_by_side.iter().map( |s| s.0).sum::<u32>() + PAD/2 * (n-1);

    let mut placements = Vec::with_capacity( sizes.len());

    if total_w <= zone.width {
        let mut x = zone.end() as i64 - total_w as i64;
        let y = strip_top as i64 + (strip_height.saturating_sub( avail_h) / 2) as i64;
        for (w,h) in side_by_side {
            placements.push( Placement { x, y, width: w, height: h });
            x += (w + PAD/2) as i64;
        }

    } else {
        let row_h = (avail_h / n).max(1);
        let mut y = strip_top as i64 + (strip_height.saturating_sub( row_h * n) / 2) as i64;
        for s in sizes {
            let (w,h) = fit_height( *s, row_h);
            let (w,h) = if w > zone.width { fit_width( (w,h), zone.width) } else { (w,h) };
            placements.push( Placement { x: zone.end() as i64 - w as i64, y, width: w, height: h });
            y += row_h as i64;
        }
    }

    placements
}

fn fit_height ((w,h): (u32,u32), height: u32) -> (u32,u32) {
    if h == 0 { return (0,0) }
    let w = (w as f64 * height as f64 / h as f64).round() as u32;
    (w.max(1), height)
}

fn fit_width ((w,h): (u32,u32), width: u32) -> (u32,u32) {
    if w == 0 { return (0,0) }
    let h = (h as f64 * width as f64 / w as f64).round() as u32;
    (width, h.max(1))
}
