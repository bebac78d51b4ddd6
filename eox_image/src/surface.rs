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

//! the minimal raster interface the compositor draws on

use std::sync::Arc;
use ab_glyph::{FontVec, PxScale};
use image::{imageops, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};

use crate::errors::Result;
use crate::format::{OutputFormat, encode_rgba};

/// average glyph advance (in units of the font size) we assume if there is no font to measure with
pub const FALLBACK_GLYPH_ADVANCE: f32 = 0.6;

pub trait RasterSurface {
    fn width (&self) -> u32;
    fn height (&self) -> u32;

    /// alpha-blend `img` with its upper left corner at (x,y)
    fn draw_image (&mut self, img: &RgbaImage, x: i64, y: i64);

    /// alpha-blended filled rectangle, clipped to the surface
    fn fill_rect (&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>);

    fn draw_line (&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>);

    /// (width,height) of `text` rendered at font size `size` (px)
    fn measure_text (&self, text: &str, size: f32) -> (u32,u32);

    /// draw `text` with its upper left corner at (x,y)
    fn draw_text (&mut self, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>, bold: bool);

    fn pixels (&self) -> &RgbaImage;
    fn pixels_mut (&mut self) -> &mut RgbaImage;

    fn encode (&self, format: OutputFormat) -> Result<Vec<u8>>;
}

/// software surface on top of an `RgbaImage`. Without a font text is measured with a fixed advance but not drawn,
/// which keeps layout identical and output reproducible on hosts that do not have the font
pub struct ImageSurface {
    canvas: RgbaImage,
    font: Option<Arc<FontVec>>,
}

impl ImageSurface {
    pub fn new (canvas: RgbaImage, font: Option<Arc<FontVec>>)->Self {
        ImageSurface { canvas, font }
    }

    pub fn blank (width: u32, height: u32, font: Option<Arc<FontVec>>)->Self {
        ImageSurface { canvas: RgbaImage::new( width, height), font }
    }

    pub fn has_font (&self) -> bool {
        self.font.is_some()
    }

    pub fn into_image (self) -> RgbaImage {
        self.canvas
    }
}

impl RasterSurface for ImageSurface {
    fn width (&self) -> u32 { self.canvas.width() }
    fn height (&self) -> u32 { self.canvas.height() }

    fn draw_image (&mut self, img: &RgbaImage, x: i64, y: i64) {
        imageops::overlay( &mut self.canvas, img, x, y);
    }

    fn fill_rect (&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = (x + width as i64).clamp( 0, self.canvas.width() as i64) as u32;
        let y1 = (y + height as i64).clamp( 0, self.canvas.height() as i64) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                self.canvas.get_pixel_mut( px, py).blend( &color);
            }
        }
    }

    fn draw_line (&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
        draw_line_segment_mut( &mut self.canvas, (x0,y0), (x1,y1), color);
    }

    fn measure_text (&self, text: &str, size: f32) -> (u32,u32) {
        if let Some(font) = &self.font {
            text_size( PxScale::from(size), &**font, text)
        } else {
            let w = (FALLBACK_GLYPH_ADVANCE * size * text.chars().count() as f32).ceil() as u32;
            (w, size.ceil() as u32)
        }
    }

    fn draw_text (&mut self, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>, bold: bool) {
        if let Some(font) = &self.font {
            let scale = PxScale::from(size);
            draw_text_mut( &mut self.canvas, color, x, y, scale, &**font, text);
            if bold { // poor man's bold - we only carry one font face
                draw_text_mut( &mut self.canvas, color, x+1, y, scale, &**font, text);
            }
        }
    }

    fn pixels (&self) -> &RgbaImage { &self.canvas }
    fn pixels_mut (&mut self) -> &mut RgbaImage { &mut self.canvas }

    fn encode (&self, format: OutputFormat) -> Result<Vec<u8>> {
        encode_rgba( &self.canvas, format)
    }
}
