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

//! resolution adaptive font sizes, font loading and text wrapping

use std::path::Path;
use ab_glyph::FontVec;
use eox_common::fs::filepath_contents;

use crate::errors::{Result, op_failed};
use crate::surface::RasterSurface;

/// font size = max( coefficient * canvas_width + base, min)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct FontSizeRule {
    pub coefficient: f32,
    pub base: f32,
    pub min: f32,
}

impl FontSizeRule {
    pub fn size_for (&self, canvas_width: u32) -> f32 {
        (self.coefficient * canvas_width as f32 + self.base).max( self.min)
    }
}

pub const BODY_FONT: FontSizeRule = FontSizeRule { coefficient: 0.011, base: 5.0, min: 12.0 };
pub const COPYRIGHT_FONT: FontSizeRule = FontSizeRule { coefficient: 0.008, base: 2.0, min: 9.0 };

pub fn load_font<P: AsRef<Path>> (path: P) -> Result<FontVec> {
    let path = path.as_ref();
    if !path.is_file() {
        Err( op_failed( format!("font not found: {}", path.display())))
    } else {
        let data = filepath_contents( &path)?;
        Ok( FontVec::try_from_vec( data)? )
    }
}

/// greedy word wrap of `text` so that each line measures at most `max_width` at font `size`.
/// Words that are wider than `max_width` on their own get a line of their own
pub fn wrap_text (surface: &dyn RasterSurface, text: &str, size: f32, max_width: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str( word);
        } else {
            let candidate = format!("{line} {word}");
            if surface.measure_text( &candidate, size).0 <= max_width {
                line = candidate;
            } else {
                lines.push( std::mem::replace( &mut line, word.to_string()));
            }
        }
    }
    if !line.is_empty() {
        lines.push( line);
    }
    lines
}
