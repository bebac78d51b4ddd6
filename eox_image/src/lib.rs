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
#![allow(unused)]

//! composition and encoding of export images

pub mod errors;
pub mod format;
pub mod surface;
pub mod typography;
pub mod layout;
pub mod scale_bar;
pub mod legend;
pub mod logos;
pub mod compositor;

pub use errors::{EoxImageError, Result};
pub use format::{OutputFormat, SampleType, encode_rgba, encode_tiff};
pub use surface::{RasterSurface, ImageSurface};
pub use layout::LegendAnchor;
pub use scale_bar::ScaleBar;
pub use legend::LegendSource;
pub use compositor::{Captions, CompositionRequest, ImageCompositor};
