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

use eox_common::{define_error, net::EoxNetError};
use eox_tiles::EoxTilesError;

pub type Result<T> = std::result::Result<T, EoxImageError>;

define_error!{ pub EoxImageError =
    BaseImageDecodeError(String) : "failed to decode base image: {0}",
    ImageError(#[from] image::ImageError) : "Image error {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    TiffError(#[from] tiff::TiffError) : "Tiff error: {0}",
    InvalidFont( #[from] ab_glyph::InvalidFont) : "Invalid font error: {0}",
    TilesError(#[from] EoxTilesError) : "overlay error: {0}",
    NetError(#[from] EoxNetError) : "net error: {0}",
    InvalidDimensions(String) : "invalid dimension error: {0}",
    UnsupportedFormat(String) : "unsupported output format: {0}",
    Cancelled(String) : "cancelled: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub fn op_failed (msg: impl ToString)->EoxImageError {
    EoxImageError::OpFailed(msg.to_string())
}

pub fn cancelled (what: impl ToString)->EoxImageError {
    EoxImageError::Cancelled(what.to_string())
}
