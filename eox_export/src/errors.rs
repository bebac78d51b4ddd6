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

use eox_common::{define_error, net::EoxNetError, config::EoxConfigError};
use eox_image::EoxImageError;
use eox_tiles::EoxTilesError;

pub type Result<T> = std::result::Result<T, EoxExportError>;

/// why a single export target failed
#[derive(Debug,Clone,PartialEq)]
pub struct ExportFailure {
    pub target: String,
    pub message: String,
}

impl std::fmt::Display for ExportFailure {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!( f, "{}: {}", self.target, self.message)
    }
}

define_error!{ pub EoxExportError =
    UnsupportedOutputDimensions(String) : "unsupported output dimensions: {0}",
    NoOutputs(Vec<ExportFailure>) : "no export target succeeded: {0:?}",
    ImageError(#[from] EoxImageError) : "image error: {0}",
    RasterError(#[from] image::ImageError) : "raster error: {0}",
    TilesError(#[from] EoxTilesError) : "tiles error: {0}",
    NetError(#[from] EoxNetError) : "net error: {0}",
    ConfigError(#[from] EoxConfigError) : "config error: {0}",
    ZipError(#[from] zip::result::ZipError) : "zip error: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    JsonError(#[from] serde_json::Error) : "JSON error: {0}",
    InvalidRequest(String) : "invalid request: {0}",
    Cancelled(String) : "cancelled: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub fn op_failed (msg: impl ToString)->EoxExportError {
    EoxExportError::OpFailed(msg.to_string())
}

pub fn cancelled (what: impl ToString)->EoxExportError {
    EoxExportError::Cancelled(what.to_string())
}
