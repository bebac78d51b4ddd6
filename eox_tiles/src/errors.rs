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

pub type Result<T> = std::result::Result<T, EoxTilesError>;

define_error!{ pub EoxTilesError =
    NoSuchRenderingSurface(String) : "no such rendering surface: {0}",
    InvalidUrlTemplate(String) : "invalid tile URL template: {0}",
    MissingViewport(String) : "no viewport for tiled overlay {0}",
    ImageError(#[from] image::ImageError) : "image error: {0}",
    NetError(#[from] EoxNetError) : "net error: {0}",
    Cancelled(String) : "cancelled: {0}"
}

pub fn no_such_surface<S: ToString> (id: S)->EoxTilesError {
    EoxTilesError::NoSuchRenderingSurface(id.to_string())
}

pub fn cancelled<S: ToString> (what: S)->EoxTilesError {
    EoxTilesError::Cancelled(what.to_string())
}
