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

//! export of satellite imagery views: band scaling, provider requests, batching and packaging

use eox_common::define_load_config;

pub mod errors;
pub mod scaling;
pub mod provider;
pub mod preview_cache;
pub mod archive;
pub mod batcher;
pub mod config;

pub use errors::{EoxExportError, ExportFailure, Result};
pub use scaling::{DatasetKind, ScalingSpec, resolve_scale_factor, single_band_evalscript};
pub use provider::{Crs, ImageRequest, ImageryProvider, ProcessApiProvider};
pub use preview_cache::PreviewCache;
pub use batcher::{Deliverable, ExportBatcher, ExportJob, ExportOutput, ExportResult, ExportTarget, TargetSource};
pub use config::ExportConfig;

define_load_config!{}
