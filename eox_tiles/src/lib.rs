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

//! the map side of image exports: tile grids of a viewport, stitched basemap overlays and
//! snapshots of vector rendering surfaces

pub mod errors;
pub mod mercator;
pub mod mapper;
pub mod stitcher;
pub mod capture;
pub mod overlay;

pub use errors::{EoxTilesError, Result};
pub use mercator::Viewport;
pub use mapper::{TileRequest, tile_requests};
pub use stitcher::{TileStitcher, TileUrlTemplate, apply_readability_filter};
pub use capture::SurfaceRegistry;
pub use overlay::{OverlayLayer, OverlaySource, OverlayRenderer, sorted_by_z};
