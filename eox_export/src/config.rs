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

use std::{env, path::PathBuf, time::Duration};
use serde::{Serialize,Deserialize};
use eox_image::LegendAnchor;

pub const CONFIG_FILE: &str = "eox_export.ron";

/// exporter configuration. Every field has a default so that partial (or missing) config files work
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// process API endpoint of the imagery provider
    pub provider_url: String,

    /// name of the environment variable that holds the bearer token (if any)
    pub token_env: Option<String>,

    /// largest width/height the provider delivers in one request
    pub max_dimension: u32,

    pub timeout_secs: u64,

    /// TrueType/OpenType font for captions. Without it text is laid out but not drawn
    pub font_path: Option<PathBuf>,

    /// additional "name: value" headers for asset requests (tiles, logos, legend images)
    pub asset_headers: Vec<String>,

    /// attribution marks (http(s) or file URLs)
    pub logo_urls: Vec<String>,

    pub legend_anchor: LegendAnchor,

    pub preview_cache_capacity: usize,
    pub preview_cache_ttl_secs: u64,

    pub default_title: Option<String>,
    pub default_copyright: Option<String>,
}

impl Default for ExportConfig {
    fn default()->Self {
        ExportConfig {
            provider_url: "https://services.sentinel-hub.com/api/v1/process".to_string(),
            token_env: Some("EOX_TOKEN".to_string()),
            max_dimension: 2500,
            timeout_secs: 120,
            font_path: None,
            asset_headers: Vec::new(),
            logo_urls: Vec::new(),
            legend_anchor: LegendAnchor::BottomLeft,
            preview_cache_capacity: 64,
            preview_cache_ttl_secs: 600,
            default_title: None,
            default_copyright: Some("Contains modified Copernicus Sentinel data".to_string()),
        }
    }
}

impl ExportConfig {
    /// the bearer token from the configured environment variable
    pub fn token (&self) -> Option<String> {
        self.token_env.as_ref().and_then( |var| env::var(var).ok()).filter( |t| !t.is_empty())
    }

    pub fn timeout (&self) -> Duration {
        Duration::from_secs( self.timeout_secs)
    }

    pub fn preview_cache_ttl (&self) -> Duration {
        Duration::from_secs( self.preview_cache_ttl_secs)
    }
}
