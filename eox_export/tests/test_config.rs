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

use std::time::Duration;
use eox_common::config::{config_from_str, load_config_path};
use eox_image::{LegendAnchor, LegendSource, OutputFormat, SampleType};
use eox_tiles::OverlaySource;
use eox_export::{ExportConfig, ExportJob, TargetSource};

// run with "cargo test test_xx -- --nocapture"

#[test]
fn test_partial_config() {
    let config: ExportConfig = config_from_str( r#"ExportConfig( max_dimension: 1000, legend_anchor: BottomRight )"#).unwrap();
    assert_eq!( config.max_dimension, 1000);
    assert_eq!( config.legend_anchor, LegendAnchor::BottomRight);
    assert_eq!( config.timeout(), Duration::from_secs( 120));
    assert_eq!( config.preview_cache_capacity, 64);

    let config: ExportConfig = config_from_str( "(max_dimension: 2500)").unwrap();
    assert_eq!( config, ExportConfig::default());
}

#[test]
fn test_token_from_env() {
    let config = ExportConfig { token_env: Some("EOX_EXPORT_TEST_NO_SUCH_VAR".into()), ..ExportConfig::default() };
    assert_eq!( config.token(), None);

    let config = ExportConfig { token_env: None, ..ExportConfig::default() };
    assert_eq!( config.token(), None);
}

#[test]
fn test_sample_files() {
    let config: ExportConfig = load_config_path( "../configs/eox_export/eox_export.ron").unwrap();
    assert_eq!( config.max_dimension, 2500);

    let job: ExportJob = load_config_path( "../configs/eox_export/ljubljana_ndvi_job.ron").unwrap();
    println!("{job:#?}");

    assert_eq!( job.viewport.pixel_width, 1600);
    assert_eq!( job.targets.len(), 3);
    assert_eq!( job.targets[1].format, OutputFormat::KmzJpeg);
    assert!( matches!( &job.targets[2].source,
        TargetSource::Band { band, native_sample_type: Some(SampleType::UInt16), data_mask: true } if band == "B08"));

    match &job.overlays[0].source {
        OverlaySource::Tiled { url, tile_size, readability_filter, .. } => {
            assert_eq!( *tile_size, 256);
            assert!( *readability_filter);
            assert_eq!( url.subdomains.len(), 3);
        }
        other => panic!("unexpected overlay source {other:?}")
    }
    assert!( matches!( job.legend, Some(LegendSource::Continuous{..})));
}
