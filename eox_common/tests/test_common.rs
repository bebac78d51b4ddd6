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

use std::{env, fs};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use eox_common::{BoundingBox, define_error};
use eox_common::config::{config_from_str, find_config_file, load_config_path, EoxConfigError};
use eox_common::fs::{sanitize_filename, set_filepath_contents};
use eox_common::net::{get_headermap, bearer_headermap, AssetFetcher, HttpFetcher, EoxNetError};

// run with "cargo test test_xx -- --nocapture"

#[derive(Debug,Deserialize,PartialEq)]
struct TestConfig {
    name: String,
    max_dimension: u32,
    #[serde(default)]
    logo_urls: Vec<String>,
}

#[test]
fn test_config_from_str() {
    let cfg: TestConfig = config_from_str( r#"TestConfig( name: "eox", max_dimension: 2500 )"#).unwrap();
    assert_eq!( cfg, TestConfig { name: "eox".into(), max_dimension: 2500, logo_urls: vec![] });

    let res: Result<TestConfig,_> = config_from_str( r#"TestConfig( name: "eox" )"#);
    assert!( matches!( res, Err(EoxConfigError::RonError(_))));
}

#[test]
fn test_load_config_path() {
    let dir = env::temp_dir().join( "eox_common_test_config");
    let path = set_filepath_contents( &dir, "test.ron", br#"(name: "file", max_dimension: 42, logo_urls: ["a.png"])"#).unwrap();

    let cfg: TestConfig = load_config_path( &path).unwrap();
    assert_eq!( cfg.max_dimension, 42);
    assert_eq!( cfg.logo_urls, vec!["a.png".to_string()]);

    let res: Result<TestConfig,_> = load_config_path( dir.join( "does_not_exist.ron"));
    assert!( matches!( res, Err(EoxConfigError::IOError(_))));

    fs::remove_dir_all( &dir).ok();
}

#[test]
fn test_find_config_file() {
    let root = env::temp_dir().join( "eox_common_test_home");
    set_filepath_contents( root.join("configs").join("eox_test"), "found.ron", b"(name: \"home\", max_dimension: 1)").unwrap();
    unsafe { env::set_var( "EOX_HOME", &root); }

    let path = find_config_file( "eox_test", "found.ron").unwrap();
    println!("found {path:?}");
    assert!( path.starts_with( &root));
    let cfg: TestConfig = load_config_path( &path).unwrap();
    assert_eq!( cfg.name, "home");

    assert!( find_config_file( "eox_test", "missing.ron").is_none());
    fs::remove_dir_all( &root).ok();
}

#[test]
fn test_sanitize_filename() {
    assert_eq!( sanitize_filename( "  True color "), "True_color");
    assert_eq!( sanitize_filename( "a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
    assert_eq!( sanitize_filename( "Sentinel-2 L2A (NDVI)"), "Sentinel-2_L2A_(NDVI)");
}

#[test]
fn test_headermaps() {
    let hm = get_headermap( &[ "X-Api-Key: abc123".to_string(), "Accept:image/png".to_string(), "garbage".to_string() ]).unwrap();
    assert_eq!( hm.len(), 2);
    assert_eq!( hm.get("x-api-key").unwrap(), "abc123");
    assert_eq!( hm.get("accept").unwrap(), "image/png");

    let hm = bearer_headermap( "secret").unwrap();
    assert_eq!( hm.get("authorization").unwrap(), "Bearer secret");
}

#[test]
fn test_bbox() {
    let bbox = BoundingBox::<f64>::new( 10.0, 40.0, 14.0, 42.0);
    assert_eq!( bbox.width(), 4.0);
    assert_eq!( bbox.height(), 2.0);
}

define_error!{ TestError =
    Failed(String) : "failed: {0}",
    Io(#[from] std::io::Error) : "io: {0}"
}

#[test]
fn test_define_error() {
    let e = TestError::Failed( "nope".into());
    assert_eq!( e.to_string(), "failed: nope");
}

#[tokio::test]
async fn test_file_fetcher() {
    let dir = env::temp_dir().join( "eox_common_test_fetch");
    let path = set_filepath_contents( &dir, "asset.txt", b"hello").unwrap();

    let fetcher = HttpFetcher::new( reqwest::Client::new());
    let cancel = CancellationToken::new();

    let data = fetcher.fetch( &format!("file://{}", path.display()), &cancel).await.unwrap();
    assert_eq!( &data[..], b"hello");

    let res = fetcher.fetch( &format!("file://{}", dir.join("missing.txt").display()), &cancel).await;
    assert!( res.is_err());

    fs::remove_dir_all( &dir).ok();
}
