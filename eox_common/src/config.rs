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

//! RON based configuration lookup
//!
//! configs are looked up (in this order) in
//!   - `$EOX_HOME/configs/<crate>/<file>`
//!   - `$HOME/.eox/configs/<crate>/<file>`
//!   - `./configs/<crate>/<file>` (relative to the current working dir)

use std::{env, path::{Path,PathBuf}};
use serde::de::DeserializeOwned;

use crate::{define_error, fs::filepath_contents};

pub const CONFIGS: &'static str = "configs";

define_error!{ pub EoxConfigError =
    IOError(#[from] std::io::Error) : "config IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "config RON error: {0}",
    ConfigNotFound(String) : "config not found: {0}"
}

pub type Result<T> = std::result::Result<T, EoxConfigError>;

/// the first existing `configs/<resource_crate>/<filename>` below `$EOX_HOME`, `$HOME/.eox` or the current dir
pub fn find_config_file (resource_crate: &str, filename: &str) -> Option<PathBuf> {
    let roots = [
        env::var("EOX_HOME").ok().map( PathBuf::from),
        env::var("HOME").ok().map( |home| Path::new(&home).join(".eox")),
        Some( PathBuf::from(".")),
    ];
    roots.into_iter().flatten().find_map( |root| existing_config( &root, resource_crate, filename))
}

fn existing_config (root: &Path, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    let path = root.join(CONFIGS).join(resource_crate).join(filename);
    if path.is_file() { Some(path) } else { None }
}

/// load config from explicit path
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let data = filepath_contents( &path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// parse config from a RON string
pub fn config_from_str<C> (s: &str) -> Result<C> where C: DeserializeOwned {
    Ok( ron::de::from_str(s)? )
}

/// the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load config using the `eox_common::config` lookup mechanism with the calling crate as the resource crate
        pub fn load_config<C> (filename: &str) -> eox_common::config::Result<C> where C: serde::de::DeserializeOwned {
            match eox_common::config::find_config_file( env!("CARGO_PKG_NAME"), filename) {
                Some(path) => eox_common::config::load_config_path( &path),
                None => Err( eox_common::config::EoxConfigError::ConfigNotFound( filename.to_string()))
            }
        }
    }
}
