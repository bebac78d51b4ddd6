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

use std::fs::{self,File};
use std::io::{self,Read,Write};
use std::path::{Path,PathBuf};

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn ensure_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// (over)write file at `dir/filename`, creating `dir` if it does not exist yet
pub fn set_filepath_contents (dir: impl AsRef<Path>, filename: &str, new_contents: &[u8]) -> Result<PathBuf>  {
    let dir = dir.as_ref();
    ensure_dir( dir)?;
    let path = dir.join( filename);
    let mut file = File::create( &path)?;
    file.write_all( new_contents)?;
    file.flush()?;
    Ok(path)
}

/// replace characters that are not portable in filenames (path separators, wildcards, whitespace etc.) with '_'
pub fn sanitize_filename (s: &str) -> String {
    s.trim().chars().map( |c| {
        if c.is_whitespace() || matches!( c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c }
    }).collect()
}
