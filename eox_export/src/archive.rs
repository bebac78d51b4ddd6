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

//! output file names, ZIP archives and KMZ packaging

use std::{collections::HashMap, io::{Cursor, Write}};
use chrono::{DateTime, Utc};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use eox_common::{BoundingBox, fs::sanitize_filename};

use crate::errors::Result;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H_%M";
pub const KML_ENTRY: &str = "doc.kml";

pub fn timestamp_label (dt: &DateTime<Utc>) -> String {
    dt.format( TIMESTAMP_FORMAT).to_string()
}

/// "<from>_<to>_<dataset>_<layer>.<ext>" with path hostile characters replaced
pub fn output_filename (from: &DateTime<Utc>, to: &DateTime<Utc>, dataset: &str, layer: &str, ext: &str) -> String {
    let stem = format!("{}_{}_{}_{}", timestamp_label(from), timestamp_label(to), dataset, layer);
    format!("{}.{}", sanitize_filename( &stem), ext)
}

/// "<from>_<to>_<dataset>.zip"
pub fn archive_filename (from: &DateTime<Utc>, to: &DateTime<Utc>, dataset: &str) -> String {
    let stem = format!("{}_{}_{}", timestamp_label(from), timestamp_label(to), dataset);
    format!("{}.zip", sanitize_filename( &stem))
}

/// make names unique by appending "_<n>" to the stem of repeated names
pub fn unique_names<'a> (names: impl IntoIterator<Item=&'a str>) -> Vec<String> {
    let mut seen: HashMap<String,usize> = HashMap::new();
    let mut unique = Vec::new();

    for name in names {
        let n = seen.entry( name.to_string()).or_insert(0);
        *n += 1;
        if *n == 1 {
            unique.push( name.to_string());
        } else {
            let (stem,ext) = match name.rfind('.') {
                Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
                _ => (name, "")
            };
            unique.push( format!("{}_{}{}", stem, *n - 1, ext));
        }
    }
    unique
}

/// ZIP archive with one deflated entry per (name,data) pair. Duplicate names get a numeric suffix
pub fn zip_entries (entries: &[(String,Vec<u8>)]) -> Result<Vec<u8>> {
    let names = unique_names( entries.iter().map( |(name,_)| name.as_str()));
    let options = SimpleFileOptions::default().compression_method( CompressionMethod::Deflated);

    let mut zip = ZipWriter::new( Cursor::new( Vec::new()));
    for (name, (_,data)) in names.into_iter().zip( entries.iter()) {
        zip.start_file( name, options)?;
        zip.write_all( data)?;
    }
    Ok( zip.finish()?.into_inner() )
}

/// KML document with a single GroundOverlay that drapes `image_href` over `bbox`
pub fn kml_ground_overlay (name: &str, image_href: &str, bbox: &BoundingBox<f64>) -> String {
    format!(
r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>{name}</name>
    <GroundOverlay>
      <name>{name}</name>
      <Icon>
        <href>{image_href}</href>
      </Icon>
      <LatLonBox>
        <north>{}</north>
        <south>{}</south>
        <east>{}</east>
        <west>{}</west>
      </LatLonBox>
    </GroundOverlay>
  </Document>
</kml>
"#, bbox.north, bbox.south, bbox.east, bbox.west, name=xml_escape(name), image_href=xml_escape(image_href))
}

/// KMZ container: doc.kml plus the image it refers to
pub fn wrap_kmz (name: &str, image: &[u8], image_ext: &str, bbox: &BoundingBox<f64>) -> Result<Vec<u8>> {
    let image_name = format!("{}.{}", sanitize_filename( name), image_ext);
    let kml = kml_ground_overlay( name, &image_name, bbox);

    zip_entries( &[
        (KML_ENTRY.to_string(), kml.into_bytes()),
        (image_name, image.to_vec()),
    ])
}

fn xml_escape (s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
