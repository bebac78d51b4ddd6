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

use std::{io::{Cursor, Read}, thread::sleep, time::Duration};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use zip::ZipArchive;

use eox_common::BoundingBox;
use eox_export::archive::{archive_filename, output_filename, timestamp_label, unique_names, wrap_kmz, zip_entries, KML_ENTRY};
use eox_export::PreviewCache;

// run with "cargo test test_xx -- --nocapture"

#[test]
fn test_filenames() {
    let from = Utc.with_ymd_and_hms( 2024, 5, 1, 10, 30, 0).unwrap();
    let to = Utc.with_ymd_and_hms( 2024, 5, 2, 8, 5, 0).unwrap();

    assert_eq!( timestamp_label( &from), "2024-05-01-10_30");
    assert_eq!( output_filename( &from, &to, "Sentinel-2 L2A", "True color", "jpg"),
                "2024-05-01-10_30_2024-05-02-08_05_Sentinel-2_L2A_True_color.jpg");
    assert_eq!( archive_filename( &from, &to, "Sentinel-2 L2A"), "2024-05-01-10_30_2024-05-02-08_05_Sentinel-2_L2A.zip");
    assert_eq!( output_filename( &from, &to, "a/b", "c:d", "tiff"), "2024-05-01-10_30_2024-05-02-08_05_a_b_c_d.tiff");
}

#[test]
fn test_unique_names() {
    let names = unique_names( ["a.tiff", "b.tiff", "a.tiff", "a.tiff", "noext", "noext"]);
    assert_eq!( names, vec!["a.tiff", "b.tiff", "a_1.tiff", "a_2.tiff", "noext", "noext_1"]);
}

#[test]
fn test_zip_entries() {
    let data = zip_entries( &[
        ("one.txt".to_string(), b"first".to_vec()),
        ("one.txt".to_string(), b"second".to_vec()),
    ]).unwrap();

    let mut archive = ZipArchive::new( Cursor::new( data)).unwrap();
    assert_eq!( archive.len(), 2);

    let mut s = String::new();
    archive.by_name("one_1.txt").unwrap().read_to_string( &mut s).unwrap();
    assert_eq!( s, "second");
}

#[test]
fn test_kmz() {
    let bbox = BoundingBox::new( 13.5, 45.9, 14.5, 46.4);
    let data = wrap_kmz( "view & more", b"png-bytes", "png", &bbox).unwrap();

    let mut archive = ZipArchive::new( Cursor::new( data)).unwrap();
    let mut kml = String::new();
    archive.by_name( KML_ENTRY).unwrap().read_to_string( &mut kml).unwrap();
    println!("{kml}");

    assert!( kml.contains( "<GroundOverlay>"));
    assert!( kml.contains( "<name>view &amp; more</name>"));
    assert!( kml.contains( "<href>view_&amp;_more.png</href>"));
    assert!( kml.contains( "<north>46.4</north>"));
    assert!( kml.contains( "<west>13.5</west>"));
    assert!( archive.by_name( "view_&_more.png").is_ok());
}

#[test]
fn test_preview_cache_capacity() {
    let cache = PreviewCache::new( 2, Duration::from_secs( 60));
    cache.insert( "S2L2A", "a", Bytes::from_static( b"a"));
    cache.insert( "S2L2A", "b", Bytes::from_static( b"b"));
    cache.insert( "S2L2A", "c", Bytes::from_static( b"c"));

    assert_eq!( cache.len(), 2);
    assert!( cache.get( "S2L2A", "a").is_none()); // oldest evicted
    assert_eq!( cache.get( "S2L2A", "c"), Some( Bytes::from_static( b"c")));

    // replacing an existing key does not evict
    cache.insert( "S2L2A", "b", Bytes::from_static( b"b2"));
    assert_eq!( cache.len(), 2);
    assert_eq!( cache.get( "S2L2A", "b"), Some( Bytes::from_static( b"b2")));

    // keys are (collection,product) pairs
    assert!( cache.get( "S1GRD", "c").is_none());
}

#[test]
fn test_preview_cache_ttl() {
    let cache = PreviewCache::new( 4, Duration::from_millis( 50));
    cache.insert( "S2L2A", "a", Bytes::from_static( b"a"));
    assert!( cache.get( "S2L2A", "a").is_some());

    sleep( Duration::from_millis( 120));
    assert!( cache.get( "S2L2A", "a").is_none());
    assert!( cache.is_empty());
}
