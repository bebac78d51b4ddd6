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

use std::{collections::HashMap, io::Cursor, sync::Arc};
use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use tokio_util::sync::CancellationToken;

use eox_common::net::{self, AssetFetcher, EoxNetError};
use eox_tiles::{
    EoxTilesError, SurfaceRegistry, TileStitcher, TileUrlTemplate, Viewport, apply_readability_filter, tile_requests,
    OverlayLayer, OverlayRenderer, OverlaySource, sorted_by_z, mapper::TileRequest
};

// run with "cargo test test_xx -- --nocapture"

struct MockFetcher {
    assets: HashMap<String,Bytes>
}

#[async_trait]
impl AssetFetcher for MockFetcher {
    async fn fetch (&self, url: &str, _cancel: &CancellationToken) -> net::Result<Bytes> {
        self.assets.get(url).cloned().ok_or_else( || EoxNetError::NotFoundError(url.to_string()))
    }
}

fn png_bytes (w: u32, h: u32, color: [u8;4]) -> Bytes {
    let img = RgbaImage::from_pixel( w, h, Rgba(color));
    let mut buf = Cursor::new( Vec::new());
    img.write_to( &mut buf, ImageFormat::Png).unwrap();
    Bytes::from( buf.into_inner())
}

const TEMPLATE: &str = "mock://{z}/{x}/{y}.png";

#[test]
fn test_url_template() {
    let t = TileUrlTemplate::new( "https://{s}.tiles.test/{z}/{x}/{y}.png", vec!["a".into(), "b".into(), "c".into()]).unwrap();
    let tile = TileRequest { zoom: 3, column: 1, row: 1, pixel_x: 0.0, pixel_y: 0.0 };
    assert_eq!( t.url_for(&tile), "https://c.tiles.test/3/1/1.png");

    assert!( TileUrlTemplate::new( "https://{s}.tiles.test/{z}/{x}/{y}.png", vec![]).is_err());
    assert!( TileUrlTemplate::new( "https://tiles.test/{z}/{x}.png", vec![]).is_err());
}

#[test]
fn test_readability_filter() {
    let mut img = RgbaImage::new( 2, 1);
    img.put_pixel( 0, 0, Rgba([100, 7, 9, 128]));
    img.put_pixel( 1, 0, Rgba([200, 0, 0, 255]));
    apply_readability_filter( &mut img);

    assert_eq!( img.get_pixel(0,0), &Rgba([170,170,170,128]));
    assert_eq!( img.get_pixel(1,0), &Rgba([255,255,255,255])); // saturated, not wrapped
}

#[tokio::test]
async fn test_stitch_with_failed_tile() {
    let mut assets = HashMap::new();
    for (x,y) in [(0,0), (1,0), (0,1)] { // tile 1/1/1 is missing
        assets.insert( format!("mock://1/{x}/{y}.png"), png_bytes( 256, 256, [200,0,0,255]));
    }
    let stitcher = TileStitcher::new( Arc::new( MockFetcher{assets}));
    let template = TileUrlTemplate::new( TEMPLATE, vec![]).unwrap();

    let vp = Viewport::new( 0.0, 0.0, 1, 512, 512);
    let tiles = tile_requests( &vp, 256, 0);
    let img = stitcher.stitch( &tiles, &template, 256, 512, 512, false, &CancellationToken::new()).await.unwrap();

    assert_eq!( img.dimensions(), (512,512));
    assert_eq!( img.get_pixel( 10, 10), &Rgba([200,0,0,255]));
    assert_eq!( img.get_pixel( 300, 10), &Rgba([200,0,0,255]));
    assert_eq!( img.get_pixel( 300, 300)[3], 0); // blank where the tile failed
}

#[tokio::test]
async fn test_stitch_resamples_tiles() {
    let mut assets = HashMap::new();
    assets.insert( "mock://0/0/0.png".to_string(), png_bytes( 512, 512, [10,20,30,255]));
    let stitcher = TileStitcher::new( Arc::new( MockFetcher{assets}));
    let template = TileUrlTemplate::new( TEMPLATE, vec![]).unwrap();

    let vp = Viewport::new( 0.0, 0.0, 0, 256, 256);
    let tiles = tile_requests( &vp, 256, 0);
    assert_eq!( tiles.len(), 1);

    let img = stitcher.stitch( &tiles, &template, 256, 256, 256, false, &CancellationToken::new()).await.unwrap();
    assert_eq!( img.get_pixel( 128, 128), &Rgba([10,20,30,255]));
    assert_eq!( img.get_pixel( 255, 255), &Rgba([10,20,30,255]));
}

#[tokio::test]
async fn test_stitch_cancelled() {
    let stitcher = TileStitcher::new( Arc::new( MockFetcher{ assets: HashMap::new() }));
    let template = TileUrlTemplate::new( TEMPLATE, vec![]).unwrap();
    let tiles = tile_requests( &Viewport::new( 0.0, 0.0, 1, 512, 512), 256, 0);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let res = stitcher.stitch( &tiles, &template, 256, 512, 512, false, &cancel).await;
    assert!( matches!( res, Err(EoxTilesError::Cancelled(_))));
}

#[test]
fn test_surface_capture() {
    let registry = SurfaceRegistry::new();
    assert!( matches!( registry.capture("borders"), Err(EoxTilesError::NoSuchRenderingSurface(_))));

    registry.attach( "borders", RgbaImage::from_pixel( 4, 4, Rgba([1,2,3,255])));
    assert!( registry.is_attached("borders"));
    let snapshot = registry.capture("borders").unwrap();

    assert!( registry.update( "borders", RgbaImage::from_pixel( 4, 4, Rgba([9,9,9,255]))));
    assert_eq!( snapshot.get_pixel(0,0), &Rgba([1,2,3,255])); // snapshot is not affected
    assert_eq!( registry.capture("borders").unwrap().get_pixel(0,0), &Rgba([9,9,9,255]));

    assert!( registry.detach("borders"));
    assert!( !registry.is_attached("borders"));
    assert!( registry.capture("borders").is_err());
    assert!( !registry.update( "borders", RgbaImage::new(1,1)));
}

#[tokio::test]
async fn test_overlay_renderer() {
    let surfaces = Arc::new( SurfaceRegistry::new());
    surfaces.attach( "aoi", RgbaImage::from_pixel( 8, 8, Rgba([0,255,0,255])));
    let renderer = OverlayRenderer::new( Arc::new( MockFetcher{ assets: HashMap::new() }), surfaces.clone());
    let cancel = CancellationToken::new();

    let vector = OverlayLayer { id: "aoi".into(), z_index: 2, source: OverlaySource::VectorCapture { surface_id: "aoi".into() } };
    let img = renderer.render( &vector, None, 8, 8, &cancel).await.unwrap();
    assert_eq!( img.get_pixel(3,3), &Rgba([0,255,0,255]));

    let labels = OverlayLayer {
        id: "labels".into(),
        z_index: 1,
        source: OverlaySource::Tiled { url: TileUrlTemplate::new( TEMPLATE, vec![]).unwrap(), tile_size: 256, zoom_offset: 0, readability_filter: true }
    };
    let res = renderer.render( &labels, None, 8, 8, &cancel).await;
    assert!( matches!( res, Err(EoxTilesError::MissingViewport(_))));

    let vp = Viewport::new( 0.0, 0.0, 3, 8, 8);
    let img = renderer.render( &labels, Some(&vp), 64, 32, &cancel).await.unwrap();
    assert_eq!( img.dimensions(), (64,32)); // all tiles missing, still an image

    let layers = vec![ vector.clone(), labels.clone() ];
    let ids: Vec<&str> = sorted_by_z( &layers).iter().map( |l| l.id.as_str()).collect();
    assert_eq!( ids, vec!["labels", "aoi"]);
}
