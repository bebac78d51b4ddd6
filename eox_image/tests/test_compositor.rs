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
use eox_tiles::{OverlayLayer, OverlaySource, SurfaceRegistry, TileUrlTemplate, Viewport};
use eox_image::{
    Captions, CompositionRequest, EoxImageError, ImageCompositor, LegendSource, OutputFormat, ScaleBar,
    legend::LegendItem
};

// run with "cargo test test_xx -- --nocapture"

const GRAY: [u8;4] = [100,100,100,255];

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

fn compositor (assets: Vec<(&str,Bytes)>) -> ImageCompositor {
    let assets = assets.into_iter().map( |(k,v)| (k.to_string(), v)).collect();
    ImageCompositor::new( Arc::new( MockFetcher{assets}), Arc::new( SurfaceRegistry::new()))
}

fn decode (bytes: &[u8]) -> RgbaImage {
    image::load_from_memory( bytes).unwrap().to_rgba8()
}

fn base_request (w: u32, h: u32) -> CompositionRequest {
    CompositionRequest::new( png_bytes( w, h, GRAY), w, h, OutputFormat::Png)
}

#[tokio::test]
async fn test_base_decode_error() {
    let comp = compositor( vec![]);
    let req = CompositionRequest::new( Bytes::from_static( b"not an image"), 10, 10, OutputFormat::Png);
    let res = comp.compose( &req, &CancellationToken::new()).await;
    assert!( matches!( res, Err(EoxImageError::BaseImageDecodeError(_))));
}

#[tokio::test]
async fn test_plain_reencode() {
    let comp = compositor( vec![]);
    let bytes = comp.compose( &base_request( 40, 30), &CancellationToken::new()).await.unwrap();
    let img = decode( &bytes);
    assert_eq!( img.dimensions(), (40,30));
    assert!( img.pixels().all( |p| p.0 == GRAY));

    let mut req = base_request( 40, 30);
    req.format = OutputFormat::Jpeg;
    let bytes = comp.compose( &req, &CancellationToken::new()).await.unwrap();
    assert_eq!( &bytes[0..2], &[0xff, 0xd8]);
}

#[tokio::test]
async fn test_overlay_z_order() {
    let comp = compositor( vec![]);
    comp.surfaces().attach( "red", RgbaImage::from_pixel( 200, 100, Rgba([255,0,0,255])));
    comp.surfaces().attach( "blue", RgbaImage::from_pixel( 200, 100, Rgba([0,0,255,255])));

    let mut req = base_request( 200, 100);
    req.overlays = vec![
        OverlayLayer { id: "red".into(), z_index: 2, source: OverlaySource::VectorCapture { surface_id: "red".into() } },
        OverlayLayer { id: "blue".into(), z_index: 1, source: OverlaySource::VectorCapture { surface_id: "blue".into() } },
        OverlayLayer { id: "gone".into(), z_index: 3, source: OverlaySource::VectorCapture { surface_id: "gone".into() } },
    ];

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());
    assert_eq!( img.get_pixel( 100, 50), &Rgba([255,0,0,255])); // highest z_index on top, missing surface skipped
}

#[tokio::test]
async fn test_tiled_overlay() {
    let comp = compositor( vec![ ("mock://0/0/0.png", png_bytes( 256, 256, [0,200,0,255])) ]);

    let mut req = base_request( 256, 256);
    req.viewport = Some( Viewport::new( 0.0, 0.0, 0, 256, 256));
    req.overlays = vec![
        OverlayLayer {
            id: "labels".into(),
            z_index: 0,
            source: OverlaySource::Tiled { url: TileUrlTemplate::new( "mock://{z}/{x}/{y}.png", vec![]).unwrap(), tile_size: 256, zoom_offset: 0, readability_filter: false }
        }
    ];

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());
    assert_eq!( img.get_pixel( 128, 128), &Rgba([0,200,0,255]));
}

#[tokio::test]
async fn test_caption_bands() {
    let comp = compositor( vec![]);
    let mut req = base_request( 200, 100);
    req.captions = Some( Captions { title: Some("Sentinel-2 L2A".into()), user_description: Some("true color".into()), copyright: Some("Copernicus data".into()) });
    req.scale_bar = Some( ScaleBar::new( "30 km", 40));

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());
    assert_ne!( img.get_pixel( 100, 1).0, GRAY);   // top band
    assert_ne!( img.get_pixel( 190, 95).0, GRAY);  // bottom strip
    assert_eq!( img.get_pixel( 100, 50).0, GRAY);  // untouched center
}

#[tokio::test]
async fn test_legend() {
    let comp = compositor( vec![]);
    let mut req = base_request( 200, 100);
    req.legend = Some( LegendSource::Discrete( vec![ LegendItem { color: "#ff0000".into(), label: "Fire".into() } ]));

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());
    let p = img.get_pixel( 7, 91);
    println!("marker pixel: {p:?}");
    assert!( p[0] > 150 && p[1] < 100);
    assert_eq!( img.get_pixel( 150, 50).0, GRAY);
}

#[tokio::test]
async fn test_legend_above_strip() {
    let comp = compositor( vec![]);
    let mut req = base_request( 200, 100);
    req.legend = Some( LegendSource::Discrete( vec![ LegendItem { color: "#ff0000".into(), label: "Fire".into() } ]));
    req.captions = Some( Captions { title: None, user_description: None, copyright: Some("Copernicus data".into()) });

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());

    // copyright font is 9px at this width, the strip is 9 + PAD/2 = 14px high. The scaled legend
    // (35x18) sits right on top of it
    let strip_top = 100 - 14;
    assert_eq!( img.get_pixel( 7, strip_top - 19).0, GRAY);
    assert_ne!( img.get_pixel( 7, strip_top - 18).0, GRAY); // top row of the legend
    assert_ne!( img.get_pixel( 7, strip_top - 1).0, GRAY);  // bottom row of the legend

    let p = img.get_pixel( 7, 91 - 14); // same marker pixel as without strip, moved up by the strip height
    println!("marker pixel: {p:?}");
    assert!( p[0] > 150 && p[1] < 100);
    assert_eq!( img.get_pixel( 150, 50).0, GRAY);
}

#[tokio::test]
async fn test_missing_legend_skipped() {
    let comp = compositor( vec![]);
    let plain = comp.compose( &base_request( 80, 60), &CancellationToken::new()).await.unwrap();

    let mut req = base_request( 80, 60);
    req.legend = Some( LegendSource::ImageUrl( "mock://no-such-legend.png".into()));
    let with_legend = comp.compose( &req, &CancellationToken::new()).await.unwrap();

    assert_eq!( plain, with_legend);
}

#[tokio::test]
async fn test_logos() {
    let comp = compositor( vec![ ("mock://logo.png", png_bytes( 20, 10, [0,0,255,255])) ])
        .with_logos( vec![ "mock://logo.png".into(), "mock://missing-logo.png".into() ]);

    let mut req = base_request( 200, 100);
    req.attribution = true;

    let img = decode( &comp.compose( &req, &CancellationToken::new()).await.unwrap());
    assert_eq!( img.get_pixel( 190, 92), &Rgba([0,0,255,255]));
    assert_eq!( img.get_pixel( 100, 50).0, GRAY);
}

#[tokio::test]
async fn test_idempotence() {
    let comp = compositor( vec![ ("mock://logo.png", png_bytes( 20, 10, [0,0,255,255])) ])
        .with_logos( vec![ "mock://logo.png".into() ]);
    comp.surfaces().attach( "aoi", RgbaImage::from_pixel( 300, 200, Rgba([0,255,0,80])));

    let mut req = base_request( 300, 200);
    req.overlays = vec![ OverlayLayer { id: "aoi".into(), z_index: 0, source: OverlaySource::VectorCapture { surface_id: "aoi".into() } } ];
    req.captions = Some( Captions { title: Some("title".into()), user_description: None, copyright: Some("(c) somebody".into()) });
    req.scale_bar = Some( ScaleBar::new( "5 km", 60));
    req.legend = Some( LegendSource::Discrete( vec![
        LegendItem { color: "#ff0000".into(), label: "high".into() },
        LegendItem { color: "#00ff00".into(), label: "low".into() },
    ]));
    req.attribution = true;

    let cancel = CancellationToken::new();
    let a = comp.compose( &req, &cancel).await.unwrap();
    let b = comp.compose( &req, &cancel).await.unwrap();
    assert_eq!( a, b);
}

#[tokio::test]
async fn test_cancelled() {
    let comp = compositor( vec![]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let res = comp.compose( &base_request( 10, 10), &cancel).await;
    assert!( matches!( res, Err(EoxImageError::Cancelled(_))));
}
