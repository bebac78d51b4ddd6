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

//! imagery providers and the requests we send them

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, header::HeaderMap};
use serde::{Serialize,Deserialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use eox_common::{BoundingBox, net::{bearer_headermap, post_json_for_bytes}};
use eox_image::OutputFormat;

use crate::errors::{Result, EoxExportError};

pub const CRS_WGS84: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";
pub const CRS_WEB_MERCATOR: &str = "http://www.opengis.net/def/crs/EPSG/0/3857";

/// coordinate reference system of a request bbox (and hence of the raster rows and columns)
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Crs {
    Wgs84,       // degrees, rows linear in latitude
    WebMercator, // meters, rows line up with the tile grid
}

impl Crs {
    pub fn uri (self) -> &'static str {
        match self {
            Crs::Wgs84 => CRS_WGS84,
            Crs::WebMercator => CRS_WEB_MERCATOR,
        }
    }
}

/// one raster we want from the provider
#[derive(Debug,Clone,PartialEq)]
pub struct ImageRequest {
    pub bbox: BoundingBox<f64>, // in `crs` units
    pub crs: Crs,
    pub collection: String,
    pub time_from: DateTime<Utc>,
    pub time_to: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub evalscript: String,
}

/// a sub-request of a chunked request and where its raster goes in the full image
#[derive(Debug,Clone,PartialEq)]
pub struct ImageChunk {
    pub x: u32,
    pub y: u32,
    pub request: ImageRequest,
}

impl ImageRequest {
    pub fn exceeds (&self, max_dimension: u32) -> bool {
        self.width > max_dimension || self.height > max_dimension
    }

    /// split into a grid of sub-requests that are no larger than `max_dimension` in either direction. Widths
    /// (heights) of columns (rows) differ by at most one pixel, bounding boxes are split proportionally
    pub fn split (&self, max_dimension: u32) -> Vec<ImageChunk> {
        let max_dimension = max_dimension.max(1);
        let nx = self.width.div_ceil( max_dimension).max(1);
        let ny = self.height.div_ceil( max_dimension).max(1);

        let xs = split_extent( self.width, nx);
        let ys = split_extent( self.height, ny);
        let dx = self.bbox.width() / self.width as f64;
        let dy = self.bbox.height() / self.height as f64;

        let mut chunks = Vec::with_capacity( (nx*ny) as usize);
        for (y,h) in &ys {
            for (x,w) in &xs {
                let west = self.bbox.west + *x as f64 * dx;
                let north = self.bbox.north - *y as f64 * dy;
                let bbox = BoundingBox::new( west, north - *h as f64 * dy, west + *w as f64 * dx, north);

                let request = ImageRequest { bbox, width: *w, height: *h, ..self.clone() };
                chunks.push( ImageChunk { x: *x, y: *y, request });
            }
        }
        chunks
    }

    /// the process API request body
    pub fn to_process_json (&self) -> Value {
        json!({
            "input": {
                "bounds": {
                    "bbox": [ self.bbox.west, self.bbox.south, self.bbox.east, self.bbox.north ],
                    "properties": { "crs": self.crs.uri() }
                },
                "data": [{
                    "type": self.collection,
                    "dataFilter": {
                        "timeRange": {
                            "from": self.time_from.to_rfc3339_opts( SecondsFormat::Secs, true),
                            "to": self.time_to.to_rfc3339_opts( SecondsFormat::Secs, true)
                        }
                    }
                }]
            },
            "output": {
                "width": self.width,
                "height": self.height,
                "responses": [{
                    "identifier": "default",
                    "format": { "type": self.format.provider_mime_type() }
                }]
            },
            "evalscript": self.evalscript
        })
    }
}

/// (offset,len) pairs of `n` consecutive pieces of `extent`
fn split_extent (extent: u32, n: u32) -> Vec<(u32,u32)> {
    let base = extent / n;
    let rem = extent % n;
    let mut pieces = Vec::with_capacity( n as usize);
    let mut off = 0;
    for i in 0..n {
        let len = base + if i < rem { 1 } else { 0 };
        pieces.push( (off,len));
        off += len;
    }
    pieces
}

#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// largest width or height the provider delivers in one request
    fn max_dimension (&self) -> u32;

    async fn fetch_image (&self, request: &ImageRequest, cancel: &CancellationToken) -> Result<Bytes>;
}

/// a provider with a Sentinel Hub style process API
pub struct ProcessApiProvider {
    client: Client,
    url: String,
    headers: Option<HeaderMap>,
    max_dimension: u32,
}

impl ProcessApiProvider {
    pub fn new (client: Client, url: impl ToString, token: Option<&str>, max_dimension: u32) -> Result<Self> {
        let headers = match token {
            Some(token) => Some( bearer_headermap( token)?),
            None => None
        };
        Ok( ProcessApiProvider { client, url: url.to_string(), headers, max_dimension } )
    }
}

#[async_trait]
impl ImageryProvider for ProcessApiProvider {
    fn max_dimension (&self) -> u32 {
        self.max_dimension
    }

    async fn fetch_image (&self, request: &ImageRequest, cancel: &CancellationToken) -> Result<Bytes> {
        debug!("requesting {}x{} {} image of {}", request.width, request.height, request.format.provider_mime_type(), request.collection);
        let body = request.to_process_json();
        Ok( post_json_for_bytes( &self.client, &self.url, &body, &self.headers, cancel).await? )
    }
}
