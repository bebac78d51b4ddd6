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

///! common utility functions for network operations

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::{HeaderMap,HeaderName,HeaderValue,AUTHORIZATION,CONTENT_TYPE}, Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::define_error;

define_error!{ pub EoxNetError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    NotFoundError(String) : "not found {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    OpFailed(String) : "operation failed: {0}",
    Cancelled(String) : "request cancelled: {0}"
}

pub type Result<T> = std::result::Result<T, EoxNetError>;

/// header map from "name: value" strings. Entries without ':' are ignored
pub fn get_headermap (headers: &[String]) -> Result<HeaderMap> {
    let mut hm = HeaderMap::new();
    for h in headers {
        if let Some(idx) = h.find(':') {
            let k = h[0..idx].trim();
            let v = h[idx+1..].trim();
            hm.append(
                HeaderName::from_bytes( k.as_bytes()).map_err(|e| EoxNetError::OpFailed(e.to_string()))?,
                HeaderValue::from_str(v).map_err(|e| EoxNetError::OpFailed(e.to_string()))?
            );
        }
    }
    Ok(hm)
}

pub fn bearer_headermap (token: &str) -> Result<HeaderMap> {
    let mut hm = HeaderMap::new();
    let v = HeaderValue::from_str( &format!("Bearer {token}")).map_err(|e| EoxNetError::OpFailed(e.to_string()))?;
    hm.insert( AUTHORIZATION, v);
    Ok(hm)
}

/// retrieve the body of URL with a HTTP GET. The request is aborted if `cancel` gets triggered before
/// the response is complete
pub async fn get_bytes (client: &Client, url: &str, opt_headers: &Option<HeaderMap>, cancel: &CancellationToken) -> Result<Bytes> {
    let mut req = client.get(url);
    if let Some(headermap) = opt_headers {
        req = req.headers(headermap.clone())
    }

    tokio::select! {
        res = send_for_bytes( req, url) => res,
        _ = cancel.cancelled() => Err( EoxNetError::Cancelled(url.to_string()))
    }
}

/// POST `data` as JSON and return the (binary) response body
pub async fn post_json_for_bytes<T> (client: &Client, url: &str, data: &T, opt_headers: &Option<HeaderMap>, cancel: &CancellationToken) -> Result<Bytes>
    where T: Serialize
{
    let mut headers = opt_headers.clone().unwrap_or_default();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let req = client.post( url)
        .headers( headers)
        .json( data);

    tokio::select! {
        res = send_for_bytes( req, url) => res,
        _ = cancel.cancelled() => Err( EoxNetError::Cancelled(url.to_string()))
    }
}

async fn send_for_bytes (req: RequestBuilder, url: &str) -> Result<Bytes> {
    let response = req.send().await?;

    match response.status() {
        StatusCode::OK => {
            Ok( response.bytes().await? )
        }
        StatusCode::NOT_FOUND => {
            Err( EoxNetError::NotFoundError(format!("{url}")))
        }
        other => {
            Err( EoxNetError::OpFailed(format!("response status {other:?}")))
        }
    }
}

/// the abstraction for anything that can turn a URL into bytes (tiles, legend images etc.)
/// this is the seam that allows us to run the compositing pipeline without network access
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch (&self, url: &str, cancel: &CancellationToken) -> Result<Bytes>;
}

/// the default `AssetFetcher` that uses HTTP GET for http(s) URLs and reads `file://` URLs from the local filesystem
pub struct HttpFetcher {
    client: Client,
    headers: Option<HeaderMap>,
}

impl HttpFetcher {
    pub fn new (client: Client)->Self {
        HttpFetcher { client, headers: None }
    }

    pub fn with_headers (client: Client, headers: HeaderMap)->Self {
        HttpFetcher { client, headers: Some(headers) }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch (&self, url: &str, cancel: &CancellationToken) -> Result<Bytes> {
        if let Some(path) = url.strip_prefix("file://") {
            let data = tokio::fs::read( path).await?;
            Ok( Bytes::from(data) )
        } else {
            get_bytes( &self.client, url, &self.headers, cancel).await
        }
    }
}
