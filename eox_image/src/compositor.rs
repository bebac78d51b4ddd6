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

//! the export image compositor: base image, overlays, captions, scale bar, logos and legend, in this order

use std::sync::Arc;
use ab_glyph::FontVec;
use bytes::Bytes;
use futures::future::join_all;
use image::{imageops::{self, FilterType}, Rgba, RgbaImage};
use serde::{Serialize,Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug,warn};

use eox_common::net::AssetFetcher;
use eox_tiles::{EoxTilesError, OverlayLayer, OverlayRenderer, SurfaceRegistry, Viewport, sorted_by_z};

use crate::errors::{Result, EoxImageError, cancelled};
use crate::format::OutputFormat;
use crate::layout::{LegendAnchor, StripZones, band_height, legend_position, legend_scale_ratio, partition_bottom_strip, PAD};
use crate::legend::{LegendSource, render_legend};
use crate::logos::{self, decode_logos};
use crate::scale_bar::ScaleBar;
use crate::surface::{ImageSurface, RasterSurface};
use crate::typography::{BODY_FONT, COPYRIGHT_FONT, wrap_text};

const BAND_BACKGROUND: Rgba<u8> = Rgba([255,255,255,180]);
const TEXT_COLOR: Rgba<u8> = Rgba([0,0,0,255]);

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct Captions {
    pub title: Option<String>,
    pub user_description: Option<String>,
    pub copyright: Option<String>,
}

impl Captions {
    fn band_text (&self) -> Option<(&str,&str)> {
        let title = self.title.as_deref().map(str::trim).unwrap_or("");
        let desc = self.user_description.as_deref().map(str::trim).unwrap_or("");
        if title.is_empty() && desc.is_empty() { None } else { Some((title,desc)) }
    }
}

/// everything that goes into one composite. `width` and `height` are the intrinsic size of `base_image`,
/// `viewport` is required to render tiled overlays
#[derive(Debug,Clone)]
pub struct CompositionRequest {
    pub base_image: Bytes,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub viewport: Option<Viewport>,
    pub overlays: Vec<OverlayLayer>,
    pub captions: Option<Captions>,
    pub scale_bar: Option<ScaleBar>,
    pub legend: Option<LegendSource>,
    pub attribution: bool,
}

impl CompositionRequest {
    /// a request that just re-encodes the base image
    pub fn new (base_image: Bytes, width: u32, height: u32, format: OutputFormat)->Self {
        CompositionRequest {
            base_image, width, height, format,
            viewport: None,
            overlays: Vec::new(),
            captions: None,
            scale_bar: None,
            legend: None,
            attribution: false
        }
    }
}

/// geometry of the bottom strip once it is drawn
struct Strip {
    top: u32,
    height: u32,
    zones: StripZones,
}

pub struct ImageCompositor {
    overlays: OverlayRenderer,
    fetcher: Arc<dyn AssetFetcher>,
    font: Option<Arc<FontVec>>,
    logo_urls: Vec<String>,
    legend_anchor: LegendAnchor,
}

impl ImageCompositor {
    pub fn new (fetcher: Arc<dyn AssetFetcher>, surfaces: Arc<SurfaceRegistry>)->Self {
        ImageCompositor {
            overlays: OverlayRenderer::new( fetcher.clone(), surfaces),
            fetcher,
            font: None,
            logo_urls: Vec::new(),
            legend_anchor: LegendAnchor::default(),
        }
    }

    pub fn with_font (mut self, font: Arc<FontVec>)->Self {
        self.font = Some(font);
        self
    }

    pub fn with_logos (mut self, logo_urls: Vec<String>)->Self {
        self.logo_urls = logo_urls;
        self
    }

    pub fn with_legend_anchor (mut self, anchor: LegendAnchor)->Self {
        self.legend_anchor = anchor;
        self
    }

    pub fn surfaces (&self) -> &Arc<SurfaceRegistry> {
        self.overlays.surfaces()
    }

    /// compose and encode into `req.format` (KMZ formats yield the raster that goes into the KMZ)
    pub async fn compose (&self, req: &CompositionRequest, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let surface = self.render( req, cancel).await?;
        surface.encode( req.format)
    }

    pub async fn render (&self, req: &CompositionRequest, cancel: &CancellationToken) -> Result<ImageSurface> {
        let base = image::load_from_memory( &req.base_image)
            .map_err( |e| EoxImageError::BaseImageDecodeError( e.to_string()))?
            .to_rgba8();
        if base.dimensions() != (req.width, req.height) {
            warn!("base image is {:?}, requested {}x{} - using base image size", base.dimensions(), req.width, req.height);
        }
        let mut surface = ImageSurface::new( base, self.font.clone());

        check_cancel( cancel)?;
        self.draw_overlays( &mut surface, req, cancel).await?;

        check_cancel( cancel)?;
        let strip = if let Some(captions) = &req.captions {
            self.draw_caption_band( &mut surface, captions);
            Some( self.draw_bottom_strip( &mut surface, captions, req.scale_bar.as_ref()))
        } else {
            None
        };

        if req.attribution && !self.logo_urls.is_empty() {
            check_cancel( cancel)?;
            self.draw_logos( &mut surface, strip.as_ref(), cancel).await?;
        }

        if let Some(legend) = &req.legend {
            check_cancel( cancel)?;
            self.draw_legend( &mut surface, legend, strip.as_ref(), cancel).await?;
        }

        check_cancel( cancel)?;
        Ok(surface)
    }

    /* #region stages *************************************************************************************/

    async fn draw_overlays (&self, surface: &mut ImageSurface, req: &CompositionRequest, cancel: &CancellationToken) -> Result<()> {
        if req.overlays.is_empty() { return Ok(()) }

        let (w,h) = (surface.width(), surface.height());
        let layers = sorted_by_z( &req.overlays);
        let rasters = join_all( layers.iter().map( |l| self.overlays.render( l, req.viewport.as_ref(), w, h, cancel))).await;

        for (layer, res) in layers.iter().zip( rasters.into_iter()) {
            match res {
                Ok(img) => {
                    if img.dimensions() == (w,h) {
                        surface.draw_image( &img, 0, 0);
                    } else {
                        surface.draw_image( &imageops::resize( &*img, w, h, FilterType::Triangle), 0, 0);
                    }
                }
                Err(EoxTilesError::Cancelled(msg)) => return Err( cancelled(msg)),
                Err(e) => warn!("skipping overlay {}: {}", layer.id, e)
            }
        }
        Ok(())
    }

    /// translucent band across the top with title and (bold) user description centered as one run
    fn draw_caption_band (&self, surface: &mut ImageSurface, captions: &Captions) {
        let Some((title,desc)) = captions.band_text() else { return };

        let (w,h) = (surface.width(), surface.height());
        let band_h = band_height( h, 1);
        let size = BODY_FONT.size_for( w);
        surface.fill_rect( 0, 0, w, band_h, BAND_BACKGROUND);

        let (title_w, title_h) = if title.is_empty() { (0,0) } else { surface.measure_text( title, size) };
        let (desc_w, desc_h) = if desc.is_empty() { (0,0) } else { surface.measure_text( desc, size) };
        let sep_w = if title.is_empty() || desc.is_empty() { 0 } else { surface.measure_text( " ", size).0 };

        let total_w = title_w + sep_w + desc_w;
        let x = (w as i32 - total_w as i32) / 2;
        let y = (band_h as i32 - title_h.max(desc_h) as i32) / 2;

        if !title.is_empty() {
            surface.draw_text( title, x, y, size, TEXT_COLOR, false);
        }
        if !desc.is_empty() {
            surface.draw_text( desc, x + (title_w + sep_w) as i32, y, size, TEXT_COLOR, true);
        }
    }

    fn draw_bottom_strip (&self, surface: &mut ImageSurface, captions: &Captions, scale_bar: Option<&ScaleBar>) -> Strip {
        let (w,h) = (surface.width(), surface.height());
        let size = COPYRIGHT_FONT.size_for( w);
        let strip_h = band_height( h, size.ceil() as u32 + PAD/2);
        let top = h - strip_h;

        let scale_w = scale_bar.map( |sb| sb.measured_width( surface, size)).unwrap_or(0);
        let zones = partition_bottom_strip( w, scale_w);

        surface.fill_rect( 0, top as i64, w, strip_h, BAND_BACKGROUND);

        if let Some(sb) = scale_bar {
            sb.draw( surface, zones.scale_bar, top, strip_h, size, TEXT_COLOR);
        }

        if let Some(copyright) = captions.copyright.as_deref() {
            let zone = zones.copyright;
            let lines = wrap_text( surface, copyright, size, zone.width);
            let line_h = size.ceil() as i32;
            let mut y = top as i32 + (strip_h as i32 - line_h * lines.len() as i32) / 2;

            for line in &lines {
                let (lw,_) = surface.measure_text( line, size);
                let x = zone.x as i32 + (zone.width as i32 - lw as i32) / 2;
                surface.draw_text( line, x, y, size, TEXT_COLOR, false);
                y += line_h;
            }
        }

        Strip { top, height: strip_h, zones }
    }

    async fn draw_logos (&self, surface: &mut ImageSurface, strip: Option<&Strip>, cancel: &CancellationToken) -> Result<()> {
        let data = self.fetch_assets( &self.logo_urls, cancel).await?;
        let marks = decode_logos( &data);
        if marks.is_empty() { return Ok(()) }

        let (zone, top, height) = if let Some(strip) = strip {
            (strip.zones.logos, strip.top, strip.height)
        } else { // no strip, use the area it would occupy
            let (w,h) = (surface.width(), surface.height());
            let strip_h = band_height( h, COPYRIGHT_FONT.size_for(w).ceil() as u32 + PAD/2);
            (partition_bottom_strip( w, 0).logos, h - strip_h, strip_h)
        };

        logos::draw_logos( surface, &marks, zone, top, height);
        Ok(())
    }

    async fn draw_legend (&self, surface: &mut ImageSurface, source: &LegendSource, strip: Option<&Strip>, cancel: &CancellationToken) -> Result<()> {
        let natural = match source {
            LegendSource::ImageUrl(url) => {
                let data = self.fetch_assets( std::slice::from_ref(url), cancel).await?;
                data.first().and_then( |(_,bytes)| {
                    image::load_from_memory( bytes).map( |img| img.to_rgba8())
                        .inspect_err( |e| warn!("ignoring legend {url}: {e}"))
                        .ok()
                })
            }
            spec => render_legend( spec, self.font.clone())
        };

        let Some(natural) = natural else {
            debug!("no legend to draw");
            return Ok(())
        };

        let (w,h) = (surface.width(), surface.height());
        let ratio = legend_scale_ratio( w, natural.width());
        let lw = ((natural.width() as f32 * ratio).round() as u32).max(1);
        let lh = ((natural.height() as f32 * ratio).round() as u32).max(1);
        let legend = if (lw,lh) == natural.dimensions() { natural } else { imageops::resize( &natural, lw, lh, FilterType::Triangle) };

        let (x,y) = legend_position( w, h, lw, lh, self.legend_anchor, strip.map( |s| s.top));
        surface.draw_image( &legend, x, y);
        Ok(())
    }

    /* #endregion stages */

    /// fetch assets concurrently. Failures are logged and dropped, only cancellation is an error
    async fn fetch_assets (&self, urls: &[String], cancel: &CancellationToken) -> Result<Vec<(String,Vec<u8>)>> {
        let results = join_all( urls.iter().map( |url| self.fetcher.fetch( url, cancel))).await;
        check_cancel( cancel)?;

        Ok( urls.iter().zip( results.into_iter()).filter_map( |(url,res)| {
            match res {
                Ok(bytes) => Some( (url.clone(), bytes.to_vec()) ),
                Err(e) => { warn!("failed to fetch asset {url}: {e}"); None }
            }
        }).collect() )
    }
}

fn check_cancel (cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() { Err( cancelled("composition")) } else { Ok(()) }
}
