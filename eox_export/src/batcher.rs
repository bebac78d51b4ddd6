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

//! fan-out of one viewport into independent export targets and packaging of the results

use std::{path::{Path,PathBuf}, sync::Arc};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use image::{imageops, DynamicImage};
use serde::{Serialize,Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use eox_common::{fs::set_filepath_contents, net::AssetFetcher};
use eox_image::{
    Captions, CompositionRequest, ImageCompositor, LegendSource, OutputFormat, SampleType, ScaleBar, encode_tiff,
    layout::SCALE_ZONE_MIN_FRACTION
};
use eox_tiles::{OverlayLayer, Viewport};

use crate::archive::{archive_filename, output_filename, wrap_kmz, zip_entries};
use crate::errors::{Result, EoxExportError, ExportFailure, cancelled, op_failed};
use crate::preview_cache::PreviewCache;
use crate::provider::{Crs, ImageRequest, ImageryProvider};
use crate::scaling::{DatasetKind, ScalingSpec, evalscript_for};

pub const ARCHIVE_MIME_TYPE: &str = "application/zip";

fn default_true()->bool { true }

/// what to render for one export target
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum TargetSource {
    /// a visualization layer with its own evalscript
    Evalscript(String),

    /// a single raw band that gets scaled into the output sample type
    Band {
        band: String,

        #[serde(default)]
        native_sample_type: Option<SampleType>,

        #[serde(default="default_true")]
        data_mask: bool,
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ExportTarget {
    pub name: String,  // layer or band label used in file names
    pub source: TargetSource,
    pub format: OutputFormat,
}

/// one viewport exported into one or more targets
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ExportJob {
    pub dataset: String,      // label used in file names
    pub collection: String,   // provider data collection
    pub dataset_kind: DatasetKind,
    pub time_from: DateTime<Utc>,
    pub time_to: DateTime<Utc>,
    pub viewport: Viewport,

    #[serde(default)]
    pub overlays: Vec<OverlayLayer>,

    #[serde(default)]
    pub captions: Option<Captions>,

    #[serde(default)]
    pub show_scale_bar: bool,

    #[serde(default)]
    pub legend: Option<LegendSource>,

    #[serde(default)]
    pub attribution: bool,

    pub targets: Vec<ExportTarget>,
}

/// a finished export file
#[derive(Debug,Clone,PartialEq)]
pub struct ExportOutput {
    pub filename: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

#[derive(Debug,Clone,PartialEq)]
pub enum Deliverable {
    Single(ExportOutput),
    Archive(ExportOutput),
}

impl Deliverable {
    pub fn output (&self) -> &ExportOutput {
        match self {
            Deliverable::Single(o) => o,
            Deliverable::Archive(o) => o,
        }
    }

    pub fn is_archive (&self) -> bool {
        matches!( self, Deliverable::Archive(_))
    }

    pub fn filename (&self) -> &str { &self.output().filename }
    pub fn data (&self) -> &[u8] { &self.output().data }
    pub fn mime_type (&self) -> &'static str { self.output().mime_type }

    pub fn write_to (&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        Ok( set_filepath_contents( dir, self.filename(), self.data())? )
    }
}

/// the deliverable plus the targets that did not make it into it
#[derive(Debug)]
pub struct ExportResult {
    pub deliverable: Deliverable,
    pub n_outputs: usize,
    pub failures: Vec<ExportFailure>,
}

pub struct ExportBatcher {
    provider: Arc<dyn ImageryProvider>,
    compositor: Arc<ImageCompositor>,
    fetcher: Arc<dyn AssetFetcher>,
    previews: Arc<PreviewCache>,
}

impl ExportBatcher {
    pub fn new (provider: Arc<dyn ImageryProvider>, compositor: Arc<ImageCompositor>, fetcher: Arc<dyn AssetFetcher>, previews: Arc<PreviewCache>)->Self {
        ExportBatcher { provider, compositor, fetcher, previews }
    }

    /// run all targets of `job` concurrently. One successful target yields a single file, several an archive.
    /// Failed targets are reported in the result. If nothing succeeds we return `NoOutputs` with all failures
    pub async fn export (&self, job: &ExportJob, cancel: &CancellationToken) -> Result<ExportResult> {
        if job.targets.is_empty() {
            return Err( EoxExportError::InvalidRequest( "job has no targets".to_string()))
        }

        let results = join_all( job.targets.iter().map( |t| self.export_target( job, t, cancel))).await;
        if cancel.is_cancelled() {
            return Err( cancelled( format!("export of {}", job.dataset)))
        }

        let mut outputs: Vec<ExportOutput> = Vec::new();
        let mut failures: Vec<ExportFailure> = Vec::new();

        for (target, res) in job.targets.iter().zip( results.into_iter()) {
            match res {
                Ok(output) => outputs.push( output),
                Err(e) => {
                    warn!("export target {} failed: {}", target.name, e);
                    failures.push( ExportFailure { target: target.name.clone(), message: e.to_string() });
                }
            }
        }

        let n_outputs = outputs.len();
        info!("export of {}: {} outputs, {} failures", job.dataset, n_outputs, failures.len());

        let deliverable = match n_outputs {
            0 => return Err( EoxExportError::NoOutputs( failures)),
            1 => Deliverable::Single( outputs.remove(0)),
            _ => {
                let entries: Vec<(String,Vec<u8>)> = outputs.into_iter().map( |o| (o.filename, o.data)).collect();
                Deliverable::Archive( ExportOutput {
                    filename: archive_filename( &job.time_from, &job.time_to, &job.dataset),
                    mime_type: ARCHIVE_MIME_TYPE,
                    data: zip_entries( &entries)?
                })
            }
        };

        Ok( ExportResult { deliverable, n_outputs, failures } )
    }

    /// scaling + fetch + composite (+ KMZ packaging) for a single target
    pub async fn export_target (&self, job: &ExportJob, target: &ExportTarget, cancel: &CancellationToken) -> Result<ExportOutput> {
        let request = self.image_request( job, target)?;
        let raster = self.fetch_raster( &request, cancel).await?;

        let format = target.format;
        let filename = output_filename( &job.time_from, &job.time_to, &job.dataset, &target.name, format.extension());

        let data = if format.supports_decorations() {
            let req = self.composition_request( job, target, raster);
            let image = self.compositor.compose( &req, cancel).await?;

            if format.is_kmz() {
                let name = filename.trim_end_matches( ".kmz");
                wrap_kmz( name, &image, format.raster_format().extension(), &request.bbox)?
            } else {
                image
            }
        } else {
            raster.to_vec()
        };

        Ok( ExportOutput { filename, mime_type: format.mime_type(), data } )
    }

    /// the provider request for `target`. Fails early if the size cannot be delivered in this format
    pub fn image_request (&self, job: &ExportJob, target: &ExportTarget) -> Result<ImageRequest> {
        let (width, height) = (job.viewport.pixel_width, job.viewport.pixel_height);
        check_dimensions( width, height, target.format, self.provider.max_dimension())?;

        let evalscript = match &target.source {
            TargetSource::Evalscript(script) => script.clone(),
            TargetSource::Band { band, native_sample_type, data_mask } => {
                let spec = ScalingSpec::new( job.dataset_kind, target.format.sample_type(), *native_sample_type);
                evalscript_for( band, &spec, *data_mask)
            }
        };

        // overlays are stitched in Mercator pixel space, so decorated rasters have to be requested in the
        // same projection. KMZ needs a WGS84 LatLonBox and TIFFs stay in geographic coordinates
        let (bbox, crs) = if target.format.supports_decorations() && !target.format.is_kmz() {
            (job.viewport.mercator_bounds(), Crs::WebMercator)
        } else {
            (job.viewport.bounds(), Crs::Wgs84)
        };

        Ok( ImageRequest {
            bbox,
            crs,
            collection: job.collection.clone(),
            time_from: job.time_from,
            time_to: job.time_to,
            width,
            height,
            format: target.format,
            evalscript,
        })
    }

    fn composition_request (&self, job: &ExportJob, target: &ExportTarget, raster: Bytes) -> CompositionRequest {
        let vp = &job.viewport;
        let mut req = CompositionRequest::new( raster, vp.pixel_width, vp.pixel_height, target.format);

        req.viewport = Some( *vp);
        req.overlays = job.overlays.clone();
        req.captions = job.captions.clone();
        req.legend = job.legend.clone();
        req.attribution = job.attribution;
        if job.show_scale_bar {
            let max_w = (SCALE_ZONE_MIN_FRACTION * vp.pixel_width as f32 * 0.75) as u32;
            req.scale_bar = ScaleBar::for_viewport( vp, max_w);
        }
        req
    }

    /// fetch the raster for `request`, splitting it into chunks if it exceeds the provider limit
    async fn fetch_raster (&self, request: &ImageRequest, cancel: &CancellationToken) -> Result<Bytes> {
        let max_dim = self.provider.max_dimension();
        if !request.exceeds( max_dim) {
            return self.provider.fetch_image( request, cancel).await
        }

        let chunks = request.split( max_dim);
        debug!("fetching {}x{} raster in {} chunks", request.width, request.height, chunks.len());

        let results = join_all( chunks.iter().map( |c| self.provider.fetch_image( &c.request, cancel))).await;

        let mut images = Vec::with_capacity( chunks.len());
        for (chunk, res) in chunks.iter().zip( results.into_iter()) {
            let img = image::load_from_memory( &res?)?;
            images.push( (chunk.x, chunk.y, img));
        }

        let stitched = stitch_chunks( request.width, request.height, images)?;
        Ok( Bytes::from( encode_tiff( &stitched)?))
    }

    /// preview thumbnail for (collection,product), served from the cache if we have a fresh copy
    pub async fn preview (&self, collection: &str, product: &str, url: &str, cancel: &CancellationToken) -> Result<Bytes> {
        if let Some(data) = self.previews.get( collection, product) {
            debug!("preview cache hit for {collection}/{product}");
            return Ok(data)
        }

        let data = self.fetcher.fetch( url, cancel).await?;
        self.previews.insert( collection, product, data.clone());
        Ok(data)
    }
}

/// oversized requests are only possible for formats we can assemble from chunks
pub fn check_dimensions (width: u32, height: u32, format: OutputFormat, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err( EoxExportError::UnsupportedOutputDimensions( format!("{width}x{height}")))
    }
    if (width > max_dimension || height > max_dimension) && !format.is_chunkable() {
        return Err( EoxExportError::UnsupportedOutputDimensions(
            format!("{width}x{height} exceeds {max_dimension}px and {:?} cannot be chunked", format)))
    }
    Ok(())
}

macro_rules! paste_chunk {
    ($canvas:expr, $img:expr, $x:expr, $y:expr; $( $variant:ident ),*) => {
        match ($canvas, $img) {
            $(
                (DynamicImage::$variant(c), DynamicImage::$variant(i)) => { imageops::replace( c, i, $x, $y); Ok(()) }
            )*
            (c,i) => Err( op_failed( format!("incompatible chunk color types {:?} and {:?}", c.color(), i.color())))
        }
    }
}

/// assemble decoded chunks (with their offsets) into one image, keeping the sample type of the chunks
pub fn stitch_chunks (width: u32, height: u32, chunks: Vec<(u32,u32,DynamicImage)>) -> Result<DynamicImage> {
    let color = chunks.first().map( |c| c.2.color()).ok_or_else( || op_failed("no chunks"))?;
    let mut canvas = DynamicImage::new( width, height, color);

    for (x, y, img) in &chunks {
        let res: Result<()> = paste_chunk!( &mut canvas, img, *x as i64, *y as i64;
            ImageLuma8, ImageLumaA8, ImageRgb8, ImageRgba8, ImageLuma16, ImageLumaA16, ImageRgb16, ImageRgba16, ImageRgb32F, ImageRgba32F);
        res?;
    }
    Ok(canvas)
}
