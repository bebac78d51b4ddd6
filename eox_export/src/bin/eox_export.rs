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

use std::sync::Arc;
use anyhow::{anyhow, Result};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;

use eox_common::{define_cli, config::load_config_path, net::{AssetFetcher, HttpFetcher, get_headermap}};
use eox_tiles::SurfaceRegistry;
use eox_image::{ImageCompositor, typography::load_font};
use eox_export::{
    load_config, EoxExportError, ExportBatcher, ExportConfig, ExportJob, PreviewCache, ProcessApiProvider,
    config::CONFIG_FILE
};

define_cli! { ARGS [about="eox_export - export a satellite imagery view as decorated image(s)"] =
    config: Option<String> [help="pathname of exporter config (default is looked up as eox_export.ron)", long],
    out_dir: String [help="directory where to store the export", long, default_value="."],
    job: String [help="pathname of RON export job"]
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let config: ExportConfig = match &ARGS.config {
        Some(path) => load_config_path( path)?,
        None => load_config( CONFIG_FILE).unwrap_or_else( |e| {
            info!("using default config ({e})");
            ExportConfig::default()
        })
    };

    let mut job: ExportJob = load_config_path( &ARGS.job)?;
    apply_caption_defaults( &mut job, &config);

    let client = Client::builder().timeout( config.timeout()).build()?;
    let fetcher: Arc<dyn AssetFetcher> = if config.asset_headers.is_empty() {
        Arc::new( HttpFetcher::new( client.clone()))
    } else {
        Arc::new( HttpFetcher::with_headers( client.clone(), get_headermap( &config.asset_headers)?))
    };
    let token = config.token();
    let provider = Arc::new( ProcessApiProvider::new( client, &config.provider_url, token.as_deref(), config.max_dimension)?);

    let mut compositor = ImageCompositor::new( fetcher.clone(), Arc::new( SurfaceRegistry::new()))
        .with_logos( config.logo_urls.clone())
        .with_legend_anchor( config.legend_anchor);
    if let Some(path) = &config.font_path {
        match load_font( path) {
            Ok(font) => compositor = compositor.with_font( Arc::new(font)),
            Err(e) => warn!("captions will not be drawn: {e}")
        }
    }

    let previews = Arc::new( PreviewCache::new( config.preview_cache_capacity, config.preview_cache_ttl()));
    let batcher = ExportBatcher::new( provider, Arc::new(compositor), fetcher, previews);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn( async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling export");
                cancel.cancel();
            }
        });
    }

    match batcher.export( &job, &cancel).await {
        Ok(result) => {
            let path = result.deliverable.write_to( &ARGS.out_dir)?;
            println!("wrote {} ({} outputs)", path.display(), result.n_outputs);
            for failure in &result.failures {
                println!("  failed: {failure}");
            }
            Ok(())
        }
        Err(EoxExportError::NoOutputs(failures)) => {
            for failure in &failures {
                eprintln!("failed: {failure}");
            }
            Err( anyhow!("no output for {}", job.dataset))
        }
        Err(e) => Err( e.into())
    }
}

fn apply_caption_defaults (job: &mut ExportJob, config: &ExportConfig) {
    if let Some(captions) = &mut job.captions {
        if captions.title.is_none() {
            captions.title = config.default_title.clone();
        }
        if captions.copyright.is_none() {
            captions.copyright = config.default_copyright.clone();
        }
    }
}
