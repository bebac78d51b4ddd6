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

//! band scaling factors and the single band evalscripts that apply them

use serde::{Serialize,Deserialize};
use eox_image::SampleType;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum DatasetKind {
    /// service managed dataset, bands are normalized to [0,1]
    Standard,
    /// user ingested collection, bands carry their native sample values
    Custom,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct ScalingSpec {
    pub dataset_kind: DatasetKind,
    pub output_sample_type: SampleType,

    #[serde(default)]
    pub band_native_sample_type: Option<SampleType>,
}

impl ScalingSpec {
    pub fn new (dataset_kind: DatasetKind, output_sample_type: SampleType, band_native_sample_type: Option<SampleType>)->Self {
        ScalingSpec { dataset_kind, output_sample_type, band_native_sample_type }
    }
}

/// the factor that maps raw band values into the output sample range, None if values pass through.
///  - FLOAT32 output: None
///  - STANDARD: max value of the output type
///  - CUSTOM: output max / native max (a CUSTOM band without an integer native type is treated like STANDARD)
pub fn resolve_scale_factor (spec: &ScalingSpec) -> Option<f64> {
    let target_max = spec.output_sample_type.max_value()?;

    match spec.dataset_kind {
        DatasetKind::Standard => Some(target_max),
        DatasetKind::Custom => {
            match spec.band_native_sample_type.and_then( |t| t.max_value()) {
                Some(native_max) => Some( target_max / native_max),
                None => Some(target_max)
            }
        }
    }
}

/// generate the evalscript that exports a single `band` scaled by `factor`
pub fn single_band_evalscript (band: &str, output_sample_type: SampleType, factor: Option<f64>, with_data_mask: bool) -> String {
    let (inputs, n_bands) = if with_data_mask {
        (format!("\"{band}\", \"dataMask\""), 2)
    } else {
        (format!("\"{band}\""), 1)
    };

    let value = match factor {
        Some(f) => format!("{f} * sample.{band}"),
        None => format!("sample.{band}")
    };
    let result = if with_data_mask { format!("[{value}, sample.dataMask]") } else { format!("[{value}]") };

    format!(
r#"//VERSION=3
function setup() {{
  return {{
    input: [{inputs}],
    output: {{ bands: {n_bands}, sampleType: "{}" }}
  }};
}}

function evaluatePixel(sample) {{
  return {result};
}}
"#, output_sample_type.as_str())
}

/// resolve the factor for `spec` and generate the evalscript for `band`
pub fn evalscript_for (band: &str, spec: &ScalingSpec, with_data_mask: bool) -> String {
    single_band_evalscript( band, spec.output_sample_type, resolve_scale_factor( spec), with_data_mask)
}
