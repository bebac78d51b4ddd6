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

//! the closed set of export formats and how to encode rasters into them

use std::io::Cursor;
use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    DynamicImage, RgbaImage
};
use serde::{Serialize,Deserialize};
use tiff::encoder::{colortype, Compression as TiffCompression, DeflateLevel, TiffEncoder};

use crate::errors::{Result, EoxImageError};

pub const JPEG_QUALITY: u8 = 90;

/// per-sample data type of an output raster
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum SampleType {
    UInt8,
    UInt16,
    Float32,
}

impl SampleType {
    /// largest representable value of integer sample types (None for floats)
    pub fn max_value (self) -> Option<f64> {
        match self {
            SampleType::UInt8 => Some(255.0),
            SampleType::UInt16 => Some(65535.0),
            SampleType::Float32 => None,
        }
    }

    /// the name used in evalscript output declarations
    pub fn as_str (self) -> &'static str {
        match self {
            SampleType::UInt8 => "UINT8",
            SampleType::UInt16 => "UINT16",
            SampleType::Float32 => "FLOAT32",
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum OutputFormat {
    Jpeg,
    Png,
    KmzJpeg,
    KmzPng,
    TiffUInt8,
    TiffUInt16,
    TiffFloat32,
}

#[derive(Debug,PartialEq)]
pub struct FormatInfo {
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub sample_type: SampleType,
    pub scale_factor: Option<f64>,
    pub decorated: bool,  // do we draw overlays, captions etc.
    pub chunkable: bool,  // can oversized requests be split into sub-requests and stitched
}

static FORMAT_TABLE: [FormatInfo;7] = [
    FormatInfo { mime_type: "image/jpeg", extension: "jpg", sample_type: SampleType::UInt8, scale_factor: Some(255.0), decorated: true, chunkable: false },
    FormatInfo { mime_type: "image/png", extension: "png", sample_type: SampleType::UInt8, scale_factor: Some(255.0), decorated: true, chunkable: false },
    FormatInfo { mime_type: "application/vnd.google-earth.kmz+xml;image_type=image/jpeg", extension: "kmz", sample_type: SampleType::UInt8, scale_factor: Some(255.0), decorated: true, chunkable: false },
    FormatInfo { mime_type: "application/vnd.google-earth.kmz+xml;image_type=image/png", extension: "kmz", sample_type: SampleType::UInt8, scale_factor: Some(255.0), decorated: true, chunkable: false },
    FormatInfo { mime_type: "image/tiff;depth=8", extension: "tiff", sample_type: SampleType::UInt8, scale_factor: Some(255.0), decorated: false, chunkable: true },
    FormatInfo { mime_type: "image/tiff;depth=16", extension: "tiff", sample_type: SampleType::UInt16, scale_factor: Some(65535.0), decorated: false, chunkable: true },
    FormatInfo { mime_type: "image/tiff;depth=32f", extension: "tiff", sample_type: SampleType::Float32, scale_factor: None, decorated: false, chunkable: false },
];

impl OutputFormat {
    pub const ALL: [OutputFormat;7] = [
        OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::KmzJpeg, OutputFormat::KmzPng,
        OutputFormat::TiffUInt8, OutputFormat::TiffUInt16, OutputFormat::TiffFloat32
    ];

    pub fn info (self) -> &'static FormatInfo {
        &FORMAT_TABLE[self as usize]
    }

    pub fn mime_type (self) -> &'static str { self.info().mime_type }
    pub fn extension (self) -> &'static str { self.info().extension }
    pub fn sample_type (self) -> SampleType { self.info().sample_type }
    pub fn scale_factor (self) -> Option<f64> { self.info().scale_factor }
    pub fn supports_decorations (self) -> bool { self.info().decorated }
    pub fn is_chunkable (self) -> bool { self.info().chunkable }

    pub fn is_kmz (self) -> bool {
        matches!( self, OutputFormat::KmzJpeg | OutputFormat::KmzPng)
    }

    pub fn is_tiff (self) -> bool {
        matches!( self, OutputFormat::TiffUInt8 | OutputFormat::TiffUInt16 | OutputFormat::TiffFloat32)
    }

    /// the format of the raster itself (KMZ formats wrap a JPEG or PNG)
    pub fn raster_format (self) -> OutputFormat {
        match self {
            OutputFormat::KmzJpeg => OutputFormat::Jpeg,
            OutputFormat::KmzPng => OutputFormat::Png,
            other => other
        }
    }

    /// the MIME type we have to request from an imagery provider for this format
    pub fn provider_mime_type (self) -> &'static str {
        if self.is_tiff() { "image/tiff" } else { self.raster_format().mime_type() }
    }
}

/// encode a composited RGBA canvas. KMZ formats produce the wrapped raster (JPEG or PNG), the
/// KML container is added by whoever knows the geographic bounds
pub fn encode_rgba (img: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    match format.raster_format() {
        OutputFormat::Jpeg => encode_jpeg( img),
        OutputFormat::Png => encode_png( img),
        OutputFormat::TiffUInt8 => encode_tiff( &DynamicImage::ImageRgba8( img.clone())),
        OutputFormat::TiffUInt16 => encode_tiff( &DynamicImage::ImageRgba16( DynamicImage::ImageRgba8( img.clone()).to_rgba16())),
        OutputFormat::TiffFloat32 => encode_tiff( &DynamicImage::ImageRgba32F( DynamicImage::ImageRgba8( img.clone()).to_rgba32f())),
        other => Err( EoxImageError::UnsupportedFormat( format!("{other:?}")))
    }
}

/// JPEG has no alpha channel, transparent areas end up black
pub fn encode_jpeg (img: &RgbaImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8( img.clone()).to_rgb8();
    let mut buf = Cursor::new( Vec::new());
    rgb.write_with_encoder( JpegEncoder::new_with_quality( &mut buf, JPEG_QUALITY))?;
    Ok( buf.into_inner() )
}

pub fn encode_png (img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new( Vec::new());
    img.write_with_encoder( PngEncoder::new( &mut buf))?;
    Ok( buf.into_inner() )
}

/// deflate compressed TIFF that keeps the sample depth of `img`. Gray+alpha images are stored as RGBA
/// since TIFF has no gray-alpha color type we can write
pub fn encode_tiff (img: &DynamicImage) -> Result<Vec<u8>> {
    let (w,h) = (img.width(), img.height());
    let mut buf = Cursor::new( Vec::new());
    {
        let mut tiff = TiffEncoder::new( &mut buf)?.with_compression( TiffCompression::Deflate(DeflateLevel::Best));

        match img {
            DynamicImage::ImageLuma8(i) => tiff.write_image::<colortype::Gray8>( w, h, i.as_raw())?,
            DynamicImage::ImageLuma16(i) => tiff.write_image::<colortype::Gray16>( w, h, i.as_raw())?,
            DynamicImage::ImageRgb8(i) => tiff.write_image::<colortype::RGB8>( w, h, i.as_raw())?,
            DynamicImage::ImageRgba8(i) => tiff.write_image::<colortype::RGBA8>( w, h, i.as_raw())?,
            DynamicImage::ImageRgb16(i) => tiff.write_image::<colortype::RGB16>( w, h, i.as_raw())?,
            DynamicImage::ImageRgba16(i) => tiff.write_image::<colortype::RGBA16>( w, h, i.as_raw())?,
            DynamicImage::ImageRgb32F(i) => tiff.write_image::<colortype::RGB32Float>( w, h, i.as_raw())?,
            DynamicImage::ImageRgba32F(i) => tiff.write_image::<colortype::RGBA32Float>( w, h, i.as_raw())?,
            DynamicImage::ImageLumaA16(_) => tiff.write_image::<colortype::RGBA16>( w, h, img.to_rgba16().as_raw())?,
            _ => tiff.write_image::<colortype::RGBA8>( w, h, img.to_rgba8().as_raw())?,
        }
    }
    Ok( buf.into_inner() )
}
