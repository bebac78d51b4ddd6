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

use std::f64::consts::{PI as STD_PI};

use serde::{Serialize,Deserialize};
use num::Num;

pub mod macros;
pub mod fs;
pub mod geo_constants;
pub mod net;
pub mod config;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn sinh(x:f64) -> f64 { x.sinh() }
#[inline(always)] pub fn atan(x:f64) -> f64 { x.atan() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn deg(x:f64)->f64 { x.to_degrees() }
#[inline(always)] pub fn rad(x:f64)->f64 { x.to_radians() }

/// a generic bounding box without semantics for the coordinate type
#[repr(C)]
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn width (&self) -> T { self.east - self.west }
    pub fn height (&self) -> T { self.north - self.south }
}

pub const PI: f64 = STD_PI;
