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

/// common geodetic constants that should be consistent throughout the export pipeline

/// semi major axis in meters (also the radius of the Spherical Mercator sphere)
pub const EQATORIAL_EARTH_RADIUS: f64 = 6378137.0;

/// circumference of the Spherical Mercator sphere in meters
pub const EQUATORIAL_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * EQATORIAL_EARTH_RADIUS;

/// max latitude (in degrees) that can be represented in Spherical Mercator
pub const MAX_MERCATOR_LAT: f64 = 85.0511287798;
