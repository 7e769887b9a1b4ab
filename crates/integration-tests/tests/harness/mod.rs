#![allow(dead_code)]

pub mod mock_vendor;
pub mod params;
