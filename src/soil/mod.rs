//! Implements the layered soil profile, SPT corrections, and parameter auto-fill

mod layer;
mod profile;
pub use crate::soil::layer::*;
pub use crate::soil::profile::*;
