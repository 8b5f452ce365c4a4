//! Implements the lateral finite-difference solver and the BNWF solver

mod banded;
mod bnwf;
mod lateral;
mod springs;
pub use crate::fem::banded::*;
pub use crate::fem::bnwf::*;
pub use crate::fem::lateral::*;
pub use crate::fem::springs::*;
