//! Pilesim analyzes steel pile foundations for ground-mounted solar trackers
//!
//! The crate ingests a layered soil profile, a pile cross section, embedment,
//! and loads, and produces axial capacity, lateral deflection/moment/shear
//! profiles, pile-group reductions, and ASCE 7-22 load combinations.
//!
//! The main components are:
//!
//! * [`soil`] -- layered profile, SPT corrections, parameter auto-fill,
//!   and vertical stress integration
//! * [`curves`] -- the p-y lateral reaction library (eighteen models) plus
//!   t-z shaft and q-z tip transfer curves
//! * [`axial`] -- skin friction (alpha, beta, Meyerhof SPT) and end bearing
//! * [`fem`] -- the lateral finite-difference solver and the BNWF
//!   (beam on nonlinear Winkler foundation) solver
//! * [`group`] -- Converse-Labarre efficiency, row p-multipliers, block
//!   failure, and rigid-cap load distribution
//! * [`broms`] -- Broms closed-form lateral capacity checks
//! * [`analyses`] -- top-level entry points composing the above
//!
//! All computations use US customary units: depths in feet, pile dimensions
//! and displacements in inches, forces in pounds, stresses in psf or psi.

use thiserror::Error;

/// Defines the closed set of fatal analysis errors
///
/// Iteration-limit and cancellation outcomes are not errors: the solvers
/// return their best iterate on the result record with `converged = false`
/// and an explanatory note.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PileError {
    /// A missing or non-physical input, detected before any solve begins
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pile discretization or geometry cannot support a solve
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The global linear system cannot be factorized
    #[error("singular system: {0}")]
    Singular(String),
}

pub mod analyses;
pub mod axial;
pub mod base;
pub mod broms;
pub mod curves;
pub mod fem;
pub mod group;
pub mod prelude;
pub mod soil;
