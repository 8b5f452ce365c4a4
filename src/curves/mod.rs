//! Implements the p-y lateral reaction library and the t-z/q-z transfer curves
//!
//! Every p-y model precomputes its depth-local constants on construction and
//! then evaluates resistance as a continuous, odd function of the lateral
//! displacement, capped at its ultimate value.

mod liquefied;
mod qz;
mod rock;
mod sand;
mod silt;
mod simple;
mod soft_clay;
mod stiff_clay;
mod tables;
mod tz;
pub use crate::curves::liquefied::*;
pub use crate::curves::qz::*;
pub use crate::curves::rock::*;
pub use crate::curves::sand::*;
pub use crate::curves::silt::*;
pub use crate::curves::simple::*;
pub use crate::curves::soft_clay::*;
pub use crate::curves::stiff_clay::*;
pub use crate::curves::tables::*;
pub use crate::curves::tz::*;

use crate::base::{PyModel, Y_FLOOR};
use crate::soil::{SoilLayer, SoilProfile};
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Defines the lateral soil reaction curve evaluated at a fixed depth
///
/// Implementations return the resistance magnitude for y ≥ 0; the trait
/// provides the odd extension, a finite-difference tangent, and the secant
/// stiffness used by the solvers.
pub trait PyCurve {
    /// Returns the resistance magnitude p (lb/in) for y ≥ 0 (in)
    fn p_positive(&self, y: f64) -> f64;

    /// Returns the ultimate resistance (lb/in)
    fn p_ult(&self) -> f64;

    /// Returns the model name for reporting
    fn name(&self) -> &'static str;

    /// Returns the signed resistance, odd in y
    fn resistance(&self, y: f64) -> f64 {
        if y < 0.0 {
            -self.p_positive(-y)
        } else {
            self.p_positive(y)
        }
    }

    /// Returns the tangent dp/dy (lb/in²) at y by central difference
    fn stiffness(&self, y: f64) -> f64 {
        let h = 1e-6;
        (self.resistance(y + h) - self.resistance(y - h)) / (2.0 * h)
    }

    /// Returns the secant stiffness p/y (lb/in²) with the displacement floor
    fn secant(&self, y: f64) -> f64 {
        let ya = f64::max(f64::abs(y), Y_FLOOR);
        self.p_positive(ya) / ya
    }
}

/// Holds the depth-local soil state shared by all p-y constructors
#[derive(Clone, Copy, Debug)]
pub struct PyContext {
    /// Depth below ground (ft)
    pub z_ft: f64,

    /// Pile width facing the load (in)
    pub b: f64,

    /// Effective unit weight at this depth (pcf)
    pub gamma_eff: f64,

    /// Effective vertical stress at this depth (psf)
    pub sigma_v_eff: f64,

    /// The depth lies below the water table
    pub submerged: bool,

    /// Use cyclic degradation where the model defines it
    pub cyclic: bool,
}

impl PyContext {
    /// Builds the context at a depth from the profile state
    pub fn at_depth(profile: &SoilProfile, layer: &SoilLayer, z_ft: f64, b: f64, cyclic: bool) -> Self {
        let submerged = match profile.water_table() {
            Some(wt) => z_ft >= wt,
            None => false,
        };
        let mut gamma_eff = layer.effective_unit_weight(&profile.spt, submerged);
        if gamma_eff <= 0.0 {
            gamma_eff = 1.0;
        }
        PyContext {
            z_ft,
            b,
            gamma_eff,
            sigma_v_eff: profile.effective_stress_at(z_ft),
            submerged,
            cyclic,
        }
    }
}

/// Resolves the Auto model selection by soil type
pub fn resolve_py_model(layer: &SoilLayer) -> PyModel {
    match &layer.py_model {
        PyModel::Auto => {
            if layer.soil_type.is_cohesive() {
                PyModel::SoftClayMatlock
            } else {
                PyModel::ApiSand
            }
        }
        model => model.clone(),
    }
}

/// Constructs the p-y curve for a layer at the given depth context
pub fn new_py_curve(
    layer: &SoilLayer,
    profile: &SoilProfile,
    ctx: &PyContext,
) -> Result<Box<dyn PyCurve>, PileError> {
    let spt = &profile.spt;
    let cu = layer.undrained_strength(spt);
    let phi = layer.friction_angle(spt);
    let e50 = layer.epsilon_50_value(spt);
    let kh = layer.subgrade_k(spt, ctx.submerged);
    if e50 <= 0.0 {
        return Err(PileError::InvalidInput(format!(
            "ε₅₀ = {:?} is incorrect; it must be > 0.0",
            e50
        )));
    }
    let model = resolve_py_model(layer);
    let curve: Box<dyn PyCurve> = match model {
        PyModel::Auto => unreachable!("Auto is resolved before dispatch"),
        PyModel::SoftClayMatlock => Box::new(SoftClayMatlock::new(ctx, cu, 0.5, e50)),
        PyModel::ApiSoftClayUserJ { jj } => {
            if jj <= 0.0 {
                return Err(PileError::InvalidInput(format!(
                    "Matlock J = {:?} is incorrect; it must be > 0.0",
                    jj
                )));
            }
            Box::new(SoftClayMatlock::new(ctx, cu, jj, e50))
        }
        PyModel::StiffClayFreeWater => Box::new(StiffClayFreeWater::new(ctx, cu, e50, kh)),
        PyModel::StiffClayNoFreeWater => Box::new(StiffClayNoFreeWater::new(ctx, cu, e50, 1.0)),
        PyModel::ModifiedStiffClay => Box::new(ModifiedStiffClay::new(ctx, cu, e50, kh)),
        PyModel::ReeseSand => Box::new(ReeseSand::new(ctx, phi, kh)),
        PyModel::ApiSand => Box::new(ApiSand::new(ctx, phi, kh)),
        PyModel::SmallStrainSand { g_max } => Box::new(SmallStrainSand::new(ctx, phi, kh, g_max)),
        PyModel::LiquefiedSandRollins => Box::new(LiquefiedSandRollins::new(ctx)),
        PyModel::LiquefiedSandHybrid { cu_residual } => {
            Box::new(LiquefiedSandHybrid::new(ctx, cu_residual))
        }
        PyModel::WeakRock {
            q_ur,
            e_ir,
            rqd,
            kappa_rm,
        } => {
            if q_ur <= 0.0 || e_ir <= 0.0 || kappa_rm <= 0.0 {
                return Err(PileError::InvalidInput(
                    "weak rock requires positive q_ur, E_ir, and κ_rm".to_string(),
                ));
            }
            Box::new(WeakRock::new(ctx, q_ur, e_ir, rqd, kappa_rm))
        }
        PyModel::StrongRock { q_ur } => {
            if q_ur <= 0.0 {
                return Err(PileError::InvalidInput(
                    "strong rock requires a positive q_ur".to_string(),
                ));
            }
            Box::new(StrongRock::new(ctx, q_ur))
        }
        PyModel::MassiveRock {
            sigma_ci,
            m_i,
            gsi,
            e_rock,
            poisson,
        } => {
            if sigma_ci <= 0.0 || e_rock <= 0.0 {
                return Err(PileError::InvalidInput(
                    "massive rock requires positive σ_ci and E_rock".to_string(),
                ));
            }
            Box::new(MassiveRock::new(ctx, sigma_ci, m_i, gsi, e_rock, poisson))
        }
        PyModel::PiedmontResidual => {
            let e50 = layer.epsilon_50.unwrap_or(0.007);
            Box::new(StiffClayNoFreeWater::new(ctx, cu, e50, 0.85))
        }
        PyModel::Loess { q_c, n_cycles } => Box::new(Loess::new(ctx, cu, kh, q_c, n_cycles)),
        PyModel::CementedSilt { cemented } => Box::new(CementedSilt::new(ctx, cu, phi, cemented)),
        PyModel::ElasticSubgrade => Box::new(ElasticSubgrade::new(ctx, kh)),
        PyModel::UserInput { points } => {
            if points.len() < 2 {
                return Err(PileError::InvalidInput(
                    "user-input p-y curves require at least two (y, p) points".to_string(),
                ));
            }
            Box::new(UserInputCurve::new(points))
        }
    };
    Ok(curve)
}

/// Holds a p-y curve sampled on a displacement grid for reporting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PyCurveSample {
    pub depth_ft: f64,
    pub y: Vec<f64>,
    pub p: Vec<f64>,
    pub p_ult: f64,
    pub model: String,
}

/// Samples a curve on n points over [0, y_max]
pub fn sample_py_curve(curve: &dyn PyCurve, depth_ft: f64, y_max: f64, n: usize) -> PyCurveSample {
    let mut y = Vec::with_capacity(n);
    let mut p = Vec::with_capacity(n);
    for i in 0..n {
        let yi = y_max * (i as f64) / ((n - 1) as f64);
        y.push(yi);
        p.push(curve.resistance(yi));
    }
    PyCurveSample {
        depth_ft,
        y,
        p,
        p_ult: curve.p_ult(),
        model: curve.name().to_string(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
