use super::soft_clay::SoftClayMatlock;
use super::{PyContext, PyCurve};
use crate::base::KN_M_TO_LB_IN;

/// Implements the Rollins et al. (2005) fully liquefied sand p-y curve
///
/// p = P_d·A·(B·y)^C with depth-dependent A, B, C (SI units internally:
/// z in meters, y in millimeters, p in kN/m), a diameter factor P_d for
/// piles larger than the 0.3 m reference, and a hard cap of 15 kN/m
/// scaled by the same factor.
pub struct LiquefiedSandRollins {
    aa: f64,
    bb: f64,
    cc: f64,
    p_d: f64,
    cap_lb_in: f64,
}

impl LiquefiedSandRollins {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext) -> Self {
        let z_m = ctx.z_ft * 0.3048;
        let aa = 3e-7 * (z_m + 1.0).powf(6.05);
        let bb = 2.80 * (z_m + 1.0).powf(0.11);
        let cc = 2.85 * (z_m + 1.0).powf(-0.41);
        let b_m = (ctx.b * 0.0254).clamp(0.3, 2.6);
        let p_d = 3.81 * b_m.ln() + 5.6;
        LiquefiedSandRollins {
            aa,
            bb,
            cc,
            p_d,
            cap_lb_in: 15.0 * p_d * KN_M_TO_LB_IN,
        }
    }
}

impl PyCurve for LiquefiedSandRollins {
    fn p_positive(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return 0.0;
        }
        let y_mm = f64::min(y * 25.4, 150.0);
        let p_kn_m = self.p_d * self.aa * (self.bb * y_mm).powf(self.cc);
        f64::min(p_kn_m * KN_M_TO_LB_IN, self.cap_lb_in)
    }

    fn p_ult(&self) -> f64 {
        self.cap_lb_in
    }

    fn name(&self) -> &'static str {
        "liquefied sand (Rollins)"
    }
}

/// Implements the liquefied hybrid curve
///
/// Minimum of the Rollins liquefied curve and a cyclic Matlock curve with
/// the residual undrained strength (ε₅₀ = 0.02).
pub struct LiquefiedSandHybrid {
    rollins: LiquefiedSandRollins,
    residual: SoftClayMatlock,
}

impl LiquefiedSandHybrid {
    /// Allocates a new instance; `cu_residual` defaults to 100 psf upstream
    pub fn new(ctx: &PyContext, cu_residual: f64) -> Self {
        let mut cyclic_ctx = *ctx;
        cyclic_ctx.cyclic = true;
        LiquefiedSandHybrid {
            rollins: LiquefiedSandRollins::new(ctx),
            residual: SoftClayMatlock::new(&cyclic_ctx, cu_residual, 0.5, 0.02),
        }
    }
}

impl PyCurve for LiquefiedSandHybrid {
    fn p_positive(&self, y: f64) -> f64 {
        f64::min(self.rollins.p_positive(y), self.residual.p_positive(y))
    }

    fn p_ult(&self) -> f64 {
        f64::min(self.rollins.p_ult(), self.residual.p_ult())
    }

    fn name(&self) -> &'static str {
        "liquefied sand (hybrid)"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
