use super::{PyContext, PyCurve};
use crate::base::IN_PER_FT;

/// Returns the Matlock ultimate resistance (lb/in) and transition depth (ft)
///
/// p_ult = min([3 + γ'·z/c_u + J·z/b]·c_u·b, 9·c_u·b) with the transition
/// depth z_r = 6·b/(γ'·b/c_u + J) separating the wedge and flow regimes.
pub(crate) fn matlock_p_ult(z_ft: f64, cu: f64, gamma_eff: f64, b: f64, jj: f64) -> (f64, f64) {
    if cu <= 0.0 {
        return (0.0, f64::INFINITY);
    }
    let b_ft = b / IN_PER_FT;
    let z_r = 6.0 * b_ft / (gamma_eff * b_ft / cu + jj);
    let p_per_ft = if z_ft < z_r {
        (3.0 + gamma_eff * z_ft / cu + jj * z_ft / b_ft) * cu * b_ft
    } else {
        9.0 * cu * b_ft
    };
    (p_per_ft / IN_PER_FT, z_r)
}

/// Implements the Matlock (1970) soft clay p-y curve
///
/// Static: p = 0.5·p_ult·(y/y₅₀)^(1/3) capped at p_ult beyond 8·y₅₀.
/// Cyclic: the cube-root branch holds to 3·y₅₀; beyond it the resistance
/// is capped at 0.72·p_ult, scaled by z/z_r above the transition depth.
pub struct SoftClayMatlock {
    p_ult: f64,
    y50: f64,
    cap_cyclic: f64,
    cyclic: bool,
}

impl SoftClayMatlock {
    /// Allocates a new instance (J = 0.5 for the standard Matlock curve)
    pub fn new(ctx: &PyContext, cu: f64, jj: f64, epsilon_50: f64) -> Self {
        let (p_ult, z_r) = matlock_p_ult(ctx.z_ft, cu, ctx.gamma_eff, ctx.b, jj);
        let y50 = 2.5 * epsilon_50 * ctx.b;
        let cap_cyclic = if ctx.z_ft < z_r {
            0.72 * p_ult * ctx.z_ft / z_r
        } else {
            0.72 * p_ult
        };
        SoftClayMatlock {
            p_ult,
            y50,
            cap_cyclic,
            cyclic: ctx.cyclic,
        }
    }
}

impl PyCurve for SoftClayMatlock {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_ult <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        let cube = 0.5 * self.p_ult * (y / self.y50).powf(1.0 / 3.0);
        if self.cyclic {
            if y <= 3.0 * self.y50 {
                f64::min(cube, self.p_ult)
            } else {
                self.cap_cyclic
            }
        } else {
            if y <= 8.0 * self.y50 {
                f64::min(cube, self.p_ult)
            } else {
                self.p_ult
            }
        }
    }

    fn p_ult(&self) -> f64 {
        self.p_ult
    }

    fn name(&self) -> &'static str {
        "Matlock soft clay"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
