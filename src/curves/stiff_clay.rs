use super::soft_clay::matlock_p_ult;
use super::tables::stiff_clay_a;
use super::{PyContext, PyCurve};
use crate::base::IN_PER_FT;

/// Implements the Welch-Reese stiff clay p-y curve (no free water)
///
/// p = 0.5·p_ult·(y/y₅₀)^0.25 up to 16·y₅₀, then p_ult. The Piedmont
/// residual variant applies a 0.85 multiplier on p_ult.
pub struct StiffClayNoFreeWater {
    p_ult: f64,
    y50: f64,
    piedmont: bool,
}

impl StiffClayNoFreeWater {
    /// Allocates a new instance; `p_ult_factor` is 1.0 (stiff clay) or 0.85 (Piedmont)
    pub fn new(ctx: &PyContext, cu: f64, epsilon_50: f64, p_ult_factor: f64) -> Self {
        let (p_ult, _) = matlock_p_ult(ctx.z_ft, cu, ctx.gamma_eff, ctx.b, 0.5);
        StiffClayNoFreeWater {
            p_ult: p_ult * p_ult_factor,
            y50: 2.5 * epsilon_50 * ctx.b,
            piedmont: p_ult_factor < 1.0,
        }
    }

    pub(crate) fn quarter_power(&self, y: f64) -> f64 {
        0.5 * self.p_ult * (y / self.y50).powf(0.25)
    }
}

impl PyCurve for StiffClayNoFreeWater {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_ult <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        if y <= 16.0 * self.y50 {
            f64::min(self.quarter_power(y), self.p_ult)
        } else {
            self.p_ult
        }
    }

    fn p_ult(&self) -> f64 {
        self.p_ult
    }

    fn name(&self) -> &'static str {
        if self.piedmont {
            "Piedmont residual"
        } else {
            "Welch-Reese stiff clay"
        }
    }
}

/// Implements the modified stiff clay curve with an initial linear branch
///
/// p = k·z·y until the line meets the quarter-power curve, then follows
/// the Welch-Reese shape.
pub struct ModifiedStiffClay {
    inner: StiffClayNoFreeWater,
    k_z: f64,   // initial stiffness k·z (lb/in²)
    y_int: f64, // intersection of the linear and quarter-power branches
}

impl ModifiedStiffClay {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, cu: f64, epsilon_50: f64, k: f64) -> Self {
        let inner = StiffClayNoFreeWater::new(ctx, cu, epsilon_50, 1.0);
        let k_z = k * ctx.z_ft * IN_PER_FT;
        // k·z·y = 0.5·p_ult·(y/y50)^0.25  →  y^(3/4) = 0.5·p_ult/(k·z·y50^0.25)
        let y_int = if k_z > 0.0 && inner.p_ult > 0.0 {
            (0.5 * inner.p_ult / (k_z * inner.y50.powf(0.25))).powf(4.0 / 3.0)
        } else {
            0.0
        };
        ModifiedStiffClay { inner, k_z, y_int }
    }
}

impl PyCurve for ModifiedStiffClay {
    fn p_positive(&self, y: f64) -> f64 {
        if self.inner.p_ult <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        if y <= self.y_int {
            f64::min(self.k_z * y, self.inner.p_ult)
        } else {
            self.inner.p_positive(y)
        }
    }

    fn p_ult(&self) -> f64 {
        self.inner.p_ult
    }

    fn name(&self) -> &'static str {
        "modified stiff clay"
    }
}

/// Implements the Reese et al. (1975) stiff clay curve with free water
///
/// Segments: initial k·z·y, parabola 0.5·p_c·(y/y₅₀)^0.5 to 6·A_s·y₅₀,
/// linear unloading at 0.0625·p_c/y₅₀, and a residual plateau derived
/// from the A_s coefficient.
pub struct StiffClayFreeWater {
    p_c: f64,
    y50: f64,
    k_z: f64,
    y_int: f64,   // end of the initial linear branch
    y_peak: f64,  // end of the parabolic branch (6·A_s·y₅₀)
    p_peak: f64,
    slope: f64,   // unloading slope (negative)
    y_res: f64,   // start of the residual plateau
    p_res: f64,
}

impl StiffClayFreeWater {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, cu: f64, epsilon_50: f64, k: f64) -> Self {
        let b_ft = ctx.b / IN_PER_FT;
        let (p_c, y50) = if cu > 0.0 {
            let p_ca = (2.0 * cu + ctx.gamma_eff * ctx.z_ft + 2.83 * cu * ctx.z_ft / b_ft) * b_ft;
            let p_cb = 11.0 * cu * b_ft;
            (f64::min(p_ca, p_cb) / IN_PER_FT, epsilon_50 * ctx.b)
        } else {
            (0.0, epsilon_50 * ctx.b)
        };
        let a_s = stiff_clay_a(ctx.z_ft * IN_PER_FT / ctx.b);
        let k_z = k * ctx.z_ft * IN_PER_FT;
        let y_int = if k_z > 0.0 && p_c > 0.0 {
            // k·z·y = 0.5·p_c·√(y/y50)  →  y = 0.25·p_c²/(k²·z²·y50)
            0.25 * p_c * p_c / (k_z * k_z * y50)
        } else {
            0.0
        };
        let y_peak = 6.0 * a_s * y50;
        let p_peak = 0.5 * p_c * f64::sqrt(6.0 * a_s);
        let slope = -0.0625 * p_c / y50;
        let p_res = f64::max(p_c * (1.225 * f64::sqrt(a_s) - 0.75 * a_s - 0.411), 0.0);
        let y_res = if p_c > 0.0 {
            y_peak + (p_peak - p_res) / (0.0625 * p_c / y50)
        } else {
            y_peak
        };
        StiffClayFreeWater {
            p_c,
            y50,
            k_z,
            y_int: f64::min(y_int, y_peak),
            y_peak,
            p_peak,
            slope,
            y_res,
            p_res,
        }
    }
}

impl PyCurve for StiffClayFreeWater {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_c <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        if y <= self.y_int {
            self.k_z * y
        } else if y <= self.y_peak {
            f64::min(0.5 * self.p_c * f64::sqrt(y / self.y50), self.p_peak)
        } else if y <= self.y_res {
            self.p_peak + self.slope * (y - self.y_peak)
        } else {
            self.p_res
        }
    }

    fn p_ult(&self) -> f64 {
        self.p_peak
    }

    fn name(&self) -> &'static str {
        "Reese stiff clay (free water)"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ModifiedStiffClay, StiffClayFreeWater, StiffClayNoFreeWater};
    use crate::curves::{PyContext, PyCurve};
    use russell_lab::approx_eq;

    fn ctx(z_ft: f64) -> PyContext {
        PyContext {
            z_ft,
            b: 6.0,
            gamma_eff: 120.0,
            sigma_v_eff: 120.0 * z_ft,
            submerged: false,
            cyclic: false,
        }
    }

    #[test]
    fn welch_reese_shape_works() {
        let curve = StiffClayNoFreeWater::new(&ctx(8.0), 2000.0, 0.005, 1.0);
        let y50 = 2.5 * 0.005 * 6.0;
        let p_ult = curve.p_ult();
        approx_eq(curve.p_positive(y50), 0.5 * p_ult, 1e-12);
        approx_eq(curve.p_positive(16.0 * y50), p_ult, 1e-12);
        assert_eq!(curve.p_positive(30.0 * y50), p_ult);
        assert_eq!(curve.name(), "Welch-Reese stiff clay");
    }

    #[test]
    fn piedmont_reduces_ultimate() {
        let full = StiffClayNoFreeWater::new(&ctx(8.0), 2000.0, 0.007, 1.0);
        let pied = StiffClayNoFreeWater::new(&ctx(8.0), 2000.0, 0.007, 0.85);
        approx_eq(pied.p_ult(), 0.85 * full.p_ult(), 1e-12);
        assert_eq!(pied.name(), "Piedmont residual");
    }

    #[test]
    fn modified_curve_starts_linear() {
        let curve = ModifiedStiffClay::new(&ctx(8.0), 2000.0, 0.005, 100.0);
        let k_z = 100.0 * 8.0 * 12.0;
        let y_small = 1e-4;
        approx_eq(curve.p_positive(y_small), k_z * y_small, 1e-9);
        // far out the curve reaches the ultimate
        assert_eq!(curve.p_positive(10.0), curve.p_ult());
    }

    #[test]
    fn free_water_curve_softens_to_residual() {
        let curve = StiffClayFreeWater::new(&ctx(8.0), 2000.0, 0.005, 200.0);
        let peak = curve.p_ult();
        assert!(peak > 0.0);
        // beyond the peak the curve unloads to a constant residual
        let deep_y = 100.0;
        let residual = curve.p_positive(deep_y);
        assert!(residual < peak);
        assert!(residual >= 0.0);
        assert_eq!(curve.p_positive(deep_y * 2.0), residual);
        // the peak value is attained at the end of the parabola
        approx_eq(curve.p_positive(curve.y_peak), peak, 1e-12);
    }
}
