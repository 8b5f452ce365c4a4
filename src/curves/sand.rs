use super::tables::{api_sand_coefficients, api_sand_k, reese_sand_a, reese_sand_b};
use super::{PyContext, PyCurve};
use crate::base::{pcf_to_pci, psf_to_psi, IN_PER_FT};

/// Returns the theoretical Reese (1974) sand resistance p_s (lb/in)
///
/// Minimum of the shallow wedge and the deep flow-around expressions,
/// with α = φ/2, β = 45° + φ/2, K₀ = 0.4, and K_a = tan²(45° − φ/2).
pub(crate) fn reese_sand_theory(z_in: f64, b: f64, gamma_pci: f64, phi_deg: f64) -> f64 {
    if z_in <= 0.0 || phi_deg <= 0.0 {
        return 0.0;
    }
    let phi = phi_deg.to_radians();
    let alpha = phi / 2.0;
    let beta = std::f64::consts::FRAC_PI_4 + phi / 2.0;
    let k0 = 0.4;
    let ka = (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan().powi(2);
    let (tb, tf, ta) = (beta.tan(), phi.tan(), alpha.tan());
    let tbf = (beta - phi).tan();
    let p_wedge = gamma_pci
        * z_in
        * (k0 * z_in * tf * beta.sin() / (tbf * alpha.cos())
            + (tb / tbf) * (b + z_in * tb * ta)
            + k0 * z_in * tb * (tf * beta.sin() - ta)
            - ka * b);
    let p_flow = ka * b * gamma_pci * z_in * (tb.powi(8) - 1.0) + k0 * b * gamma_pci * z_in * tf * tb.powi(4);
    f64::max(f64::min(p_wedge, p_flow), 0.0)
}

/// Holds the four-segment Reese sand construction
///
/// Linear k·z·y to y_k, parabola C·y^(1/n) to y_m = b/60, straight line
/// to y_u = 3b/80, then the plateau p_u.
pub(crate) struct ReeseShape {
    pub k_z: f64,
    pub y_k: f64,
    pub y_m: f64,
    pub y_u: f64,
    pub cc: f64,
    pub nn: f64,
    pub mm: f64,
    pub p_m: f64,
    pub p_u: f64,
}

impl ReeseShape {
    /// Builds the segment constants from the ultimate and intermediate values
    pub fn new(b: f64, k_z: f64, p_u: f64, p_m: f64) -> Self {
        let y_u = 3.0 * b / 80.0;
        let y_m = b / 60.0;
        let mm = f64::max((p_u - p_m) / (y_u - y_m), 0.0);
        let (nn, cc, y_k) = if p_m > 0.0 && mm > 0.0 {
            let nn = p_m / (mm * y_m);
            let cc = p_m / y_m.powf(1.0 / nn);
            let y_k = if k_z > 0.0 && nn > 1.0 {
                f64::min((cc / k_z).powf(nn / (nn - 1.0)), y_m)
            } else {
                y_m
            };
            (nn, cc, y_k)
        } else {
            (1.0, 0.0, 0.0)
        };
        ReeseShape {
            k_z,
            y_k,
            y_m,
            y_u,
            cc,
            nn,
            mm,
            p_m,
            p_u,
        }
    }

    /// Evaluates the resistance magnitude for y ≥ 0
    pub fn eval(&self, y: f64) -> f64 {
        if self.p_u <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        let p = if y <= self.y_k {
            self.k_z * y
        } else if y <= self.y_m {
            self.cc * y.powf(1.0 / self.nn)
        } else if y <= self.y_u {
            self.p_m + self.mm * (y - self.y_m)
        } else {
            self.p_u
        };
        f64::min(p, self.p_u)
    }
}

/// Implements the Reese et al. (1974) sand p-y curve
pub struct ReeseSand {
    shape: ReeseShape,
}

impl ReeseSand {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, phi: f64, k: f64) -> Self {
        let z_in = ctx.z_ft * IN_PER_FT;
        let p_s = reese_sand_theory(z_in, ctx.b, pcf_to_pci(ctx.gamma_eff), phi);
        let zb = z_in / ctx.b;
        let p_u = reese_sand_a(zb, ctx.cyclic) * p_s;
        let p_m = reese_sand_b(zb, ctx.cyclic) * p_s;
        let k_z = k * z_in;
        ReeseSand {
            shape: ReeseShape::new(ctx.b, k_z, p_u, p_m),
        }
    }
}

impl PyCurve for ReeseSand {
    fn p_positive(&self, y: f64) -> f64 {
        self.shape.eval(y)
    }

    fn p_ult(&self) -> f64 {
        self.shape.p_u
    }

    fn name(&self) -> &'static str {
        "Reese sand"
    }
}

/// Implements the API RP 2A sand p-y curve (tanh form)
///
/// p = A·p_ult·tanh(k·z·y/(A·p_ult)) with A = max(0.9, 3 − 0.8·z/b)
/// static or A = 0.9 cyclic.
pub struct ApiSand {
    a_p_ult: f64,
    k_z: f64,
}

impl ApiSand {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, phi: f64, k_override: f64) -> Self {
        let z = ctx.z_ft;
        let b_ft = ctx.b / IN_PER_FT;
        let (c1, c2, c3) = api_sand_coefficients(phi);
        let p_us = (c1 * z + c2 * b_ft) * ctx.gamma_eff * z;
        let p_ud = c3 * b_ft * ctx.gamma_eff * z;
        let p_ult = if z > 0.0 {
            f64::min(p_us, p_ud) / IN_PER_FT
        } else {
            0.0
        };
        let a = if ctx.cyclic {
            0.9
        } else {
            f64::max(0.9, 3.0 - 0.8 * z / b_ft)
        };
        let k = if k_override > 0.0 {
            k_override
        } else {
            api_sand_k(phi, ctx.submerged)
        };
        ApiSand {
            a_p_ult: a * p_ult,
            k_z: k * z * IN_PER_FT,
        }
    }
}

impl PyCurve for ApiSand {
    fn p_positive(&self, y: f64) -> f64 {
        if self.a_p_ult <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        self.a_p_ult * f64::tanh(self.k_z * y / self.a_p_ult)
    }

    fn p_ult(&self) -> f64 {
        self.a_p_ult
    }

    fn name(&self) -> &'static str {
        "API sand"
    }
}

/// Implements the small-strain sand overlay (Hardin-Drnevich)
///
/// The small-strain branch p = 4·G_max·y/(1 + y/y_r) governs near the
/// origin; the API sand curve governs at larger displacements; both are
/// capped at A·p_ult. G_max defaults to 1000·K₂·√σ'ₘ with
/// K₂ = 30 + 2(φ − 25).
pub struct SmallStrainSand {
    api: ApiSand,
    g_max: f64,
    y_r: f64,
}

impl SmallStrainSand {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, phi: f64, k_override: f64, g_max: Option<f64>) -> Self {
        let api = ApiSand::new(ctx, phi, k_override);
        let g_max = match g_max {
            Some(g) => g,
            None => {
                let k2 = 30.0 + 2.0 * (phi - 25.0);
                let sigma_m_psi = psf_to_psi(ctx.sigma_v_eff) * (1.0 + 2.0 * 0.4) / 3.0;
                1000.0 * k2 * f64::sqrt(f64::max(sigma_m_psi, 0.0))
            }
        };
        let y_r = if g_max > 0.0 {
            api.a_p_ult / (4.0 * g_max)
        } else {
            f64::INFINITY
        };
        SmallStrainSand { api, g_max, y_r }
    }
}

impl PyCurve for SmallStrainSand {
    fn p_positive(&self, y: f64) -> f64 {
        if self.api.a_p_ult <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        let p_small = if self.y_r.is_finite() {
            4.0 * self.g_max * y / (1.0 + y / self.y_r)
        } else {
            0.0
        };
        f64::min(f64::max(p_small, self.api.p_positive(y)), self.api.a_p_ult)
    }

    fn p_ult(&self) -> f64 {
        self.api.a_p_ult
    }

    fn name(&self) -> &'static str {
        "small-strain sand"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
