use super::sand::{reese_sand_theory, ReeseShape};
use super::soft_clay::matlock_p_ult;
use super::tables::{api_sand_k, reese_sand_a, reese_sand_b};
use super::{PyContext, PyCurve};
use crate::base::{pcf_to_pci, psf_to_psi, IN_PER_FT};

/// Implements the loess p-y curve (CPT-based, hyperbolic degradation)
///
/// p_u = N_cpt·q_c·b/(1 + C_N·log₁₀ N_cyc), reduced 50% at the surface
/// ramping to full at z = 2b. The secant modulus degrades hyperbolically,
/// p = k·z·y/(1 + k·z·y/p_u). When no cone resistance is given it is
/// derived from c_u with N_k = 15.
pub struct Loess {
    p_u: f64,
    k_z: f64,
}

/// Defines the CPT bearing coefficient of the loess model
const LOESS_N_CPT: f64 = 0.409;

/// Defines the cyclic degradation coefficient of the loess model
const LOESS_C_N: f64 = 0.24;

impl Loess {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, cu: f64, k: f64, q_c: Option<f64>, n_cycles: f64) -> Self {
        let z_in = ctx.z_ft * IN_PER_FT;
        let q_c_psi = match q_c {
            Some(q) => q,
            None => 15.0 * psf_to_psi(cu),
        };
        let n_cyc = f64::max(n_cycles, 1.0);
        let p_u0 = LOESS_N_CPT * q_c_psi * ctx.b / (1.0 + LOESS_C_N * n_cyc.log10());
        // surface reduction: 50% at z = 0, full at z = 2b
        let reduction = 0.5 + 0.5 * f64::min(z_in / (2.0 * ctx.b), 1.0);
        Loess {
            p_u: p_u0 * reduction,
            k_z: k * z_in,
        }
    }
}

impl PyCurve for Loess {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_u <= 0.0 || self.k_z <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        let linear = self.k_z * y;
        linear / (1.0 + linear / self.p_u)
    }

    fn p_ult(&self) -> f64 {
        self.p_u
    }

    fn name(&self) -> &'static str {
        "loess"
    }
}

/// Implements the cemented c-φ silt p-y curve
///
/// The ultimate combines the Reese sand frictional resistance with a
/// Matlock-style cohesive contribution (J = 0.5); the shape follows the
/// Reese sand four-segment construction. Cementation adds the cohesive
/// subgrade stiffness to the frictional one.
pub struct CementedSilt {
    shape: ReeseShape,
}

impl CementedSilt {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, cu: f64, phi: f64, cemented: bool) -> Self {
        let z_in = ctx.z_ft * IN_PER_FT;
        let p_s = reese_sand_theory(z_in, ctx.b, pcf_to_pci(ctx.gamma_eff), phi);
        let zb = z_in / ctx.b;
        let (p_c, _) = matlock_p_ult(ctx.z_ft, cu, ctx.gamma_eff, ctx.b, 0.5);
        let p_u = reese_sand_a(zb, ctx.cyclic) * p_s + p_c;
        let p_m = reese_sand_b(zb, ctx.cyclic) * p_s + p_c;
        let k_phi = api_sand_k(phi, ctx.submerged);
        let k_c = if cemented {
            // cohesive stiffness contribution by consistency
            if cu < 500.0 {
                7.0
            } else if cu < 1000.0 {
                20.0
            } else if cu < 2000.0 {
                65.0
            } else if cu < 4000.0 {
                200.0
            } else {
                500.0
            }
        } else {
            0.0
        };
        let k_z = (k_phi + k_c) * z_in;
        // the cohesive term raises p_m; clamp it below the ultimate so the
        // four-segment construction stays well posed
        let p_m = f64::min(p_m, 0.95 * p_u);
        CementedSilt {
            shape: ReeseShape::new(ctx.b, k_z, p_u, p_m),
        }
    }
}

impl PyCurve for CementedSilt {
    fn p_positive(&self, y: f64) -> f64 {
        self.shape.eval(y)
    }

    fn p_ult(&self) -> f64 {
        self.shape.p_u
    }

    fn name(&self) -> &'static str {
        "cemented c-phi silt"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CementedSilt, Loess};
    use crate::curves::{PyContext, PyCurve};
    use russell_lab::approx_eq;

    fn ctx(z_ft: f64) -> PyContext {
        PyContext {
            z_ft,
            b: 6.0,
            gamma_eff: 110.0,
            sigma_v_eff: 110.0 * z_ft,
            submerged: false,
            cyclic: false,
        }
    }

    #[test]
    fn loess_surface_reduction_ramps() {
        let surface = Loess::new(&ctx(0.1), 1500.0, 65.0, None, 1.0);
        let deep = Loess::new(&ctx(5.0), 1500.0, 65.0, None, 1.0);
        // z = 5 ft = 60 in > 2b = 12 in → full resistance; near-surface about half
        assert!(surface.p_ult() < 0.6 * deep.p_ult());
        // static: log10(1) = 0 → no cyclic reduction
        let cyclic = Loess::new(&ctx(5.0), 1500.0, 65.0, None, 20.0);
        assert!(cyclic.p_ult() < deep.p_ult());
    }

    #[test]
    fn loess_is_hyperbolic() {
        let curve = Loess::new(&ctx(5.0), 1500.0, 65.0, None, 1.0);
        let y = 1e-7;
        approx_eq(curve.p_positive(y) / y, 65.0 * 60.0, 1e-1);
        assert!(curve.p_positive(1000.0) <= curve.p_ult());
    }

    #[test]
    fn explicit_cone_resistance_is_honored() {
        let derived = Loess::new(&ctx(5.0), 1500.0, 65.0, None, 1.0);
        let explicit = Loess::new(&ctx(5.0), 1500.0, 65.0, Some(15.0 * 1500.0 / 144.0), 1.0);
        approx_eq(derived.p_ult(), explicit.p_ult(), 1e-12);
    }

    #[test]
    fn cementation_raises_ultimate_and_stiffness() {
        let c = ctx(6.0);
        let silty_sand = CementedSilt::new(&c, 0.0, 32.0, false);
        let cemented = CementedSilt::new(&c, 800.0, 32.0, true);
        assert!(cemented.p_ult() > silty_sand.p_ult());
        let y = 1e-4;
        assert!(cemented.p_positive(y) > silty_sand.p_positive(y));
    }
}
