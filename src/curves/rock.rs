use super::sand::reese_sand_theory;
use super::soft_clay::matlock_p_ult;
use super::{PyContext, PyCurve};
use crate::base::{pcf_to_pci, psf_to_psi, IN_PER_FT};

/// Implements the Reese (1997) weak rock p-y curve
///
/// Linear M_ir·y to y_A, then 0.5·p_ur·(y/y_rm)^0.25 capped at p_ur, with
/// p_ur = α_r·q_ur·b·(1 + 1.4·x/b) near the surface (5.2·α_r·q_ur·b at
/// depth), α_r = 1 − (2/3)·RQD/100, and k_ir = min(100 + 400·x/(3b), 500).
pub struct WeakRock {
    p_ur: f64,
    m_ir: f64,
    y_rm: f64,
    y_a: f64,
}

impl WeakRock {
    /// Allocates a new instance (q_ur and E_ir in psi)
    pub fn new(ctx: &PyContext, q_ur: f64, e_ir: f64, rqd: f64, kappa_rm: f64) -> Self {
        let x = ctx.z_ft * IN_PER_FT;
        let b = ctx.b;
        let alpha_r = 1.0 - (2.0 / 3.0) * (rqd.clamp(0.0, 100.0) / 100.0);
        let p_ur = if x <= 3.0 * b {
            alpha_r * q_ur * b * (1.0 + 1.4 * x / b)
        } else {
            5.2 * alpha_r * q_ur * b
        };
        let k_ir = f64::min(100.0 + 400.0 * x / (3.0 * b), 500.0);
        let m_ir = k_ir * e_ir;
        let y_rm = kappa_rm * b;
        let y_a = (p_ur / (2.0 * y_rm.powf(0.25) * m_ir)).powf(4.0 / 3.0);
        WeakRock { p_ur, m_ir, y_rm, y_a }
    }
}

impl PyCurve for WeakRock {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_ur <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        if y <= self.y_a {
            self.m_ir * y
        } else {
            f64::min(0.5 * self.p_ur * (y / self.y_rm).powf(0.25), self.p_ur)
        }
    }

    fn p_ult(&self) -> f64 {
        self.p_ur
    }

    fn name(&self) -> &'static str {
        "weak rock (Reese)"
    }
}

/// Implements the strong (vuggy) rock bilinear p-y curve
///
/// p = 2000·s_u·y to y = 0.0004·b, then a reduced slope of 100·s_u up to
/// p_u = b·s_u, with s_u = q_ur/2.
pub struct StrongRock {
    s_u: f64,
    y_1: f64,
    p_1: f64,
    p_u: f64,
}

impl StrongRock {
    /// Allocates a new instance (q_ur in psi)
    pub fn new(ctx: &PyContext, q_ur: f64) -> Self {
        let s_u = q_ur / 2.0;
        let y_1 = 0.0004 * ctx.b;
        StrongRock {
            s_u,
            y_1,
            p_1: 2000.0 * s_u * y_1,
            p_u: ctx.b * s_u,
        }
    }
}

impl PyCurve for StrongRock {
    fn p_positive(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return 0.0;
        }
        if y <= self.y_1 {
            2000.0 * self.s_u * y
        } else {
            f64::min(self.p_1 + 100.0 * self.s_u * (y - self.y_1), self.p_u)
        }
    }

    fn p_ult(&self) -> f64 {
        self.p_u
    }

    fn name(&self) -> &'static str {
        "strong rock (vuggy)"
    }
}

/// Implements the Liang et al. (2009) massive rock p-y curve
///
/// Hyperbolic p = y/(1/K_i + y/p_u) with K_i = E_rock/(1 − ν²). The
/// ultimate combines frictional and cohesive wedges built from the
/// equivalent Mohr-Coulomb c'-φ' of the Hoek-Brown criterion
/// (Hoek-Carranza-Torres-Corkum 2002 tangent at σ'₃ = max(σ'_v, 0.01·σ_ci)).
pub struct MassiveRock {
    k_i: f64,
    p_u: f64,
}

impl MassiveRock {
    /// Allocates a new instance (σ_ci and E_rock in psi)
    pub fn new(ctx: &PyContext, sigma_ci: f64, m_i: f64, gsi: f64, e_rock: f64, poisson: f64) -> Self {
        let a = 0.5 + (f64::exp(-gsi / 15.0) - f64::exp(-20.0 / 3.0)) / 6.0;
        let m_b = m_i * f64::exp((gsi - 100.0) / 28.0);
        let s = f64::exp((gsi - 100.0) / 9.0);
        let sigma_3n = f64::max(psf_to_psi(ctx.sigma_v_eff), 0.01 * sigma_ci) / sigma_ci;
        let term = (s + m_b * sigma_3n).powf(a - 1.0);
        let num = 6.0 * a * m_b * term;
        let den = 2.0 * (1.0 + a) * (2.0 + a) + num;
        let phi_eq = f64::asin(num / den).to_degrees();
        let c_eq_psi = sigma_ci * ((1.0 + 2.0 * a) * s + (1.0 - a) * m_b * sigma_3n) * term
            / ((1.0 + a) * (2.0 + a) * f64::sqrt(1.0 + num / ((1.0 + a) * (2.0 + a))));
        let z_in = ctx.z_ft * IN_PER_FT;
        let p_frictional = reese_sand_theory(z_in, ctx.b, pcf_to_pci(ctx.gamma_eff), phi_eq);
        let c_eq_psf = c_eq_psi * 144.0;
        let (p_cohesive, _) = matlock_p_ult(ctx.z_ft, c_eq_psf, ctx.gamma_eff, ctx.b, 0.5);
        let k_i = e_rock / (1.0 - poisson * poisson);
        MassiveRock {
            k_i,
            p_u: p_frictional + p_cohesive,
        }
    }
}

impl PyCurve for MassiveRock {
    fn p_positive(&self, y: f64) -> f64 {
        if self.p_u <= 0.0 || self.k_i <= 0.0 || y <= 0.0 {
            return 0.0;
        }
        y / (1.0 / self.k_i + y / self.p_u)
    }

    fn p_ult(&self) -> f64 {
        self.p_u
    }

    fn name(&self) -> &'static str {
        "massive rock (Liang)"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{MassiveRock, StrongRock, WeakRock};
    use crate::curves::{PyContext, PyCurve};
    use russell_lab::approx_eq;

    fn ctx(z_ft: f64) -> PyContext {
        PyContext {
            z_ft,
            b: 6.0,
            gamma_eff: 140.0,
            sigma_v_eff: 140.0 * z_ft,
            submerged: false,
            cyclic: false,
        }
    }

    #[test]
    fn weak_rock_branches_are_continuous() {
        let curve = WeakRock::new(&ctx(5.0), 700.0, 150_000.0, 50.0, 5e-4);
        // continuity at y_A
        let y_a = curve.y_a;
        approx_eq(
            curve.p_positive(y_a),
            0.5 * curve.p_ur * (y_a / curve.y_rm).powf(0.25),
            1e-6 * curve.p_ur,
        );
        // cap at p_ur
        assert_eq!(curve.p_positive(100.0), curve.p_ult());
        // deeper than 3b the ultimate saturates at 5.2·α_r·q_ur·b
        let deep = WeakRock::new(&ctx(30.0), 700.0, 150_000.0, 50.0, 5e-4);
        let deeper = WeakRock::new(&ctx(40.0), 700.0, 150_000.0, 50.0, 5e-4);
        assert_eq!(deep.p_ult(), deeper.p_ult());
        // higher RQD lowers α_r and the ultimate
        let fractured = WeakRock::new(&ctx(5.0), 700.0, 150_000.0, 0.0, 5e-4);
        let intact = WeakRock::new(&ctx(5.0), 700.0, 150_000.0, 100.0, 5e-4);
        assert!(intact.p_ult() < fractured.p_ult());
    }

    #[test]
    fn strong_rock_is_bilinear() {
        let curve = StrongRock::new(&ctx(5.0), 2000.0);
        let s_u = 1000.0;
        let y_1 = 0.0004 * 6.0;
        approx_eq(curve.p_positive(y_1), 2000.0 * s_u * y_1, 1e-9);
        // reduced slope beyond the knee
        let p_beyond = curve.p_positive(2.0 * y_1);
        approx_eq(p_beyond, 2000.0 * s_u * y_1 + 100.0 * s_u * y_1, 1e-9);
        // capped at b·s_u
        assert_eq!(curve.p_positive(10.0), 6.0 * s_u);
    }

    #[test]
    fn massive_rock_is_hyperbolic() {
        let curve = MassiveRock::new(&ctx(10.0), 3000.0, 10.0, 45.0, 400_000.0, 0.25);
        assert!(curve.p_ult() > 0.0);
        // initial slope equals K_i
        let y = 1e-9;
        approx_eq(curve.p_positive(y) / y, curve.k_i, 1e-3 * curve.k_i);
        // approaches but never exceeds p_u
        assert!(curve.p_positive(1e6) <= curve.p_ult());
        assert!(curve.p_positive(100.0) > 0.9 * curve.p_ult());
    }
}
