use crate::base::interp_table;
use crate::curves::tables::{meyerhof_nq, meyerhof_qb_limit};
use crate::soil::SoilProfile;

/// Defines the API RP 2GEO q-z shape (z/D vs q/q_max)
const QZ_TABLE: [(f64, f64); 7] = [
    (0.000, 0.00),
    (0.002, 0.25),
    (0.013, 0.50),
    (0.042, 0.75),
    (0.073, 0.90),
    (0.100, 1.00),
    (1.000, 1.00),
];

/// Holds the tip bearing transfer curve
///
/// The mobilization shape is the API table, reaching the full bearing at a
/// tip displacement of 10% of the pile width.
#[derive(Clone, Debug)]
pub struct QzCurve {
    /// Ultimate tip resistance (lb)
    pub q_max: f64,

    /// Pile width (in) normalizing the table
    pub b: f64,
}

impl QzCurve {
    /// Builds the curve at the pile tip from the bearing layer
    ///
    /// Cohesive: q_b = N_c·c_u with N_c = min(6·(1 + 0.2·D/b), 9).
    /// Cohesionless: q_b = min(N_q·σ'_v, Meyerhof limit).
    pub fn new(profile: &SoilProfile, embedment: f64, tip_area: f64, b: f64) -> Option<Self> {
        let layer = profile.layer_at(f64::max(embedment - 0.01, 0.0))?;
        let sigma_v = profile.effective_stress_at(embedment);
        let q_b_psf = if layer.soil_type.is_cohesive() {
            let cu = layer.undrained_strength(&profile.spt);
            let d_over_b = embedment * 12.0 / b;
            let n_c = f64::min(6.0 * (1.0 + 0.2 * d_over_b), 9.0);
            n_c * cu
        } else {
            let phi = layer.friction_angle(&profile.spt);
            f64::min(meyerhof_nq(phi) * sigma_v, meyerhof_qb_limit(phi))
        };
        Some(QzCurve {
            q_max: q_b_psf / 144.0 * tip_area,
            b,
        })
    }

    /// Returns the mobilized tip resistance (lb) at tip displacement u (in)
    ///
    /// Only downward (compressive) movement mobilizes the tip.
    pub fn mobilized(&self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        self.q_max * interp_table(&QZ_TABLE, u / self.b)
    }

    /// Returns the secant stiffness q/u (lb/in) with a displacement floor
    ///
    /// An uplifting tip (u < 0) carries no stiffness; at u = 0 the initial
    /// stiffness from the first table segment seeds the iteration.
    pub fn secant(&self, u: f64) -> f64 {
        if u < 0.0 {
            return 0.0;
        }
        if u == 0.0 {
            return self.q_max * 0.25 / (0.002 * self.b);
        }
        let ua = f64::max(u, crate::base::Y_FLOOR);
        self.mobilized(ua) / ua
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::QzCurve;
    use crate::base::SoilType;
    use crate::soil::{SoilLayer, SoilProfile};
    use russell_lab::approx_eq;

    #[test]
    fn sand_tip_uses_meyerhof() {
        let mut layer = SoilLayer::new(0.0, 15.0, SoilType::Sand);
        layer.n_spt = Some(15.0);
        layer.gamma = Some(115.0);
        let profile = SoilProfile::new(vec![layer], None).unwrap();
        let qz = QzCurve::new(&profile, 10.0, 23.2, 5.9).unwrap();
        assert!(qz.q_max > 0.0);
        // full mobilization at 10% of b
        approx_eq(qz.mobilized(0.59), qz.q_max, 1e-9);
        approx_eq(qz.mobilized(5.0), qz.q_max, 1e-9);
        // no tension resistance at the tip
        assert_eq!(qz.mobilized(-0.1), 0.0);
    }

    #[test]
    fn clay_tip_caps_nc_at_nine() {
        let mut layer = SoilLayer::new(0.0, 20.0, SoilType::Clay);
        layer.c_u = Some(1000.0);
        layer.gamma = Some(115.0);
        let profile = SoilProfile::new(vec![layer], None).unwrap();
        // deep embedment: N_c = 9
        let deep = QzCurve::new(&profile, 15.0, 23.2, 5.9).unwrap();
        approx_eq(deep.q_max, 9.0 * 1000.0 / 144.0 * 23.2, 1e-9);
        // very shallow embedment: N_c = 6·(1 + 0.2·D/b) < 9
        let shallow = QzCurve::new(&profile, 1.0, 23.2, 5.9).unwrap();
        assert!(shallow.q_max < deep.q_max);
    }
}
