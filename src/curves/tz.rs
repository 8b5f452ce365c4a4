use crate::axial::{alpha_adhesion, beta_coefficient};
use crate::base::{interp_table, PileType};
use crate::soil::{SoilLayer, SoilProfile};

/// Defines the API RP 2GEO clay t-z shape (z/D vs t/t_max) with softening
const TZ_CLAY_TABLE: [(f64, f64); 8] = [
    (0.0000, 0.00),
    (0.0016, 0.30),
    (0.0031, 0.50),
    (0.0057, 0.75),
    (0.0080, 0.90),
    (0.0100, 1.00),
    (0.0200, 0.90),
    (1.0000, 0.90),
];

/// Defines the axial displacement (in) mobilizing peak friction in sand
const TZ_SAND_Z_PEAK: f64 = 0.1;

/// Holds the shaft friction transfer curve at a given depth
///
/// Clay follows the API table (peak at 1% of the pile width, softening to
/// 0.9·t_max); sand is hyperbolic with a fixed 0.1 in reference
/// displacement and no softening.
#[derive(Clone, Debug)]
pub struct TzCurve {
    /// Ultimate skin friction per unit length (lb/in)
    pub t_max: f64,

    /// Pile width (in) normalizing the clay table
    pub b: f64,

    /// Clay (tabular, softening) vs sand (hyperbolic)
    pub clay: bool,
}

impl TzCurve {
    /// Builds the curve for a layer at depth z (ft)
    pub fn new(
        profile: &SoilProfile,
        layer: &SoilLayer,
        z_ft: f64,
        perimeter: f64,
        b: f64,
        pile_type: PileType,
    ) -> Self {
        let spt = &profile.spt;
        let sigma_v = profile.effective_stress_at(z_ft);
        let clay = layer.soil_type.is_cohesive();
        let f_s_psf = if clay {
            let cu = layer.undrained_strength(spt);
            alpha_adhesion(cu, sigma_v) * cu
        } else {
            let phi = layer.friction_angle(spt);
            let (ks_ratio, delta_ratio) = match pile_type {
                PileType::Driven => (1.0, 0.7),
                _ => (0.7, 0.8),
            };
            beta_coefficient(phi, ks_ratio, delta_ratio) * sigma_v
        };
        TzCurve {
            t_max: f_s_psf / 144.0 * perimeter,
            b,
            clay,
        }
    }

    /// Returns the mobilized friction per unit length (lb/in) at axial
    /// displacement u (in); odd in u
    pub fn mobilized(&self, u: f64) -> f64 {
        let ua = u.abs();
        let t = if self.clay {
            self.t_max * interp_table(&TZ_CLAY_TABLE, ua / self.b)
        } else {
            let ratio = ua / TZ_SAND_Z_PEAK;
            self.t_max * ratio / (1.0 + ratio)
        };
        t * u.signum()
    }

    /// Returns the secant stiffness t/u (lb/in²) with a displacement floor
    pub fn secant(&self, u: f64) -> f64 {
        let ua = f64::max(u.abs(), crate::base::Y_FLOOR);
        self.mobilized(ua) / ua
    }

    /// Returns true if the underlying soil has any shaft resistance
    pub fn is_active(&self) -> bool {
        self.t_max > 0.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
