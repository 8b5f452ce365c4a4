use crate::base::{PyModel, SoilType, GAMMA_WATER};
use serde::{Deserialize, Serialize};

/// Holds the SPT correction factors applied profile-wide
///
/// N60 = N_spt · C_E · C_B · C_R · C_S
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SptCorrections {
    pub c_e: f64, // hammer energy correction
    pub c_b: f64, // borehole diameter correction
    pub c_r: f64, // rod length correction
    pub c_s: f64, // sampler correction
}

impl SptCorrections {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        SptCorrections {
            c_e: 0.60,
            c_b: 1.0,
            c_r: 1.0,
            c_s: 1.0,
        }
    }

    /// Returns the combined correction multiplier
    pub fn combined(&self) -> f64 {
        self.c_e * self.c_b * self.c_r * self.c_s
    }
}

/// Holds a single soil layer with raw field data and optional parameters
///
/// Absent numeric parameters mean "derive from N_spt and the soil type";
/// explicit values always override the correlations. There are no sentinel
/// zeros: a parameter is either set or unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Depth of the layer top below ground surface (ft)
    pub z_top: f64,

    /// Layer thickness (ft), must be positive
    pub thickness: f64,

    /// Soil classification
    pub soil_type: SoilType,

    /// Free-text description for reports
    pub description: String,

    /// Raw SPT blow count (blows/ft)
    pub n_spt: Option<f64>,

    /// Total unit weight (pcf)
    pub gamma: Option<f64>,

    /// Friction angle (degrees)
    pub phi: Option<f64>,

    /// Undrained shear strength (psf)
    pub c_u: Option<f64>,

    /// Strain at 50% of ultimate stress for p-y curves
    pub epsilon_50: Option<f64>,

    /// Subgrade reaction modulus override (lb/in³)
    pub k_py: Option<f64>,

    /// Lateral reaction model selection
    pub py_model: PyModel,
}

impl SoilLayer {
    /// Allocates a new layer with all parameters unset (auto-derived)
    pub fn new(z_top: f64, thickness: f64, soil_type: SoilType) -> Self {
        SoilLayer {
            z_top,
            thickness,
            soil_type,
            description: String::new(),
            n_spt: None,
            gamma: None,
            phi: None,
            c_u: None,
            epsilon_50: None,
            k_py: None,
            py_model: PyModel::Auto,
        }
    }

    /// Returns the depth of the layer bottom (ft)
    pub fn z_bottom(&self) -> f64 {
        self.z_top + self.thickness
    }

    /// Returns the mid-layer depth (ft)
    pub fn z_mid(&self) -> f64 {
        self.z_top + self.thickness / 2.0
    }

    /// Returns the energy-corrected SPT value N60, if N_spt is known
    pub fn n60(&self, spt: &SptCorrections) -> Option<f64> {
        self.n_spt.map(|n| n * spt.combined())
    }

    /// Returns N60 with the fallback used by the correlations
    fn n60_or(&self, spt: &SptCorrections, fallback: f64) -> f64 {
        self.n60(spt).unwrap_or(fallback)
    }

    /// Estimates the total unit weight (pcf) from N60 and soil type
    pub fn estimate_gamma(&self, spt: &SptCorrections, submerged: bool) -> f64 {
        let n = self.n60_or(spt, 10.0);
        match self.soil_type {
            SoilType::Sand | SoilType::Gravel => {
                if n < 4.0 {
                    if submerged { 105.0 } else { 95.0 }
                } else if n < 10.0 {
                    if submerged { 115.0 } else { 105.0 }
                } else if n < 30.0 {
                    if submerged { 125.0 } else { 110.0 }
                } else if n < 50.0 {
                    if submerged { 135.0 } else { 120.0 }
                } else {
                    if submerged { 140.0 } else { 130.0 }
                }
            }
            _ => {
                if n < 2.0 {
                    100.0
                } else if n < 4.0 {
                    110.0
                } else if n < 8.0 {
                    115.0
                } else if n < 15.0 {
                    120.0
                } else if n < 30.0 {
                    125.0
                } else {
                    130.0
                }
            }
        }
    }

    /// Returns the total unit weight (pcf), user value or estimate
    pub fn unit_weight(&self, spt: &SptCorrections, submerged: bool) -> f64 {
        match self.gamma {
            Some(g) => g,
            None => self.estimate_gamma(spt, submerged),
        }
    }

    /// Returns the effective unit weight (pcf); buoyant when submerged
    pub fn effective_unit_weight(&self, spt: &SptCorrections, submerged: bool) -> f64 {
        let g = self.unit_weight(spt, submerged);
        if submerged {
            g - GAMMA_WATER
        } else {
            g
        }
    }

    /// Returns the friction angle (degrees), user value or correlation
    ///
    /// Sand/Gravel: Hatanaka & Uchida, φ = min(√(20·N60) + 20, 45).
    /// Silt: φ = min(24 + 0.25·N60, 34). Clay/Organic: 0 (undrained).
    pub fn friction_angle(&self, spt: &SptCorrections) -> f64 {
        if let Some(phi) = self.phi {
            return phi;
        }
        let n = self.n60_or(spt, 10.0);
        match self.soil_type {
            SoilType::Sand | SoilType::Gravel => f64::min(45.0, f64::sqrt(20.0 * n) + 20.0),
            SoilType::Silt => f64::min(34.0, 24.0 + 0.25 * n),
            _ => 0.0,
        }
    }

    /// Returns the undrained shear strength (psf), user value or correlation
    ///
    /// Terzaghi & Peck: c_u ≈ 125·N60 for cohesive soils; 0 for sand/gravel.
    pub fn undrained_strength(&self, spt: &SptCorrections) -> f64 {
        if let Some(cu) = self.c_u {
            return cu;
        }
        match self.soil_type {
            SoilType::Sand | SoilType::Gravel => 0.0,
            _ => 125.0 * self.n60_or(spt, 5.0),
        }
    }

    /// Returns ε₅₀ for p-y curves, user value or the consistency table
    pub fn epsilon_50_value(&self, spt: &SptCorrections) -> f64 {
        if let Some(e50) = self.epsilon_50 {
            return e50;
        }
        let cu = self.undrained_strength(spt);
        if cu < 500.0 {
            0.020
        } else if cu < 1000.0 {
            0.010
        } else if cu < 2000.0 {
            0.007
        } else if cu < 4000.0 {
            0.005
        } else {
            0.004
        }
    }

    /// Returns the initial subgrade reaction modulus k (lb/in³)
    pub fn subgrade_k(&self, spt: &SptCorrections, submerged: bool) -> f64 {
        if let Some(k) = self.k_py {
            return k;
        }
        match self.soil_type {
            SoilType::Sand | SoilType::Gravel => {
                let phi = self.friction_angle(spt);
                if phi <= 25.0 {
                    if submerged { 5.0 } else { 25.0 }
                } else if phi <= 28.0 {
                    if submerged { 10.0 } else { 28.0 }
                } else if phi <= 30.0 {
                    if submerged { 25.0 } else { 60.0 }
                } else if phi <= 32.0 {
                    if submerged { 35.0 } else { 90.0 }
                } else if phi <= 34.0 {
                    if submerged { 45.0 } else { 115.0 }
                } else if phi <= 36.0 {
                    if submerged { 60.0 } else { 150.0 }
                } else if phi <= 38.0 {
                    if submerged { 80.0 } else { 200.0 }
                } else {
                    if submerged { 100.0 } else { 300.0 }
                }
            }
            _ => {
                let cu = self.undrained_strength(spt);
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
            }
        }
    }
}

// --- auxiliary SPT correlations ------------------------------------------

/// Peck, Hanson & Thornburn (1974): φ' (degrees) from (N1)60
pub fn phi_peck(n1_60: f64) -> f64 {
    27.1 + 0.3 * n1_60 - 0.00054 * n1_60 * n1_60
}

/// Soil modulus E_s (tsf) from N60 for sand
pub fn sand_modulus(n60: f64, preloaded: bool) -> f64 {
    if preloaded {
        10.0 * (n60 + 5.0)
    } else {
        5.0 * (n60 + 15.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
