//! Implements the axial capacity kernel (skin friction and end bearing)

use crate::base::{AxialMethod, PileType, SoilType, SIGMA_V_FLOOR, TENSION_FACTOR};
use crate::curves::{meyerhof_nq, meyerhof_qb_limit};
use crate::soil::SoilProfile;
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Defines the depth increment (ft) for the skin friction integration
pub const AXIAL_DZ: f64 = 0.5;

/// Returns the API adhesion factor α for clay, clamped to [0.25, 1.0]
///
/// With a positive overburden the API ψ = c_u/σ'_v rule applies; otherwise
/// the Tomlinson tabular fallback in c_u.
pub fn alpha_adhesion(cu: f64, sigma_v: f64) -> f64 {
    if cu <= 0.0 {
        return 0.0;
    }
    let alpha = if sigma_v > 0.0 {
        let psi = cu / f64::max(sigma_v, SIGMA_V_FLOOR);
        if psi <= 1.0 {
            0.5 * psi.powf(-0.5)
        } else {
            0.5 * psi.powf(-0.25)
        }
    } else if cu <= 500.0 {
        1.0
    } else if cu <= 1000.0 {
        1.0 - 0.2 * (cu - 500.0) / 500.0
    } else if cu <= 2000.0 {
        0.8 - 0.3 * (cu - 1000.0) / 1000.0
    } else if cu <= 4000.0 {
        0.5 - 0.15 * (cu - 2000.0) / 2000.0
    } else {
        0.30
    };
    alpha.clamp(0.25, 1.0)
}

/// Returns β = K_s·tan(δ) for the effective stress method
///
/// K_s = ratio·K₀ with K₀ = 1 − sin φ; δ = δ-ratio·φ (0.7·φ for smooth
/// driven steel).
pub fn beta_coefficient(phi: f64, ks_ratio: f64, delta_ratio: f64) -> f64 {
    let k0 = 1.0 - phi.to_radians().sin();
    let delta = delta_ratio * phi;
    ks_ratio * k0 * delta.to_radians().tan()
}

/// Holds one slice of the skin friction integration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerContribution {
    pub z_mid: f64,     // slice mid-depth (ft)
    pub method: String, // method actually applied
    pub f_s: f64,       // unit skin friction (psf)
    pub delta_q: f64,   // slice capacity contribution (lb)
}

/// Holds the results of an axial capacity analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxialResult {
    pub q_s: f64,                  // total skin friction (lb)
    pub q_b: f64,                  // end bearing (lb)
    pub q_ult_compression: f64,    // Q_s + Q_b (lb)
    pub q_ult_tension: f64,        // 0.75·Q_s (lb)
    pub q_allow_compression: f64,  // ASD allowable (lb)
    pub q_allow_tension: f64,      // ASD allowable (lb)
    pub fs_compression: f64,
    pub fs_tension: f64,
    pub q_factored_compression: f64, // LRFD φ·R_n (lb)
    pub q_factored_tension: f64,     // LRFD φ·R_n (lb)
    pub contributions: Vec<LayerContribution>,
    pub notes: Vec<String>,
}

impl AxialResult {
    /// Serializes the result record as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Returns the LRFD resistance factors (φ_skin_sand, φ_skin_clay, φ_end)
fn resistance_factors(pile_type: PileType) -> (f64, f64, f64) {
    match pile_type {
        PileType::Driven => (0.45, 0.35, 0.45),
        PileType::Drilled => (0.40, 0.30, 0.40),
        PileType::Helical => (0.50, 0.50, 0.50),
    }
}

/// Computes the axial compression and tension capacity of a single pile
///
/// Integrates unit skin friction over the embedded depth in slices no
/// thicker than [`AXIAL_DZ`], honoring layer boundaries, then adds end
/// bearing at the tip.
pub fn compute_axial(
    profile: &SoilProfile,
    perimeter: f64,
    tip_area: f64,
    embedment: f64,
    method: AxialMethod,
    pile_type: PileType,
    fs_compression: f64,
    fs_tension: f64,
) -> Result<AxialResult, PileError> {
    if embedment <= 0.0 {
        return Err(PileError::InvalidInput(format!(
            "embedment = {:?} is incorrect; it must be > 0.0",
            embedment
        )));
    }
    if embedment > profile.total_depth() {
        return Err(PileError::InvalidInput(format!(
            "embedment = {:?} exceeds the profile depth = {:?}",
            embedment,
            profile.total_depth()
        )));
    }
    if fs_compression <= 0.0 || fs_tension <= 0.0 {
        return Err(PileError::InvalidInput(
            "factors of safety must be > 0.0".to_string(),
        ));
    }

    let mut notes: Vec<String> = Vec::new();
    let mut contributions: Vec<LayerContribution> = Vec::new();
    let (phi_skin_sand, phi_skin_clay, phi_end) = resistance_factors(pile_type);
    let mut q_s = 0.0;
    let mut q_factored_skin_c = 0.0;
    let mut stress_floor_noted = false;
    let mut cap_noted = false;
    let mut alpha_override_noted = false;

    // skin friction over sub-layer slices
    let mut z = 0.0;
    while z < embedment - 1e-9 {
        let layer = match profile.layer_at(z + 1e-9) {
            Some(layer) => layer,
            None => break,
        };
        let slice_end = f64::min(f64::min(layer.z_bottom(), embedment), z + AXIAL_DZ);
        let dz = slice_end - z;
        if dz <= 0.0 {
            break;
        }
        let z_mid = z + dz / 2.0;
        let mut sigma_v = profile.effective_stress_at(z_mid);
        if sigma_v < SIGMA_V_FLOOR {
            sigma_v = SIGMA_V_FLOOR;
            if !stress_floor_noted {
                notes.push("effective stress floored at 1 psf near the surface".to_string());
                stress_floor_noted = true;
            }
        }
        let cohesive = layer.soil_type.is_cohesive();
        let resolved = match method {
            AxialMethod::Auto => {
                if cohesive {
                    AxialMethod::Alpha
                } else {
                    AxialMethod::Beta
                }
            }
            m => m,
        };
        let (f_s, label) = match resolved {
            AxialMethod::Alpha if cohesive => {
                let cu = layer.undrained_strength(&profile.spt);
                (alpha_adhesion(cu, sigma_v) * cu, "alpha")
            }
            AxialMethod::Alpha => {
                // alpha requested in cohesionless soil: fall back to beta
                if !alpha_override_noted {
                    notes.push(format!(
                        "alpha method not applicable in {:?}; using beta",
                        layer.soil_type
                    ));
                    alpha_override_noted = true;
                }
                let phi = layer.friction_angle(&profile.spt);
                (beta_for(pile_type, phi, cohesive) * sigma_v, "beta")
            }
            AxialMethod::Meyerhof => {
                if cohesive && layer.soil_type != SoilType::Silt {
                    let cu = layer.undrained_strength(&profile.spt);
                    (alpha_adhesion(cu, sigma_v) * cu, "alpha")
                } else {
                    // Meyerhof SPT: f_s = N60/50 tsf, capped
                    let n60 = layer.n60(&profile.spt).unwrap_or(10.0);
                    let cap = if layer.soil_type == SoilType::Silt {
                        1200.0
                    } else {
                        2000.0
                    };
                    let f_s = f64::min(n60 / 50.0 * 2000.0, cap);
                    if f_s >= cap && !cap_noted {
                        notes.push(format!("Meyerhof skin friction capped at {:.0} psf", cap));
                        cap_noted = true;
                    }
                    (f_s, "Meyerhof SPT")
                }
            }
            AxialMethod::Beta | AxialMethod::Auto => {
                let phi = layer.friction_angle(&profile.spt);
                (beta_for(pile_type, phi, cohesive) * sigma_v, "beta")
            }
        };
        let area_in2 = perimeter * dz * 12.0;
        let delta_q = f_s / 144.0 * area_in2;
        q_s += delta_q;
        let phi_factor = if cohesive { phi_skin_clay } else { phi_skin_sand };
        q_factored_skin_c += phi_factor * delta_q;
        contributions.push(LayerContribution {
            z_mid,
            method: label.to_string(),
            f_s,
            delta_q,
        });
        z = slice_end;
    }

    // end bearing at the tip
    let mut q_b = 0.0;
    if let Some(tip_layer) = profile.layer_at(embedment - 0.01) {
        let sigma_v_tip = profile.effective_stress_at(embedment);
        let q_b_psf = if tip_layer.soil_type.is_cohesive() {
            let cu = tip_layer.undrained_strength(&profile.spt);
            let b_eq = f64::sqrt(tip_area);
            let n_c = f64::min(6.0 * (1.0 + 0.2 * embedment * 12.0 / b_eq), 9.0);
            notes.push(format!("end bearing: N_c = {:.2}, c_u = {:.0} psf", n_c, cu));
            n_c * cu
        } else {
            let phi = tip_layer.friction_angle(&profile.spt);
            let n_q = meyerhof_nq(phi);
            let limit = meyerhof_qb_limit(phi);
            let q_raw = n_q * sigma_v_tip;
            if q_raw > limit {
                notes.push(format!("end bearing capped at the Meyerhof limit = {:.0} psf", limit));
            }
            notes.push(format!("end bearing: N_q = {:.1}, σ'_v = {:.0} psf", n_q, sigma_v_tip));
            f64::min(q_raw, limit)
        };
        q_b = q_b_psf / 144.0 * tip_area;
    }

    let q_ult_compression = q_s + q_b;
    let q_ult_tension = TENSION_FACTOR * q_s;
    let q_factored_tension = {
        // tension uses the clay (lower) skin factor per installation method
        let (_, phi_t, _) = resistance_factors(pile_type);
        phi_t * q_ult_tension
    };
    notes.push(format!("tension factor on skin friction = {}", TENSION_FACTOR));

    Ok(AxialResult {
        q_s,
        q_b,
        q_ult_compression,
        q_ult_tension,
        q_allow_compression: q_ult_compression / fs_compression,
        q_allow_tension: q_ult_tension / fs_tension,
        fs_compression,
        fs_tension,
        q_factored_compression: q_factored_skin_c + phi_end * q_b,
        q_factored_tension,
        contributions,
        notes,
    })
}

/// Returns β with the K_s and δ ratios implied by the installation method
fn beta_for(pile_type: PileType, phi: f64, cohesive: bool) -> f64 {
    if cohesive {
        // effective-stress method in cohesive soil (drained shearing)
        let phi_eff = if phi > 0.0 { phi } else { 20.0 };
        return beta_coefficient(phi_eff, 0.8, 0.8);
    }
    let (ks_ratio, delta_ratio) = match pile_type {
        PileType::Driven => (1.0, 0.7),
        _ => (0.7, 0.8),
    };
    beta_coefficient(phi, ks_ratio, delta_ratio)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{alpha_adhesion, beta_coefficient, compute_axial};
    use crate::base::{AxialMethod, PileType, SoilType};
    use crate::soil::{SoilLayer, SoilProfile};
    use russell_lab::approx_eq;

    fn sand_profile() -> SoilProfile {
        let mut layer = SoilLayer::new(0.0, 15.0, SoilType::Sand);
        layer.n_spt = Some(15.0);
        layer.gamma = Some(115.0);
        SoilProfile::new(vec![layer], None).unwrap()
    }

    fn clay_profile(cu: f64) -> SoilProfile {
        let mut layer = SoilLayer::new(0.0, 20.0, SoilType::Clay);
        layer.c_u = Some(cu);
        layer.gamma = Some(115.0);
        SoilProfile::new(vec![layer], None).unwrap()
    }

    #[test]
    fn alpha_follows_api_psi_rule() {
        // ψ ≤ 1: α = 0.5·ψ^(-1/2)
        approx_eq(alpha_adhesion(500.0, 1000.0), 0.5 * f64::powf(0.5, -0.5), 1e-12);
        // ψ > 1: α = 0.5·ψ^(-1/4), clamped at 1.0
        approx_eq(alpha_adhesion(2000.0, 1000.0), 0.5 * f64::powf(2.0, -0.25), 1e-12);
        assert_eq!(alpha_adhesion(10.0, 4000.0), 1.0);
        // floor at 0.25
        assert!(alpha_adhesion(100_000.0, 100.0) >= 0.25);
        assert_eq!(alpha_adhesion(0.0, 1000.0), 0.0);
    }

    #[test]
    fn beta_combines_k0_and_delta() {
        let phi: f64 = 33.4;
        let k0 = 1.0 - phi.to_radians().sin();
        let expected = k0 * (0.7 * phi).to_radians().tan();
        approx_eq(beta_coefficient(phi, 1.0, 0.7), expected, 1e-12);
    }

    #[test]
    fn validation_captures_errors() {
        let profile = sand_profile();
        assert!(compute_axial(&profile, 27.0, 23.0, 0.0, AxialMethod::Auto, PileType::Driven, 2.5, 3.0).is_err());
        assert!(compute_axial(&profile, 27.0, 23.0, 50.0, AxialMethod::Auto, PileType::Driven, 2.5, 3.0).is_err());
        assert!(compute_axial(&profile, 27.0, 23.0, 10.0, AxialMethod::Auto, PileType::Driven, 0.0, 3.0).is_err());
    }

    #[test]
    fn sand_capacity_matches_closed_form() {
        // uniform sand, beta method: Q_s = β·σ'_v(D/2)·perimeter·D
        let profile = sand_profile();
        let result =
            compute_axial(&profile, 27.0, 23.2, 10.0, AxialMethod::Auto, PileType::Driven, 2.5, 3.0).unwrap();
        let phi = profile.layers[0].friction_angle(&profile.spt);
        let beta = beta_coefficient(phi, 1.0, 0.7);
        let q_s_expected = beta * (115.0 * 5.0) / 144.0 * 27.0 * 10.0 * 12.0;
        approx_eq(result.q_s, q_s_expected, 0.01 * q_s_expected);
        assert!(result.q_b > 0.0);
        approx_eq(result.q_ult_compression, result.q_s + result.q_b, 1e-9);
        approx_eq(result.q_ult_tension, 0.75 * result.q_s, 1e-9);
        approx_eq(result.q_allow_compression, result.q_ult_compression / 2.5, 1e-9);
        approx_eq(result.q_allow_tension, result.q_ult_tension / 3.0, 1e-9);
        // LRFD factored below ultimate
        assert!(result.q_factored_compression < result.q_ult_compression);
        for c in &result.contributions {
            assert_eq!(c.method, "beta");
        }
    }

    #[test]
    fn tension_never_exceeds_compression() {
        for cu in [300.0, 800.0, 2000.0] {
            let profile = clay_profile(cu);
            let result =
                compute_axial(&profile, 27.0, 23.2, 12.0, AxialMethod::Auto, PileType::Driven, 2.5, 3.0).unwrap();
            assert!(result.q_ult_tension <= result.q_ult_compression);
        }
    }

    #[test]
    fn capacity_scales_linearly_with_embedment() {
        // uniform sand under the Meyerhof method has a constant f_s, so
        // the skin friction is exactly linear in embedment
        let profile = sand_profile();
        let r5 =
            compute_axial(&profile, 27.0, 23.2, 5.0, AxialMethod::Meyerhof, PileType::Driven, 2.5, 3.0).unwrap();
        let r10 =
            compute_axial(&profile, 27.0, 23.2, 10.0, AxialMethod::Meyerhof, PileType::Driven, 2.5, 3.0).unwrap();
        approx_eq(r10.q_s, 2.0 * r5.q_s, 1e-9 * r10.q_s);
    }

    #[test]
    fn meyerhof_uses_spt_and_caps() {
        let mut layer = SoilLayer::new(0.0, 15.0, SoilType::Sand);
        layer.n_spt = Some(100.0); // N60 = 60 → uncapped 2400 psf → capped 2000
        layer.gamma = Some(120.0);
        let profile = SoilProfile::new(vec![layer], None).unwrap();
        let result =
            compute_axial(&profile, 27.0, 23.2, 10.0, AxialMethod::Meyerhof, PileType::Driven, 2.5, 3.0).unwrap();
        for c in &result.contributions {
            assert_eq!(c.method, "Meyerhof SPT");
            assert_eq!(c.f_s, 2000.0);
        }
        assert!(result.notes.iter().any(|n| n.contains("capped")));
    }

    #[test]
    fn helical_resistance_factors_apply() {
        let profile = sand_profile();
        let driven =
            compute_axial(&profile, 27.0, 23.2, 10.0, AxialMethod::Auto, PileType::Driven, 2.5, 3.0).unwrap();
        let helical =
            compute_axial(&profile, 27.0, 23.2, 10.0, AxialMethod::Auto, PileType::Helical, 2.5, 3.0).unwrap();
        // same nominal, different factored
        approx_eq(driven.q_ult_compression, helical.q_ult_compression, 1e-9);
        assert!(helical.q_factored_compression > driven.q_factored_compression);
    }
}
