use super::{SoilLayer, SptCorrections};
use crate::base::{P_ATMOSPHERIC, GAMMA_WATER};
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Defines the tolerance (ft) used when matching layer boundaries
pub const LAYER_BOUNDARY_TOL: f64 = 1e-6;

/// Holds a soil profile made of stacked layers
///
/// Layers must cover the interval [0, total_depth] without gaps or
/// overlaps. The water table depth is measured from the ground surface;
/// a negative value (ponded water) is clamped to zero. The SPT correction
/// factors are carried here and applied to every layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub layers: Vec<SoilLayer>,
    pub water_table_depth: Option<f64>,
    pub spt: SptCorrections,
}

impl SoilProfile {
    /// Allocates a new instance, validating the layer stack
    pub fn new(layers: Vec<SoilLayer>, water_table_depth: Option<f64>) -> Result<Self, PileError> {
        let profile = SoilProfile {
            layers,
            water_table_depth,
            spt: SptCorrections::new(),
        };
        match profile.validate() {
            Some(msg) => Err(PileError::InvalidInput(msg)),
            None => Ok(profile),
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.layers.is_empty() {
            return Some("the profile must have at least one layer".to_string());
        }
        if f64::abs(self.layers[0].z_top) > LAYER_BOUNDARY_TOL {
            return Some(format!(
                "the first layer must start at the ground surface; z_top = {:?}",
                self.layers[0].z_top
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.thickness <= 0.0 {
                return Some(format!(
                    "layer #{} thickness = {:?} is incorrect; it must be > 0.0",
                    i, layer.thickness
                ));
            }
            if let Some(e50) = layer.epsilon_50 {
                if e50 <= 0.0 {
                    return Some(format!(
                        "layer #{} ε₅₀ = {:?} is incorrect; it must be > 0.0",
                        i, e50
                    ));
                }
            }
            if i > 0 {
                let prev_bottom = self.layers[i - 1].z_bottom();
                if f64::abs(layer.z_top - prev_bottom) > LAYER_BOUNDARY_TOL {
                    return Some(format!(
                        "layer #{} top = {:?} does not meet the previous layer bottom = {:?}",
                        i, layer.z_top, prev_bottom
                    ));
                }
            }
        }
        None // all good
    }

    /// Returns the total profile depth (ft)
    pub fn total_depth(&self) -> f64 {
        match self.layers.last() {
            Some(layer) => layer.z_bottom(),
            None => 0.0,
        }
    }

    /// Returns the water table depth clamped to the ground surface
    pub fn water_table(&self) -> Option<f64> {
        self.water_table_depth.map(|wt| wt.max(0.0))
    }

    /// Returns true if the layer's mid-depth lies below the water table
    pub fn is_submerged(&self, layer: &SoilLayer) -> bool {
        match self.water_table() {
            Some(wt) => layer.z_mid() >= wt,
            None => false,
        }
    }

    /// Returns the layer containing depth z (ft)
    ///
    /// Ties at interior boundaries resolve to the deeper layer; the
    /// profile bottom resolves to the last layer.
    pub fn layer_at(&self, z: f64) -> Option<&SoilLayer> {
        if z < 0.0 {
            return None;
        }
        for layer in &self.layers {
            if z >= layer.z_top && z < layer.z_bottom() {
                return Some(layer);
            }
        }
        match self.layers.last() {
            Some(layer) if z <= layer.z_bottom() + LAYER_BOUNDARY_TOL => Some(layer),
            _ => None,
        }
    }

    /// Returns the layer at depth z, resolving boundary ties upward
    ///
    /// Solver nodes landing exactly on an interface use the upper layer.
    pub fn layer_above(&self, z: f64) -> Option<&SoilLayer> {
        self.layer_at(f64::max(z - LAYER_BOUNDARY_TOL, 0.0))
    }

    /// Computes the total vertical stress σ_v (psf) at depth z (ft)
    pub fn total_stress_at(&self, z: f64) -> f64 {
        let mut sigma = 0.0;
        for layer in &self.layers {
            let top = layer.z_top;
            let bottom = f64::min(z, layer.z_bottom());
            if bottom <= top {
                break;
            }
            let submerged = self.is_submerged(layer);
            sigma += layer.unit_weight(&self.spt, submerged) * (bottom - top);
        }
        sigma
    }

    /// Computes the effective vertical stress σ'_v (psf) at depth z (ft)
    ///
    /// Below the water table the pore pressure γ_w·(z − z_wt) is removed.
    pub fn effective_stress_at(&self, z: f64) -> f64 {
        let sigma_v = self.total_stress_at(z);
        let sigma_eff = match self.water_table() {
            Some(wt) if z > wt => sigma_v - GAMMA_WATER * (z - wt),
            _ => sigma_v,
        };
        sigma_eff.max(0.0)
    }

    /// Returns the overburden-corrected (N1)60 of a layer (Liao-Whitman)
    ///
    /// C_N = min(√(p_a/σ'_v), 2.0) evaluated at the layer mid-depth.
    pub fn n1_60(&self, layer: &SoilLayer) -> Option<f64> {
        let n60 = layer.n60(&self.spt)?;
        let sigma = self.effective_stress_at(layer.z_mid());
        let c_n = if sigma <= 0.0 {
            2.0
        } else {
            f64::min(f64::sqrt(P_ATMOSPHERIC / sigma), 2.0)
        };
        Some(c_n * n60)
    }

    /// Returns true if any layer above the given depth is cohesive
    pub fn has_cohesive_within(&self, depth: f64) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.z_top < depth && layer.soil_type.is_cohesive())
    }

    /// Returns the thickness-weighted average c_u (psf) of cohesive layers
    /// intersecting [0, depth], or None when no cohesive layer is present
    pub fn average_cu_within(&self, depth: f64) -> Option<f64> {
        let mut sum = 0.0;
        let mut total = 0.0;
        for layer in &self.layers {
            if !layer.soil_type.is_cohesive() {
                continue;
            }
            let top = layer.z_top;
            let bottom = f64::min(depth, layer.z_bottom());
            if bottom <= top {
                continue;
            }
            let dz = bottom - top;
            sum += layer.undrained_strength(&self.spt) * dz;
            total += dz;
        }
        if total > 0.0 {
            Some(sum / total)
        } else {
            None
        }
    }

    /// Returns the effective unit weight (pcf) of the layer at depth z
    pub fn effective_unit_weight_at(&self, z: f64) -> f64 {
        match self.layer_at(z) {
            Some(layer) => {
                let submerged = match self.water_table() {
                    Some(wt) => z >= wt,
                    None => false,
                };
                layer.effective_unit_weight(&self.spt, submerged)
            }
            None => 0.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SoilProfile;
    use crate::base::SoilType;
    use crate::soil::SoilLayer;
    use russell_lab::approx_eq;

    fn two_layer_profile() -> SoilProfile {
        let mut upper = SoilLayer::new(0.0, 5.0, SoilType::Sand);
        upper.gamma = Some(110.0);
        let mut lower = SoilLayer::new(5.0, 10.0, SoilType::Clay);
        lower.gamma = Some(120.0);
        lower.c_u = Some(800.0);
        SoilProfile::new(vec![upper, lower], Some(5.0)).unwrap()
    }

    #[test]
    fn validation_captures_errors() {
        assert_eq!(
            SoilProfile::new(vec![], None).err(),
            Some(crate::PileError::InvalidInput(
                "the profile must have at least one layer".to_string()
            ))
        );
        let floating = SoilLayer::new(2.0, 5.0, SoilType::Sand);
        assert!(SoilProfile::new(vec![floating], None).is_err());
        let a = SoilLayer::new(0.0, 5.0, SoilType::Sand);
        let gap = SoilLayer::new(6.0, 5.0, SoilType::Sand);
        assert!(SoilProfile::new(vec![a, gap], None).is_err());
        let mut bad_e50 = SoilLayer::new(0.0, 5.0, SoilType::Clay);
        bad_e50.epsilon_50 = Some(0.0);
        assert!(SoilProfile::new(vec![bad_e50], None).is_err());
    }

    #[test]
    fn stresses_are_monotone_and_bounded() {
        let profile = two_layer_profile();
        let mut prev_total = 0.0;
        let mut prev_eff = 0.0;
        for i in 0..=30 {
            let z = i as f64 * 0.5;
            let total = profile.total_stress_at(z);
            let eff = profile.effective_stress_at(z);
            assert!(total >= prev_total);
            assert!(eff >= prev_eff);
            assert!(eff <= total + 1e-12);
            assert!(eff >= 0.0);
            prev_total = total;
            prev_eff = eff;
        }
        // above the water table total and effective coincide
        approx_eq(profile.total_stress_at(4.0), 110.0 * 4.0, 1e-12);
        approx_eq(profile.effective_stress_at(4.0), 110.0 * 4.0, 1e-12);
        // below: σ'_v = σ_v − γ_w·(z − z_wt)
        approx_eq(
            profile.effective_stress_at(10.0),
            110.0 * 5.0 + 120.0 * 5.0 - 62.4 * 5.0,
            1e-12,
        );
    }

    #[test]
    fn layer_lookup_tie_breaks() {
        let profile = two_layer_profile();
        // interior boundary goes to the deeper layer
        assert_eq!(profile.layer_at(5.0).unwrap().soil_type, SoilType::Clay);
        // solver variant resolves upward
        assert_eq!(profile.layer_above(5.0).unwrap().soil_type, SoilType::Sand);
        // bottom of the profile belongs to the last layer
        assert_eq!(profile.layer_at(15.0).unwrap().soil_type, SoilType::Clay);
        assert_eq!(profile.layer_at(15.1), None);
        assert_eq!(profile.layer_at(-0.1), None);
    }

    #[test]
    fn water_table_above_surface_is_clamped() {
        let mut layer = SoilLayer::new(0.0, 10.0, SoilType::Sand);
        layer.gamma = Some(120.0);
        let ponded = SoilProfile::new(vec![layer.clone()], Some(-3.0)).unwrap();
        assert_eq!(ponded.water_table(), Some(0.0));
        // every depth is submerged
        approx_eq(ponded.effective_stress_at(10.0), (120.0 - 62.4) * 10.0, 1e-12);
    }

    #[test]
    fn water_table_below_toe_has_no_effect() {
        let mut layer = SoilLayer::new(0.0, 10.0, SoilType::Sand);
        layer.gamma = Some(120.0);
        let dry = SoilProfile::new(vec![layer.clone()], None).unwrap();
        let deep_wt = SoilProfile::new(vec![layer], Some(50.0)).unwrap();
        for i in 0..=20 {
            let z = i as f64 * 0.5;
            approx_eq(dry.effective_stress_at(z), deep_wt.effective_stress_at(z), 1e-12);
        }
    }

    #[test]
    fn split_layer_is_equivalent() {
        let mut single = SoilLayer::new(0.0, 10.0, SoilType::Sand);
        single.gamma = Some(115.0);
        single.n_spt = Some(15.0);
        let one = SoilProfile::new(vec![single.clone()], None).unwrap();

        let mut upper = single.clone();
        upper.thickness = 4.0;
        let mut lower = single;
        lower.z_top = 4.0;
        lower.thickness = 6.0;
        let two = SoilProfile::new(vec![upper, lower], None).unwrap();

        for i in 0..=20 {
            let z = i as f64 * 0.5;
            approx_eq(one.effective_stress_at(z), two.effective_stress_at(z), 1e-12);
            approx_eq(one.total_stress_at(z), two.total_stress_at(z), 1e-12);
        }
    }

    #[test]
    fn n1_60_applies_liao_whitman() {
        let profile = two_layer_profile();
        let mut layer = profile.layers[1].clone();
        layer.n_spt = Some(10.0);
        // σ'_v at mid-depth (10 ft) = 550 + 1200 − 62.4·5 = 1438 psf
        let n1 = {
            let mut p = profile.clone();
            p.layers[1] = layer;
            p.n1_60(&p.layers[1]).unwrap()
        };
        let c_n = f64::sqrt(2116.0 / 1438.0);
        approx_eq(n1, 6.0 * c_n, 1e-12);
    }

    #[test]
    fn average_cu_is_thickness_weighted() {
        let mut a = SoilLayer::new(0.0, 4.0, SoilType::Clay);
        a.c_u = Some(600.0);
        let mut b = SoilLayer::new(4.0, 4.0, SoilType::Sand);
        b.gamma = Some(110.0);
        let mut c = SoilLayer::new(8.0, 4.0, SoilType::Clay);
        c.c_u = Some(1200.0);
        let profile = SoilProfile::new(vec![a, b, c], None).unwrap();
        // within 10 ft: 4 ft at 600 + 2 ft at 1200 → 800
        approx_eq(profile.average_cu_within(10.0).unwrap(), 800.0, 1e-12);
        assert!(profile.has_cohesive_within(10.0));
        let sand_only = SoilProfile::new(vec![SoilLayer::new(0.0, 10.0, SoilType::Sand)], None).unwrap();
        assert_eq!(sand_only.average_cu_within(10.0), None);
    }
}
