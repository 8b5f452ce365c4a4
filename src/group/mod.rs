//! Implements pile-group efficiency, p-multipliers, block failure, and
//! rigid-cap load distribution

use crate::base::interp_table;
use crate::soil::SoilProfile;
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Holds the p-multiplier assigned to one row of a lateral pile group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowMultiplier {
    pub row: usize,      // 1-based, row 1 leads
    pub position: String,
    pub f_m: f64,
}

/// Holds the results of a pile-group analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    pub n_piles: usize,
    pub n_rows: usize,
    pub n_cols: usize,
    pub spacing: f64,   // center-to-center (in)
    pub s_over_d: f64,
    pub eta_axial: f64,           // Converse-Labarre efficiency
    pub q_group_individual: f64,  // η·n·Q_single (lb)
    pub q_block: Option<f64>,     // cohesive block failure capacity (lb)
    pub q_group_governing: f64,   // min of the above (lb)
    pub p_multipliers: Vec<RowMultiplier>,
    pub eta_lateral: f64, // mean p-multiplier over all piles
    pub notes: Vec<String>,
}

/// Returns the Converse-Labarre group efficiency factor
///
/// η = 1 − arctan(d/s)·[(n₁−1)·n₂ + (n₂−1)·n₁]/(90·n₁·n₂), with the
/// angle in degrees; clamped to [0, 1].
pub fn converse_labarre(n_rows: usize, n_cols: usize, pile_width: f64, spacing: f64) -> f64 {
    if spacing <= 0.0 || n_rows == 0 || n_cols == 0 {
        return 1.0;
    }
    let theta = f64::atan(pile_width / spacing).to_degrees();
    let (n1, n2) = (n_cols as f64, n_rows as f64);
    let eta = 1.0 - theta * ((n1 - 1.0) * n2 + (n2 - 1.0) * n1) / (90.0 * n1 * n2);
    eta.clamp(0.0, 1.0)
}

/// Returns the p-multipliers per row (Brown et al.), interpolated in s/d
///
/// Knots at s/d = {3, 5, 8}: lead row {0.80, 0.90, 1.00}, second row
/// {0.40, 0.60, 1.00}, third and beyond {0.30, 0.50, 1.00}.
pub fn p_multipliers(n_rows: usize, s_over_d: f64) -> Vec<RowMultiplier> {
    const LEAD: [(f64, f64); 3] = [(3.0, 0.80), (5.0, 0.90), (8.0, 1.00)];
    const SECOND: [(f64, f64); 3] = [(3.0, 0.40), (5.0, 0.60), (8.0, 1.00)];
    const THIRD_PLUS: [(f64, f64); 3] = [(3.0, 0.30), (5.0, 0.50), (8.0, 1.00)];
    let mut out = Vec::with_capacity(n_rows);
    for row in 1..=n_rows {
        let (f_m, position) = match row {
            1 => (interp_table(&LEAD, s_over_d), "lead".to_string()),
            2 => (interp_table(&SECOND, s_over_d), "2nd row".to_string()),
            _ => (interp_table(&THIRD_PLUS, s_over_d), format!("row {}", row)),
        };
        out.push(RowMultiplier { row, position, f_m });
    }
    out
}

/// Returns the cohesive block failure capacity (lb)
///
/// Q_block = 2·(B_g + L_g)·D·c̄_u + B_g·L_g·N_c·c_u_base with
/// N_c = min(5·(1 + 0.2·B_g/L_g)·(1 + 0.2·D/B_g), 9).
pub fn block_failure_cohesive(
    n_rows: usize,
    n_cols: usize,
    spacing: f64,
    pile_width: f64,
    embedment: f64,
    cu_avg: f64,
    cu_base: f64,
) -> f64 {
    let s_ft = spacing / 12.0;
    let d_ft = pile_width / 12.0;
    let b_g = (n_cols as f64 - 1.0) * s_ft + d_ft;
    let l_g = (n_rows as f64 - 1.0) * s_ft + d_ft;
    let q_side = 2.0 * (b_g + l_g) * embedment * cu_avg;
    let n_c = f64::min(5.0 * (1.0 + 0.2 * b_g / l_g) * (1.0 + 0.2 * embedment / b_g), 9.0);
    let q_base = b_g * l_g * n_c * cu_base;
    q_side + q_base
}

/// Performs a complete pile-group reduction analysis
pub fn group_reduction(
    profile: &SoilProfile,
    n_rows: usize,
    n_cols: usize,
    pile_width: f64,
    spacing: f64,
    embedment: f64,
    q_single_compression: f64,
) -> Result<GroupResult, PileError> {
    let n_piles = n_rows * n_cols;
    if n_piles == 0 {
        return Err(PileError::InvalidInput(
            "the group must contain at least one pile".to_string(),
        ));
    }
    if n_piles > 1 && spacing < crate::base::MIN_GROUP_SPACING {
        return Err(PileError::InvalidInput(format!(
            "spacing = {:?} in is incorrect; it must be ≥ {} in",
            spacing,
            crate::base::MIN_GROUP_SPACING
        )));
    }
    if pile_width <= 0.0 {
        return Err(PileError::InvalidInput(
            "pile width must be > 0.0".to_string(),
        ));
    }
    let mut notes: Vec<String> = Vec::new();
    let s_over_d = spacing / pile_width;

    let eta = converse_labarre(n_rows, n_cols, pile_width, spacing);
    let q_individual = eta * n_piles as f64 * q_single_compression;
    notes.push(format!("Converse-Labarre η = {:.3}", eta));

    // block failure applies when a cohesive layer lies within the embedment
    let q_block = match profile.average_cu_within(embedment) {
        Some(cu_avg) => {
            let cu_base = profile
                .layer_at(f64::max(embedment - 0.1, 0.0))
                .filter(|layer| layer.soil_type.is_cohesive())
                .map(|layer| layer.undrained_strength(&profile.spt))
                .unwrap_or(cu_avg);
            let q = block_failure_cohesive(n_rows, n_cols, spacing, pile_width, embedment, cu_avg, cu_base);
            notes.push(format!("block failure capacity = {:.0} lb", q));
            Some(q)
        }
        None => None,
    };

    let q_governing = match q_block {
        Some(q) if q < q_individual => {
            notes.push("block failure governs".to_string());
            q
        }
        Some(_) => {
            notes.push("individual pile failure governs".to_string());
            q_individual
        }
        None => q_individual,
    };

    let pm = p_multipliers(n_rows, s_over_d);
    let eta_lateral = pm.iter().map(|r| r.f_m * n_cols as f64).sum::<f64>() / n_piles as f64;
    notes.push(format!("average lateral p-multiplier = {:.3}", eta_lateral));
    if s_over_d < 3.0 {
        notes.push("s/d < 3: below the minimum recommended spacing".to_string());
    } else if s_over_d >= 8.0 {
        notes.push("s/d ≥ 8: group effects are negligible".to_string());
    }

    Ok(GroupResult {
        n_piles,
        n_rows,
        n_cols,
        spacing,
        s_over_d,
        eta_axial: eta,
        q_group_individual: q_individual,
        q_block,
        q_group_governing: q_governing,
        p_multipliers: pm,
        eta_lateral,
        notes,
    })
}

// --- rigid-cap load distribution -----------------------------------------

/// Holds one pile position in plan (ft)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PileLocation {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

/// Holds one load application point on the cap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    pub x: f64,   // ft
    pub y: f64,   // ft
    pub v: f64,   // lb, positive compression
    pub m_x: f64, // ft·lb about the x axis
    pub m_y: f64, // ft·lb about the y axis
}

/// Holds the computed reaction at one pile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PileReaction {
    pub pile_id: usize,
    pub p_axial: f64,     // lb, positive compression
    pub utilization: f64, // demand over capacity
    pub governs: bool,
}

/// Holds the results of a rigid-cap distribution analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidCapResult {
    pub n_piles: usize,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub eccentricity_x: f64,
    pub eccentricity_y: f64,
    pub v_total: f64,
    pub m_x_total: f64,
    pub m_y_total: f64,
    pub reactions: Vec<PileReaction>,
    pub p_max: f64, // max compression (lb)
    pub p_min: f64, // max tension as a negative value (lb)
    pub max_utilization: f64,
    pub all_piles_ok: bool,
    pub notes: Vec<String>,
}

/// Generates a rectangular grid of pile positions
pub fn generate_pile_grid(n_rows: usize, n_cols: usize, x_spacing: f64, y_spacing: f64) -> Vec<PileLocation> {
    let mut piles = Vec::with_capacity(n_rows * n_cols);
    let mut id = 1;
    for row in 0..n_rows {
        for col in 0..n_cols {
            piles.push(PileLocation {
                id,
                x: col as f64 * x_spacing,
                y: row as f64 * y_spacing,
            });
            id += 1;
        }
    }
    piles
}

/// Distributes cap loads to individual piles assuming a rigid cap
///
/// P_i = V/n + M_x·y_i/Σy_j² + M_y·x_i/Σx_j² with coordinates measured
/// from the pile-group centroid. Moments include the V·e transfer from
/// the load centroid.
pub fn rigid_cap_distribution(
    piles: &[PileLocation],
    loads: &[LoadPoint],
    q_capacity_compression: f64,
    q_capacity_tension: f64,
) -> Result<RigidCapResult, PileError> {
    let n = piles.len();
    if n == 0 {
        return Err(PileError::InvalidInput("no piles defined".to_string()));
    }
    let mut notes: Vec<String> = Vec::new();

    let cx = piles.iter().map(|p| p.x).sum::<f64>() / n as f64;
    let cy = piles.iter().map(|p| p.y).sum::<f64>() / n as f64;
    let xi: Vec<f64> = piles.iter().map(|p| p.x - cx).collect();
    let yi: Vec<f64> = piles.iter().map(|p| p.y - cy).collect();
    let sum_x2: f64 = xi.iter().map(|x| x * x).sum();
    let sum_y2: f64 = yi.iter().map(|y| y * y).sum();

    let v_total: f64 = loads.iter().map(|l| l.v).sum();
    let (load_cx, load_cy) = if v_total.abs() > 0.0 {
        (
            loads.iter().map(|l| l.v * l.x).sum::<f64>() / v_total,
            loads.iter().map(|l| l.v * l.y).sum::<f64>() / v_total,
        )
    } else if !loads.is_empty() {
        (
            loads.iter().map(|l| l.x).sum::<f64>() / loads.len() as f64,
            loads.iter().map(|l| l.y).sum::<f64>() / loads.len() as f64,
        )
    } else {
        (cx, cy)
    };
    let ex = load_cx - cx;
    let ey = load_cy - cy;
    let m_x_total: f64 = loads.iter().map(|l| l.m_x).sum::<f64>() + v_total * ey;
    let m_y_total: f64 = loads.iter().map(|l| l.m_y).sum::<f64>() + v_total * ex;
    if ex.abs() > 1e-3 || ey.abs() > 1e-3 {
        notes.push(format!("load eccentricity e_x = {:.3} ft, e_y = {:.3} ft", ex, ey));
    }

    let mut reactions: Vec<PileReaction> = Vec::with_capacity(n);
    for i in 0..n {
        let mut p = v_total / n as f64;
        if sum_y2 > 1e-9 {
            p += m_x_total * yi[i] / sum_y2;
        }
        if sum_x2 > 1e-9 {
            p += m_y_total * xi[i] / sum_x2;
        }
        let utilization = if p >= 0.0 && q_capacity_compression > 0.0 {
            p / q_capacity_compression
        } else if p < 0.0 && q_capacity_tension > 0.0 {
            -p / q_capacity_tension
        } else {
            0.0
        };
        reactions.push(PileReaction {
            pile_id: piles[i].id,
            p_axial: p,
            utilization,
            governs: false,
        });
    }
    let mut i_gov = 0;
    for i in 1..n {
        if reactions[i].p_axial.abs() > reactions[i_gov].p_axial.abs() {
            i_gov = i;
        }
    }
    reactions[i_gov].governs = true;
    let p_max = reactions.iter().map(|r| r.p_axial).fold(f64::NEG_INFINITY, f64::max);
    let p_min = reactions.iter().map(|r| r.p_axial).fold(f64::INFINITY, f64::min);
    let max_utilization = reactions.iter().map(|r| r.utilization).fold(0.0, f64::max);
    let all_piles_ok = reactions.iter().all(|r| r.utilization <= 1.0);
    if p_max > 0.0 {
        notes.push(format!("max compression = {:.0} lb (pile {})", p_max, reactions[i_gov].pile_id));
    }
    if p_min < 0.0 {
        notes.push(format!("max tension = {:.0} lb", -p_min));
    }

    Ok(RigidCapResult {
        n_piles: n,
        centroid_x: cx,
        centroid_y: cy,
        eccentricity_x: ex,
        eccentricity_y: ey,
        v_total,
        m_x_total,
        m_y_total,
        reactions,
        p_max,
        p_min,
        max_utilization,
        all_piles_ok,
        notes,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{
        block_failure_cohesive, converse_labarre, generate_pile_grid, group_reduction, p_multipliers,
        rigid_cap_distribution, LoadPoint,
    };
    use crate::base::SoilType;
    use crate::soil::{SoilLayer, SoilProfile};
    use russell_lab::approx_eq;

    #[test]
    fn converse_labarre_limits() {
        // widely spaced piles approach full efficiency
        let eta_far = converse_labarre(2, 2, 0.001, 36.0);
        assert!(eta_far > 0.999);
        // any finite d/s reduces efficiency
        assert!(converse_labarre(2, 2, 6.0, 36.0) < 1.0);
        // single pile is unaffected
        assert_eq!(converse_labarre(1, 1, 6.0, 36.0), 1.0);
    }

    #[test]
    fn p_multipliers_interpolate_by_row() {
        let pm = p_multipliers(4, 3.0);
        assert_eq!(pm[0].f_m, 0.80);
        assert_eq!(pm[1].f_m, 0.40);
        assert_eq!(pm[2].f_m, 0.30);
        assert_eq!(pm[3].f_m, 0.30);
        let pm = p_multipliers(3, 6.5);
        approx_eq(pm[0].f_m, 0.95, 1e-12);
        approx_eq(pm[1].f_m, 0.80, 1e-12);
        approx_eq(pm[2].f_m, 0.75, 1e-12);
        let pm = p_multipliers(3, 10.0);
        for row in &pm {
            assert_eq!(row.f_m, 1.0);
        }
    }

    #[test]
    fn block_failure_formula_works() {
        // 2x2 at 36 in, 6 in piles, 12 ft embedment, c_u = 1200 psf
        let q = block_failure_cohesive(2, 2, 36.0, 6.0, 12.0, 1200.0, 1200.0);
        let b_g: f64 = 3.5;
        let l_g: f64 = 3.5;
        let n_c = f64::min(5.0 * (1.0 + 0.2) * (1.0 + 0.2 * 12.0 / b_g), 9.0);
        let expected = 2.0 * (b_g + l_g) * 12.0 * 1200.0 + b_g * l_g * n_c * 1200.0;
        approx_eq(q, expected, 1e-9);
    }

    #[test]
    fn group_reduction_governs_correctly() {
        let mut clay = SoilLayer::new(0.0, 12.0, SoilType::Clay);
        clay.c_u = Some(1200.0);
        clay.gamma = Some(115.0);
        let profile = SoilProfile::new(vec![clay], None).unwrap();
        let result = group_reduction(&profile, 2, 2, 5.9, 36.0, 12.0, 30_000.0).unwrap();
        assert_eq!(result.n_piles, 4);
        assert!(result.eta_axial > 0.85 && result.eta_axial < 0.95);
        assert!(result.q_block.is_some());
        let q_ind = result.q_group_individual;
        let q_block = result.q_block.unwrap();
        approx_eq(result.q_group_governing, f64::min(q_ind, q_block), 1e-9);
        // spacing guard
        assert!(group_reduction(&profile, 2, 2, 5.9, 4.0, 12.0, 30_000.0).is_err());
        // sand-only profile skips block failure
        let sand = SoilProfile::new(vec![SoilLayer::new(0.0, 12.0, SoilType::Sand)], None).unwrap();
        let result = group_reduction(&sand, 2, 2, 5.9, 36.0, 12.0, 30_000.0).unwrap();
        assert_eq!(result.q_block, None);
        approx_eq(result.q_group_governing, result.q_group_individual, 1e-9);
    }

    #[test]
    fn rigid_cap_distributes_concentric_load_evenly() {
        let piles = generate_pile_grid(2, 2, 6.0, 6.0);
        let loads = vec![LoadPoint {
            x: 3.0,
            y: 3.0,
            v: 4000.0,
            m_x: 0.0,
            m_y: 0.0,
        }];
        let result = rigid_cap_distribution(&piles, &loads, 2000.0, 1000.0).unwrap();
        for r in &result.reactions {
            approx_eq(r.p_axial, 1000.0, 1e-9);
            approx_eq(r.utilization, 0.5, 1e-12);
        }
        assert!(result.all_piles_ok);
    }

    #[test]
    fn rigid_cap_handles_eccentricity() {
        let piles = generate_pile_grid(1, 2, 10.0, 0.0);
        // load over the right pile: it takes everything
        let loads = vec![LoadPoint {
            x: 10.0,
            y: 0.0,
            v: 1000.0,
            m_x: 0.0,
            m_y: 0.0,
        }];
        let result = rigid_cap_distribution(&piles, &loads, 2000.0, 1000.0).unwrap();
        approx_eq(result.eccentricity_x, 5.0, 1e-12);
        let right = result.reactions.iter().find(|r| r.pile_id == 2).unwrap();
        approx_eq(right.p_axial, 1000.0, 1e-9);
        let left = result.reactions.iter().find(|r| r.pile_id == 1).unwrap();
        approx_eq(left.p_axial, 0.0, 1e-9);
        assert!(right.governs);
    }
}
