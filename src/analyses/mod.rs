//! Implements the top-level entry points composing the analysis components
//!
//! Every function validates its inputs before any solve begins and returns
//! an owned result record; notes on the records report method overrides,
//! cap saturations, and non-convergence.

use crate::axial::{compute_axial, AxialResult};
use crate::base::{
    asd_combinations, lrfd_combinations, AxialMethod, BendingAxis, BnwfConfig, CombinationMethod,
    Control, HeadCondition, LoadCase, LoadInput, PileType, SteelSection,
};
use crate::broms::{self, BromsResult};
use crate::fem::{solve_bnwf, solve_lateral, BnwfResult, LateralResult};
use crate::group::{group_reduction, GroupResult};
use crate::soil::SoilProfile;
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Holds the generated load-combination families
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationSet {
    pub lrfd: Option<Vec<LoadCase>>,
    pub asd: Option<Vec<LoadCase>>,
}

impl CombinationSet {
    /// Serializes the case families as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Computes the axial capacity of a single pile
///
/// The cyclic flag is accepted for interface symmetry; static capacity is
/// unaffected by it and a note records this when it is set.
pub fn axial_capacity(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    pile_type: PileType,
    method: AxialMethod,
    fs_compression: f64,
    fs_tension: f64,
    cyclic: bool,
) -> Result<AxialResult, PileError> {
    validate_profile(profile)?;
    let mut result = compute_axial(
        profile,
        section.perimeter(),
        section.tip_area(),
        embedment,
        method,
        pile_type,
        fs_compression,
        fs_tension,
    )?;
    if cyclic {
        result
            .notes
            .push("cyclic flag has no effect on static axial capacity".to_string());
    }
    Ok(result)
}

/// Runs the lateral finite-difference analysis of a single pile
pub fn lateral_analysis(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    bending_axis: BendingAxis,
    h_load: f64,
    m_ground: f64,
    head_condition: HeadCondition,
    cyclic: bool,
    control: &Control,
) -> Result<LateralResult, PileError> {
    validate_profile(profile)?;
    solve_lateral(
        profile,
        section.pile_width(bending_axis),
        section.bending_stiffness(bending_axis),
        section.yield_moment(bending_axis),
        embedment,
        h_load,
        m_ground,
        head_condition,
        cyclic,
        control,
        None,
    )
}

/// Runs the pile-group reduction analysis
pub fn group_analysis(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    n_rows: usize,
    n_cols: usize,
    spacing: f64,
    q_single_compression: f64,
) -> Result<GroupResult, PileError> {
    validate_profile(profile)?;
    if embedment <= 0.0 || embedment > profile.total_depth() {
        return Err(PileError::InvalidInput(format!(
            "embedment = {:?} is incorrect for a profile of depth {:?}",
            embedment,
            profile.total_depth()
        )));
    }
    group_reduction(
        profile,
        n_rows,
        n_cols,
        section.depth,
        spacing,
        embedment,
        q_single_compression,
    )
}

/// Runs the BNWF combined axial/lateral analysis
pub fn bnwf_analysis(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    v_axial: f64,
    h_lateral: f64,
    m_ground: f64,
    config: &BnwfConfig,
    control: &Control,
) -> Result<BnwfResult, PileError> {
    validate_profile(profile)?;
    solve_bnwf(profile, section, embedment, v_axial, h_lateral, m_ground, config, control)
}

/// Generates the ASCE 7-22 load combinations
pub fn load_combinations(loads: &LoadInput, method: CombinationMethod) -> CombinationSet {
    match method {
        CombinationMethod::Lrfd => CombinationSet {
            lrfd: Some(lrfd_combinations(loads)),
            asd: None,
        },
        CombinationMethod::Asd => CombinationSet {
            lrfd: None,
            asd: Some(asd_combinations(loads)),
        },
        CombinationMethod::Both => CombinationSet {
            lrfd: Some(lrfd_combinations(loads)),
            asd: Some(asd_combinations(loads)),
        },
    }
}

/// Runs the Broms closed-form lateral capacity check
pub fn broms_lateral(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    bending_axis: BendingAxis,
    lever_arm: f64,
) -> Result<BromsResult, PileError> {
    validate_profile(profile)?;
    broms::broms_lateral(
        profile,
        section.pile_width(bending_axis),
        embedment,
        section.yield_moment(bending_axis),
        lever_arm,
    )
}

fn validate_profile(profile: &SoilProfile) -> Result<(), PileError> {
    match profile.validate() {
        Some(msg) => Err(PileError::InvalidInput(msg)),
        None => Ok(()),
    }
}

// --- design sweep ---------------------------------------------------------

/// Holds the acceptance limits of a design sweep
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DesignLimits {
    /// Ground-line deflection limit (in)
    pub deflection_limit: f64,

    /// Structural demand-capacity limit on |M_max|/M_y
    pub dcr_limit: f64,

    /// ASD factors of safety applied to axial capacities
    pub fs_compression: f64,
    pub fs_tension: f64,
}

impl DesignLimits {
    /// Allocates a new instance with common solar-tracker limits
    pub fn new() -> Self {
        DesignLimits {
            deflection_limit: 1.0,
            dcr_limit: 1.0,
            fs_compression: 2.5,
            fs_tension: 3.0,
        }
    }
}

/// Holds one evaluated (section, embedment) candidate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepCandidate {
    pub section_name: String,
    pub embedment: f64,
    pub total_weight: f64, // plf × embedment (lb)
    pub axial_comp_dcr: f64,
    pub axial_tens_dcr: f64,
    pub lateral_dcr: f64,
    pub deflection: f64,
    pub passes: bool,
}

/// Holds the results of a design sweep
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub candidates: Vec<SweepCandidate>,
    /// Lightest passing candidate, if any
    pub optimal: Option<SweepCandidate>,
    pub notes: Vec<String>,
}

/// Sweeps sections × embedments against the governing load cases
///
/// The governing demands are the maxima of V_comp, V_tens, and (H_lat,
/// M_ground) over the supplied cases; each candidate is checked for axial
/// compression and tension, structural DCR, and ground-line deflection.
pub fn design_sweep(
    profile: &SoilProfile,
    sections: &[SteelSection],
    embedments: &[f64],
    cases: &[LoadCase],
    limits: &DesignLimits,
    control: &Control,
) -> Result<SweepResult, PileError> {
    validate_profile(profile)?;
    if sections.is_empty() || embedments.is_empty() {
        return Err(PileError::InvalidInput(
            "the sweep requires at least one section and one embedment".to_string(),
        ));
    }
    let mut notes: Vec<String> = Vec::new();
    let v_comp = cases.iter().map(|c| c.v_comp).fold(0.0, f64::max);
    let v_tens = cases.iter().map(|c| c.v_tens).fold(0.0, f64::max);
    let (h_gov, m_gov) = cases
        .iter()
        .map(|c| (c.h_lat, c.m_ground))
        .fold((0.0, 0.0), |acc: (f64, f64), c| {
            if c.0.abs() > acc.0.abs() {
                c
            } else {
                acc
            }
        });

    let mut candidates: Vec<SweepCandidate> = Vec::new();
    for section in sections {
        for &embedment in embedments {
            let axial = compute_axial(
                profile,
                section.perimeter(),
                section.tip_area(),
                embedment,
                AxialMethod::Auto,
                PileType::Driven,
                limits.fs_compression,
                limits.fs_tension,
            )?;
            let lateral = solve_lateral(
                profile,
                section.pile_width(BendingAxis::Strong),
                section.bending_stiffness(BendingAxis::Strong),
                section.yield_moment(BendingAxis::Strong),
                embedment,
                h_gov,
                m_gov,
                HeadCondition::Free,
                false,
                control,
                None,
            )?;
            let axial_comp_dcr = if axial.q_allow_compression > 0.0 {
                v_comp / axial.q_allow_compression
            } else {
                f64::INFINITY
            };
            let axial_tens_dcr = if axial.q_allow_tension > 0.0 {
                v_tens / axial.q_allow_tension
            } else if v_tens > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };
            let deflection = lateral.y_ground.abs();
            let passes = lateral.converged
                && axial_comp_dcr <= 1.0
                && axial_tens_dcr <= 1.0
                && lateral.dcr <= limits.dcr_limit
                && deflection <= limits.deflection_limit;
            candidates.push(SweepCandidate {
                section_name: section.name.clone(),
                embedment,
                total_weight: section.weight * embedment,
                axial_comp_dcr,
                axial_tens_dcr,
                lateral_dcr: lateral.dcr,
                deflection,
                passes,
            });
        }
    }
    let optimal = candidates
        .iter()
        .filter(|c| c.passes)
        .min_by(|a, b| a.total_weight.partial_cmp(&b.total_weight).unwrap())
        .cloned();
    let n_passing = candidates.iter().filter(|c| c.passes).count();
    notes.push(format!(
        "{} of {} candidates pass all checks",
        n_passing,
        candidates.len()
    ));
    if optimal.is_none() {
        notes.push("no candidate satisfies every limit".to_string());
    }
    Ok(SweepResult {
        candidates,
        optimal,
        notes,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
