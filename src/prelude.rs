//! Makes available common structures needed to run an analysis
//!
//! You may write `use pilesim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::analyses::{
    axial_capacity, bnwf_analysis, broms_lateral, design_sweep, group_analysis, lateral_analysis,
    load_combinations, CombinationSet, DesignLimits, SweepResult,
};
pub use crate::axial::AxialResult;
pub use crate::base::{
    get_section, AxialMethod, BendingAxis, BnwfConfig, BnwfMode, CombinationMethod, Control,
    HeadCondition, LoadCase, LoadInput, PileType, PyModel, SoilType, SteelSection,
};
pub use crate::broms::BromsResult;
pub use crate::fem::{BnwfResult, LateralResult};
pub use crate::group::{GroupResult, RigidCapResult};
pub use crate::soil::{SoilLayer, SoilProfile, SptCorrections};
pub use crate::PileError;
