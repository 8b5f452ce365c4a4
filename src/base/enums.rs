use serde::{Deserialize, Serialize};

/// Defines the soil classification of a layer
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SoilType {
    Sand,
    Clay,
    Silt,
    Gravel,
    Organic,
}

impl SoilType {
    /// Returns true for soils whose strength is undrained (governed by c_u)
    pub fn is_cohesive(&self) -> bool {
        matches!(self, SoilType::Clay | SoilType::Silt | SoilType::Organic)
    }
}

/// Selects the lateral soil-reaction (p-y) formulation of a layer
///
/// `Auto` resolves by soil type: Matlock soft clay for cohesive layers and
/// API sand for cohesionless layers. Model-specific parameters are carried
/// on the variant; generic overrides (ε₅₀, k) live on the layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PyModel {
    /// Resolve by soil type (cohesive → Matlock, cohesionless → API sand)
    Auto,

    /// Matlock (1970) soft clay with J = 0.5
    SoftClayMatlock,

    /// API RP 2A soft clay with a user-supplied J factor
    ApiSoftClayUserJ {
        jj: f64, // empirical factor, 0.25 (soft) to 0.5 (stiff)
    },

    /// Reese et al. (1975) stiff clay in the presence of free water
    StiffClayFreeWater,

    /// Welch-Reese (1972) stiff clay without free water
    StiffClayNoFreeWater,

    /// Brown (2002) modified stiff clay with an initial linear branch
    ModifiedStiffClay,

    /// Reese et al. (1974) sand with the A/B chart coefficients
    ReeseSand,

    /// API RP 2A / O'Neill sand (tanh form)
    ApiSand,

    /// API sand with a Hardin-Drnevich small-strain overlay
    SmallStrainSand {
        g_max: Option<f64>, // maximum shear modulus (psi); derived from K₂·√σ'ₘ when absent
    },

    /// Rollins et al. (2005) fully liquefied sand
    LiquefiedSandRollins,

    /// Minimum of Rollins and a residual-strength cyclic Matlock curve
    LiquefiedSandHybrid {
        cu_residual: f64, // residual undrained strength (psf), typically 100
    },

    /// Reese (1997) weak rock
    WeakRock {
        q_ur: f64,     // unconfined compressive strength of the rock mass (psi)
        e_ir: f64,     // initial modulus of the rock mass (psi)
        rqd: f64,      // rock quality designation (%)
        kappa_rm: f64, // strain factor ε_rm, typically 5e-4
    },

    /// Strong (vuggy) limestone; bilinear with p_u = b·s_u
    StrongRock {
        q_ur: f64, // unconfined compressive strength (psi)
    },

    /// Liang et al. (2009) massive rock via Hoek-Brown strength
    MassiveRock {
        sigma_ci: f64, // intact rock strength (psi)
        m_i: f64,      // Hoek-Brown material index
        gsi: f64,      // geological strength index (0-100)
        e_rock: f64,   // rock mass modulus (psi)
        poisson: f64,  // Poisson's ratio
    },

    /// Piedmont residual soil (0.85 on p_ult, ε₅₀ = 0.007)
    PiedmontResidual,

    /// Loess; CPT-based ultimate with hyperbolic modulus degradation
    Loess {
        q_c: Option<f64>, // cone resistance (psi); derived from c_u when absent
        n_cycles: f64,    // number of load cycles (1 for static)
    },

    /// Cemented c-φ silt combining frictional and cohesive resistance
    CementedSilt {
        cemented: bool, // adds the cohesive contribution to the initial stiffness
    },

    /// Unbounded elastic subgrade p = k·z·y
    ElasticSubgrade,

    /// Piecewise-linear user-supplied (y, p) pairs, flat beyond the last
    UserInput {
        points: Vec<(f64, f64)>, // (in, lb/in), sorted by y
    },
}

/// Defines the bending axis used for lateral analyses
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BendingAxis {
    Strong,
    Weak,
}

/// Defines the pile head restraint condition
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum HeadCondition {
    /// Applied shear and moment at the ground node
    Free,
    /// Applied shear with zero slope at the ground node
    Fixed,
}

/// Defines the pile installation method (drives resistance factors)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PileType {
    Driven,
    Drilled,
    Helical,
}

/// Selects the skin friction method for the axial kernel
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AxialMethod {
    /// Alpha for cohesive layers, beta for cohesionless layers
    Auto,
    Alpha,
    Beta,
    Meyerhof,
}

/// Defines the BNWF analysis mode
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BnwfMode {
    Static,
    PushoverLateral,
    PushoverAxial,
}

/// Selects the load combination family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CombinationMethod {
    Lrfd,
    Asd,
    Both,
}

/// Tracks the phase of an iterative solve
///
/// The BNWF solver reports every transition through the optional status
/// hook on [`super::Control`]; the final state is carried on the result
/// record. Fatal conditions surface as [`crate::PileError`] instead of a
/// status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SolveStatus {
    Idle,
    Assembling,
    Solving,
    Converged,
    NotConverged,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
