use super::{BendingAxis, BnwfMode, HeadCondition, PileType, SolveStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Defines the smallest allowed convergence tolerance (Control)
pub const CONTROL_MIN_TOL: f64 = 1e-12;

/// Defines the reference displacement (in) for the relative residual
pub const CONTROL_Y_REFERENCE: f64 = 1e-4;

/// Holds the options to control the iterative solvers
#[derive(Clone, Debug)]
pub struct Control {
    /// Maximum number of secant iterations
    pub n_max_iterations: usize,

    /// Relative tolerance on the displacement increment
    pub tol_rel_dy: f64,

    /// Reference displacement (in) used when displacements are near zero
    pub y_reference: f64,

    /// Smallest under-relaxation factor; 1.0 disables under-relaxation
    pub relax_min: f64,

    /// Verbose mode during iterations
    pub verbose_iterations: bool,

    /// Optional cancellation flag polled between iterations
    pub cancel_flag: Option<Arc<AtomicBool>>,

    /// Optional hook receiving solve-status transitions
    pub status_hook: Option<fn(SolveStatus)>,
}

impl Control {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Control {
            n_max_iterations: 200,
            tol_rel_dy: 1e-4,
            y_reference: CONTROL_Y_REFERENCE,
            relax_min: 0.5,
            verbose_iterations: false,
            cancel_flag: None,
            status_hook: None,
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.n_max_iterations < 1 {
            return Some("n_max_iterations must be ≥ 1".to_string());
        }
        if self.tol_rel_dy < CONTROL_MIN_TOL {
            return Some(format!(
                "tol_rel_dy = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_rel_dy, CONTROL_MIN_TOL
            ));
        }
        if self.relax_min <= 0.0 || self.relax_min > 1.0 {
            return Some(format!(
                "relax_min = {:?} is incorrect; it must be in (0.0, 1.0]",
                self.relax_min
            ));
        }
        if self.y_reference <= 0.0 {
            return Some(format!(
                "y_reference = {:?} is incorrect; it must be > 0.0",
                self.y_reference
            ));
        }
        None // all good
    }

    /// Returns true if the caller has signalled cancellation
    pub fn cancelled(&self) -> bool {
        match &self.cancel_flag {
            Some(flag) => flag.load(Ordering::Relaxed),
            None => false,
        }
    }

    /// Reports a solve-status transition to the optional hook
    pub fn report_status(&self, status: SolveStatus) {
        if let Some(hook) = self.status_hook {
            hook(status);
        }
    }

    /// Prints the table header for the iteration report
    pub fn print_header(&self) {
        if self.verbose_iterations {
            println!("{:>8} {:>13} {:>6}", "iter", "residual", "omega");
        }
    }

    /// Prints a line of the iteration report
    pub fn print_iteration(&self, it: usize, residual: f64, omega: f64) {
        if self.verbose_iterations {
            println!("{:>8} {:>13.6e} {:>6.3}", it, residual, omega);
        }
    }
}

/// Holds the configuration of a BNWF analysis
#[derive(Clone, Debug)]
pub struct BnwfConfig {
    /// Number of beam elements along the embedded length
    pub n_elements: usize,

    /// Bending axis selecting EI and the loaded pile width
    pub bending_axis: BendingAxis,

    /// Head restraint condition
    pub head_condition: HeadCondition,

    /// Use cyclic p-y curves
    pub cyclic: bool,

    /// Add the geometric (P-Δ) term to the lateral stencil
    pub include_p_delta: bool,

    /// Analysis mode (static or pushover)
    pub mode: BnwfMode,

    /// Number of pushover steps
    pub pushover_steps: usize,

    /// Pushover target multiplier on the input loads
    pub pushover_max_mult: f64,

    /// Extract the lowest lateral vibration modes
    pub run_modal: bool,

    /// Number of eigenvalues to report when `run_modal` is set
    pub n_modes: usize,

    /// Installation method (drives the t-z coefficients)
    pub pile_type: PileType,
}

impl BnwfConfig {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        BnwfConfig {
            n_elements: 50,
            bending_axis: BendingAxis::Strong,
            head_condition: HeadCondition::Free,
            cyclic: false,
            include_p_delta: true,
            mode: BnwfMode::Static,
            pushover_steps: 20,
            pushover_max_mult: 3.0,
            run_modal: false,
            n_modes: 3,
            pile_type: PileType::Driven,
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.n_elements < 4 {
            return Some(format!(
                "n_elements = {:?} is incorrect; it must be ≥ 4",
                self.n_elements
            ));
        }
        if self.pushover_steps < 1 {
            return Some("pushover_steps must be ≥ 1".to_string());
        }
        if self.pushover_max_mult <= 0.0 {
            return Some(format!(
                "pushover_max_mult = {:?} is incorrect; it must be > 0.0",
                self.pushover_max_mult
            ));
        }
        if self.run_modal && self.n_modes < 1 {
            return Some("n_modes must be ≥ 1 when run_modal is enabled".to_string());
        }
        None // all good
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
