use crate::base::{Control, PileType};
use crate::curves::{new_py_curve, PyContext, PyCurve, QzCurve, TzCurve};
use crate::soil::SoilProfile;
use crate::PileError;

/// Holds the nonlinear soil springs sampled at the solver nodes
///
/// Nodes land on depths i·dz below grade; a node exactly on a layer
/// interface takes the upper layer. The ground-surface node carries no
/// lateral spring.
pub struct NodeSprings {
    /// Lateral p-y curve per node (None at the surface)
    pub py: Vec<Option<Box<dyn PyCurve>>>,

    /// Shaft t-z curve per node (None at the surface)
    pub tz: Vec<Option<TzCurve>>,

    /// Tip q-z curve
    pub qz: Option<QzCurve>,
}

impl NodeSprings {
    /// Builds the lateral springs only (FDM solver)
    pub fn lateral_only(
        profile: &SoilProfile,
        b: f64,
        embedment: f64,
        n_nodes: usize,
        cyclic: bool,
    ) -> Result<Self, PileError> {
        let dz_ft = embedment / (n_nodes - 1) as f64;
        let mut py: Vec<Option<Box<dyn PyCurve>>> = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let z_ft = i as f64 * dz_ft;
            if z_ft <= 1e-3 {
                py.push(None);
                continue;
            }
            match profile.layer_above(z_ft) {
                Some(layer) => {
                    let ctx = PyContext::at_depth(profile, layer, z_ft, b, cyclic);
                    py.push(Some(new_py_curve(layer, profile, &ctx)?));
                }
                None => py.push(None),
            }
        }
        Ok(NodeSprings {
            py,
            tz: Vec::new(),
            qz: None,
        })
    }

    /// Builds the full spring set (BNWF solver)
    pub fn full(
        profile: &SoilProfile,
        b: f64,
        perimeter: f64,
        tip_area: f64,
        embedment: f64,
        n_nodes: usize,
        cyclic: bool,
        pile_type: PileType,
    ) -> Result<Self, PileError> {
        let mut springs = Self::lateral_only(profile, b, embedment, n_nodes, cyclic)?;
        let dz_ft = embedment / (n_nodes - 1) as f64;
        let mut tz: Vec<Option<TzCurve>> = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let z_ft = i as f64 * dz_ft;
            if z_ft <= 1e-3 {
                tz.push(None);
                continue;
            }
            match profile.layer_above(z_ft) {
                Some(layer) => tz.push(Some(TzCurve::new(profile, layer, z_ft, perimeter, b, pile_type))),
                None => tz.push(None),
            }
        }
        springs.tz = tz;
        springs.qz = QzCurve::new(profile, embedment, tip_area, b);
        Ok(springs)
    }

    /// Returns the number of nodes
    pub fn n_nodes(&self) -> usize {
        self.py.len()
    }

    /// Evaluates the lateral secant stiffness (lb/in²) at every node
    pub fn lateral_secants(&self, y: &[f64], k_out: &mut [f64]) {
        for (i, curve) in self.py.iter().enumerate() {
            k_out[i] = match curve {
                Some(c) => c.secant(y[i]),
                None => 0.0,
            };
        }
    }

    /// Evaluates the axial secant stiffness (lb/in²) at every node
    pub fn axial_secants(&self, u: &[f64], k_out: &mut [f64]) {
        for (i, curve) in self.tz.iter().enumerate() {
            k_out[i] = match curve {
                Some(c) => c.secant(u[i]),
                None => 0.0,
            };
        }
    }
}

/// Computes the relative displacement residual between iterates
///
/// R = max|y_new − y_old| / max(max|y_new|, y_ref)
pub fn displacement_residual(y_new: &[f64], y_old: &[f64], control: &Control) -> f64 {
    let mut max_change = 0.0_f64;
    let mut max_value = 0.0_f64;
    for i in 0..y_new.len() {
        max_change = max_change.max((y_new[i] - y_old[i]).abs());
        max_value = max_value.max(y_new[i].abs());
    }
    max_change / f64::max(max_value, control.y_reference)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
