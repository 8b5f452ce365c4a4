use super::{PyContext, PyCurve};
use crate::base::IN_PER_FT;

/// Implements the unbounded elastic subgrade reaction p = k·z·y
pub struct ElasticSubgrade {
    k_z: f64,
}

impl ElasticSubgrade {
    /// Allocates a new instance
    pub fn new(ctx: &PyContext, k: f64) -> Self {
        ElasticSubgrade {
            k_z: k * ctx.z_ft * IN_PER_FT,
        }
    }
}

impl PyCurve for ElasticSubgrade {
    fn p_positive(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return 0.0;
        }
        self.k_z * y
    }

    fn p_ult(&self) -> f64 {
        f64::INFINITY
    }

    fn name(&self) -> &'static str {
        "elastic subgrade"
    }
}

/// Implements a piecewise-linear user-supplied p-y curve
///
/// Interpolates the given (y, p) points and extrapolates flat beyond the
/// last point. Points must be sorted by y.
pub struct UserInputCurve {
    points: Vec<(f64, f64)>,
}

impl UserInputCurve {
    /// Allocates a new instance
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        UserInputCurve { points }
    }
}

impl PyCurve for UserInputCurve {
    fn p_positive(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return 0.0;
        }
        let first = self.points[0];
        if y <= first.0 {
            // proportional below the first point (anchored at the origin)
            if first.0 > 0.0 {
                return first.1 * y / first.0;
            }
            return first.1;
        }
        let last = self.points[self.points.len() - 1];
        if y >= last.0 {
            return last.1;
        }
        for pair in self.points.windows(2) {
            let (y0, p0) = pair[0];
            let (y1, p1) = pair[1];
            if y >= y0 && y <= y1 {
                return p0 + (p1 - p0) * (y - y0) / (y1 - y0);
            }
        }
        last.1
    }

    fn p_ult(&self) -> f64 {
        self.points
            .iter()
            .fold(0.0, |acc: f64, &(_, p)| acc.max(p))
    }

    fn name(&self) -> &'static str {
        "user-input"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ElasticSubgrade, UserInputCurve};
    use crate::curves::{PyContext, PyCurve};
    use russell_lab::approx_eq;

    #[test]
    fn elastic_subgrade_is_unbounded() {
        let ctx = PyContext {
            z_ft: 5.0,
            b: 6.0,
            gamma_eff: 110.0,
            sigma_v_eff: 550.0,
            submerged: false,
            cyclic: false,
        };
        let curve = ElasticSubgrade::new(&ctx, 50.0);
        approx_eq(curve.p_positive(0.1), 50.0 * 60.0 * 0.1, 1e-12);
        approx_eq(curve.p_positive(10.0), 100.0 * curve.p_positive(0.1), 1e-9);
        assert!(curve.p_ult().is_infinite());
    }

    #[test]
    fn user_curve_interpolates_and_extrapolates_flat() {
        let curve = UserInputCurve::new(vec![(0.0, 0.0), (0.1, 50.0), (0.5, 90.0)]);
        approx_eq(curve.p_positive(0.05), 25.0, 1e-12);
        approx_eq(curve.p_positive(0.3), 70.0, 1e-12);
        assert_eq!(curve.p_positive(2.0), 90.0);
        assert_eq!(curve.p_ult(), 90.0);
        // odd extension
        approx_eq(curve.resistance(-0.05), -25.0, 1e-12);
    }
}
