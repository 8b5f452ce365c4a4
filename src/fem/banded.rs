use crate::PileError;
use russell_lab::Vector;

/// Defines the pivot magnitude below which the factorization fails
pub const BANDED_MIN_PIVOT: f64 = 1e-30;

/// Holds a square banded matrix stored by rows of diagonals
///
/// The beam stencils produce systems with half-bandwidth 3 (lateral) or 1
/// (axial); entries outside the band are structurally zero. The solver is
/// a Gaussian elimination without pivoting, which is adequate for the
/// diagonally loaded systems assembled here and runs in O(n·hbw²) time.
pub struct BandedMatrix {
    n: usize,
    hbw: usize,
    data: Vec<f64>,
}

impl BandedMatrix {
    /// Allocates a new (zeroed) instance
    pub fn new(n: usize, hbw: usize) -> Self {
        BandedMatrix {
            n,
            hbw,
            data: vec![0.0; n * (2 * hbw + 1)],
        }
    }

    /// Returns the matrix dimension
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Zeroes all entries for reassembly
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        i * (2 * self.hbw + 1) + (j + self.hbw - i)
    }

    /// Adds a value to entry (i, j); (i, j) must be inside the band
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(j + self.hbw >= i && j <= i + self.hbw);
        let idx = self.idx(i, j);
        self.data[idx] += value;
    }

    /// Sets entry (i, j); (i, j) must be inside the band
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(j + self.hbw >= i && j <= i + self.hbw);
        let idx = self.idx(i, j);
        self.data[idx] = value;
    }

    /// Returns entry (i, j), or zero outside the band
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j + self.hbw < i || j > i + self.hbw {
            return 0.0;
        }
        self.data[self.idx(i, j)]
    }

    /// Solves A·x = rhs in place, destroying the matrix
    ///
    /// Returns the number of negative pivots encountered, which tracks the
    /// matrix inertia for positive-definiteness checks under P-Δ.
    pub fn solve_in_place(&mut self, rhs: &mut Vector) -> Result<usize, PileError> {
        let n = self.n;
        if rhs.dim() != n {
            return Err(PileError::InvalidInput(
                "rhs dimension does not match the matrix".to_string(),
            ));
        }
        let hbw = self.hbw;
        let mut negative_pivots = 0;

        // forward elimination
        for k in 0..n {
            let pivot = self.data[self.idx(k, k)];
            if pivot.abs() < BANDED_MIN_PIVOT {
                return Err(PileError::Singular(format!(
                    "zero pivot at equation {} of the banded system",
                    k
                )));
            }
            if pivot < 0.0 {
                negative_pivots += 1;
            }
            let i_max = usize::min(k + hbw, n - 1);
            for i in (k + 1)..=i_max {
                let factor = self.data[self.idx(i, k)] / pivot;
                if factor == 0.0 {
                    continue;
                }
                let j_max = usize::min(k + hbw, n - 1);
                for j in k..=j_max {
                    let akj = self.data[self.idx(k, j)];
                    let idx = self.idx(i, j);
                    self.data[idx] -= factor * akj;
                }
                rhs[i] -= factor * rhs[k];
            }
        }

        // back substitution
        for k in (0..n).rev() {
            let j_max = usize::min(k + hbw, n - 1);
            let mut sum = rhs[k];
            for j in (k + 1)..=j_max {
                sum -= self.data[self.idx(k, j)] * rhs[j];
            }
            rhs[k] = sum / self.data[self.idx(k, k)];
        }
        Ok(negative_pivots)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
