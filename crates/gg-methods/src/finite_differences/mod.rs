//! Tridiagonal operators for the finite-difference rollback schemes.
//!
//! * [`TridiagonalOperator`]: tridiagonal matrix with `apply` and a
//!   one-shot Thomas solve
//! * [`TridiagonalSolver`]: the same matrix factorized once, for repeated
//!   solves against many right-hand sides
//! * [`second_difference`]: the `v[i-1] - 2 v[i] + v[i+1]` stencil with
//!   the flat-extension boundary rule

use gg_core::{ensure, ensure_size, errors::Result, Real};

// ─── Tridiagonal operator ─────────────────────────────────────────────────────

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n-2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// `I - c·Δ²` on the interior rows, identity on the first and last row.
    ///
    /// This is the implicit operator of the heat equation whose boundary
    /// nodes are held by the flat extension of the grid.
    pub fn implicit_heat(n: usize, c: Real) -> Self {
        let mut op = Self::new(n);
        for i in 0..n {
            op.diag[i] = 1.0;
        }
        for i in 1..n.saturating_sub(1) {
            op.lower[i] = -c;
            op.diag[i] = 1.0 + 2.0 * c;
            op.upper[i] = -c;
        }
        op
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    ///
    /// # Errors
    /// `Size` if `x` does not have one entry per row.
    pub fn apply(&self, x: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        ensure_size!(x.len() == n, "operator has {n} rows, vector has {}", x.len());
        match n {
            0 => return Ok(Vec::new()),
            1 => return Ok(vec![self.diag[0] * x[0]]),
            _ => {}
        }
        let mut y = vec![0.0; n];
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        Ok(y)
    }

    /// Factorize for repeated solves.
    ///
    /// # Errors
    /// `Precondition` if a zero pivot is met.
    pub fn factorize(&self) -> Result<TridiagonalSolver> {
        let n = self.size();
        let mut c_prime = vec![0.0; n];
        let mut pivot = vec![0.0; n];
        if n == 0 {
            return Ok(TridiagonalSolver {
                lower: Vec::new(),
                c_prime,
                pivot,
            });
        }
        pivot[0] = self.diag[0];
        ensure!(pivot[0] != 0.0, "zero pivot in row 0");
        for i in 1..n {
            c_prime[i - 1] = self.upper[i - 1] / pivot[i - 1];
            pivot[i] = self.diag[i] - self.lower[i] * c_prime[i - 1];
            ensure!(pivot[i] != 0.0, "zero pivot in row {i}");
        }
        Ok(TridiagonalSolver {
            lower: self.lower.clone(),
            c_prime,
            pivot,
        })
    }

    /// Solve `A · x = rhs` using the Thomas algorithm.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        let mut x = rhs.to_vec();
        self.factorize()?.solve_in_place(&mut x)?;
        Ok(x)
    }
}

/// LU factors of a [`TridiagonalOperator`].
#[derive(Debug, Clone)]
pub struct TridiagonalSolver {
    lower: Vec<Real>,
    c_prime: Vec<Real>,
    pivot: Vec<Real>,
}

impl TridiagonalSolver {
    /// Size of the factorized system.
    pub fn size(&self) -> usize {
        self.pivot.len()
    }

    /// Overwrite `x` (the right-hand side) with the solution.
    pub fn solve_in_place(&self, x: &mut [Real]) -> Result<()> {
        let n = self.size();
        ensure_size!(x.len() == n, "system has {n} rows, rhs has {}", x.len());
        if n == 0 {
            return Ok(());
        }
        x[0] /= self.pivot[0];
        for i in 1..n {
            x[i] = (x[i] - self.lower[i] * x[i - 1]) / self.pivot[i];
        }
        for i in (0..n - 1).rev() {
            x[i] -= self.c_prime[i] * x[i + 1];
        }
        Ok(())
    }
}

// ─── Stencils ─────────────────────────────────────────────────────────────────

/// Write `v[i-1] - 2 v[i] + v[i+1]` into `out` for the interior nodes and
/// copy the nearest interior value onto both boundary nodes.
///
/// Both slices must have the same length of at least 3.
pub fn second_difference(v: &[Real], out: &mut [Real]) {
    let n = v.len();
    debug_assert!(n >= 3 && out.len() == n);
    for i in 1..n - 1 {
        out[i] = v[i - 1] - 2.0 * v[i] + v[i + 1];
    }
    out[0] = out[1];
    out[n - 1] = out[n - 2];
}

// ─── Tests ────────────────────────────────────────────────────────────────────
