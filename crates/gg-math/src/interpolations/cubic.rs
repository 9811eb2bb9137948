//! Cubic Hermite interpolation.
//!
//! Both schemes here reduce to a slope `f'(xᵢ)` per node, after which the
//! piecewise polynomial is the same:
//!
//! - **Natural spline**: global C² fit, slopes from a tridiagonal system
//!   with zero curvature at both ends.
//! - **FritschButland**: local weighted harmonic mean giving
//!   monotone-preserving cubics.

use gg_core::{errors::Result, Real};

use super::{check_samples, locate, Interpolation1D};

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Piecewise cubic in the form `y_i + dx*(a_i + dx*(b_i + dx*c_i))`.
#[derive(Debug, Clone)]
struct Hermite {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
}

impl Hermite {
    /// Convert slopes `ts` + data into polynomial coefficients.
    fn new(xs: Vec<Real>, ys: Vec<Real>, ts: &[Real]) -> Self {
        let n = xs.len();
        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let dx = xs[i + 1] - xs[i];
            let s = (ys[i + 1] - ys[i]) / dx;
            a.push(ts[i]);
            b.push((3.0 * s - ts[i + 1] - 2.0 * ts[i]) / dx);
            c.push((ts[i + 1] + ts[i] - 2.0 * s) / (dx * dx));
        }
        Self { xs, ys, a, b, c }
    }

    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    fn second_derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        2.0 * self.b[i] + 6.0 * dx * self.c[i]
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

/// Secant slopes and interval widths.
fn secants(xs: &[Real], ys: &[Real]) -> (Vec<Real>, Vec<Real>) {
    let n = xs.len();
    let mut s = Vec::with_capacity(n - 1);
    let mut dx = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        dx.push(xs[i + 1] - xs[i]);
        s.push((ys[i + 1] - ys[i]) / dx[i]);
    }
    (s, dx)
}

macro_rules! impl_interpolation_via_hermite {
    ($ty:ty) => {
        impl Interpolation1D for $ty {
            fn value(&self, x: Real) -> Real {
                self.0.value(x)
            }
            fn derivative(&self, x: Real) -> Real {
                self.0.derivative(x)
            }
            fn second_derivative(&self, x: Real) -> Real {
                self.0.second_derivative(x)
            }
            fn x_min(&self) -> Real {
                self.0.x_min()
            }
            fn x_max(&self) -> Real {
                self.0.x_max()
            }
        }
    };
}

// ── Natural spline ────────────────────────────────────────────────────────────

/// Cubic spline with continuous second derivative.
#[derive(Debug, Clone)]
pub struct CubicSpline(Hermite);

impl CubicSpline {
    /// Natural spline (`f'' = 0` at both ends) through at least 2 points.
    pub fn natural(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_samples(xs, ys, 2)?;
        let n = xs.len();
        let (s, dx) = secants(xs, ys);

        // Slope equations:
        //   2 t0 + t1 = 3 s0
        //   dx[i] t[i-1] + 2 (dx[i-1] + dx[i]) t[i] + dx[i-1] t[i+1]
        //       = 3 (dx[i] s[i-1] + dx[i-1] s[i])
        //   t[n-2] + 2 t[n-1] = 3 s[n-2]
        let mut lower = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut upper = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        diag[0] = 2.0;
        upper[0] = 1.0;
        rhs[0] = 3.0 * s[0];
        for i in 1..n - 1 {
            lower[i] = dx[i];
            diag[i] = 2.0 * (dx[i - 1] + dx[i]);
            upper[i] = dx[i - 1];
            rhs[i] = 3.0 * (dx[i] * s[i - 1] + dx[i - 1] * s[i]);
        }
        lower[n - 1] = 1.0;
        diag[n - 1] = 2.0;
        rhs[n - 1] = 3.0 * s[n - 2];

        let ts = thomas(&lower, &diag, &upper, &rhs);
        Ok(Self(Hermite::new(xs.to_vec(), ys.to_vec(), &ts)))
    }
}

impl_interpolation_via_hermite!(CubicSpline);

/// Thomas algorithm for a diagonally dominant tridiagonal system.
fn thomas(lower: &[Real], diag: &[Real], upper: &[Real], rhs: &[Real]) -> Vec<Real> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut x = vec![0.0; n];
    let mut bet = diag[0];
    x[0] = rhs[0] / bet;
    for i in 1..n {
        c[i] = upper[i - 1] / bet;
        bet = diag[i] - lower[i] * c[i];
        x[i] = (rhs[i] - lower[i] * x[i - 1]) / bet;
    }
    for i in (0..n - 1).rev() {
        x[i] -= c[i + 1] * x[i + 1];
    }
    x
}

// ── FritschButland ────────────────────────────────────────────────────────────

/// Fritsch-Butland cubic interpolation (local, monotone-preserving).
///
/// Uses a weighted harmonic mean of adjacent secant slopes, producing a
/// C¹ interpolation that cannot introduce new extrema.
#[derive(Debug, Clone)]
pub struct FritschButlandCubic(Hermite);

impl FritschButlandCubic {
    /// Build a Fritsch-Butland cubic interpolation.
    ///
    /// Requires at least 3 points (uses parabolic boundary formulas).
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_samples(xs, ys, 3)?;
        let n = xs.len();
        let (s, dx) = secants(xs, ys);

        let mut ts = vec![0.0; n];
        for i in 1..n - 1 {
            let s_min = s[i - 1].min(s[i]);
            let s_max = s[i - 1].max(s[i]);
            // secants of one strict sign never cancel in the denominator
            ts[i] = if s_min * s_max <= 0.0 {
                0.0
            } else {
                3.0 * s_min * s_max / (s_max + 2.0 * s_min)
            };
        }

        ts[0] = ((2.0 * dx[0] + dx[1]) * s[0] - dx[0] * s[1]) / (dx[0] + dx[1]);
        ts[n - 1] = ((2.0 * dx[n - 2] + dx[n - 3]) * s[n - 2] - dx[n - 2] * s[n - 3])
            / (dx[n - 2] + dx[n - 3]);
        clip_end_slopes(&mut ts, &s);

        Ok(Self(Hermite::new(xs.to_vec(), ys.to_vec(), &ts)))
    }
}

impl_interpolation_via_hermite!(FritschButlandCubic);

/// Hyman correction on the end slopes: same sign as the adjacent secant,
/// magnitude at most `3 |S|`.
fn clip_end_slopes(ts: &mut [Real], s: &[Real]) {
    let n = ts.len();
    for (t, sec) in [(0, s[0]), (n - 1, s[n - 2])] {
        if ts[t] * sec <= 0.0 {
            ts[t] = 0.0;
        } else if ts[t].abs() > 3.0 * sec.abs() {
            ts[t] = ts[t].signum() * 3.0 * sec.abs();
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spline_reproduces_nodes_and_lines() {
        let xs = [0.0, 0.5, 1.5, 2.0];
        let ys = [1.0, 2.0, 4.0, 5.0];
        let sp = CubicSpline::natural(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_abs_diff_eq!(sp.value(*x), *y, epsilon = 1e-14);
        }
        // data on a straight line: spline is the line
        assert_abs_diff_eq!(sp.value(1.0), 3.0, epsilon = 1e-13);
        assert_abs_diff_eq!(sp.derivative(0.7), 2.0, epsilon = 1e-13);
        assert_abs_diff_eq!(sp.second_derivative(1.2), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn spline_with_two_points_is_linear() {
        let sp = CubicSpline::natural(&[0.0, 2.0], &[1.0, 3.0]).unwrap();
        assert_abs_diff_eq!(sp.value(0.5), 1.5, epsilon = 1e-14);
    }

    #[test]
    fn spline_is_accurate_on_smooth_data() {
        let xs: Vec<Real> = (0..41).map(|i| -2.0 + 0.1 * i as Real).collect();
        let ys: Vec<Real> = xs.iter().map(|x| x.sin()).collect();
        let sp = CubicSpline::natural(&xs, &ys).unwrap();
        for &x in &[-0.33, 0.0, 0.41, 1.07] {
            assert_abs_diff_eq!(sp.value(x), Real::sin(x), epsilon = 1e-5);
        }
        // natural end conditions
        assert_abs_diff_eq!(sp.second_derivative(-2.0), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(sp.second_derivative(2.0), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn fritsch_butland_is_monotone() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.1, 0.2, 5.0, 5.1];
        let fb = FritschButlandCubic::new(&xs, &ys).unwrap();
        let mut prev = fb.value(0.0);
        for i in 1..=400 {
            let y = fb.value(i as Real * 0.01);
            assert!(y >= prev - 1e-12, "not monotone at {}", i as Real * 0.01);
            prev = y;
        }
    }

    #[test]
    fn fritsch_butland_is_scale_invariant() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.1, 0.2, 5.0, 5.1];
        let scale = 1e-35;
        let small: Vec<Real> = ys.iter().map(|y| y * scale).collect();
        let fb = FritschButlandCubic::new(&xs, &ys).unwrap();
        let tiny = FritschButlandCubic::new(&xs, &small).unwrap();
        for i in 0..=40 {
            let x = i as Real * 0.1;
            assert_abs_diff_eq!(tiny.value(x) / scale, fb.value(x), epsilon = 1e-10);
            assert_abs_diff_eq!(tiny.derivative(x) / scale, fb.derivative(x), epsilon = 1e-10);
        }
    }

    #[test]
    fn fritsch_butland_needs_three_points() {
        assert!(FritschButlandCubic::new(&[0.0, 1.0], &[0.0, 1.0]).is_err());
    }
}
