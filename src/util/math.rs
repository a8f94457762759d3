//! Complex arithmetic and small numeric helpers for the spectral filter.

use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul};

/// Complex number stored as a `(re, im)` pair of `f64`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// The additive identity.
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    /// Creates a complex number from its parts.
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `e^{i·theta} = cos(theta) + i·sin(theta)`.
    #[inline]
    pub fn cis(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }

    /// Returns the magnitude `sqrt(re² + im²)`.
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Complex) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

/// Returns `e^{sign·2πi·k/n}`, the k-th power of an n-th root of unity.
#[inline]
pub(crate) fn unit_root(k: usize, n: usize, sign: f64) -> Complex {
    Complex::cis(sign * 2.0 * PI * k as f64 / n as f64)
}

/// Returns `(-1)^(x + y)`.
#[inline]
pub(crate) fn checkerboard_sign(x: usize, y: usize) -> f64 {
    if (x + y) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}
