//! Quadratic extension `Fp6[w] / (w^2 - v)`, the home of the pairing target group.

use crate::constants::frobenius_exponent;
use crate::error::Result;
use crate::field::{Field, Fp2, Fp6};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;

/// `c0 + c1 * w`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fp12 {
    pub c0: Fp6,
    pub c1: Fp6,
}

/// `gamma[k] = xi^(k(p-1)/6)` for `k = 0..6`, so that `(w^k)^p = gamma[k] * w^k`.
pub(crate) fn frobenius_coefficients() -> &'static [Fp2; 6] {
    static COEFFS: OnceLock<[Fp2; 6]> = OnceLock::new();
    COEFFS.get_or_init(|| {
        let g1 = Fp2::NONRESIDUE.pow(frobenius_exponent());
        let mut coeffs = [Fp2::ONE; 6];
        for k in 1..6 {
            coeffs[k] = coeffs[k - 1] * g1;
        }
        coeffs
    })
}

impl Fp12 {
    pub const ZERO: Self = Self::new(Fp6::ZERO, Fp6::ZERO);
    pub const ONE: Self = Self::new(Fp6::ONE, Fp6::ZERO);

    pub const fn new(c0: Fp6, c1: Fp6) -> Self {
        Self { c0, c1 }
    }

    /// `x -> x^(p^6)`; the inverse for elements of norm one.
    pub fn conjugate(&self) -> Self {
        Self::new(self.c0, -self.c1)
    }

    /// `x -> x^(p^power)`.
    pub fn frobenius_map(&self, power: usize) -> Self {
        let mut out = *self;
        for _ in 0..power % 12 {
            out = out.frobenius();
        }
        out
    }

    fn frobenius(&self) -> Self {
        let g = frobenius_coefficients();
        let a = &self.c0;
        let b = &self.c1;
        Self::new(
            Fp6::new(a.c0.conjugate(), a.c1.conjugate() * g[2], a.c2.conjugate() * g[4]),
            Fp6::new(b.c0.conjugate() * g[1], b.c1.conjugate() * g[3], b.c2.conjugate() * g[5]),
        )
    }
}

impl Field for Fp12 {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    fn square(&self) -> Self {
        // Complex squaring: (a + bw)^2 = (a^2 + v b^2) + 2ab w
        let ab = self.c0 * self.c1;
        let c0 = (self.c0 + self.c1) * (self.c0 + self.c1.mul_by_nonresidue())
            - ab
            - ab.mul_by_nonresidue();
        Self::new(c0, ab.double())
    }

    fn inverse(&self) -> Result<Self> {
        let den = self.c0.square() - self.c1.square().mul_by_nonresidue();
        let inv = den.inverse()?;
        Ok(Self::new(self.c0 * inv, -(self.c1 * inv)))
    }
}

impl Add for Fp12 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fp12 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Mul for Fp12 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Self::new(v0 + v1.mul_by_nonresidue(), c1)
    }
}

impl Neg for Fp12 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.c0, -self.c1)
    }
}

impl AddAssign for Fp12 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp12 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp12 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
