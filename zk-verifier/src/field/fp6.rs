//! Cubic extension `Fp2[v] / (v^3 - xi)`.

use crate::error::Result;
use crate::field::{Field, Fp2};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// `c0 + c1 * v + c2 * v^2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fp6 {
    pub c0: Fp2,
    pub c1: Fp2,
    pub c2: Fp2,
}

impl Fp6 {
    pub const ZERO: Self = Self::new(Fp2::ZERO, Fp2::ZERO, Fp2::ZERO);
    pub const ONE: Self = Self::new(Fp2::ONE, Fp2::ZERO, Fp2::ZERO);

    pub const fn new(c0: Fp2, c1: Fp2, c2: Fp2) -> Self {
        Self { c0, c1, c2 }
    }

    /// Multiplication by `v`.
    pub fn mul_by_nonresidue(&self) -> Self {
        Self::new(self.c2.mul_by_nonresidue(), self.c0, self.c1)
    }
}

impl Field for Fp6 {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero() && self.c2.is_zero()
    }

    fn double(&self) -> Self {
        Self::new(self.c0.double(), self.c1.double(), self.c2.double())
    }

    fn inverse(&self) -> Result<Self> {
        let t0 = self.c0.square() - (self.c1 * self.c2).mul_by_nonresidue();
        let t1 = self.c2.square().mul_by_nonresidue() - self.c0 * self.c1;
        let t2 = self.c1.square() - self.c0 * self.c2;
        let den = self.c0 * t0 + (self.c2 * t1 + self.c1 * t2).mul_by_nonresidue();
        let inv = den.inverse()?;
        Ok(Self::new(t0 * inv, t1 * inv, t2 * inv))
    }
}

impl Add for Fp6 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl Sub for Fp6 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl Mul for Fp6 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a0, a1, a2) = (self.c0, self.c1, self.c2);
        let (b0, b1, b2) = (rhs.c0, rhs.c1, rhs.c2);
        let v0 = a0 * b0;
        let v1 = a1 * b1;
        let v2 = a2 * b2;
        let c0 = v0 + ((a1 + a2) * (b1 + b2) - v1 - v2).mul_by_nonresidue();
        let c1 = (a0 + a1) * (b0 + b1) - v0 - v1 + v2.mul_by_nonresidue();
        let c2 = (a0 + a2) * (b0 + b2) - v0 - v2 + v1;
        Self::new(c0, c1, c2)
    }
}

impl Neg for Fp6 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.c0, -self.c1, -self.c2)
    }
}

impl AddAssign for Fp6 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp6 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp6 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<Fp2> for Fp6 {
    fn from(c0: Fp2) -> Self {
        Self::new(c0, Fp2::ZERO, Fp2::ZERO)
    }
}
