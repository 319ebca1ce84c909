//! Quadratic extension `Fq[u] / (u^2 + 1)`.

use crate::constants::BN254;
use crate::error::Result;
use crate::field::{Field, Fq};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// `c0 + c1 * u`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fp2 {
    pub c0: Fq,
    pub c1: Fq,
}

impl Fp2 {
    pub const ZERO: Self = Self::new(Fq::ZERO, Fq::ZERO);
    pub const ONE: Self = Self::new(Fq::ONE, Fq::ZERO);
    /// `xi = 9 + u`.
    pub const NONRESIDUE: Self = Self::new(
        Fq::from_u64(BN254.twist_nonresidue.0),
        Fq::from_u64(BN254.twist_nonresidue.1),
    );

    pub const fn new(c0: Fq, c1: Fq) -> Self {
        Self { c0, c1 }
    }

    /// Frobenius map `x -> x^p`.
    pub fn conjugate(&self) -> Self {
        Self::new(self.c0, -self.c1)
    }

    pub fn mul_by_fq(&self, k: Fq) -> Self {
        Self::new(self.c0 * k, self.c1 * k)
    }

    /// Multiplication by `xi`.
    pub fn mul_by_nonresidue(&self) -> Self {
        // (9 + u)(a + bu) = (9a - b) + (a + 9b)u
        let nine_a = self.c0.double().double().double() + self.c0;
        let nine_b = self.c1.double().double().double() + self.c1;
        Self::new(nine_a - self.c1, self.c0 + nine_b)
    }
}

impl Field for Fp2 {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    fn double(&self) -> Self {
        Self::new(self.c0.double(), self.c1.double())
    }

    fn square(&self) -> Self {
        // (a + bu)^2 = (a + b)(a - b) + 2ab u
        let ab = self.c0 * self.c1;
        Self::new((self.c0 + self.c1) * (self.c0 - self.c1), ab.double())
    }

    fn inverse(&self) -> Result<Self> {
        let norm = self.c0.square() + self.c1.square();
        let t = norm.inverse()?;
        Ok(Self::new(self.c0 * t, -(self.c1 * t)))
    }
}

impl Add for Fp2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fp2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Mul for Fp2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Self::new(v0 - v1, c1)
    }
}

impl Neg for Fp2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.c0, -self.c1)
    }
}

impl AddAssign for Fp2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fp2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fp2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<Fq> for Fp2 {
    fn from(c0: Fq) -> Self {
        Self::new(c0, Fq::ZERO)
    }
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp2({} + {}*u)", self.c0, self.c1)
    }
}
