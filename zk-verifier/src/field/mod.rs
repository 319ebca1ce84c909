//! Field arithmetic: the BN254 prime fields and the `Fp2 -> Fp6 -> Fp12` tower.

pub mod fp;
pub mod fp12;
pub mod fp2;
pub mod fp6;

pub use fp::{Fp, FpConfig};
pub use fp12::Fp12;
pub use fp2::Fp2;
pub use fp6::Fp6;

use crate::constants::BN254;
use crate::error::Result;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub trait Field:
    'static
    + Copy
    + Debug
    + PartialEq
    + Eq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    fn zero() -> Self;

    fn one() -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool {
        *self == Self::one()
    }

    fn double(&self) -> Self {
        *self + *self
    }

    fn square(&self) -> Self {
        *self * *self
    }

    /// Fails with [`crate::error::ZkError::DivisionByZero`] on zero.
    fn inverse(&self) -> Result<Self>;

    /// Square-and-multiply over little-endian 64-bit limbs.
    fn pow(&self, exp: &[u64]) -> Self {
        let mut res = Self::one();
        for limb in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if (limb >> i) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FqConfig;

impl FpConfig for FqConfig {
    const NAME: &'static str = "Fq";
    const MODULUS: [u64; 4] = BN254.modulus;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrConfig;

impl FpConfig for FrConfig {
    const NAME: &'static str = "Fr";
    const MODULUS: [u64; 4] = BN254.scalar_modulus;
}

/// Base field of BN254.
pub type Fq = Fp<FqConfig>;
/// Scalar field of BN254 (public inputs, exponents).
pub type Fr = Fp<FrConfig>;
