//! Prime fields with 256-bit moduli in Montgomery form.

use crate::error::{Result, ZkError};
use crate::field::Field;
use num_bigint::BigUint;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Compile-time description of a prime field.
///
/// Only `MODULUS` has to be provided; the Montgomery constants are derived from it.
/// The modulus must be odd and below `2^255`.
pub trait FpConfig: 'static + Copy + fmt::Debug + PartialEq + Eq + Hash + Send + Sync {
    const NAME: &'static str;
    const MODULUS: [u64; 4];
    /// `-MODULUS^-1 mod 2^64`.
    const INV: u64 = mont_inv(Self::MODULUS[0]);
    /// `2^512 mod MODULUS`.
    const R2: [u64; 4] = r_squared(&Self::MODULUS);
}

#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// `borrow` is either 0 or `u64::MAX`.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (t as u64, (t >> 64) as u64)
}

#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

const fn mont_inv(m0: u64) -> u64 {
    let mut inv = 1u64;
    let mut i = 0;
    while i < 63 {
        inv = inv.wrapping_mul(inv);
        inv = inv.wrapping_mul(m0);
        i += 1;
    }
    inv.wrapping_neg()
}

const fn r_squared(m: &[u64; 4]) -> [u64; 4] {
    let mut r = [1u64, 0, 0, 0];
    let mut i = 0;
    while i < 512 {
        r = add_mod(&r, &r, m);
        i += 1;
    }
    r
}

/// Subtracts `m` from `hi:a` if the result stays non-negative.
const fn reduce_once(a: [u64; 4], hi: u64, m: &[u64; 4]) -> [u64; 4] {
    let (d0, b) = sbb(a[0], m[0], 0);
    let (d1, b) = sbb(a[1], m[1], b);
    let (d2, b) = sbb(a[2], m[2], b);
    let (d3, b) = sbb(a[3], m[3], b);
    if hi == 0 && b != 0 { a } else { [d0, d1, d2, d3] }
}

const fn add_mod(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    let (s0, c) = adc(a[0], b[0], 0);
    let (s1, c) = adc(a[1], b[1], c);
    let (s2, c) = adc(a[2], b[2], c);
    let (s3, c) = adc(a[3], b[3], c);
    reduce_once([s0, s1, s2, s3], c, m)
}

const fn sub_mod(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    let (d0, br) = sbb(a[0], b[0], 0);
    let (d1, br) = sbb(a[1], b[1], br);
    let (d2, br) = sbb(a[2], b[2], br);
    let (d3, br) = sbb(a[3], b[3], br);
    // Add the modulus back on underflow.
    let mask = br;
    let (d0, c) = adc(d0, m[0] & mask, 0);
    let (d1, c) = adc(d1, m[1] & mask, c);
    let (d2, c) = adc(d2, m[2] & mask, c);
    let (d3, _) = adc(d3, m[3] & mask, c);
    [d0, d1, d2, d3]
}

/// CIOS Montgomery multiplication: `a * b * 2^-256 mod m`.
const fn mont_mul(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4], inv: u64) -> [u64; 4] {
    let mut t = [0u64; 6];
    let mut i = 0;
    while i < 4 {
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(t[j], a[j], b[i], carry);
            t[j] = lo;
            carry = hi;
            j += 1;
        }
        let (s, c) = adc(t[4], carry, 0);
        t[4] = s;
        t[5] = c;

        let k = t[0].wrapping_mul(inv);
        let (_, mut carry) = mac(t[0], k, m[0], 0);
        let mut j = 1;
        while j < 4 {
            let (lo, hi) = mac(t[j], k, m[j], carry);
            t[j - 1] = lo;
            carry = hi;
            j += 1;
        }
        let (s, c) = adc(t[4], carry, 0);
        t[3] = s;
        t[4] = t[5] + c;
        i += 1;
    }
    reduce_once([t[0], t[1], t[2], t[3]], t[4], m)
}

const fn lt(a: &[u64; 4], b: &[u64; 4]) -> bool {
    let mut i = 4;
    while i > 0 {
        i -= 1;
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

/// Element of the prime field described by `C`, kept in Montgomery form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fp<C: FpConfig>([u64; 4], PhantomData<C>);

impl<C: FpConfig> Fp<C> {
    pub const ZERO: Self = Self([0; 4], PhantomData);
    pub const ONE: Self = Self::from_raw([1, 0, 0, 0]);

    /// Builds an element from canonical little-endian limbs.
    ///
    /// The value must already be below the modulus; use [`Fp::from_limbs`] for untrusted input.
    pub const fn from_raw(limbs: [u64; 4]) -> Self {
        Self(mont_mul(&limbs, &C::R2, &C::MODULUS, C::INV), PhantomData)
    }

    pub const fn from_u64(v: u64) -> Self {
        Self::from_raw([v, 0, 0, 0])
    }

    pub fn from_limbs(limbs: [u64; 4]) -> Result<Self> {
        if !lt(&limbs, &C::MODULUS) {
            return Err(ZkError::Decode(format!("value is not a canonical {} element", C::NAME)));
        }
        Ok(Self::from_raw(limbs))
    }

    /// Canonical little-endian limbs.
    pub fn into_limbs(self) -> [u64; 4] {
        mont_mul(&self.0, &[1, 0, 0, 0], &C::MODULUS, C::INV)
    }

    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self> {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(word);
        }
        Self::from_limbs(limbs)
    }

    pub fn to_bytes_be(self) -> [u8; 32] {
        let limbs = self.into_limbs();
        let mut out = [0u8; 32];
        for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&limbs[3 - i].to_be_bytes());
        }
        out
    }

    pub fn from_biguint(value: &BigUint) -> Result<Self> {
        let bytes = value.to_bytes_be();
        if bytes.len() > 32 {
            return Err(ZkError::Decode(format!("value does not fit in {}", C::NAME)));
        }
        let mut buf = [0u8; 32];
        buf[32 - bytes.len()..].copy_from_slice(&bytes);
        Self::from_bytes_be(&buf)
    }

    pub fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes_be())
    }

    /// Uniform sampling by rejection.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let top = C::MODULUS[3];
        let mask = u64::MAX >> top.leading_zeros();
        loop {
            let mut limbs = [rng.next_u64(), rng.next_u64(), rng.next_u64(), rng.next_u64()];
            limbs[3] &= mask;
            if lt(&limbs, &C::MODULUS) {
                return Self::from_raw(limbs);
            }
        }
    }

    /// `MODULUS - 2`, the Fermat inversion exponent.
    fn inversion_exponent() -> [u64; 4] {
        let m = C::MODULUS;
        let (e0, b) = sbb(m[0], 2, 0);
        let (e1, b) = sbb(m[1], 0, b);
        let (e2, b) = sbb(m[2], 0, b);
        let (e3, _) = sbb(m[3], 0, b);
        [e0, e1, e2, e3]
    }
}

impl<C: FpConfig> Field for Fp<C> {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    fn double(&self) -> Self {
        Self(add_mod(&self.0, &self.0, &C::MODULUS), PhantomData)
    }

    fn square(&self) -> Self {
        *self * *self
    }

    fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(ZkError::DivisionByZero);
        }
        Ok(self.pow(&Self::inversion_exponent()))
    }
}

impl<C: FpConfig> Add for Fp<C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(add_mod(&self.0, &rhs.0, &C::MODULUS), PhantomData)
    }
}

impl<C: FpConfig> Sub for Fp<C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(sub_mod(&self.0, &rhs.0, &C::MODULUS), PhantomData)
    }
}

impl<C: FpConfig> Mul for Fp<C> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(mont_mul(&self.0, &rhs.0, &C::MODULUS, C::INV), PhantomData)
    }
}

impl<C: FpConfig> Neg for Fp<C> {
    type Output = Self;

    fn neg(self) -> Self {
        Self(sub_mod(&[0; 4], &self.0, &C::MODULUS), PhantomData)
    }
}

impl<C: FpConfig> AddAssign for Fp<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<C: FpConfig> SubAssign for Fp<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: FpConfig> MulAssign for Fp<C> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<C: FpConfig> From<u64> for Fp<C> {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl<C: FpConfig> fmt::Display for Fp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl<C: FpConfig> fmt::Debug for Fp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", C::NAME, self.to_biguint())
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal; rejects values outside the field.
impl<C: FpConfig> FromStr for Fp<C> {
    type Err = ZkError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        // `parse_bytes` alone would also take `_` separators and a leading `+`.
        let well_formed = !digits.is_empty()
            && digits.bytes().all(|b| if radix == 16 { b.is_ascii_hexdigit() } else { b.is_ascii_digit() });
        let value = well_formed
            .then(|| BigUint::parse_bytes(digits.as_bytes(), radix))
            .flatten()
            .ok_or_else(|| ZkError::Decode(format!("invalid {} literal: {s:?}", C::NAME)))?;
        Self::from_biguint(&value)
    }
}

impl<C: FpConfig> Serialize for Fp<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, C: FpConfig> Deserialize<'de> for Fp<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
