//! Short Weierstrass curves over the tower fields: G1 over `Fq` and the sextic twist G2 over `Fp2`.
//!
//! Points are handled in Jacobian coordinates (`x = X/Z^2`, `y = Y/Z^3`) for arithmetic and
//! normalised to affine form for pairing and encoding.

use crate::constants::BN254;
use crate::error::{Result, ZkError};
use crate::field::{Field, Fp2, Fq, Fr, FrConfig, FpConfig};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// `y^2 = x^3 + a*x + b` over `BaseField`.
pub trait SwCurveConfig: 'static + Copy + fmt::Debug + PartialEq + Eq + Send + Sync {
    type BaseField: Field;

    const NAME: &'static str;
    const COEFF_A: Self::BaseField;
    const COEFF_B: Self::BaseField;
    const GENERATOR_X: Self::BaseField;
    const GENERATOR_Y: Self::BaseField;
    /// Little-endian limbs of `#E / r`.
    const COFACTOR: &'static [u64];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1Config;

impl SwCurveConfig for G1Config {
    type BaseField = Fq;

    const NAME: &'static str = "G1";
    const COEFF_A: Fq = Fq::from_u64(BN254.coeff_a);
    const COEFF_B: Fq = Fq::from_u64(BN254.coeff_b);
    const GENERATOR_X: Fq = Fq::from_u64(1);
    const GENERATOR_Y: Fq = Fq::from_u64(2);
    const COFACTOR: &'static [u64] = &[BN254.g1_cofactor];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2Config;

impl SwCurveConfig for G2Config {
    type BaseField = Fp2;

    const NAME: &'static str = "G2";
    const COEFF_A: Fp2 = Fp2::new(Fq::from_u64(BN254.coeff_a), Fq::ZERO);
    /// `b / xi`.
    const COEFF_B: Fp2 = Fp2::new(
        Fq::from_raw([0x3267_e6dc_24a1_38e5, 0xb5b4_c5e5_59db_efa3, 0x81be_1899_1be0_6ac3, 0x2b14_9d40_ceb8_aaae]),
        Fq::from_raw([0xe4a2_bd06_85c3_15d2, 0xa74f_a084_e52d_1852, 0xcd2c_afad_eed8_fdf4, 0x0097_13b0_3af0_fed4]),
    );
    const GENERATOR_X: Fp2 = Fp2::new(
        Fq::from_raw([0x46de_bd5c_d992_f6ed, 0x6743_22d4_f75e_dadd, 0x426a_0066_5e5c_4479, 0x1800_deef_121f_1e76]),
        Fq::from_raw([0x97e4_85b7_aef3_12c2, 0xf1aa_4933_35a9_e712, 0x7260_bfb7_31fb_5d25, 0x198e_9393_920d_483a]),
    );
    const GENERATOR_Y: Fp2 = Fp2::new(
        Fq::from_raw([0x4ce6_cc01_66fa_7daa, 0xe3d1_e769_0c43_d37b, 0x4aab_7180_8dcb_408f, 0x12c8_5ea5_db8c_6deb]),
        Fq::from_raw([0x55ac_dadc_d122_975b, 0xbc4b_3133_70b3_8ef3, 0xec9e_99ad_690c_3395, 0x0906_89d0_585f_f075]),
    );
    const COFACTOR: &'static [u64] = &BN254.g2_cofactor;
}

pub type G1Affine = Affine<G1Config>;
pub type G1Projective = Projective<G1Config>;
pub type G2Affine = Affine<G2Config>;
pub type G2Projective = Projective<G2Config>;

#[derive(Clone, Copy)]
pub struct Affine<C: SwCurveConfig> {
    pub x: C::BaseField,
    pub y: C::BaseField,
    pub infinity: bool,
}

impl<C: SwCurveConfig> Affine<C> {
    /// Checked constructor: the point must satisfy the curve equation.
    pub fn new(x: C::BaseField, y: C::BaseField) -> Result<Self> {
        let p = Self::new_unchecked(x, y);
        if !p.is_on_curve() {
            return Err(ZkError::InvalidPoint(format!("{} point is not on the curve", C::NAME)));
        }
        Ok(p)
    }

    pub const fn new_unchecked(x: C::BaseField, y: C::BaseField) -> Self {
        Self { x, y, infinity: false }
    }

    pub fn identity() -> Self {
        Self {
            x: C::BaseField::zero(),
            y: C::BaseField::zero(),
            infinity: true,
        }
    }

    pub fn generator() -> Self {
        Self::new_unchecked(C::GENERATOR_X, C::GENERATOR_Y)
    }

    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    pub fn is_on_curve(&self) -> bool {
        if self.infinity {
            return true;
        }
        let rhs = self.x.square() * self.x + C::COEFF_A * self.x + C::COEFF_B;
        self.y.square() == rhs
    }

    /// Always true for G1; G2 needs an explicit `[r]P == O` check.
    pub fn is_in_correct_subgroup(&self) -> bool {
        let cofactor_is_one = C::COFACTOR.first() == Some(&1) && C::COFACTOR[1..].iter().all(|&l| l == 0);
        if cofactor_is_one || self.infinity {
            return true;
        }
        Projective::from(*self).mul_bigint(&FrConfig::MODULUS).is_identity()
    }

    /// On-curve and subgroup membership.
    pub fn validate(&self) -> Result<()> {
        if !self.is_on_curve() {
            return Err(ZkError::InvalidPoint(format!("{} point is not on the curve", C::NAME)));
        }
        if !self.is_in_correct_subgroup() {
            return Err(ZkError::InvalidPoint(format!("{} point is not in the prime-order subgroup", C::NAME)));
        }
        Ok(())
    }

    pub fn mul_scalar(&self, scalar: &Fr) -> Projective<C> {
        Projective::from(*self) * *scalar
    }
}

impl<C: SwCurveConfig> PartialEq for Affine<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl<C: SwCurveConfig> Eq for Affine<C> {}

impl<C: SwCurveConfig> fmt::Debug for Affine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.infinity {
            write!(f, "{}(infinity)", C::NAME)
        } else {
            write!(f, "{}({:?}, {:?})", C::NAME, self.x, self.y)
        }
    }
}

impl<C: SwCurveConfig> Neg for Affine<C> {
    type Output = Self;

    fn neg(self) -> Self {
        if self.infinity {
            return self;
        }
        Self::new_unchecked(self.x, -self.y)
    }
}

/// Jacobian coordinates; `z == 0` is the point at infinity.
#[derive(Clone, Copy)]
pub struct Projective<C: SwCurveConfig> {
    pub x: C::BaseField,
    pub y: C::BaseField,
    pub z: C::BaseField,
}

impl<C: SwCurveConfig> Projective<C> {
    pub fn identity() -> Self {
        Self {
            x: C::BaseField::one(),
            y: C::BaseField::one(),
            z: C::BaseField::zero(),
        }
    }

    pub fn generator() -> Self {
        Affine::<C>::generator().into()
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// dbl-2007-bl
    pub fn double(&self) -> Self {
        if self.is_identity() {
            return *self;
        }
        let xx = self.x.square();
        let yy = self.y.square();
        let yyyy = yy.square();
        let zz = self.z.square();
        let s = ((self.x + yy).square() - xx - yyyy).double();
        let mut m = xx.double() + xx;
        if !C::COEFF_A.is_zero() {
            m += C::COEFF_A * zz.square();
        }
        let t = m.square() - s.double();
        let y3 = m * (s - t) - yyyy.double().double().double();
        let z3 = (self.y + self.z).square() - yy - zz;
        Self { x: t, y: y3, z: z3 }
    }

    /// add-2007-bl, falling back to doubling when both inputs are the same point.
    fn add_jacobian(&self, other: &Self) -> Self {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * other.z * z2z2;
        let s2 = other.y * self.z * z1z1;

        if u1 == u2 {
            return if s1 == s2 { self.double() } else { Self::identity() };
        }

        let h = u2 - u1;
        let i = h.double().square();
        let j = h * i;
        let r = (s2 - s1).double();
        let v = u1 * i;
        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;
        Self { x: x3, y: y3, z: z3 }
    }

    /// Double-and-add over little-endian limbs, most significant bit first.
    pub fn mul_bigint(&self, scalar: &[u64]) -> Self {
        let mut acc = Self::identity();
        for limb in scalar.iter().rev() {
            for i in (0..64).rev() {
                acc = acc.double();
                if (limb >> i) & 1 == 1 {
                    acc += *self;
                }
            }
        }
        acc
    }

    pub fn to_affine(&self) -> Affine<C> {
        let Ok(z_inv) = self.z.inverse() else {
            return Affine::identity();
        };
        let z_inv2 = z_inv.square();
        Affine::new_unchecked(self.x * z_inv2, self.y * z_inv2 * z_inv)
    }
}

impl<C: SwCurveConfig> From<Affine<C>> for Projective<C> {
    fn from(p: Affine<C>) -> Self {
        if p.infinity {
            return Self::identity();
        }
        Self {
            x: p.x,
            y: p.y,
            z: C::BaseField::one(),
        }
    }
}

impl<C: SwCurveConfig> From<Projective<C>> for Affine<C> {
    fn from(p: Projective<C>) -> Self {
        p.to_affine()
    }
}

/// Compares `X1*Z2^2 == X2*Z1^2` and `Y1*Z2^3 == Y2*Z1^3`.
impl<C: SwCurveConfig> PartialEq for Projective<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_identity(), other.is_identity()) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        self.x * z2z2 == other.x * z1z1 && self.y * z2z2 * other.z == other.y * z1z1 * self.z
    }
}

impl<C: SwCurveConfig> Eq for Projective<C> {}

impl<C: SwCurveConfig> fmt::Debug for Projective<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_affine())
    }
}

impl<C: SwCurveConfig> Add for Projective<C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.add_jacobian(&rhs)
    }
}

impl<C: SwCurveConfig> Add<Affine<C>> for Projective<C> {
    type Output = Self;

    fn add(self, rhs: Affine<C>) -> Self {
        self.add_jacobian(&rhs.into())
    }
}

impl<C: SwCurveConfig> AddAssign for Projective<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add_jacobian(&rhs);
    }
}

impl<C: SwCurveConfig> Sub for Projective<C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.add_jacobian(&-rhs)
    }
}

impl<C: SwCurveConfig> SubAssign for Projective<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: SwCurveConfig> Neg for Projective<C> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

impl<C: SwCurveConfig> Mul<Fr> for Projective<C> {
    type Output = Self;

    fn mul(self, scalar: Fr) -> Self {
        self.mul_bigint(&scalar.into_limbs())
    }
}

impl<C: SwCurveConfig> Sum for Projective<C> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), |acc, p| acc + p)
    }
}
