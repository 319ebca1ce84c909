//! BN254 (alt_bn128) curve parameters and the encoding sizes used on the wire.
//!
//! Everything else in the crate (field configs, curve coefficients, pairing exponents)
//! is derived from [`BN254`].

use num_bigint::BigUint;
use num_traits::One;
use std::sync::OnceLock;

/// Parameters of a Barreto-Naehrig curve `y^2 = x^3 + a*x + b` and its sextic twist.
///
/// Multi-limb values are little-endian 64-bit limbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveParameters {
    pub name: &'static str,
    /// Base field modulus `p`.
    pub modulus: [u64; 4],
    /// Group order `r` (scalar field modulus).
    pub scalar_modulus: [u64; 4],
    pub coeff_a: u64,
    pub coeff_b: u64,
    pub g1_cofactor: u64,
    /// Cofactor of the twist group, `2p - r`.
    pub g2_cofactor: [u64; 4],
    /// BN parameter `u` (positive for BN254).
    pub bn_u: u64,
    /// `xi = c0 + c1*u`, the non-residue defining `Fp6` and the twist.
    pub twist_nonresidue: (u64, u64),
}

pub const BN254: CurveParameters = CurveParameters {
    name: "bn254",
    modulus: [
        0x3c20_8c16_d87c_fd47,
        0x9781_6a91_6871_ca8d,
        0xb850_45b6_8181_585d,
        0x3064_4e72_e131_a029,
    ],
    scalar_modulus: [
        0x43e1_f593_f000_0001,
        0x2833_e848_79b9_7091,
        0xb850_45b6_8181_585d,
        0x3064_4e72_e131_a029,
    ],
    coeff_a: 0,
    coeff_b: 3,
    g1_cofactor: 1,
    g2_cofactor: [
        0x345f_2299_c0f9_fa8d,
        0x06ce_ecda_572a_2489,
        0xb850_45b6_8181_585e,
        0x3064_4e72_e131_a029,
    ],
    bn_u: 4_965_661_367_192_848_881,
    twist_nonresidue: (9, 1),
};

/// Names snarkjs and circom use for this curve.
pub const CURVE_ALIASES: [&str; 2] = ["bn128", "bn254"];

/// Size of one big-endian field word.
pub const FIELD_SIZE: usize = 32;
/// `x || y`.
pub const G1_SIZE: usize = 2 * FIELD_SIZE;
/// `x.c1 || x.c0 || y.c1 || y.c0`.
pub const G2_SIZE: usize = 4 * FIELD_SIZE;
/// `A || B || C`.
pub const PROOF_SIZE: usize = 2 * G1_SIZE + G2_SIZE;
/// alpha, beta, gamma, delta and the public input count, before the IC points.
pub const VK_HEADER_SIZE: usize = G1_SIZE + 3 * G2_SIZE + 4;

/// Optimal ate loop parameter `6u + 2`.
pub const fn ate_loop_count() -> u128 {
    6 * (BN254.bn_u as u128) + 2
}

fn limbs_to_biguint(limbs: &[u64]) -> BigUint {
    let mut bytes = Vec::with_capacity(limbs.len() * 8);
    for limb in limbs {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

pub fn modulus() -> BigUint {
    limbs_to_biguint(&BN254.modulus)
}

pub fn scalar_modulus() -> BigUint {
    limbs_to_biguint(&BN254.scalar_modulus)
}

/// `(p - 1) / 6`, the exponent behind the Frobenius coefficients `xi^(k(p-1)/6)`.
pub fn frobenius_exponent() -> &'static [u64] {
    static EXP: OnceLock<Vec<u64>> = OnceLock::new();
    EXP.get_or_init(|| ((modulus() - BigUint::one()) / BigUint::from(6u32)).to_u64_digits())
}

/// Hard part of the final exponentiation, `(p^4 - p^2 + 1) / r`.
pub fn final_exponent_hard_part() -> &'static [u64] {
    static EXP: OnceLock<Vec<u64>> = OnceLock::new();
    EXP.get_or_init(|| {
        let p = modulus();
        let p2 = &p * &p;
        let e = &p2 * &p2 - &p2 + BigUint::one();
        (e / scalar_modulus()).to_u64_digits()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn moduli_match_decimal_constants() {
        assert_eq!(
            modulus().to_string(),
            "21888242871839275222246405745257275088696311157297823662689037894645226208583"
        );
        assert_eq!(
            scalar_modulus().to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }

    #[test]
    fn ate_loop_count_is_six_u_plus_two() {
        assert_eq!(ate_loop_count(), 29_793_968_203_157_093_288);
        assert_eq!(128 - ate_loop_count().leading_zeros(), 65);
    }

    #[test]
    fn twist_cofactor_is_two_p_minus_r() {
        let expected = modulus() * 2u32 - scalar_modulus();
        assert_eq!(limbs_to_biguint(&BN254.g2_cofactor), expected);
    }

    #[test]
    fn hard_part_divides_exactly() {
        let p = modulus();
        let p2 = &p * &p;
        let e = &p2 * &p2 - &p2 + BigUint::one();
        assert!((e % scalar_modulus()).is_zero());
        assert_eq!(frobenius_exponent().len(), 4);
    }

    #[test]
    fn encoding_sizes() {
        assert_eq!(PROOF_SIZE, 256);
        assert_eq!(VK_HEADER_SIZE, 452);
    }
}
