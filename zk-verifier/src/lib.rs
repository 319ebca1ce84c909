//! Groth16 verification over BN254 (alt_bn128), implemented from the field arithmetic up.
//!
//! This crate contains:
//! - Prime-field and extension-tower arithmetic (`Fq`, `Fr`, `Fp2`, `Fp6`, `Fp12`).
//! - G1 and the G2 twist in Jacobian coordinates, with on-curve and subgroup checks.
//! - The optimal ate pairing and pairing-product checks.
//! - A Groth16 verifier plus the binary (EIP-197), snarkjs JSON and Solidity calldata formats.

pub mod constants;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod field;
pub mod groth16;
pub mod pairing;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use curve::{G1Affine, G1Projective, G2Affine, G2Projective};
pub use error::ZkError;
pub use field::{Field, Fq, Fr};
pub use groth16::{Proof, Verifier, VerifyingKey, load_verification_key, verify_proof};
pub use pairing::{Gt, multi_pairing, pairing, pairing_check};
