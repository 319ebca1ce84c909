//! Groth16 fixtures built from a known trapdoor instead of a circuit.
//!
//! With `alpha, beta, gamma, delta` and the IC discrete logs `k_i` in hand, a proof for any
//! public input vector `x` is `A = a*G1`, `B = b*G2`, `C = c*G1` where
//! `c = (a*b - alpha*beta - gamma*(k_0 + sum(x_i * k_{i+1}))) / delta`.
//! Such proofs satisfy the verification equation but are forgeries by construction:
//! only for tests.

use crate::curve::{G1Projective, G2Projective};
use crate::error::{Result, ZkError};
use crate::field::{Field, Fr};
use crate::groth16::{Proof, VerifyingKey};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic RNG for fixtures, one stream per `label`.
pub fn fixture_rng(label: u64) -> ChaCha20Rng {
    let mut seed = [0u8; 32];
    seed[0..8].copy_from_slice(&0x4752_4f54_4831_3621u64.to_le_bytes());
    seed[8..16].copy_from_slice(&label.to_le_bytes());
    ChaCha20Rng::from_seed(seed)
}

#[derive(Clone, Debug)]
pub struct Trapdoor {
    pub alpha: Fr,
    pub beta: Fr,
    pub gamma: Fr,
    pub delta: Fr,
    pub ic: Vec<Fr>,
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub vk: VerifyingKey,
    pub trapdoor: Trapdoor,
}

fn nonzero<R: RngCore + ?Sized>(rng: &mut R) -> Fr {
    loop {
        let v = Fr::random(rng);
        if !v.is_zero() {
            return v;
        }
    }
}

impl Fixture {
    pub fn new<R: RngCore + ?Sized>(n_public: usize, rng: &mut R) -> Self {
        let trapdoor = Trapdoor {
            alpha: nonzero(rng),
            beta: nonzero(rng),
            gamma: nonzero(rng),
            delta: nonzero(rng),
            ic: (0..=n_public).map(|_| nonzero(rng)).collect(),
        };
        let g1 = G1Projective::generator();
        let g2 = G2Projective::generator();
        let vk = VerifyingKey {
            alpha_g1: (g1 * trapdoor.alpha).to_affine(),
            beta_g2: (g2 * trapdoor.beta).to_affine(),
            gamma_g2: (g2 * trapdoor.gamma).to_affine(),
            delta_g2: (g2 * trapdoor.delta).to_affine(),
            gamma_abc_g1: trapdoor.ic.iter().map(|k| (g1 * *k).to_affine()).collect(),
        };
        Self { vk, trapdoor }
    }

    pub fn prove<R: RngCore + ?Sized>(&self, public_inputs: &[Fr], rng: &mut R) -> Result<Proof> {
        let t = &self.trapdoor;
        let Some((k0, ks)) = t.ic.split_first() else {
            return Err(ZkError::InvalidKey("empty IC".to_string()));
        };
        if public_inputs.len() != ks.len() {
            return Err(ZkError::InputLengthMismatch {
                expected: ks.len(),
                got: public_inputs.len(),
            });
        }
        let s = ks
            .iter()
            .zip(public_inputs)
            .fold(*k0, |acc, (k, x)| acc + *k * *x);

        let a = nonzero(rng);
        let b = nonzero(rng);
        let c = (a * b - t.alpha * t.beta - t.gamma * s) * t.delta.inverse()?;

        Ok(Proof {
            a: (G1Projective::generator() * a).to_affine(),
            b: (G2Projective::generator() * b).to_affine(),
            c: (G1Projective::generator() * c).to_affine(),
        })
    }
}
