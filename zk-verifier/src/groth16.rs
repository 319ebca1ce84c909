//! Groth16 verification over BN254.
//!
//! A proof `(A, B, C)` for public inputs `x` is accepted iff
//! `e(-A, B) * e(alpha, beta) * e(L, gamma) * e(C, delta) == 1`
//! with `L = IC[0] + sum(x_i * IC[i + 1])`.
//! `e(alpha, beta)` depends only on the key and is computed once in [`PreparedVerifyingKey`].

use crate::constants::{G1_SIZE, PROOF_SIZE, VK_HEADER_SIZE};
use crate::curve::{G1Affine, G1Projective, G2Affine};
use crate::encoding::{Reader, write_g1, write_g2};
use crate::error::{Result, ZkError};
use crate::field::Fr;
use crate::pairing::{Gt, final_exponentiation, multi_miller_loop, pairing, pairing_check};
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    pub alpha_g1: G1Affine,
    pub beta_g2: G2Affine,
    pub gamma_g2: G2Affine,
    pub delta_g2: G2Affine,
    /// `IC`: one point for the constant term plus one per public input.
    pub gamma_abc_g1: Vec<G1Affine>,
}

impl VerifyingKey {
    pub fn num_public_inputs(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gamma_abc_g1.is_empty() {
            return Err(ZkError::InvalidKey("IC must contain at least the constant term".to_string()));
        }
        self.alpha_g1.validate()?;
        self.beta_g2.validate()?;
        self.gamma_g2.validate()?;
        self.delta_g2.validate()?;
        for p in &self.gamma_abc_g1 {
            p.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof {
    pub a: G1Affine,
    pub b: G2Affine,
    pub c: G1Affine,
}

impl Proof {
    pub fn validate(&self) -> Result<()> {
        self.a.validate()?;
        self.b.validate()?;
        self.c.validate()
    }
}

/// Verifying key with `e(alpha, beta)` precomputed.
#[derive(Clone, Debug)]
pub struct PreparedVerifyingKey {
    pub vk: VerifyingKey,
    pub alpha_beta: Gt,
}

impl PreparedVerifyingKey {
    pub fn new(vk: VerifyingKey) -> Result<Self> {
        vk.validate()?;
        let alpha_beta = pairing(&vk.alpha_g1, &vk.beta_g2)?;
        Ok(Self { vk, alpha_beta })
    }
}

/// Holds one prepared key and checks proofs against it. Cheap to share across threads.
#[derive(Clone, Debug)]
pub struct Verifier {
    pvk: PreparedVerifyingKey,
}

impl Verifier {
    pub fn new(vk: VerifyingKey) -> Result<Self> {
        let pvk = PreparedVerifyingKey::new(vk)?;
        tracing::debug!(n_public = pvk.vk.num_public_inputs(), "verifying key prepared");
        Ok(Self { pvk })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(load_verification_key(bytes)?)
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.pvk.vk
    }

    pub fn num_public_inputs(&self) -> usize {
        self.pvk.vk.num_public_inputs()
    }

    /// `Ok(false)` means the proof is well-formed but does not verify.
    pub fn verify(&self, public_inputs: &[Fr], proof: &Proof) -> Result<bool> {
        let vk = &self.pvk.vk;
        let l = prepare_inputs(vk, public_inputs)?.to_affine();
        proof.validate()?;

        let f = multi_miller_loop(&[(-proof.a, proof.b), (l, vk.gamma_g2), (proof.c, vk.delta_g2)])?;
        let ok = (final_exponentiation(&f)? * self.pvk.alpha_beta).is_identity();
        tracing::debug!(n_public = public_inputs.len(), ok, "groth16 verification");
        Ok(ok)
    }

    /// Verifies each `(inputs, proof)` independently on the rayon pool. Results keep input order.
    pub fn verify_batch(&self, items: &[(Vec<Fr>, Proof)]) -> Vec<Result<bool>> {
        let results: Vec<Result<bool>> = items
            .par_iter()
            .map(|(inputs, proof)| self.verify(inputs, proof))
            .collect();
        let accepted = results.iter().filter(|r| matches!(r, Ok(true))).count();
        tracing::debug!(total = items.len(), accepted, "batch verification");
        results
    }
}

/// `IC[0] + sum(x_i * IC[i + 1])`.
pub fn prepare_inputs(vk: &VerifyingKey, public_inputs: &[Fr]) -> Result<G1Projective> {
    let Some((constant, bases)) = vk.gamma_abc_g1.split_first() else {
        return Err(ZkError::InvalidKey("IC must contain at least the constant term".to_string()));
    };
    if public_inputs.len() != bases.len() {
        return Err(ZkError::InputLengthMismatch {
            expected: bases.len(),
            got: public_inputs.len(),
        });
    }
    let acc = bases
        .iter()
        .zip(public_inputs)
        .map(|(base, x)| base.mul_scalar(x))
        .sum::<G1Projective>();
    Ok(acc + *constant)
}

/// Stand-alone check without a prepared key: four pairings, one final exponentiation.
pub fn verify_proof(vk: &VerifyingKey, public_inputs: &[Fr], proof: &Proof) -> Result<bool> {
    let l = prepare_inputs(vk, public_inputs)?.to_affine();
    proof.validate()?;
    pairing_check(&[
        (-proof.a, proof.b),
        (vk.alpha_g1, vk.beta_g2),
        (l, vk.gamma_g2),
        (proof.c, vk.delta_g2),
    ])
}

/// Parses `alpha || beta || gamma || delta || n (u32 BE) || IC[0..=n]`.
pub fn load_verification_key(bytes: &[u8]) -> Result<VerifyingKey> {
    if bytes.len() < VK_HEADER_SIZE {
        return Err(ZkError::Decode(format!(
            "verification key too short: {} bytes, need at least {VK_HEADER_SIZE}",
            bytes.len()
        )));
    }
    let mut r = Reader::new(bytes);
    let alpha_g1 = r.read_g1()?;
    let beta_g2 = r.read_g2()?;
    let gamma_g2 = r.read_g2()?;
    let delta_g2 = r.read_g2()?;
    let n_public = r.read_u32()? as usize;

    let expected = n_public
        .checked_add(1)
        .and_then(|n| n.checked_mul(G1_SIZE))
        .ok_or_else(|| ZkError::Decode("public input count overflows".to_string()))?;
    if r.remaining() != expected {
        return Err(ZkError::Decode(format!(
            "verification key declares {n_public} public inputs ({expected} IC bytes) but has {}",
            r.remaining()
        )));
    }
    let mut gamma_abc_g1 = Vec::with_capacity(n_public + 1);
    for _ in 0..=n_public {
        gamma_abc_g1.push(r.read_g1()?);
    }
    r.finish()?;

    Ok(VerifyingKey {
        alpha_g1,
        beta_g2,
        gamma_g2,
        delta_g2,
        gamma_abc_g1,
    })
}

pub fn serialize_vk(vk: &VerifyingKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(VK_HEADER_SIZE + vk.gamma_abc_g1.len() * G1_SIZE);
    write_g1(&mut out, &vk.alpha_g1);
    write_g2(&mut out, &vk.beta_g2);
    write_g2(&mut out, &vk.gamma_g2);
    write_g2(&mut out, &vk.delta_g2);
    out.extend_from_slice(&(vk.num_public_inputs() as u32).to_be_bytes());
    for p in &vk.gamma_abc_g1 {
        write_g1(&mut out, p);
    }
    out
}

pub fn serialize_proof(proof: &Proof) -> Vec<u8> {
    let mut out = Vec::with_capacity(PROOF_SIZE);
    write_g1(&mut out, &proof.a);
    write_g2(&mut out, &proof.b);
    write_g1(&mut out, &proof.c);
    out
}

/// Parses `A || B || C` (exactly 256 bytes).
pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof> {
    if bytes.len() != PROOF_SIZE {
        return Err(ZkError::Decode(format!(
            "proof must be {PROOF_SIZE} bytes, got {}",
            bytes.len()
        )));
    }
    let mut r = Reader::new(bytes);
    let a = r.read_g1()?;
    let b = r.read_g2()?;
    let c = r.read_g1()?;
    r.finish()?;
    Ok(Proof { a, b, c })
}
