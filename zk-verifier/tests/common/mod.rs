//! Multiplier circuit (`a * b = c`, `c` public) proven with arkworks, plus conversions from
//! arkworks values into this crate's types.

#![allow(dead_code)]

use ark_bn254::{Bn254, Fr as ArkFr};
use ark_ff::PrimeField;
use ark_groth16::Groth16;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_snark::SNARK;
use ark_std::rand::{SeedableRng, rngs::StdRng};
use num_bigint::BigUint;
use zk_verifier::groth16::{Proof, VerifyingKey};
use zk_verifier::{Fq, Fr, G1Affine, G2Affine};
use zk_verifier::field::Fp2;

/// Proves knowledge of `a, b` with `a * b = c` for public `c`.
#[derive(Clone)]
pub struct MultiplierCircuit {
    pub a: Option<ArkFr>,
    pub b: Option<ArkFr>,
}

impl MultiplierCircuit {
    pub fn empty() -> Self {
        Self { a: None, b: None }
    }

    pub fn new(a: u64, b: u64) -> Self {
        Self {
            a: Some(ArkFr::from(a)),
            b: Some(ArkFr::from(b)),
        }
    }
}

impl ConstraintSynthesizer<ArkFr> for MultiplierCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<ArkFr>) -> Result<(), SynthesisError> {
        // Public output first so it lands right after the constant one.
        let c = FpVar::new_input(cs.clone(), || {
            let a = self.a.ok_or(SynthesisError::AssignmentMissing)?;
            let b = self.b.ok_or(SynthesisError::AssignmentMissing)?;
            Ok(a * b)
        })?;
        let a = FpVar::new_witness(cs.clone(), || self.a.ok_or(SynthesisError::AssignmentMissing))?;
        let b = FpVar::new_witness(cs, || self.b.ok_or(SynthesisError::AssignmentMissing))?;

        (&a * &b).enforce_equal(&c)?;
        Ok(())
    }
}

pub fn test_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub type ArkKeys = (ark_groth16::ProvingKey<Bn254>, ark_groth16::VerifyingKey<Bn254>);

pub fn setup(rng: &mut StdRng) -> ArkKeys {
    Groth16::<Bn254>::circuit_specific_setup(MultiplierCircuit::empty(), rng).expect("setup failed")
}

pub fn prove(pk: &ark_groth16::ProvingKey<Bn254>, a: u64, b: u64, rng: &mut StdRng) -> ark_groth16::Proof<Bn254> {
    Groth16::<Bn254>::prove(pk, MultiplierCircuit::new(a, b), rng).expect("proving failed")
}

pub fn decimal<F: PrimeField>(v: &F) -> String {
    let n: BigUint = v.into_bigint().into();
    n.to_string()
}

pub fn fq(v: &ark_bn254::Fq) -> Fq {
    Fq::from_limbs(v.into_bigint().0).expect("canonical")
}

pub fn fr(v: &ArkFr) -> Fr {
    Fr::from_limbs(v.into_bigint().0).expect("canonical")
}

pub fn g1(p: &ark_bn254::G1Affine) -> G1Affine {
    if p.infinity {
        return G1Affine::identity();
    }
    G1Affine::new(fq(&p.x), fq(&p.y)).expect("on curve")
}

pub fn g2(p: &ark_bn254::G2Affine) -> G2Affine {
    if p.infinity {
        return G2Affine::identity();
    }
    let x = Fp2::new(fq(&p.x.c0), fq(&p.x.c1));
    let y = Fp2::new(fq(&p.y.c0), fq(&p.y.c1));
    G2Affine::new(x, y).expect("on twist")
}

pub fn verifying_key(vk: &ark_groth16::VerifyingKey<Bn254>) -> VerifyingKey {
    VerifyingKey {
        alpha_g1: g1(&vk.alpha_g1),
        beta_g2: g2(&vk.beta_g2),
        gamma_g2: g2(&vk.gamma_g2),
        delta_g2: g2(&vk.delta_g2),
        gamma_abc_g1: vk.gamma_abc_g1.iter().map(g1).collect(),
    }
}

pub fn proof(p: &ark_groth16::Proof<Bn254>) -> Proof {
    Proof {
        a: g1(&p.a),
        b: g2(&p.b),
        c: g1(&p.c),
    }
}

/// snarkjs-style Jacobian triples with `z = 1`.
pub fn g1_json(p: &ark_bn254::G1Affine) -> serde_json::Value {
    serde_json::json!([decimal(&p.x), decimal(&p.y), "1"])
}

pub fn g2_json(p: &ark_bn254::G2Affine) -> serde_json::Value {
    serde_json::json!([
        [decimal(&p.x.c0), decimal(&p.x.c1)],
        [decimal(&p.y.c0), decimal(&p.y.c1)],
        ["1", "0"]
    ])
}
