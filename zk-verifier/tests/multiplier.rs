//! End-to-end checks against real Groth16 proofs for the `a * b = c` circuit.

mod common;

use ark_bn254::{Bn254, Fr as ArkFr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use common::*;
use zk_verifier::constants::PROOF_SIZE;
use zk_verifier::groth16::{deserialize_proof, serialize_proof, serialize_vk};
use zk_verifier::types::{ProofJson, SolidityCalldata, VerificationKeyJson, parse_public_signals};
use zk_verifier::{Fr, G1Affine, G2Affine, Proof, Verifier, ZkError, load_verification_key, verify_proof};

fn zero_proof() -> Proof {
    Proof {
        a: G1Affine::identity(),
        b: G2Affine::identity(),
        c: G1Affine::identity(),
    }
}

#[test]
fn circuit_multiplies_two_numbers() {
    let cs = ConstraintSystem::<ArkFr>::new_ref();
    MultiplierCircuit::new(2, 33).generate_constraints(cs.clone()).unwrap();
    assert!(cs.is_satisfied().unwrap());

    let instance = cs.borrow().unwrap().instance_assignment.clone();
    assert_eq!(instance, vec![ArkFr::from(1u64), ArkFr::from(66u64)]);
}

#[test]
fn accepts_valid_proof() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let ark_proof = prove(&pk, 2, 33, &mut rng);
    let public = [ArkFr::from(66u64)];
    assert!(Groth16::<Bn254>::verify(&ark_vk, &public, &ark_proof).unwrap());

    let vk = verifying_key(&ark_vk);
    let proof = proof(&ark_proof);
    let inputs = [fr(&public[0])];

    let verifier = Verifier::new(vk.clone()).unwrap();
    assert_eq!(verifier.num_public_inputs(), 1);
    assert!(verifier.verify(&inputs, &proof).unwrap());
    assert!(verify_proof(&vk, &inputs, &proof).unwrap());
}

#[test]
fn rejects_all_zero_proof() {
    let mut rng = test_rng();
    let (_, ark_vk) = setup(&mut rng);
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();

    assert!(!verifier.verify(&[Fr::ZERO], &zero_proof()).unwrap());
    let decoded = deserialize_proof(&[0u8; PROOF_SIZE]).unwrap();
    assert!(!verifier.verify(&[Fr::ZERO], &decoded).unwrap());
}

#[test]
fn wrong_input_count_is_an_error() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let proof = proof(&prove(&pk, 2, 33, &mut rng));
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();

    assert_eq!(
        verifier.verify(&[], &proof).unwrap_err(),
        ZkError::InputLengthMismatch { expected: 1, got: 0 }
    );
    assert_eq!(
        verifier.verify(&[Fr::from_u64(66), Fr::from_u64(66)], &proof).unwrap_err(),
        ZkError::InputLengthMismatch { expected: 1, got: 2 }
    );
}

#[test]
fn rejects_wrong_statement() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let proof = proof(&prove(&pk, 2, 33, &mut rng));
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();

    assert!(!verifier.verify(&[Fr::from_u64(67)], &proof).unwrap());
    assert!(!verifier.verify(&[Fr::from_u64(6)], &proof).unwrap());

    // A proof for 2 * 3 does not verify the claim 66.
    let other = proof_for(&pk, 2, 3);
    assert!(verifier.verify(&[Fr::from_u64(6)], &other).unwrap());
    assert!(!verifier.verify(&[Fr::from_u64(66)], &other).unwrap());
}

fn proof_for(pk: &ark_groth16::ProvingKey<Bn254>, a: u64, b: u64) -> Proof {
    let mut rng = test_rng();
    proof(&prove(pk, a, b, &mut rng))
}

#[test]
fn verification_is_idempotent() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let proof = proof(&prove(&pk, 2, 33, &mut rng));
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();
    let inputs = [Fr::from_u64(66)];

    let results: Vec<bool> = (0..3).map(|_| verifier.verify(&inputs, &proof).unwrap()).collect();
    assert_eq!(results, vec![true, true, true]);
}

#[test]
fn binary_encoding_path() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let vk = verifying_key(&ark_vk);
    let proof = proof(&prove(&pk, 2, 33, &mut rng));

    let vk_bytes = serialize_vk(&vk);
    assert_eq!(load_verification_key(&vk_bytes).unwrap(), vk);

    let proof_bytes = serialize_proof(&proof);
    let verifier = Verifier::from_bytes(&vk_bytes).unwrap();
    let decoded = deserialize_proof(&proof_bytes).unwrap();
    assert!(verifier.verify(&[Fr::from_u64(66)], &decoded).unwrap());
}

#[test]
fn snarkjs_json_path() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let ark_proof = prove(&pk, 2, 33, &mut rng);

    let vk_json = serde_json::json!({
        "protocol": "groth16",
        "curve": "bn128",
        "nPublic": 1,
        "vk_alpha_1": g1_json(&ark_vk.alpha_g1),
        "vk_beta_2": g2_json(&ark_vk.beta_g2),
        "vk_gamma_2": g2_json(&ark_vk.gamma_g2),
        "vk_delta_2": g2_json(&ark_vk.delta_g2),
        "IC": ark_vk.gamma_abc_g1.iter().map(g1_json).collect::<Vec<_>>(),
    });
    let proof_json = serde_json::json!({
        "pi_a": g1_json(&ark_proof.a),
        "pi_b": g2_json(&ark_proof.b),
        "pi_c": g1_json(&ark_proof.c),
        "protocol": "groth16",
        "curve": "bn128",
    });
    let public_json = serde_json::json!(["66"]);

    let vk = VerificationKeyJson::from_json(&vk_json.to_string())
        .unwrap()
        .to_verifying_key()
        .unwrap();
    assert_eq!(vk, verifying_key(&ark_vk));

    let proof = ProofJson::from_json(&proof_json.to_string()).unwrap().to_proof().unwrap();
    let signals: Vec<String> = serde_json::from_value(public_json).unwrap();
    let inputs = parse_public_signals(&signals).unwrap();

    assert!(Verifier::new(vk).unwrap().verify(&inputs, &proof).unwrap());
}

#[test]
fn solidity_calldata_path() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let proof = proof(&prove(&pk, 2, 33, &mut rng));
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();

    let exported = SolidityCalldata::from_proof(&proof, &[Fr::from_u64(66)]).to_string();
    let calldata = SolidityCalldata::parse(&exported).unwrap();
    assert_eq!(calldata.input.len(), 1);
    assert!(verifier.verify(&calldata.public_inputs().unwrap(), &calldata.to_proof().unwrap()).unwrap());

    let zeros = SolidityCalldata::parse("[0,0],[[0,0],[0,0]],[0,0],[0]").unwrap();
    assert!(!verifier.verify(&zeros.public_inputs().unwrap(), &zeros.to_proof().unwrap()).unwrap());
}

#[test]
fn batch_of_real_proofs() {
    let mut rng = test_rng();
    let (pk, ark_vk) = setup(&mut rng);
    let verifier = Verifier::new(verifying_key(&ark_vk)).unwrap();

    let items: Vec<(Vec<Fr>, Proof)> = [(2u64, 33u64), (3, 5), (7, 7)]
        .iter()
        .map(|&(a, b)| (vec![Fr::from_u64(a * b)], proof(&prove(&pk, a, b, &mut rng))))
        .chain(std::iter::once((vec![Fr::ZERO], zero_proof())))
        .collect();

    let results = verifier.verify_batch(&items);
    let expected: Vec<Result<bool, ZkError>> = vec![Ok(true), Ok(true), Ok(true), Ok(false)];
    assert_eq!(results, expected);
}
