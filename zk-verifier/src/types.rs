//! JSON-facing artifacts: snarkjs `verification_key.json`, `proof.json`, `public.json`,
//! and the argument tuple of a Solidity `verifyProof(a, b, c, input)` call.

use crate::constants::CURVE_ALIASES;
use crate::curve::{G1Affine, G2Affine};
use crate::encoding::{g1_from_coordinates, g2_from_coordinates};
use crate::error::{Result, ZkError};
use crate::field::{Field, Fp2, Fq, Fr};
use crate::groth16::{Proof, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

const PROTOCOL: &str = "groth16";

fn default_protocol() -> String {
    PROTOCOL.to_string()
}

fn default_curve() -> String {
    "bn128".to_string()
}

fn check_header(protocol: &str, curve: &str) -> Result<()> {
    if protocol != PROTOCOL {
        return Err(ZkError::Decode(format!("unsupported protocol {protocol:?}")));
    }
    if !CURVE_ALIASES.contains(&curve.to_ascii_lowercase().as_str()) {
        return Err(ZkError::Decode(format!("unsupported curve {curve:?}")));
    }
    Ok(())
}

fn parse_fq(s: &str) -> Result<Fq> {
    s.parse()
}

fn parse_fp2(pair: &[String]) -> Result<Fp2> {
    match pair {
        [c0, c1] => Ok(Fp2::new(parse_fq(c0)?, parse_fq(c1)?)),
        _ => Err(ZkError::Decode(format!("expected 2 Fp2 components, got {}", pair.len()))),
    }
}

/// `[x, y]` or Jacobian `[x, y, z]`; `z == 0` is the point at infinity.
fn parse_g1(coords: &[String]) -> Result<G1Affine> {
    let (x, y, z) = match coords {
        [x, y] => (parse_fq(x)?, parse_fq(y)?, Fq::ONE),
        [x, y, z] => (parse_fq(x)?, parse_fq(y)?, parse_fq(z)?),
        _ => return Err(ZkError::Decode(format!("expected 2 or 3 G1 coordinates, got {}", coords.len()))),
    };
    if z.is_zero() {
        return Ok(G1Affine::identity());
    }
    let z_inv = z.inverse()?;
    let z_inv2 = z_inv.square();
    g1_from_coordinates(x * z_inv2, y * z_inv2 * z_inv)
}

/// G2 counterpart of [`parse_g1`]; each coordinate is `[c0, c1]`.
fn parse_g2(coords: &[Vec<String>]) -> Result<G2Affine> {
    let (x, y, z) = match coords {
        [x, y] => (parse_fp2(x)?, parse_fp2(y)?, Fp2::ONE),
        [x, y, z] => (parse_fp2(x)?, parse_fp2(y)?, parse_fp2(z)?),
        _ => return Err(ZkError::Decode(format!("expected 2 or 3 G2 coordinates, got {}", coords.len()))),
    };
    if z.is_zero() {
        return Ok(G2Affine::identity());
    }
    let z_inv = z.inverse()?;
    let z_inv2 = z_inv.square();
    g2_from_coordinates(x * z_inv2, y * z_inv2 * z_inv)
}

fn g1_to_json(p: &G1Affine) -> Vec<String> {
    if p.is_identity() {
        return vec!["0".to_string(), "1".to_string(), "0".to_string()];
    }
    vec![p.x.to_string(), p.y.to_string(), "1".to_string()]
}

fn g2_to_json(p: &G2Affine) -> Vec<Vec<String>> {
    let pair = |v: &Fp2| vec![v.c0.to_string(), v.c1.to_string()];
    if p.is_identity() {
        return vec![pair(&Fp2::ZERO), pair(&Fp2::ONE), pair(&Fp2::ZERO)];
    }
    vec![pair(&p.x), pair(&p.y), pair(&Fp2::ONE)]
}

/// snarkjs `verification_key.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationKeyJson {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    /// Carried through untouched; `e(alpha, beta)` is recomputed when the key is prepared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vk_alphabeta_12: Option<serde_json::Value>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

impl VerificationKeyJson {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ZkError::Decode(format!("verification key json: {e}")))
    }

    pub fn to_verifying_key(&self) -> Result<VerifyingKey> {
        check_header(&self.protocol, &self.curve)?;
        if self.ic.len() != self.n_public + 1 {
            return Err(ZkError::Decode(format!(
                "nPublic is {} but IC has {} points",
                self.n_public,
                self.ic.len()
            )));
        }
        Ok(VerifyingKey {
            alpha_g1: parse_g1(&self.vk_alpha_1)?,
            beta_g2: parse_g2(&self.vk_beta_2)?,
            gamma_g2: parse_g2(&self.vk_gamma_2)?,
            delta_g2: parse_g2(&self.vk_delta_2)?,
            gamma_abc_g1: self.ic.iter().map(|p| parse_g1(p)).collect::<Result<_>>()?,
        })
    }

    pub fn from_verifying_key(vk: &VerifyingKey) -> Self {
        Self {
            protocol: default_protocol(),
            curve: default_curve(),
            n_public: vk.num_public_inputs(),
            vk_alpha_1: g1_to_json(&vk.alpha_g1),
            vk_beta_2: g2_to_json(&vk.beta_g2),
            vk_gamma_2: g2_to_json(&vk.gamma_g2),
            vk_delta_2: g2_to_json(&vk.delta_g2),
            vk_alphabeta_12: None,
            ic: vk.gamma_abc_g1.iter().map(g1_to_json).collect(),
        }
    }
}

/// snarkjs `proof.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofJson {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_curve")]
    pub curve: String,
}

impl ProofJson {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ZkError::Decode(format!("proof json: {e}")))
    }

    pub fn to_proof(&self) -> Result<Proof> {
        check_header(&self.protocol, &self.curve)?;
        Ok(Proof {
            a: parse_g1(&self.pi_a)?,
            b: parse_g2(&self.pi_b)?,
            c: parse_g1(&self.pi_c)?,
        })
    }

    pub fn from_proof(proof: &Proof) -> Self {
        Self {
            pi_a: g1_to_json(&proof.a),
            pi_b: g2_to_json(&proof.b),
            pi_c: g1_to_json(&proof.c),
            protocol: default_protocol(),
            curve: default_curve(),
        }
    }
}

/// `public.json`: decimal strings, each below the group order.
pub fn parse_public_signals<S: AsRef<str>>(signals: &[S]) -> Result<Vec<Fr>> {
    signals.iter().map(|s| s.as_ref().parse::<Fr>()).collect()
}

/// Arguments of `verifyProof(uint[2] a, uint[2][2] b, uint[2] c, uint[n] input)`.
///
/// G2 words are in `(c1, c0)` order as the pairing precompile expects them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidityCalldata {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub input: Vec<String>,
}

fn hex_word(bytes: [u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

impl SolidityCalldata {
    /// Parses the text printed by `snarkjs zkey export soliditycalldata`.
    ///
    /// Quotes, brackets and whitespace are dropped and the rest split on commas:
    /// the first eight words are the proof, the remainder the public inputs.
    pub fn parse(text: &str) -> Result<Self> {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '"' | '[' | ']') && !c.is_whitespace())
            .collect();
        let words: Vec<String> = cleaned
            .split(',')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if words.len() < 8 {
            return Err(ZkError::Decode(format!(
                "calldata needs at least 8 words, got {}",
                words.len()
            )));
        }
        let w = |i: usize| words[i].clone();
        Ok(Self {
            a: [w(0), w(1)],
            b: [[w(2), w(3)], [w(4), w(5)]],
            c: [w(6), w(7)],
            input: words[8..].to_vec(),
        })
    }

    pub fn to_proof(&self) -> Result<Proof> {
        let [ax, ay] = &self.a;
        let [[bx1, bx0], [by1, by0]] = &self.b;
        let [cx, cy] = &self.c;
        let b = g2_from_coordinates(
            Fp2::new(parse_fq(bx0)?, parse_fq(bx1)?),
            Fp2::new(parse_fq(by0)?, parse_fq(by1)?),
        )?;
        Ok(Proof {
            a: g1_from_coordinates(parse_fq(ax)?, parse_fq(ay)?)?,
            b,
            c: g1_from_coordinates(parse_fq(cx)?, parse_fq(cy)?)?,
        })
    }

    pub fn public_inputs(&self) -> Result<Vec<Fr>> {
        parse_public_signals(&self.input)
    }

    pub fn from_proof(proof: &Proof, inputs: &[Fr]) -> Self {
        let fq = |v: &Fq| hex_word(v.to_bytes_be());
        let (a, b, c) = (&proof.a, &proof.b, &proof.c);
        Self {
            a: [fq(&a.x), fq(&a.y)],
            b: [[fq(&b.x.c1), fq(&b.x.c0)], [fq(&b.y.c1), fq(&b.y.c0)]],
            c: [fq(&c.x), fq(&c.y)],
            input: inputs.iter().map(|x| hex_word(x.to_bytes_be())).collect(),
        }
    }
}

/// Same shape as the snarkjs export: `["a0","a1"],[["b00","b01"],["b10","b11"]],["c0","c1"],[inputs]`.
impl fmt::Display for SolidityCalldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn quoted(words: &[String]) -> String {
            words.iter().map(|w| format!("\"{w}\"")).collect::<Vec<_>>().join(",")
        }
        write!(
            f,
            "[{}],[[{}],[{}]],[{}],[{}]",
            quoted(&self.a),
            quoted(&self.b[0]),
            quoted(&self.b[1]),
            quoted(&self.c),
            quoted(&self.input)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth16::Verifier;
    use crate::testing::{Fixture, fixture_rng};

    #[test]
    fn verification_key_json_roundtrip() {
        let mut rng = fixture_rng(20);
        let fx = Fixture::new(2, &mut rng);
        let json = VerificationKeyJson::from_verifying_key(&fx.vk);
        assert_eq!(json.n_public, 2);
        assert_eq!(json.ic.len(), 3);

        let text = serde_json::to_string_pretty(&json).unwrap();
        assert!(text.contains("\"nPublic\": 2"));
        assert!(text.contains("\"IC\""));
        let parsed = VerificationKeyJson::from_json(&text).unwrap();
        assert_eq!(parsed.to_verifying_key().unwrap(), fx.vk);
    }

    #[test]
    fn jacobian_coordinates_are_normalised() {
        let mut rng = fixture_rng(21);
        let fx = Fixture::new(1, &mut rng);
        let proof = fx.prove(&[Fr::from_u64(66)], &mut rng).unwrap();

        // Scale (x, y, 1) to (x z^2, y z^3, z).
        let z = Fq::from_u64(5);
        let a = proof.a;
        let pi_a = vec![
            (a.x * z.square()).to_string(),
            (a.y * z.square() * z).to_string(),
            z.to_string(),
        ];
        let mut json = ProofJson::from_proof(&proof);
        json.pi_a = pi_a;
        assert_eq!(json.to_proof().unwrap(), proof);
    }

    #[test]
    fn proof_json_checks_header() {
        let mut rng = fixture_rng(22);
        let fx = Fixture::new(1, &mut rng);
        let proof = fx.prove(&[Fr::ONE], &mut rng).unwrap();
        let mut json = ProofJson::from_proof(&proof);
        assert_eq!(json.to_proof().unwrap(), proof);

        json.protocol = "plonk".to_string();
        assert!(matches!(json.to_proof(), Err(ZkError::Decode(_))));
        json.protocol = "groth16".to_string();
        json.curve = "bls12381".to_string();
        assert!(matches!(json.to_proof(), Err(ZkError::Decode(_))));
    }

    #[test]
    fn snarkjs_infinity_points() {
        let text = r#"{
            "pi_a": ["0", "1", "0"],
            "pi_b": [["0", "0"], ["1", "0"], ["0", "0"]],
            "pi_c": ["0", "1", "0"]
        }"#;
        let proof = ProofJson::from_json(text).unwrap().to_proof().unwrap();
        assert!(proof.a.is_identity());
        assert!(proof.b.is_identity());
        assert!(proof.c.is_identity());
    }

    #[test]
    fn nonsense_key_fields_are_rejected() {
        let mut rng = fixture_rng(23);
        let fx = Fixture::new(1, &mut rng);
        let mut json = VerificationKeyJson::from_verifying_key(&fx.vk);
        json.n_public = 2;
        assert!(matches!(json.to_verifying_key(), Err(ZkError::Decode(_))));

        let mut json = VerificationKeyJson::from_verifying_key(&fx.vk);
        json.vk_alpha_1[1] = "12345".to_string();
        assert!(matches!(json.to_verifying_key(), Err(ZkError::InvalidPoint(_))));

        assert!(VerificationKeyJson::from_json("{}").is_err());
    }

    #[test]
    fn public_signals() {
        let signals = vec!["66".to_string(), "0".to_string()];
        let parsed = parse_public_signals(&signals).unwrap();
        assert_eq!(parsed, vec![Fr::from_u64(66), Fr::ZERO]);
        assert_eq!(parsed.iter().map(Fr::to_string).collect::<Vec<_>>(), signals);

        let r = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        assert!(parse_public_signals(&[r]).is_err());
        assert!(parse_public_signals(&["-1"]).is_err());
        for malformed in ["6_6", "+66", "0x4_2", ""] {
            assert!(matches!(parse_public_signals(&[malformed]), Err(ZkError::Decode(_))), "{malformed:?}");
        }

        let calldata = SolidityCalldata::parse("[0,0],[[0,0],[0,0]],[0,0],[6_6]").unwrap();
        assert!(calldata.public_inputs().is_err());
    }

    #[test]
    fn calldata_text_roundtrip() {
        let mut rng = fixture_rng(24);
        let fx = Fixture::new(1, &mut rng);
        let inputs = [Fr::from_u64(66)];
        let proof = fx.prove(&inputs, &mut rng).unwrap();

        let calldata = SolidityCalldata::from_proof(&proof, &inputs);
        assert!(calldata.a[0].starts_with("0x"));
        assert_eq!(calldata.a[0].len(), 66);

        let text = format!("{calldata}\n");
        let parsed = SolidityCalldata::parse(&text).unwrap();
        assert_eq!(parsed, calldata);
        assert_eq!(parsed.to_proof().unwrap(), proof);
        assert_eq!(parsed.public_inputs().unwrap(), inputs.to_vec());

        let verifier = Verifier::new(fx.vk.clone()).unwrap();
        assert!(verifier.verify(&parsed.public_inputs().unwrap(), &parsed.to_proof().unwrap()).unwrap());
    }

    #[test]
    fn all_zero_calldata_is_the_zero_proof() {
        let calldata = SolidityCalldata {
            a: ["0".into(), "0".into()],
            b: [["0".into(), "0".into()], ["0".into(), "0".into()]],
            c: ["0".into(), "0".into()],
            input: vec!["0".into()],
        };
        let proof = calldata.to_proof().unwrap();
        assert!(proof.a.is_identity() && proof.b.is_identity() && proof.c.is_identity());
        assert_eq!(calldata.public_inputs().unwrap(), vec![Fr::ZERO]);
    }

    #[test]
    fn short_calldata_is_rejected() {
        assert!(matches!(SolidityCalldata::parse("[\"0x1\",\"0x2\"]"), Err(ZkError::Decode(_))));
        let no_inputs = SolidityCalldata::parse("[\"0\",\"0\"],[[\"0\",\"0\"],[\"0\",\"0\"]],[\"0\",\"0\"],[]").unwrap();
        assert!(no_inputs.input.is_empty());
    }
}
