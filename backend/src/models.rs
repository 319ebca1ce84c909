use serde::{Deserialize, Serialize};
use zk_verifier::types::ProofJson;

#[derive(Debug, Serialize, Deserialize)]
pub struct ZkVkResponse {
    pub curve: String,
    pub proof_system: String,
    pub n_public: usize,
    /// Binary verification key (`serialize_vk` layout), base64.
    pub vk_b64: String,
}

/// snarkjs `proof.json` plus `public.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub proof: ProofJson,
    pub public_signals: Vec<String>,
}

/// 256-byte binary proof, base64, plus decimal public signals.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyBinaryRequest {
    pub proof_b64: String,
    pub public_signals: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchVerifyRequest {
    pub items: Vec<VerifyRequest>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchItemResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchVerifyResponse {
    pub results: Vec<BatchItemResult>,
}
