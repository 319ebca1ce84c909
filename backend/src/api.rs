use crate::errors::ApiError;
use crate::models::*;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use zk_verifier::groth16::{deserialize_proof, serialize_vk};
use zk_verifier::types::{SolidityCalldata, parse_public_signals};
use zk_verifier::{Fr, Proof, Verifier, ZkError};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/v1/zk/vk", get(get_vk))
        .route("/api/v1/verify", post(verify))
        .route("/api/v1/verify/binary", post(verify_binary))
        .route("/api/v1/verify/calldata", post(verify_calldata))
        .route("/api/v1/verify/batch", post(verify_batch))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn get_vk(State(state): State<AppState>) -> Result<Json<ZkVkResponse>, ApiError> {
    let vk = state.verifier.verifying_key();
    let b64 = base64::engine::general_purpose::STANDARD.encode(serialize_vk(vk));

    Ok(Json(ZkVkResponse {
        curve: "bn254".to_string(),
        proof_system: "groth16".to_string(),
        n_public: vk.num_public_inputs(),
        vk_b64: b64,
    }))
}

fn decode_request(req: &VerifyRequest) -> Result<(Vec<Fr>, Proof), ZkError> {
    let proof = req.proof.to_proof()?;
    let inputs = parse_public_signals(&req.public_signals)?;
    Ok((inputs, proof))
}

/// Decoding runs `[r]Q` subgroup checks and verifying runs pairings, so the whole job goes
/// to the blocking pool.
async fn run_blocking<T, F>(state: &AppState, job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Verifier) -> Result<T, ZkError> + Send + 'static,
{
    let verifier = state.verifier.clone();
    let out = tokio::task::spawn_blocking(move || job(&verifier))
        .await
        .map_err(|_| ApiError::Internal)??;
    Ok(out)
}

async fn verify(State(state): State<AppState>, Json(req): Json<VerifyRequest>) -> Result<Json<VerifyResponse>, ApiError> {
    let ok = run_blocking(&state, move |verifier| {
        let (inputs, proof) = decode_request(&req)?;
        verifier.verify(&inputs, &proof)
    })
    .await?;
    Ok(Json(VerifyResponse { ok }))
}

async fn verify_binary(
    State(state): State<AppState>,
    Json(req): Json<VerifyBinaryRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let proof_bytes = base64::engine::general_purpose::STANDARD
        .decode(req.proof_b64)
        .map_err(|_| ApiError::BadRequest("invalid proof_b64".to_string()))?;
    let signals = req.public_signals;

    let ok = run_blocking(&state, move |verifier| {
        let proof = deserialize_proof(&proof_bytes)?;
        let inputs = parse_public_signals(&signals)?;
        verifier.verify(&inputs, &proof)
    })
    .await?;
    Ok(Json(VerifyResponse { ok }))
}

async fn verify_calldata(
    State(state): State<AppState>,
    Json(calldata): Json<SolidityCalldata>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let ok = run_blocking(&state, move |verifier| {
        let proof = calldata.to_proof()?;
        let inputs = calldata.public_inputs()?;
        verifier.verify(&inputs, &proof)
    })
    .await?;
    Ok(Json(VerifyResponse { ok }))
}

/// Items that fail to decode are reported in place; the rest are verified together.
async fn verify_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchVerifyRequest>,
) -> Result<Json<BatchVerifyResponse>, ApiError> {
    if req.items.len() > state.max_batch_size {
        return Err(ApiError::BadRequest(format!(
            "batch of {} items exceeds the limit of {}",
            req.items.len(),
            state.max_batch_size
        )));
    }

    let items = req.items;
    let outcomes = run_blocking(&state, move |verifier| {
        let decoded: Vec<Result<(Vec<Fr>, Proof), ZkError>> = items.iter().map(decode_request).collect();
        let ready: Vec<(Vec<Fr>, Proof)> = decoded.iter().filter_map(|d| d.as_ref().ok()).cloned().collect();
        let mut verified = verifier.verify_batch(&ready).into_iter();
        Ok(decoded
            .into_iter()
            .map(|d| d.and_then(|_| verified.next().unwrap_or(Err(ZkError::Decode("missing result".to_string())))))
            .collect::<Vec<_>>())
    })
    .await?;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(ok) => BatchItemResult { ok, error: None },
            Err(e) => BatchItemResult {
                ok: false,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(BatchVerifyResponse { results }))
}
