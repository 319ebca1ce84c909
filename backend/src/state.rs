use crate::config::Config;
use crate::errors::ApiError;
use std::path::Path;
use std::sync::Arc;
use zk_verifier::types::VerificationKeyJson;
use zk_verifier::{Verifier, VerifyingKey, load_verification_key};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<Verifier>,
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(verifier: Verifier, max_batch_size: usize) -> Self {
        Self {
            verifier: Arc::new(verifier),
            max_batch_size,
        }
    }

    /// Read the verification key named by the config and prepare it.
    ///
    /// Preparing computes `e(alpha, beta)`, so this runs off the async executor.
    pub async fn load(config: &Config) -> Result<Self, ApiError> {
        let path = config.vk_path.clone();
        let is_json = config.vk_is_json();

        let verifier = tokio::task::spawn_blocking(move || {
            let vk = read_verifying_key(&path, is_json)?;
            Verifier::new(vk).map_err(|e| config_error(&path, e))
        })
        .await
        .map_err(|_| ApiError::Internal)??;

        tracing::info!(
            path = %config.vk_path.display(),
            n_public = verifier.num_public_inputs(),
            "verification key loaded"
        );

        Ok(Self::new(verifier, config.max_batch_size))
    }
}

fn config_error(path: &Path, err: impl std::fmt::Display) -> ApiError {
    ApiError::Config(format!("{}: {err}", path.display()))
}

fn read_verifying_key(path: &Path, is_json: bool) -> Result<VerifyingKey, ApiError> {
    if is_json {
        let text = std::fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        VerificationKeyJson::from_json(&text)
            .and_then(|json| json.to_verifying_key())
            .map_err(|e| config_error(path, e))
    } else {
        let bytes = std::fs::read(path).map_err(|e| config_error(path, e))?;
        load_verification_key(&bytes).map_err(|e| config_error(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use zk_verifier::groth16::serialize_vk;
    use zk_verifier::testing::{Fixture, fixture_rng};

    fn config(vk_path: PathBuf) -> Config {
        Config {
            addr: "127.0.0.1:0".to_string(),
            vk_path,
            max_batch_size: 8,
        }
    }

    #[tokio::test]
    async fn loads_json_and_binary_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let fx = Fixture::new(2, &mut fixture_rng(30));

        let json_path = tmp.path().join("verification_key.json");
        let json = serde_json::to_string(&VerificationKeyJson::from_verifying_key(&fx.vk)).unwrap();
        std::fs::write(&json_path, json).unwrap();
        let state = AppState::load(&config(json_path)).await.unwrap();
        assert_eq!(state.verifier.verifying_key(), &fx.vk);
        assert_eq!(state.max_batch_size, 8);

        let bin_path = tmp.path().join("groth16_vk.bin");
        std::fs::write(&bin_path, serialize_vk(&fx.vk)).unwrap();
        let state = AppState::load(&config(bin_path)).await.unwrap();
        assert_eq!(state.verifier.num_public_inputs(), 2);
    }

    #[tokio::test]
    async fn missing_or_broken_keys_fail_startup() {
        let tmp = tempfile::tempdir().unwrap();

        let missing = AppState::load(&config(tmp.path().join("absent.json"))).await;
        assert!(matches!(missing, Err(ApiError::Config(_))));

        let broken_path = tmp.path().join("broken.bin");
        std::fs::write(&broken_path, [0u8; 10]).unwrap();
        let broken = AppState::load(&config(broken_path)).await;
        assert!(matches!(broken, Err(ApiError::Config(_))));
    }
}
