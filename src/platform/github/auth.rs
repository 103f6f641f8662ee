use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::Serialize;
use std::path::Path;

use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct JwtClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Generate a JWT for GitHub App authentication.
pub fn generate_app_jwt(app_id: u64, private_key_path: &Path) -> Result<String> {
    let key_pem = std::fs::read(private_key_path).map_err(|e| {
        AppError::Config(format!(
            "Failed to read private key at {}: {e}",
            private_key_path.display()
        ))
    })?;

    app_jwt_from_pem(app_id, &key_pem)
}

fn app_jwt_from_pem(app_id: u64, key_pem: &[u8]) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key_pem)
        .map_err(|e| AppError::Config(format!("Invalid RSA private key: {e}")))?;

    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        iat: now - 60,      // clock drift allowance
        exp: now + 10 * 60, // 10 minute maximum
        iss: app_id.to_string(),
    };

    let header = Header::new(Algorithm::RS256);
    encode(&header, &claims, &encoding_key)
        .map_err(|e| AppError::Config(format!("Failed to generate JWT: {e}")))
}

/// Exchange an app JWT for an installation access token.
///
/// The token lives for an hour, which outlasts a single sync run.
pub async fn installation_token(
    api: Option<&str>,
    app_id: u64,
    private_key_path: &Path,
    installation_id: u64,
) -> Result<String> {
    let jwt = generate_app_jwt(app_id, private_key_path)?;

    let mut builder = Octocrab::builder()
        .personal_token(jwt)
        .add_retry_config(RetryConfig::None);
    if let Some(api) = api {
        builder = builder
            .base_uri(api)
            .map_err(|e| AppError::Config(format!("Invalid github.api_url: {e}")))?;
    }
    let client = builder
        .build()
        .map_err(|e| AppError::GitHubApi(format!("Failed to build JWT client: {e}")))?;

    let url = format!("/app/installations/{installation_id}/access_tokens");
    let response: serde_json::Value = client
        .post(&url, None::<&()>)
        .await
        .map_err(|e| AppError::GitHubApi(format!("Failed to create installation token: {e}")))?;

    response["token"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::GitHubApi("No token in response".to_string()))
}
