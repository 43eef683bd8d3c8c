//! OAuth2 client-credentials authentication.

use reqwest::Client;
use serde::Serialize;

use crate::api::types::TokenResponse;
use crate::error::{Error, Result};

/// Form body for the token endpoint.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Exchange client credentials for an access token.
///
/// Any error body or non-success status maps to `Error::InvalidCredentials`.
pub async fn request_access_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String> {
    tracing::debug!("POST {}", token_url);

    let response = client
        .post(token_url)
        .form(&TokenRequest {
            grant_type: "client_credentials",
            client_id,
            client_secret,
        })
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;
    tracing::debug!("Token response status: {}", status);

    interpret_token_response(status, &body)
}

/// Decide whether a token endpoint response carries a usable token.
pub fn interpret_token_response(status: u16, body: &str) -> Result<String> {
    let parsed: Option<TokenResponse> = serde_json::from_str(body).ok();

    if let Some(TokenResponse {
        error: Some(error),
        error_description,
        ..
    }) = &parsed
    {
        return Err(Error::InvalidCredentials(match error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error.clone(),
        }));
    }

    if !(200..300).contains(&status) {
        return Err(Error::InvalidCredentials(format!(
            "token endpoint returned HTTP {}",
            status
        )));
    }

    parsed
        .and_then(|t| t.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::InvalidCredentials("token endpoint returned no access token".into()))
}
