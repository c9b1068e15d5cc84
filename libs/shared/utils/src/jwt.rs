use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Verification failure. Malformed, tampered and expired tokens all map here
/// so callers cannot tell them apart.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid token")]
pub struct InvalidToken;

#[derive(Error, Debug)]
pub enum TokenIssueError {
    #[error("Token secret is not set")]
    MissingSecret,

    #[error("Token lifetime must be positive and representable: {0}")]
    InvalidTtl(Duration),

    #[error("Failed to create HMAC")]
    Key,

    #[error("Failed to encode token: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn issue_token(subject: &str, secret: &str, ttl: Duration) -> Result<String, TokenIssueError> {
    issue_token_at(subject, secret, Utc::now(), ttl)
}

pub fn issue_token_at(
    subject: &str,
    secret: &str,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, TokenIssueError> {
    if secret.is_empty() {
        return Err(TokenIssueError::MissingSecret);
    }
    if ttl <= Duration::zero() {
        return Err(TokenIssueError::InvalidTtl(ttl));
    }
    let expires_at = issued_at
        .checked_add_signed(ttl)
        .ok_or(TokenIssueError::InvalidTtl(ttl))?;

    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };
    let claims = JwtClaims {
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
    let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenIssueError::Key)?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature_b64))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<JwtClaims, InvalidToken> {
    validate_token_at(token, jwt_secret, Utc::now())
}

pub fn validate_token_at(
    token: &str,
    jwt_secret: &str,
    now: DateTime<Utc>,
) -> Result<JwtClaims, InvalidToken> {
    if jwt_secret.is_empty() {
        debug!("JWT secret is not set");
        return Err(InvalidToken);
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!("Invalid token format");
        return Err(InvalidToken);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        InvalidToken
    })?;

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| {
        debug!("Failed to create HMAC");
        InvalidToken
    })?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    // Constant-time comparison
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(InvalidToken);
    }

    let header: JwtHeader = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        debug!("Unexpected token algorithm: {}", header.alg);
        return Err(InvalidToken);
    }

    let claims: JwtClaims = decode_segment(claims_b64)?;

    if claims.sub.trim().is_empty() {
        debug!("Token has empty subject");
        return Err(InvalidToken);
    }

    let now_ts = now.timestamp();
    if now_ts >= claims.exp {
        debug!("Token expired at {} (now: {})", claims.exp, now_ts);
        return Err(InvalidToken);
    }

    debug!("Token validated successfully for subject: {}", claims.sub);
    Ok(claims)
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, InvalidToken> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        debug!("Failed to decode token segment: {}", e);
        InvalidToken
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        debug!("Failed to parse token segment: {}", e);
        InvalidToken
    })
}
