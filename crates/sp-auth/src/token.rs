//! Access/refresh token issuance and verification.
//!
//! Tokens are HMAC-SHA256 JWTs. Access and refresh tokens are signed
//! with distinct secrets and carry a `type` claim (`access` or
//! `refresh`) so one can never stand in for the other.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sp_model::User;

use crate::error::{AuthError, AuthResult};

/// Fallback expiration applied when an expiration string fails to parse.
const DEFAULT_EXPIRATION_SECS: i64 = 3600;

/// Token issuance configuration, environment-sourced.
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret for signing access tokens.
    pub access_secret: String,
    /// Secret for signing refresh tokens.
    pub refresh_secret: String,
    /// Access token expiration string (e.g. `1h`).
    pub access_expiration: String,
    /// Refresh token expiration string (e.g. `7d`).
    pub refresh_expiration: String,
    /// Whether `refresh` responses carry a fresh refresh token.
    pub rotate_refresh: bool,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_expiration", &self.access_expiration)
            .field("refresh_expiration", &self.refresh_expiration)
            .field("rotate_refresh", &self.rotate_refresh)
            .finish()
    }
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Login name.
    pub username: String,
    /// Email address, when known.
    pub email: Option<String>,
    /// Effective role names.
    pub roles: Vec<String>,
    /// Token kind (`access` or `refresh`).
    #[serde(rename = "type")]
    pub token_type: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

/// An issued token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token, when issued.
    pub refresh_token: Option<String>,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Parses an expiration string with the `<integer>[smhd]` suffix
/// grammar into seconds. The unit suffix is mandatory; anything
/// else, including a bare integer, falls back to 3600.
#[must_use]
pub fn parse_expiration(s: &str) -> i64 {
    let s = s.trim();

    let (digits, multiplier) = match s.chars().last() {
        Some('s') => (&s[..s.len() - 1], 1),
        Some('m') => (&s[..s.len() - 1], 60),
        Some('h') => (&s[..s.len() - 1], 3600),
        Some('d') => (&s[..s.len() - 1], 86400),
        _ => return DEFAULT_EXPIRATION_SECS,
    };

    match digits.parse::<i64>() {
        Ok(n) if n > 0 => n * multiplier,
        _ => DEFAULT_EXPIRATION_SECS,
    }
}

/// Issues and verifies access/refresh token pairs.
pub struct TokenIssuer {
    config: TokenConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenIssuer {
    /// Creates an issuer from configuration.
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        Self {
            config,
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
        }
    }

    /// Issues a fresh token pair for a user at login. Both tokens are
    /// always present on initial issuance.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, user: &User, roles: &[String]) -> AuthResult<TokenPair> {
        let now = Utc::now().timestamp();
        let expires_in = parse_expiration(&self.config.access_expiration);
        let refresh_expires_in = parse_expiration(&self.config.refresh_expiration);

        let access = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            token_type: "access".to_string(),
            iat: now,
            exp: now + expires_in,
        };

        let refresh = Claims {
            token_type: "refresh".to_string(),
            exp: now + refresh_expires_in,
            ..access.clone()
        };

        Ok(TokenPair {
            access_token: self.sign(&access, &self.access_encoding)?,
            refresh_token: Some(self.sign(&refresh, &self.refresh_encoding)?),
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// A new refresh token replaces the old one only when rotation is
    /// enabled in the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRefreshToken` if verification fails or the
    /// `type` claim is not `refresh`.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.verify(refresh_token, &self.refresh_decoding)?;

        if claims.token_type != "refresh" {
            return Err(AuthError::InvalidRefreshToken);
        }

        let now = Utc::now().timestamp();
        let expires_in = parse_expiration(&self.config.access_expiration);

        let access = Claims {
            token_type: "access".to_string(),
            iat: now,
            exp: now + expires_in,
            ..claims.clone()
        };
        let access_token = self.sign(&access, &self.access_encoding)?;

        let refresh_token = if self.config.rotate_refresh {
            let refresh_expires_in = parse_expiration(&self.config.refresh_expiration);
            let rotated = Claims {
                token_type: "refresh".to_string(),
                iat: now,
                exp: now + refresh_expires_in,
                ..claims
            };
            Some(self.sign(&rotated, &self.refresh_encoding)?)
        } else {
            None
        };

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if verification fails or the `type` claim
    /// is not `access`.
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        let claims = self
            .verify(token, &self.access_decoding)
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.token_type == "access" {
            Ok(claims)
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidRefreshToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(rotate: bool) -> TokenIssuer {
        TokenIssuer::new(TokenConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_expiration: "1h".to_string(),
            refresh_expiration: "7d".to_string(),
            rotate_refresh: rotate,
        })
    }

    fn test_user() -> User {
        User::new("jdoe").with_email("jdoe@example.com")
    }

    #[test]
    fn expiration_grammar() {
        assert_eq!(parse_expiration("30s"), 30);
        assert_eq!(parse_expiration("5m"), 300);
        assert_eq!(parse_expiration("1h"), 3600);
        assert_eq!(parse_expiration("7d"), 7 * 86400);
    }

    #[test]
    fn expiration_without_suffix_defaults() {
        assert_eq!(parse_expiration("120"), 3600);
        assert_eq!(parse_expiration("3600"), 3600);
        assert_eq!(parse_expiration("0"), 3600);
    }

    #[test]
    fn unparseable_expiration_defaults() {
        assert_eq!(parse_expiration("soon"), 3600);
        assert_eq!(parse_expiration(""), 3600);
        assert_eq!(parse_expiration("-5m"), 3600);
        assert_eq!(parse_expiration("1w"), 3600);
    }

    #[test]
    fn issue_includes_both_tokens() {
        let pair = issuer(false)
            .issue(&test_user(), &["user".to_string()])
            .unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);
        assert!(pair.refresh_token.is_some());
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer(false);
        let pair = issuer
            .issue(&test_user(), &["user".to_string(), "admin".to_string()])
            .unwrap();

        let claims = issuer.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.username, "jdoe");
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.roles, vec!["user", "admin"]);
    }

    #[test]
    fn refresh_without_rotation_omits_refresh_token() {
        let issuer = issuer(false);
        let pair = issuer.issue(&test_user(), &[]).unwrap();

        let refreshed = issuer.refresh(&pair.refresh_token.unwrap()).unwrap();
        assert!(refreshed.refresh_token.is_none());
        assert_eq!(refreshed.expires_in, 3600);
    }

    #[test]
    fn refresh_with_rotation_issues_new_refresh_token() {
        let issuer = issuer(true);
        let pair = issuer.issue(&test_user(), &[]).unwrap();

        let refreshed = issuer.refresh(&pair.refresh_token.unwrap()).unwrap();
        assert!(refreshed.refresh_token.is_some());
    }

    #[test]
    fn refresh_rejects_access_token() {
        let issuer = issuer(false);
        let pair = issuer.issue(&test_user(), &[]).unwrap();

        // Valid signature but wrong type claim
        assert!(matches!(
            issuer.refresh(&pair.access_token),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn access_verification_rejects_refresh_token() {
        let issuer = issuer(false);
        let pair = issuer.issue(&test_user(), &[]).unwrap();

        assert!(matches!(
            issuer.verify_access(&pair.refresh_token.unwrap()),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn refresh_rejects_wrong_type_even_with_valid_signature() {
        let issuer = issuer(false);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "abc".to_string(),
            username: "jdoe".to_string(),
            email: None,
            roles: vec![],
            token_type: "access".to_string(),
            iat: now,
            exp: now + 600,
        };
        // Signed with the refresh secret so only the type check can fail
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"refresh-secret"),
        )
        .unwrap();

        assert!(matches!(
            issuer.refresh(&token),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn refresh_rejects_garbage() {
        assert!(matches!(
            issuer(false).refresh("not-a-jwt"),
            Err(AuthError::InvalidRefreshToken)
        ));
    }
}
