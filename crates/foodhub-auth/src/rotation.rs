//! Refresh-token rotation.
//!
//! A valid refresh token is exchanged for a complete new pair built from
//! the identity inside that token. The old refresh token is not extended or
//! reused. Concurrent rotations of the same token are not serialized, so
//! both may succeed.

use chrono::{DateTime, Utc};

use crate::claims::{Identity, TokenKind};
use crate::error::AuthError;
use crate::issuer::{TokenIssuer, TokenPair};

/// Outcome of a successful rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// Identity taken from the presented refresh token.
    pub identity: Identity,
    pub pair: TokenPair,
}

pub fn rotate(issuer: &TokenIssuer, refresh_token: &str) -> Result<Rotation, AuthError> {
    rotate_at(issuer, refresh_token, Utc::now())
}

/// Validates `refresh_token` as of `now` and issues a replacement pair.
///
/// # Errors
///
/// - [`AuthError::MissingCredential`] for an empty token
/// - [`AuthError::Expired`], [`AuthError::InvalidSignature`] from verification
/// - [`AuthError::WrongTokenKind`] when an access token is presented
/// - [`AuthError::Signing`] if the new pair cannot be signed
pub fn rotate_at(
    issuer: &TokenIssuer,
    refresh_token: &str,
    now: DateTime<Utc>,
) -> Result<Rotation, AuthError> {
    let claims = issuer.verify_kind_at(refresh_token, TokenKind::Refresh, now)?;
    let identity = claims.identity();
    let pair = issuer.issue_pair_at(&identity, now)?;

    Ok(Rotation { identity, pair })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Role;
    use chrono::{Duration, TimeZone};
    use foodhub_config::JwtConfig;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig::new("test-secret-key-at-least-32-characters-long"))
    }

    fn identity() -> Identity {
        Identity::new("8c0b3a55-1111-4111-8111-000000000042", "eve@example.com", Role::Restaurant)
    }

    #[test]
    fn test_rotate_issues_new_refresh_token() {
        let issuer = issuer();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let pair = issuer.issue_pair_at(&identity(), now).unwrap();

        // Same second as issuance: the jti still makes the new token distinct.
        let rotation = rotate_at(&issuer, &pair.refresh_token, now).unwrap();

        assert_ne!(rotation.pair.refresh_token, pair.refresh_token);
        assert_ne!(rotation.pair.access_token, pair.access_token);
        assert_eq!(rotation.identity, identity());
    }

    #[test]
    fn test_rotate_chain_never_repeats_tokens() {
        let issuer = issuer();
        let mut current = issuer.issue_pair(&identity()).unwrap().refresh_token;
        let mut seen = vec![current.clone()];

        for _ in 0..5 {
            let rotation = rotate(&issuer, &current).unwrap();
            assert!(!seen.contains(&rotation.pair.refresh_token));
            current = rotation.pair.refresh_token;
            seen.push(current.clone());
        }
    }

    #[test]
    fn test_rotated_pair_keeps_identity_from_token() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&identity()).unwrap();
        let rotation = rotate(&issuer, &pair.refresh_token).unwrap();

        assert_eq!(issuer.authenticate(&rotation.pair.access_token).unwrap(), identity());
    }

    #[test]
    fn test_rotate_slides_expiry_forward() {
        let issuer = issuer();
        let issued = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let pair = issuer.issue_pair_at(&identity(), issued).unwrap();

        let later = issued + Duration::days(4);
        let rotation = rotate_at(&issuer, &pair.refresh_token, later).unwrap();

        assert_eq!(
            rotation.pair.refresh_expires_at,
            later.timestamp() + Duration::days(5).num_seconds()
        );
        assert!(rotation.pair.refresh_expires_at > pair.refresh_expires_at);
    }

    #[test]
    fn test_rotate_expired_refresh_token_fails() {
        let issuer = issuer();
        let issued = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let pair = issuer.issue_pair_at(&identity(), issued).unwrap();

        let after_expiry = issued + Duration::days(5);
        assert_eq!(
            rotate_at(&issuer, &pair.refresh_token, after_expiry),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_rotate_refuses_access_token() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&identity()).unwrap();
        assert_eq!(
            rotate(&issuer, &pair.access_token),
            Err(AuthError::WrongTokenKind {
                expected: TokenKind::Refresh
            })
        );
    }

    #[test]
    fn test_rotate_token_from_other_secret_fails() {
        let pair = TokenIssuer::new(&JwtConfig::new("old-secret-that-was-rotated-away-000"))
            .issue_pair(&identity())
            .unwrap();

        assert_eq!(
            rotate(&issuer(), &pair.refresh_token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_rotate_empty_token_is_missing_credential() {
        assert_eq!(rotate(&issuer(), ""), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_concurrent_rotations_of_same_token_both_succeed() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&identity()).unwrap();

        let first = rotate(&issuer, &pair.refresh_token).unwrap();
        let second = rotate(&issuer, &pair.refresh_token).unwrap();

        assert_ne!(first.pair.refresh_token, second.pair.refresh_token);
        assert!(issuer.authenticate(&first.pair.access_token).is_ok());
        assert!(issuer.authenticate(&second.pair.access_token).is_ok());
    }
}
