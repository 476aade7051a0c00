use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::TokenError;
use crate::principal::Principal;
use crate::principal::Role;

/// Verification half of the token pair.
///
/// Holds only the RSA public key, so it can run in a process that never sees
/// the signing key.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    /// Create a verifier from a PEM-encoded RSA public key.
    pub fn from_rsa_pem(public_key_pem: &[u8]) -> Result<Self, TokenError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self { decoding_key })
    }

    /// Check signature and expiry, returning the typed claims.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let validation = Validation::new(Algorithm::RS256);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken(e.to_string()),
            })
    }

    /// Verify a token and reconstruct the [`Principal`] it proves.
    ///
    /// Role strings are mapped onto [`Role`]; unrecognized names are dropped.
    /// A token whose roles map to nothing is rejected, so an authenticated
    /// principal always holds at least one role.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = self.decode(token)?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::MissingClaim("sub"));
        }

        let mut roles: Vec<Role> = Vec::new();
        for name in &claims.roles {
            if let Ok(role) = name.parse::<Role>() {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }

        if roles.is_empty() {
            return Err(TokenError::InvalidToken(
                "token carries no recognized roles".to_string(),
            ));
        }

        Ok(Principal::new(claims.sub, roles))
    }
}

/// Issues and refreshes RSA-signed bearer tokens.
///
/// Built once at process start from the PEM key pair; signing uses the
/// private key, verification delegates to the embedded [`TokenVerifier`].
pub struct TokenService {
    encoding_key: EncodingKey,
    verifier: TokenVerifier,
}

impl TokenService {
    /// Create a token service from PEM-encoded RSA private and public keys.
    pub fn from_rsa_pem(
        private_key_pem: &[u8],
        public_key_pem: &[u8],
    ) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        let verifier = TokenVerifier::from_rsa_pem(public_key_pem)?;
        Ok(Self {
            encoding_key,
            verifier,
        })
    }

    /// Issue a one-hour access token for a user.
    ///
    /// Role names are sanitized (see [`AccessClaims::access`]).
    ///
    /// # Errors
    /// * `SigningFailed` - the signing operation itself failed
    pub fn issue_access_token(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<String, TokenError> {
        self.encode(&AccessClaims::access(username, roles))
    }

    /// Issue a seven-day refresh token for a user. Roles are carried as-is.
    pub fn issue_refresh_token(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<String, TokenError> {
        self.encode(&AccessClaims::refresh(username, roles))
    }

    /// Exchange a valid refresh token for a fresh access token.
    ///
    /// # Errors
    /// * `TokenExpired` - the refresh token's expiry has passed
    /// * `InvalidToken` - bad signature, blank subject, or no roles claim
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verifier.decode(refresh_token)?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::InvalidToken(
                "refresh token does not contain a valid user".to_string(),
            ));
        }

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::TokenExpired);
        }

        if claims.roles.is_empty() {
            return Err(TokenError::InvalidToken(
                "no roles found in refresh token".to_string(),
            ));
        }

        self.issue_access_token(&claims.sub, &claims.roles)
    }

    /// Verify a token and reconstruct its [`Principal`].
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        self.verifier.verify(token)
    }

    /// The public-key verification half, for handing to middleware.
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    fn encode(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::RS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::ISSUER;

    const PRIVATE_PEM: &str = include_str!("../../testdata/rsa_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../testdata/rsa_public.pem");
    const OTHER_PUBLIC_PEM: &str = include_str!("../../testdata/rsa_other_public.pem");

    fn service() -> TokenService {
        TokenService::from_rsa_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
            .expect("Failed to build token service")
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();

        let token = service
            .issue_access_token("alice", &["ROLE_USER".to_string()])
            .expect("Failed to issue token");

        let principal = service.verify(&token).expect("Failed to verify token");
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.roles, vec![Role::User]);
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_verification_needs_only_the_public_key() {
        let service = service();
        let verifier = TokenVerifier::from_rsa_pem(PUBLIC_PEM.as_bytes())
            .expect("Failed to build verifier");

        let token = service
            .issue_access_token("alice", &["ADMIN".to_string()])
            .expect("Failed to issue token");

        let principal = verifier.verify(&token).expect("Failed to verify token");
        assert_eq!(principal.username, "alice");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_wrong_public_key_rejected() {
        let service = service();
        let verifier = TokenVerifier::from_rsa_pem(OTHER_PUBLIC_PEM.as_bytes())
            .expect("Failed to build verifier");

        let token = service
            .issue_access_token("alice", &["USER".to_string()])
            .expect("Failed to issue token");

        assert!(matches!(
            verifier.verify(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_never_yields_a_principal() {
        let service = service();

        let mut claims = AccessClaims::access("alice", &["USER".to_string()]);
        claims.iat -= 7_200;
        claims.exp = claims.iat + 60;
        let token = service.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::TokenExpired)
        ));
    }

    #[test]
    fn test_access_token_claims_layout() {
        let service = service();

        let token = service
            .issue_access_token(
                "alice",
                &["ROLE_ADMIN".to_string(), "ADMIN".to_string()],
            )
            .expect("Failed to issue token");

        let claims = service.verifier().decode(&token).expect("Failed to decode");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, "alice");
        // Prefix stripped and duplicate collapsed
        assert_eq!(claims.roles, vec!["ADMIN".to_string()]);
    }

    #[test]
    fn test_refresh_yields_new_access_token_for_same_subject() {
        let service = service();

        let refresh = service
            .issue_refresh_token("alice", &["ROLE_USER".to_string()])
            .expect("Failed to issue refresh token");

        let access = service
            .refresh_access_token(&refresh)
            .expect("Failed to refresh");

        let principal = service.verify(&access).expect("Failed to verify");
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.roles, vec![Role::User]);
    }

    #[test]
    fn test_refresh_rejects_blank_subject() {
        let service = service();

        let mut claims = AccessClaims::refresh("  ", &["USER".to_string()]);
        claims.sub = "  ".to_string();
        let token = service.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            service.refresh_access_token(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_refresh_rejects_empty_roles() {
        let service = service();

        let claims = AccessClaims::refresh("alice", &[]);
        let token = service.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            service.refresh_access_token(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_refresh_rejects_expired_refresh_token() {
        let service = service();

        let mut claims = AccessClaims::refresh("alice", &["USER".to_string()]);
        // Far enough in the past to clear the decoder's default leeway
        claims.iat -= 7_200;
        claims.exp = claims.iat + 60;
        let token = service.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            service.refresh_access_token(&token),
            Err(TokenError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = service();

        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_with_only_unknown_roles_rejected() {
        let service = service();

        let claims = AccessClaims::access("alice", &["AUDITOR".to_string()]);
        let token = service.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }
}
