use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Issuer written into every token this service signs.
pub const ISSUER: &str = "self";

/// Access tokens live for one hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3_600;

/// Refresh tokens live for seven days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// Claims carried by both access and refresh tokens.
///
/// Decoded once per request into a typed structure; authorization decisions
/// never inspect raw claim maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,

    /// Subject, the username
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Role names granted to the subject
    pub roles: Vec<String>,
}

impl AccessClaims {
    /// Build access-token claims for a user.
    ///
    /// Roles are sanitized: any `ROLE_` prefix is stripped and duplicates
    /// removed, first occurrence winning, so the authorization layer can
    /// re-apply its prefix at verification time without double-prefixing.
    pub fn access(username: &str, roles: &[String]) -> Self {
        let now = Utc::now().timestamp();
        Self {
            iss: ISSUER.to_string(),
            sub: username.to_string(),
            iat: now,
            exp: now + ACCESS_TOKEN_TTL_SECS,
            roles: sanitize_roles(roles),
        }
    }

    /// Build refresh-token claims for a user.
    ///
    /// Roles are carried unmodified; sanitizing happens when the refresh
    /// token is exchanged for a new access token.
    pub fn refresh(username: &str, roles: &[String]) -> Self {
        let now = Utc::now().timestamp();
        Self {
            iss: ISSUER.to_string(),
            sub: username.to_string(),
            iat: now,
            exp: now + REFRESH_TOKEN_TTL_SECS,
            roles: roles.to_vec(),
        }
    }

    /// Check whether the expiry instant has passed.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

fn sanitize_roles(roles: &[String]) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
        let bare = role.strip_prefix("ROLE_").unwrap_or(role);
        if !sanitized.iter().any(|r| r == bare) {
            sanitized.push(bare.to_string());
        }
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_shape() {
        let claims = AccessClaims::access("alice", &["ROLE_USER".to_string()]);

        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS);
        assert_eq!(claims.roles, vec!["USER".to_string()]);
    }

    #[test]
    fn test_refresh_claims_keep_roles_unmodified() {
        let roles = vec!["ROLE_ADMIN".to_string(), "ROLE_ADMIN".to_string()];
        let claims = AccessClaims::refresh("alice", &roles);

        assert_eq!(claims.exp - claims.iat, REFRESH_TOKEN_TTL_SECS);
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_sanitize_strips_prefix_and_dedupes() {
        let roles = vec![
            "ROLE_ADMIN".to_string(),
            "ADMIN".to_string(),
            "USER".to_string(),
        ];
        assert_eq!(
            sanitize_roles(&roles),
            vec!["ADMIN".to_string(), "USER".to_string()]
        );
    }

    #[test]
    fn test_is_expired() {
        let mut claims = AccessClaims::access("alice", &["USER".to_string()]);
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }
}
