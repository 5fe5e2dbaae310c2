//! Session tokens
//!
//! Stateless authentication: the session cookie carries a signed token
//! instead of a key into a server-side store. A token is
//! `<user_id>.<expires_unix>.<signature>` where the signature is an
//! HMAC-SHA256 over the first two fields, base64url-encoded. Logout is
//! purely client-side (the cookie is cleared); tokens expire on their
//! own.

use chrono::{Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Token lifetime for a plain login
const SESSION_TTL_DAYS: i64 = 1;

/// Token lifetime when "remember me" is checked
const REMEMBER_TTL_DAYS: i64 = 30;

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct SessionManager {
    key: Vec<u8>,
}

impl SessionManager {
    /// Create a session manager keyed by the configured secret.
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Issue a token for `user_id`, valid for the standard or extended
    /// lifetime depending on `remember`.
    pub fn issue(&self, user_id: i64, remember: bool) -> String {
        let ttl = if remember {
            Duration::days(REMEMBER_TTL_DAYS)
        } else {
            Duration::days(SESSION_TTL_DAYS)
        };
        self.issue_with_expiry(user_id, (Utc::now() + ttl).timestamp())
    }

    fn issue_with_expiry(&self, user_id: i64, expires_at: i64) -> String {
        let payload = format!("{}.{}", user_id, expires_at);
        format!("{}.{}", payload, self.sign(&payload))
    }

    /// Verify a token and return the user ID it was issued for.
    ///
    /// Returns `None` for malformed tokens, bad signatures, and expired
    /// tokens alike; callers treat all three as "not logged in".
    pub fn verify(&self, token: &str) -> Option<i64> {
        let (payload, signature) = token.rsplit_once('.')?;
        let (user_id, expires_at) = payload.split_once('.')?;

        let user_id: i64 = user_id.parse().ok()?;
        let expires_at: i64 = expires_at.parse().ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = BASE64URL_NOPAD.decode(signature.as_bytes()).ok()?;
        // verify_slice is constant-time
        mac.verify_slice(&signature).ok()?;

        if expires_at <= Utc::now().timestamp() {
            return None;
        }

        Some(user_id)
    }

    /// Build the Set-Cookie value that installs a session token.
    ///
    /// A remembered session gets an explicit Max-Age so the browser
    /// persists it; otherwise the cookie lives for the browser session
    /// while the token's own expiry bounds it server-side.
    pub fn login_cookie(&self, token: &str, remember: bool) -> String {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
        if remember {
            cookie.push_str(&format!(
                "; Max-Age={}",
                Duration::days(REMEMBER_TTL_DAYS).num_seconds()
            ));
        }
        cookie
    }

    /// Build the Set-Cookie value that clears the session cookie.
    pub fn logout_cookie(&self) -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        BASE64URL_NOPAD.encode(&mac.finalize().into_bytes())
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.key).expect("HMAC key of any length is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manager() -> SessionManager {
        SessionManager::new("test-secret-key")
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let mgr = manager();
        let token = mgr.issue(42, false);

        assert_eq!(mgr.verify(&token), Some(42));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mgr = manager();
        let token = mgr.issue_with_expiry(42, Utc::now().timestamp() - 60);

        assert_eq!(mgr.verify(&token), None);
    }

    #[test]
    fn test_tampered_user_id_rejected() {
        let mgr = manager();
        let token = mgr.issue(42, false);
        let forged = token.replacen("42", "43", 1);

        assert_eq!(mgr.verify(&forged), None);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = manager().issue(42, false);
        let other = SessionManager::new("different-secret");

        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let mgr = manager();

        assert_eq!(mgr.verify(""), None);
        assert_eq!(mgr.verify("garbage"), None);
        assert_eq!(mgr.verify("1.2"), None);
        assert_eq!(mgr.verify("a.b.c"), None);
    }

    #[test]
    fn test_login_cookie_attributes() {
        let mgr = manager();
        let token = mgr.issue(1, false);

        let cookie = mgr.login_cookie(&token, false);
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Max-Age"));

        let remembered = mgr.login_cookie(&token, true);
        assert!(remembered.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_logout_cookie_clears() {
        let cookie = manager().logout_cookie();

        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn property_token_roundtrip_any_user_id(user_id in 1i64..i64::MAX / 2) {
            let mgr = manager();
            let token = mgr.issue(user_id, true);

            prop_assert_eq!(mgr.verify(&token), Some(user_id));
        }

        #[test]
        fn property_signature_tamper_rejected(
            user_id in 1i64..100_000,
            flip in 0usize..16,
        ) {
            let mgr = manager();
            let token = mgr.issue(user_id, false);

            // Corrupt one character of the signature
            let dot = token.rfind('.').unwrap();
            let mut bytes = token.into_bytes();
            let idx = dot + 1 + flip % (bytes.len() - dot - 1);
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            prop_assert_eq!(mgr.verify(&tampered), None);
        }
    }
}
