use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CryptResult;

/// `sub` is the owner id as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerClaims {
    pub sub: String,
    pub exp: i64,
}

impl OwnerClaims {
    pub fn new(owner: Uuid, ttl: Duration) -> Self {
        Self {
            sub: owner.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }

    pub fn owner(&self) -> CryptResult<Uuid> {
        Ok(Uuid::parse_str(&self.sub)?)
    }
}

pub fn issue_token<K: AsRef<[u8]>>(claims: &OwnerClaims, key: K) -> CryptResult<String> {
    let key = EncodingKey::from_secret(key.as_ref());
    Ok(jsonwebtoken::encode(&Header::default(), claims, &key)?)
}

/// Checks signature and expiry and hands back the owner id.
pub fn verify_token<K: AsRef<[u8]>>(token: &str, key: K) -> CryptResult<Uuid> {
    let key = DecodingKey::from_secret(key.as_ref());
    let data = jsonwebtoken::decode::<OwnerClaims>(token, &key, &Validation::default())?;
    data.claims.owner()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auth::CryptError;

    #[test]
    fn token_carries_owner() {
        let owner = Uuid::new_v4();
        let token = issue_token(&OwnerClaims::new(owner, Duration::hours(1)), "k").unwrap();
        assert_eq!(verify_token(&token, "k").unwrap(), owner);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = issue_token(&OwnerClaims::new(Uuid::new_v4(), Duration::hours(1)), "k").unwrap();
        assert!(matches!(verify_token(&token, "other"), Err(CryptError::JwtError(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = OwnerClaims::new(Uuid::new_v4(), Duration::hours(-2));
        let token = issue_token(&claims, "k").unwrap();
        assert!(verify_token(&token, "k").is_err());
    }

    #[test]
    fn subject_must_be_uuid() {
        let claims = OwnerClaims {
            sub: "alice".into(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = issue_token(&claims, "k").unwrap();
        assert!(matches!(verify_token(&token, "k"), Err(CryptError::InvalidSubject(_))));
    }
}
