use crate::utils::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by the bearer tokens the identity provider issues.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject identifier — the stable user identity
    pub sub: String,
    /// Expiration (unix seconds)
    pub exp: usize,
}

/// Verified caller identity, inserted into request extensions by the auth
/// middleware and extracted by handlers via `web::ReqData<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject_id: String,
}

/// Black-box credential check: token string in, subject identity out.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthContext, AppError>;
}

/// HS256 verification against the deployment secret (`JWT_SECRET`).
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<AuthContext, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| AuthContext {
            subject_id: data.claims.sub,
        })
        .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn mint(sub: &str, exp_offset: Duration) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (Utc::now() + exp_offset).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_subject() {
        let verifier = JwtVerifier::new(SECRET.to_string());
        let token = mint("u1", Duration::hours(1));

        let ctx = verifier.verify(&token).unwrap();
        assert_eq!(ctx.subject_id, "u1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = JwtVerifier::new(SECRET.to_string());
        let token = mint("u1", Duration::hours(-1));

        assert!(matches!(verifier.verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let verifier = JwtVerifier::new(SECRET.to_string());

        assert!(matches!(
            verifier.verify("not-a-jwt"),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = JwtVerifier::new("other-secret".to_string());
        let token = mint("u1", Duration::hours(1));

        assert!(matches!(verifier.verify(&token), Err(AppError::Auth(_))));
    }
}
