use actix_web::{Error, HttpMessage, dev::ServiceRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string())
}

/// Verify JWT bearer token and stash the claims in request extensions.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let secret = jwt_secret();

    match decode::<Claims>(
        credentials.token(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            Ok(req)
        }
        Err(_) => Err((actix_web::error::ErrorUnauthorized("Invalid token"), req)),
    }
}

/// Validate a raw JWT and extract the user id. Used by WebSocket upgrades,
/// where the token arrives as a query parameter instead of a header.
pub fn validate_token(token: &str) -> Result<String, CustomError> {
    let secret = jwt_secret();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| CustomError::UnauthorizedError("Invalid token".to_string()))?;

    Ok(token_data.claims.id)
}

/// Get user ID from request extensions (use after auth middleware)
pub fn get_user_id_from_request(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(user_id: &str, secret: &str) -> String {
        let claims = Claims {
            id: user_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn validate_token_round_trip() {
        let token = token_for("user-123", &jwt_secret());
        assert_eq!(validate_token(&token).unwrap(), "user-123");
    }

    #[test]
    fn validate_token_rejects_wrong_secret() {
        let token = token_for("user-123", "some-other-secret-entirely");
        let err = validate_token(&token).unwrap_err();
        assert!(matches!(err, CustomError::UnauthorizedError(_)));
    }
}
