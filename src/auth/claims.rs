use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the token minted by the identity provider. The core only
/// reads `sub`; it never issues tokens itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
