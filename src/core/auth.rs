use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT 载荷 (与签发方约定的字段)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
            iat: None,
            exp: None,
        }
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // 签发方不一定写入 exp；若存在仍会校验过期
    validation.required_spec_claims.clear();
    validation
}

pub fn create_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
}

pub fn is_logged_in(user: Option<&Claims>) -> bool {
    user.is_some_and(|u| !u.username.is_empty())
}

pub fn is_admin(user: Option<&Claims>) -> bool {
    is_logged_in(user) && user.is_some_and(|u| u.is_admin)
}

/// 路由中的用户名与当前用户一致，或当前用户是管理员
pub fn is_correct_user_or_admin(user: Option<&Claims>, username: &str) -> bool {
    user.is_some_and(|u| !u.username.is_empty() && u.username == username) || is_admin(user)
}
