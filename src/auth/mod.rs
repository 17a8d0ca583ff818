//! Identities, access tokens and password login.

mod accounts;
mod login;
pub mod password;
pub mod tokens;

pub use accounts::{load_account, Account, AccountDetails, UserProfile};
pub use login::{login, LoginError, LoginRequest, LoginResponse};
pub use tokens::{TokenError, TokenIssuer};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The four kinds of users that can sign in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserKind {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "empresa")]
    Company,
    #[serde(rename = "conveniado")]
    Merchant,
    #[serde(rename = "beneficiario")]
    Beneficiary,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Admin => "admin",
            UserKind::Company => "empresa",
            UserKind::Merchant => "conveniado",
            UserKind::Beneficiary => "beneficiario",
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown user kind: {0}")]
pub struct UnknownUserKind(pub String);

impl FromStr for UserKind {
    type Err = UnknownUserKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserKind::Admin),
            "empresa" => Ok(UserKind::Company),
            "conveniado" => Ok(UserKind::Merchant),
            "beneficiario" => Ok(UserKind::Beneficiary),
            other => Err(UnknownUserKind(other.to_string())),
        }
    }
}

/// Contents of an access token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "tipo")]
    pub kind: UserKind,
    /// E-mail of the user, or its CPF/CNPJ when it has none.
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.kind == UserKind::Admin
    }

    /// Whether these claims belong to the account `id` of the given kind.
    pub fn is(&self, kind: UserKind, id: &str) -> bool {
        self.kind == kind && self.user_id == id
    }
}
