use crate::{
    auth::{
        accounts::{find_for_login, UserProfile},
        password::{self, PasswordError},
        TokenError, TokenIssuer, UserKind,
    },
    client::DatabaseClient,
    store::AccountStatus,
    Error,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    /// E-mail for administrators, CNPJ for companies and merchants, CPF for beneficiaries.
    #[serde(default)]
    pub cpf_cnpj: Option<String>,
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
    #[serde(rename = "tipo_usuario", default)]
    pub kind: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: UserProfile,
    pub message: &'static str,
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("Login, password and user kind are required")]
    MissingFields,
    #[error("Unknown user kind")]
    InvalidUserKind,
    #[error("No such user")]
    UserNotFound,
    #[error("User is not active")]
    Inactive,
    #[error("Wrong password")]
    WrongPassword,
    #[error(transparent)]
    Database(#[from] Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Checks a user's credentials and issues an access token.
#[tracing::instrument(
    name = "Login",
    skip(db, tokens, request),
    fields(kind = ?request.kind)
)]
pub async fn login(
    db: &DatabaseClient,
    tokens: &TokenIssuer,
    request: LoginRequest,
) -> Result<LoginResponse, LoginError> {
    let (login, password, kind) = match (request.cpf_cnpj, request.password, request.kind) {
        (Some(login), Some(password), Some(kind))
            if !login.is_empty() && !password.is_empty() && !kind.is_empty() =>
        {
            (login, password, kind)
        }
        _ => return Err(LoginError::MissingFields),
    };
    let kind: UserKind = kind.parse().map_err(|_| LoginError::InvalidUserKind)?;

    let account = find_for_login(db, kind, &login)
        .await?
        .ok_or(LoginError::UserNotFound)?;

    if account.status() != AccountStatus::Active {
        return Err(LoginError::Inactive);
    }

    let hash = account
        .password_hash()
        .ok_or(LoginError::WrongPassword)?
        .to_string();
    if !password::verify(password, hash).await? {
        return Err(LoginError::WrongPassword);
    }

    let token = tokens.issue(account.id(), kind, account.token_email())?;
    tracing::info!(user_id = account.id(), "User signed in");

    Ok(LoginResponse {
        token,
        user: account.profile(),
        message: "Login realizado com sucesso",
    })
}
