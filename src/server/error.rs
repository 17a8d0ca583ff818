use crate::{
    auth::LoginError,
    services::{credits::CreditError, payments::CancellationError, payments::PaymentError},
};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::borrow::Cow;

/// Error returned by request handlers, rendered as `{ "error": ..., "message": ... }`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {error}")]
pub struct ServiceError {
    pub status: StatusCode,
    pub error: Cow<'static, str>,
    pub message: Option<Cow<'static, str>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ServiceError {
    pub fn new(status: StatusCode, error: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn bad_request(error: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub fn not_found(error: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Acesso negado")
            .with_message("Você não tem permissão para acessar este recurso")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
            .with_message("Ocorreu um erro ao processar sua solicitação. Tente novamente.")
    }

    fn missing_fields(message: &'static str) -> Self {
        Self::bad_request("Dados incompletos").with_message(message)
    }

    fn invalid_amount() -> Self {
        Self::bad_request("Valor inválido").with_message("O valor deve ser maior que zero")
    }

    fn balance_changed() -> Self {
        Self::new(StatusCode::CONFLICT, "Saldo alterado")
            .with_message("O saldo foi alterado por outra operação. Tente novamente.")
    }
}

/// Fails with 403 unless `allowed`.
pub fn ensure(allowed: bool) -> Result<(), ServiceError> {
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::forbidden())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            error: &self.error,
            message: self.message.as_deref(),
        })
    }
}

impl From<crate::Error> for ServiceError {
    fn from(e: crate::Error) -> Self {
        tracing::error!("Database request failed: {}", e);
        ServiceError::internal()
    }
}

impl From<LoginError> for ServiceError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::MissingFields => {
                Self::missing_fields("CPF/CNPJ, senha e tipo de usuário são obrigatórios")
            }
            LoginError::InvalidUserKind => Self::bad_request("Tipo de usuário inválido")
                .with_message("Tipo de usuário deve ser: admin, empresa, conveniado ou beneficiario"),
            LoginError::UserNotFound => {
                Self::unauthorized("Credenciais inválidas").with_message("Usuário não encontrado")
            }
            LoginError::Inactive => Self::unauthorized("Usuário inativo").with_message(
                "Seu acesso está temporariamente suspenso. Entre em contato com a ACIEI.",
            ),
            LoginError::WrongPassword => {
                Self::unauthorized("Credenciais inválidas").with_message("Senha incorreta")
            }
            LoginError::Database(e) => e.into(),
            e @ (LoginError::Password(_) | LoginError::Token(_)) => {
                tracing::error!("Login failed: {}", e);
                Self::internal()
            }
        }
    }
}

impl From<PaymentError> for ServiceError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::MissingFields => Self::missing_fields(
                "Beneficiário, conveniado, valor e tipo de pagamento são obrigatórios",
            ),
            PaymentError::InvalidAmount => Self::invalid_amount(),
            PaymentError::Forbidden => Self::forbidden(),
            PaymentError::BeneficiaryNotFound => Self::not_found("Beneficiário não encontrado"),
            PaymentError::BeneficiaryInactive => Self::bad_request("Beneficiário inativo")
                .with_message("O beneficiário está temporariamente inativo"),
            PaymentError::MerchantNotFound => Self::not_found("Conveniado não encontrado"),
            PaymentError::MerchantInactive => Self::bad_request("Conveniado inativo")
                .with_message("O estabelecimento está temporariamente inativo"),
            PaymentError::InsufficientBalance => Self::bad_request("Saldo insuficiente")
                .with_message("O beneficiário não possui saldo suficiente para esta transação"),
            PaymentError::LimitExceeded(limit) => {
                Self::bad_request("Limite excedido").with_message(limit.to_string())
            }
            PaymentError::BalanceContention => Self::balance_changed(),
            PaymentError::Database(e) => e.into(),
        }
    }
}

impl From<CancellationError> for ServiceError {
    fn from(e: CancellationError) -> Self {
        match e {
            CancellationError::NotFound => Self::not_found("Transação não encontrada"),
            CancellationError::Forbidden => Self::forbidden(),
            CancellationError::NotCancellable => {
                Self::bad_request("Transação não pode ser cancelada")
                    .with_message("Apenas transações aprovadas podem ser canceladas")
            }
            CancellationError::Expired => Self::bad_request("Prazo expirado")
                .with_message("Transações só podem ser canceladas dentro de 24 horas"),
            CancellationError::Refund(_) => Self::internal(),
            CancellationError::Database(e) => e.into(),
        }
    }
}

impl From<CreditError> for ServiceError {
    fn from(e: CreditError) -> Self {
        match e {
            CreditError::MissingAmount => Self::missing_fields("Valor é obrigatório"),
            CreditError::InvalidAmount => Self::invalid_amount(),
            CreditError::BeneficiaryNotFound => Self::not_found("Beneficiário não encontrado"),
            CreditError::BalanceContention => Self::balance_changed(),
            CreditError::Database(e) => e.into(),
        }
    }
}
