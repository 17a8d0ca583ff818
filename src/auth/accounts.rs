use crate::{
    auth::UserKind,
    client::DatabaseClient,
    documents::digits_only,
    store::{
        administrators::Administrator, beneficiaries::Beneficiary, companies::Company,
        merchants::Merchant, AccountStatus,
    },
    Error,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// A row of any of the tables users sign in from.
#[derive(Debug, Clone, PartialEq)]
pub enum Account {
    Admin(Administrator),
    Company(Company),
    Merchant(Merchant),
    Beneficiary(Beneficiary),
}

impl Account {
    pub fn kind(&self) -> UserKind {
        match self {
            Account::Admin(_) => UserKind::Admin,
            Account::Company(_) => UserKind::Company,
            Account::Merchant(_) => UserKind::Merchant,
            Account::Beneficiary(_) => UserKind::Beneficiary,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Account::Admin(a) => &a.id,
            Account::Company(c) => &c.id,
            Account::Merchant(m) => &m.id,
            Account::Beneficiary(b) => &b.id,
        }
    }

    pub fn status(&self) -> AccountStatus {
        match self {
            Account::Admin(a) => a.status,
            Account::Company(c) => c.status,
            Account::Merchant(m) => m.status,
            Account::Beneficiary(b) => b.status,
        }
    }

    pub fn password_hash(&self) -> Option<&str> {
        match self {
            Account::Admin(a) => a.password_hash.as_deref(),
            Account::Company(c) => c.password_hash.as_deref(),
            Account::Merchant(m) => m.password_hash.as_deref(),
            Account::Beneficiary(b) => b.password_hash.as_deref(),
        }
    }

    fn email(&self) -> Option<&str> {
        match self {
            Account::Admin(a) => Some(&a.email),
            Account::Company(c) => c.email.as_deref(),
            Account::Merchant(m) => m.email.as_deref(),
            Account::Beneficiary(b) => b.email.as_deref(),
        }
    }

    /// Value of the `email` claim: the e-mail, falling back to the CPF/CNPJ.
    pub fn token_email(&self) -> &str {
        self.email().unwrap_or(match self {
            Account::Admin(a) => &a.email,
            Account::Company(c) => &c.cnpj,
            Account::Merchant(m) => &m.cnpj,
            Account::Beneficiary(b) => &b.cpf,
        })
    }

    pub fn profile(&self) -> UserProfile {
        let (name, details) = match self {
            Account::Admin(a) => (a.name.clone(), None),
            Account::Company(c) => (
                c.legal_name.clone(),
                Some(AccountDetails::Company {
                    cnpj: c.cnpj.clone(),
                    total_balance: c.total_balance,
                }),
            ),
            Account::Merchant(m) => (
                m.legal_name.clone(),
                Some(AccountDetails::Merchant {
                    cnpj: m.cnpj.clone(),
                    fee_percent: m.fee_percent,
                }),
            ),
            Account::Beneficiary(b) => (
                b.name.clone(),
                Some(AccountDetails::Beneficiary {
                    cpf: b.cpf.clone(),
                    balance: b.balance,
                    daily_limit: b.limits.daily,
                    weekly_limit: b.limits.weekly,
                    monthly_limit: b.limits.monthly,
                    company_id: b.company_id.clone(),
                }),
            ),
        };

        UserProfile {
            id: self.id().to_string(),
            name,
            email: self.email().map(str::to_string),
            kind: self.kind(),
            status: self.status(),
            details,
        }
    }
}

/// Public view of the signed in user.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: UserKind,
    pub status: AccountStatus,
    #[serde(flatten)]
    pub details: Option<AccountDetails>,
}

/// Fields that only exist for some kinds of users.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AccountDetails {
    Company {
        cnpj: String,
        #[serde(rename = "saldo_total")]
        total_balance: Decimal,
    },
    Merchant {
        cnpj: String,
        #[serde(rename = "taxa_transacao")]
        fee_percent: Decimal,
    },
    Beneficiary {
        cpf: String,
        #[serde(rename = "saldo_atual")]
        balance: Decimal,
        #[serde(rename = "limite_diario")]
        daily_limit: Decimal,
        #[serde(rename = "limite_semanal")]
        weekly_limit: Decimal,
        #[serde(rename = "limite_mensal")]
        monthly_limit: Decimal,
        #[serde(rename = "empresa_id")]
        company_id: String,
    },
}

/// Looks an account up by the identifier typed at login: e-mail for administrators,
/// CNPJ for companies and merchants, CPF for beneficiaries.
pub(crate) async fn find_for_login(
    db: &DatabaseClient,
    kind: UserKind,
    login: &str,
) -> Result<Option<Account>, Error> {
    Ok(match kind {
        UserKind::Admin => db
            .administrators
            .find_by_email(login)
            .await?
            .map(Account::Admin),
        UserKind::Company => db
            .companies
            .find_by_cnpj(&digits_only(login))
            .await?
            .map(Account::Company),
        UserKind::Merchant => db
            .merchants
            .find_by_cnpj(&digits_only(login))
            .await?
            .map(Account::Merchant),
        UserKind::Beneficiary => db
            .beneficiaries
            .find_by_cpf(&digits_only(login))
            .await?
            .map(Account::Beneficiary),
    })
}

/// Loads the account a token was issued for.
pub async fn load_account(
    db: &DatabaseClient,
    kind: UserKind,
    id: &str,
) -> Result<Option<Account>, Error> {
    Ok(match kind {
        UserKind::Admin => db.administrators.get_by_id(id).await?.map(Account::Admin),
        UserKind::Company => db.companies.get_by_id(id).await?.map(Account::Company),
        UserKind::Merchant => db.merchants.get_by_id(id).await?.map(Account::Merchant),
        UserKind::Beneficiary => db
            .beneficiaries
            .get_by_id(id)
            .await?
            .map(Account::Beneficiary),
    })
}
