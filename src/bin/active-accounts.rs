//! Prints every active administrator, company, beneficiary and merchant.

use acieicard::DatabaseClient;
use anyhow::Context;
use reqwest::Url;
use secrecy::SecretString;

#[derive(serde::Deserialize, Debug)]
struct Config {
    supabase_url: Url,
    supabase_service_key: SecretString,
}

impl Config {
    fn read() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
            .context("SUPABASE_URL and SUPABASE_SERVICE_KEY must be set")
    }
}

fn section<T>(title: &str, rows: &[T], describe: impl Fn(&T) -> String) {
    println!("{}: {}", title, rows.len());
    for row in rows {
        println!("  - {}", describe(row));
    }
    println!();
}

async fn run() -> anyhow::Result<()> {
    let config = Config::read()?;
    let db = DatabaseClient::new(config.supabase_url, config.supabase_service_key)?;

    let admins = db.administrators.list_active().await?;
    section("Active administrators", &admins, |a| {
        format!("{} ({})", a.name, a.email)
    });

    let companies = db.companies.list_active().await?;
    section("Active companies", &companies, |c| {
        format!("{} ({})", c.legal_name, c.cnpj)
    });

    let beneficiaries = db.beneficiaries.list_active().await?;
    section("Active beneficiaries", &beneficiaries, |b| {
        format!("{} ({})", b.name, b.cpf)
    });

    let merchants = db.merchants.list_active().await?;
    section("Active merchants", &merchants, |m| {
        format!("{} ({})", m.legal_name, m.cnpj)
    });

    Ok(())
}

#[tokio::main]
async fn main() {
    acieicard::telemetry::init();

    if let Err(e) = run().await {
        eprintln!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
