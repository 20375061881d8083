//! Create or reset a KALM administrator account.
//!
//! ```bash
//! create-admin --matricula 0001 --nome "Ana Souza" --senha '...'
//! KALM_ADMIN_PASSWORD='...' create-admin --matricula 0001 --nome "Ana Souza"
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use kalm_server::{config::AppConfig, repository::admins::AdminsRepository, services::auth::AuthService};

#[derive(Parser)]
#[command(name = "create-admin")]
#[command(version, about = "Create or reset a KALM administrator")]
struct Cli {
    /// Badge number used to log in
    #[arg(short, long)]
    matricula: String,

    /// Display name
    #[arg(short, long)]
    nome: String,

    /// Password; read from KALM_ADMIN_PASSWORD when omitted
    #[arg(short, long, env = "KALM_ADMIN_PASSWORD", hide_env_values = true)]
    senha: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let auth = AuthService::new(Arc::new(AdminsRepository::new(pool)));
    let admin = auth
        .provision_admin(&cli.matricula, &cli.nome, &cli.senha)
        .await
        .context("Failed to save administrator")?;

    tracing::info!(matricula = %admin.matricula, id = %admin.id, "Administrator saved");
    println!("Administrator {} ({}) saved", admin.nome, admin.matricula);
    Ok(())
}
