use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feishu_bitable::client::{Credentials, FeishuClient};
use feishu_bitable::config::settings::ServiceConfig;
use feishu_bitable::observability::metrics::get_metrics;
use feishu_bitable::table::{Table, TableDocument};
use feishu_bitable::utils::config_loader;
use feishu_bitable::utils::logging::{self, LogLevel};
use feishu_bitable::TokenKind;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[arg(long, env = "FEISHU_APP_ID")]
    app_id: Option<String>,
    #[arg(long, env = "FEISHU_APP_SECRET", hide_env_values = true)]
    app_secret: Option<String>,
    /// dump prometheus metrics to stderr before exiting
    #[arg(long)]
    print_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a valid access token
    Token {
        #[arg(long, value_enum, default_value = "tenant")]
        kind: Kind,
    },
    /// Resolve a user id by email and/or phone
    UserId {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Insert rows from a JSON table document
    Insert {
        #[arg(long)]
        app_token: String,
        #[arg(long)]
        table_id: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// List the first page of records
    List {
        #[arg(long)]
        app_token: String,
        #[arg(long)]
        table_id: String,
    },
    /// Delete every listed record of a table
    DeleteAll {
        #[arg(long)]
        app_token: String,
        #[arg(long)]
        table_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    App,
    Tenant,
}

impl From<Kind> for TokenKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::App => TokenKind::App,
            Kind::Tenant => TokenKind::Tenant,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config, start logging
    // -------------------------------

    let args = Args::parse();
    let service_config = match &args.config {
        Some(path) => config_loader::run(path).await?,
        None => ServiceConfig::default(),
    };
    logging::run(service_config.settings.logging.as_ref(), args.log_level);

    // -------------------------------
    // 2. Build client (flags/env win over the config file)
    // -------------------------------

    let file_credentials = service_config.credentials.clone().unwrap_or_default();
    let credentials = Credentials::new(
        args.app_id.clone().or(file_credentials.app_id).unwrap_or_default(),
        args.app_secret.clone().or(file_credentials.app_secret).unwrap_or_default(),
    )?;
    let chunk_size_default = service_config.settings.api.chunk_size;
    let client = FeishuClient::with_config(credentials, service_config.settings.api)?;
    info!("client ready");

    // -------------------------------
    // 3. Run command
    // -------------------------------

    let result = run_command(&client, args.command, chunk_size_default).await;

    if args.print_metrics {
        eprintln!("{}", get_metrics().await.gather_text());
    }
    result
}

async fn run_command(client: &FeishuClient, command: Command, chunk_size_default: usize) -> Result<()> {
    match command {
        Command::Token { kind } => {
            println!("{}", client.get_valid_token(kind.into()).await?);
        }
        Command::UserId { email, phone } => {
            println!("{}", client.get_user_id(email.as_deref(), phone.as_deref()).await?);
        }
        Command::Insert { app_token, table_id, file, chunk_size } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let document: TableDocument = serde_json::from_str(&raw)
                .map_err(|e| anyhow!("invalid table document {}: {}", file.display(), e))?;
            let table = Table::from_document(document)?;
            let responses = client
                .insert_multi_data_to_table(&app_token, &table_id, &table, chunk_size.unwrap_or(chunk_size_default))
                .await?;
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        Command::List { app_token, table_id } => {
            let records = client.list_records(&app_token, &table_id).await?;
            for record in records {
                println!("{}\t{}", record.record_id, serde_json::Value::Object(record.fields));
            }
        }
        Command::DeleteAll { app_token, table_id } => {
            let responses = client.delete_all_records(&app_token, &table_id).await?;
            info!("delete finished in {} chunk(s)", responses.len());
        }
    }
    Ok(())
}
