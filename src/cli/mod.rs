pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{mint_token, Claims};
use crate::client::VaultClient;

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Vault CLI - command-line client for the Secret Vault API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (default: $VAULT_SERVER or http://localhost:3000)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Bearer token (default: $VAULT_TOKEN)")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a development bearer token")]
    Token {
        #[arg(long, help = "User id (random when omitted)")]
        user: Option<Uuid>,

        #[arg(long, default_value = "dev@example.com", help = "Email claim")]
        email: String,
    },

    #[command(about = "Operations on your secrets")]
    Secrets {
        #[command(subcommand)]
        cmd: commands::secrets::SecretsCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { user, email } => {
            let user_id = user.unwrap_or_else(Uuid::new_v4);
            let token = mint_token(Claims::new(user_id, email))?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "token": token,
                            "user_id": user_id,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    println!("{}", token);
                    eprintln!("user: {}", user_id);
                }
            }
            Ok(())
        }

        Commands::Secrets { cmd } => {
            let server = cli
                .server
                .or_else(|| std::env::var("VAULT_SERVER").ok())
                .unwrap_or_else(|| "http://localhost:3000".to_string());
            let token = cli
                .token
                .or_else(|| std::env::var("VAULT_TOKEN").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("no bearer token: pass --token or set VAULT_TOKEN")
                })?;

            let client = VaultClient::new(server, token);
            commands::secrets::handle(cmd, client, output_format).await
        }
    }
}
