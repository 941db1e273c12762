use clap::Parser;
use secret_vault_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env carries the token secret and server URL for local use.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = secret_vault_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
