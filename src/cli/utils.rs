use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::StoreState;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(obj), Some(extra)) = (response.as_object_mut(), data.as_ref().and_then(Value::as_object)) {
                obj.extend(extra.clone());
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Render one fetched page of secrets plus its pagination footer
pub fn output_listing(output_format: &OutputFormat, state: &StoreState) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "secrets": state.secrets,
                    "meta": {
                        "total": state.total,
                        "page": state.page,
                        "perPage": state.per_page,
                        "totalPages": state.total_pages,
                    }
                }))?
            );
        }
        OutputFormat::Text => {
            if state.secrets.is_empty() {
                println!("No secrets found");
                return Ok(());
            }

            for secret in &state.secrets {
                let marker = if secret.favorite { "★" } else { " " };
                println!(
                    "{} {}  [{}]  {}",
                    marker, secret.id, secret.secret_type, secret.title
                );
            }
            println!(
                "page {}/{} · {} total",
                state.page,
                state.total_pages.max(1),
                state.total
            );
        }
    }
    Ok(())
}
