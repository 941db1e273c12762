use std::sync::Arc;

use clap::Subcommand;
use uuid::Uuid;

use crate::cli::{utils, OutputFormat};
use crate::client::{
    CreateSecretBody, FetchOrchestrator, SecretsStore, UpdateSecretBody, VaultClient,
};
use crate::query::{SecretType, SortKey, SortOrder, TypeFilter};

#[derive(Subcommand)]
pub enum SecretsCommands {
    #[command(about = "List secrets with filters, sorting and paging")]
    List {
        #[arg(long, help = "Search in title and body")]
        search: Option<String>,

        #[arg(long = "type", help = "Filter by type: all, normal, medio, hard")]
        secret_type: Option<String>,

        #[arg(long, help = "Filter favorites: true or false")]
        favorite: Option<bool>,

        #[arg(long, help = "Sort key: createdAt, updatedAt, title")]
        order_by: Option<String>,

        #[arg(long, help = "Sort order: asc or desc")]
        order: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 6)]
        per_page: i64,
    },

    #[command(about = "Create a secret")]
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        secret: String,

        #[arg(long = "type", default_value = "normal", help = "normal, medio or hard")]
        secret_type: String,

        #[arg(long, help = "Mark as favorite")]
        favorite: bool,
    },

    #[command(about = "Update fields of a secret")]
    Update {
        #[arg(help = "Secret id")]
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        secret: Option<String>,

        #[arg(long = "type", help = "normal, medio or hard")]
        secret_type: Option<String>,

        #[arg(long, help = "Set the favorite flag: true or false")]
        favorite: Option<bool>,
    },

    #[command(about = "Delete a secret")]
    Delete {
        #[arg(help = "Secret id")]
        id: Uuid,
    },
}

pub async fn handle(
    cmd: SecretsCommands,
    client: VaultClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        SecretsCommands::List {
            search,
            secret_type,
            favorite,
            order_by,
            order,
            page,
            per_page,
        } => {
            let store = Arc::new(SecretsStore::with_per_page(per_page));
            if let Some(search) = search {
                store.set_search(search);
            }
            if let Some(raw) = secret_type {
                store.set_type_filter(parse_type_filter(&raw)?);
            }
            if favorite.is_some() {
                store.set_favorite(favorite);
            }
            if let Some(raw) = order_by {
                let key = SortKey::parse(&raw)
                    .ok_or_else(|| anyhow::anyhow!("unknown sort key '{raw}'"))?;
                store.set_order_by(key);
            }
            if let Some(raw) = order {
                let ord = SortOrder::parse(&raw)
                    .ok_or_else(|| anyhow::anyhow!("unknown sort order '{raw}'"))?;
                store.set_order(ord);
            }
            // Page last: the filter setters above deliberately reset it.
            store.set_page(page);

            let orchestrator = FetchOrchestrator::new(client, store.clone());
            orchestrator.sync().await?;

            utils::output_listing(&output_format, &store.snapshot())
        }

        SecretsCommands::Create {
            title,
            secret,
            secret_type,
            favorite,
        } => {
            let body = CreateSecretBody {
                title,
                secret,
                secret_type: parse_type(&secret_type)?,
                favorite: favorite.then_some(true),
            };

            let orchestrator = session(client);
            let created = orchestrator.create(body).await?;

            utils::output_success(
                &output_format,
                &format!("Secret '{}' created", created.title),
                Some(serde_json::json!({
                    "id": created.id,
                    "total": orchestrator.store().snapshot().total,
                })),
            )
        }

        SecretsCommands::Update {
            id,
            title,
            secret,
            secret_type,
            favorite,
        } => {
            let body = UpdateSecretBody {
                title,
                secret,
                secret_type: secret_type.as_deref().map(parse_type).transpose()?,
                favorite,
            };

            let orchestrator = session(client);
            let updated = orchestrator.update(id, body).await?;

            utils::output_success(
                &output_format,
                &format!("Secret '{}' updated", updated.title),
                Some(serde_json::json!({ "id": updated.id })),
            )
        }

        SecretsCommands::Delete { id } => {
            let orchestrator = session(client);
            orchestrator.delete(id).await?;

            utils::output_success(
                &output_format,
                "Secret deleted",
                Some(serde_json::json!({
                    "remaining": orchestrator.store().snapshot().total,
                })),
            )
        }
    }
}

fn session(client: VaultClient) -> FetchOrchestrator {
    FetchOrchestrator::new(client, Arc::new(SecretsStore::new()))
}

fn parse_type(raw: &str) -> anyhow::Result<SecretType> {
    raw.parse::<SecretType>()
        .map_err(|_| anyhow::anyhow!("unknown type '{raw}': expected normal, medio or hard"))
}

fn parse_type_filter(raw: &str) -> anyhow::Result<TypeFilter> {
    if raw == "all" {
        return Ok(TypeFilter::All);
    }
    Ok(TypeFilter::Only(parse_type(raw)?))
}
