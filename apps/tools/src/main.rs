use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::DocumentStoreClient;
use serde_json::Value;
use shared::domain::{CollectionStatus, CollectionType};

#[derive(Parser, Debug)]
struct Cli {
    /// Base URL of the store, e.g. http://127.0.0.1:8529. Falls back to the
    /// DOCSTORE_URL environment variable.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateDocument {
        collection: String,
        #[arg(long)]
        key: Option<String>,
    },
    CreateEdge {
        collection: String,
        from: String,
        to: String,
        #[arg(long)]
        key: Option<String>,
    },
    GetDocument {
        collection: String,
        key: String,
    },
    GetEdge {
        collection: String,
        key: String,
    },
    PutDocument {
        collection: String,
        key: String,
        payload: String,
    },
    PutEdge {
        collection: String,
        key: String,
        payload: String,
    },
    DeleteDocument {
        collection: String,
        key: String,
    },
    DeleteEdge {
        collection: String,
        key: String,
    },
    CollectionInfo {
        identifier: String,
    },
}

fn parse_payload(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("payload must be valid JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let server_url = cli
        .server_url
        .or_else(|| std::env::var("DOCSTORE_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8529".to_string());
    let client = DocumentStoreClient::new(&server_url)?;

    match cli.command {
        Command::CreateDocument { collection, key } => {
            let header = client.create_document(&collection, key.as_deref()).await?;
            println!("created _id={}", header.id);
        }
        Command::CreateEdge {
            collection,
            from,
            to,
            key,
        } => {
            let created = client
                .create_edge(&collection, &from, &to, key.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::GetDocument { collection, key } => {
            let entity = client.fetch_document(&collection, &key).await?;
            println!("{}", serde_json::to_string_pretty(&entity)?);
        }
        Command::GetEdge { collection, key } => {
            let entity = client.fetch_edge(&collection, &key).await?;
            println!("{}", serde_json::to_string_pretty(&entity)?);
        }
        Command::PutDocument {
            collection,
            key,
            payload,
        } => {
            let payload = parse_payload(&payload)?;
            client.save_document(&collection, &key, &payload).await?;
            println!("saved {collection}/{key}");
        }
        Command::PutEdge {
            collection,
            key,
            payload,
        } => {
            let payload = parse_payload(&payload)?;
            client.save_edge(&collection, &key, &payload).await?;
            println!("saved {collection}/{key}");
        }
        Command::DeleteDocument { collection, key } => {
            client.delete_document(&collection, &key).await?;
            println!("deleted {collection}/{key}");
        }
        Command::DeleteEdge { collection, key } => {
            client.delete_edge(&collection, &key).await?;
            println!("deleted {collection}/{key}");
        }
        Command::CollectionInfo { identifier } => {
            let info = client.fetch_collection_info(&identifier).await?;
            let kind = CollectionType::from_code(info.collection_type)
                .map(|kind| format!("{kind:?}"))
                .unwrap_or_else(|| format!("unknown({})", info.collection_type));
            let status = CollectionStatus::from_code(info.status)
                .map(|status| format!("{status:?}"))
                .unwrap_or_else(|| format!("unknown({})", info.status));
            println!(
                "collection id={} name={} type={} status={} system={}",
                info.id, info.name, kind, status, info.is_system
            );
        }
    }

    Ok(())
}
