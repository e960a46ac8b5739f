// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Storemap CLI entrypoint.
//!
//! Works against a record folder (`<store>/maps/<id>.json`): list, inspect, export and import
//! saved maps, or run a scripted editing session that saves a demo map.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storemap::config::EditorConfig;
use storemap::editor::{GesturePhase, GraphEditor, NoticeLevel, SelectTarget};
use storemap::format::graph_json::{document_to_value, parse_document_str, parse_document_value};
use storemap::model::{GraphDocument, Position};
use storemap::store::{PersistenceGateway, RecordFolder, WriteDurability};

const DEFAULT_LOG_FILTER: &str = "storemap=info";

#[derive(Debug, Parser)]
#[command(name = "storemap", version, about = "Edit and inspect saved store layout maps")]
struct Cli {
    /// Record folder holding saved maps.
    #[arg(long, default_value = ".")]
    store: PathBuf,

    /// Editor settings (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sync records to stable storage after writing (slower).
    #[arg(long)]
    durable_writes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List saved maps, newest first.
    List,
    /// Print the nodes and edges of a saved map.
    Show { id: i64 },
    /// Print a saved map's document as JSON.
    Export {
        id: i64,
        #[arg(long)]
        pretty: bool,
    },
    /// Save a document JSON file as a new map record.
    Import {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Build a small map through the editor and save it.
    Demo {
        #[arg(long, default_value_t = 4)]
        nodes: usize,
    },
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn summarize(document: &GraphDocument) -> String {
    format!("{} nodes, {} edges", document.nodes().len(), document.edges().len())
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let durability = if cli.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    let folder = Arc::new(RecordFolder::new(&cli.store).with_durability(durability));

    match cli.command {
        Command::List => {
            let records = folder.fetch_all().await.context("listing saved maps")?;
            if records.is_empty() {
                println!("no saved maps in {}", folder.maps_dir().display());
            }
            for record in records {
                let document = parse_document_value(&record.graph_json);
                println!(
                    "{}\t{}\t{}\tv{}\t{}",
                    record.id,
                    record.created_at.to_rfc3339(),
                    record.name,
                    record.version,
                    summarize(&document)
                );
            }
        }
        Command::Show { id } => {
            let record = folder
                .fetch_one(id)
                .await
                .with_context(|| format!("fetching map {id}"))?;
            let document = parse_document_value(&record.graph_json);
            println!("{} (id {}): {}", record.name, record.id, summarize(&document));
            for node in document.nodes() {
                let size = node.size();
                let metadata = node.metadata();
                println!(
                    "  node {:<6} {:<20} {:>8.1} x {:<8.1} area {:<10.1} {}",
                    node.node_id().as_str(),
                    metadata.name(),
                    size.width,
                    size.height,
                    metadata.area(),
                    node.color()
                );
            }
            for edge in document.edges() {
                println!(
                    "  edge {:<6} {} -> {}",
                    edge.edge_id().as_str(),
                    edge.source(),
                    edge.target()
                );
            }
        }
        Command::Export { id, pretty } => {
            let record = folder
                .fetch_one(id)
                .await
                .with_context(|| format!("fetching map {id}"))?;
            let value = document_to_value(&parse_document_value(&record.graph_json));
            let text = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                value.to_string()
            };
            println!("{text}");
        }
        Command::Import { path, name } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let document = parse_document_str(&text);
            if document.is_empty() {
                bail!("{} holds no nodes; nothing to import", path.display());
            }
            let name = name.unwrap_or_else(|| config.map_name.clone());
            let record = folder
                .store(&name, document_to_value(&document), config.schema_version)
                .await
                .context("saving imported map")?;
            println!("saved map {} ({})", record.id, summarize(&document));
        }
        Command::Demo { nodes } => {
            let mut editor = GraphEditor::new(Arc::clone(&folder), config);
            let mut previous = None;
            for index in 0..nodes {
                let node_id = editor.add_node()?;
                editor.move_node(
                    &node_id,
                    Position::new(index as f64 * 200.0, 0.0),
                    GesturePhase::Ended,
                )?;
                editor.update_metadata(&node_id, "area", 10_000.0 + index as f64 * 5_000.0)?;
                if let Some(previous) = &previous {
                    editor.connect(previous, &node_id)?;
                }
                previous = Some(node_id);
            }
            if let Some(last) = previous {
                editor.select(SelectTarget::Node(last), false)?;
            }

            let saved = editor.save().await;
            for notice in editor.take_notices() {
                match notice.level {
                    NoticeLevel::Info => println!("{}", notice.message),
                    NoticeLevel::Warning | NoticeLevel::Error => eprintln!("{}", notice.message),
                }
            }
            if saved.is_none() {
                bail!("demo map was not saved");
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")
        .and_then(|runtime| runtime.block_on(run(cli)));

    if let Err(err) = result {
        eprintln!("storemap: {err:#}");
        std::process::exit(1);
    }
}
