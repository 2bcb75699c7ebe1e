//! Goobla Store CLI - inspect how references and digests map onto the store.
//!
//! This binary is a thin wrapper over the `goobla-store` library for
//! debugging store layouts. It never writes blob or manifest contents.

use anyhow::Result;
use clap::{Parser, Subcommand};
use goobla_store::{
    BlobLocation, EnvRoot, FixedRoot, ModelIdentity, PathResolver, StoreRoot,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "goobla-store")]
#[command(about = "Resolve model references and digests to store paths")]
struct Args {
    /// Models directory (defaults to $GOOBLA_MODELS or ~/.goobla/models)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a model reference and print its components
    Parse { reference: String },
    /// Print the manifest path for a model reference
    Manifest { reference: String },
    /// Print the manifests directory, creating it if needed
    Manifests,
    /// Print the path for a blob digest, or the blobs directory if omitted
    Blob { digest: Option<String> },
    /// List every blob in the store with its layout
    Blobs,
}

#[derive(Serialize)]
struct ParsedReference<'a> {
    #[serde(flatten)]
    identity: &'a ModelIdentity,
    short_name: String,
    full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url_error: Option<String>,
}

impl<'a> ParsedReference<'a> {
    fn new(identity: &'a ModelIdentity) -> Self {
        let (base_url, base_url_error) = match identity.base_url() {
            Ok(url) => (Some(String::from(url)), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            identity,
            short_name: identity.short_tag_name(),
            full_name: identity.full_tag_name(),
            base_url,
            base_url_error,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let root: Box<dyn StoreRoot> = match args.models_dir {
        Some(dir) => Box::new(FixedRoot::new(dir)),
        None => Box::new(EnvRoot),
    };
    if let Ok(dir) = root.models_dir() {
        debug!("Models directory: {}", dir.display());
    }

    run(args.command, &PathResolver::with_root(root))
}

fn run<R: StoreRoot>(command: Command, resolver: &PathResolver<R>) -> Result<()> {
    match command {
        Command::Parse { reference } => {
            let identity = ModelIdentity::parse(&reference);
            let parsed = ParsedReference::new(&identity);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Manifest { reference } => {
            let identity = ModelIdentity::parse(&reference);
            println!("{}", resolver.manifest_path(&identity)?.display());
        }
        Command::Manifests => {
            println!("{}", resolver.manifests_dir()?.display());
        }
        Command::Blob { digest } => {
            let path = resolver.blob_path(digest.as_deref().unwrap_or(""))?;
            println!("{}", path.display());
        }
        Command::Blobs => {
            for (digest, location) in resolver.list_blobs()? {
                let layout = match location {
                    BlobLocation::Legacy(_) => "legacy",
                    BlobLocation::Sharded(_) => "sharded",
                };
                println!("{digest}\t{layout}\t{}", location.path().display());
            }
        }
    }

    Ok(())
}
