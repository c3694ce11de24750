//! # JSON:API Sample
//!
//! Command-line front end for [`jsona_graph`]: loads JSON:API documents and
//! prints the object graph each one deserializes into.
//!
//! ## 📚 Quick Start
//!
//! ```bash
//! # Typed blog models
//! cargo run -p jsona-sample -- crates/jsona-sample/fixtures/articles.json
//!
//! # Generic nodes, two relationship levels, with debug logs
//! RUST_LOG=debug cargo run -p jsona-sample -- --mapper generic --depth 2 \
//!     crates/jsona-sample/fixtures/friends.json
//! ```

use clap::Parser;
use jsona_graph::tracing::setup_tracing;
use jsona_sample::{load_all, LoadOptions, MapperKind};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "jsona-sample")]
#[command(about = "Deserialize JSON:API documents into object graphs", long_about = None)]
struct Cli {
    /// JSON:API documents to load
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Mapper that builds the models
    #[arg(long, value_enum, default_value_t = MapperKind::Blog)]
    mapper: MapperKind,

    /// Relationship levels to expand with the generic mapper
    #[arg(long, default_value_t = 3)]
    depth: usize,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    info!(files = cli.paths.len(), mapper = ?cli.mapper, "Loading documents");
    let options = LoadOptions {
        mapper: cli.mapper,
        depth: cli.depth,
    };

    let mut failed = 0;
    for result in load_all(cli.paths, options).await {
        match result {
            Ok(report) => {
                info!(
                    path = %report.path.display(),
                    roots = report.roots,
                    models = report.models,
                    "Deserialized"
                );
                println!("== {}", report.path.display());
                println!("{}", report.text);
            }
            Err(e) => {
                failed += 1;
                error!(error = %e, "Document failed");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} document(s) failed"));
    }
    Ok(())
}
