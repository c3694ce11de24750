//! # Document Loading
//!
//! Reads JSON:API files and turns each into a printable [`Report`].
//!
//! Files are read concurrently with `tokio::fs`; the deserialization itself is
//! synchronous and runs on the blocking pool, one task per document. Every task
//! builds its own mapper and deserializer, so documents never share an identity
//! cache.

use crate::error::SampleError;
use crate::mapper::BlogMapper;
use clap::ValueEnum;
use jsona_graph::{deserialize, Document, ModelGraph};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Which mapper builds the models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MapperKind {
    /// Typed articles, people and comments; other types are declined.
    #[default]
    Blog,
    /// Untyped nodes for every resource type.
    Generic,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub mapper: MapperKind,
    /// Relationship levels expanded when rendering generic graphs.
    pub depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mapper: MapperKind::default(),
            depth: 3,
        }
    }
}

/// Outcome of loading one document.
#[derive(Debug)]
pub struct Report {
    pub path: PathBuf,
    /// Models built for the primary data.
    pub roots: usize,
    /// Models built in total, including related ones.
    pub models: usize,
    pub text: String,
}

/// Deserializes one document held in memory.
pub fn render(path: PathBuf, bytes: &[u8], options: LoadOptions) -> Result<Report, SampleError> {
    let document = Document::from_slice(bytes)?;
    let report = match options.mapper {
        MapperKind::Blog => {
            let mut mapper = BlogMapper::new();
            let roots = deserialize(&document, &mut mapper)
                .ok_or(SampleError::Empty)?
                .into_vec();
            let blog = mapper.into_blog();
            let text = roots
                .iter()
                .map(|root| blog.describe(*root))
                .collect::<Vec<_>>()
                .join("\n");
            Report {
                path,
                roots: roots.len(),
                models: blog.articles.len() + blog.people.len() + blog.comments.len(),
                text,
            }
        }
        MapperKind::Generic => {
            let mut graph = ModelGraph::new();
            let roots = deserialize(&document, &mut graph)
                .ok_or(SampleError::Empty)?
                .into_vec();
            let text = roots
                .iter()
                .map(|root| graph.render(*root, options.depth))
                .collect::<String>();
            Report {
                path,
                roots: roots.len(),
                models: graph.len(),
                text: text.trim_end().to_string(),
            }
        }
    };
    debug!(path = %report.path.display(), roots = report.roots, models = report.models, "Rendered");
    Ok(report)
}

/// Reads and deserializes one file.
pub async fn load(path: PathBuf, options: LoadOptions) -> Result<Report, SampleError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| SampleError::Io {
            path: path.clone(),
            source,
        })?;
    tokio::task::spawn_blocking(move || render(path, &bytes, options)).await?
}

/// Loads every file concurrently. Results come back in input order.
#[instrument(skip_all, fields(files = paths.len()))]
pub async fn load_all(
    paths: Vec<PathBuf>,
    options: LoadOptions,
) -> Vec<Result<Report, SampleError>> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(load(path, options)))
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(match handle.await {
            Ok(report) => report,
            Err(e) => Err(e.into()),
        });
    }
    reports
}
