//! # Observability & Tracing
//!
//! The deserializer logs through the `tracing` crate:
//!
//! - **debug**: one line per document (`Built document entities=N`), declined
//!   models, stub models being populated later, to-many linkage with `null`
//!   entries dropping a resource's relationships
//! - **trace**: every cache hit and every created model, keyed by entity
//! - **warn**: malformed `data` members that were read as absent
//!
//! ```bash
//! RUST_LOG=jsona_graph=debug cargo run -p jsona-sample -- doc.json
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
