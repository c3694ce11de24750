//! # JSON:API Sample Library
//!
//! Typed blog models built from JSON:API documents through a custom
//! [`ModelMapper`](jsona_graph::ModelMapper), plus the file loading used by
//! the `jsona-sample` binary. Exposed as a library for integration testing.

pub mod error;
pub mod loader;
pub mod mapper;
pub mod model;

pub use error::SampleError;
pub use loader::{load, load_all, render, LoadOptions, MapperKind, Report};
pub use mapper::BlogMapper;
