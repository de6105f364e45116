//! # vera-index
//!
//! A pure-Rust flat inner-product vector index for exact nearest-neighbor
//! search over unit-normalized embeddings.
//!
//! ## Features
//!
//! - **Pure Rust**: No native dependencies, compiles anywhere Rust does
//! - **Exact search**: Full scan by inner product, no recall trade-off
//! - **Unit normalization**: Rows and queries are normalized on entry, so
//!   the inner product equals cosine similarity
//! - **Persistence**: Compact binary snapshots via `postcard`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vera_index::FlatIndex;
//!
//! let mut index = FlatIndex::new(4)?;
//! index.add(&[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]])?;
//!
//! // Positions come back ranked by descending cosine similarity.
//! let hits = index.search(&[2.0, 0.0, 0.0, 0.0], 1)?;
//! assert_eq!(hits[0].0, 0);
//! ```
//!
//! Positions are 0-based insertion order and are never reused: callers
//! that need deletion rebuild the index from canonical source data.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod error;
pub mod index;
pub mod persistence;

pub use error::{Error, Result};
pub use index::FlatIndex;
pub use persistence::{load_index, save_index};
