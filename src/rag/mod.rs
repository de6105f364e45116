//! Retrieval-augmented generation building blocks.
//!
//! The flow is linear: [`chunker`] turns raw text into overlapping
//! [`ChunkRecord`](crate::types::ChunkRecord)s, [`embeddings`] maps
//! their texts to vectors, [`store`] indexes vectors alongside their
//! records, and [`pipeline`] wires the three together behind a single
//! [`Retriever`](pipeline::Retriever).

pub mod chunker;
pub mod embeddings;
pub mod pipeline;
pub mod store;
