//! Language model and embedding backends for Contextor.
//!
//! Remote models implement `contextor_core::LanguageModel`; embedders
//! implement `contextor_core::Embedder`. The factory picks one of each from
//! configuration.

pub mod factory;
pub mod generate;
pub mod hash;
mod http;
pub mod openai_compat;

pub use factory::{build_embedder, build_language_model};
pub use generate::GenerateEndpointModel;
pub use hash::HashEmbedder;
pub use openai_compat::{OpenAiCompatEmbedder, OpenAiCompatModel};
