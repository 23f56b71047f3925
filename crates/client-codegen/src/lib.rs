//! Generates a typed TypeScript GraphQL client from an introspected schema.
//!
//! The input is a [`SchemaInput`] (tables, custom operations and the type
//! registry, as produced by an introspection adapter), the output an ordered
//! list of [`Artifact`]s: request documents and accessors per table and custom
//! operation, cache key factories, and the select helper types. Writing the
//! artifacts to disk is left to the caller.

#![allow(unused_crate_dependencies)]

pub mod config;
pub mod document;
mod emit;
mod error;
pub mod naming;
pub mod query_keys;
pub mod resolver;
pub mod scalars;
pub mod schema;
pub mod select;
pub mod tracker;

#[cfg(test)]
mod fixtures;

pub use config::CodegenConfig;
pub use document::{BuiltDocument, DocumentBuilder, FindManyArgs};
pub use emit::{generate, Artifact, GenerateOutput, GenerateStats};
pub use error::{CodegenError, SelectionError};
pub use schema::SchemaInput;
pub use select::Selection;
