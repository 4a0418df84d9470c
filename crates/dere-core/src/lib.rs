//! Dere Core Types and Definitions
//!
//! This crate provides the annotation data model shared by the Dere corpus
//! reader and its downstream consumers. It includes:
//!
//! - **Identifiers**: String-interned names for types and slots ([`identifier::Id`])
//! - **Schema**: The task type system and its lookup contract ([`schema`] module)
//! - **Corpus**: Instances, spans, frames and the frame arena ([`corpus`] module)

pub mod corpus;
pub mod identifier;
pub mod schema;
