//! AstShape Core Types and Operations
//!
//! This crate provides the in-memory model of an AST grammar and the small
//! set of operations defined over it. It includes:
//!
//! - **Model**: node definitions, named types and type expressions ([`model`] module)
//! - **Shape**: classification of entries into nodes or named types ([`shape`] module)
//! - **Navigate**: name resolution across both collections ([`navigate`] module)
//! - **Edit**: idempotent attribute upserts ([`edit`] module)
//! - **Render**: canonical, human-auditable rendering ([`render`] module)
//!
//! Producing a [`model::GrammarModel`] from text is the job of a grammar
//! source provider; this crate only consumes the finished model.

pub mod edit;
pub mod error;
pub mod model;
pub mod navigate;
pub mod render;
pub mod shape;

pub use error::ModelError;
