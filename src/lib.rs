#![warn(clippy::all)]
//! Decoder for AWS IAM-style policy documents.
//!
//! Several policy fields may be written either as a single string or as a list of strings; [`decode_policy`]
//! normalizes every such field to a list so callers see one canonical shape. Decoding does not evaluate policies
//! or validate action, resource, or principal strings.
pub(crate) mod condition;
pub(crate) mod effect;
pub(crate) mod error;
pub(crate) mod policy;
pub(crate) mod principal;
pub(crate) mod statement;

#[macro_use]
pub(crate) mod serutil;

pub use {
    effect::Effect,
    error::DecodeError,
    policy::{decode_policy, Policy, PolicyBuilder, PolicyBuilderError},
    principal::{PrincipalMap, ANY_PRINCIPAL},
    statement::{decode_statement, Statement, StatementBuilder, StatementBuilderError},
};
