//! Bitbucket REST API 1.0 access.

pub mod issues;
pub mod query;
