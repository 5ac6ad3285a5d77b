//! Common types and utilities for the CDN API

use serde::Deserialize;
use std::collections::HashMap;

/// Success envelope: `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Error body: `{ "errors": [...], "field_errors": { "port": [...] } }`
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Option<Vec<String>>,
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: errors={errors:?}, field_errors={field_errors:?}")]
pub struct ApiErrorDetails {
    pub errors: Option<Vec<String>>,
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

/// Build a request path from literal segments and ids; ids are
/// percent-encoded so they cannot escape their segment
pub fn api_path(segments: &[PathSegment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            PathSegment::Literal(s) => format!("/{}", s),
            PathSegment::Id(id) => format!("/{}", urlencoding::encode(id)),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub enum PathSegment<'a> {
    Literal(&'static str),
    Id(&'a str),
}

pub const API_PREFIX: PathSegment<'static> = PathSegment::Literal("v1");
