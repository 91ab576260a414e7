//! Rich diagnostic error types for the wadjet engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. The taxonomy keeps authorization failures
//! (`Forbidden`), unknown scope targets (`NotFound`), boundary-validation failures
//! (`InvalidInput`), and upstream gateway failures strictly apart: a report is
//! either fully computed or not returned at all.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the wadjet engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum WadjetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Gateway(#[from] GatewayError),
}

// ---------------------------------------------------------------------------
// Filter errors (request boundary)
// ---------------------------------------------------------------------------

/// Invalid-input failures raised while validating request filters, before any
/// gateway call is issued.
#[derive(Debug, Error, Diagnostic)]
pub enum FilterError {
    #[error("malformed timestamp {value:?}: {message}")]
    #[diagnostic(
        code(wadjet::filter::malformed_timestamp),
        help(
            "Window bounds must be RFC 3339 timestamps in UTC, \
             e.g. \"2026-03-01T00:00:00Z\"."
        )
    )]
    MalformedTimestamp { value: String, message: String },

    #[error("inverted time window: start {start} is after end {end}")]
    #[diagnostic(
        code(wadjet::filter::inverted_window),
        help("`start` must be at or before `end`. Swap the bounds.")
    )]
    InvertedWindow { start: String, end: String },

    #[error("scope type {scope_type:?} requires a scope id")]
    #[diagnostic(
        code(wadjet::filter::missing_scope_id),
        help("Pass the id of the ontology, organization, or group to report on.")
    )]
    MissingScopeId { scope_type: String },

    #[error("unknown scope type: {value:?}")]
    #[diagnostic(
        code(wadjet::filter::unknown_scope_type),
        help("Valid scope types are: all, ontology, organization, group.")
    )]
    UnknownScopeType { value: String },
}

// ---------------------------------------------------------------------------
// Scope errors
// ---------------------------------------------------------------------------

/// Authorization failures from scope resolution.
///
/// These are fatal for the request: no partial scope is ever substituted.
#[derive(Debug, Error, Diagnostic)]
pub enum ScopeError {
    #[error("{kind} {id:?} does not exist")]
    #[diagnostic(
        code(wadjet::scope::not_found),
        help(
            "The scope id does not resolve to any known ontology, group, or \
             organization. Unknown ids are rejected even for super-admins."
        )
    )]
    NotFound { kind: &'static str, id: String },

    #[error("access to {kind} {id:?} denied")]
    #[diagnostic(
        code(wadjet::scope::forbidden),
        help(
            "The requester lacks rights to this scope: not the organization \
             owner, not a group member, or the ontology is not visible to them."
        )
    )]
    Forbidden { kind: &'static str, id: String },
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Failures from the repository gateway boundary.
///
/// Distinct from [`ScopeError`]: an upstream failure means the graph store
/// could not answer, not that the requester was unauthorized. The engine does
/// not retry; retries and timeouts belong to the gateway implementation.
#[derive(Debug, Error, Diagnostic)]
pub enum GatewayError {
    #[error("repository gateway failure during {operation}: {message}")]
    #[diagnostic(
        code(wadjet::gateway::upstream),
        help(
            "The graph store failed or rejected the query. The report was not \
             computed; retry the request once the store recovers."
        )
    )]
    Upstream { operation: String, message: String },

    #[error("fixture store error at {path}: {message}")]
    #[diagnostic(
        code(wadjet::gateway::fixture),
        help(
            "Check that the fixture file exists and is valid JSON in the \
             documented store shape (projects, groups, organizations, roles, \
             individuals, comments)."
        )
    )]
    Fixture { path: String, message: String },
}

/// Convenience alias for functions returning wadjet results.
pub type WadjetResult<T> = std::result::Result<T, WadjetError>;
