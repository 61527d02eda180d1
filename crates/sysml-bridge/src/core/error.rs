//! Core error types for model conversion
//!
//! This module defines the error taxonomy shared by the export and import
//! pipelines and by host graph implementations.

use std::fmt;
use thiserror::Error;

use super::NodeId;

/// Errors raised by a host graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Load error: {message} (node {node})")]
    LoadFailed { node: NodeId, message: String },

    #[error("Unknown node: {node}")]
    UnknownNode { node: NodeId },

    #[error("Pointer error: cannot resolve '{role}' of {node}: {message}")]
    Pointer {
        node: NodeId,
        role: String,
        message: String,
    },
}

impl HostError {
    /// Create a new load error
    pub fn load_failed(node: NodeId, message: String) -> Self {
        Self::LoadFailed { node, message }
    }

    /// Create a new pointer resolution error
    pub fn pointer(node: NodeId, role: &str, message: String) -> Self {
        Self::Pointer {
            node,
            role: role.to_string(),
            message,
        }
    }
}

/// Errors collected while exporting a model graph
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to load children, error: {source}")]
    LoadChildren {
        node: NodeId,
        #[source]
        source: HostError,
    },

    #[error("Connection error: cannot set endpoints of {node}: {source}")]
    ConnectionResolution {
        node: NodeId,
        #[source]
        source: HostError,
    },

    #[error("Serialize error: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Create a new children-loading error
    pub fn load_children(node: NodeId, source: HostError) -> Self {
        Self::LoadChildren { node, source }
    }

    /// Create a new connection resolution error
    pub fn connection_resolution(node: NodeId, source: HostError) -> Self {
        Self::ConnectionResolution { node, source }
    }
}

/// Every error recorded during one export run
///
/// The walk keeps going after a failure; the errors are reported together
/// once traversal completes.
#[derive(Debug, Default)]
pub struct ExportErrors(Vec<ExportError>);

impl ExportErrors {
    pub fn new(errors: Vec<ExportError>) -> Self {
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ExportError> {
        self.0
    }
}

impl fmt::Display for ExportErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExportErrors {}

impl From<ExportError> for ExportErrors {
    fn from(error: ExportError) -> Self {
        Self(vec![error])
    }
}

/// Errors that abort an import run
///
/// Every variant is raised before the first graph node is created, except
/// `Host`, which comes from the builder itself.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("Missing position: no notation entry for element '{id}'")]
    MissingPosition { id: String },

    #[error("Unknown element type: {type_name}")]
    UnknownElementType { type_name: String },

    #[error("Invalid connector: {message}")]
    InvalidConnector { message: String },

    #[error("XML error: {source}")]
    Xml {
        #[from]
        source: roxmltree::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Host error: {source}")]
    Host {
        #[from]
        source: HostError,
    },
}

impl ImportError {
    /// Create a new malformed-document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create a new missing-position error
    pub fn missing_position(id: &str) -> Self {
        Self::MissingPosition { id: id.to_string() }
    }

    /// Create a new unknown-type error
    pub fn unknown_type(type_name: &str) -> Self {
        Self::UnknownElementType {
            type_name: type_name.to_string(),
        }
    }

    /// Create a new invalid-connector error
    pub fn invalid_connector(message: impl Into<String>) -> Self {
        Self::InvalidConnector {
            message: message.into(),
        }
    }
}
