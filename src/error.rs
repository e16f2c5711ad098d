//! Error types for tree mutation, parsing, and configuration.

use crate::tree::{NodeId, NodeKind};

/// Misuse of the tree API.
///
/// None of these leave the tree in a modified state: an operation that
/// returns an error has not touched any node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0:?} does not exist in this tree")]
    InvalidNode(NodeId),

    #[error("a node cannot be attached to itself")]
    SelfReference,

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("node {0:?} has no parent to insert next to")]
    NoParent(NodeId),

    #[error("{parent} cannot contain {child}")]
    InvalidChild { parent: NodeKind, child: NodeKind },

    #[error("{kind} nodes have no {attribute}")]
    Unsupported {
        kind: NodeKind,
        attribute: &'static str,
    },

    #[error("{attribute} must be in {min}..={max}, got {value}")]
    OutOfRange {
        attribute: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

/// Misuse of the streaming parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("parser has already finished; create a new parser for more input")]
    AlreadyFinished,
}

/// Failure to read a [`Config`](crate::Config) from TOML.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
