// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for scene operations.

use thiserror::Error;

use crate::types::NodeId;

/// Result alias used throughout the scene crate.
pub type Result<T> = core::result::Result<T, SceneError>;

/// Errors raised by explicit scene operations.
///
/// Hit testing and painting never surface these: a node whose transform cannot
/// be inverted simply does not contain any point.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SceneError {
    /// The transform has a zero (or non-finite) determinant and cannot be inverted.
    #[error("transform is not invertible (determinant {determinant})")]
    SingularTransform {
        /// Determinant of the offending matrix.
        determinant: f64,
    },

    /// The operation is not allowed in the node's current state, for example
    /// resizing a node after it was rotated, or editing a sealed container.
    #[error("{op} is not allowed: {reason}")]
    InvalidOperation {
        /// Name of the rejected operation.
        op: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Adding `node` to `container` would make a container contain itself.
    #[error("adding {node:?} to {container:?} would create a containment cycle")]
    StructuralConsistency {
        /// The would-be parent.
        container: NodeId,
        /// The node being added (the container itself or one of its ancestors).
        node: NodeId,
    },

    /// The identifier no longer refers to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),

    /// A container operation was invoked on a leaf node.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),

    /// A font descriptor could not be parsed.
    #[error("invalid font descriptor {descriptor:?}: {reason}")]
    InvalidFont {
        /// The text that failed to parse.
        descriptor: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The shape has no geometry that this operation could change.
    #[error("{op} is not supported by this shape")]
    Unsupported {
        /// Name of the rejected operation.
        op: &'static str,
    },
}
