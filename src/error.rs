use thiserror::Error;

use crate::{GeneKey, GeneKind};

/// Errors produced while comparing genes, compiling genomes or running networks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeatError {
    /// A gene was compared against a gene of a different kind.
    #[error("{expected:?} distance comparison requires a {expected:?} gene, got {found:?}")]
    GeneKindMismatch {
        /// The kind of the gene doing the comparison.
        expected: GeneKind,

        /// The kind of the gene it was compared with.
        found: GeneKind,
    },

    /// The input vector does not match the number of input nodes.
    #[error("expected {expected} inputs, but got {found}")]
    InputArity {
        /// The number of input nodes in the network.
        expected: usize,

        /// The length of the provided input vector.
        found: usize,
    },

    /// More expected values were given than the network has outputs.
    #[error("expected at most {expected} outputs to compare against, but got {found}")]
    OutputArity {
        /// The number of output nodes in the network.
        expected: usize,

        /// The length of the provided expectation vector.
        found: usize,
    },

    /// An enabled connection points at a node the genome does not contain.
    #[error("connection {connection} references missing node {node}")]
    DanglingConnection {
        /// The key of the offending connection gene.
        connection: GeneKey,

        /// The node key that could not be found.
        node: GeneKey,
    },

    /// A node key was not found in a compiled network.
    ///
    /// [`NeuralNetwork::new`][crate::NeuralNetwork::new] validates every enabled connection first
    /// and reports [`NeatError::DanglingConnection`] instead, so networks built through it never
    /// return this. It only guards evaluation against a compiled graph that lost a node.
    #[error("node {node} is not part of the network")]
    MissingNode {
        /// The key that could not be found.
        node: GeneKey,
    },

    /// The enabled connections do not form a directed acyclic graph.
    #[error("cycle detected through node {node}")]
    CycleDetected {
        /// A node on the cycle.
        node: GeneKey,
    },
}

/// Shorthand for results carrying a [`NeatError`].
pub type Result<T> = std::result::Result<T, NeatError>;
