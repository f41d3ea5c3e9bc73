//! NEAT genomes: node and connection genes keyed by historical markings, innovation-matched
//! crossover, compatibility distance, and feed-forward evaluation of the resulting networks.
//!
//! ```
//! use neat_genome::*;
//!
//! let mut genome = Genome::new(0);
//! genome.add_node(NodeGene::new(1, NodeType::Input));
//! genome.add_node(NodeGene::new(2, NodeType::Output).with_bias(0.5));
//! genome.add_connection(ConnectionGene::new(3, 1, 2, 2.0));
//!
//! let mut net = NeuralNetwork::new(&genome).unwrap();
//! let out = net.activate(&[1.0]).unwrap();
//! assert!((out[0] - 2.5f32.tanh()).abs() < 1e-6);
//! ```
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error types.
pub mod error;

/// Genes, genomes, distance and crossover.
pub mod genome;

/// Compiled, runnable networks.
pub mod network;

/// Mean-squared-error harness for networks.
pub mod tester;

pub use error::NeatError;
pub use genome::*;
pub use network::*;
pub use tester::*;


#[cfg(test)]
mod major_tests;
