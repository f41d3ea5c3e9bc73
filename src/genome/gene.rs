use std::fmt;

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Result, NeatError};

/// The historical marking (innovation number) of a gene.
/// Genes with the same key in different genomes are homologous.
pub type GeneKey = usize;

/// The name of the only nonlinearity evaluation currently applies.
pub const DEFAULT_ACTIVATION: &str = "tanh";

/// Behavior shared by every kind of gene.
pub trait Gene {
    /// The gene's historical marking.
    fn key(&self) -> GeneKey;

    /// Whether the gene takes part in network compilation.
    fn is_enabled(&self) -> bool;

    /// Enables or disables the gene.
    fn set_enabled(&mut self, enabled: bool);

    /// The kind of this gene.
    fn kind(&self) -> GeneKind;

    /// Distance to a gene of the same kind.
    /// Genes with different keys are maximally distant.
    fn distance_to(&self, other: &Self) -> f32 {
        if self.key() != other.key() {
            return 1.;
        }

        0.
    }
}

/// Discriminates the different gene kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeneKind {
    /// A [`NodeGene`].
    Node,

    /// A [`ConnectionGene`].
    Connection,
}

/// The role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeType {
    /// Receives a value from the input vector.
    Input,

    /// Its value ends up in the output vector.
    Output,

    /// A source node whose value comes from its own bias.
    Bias,

    /// Any node between inputs and outputs.
    Hidden,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

bitflags! {
    /// A set of [`NodeType`]s, used to select nodes by role.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct NodeScope: u8 {
        /// Input nodes.
        const INPUT = 0b0001;

        /// Output nodes.
        const OUTPUT = 0b0010;

        /// Bias nodes.
        const BIAS = 0b0100;

        /// Hidden nodes.
        const HIDDEN = 0b1000;
    }
}

impl From<NodeType> for NodeScope {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Input => Self::INPUT,
            NodeType::Output => Self::OUTPUT,
            NodeType::Bias => Self::BIAS,
            NodeType::Hidden => Self::HIDDEN,
        }
    }
}

/// A gene describing a single neuron.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeGene {
    key: GeneKey,
    node_type: NodeType,

    /// Whether the node is enabled.
    pub enabled: bool,

    /// Name of the nonlinearity. Kept for bookkeeping only; evaluation always uses `tanh`.
    pub activation_function: String,

    /// Added to the weighted input sum, or used alone when there are no inputs.
    pub bias: f32,

    /// Response multiplier. Not applied during evaluation.
    pub response: f32,

    /// Aggregation parameter. Not applied during evaluation.
    pub aggregation: f32,

    /// Ordering hint for hidden nodes.
    /// Inputs start at `0`, outputs at [`i32::MAX`], everything else at `1`.
    pub layer: i32,
}

impl NodeGene {
    /// Creates a node gene with default parameters for its type.
    pub fn new(key: GeneKey, node_type: NodeType) -> Self {
        let layer = match node_type {
            NodeType::Input => 0,
            NodeType::Output => i32::MAX,
            NodeType::Bias | NodeType::Hidden => 1,
        };

        Self {
            key,
            node_type,
            enabled: true,
            activation_function: DEFAULT_ACTIVATION.into(),
            bias: 0.,
            response: 1.,
            aggregation: 0.,
            layer,
        }
    }

    /// Builder-style setter for [`bias`][NodeGene::bias].
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Builder-style setter for [`layer`][NodeGene::layer].
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// The node's role in the network.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns `true` if the node belongs to any of the types in `scope`.
    pub fn in_scope(&self, scope: NodeScope) -> bool {
        scope.intersects(NodeScope::from(self.node_type))
    }
}

impl Gene for NodeGene {
    fn key(&self) -> GeneKey {
        self.key
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn kind(&self) -> GeneKind {
        GeneKind::Node
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeGene(key={}, type={}, layer={})",
            self.key, self.node_type, self.layer
        )
    }
}

/// A gene describing a directed, weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionGene {
    key: GeneKey,
    input_key: GeneKey,
    output_key: GeneKey,

    /// The multiplier applied to the source node's value.
    pub weight: f32,

    /// Disabled connections are kept in the genome but left out of compiled networks.
    pub enabled: bool,
}

impl ConnectionGene {
    /// Creates an enabled connection from `input_key` to `output_key`.
    pub fn new(key: GeneKey, input_key: GeneKey, output_key: GeneKey, weight: f32) -> Self {
        Self {
            key,
            input_key,
            output_key,
            weight,
            enabled: true,
        }
    }

    /// The source node's key.
    pub fn input_key(&self) -> GeneKey {
        self.input_key
    }

    /// The destination node's key.
    pub fn output_key(&self) -> GeneKey {
        self.output_key
    }
}

impl Gene for ConnectionGene {
    fn key(&self) -> GeneKey {
        self.key
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn kind(&self) -> GeneKind {
        GeneKind::Connection
    }

    fn distance_to(&self, other: &Self) -> f32 {
        if self.input_key != other.input_key || self.output_key != other.output_key {
            return 1.;
        }

        (self.weight - other.weight).abs()
    }
}

impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectionGene(key={}, {} -> {}, weight={:.2}, enabled={})",
            self.key, self.input_key, self.output_key, self.weight, self.enabled
        )
    }
}

/// A gene of either kind, for when the kind is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnyGene {
    /// Wraps a [`NodeGene`].
    Node(NodeGene),

    /// Wraps a [`ConnectionGene`].
    Connection(ConnectionGene),
}

impl AnyGene {
    /// The wrapped gene's historical marking.
    pub fn key(&self) -> GeneKey {
        match self {
            Self::Node(n) => n.key(),
            Self::Connection(c) => c.key(),
        }
    }

    /// The kind of the wrapped gene.
    pub fn kind(&self) -> GeneKind {
        match self {
            Self::Node(_) => GeneKind::Node,
            Self::Connection(_) => GeneKind::Connection,
        }
    }

    /// Distance to another gene.
    /// Fails with [`NeatError::GeneKindMismatch`] if the kinds differ.
    pub fn distance_to(&self, other: &AnyGene) -> Result<f32> {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => Ok(a.distance_to(b)),
            (Self::Connection(a), Self::Connection(b)) => Ok(a.distance_to(b)),
            _ => Err(NeatError::GeneKindMismatch {
                expected: self.kind(),
                found: other.kind(),
            }),
        }
    }
}

impl From<NodeGene> for AnyGene {
    fn from(value: NodeGene) -> Self {
        Self::Node(value)
    }
}

impl From<ConnectionGene> for AnyGene {
    fn from(value: ConnectionGene) -> Self {
        Self::Connection(value)
    }
}

impl fmt::Display for AnyGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(n) => fmt::Display::fmt(n, f),
            Self::Connection(c) => fmt::Display::fmt(c, f),
        }
    }
}
