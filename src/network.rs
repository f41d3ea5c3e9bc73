use std::collections::HashMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    error::Result, ConnectionGene, Gene, GeneKey, GeneMap, Genome, GenomeKey, NeatError, NodeGene,
    NodeScope,
};

/// A compiled node: its bias and the enabled edges feeding into it.
#[derive(Debug, Clone, PartialEq)]
struct CompiledNode {
    bias: f32,
    inputs: Vec<(GeneKey, f32)>,
}

/// A runnable network compiled from a [`Genome`]. Use [`NeuralNetwork::new`] to go from genome to runnable.
///
/// The network owns a copy of the genome's nodes and enabled connections, so changing the
/// genome afterwards has no effect on it. Every node is evaluated with `tanh`, whatever its
/// [`activation_function`][NodeGene::activation_function] says.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    nodes: GeneMap<NodeGene>,
    connections: GeneMap<ConnectionGene>,
    input_keys: Vec<GeneKey>,
    output_keys: Vec<GeneKey>,
    hidden_keys: Vec<GeneKey>,
    graph: HashMap<GeneKey, CompiledNode>,
    node_values: HashMap<GeneKey, f32>,
}

impl NeuralNetwork {
    /// Compiles a genome.
    /// Fails if an enabled connection references a missing node or the enabled connections form a cycle.
    pub fn new(genome: &Genome) -> Result<Self> {
        genome.validate()?;

        let nodes = genome.nodes.clone();
        let connections: GeneMap<ConnectionGene> = genome.enabled_connections().cloned().collect();

        let input_keys = genome.node_keys_in(NodeScope::INPUT);
        let output_keys = genome.node_keys_in(NodeScope::OUTPUT);

        let mut hidden_keys = genome.node_keys_in(NodeScope::HIDDEN);
        hidden_keys.sort_by_key(|&k| nodes.get(k).map_or(i32::MAX, |n| n.layer));

        let mut graph: HashMap<GeneKey, CompiledNode> = nodes
            .iter()
            .map(|n| {
                (
                    n.key(),
                    CompiledNode {
                        bias: n.bias,
                        inputs: Vec::new(),
                    },
                )
            })
            .collect();

        for conn in &connections {
            if let Some(n) = graph.get_mut(&conn.output_key()) {
                n.inputs.push((conn.input_key(), conn.weight));
            }
        }

        tracing::debug!(
            genome = genome.key(),
            inputs = input_keys.len(),
            hidden = hidden_keys.len(),
            outputs = output_keys.len(),
            connections = connections.len(),
            "compiled network"
        );

        Ok(Self {
            nodes,
            connections,
            input_keys,
            output_keys,
            hidden_keys,
            graph,
            node_values: HashMap::new(),
        })
    }

    /// Runs the network and keeps every node's value for [`NeuralNetwork::node_values`].
    pub fn activate(&mut self, inputs: &[f32]) -> Result<Vec<f32>> {
        let (outputs, values) = self.run(inputs)?;
        self.node_values = values;

        Ok(outputs)
    }

    /// Runs the network without touching any state.
    pub fn predict(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        self.run(inputs).map(|(outputs, _)| outputs)
    }

    /// Runs the network once per input vector.
    #[cfg(not(feature = "rayon"))]
    pub fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        batch.iter().map(|inputs| self.predict(inputs)).collect()
    }

    /// Parallelized prediction over many input vectors.
    #[cfg(feature = "rayon")]
    pub fn predict_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        batch.par_iter().map(|inputs| self.predict(inputs)).collect()
    }

    fn run(&self, inputs: &[f32]) -> Result<(Vec<f32>, HashMap<GeneKey, f32>)> {
        if inputs.len() != self.input_keys.len() {
            return Err(NeatError::InputArity {
                expected: self.input_keys.len(),
                found: inputs.len(),
            });
        }

        let mut cache = HashMap::with_capacity(self.graph.len());

        for (&key, &v) in self.input_keys.iter().zip(inputs) {
            cache.insert(key, v);
        }

        for &key in &self.hidden_keys {
            self.process_node(key, &mut cache)?;
        }

        let outputs = self
            .output_keys
            .iter()
            .map(|&key| self.process_node(key, &mut cache))
            .collect::<Result<Vec<_>>>()?;

        Ok((outputs, cache))
    }

    fn process_node(&self, key: GeneKey, cache: &mut HashMap<GeneKey, f32>) -> Result<f32> {
        if let Some(v) = cache.get(&key) {
            return Ok(*v);
        }

        // endpoints are validated at compile time, so this only trips on a broken invariant.
        let n = self
            .graph
            .get(&key)
            .ok_or(NeatError::MissingNode { node: key })?;

        let mut sum = 0f32;
        for &(input, weight) in &n.inputs {
            sum += self.process_node(input, cache)? * weight;
        }

        // a node without inputs ends up with just its bias.
        sum += n.bias;

        let v = sum.tanh();
        cache.insert(key, v);

        Ok(v)
    }

    /// Every node's value from the last [`NeuralNetwork::activate`] call. Empty before the first call.
    pub fn node_values(&self) -> &HashMap<GeneKey, f32> {
        &self.node_values
    }

    /// The compiled node genes.
    pub fn nodes(&self) -> &GeneMap<NodeGene> {
        &self.nodes
    }

    /// The compiled (enabled) connection genes.
    pub fn connections(&self) -> &GeneMap<ConnectionGene> {
        &self.connections
    }

    /// Input node keys, in the order input vectors are read.
    pub fn input_keys(&self) -> &[GeneKey] {
        &self.input_keys
    }

    /// Output node keys, in the order output vectors are written.
    pub fn output_keys(&self) -> &[GeneKey] {
        &self.output_keys
    }

    /// Hidden node keys, in evaluation order.
    pub fn hidden_keys(&self) -> &[GeneKey] {
        &self.hidden_keys
    }

    /// Rebuilds a genome from the compiled nodes and connections.
    /// Disabled connections of the source genome are not part of it.
    pub fn to_genome(&self, key: GenomeKey) -> Genome {
        let mut genome = Genome::new(key);
        genome.nodes = self.nodes.clone();
        genome.connections = self.connections.clone();

        genome
    }
}

impl TryFrom<&Genome> for NeuralNetwork {
    type Error = NeatError;

    fn try_from(genome: &Genome) -> Result<Self> {
        Self::new(genome)
    }
}
