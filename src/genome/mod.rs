/// Node and connection genes.
pub mod gene;

/// Insertion-ordered gene storage.
pub mod gene_map;

/// Records of crossover decisions.
pub mod trace;

pub use gene::*;
pub use gene_map::*;
pub use trace::*;

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Result, NeatError};

/// The identity of a genome within a population. Unrelated to gene keys.
pub type GenomeKey = usize;

/// Coefficients for [`Genome::compatibility`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompatibilitySettings {
    /// Multiplies the number of node and connection genes not shared by both genomes.
    pub disjoint_coefficient: f32,

    /// Multiplies the average weight difference of matching connections.
    pub weight_coefficient: f32,
}

impl Default for CompatibilitySettings {
    fn default() -> Self {
        Self {
            disjoint_coefficient: 1.,
            weight_coefficient: 0.5,
        }
    }
}

/// A candidate network described as a set of node and connection genes.
///
/// See [`NeuralNetwork::new`][crate::NeuralNetwork::new] to turn it into something runnable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Genome {
    key: GenomeKey,

    /// The node genes, keyed by innovation number.
    pub nodes: GeneMap<NodeGene>,

    /// The connection genes, keyed by innovation number.
    pub connections: GeneMap<ConnectionGene>,

    /// Score assigned by whoever evaluates the genome. Unset until then.
    pub fitness: Option<f32>,
}

impl Genome {
    /// Creates an empty genome.
    pub fn new(key: GenomeKey) -> Self {
        Self {
            key,
            nodes: GeneMap::new(),
            connections: GeneMap::new(),
            fitness: None,
        }
    }

    /// The genome's identity.
    pub fn key(&self) -> GenomeKey {
        self.key
    }

    /// Adds a node gene, replacing any node with the same key.
    pub fn add_node(&mut self, node: NodeGene) {
        self.nodes.insert(node);
    }

    /// Adds a connection gene, replacing any connection with the same key.
    /// No structural checks happen here; see [`Genome::validate`].
    pub fn add_connection(&mut self, connection: ConnectionGene) {
        self.connections.insert(connection);
    }

    /// Copies every gene and the fitness into a genome with a new identity.
    pub fn clone_with_key(&self, key: GenomeKey) -> Self {
        Self {
            key,
            ..self.clone()
        }
    }

    /// Keys of the nodes whose type is in `scope`, in insertion order.
    pub fn node_keys_in(&self, scope: NodeScope) -> Vec<GeneKey> {
        self.nodes
            .iter()
            .filter(|n| n.in_scope(scope))
            .map(|n| n.key())
            .collect()
    }

    /// The enabled connections, in insertion order.
    pub fn enabled_connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.iter().filter(|c| c.enabled)
    }

    /// Compatibility distance between two genomes.
    ///
    /// Every node or connection key not present in both genomes counts once towards the
    /// disjoint term, with no distinction between disjoint and excess genes. The weight term
    /// is the mean absolute weight difference over matching connections.
    pub fn distance(
        &self,
        other: &Genome,
        disjoint_coefficient: f32,
        weight_coefficient: f32,
    ) -> f32 {
        let node_union: HashSet<_> = self.nodes.keys().chain(other.nodes.keys()).collect();
        let connection_union: HashSet<_> = self
            .connections
            .keys()
            .chain(other.connections.keys())
            .collect();

        let disjoint_nodes = node_union.len() - self.nodes.len().min(other.nodes.len());
        let disjoint_connections =
            connection_union.len() - self.connections.len().min(other.connections.len());

        let mut weight_diff = 0.;
        let mut matching = 0;

        for conn in &self.connections {
            if let Some(other_conn) = other.connections.get(conn.key()) {
                weight_diff += (conn.weight - other_conn.weight).abs();
                matching += 1;
            }
        }

        let average_weight_diff = if matching > 0 {
            weight_diff / matching as f32
        } else {
            0.
        };

        disjoint_coefficient * (disjoint_nodes + disjoint_connections) as f32
            + weight_coefficient * average_weight_diff
    }

    /// [`Genome::distance`] with coefficients taken from `settings`.
    pub fn compatibility(&self, other: &Genome, settings: &CompatibilitySettings) -> f32 {
        self.distance(
            other,
            settings.disjoint_coefficient,
            settings.weight_coefficient,
        )
    }

    /// Returns `true` if `self` ranks at least as fit as `other`.
    /// Only two set fitnesses can compare; if either is unset, `other` wins.
    fn at_least_as_fit_as(&self, other: &Genome) -> bool {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }

    /// Produces a child from two parents. See [`Genome::crossover_traced`].
    pub fn crossover(&self, other: &Genome, child_key: GenomeKey, rng: &mut impl Rng) -> Genome {
        self.crossover_traced(other, child_key, rng).0
    }

    /// Produces a child from two parents and returns the decisions made along the way.
    ///
    /// The child copies every node of the fitter parent. Ties between set fitnesses favor
    /// `self`; if either fitness is unset, `other` counts as the fitter parent. Connections
    /// present in both parents are taken from either one with equal probability; connections
    /// only the fitter parent has are always taken, and those only the less fit parent has
    /// are dropped. The child's fitness is unset.
    pub fn crossover_traced(
        &self,
        other: &Genome,
        child_key: GenomeKey,
        rng: &mut impl Rng,
    ) -> (Genome, CrossoverTrace) {
        let (fitter, less_fit) = if self.at_least_as_fit_as(other) {
            (self, other)
        } else {
            (other, self)
        };

        let mut trace = CrossoverTrace::default();
        trace.record(CrossoverEvent::ParentsRanked {
            fitter: fitter.key,
            fitter_fitness: fitter.fitness,
            less_fit: less_fit.key,
            less_fit_fitness: less_fit.fitness,
        });

        let mut child = Genome::new(child_key);

        child.nodes = fitter.nodes.clone();
        trace.record(CrossoverEvent::NodesInherited {
            keys: child.nodes.keys().collect(),
        });

        for conn in &fitter.connections {
            if let Some(other_conn) = less_fit.connections.get(conn.key()) {
                let (parent, selected) = if rng.gen::<f32>() < 0.5 {
                    (Parent::Fitter, conn)
                } else {
                    (Parent::LessFit, other_conn)
                };

                trace.record(CrossoverEvent::MatchingConnection {
                    key: conn.key(),
                    parent,
                    weight: selected.weight,
                });
                child.add_connection(selected.clone());

                continue;
            }

            trace.record(CrossoverEvent::DisjointConnection {
                key: conn.key(),
                weight: conn.weight,
            });
            child.add_connection(conn.clone());
        }

        trace.record(CrossoverEvent::Finished {
            child: child_key,
            nodes: child.nodes.keys().collect(),
            connections: child.connections.keys().collect(),
        });

        (child, trace)
    }

    /// Checks that every enabled connection points at existing nodes and that the
    /// enabled connections contain no cycle.
    pub fn validate(&self) -> Result<()> {
        for conn in self.enabled_connections() {
            for node in [conn.input_key(), conn.output_key()] {
                if !self.nodes.contains_key(node) {
                    return Err(NeatError::DanglingConnection {
                        connection: conn.key(),
                        node,
                    });
                }
            }
        }

        let outgoing = self.outgoing_edges();
        let mut visited = HashMap::new();

        for key in self.nodes.keys() {
            check_acyclic(&outgoing, key, &mut visited)?;
        }

        Ok(())
    }

    /// Returns `false` if an enabled connection from `input_key` to `output_key`
    /// would close a cycle.
    pub fn is_connection_safe(&self, input_key: GeneKey, output_key: GeneKey) -> bool {
        !reaches(&self.outgoing_edges(), output_key, input_key)
    }

    fn outgoing_edges(&self) -> HashMap<GeneKey, Vec<GeneKey>> {
        let mut outgoing: HashMap<GeneKey, Vec<GeneKey>> = HashMap::new();

        for conn in self.enabled_connections() {
            outgoing
                .entry(conn.input_key())
                .or_default()
                .push(conn.output_key());
        }

        outgoing
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum VisitState {
    OnStack,
    Done,
}

// colored dfs without recursion, fails on the first back edge.
// each stack entry is a node and the index of the next outgoing edge to follow.
fn check_acyclic(
    outgoing: &HashMap<GeneKey, Vec<GeneKey>>,
    start: GeneKey,
    visited: &mut HashMap<GeneKey, VisitState>,
) -> Result<()> {
    if visited.contains_key(&start) {
        return Ok(());
    }

    visited.insert(start, VisitState::OnStack);
    let mut stack = vec![(start, 0usize)];

    while let Some((key, edge)) = stack.pop() {
        let Some(&next) = outgoing.get(&key).and_then(|edges| edges.get(edge)) else {
            visited.insert(key, VisitState::Done);
            continue;
        };

        stack.push((key, edge + 1));

        match visited.get(&next) {
            Some(VisitState::OnStack) => return Err(NeatError::CycleDetected { node: next }),
            Some(VisitState::Done) => {}
            None => {
                visited.insert(next, VisitState::OnStack);
                stack.push((next, 0));
            }
        }
    }

    Ok(())
}

fn reaches(outgoing: &HashMap<GeneKey, Vec<GeneKey>>, from: GeneKey, target: GeneKey) -> bool {
    let mut seen = HashSet::from([from]);
    let mut stack = vec![from];

    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }

        for &next in outgoing.get(&current).into_iter().flatten() {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }

    false
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome(key={}, nodes={}, connections={}, fitness=",
            self.key,
            self.nodes.len(),
            self.connections.len()
        )?;

        // unset fitness prints as nothing.
        if let Some(v) = self.fitness {
            write!(f, "{v}")?;
        }

        f.write_str(")")
    }
}
