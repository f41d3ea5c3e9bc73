use std::fmt;

use super::{gene::GeneKey, GenomeKey};

/// Which parent a matching connection gene was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The parent with the higher (or tied) fitness.
    Fitter,

    /// The other parent.
    LessFit,
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fitter => f.write_str("more fit"),
            Self::LessFit => f.write_str("less fit"),
        }
    }
}

/// A single decision made during [`Genome::crossover_traced`][crate::Genome::crossover_traced].
#[derive(Debug, Clone, PartialEq)]
pub enum CrossoverEvent {
    /// The parents were ordered by fitness.
    ParentsRanked {
        /// Key of the fitter parent.
        fitter: GenomeKey,

        /// Fitness of the fitter parent.
        fitter_fitness: Option<f32>,

        /// Key of the less fit parent.
        less_fit: GenomeKey,

        /// Fitness of the less fit parent.
        less_fit_fitness: Option<f32>,
    },

    /// The child took every node gene of the fitter parent.
    NodesInherited {
        /// The inherited node keys, in order.
        keys: Vec<GeneKey>,
    },

    /// Both parents carry this connection; one of them was picked at random.
    MatchingConnection {
        /// The connection key.
        key: GeneKey,

        /// The parent the gene was copied from.
        parent: Parent,

        /// The inherited weight.
        weight: f32,
    },

    /// Only the fitter parent carries this connection.
    DisjointConnection {
        /// The connection key.
        key: GeneKey,

        /// The inherited weight.
        weight: f32,
    },

    /// The child is complete.
    Finished {
        /// Key of the child genome.
        child: GenomeKey,

        /// Node keys of the child.
        nodes: Vec<GeneKey>,

        /// Connection keys of the child.
        connections: Vec<GeneKey>,
    },
}

impl CrossoverEvent {
    /// Forwards the event to the `tracing` subscriber, if any.
    pub(crate) fn emit(&self) {
        match self {
            Self::ParentsRanked {
                fitter,
                fitter_fitness,
                less_fit,
                less_fit_fitness,
            } => tracing::debug!(
                fitter,
                ?fitter_fitness,
                less_fit,
                ?less_fit_fitness,
                "ranked crossover parents"
            ),
            Self::NodesInherited { keys } => {
                tracing::debug!(?keys, "inherited nodes from more fit parent")
            }
            Self::MatchingConnection {
                key,
                parent,
                weight,
            } => tracing::debug!(key, %parent, weight, "matching connection"),
            Self::DisjointConnection { key, weight } => {
                tracing::debug!(key, weight, "disjoint/excess connection")
            }
            Self::Finished {
                child,
                nodes,
                connections,
            } => tracing::debug!(child, ?nodes, ?connections, "crossover complete"),
        }
    }
}

fn fmt_fitness(fitness: &Option<f32>) -> String {
    match fitness {
        Some(v) => v.to_string(),
        None => "unset".into(),
    }
}

fn fmt_keys(keys: &[GeneKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for CrossoverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentsRanked {
                fitter,
                fitter_fitness,
                less_fit,
                less_fit_fitness,
            } => write!(
                f,
                "More fit parent: Genome {fitter} (fitness: {}), less fit parent: Genome {less_fit} (fitness: {})",
                fmt_fitness(fitter_fitness),
                fmt_fitness(less_fit_fitness),
            ),
            Self::NodesInherited { keys } => {
                write!(f, "Child inherited nodes: {}", fmt_keys(keys))
            }
            Self::MatchingConnection {
                key,
                parent,
                weight,
            } => write!(
                f,
                "Matching connection {key}: chose {parent} parent's connection with weight {weight}"
            ),
            Self::DisjointConnection { key, weight } => write!(
                f,
                "Disjoint/excess connection {key}: inherited from more fit parent with weight {weight}"
            ),
            Self::Finished {
                child,
                nodes,
                connections,
            } => write!(
                f,
                "Crossover complete. Child Genome {child} created with nodes [{}] and connections [{}]",
                fmt_keys(nodes),
                fmt_keys(connections),
            ),
        }
    }
}

/// The ordered record of every decision a crossover made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossoverTrace {
    events: Vec<CrossoverEvent>,
}

impl CrossoverTrace {
    /// Records an event and forwards it to `tracing`.
    pub(crate) fn record(&mut self, event: CrossoverEvent) {
        event.emit();
        self.events.push(event);
    }

    /// The recorded events, in order.
    pub fn events(&self) -> &[CrossoverEvent] {
        &self.events
    }

    /// The connection decisions, in the order they were made.
    pub fn connection_choices(&self) -> impl Iterator<Item = (GeneKey, Option<Parent>)> + '_ {
        self.events.iter().filter_map(|e| match e {
            CrossoverEvent::MatchingConnection { key, parent, .. } => Some((*key, Some(*parent))),
            CrossoverEvent::DisjointConnection { key, .. } => Some((*key, None)),
            _ => None,
        })
    }
}

impl fmt::Display for CrossoverTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }

        Ok(())
    }
}
