use std::{collections::HashMap, slice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::gene::{Gene, GeneKey};

/// A map from gene key to gene that remembers insertion order.
/// Iteration always follows the order genes were first added in.
#[derive(Debug, Clone)]
pub struct GeneMap<G> {
    genes: Vec<G>,
    index: HashMap<GeneKey, usize>,
}

impl<G> GeneMap<G> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            genes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of genes stored.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if there are no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns `true` if a gene with `key` is stored.
    pub fn contains_key(&self, key: GeneKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Gets the gene with the given key.
    pub fn get(&self, key: GeneKey) -> Option<&G> {
        self.index.get(&key).map(|&i| &self.genes[i])
    }

    /// Iterates over the genes in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, G> {
        self.genes.iter()
    }
}

impl<G: Gene> GeneMap<G> {
    /// Inserts a gene under its own key.
    /// An existing gene with the same key is replaced in place and returned.
    pub fn insert(&mut self, gene: G) -> Option<G> {
        let key = gene.key();

        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.genes[i], gene));
        }

        self.index.insert(key, self.genes.len());
        self.genes.push(gene);

        None
    }

    /// Runs `f` on the gene with the given key and returns its result, or `None` if there is no such gene.
    ///
    /// If `f` swaps in a gene with a different key, the gene keeps its position under the new
    /// key and any other gene stored under that key is removed.
    pub fn with_mut<R>(&mut self, key: GeneKey, f: impl FnOnce(&mut G) -> R) -> Option<R> {
        let i = *self.index.get(&key)?;
        let out = f(&mut self.genes[i]);

        let new_key = self.genes[i].key();
        if new_key != key {
            if let Some(&j) = self.index.get(&new_key) {
                self.genes.remove(j);
            }

            self.reindex();
        }

        Some(out)
    }

    /// Runs `f` on every gene in insertion order.
    /// If genes end up sharing a key, the later one replaces the earlier one in place.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut G)) {
        let mut rekeyed = false;

        for (i, gene) in self.genes.iter_mut().enumerate() {
            f(gene);
            rekeyed |= self.index.get(&gene.key()) != Some(&i);
        }

        if rekeyed {
            self.reindex();
        }
    }

    // rebuilds the index; a later gene with a duplicate key replaces the earlier one in place.
    fn reindex(&mut self) {
        let genes = std::mem::take(&mut self.genes);
        self.index.clear();

        for gene in genes {
            self.insert(gene);
        }
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = GeneKey> + '_ {
        self.genes.iter().map(|g| g.key())
    }
}

impl<G> Default for GeneMap<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: PartialEq> PartialEq for GeneMap<G> {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl<G: Gene> FromIterator<G> for GeneMap<G> {
    fn from_iter<T: IntoIterator<Item = G>>(iter: T) -> Self {
        let mut map = Self::new();

        for gene in iter {
            map.insert(gene);
        }

        map
    }
}

impl<G: Gene> Extend<G> for GeneMap<G> {
    fn extend<T: IntoIterator<Item = G>>(&mut self, iter: T) {
        for gene in iter {
            self.insert(gene);
        }
    }
}

impl<'a, G> IntoIterator for &'a GeneMap<G> {
    type Item = &'a G;
    type IntoIter = slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}

impl<G> IntoIterator for GeneMap<G> {
    type Item = G;
    type IntoIter = std::vec::IntoIter<G>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.into_iter()
    }
}

#[cfg(feature = "serde")]
impl<G: Serialize> Serialize for GeneMap<G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.genes)
    }
}

#[cfg(feature = "serde")]
impl<'de, G: Gene + Deserialize<'de>> Deserialize<'de> for GeneMap<G> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let genes = Vec::<G>::deserialize(deserializer)?;
        Ok(genes.into_iter().collect())
    }
}
