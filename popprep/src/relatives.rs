//! Greedy pruning of related samples.
//!
//! The relatedness graph of a population is kept as an adjacency set per sample. The pruner repeatedly
//! drops the sample with the largest number of remaining relatives until no two retained samples
//! are related. The result is a maximal, not necessarily maximum, set of unrelated samples.
use log::*;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct RelatedSamplePruner {
    /// Sample IDs in input order.
    order: Vec<String>,
    /// Undirected adjacency of the retained samples. A sample is retained iff it is a key.
    relatives: BTreeMap<String, BTreeSet<String>>,
    /// Removed samples, in removal order.
    removed: Vec<String>,
}

/// The outcome of a pruning run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PruneResult {
    /// Retained samples, in input order.
    pub retained: Vec<String>,
    /// Removed samples, in removal order.
    pub removed: Vec<String>,
    pub iterations: usize,
}

impl PruneResult {
    pub fn loaded(&self) -> usize {
        self.retained.len() + self.removed.len()
    }
}

impl RelatedSamplePruner {
    /// Build the adjacency from (sample, listed relatives) pairs.
    /// Relations are symmetrized. Relatives which are not themselves input samples,
    /// and samples listing themselves, are ignored.
    /// If a sample appears twice, its relatives are merged.
    pub fn new<I, S, R, T>(samples: I) -> Self
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let samples: Vec<(String, Vec<String>)> = samples
            .into_iter()
            .map(|(id, rels)| {
                let rels = rels.into_iter().map(|r| r.as_ref().to_string()).collect();
                (id.as_ref().to_string(), rels)
            })
            .collect();
        let mut order = Vec::with_capacity(samples.len());
        let mut relatives: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (id, _) in samples.iter() {
            if !relatives.contains_key(id) {
                relatives.insert(id.clone(), BTreeSet::new());
                order.push(id.clone());
            }
        }
        for (id, rels) in samples.iter() {
            for rel in rels.iter().filter(|&rel| rel != id) {
                if !relatives.contains_key(rel) {
                    trace!("PRUNE\tOutside\t{id}\t{rel}");
                    continue;
                }
                relatives.entry(id.clone()).or_default().insert(rel.clone());
                relatives.entry(rel.clone()).or_default().insert(id.clone());
            }
        }
        Self {
            order,
            relatives,
            removed: vec![],
        }
    }
    pub fn len(&self) -> usize {
        self.relatives.len()
    }
    pub fn is_empty(&self) -> bool {
        self.relatives.is_empty()
    }
    pub fn contains(&self, id: &str) -> bool {
        self.relatives.contains_key(id)
    }
    /// The number of retained samples related to `id`, if `id` is retained.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.relatives.get(id).map(|rels| rels.len())
    }
    /// The number of relatedness edges among the retained samples.
    pub fn num_edges(&self) -> usize {
        self.relatives.values().map(|rels| rels.len()).sum::<usize>() / 2
    }
    /// The retained sample with the most retained relatives.
    /// Ties go to the lexicographically smallest ID. None if no edge is left.
    pub fn most_related(&self) -> Option<(&str, usize)> {
        self.relatives
            .iter()
            .map(|(id, rels)| (id.as_str(), rels.len()))
            .filter(|&(_, degree)| 0 < degree)
            .fold(None, |max, (id, degree)| match max {
                Some((_, max_degree)) if degree <= max_degree => max,
                _ => Some((id, degree)),
            })
    }
    /// Drop `id` and erase it from the relatives of the remaining samples.
    /// Returns false if `id` was not retained.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.relatives.remove(id) {
            Some(rels) => {
                for rel in rels.iter() {
                    if let Some(rel_rels) = self.relatives.get_mut(rel) {
                        rel_rels.remove(id);
                    }
                }
                true
            }
            None => false,
        }
    }
    /// One round of pruning. Returns the removed sample, or None when no relatives are left.
    pub fn step(&mut self) -> Option<String> {
        let (id, degree) = self.most_related()?;
        let id = id.to_string();
        debug!("PRUNE\t{}\t{}\t{}", self.removed.len(), id, degree);
        self.remove(&id);
        self.removed.push(id.clone());
        Some(id)
    }
    /// Run [step](Self::step) until no two retained samples are related.
    pub fn prune(mut self) -> PruneResult {
        while self.step().is_some() {}
        let Self {
            order,
            relatives,
            removed,
        } = self;
        let retained: Vec<_> = order
            .into_iter()
            .filter(|id| relatives.contains_key(id))
            .collect();
        debug!("PRUNE\tDone\t{}\t{}", retained.len(), removed.len());
        PruneResult {
            retained,
            iterations: removed.len(),
            removed,
        }
    }
}

/// Prune related samples from a list of (sample, relatives) pairs.
pub fn prune_relatives<I, S, R, T>(samples: I) -> PruneResult
where
    I: IntoIterator<Item = (S, R)>,
    S: AsRef<str>,
    R: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    RelatedSamplePruner::new(samples).prune()
}
