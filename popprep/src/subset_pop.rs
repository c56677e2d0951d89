//! Subset the cohort table to the unrelated samples of a single population.
use crate::relatives::{PruneResult, RelatedSamplePruner};
use crate::table::{require_columns, tsv_reader};
use definitions::CohortSample;
use log::*;
use std::collections::HashSet;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrder {
    /// The order of the cohort table.
    #[default]
    Input,
    Lexicographic,
}

#[derive(Debug, Clone)]
pub struct SubsetConfig {
    pop: String,
    order: SampleOrder,
}

impl SubsetConfig {
    pub fn new(pop: &str, order: SampleOrder) -> Self {
        Self {
            pop: pop.to_string(),
            order,
        }
    }
}

/// Read the cohort table and keep the rows of the configured population.
pub fn read_population<R: Read>(reader: R, pop: &str) -> std::io::Result<Vec<CohortSample>> {
    let mut rdr = tsv_reader(reader);
    require_columns(&mut rdr, &["#sample_id", "pop", "relatives"])?;
    let mut samples = vec![];
    for sample in rdr.deserialize() {
        let sample: CohortSample = sample?;
        if sample.pop == pop {
            samples.push(sample);
        }
    }
    let mut seen = HashSet::new();
    if let Some(dup) = samples.iter().find(|s| !seen.insert(s.sample_id.as_str())) {
        let message = format!("sample {} appears twice in population {}", dup.sample_id, pop);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, message));
    }
    Ok(samples)
}

/// Prune the relatives among `samples`.
pub fn prune_population(samples: &[CohortSample]) -> PruneResult {
    let pruner = RelatedSamplePruner::new(
        samples
            .iter()
            .map(|s| (s.sample_id.as_str(), s.relatives())),
    );
    debug!("SUBSET\tEdges\t{}", pruner.num_edges());
    pruner.prune()
}

pub fn write_sample_list<W: Write>(mut writer: W, samples: &[String]) -> std::io::Result<()> {
    for sample in samples.iter() {
        writeln!(writer, "{sample}")?;
    }
    writer.flush()
}

/// Read the cohort table, prune relatives within the population, and write the retained IDs.
pub fn subset_population<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &SubsetConfig,
) -> std::io::Result<PruneResult> {
    let samples = read_population(reader, &config.pop)?;
    info!("Loaded {} samples from {} population", samples.len(), config.pop);
    if samples.is_empty() {
        warn!("No sample belongs to population {}", config.pop);
    }
    let mut result = prune_population(&samples);
    info!(
        "Retained {} samples after pruning relatives",
        result.retained.len()
    );
    if config.order == SampleOrder::Lexicographic {
        result.retained.sort();
    }
    write_sample_list(writer, &result.retained)?;
    Ok(result)
}
