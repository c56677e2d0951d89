//! Definitions -- the records shared by the popprep tools.
//! Every tool reads one delimited-text or interval file and writes another. The rows of those files are
//! the structures below; they are (de)serialized with `serde` so that the `csv` readers and writers
//! can map header names onto fields directly.

use serde::{Deserialize, Serialize};

/// The cohorts kept by default when formatting the gnomAD metadata.
pub const DEFAULT_COHORTS: [&str; 2] = ["HGDP", "1000 Genomes"];

/// One row of the cohort table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CohortSample {
    #[serde(rename = "#sample_id")]
    pub sample_id: String,
    #[serde(default)]
    pub cohort: String,
    pub pop: String,
    pub subpop: Option<String>,
    /// Comma-separated sample IDs. Empty if the sample has no known relatives.
    pub relatives: Option<String>,
}

impl CohortSample {
    pub fn new(
        sample_id: &str,
        cohort: &str,
        pop: &str,
        subpop: Option<&str>,
        relatives: &[&str],
    ) -> Self {
        let relatives = match relatives.is_empty() {
            true => None,
            false => Some(relatives.join(",")),
        };
        Self {
            sample_id: sample_id.to_string(),
            cohort: cohort.to_string(),
            pop: pop.to_string(),
            subpop: subpop.map(|x| x.to_string()),
            relatives,
        }
    }
    /// The relatives of this sample. Empty entries are skipped.
    pub fn relatives(&self) -> impl Iterator<Item = &str> {
        self.relatives
            .iter()
            .flat_map(|rels| rels.split(','))
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }
}

/// The columns of the gnomAD HGDP+1KG metadata TSV we consume.
/// The file has many more columns; they are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnomadMetaRow {
    pub s: String,
    pub relatedness_inference: String,
    pub hgdp_tgp_meta: String,
}

/// Schema of the `relatedness_inference` literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatednessInference {
    pub related_samples: Vec<RelatedSample>,
}

/// A single entry of `related_samples`. Kinship statistics, if any, are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedSample {
    pub s: String,
}

/// Schema of the `hgdp_tgp_meta` literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HgdpTgpMeta {
    /// The cohort, e.g., `HGDP` or `1000 Genomes`.
    pub project: String,
    pub genetic_region: String,
    #[serde(default)]
    pub gnomad_labeled_subpop: Option<String>,
}

/// A BED interval. 0-based, half open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(chrom: &str, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.to_string(),
            start,
            end,
        }
    }
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn relatives_split() {
        let sample = CohortSample::new("A", "HGDP", "afr", None, &["B", "C"]);
        assert_eq!(sample.relatives().collect::<Vec<_>>(), vec!["B", "C"]);
        let sample = CohortSample {
            relatives: Some("B,,C,".to_string()),
            ..sample
        };
        assert_eq!(sample.relatives().collect::<Vec<_>>(), vec!["B", "C"]);
    }
    #[test]
    fn no_relatives() {
        let sample = CohortSample::new("A", "HGDP", "afr", Some("yri"), &[]);
        assert!(sample.relatives.is_none());
        assert_eq!(sample.relatives().count(), 0);
    }
    #[test]
    fn interval_display() {
        let interval = Interval::new("chr1", 10, 20);
        assert_eq!(format!("{interval}"), "chr1\t10\t20");
        assert_eq!(interval.len(), 10);
        assert!(!interval.is_empty());
    }
}
