//! Preparation of HGDP + 1000 Genomes metadata: reformatting the gnomAD sample table,
//! subsetting it to unrelated samples of a population, and extracting exon intervals.
pub mod exons;
pub mod format_metadata;
pub mod literal;
pub mod relatives;
pub mod subset_pop;
pub mod table;

pub use exons::{extract_exons, ExonConfig};
pub use format_metadata::{format_metadata, FormatConfig};
pub use relatives::{prune_relatives, PruneResult, RelatedSamplePruner};
pub use subset_pop::{subset_population, SampleOrder, SubsetConfig};
