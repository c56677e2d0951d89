//! Pipelines -- run every popprep step from one TOML profile.
//!
//! The gnomAD metadata is reformatted into a cohort table, the table is subset to the unrelated
//! samples of each requested population, and, if a GTF is given, its exons are written as a BED.
use definitions::DEFAULT_COHORTS;
use log::*;
use popprep::*;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// The configuration of the pipeline.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PipelineConfig {
    /// The path to the gnomAD HGDP+1KG metadata TSV.
    metadata: PathBuf,
    /// The path to the output directory.
    out_dir: PathBuf,
    prefix: String,
    /// Population codes to subset.
    #[serde(default)]
    populations: Vec<String>,
    #[serde(default = "default_cohorts")]
    cohorts: Vec<String>,
    /// Write the sample lists in lexicographic order.
    #[serde(default)]
    sort_samples: bool,
    gtf: Option<PathBuf>,
    genome: Option<PathBuf>,
    #[serde(default = "default_feature")]
    feature: String,
    #[serde(default)]
    verbose: usize,
    /// Reuse an existing cohort table instead of formatting the metadata again.
    #[serde(default)]
    resume: bool,
}

fn default_cohorts() -> Vec<String> {
    DEFAULT_COHORTS.iter().map(|x| x.to_string()).collect()
}

fn default_feature() -> String {
    "exon".to_string()
}

impl PipelineConfig {
    pub fn cohort_table(&self) -> PathBuf {
        self.out_dir.join(format!("{}.meta.tsv", self.prefix))
    }
    pub fn sample_list(&self, pop: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{}.samples.list", self.prefix, pop))
    }
    pub fn exon_bed(&self) -> PathBuf {
        self.out_dir.join(format!("{}.exons.bed", self.prefix))
    }
}

pub fn run_pipeline(config: &PipelineConfig) -> std::io::Result<()> {
    let level = match config.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A logger may already be installed by the caller.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
    std::fs::create_dir_all(&config.out_dir)?;
    let table = config.cohort_table();
    if config.resume && matches!(table.try_exists(), Ok(true)) {
        debug!("RESUME\t{table:?}");
    } else {
        let format_config = FormatConfig::new(config.cohorts.as_slice());
        let reader = open(&config.metadata)?;
        let written = format_metadata(reader, create(&table)?, &format_config)?;
        debug!("PIPELINE\tFormat\t{written}");
    }
    let order = match config.sort_samples {
        true => SampleOrder::Lexicographic,
        false => SampleOrder::Input,
    };
    for pop in config.populations.iter() {
        let subset_config = SubsetConfig::new(pop, order);
        let wtr = create(&config.sample_list(pop))?;
        let result = subset_population(open(&table)?, wtr, &subset_config)?;
        debug!(
            "PIPELINE\tSubset\t{pop}\t{}\t{}",
            result.loaded(),
            result.retained.len()
        );
    }
    if let Some(gtf) = config.gtf.as_ref() {
        let genome = match config.genome.as_ref() {
            Some(path) => Some(exons::read_genome(open(path)?)?),
            None => None,
        };
        let exon_config = ExonConfig::new(&config.feature);
        let bed = create(&config.exon_bed())?;
        let written = extract_exons(open(gtf)?, genome.as_ref(), bed, &exon_config)?;
        debug!("PIPELINE\tExons\t{written}");
    }
    Ok(())
}

fn open(path: &Path) -> std::io::Result<BufReader<std::fs::File>> {
    debug!("Opening {:?}", path);
    std::fs::File::open(path).map(BufReader::new)
}

fn create(path: &Path) -> std::io::Result<BufWriter<std::fs::File>> {
    std::fs::File::create(path).map(BufWriter::new)
}
