//! Reformat the gnomAD HGDP + 1000 Genomes sample metadata into a cohort table.
//!
//! Each input row carries two literal-valued columns. From `relatedness_inference` we take the IDs of
//! the related samples, from `hgdp_tgp_meta` the cohort, population and subpopulation labels.
use crate::literal::parse_as;
use crate::table::{require_columns, tsv_reader, tsv_writer};
use definitions::*;
use log::*;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Column names of the cohort table, in output order.
pub const COHORT_HEADER: [&str; 5] = ["#sample_id", "cohort", "pop", "subpop", "relatives"];

#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Samples of other cohorts are discarded.
    cohorts: Vec<String>,
}

impl FormatConfig {
    pub fn new<S: AsRef<str>>(cohorts: &[S]) -> Self {
        let cohorts = cohorts.iter().map(|c| c.as_ref().to_string()).collect();
        Self { cohorts }
    }
    pub fn keeps(&self, cohort: &str) -> bool {
        self.cohorts.iter().any(|c| c == cohort)
    }
}

impl std::default::Default for FormatConfig {
    fn default() -> Self {
        Self::new(&DEFAULT_COHORTS)
    }
}

/// Sorted IDs of the related samples listed in a `relatedness_inference` literal.
pub fn extract_relatives(literal: &str) -> std::io::Result<Vec<String>> {
    let inference: RelatednessInference = parse_as(literal)?;
    let mut relatives: Vec<_> = inference
        .related_samples
        .into_iter()
        .map(|rel| rel.s)
        .collect();
    relatives.sort();
    Ok(relatives)
}

/// Convert one gnomAD row into a cohort table row.
pub fn to_cohort_sample(row: &GnomadMetaRow) -> std::io::Result<CohortSample> {
    let with_sample = |e: std::io::Error| {
        let message = format!("sample {}: {}", row.s, e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, message)
    };
    let relatives = extract_relatives(&row.relatedness_inference).map_err(with_sample)?;
    let meta: HgdpTgpMeta = parse_as(&row.hgdp_tgp_meta).map_err(with_sample)?;
    let relatives = match relatives.is_empty() {
        true => None,
        false => Some(relatives.join(",")),
    };
    Ok(CohortSample {
        sample_id: row.s.clone(),
        cohort: meta.project,
        pop: meta.genetic_region,
        subpop: meta.gnomad_labeled_subpop.filter(|x| !x.is_empty()),
        relatives,
    })
}

/// Sort by population, subpopulation, then sample ID. Missing subpopulations go last.
pub fn sort_cohort_table(samples: &mut [CohortSample]) {
    samples.sort_by(|s1, s2| {
        let key1 = (&s1.pop, s1.subpop.is_none(), &s1.subpop, &s1.sample_id);
        let key2 = (&s2.pop, s2.subpop.is_none(), &s2.subpop, &s2.sample_id);
        key1.cmp(&key2)
    });
}

/// Read the gnomAD metadata and return the sorted cohort table.
pub fn read_gnomad_metadata<R: Read>(
    reader: R,
    config: &FormatConfig,
) -> std::io::Result<Vec<CohortSample>> {
    let mut rdr = tsv_reader(reader);
    require_columns(&mut rdr, &["s", "relatedness_inference", "hgdp_tgp_meta"])?;
    let mut samples = vec![];
    let mut discarded: HashMap<String, usize> = HashMap::new();
    for row in rdr.deserialize() {
        let row: GnomadMetaRow = row?;
        let sample = to_cohort_sample(&row)?;
        if config.keeps(&sample.cohort) {
            samples.push(sample);
        } else {
            *discarded.entry(sample.cohort).or_default() += 1;
        }
    }
    for (cohort, count) in discarded.iter() {
        debug!("FORMAT\tDiscard\t{cohort}\t{count}");
    }
    info!("Kept {} samples from {:?}", samples.len(), config.cohorts);
    sort_cohort_table(&mut samples);
    Ok(samples)
}

pub fn write_cohort_table<W: Write>(writer: W, samples: &[CohortSample]) -> std::io::Result<()> {
    let mut wtr = tsv_writer(writer);
    wtr.write_record(COHORT_HEADER)?;
    for sample in samples.iter() {
        wtr.serialize(sample)?;
    }
    wtr.flush()
}

/// Read the gnomAD metadata from `reader` and write the cohort table to `writer`.
/// Returns the number of samples written.
pub fn format_metadata<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &FormatConfig,
) -> std::io::Result<usize> {
    let samples = read_gnomad_metadata(reader, config)?;
    write_cohort_table(writer, &samples)?;
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    const HEADER: &str = "s\tpop_inference\trelatedness_inference\thgdp_tgp_meta\n";
    fn row(s: &str, relatives: &[&str], project: &str, region: &str, subpop: &str) -> String {
        let relatives: Vec<_> = relatives
            .iter()
            .map(|r| format!("{{\"s\":\"{r}\",\"kin\":0.25}}"))
            .collect();
        format!(
            "{s}\tNA\t{{\"related_samples\":[{}],\"related\":{}}}\t{{\"project\":\"{project}\",\"genetic_region\":\"{region}\",\"gnomad_labeled_subpop\":{subpop}}}\n",
            relatives.join(","),
            !relatives.is_empty(),
        )
    }
    #[test]
    fn relatives_sorted() {
        let literal = "{'related_samples': [{'s': 'NA2'}, {'s': 'HG1'}], 'related': True}";
        assert_eq!(extract_relatives(literal).unwrap(), vec!["HG1", "NA2"]);
        let literal = "{\"related_samples\":[]}";
        assert!(extract_relatives(literal).unwrap().is_empty());
        assert!(extract_relatives("{'related': True}").is_err());
    }
    #[test]
    fn format_table() {
        let mut input = HEADER.to_string();
        input += &row("S3", &["S1"], "HGDP", "afr", "\"yri\"");
        input += &row("S1", &["S3", "S0"], "1000 Genomes", "afr", "null");
        input += &row("S2", &[], "1000 Genomes", "afr", "\"lwk\"");
        input += &row("S4", &[], "gnomAD", "afr", "\"yri\"");
        input += &row("S5", &[], "HGDP", "eas", "\"han\"");
        let mut output = vec![];
        let written = format_metadata(input.as_bytes(), &mut output, &FormatConfig::default());
        assert_eq!(written.unwrap(), 4);
        let output = String::from_utf8(output).unwrap();
        let expected = "#sample_id\tcohort\tpop\tsubpop\trelatives\n\
                        S2\t1000 Genomes\tafr\tlwk\t\n\
                        S3\tHGDP\tafr\tyri\tS1\n\
                        S1\t1000 Genomes\tafr\t\tS0,S3\n\
                        S5\tHGDP\teas\than\t\n";
        assert_eq!(output, expected);
    }
    #[test]
    fn custom_cohorts() {
        let mut input = HEADER.to_string();
        input += &row("S1", &[], "HGDP", "afr", "null");
        input += &row("S2", &[], "gnomAD", "afr", "null");
        let config = FormatConfig::new(&["gnomAD"]);
        let samples = read_gnomad_metadata(input.as_bytes(), &config).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sample_id, "S2");
    }
    #[test]
    fn empty_table_has_header() {
        let mut output = vec![];
        let written = format_metadata(HEADER.as_bytes(), &mut output, &FormatConfig::default());
        assert_eq!(written.unwrap(), 0);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "#sample_id\tcohort\tpop\tsubpop\trelatives\n"
        );
    }
    #[test]
    fn broken_literal() {
        let input = format!("{HEADER}S1\tNA\t{{'related_samples': [}}\t{{}}\n");
        let err = format_metadata(input.as_bytes(), vec![], &FormatConfig::default()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("sample S1"));
    }
    #[test]
    fn missing_column() {
        let input = "s\thgdp_tgp_meta\nS1\t{}\n";
        assert!(format_metadata(input.as_bytes(), vec![], &FormatConfig::default()).is_err());
    }
    #[test]
    fn header_only_with_wrong_columns() {
        let input = "sample\tfoo\n";
        let err = format_metadata(input.as_bytes(), vec![], &FormatConfig::default()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("s, relatedness_inference, hgdp_tgp_meta"));
        let input = "s\trelatedness_inference\n";
        let err = format_metadata(input.as_bytes(), vec![], &FormatConfig::default()).unwrap_err();
        assert!(err.to_string().contains("hgdp_tgp_meta"));
    }
}
