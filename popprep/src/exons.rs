//! Extract the exons of a GTF as a sorted, merged BED.
use definitions::Interval;
use log::*;
use std::collections::HashMap;
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct ExonConfig {
    /// The third column of the GTF to keep.
    feature: String,
}

impl ExonConfig {
    pub fn new(feature: &str) -> Self {
        Self {
            feature: feature.to_string(),
        }
    }
}

impl std::default::Default for ExonConfig {
    fn default() -> Self {
        Self::new("exon")
    }
}

fn invalid(lineno: usize, reason: &str) -> std::io::Error {
    let message = format!("line {lineno}: {reason}");
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}

/// Read the records of `feature` from a GTF, as BED intervals.
pub fn read_features<R: BufRead>(reader: R, feature: &str) -> std::io::Result<Vec<Interval>> {
    let mut intervals = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.trim().is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }
        let fields: Vec<_> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(invalid(lineno, "fewer than 5 fields"));
        }
        let start: u64 = fields[3]
            .parse()
            .map_err(|_| invalid(lineno, "start is not an integer"))?;
        let end: u64 = fields[4]
            .parse()
            .map_err(|_| invalid(lineno, "end is not an integer"))?;
        if start == 0 || end < start {
            return Err(invalid(lineno, "invalid coordinates"));
        }
        if fields[2] == feature {
            // GTF is 1-based and closed.
            intervals.push(Interval::new(fields[0], start - 1, end));
        }
    }
    debug!("EXON\t{}\t{}", feature, intervals.len());
    Ok(intervals)
}

/// Chromosome order of a genome file (`chrom<TAB>length`, one per line).
pub fn read_genome<R: BufRead>(reader: R) -> std::io::Result<HashMap<String, usize>> {
    let mut order = HashMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let chrom = line.split('\t').next().map(|x| x.trim()).unwrap_or("");
        if chrom.is_empty() {
            return Err(invalid(idx + 1, "empty chromosome name"));
        }
        let rank = order.len();
        order.entry(chrom.to_string()).or_insert(rank);
    }
    Ok(order)
}

/// Sort by chromosome, then start and end. Chromosomes are ordered lexicographically
/// unless a genome order is given, in which case every chromosome must appear in it.
pub fn sort_intervals(
    intervals: &mut [Interval],
    genome: Option<&HashMap<String, usize>>,
) -> std::io::Result<()> {
    match genome {
        None => intervals.sort_by(|a, b| {
            (&a.chrom, a.start, a.end).cmp(&(&b.chrom, b.start, b.end))
        }),
        Some(order) => {
            if let Some(iv) = intervals.iter().find(|iv| !order.contains_key(&iv.chrom)) {
                let message = format!("{} is not in the genome file", iv.chrom);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, message));
            }
            intervals.sort_by_key(|iv| (order[&iv.chrom], iv.start, iv.end));
        }
    }
    Ok(())
}

/// Merge overlapping or book-ended intervals. The input should be sorted.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = vec![];
    for iv in intervals.iter() {
        match merged.last_mut() {
            Some(last) if last.chrom == iv.chrom && iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv.clone()),
        }
    }
    merged
}

pub fn write_bed<W: Write>(mut writer: W, intervals: &[Interval]) -> std::io::Result<()> {
    for iv in intervals.iter() {
        writeln!(writer, "{iv}")?;
    }
    writer.flush()
}

/// GTF in, BED out. Returns the number of merged intervals written.
pub fn extract_exons<R: BufRead, W: Write>(
    gtf: R,
    genome: Option<&HashMap<String, usize>>,
    writer: W,
    config: &ExonConfig,
) -> std::io::Result<usize> {
    let mut intervals = read_features(gtf, &config.feature)?;
    sort_intervals(&mut intervals, genome)?;
    let merged = merge_intervals(&intervals);
    info!(
        "Merged {} {} records into {} intervals",
        intervals.len(),
        config.feature,
        merged.len()
    );
    write_bed(writer, &merged)?;
    Ok(merged.len())
}
