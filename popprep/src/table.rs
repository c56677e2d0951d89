//! Tab-separated readers and writers shared by the tools.
use std::io::{Read, Write};

/// A header-aware TSV reader. Quoting is disabled: the gnomAD tables embed double quotes in their
/// literal-valued columns and never quote whole fields.
pub fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .from_reader(reader)
}

/// A TSV writer. The header is written by the caller, so that an empty table still has one.
/// Fields are never quoted, matching [tsv_reader].
pub fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer)
}

/// Fail unless every column in `columns` appears in the header of `rdr`.
pub fn require_columns<R: Read>(rdr: &mut csv::Reader<R>, columns: &[&str]) -> std::io::Result<()> {
    let header = rdr.headers()?;
    let missing: Vec<_> = columns
        .iter()
        .filter(|&&col| header.iter().all(|h| h != col))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        let message = format!("missing column(s): {}", missing.join(", "));
        Err(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
    }
}
