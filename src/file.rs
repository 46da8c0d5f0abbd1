//! Plaintext and gzip-compressed file input and output.
//!
//! [`InputFile`] and [`OutputFile`] wrap possibly gzip-compressed files
//! behind a common reader/writer interface. On top of them sit the
//! genome-file and association-file readers and the plot-record writers.

use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};
use std::io::{BufReader, Read};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapter::PlotDataError;
use crate::genome::Position;
use crate::record::{AssociationRecord, ChromName, PlotRecord};
use crate::source::SourceResponse;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
}

/// Check if a file is gzipped by looking for the magic numbers
fn is_gzipped_file(file_path: &str) -> io::Result<bool> {
    let mut file = File::open(file_path)?;
    let mut buffer = [0; 2];
    file.read_exact(&mut buffer)?;

    Ok(buffer == [0x1f, 0x8b])
}

/// An input file, plaintext or gzip-compressed.
///
/// Compression is detected from the file contents, not the extension, so
/// misnamed `.gz` files still read correctly.
pub struct InputFile {
    pub filepath: String,
}

impl InputFile {
    pub fn new(filepath: &str) -> Self {
        Self {
            filepath: filepath.to_string(),
        }
    }

    /// Opens the file and returns a buffered reader, decompressing
    /// transparently if the file is gzipped.
    pub fn reader(&self) -> Result<BufReader<Box<dyn Read>>, FileError> {
        let file = File::open(self.filepath.clone())?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

/// An output file; a `.gz` extension selects gzip-compressed output.
pub struct OutputFile {
    pub filepath: String,
}

impl OutputFile {
    pub fn new(filepath: &str) -> Self {
        Self {
            filepath: filepath.to_string(),
        }
    }

    /// Opens the file and returns a writer, compressing if the path ends
    /// with `.gz`.
    pub fn writer(&self) -> Result<Box<dyn Write>, io::Error> {
        let outfile = &self.filepath;
        let is_gzip = outfile.ends_with(".gz");
        let writer: Box<dyn Write> = if is_gzip {
            Box::new(BufWriter::new(GzEncoder::new(
                File::create(outfile)?,
                Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(File::create(outfile)?))
        };
        Ok(writer)
    }
}

/// Read a tab-delimited *genome file* of sequence (i.e. chromosome) names and their lengths.
pub fn read_seqlens(filepath: &str) -> Result<IndexMap<String, Position>, PlotDataError> {
    let input_file = InputFile::new(filepath);
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(input_file.reader()?);

    let mut seqlens = IndexMap::new();

    #[derive(Debug, Serialize, Deserialize, Default)]
    struct SeqLenEntry {
        chrom: String,
        length: Position,
    }

    for result in rdr.deserialize() {
        let record: SeqLenEntry = result?;
        seqlens.insert(record.chrom, record.length);
    }

    Ok(seqlens)
}

// TSV row shape for associations. `chrom` stays a plain string here since
// TSV carries no types; it is resolved to a ChromName afterwards.
#[derive(Debug, Deserialize)]
struct AssociationRow {
    #[serde(default)]
    snp: Option<String>,
    #[serde(default)]
    chrom: Option<String>,
    position: Position,
    pvalue: f64,
    #[serde(default)]
    category: Option<String>,
}

impl From<AssociationRow> for AssociationRecord {
    fn from(row: AssociationRow) -> Self {
        AssociationRecord {
            snp: row.snp,
            chrom: row
                .chrom
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(ChromName::from),
            position: row.position,
            pvalue: row.pvalue,
            category: row.category,
        }
    }
}

/// Read association records from a file.
///
/// A `.json` (or `.json.gz`) file is parsed as a JSON array of records;
/// anything else is read as headered TSV with `snp`, `chrom`, `position`,
/// `pvalue` and `category` columns.
pub fn read_associations(filepath: &str) -> Result<Vec<AssociationRecord>, PlotDataError> {
    let input_file = InputFile::new(filepath);
    let reader = input_file.reader()?;

    if filepath.ends_with(".json") || filepath.ends_with(".json.gz") {
        let records: Vec<AssociationRecord> = serde_json::from_reader(reader)?;
        return Ok(records);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: AssociationRow = result?;
        records.push(AssociationRecord::from(row));
    }
    Ok(records)
}

/// Write adapted plot records as headered TSV.
pub fn write_records_tsv(
    writer: Box<dyn Write>,
    records: &[PlotRecord],
) -> Result<(), PlotDataError> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the renderer envelope as JSON.
pub fn write_response_json(
    mut writer: Box<dyn Write>,
    response: &SourceResponse,
) -> Result<(), PlotDataError> {
    serde_json::to_writer(&mut writer, response)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{prepare_records, LinearGenomeAdapter};
    use crate::genome::GenomeIndex;
    use crate::record::PlotMode;
    use crate::source::{DataSource, StaticSource};

    #[test]
    fn read_tsv_associations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assoc.tsv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "snp\tchrom\tposition\tpvalue\tcategory").unwrap();
        writeln!(f, "rs1\t1\t100\t0.01\tother").unwrap();
        writeln!(f, "rs2\tX\t50\t0.5\ttarget").unwrap();
        writeln!(f, "rs3\t\t10\t0.9\t").unwrap();
        drop(f);

        let records = read_associations(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].chrom, Some(ChromName::Number(1)));
        assert_eq!(records[1].chrom, Some(ChromName::Name("X".to_string())));
        assert!(records[1].is_target());
        assert_eq!(records[2].chrom, None);
        assert_eq!(records[2].category, None);
    }

    #[test]
    fn read_json_associations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assoc.json");
        let mut f = File::create(&path).unwrap();
        write!(
            f,
            r#"[{{"snp":"rs1","chrom":7,"position":42,"pvalue":0.001}}]"#
        )
        .unwrap();
        drop(f);

        let records = read_associations(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chrom, Some(ChromName::Number(7)));
        assert_eq!(records[0].position, 42);
    }

    #[test]
    fn read_seqlens_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seqlens.tsv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "chr1\t1000").unwrap();
        writeln!(f, "chr2\t2000").unwrap();
        drop(f);

        let seqlens = read_seqlens(path.to_str().unwrap()).unwrap();
        assert_eq!(seqlens.get("chr1"), Some(&1000));
        let index = GenomeIndex::from_seqlens(&seqlens).unwrap();
        assert_eq!(index.total_length(), 3000);
    }

    #[test]
    fn write_tsv_roundtrip_through_output_file() {
        let index = GenomeIndex::grch38();
        let records = vec![AssociationRecord {
            snp: Some("rs1".to_string()),
            chrom: Some(ChromName::Number(1)),
            position: 100,
            pvalue: 0.01,
            category: Some("other".to_string()),
        }];
        let plot = prepare_records(&records, PlotMode::Standard, index).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.tsv");
        let output = OutputFile::new(path.to_str().unwrap());
        write_records_tsv(output.writer().unwrap(), &plot).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert_eq!(header, "snp\tchrom\tposition\tpvalue\tcategory\tchr\tbp\tpval\tx");
        assert!(lines.next().unwrap().starts_with("rs1\t1\t100\t"));
    }

    #[test]
    fn write_json_envelope() {
        let records = vec![AssociationRecord {
            snp: Some("rs1".to_string()),
            chrom: Some(ChromName::Number(2)),
            position: 5,
            pvalue: 0.05,
            category: None,
        }];
        let source = StaticSource::new(records, PlotMode::Standard, LinearGenomeAdapter::grch38());
        let response = source.fetch().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resp.json");
        let output = OutputFile::new(path.to_str().unwrap());
        write_response_json(output.writer().unwrap(), &response).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed["header"].is_null());
        assert_eq!(parsed["body"][0]["snp"], "rs1");
    }

    #[test]
    fn gzipped_input_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assoc.tsv.gz");
        let file = File::create(&path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        writeln!(enc, "snp\tchrom\tposition\tpvalue\tcategory").unwrap();
        writeln!(enc, "rs1\t3\t77\t0.2\t").unwrap();
        enc.finish().unwrap();

        let records = read_associations(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chrom, Some(ChromName::Number(3)));
    }
}
