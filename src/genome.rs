//! The linear genome coordinate index.
//!
//! A [`GenomeIndex`] concatenates per-chromosome lengths into cumulative
//! extents, so any (chromosome, position) pair maps to a single coordinate
//! on one shared x axis. The table is built once and never mutated.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// The integer type for genomic positions.
pub type Position = u64;

/// Chromosome number used for X.
pub const X_CHROM: u8 = 23;

/// Chromosome number used for Y.
pub const Y_CHROM: u8 = 24;

/// GRCh38 assembly chromosome lengths, chromosomes 1-22 plus X (23) and Y (24).
pub const GRCH38_LENGTHS: [(u8, Position); 24] = [
    (1, 248_956_422),
    (2, 242_193_529),
    (3, 198_295_559),
    (4, 190_214_555),
    (5, 181_538_259),
    (6, 170_805_979),
    (7, 159_345_973),
    (8, 145_138_636),
    (9, 138_394_717),
    (10, 133_797_422),
    (11, 135_086_622),
    (12, 133_275_309),
    (13, 114_364_328),
    (14, 107_043_718),
    (15, 101_991_189),
    (16, 90_338_345),
    (17, 83_257_441),
    (18, 80_373_285),
    (19, 58_617_616),
    (20, 64_444_167),
    (21, 46_709_983),
    (22, 50_818_468),
    (X_CHROM, 156_040_895),
    (Y_CHROM, 57_227_415),
];

#[derive(Error, Debug)]
pub enum GenomeIndexError {
    #[error("chromosome {0} is not in the genome index")]
    NoChromosome(u8),
    #[error("chromosome length table is empty")]
    EmptyTable,
    #[error("chromosome length table not contiguous: expected chromosome {expected}, found {found}")]
    NotContiguous { expected: u8, found: u8 },
    #[error("unrecognized chromosome name '{0}'")]
    UnknownName(String),
}

/// The cumulative extent of a single chromosome on the linear genome axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromosomeExtent {
    /// Chromosome number, 1-22, with X as 23 and Y as 24.
    pub chr: u8,
    /// Length of the chromosome in base pairs.
    pub base_pairs: Position,
    /// Linear coordinate of the chromosome's first base.
    pub genome_start: Position,
    /// Linear coordinate one past the chromosome's last base.
    pub genome_end: Position,
    /// Linear coordinate of the chromosome midpoint, used for axis tick placement.
    pub tickpoint: Position,
}

/// An immutable table of [`ChromosomeExtent`] entries covering a whole genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeIndex {
    extents: Vec<ChromosomeExtent>,
}

static GRCH38: OnceLock<GenomeIndex> = OnceLock::new();

impl GenomeIndex {
    /// Build an index from an ordered list of (chromosome number, length) pairs.
    ///
    /// Chromosome numbers must run 1, 2, ... without gaps; the table is the
    /// reference contract everything downstream maps through, so a misnumbered
    /// table is rejected at construction.
    pub fn new(lengths: &[(u8, Position)]) -> Result<GenomeIndex, GenomeIndexError> {
        if lengths.is_empty() {
            return Err(GenomeIndexError::EmptyTable);
        }

        let mut extents = Vec::with_capacity(lengths.len());
        let mut genome_end: Position = 0;
        for (i, &(chr, base_pairs)) in lengths.iter().enumerate() {
            let expected = i as u8 + 1;
            if chr != expected {
                return Err(GenomeIndexError::NotContiguous {
                    expected,
                    found: chr,
                });
            }
            let genome_start = genome_end;
            genome_end += base_pairs;
            extents.push(ChromosomeExtent {
                chr,
                base_pairs,
                genome_start,
                genome_end,
                tickpoint: genome_start + base_pairs / 2,
            });
        }

        Ok(GenomeIndex { extents })
    }

    /// The shared GRCh38 index, built on first use from [`GRCH38_LENGTHS`].
    pub fn grch38() -> &'static GenomeIndex {
        GRCH38.get_or_init(|| {
            GenomeIndex::new(&GRCH38_LENGTHS).expect("GRCh38 length table is well-formed")
        })
    }

    /// Build an index from a name-to-length table, e.g. one read with
    /// [`read_seqlens`](crate::file::read_seqlens).
    ///
    /// Names are normalized through [`normalize_chrom_label`]; entries are
    /// sorted by chromosome number before the cumulative pass, so the input
    /// order does not matter.
    pub fn from_seqlens(
        seqlens: &IndexMap<String, Position>,
    ) -> Result<GenomeIndex, GenomeIndexError> {
        let mut lengths: Vec<(u8, Position)> = seqlens
            .iter()
            .map(|(name, &len)| {
                normalize_chrom_label(name)
                    .map(|chr| (chr, len))
                    .ok_or_else(|| GenomeIndexError::UnknownName(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        lengths.sort_by_key(|&(chr, _)| chr);
        GenomeIndex::new(&lengths)
    }

    /// Return the number of chromosomes in the index.
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Return if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Look up the extent for a chromosome number.
    pub fn extent(&self, chr: u8) -> Result<&ChromosomeExtent, GenomeIndexError> {
        if chr == 0 {
            return Err(GenomeIndexError::NoChromosome(chr));
        }
        self.extents
            .get(chr as usize - 1)
            .ok_or(GenomeIndexError::NoChromosome(chr))
    }

    /// Map a (chromosome, position) pair to the linear genome axis.
    ///
    /// The position is not checked against the chromosome length; positions
    /// past the end land in the next chromosome's band, matching the
    /// permissive behavior plots tolerate.
    pub fn linear_position(
        &self,
        chr: u8,
        position: Position,
    ) -> Result<Position, GenomeIndexError> {
        Ok(self.extent(chr)?.genome_start + position)
    }

    /// Total length of the genome, i.e. the end of the last chromosome.
    pub fn total_length(&self) -> Position {
        self.extents.last().map_or(0, |e| e.genome_end)
    }

    /// Iterate over the chromosome extents in order.
    pub fn iter(&self) -> impl Iterator<Item = &ChromosomeExtent> {
        self.extents.iter()
    }

    /// Axis tick positions: each chromosome's midpoint on the linear axis,
    /// paired with its display label.
    pub fn tickpoints(&self) -> impl Iterator<Item = (Position, String)> + '_ {
        self.extents
            .iter()
            .map(|e| (e.tickpoint, chrom_label(e.chr)))
    }
}

/// Display label for a chromosome number (23 -> "X", 24 -> "Y").
pub fn chrom_label(chr: u8) -> String {
    match chr {
        X_CHROM => "X".to_string(),
        Y_CHROM => "Y".to_string(),
        n => n.to_string(),
    }
}

/// Normalize a chromosome name to its number.
///
/// Accepts plain numbers, "X"/"Y" (case-insensitive), and an optional "chr"
/// prefix as used in genome files. Returns `None` for anything else.
pub fn normalize_chrom_label(name: &str) -> Option<u8> {
    let name = name.trim();
    let name = name
        .strip_prefix("chr")
        .or_else(|| name.strip_prefix("CHR"))
        .unwrap_or(name);
    match name {
        "X" | "x" => Some(X_CHROM),
        "Y" | "y" => Some(Y_CHROM),
        other => other.parse::<u8>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_are_contiguous() {
        let index = GenomeIndex::grch38();
        assert_eq!(index.len(), 24);
        let extents: Vec<_> = index.iter().collect();
        assert_eq!(extents[0].genome_start, 0);
        for pair in extents.windows(2) {
            assert_eq!(pair[1].genome_start, pair[0].genome_end);
        }
        for e in &extents {
            assert_eq!(e.genome_end, e.genome_start + e.base_pairs);
            assert_eq!(e.tickpoint, e.genome_start + e.base_pairs / 2);
        }
    }

    #[test]
    fn total_length_is_sum_of_lengths() {
        let index = GenomeIndex::grch38();
        let sum: Position = GRCH38_LENGTHS.iter().map(|&(_, len)| len).sum();
        assert_eq!(index.total_length(), sum);
    }

    #[test]
    fn linear_position_at_zero_is_genome_start() {
        let index = GenomeIndex::grch38();
        for chr in 1..=24u8 {
            assert_eq!(
                index.linear_position(chr, 0).unwrap(),
                index.extent(chr).unwrap().genome_start
            );
        }
    }

    #[test]
    fn linear_position_offsets_within_chromosome() {
        let index = GenomeIndex::grch38();
        let chr2_start = index.extent(2).unwrap().genome_start;
        assert_eq!(index.linear_position(2, 1000).unwrap(), chr2_start + 1000);
        // chromosome 1 starts the axis
        assert_eq!(index.linear_position(1, 12345).unwrap(), 12345);
    }

    #[test]
    fn out_of_range_chromosome_is_an_error() {
        let index = GenomeIndex::grch38();
        assert!(matches!(
            index.linear_position(25, 0),
            Err(GenomeIndexError::NoChromosome(25))
        ));
        assert!(matches!(
            index.linear_position(0, 0),
            Err(GenomeIndexError::NoChromosome(0))
        ));
    }

    #[test]
    fn misnumbered_table_rejected() {
        let err = GenomeIndex::new(&[(1, 100), (3, 200)]).unwrap_err();
        assert!(matches!(
            err,
            GenomeIndexError::NotContiguous {
                expected: 2,
                found: 3
            }
        ));
        assert!(matches!(
            GenomeIndex::new(&[]),
            Err(GenomeIndexError::EmptyTable)
        ));
    }

    #[test]
    fn from_seqlens_sorts_and_normalizes() {
        let seqlens = indexmap::indexmap! {
            "chr2".to_string() => 200u64,
            "chr1".to_string() => 100,
            "chrX".to_string() => 50,
        };
        // X is 23, so chromosomes 3..=22 are missing
        assert!(GenomeIndex::from_seqlens(&seqlens).is_err());

        let seqlens = indexmap::indexmap! {
            "chr2".to_string() => 200u64,
            "chr1".to_string() => 100,
        };
        let index = GenomeIndex::from_seqlens(&seqlens).unwrap();
        assert_eq!(index.extent(2).unwrap().genome_start, 100);
        assert_eq!(index.total_length(), 300);
    }

    #[test]
    fn chrom_labels() {
        assert_eq!(normalize_chrom_label("X"), Some(23));
        assert_eq!(normalize_chrom_label("y"), Some(24));
        assert_eq!(normalize_chrom_label("chr7"), Some(7));
        assert_eq!(normalize_chrom_label("12"), Some(12));
        assert_eq!(normalize_chrom_label("MT"), None);
        assert_eq!(chrom_label(23), "X");
        assert_eq!(chrom_label(5), "5");
    }

    #[test]
    fn tickpoints_label_sex_chromosomes() {
        let index = GenomeIndex::grch38();
        let ticks: Vec<_> = index.tickpoints().collect();
        assert_eq!(ticks.len(), 24);
        assert_eq!(ticks[22].1, "X");
        assert_eq!(ticks[23].1, "Y");
        assert_eq!(ticks[0].0, index.extent(1).unwrap().tickpoint);
    }
}
