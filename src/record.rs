//! Association record types and plot modes.
//!
//! [`AssociationRecord`] is the semi-structured input shape: upstream data
//! fetchers emit records where `chrom` may be a number or a name ("X"/"Y"),
//! and where fields may simply be missing. [`PlotRecord`] is the derived,
//! plot-ready shape the renderer's layout references by field name.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::genome::{normalize_chrom_label, Position};

/// Category tag marking the highlighted record of a plot.
pub const TARGET_CATEGORY: &str = "target";

/// A chromosome as it appears in loosely-typed upstream data: either a
/// number or a name like "X", "Y" or "7".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChromName {
    Number(u8),
    Name(String),
}

impl ChromName {
    /// Resolve to a chromosome number (X -> 23, Y -> 24). `None` means the
    /// value cannot be placed on the genome axis.
    pub fn normalize(&self) -> Option<u8> {
        match self {
            ChromName::Number(n) => Some(*n),
            ChromName::Name(s) => normalize_chrom_label(s),
        }
    }
}

impl From<&str> for ChromName {
    fn from(s: &str) -> Self {
        match s.parse::<u8>() {
            Ok(n) => ChromName::Number(n),
            Err(_) => ChromName::Name(s.to_string()),
        }
    }
}

/// One raw association row as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssociationRecord {
    /// Variant identifier (rsid).
    #[serde(default)]
    pub snp: Option<String>,
    /// Chromosome, if known. Records without one cannot be plotted.
    #[serde(default)]
    pub chrom: Option<ChromName>,
    /// Position on the chromosome in base pairs. In p-value/p-value
    /// colocalization plots this field carries a p-value-like quantity
    /// instead; see [`PlotMode::PvaluePlot`].
    pub position: Position,
    /// Association p-value.
    pub pvalue: f64,
    /// Color/priority category tag, e.g. "target" or an r2 bin.
    #[serde(default)]
    pub category: Option<String>,
}

impl AssociationRecord {
    /// Whether this is the highlighted target record.
    pub fn is_target(&self) -> bool {
        self.category.as_deref() == Some(TARGET_CATEGORY)
    }
}

/// The plot sub-mode, controlling how coordinates and p-values are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMode {
    /// P-value vs. p-value colocalization scatter. The `position` field is
    /// repurposed upstream to carry the paired trait's p-value, so the x
    /// coordinate is `-log10(position)` rather than a genome position.
    /// Confusing but intentional; kept as the producing system defines it.
    PvaluePlot,
    /// GWAS panel of a colocalization plot. Adapts like [`PlotMode::Standard`].
    GwasPlot,
    /// Gene-level ranking plot; the y value is the raw score in `pvalue`,
    /// not log-transformed.
    GeneType,
    /// Plain Manhattan-style plot.
    Standard,
}

impl FromStr for PlotMode {
    type Err = Infallible;

    /// Unknown mode strings fall back to [`PlotMode::Standard`].
    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(match s {
            "pvalue_plot" => PlotMode::PvaluePlot,
            "gwas_plot" => PlotMode::GwasPlot,
            "gene_type" => PlotMode::GeneType,
            _ => PlotMode::Standard,
        })
    }
}

/// A plot-ready record: the raw fields plus the derived plotting fields.
///
/// Raw fields pass through untouched, so re-adapting a record derives the
/// same values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRecord {
    pub snp: Option<String>,
    pub chrom: ChromName,
    pub position: Position,
    pub pvalue: f64,
    pub category: Option<String>,
    /// Normalized chromosome number (X -> 23, Y -> 24).
    pub chr: u8,
    /// Base-pair coordinate, or `-log10(position)` in p-value plots.
    pub bp: f64,
    /// Y value: `-log10(pvalue)`, or the raw value in gene-type plots.
    pub pval: f64,
    /// X value on the plot axis.
    pub x: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrom_name_normalizes() {
        assert_eq!(ChromName::Number(7).normalize(), Some(7));
        assert_eq!(ChromName::Name("X".to_string()).normalize(), Some(23));
        assert_eq!(ChromName::Name("Y".to_string()).normalize(), Some(24));
        assert_eq!(ChromName::Name("11".to_string()).normalize(), Some(11));
        assert_eq!(ChromName::Name("banana".to_string()).normalize(), None);
    }

    #[test]
    fn chrom_name_from_str_prefers_numbers() {
        assert_eq!(ChromName::from("7"), ChromName::Number(7));
        assert_eq!(ChromName::from("X"), ChromName::Name("X".to_string()));
    }

    #[test]
    fn records_deserialize_from_mixed_json() {
        let json = r#"[
            {"snp": "rs123", "chrom": 1, "position": 100, "pvalue": 0.01, "category": "other"},
            {"snp": "rs456", "chrom": "X", "position": 50, "pvalue": 0.5, "category": "target"},
            {"snp": "rs789", "position": 10, "pvalue": 0.9}
        ]"#;
        let records: Vec<AssociationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].chrom, Some(ChromName::Number(1)));
        assert_eq!(records[1].chrom, Some(ChromName::Name("X".to_string())));
        assert!(records[1].is_target());
        assert_eq!(records[2].chrom, None);
        assert_eq!(records[2].snp.as_deref(), Some("rs789"));
    }

    #[test]
    fn plot_mode_parses_with_fallback() {
        assert_eq!("pvalue_plot".parse::<PlotMode>(), Ok(PlotMode::PvaluePlot));
        assert_eq!("gwas_plot".parse::<PlotMode>(), Ok(PlotMode::GwasPlot));
        assert_eq!("gene_type".parse::<PlotMode>(), Ok(PlotMode::GeneType));
        assert_eq!("whatever".parse::<PlotMode>(), Ok(PlotMode::Standard));
    }
}
