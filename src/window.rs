//! Visible plot window (state) computation.
//!
//! Colocalization plots open zoomed to the locus the records cover;
//! Manhattan plots show the whole genome and carry no window state. The
//! window is part of the configuration handed to the renderer; everything
//! visual beyond it (ticks styling, legends, colors) belongs to the
//! renderer's own schema.

use serde::Serialize;

use crate::adapter::PlotDataError;
use crate::genome::GenomeIndex;
use crate::record::{AssociationRecord, ChromName, PlotMode};

/// Genome build tag reported alongside the window state.
pub const GENOME_BUILD: &str = "GRCh38";

/// The overall plot family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Manhattan,
    Coloc,
}

impl std::str::FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "manhattan" => Ok(PlotKind::Manhattan),
            "coloc" => Ok(PlotKind::Coloc),
            other => Err(format!("unknown plot kind '{other}'")),
        }
    }
}

/// The visible chromosome/coordinate window handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotWindow {
    pub chr: u8,
    pub start: f64,
    pub end: f64,
    pub genome_build: &'static str,
}

/// Sort associations by position, ascending. Colocalization plots do this
/// before adapting so the window spans first to last record.
pub fn sort_by_position(records: &mut [AssociationRecord]) {
    records.sort_by_key(|r| r.position);
}

/// P-value of the first target-category record, if any. Drives the
/// renderer's point-label threshold.
pub fn target_pvalue(records: &[AssociationRecord]) -> Option<f64> {
    records.iter().find(|r| r.is_target()).map(|r| r.pvalue)
}

/// Compute the window state for a plot.
///
/// Manhattan plots return `None`: the renderer shows the full axis. For
/// colocalization plots the window is derived from the first record (and
/// the last, when positions are genomic); records are expected to be
/// position-sorted already.
pub fn plot_window(
    kind: PlotKind,
    mode: PlotMode,
    records: &[AssociationRecord],
    index: &GenomeIndex,
) -> Result<Option<PlotWindow>, PlotDataError> {
    if kind == PlotKind::Manhattan {
        return Ok(None);
    }

    let first = records.first().ok_or(PlotDataError::EmptyInput)?;
    let chr = first
        .chrom
        .as_ref()
        .and_then(ChromName::normalize)
        .ok_or_else(|| {
            PlotDataError::InvalidInput(
                "first association has no usable chromosome".to_string(),
            )
        })?;

    let window = match mode {
        PlotMode::PvaluePlot => {
            if first.position == 0 {
                return Err(PlotDataError::InvalidInput(
                    "non-positive value fed to -log10 in window state".to_string(),
                ));
            }
            PlotWindow {
                chr,
                start: 0.0,
                end: -(first.position as f64).log10() + 1.0,
                genome_build: GENOME_BUILD,
            }
        }
        _ => {
            // records are sorted, so last() is the locus end
            let last = records.last().ok_or(PlotDataError::EmptyInput)?;
            PlotWindow {
                chr,
                start: index.linear_position(chr, first.position)? as f64,
                end: index.linear_position(chr, last.position)? as f64,
                genome_build: GENOME_BUILD,
            }
        }
    };
    Ok(Some(window))
}
