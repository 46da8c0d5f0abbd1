//! The association data adapter.
//!
//! Turns raw [`AssociationRecord`]s into [`PlotRecord`]s for scatter
//! rendering: the target record is moved to the front so it draws with
//! priority, chromosomes are normalized, mode-dependent coordinates are
//! derived, and unusable rows are filtered out.

use thiserror::Error;

use crate::file::FileError;
use crate::genome::{GenomeIndex, GenomeIndexError};
use crate::record::{AssociationRecord, ChromName, PlotMode, PlotRecord};

#[derive(Error, Debug)]
pub enum PlotDataError {
    #[error("genome index error: {0}")]
    Genome(#[from] GenomeIndexError),
    #[error("file reading error: {0}")]
    File(#[from] FileError),
    #[error("TSV parsing error: {0}")]
    Tsv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("no associations to plot")]
    EmptyInput,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The record-shaping strategy handed to a plot data source.
///
/// This is the seam where the original system let callers override response
/// parsing; here it is a plain trait so any `(records, mode) -> Vec<PlotRecord>`
/// can be injected. Closures with that shape implement it automatically.
pub trait Adapter {
    fn adapt(
        &self,
        records: &[AssociationRecord],
        mode: PlotMode,
    ) -> Result<Vec<PlotRecord>, PlotDataError>;
}

impl<F> Adapter for F
where
    F: Fn(&[AssociationRecord], PlotMode) -> Result<Vec<PlotRecord>, PlotDataError>,
{
    fn adapt(
        &self,
        records: &[AssociationRecord],
        mode: PlotMode,
    ) -> Result<Vec<PlotRecord>, PlotDataError> {
        self(records, mode)
    }
}

/// The default adapter: maps records onto the linear genome axis of a
/// [`GenomeIndex`].
#[derive(Debug, Clone, Copy)]
pub struct LinearGenomeAdapter<'a> {
    index: &'a GenomeIndex,
}

impl<'a> LinearGenomeAdapter<'a> {
    pub fn new(index: &'a GenomeIndex) -> Self {
        LinearGenomeAdapter { index }
    }

    /// Adapter over the shared GRCh38 index.
    pub fn grch38() -> LinearGenomeAdapter<'static> {
        LinearGenomeAdapter {
            index: GenomeIndex::grch38(),
        }
    }
}

impl Adapter for LinearGenomeAdapter<'_> {
    fn adapt(
        &self,
        records: &[AssociationRecord],
        mode: PlotMode,
    ) -> Result<Vec<PlotRecord>, PlotDataError> {
        prepare_records(records, mode, self.index)
    }
}

/// Transform raw association records into plot-ready records.
///
/// The first record tagged `category == "target"` is moved to the front;
/// the rest keep their relative order. Records without a usable chromosome
/// are dropped. Records whose p-value (or, in p-value plots, whose
/// `position` stand-in) cannot go through `-log10` are skipped with a
/// warning rather than failing the whole plot. An out-of-range chromosome
/// number is a hard error: the reference table does not match the data.
///
/// Empty input yields empty output.
pub fn prepare_records(
    records: &[AssociationRecord],
    mode: PlotMode,
    index: &GenomeIndex,
) -> Result<Vec<PlotRecord>, PlotDataError> {
    let mut ordered: Vec<&AssociationRecord> = Vec::with_capacity(records.len());
    let mut target: Option<&AssociationRecord> = None;
    for rec in records {
        if target.is_none() && rec.is_target() {
            target = Some(rec);
        } else {
            ordered.push(rec);
        }
    }
    if let Some(target) = target {
        ordered.insert(0, target);
    }

    let mut out = Vec::with_capacity(ordered.len());
    for rec in ordered {
        let Some(chrom) = rec.chrom.as_ref() else {
            log::debug!(
                "dropping association without chromosome information: {:?}",
                rec.snp
            );
            continue;
        };
        let Some(chr) = ChromName::normalize(chrom) else {
            log::debug!(
                "dropping association with unrecognized chromosome {:?}: {:?}",
                chrom,
                rec.snp
            );
            continue;
        };

        let bp = match mode {
            PlotMode::PvaluePlot => {
                if rec.position == 0 {
                    log::warn!(
                        "skipping association {:?}: non-positive value fed to -log10",
                        rec.snp
                    );
                    continue;
                }
                -(rec.position as f64).log10()
            }
            _ => rec.position as f64,
        };

        let pval = match mode {
            PlotMode::GeneType => rec.pvalue,
            _ => {
                if !(rec.pvalue > 0.0) {
                    log::warn!(
                        "skipping association {:?}: p-value {} cannot be log-transformed",
                        rec.snp,
                        rec.pvalue
                    );
                    continue;
                }
                -rec.pvalue.log10()
            }
        };

        let x = match mode {
            PlotMode::PvaluePlot => bp,
            _ => index.linear_position(chr, rec.position)? as f64,
        };

        out.push(PlotRecord {
            snp: rec.snp.clone(),
            chrom: chrom.clone(),
            position: rec.position,
            pvalue: rec.pvalue,
            category: rec.category.clone(),
            chr,
            bp,
            pval,
            x,
        });
    }

    Ok(out)
}
