//! Functionality for preparing genetic association data for Manhattan and
//! colocalization plots.
//!
//! The two core pieces are the [`GenomeIndex`], a static table of cumulative
//! chromosome extents that maps (chromosome, position) pairs onto one linear
//! genome axis, and the association data adapter ([`prepare_records`]),
//! which turns raw, semi-structured association records into plot-ready
//! points: the target record first, chromosomes normalized (X as 23, Y
//! as 24), coordinates and p-values derived per plot mode, and unusable
//! rows filtered out. Rendering itself belongs to an external engine that
//! consumes the [`SourceResponse`](source::SourceResponse) envelope.
//!
//! ```no_run
//! use assocplot::prelude::*;
//!
//! let records = read_associations("associations.tsv")
//!     .expect("could not read associations");
//! let plot = prepare_records(&records, PlotMode::Standard, GenomeIndex::grch38())
//!     .expect("could not adapt associations");
//!
//! for point in &plot {
//!     println!("{}\t{}", point.x, point.pval);
//! }
//! ```
//!
//! A colocalization plot additionally carries a visible window:
//!
//! ```no_run
//! use assocplot::prelude::*;
//!
//! let mut records = read_associations("locus.tsv").expect("could not read associations");
//! sort_by_position(&mut records);
//! let window = plot_window(
//!     PlotKind::Coloc,
//!     PlotMode::GwasPlot,
//!     &records,
//!     GenomeIndex::grch38(),
//! )
//! .expect("could not derive window");
//! ```

pub mod adapter;
pub mod file;
pub mod genome;
pub mod record;
pub mod source;
pub mod window;

pub use adapter::{prepare_records, Adapter, LinearGenomeAdapter, PlotDataError};
pub use genome::{GenomeIndex, GenomeIndexError, Position};
pub use record::{AssociationRecord, ChromName, PlotMode, PlotRecord};

pub mod prelude {
    pub use crate::adapter::{prepare_records, Adapter, LinearGenomeAdapter, PlotDataError};
    pub use crate::file::{read_associations, read_seqlens};
    pub use crate::genome::{GenomeIndex, GenomeIndexError, Position};
    pub use crate::record::{AssociationRecord, ChromName, PlotMode, PlotRecord};
    pub use crate::source::{DataSource, EmptySource, SourceResponse, StaticSource};
    pub use crate::window::{plot_window, sort_by_position, target_pvalue, PlotKind, PlotWindow};
}

#[cfg(test)]
mod tests {}
