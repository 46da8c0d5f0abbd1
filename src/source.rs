//! Data sources for the rendering boundary.
//!
//! The external renderer pulls its points through a data-source hook that
//! returns a `{header, body}` envelope. [`StaticSource`] serves preloaded
//! associations through an [`Adapter`]; [`EmptySource`] is the deliberate
//! no-op registered before any data is selected, so the plot initializes
//! blank without a network round trip.

use serde::Serialize;
use serde_json::Value;

use crate::adapter::{Adapter, PlotDataError};
use crate::record::{AssociationRecord, PlotMode, PlotRecord};

/// The envelope handed to the renderer's data hook. `body` serializes to
/// the flat JSON objects the layout configuration references by field name.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub header: Value,
    pub body: Vec<PlotRecord>,
}

/// Anything that can answer the renderer's synchronous data request.
pub trait DataSource {
    fn fetch(&self) -> Result<SourceResponse, PlotDataError>;
}

/// A source over an in-memory record list. No remote fetch happens; the
/// records are adapted on every request and discarded after rendering.
pub struct StaticSource<A> {
    records: Vec<AssociationRecord>,
    mode: PlotMode,
    adapter: A,
    header: Value,
}

impl<A: Adapter> StaticSource<A> {
    pub fn new(records: Vec<AssociationRecord>, mode: PlotMode, adapter: A) -> Self {
        StaticSource {
            records,
            mode,
            adapter,
            header: Value::Null,
        }
    }

    /// Attach a passthrough header to the response envelope.
    pub fn with_header(mut self, header: Value) -> Self {
        self.header = header;
        self
    }
}

impl<A: Adapter> DataSource for StaticSource<A> {
    fn fetch(&self) -> Result<SourceResponse, PlotDataError> {
        if self.records.is_empty() {
            log::warn!("plot data source has no associations");
        }
        let body = self.adapter.adapt(&self.records, self.mode)?;
        Ok(SourceResponse {
            header: self.header.clone(),
            body,
        })
    }
}

/// A source that always returns an empty body.
pub struct EmptySource;

impl DataSource for EmptySource {
    fn fetch(&self) -> Result<SourceResponse, PlotDataError> {
        Ok(SourceResponse {
            header: Value::Null,
            body: Vec::new(),
        })
    }
}
