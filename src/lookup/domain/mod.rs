//! Domain model for lookup fan-out.
//!
//! Per-service results, the merged report and the downstream call values
//! exchanged with the client port.

mod downstream;
mod report;
mod result;

pub use downstream::{DownstreamError, DownstreamReply, LookupTarget};
pub use report::AggregateReport;
pub use result::LookupResult;
