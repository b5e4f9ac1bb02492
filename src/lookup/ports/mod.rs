//! Port contracts for lookup fan-out.

mod directory;
mod downstream;

pub use directory::{DirectoryError, ServiceDirectory};
pub use downstream::DownstreamClient;

#[cfg(test)]
pub(crate) use directory::MockServiceDirectory;
#[cfg(test)]
pub(crate) use downstream::MockDownstreamClient;
