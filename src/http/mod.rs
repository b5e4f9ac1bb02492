//! Inbound HTTP surface of the aggregator.
//!
//! Routes map onto two inbound ports, [`RegistryControl`] and
//! [`ResourceLookup`], so handlers never depend on concrete store, probe or
//! client types. Registry failures are translated into status codes by
//! [`ApiError`].

mod error;
mod handlers;
mod ports;
mod views;

pub use error::ApiError;
pub use handlers::{AppState, router};
pub use ports::{RegistryControl, ResourceLookup};
pub use views::{AddServiceBody, ServiceView, UpdateServiceBody};
