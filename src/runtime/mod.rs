//! Runtime adapters connecting the scheduler to async collaborators.

#[cfg(feature = "tokio-runtime")]
pub mod arrivals;

#[cfg(feature = "tokio-runtime")]
pub use arrivals::{spawn_arrivals_bridge, ArrivalsBridge};
