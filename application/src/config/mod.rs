//! Application-level configuration.
//!
//! - [`DispatchParams`]: concurrency cap and round deadline for fan-out

pub mod dispatch_params;

pub use dispatch_params::DispatchParams;
