//! Extension contracts for attaching provider headers to concrete HTTP clients.
//!
//! The core crate stays transport-agnostic; [`RequestSignerExt`] is the seam, and a `reqwest`
//! implementation ships behind the `reqwest` feature.

pub mod request_signer;

pub use request_signer::*;
