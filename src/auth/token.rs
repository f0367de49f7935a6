//! Canonical token records, raw callback responses, and redacted secrets.

pub mod record;
pub mod response;
pub mod secret;
