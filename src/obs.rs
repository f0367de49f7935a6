//! Optional observability helpers for token refreshes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `token_bridge.refresh` with the
//!   `layer` and `stage` fields, plus log events for cache hits, adapter failures, and ignored
//!   redirect requests.
//! - Enable `metrics` to increment the `token_bridge_refresh_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `layer` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Caching layers that consult a refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshLayer {
	/// Interval-based caching token provider.
	Provider,
	/// Authorization-provider adapter with its short-lived cache.
	Adapter,
}
impl RefreshLayer {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshLayer::Provider => "provider",
			RefreshLayer::Adapter => "adapter",
		}
	}
}
impl Display for RefreshLayer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// Entry to a cached accessor.
	Attempt,
	/// Served from cache without invoking the callback.
	CacheHit,
	/// The callback produced a fresh token.
	Success,
	/// The callback failed.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::CacheHit => "cache_hit",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
