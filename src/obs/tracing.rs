// self
use crate::{_prelude::*, obs::RefreshLayer};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRefresh<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRefresh<F> = F;

/// A span builder used around refresh callback invocations.
#[derive(Clone, Debug)]
pub struct RefreshSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RefreshSpan {
	/// Creates a new span tagged with the provided layer + stage.
	pub fn new(layer: RefreshLayer, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("token_bridge.refresh", layer = layer.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (layer, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRefresh<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event when a cached value satisfied the request.
pub fn log_cache_hit(layer: RefreshLayer, age: Duration) {
	#[cfg(feature = "tracing")]
	{
		let age_ms = age_millis(age);

		tracing::debug!(layer = layer.as_str(), age_ms, "served cached token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (layer, age);
	}
}

#[cfg(feature = "tracing")]
fn age_millis(age: Duration) -> i64 {
	i64::try_from(age.whole_milliseconds()).unwrap_or(i64::MAX)
}

/// Emits an error event for a refresh callback failure that was swallowed.
pub fn log_refresh_failure(layer: RefreshLayer, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		let source = StdError::source(error).map(ToString::to_string);

		tracing::error!(
			layer = layer.as_str(),
			error = %error,
			source = source.as_deref(),
			"failed to get token from token source"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (layer, error);
	}
}

/// Emits a warning when a caller requests a browser redirect the adapter cannot perform.
pub fn log_redirect_ignored(authorization_url: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			url = %authorization_url,
			"authorization redirect requested but the token source is not OAuth-based"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = authorization_url;
	}
}
