// self
use crate::obs::{RefreshLayer, RefreshOutcome};

/// Records a refresh outcome via the global metrics recorder (when enabled).
pub fn record_refresh_outcome(layer: RefreshLayer, outcome: RefreshOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"token_bridge_refresh_total",
			"layer" => layer.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (layer, outcome);
	}
}
