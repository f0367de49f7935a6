//! Interval-based caching wrapper around a [`TokenSource`].

// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	clock::{self, Clock},
	obs::{self, RefreshLayer, RefreshOutcome, RefreshSpan},
	provider::{
		metrics::RefreshMetrics,
		source::{TokenFuture, TokenSource},
	},
};

/// Refresh interval applied when none is configured (15 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::minutes(15);

const LAYER: RefreshLayer = RefreshLayer::Provider;

struct CacheEntry {
	value: TokenResponse,
	fetched_at: OffsetDateTime,
}

/// Memoizes a [`TokenSource`] so it is invoked at most once per refresh interval.
///
/// Each call compares the age of the cached response against the interval. A cache that was
/// never filled, or whose age reached the interval (inclusive), triggers a refresh; otherwise the
/// cached response is returned without touching the source. Source failures propagate to the
/// caller and leave the cache unchanged.
///
/// Overlapping calls that observe a stale cache each invoke the source unless single-flight mode
/// is enabled with [`CachingTokenProvider::with_single_flight`], in which case refreshes are
/// serialized and later callers reuse the value produced by the first.
pub struct CachingTokenProvider {
	source: Arc<dyn TokenSource>,
	refresh_interval: Duration,
	clock: Arc<dyn Clock>,
	entry: Mutex<Option<CacheEntry>>,
	refresh_guard: Option<AsyncMutex<()>>,
	metrics: RefreshMetrics,
}
impl CachingTokenProvider {
	/// Wraps the source using [`DEFAULT_REFRESH_INTERVAL`] and the system clock.
	pub fn new<S>(source: S) -> Self
	where
		S: 'static + TokenSource,
	{
		Self {
			source: Arc::new(source),
			refresh_interval: DEFAULT_REFRESH_INTERVAL,
			clock: clock::system(),
			entry: Mutex::new(None),
			refresh_guard: None,
			metrics: RefreshMetrics::default(),
		}
	}

	/// Overrides the refresh interval. Negative values are clamped to zero, which disables caching.
	pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
		self.refresh_interval = if interval.is_negative() { Duration::ZERO } else { interval };

		self
	}

	/// Overrides the clock used for freshness checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Coalesces concurrent refreshes into a single source invocation when enabled.
	pub fn with_single_flight(mut self, enabled: bool) -> Self {
		self.refresh_guard = enabled.then(|| AsyncMutex::new(()));

		self
	}

	/// Returns the configured refresh interval.
	pub fn refresh_interval(&self) -> Duration {
		self.refresh_interval
	}

	/// Returns `true` when single-flight mode is enabled.
	pub fn single_flight(&self) -> bool {
		self.refresh_guard.is_some()
	}

	/// Returns the per-instance counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Returns the cached response, refreshing it first when stale.
	pub async fn fetch(&self) -> Result<TokenResponse> {
		obs::record_refresh_outcome(LAYER, RefreshOutcome::Attempt);
		self.metrics.record_attempt();

		let mut checked_at = self.clock.now();

		if let Some(value) = self.cached_at(checked_at) {
			return Ok(value);
		}

		let _singleflight = match &self.refresh_guard {
			Some(guard) => {
				let lock = guard.lock().await;

				checked_at = self.clock.now();

				if let Some(value) = self.cached_at(checked_at) {
					return Ok(value);
				}

				Some(lock)
			},
			None => None,
		};
		let span = RefreshSpan::new(LAYER, "fetch");

		match span.instrument(self.source.fetch_token()).await {
			Ok(value) => {
				*self.entry.lock() = Some(CacheEntry { value: value.clone(), fetched_at: checked_at });

				self.metrics.record_success();
				obs::record_refresh_outcome(LAYER, RefreshOutcome::Success);

				Ok(value)
			},
			Err(err) => {
				self.metrics.record_failure();
				obs::record_refresh_outcome(LAYER, RefreshOutcome::Failure);

				Err(err)
			},
		}
	}

	/// Returns the cached token value, refreshing it first when stale.
	pub async fn token(&self) -> Result<String> {
		let response = self.fetch().await?;

		Ok(response.normalize().token.into_inner())
	}

	/// Drops the cached response so the next call refreshes.
	pub fn invalidate(&self) {
		self.entry.lock().take();
	}

	fn cached_at(&self, now: OffsetDateTime) -> Option<TokenResponse> {
		let guard = self.entry.lock();
		let entry = guard.as_ref()?;
		let age = now - entry.fetched_at;

		if age >= self.refresh_interval {
			return None;
		}

		self.metrics.record_cache_hit();
		obs::record_refresh_outcome(LAYER, RefreshOutcome::CacheHit);
		obs::log_cache_hit(LAYER, age);

		Some(entry.value.clone())
	}
}
impl TokenSource for CachingTokenProvider {
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse> {
		Box::pin(self.fetch())
	}
}
impl Debug for CachingTokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachingTokenProvider")
			.field("refresh_interval", &self.refresh_interval)
			.field("single_flight", &self.single_flight())
			.field("cached", &self.entry.lock().is_some())
			.field("metrics", &self.metrics)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, clock::ManualClock};

	fn provider_with(source: Arc<ScriptedSource>, clock: &ManualClock) -> CachingTokenProvider {
		CachingTokenProvider::new(source).with_clock(Arc::new(clock.clone()))
	}

	#[tokio::test]
	async fn returns_cached_token_within_interval() {
		let clock = ManualClock::default();
		let source = Arc::new(ScriptedSource::default().ok("token123"));
		let provider = provider_with(source.clone(), &clock)
			.with_refresh_interval(Duration::milliseconds(900_000));
		let first = provider.token().await.expect("First fetch should succeed.");

		clock.advance(Duration::minutes(10));

		let second = provider.token().await.expect("Cached fetch should succeed.");

		assert_eq!(first, "token123");
		assert_eq!(second, "token123");
		assert_eq!(source.calls(), 1);
		assert_eq!(provider.metrics().cache_hits(), 1);
	}

	#[tokio::test]
	async fn refreshes_once_interval_elapses_inclusively() {
		let clock = ManualClock::default();
		let source = Arc::new(ScriptedSource::default().ok("token1").ok("token2"));
		let provider = provider_with(source.clone(), &clock)
			.with_refresh_interval(Duration::milliseconds(900_000));

		assert_eq!(provider.token().await.expect("First fetch should succeed."), "token1");

		clock.advance(Duration::milliseconds(900_000));

		assert_eq!(provider.token().await.expect("Boundary fetch should refresh."), "token2");
		assert_eq!(source.calls(), 2);
	}

	#[tokio::test]
	async fn default_interval_is_fifteen_minutes() {
		let clock = ManualClock::default();
		let source = Arc::new(ScriptedSource::default().ok("token1").ok("token2"));
		let provider = provider_with(source.clone(), &clock);

		assert_eq!(provider.refresh_interval(), Duration::milliseconds(900_000));
		assert_eq!(provider.token().await.expect("First fetch should succeed."), "token1");

		clock.advance(Duration::minutes(14));

		assert_eq!(provider.token().await.expect("Fetch at 14 minutes should hit cache."), "token1");
		assert_eq!(source.calls(), 1);

		clock.advance(Duration::minutes(2));

		assert_eq!(provider.token().await.expect("Fetch at 16 minutes should refresh."), "token2");
		assert_eq!(source.calls(), 2);
	}

	#[tokio::test]
	async fn failures_propagate_without_touching_cache() {
		let clock = ManualClock::default();
		let source =
			Arc::new(ScriptedSource::default().ok("token1").fail("network down").ok("token2"));
		let provider = provider_with(source.clone(), &clock);

		provider.token().await.expect("First fetch should succeed.");
		clock.advance(DEFAULT_REFRESH_INTERVAL);

		let err = provider.token().await.expect_err("Source failure should propagate.");

		assert!(matches!(err, Error::Refresh { .. }));
		assert_eq!(provider.metrics().failures(), 1);
		assert_eq!(provider.token().await.expect("Retry should refresh."), "token2");
		assert_eq!(source.calls(), 3);
	}

	#[tokio::test]
	async fn invalidate_forces_refresh() {
		let clock = ManualClock::default();
		let source = Arc::new(ScriptedSource::default().ok("token1").ok("token2"));
		let provider = provider_with(source.clone(), &clock);

		provider.token().await.expect("First fetch should succeed.");
		provider.invalidate();

		assert_eq!(provider.token().await.expect("Invalidated fetch should refresh."), "token2");
		assert_eq!(source.calls(), 2);
	}

	#[tokio::test]
	async fn zero_interval_always_refreshes() {
		let clock = ManualClock::default();
		let source = Arc::new(ScriptedSource::default().ok("a").ok("b"));
		let provider =
			provider_with(source.clone(), &clock).with_refresh_interval(Duration::seconds(-5));

		assert_eq!(provider.refresh_interval(), Duration::ZERO);
		assert_eq!(provider.token().await.expect("First fetch should succeed."), "a");
		assert_eq!(provider.token().await.expect("Second fetch should succeed."), "b");
	}

	#[tokio::test]
	async fn overlapping_calls_refresh_independently_by_default() {
		let clock = ManualClock::default();
		let source = Arc::new(
			ScriptedSource::default()
				.ok("a")
				.ok("b")
				.with_delay(std::time::Duration::from_millis(20)),
		);
		let provider = provider_with(source.clone(), &clock);
		let (first, second) = tokio::join!(provider.token(), provider.token());

		first.expect("First concurrent fetch should succeed.");
		second.expect("Second concurrent fetch should succeed.");

		assert_eq!(source.calls(), 2);
	}

	#[tokio::test]
	async fn single_flight_coalesces_overlapping_refreshes() {
		let clock = ManualClock::default();
		let source = Arc::new(
			ScriptedSource::default()
				.ok("a")
				.ok("b")
				.with_delay(std::time::Duration::from_millis(20)),
		);
		let provider = provider_with(source.clone(), &clock).with_single_flight(true);
		let (first, second) = tokio::join!(provider.token(), provider.token());

		assert_eq!(first.expect("First concurrent fetch should succeed."), "a");
		assert_eq!(second.expect("Second concurrent fetch should succeed."), "a");
		assert_eq!(source.calls(), 1);
	}

	#[tokio::test]
	async fn structured_responses_keep_their_token() {
		let clock = ManualClock::default();
		let source = Arc::new(
			ScriptedSource::default()
				.ok(RawTokenRecord::new("structured").with_expires_in(Duration::minutes(5))),
		);
		let provider = provider_with(source, &clock);
		let response = provider.fetch().await.expect("Structured fetch should succeed.");

		assert_eq!(response.token().expose(), "structured");
		assert_eq!(provider.token().await.expect("Cached fetch should succeed."), "structured");
	}
}
