//! Adapter presenting a [`TokenSource`] as an [`OAuthClientProvider`].

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	clock::{self, Clock},
	oauth::{
		OAuthClientInformation, OAuthClientMetadata, OAuthClientMetadataOverrides,
		OAuthClientProvider, OAuthTokens, ProviderCapabilities, TokensFuture,
	},
	obs::{self, RefreshLayer, RefreshOutcome, RefreshSpan},
	provider::{RefreshMetrics, TokenSource},
};

/// Redirect target used when none is configured.
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:3000/auth/callback";
/// Client identifier used when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "token-bridge-client";
/// Default `client_name` registration field.
pub const DEFAULT_CLIENT_NAME: &str = "Token Bridge MCP Client";
/// Default `client_uri` registration field.
pub const DEFAULT_CLIENT_URI: &str = "https://github.com/hack-ink/token-bridge";
/// Fixed verifier returned by [`TokenProviderAdapter::code_verifier`].
pub const CODE_VERIFIER_SENTINEL: &str = "not-used-in-token-provider-mode";
/// Minimum time between two source invocations from [`TokenProviderAdapter::tokens`].
pub const TOKEN_CACHE_TTL: Duration = Duration::seconds(5);

const LAYER: RefreshLayer = RefreshLayer::Adapter;
const STATE_LEN: usize = 32;

/// Optional configuration for [`TokenProviderAdapter`].
#[derive(Clone, Debug, Default)]
pub struct TokenProviderAdapterOptions {
	/// OAuth client identifier; defaults to [`DEFAULT_CLIENT_ID`].
	pub client_id: Option<String>,
	/// Registration metadata merged over the defaults.
	pub client_metadata: OAuthClientMetadataOverrides,
	/// Redirect target; defaults to [`DEFAULT_REDIRECT_URL`].
	pub redirect_url: Option<String>,
}
impl TokenProviderAdapterOptions {
	/// Sets the client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the metadata overrides.
	pub fn with_client_metadata(mut self, overrides: OAuthClientMetadataOverrides) -> Self {
		self.client_metadata = overrides;

		self
	}

	/// Sets the redirect target. Accepts a [`Url`] or any string.
	pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
		self.redirect_url = Some(redirect_url.into());

		self
	}
}

#[derive(Default)]
struct AdapterState {
	cached_tokens: Option<Arc<OAuthTokens>>,
	last_fetch: Option<OffsetDateTime>,
}

/// Presents a [`TokenSource`] (typically a
/// [`CachingTokenProvider`](crate::provider::CachingTokenProvider)) as an
/// [`OAuthClientProvider`].
///
/// Protocol clients call [`tokens`](OAuthClientProvider::tokens) before every request, so the
/// adapter keeps its own [`TOKEN_CACHE_TTL`] cache on top of whatever caching the source performs.
/// Source failures are logged and reported as `None` rather than returned as errors.
///
/// Only the token-refresh subset of the contract is functional: redirects are logged and ignored,
/// and PKCE verifier state is not tracked.
pub struct TokenProviderAdapter {
	source: Arc<dyn TokenSource>,
	client_id: String,
	client_metadata: OAuthClientMetadataOverrides,
	redirect_url: String,
	clock: Arc<dyn Clock>,
	state: Mutex<AdapterState>,
	metrics: RefreshMetrics,
}
impl TokenProviderAdapter {
	/// Creates an adapter with default identity and redirect settings.
	pub fn new<S>(source: S) -> Self
	where
		S: 'static + TokenSource,
	{
		Self::with_options(source, TokenProviderAdapterOptions::default())
	}

	/// Creates an adapter with the provided options.
	pub fn with_options<S>(source: S, options: TokenProviderAdapterOptions) -> Self
	where
		S: 'static + TokenSource,
	{
		let TokenProviderAdapterOptions { client_id, client_metadata, redirect_url } = options;

		Self {
			source: Arc::new(source),
			client_id: client_id.unwrap_or_else(|| DEFAULT_CLIENT_ID.into()),
			client_metadata,
			redirect_url: redirect_url.unwrap_or_else(|| DEFAULT_REDIRECT_URL.into()),
			clock: clock::system(),
			state: Mutex::default(),
			metrics: RefreshMetrics::default(),
		}
	}

	/// Overrides the clock used for the token cache window and `expires_in`.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Returns the configured client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the per-instance counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Returns the cached tokens without refreshing, regardless of age.
	pub fn cached_tokens(&self) -> Option<Arc<OAuthTokens>> {
		self.state.lock().cached_tokens.clone()
	}

	/// Clears cached tokens so the next [`tokens`](OAuthClientProvider::tokens) call invokes the
	/// source.
	pub fn invalidate_cache(&self) {
		let mut state = self.state.lock();

		state.cached_tokens = None;
		state.last_fetch = None;
	}

	fn cached_at(&self, now: OffsetDateTime) -> Option<Arc<OAuthTokens>> {
		let state = self.state.lock();
		let tokens = state.cached_tokens.as_ref()?;
		let age = now - state.last_fetch?;

		if age >= TOKEN_CACHE_TTL {
			return None;
		}

		self.metrics.record_cache_hit();
		obs::record_refresh_outcome(LAYER, RefreshOutcome::CacheHit);
		obs::log_cache_hit(LAYER, age);

		Some(tokens.clone())
	}

	fn store(&self, tokens: Arc<OAuthTokens>, fetched_at: OffsetDateTime) {
		let mut state = self.state.lock();

		state.cached_tokens = Some(tokens);
		state.last_fetch = Some(fetched_at);
	}
}
impl OAuthClientProvider for TokenProviderAdapter {
	fn capabilities(&self) -> ProviderCapabilities {
		ProviderCapabilities::TokenRefreshOnly
	}

	fn redirect_url(&self) -> &str {
		&self.redirect_url
	}

	fn client_metadata(&self) -> OAuthClientMetadata {
		let defaults = OAuthClientMetadata {
			redirect_uris: vec![self.redirect_url.clone()],
			client_name: Some(DEFAULT_CLIENT_NAME.into()),
			client_uri: Some(DEFAULT_CLIENT_URI.into()),
			..Default::default()
		};

		self.client_metadata.apply(defaults)
	}

	fn client_information(&self) -> Option<OAuthClientInformation> {
		Some(OAuthClientInformation {
			client_id: self.client_id.clone(),
			metadata: self.client_metadata(),
		})
	}

	fn state(&self) -> String {
		rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
	}

	fn tokens(&self) -> TokensFuture<'_> {
		Box::pin(async move {
			obs::record_refresh_outcome(LAYER, RefreshOutcome::Attempt);
			self.metrics.record_attempt();

			let checked_at = self.clock.now();

			if let Some(tokens) = self.cached_at(checked_at) {
				return Some(tokens);
			}

			let span = RefreshSpan::new(LAYER, "tokens");

			match span.instrument(self.source.fetch_token()).await {
				Ok(response) => {
					let now = self.clock.now();
					let record = response.normalize().resolve_expiration_at(now);
					let tokens = Arc::new(OAuthTokens::from_record_at(&record, now));

					self.store(tokens.clone(), checked_at);
					self.metrics.record_success();
					obs::record_refresh_outcome(LAYER, RefreshOutcome::Success);

					Some(tokens)
				},
				Err(err) => {
					self.metrics.record_failure();
					obs::record_refresh_outcome(LAYER, RefreshOutcome::Failure);
					obs::log_refresh_failure(LAYER, &err);

					None
				},
			}
		})
	}

	fn save_tokens(&self, tokens: OAuthTokens) {
		self.store(Arc::new(tokens), self.clock.now());
	}

	fn redirect_to_authorization(&self, authorization_url: &Url) {
		obs::log_redirect_ignored(authorization_url);
	}

	fn save_code_verifier(&self, _code_verifier: &str) {}

	fn code_verifier(&self) -> String {
		CODE_VERIFIER_SENTINEL.into()
	}
}
impl Debug for TokenProviderAdapter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProviderAdapter")
			.field("client_id", &self.client_id)
			.field("redirect_url", &self.redirect_url)
			.field("cached", &self.state.lock().cached_tokens.is_some())
			.field("metrics", &self.metrics)
			.finish()
	}
}
