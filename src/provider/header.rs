//! Header-producing providers for transports that only accept request headers.

// self
use crate::{
	_prelude::*,
	clock::Clock,
	error::BoxError,
	provider::{caching::CachingTokenProvider, source::TokenSource},
};

/// Header name populated by [`BearerHeaderProvider`].
pub const AUTHORIZATION: &str = "Authorization";

/// Header map produced for a single outbound request.
pub type AuthHeaders = BTreeMap<String, String>;

/// Boxed future returned by [`HeaderProvider::headers`].
pub type HeaderFuture<'a> = Pin<Box<dyn Future<Output = Result<AuthHeaders>> + 'a + Send>>;

/// Supplies the headers to attach to the next outbound request.
pub trait HeaderProvider
where
	Self: Send + Sync,
{
	/// Produces the headers, refreshing credentials if needed.
	fn headers(&self) -> HeaderFuture<'_>;
}
impl<T> HeaderProvider for Arc<T>
where
	T: ?Sized + HeaderProvider,
{
	fn headers(&self) -> HeaderFuture<'_> {
		(**self).headers()
	}
}

/// Produces `{ "Authorization": "<type> <token>" }` from a cached token source.
///
/// The scheme follows the normalized record, which is `Bearer` for bare string tokens. This is the
/// only header contributed; anything else belongs to the transport.
#[derive(Debug)]
pub struct BearerHeaderProvider {
	provider: CachingTokenProvider,
}
impl BearerHeaderProvider {
	/// Wraps the source in a [`CachingTokenProvider`] with the default refresh interval.
	pub fn new<S>(source: S) -> Self
	where
		S: 'static + TokenSource,
	{
		Self { provider: CachingTokenProvider::new(source) }
	}

	/// Reuses an already configured caching provider.
	pub fn from_provider(provider: CachingTokenProvider) -> Self {
		Self { provider }
	}

	/// Overrides the refresh interval of the underlying provider.
	pub fn with_refresh_interval(self, interval: Duration) -> Self {
		Self { provider: self.provider.with_refresh_interval(interval) }
	}

	/// Overrides the clock of the underlying provider.
	pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
		Self { provider: self.provider.with_clock(clock) }
	}

	/// Returns the underlying caching provider.
	pub fn provider(&self) -> &CachingTokenProvider {
		&self.provider
	}
}
impl HeaderProvider for BearerHeaderProvider {
	fn headers(&self) -> HeaderFuture<'_> {
		Box::pin(async move {
			let record = self.provider.fetch().await?.normalize();

			Ok(AuthHeaders::from([(AUTHORIZATION.to_owned(), record.authorization_value())]))
		})
	}
}

/// [`HeaderProvider`] backed by an async closure, for transports needing extra headers.
#[derive(Clone)]
pub struct FnHeaderProvider<F>(F);
impl<F, Fut, E> HeaderProvider for FnHeaderProvider<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<AuthHeaders, E>>,
	E: 'static + Into<BoxError>,
{
	fn headers(&self) -> HeaderFuture<'_> {
		let fut = (self.0)();

		Box::pin(async move { fut.await.map_err(Error::refresh) })
	}
}
impl<F> Debug for FnHeaderProvider<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnHeaderProvider(..)")
	}
}

/// Wraps an async closure as a [`HeaderProvider`].
pub fn from_fn<F>(f: F) -> FnHeaderProvider<F> {
	FnHeaderProvider(f)
}
