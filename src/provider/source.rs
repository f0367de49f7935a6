//! Refresh callback contract and closure adapters.

// self
use crate::{_prelude::*, auth::TokenResponse, error::BoxError};

/// Boxed future returned by [`TokenSource::fetch_token`].
pub type TokenFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Produces a raw token response on demand.
///
/// Implementations may fail; failures surface as [`Error::Refresh`]. No timeout is imposed by
/// callers in this crate, so any deadline must be enforced by the implementation itself.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Fetches a fresh token response.
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse>;
}
impl<T> TokenSource for Arc<T>
where
	T: ?Sized + TokenSource,
{
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse> {
		(**self).fetch_token()
	}
}

/// [`TokenSource`] backed by an async closure.
#[derive(Clone)]
pub struct FnTokenSource<F>(F);
impl<F, Fut, T, E> TokenSource for FnTokenSource<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<T, E>>,
	T: 'static + Into<TokenResponse>,
	E: 'static + Into<BoxError>,
{
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse> {
		let fut = (self.0)();

		Box::pin(async move { fut.await.map(Into::into).map_err(Error::refresh) })
	}
}
impl<F> Debug for FnTokenSource<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FnTokenSource(..)")
	}
}

/// [`TokenSource`] backed by a synchronous closure.
#[derive(Clone)]
pub struct SyncFnTokenSource<F>(F);
impl<F, T, E> TokenSource for SyncFnTokenSource<F>
where
	F: Send + Sync + Fn() -> Result<T, E>,
	T: 'static + Into<TokenResponse>,
	E: 'static + Into<BoxError>,
{
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse> {
		let result = (self.0)().map(Into::into).map_err(Error::refresh);

		Box::pin(async move { result })
	}
}
impl<F> Debug for SyncFnTokenSource<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SyncFnTokenSource(..)")
	}
}

/// [`TokenSource`] that always yields the same response.
#[derive(Clone, Debug)]
pub struct StaticTokenSource(TokenResponse);
impl StaticTokenSource {
	/// Wraps a fixed response.
	pub fn new(response: impl Into<TokenResponse>) -> Self {
		Self(response.into())
	}
}
impl TokenSource for StaticTokenSource {
	fn fetch_token(&self) -> TokenFuture<'_, TokenResponse> {
		let response = self.0.clone();

		Box::pin(async move { Ok(response) })
	}
}

/// Wraps an async closure as a [`TokenSource`].
///
/// ```
/// use token_bridge::provider::source;
///
/// let source = source::from_fn(|| async { Ok::<_, std::io::Error>("abc") });
/// # let _ = source;
/// ```
pub fn from_fn<F>(f: F) -> FnTokenSource<F> {
	FnTokenSource(f)
}

/// Wraps a synchronous closure as a [`TokenSource`].
pub fn from_sync_fn<F>(f: F) -> SyncFnTokenSource<F> {
	SyncFnTokenSource(f)
}
