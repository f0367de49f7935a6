//! Token sources, the interval-based caching provider, and header providers.
//!
//! [`source::TokenSource`] is the refresh callback contract. [`CachingTokenProvider`] memoizes a
//! source for a configurable interval, and [`BearerHeaderProvider`] turns the cached token into an
//! `Authorization` header.

pub mod caching;
pub mod header;
pub mod metrics;
pub mod source;

pub use caching::*;
pub use header::{
	AUTHORIZATION, AuthHeaders, BearerHeaderProvider, FnHeaderProvider, HeaderFuture, HeaderProvider,
};
pub use metrics::*;
pub use source::{
	FnTokenSource, StaticTokenSource, SyncFnTokenSource, TokenFuture, TokenSource,
};
