//! Crate-level error types shared across token sources, providers, and adapters.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error produced by caller-supplied refresh callbacks.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The refresh callback failed; the original failure is kept as the source.
	#[error("Token refresh callback failed.")]
	Refresh {
		/// Error reported by the callback.
		#[source]
		source: BoxError,
	},
	/// Local configuration or input problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Wraps a refresh callback failure.
	pub fn refresh(src: impl Into<BoxError>) -> Self {
		Self::Refresh { source: src.into() }
	}
}
impl From<crate::auth::TokenRecordBuilderError> for Error {
	fn from(e: crate::auth::TokenRecordBuilderError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
	/// A token payload is not valid JSON.
	#[error("Token response is not valid JSON.")]
	MalformedJson(#[source] serde_json::Error),
	/// A JSON token response does not match the expected shape.
	#[error("Token response is malformed at `{}`.", .source.path())]
	InvalidTokenResponse {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// An epoch-millisecond timestamp cannot be represented.
	#[error("Timestamp {millis}ms is outside the supported range.")]
	TimestampOutOfRange {
		/// Offending value in milliseconds since the Unix epoch.
		millis: i64,
	},
	/// A relative lifetime exceeds every representable instant.
	#[error("Lifetime {millis}ms is outside the supported range.")]
	DurationOutOfRange {
		/// Offending value in milliseconds.
		millis: i64,
	},
	/// A header name or value cannot be attached to an HTTP request.
	#[error("Header `{name}` cannot be attached to the request.")]
	InvalidHeader {
		/// Header name as produced by the header provider.
		name: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_error_keeps_callback_failure_as_source() {
		let err = Error::refresh("upstream unavailable");

		assert!(matches!(err, Error::Refresh { .. }));
		assert_eq!(err.to_string(), "Token refresh callback failed.");

		let source =
			StdError::source(&err).expect("Refresh error should expose the callback failure.");

		assert_eq!(source.to_string(), "upstream unavailable");
	}

	#[test]
	fn builder_error_converts_into_config_error() {
		let err = Error::from(crate::auth::TokenRecordBuilderError::MissingToken);

		assert!(matches!(err, Error::Config(ConfigError::TokenBuild(_))));
	}
}
