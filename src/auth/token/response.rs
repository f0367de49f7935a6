//! Raw refresh-callback responses and their normalization into [`TokenRecord`].

// crates.io
use serde_json::Value;
use time::PrimitiveDateTime;
// self
use crate::{
	_prelude::*,
	auth::token::{
		record::{DEFAULT_TOKEN_TYPE, TokenRecord},
		secret::TokenSecret,
	},
	error::ConfigError,
};

/// Output of a refresh callback before normalization.
///
/// Callbacks may hand back a bare token string or a structured record; both funnel through
/// [`TokenResponse::normalize`] so downstream code only ever sees a [`TokenRecord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResponse {
	/// Bare token with no expiry and the default scheme.
	Bare(TokenSecret),
	/// Structured response carrying optional expiry hints and scheme.
	Record(RawTokenRecord),
}
impl TokenResponse {
	/// Converts the response into the canonical record.
	///
	/// Normalization is total: the scheme defaults to [`DEFAULT_TOKEN_TYPE`] and every other field
	/// passes through unchanged. Expiry hints are not resolved here; see
	/// [`TokenRecord::resolve_expiration_at`].
	pub fn normalize(self) -> TokenRecord {
		match self {
			Self::Bare(token) => TokenRecord {
				token,
				expires_at: None,
				expires_in: None,
				token_type: DEFAULT_TOKEN_TYPE.into(),
			},
			Self::Record(raw) => TokenRecord {
				token: raw.token,
				expires_at: raw.expires_at,
				expires_in: raw.expires_in,
				token_type: raw.token_type.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.into()),
			},
		}
	}

	/// Returns the credential value without normalizing.
	pub fn token(&self) -> &TokenSecret {
		match self {
			Self::Bare(token) => token,
			Self::Record(raw) => &raw.token,
		}
	}

	/// Parses a JSON token payload.
	///
	/// Accepts either a JSON string or an object with `token` (or `access_token`) plus optional
	/// `expiresAt` (epoch milliseconds), `expiresInMs`, and `type` (or `token_type`).
	pub fn from_json(payload: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(payload).map_err(ConfigError::MalformedJson)?;

		if let Value::String(token) = value {
			return Ok(Self::Bare(TokenSecret::new(token)));
		}

		let wire: WireTokenRecord = serde_path_to_error::deserialize(value)
			.map_err(|source| ConfigError::InvalidTokenResponse { source })?;

		Ok(Self::Record(wire.try_into()?))
	}
}
impl From<&str> for TokenResponse {
	fn from(value: &str) -> Self {
		Self::Bare(TokenSecret::new(value))
	}
}
impl From<String> for TokenResponse {
	fn from(value: String) -> Self {
		Self::Bare(TokenSecret::new(value))
	}
}
impl From<TokenSecret> for TokenResponse {
	fn from(value: TokenSecret) -> Self {
		Self::Bare(value)
	}
}
impl From<RawTokenRecord> for TokenResponse {
	fn from(value: RawTokenRecord) -> Self {
		Self::Record(value)
	}
}
impl From<TokenRecord> for TokenResponse {
	fn from(value: TokenRecord) -> Self {
		Self::Record(RawTokenRecord {
			token: value.token,
			expires_at: value.expires_at,
			expires_in: value.expires_in,
			token_type: Some(value.token_type),
		})
	}
}

/// Structured callback response whose scheme may be omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTokenRecord {
	/// Credential value.
	pub token: TokenSecret,
	/// Absolute expiry instant.
	pub expires_at: Option<OffsetDateTime>,
	/// Relative expiry hint.
	pub expires_in: Option<Duration>,
	/// Optional scheme label.
	pub token_type: Option<String>,
}
impl RawTokenRecord {
	/// Creates a record carrying only the token value.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: TokenSecret::new(token), expires_at: None, expires_in: None, token_type: None }
	}

	/// Sets an absolute expiry instant.
	pub fn with_expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry hint.
	pub fn with_expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Sets the scheme label.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}
}

#[derive(Deserialize)]
struct WireTokenRecord {
	#[serde(alias = "access_token")]
	token: String,
	#[serde(default, rename = "expiresAt", alias = "expires_at")]
	expires_at: Option<i64>,
	#[serde(default, rename = "expiresInMs", alias = "expires_in_ms")]
	expires_in_ms: Option<i64>,
	#[serde(default, rename = "type", alias = "token_type")]
	token_type: Option<String>,
}
impl TryFrom<WireTokenRecord> for RawTokenRecord {
	type Error = ConfigError;

	fn try_from(wire: WireTokenRecord) -> Result<Self, Self::Error> {
		let expires_at = wire.expires_at.map(epoch_millis).transpose()?;

		Ok(Self {
			token: TokenSecret::new(wire.token),
			expires_at,
			expires_in: wire.expires_in_ms.map(lifetime_millis).transpose()?,
			token_type: wire.token_type,
		})
	}
}

fn epoch_millis(millis: i64) -> Result<OffsetDateTime, ConfigError> {
	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
		.map_err(|_| ConfigError::TimestampOutOfRange { millis })
}

fn lifetime_millis(millis: i64) -> Result<Duration, ConfigError> {
	let lifetime = Duration::milliseconds(millis);

	if lifetime.abs() > PrimitiveDateTime::MAX - PrimitiveDateTime::MIN {
		return Err(ConfigError::DurationOutOfRange { millis });
	}

	Ok(lifetime)
}
