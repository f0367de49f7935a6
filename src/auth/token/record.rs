//! Canonical token record, expiry resolution, and builders.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Scheme label applied when a response does not name one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";
/// Safety margin used by [`TokenRecord::is_expired`].
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::seconds(30);

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when the token value is empty.
	#[error("Token value is required.")]
	MissingToken,
}

/// Canonical credential unit produced by normalizing a refresh callback response.
///
/// Records are never mutated in place once produced; the lifecycle helpers consume the record
/// and return an updated copy.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRecord {
	/// Credential value; callers must avoid logging it.
	pub token: TokenSecret,
	/// Absolute expiry instant, if known.
	pub expires_at: Option<OffsetDateTime>,
	/// Relative expiry hint. Advisory once `expires_at` has been resolved.
	pub expires_in: Option<Duration>,
	/// Credential scheme label (e.g. `Bearer`).
	pub token_type: String,
}
impl TokenRecord {
	/// Returns a builder for the provided token value.
	pub fn builder(token: impl Into<String>) -> TokenRecordBuilder {
		TokenRecordBuilder::new(token)
	}

	/// Creates a never-expiring record with the default scheme.
	pub fn bearer(token: impl Into<String>) -> Self {
		Self {
			token: TokenSecret::new(token),
			expires_at: None,
			expires_in: None,
			token_type: DEFAULT_TOKEN_TYPE.into(),
		}
	}

	/// Resolves `expires_at` from `expires_in` relative to `issued_at`.
	///
	/// An existing `expires_at` always wins and is returned untouched. Records with neither
	/// hint are returned as-is and treated as never expiring, as are records whose hint lands
	/// beyond the representable calendar.
	pub fn resolve_expiration_at(self, issued_at: OffsetDateTime) -> Self {
		match (self.expires_at, self.expires_in) {
			(None, Some(delta)) => Self { expires_at: issued_at.checked_add(delta), ..self },
			_ => self,
		}
	}

	/// Convenience helper that resolves expiry against the current UTC instant.
	pub fn resolve_expiration(self) -> Self {
		self.resolve_expiration_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` when the record expires within `buffer` of `now`.
	///
	/// The boundary is inclusive: `now + buffer == expires_at` counts as expired. Records without
	/// an absolute expiry never expire. A buffer pushing `now` past the calendar counts as expired.
	pub fn is_expired_at(&self, now: OffsetDateTime, buffer: Duration) -> bool {
		match self.expires_at {
			Some(expires_at) =>
				now.checked_add(buffer).is_none_or(|threshold| threshold >= expires_at),
			None => false,
		}
	}

	/// Checks expiry against the current clock with a custom buffer.
	pub fn is_expired_within(&self, buffer: Duration) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc(), buffer)
	}

	/// Checks expiry against the current clock with [`DEFAULT_EXPIRY_BUFFER`].
	pub fn is_expired(&self) -> bool {
		self.is_expired_within(DEFAULT_EXPIRY_BUFFER)
	}

	/// Time left before `expires_at`, negative once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Option<Duration> {
		self.expires_at.map(|expires_at| expires_at - now)
	}

	/// Formats the `Authorization` header value (`<type> <token>`).
	pub fn authorization_value(&self) -> String {
		format!("{} {}", self.token_type, self.token.expose())
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug)]
pub struct TokenRecordBuilder {
	token: TokenSecret,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
	token_type: Option<String>,
}
impl TokenRecordBuilder {
	fn new(token: impl Into<String>) -> Self {
		Self { token: TokenSecret::new(token), expires_at: None, expires_in: None, token_type: None }
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry hint, resolved later by [`TokenRecord::resolve_expiration_at`].
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Overrides the scheme label.
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		if self.token.is_empty() {
			return Err(TokenRecordBuilderError::MissingToken);
		}

		Ok(TokenRecord {
			token: self.token,
			expires_at: self.expires_at,
			expires_in: self.expires_in,
			token_type: self.token_type.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.into()),
		})
	}
}
