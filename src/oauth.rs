//! Authorization-provider contract expected by MCP protocol clients, and its token-refresh adapter.
//!
//! Protocol clients talk to an [`OAuthClientProvider`] covering client identity, redirect
//! handling, and token retrieval/storage. [`TokenProviderAdapter`] satisfies that contract on top
//! of a plain [`TokenSource`](crate::provider::TokenSource), supporting only the token-refresh
//! subset and reporting so via [`ProviderCapabilities::TokenRefreshOnly`].

pub mod adapter;
pub mod metadata;

pub use adapter::*;
pub use metadata::*;

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Boxed future returned by [`OAuthClientProvider::tokens`].
pub type TokensFuture<'a> = Pin<Box<dyn Future<Output = Option<Arc<OAuthTokens>>> + 'a + Send>>;

/// Which parts of the OAuth client contract an implementation actually performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderCapabilities {
	/// Tokens come from a refresh callback; redirect and PKCE members are inert.
	TokenRefreshOnly,
	/// Full authorization-code flow with redirect and PKCE state.
	AuthorizationCode,
}
impl ProviderCapabilities {
	/// Returns `true` when the redirect/PKCE members are functional.
	pub const fn supports_authorization_code(self) -> bool {
		matches!(self, ProviderCapabilities::AuthorizationCode)
	}
}

/// Client-side OAuth provider interface consumed by protocol clients.
pub trait OAuthClientProvider
where
	Self: Send + Sync,
{
	/// Reports which members of the contract are functional.
	fn capabilities(&self) -> ProviderCapabilities;

	/// Redirect target registered for the client.
	fn redirect_url(&self) -> &str;

	/// Dynamic client registration metadata.
	fn client_metadata(&self) -> OAuthClientMetadata;

	/// Client identity, if registered.
	fn client_information(&self) -> Option<OAuthClientInformation>;

	/// Opaque anti-forgery value for an authorization request.
	fn state(&self) -> String;

	/// Current tokens, or `None` when no credentials are available for this attempt.
	fn tokens(&self) -> TokensFuture<'_>;

	/// Stores tokens obtained outside the provider.
	fn save_tokens(&self, tokens: OAuthTokens);

	/// Sends the user agent to the authorization endpoint.
	fn redirect_to_authorization(&self, authorization_url: &Url);

	/// Stores the PKCE verifier for the pending authorization.
	fn save_code_verifier(&self, code_verifier: &str);

	/// Returns the PKCE verifier for the pending authorization.
	fn code_verifier(&self) -> String;
}

/// Token shape exchanged with protocol clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
	/// Access token value; callers must avoid logging it.
	pub access_token: String,
	/// Scheme label.
	pub token_type: String,
	/// Seconds until expiry, floored; negative once expired.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<i64>,
	/// Refresh token; never populated from a token source.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
}
impl OAuthTokens {
	/// Translates a resolved record, computing `expires_in` relative to `now`.
	pub fn from_record_at(record: &TokenRecord, now: OffsetDateTime) -> Self {
		Self {
			access_token: record.token.expose().to_owned(),
			token_type: record.token_type.clone(),
			expires_in: record.remaining_at(now).map(floor_seconds),
			refresh_token: None,
		}
	}

	/// Formats the `Authorization` header value (`<type> <token>`).
	pub fn authorization_value(&self) -> String {
		format!("{} {}", self.token_type, self.access_token)
	}
}
impl Debug for OAuthTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthTokens")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

fn floor_seconds(duration: Duration) -> i64 {
	let whole = duration.whole_seconds();

	if duration.subsec_nanoseconds() < 0 { whole.saturating_sub(1) } else { whole }
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expires_in_is_floored() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let ahead = TokenRecord::builder("abc")
			.expires_at(now + Duration::milliseconds(90_500))
			.build()
			.expect("Future expiry fixture should build.");
		let behind = TokenRecord::builder("abc")
			.expires_at(now - Duration::milliseconds(1_500))
			.build()
			.expect("Past expiry fixture should build.");

		assert_eq!(OAuthTokens::from_record_at(&ahead, now).expires_in, Some(90));
		assert_eq!(OAuthTokens::from_record_at(&behind, now).expires_in, Some(-2));
		assert_eq!(OAuthTokens::from_record_at(&TokenRecord::bearer("abc"), now).expires_in, None);
	}

	#[test]
	fn tokens_serialize_with_protocol_field_names() {
		let tokens = OAuthTokens {
			access_token: "abc".into(),
			token_type: "Bearer".into(),
			expires_in: Some(60),
			refresh_token: None,
		};
		let payload = serde_json::to_value(&tokens).expect("Tokens should serialize to JSON.");

		assert_eq!(
			payload,
			serde_json::json!({ "access_token": "abc", "token_type": "Bearer", "expires_in": 60 })
		);
		assert_eq!(tokens.authorization_value(), "Bearer abc");
		assert!(!format!("{tokens:?}").contains("abc"));
	}

	#[test]
	fn capability_flags() {
		assert!(!ProviderCapabilities::TokenRefreshOnly.supports_authorization_code());
		assert!(ProviderCapabilities::AuthorizationCode.supports_authorization_code());
	}
}
