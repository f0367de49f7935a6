//! Redacting wrapper for credential values.

// self
use crate::_prelude::*;

/// Credential value that never shows up in `Debug` or `Display` output.
///
/// Serde sees the plain string, so JSON token payloads and records read and write it unchanged.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	const REDACTED: &'static str = "<redacted>";

	/// Wraps a credential value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Borrows the raw credential. Never pass the result to a logger.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` for an empty credential, which builders reject.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Unwraps the raw credential.
	pub fn into_inner(self) -> String {
		self.0
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret({})", Self::REDACTED)
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(Self::REDACTED)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatting_never_reveals_the_credential() {
		let secret = TokenSecret::from("sk-live-123");

		assert_eq!(format!("{secret:?}"), "TokenSecret(<redacted>)");
		assert_eq!(secret.to_string(), "<redacted>");
		assert_eq!(secret.expose(), "sk-live-123");
		assert!(!format!("{:?}", Some(&secret)).contains("sk-live"));
	}

	#[test]
	fn serde_reads_and_writes_the_bare_string() {
		let secret: TokenSecret =
			serde_json::from_str("\"abc\"").expect("A JSON string should deserialize as a secret.");

		assert_eq!(secret, TokenSecret::new(String::from("abc")));
		assert_eq!(
			serde_json::to_string(&secret).expect("Token secret should serialize to JSON."),
			"\"abc\""
		);
	}

	#[test]
	fn empty_credentials_are_detectable() {
		assert!(TokenSecret::default().is_empty());
		assert!(!TokenSecret::from(String::from("x")).is_empty());
		assert_eq!(TokenSecret::new("x").into_inner(), "x");
	}
}
