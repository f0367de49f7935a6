//! Client registration metadata and identity records.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Dynamic client registration metadata (RFC 7591 subset).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthClientMetadata {
	/// Redirect URIs registered for the client.
	pub redirect_uris: Vec<String>,
	/// Human-readable client name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_name: Option<String>,
	/// Client home page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_uri: Option<String>,
	/// Grant types the client will use.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grant_types: Option<Vec<String>>,
	/// Response types the client will use.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub response_types: Option<Vec<String>>,
	/// Token endpoint authentication method.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_endpoint_auth_method: Option<String>,
	/// Space-delimited scope string.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Any additional registration fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// Caller-supplied metadata that replaces the adapter defaults key by key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthClientMetadataOverrides {
	/// Replacement redirect URIs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uris: Option<Vec<String>>,
	/// Replacement client name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_name: Option<String>,
	/// Replacement client home page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_uri: Option<String>,
	/// Replacement grant types.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grant_types: Option<Vec<String>>,
	/// Replacement response types.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub response_types: Option<Vec<String>>,
	/// Replacement token endpoint authentication method.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_endpoint_auth_method: Option<String>,
	/// Replacement scope string.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Additional fields merged over the defaults.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl OAuthClientMetadataOverrides {
	/// Sets the client name.
	pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = Some(name.into());

		self
	}

	/// Sets the client home page.
	pub fn with_client_uri(mut self, uri: impl Into<String>) -> Self {
		self.client_uri = Some(uri.into());

		self
	}

	/// Sets the redirect URIs.
	pub fn with_redirect_uris<I, S>(mut self, uris: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.redirect_uris = Some(uris.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the grant types.
	pub fn with_grant_types<I, S>(mut self, grants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.grant_types = Some(grants.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the response types.
	pub fn with_response_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.response_types = Some(types.into_iter().map(Into::into).collect());

		self
	}

	/// Sets the token endpoint authentication method.
	pub fn with_token_endpoint_auth_method(mut self, method: impl Into<String>) -> Self {
		self.token_endpoint_auth_method = Some(method.into());

		self
	}

	/// Sets the scope string.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Adds an arbitrary registration field.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}

	/// Merges the overrides onto `defaults`; every override present wins.
	pub fn apply(&self, defaults: OAuthClientMetadata) -> OAuthClientMetadata {
		let OAuthClientMetadata {
			redirect_uris,
			client_name,
			client_uri,
			grant_types,
			response_types,
			token_endpoint_auth_method,
			scope,
			mut extra,
		} = defaults;

		extra.extend(self.extra.iter().map(|(key, value)| (key.clone(), value.clone())));

		OAuthClientMetadata {
			redirect_uris: self.redirect_uris.clone().unwrap_or(redirect_uris),
			client_name: self.client_name.clone().or(client_name),
			client_uri: self.client_uri.clone().or(client_uri),
			grant_types: self.grant_types.clone().or(grant_types),
			response_types: self.response_types.clone().or(response_types),
			token_endpoint_auth_method: self
				.token_endpoint_auth_method
				.clone()
				.or(token_endpoint_auth_method),
			scope: self.scope.clone().or(scope),
			extra,
		}
	}
}

/// Registered client identity: the client id plus its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OAuthClientInformation {
	/// OAuth client identifier.
	pub client_id: String,
	/// Metadata flattened alongside the identifier.
	#[serde(flatten)]
	pub metadata: OAuthClientMetadata,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn defaults() -> OAuthClientMetadata {
		OAuthClientMetadata {
			redirect_uris: vec!["http://localhost:3000/auth/callback".into()],
			client_name: Some("Default Client".into()),
			client_uri: Some("https://default.example.com".into()),
			extra: BTreeMap::from([("software_id".into(), Value::from("default"))]),
			..Default::default()
		}
	}

	#[test]
	fn empty_overrides_keep_defaults() {
		assert_eq!(OAuthClientMetadataOverrides::default().apply(defaults()), defaults());
	}

	#[test]
	fn overrides_win_on_collision() {
		let merged = OAuthClientMetadataOverrides::default()
			.with_client_name("Custom Client")
			.with_redirect_uris(["https://app.example.com/cb"])
			.with_scope("tools:read")
			.with_extra("software_id", "custom")
			.apply(defaults());

		assert_eq!(merged.client_name.as_deref(), Some("Custom Client"));
		assert_eq!(merged.client_uri.as_deref(), Some("https://default.example.com"));
		assert_eq!(merged.redirect_uris, vec!["https://app.example.com/cb".to_owned()]);
		assert_eq!(merged.scope.as_deref(), Some("tools:read"));
		assert_eq!(merged.extra.get("software_id"), Some(&Value::from("custom")));
	}

	#[test]
	fn information_flattens_metadata() {
		let info = OAuthClientInformation { client_id: "client-1".into(), metadata: defaults() };
		let payload = serde_json::to_value(&info).expect("Client information should serialize.");

		assert_eq!(payload["client_id"], "client-1");
		assert_eq!(payload["client_name"], "Default Client");
		assert_eq!(payload["software_id"], "default");
		assert!(payload.get("grant_types").is_none());
	}
}
