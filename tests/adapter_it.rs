// std
use std::{
	io,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use time::{Duration, macros};
// self
use token_bridge::{
	auth::RawTokenRecord,
	clock::ManualClock,
	oauth::{
		OAuthClientMetadataOverrides, OAuthClientProvider, TOKEN_CACHE_TTL, TokenProviderAdapter,
		TokenProviderAdapterOptions,
	},
	provider::{CachingTokenProvider, source},
	url::Url,
};

#[tokio::test]
async fn adapter_over_caching_provider_serves_oauth_tokens() {
	let clock = ManualClock::new(macros::datetime!(2025-06-01 12:00 UTC));
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let expires_at = macros::datetime!(2025-06-01 13:00 UTC);
	let provider = CachingTokenProvider::new(source::from_fn(move || {
		counter.fetch_add(1, Ordering::SeqCst);

		async move { Ok::<_, io::Error>(RawTokenRecord::new("abc").with_expires_at(expires_at)) }
	}))
	.with_clock(Arc::new(clock.clone()));
	let adapter = TokenProviderAdapter::new(provider).with_clock(Arc::new(clock.clone()));
	let tokens = adapter.tokens().await.expect("Adapter should produce tokens.");

	assert_eq!(tokens.access_token, "abc");
	assert_eq!(tokens.token_type, "Bearer");
	assert_eq!(tokens.expires_in, Some(3_600));
	assert_eq!(tokens.authorization_value(), "Bearer abc");

	clock.advance(TOKEN_CACHE_TTL + Duration::seconds(25));

	let later = adapter.tokens().await.expect("Adapter should produce tokens.");

	assert_eq!(later.expires_in, Some(3_570));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn adapter_reports_failures_as_missing_tokens() {
	let adapter = TokenProviderAdapter::new(source::from_fn(|| async {
		Err::<String, _>(io::Error::other("token endpoint returned 500"))
	}));

	assert!(adapter.tokens().await.is_none());
	assert_eq!(adapter.metrics().failures(), 1);
}

#[test]
fn adapter_identity_honors_options() -> color_eyre::Result<()> {
	let options = TokenProviderAdapterOptions::default()
		.with_client_id("mcp-gateway")
		.with_redirect_url(Url::parse("https://gateway.example.com/callback")?)
		.with_client_metadata(
			OAuthClientMetadataOverrides::default()
				.with_client_name("Gateway")
				.with_grant_types(["client_credentials"]),
		);
	let adapter = TokenProviderAdapter::with_options(
		source::from_fn(|| async { Ok::<_, io::Error>("unused") }),
		options,
	);
	let info = adapter.client_information().ok_or_else(|| color_eyre::eyre::eyre!("missing"))?;

	assert_eq!(info.client_id, "mcp-gateway");
	assert_eq!(info.metadata.client_name.as_deref(), Some("Gateway"));
	assert_eq!(info.metadata.redirect_uris, vec!["https://gateway.example.com/callback".to_owned()]);
	assert_eq!(info.metadata.grant_types, Some(vec!["client_credentials".to_owned()]));
	assert!(!adapter.capabilities().supports_authorization_code());

	Ok(())
}
