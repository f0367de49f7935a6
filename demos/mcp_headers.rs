//! Demonstrates feeding a token endpoint into both MCP-facing surfaces: a bearer header provider
//! signing reqwest requests, and the OAuth client-provider adapter.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use token_bridge::{
	auth::TokenResponse,
	error::Error,
	ext::{ReqwestSigner, sign_with},
	oauth::{OAuthClientProvider, TokenProviderAdapter},
	provider::{BearerHeaderProvider, CachingTokenProvider, HeaderProvider, source},
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-access\",\"expiresInMs\":900000,\"type\":\"Bearer\"}");
		})
		.await;
	let mcp_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/mcp").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let http = Client::new();
	let token_url = server.url("/token");
	let fetches = Arc::new(AtomicUsize::new(0));
	let counter = fetches.clone();
	let token_source = source::from_fn(move || {
		let http = http.clone();
		let token_url = token_url.clone();

		counter.fetch_add(1, Ordering::SeqCst);

		async move {
			let body = http
				.post(token_url)
				.send()
				.await
				.and_then(|response| response.error_for_status())
				.map_err(Error::refresh)?
				.text()
				.await
				.map_err(Error::refresh)?;

			TokenResponse::from_json(&body)
		}
	});
	let provider = Arc::new(CachingTokenProvider::new(token_source));
	let headers = BearerHeaderProvider::from_provider(CachingTokenProvider::new(provider.clone()));

	println!("Headers: {:?}.", headers.headers().await?.keys().collect::<Vec<_>>());

	let request = sign_with(&headers, &ReqwestSigner, Client::new().post(server.url("/mcp"))).await?;

	request.send().await?.error_for_status()?;

	let adapter = TokenProviderAdapter::new(provider);
	let tokens = adapter.tokens().await.ok_or_else(|| color_eyre::eyre::eyre!("No tokens."))?;

	println!("Adapter tokens: {tokens:?}.");
	println!("Token endpoint calls: {}.", fetches.load(Ordering::SeqCst));

	token_mock.assert_async().await;
	mcp_mock.assert_async().await;

	Ok(())
}
