//! Request signing contracts that attach provider-issued headers to outbound requests.

// self
#[cfg(feature = "reqwest")] use crate::error::ConfigError;
use crate::{
	_prelude::*,
	provider::{AuthHeaders, HeaderProvider},
};

/// Describes how to attach [`AuthHeaders`] to an outbound request without constraining the HTTP
/// client type.
pub trait RequestSignerExt<Request>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and returns it with every header attached.
	fn attach_headers(&self, request: Request, headers: &AuthHeaders) -> Result<Request>;
}

/// Signer for [`reqwest::RequestBuilder`].
///
/// Header names and values are validated before anything is attached, and the `Authorization`
/// value is flagged as sensitive so reqwest redacts it from its own debug output.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqwestSigner;
#[cfg(feature = "reqwest")]
impl RequestSignerExt<reqwest::RequestBuilder> for ReqwestSigner {
	fn attach_headers(
		&self,
		request: reqwest::RequestBuilder,
		headers: &AuthHeaders,
	) -> Result<reqwest::RequestBuilder> {
		use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

		let mut map = HeaderMap::with_capacity(headers.len());

		for (name, value) in headers {
			let invalid = || ConfigError::InvalidHeader { name: name.clone() };
			let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
			let mut header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

			if header_name == header::AUTHORIZATION {
				header_value.set_sensitive(true);
			}

			map.insert(header_name, header_value);
		}

		Ok(request.headers(map))
	}
}

/// Fetches headers from `provider` and attaches them to `request` through `signer`.
pub async fn sign_with<P, S, R>(provider: &P, signer: &S, request: R) -> Result<R>
where
	P: ?Sized + HeaderProvider,
	S: ?Sized + RequestSignerExt<R>,
{
	let headers = provider.headers().await?;

	signer.attach_headers(request, &headers)
}
