//! API handle for content generation against an uploaded file.

use crate::error::Error;
use super::super::Client;

/// API handle for issuing generate-content calls.
#[ derive( Debug ) ]
pub struct GenerateApi< 'a >
{
    pub( crate ) client : &'a Client,
}

impl GenerateApi< '_ >
{
  /// Issue a generate-content call for the given model.
  ///
  /// `model` is a bare model id such as `gemini-1.5-flash`; this method
  /// qualifies it into the upstream path.
  ///
  /// # Errors
  ///
  /// - [`Error::RateLimitError`] - HTTP 429, quota or rate-limit exhaustion
  /// - [`Error::ServerError`] - upstream 5xx
  /// - [`Error::ApiError`] - any other non-success response
  #[ inline ]
  pub async fn generate_content
  (
    &self,
    model : &str,
    request : &crate::models::GenerateContentRequest,
  )
  -> Result< crate::models::GenerateContentResponse, Error >
  {
    let url = format!( "{}/v1beta/models/{model}:generateContent", self.client.base_url );

    crate::internal::http::execute_with_retries
    (
      &self.client.http,
      reqwest::Method::POST,
      &url,
      &self.client.api_key,
      Some( request ),
      &crate::internal::http::HttpConfig::default(),
      self.client.to_retry_config().as_ref(),
    )
    .await
  }
}
