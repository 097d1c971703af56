//! HTTP request execution with a single reliability feature : retry.

use reqwest::{ Client, Method };
use serde::{ Deserialize, Serialize };
use core::time::Duration;
use std::time::Instant;

use crate::error::{ Error, ApiErrorResponse };

pub mod retry;

pub use retry::{ RetryConfig, RetryMetrics, execute_with_retries };

/// Configuration for a single HTTP request.
#[ derive( Debug, Clone ) ]
pub struct HttpConfig
{
  /// Request timeout in seconds (default : 30).
  pub timeout_seconds : u64,
  /// Maximum content length logged for debugging (to avoid logging huge bodies).
  pub max_log_content_length : usize,
}

impl HttpConfig
{
  /// Create default HTTP configuration.
  #[ inline ]
  #[ must_use ]
  pub fn new() -> Self
  {
    Self { timeout_seconds : 30, max_log_content_length : 1024 }
  }
}

impl Default for HttpConfig
{
  #[ inline ]
  fn default() -> Self
  {
    Self::new()
  }
}

/// Execute an HTTP request with JSON serialization/deserialization and
/// classify the response into a typed [`Error`] on failure.
///
/// # Errors
///
/// - [`Error::SerializationError`] - request body serialization failed
/// - [`Error::NetworkError`] - connectivity issue
/// - [`Error::AuthenticationError`] - 401/403
/// - [`Error::InvalidArgument`] - 400
/// - [`Error::RateLimitError`] - 429
/// - [`Error::ServerError`] - 5xx
/// - [`Error::DeserializationError`] - response body did not parse
#[ inline ]
pub async fn execute< T, R >
(
  client : &Client,
  method : Method,
  url : &str,
  api_key : &str,
  body : Option< &T >,
  config : &HttpConfig,
)
->
Result< R, Error >
where
  T : Serialize,
  R : for< 'de > Deserialize< 'de >,
{
  let start_time = Instant::now();

  let request = build_request( client, method, url, api_key, body, config )?;
  let response = send_request( client, request, config ).await?;
  let result = process_response::< R >( response, config ).await;

  let elapsed = start_time.elapsed();
  if elapsed > Duration::from_millis( 5000 )
  {
    tracing::warn!( url = %url, duration_ms = elapsed.as_secs_f64() * 1000.0, "slow HTTP request" );
  }

  result
}

fn build_request< T >
(
  client : &Client,
  method : Method,
  url : &str,
  api_key : &str,
  body : Option< &T >,
  config : &HttpConfig,
)
-> Result< reqwest::Request, Error >
where
  T : Serialize,
{
  if !url.starts_with( "http" )
  {
    return Err( Error::RequestBuilding(
      format!( "Invalid URL format '{url}': URL must start with http:// or https://" )
    ) );
  }

  let mut request_builder = client
    .request( method, url )
    .query( &[ ( "key", api_key ) ] )
    .header( "Content-Type", "application/json" )
    .header( "User-Agent", "video-upstream-rust/0.1.0" );

  if config.timeout_seconds != 30
  {
    request_builder = request_builder.timeout( Duration::from_secs( config.timeout_seconds ) );
  }

  if let Some( body ) = body
  {
    let json_body = serde_json::to_string( body )
      .map_err( |e| Error::SerializationError( format!( "Failed to serialize request body : {e}" ) ) )?;
    request_builder = request_builder.body( json_body );
  }

  request_builder.build()
    .map_err( |e| Error::RequestBuilding( format!( "Failed to build HTTP request : {e}" ) ) )
}

async fn send_request
(
  client : &Client,
  request : reqwest::Request,
  config : &HttpConfig,
)
-> Result< reqwest::Response, Error >
{
  let url = request.url().to_string();

  client
    .execute( request )
    .await
    .map_err( |e| {
      if e.is_timeout()
      {
        Error::NetworkError( format!( "Request timeout after {}s : {e}", config.timeout_seconds ) )
      }
      else if e.is_connect()
      {
        Error::NetworkError( format!( "Connection failed to {url}: {e}" ) )
      }
      else if e.is_request()
      {
        Error::RequestBuilding( format!( "Request configuration error : {e}" ) )
      }
      else
      {
        Error::NetworkError( format!( "Network error : {e}" ) )
      }
    } )
}

async fn process_response< R >( response : reqwest::Response, config : &HttpConfig ) -> Result< R, Error >
where
  R : for< 'de > Deserialize< 'de >,
{
  let status = response.status();
  let status_code = status.as_u16();

  let response_text = response.text().await
    .map_err( |e| Error::NetworkError( format!( "Failed to read response body : {e}" ) ) )?;

  if status.is_success()
  {
    serde_json ::from_str( &response_text )
      .map_err( |e| Error::DeserializationError(
        format!( "Failed to parse successful response as JSON: {e}. Response content : {}",
          if response_text.len() > config.max_log_content_length
          {
            format!( "{}...", &response_text[..config.max_log_content_length] )
          }
          else
          {
            response_text
          }
        )
      ) )
  }
  else
  {
    Err( classify_error_response( status_code, &response_text ) )
  }
}

/// Classify an HTTP error response into a typed [`Error`].
fn classify_error_response( status_code : u16, response_text : &str ) -> Error
{
  let message = if let Ok( api_error ) = serde_json::from_str::< ApiErrorResponse >( response_text )
  {
    format!( "HTTP {status_code}: {}", api_error.error.message )
  }
  else
  {
    format!( "HTTP {status_code}: {response_text}" )
  };

  if is_authentication_error( response_text ) || matches!( status_code, 401 | 403 )
  {
    Error::AuthenticationError( message )
  }
  else
  {
    match status_code
    {
      400 => Error::InvalidArgument( message ),
      429 => Error::RateLimitError( message ),
      500..=599 => Error::ServerError( message ),
      _ => Error::ApiError( message ),
    }
  }
}

#[ inline ]
fn is_authentication_error( message : &str ) -> bool
{
  let msg_lower = message.to_lowercase();

  msg_lower.contains( "api key" ) ||
  msg_lower.contains( "authentication" ) ||
  msg_lower.contains( "unauthorized" ) ||
  msg_lower.contains( "forbidden" ) ||
  msg_lower.contains( "permission" ) ||
  msg_lower.contains( "access denied" ) ||
  msg_lower.contains( "invalid key" ) ||
  msg_lower.contains( "expired key" )
}

/// Execute an HTTP request with default configuration.
///
/// # Errors
///
/// Same as [`execute`].
#[ inline ]
pub async fn execute_legacy< T, R >
(
  client : &Client,
  method : Method,
  url : &str,
  api_key : &str,
  body : Option< &T >,
)
->
Result< R, Error >
where
  T : Serialize,
  R : for< 'de > Deserialize< 'de >,
{
  execute( client, method, url, api_key, body, &HttpConfig::default() ).await
}
