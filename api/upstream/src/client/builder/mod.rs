//! Client builder for configuring the upstream video-generation client.

use core::time::Duration;
use reqwest;
use crate::error::Error;
use super::Client;

mod setters_core;
mod setters_retry;

  /// Builder for configuring and constructing a `Client` instance.
  #[ derive( Debug ) ]
  pub struct ClientBuilder
  {
    base_url : String,
    api_key : Option< String >,
    timeout : Duration,
    max_retries : u32,
    base_delay : Duration,
    max_delay : Duration,
    enable_jitter : bool,
    backoff_multiplier : f64,
    max_elapsed_time : Option< Duration >,
    request_timeout : Option< Duration >,
    enable_retry_metrics : bool,
  }

  impl Default for ClientBuilder
  {
    #[ inline ]
    fn default() -> Self
    {
      Self::new()
    }
  }

  impl ClientBuilder
  {
      /// Creates a new `ClientBuilder` with default settings.
    #[ must_use ]
    #[ inline ]
    pub fn new() -> Self
    {
        ClientBuilder
        {
          base_url : "https://generativelanguage.googleapis.com".to_string(),
          api_key : None,
          timeout : Duration::from_secs( 30 ),
          max_retries : 3,
          base_delay : Duration::from_millis( 100 ),
          max_delay : Duration::from_secs( 10 ),
          enable_jitter : true,
          backoff_multiplier : 2.0,
          max_elapsed_time : Some( Duration::from_secs( 60 ) ),
          request_timeout : None,
          enable_retry_metrics : false,
        }
    }

      /// Builds the `Client` with the configured settings.
      ///
      /// # Errors
      ///
      /// Returns an error if the API key is missing or empty, or if the
      /// retry/backoff configuration is internally inconsistent.
    #[ inline ]
    pub fn build( self ) -> Result< Client, Error >
    {
        let api_key = self.api_key
          .ok_or_else( || Error::AuthenticationError( "API key is required".to_string() ) )?;

        if api_key.is_empty()
        {
          return Err( Error::AuthenticationError( "API key cannot be empty".to_string() ) );
        }

        if self.backoff_multiplier <= 1.0
        {
          return Err( Error::InvalidArgument(
            format!( "Backoff multiplier must be greater than 1.0, got : {0}", self.backoff_multiplier )
          ) );
        }

        if self.base_delay >= self.max_delay
        {
          return Err( Error::InvalidArgument(
            "Base delay must be less than max delay".to_string()
          ) );
        }

        let http_client = reqwest::Client::builder()
          .timeout( self.timeout )
          .build()
          .map_err( |e| Error::NetworkError( format!( "Failed to create HTTP client : {e}" ) ) )?;

        Ok( Client
        {
          api_key,
          base_url : self.base_url,
          http : http_client,
          timeout : self.timeout,
          max_retries : self.max_retries,
          base_delay : self.base_delay,
          max_delay : self.max_delay,
          enable_jitter : self.enable_jitter,
          backoff_multiplier : self.backoff_multiplier,
          max_elapsed_time : self.max_elapsed_time,
        } )
    }
  }
