//! Core Client struct and implementation.

use core::time::Duration;
use reqwest;
use crate::error::Error;
use super::builder::ClientBuilder;

  /// The main client for interacting with the upstream video-generation service.
  ///
  /// ## Design principle : thin client
  ///
  /// This client provides transparent access to the upstream endpoints without
  /// client-side intelligence or automatic behaviors beyond its own internal
  /// retry loop. All operations are explicit HTTP calls with no hidden logic.
  ///
  /// # Examples
  ///
  /// ```rust,no_run
  /// use video_upstream::client::Client;
  ///
  /// #[ tokio::main ]
  /// async fn main() -> Result< (), Box< dyn std::error::Error > >
  /// {
  ///   let client = Client::new()?;
  ///   let files = client.files().list().await?;
  ///   println!( "Uploaded files : {}", files.files.len() );
  ///   Ok( () )
  /// }
  /// ```
  #[ derive( Debug, Clone ) ]
  pub struct Client
  {
    pub( crate ) api_key : String,
    pub( crate ) base_url : String,
    pub( crate ) http : reqwest::Client,
    pub( crate ) timeout : Duration,
    pub( crate ) max_retries : u32,
    pub( crate ) base_delay : Duration,
    pub( crate ) max_delay : Duration,
    pub( crate ) enable_jitter : bool,
    pub( crate ) backoff_multiplier : f64,
    pub( crate ) max_elapsed_time : Option< Duration >,
  }

  impl Client
  {
      /// Create a new client builder.
    #[ must_use ]
    #[ inline ]
    pub fn builder() -> ClientBuilder
    {
        ClientBuilder::new()
    }

      /// Create a new client using an API key discovered from the environment.
      ///
      /// Tries, in order : `GOOGLE_GEMINI_API_KEY`, `GEMINI_API_KEY`, `GOOGLE_API_KEY`.
      /// Credential discovery order and precedence over explicit configuration
      /// is the engine crate's concern (see `discover_api_keys`); this
      /// constructor is a convenience for standalone use of this client.
      ///
      /// # Errors
      ///
      /// Returns an error if none of the environment variables are set, or if
      /// the client cannot be built.
    #[ inline ]
    pub fn new() -> Result< Client, Error >
    {
        let api_key = [ "GOOGLE_GEMINI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY" ]
          .into_iter()
          .find_map( | name | std::env::var( name ).ok().filter( | v | !v.is_empty() ) )
          .ok_or_else( || Error::AuthenticationError(
            "no API key found in GOOGLE_GEMINI_API_KEY, GEMINI_API_KEY or GOOGLE_API_KEY".to_string()
          ) )?;

        Self::builder()
          .api_key( api_key )
          .build()
    }

      /// Returns a handle to the Files API (upload / get / list / delete).
    #[ must_use ]
    #[ inline ]
    pub fn files( &self ) -> super::api_interfaces::FilesApi< '_ >
    {
      super::api_interfaces::FilesApi { client : self }
    }

      /// Returns a handle to the content-generation API.
    #[ must_use ]
    #[ inline ]
    pub fn generate( &self ) -> super::api_interfaces::GenerateApi< '_ >
    {
      super::api_interfaces::GenerateApi { client : self }
    }

    /// Convert the client's retry configuration into the HTTP layer's `RetryConfig`.
    pub( crate ) fn to_retry_config( &self ) -> Option< crate::internal::http::RetryConfig >
    {
      if self.max_retries == 0
      {
        None
      }
      else
      {
        Some( crate::internal::http::RetryConfig {
          max_retries : self.max_retries,
          base_delay : self.base_delay,
          max_delay : self.max_delay,
          backoff_multiplier : self.backoff_multiplier,
          enable_jitter : self.enable_jitter,
          max_elapsed_time : self.max_elapsed_time,
        } )
      }
    }
  }
