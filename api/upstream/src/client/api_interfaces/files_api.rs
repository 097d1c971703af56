//! API handle for video file upload and lifecycle operations.

use crate::error::Error;
use super::super::Client;

/// API handle for video file upload, polling, and deletion.
///
/// Provides direct access to server-side file storage without client-side
/// logic : every decision about when to poll or when to give up belongs to
/// the caller (the engine's upstream-adapter driver), not to this crate.
#[ derive( Debug ) ]
pub struct FilesApi< 'a >
{
    pub( crate ) client : &'a Client,
}

impl FilesApi< '_ >
{
  /// Upload a video file to the upstream service.
  ///
  /// The returned [`FileMetadata`](crate::models::FileMetadata) has a `state`
  /// of `"PROCESSING"` immediately after upload; callers must poll [`Self::get`]
  /// until the state becomes `"ACTIVE"` before referencing the file in a
  /// generate-content call.
  ///
  /// # Errors
  ///
  /// - [`Error::NetworkError`] - connectivity issue or timeout
  /// - [`Error::AuthenticationError`] - invalid or missing API key
  /// - [`Error::ServerError`] - upstream 5xx
  /// - [`Error::ApiError`] - file too large or unsupported MIME type
  #[ inline ]
  pub async fn upload( &self, request : &crate::models::UploadFileRequest ) -> Result< crate::models::UploadFileResponse, Error >
  {
    let url = format!( "{}/upload/v1beta/files", self.client.base_url );

    let form = reqwest::multipart::Form::new()
      .part( "file", reqwest::multipart::Part::bytes( request.file_data.clone() )
        .mime_str( &request.mime_type.clone() )?
        .file_name( request.display_name.as_deref().unwrap_or( "video" ).to_string() ) );

    let response = self.client.http
      .post( &url )
      .header( "X-Goog-Api-Key", &self.client.api_key )
      .multipart( form )
      .send()
      .await
      .map_err( Error::from )?;

    if response.status().is_success()
    {
      let upload_response : crate::models::UploadFileResponse = response
        .json()
        .await
        .map_err( |e| Error::DeserializationError( e.to_string() ) )?;
      Ok( upload_response )
    }
    else
    {
      let status = response.status();
      let text = response.text().await.unwrap_or_else( |_| "failed to read error response".to_string() );
      Err( Error::ApiError( format!( "HTTP {status}: {text}" ) ) )
    }
  }

  /// List files previously uploaded under this API key.
  ///
  /// # Errors
  ///
  /// See [`Self::upload`].
  #[ inline ]
  pub async fn list( &self ) -> Result< crate::models::ListFilesResponse, Error >
  {
    let url = format!( "{}/v1beta/files", self.client.base_url );

    crate ::internal::http::execute_legacy::< (), crate::models::ListFilesResponse >
    (
      &self.client.http,
      reqwest ::Method::GET,
      &url,
      &self.client.api_key,
      None,
    )
    .await
  }

  /// Get current metadata (including processing `state`) for an uploaded file.
  ///
  /// # Errors
  ///
  /// - [`Error::ApiError`] - file not found (404)
  /// - see [`Self::upload`] for the rest.
  #[ inline ]
  pub async fn get( &self, file_name : &str ) -> Result< crate::models::FileMetadata, Error >
  {
    let url = format!( "{}/v1beta/{}", self.client.base_url, file_name );

    crate ::internal::http::execute_legacy::< (), crate::models::FileMetadata >
    (
      &self.client.http,
      reqwest ::Method::GET,
      &url,
      &self.client.api_key,
      None,
    )
    .await
  }

  /// Permanently delete an uploaded file.
  ///
  /// # Errors
  ///
  /// - [`Error::ApiError`] - file not found (404) or deletion rejected
  /// - see [`Self::upload`] for the rest.
  #[ inline ]
  pub async fn delete( &self, file_name : &str ) -> Result< (), Error >
  {
    let url = format!( "{}/v1beta/{}", self.client.base_url, file_name );

    let response = self.client.http
      .delete( &url )
      .header( "X-Goog-Api-Key", &self.client.api_key )
      .send()
      .await
      .map_err( Error::from )?;

    if response.status().is_success()
    {
      Ok( () )
    }
    else
    {
      let status = response.status();
      let text = response.text().await.unwrap_or_else( |_| "failed to read error response".to_string() );
      Err( Error::ApiError( format!( "HTTP {status}: {text}" ) ) )
    }
  }
}
