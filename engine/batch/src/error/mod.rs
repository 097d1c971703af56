//! Errors that can occur while driving a batch through the engine.

use error_tools::dependency::thiserror;

/// The closed error taxonomy every classified failure belongs to.
///
/// This is the abstract taxonomy the Upstream Adapter boundary classifies
/// raw upstream messages into; the Orchestrator only ever sees one of these
/// variants, never a raw transport error.
#[ derive( Debug, Clone, PartialEq, thiserror::Error ) ]
pub enum EngineError
{
  /// Transient network failure (connection reset, DNS, timeout at the transport layer).
  #[ error( "network error: {0}" ) ]
  NetworkError( String ),

  /// HTTP 429 or an equivalent upstream rate-limit signal.
  #[ error( "rate limited: {0}" ) ]
  RateLimit( String ),

  /// The credential's quota has been exhausted.
  #[ error( "quota exhausted: {0}" ) ]
  QuotaExhausted( String ),

  /// A local filesystem problem (missing file, permission denied, unreadable).
  #[ error( "file error: {0}" ) ]
  FileError( String ),

  /// Credential rejected by the upstream service.
  #[ error( "authentication error: {0}" ) ]
  AuthError( String ),

  /// Upstream 5xx.
  #[ error( "server error: {0}" ) ]
  ServerError( String ),

  /// Upstream 4xx other than auth/rate-limit.
  #[ error( "client error: {0}" ) ]
  ClientError( String ),

  /// Content policy rejection, unsupported video, model unavailable, or similar.
  #[ error( "upstream domain error: {0}" ) ]
  UpstreamDomainError( String ),

  /// A per-task or per-call deadline was exceeded.
  #[ error( "timeout: {0}" ) ]
  TimeoutError( String ),

  /// A persisted state file failed its checksum or could not be parsed.
  #[ error( "state corruption: {0}" ) ]
  StateCorruption( String ),

  /// A configuration value was missing or invalid at build time.
  #[ error( "configuration error: {0}" ) ]
  ConfigError( String ),

  /// Catch-all for anything that does not match a more specific class.
  #[ error( "unknown error: {0}" ) ]
  Unknown( String ),
}

impl EngineError
{
  /// The raw message carried by any variant, with the classification label stripped.
  #[ must_use ]
  #[ inline ]
  pub fn message( &self ) -> &str
  {
    match self
    {
      Self::NetworkError( m )
      | Self::RateLimit( m )
      | Self::QuotaExhausted( m )
      | Self::FileError( m )
      | Self::AuthError( m )
      | Self::ServerError( m )
      | Self::ClientError( m )
      | Self::UpstreamDomainError( m )
      | Self::TimeoutError( m )
      | Self::StateCorruption( m )
      | Self::ConfigError( m )
      | Self::Unknown( m ) => m,
    }
  }
}

impl From< video_upstream::error::Error > for EngineError
{
  #[ inline ]
  fn from( err : video_upstream::error::Error ) -> Self
  {
    use video_upstream::error::Error as UpstreamError;
    match err
    {
      UpstreamError::AuthenticationError( m ) => Self::AuthError( m ),
      UpstreamError::RateLimitError( m ) => Self::RateLimit( m ),
      UpstreamError::TimeoutError( m ) => Self::TimeoutError( m ),
      UpstreamError::NetworkError( m ) => Self::NetworkError( m ),
      UpstreamError::ServerError( m ) => Self::ServerError( m ),
      UpstreamError::NotFound( m ) => Self::FileError( m ),
      UpstreamError::ValidationError { message } => Self::ClientError( message ),
      other => Self::Unknown( other.to_string() ),
    }
  }
}
