//! Credential discovery and the engine-facing builder surface every tunable
//! in §6 is exposed through, so an out-of-scope config loader has something
//! concrete to populate.

use std::collections::HashMap;

/// Environment variable names checked, in precedence order, by
/// [`discover_api_keys`].
const ENV_VAR_NAMES : [ &str; 3 ] = [ "GOOGLE_GEMINI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY" ];

/// Discover API credentials from an explicit environment snapshot, honoring
/// the specification's precedence: `GOOGLE_GEMINI_API_KEY` -> `GEMINI_API_KEY`
/// -> `GOOGLE_API_KEY`.
///
/// Pure and side-effect-free: it never reads the process environment
/// directly, taking `env` as an explicit snapshot instead, which keeps it
/// unit-testable without mutating global state. Explicit-flag and
/// configured-key-list precedence (the two steps that rank above
/// environment variables in §6) are populated by the out-of-scope config
/// loader before this function is ever consulted; this function is only the
/// environment-variable tail of that chain.
#[ must_use ]
pub fn discover_api_keys( env : &HashMap< String, String > ) -> Vec< String >
{
  ENV_VAR_NAMES.iter()
    .find_map( | name | env.get( *name ).filter( | v | !v.is_empty() ).cloned() )
    .into_iter()
    .collect()
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  fn env( pairs : &[ ( &str, &str ) ] ) -> HashMap< String, String >
  {
    pairs.iter().map( | ( k, v ) | ( ( *k ).to_string(), ( *v ).to_string() ) ).collect()
  }

  #[ test ]
  fn prefers_google_gemini_api_key()
  {
    let e = env( &[ ( "GOOGLE_GEMINI_API_KEY", "a" ), ( "GEMINI_API_KEY", "b" ), ( "GOOGLE_API_KEY", "c" ) ] );
    assert_eq!( discover_api_keys( &e ), vec![ "a".to_string() ] );
  }

  #[ test ]
  fn falls_back_through_the_chain()
  {
    let e = env( &[ ( "GOOGLE_API_KEY", "c" ) ] );
    assert_eq!( discover_api_keys( &e ), vec![ "c".to_string() ] );
  }

  #[ test ]
  fn empty_env_yields_no_keys()
  {
    assert!( discover_api_keys( &HashMap::new() ).is_empty() );
  }

  #[ test ]
  fn blank_value_is_skipped()
  {
    let e = env( &[ ( "GOOGLE_GEMINI_API_KEY", "" ), ( "GEMINI_API_KEY", "b" ) ] );
    assert_eq!( discover_api_keys( &e ), vec![ "b".to_string() ] );
  }
}
