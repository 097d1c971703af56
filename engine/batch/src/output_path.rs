//! The single, pure output-path computation every caller must use.
//!
//! The original implementation duplicated this in three places and the
//! copies subtly diverged; here it is one function.

use std::path::{ Path, PathBuf };

/// `output_dir / template / (video_stem without trailing duplicate extensions) + ".md"`.
#[ must_use ]
pub fn output_path( output_dir : &Path, template : &str, video_path : &Path ) -> PathBuf
{
  let stem = video_stem( video_path );
  output_dir.join( template ).join( format!( "{stem}.md" ) )
}

/// The file stem with every trailing extension stripped, not just the last
/// one (`lecture.final.mp4` -> `lecture`, not `lecture.final`).
fn video_stem( video_path : &Path ) -> String
{
  let mut name = video_path.file_name().map_or_else( String::new, | n | n.to_string_lossy().into_owned() );
  while let Some( dot ) = name.rfind( '.' )
  {
    if dot == 0
    {
      break;
    }
    name.truncate( dot );
  }
  name
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn deterministic_for_fixed_inputs()
  {
    let a = output_path( Path::new( "out" ), "chinese_transcript", Path::new( "/videos/lecture.mp4" ) );
    let b = output_path( Path::new( "out" ), "chinese_transcript", Path::new( "/videos/lecture.mp4" ) );
    assert_eq!( a, b );
    assert_eq!( a, PathBuf::from( "out/chinese_transcript/lecture.md" ) );
  }

  #[ test ]
  fn strips_duplicate_extensions()
  {
    let p = output_path( Path::new( "out" ), "tmpl", Path::new( "lecture.final.mp4" ) );
    assert_eq!( p, PathBuf::from( "out/tmpl/lecture.md" ) );
  }
}
