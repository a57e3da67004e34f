/// Strip any leading directories from a chunk URL, keeping only the file name.
///
/// `/tmp/demo/test.jpg` becomes `test.jpg`; a URL without a `/` is returned untouched.
pub fn chunk_file_name(url: &str) -> &str {
  url.rsplit_once('/').map_or(url, |(_, file_name)| file_name)
}
