use regex::Regex;

use crate::models::Chunk;

fn absolute_url_patterns() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://").expect("invalid scheme regex"),
        Regex::new(r"^//").expect("invalid protocol-relative regex"),
        Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
      ]
    })
    .as_slice()
}

/// Determine whether a path is already a complete URL that storage should leave alone.
pub fn is_absolute_url(value: &str) -> bool {
  absolute_url_patterns()
    .iter()
    .any(|pattern| pattern.is_match(value))
}

/// Lazily keep only chunks whose name ends with `.<extension>`, preserving order.
pub fn filter_by_extension<I>(bundle: I, extension: &str) -> impl Iterator<Item = Chunk> + use<I>
where
  I: IntoIterator<Item = Chunk>,
{
  let suffix = format!(".{extension}");
  bundle
    .into_iter()
    .filter(move |chunk| chunk.name.ends_with(&suffix))
}
