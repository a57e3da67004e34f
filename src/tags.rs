//! HTML tag rendering for bundle chunks.

const SCRIPT_SUFFIXES: [&str; 2] = [".js", ".js.gz"];
const STYLESHEET_SUFFIXES: [&str; 2] = [".css", ".css.gz"];

/// Kind of tag a chunk is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
  /// `<script>` tag for JavaScript chunks.
  Script,
  /// `<link rel="stylesheet">` tag for CSS chunks.
  Stylesheet,
}

impl TagKind {
  /// Classify a chunk by file name; `None` for chunks that produce no tag.
  pub fn for_chunk_name(name: &str) -> Option<Self> {
    if SCRIPT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
      Some(Self::Script)
    } else if STYLESHEET_SUFFIXES
      .iter()
      .any(|suffix| name.ends_with(suffix))
    {
      Some(Self::Stylesheet)
    } else {
      None
    }
  }

  /// Render the tag for `url`, splicing `attrs` in verbatim.
  pub fn render(self, url: &str, attrs: &str) -> String {
    match self {
      Self::Script => format!(r#"<script type="text/javascript" src="{url}" {attrs}></script>"#),
      Self::Stylesheet => {
        format!(r#"<link type="text/css" href="{url}" rel="stylesheet" {attrs}/>"#)
      }
    }
  }
}
