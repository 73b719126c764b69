//! Authoring descriptor (`dvd.xml`) for the authoring tool.
//!
//! One title set, one title, one program chain, one media file.

use std::fs;
use std::io;
use std::path::Path;

/// Render the descriptor referencing `media_ref`.
///
/// `media_ref` is written verbatim (after XML escaping), so callers pick
/// the form the authoring tool will resolve: a bare file name relative to
/// the tool's working directory, or a translated absolute path.
pub fn render(media_ref: &str) -> String {
    format!(
        "<dvdauthor>\n  <vmgm />\n  <titleset>\n    <titles>\n      <pgc>\n        <vob file=\"{}\" />\n      </pgc>\n    </titles>\n  </titleset>\n</dvdauthor>\n",
        escape_attr(media_ref)
    )
}

/// Write the descriptor to `path`, replacing any previous one.
pub fn emit(path: &Path, media_ref: &str) -> io::Result<()> {
    fs::write(path, render(media_ref))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
