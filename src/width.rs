//! Terminal display width helpers.
//!
//! Hint tables are padded by display width so wide glyphs (arrows) and ANSI
//! styling supplied by hosts do not break column alignment.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}
