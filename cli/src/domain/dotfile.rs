//! Pure line logic for dotfiles.
//!
//! Lines are compared after trimming trailing whitespace so a file saved by an
//! editor that strips or adds trailing spaces does not cause a duplicate.

/// Returns `true` if `line` is already present in `content`.
#[must_use]
pub fn contains_line(content: &str, line: &str) -> bool {
    let wanted = line.trim_end();
    content.lines().any(|l| l.trim_end() == wanted)
}

/// Returns the lines from `lines` that are not yet present in `content`,
/// preserving order and dropping repeats within `lines` itself.
#[must_use]
pub fn missing_lines<'a>(content: &str, lines: &'a [String]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.as_str();
        if !contains_line(content, line)
            && !missing.iter().any(|m| m.trim_end() == line.trim_end())
        {
            missing.push(line);
        }
    }
    missing
}

/// Build the text to append so `content` gains `line` on its own line.
///
/// Returns `None` when the line is already present.
#[must_use]
pub fn append_text(content: &str, line: &str) -> Option<String> {
    if contains_line(content, line) {
        return None;
    }
    let mut text = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(line.trim_end());
    text.push('\n');
    Some(text)
}
