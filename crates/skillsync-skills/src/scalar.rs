//! Scalar styling for emitted YAML (the skills document and Markdown frontmatter).
//!
//! Every string goes through [`ScalarStyle::for_str`], which picks one of a
//! closed set of styles; [`format_scalar`] then renders it for a given
//! indentation. Output is never line-wrapped.

/// How a string scalar is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted. Only used when the text reads back as the identical string.
    Plain,
    /// `"..."` with JSON-compatible escapes.
    DoubleQuoted,
    /// `|` block for multi-line text.
    Literal,
}

impl ScalarStyle {
    pub fn for_str(s: &str) -> Self {
        if s.contains('\n') {
            if literal_safe(s) {
                return ScalarStyle::Literal;
            }
            return ScalarStyle::DoubleQuoted;
        }
        if s.contains('\'') {
            return ScalarStyle::DoubleQuoted;
        }
        if plain_safe(s) {
            ScalarStyle::Plain
        } else {
            ScalarStyle::DoubleQuoted
        }
    }
}

/// Render `s` as the value of a mapping entry or sequence item.
///
/// `indent` is the column of the owning key; literal block content is placed
/// two columns deeper. The returned text has no trailing newline for plain and
/// quoted styles; literal blocks end with their own line breaks.
pub fn format_scalar(s: &str, indent: usize) -> String {
    match ScalarStyle::for_str(s) {
        ScalarStyle::Plain => s.to_string(),
        ScalarStyle::DoubleQuoted => double_quoted(s),
        ScalarStyle::Literal => literal_block(s, indent),
    }
}

/// Whether the scalar rendered by [`format_scalar`] already ends its line.
pub fn ends_line(s: &str) -> bool {
    ScalarStyle::for_str(s) == ScalarStyle::Literal
}

fn plain_safe(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return false;
    }
    // Whatever the YAML parser makes of the bare text must be this very string.
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(s),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == s
    )
}

fn literal_safe(s: &str) -> bool {
    if s.contains('\r') || s.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return false;
    }
    // A block needs at least one line with content.
    s.lines().any(|l| !l.trim().is_empty())
}

fn double_quoted(s: &str) -> String {
    // JSON string escapes are a subset of YAML double-quoted escapes.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.replace('"', "\\\"")))
}

fn literal_block(s: &str, indent: usize) -> String {
    let chomp = if !s.ends_with('\n') {
        "-"
    } else if s.ends_with("\n\n") {
        "+"
    } else {
        ""
    };
    let first_content = s.lines().find(|l| !l.is_empty()).unwrap_or("");
    let indicator = if first_content.starts_with(' ') { "2" } else { "" };

    let pad = " ".repeat(indent + 2);
    let body = s.strip_suffix('\n').unwrap_or(s);
    let mut out = format!("|{indicator}{chomp}\n");
    for line in body.split('\n') {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
