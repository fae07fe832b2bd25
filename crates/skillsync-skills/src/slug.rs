//! Skill name → Markdown filename.

/// Extension of every generated skill file.
pub const SKILL_EXTENSION: &str = "md";

const EMPTY_SLUG: &str = "skill";

/// Derive a filesystem-safe slug from a display name.
///
/// Drops everything except alphanumerics, whitespace, `_` and `-`, lowercases,
/// and turns each run of whitespace/hyphens into a single `-`. Leading and
/// trailing separators are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Filename for a skill: `"Git Basics"` → `"git-basics.md"`.
pub fn skill_filename(name: &str) -> String {
    format!("{}.{}", slugify(name), SKILL_EXTENSION)
}
