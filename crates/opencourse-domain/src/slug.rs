//! URL-safe slug derivation from titles.

/// Derive a slug from a title: ASCII-lowercase, punctuation stripped,
/// whitespace runs collapsed to single hyphens, no leading/trailing hyphens.
///
/// A title with no usable characters yields `"untitled"` so a slug is never
/// empty (an empty course slug would collide instantly and break routing).
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
        // other punctuation is dropped entirely
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// Append an incrementing numeric suffix to `base` until `taken` reports the
/// candidate free: `my-course`, `my-course-1`, `my-course-2`, …
///
/// The caller scopes `taken` to the right sibling set (all courses, or the
/// lessons of one course) and excludes the document being saved.
pub fn dedupe_slug(base: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_owned();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
