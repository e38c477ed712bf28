/// Lowercase, hyphen-separated form of a display name.
///
/// Whitespace, `-` and `_` separate words; any other punctuation is dropped
/// without splitting, so `"Men's Shoes"` becomes `"mens-shoes"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    slug
}
