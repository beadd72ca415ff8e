//! Tag and ingredient reference-data rules.

pub const TAG_NAME_MAX_LEN: usize = 32;
pub const TAG_SLUG_MAX_LEN: usize = 32;
pub const INGREDIENT_NAME_MAX_LEN: usize = 128;
pub const MEASUREMENT_UNIT_MAX_LEN: usize = 64;

/// `#RRGGBB`, either case.
pub fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Non-empty ASCII letters, digits, hyphens and underscores.
pub fn is_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= TAG_SLUG_MAX_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
