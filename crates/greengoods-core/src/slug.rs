//! Deterministic slug and SEO-field derivation.
//!
//! All functions here are pure: given the same name/description they always
//! produce the same output, so repeated imports never churn SEO fields.

/// Maximum length of a derived meta description, per common SERP truncation.
const META_DESCRIPTION_MAX_CHARS: usize = 160;

/// Derives a URL slug from a product name.
///
/// Lowercases the input, collapses every run of non-alphanumeric characters
/// to a single hyphen, and strips leading/trailing hyphens. The result
/// contains only `[a-z0-9-]` with no doubled, leading, or trailing hyphen.
/// Slugs are not guaranteed globally unique.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Default meta title: `"<name> - Premium Quality"`.
///
/// An absent upstream name degrades to an empty-name title rather than an
/// error; the import boundary is responsible for flagging nameless products.
#[must_use]
pub fn default_meta_title(name: &str) -> String {
    format!("{name} - Premium Quality")
}

/// Default meta description: the first 160 characters of the description.
///
/// Counted in characters, not bytes, so multi-byte text is never split
/// mid-codepoint.
#[must_use]
pub fn default_meta_description(description: &str) -> String {
    description.chars().take(META_DESCRIPTION_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic_name() {
        assert_eq!(slugify("Eco Mug"), "eco-mug");
    }

    #[test]
    fn slugify_collapses_nonalnum_runs() {
        assert_eq!(slugify("Bamboo  &  Cork Lid!"), "bamboo-cork-lid");
    }

    #[test]
    fn slugify_strips_leading_and_trailing_hyphens() {
        assert_eq!(slugify("  --Organic Soap-- "), "organic-soap");
    }

    #[test]
    fn slugify_empty_name_yields_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_charset_safe() {
        for name in ["Crème Brûlée Candle", "100% Cotton", "a_b/c\\d"] {
            let slug = slugify(name);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad char in slug {slug:?} for {name:?}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug:?}");
            assert!(!slug.contains("--"), "{slug:?}");
        }
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("Hemp Tote Bag"), slugify("Hemp Tote Bag"));
    }

    #[test]
    fn meta_title_appends_suffix() {
        assert_eq!(default_meta_title("Eco Mug"), "Eco Mug - Premium Quality");
    }

    #[test]
    fn meta_description_truncates_at_160_chars() {
        let long = "x".repeat(400);
        assert_eq!(default_meta_description(&long).chars().count(), 160);
        assert_eq!(default_meta_description("short"), "short");
    }

    #[test]
    fn meta_description_respects_char_boundaries() {
        let text = "é".repeat(200);
        let truncated = default_meta_description(&text);
        assert_eq!(truncated.chars().count(), 160);
    }
}
