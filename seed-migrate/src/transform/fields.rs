//! Field-level conversions from legacy values to content model values.

/// Kitchen types of the residences collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KitchenType {
    Full,
    Kitchenette,
    NoKitchen,
}

impl KitchenType {
    pub fn as_str(self) -> &'static str {
        match self {
            KitchenType::Full => "full",
            KitchenType::Kitchenette => "kitchenette",
            KitchenType::NoKitchen => "none",
        }
    }
}

/// Classify a free-text legacy kitchen description.
///
/// "full" wins over "kitchenette"; any other non-empty text means no kitchen;
/// missing or blank text leaves the field unset.
pub fn classify_kitchen(description: Option<&str>) -> Option<KitchenType> {
    let description = description?.trim();
    if description.is_empty() {
        return None;
    }

    let lowered = description.to_lowercase();
    if lowered.contains("full") {
        Some(KitchenType::Full)
    } else if lowered.contains("kitchenette") {
        Some(KitchenType::Kitchenette)
    } else {
        Some(KitchenType::NoKitchen)
    }
}

/// Lowercase the name and join its words with single dashes.
///
/// Leading and trailing whitespace is dropped, matching the trimmed name
/// that is stored alongside the slug.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The legacy slug, or one derived from `name` when it is missing or blank.
pub fn slug_or_derived(slug: Option<&str>, name: &str) -> String {
    match non_blank(slug) {
        Some(slug) => slug.to_string(),
        None => slugify(name),
    }
}

/// Legacy boolean-like integer flag. Missing means false.
pub fn flag(value: Option<i64>) -> bool {
    value.unwrap_or(0) != 0
}

/// Parse a legacy count stored as text ("2", " 2.5 "). Anything else is unset.
pub fn parse_count(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|count| count.is_finite() && *count >= 0.0)
}

/// Trimmed text, or `None` when missing or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kitchen() {
        assert_eq!(classify_kitchen(Some("Full Kitchen")), Some(KitchenType::Full));
        assert_eq!(classify_kitchen(Some("KITCHENETTE")), Some(KitchenType::Kitchenette));
        // "full" is checked first
        assert_eq!(
            classify_kitchen(Some("Full kitchenette combo")),
            Some(KitchenType::Full)
        );
        assert_eq!(classify_kitchen(Some("Microwave only")), Some(KitchenType::NoKitchen));
        assert_eq!(classify_kitchen(Some("   ")), None);
        assert_eq!(classify_kitchen(None), None);
        assert_eq!(KitchenType::NoKitchen.as_str(), "none");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Outdoor Pool"), "outdoor-pool");
        assert_eq!(slugify("  Hot   Tub\tand Spa "), "hot-tub-and-spa");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify(" Pool "), "pool");
        assert!(!slugify("\tOcean View Suite\n").starts_with('-'));
    }

    #[test]
    fn test_slug_or_derived() {
        assert_eq!(slug_or_derived(Some("pool"), "Outdoor Pool"), "pool");
        assert_eq!(slug_or_derived(Some(" "), "Outdoor Pool"), "outdoor-pool");
        assert_eq!(slug_or_derived(None, "Outdoor Pool"), "outdoor-pool");
    }

    #[test]
    fn test_flag() {
        assert!(flag(Some(1)));
        assert!(flag(Some(-1)));
        assert!(!flag(Some(0)));
        assert!(!flag(None));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("2")), Some(2.0));
        assert_eq!(parse_count(Some(" 1.5 ")), Some(1.5));
        assert_eq!(parse_count(Some("Studio")), None);
        assert_eq!(parse_count(Some("-1")), None);
        assert_eq!(parse_count(Some("NaN")), None);
        assert_eq!(parse_count(None), None);
    }
}
