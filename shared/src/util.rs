use chrono::{TimeZone, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC midnight of the day containing `millis`
pub fn start_of_day_millis(millis: i64) -> i64 {
    Utc.timestamp_millis_opt(millis)
        .single()
        .and_then(|dt| dt.date_naive().and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(millis)
}

/// New opaque document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Derive a URL/subdomain slug from a display name.
///
/// Lowercases, turns whitespace runs into `-`, drops everything outside
/// `[a-z0-9-]`, collapses repeated dashes and trims them from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_whitespace() || c == '-' || c == '_' {
            '-'
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            continue;
        };
        if mapped == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(mapped);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Subdomain-safe slug: 3-63 chars of `[a-z0-9-]`, alphanumeric at both ends.
pub fn is_valid_slug(slug: &str) -> bool {
    let bytes = slug.as_bytes();
    if !(3..=63).contains(&bytes.len()) {
        return false;
    }
    let edge_ok = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    bytes.first().is_some_and(edge_ok)
        && bytes.last().is_some_and(edge_ok)
        && bytes.iter().all(|b| edge_ok(b) || *b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Asala"), "asala");
        assert_eq!(slugify("  Burger   House  "), "burger-house");
        assert_eq!(slugify("Café & Grill #1"), "caf-grill-1");
        assert_eq!(slugify("pizza_--_place"), "pizza-place");
        assert_eq!(slugify("مطعم"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("asala"));
        assert!(is_valid_slug("burger-house-2"));
        assert!(!is_valid_slug("ab"));
        assert!(!is_valid_slug("-asala"));
        assert!(!is_valid_slug("asala-"));
        assert!(!is_valid_slug("Asala"));
        assert!(!is_valid_slug("as_ala"));
        assert!(!is_valid_slug(&"a".repeat(64)));
    }

    #[test]
    fn test_start_of_day() {
        // 2024-03-05T13:45:00Z
        let ts = 1_709_646_300_000;
        assert_eq!(start_of_day_millis(ts), 1_709_596_800_000);
        assert_eq!(start_of_day_millis(1_709_596_800_000), 1_709_596_800_000);
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
        assert_eq!(new_id().len(), 32);
    }
}
