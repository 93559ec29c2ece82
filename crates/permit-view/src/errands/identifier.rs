//! Legal identifier (personal and organization number) normalization.
//!
//! The register stores identifiers hyphenated, and organization numbers carry
//! a two-digit prefix so they cannot collide with ten-digit personal numbers.

pub const ORGANIZATION_PREFIX: &str = "16";

const HYPHEN_OFFSET: usize = 4;

/// Insert a hyphen four characters from the right, unless one is already present.
pub fn add_hyphen(id: &str) -> String {
    let length = id.chars().count();
    if length <= HYPHEN_OFFSET || id.contains('-') {
        return id.to_string();
    }

    let split_at = id
        .char_indices()
        .nth(length - HYPHEN_OFFSET)
        .map(|(index, _)| index)
        .unwrap_or(id.len());
    format!("{}-{}", &id[..split_at], &id[split_at..])
}

pub fn prefix_organization_number(id: &str) -> String {
    if id.chars().count() == 10 {
        format!("{ORGANIZATION_PREFIX}{id}")
    } else {
        id.to_string()
    }
}

/// True when `candidate` is `target`, or `target` behind the organization prefix.
pub fn is_equal(target: &str, candidate: &str) -> bool {
    candidate == target || candidate.strip_prefix(ORGANIZATION_PREFIX) == Some(target)
}

/// Form sent to the register for a caller supplied identifier.
pub fn normalize_query(id: &str) -> String {
    add_hyphen(&prefix_organization_number(id.trim()))
}

/// Rewrites `candidate` to `query` when the two denote the same identity.
pub(crate) fn align_to_query(query: &str, candidate: &str) -> String {
    if is_equal(query, candidate) || is_equal(candidate, query) {
        query.to_string()
    } else {
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_hyphen_inserts_four_from_the_right() {
        assert_eq!(add_hyphen("199001011234"), "19900101-1234");
        assert_eq!(add_hyphen("12345"), "1-2345");
    }

    #[test]
    fn add_hyphen_leaves_short_or_hyphenated_input() {
        assert_eq!(add_hyphen("1234"), "1234");
        assert_eq!(add_hyphen(""), "");
        assert_eq!(add_hyphen("19900101-1234"), "19900101-1234");
    }

    #[test]
    fn add_hyphen_is_idempotent() {
        for id in ["", "12", "12345", "5566778899", "165566778899", "abc-def", "åäöåäö"] {
            let once = add_hyphen(id);
            assert_eq!(add_hyphen(&once), once, "input {id}");
        }
    }

    #[test]
    fn add_hyphen_respects_multibyte_characters() {
        assert_eq!(add_hyphen("åäöxyzw"), "åäö-xyzw");
    }

    #[test]
    fn prefixes_only_ten_character_numbers() {
        assert_eq!(prefix_organization_number("5566778899"), "165566778899");
        assert_eq!(prefix_organization_number("199001011234"), "199001011234");
        assert_eq!(prefix_organization_number("556677-8899"), "556677-8899");
    }

    #[test]
    fn is_equal_accepts_prefixed_candidate() {
        assert!(is_equal("1234567890", "1234567890"));
        assert!(is_equal("1234567890", "161234567890"));
        assert!(!is_equal("1234567890", "171234567890"));
        assert!(!is_equal("161234567890", "1234567890"));
    }

    #[test]
    fn normalize_query_prefixes_then_hyphenates() {
        assert_eq!(normalize_query(" 5566778899 "), "16556677-8899");
        assert_eq!(normalize_query("199001011234"), "19900101-1234");
        assert_eq!(normalize_query("19900101-1234"), "19900101-1234");
    }

    #[test]
    fn align_to_query_handles_both_prefix_directions() {
        assert_eq!(align_to_query("16556677-8899", "556677-8899"), "16556677-8899");
        assert_eq!(align_to_query("556677-8899", "16556677-8899"), "556677-8899");
        assert_eq!(align_to_query("19900101-1234", "19900101-9999"), "19900101-9999");
    }
}
