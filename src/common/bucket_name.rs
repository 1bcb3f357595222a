// Bucket name validation
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Shortest bucket name that S3 accepts.
const MIN_LENGTH: usize = 3;

/// Longest bucket name that S3 accepts.
const MAX_LENGTH: usize = 63;

/// Returns `true` if `name` could be an S3 bucket name.
///
/// Bucket names are 3 to 63 characters long and may contain letters,
/// numbers, periods and hyphens. Letters are compared case-insensitively.
/// This is a cheap local check so that obviously invalid names never reach
/// the network.
pub fn is_valid_bucket_name(name: &str) -> bool {
    let length = name.chars().count();

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return false;
    }

    name.chars()
        .map(|c| c.to_ascii_lowercase())
        .all(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || c == '.'
                || c == '-'
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_valid_bucket_name() {
        let long_name = "a".repeat(MAX_LENGTH);
        let too_long  = "a".repeat(MAX_LENGTH + 1);

        let tests = vec![
            ("",                false),
            ("a",               false),
            ("ab",              false),
            ("abc",             true),
            ("my-bucket-1",     true),
            ("some.dotted.one", true),
            ("MyBucket",        true),
            ("UPPER-CASE-123",  true),
            ("under_score",     false),
            ("with space",      false),
            ("slash/bucket",    false),
            ("colon:bucket",    false),
            ("ümlaut-bucket",   false),
            ("...",             true),
            (long_name.as_str(), true),
            (too_long.as_str(),  false),
        ];

        for test in tests {
            let name     = test.0;
            let expected = test.1;

            assert_eq!(is_valid_bucket_name(name), expected, "{name:?}");
        }
    }
}
