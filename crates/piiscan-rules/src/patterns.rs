//! Compiled regex primitives (initialized once on first use).
//!
//! These are raw lexical shapes only. Whether a literal is reported is
//! decided by the extraction functions, which layer the exclusion
//! predicates and checksum validators on top.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?(?:\([0-9]{3}\)[\s.-]?|\b[0-9]{3}[\s.-]?)[0-9]{3}[\s.-]?[0-9]{4}\b")
        .expect("valid phone regex")
});

pub(crate) static PHONE_WITH_EXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\+?1[\s.-]?)?(?:\([0-9]{3}\)[\s.-]?|\b[0-9]{3}[\s.-]?)[0-9]{3}[\s.-]?[0-9]{4}\s*(?:#|x\.?|ext\.?|extension)\s*[0-9]{1,6}\b",
    )
    .expect("valid phone extension regex")
});

pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("valid email regex")
});

pub(crate) static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\b",
    )
    .expect("valid IPv4 regex")
});

// Alternatives are ordered so the form allowing the most groups after `::`
// is tried first; the regex engine takes the first alternative that matches.
pub(crate) static IPV6: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"(?:[0-9a-f]{1,4}:){7}[0-9a-f]{1,4}",
        r"|[0-9a-f]{1,4}:(?::[0-9a-f]{1,4}){1,6}",
        r"|(?:[0-9a-f]{1,4}:){1,2}(?::[0-9a-f]{1,4}){1,5}",
        r"|(?:[0-9a-f]{1,4}:){1,3}(?::[0-9a-f]{1,4}){1,4}",
        r"|(?:[0-9a-f]{1,4}:){1,4}(?::[0-9a-f]{1,4}){1,3}",
        r"|(?:[0-9a-f]{1,4}:){1,5}(?::[0-9a-f]{1,4}){1,2}",
        r"|(?:[0-9a-f]{1,4}:){1,6}:[0-9a-f]{1,4}",
        r")",
    ))
    .expect("valid IPv6 regex")
});

/// 16-digit cards in groups of four, Amex (15) and Diners (14).
pub(crate) static CREDIT_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?:[0-9]{4}[ -]?){3}[0-9]{4}\b",
        r"|\b3[47][0-9]{2}[ -]?[0-9]{6}[ -]?[0-9]{5}\b",
        r"|\b3(?:0[0-5]|[68][0-9])[0-9][ -]?[0-9]{6}[ -]?[0-9]{4}\b",
    ))
    .expect("valid credit card regex")
});

pub(crate) static SSN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9]{3}[- ][0-9]{2}[- ][0-9]{4}\b").expect("valid SSN regex")
});

pub(crate) static INDIA_PAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{3}[ABCFGHLJPT][A-Z][0-9]{4}[A-Z]\b").expect("valid PAN regex")
});

pub(crate) static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b[0-9]{1,6}\s+(?:[a-z0-9.'-]+\s+){0,3}(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|way|place|pl|terrace|ter|circle|cir|highway|hwy|parkway|pkwy)\b\.?",
    )
    .expect("valid street address regex")
});

pub(crate) static PO_BOX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bP\.?\s?O\.?\s*Box\s+[0-9]{1,6}\b").expect("valid PO box regex")
});

pub(crate) static IBAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}\b").expect("valid IBAN regex")
});

/// ABA routing numbers: the first two digits fall in the Federal Reserve ranges.
pub(crate) static ABA_ROUTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:0[0-9]|1[0-2]|2[1-9]|3[0-2]|6[1-9]|7[0-2]|80)[0-9]{7}\b")
        .expect("valid routing number regex")
});

pub(crate) static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\b")
        .expect("valid UUID regex")
});

pub(crate) static UUID_V3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}\b")
        .expect("valid UUID v3 regex")
});

pub(crate) static UUID_V4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\b")
        .expect("valid UUID v4 regex")
});

pub(crate) static UUID_V5: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\b")
        .expect("valid UUID v5 regex")
});

/// VIN alphabet excludes I, O and Q.
pub(crate) static VIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").expect("valid VIN regex"));

pub(crate) static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:[a-z]:)?(?:[\w.-]*[\\/])+[\w.-]*",
        r"|\b[\w-]+\.(?:txt|log|csv|tsv|json|xml|ya?ml|toml|ini|cfg|conf|html?|css|js|ts|go|rs|py|rb|php|java|c|h|cpp|md|pdf|docx?|xlsx?|pptx?|png|jpe?g|gif|svg|zip|tar|gz|tgz|exe|dll|so|bin|dat|bak|tmp)\b",
    ))
    .expect("valid filename regex")
});

/// Every UUID shape, in the order extraction merges them.
pub(crate) fn uuid_patterns() -> [&'static Regex; 4] {
    [&UUID, &UUID_V3, &UUID_V4, &UUID_V5]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for regex in [
            &*PHONE,
            &*PHONE_WITH_EXT,
            &*EMAIL,
            &*IPV4,
            &*IPV6,
            &*CREDIT_CARD,
            &*SSN,
            &*INDIA_PAN,
            &*STREET_ADDRESS,
            &*PO_BOX,
            &*IBAN,
            &*ABA_ROUTING,
            &*VIN,
            &*FILENAME,
        ] {
            assert!(!regex.as_str().is_empty());
        }
        assert_eq!(uuid_patterns().len(), 4);
    }

    #[test]
    fn test_phone_shapes() {
        assert!(PHONE.is_match("Call (555) 123-4567"));
        assert!(PHONE.is_match("Phone: 555-123-4567"));
        assert!(PHONE.is_match("Contact: 555.123.4567"));
        assert!(PHONE.is_match("Number: 5551234567"));
        assert!(PHONE.is_match("+1 555 123 4567"));
        assert!(!PHONE.is_match("not a phone"));
        assert!(!PHONE.is_match("4111111111111111"));
        assert!(!PHONE.is_match("123-45-6789"));
    }

    #[test]
    fn test_ipv6_prefers_longest_compressed_form() {
        let found: Vec<&str> = IPV6
            .find_iter("gw 2001:db8::8a2e:370:7334 up")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["2001:db8::8a2e:370:7334"]);
    }

    #[test]
    fn test_ipv6_ignores_clock_times() {
        assert!(!IPV6.is_match("meeting at 12:30:45"));
    }

    #[test]
    fn test_credit_card_shapes() {
        assert!(CREDIT_CARD.is_match("4111 1111 1111 1111"));
        assert!(CREDIT_CARD.is_match("4111-1111-1111-1111"));
        assert!(CREDIT_CARD.is_match("378282246310005"));
        assert!(CREDIT_CARD.is_match("36227206271667"));
        assert!(!CREDIT_CARD.is_match("41111111111111111111"));
    }
}
