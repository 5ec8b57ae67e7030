use piiscan_rules::{Category, Rule, DEFAULT_RULE_SET};

/// Run one category against a line, asserting detection and exact extraction.
fn assert_extracts(category: Category, text: &str, expected: &[&str]) {
    let rule = DEFAULT_RULE_SET
        .get(category.as_str())
        .expect("category in default rule set");

    assert!(rule.is_match(text), "{} did not detect {text:?}", rule.name());
    assert_eq!(rule.extract(text), expected, "{} on {text:?}", rule.name());
}

#[test]
fn test_embedded_literals_are_extracted_exactly() {
    assert_extracts(
        Category::PhoneNumber,
        "Please call me at (555) 867-5309 after lunch.",
        &["(555) 867-5309"],
    );
    assert_extracts(
        Category::EmailAddress,
        "Send the invoice to billing@acme-corp.com by Friday.",
        &["billing@acme-corp.com"],
    );
    assert_extracts(
        Category::IpAddress,
        "Connection refused from 192.168.10.44 on port 22",
        &["192.168.10.44"],
    );
    assert_extracts(
        Category::Uuid,
        "request 9b2d6f8e-3c1a-4e7b-9f0d-2a6c8e4b1d37 failed",
        &["9b2d6f8e-3c1a-4e7b-9f0d-2a6c8e4b1d37"],
    );
    assert_extracts(
        Category::Vin,
        "Registered vehicle JH4KA7561PC008269 in Ohio",
        &["JH4KA7561PC008269"],
    );
    assert_extracts(
        Category::CreditCard,
        "Charged card 5500 0000 0000 0004 for the order",
        &["5500 0000 0000 0004"],
    );
}

#[test]
fn test_end_to_end_line() {
    let line = "Contact: 555-123-4567, card 4111111111111111";

    let mut names: Vec<&str> = DEFAULT_RULE_SET.hits(line).iter().map(Rule::name).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["credit_card", "phone_number"]);

    assert_eq!(Category::PhoneNumber.extract(line), vec!["555-123-4567"]);
    assert_eq!(Category::CreditCard.extract(line), vec!["4111111111111111"]);
}

#[test]
fn test_luhn_failures_never_extracted() {
    for literal in [
        "4111111111111121",
        "4111-1111-1111-1121",
        "4111 1111 1111 1121",
        "5500000000000005",
    ] {
        let text = format!("card number {literal} on file");
        assert!(
            Category::CreditCard.is_match(&text),
            "{literal} should still be card-shaped"
        );
        assert!(
            Category::CreditCard.extract(&text).is_empty(),
            "{literal} failed Luhn but was extracted"
        );
    }
}

#[test]
fn test_test_card_numbers_excluded_despite_luhn() {
    for literal in ["4242424242424242", "5555-5555-5555-4444", "6011 1111 1111 1117"] {
        let digits: String = literal.chars().filter(char::is_ascii_digit).collect();
        assert!(piiscan_rules::checksum::luhn_valid(&digits));
        assert!(
            Category::CreditCard.extract(literal).is_empty(),
            "{literal} is a sandbox number"
        );
    }
}

#[test]
fn test_uuid_reported_once() {
    // Matches the unversioned and v4 patterns, and appears twice
    let id = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
    let text = format!("created {id}; retried {id}");

    assert_eq!(Category::Uuid.extract(&text), vec![id]);
}

#[test]
fn test_placeholder_digits_detected_but_not_extracted() {
    for text in ["call 555-555-5555", "SSN 111-11-1111", "routing 111111111"] {
        let hit = DEFAULT_RULE_SET.hits(text);
        assert!(!hit.is_empty(), "{text:?} should be detected");
        for rule in hit {
            assert!(
                rule.extract(text).is_empty(),
                "{} extracted a placeholder from {text:?}",
                rule.name()
            );
        }
    }
}

#[test]
fn test_select_subset_preserves_request_order() {
    let rules = DEFAULT_RULE_SET
        .select(&["ssn", "email_address"])
        .expect("known rule names");
    assert_eq!(rules[0].category(), Category::Ssn);
    assert_eq!(rules[1].category(), Category::EmailAddress);
}
