//! Per-category extraction functions.
//!
//! Each function collects every raw pattern match in a single line of
//! text, then drops the literals the category's exclusion predicates and
//! validators reject. Results keep the order the literals were found in.

use crate::checksum::{aba_routing_valid, iban_valid, luhn_valid, vin_valid};
use crate::exclusion::{
    is_repeating_number, is_test_card_number, looks_like_email, looks_like_filename,
    looks_like_phone,
};
use crate::patterns::{
    uuid_patterns, ABA_ROUTING, CREDIT_CARD, EMAIL, IBAN, INDIA_PAN, IPV4, IPV6, PHONE,
    PHONE_WITH_EXT, PO_BOX, SSN, STREET_ADDRESS, VIN,
};
use regex::Regex;
use std::collections::HashSet;

fn find_all<'r, 't: 'r>(
    regex: &'r Regex,
    text: &'t str,
) -> impl Iterator<Item = &'t str> + 'r {
    regex.find_iter(text).map(|m| m.as_str())
}

pub(crate) fn phone_numbers(text: &str) -> Vec<String> {
    let extended: Vec<_> = PHONE_WITH_EXT.find_iter(text).collect();

    // A plain number inside an extension-bearing match is the same phone
    let mut found: Vec<_> = PHONE
        .find_iter(text)
        .filter(|m| {
            !extended
                .iter()
                .any(|ext| ext.start() <= m.start() && m.end() <= ext.end())
        })
        .chain(extended.iter().copied())
        .collect();
    found.sort_by_key(regex::Match::start);

    found
        .into_iter()
        .map(|m| m.as_str())
        .filter(|m| !(looks_like_email(m) || looks_like_filename(m) || is_repeating_number(m)))
        .map(str::to_string)
        .collect()
}

pub(crate) fn national_ids(text: &str) -> Vec<String> {
    find_all(&SSN, text)
        .chain(find_all(&INDIA_PAN, text))
        .filter(|m| !(looks_like_phone(m) || looks_like_filename(m) || is_repeating_number(m)))
        .map(str::to_string)
        .collect()
}

pub(crate) fn email_addresses(text: &str) -> Vec<String> {
    find_all(&EMAIL, text).map(str::to_string).collect()
}

pub(crate) fn ip_addresses(text: &str) -> Vec<String> {
    find_all(&IPV4, text)
        .chain(find_all(&IPV6, text))
        .map(str::to_string)
        .collect()
}

/// Test numbers are rejected before the checksum runs, so a test number
/// that happens to pass Luhn is still excluded.
pub(crate) fn credit_cards(text: &str) -> Vec<String> {
    find_all(&CREDIT_CARD, text)
        .filter(|literal| {
            let no_dash = literal.replace('-', "");
            let no_space = literal.replace(' ', "");
            let digits = no_dash.replace(' ', "");

            if is_test_card_number(&digits) {
                return false;
            }

            [*literal, no_dash.as_str(), no_space.as_str(), digits.as_str()]
                .iter()
                .any(|form| luhn_valid(form))
        })
        .map(str::to_string)
        .collect()
}

pub(crate) fn street_addresses(text: &str) -> Vec<String> {
    find_all(&STREET_ADDRESS, text)
        .chain(find_all(&PO_BOX, text))
        .map(str::to_string)
        .collect()
}

pub(crate) fn bank_identifiers(text: &str) -> Vec<String> {
    find_all(&IBAN, text)
        .filter(|m| iban_valid(m))
        .chain(find_all(&ABA_ROUTING, text).filter(|m| aba_routing_valid(m)))
        .filter(|m| !is_repeating_number(m))
        .map(str::to_string)
        .collect()
}

pub(crate) fn uuids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for regex in uuid_patterns() {
        for literal in find_all(regex, text) {
            if seen.insert(literal) {
                unique.push(literal);
            }
        }
    }

    unique
        .into_iter()
        .filter(|m| !looks_like_filename(m))
        .map(str::to_string)
        .collect()
}

pub(crate) fn vins(text: &str) -> Vec<String> {
    find_all(&VIN, text)
        .filter(|m| !(looks_like_filename(m) || is_repeating_number(m) || looks_like_email(m)))
        .filter(|m| vin_valid(m))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_extension_supersedes_plain_match() {
        let found = phone_numbers("call 555-123-4567 ext. 89 or (555) 987-6543");
        assert_eq!(found, vec!["555-123-4567 ext. 89", "(555) 987-6543"]);
    }

    #[test]
    fn test_phone_drops_placeholder_digits() {
        assert!(phone_numbers("fax 555-555-5555").is_empty());
        assert!(phone_numbers("dial 123-456-7890").is_empty());
    }

    #[test]
    fn test_national_ids() {
        assert_eq!(national_ids("SSN: 536-22-1987"), vec!["536-22-1987"]);
        assert_eq!(national_ids("PAN ABCPE5821F on file"), vec!["ABCPE5821F"]);
        assert!(national_ids("SSN: 000-00-0000").is_empty());
        // Sequential digits are the textbook placeholder
        assert!(national_ids("SSN: 123-45-6789").is_empty());
    }

    #[test]
    fn test_credit_card_normalized_forms() {
        assert_eq!(
            credit_cards("card 4111-1111-1111-1111 exp 12/29"),
            vec!["4111-1111-1111-1111"]
        );
        assert_eq!(
            credit_cards("card 4111 1111 1111 1111"),
            vec!["4111 1111 1111 1111"]
        );
    }

    #[test]
    fn test_credit_cards_in_mixed_line() {
        let found =
            credit_cards("paid 5500-0000-0000-0004, refund 4111 1111 1111 1111, bad 4111111111111121");
        assert_eq!(found, vec!["5500-0000-0000-0004", "4111 1111 1111 1111"]);
    }

    #[test]
    fn test_find_all_chains_patterns() {
        let found: Vec<&str> = find_all(&IPV4, "10.0.0.1 and 192.168.1.7")
            .chain(find_all(&IPV6, "fe80::1"))
            .collect();
        assert_eq!(found, vec!["10.0.0.1", "192.168.1.7", "fe80::1"]);
    }

    #[test]
    fn test_credit_card_rejects_checksum_failures() {
        assert!(credit_cards("4111111111111112").is_empty());
        assert!(credit_cards("4111-1111-1111-1112").is_empty());
        assert!(credit_cards("4111 1111 1111 1112").is_empty());
    }

    #[test]
    fn test_credit_card_rejects_test_numbers() {
        assert!(credit_cards("stripe 4242424242424242").is_empty());
        assert!(credit_cards("stripe 4242 4242 4242 4242").is_empty());
        assert!(credit_cards("amex 378282246310005").is_empty());
    }

    #[test]
    fn test_bank_identifiers() {
        assert_eq!(
            bank_identifiers("IBAN GB82WEST12345698765432 routing 021000021"),
            vec!["GB82WEST12345698765432", "021000021"]
        );
        assert!(bank_identifiers("IBAN GB82WEST12345698765431").is_empty());
        assert!(bank_identifiers("routing 021000022").is_empty());
    }

    #[test]
    fn test_uuids_deduplicated_across_versions() {
        let text = "id=550e8400-e29b-41d4-a716-446655440000 again 550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(uuids(text), vec!["550e8400-e29b-41d4-a716-446655440000"]);
    }

    #[test]
    fn test_vins_require_check_digit() {
        assert_eq!(vins("VIN 1HGCM82633A004352"), vec!["1HGCM82633A004352"]);
        assert!(vins("VIN 1HGCM82633A004353").is_empty());
        assert!(vins("VIN 11111111111111111").is_empty());
    }

    #[test]
    fn test_ip_addresses() {
        assert_eq!(
            ip_addresses("from 10.0.0.25 via fe80::1"),
            vec!["10.0.0.25", "fe80::1"]
        );
    }

    #[test]
    fn test_street_addresses() {
        assert_eq!(
            street_addresses("ship to 123 Main Street Springfield or PO Box 42"),
            vec!["123 Main Street", "PO Box 42"]
        );
    }
}
