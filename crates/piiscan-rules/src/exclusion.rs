//! Exclusion predicates for suppressing false positives.
//!
//! A literal that matched one category's raw pattern is discarded when it
//! also looks like a more specific category, a file path, placeholder
//! digits, or a published test card number.

use crate::patterns::{EMAIL, FILENAME, PHONE};

/// Card numbers published by payment processors for sandbox testing.
///
/// Compared against the literal with spaces and dashes removed.
pub const TEST_CARD_NUMBERS: &[&str] = &[
    "4242424242424242",
    "4000056655665556",
    "4012888888881881",
    "4222222222222",
    "5555555555554444",
    "5200828282828210",
    "5105105105105100",
    "378282246310005",
    "371449635398431",
    "378734493671000",
    "6011111111111117",
    "6011000990139424",
    "3056930009020004",
    "30569309025904",
    "38520000023237",
    "36227206271667",
    "3566002020360505",
    "3530111333300000",
    "6200000000000005",
];

/// Check if a literal matches the email pattern.
#[must_use]
pub fn looks_like_email(literal: &str) -> bool {
    EMAIL.is_match(literal)
}

/// Check if a literal matches the phone pattern.
#[must_use]
pub fn looks_like_phone(literal: &str) -> bool {
    PHONE.is_match(literal)
}

/// Check if a literal looks like a path or a `name.ext` file name.
#[must_use]
pub fn looks_like_filename(literal: &str) -> bool {
    FILENAME.is_match(literal)
}

/// Check if the digits of a literal are placeholder filler.
///
/// Only the digits are considered. With at least four of them, the literal
/// is filler when every digit is the same (`0000`, `555-555-5555`) or the
/// digits step by one in a single direction, wrapping 9 to 0
/// (`1234567890`, `987-654-3210`).
#[must_use]
pub fn is_repeating_number(literal: &str) -> bool {
    let digits: Vec<u8> = literal
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    if digits.len() < 4 {
        return false;
    }

    let all_same = digits.windows(2).all(|w| w[0] == w[1]);
    let ascending = digits.windows(2).all(|w| (w[0] + 1) % 10 == w[1]);
    let descending = digits.windows(2).all(|w| (w[1] + 1) % 10 == w[0]);

    all_same || ascending || descending
}

/// Check if a normalized card number is a published test number.
#[must_use]
pub fn is_test_card_number(digits: &str) -> bool {
    TEST_CARD_NUMBERS.contains(&digits)
}
