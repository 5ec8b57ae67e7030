//! Checksum validation (Luhn, IBAN, ABA routing, VIN check digit).
//!
//! Each validator expects an already-normalized literal: a character the
//! algorithm does not define makes the literal invalid instead of being
//! skipped.

/// Validate using the Luhn algorithm (credit cards).
///
/// Doubles every second digit from the right, subtracts 9 from results
/// above 9 and requires the digit sum to be divisible by 10. Any
/// non-digit character fails the check.
#[must_use]
pub fn luhn_valid(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut sum: u32 = 0;
    for (i, b) in number.bytes().rev().enumerate() {
        let mut val = u32::from(b - b'0');
        if i % 2 == 1 {
            val *= 2;
            if val > 9 {
                val -= 9;
            }
        }
        sum += val;
    }

    sum % 10 == 0
}

/// Validate an IBAN with the ISO 13616 mod-97 check.
#[must_use]
pub fn iban_valid(iban: &str) -> bool {
    if iban.len() < 15 || iban.len() > 34 || !iban.is_ascii() {
        return false;
    }

    // Move the country code and check digits to the end, letters become 10..35
    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    let mut remainder = 0u32;
    for c in rearranged {
        let val = match c {
            '0'..='9' => u32::from(c as u8 - b'0'),
            'A'..='Z' => u32::from(c as u8 - b'A') + 10,
            _ => return false,
        };
        remainder = if val < 10 {
            (remainder * 10 + val) % 97
        } else {
            (remainder * 100 + val) % 97
        };
    }

    remainder == 1
}

/// Validate a nine-digit ABA routing number with the 3-7-1 weighted checksum.
#[must_use]
pub fn aba_routing_valid(routing: &str) -> bool {
    if routing.len() != 9 || !routing.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    const WEIGHTS: [u32; 3] = [3, 7, 1];
    let sum: u32 = routing
        .bytes()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * WEIGHTS[i % 3])
        .sum();

    sum % 10 == 0
}

/// Weights applied to each VIN position; position 9 holds the check digit.
const VIN_WEIGHTS: [u32; 17] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Numeric value of a VIN character, `None` for characters outside the alphabet.
fn vin_transliterate(c: char) -> Option<u32> {
    let val = match c {
        '0'..='9' => u32::from(c as u8 - b'0'),
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        _ => return None,
    };
    Some(val)
}

/// Validate a 17-character VIN against its check digit (ISO 3779 / 49 CFR 565).
#[must_use]
pub fn vin_valid(vin: &str) -> bool {
    if vin.len() != 17 {
        return false;
    }

    let mut sum = 0u32;
    for (c, weight) in vin.chars().zip(VIN_WEIGHTS) {
        match vin_transliterate(c) {
            Some(val) => sum += val * weight,
            None => return false,
        }
    }

    let expected = match sum % 11 {
        10 => 'X',
        digit => char::from_digit(digit, 10).unwrap_or('X'),
    };

    vin.chars().nth(8) == Some(expected)
}
