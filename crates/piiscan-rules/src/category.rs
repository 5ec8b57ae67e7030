//! The closed set of PII categories piiscan understands.

use crate::error::RuleError;
use crate::extract;
use crate::patterns::{
    uuid_patterns, ABA_ROUTING, CREDIT_CARD, EMAIL, IBAN, INDIA_PAN, IPV4, IPV6, PHONE,
    PHONE_WITH_EXT, PO_BOX, SSN, STREET_ADDRESS, VIN,
};
use piiscan_core::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category of personally identifiable information.
///
/// Each variant carries its detection predicate ([`Category::is_match`])
/// and its extraction function ([`Category::extract`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// North American phone numbers, optionally with an extension
    PhoneNumber,
    /// US social security numbers and India PAN numbers
    Ssn,
    /// Email addresses
    EmailAddress,
    /// IPv4 and IPv6 addresses
    IpAddress,
    /// Payment card numbers
    CreditCard,
    /// Street addresses and PO boxes
    StreetAddress,
    /// IBANs and ABA routing numbers
    BankingInfo,
    /// UUIDs (unversioned, v3, v4, v5) and GUIDs
    Uuid,
    /// Vehicle identification numbers
    Vin,
}

impl Category {
    /// Every category, in default table order.
    pub const ALL: [Category; 9] = [
        Category::PhoneNumber,
        Category::Ssn,
        Category::EmailAddress,
        Category::IpAddress,
        Category::CreditCard,
        Category::StreetAddress,
        Category::BankingInfo,
        Category::Uuid,
        Category::Vin,
    ];

    /// Get the rule name used as the key in results and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::Ssn => "ssn",
            Self::EmailAddress => "email_address",
            Self::IpAddress => "ip_address",
            Self::CreditCard => "credit_card",
            Self::StreetAddress => "street_address",
            Self::BankingInfo => "banking_info",
            Self::Uuid => "uuid",
            Self::Vin => "vin",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone number",
            Self::Ssn => "social security number",
            Self::EmailAddress => "valid email address",
            Self::IpAddress => "valid IPv4 or IPv6 address",
            Self::CreditCard => "valid credit card number",
            Self::StreetAddress => "street address or PO box",
            Self::BankingInfo => "IBAN or ACH routing number",
            Self::Uuid => "valid UUID (v3,v4,v5) or GUID",
            Self::Vin => "vehicle identification number (VIN)",
        }
    }

    /// Get the default severity.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Ssn | Self::CreditCard | Self::BankingInfo => Severity::Critical,
            Self::PhoneNumber | Self::EmailAddress | Self::StreetAddress | Self::Uuid => {
                Severity::Moderate
            }
            Self::IpAddress | Self::Vin => Severity::Low,
        }
    }

    /// Check if a line contains something shaped like this category.
    ///
    /// This is lexical only; validators run during extraction.
    #[must_use]
    pub fn is_match(self, text: &str) -> bool {
        match self {
            Self::PhoneNumber => PHONE.is_match(text) || PHONE_WITH_EXT.is_match(text),
            Self::Ssn => SSN.is_match(text) || INDIA_PAN.is_match(text),
            Self::EmailAddress => EMAIL.is_match(text),
            Self::IpAddress => IPV4.is_match(text) || IPV6.is_match(text),
            Self::CreditCard => CREDIT_CARD.is_match(text),
            Self::StreetAddress => STREET_ADDRESS.is_match(text) || PO_BOX.is_match(text),
            Self::BankingInfo => IBAN.is_match(text) || ABA_ROUTING.is_match(text),
            Self::Uuid => uuid_patterns().iter().any(|regex| regex.is_match(text)),
            Self::Vin => VIN.is_match(text),
        }
    }

    /// Extract every literal in a line that survives this category's filters.
    #[must_use]
    pub fn extract(self, text: &str) -> Vec<String> {
        match self {
            Self::PhoneNumber => extract::phone_numbers(text),
            Self::Ssn => extract::national_ids(text),
            Self::EmailAddress => extract::email_addresses(text),
            Self::IpAddress => extract::ip_addresses(text),
            Self::CreditCard => extract::credit_cards(text),
            Self::StreetAddress => extract::street_addresses(text),
            Self::BankingInfo => extract::bank_identifiers(text),
            Self::Uuid => extract::uuids(text),
            Self::Vin => extract::vins(text),
        }
    }
}

impl FromStr for Category {
    type Err = RuleError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| RuleError::UnknownRule {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
