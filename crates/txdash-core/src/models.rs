//! Core data models for transactions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::TransactionStatus;

/// Gas limit used when the creation form leaves it blank
pub const DEFAULT_GAS_LIMIT: &str = "21000";
/// Gas price used when the creation form leaves it blank
pub const DEFAULT_GAS_PRICE: &str = "0.00000002";

pub use txdash_utils::is_valid_address;

/// Transaction record as supplied by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Transaction hash
    pub hash: String,
    /// Sender address
    pub from_address: String,
    /// Recipient address
    pub to_address: String,
    /// Decimal amount as a string
    pub amount: String,
    /// Lifecycle status
    pub status: TransactionStatus,
    /// Gas limit, absent when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    /// Gas price, absent when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// ISO-8601 timestamp
    pub timestamp: String,
}

impl Transaction {
    /// Parsed timestamp, `None` when unparseable
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        txdash_utils::parse_timestamp(&self.timestamp)
    }

    /// Amount coerced to a number (0 when unparseable)
    pub fn amount_value(&self) -> f64 {
        txdash_utils::parse_amount(&self.amount)
    }

    /// Case-insensitive substring match on hash and both addresses.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.hash.to_lowercase().contains(needle)
            || self.from_address.to_lowercase().contains(needle)
            || self.to_address.to_lowercase().contains(needle)
    }
}

/// Creation form payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub to_address: String,
    pub amount: String,
    #[serde(default)]
    pub gas_limit: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
}

impl CreateTransactionRequest {
    /// Validate the request and fill in gas defaults
    pub fn validate(&self) -> CoreResult<NewTransaction> {
        let to_address = self.to_address.trim();
        if !is_valid_address(to_address) {
            return Err(CoreError::Validation {
                field: "toAddress".to_string(),
                message: "Address must be 0x followed by 40 hex characters".to_string(),
            });
        }

        let amount = self.amount.trim();
        match Decimal::from_str(amount) {
            Ok(value) if value > Decimal::ZERO => {}
            _ => {
                return Err(CoreError::Validation {
                    field: "amount".to_string(),
                    message: "Amount must be a positive number".to_string(),
                })
            }
        }

        let gas_limit = gas_or_default(self.gas_limit.as_deref(), DEFAULT_GAS_LIMIT, "gasLimit")?;
        let gas_price = gas_or_default(self.gas_price.as_deref(), DEFAULT_GAS_PRICE, "gasPrice")?;

        Ok(NewTransaction {
            to_address: to_address.to_string(),
            amount: amount.to_string(),
            gas_limit,
            gas_price,
        })
    }
}

fn gas_or_default(value: Option<&str>, default: &str, field: &str) -> CoreResult<String> {
    let value = value.map(str::trim).unwrap_or("");
    if value.is_empty() {
        return Ok(default.to_string());
    }
    match Decimal::from_str(value) {
        Ok(n) if !n.is_sign_negative() => Ok(value.to_string()),
        _ => Err(CoreError::Validation {
            field: field.to_string(),
            message: format!("{} must be a non-negative number", field),
        }),
    }
}

/// A validated creation request, ready for the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub to_address: String,
    pub amount: String,
    pub gas_limit: String,
    pub gas_price: String,
}

/// In-progress values of the creation form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionDraft {
    pub to_address: String,
    pub amount: String,
    pub gas_limit: String,
    pub gas_price: String,
}

impl TransactionDraft {
    /// Every field is blank
    pub fn is_empty(&self) -> bool {
        [&self.to_address, &self.amount, &self.gas_limit, &self.gas_price]
            .iter()
            .all(|v| v.trim().is_empty())
    }

    /// Turn the draft into a creation request (blank gas fields become absent)
    pub fn to_request(&self) -> CreateTransactionRequest {
        let optional = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        CreateTransactionRequest {
            to_address: self.to_address.clone(),
            amount: self.amount.clone(),
            gas_limit: optional(&self.gas_limit),
            gas_price: optional(&self.gas_price),
        }
    }
}
