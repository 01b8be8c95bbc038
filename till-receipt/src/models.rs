//! Receipt input data
//!
//! Read-only records handed in by the order screens. Money is carried as
//! `f64` pounds; refunds arrive with negative quantities and totals.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A completed sale or refund
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Wall-clock time of the sale in the till's local offset
    pub timestamp: DateTime<FixedOffset>,
    pub operator_name: String,
    #[serde(default)]
    pub table_name: Option<String>,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    /// VAT rate code -> VAT collected at that rate (already inside the totals)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vat_breakdown: BTreeMap<String, f64>,
    pub total: f64,
    pub tender_name: String,
    /// Per-tender records for split payments
    #[serde(default)]
    pub payments: Option<Vec<PaymentRecord>>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub gratuity: Option<f64>,
    /// Change given (cash) or cashback (card)
    #[serde(default)]
    pub cashback: Option<f64>,
    #[serde(default)]
    pub is_refund: bool,
}

impl Transaction {
    /// Payment records when the sale was settled by more than one tender
    pub fn split_payments(&self) -> Option<&[PaymentRecord]> {
        self.payments
            .as_deref()
            .filter(|payments| payments.len() > 1)
    }

    /// VAT collected across all rates
    pub fn vat_total(&self) -> f64 {
        self.vat_breakdown.values().sum()
    }
}

/// `null` and absent maps both read as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, f64>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_name: String,
    /// Price tier label, e.g. "standard", "double", "125ml"
    #[serde(default)]
    pub price_tier: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub tender_name: String,
    pub amount: f64,
}

/// Custom header/footer text configured for the site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSettings {
    #[serde(default)]
    pub header_lines: Vec<ReceiptLine>,
    #[serde(default)]
    pub footer_lines: Vec<ReceiptLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub text: String,
    #[serde(default)]
    pub size: TextSize,
}

impl ReceiptLine {
    pub fn new(text: impl Into<String>, size: TextSize) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
}

/// Till identity printed in the plain-text trailer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
