//! Plain-text receipt
//!
//! Space-padded text with no control codes, for previews and channels that
//! cannot interpret ESC/POS.

use super::layout::{display_name, money, pad_left, pad_right};
use super::{DATE_FORMAT, DEFAULT_SITE_NAME, ReceiptFormatter, TIME_FORMAT};
use crate::models::{ReceiptSettings, TerminalInfo, Transaction};
use till_printer::text_width;

/// Columns reserved for the amount on item lines
const AMOUNT_COLUMN: usize = 7;

const DEFAULT_FOOTER: [&str; 2] = ["Thank you", "for visiting us!"];

impl ReceiptFormatter {
    /// Render a transaction as plain text, one `\n`-terminated line per row
    ///
    /// "Change" is always printed (`£0.00` without cashback), unlike the
    /// printer layout which leaves it out.
    pub fn generate_receipt_text(
        &self,
        tx: &Transaction,
        site_name: Option<&str>,
        settings: Option<&ReceiptSettings>,
        terminal: Option<&TerminalInfo>,
    ) -> String {
        let l = &self.layout;
        let mut lines: Vec<String> = Vec::new();

        // Header
        match settings.map(|s| s.header_lines.as_slice()) {
            Some(header) if !header.is_empty() => {
                lines.extend(header.iter().map(|line| l.center_text(&line.text)));
            }
            _ => lines.push(l.center_text(site_name.unwrap_or(DEFAULT_SITE_NAME))),
        }
        lines.push(l.divider('='));

        // Items
        let label_width = self.chars_per_line().saturating_sub(AMOUNT_COLUMN);
        for item in &tx.items {
            let label = format!(
                "{} x {}",
                item.quantity,
                display_name(&item.product_name, &item.price_tier)
            );
            lines.push(format!(
                "{}{}",
                pad_right(&label, label_width),
                pad_left(&signed_money(item.line_total), AMOUNT_COLUMN)
            ));
        }
        lines.push(String::new());

        // Totals: both rows come from the subtotal
        let subtotal = money(tx.subtotal.abs());
        lines.push(self.text_row("Total (inc VAT)", &subtotal));
        lines.push(self.text_row("Subtotal", &subtotal));
        lines.push(String::new());

        // Payment
        match tx.split_payments() {
            Some(payments) => {
                for payment in payments {
                    lines.push(format!("Payment Method: {}", payment.tender_name));
                    lines.push(format!("Amount Paid: {}", money(payment.amount.abs())));
                }
            }
            None => {
                lines.push(format!("Payment Method: {}", tx.tender_name));
                lines.push(format!("Amount Paid: {}", money(tx.total.abs())));
            }
        }
        let change = tx.cashback.filter(|c| *c > 0.0).unwrap_or(0.0);
        lines.push(format!("Change: {}", money(change)));

        // VAT
        for (code, amount) in &tx.vat_breakdown {
            lines.push(format!("CODE = {} - STANDARD: {}", code, money(*amount)));
            lines.push(format!("VAT Total: {}", money(*amount)));
        }
        lines.push(String::new());

        // Trailer
        lines.push(format!("Served by: {}", tx.operator_name));
        if let Some(terminal) = terminal {
            if let Some(id) = terminal.id.as_deref() {
                lines.push(format!("Terminal ID: {}", id));
            }
            if let Some(name) = terminal.name.as_deref() {
                lines.push(format!("Terminal: {}", name));
            }
        }
        lines.push(format!("Transaction: {}", tx.id));
        lines.push(format!(
            "{} {}",
            tx.timestamp.format(TIME_FORMAT),
            tx.timestamp.format(DATE_FORMAT)
        ));
        lines.push(String::new());

        // Footer
        match settings.map(|s| s.footer_lines.as_slice()) {
            Some(footer) if !footer.is_empty() => {
                lines.extend(footer.iter().map(|line| l.center_text(&line.text)));
            }
            _ => lines.extend(DEFAULT_FOOTER.iter().map(|text| l.center_text(text))),
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Label left, amount flush right, nothing truncated
    fn text_row(&self, label: &str, amount: &str) -> String {
        let label_width = self.chars_per_line().saturating_sub(text_width(amount));
        format!("{}{}", pad_right(label, label_width), amount)
    }
}

/// Amount keeping its sign in front of the currency symbol, e.g. "-£2.50"
fn signed_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}", money(-amount))
    } else {
        money(amount)
    }
}
