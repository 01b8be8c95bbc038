//! Printer receipt (ESC/POS control codes)

use super::layout::{display_name, money};
use super::{DATE_FORMAT, DEFAULT_SITE_NAME, ReceiptFormatter, TIME_FORMAT};
use crate::models::{ReceiptLine, ReceiptSettings, TextSize, Transaction};
use till_printer::{EscPosBuilder, truncate_width};

const DEFAULT_FOOTER: &str = "Thank you for your visit!";
const TRANSACTION_ID_WIDTH: usize = 16;
const CASH_TENDER: &str = "Cash";

impl ReceiptFormatter {
    /// Render a transaction to ESC/POS bytes
    ///
    /// Custom header/footer lines replace the site name and the default
    /// thank-you line when present.
    pub fn generate_receipt(
        &self,
        tx: &Transaction,
        site_name: Option<&str>,
        is_reprint: bool,
        settings: Option<&ReceiptSettings>,
    ) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.chars_per_line());
        b.center();

        self.render_header(&mut b, site_name, settings);

        if is_reprint {
            b.bold();
            b.line("*** REPRINT ***");
            b.bold_off();
        }

        b.newline();
        b.left();
        b.sep_double();

        self.render_details(&mut b, tx);
        self.render_items(&mut b, tx);
        self.render_totals(&mut b, tx);
        self.render_payment(&mut b, tx);
        self.render_change(&mut b, tx);

        if tx.is_refund {
            b.newline();
            b.center();
            b.bold();
            b.line("*** REFUND ***");
            b.bold_off();
            b.left();
        }

        self.render_footer(&mut b, settings);

        b.feed(4);
        b.cut();

        b.build()
    }

    fn render_header(
        &self,
        b: &mut EscPosBuilder,
        site_name: Option<&str>,
        settings: Option<&ReceiptSettings>,
    ) {
        match settings.map(|s| s.header_lines.as_slice()) {
            Some(lines) if !lines.is_empty() => self.render_custom_lines(b, lines),
            _ => {
                b.double_size();
                b.line(&self.layout.clip(site_name.unwrap_or(DEFAULT_SITE_NAME)));
                b.reset_size();
            }
        }
    }

    /// Small and normal share the base size; large prints double size
    fn render_custom_lines(&self, b: &mut EscPosBuilder, lines: &[ReceiptLine]) {
        for line in lines {
            let text = self.layout.clip(&line.text);
            match line.size {
                TextSize::Large => {
                    b.double_size();
                    b.line(&text);
                    b.reset_size();
                }
                TextSize::Small | TextSize::Normal => {
                    b.line(&text);
                }
            }
        }
    }

    fn render_details(&self, b: &mut EscPosBuilder, tx: &Transaction) {
        let l = &self.layout;

        b.line(&l.format_line("Date", &tx.timestamp.format(DATE_FORMAT).to_string()));
        b.line(&l.format_line("Time", &tx.timestamp.format(TIME_FORMAT).to_string()));
        b.line(&l.format_line(
            "Transaction",
            &truncate_width(&tx.id, TRANSACTION_ID_WIDTH),
        ));
        b.line(&l.format_line("Operator", &tx.operator_name));

        if let Some(table) = tx.table_name.as_deref().filter(|t| !t.is_empty()) {
            b.line(&l.format_line("Table", table));
        }
    }

    fn render_items(&self, b: &mut EscPosBuilder, tx: &Transaction) {
        let l = &self.layout;

        b.sep_double();
        b.bold();
        b.line(&format!("Items ({})", tx.items.len()));
        b.bold_off();
        b.sep_single();

        for item in &tx.items {
            b.line(&l.clip(&display_name(&item.product_name, &item.price_tier)));

            let quantity = format!(
                "{} × {}",
                item.quantity.unsigned_abs(),
                money(item.unit_price.abs())
            );
            b.line(&l.format_line(&quantity, &money(item.line_total.abs())));
        }
    }

    fn render_totals(&self, b: &mut EscPosBuilder, tx: &Transaction) {
        let l = &self.layout;

        b.sep_single();
        b.line(&l.format_line("Subtotal", &money(tx.subtotal.abs())));

        if let Some(discount) = tx.discount.filter(|d| *d > 0.0) {
            b.line(&l.format_line("Discount", &format!("-{}", money(discount))));
        }

        if let Some(gratuity) = tx.gratuity.filter(|g| *g > 0.0) {
            b.line(&l.format_line("Gratuity", &format!("+{}", money(gratuity))));
        }

        let vat_total = tx.vat_total();
        if vat_total > 0.0 {
            b.line(&l.format_line("VAT", &money(vat_total)));
        }

        b.sep_double();
        b.bold();
        b.double_width();
        b.line(&l.format_line("TOTAL", &money(tx.total.abs())));
        b.bold_off();
        b.reset_size();
        b.sep_double();
    }

    fn render_payment(&self, b: &mut EscPosBuilder, tx: &Transaction) {
        let l = &self.layout;

        match tx.split_payments() {
            Some(payments) => {
                b.bold();
                b.line("Payment Methods:");
                b.bold_off();
                for payment in payments {
                    b.line(&l.format_line(
                        &format!("  {}", payment.tender_name),
                        &money(payment.amount.abs()),
                    ));
                }
            }
            None => {
                b.bold();
                b.line(&l.clip(&format!("Payment Method: {}", tx.tender_name)));
                b.bold_off();
            }
        }
    }

    /// "CHANGE" when the last tender was cash, "CASHBACK" otherwise
    fn render_change(&self, b: &mut EscPosBuilder, tx: &Transaction) {
        let Some(cashback) = tx.cashback.filter(|c| *c > 0.0) else {
            return;
        };

        let tender = tx
            .split_payments()
            .and_then(|payments| payments.last())
            .map_or(tx.tender_name.as_str(), |p| p.tender_name.as_str());
        let label = if tender == CASH_TENDER {
            "CHANGE"
        } else {
            "CASHBACK"
        };

        b.newline();
        b.bold();
        b.line(&self.layout.format_line(label, &money(cashback)));
        b.bold_off();
    }

    fn render_footer(&self, b: &mut EscPosBuilder, settings: Option<&ReceiptSettings>) {
        b.newline();
        b.center();

        match settings.map(|s| s.footer_lines.as_slice()) {
            Some(lines) if !lines.is_empty() => self.render_custom_lines(b, lines),
            _ => {
                b.line(DEFAULT_FOOTER);
            }
        }
    }
}
