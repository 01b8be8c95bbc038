//! Receipt formatting
//!
//! Turns a [`Transaction`](crate::models::Transaction) into printable output.
//! Three layouts share only the paper width:
//! - `control`: ESC/POS bytes for the printer
//! - `plain`: space-padded text for previews and channels without control codes
//! - `diagnostic`: a test page proving a channel works end to end
//!
//! The control and plain layouts differ on purpose (section order, the
//! always-present "Change" line of the text layout). Keep them separate.

mod control;
mod diagnostic;
mod layout;
mod plain;

pub use layout::{LineLayout, display_name, money, pad_left, pad_right, price_prefix};

use crate::settings::PaperWidth;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";
const DEFAULT_SITE_NAME: &str = "RECEIPT";

/// Receipt formatter for one paper width
///
/// Pure: output depends only on the arguments, so equal inputs give
/// byte-identical receipts.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptFormatter {
    paper_width: PaperWidth,
    layout: LineLayout,
}

impl ReceiptFormatter {
    pub fn new(paper_width: PaperWidth) -> Self {
        Self {
            paper_width,
            layout: LineLayout::new(paper_width.chars_per_line()),
        }
    }

    pub fn chars_per_line(&self) -> usize {
        self.layout.chars_per_line()
    }
}
