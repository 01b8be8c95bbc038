//! Test page for checking a channel end to end

use super::{DATE_FORMAT, ReceiptFormatter, TIME_FORMAT};
use chrono::NaiveDateTime;
use till_printer::EscPosBuilder;

impl ReceiptFormatter {
    /// Render the diagnostic page for `now`
    pub fn generate_test_receipt(&self, now: NaiveDateTime) -> Vec<u8> {
        let l = &self.layout;
        let mut b = EscPosBuilder::new(self.chars_per_line());

        b.center();
        b.double_size();
        b.line("TEST PRINT");
        b.reset_size();
        b.newline();

        b.left();
        b.sep_double();
        b.line(&l.format_line("Paper width", &self.paper_width.to_string()));
        b.line(&l.format_line("Chars per line", &self.chars_per_line().to_string()));
        b.line(&l.format_line("Date", &now.format(DATE_FORMAT).to_string()));
        b.line(&l.format_line("Time", &now.format(TIME_FORMAT).to_string()));
        b.sep_double();

        b.newline();
        b.center();
        b.bold();
        b.line(&l.clip("Printer connected successfully!"));
        b.bold_off();
        b.left();

        b.feed(4);
        b.cut();

        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::test_support::visible_lines;
    use crate::settings::PaperWidth;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 5))
            .unwrap()
    }

    #[test]
    fn test_reports_paper_geometry() {
        let bytes = ReceiptFormatter::new(PaperWidth::Mm58).generate_test_receipt(noon());
        let lines = visible_lines(&bytes);

        assert_eq!(lines[0], "TEST PRINT");
        assert!(lines.contains(&format!("Paper width{}58mm", " ".repeat(32 - 11 - 4))));
        assert!(lines.contains(&format!("Chars per line{}32", " ".repeat(32 - 14 - 2))));
        assert!(lines.iter().any(|l| l.starts_with("Date") && l.ends_with("01/06/2024")));
        assert!(lines.iter().any(|l| l.starts_with("Time") && l.ends_with("12:00:05")));
        assert!(lines.contains(&"Printer connected successfully!".to_string()));
    }

    #[test]
    fn test_80mm_reports_48_columns() {
        let bytes = ReceiptFormatter::new(PaperWidth::Mm80).generate_test_receipt(noon());
        let lines = visible_lines(&bytes);
        assert!(lines.iter().any(|l| l.starts_with("Chars per line") && l.ends_with("48")));
        assert!(lines.iter().any(|l| l.ends_with("80mm")));
    }

    #[test]
    fn test_ends_with_cut() {
        let bytes = ReceiptFormatter::new(PaperWidth::Mm80).generate_test_receipt(noon());
        assert!(bytes.ends_with(&[0x1D, 0x56, 0x00]));
    }
}
