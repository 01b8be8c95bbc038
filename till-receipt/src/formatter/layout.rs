//! Fixed-width line layout
//!
//! Every width here is counted in printer columns (`char`s), see
//! [`till_printer::text_width`].

use till_printer::{text_width, truncate_width};

const ELLIPSIS: &str = "...";

/// Pad with trailing spaces to `width`; never truncates
pub fn pad_right(text: &str, width: usize) -> String {
    format!("{:<width$}", text)
}

/// Pad with leading spaces to `width`; never truncates
pub fn pad_left(text: &str, width: usize) -> String {
    format!("{:>width$}", text)
}

/// Cut `text` to `width` columns, ending in "..." when there is room for it
fn ellipsize(text: &str, width: usize) -> String {
    if width >= ELLIPSIS.len() {
        format!("{}{}", truncate_width(text, width - ELLIPSIS.len()), ELLIPSIS)
    } else {
        truncate_width(text, width)
    }
}

/// Short tag printed before a product name for its price tier
///
/// Matching is case-insensitive; unknown tiers print as given.
pub fn price_prefix(tier: &str) -> String {
    match tier.to_lowercase().as_str() {
        "standard" | "" => String::new(),
        "double" => "DBL".to_string(),
        "small" => "SML".to_string(),
        "large" => "LRG".to_string(),
        "half" => "HALF".to_string(),
        "schooner" => "2/3PT".to_string(),
        _ => tier.to_string(),
    }
}

/// Product name with its price tier tag, e.g. "DBL Gin"
pub fn display_name(product_name: &str, tier: &str) -> String {
    let prefix = price_prefix(tier);
    if prefix.is_empty() {
        product_name.to_string()
    } else {
        format!("{} {}", prefix, product_name)
    }
}

/// Amount with the currency symbol, two decimal places
pub fn money(amount: f64) -> String {
    format!("£{:.2}", amount)
}

/// Line geometry for one paper width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    chars_per_line: usize,
}

impl LineLayout {
    pub fn new(chars_per_line: usize) -> Self {
        Self { chars_per_line }
    }

    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    /// Left-pad so the text sits in the middle of the line
    ///
    /// Text wider than the line is returned as is.
    pub fn center_text(&self, text: &str) -> String {
        let padding = self.chars_per_line.saturating_sub(text_width(text)) / 2;
        format!("{}{}", " ".repeat(padding), text)
    }

    /// `left` and `right` on one line, `right` flush with the edge
    ///
    /// The result is exactly `chars_per_line` wide. A `left` that does not
    /// fit is cut and ends in "...". A `right` wider than the whole line is
    /// cut the same way first.
    pub fn format_line(&self, left: &str, right: &str) -> String {
        let right = self.clip(right);
        let left_width = self.chars_per_line - text_width(&right);

        if text_width(left) > left_width {
            format!("{}{}", pad_right(&ellipsize(left, left_width), left_width), right)
        } else {
            format!("{}{}", pad_right(left, left_width), right)
        }
    }

    /// Text cut to fit on one line
    pub fn clip(&self, text: &str) -> String {
        if text_width(text) > self.chars_per_line {
            ellipsize(text, self.chars_per_line)
        } else {
            text.to_string()
        }
    }

    /// A full-width rule of `c`
    pub fn divider(&self, c: char) -> String {
        std::iter::repeat_n(c, self.chars_per_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_never_truncates() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_left("ab", 4), "  ab");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
        assert_eq!(pad_left("abcdef", 4), "abcdef");
        assert_eq!(pad_left("£1.00", 7), "  £1.00");
    }

    #[test]
    fn test_center_text() {
        let layout = LineLayout::new(48);
        let centered = layout.center_text("HI");
        assert_eq!(centered, format!("{}HI", " ".repeat(23)));
        assert_eq!(centered.len(), 25);
    }

    #[test]
    fn test_center_text_too_long_is_unpadded() {
        let layout = LineLayout::new(4);
        assert_eq!(layout.center_text("TOO LONG"), "TOO LONG");
    }

    #[test]
    fn test_format_line_truncates_left() {
        let layout = LineLayout::new(32);
        let line = layout.format_line("Espresso Macchiato Deluxe Special", "£3.50");

        assert_eq!(text_width(&line), 32);
        assert!(line.ends_with("£3.50"));
        assert!(line.starts_with("Espresso Macchiato Delux..."));
        assert_eq!(
            line,
            format!("{}...£3.50", truncate_width("Espresso Macchiato Deluxe Special", 24))
        );
    }

    #[test]
    fn test_format_line_pads_to_width() {
        let layout = LineLayout::new(32);
        let line = layout.format_line("Subtotal", "£12.00");

        assert_eq!(text_width(&line), 32);
        assert_eq!(line, format!("Subtotal{}£12.00", " ".repeat(18)));
    }

    #[test]
    fn test_format_line_exact_fit_is_untouched() {
        let layout = LineLayout::new(10);
        assert_eq!(layout.format_line("abcde", "12345"), "abcde12345");
    }

    #[test]
    fn test_format_line_oversized_right() {
        let layout = LineLayout::new(10);
        let line = layout.format_line("Operator", "A very long operator name");
        assert_eq!(text_width(&line), 10);
        assert_eq!(line, "A very ...");
    }

    #[test]
    fn test_divider() {
        assert_eq!(LineLayout::new(5).divider('-'), "-----");
    }

    #[test]
    fn test_price_prefix() {
        assert_eq!(price_prefix("Double"), "DBL");
        assert_eq!(price_prefix("Standard"), "");
        assert_eq!(price_prefix("SMALL"), "SML");
        assert_eq!(price_prefix("large"), "LRG");
        assert_eq!(price_prefix("Half"), "HALF");
        assert_eq!(price_prefix("schooner"), "2/3PT");
        assert_eq!(price_prefix("125ml"), "125ml");
        assert_eq!(price_prefix("175ml"), "175ml");
        assert_eq!(price_prefix("250ml"), "250ml");
        assert_eq!(price_prefix("Venti"), "Venti");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Gin", "double"), "DBL Gin");
        assert_eq!(display_name("Latte", "standard"), "Latte");
        assert_eq!(display_name("Latte", ""), "Latte");
        assert_eq!(display_name("Merlot", "175ml"), "175ml Merlot");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(3.5), "£3.50");
        assert_eq!(money(0.0), "£0.00");
        assert_eq!(money((-2.5_f64).abs()), "£2.50");
    }
}
