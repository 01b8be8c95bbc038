//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::codepage::convert_to_cp1252;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// `GS !` character size bits
const SIZE_NORMAL: u8 = 0x00;
const SIZE_DOUBLE_HEIGHT: u8 = 0x01;
const SIZE_DOUBLE_WIDTH: u8 = 0x10;

/// Build the 5-byte cash drawer pulse `ESC p m t1 t2`.
///
/// `select` picks the drive output (0x00 or 0x01); the on/off times are
/// fixed at 25 x 2ms and 250 x 2ms.
pub fn cash_drawer_pulse(select: u8) -> [u8; 5] {
    [ESC, 0x70, select, 0x19, 0xFA]
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is written as
/// UTF-8 and converted to the printer code page by [`EscPosBuilder::build`].
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    size: u8,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(2048);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[ESC, 0x40]);
        Self {
            buf,
            width,
            size: SIZE_NORMAL,
        }
    }

    // === Text Output ===

    /// Write raw text
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x61, 0x01]);
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x61, 0x00]);
        self
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x45, 0x00]);
        self
    }

    /// Enable single-dot underline
    pub fn underline(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x2D, 0x01]);
        self
    }

    /// Disable underline
    pub fn underline_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, 0x2D, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.set_size(SIZE_DOUBLE_WIDTH | SIZE_DOUBLE_HEIGHT)
    }

    /// Double height on, width unchanged
    pub fn double_height(&mut self) -> &mut Self {
        self.set_size(self.size | SIZE_DOUBLE_HEIGHT)
    }

    /// Double height off, width unchanged
    pub fn double_height_off(&mut self) -> &mut Self {
        self.set_size(self.size & !SIZE_DOUBLE_HEIGHT)
    }

    /// Double width on, height unchanged
    pub fn double_width(&mut self) -> &mut Self {
        self.set_size(self.size | SIZE_DOUBLE_WIDTH)
    }

    /// Double width off, height unchanged
    pub fn double_width_off(&mut self) -> &mut Self {
        self.set_size(self.size & !SIZE_DOUBLE_WIDTH)
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.set_size(SIZE_NORMAL)
    }

    fn set_size(&mut self, size: u8) -> &mut Self {
        self.size = size;
        self.buf.extend_from_slice(&[GS, 0x21, size]);
        self
    }

    // === Separators ===

    /// Print a full-width line of `c`
    pub fn separator(&mut self, c: char) -> &mut Self {
        let rule: String = std::iter::repeat_n(c, self.width).collect();
        self.line(&rule)
    }

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.separator('=')
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.separator('-')
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[GS, 0x56, 0x00]);
        self
    }

    // === Build ===

    /// Build the final byte buffer in the printer code page
    pub fn build(self) -> Vec<u8> {
        convert_to_cp1252(&self.buf)
    }

    /// Build without code page conversion (UTF-8 text, for debugging)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_starts_with_init() {
        let data = EscPosBuilder::new(32).build_raw();
        assert_eq!(data, vec![0x1B, 0x40]);
    }

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new(32);
        b.center()
            .double_size()
            .line("TITLE")
            .reset_size()
            .left()
            .line("body");

        let data = b.build_raw();
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("TITLE\n"));
        assert!(data.windows(3).any(|w| w == [0x1D, 0x21, 0x11]));
        assert!(data.windows(3).any(|w| w == [0x1D, 0x21, 0x00]));
    }

    #[test]
    fn test_width_and_height_toggle_independently() {
        let mut b = EscPosBuilder::new(32);
        b.double_width().double_height().double_width_off();

        let data = b.build_raw();
        assert_eq!(
            &data[2..],
            &[0x1D, 0x21, 0x10, 0x1D, 0x21, 0x11, 0x1D, 0x21, 0x01]
        );
    }

    #[test]
    fn test_separators() {
        let mut b = EscPosBuilder::new(10);
        b.sep_double().separator('*');

        let data = b.build_raw();
        let s = String::from_utf8_lossy(&data);
        assert!(s.contains("==========\n"));
        assert!(s.contains("**********\n"));
    }

    #[test]
    fn test_cash_drawer_pulse_layout() {
        assert_eq!(cash_drawer_pulse(0x00), [0x1B, 0x70, 0x00, 0x19, 0xFA]);
        assert_eq!(cash_drawer_pulse(0x01), [0x1B, 0x70, 0x01, 0x19, 0xFA]);
    }

    #[test]
    fn test_build_converts_pound_sign() {
        let mut b = EscPosBuilder::new(32);
        b.line("£3.50");

        let data = b.build();
        assert!(data.windows(6).any(|w| w == b"\xA33.50\n"));
    }
}
