use heapless::String;

use crate::decoder::Decoder;

pub const LINE_ENDING: &str = "\r\n";

/// One formatted reading, ready for the serial line.
///
/// `N` counts a terminator slot as the wire format does, the text itself is
/// length tracked and never contains it.
#[derive(Clone, PartialEq, Debug)]
pub struct Line<const N: usize> {
    text: String<N>,
}

impl<const N: usize> Line<N> {
    pub fn new() -> Self {
        Line {
            text: String::new(),
        }
    }

    // Callers size N for their widest line, so nothing is ever dropped here.
    pub(crate) fn push(&mut self, c: char) {
        self.text.push(c).ok();
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.text.push_str(s).ok();
    }

    pub(crate) fn push_digit(&mut self, nibble: u32) {
        self.push(glyph(nibble));
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl<const N: usize> Default for Line<N> {
    fn default() -> Self {
        Line::new()
    }
}

impl<const N: usize> AsRef<[u8]> for Line<N> {
    fn as_ref(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// BCD digit glyph, codes above 9 are blanked digits.
pub fn glyph(nibble: u32) -> char {
    match nibble & 0xf {
        n @ 0..=9 => (b'0' + n as u8) as char,
        _ => ' ',
    }
}

/// Turns a completed capture into its text line.
pub trait Formatter {
    type Decoder: Decoder;
    type Line: AsRef<[u8]>;

    /// `aux` is the sample that completed the capture; one-shot lines such
    /// as overflow or range are read from it.
    fn format(decoded: &Self::Decoder, aux: <Self::Decoder as Decoder>::Signals) -> Self::Line;
}
