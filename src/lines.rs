//! Conversion between flat byte offsets and `(line, column)` positions.
//!
//! Editors speak UTF-16 columns; the analysis speaks UTF-8 byte offsets.

use lsp_types::Position;
use nohash_hasher::IntMap;
use text_size::{TextRange, TextSize};

use crate::error::Error;

/// `(line, column)` information in the native, UTF-8 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
	/// Zero-based.
	pub line: u32,
	/// Zero-based UTF-8 offset.
	pub col: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
	/// Start offset of a character inside a line, zero-based.
	start: TextSize,
	/// End offset of a character inside a line, zero-based.
	end: TextSize,
}

impl WideChar {
	#[must_use]
	fn len(&self) -> TextSize {
		self.end - self.start
	}

	/// Length in UTF-16 code units.
	#[must_use]
	fn len_utf16(&self) -> u32 {
		if self.len() == TextSize::from(4) {
			2
		} else {
			1
		}
	}
}

/// Maps flat [`TextSize`] offsets to/from `(line, column)` representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
	/// Offset the beginning of each line (except the first, which always has offset 0).
	newlines: Box<[TextSize]>,
	/// Non-ASCII characters on each line, keyed by line number.
	line_wide_chars: IntMap<u32, Box<[WideChar]>>,
	len: TextSize,
}

impl LineIndex {
	#[must_use]
	pub fn new(text: &str) -> Self {
		let mut newlines = vec![];
		let mut wide = IntMap::<u32, Vec<WideChar>>::default();
		let mut line_start = TextSize::from(0);

		for (i, c) in text.char_indices() {
			let pos = TextSize::from(i as u32);

			if c == '\n' {
				line_start = pos + TextSize::from(1);
				newlines.push(line_start);
				continue;
			}

			if !c.is_ascii() {
				let start = pos - line_start;

				wide.entry(newlines.len() as u32)
					.or_default()
					.push(WideChar {
						start,
						end: start + TextSize::of(c),
					});
			}
		}

		Self {
			newlines: newlines.into_boxed_slice(),
			line_wide_chars: wide
				.into_iter()
				.map(|(k, v)| (k, v.into_boxed_slice()))
				.collect(),
			len: TextSize::of(text),
		}
	}

	/// Returns `None` if `offset` extends past the end of the text.
	#[must_use]
	pub fn line_col(&self, offset: TextSize) -> Option<LineCol> {
		if offset > self.len {
			return None;
		}

		let line = self.newlines.partition_point(|&it| it <= offset);
		let start = self.start_offset(line)?;

		Some(LineCol {
			line: line as u32,
			col: (offset - start).into(),
		})
	}

	#[must_use]
	pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
		let ret = self.start_offset(line_col.line as usize)? + TextSize::from(line_col.col);
		(ret <= self.len).then_some(ret)
	}

	/// Offset of the line break ending `line`, or `None` for the last line.
	#[must_use]
	pub fn line_end(&self, line: u32) -> Option<TextSize> {
		self.newlines
			.get(line as usize)
			.map(|next| *next - TextSize::from(1))
	}

	/// Converts an editor position (UTF-16 column) to a byte offset.
	pub fn offset_utf16(&self, pos: Position) -> Result<TextSize, Error> {
		let mut col = pos.character;

		if let Some(wide_chars) = self.line_wide_chars.get(&pos.line) {
			for c in wide_chars.iter() {
				if col > u32::from(c.start) {
					col += u32::from(c.len()) - c.len_utf16();
				} else {
					break;
				}
			}
		}

		let lc = LineCol {
			line: pos.line,
			col,
		};

		self.offset(lc).ok_or(Error::Position(lc))
	}

	/// Converts a byte offset to an editor position (UTF-16 column).
	#[must_use]
	pub fn position_utf16(&self, offset: TextSize) -> Position {
		let lc = self.line_col(offset.min(self.len)).unwrap_or(LineCol { line: 0, col: 0 });
		let mut col = lc.col;

		if let Some(wide_chars) = self.line_wide_chars.get(&lc.line) {
			for c in wide_chars.iter() {
				if u32::from(c.end) <= lc.col {
					col -= u32::from(c.len()) - c.len_utf16();
				} else {
					break;
				}
			}
		}

		Position {
			line: lc.line,
			character: col,
		}
	}

	#[must_use]
	pub fn range_utf16(&self, range: TextRange) -> lsp_types::Range {
		lsp_types::Range {
			start: self.position_utf16(range.start()),
			end: self.position_utf16(range.end()),
		}
	}

	#[must_use]
	pub fn len(&self) -> TextSize {
		self.len
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len == TextSize::from(0)
	}

	fn start_offset(&self, line: usize) -> Option<TextSize> {
		match line.checked_sub(1) {
			None => Some(TextSize::from(0)),
			Some(it) => self.newlines.get(it).copied(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn smoke() {
		let lndx = LineIndex::new("int a;\nstring s = \"é\";\n");
		let lc = lndx.line_col(TextSize::from(8)).unwrap();
		assert_eq!(lc, LineCol { line: 1, col: 1 });
		assert_eq!(lndx.offset(lc), Some(TextSize::from(8)));
		assert!(lndx.line_col(TextSize::from(100)).is_none());
	}

	#[test]
	fn utf16_columns() {
		// `é` is two UTF-8 bytes but one UTF-16 unit.
		let lndx = LineIndex::new("\"é\" x");
		let x = TextSize::from(5);
		let pos = lndx.position_utf16(x);
		assert_eq!(pos.character, 4);
		assert_eq!(lndx.offset_utf16(pos).unwrap(), x);
	}
}
