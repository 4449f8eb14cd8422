//! The tokenizer.
//!
//! Whitespace and comments are skipped and produce no tokens. Every other byte
//! of the input belongs to exactly one token; characters which fit no other
//! category become single-character [`TokenKind::Unknown`] tokens.

use std::cell::Cell;

use text_size::{TextRange, TextSize};

use crate::semtokens::Highlight;

use super::reserved::{self, is_ident_byte, ReservedFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	Reserved,
	Identifier,
	String,
	Number,
	Unknown,
}

#[derive(Debug, Clone)]
pub struct Token {
	pub kind: TokenKind,
	pub text: Box<str>,
	pub span: TextRange,
	/// Empty unless `kind` is [`TokenKind::Reserved`].
	pub reserved: ReservedFlags,
	/// Written by the parser and resolver; read by the highlighter.
	pub highlight: Cell<Option<Highlight>>,
}

impl Token {
	#[must_use]
	pub fn is_reserved(&self, text: &str) -> bool {
		self.kind == TokenKind::Reserved && &*self.text == text
	}

	#[must_use]
	pub fn is_ident(&self) -> bool {
		self.kind == TokenKind::Identifier
	}

	/// Overwrites any previous annotation.
	pub fn mark(&self, highlight: impl Into<Highlight>) {
		self.highlight.set(Some(highlight.into()));
	}

	/// Only annotates if nothing else has.
	pub fn mark_default(&self, highlight: impl Into<Highlight>) {
		if self.highlight.get().is_none() {
			self.mark(highlight);
		}
	}
}

/// Index of a token in the sequence returned by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenIx(pub u32);

impl TokenIx {
	#[must_use]
	pub fn get(self, tokens: &[Token]) -> &Token {
		&tokens[self.0 as usize]
	}
}

#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
	let registry = reserved::registry();
	let bytes = text.as_bytes();
	let mut tokens = Vec::with_capacity(text.len() / 4);
	let mut pos = 0;

	while pos < bytes.len() {
		let b = bytes[pos];
		let rest = &text[pos..];

		if b.is_ascii_whitespace() {
			pos += 1;
			continue;
		}

		if rest.starts_with("//") {
			pos += rest.find('\n').unwrap_or(rest.len());
			continue;
		}

		if rest.starts_with("/*") {
			pos += rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
			continue;
		}

		let leading_dot_number = b == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit);

		let (kind, len, flags) = if let (false, Some((flags, len))) =
			(leading_dot_number, registry.classify_mark(text, pos))
		{
			(TokenKind::Reserved, len, flags)
		} else if is_ident_byte(b) && !b.is_ascii_digit() {
			let len = bytes[pos..]
				.iter()
				.position(|&c| !is_ident_byte(c))
				.unwrap_or(bytes.len() - pos);

			match registry.classify_keyword(&rest[..len]) {
				Some(flags) => (TokenKind::Reserved, len, flags),
				None => (TokenKind::Identifier, len, ReservedFlags::empty()),
			}
		} else if b.is_ascii_digit() || leading_dot_number {
			(TokenKind::Number, scan_number(rest), ReservedFlags::empty())
		} else if b == b'"' || b == b'\'' {
			(TokenKind::String, scan_string(rest), ReservedFlags::empty())
		} else {
			let len = rest.chars().next().map_or(1, char::len_utf8);
			(TokenKind::Unknown, len, ReservedFlags::empty())
		};

		tokens.push(Token {
			kind,
			text: rest[..len].into(),
			span: TextRange::at(TextSize::from(pos as u32), TextSize::from(len as u32)),
			reserved: flags,
			highlight: Cell::new(None),
		});

		pos += len;
	}

	tokens
}

#[must_use]
fn scan_number(text: &str) -> usize {
	let bytes = text.as_bytes();
	let count = |start: usize, pred: fn(&u8) -> bool| {
		bytes[start..].iter().take_while(|b| pred(b)).count()
	};

	if bytes.len() > 2 && bytes[0] == b'0' {
		let digits = match bytes[1].to_ascii_lowercase() {
			b'x' => count(2, u8::is_ascii_hexdigit),
			b'b' => count(2, |b| matches!(b, b'0' | b'1')),
			b'o' => count(2, |b| matches!(b, b'0'..=b'7')),
			b'd' => count(2, u8::is_ascii_digit),
			_ => 0,
		};

		if digits > 0 {
			return 2 + digits;
		}
	}

	let mut len = count(0, u8::is_ascii_digit);

	if bytes.get(len) == Some(&b'.') {
		len += 1 + count(len + 1, u8::is_ascii_digit);
	}

	if matches!(bytes.get(len), Some(b'e' | b'E')) {
		let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+' | b'-')));
		let exp = count(len + 1 + sign, u8::is_ascii_digit);

		if exp > 0 {
			len += 1 + sign + exp;
		}
	}

	if matches!(bytes.get(len), Some(b'f' | b'F')) {
		len += 1;
	}

	len
}

/// Unterminated literals end at the line break (or end of input for heredocs).
#[must_use]
fn scan_string(text: &str) -> usize {
	if let Some(body) = text.strip_prefix(r#"""""#) {
		return body.find(r#"""""#).map_or(text.len(), |i| i + 6);
	}

	let quote = text.as_bytes()[0] as char;
	let mut chars = text.char_indices().skip(1);

	while let Some((i, c)) = chars.next() {
		match c {
			'\\' => {
				if let Some((_, '\n')) = chars.next() {
					return i + 1;
				}
			}
			'\n' => return i,
			c if c == quote => return i + 1,
			_ => {}
		}
	}

	text.len()
}

#[cfg(test)]
mod test {
	use proptest::prelude::*;

	use super::*;

	fn kinds_and_texts(text: &str) -> Vec<(TokenKind, String)> {
		tokenize(text)
			.into_iter()
			.map(|t| (t.kind, t.text.to_string()))
			.collect()
	}

	#[test]
	fn smoke() {
		let tokens = tokenize("int add(int a, int b) { return a; }");
		assert_eq!(tokens.len(), 14);
		assert_eq!(tokens[0].kind, TokenKind::Reserved);
		assert!(tokens[0].reserved.contains(ReservedFlags::NUMERIC_TYPE));
		assert_eq!(tokens[1].kind, TokenKind::Identifier);
		assert_eq!(&*tokens[1].text, "add");
		assert!(tokens[10].is_reserved("return"));
		assert!(tokens.iter().all(|t| t.highlight.get().is_none()));
	}

	#[test]
	fn longest_marks() {
		assert_eq!(
			kinds_and_texts("a>>>=b"),
			vec![
				(TokenKind::Identifier, "a".to_string()),
				(TokenKind::Reserved, ">>>=".to_string()),
				(TokenKind::Identifier, "b".to_string()),
			]
		);

		assert_eq!(tokenize("x >>= 1").len(), 3);
	}

	#[test]
	fn literals() {
		let toks = kinds_and_texts(r#"0xFF 1.5e-3f .5 3. "a\"b" 'c' """multi
line""" 12abc"#);

		let texts = toks.iter().map(|t| t.1.as_str()).collect::<Vec<_>>();
		assert_eq!(
			texts,
			[
				"0xFF",
				"1.5e-3f",
				".5",
				"3.",
				r#""a\"b""#,
				"'c'",
				"\"\"\"multi\nline\"\"\"",
				"12",
				"abc"
			]
		);
	}

	#[test]
	fn unterminated() {
		let toks = kinds_and_texts("\"abc\nint /* never closed");
		assert_eq!(toks[0], (TokenKind::String, "\"abc".to_string()));
		assert_eq!(toks[1], (TokenKind::Reserved, "int".to_string()));
		assert_eq!(toks.len(), 2);
	}

	#[test]
	fn comments_and_unknowns() {
		let toks = kinds_and_texts("a // b\n/* c */ $ é");
		assert_eq!(
			toks,
			vec![
				(TokenKind::Identifier, "a".to_string()),
				(TokenKind::Unknown, "$".to_string()),
				(TokenKind::Identifier, "é".to_string()),
			]
		);
	}

	/// Strips everything the tokenizer is allowed to skip.
	fn only_skippable(gap: &str) -> bool {
		let mut rest = gap.trim_start();

		while !rest.is_empty() {
			if let Some(r) = rest.strip_prefix("//") {
				rest = r.find('\n').map_or("", |i| &r[i..]);
			} else if let Some(r) = rest.strip_prefix("/*") {
				rest = r.find("*/").map_or("", |i| &r[i + 2..]);
			} else {
				return false;
			}

			rest = rest.trim_start();
		}

		true
	}

	proptest! {
		#[test]
		fn totality(text in "[ -~\\n\\té$]{0,64}") {
			let tokens = tokenize(&text);
			let mut cursor = 0usize;

			for token in &tokens {
				let start = usize::from(token.span.start());
				let end = usize::from(token.span.end());
				prop_assert!(start >= cursor);
				prop_assert!(end > start);
				prop_assert_eq!(&text[start..end], &*token.text);
				prop_assert!(only_skippable(&text[cursor..start]));
				cursor = end;
			}

			prop_assert!(only_skippable(&text[cursor..]));
		}
	}
}
