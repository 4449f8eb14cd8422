//! Abstractions over [`lsp_types::SemanticToken`] and [`lsp_types::SemanticTokenModifier`].

use lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};
use text_size::TextRange;

use crate::lines::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemToken {
	BuiltinType,
	Class,
	Enum,
	EnumMember,
	Function,
	Keyword,
	Method,
	Namespace,
	Number,
	Operator,
	Param,
	Property,
	String,
	Type,
	TypeParam,
	Variable,
	// Added by AngelLS /////////////////////////////////////////////////////////
	EscapeSeq,
}

impl From<SemToken> for SemanticTokenType {
	fn from(value: SemToken) -> Self {
		match value {
			SemToken::BuiltinType => Self::new("builtinType"),
			SemToken::Class => Self::CLASS,
			SemToken::Enum => Self::ENUM,
			SemToken::EnumMember => Self::ENUM_MEMBER,
			SemToken::Function => Self::FUNCTION,
			SemToken::Keyword => Self::KEYWORD,
			SemToken::Method => Self::METHOD,
			SemToken::Namespace => Self::NAMESPACE,
			SemToken::Number => Self::NUMBER,
			SemToken::Operator => Self::OPERATOR,
			SemToken::Param => Self::PARAMETER,
			SemToken::Property => Self::PROPERTY,
			SemToken::String => Self::STRING,
			SemToken::Type => Self::TYPE,
			SemToken::TypeParam => Self::TYPE_PARAMETER,
			SemToken::Variable => Self::VARIABLE,
			SemToken::EscapeSeq => Self::new("escapeSequence"),
		}
	}
}

bitflags::bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct SemTokenFlags: u8 {
		const DECLARATION = 1 << 0;
		const READONLY = 1 << 1;
		const MEMBER = 1 << 2;
		const CONTROL_FLOW = 1 << 3;
	}
}

/// The annotation the parser and resolver write onto a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Highlight {
	pub kind: SemToken,
	pub flags: SemTokenFlags,
}

impl From<SemToken> for Highlight {
	fn from(kind: SemToken) -> Self {
		Self {
			kind,
			flags: SemTokenFlags::empty(),
		}
	}
}

/// Delta-encodes highlighted ranges, which must be fed in document order.
pub struct Highlighter<'li> {
	lndx: &'li LineIndex,
	tokens: Vec<SemanticToken>,
	prev_line: u32,
	prev_col: u32,
}

impl<'li> Highlighter<'li> {
	#[must_use]
	pub fn new(lndx: &'li LineIndex) -> Self {
		Self {
			lndx,
			tokens: vec![],
			prev_line: 0,
			prev_col: 0,
		}
	}

	pub fn advance_mod(&mut self, semtok: SemToken, range: TextRange, flags: SemTokenFlags) {
		self.advance_impl(semtok, range, flags.bits() as u32);
	}

	pub fn advance(&mut self, semtok: SemToken, range: TextRange) {
		self.advance_impl(semtok, range, SemTokenFlags::empty().bits() as u32)
	}

	fn advance_impl(&mut self, semtok: SemToken, range: TextRange, bits: u32) {
		if range.is_empty() {
			return;
		}

		let pos = self.lndx.position_utf16(range.start());
		let end = self.lndx.position_utf16(range.end());

		// Tokens spanning lines (heredoc strings) are clipped to their first line.
		let length = if end.line == pos.line {
			end.character - pos.character
		} else {
			let eol = self.lndx.line_end(pos.line).unwrap_or(range.end());
			self.lndx.position_utf16(eol).character - pos.character
		};

		let mut delta_line = pos.line;
		let mut delta_start = pos.character;

		if !self.tokens.is_empty() {
			delta_line -= self.prev_line;

			if delta_line == 0 {
				delta_start -= self.prev_col;
			}
		}

		self.tokens.push(SemanticToken {
			delta_line,
			delta_start,
			length,
			token_type: semtok as u32,
			token_modifiers_bitset: bits,
		});

		self.prev_line = pos.line;
		self.prev_col = pos.character;
	}

	#[must_use]
	pub fn finish(self) -> Vec<SemanticToken> {
		self.tokens
	}
}

#[must_use]
pub fn legend() -> SemanticTokensLegend {
	// Ordering must match that of `SemToken`.
	let types = vec![
		SemToken::BuiltinType.into(),
		SemToken::Class.into(),
		SemToken::Enum.into(),
		SemToken::EnumMember.into(),
		SemToken::Function.into(),
		SemToken::Keyword.into(),
		SemToken::Method.into(),
		SemToken::Namespace.into(),
		SemToken::Number.into(),
		SemToken::Operator.into(),
		SemToken::Param.into(),
		SemToken::Property.into(),
		SemToken::String.into(),
		SemToken::Type.into(),
		SemToken::TypeParam.into(),
		SemToken::Variable.into(),
		SemToken::EscapeSeq.into(),
	];

	// Ordering must match that of `SemTokenFlags`.
	let modifiers = vec![
		SemanticTokenModifier::DECLARATION,
		SemanticTokenModifier::READONLY,
		SemanticTokenModifier::new("member"),
		SemanticTokenModifier::new("controlFlow"),
	];

	SemanticTokensLegend {
		token_types: types,
		token_modifiers: modifiers,
	}
}

#[cfg(test)]
mod test {
	use text_size::TextSize;

	use super::*;

	#[test]
	fn delta_encoding() {
		let lndx = LineIndex::new("int a;\n  a = 1;");
		let mut hl = Highlighter::new(&lndx);
		let r = |s: u32, e: u32| TextRange::new(TextSize::from(s), TextSize::from(e));

		hl.advance(SemToken::BuiltinType, r(0, 3));
		hl.advance_mod(SemToken::Variable, r(4, 5), SemTokenFlags::DECLARATION);
		hl.advance(SemToken::Variable, r(9, 10));
		hl.advance(SemToken::Number, r(13, 14));

		let toks = hl.finish();
		assert_eq!(toks.len(), 4);
		assert_eq!((toks[1].delta_line, toks[1].delta_start), (0, 4));
		assert_eq!(toks[1].token_modifiers_bitset, 1);
		assert_eq!((toks[2].delta_line, toks[2].delta_start), (1, 2));
		assert_eq!((toks[3].delta_line, toks[3].delta_start), (0, 4));
		assert_eq!(toks[3].token_type, SemToken::Number as u32);
	}

	#[test]
	fn multiline_clipped() {
		let text = "s = \"\"\"héllo\nworld\"\"\";";
		let lndx = LineIndex::new(text);
		let mut hl = Highlighter::new(&lndx);
		let start = text.find('"').unwrap() as u32;
		let end = text.rfind('"').unwrap() as u32 + 1;

		hl.advance(SemToken::String, TextRange::new(start.into(), end.into()));

		let toks = hl.finish();
		assert_eq!(toks[0].delta_start, 4);
		// `"""héllo` in UTF-16 code units.
		assert_eq!(toks[0].length, 8);
	}

	#[test]
	fn legend_matches_enum() {
		let legend = legend();
		assert_eq!(legend.token_types.len(), SemToken::EscapeSeq as usize + 1);
		assert_eq!(
			legend.token_types[SemToken::Variable as usize],
			SemanticTokenType::VARIABLE
		);
	}
}
