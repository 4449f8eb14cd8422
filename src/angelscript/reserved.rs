//! The reserved-word registry: every operator mark and keyword, with the
//! category flags the parser and resolver dispatch on.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

bitflags::bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct ReservedFlags: u16 {
		/// Symbolic rather than alphabetic.
		const MARK = 1 << 0;
		const PREFIX_OP = 1 << 1;
		const BITWISE_OP = 1 << 2;
		const ARITHMETIC_OP = 1 << 3;
		const COMPARISON_OP = 1 << 4;
		const LOGICAL_OP = 1 << 5;
		const ASSIGNMENT_OP = 1 << 6;
		const NUMERIC_TYPE = 1 << 7;
		const PRIMITIVE_TYPE = 1 << 8;
	}
}

impl ReservedFlags {
	/// Admissible between two expression terms.
	pub const BINARY_OP: Self = Self::BITWISE_OP
		.union(Self::ARITHMETIC_OP)
		.union(Self::COMPARISON_OP)
		.union(Self::LOGICAL_OP);
}

const MARKS: &[&str] = &[
	"*", "**", "/", "%", "+", "-", "<=", "<", ">=", ">", "(", ")", "==", "!=", "?", ":", "=",
	"+=", "-=", "*=", "/=", "%=", "**=", "++", "--", "&", ",", "{", "}", ";", "|", "^", "~",
	"<<", ">>", ">>>", "&=", "|=", "^=", "<<=", ">>=", ">>>=", ".", "&&", "||", "!", "[", "]",
	"^^", "@", "!is", "::", "#",
];

const KEYWORDS: &[&str] = &[
	"and", "auto", "bool", "break", "case", "cast", "catch", "class", "const", "continue",
	"default", "do", "double", "else", "enum", "false", "float", "for", "funcdef", "if",
	"import", "in", "inout", "int", "int8", "int16", "int32", "int64", "interface", "is",
	"mixin", "namespace", "not", "null", "or", "out", "private", "protected", "return",
	"switch", "true", "try", "typedef", "uint", "uint8", "uint16", "uint32", "uint64", "void",
	"while", "xor",
];

const PREFIX_OPS: &[&str] = &["-", "+", "!", "++", "--", "~", "@", "not"];
const BITWISE_OPS: &[&str] = &["&", "|", "^", "<<", ">>", ">>>"];
const ARITHMETIC_OPS: &[&str] = &["+", "-", "*", "/", "%", "**"];
const COMPARISON_OPS: &[&str] = &["==", "!=", "<", "<=", ">", ">=", "is", "!is"];
const LOGICAL_OPS: &[&str] = &["&&", "||", "^^", "and", "or", "xor"];
const ASSIGNMENT_OPS: &[&str] = &[
	"=", "+=", "-=", "*=", "/=", "|=", "&=", "^=", "%=", "**=", "<<=", ">>=", ">>>=",
];
const NUMERIC_TYPES: &[&str] = &[
	"int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
	"float", "double",
];
const PRIMITIVE_TYPES: &[&str] = &["void", "bool"];

#[derive(Debug)]
pub struct Registry {
	keywords: FxHashMap<&'static str, ReservedFlags>,
	marks: MarkTrie,
}

/// Byte-keyed prefix tree over [`MARKS`].
#[derive(Debug, Default)]
struct MarkTrie {
	children: FxHashMap<u8, MarkTrie>,
	/// Set if the path from the root to this node spells a complete mark.
	terminal: Option<ReservedFlags>,
}

impl MarkTrie {
	fn insert(&mut self, mark: &str, flags: ReservedFlags) {
		let mut node = self;

		for b in mark.bytes() {
			node = node.children.entry(b).or_default();
		}

		node.terminal = Some(flags);
	}
}

#[must_use]
pub fn registry() -> &'static Registry {
	static REGISTRY: OnceLock<Registry> = OnceLock::new();
	REGISTRY.get_or_init(Registry::new)
}

impl Registry {
	#[must_use]
	fn new() -> Self {
		let mut keywords = FxHashMap::default();
		let mut marks = MarkTrie::default();

		for kw in KEYWORDS {
			keywords.insert(*kw, flags_of(kw));
		}

		for mark in MARKS {
			marks.insert(mark, flags_of(mark) | ReservedFlags::MARK);
		}

		Self { keywords, marks }
	}

	/// Longest mark starting at byte `offset` of `text`, with its length in bytes.
	#[must_use]
	pub fn classify_mark(&self, text: &str, offset: usize) -> Option<(ReservedFlags, usize)> {
		let bytes = text.as_bytes().get(offset..)?;
		let mut node = &self.marks;
		let mut best = None;

		for (i, b) in bytes.iter().enumerate() {
			let Some(next) = node.children.get(b) else {
				break;
			};

			node = next;

			let Some(flags) = node.terminal else {
				continue;
			};

			// `!is` must not swallow the front of `!isValid`.
			let len = i + 1;
			let ends_alpha = b.is_ascii_alphabetic();
			let continues = bytes.get(len).is_some_and(|&n| is_ident_byte(n));

			if !(ends_alpha && continues) {
				best = Some((flags, len));
			}
		}

		best
	}

	#[must_use]
	pub fn classify_keyword(&self, text: &str) -> Option<ReservedFlags> {
		self.keywords.get(text).copied()
	}
}

#[must_use]
pub fn classify_mark(text: &str, offset: usize) -> Option<(ReservedFlags, usize)> {
	registry().classify_mark(text, offset)
}

#[must_use]
pub fn classify_keyword(text: &str) -> Option<ReservedFlags> {
	registry().classify_keyword(text)
}

#[must_use]
pub(super) fn is_ident_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

#[must_use]
fn flags_of(word: &str) -> ReservedFlags {
	let mut flags = ReservedFlags::empty();

	for (list, flag) in [
		(PREFIX_OPS, ReservedFlags::PREFIX_OP),
		(BITWISE_OPS, ReservedFlags::BITWISE_OP),
		(ARITHMETIC_OPS, ReservedFlags::ARITHMETIC_OP),
		(COMPARISON_OPS, ReservedFlags::COMPARISON_OP),
		(LOGICAL_OPS, ReservedFlags::LOGICAL_OP),
		(ASSIGNMENT_OPS, ReservedFlags::ASSIGNMENT_OP),
		(NUMERIC_TYPES, ReservedFlags::NUMERIC_TYPE | ReservedFlags::PRIMITIVE_TYPE),
		(PRIMITIVE_TYPES, ReservedFlags::PRIMITIVE_TYPE),
	] {
		if list.contains(&word) {
			flags |= flag;
		}
	}

	flags
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn longest_match() {
		assert_eq!(classify_mark(">>>= 1", 0).map(|m| m.1), Some(4));
		assert_eq!(classify_mark(">>= 1", 0).map(|m| m.1), Some(3));
		assert_eq!(classify_mark("a >> b", 2).map(|m| m.1), Some(2));
		assert_eq!(classify_mark("a", 0), None);
		assert_eq!(classify_mark("", 3), None);
	}

	#[test]
	fn every_mark_matches_itself() {
		for mark in MARKS {
			let (flags, len) = classify_mark(mark, 0).unwrap();
			assert_eq!(len, mark.len(), "mark `{mark}`");
			assert!(flags.contains(ReservedFlags::MARK));
		}
	}

	#[test]
	fn not_is() {
		assert_eq!(classify_mark("!is null", 0).map(|m| m.1), Some(3));
		assert_eq!(classify_mark("!isValid", 0).map(|m| m.1), Some(1));
	}

	#[test]
	fn keyword_flags() {
		let int = classify_keyword("int").unwrap();
		assert!(int.contains(ReservedFlags::NUMERIC_TYPE | ReservedFlags::PRIMITIVE_TYPE));
		assert!(!int.contains(ReservedFlags::MARK));

		let void = classify_keyword("void").unwrap();
		assert!(void.contains(ReservedFlags::PRIMITIVE_TYPE));
		assert!(!void.contains(ReservedFlags::NUMERIC_TYPE));

		assert!(classify_keyword("and")
			.unwrap()
			.contains(ReservedFlags::LOGICAL_OP));
		assert!(classify_keyword("this").is_none());
		assert!(classify_keyword("Int").is_none());

		let (shl_assign, _) = classify_mark("<<=", 0).unwrap();
		assert!(shl_assign.contains(ReservedFlags::ASSIGNMENT_OP));
		assert!(!shl_assign.intersects(ReservedFlags::BINARY_OP));
	}
}
