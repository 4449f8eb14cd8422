//! Process-wide singletons for the primitive types.
//!
//! These are never inserted into any scope. Identity comparisons against them
//! are by address.

use std::sync::OnceLock;

use super::{
	lex::{Token, TokenKind},
	sema::{SymbolicType, TypeSource},
};

/// Order matters; see the accessors on [`Builtins`].
const NUMERIC: &[&str] = &[
	"int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
	"float", "double",
];

const IX_INT: usize = 0;
const IX_FLOAT: usize = 10;
const IX_DOUBLE: usize = 11;

#[derive(Debug)]
pub struct Builtins {
	pub bool_type: SymbolicType,
	pub void_type: SymbolicType,
	/// `?`, accepting any type.
	pub any_type: SymbolicType,
	pub auto_type: SymbolicType,
	/// Used for string literals when the script declares no string type of its own.
	pub string_type: SymbolicType,
	numeric: Vec<SymbolicType>,
}

impl Builtins {
	#[must_use]
	pub fn numeric(&self, name: &str) -> Option<&SymbolicType> {
		self.numeric.iter().find(|t| &*t.name == name)
	}

	#[must_use]
	pub fn int(&self) -> &SymbolicType {
		&self.numeric[IX_INT]
	}

	#[must_use]
	pub fn float(&self) -> &SymbolicType {
		&self.numeric[IX_FLOAT]
	}

	#[must_use]
	pub fn double(&self) -> &SymbolicType {
		&self.numeric[IX_DOUBLE]
	}

	pub fn iter(&self) -> impl Iterator<Item = &SymbolicType> {
		[
			&self.bool_type,
			&self.void_type,
			&self.any_type,
			&self.auto_type,
			&self.string_type,
		]
		.into_iter()
		.chain(self.numeric.iter())
	}
}

#[must_use]
pub fn builtins() -> &'static Builtins {
	static BUILTINS: OnceLock<Builtins> = OnceLock::new();

	BUILTINS.get_or_init(|| Builtins {
		bool_type: SymbolicType::primitive("bool", TypeSource::Bool),
		void_type: SymbolicType::primitive("void", TypeSource::Void),
		any_type: SymbolicType::primitive("?", TypeSource::Any),
		auto_type: SymbolicType::primitive("auto", TypeSource::Auto),
		string_type: SymbolicType::primitive("string", TypeSource::String),
		numeric: NUMERIC
			.iter()
			.map(|name| SymbolicType::primitive(name, TypeSource::Number))
			.collect(),
	})
}

/// `bool`, `void`, `?`, `auto`, and the numeric type keywords.
/// `token` must be reserved; identifiers never name a builtin.
#[must_use]
pub fn find_builtin_type(token: &Token) -> Option<&'static SymbolicType> {
	debug_assert_eq!(
		token.kind,
		TokenKind::Reserved,
		"builtin lookup on non-reserved token `{}`",
		token.text
	);

	let b = builtins();

	match &*token.text {
		"bool" => Some(&b.bool_type),
		"void" => Some(&b.void_type),
		"?" => Some(&b.any_type),
		"auto" => Some(&b.auto_type),
		other => b.numeric(other),
	}
}

#[cfg(test)]
mod test {
	use crate::angelscript::lex::tokenize;

	use super::*;

	#[test]
	fn singleton_identity() {
		let tokens = tokenize("int int bool ? auto");
		let a = find_builtin_type(&tokens[0]).unwrap();
		let b = find_builtin_type(&tokens[1]).unwrap();
		assert!(std::ptr::eq(a, b));
		assert!(std::ptr::eq(a, builtins().int()));
		assert!(!std::ptr::eq(a, find_builtin_type(&tokens[2]).unwrap()));
		assert_eq!(find_builtin_type(&tokens[3]).unwrap().source, TypeSource::Any);
		assert_eq!(find_builtin_type(&tokens[4]).unwrap().source, TypeSource::Auto);
		assert_eq!(builtins().double().name.as_ref(), "double");
		assert_eq!(builtins().float().name.as_ref(), "float");
	}

	#[test]
	fn not_a_type() {
		let tokens = tokenize("while");
		assert!(find_builtin_type(&tokens[0]).is_none());
	}
}
