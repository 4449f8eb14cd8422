//! Type references, scope paths, and the lookahead which tells declarations
//! apart from expressions.

use crate::{
	angelscript::{
		ast,
		lex::{Token, TokenIx},
		reserved::ReservedFlags,
	},
	diag::Diag,
};

use super::{Parsed, Parser};

impl Parser<'_, '_> {
	/// `[const] [scope] datatype [<types>] {[] | @ [const]}`
	pub(super) fn type_ref(&mut self) -> Parsed<ast::TypeRef> {
		let start = self.pos;
		let is_const = self.eat("const").is_some();
		let scope = self.scope_path();

		let datatype = match self.peek() {
			Some(token) if is_datatype(token) => ast::DataType { token: self.bump() },
			_ if self.pos == start => return Parsed::NoMatch,
			_ => {
				self.error_expected("type name");
				return Parsed::Recovered;
			}
		};

		let template_args = if self.at("<") {
			self.template_args()
		} else {
			vec![]
		};

		let mut suffixes = vec![];

		// Suffixes after a `>>` belong to an enclosing type.
		while self.gt_debt == 0 {
			if self.at("[") && self.nth_at(1, "]") {
				self.bump();
				self.bump();
				suffixes.push(ast::TypeSuffix::Array);
			} else if self.eat("@").is_some() {
				let _ = self.eat("const");
				suffixes.push(ast::TypeSuffix::Handle);
			} else {
				break;
			}
		}

		Parsed::Ok(ast::TypeRef {
			is_const,
			scope,
			datatype,
			template_args,
			suffixes,
			span: self.span_from(start),
		})
	}

	/// Starts on the `<`.
	pub(super) fn template_args(&mut self) -> Vec<ast::TypeRef> {
		self.nested(Self::template_arg_list).unwrap_or_else(|| {
			self.skip_template_args();
			vec![]
		})
	}

	fn template_arg_list(&mut self) -> Vec<ast::TypeRef> {
		self.bump();
		self.type_depth += 1;
		let mut args = vec![];

		loop {
			let p = self.type_ref();

			let Some(arg) = self.required(p, "type") else {
				break;
			};

			args.push(arg);

			if self.gt_debt > 0 || self.eat(",").is_none() {
				break;
			}
		}

		self.close_angle();
		self.type_depth -= 1;

		if self.type_depth == 0 && self.gt_debt > 0 {
			let span = self.span_from(self.pos - 1);
			self.sink.raise(Diag::error(span, "unbalanced `>` in type"));
			self.gt_debt = 0;
		}

		args
	}

	/// Starts on a `<` and consumes through its matching closer. Whatever a
	/// final `>>` or `>>>` closes beyond that is left as debt for the
	/// enclosing lists.
	fn skip_template_args(&mut self) {
		let mut depth = 0_u32;

		while let Some(token) = self.peek() {
			let closes = if token.is_reserved(">") {
				1
			} else if token.is_reserved(">>") {
				2
			} else if token.is_reserved(">>>") {
				3
			} else {
				0
			};

			if closes == 0
				&& [";", "=", "(", ")", "{", "}"]
					.iter()
					.any(|m| token.is_reserved(m))
			{
				return;
			}

			self.bump();

			if token.is_reserved("<") {
				depth += 1;
			} else if closes >= depth && closes > 0 {
				self.gt_debt = closes - depth;
				return;
			} else {
				depth -= closes;
			}
		}
	}

	/// `<T, U>` after a class or function name.
	pub(super) fn template_params(&mut self) -> Vec<TokenIx> {
		self.bump();
		let mut params = vec![];

		loop {
			let _ = self.eat("class");

			match self.expect_ident() {
				Some(ident) => params.push(ident),
				None => break,
			}

			if self.eat(",").is_none() {
				break;
			}
		}

		let _ = self.expect(">");
		params
	}

	pub(super) fn close_angle(&mut self) {
		if self.gt_debt > 0 {
			self.gt_debt -= 1;
			return;
		}

		let debt = match self.peek() {
			Some(t) if t.is_reserved(">") => 0,
			Some(t) if t.is_reserved(">>") => 1,
			Some(t) if t.is_reserved(">>>") => 2,
			_ => {
				self.error_expected("`>`");
				return;
			}
		};

		self.bump();
		self.gt_debt = debt;
	}

	/// Any run of `ident ::` pairs, with or without a leading `::`.
	pub(super) fn scope_path(&mut self) -> Option<ast::ScopePath> {
		let mut path = ast::ScopePath::default();

		if self.at("::") {
			let colons = self.bump();
			path.global = Some(colons);
			path.last_colons = Some(colons);
		}

		while self.at_ident() && self.nth_at(1, "::") {
			path.names.push(self.bump());
			path.last_colons = Some(self.bump());
		}

		path.last_colons.is_some().then_some(path)
	}

	/// Where a type starting at `pos` would end, without consuming anything
	/// or raising diagnostics.
	#[must_use]
	pub(super) fn scan_type(&self, mut pos: usize) -> Option<usize> {
		let tokens = self.tokens;
		let is = |pos: usize, text: &str| tokens.get(pos).is_some_and(|t| t.is_reserved(text));

		if is(pos, "const") {
			pos += 1;
		}

		if is(pos, "::") {
			pos += 1;
		}

		while tokens.get(pos).is_some_and(Token::is_ident) && is(pos + 1, "::") {
			pos += 2;
		}

		if !is_datatype(tokens.get(pos)?) {
			return None;
		}

		pos += 1;

		if is(pos, "<") {
			let mut depth = 0_i32;

			loop {
				let token = tokens.get(pos)?;
				pos += 1;

				if token.is_reserved("<") {
					depth += 1;
				} else if token.is_reserved(">") {
					depth -= 1;
				} else if token.is_reserved(">>") {
					depth -= 2;
				} else if token.is_reserved(">>>") {
					depth -= 3;
				} else if !(is_datatype(token)
					|| [",", "::", "@", "[", "]", "const"]
						.iter()
						.any(|m| token.is_reserved(m)))
				{
					return None;
				}

				if depth <= 0 {
					break;
				}
			}
		}

		loop {
			if is(pos, "[") && is(pos + 1, "]") {
				pos += 2;
			} else if is(pos, "@") {
				pos += 1;

				if is(pos, "const") {
					pos += 1;
				}
			} else {
				break;
			}
		}

		Some(pos)
	}

	/// A type followed by a name, followed by something a variable
	/// declaration can continue with.
	#[must_use]
	pub(super) fn looks_like_var_decl(&self) -> bool {
		let Some(end) = self.scan_type(self.pos) else {
			return false;
		};

		if !self.tokens.get(end).is_some_and(Token::is_ident) {
			return false;
		}

		self.tokens.get(end + 1).map_or(true, |t| {
			["=", ";", ",", "(", "}"]
				.iter()
				.any(|m| t.is_reserved(m))
		})
	}

	/// On a `<` following an identifier: does a template instantiation
	/// immediately followed by an argument list start at the identifier?
	#[must_use]
	pub(super) fn template_construct_ahead(&self) -> bool {
		self.scan_type(self.pos - 1)
			.is_some_and(|end| end > self.pos && self.tokens.get(end).is_some_and(|t| t.is_reserved("(")))
	}
}

#[must_use]
fn is_datatype(token: &Token) -> bool {
	token.is_ident()
		|| token.reserved.contains(ReservedFlags::PRIMITIVE_TYPE)
		|| token.is_reserved("?")
		|| token.is_reserved("auto")
}
