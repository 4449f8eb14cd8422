//! Expressions. Binary and assignment operators are read into flat lists;
//! precedence is left to consumers of the tree.

use crate::angelscript::{ast, lex::TokenKind, reserved::ReservedFlags};

use super::{Parsed, Parser};

impl Parser<'_, '_> {
	/// `condition (assign-op condition)*`
	pub(super) fn assign(&mut self) -> Parsed<ast::Assign> {
		self.nested(Self::assign_chain).unwrap_or_else(|| {
			self.skip_level();
			Parsed::Recovered
		})
	}

	fn assign_chain(&mut self) -> Parsed<ast::Assign> {
		let cond = matched!(self.condition());
		let mut tail = vec![];

		while self.at_flags(ReservedFlags::ASSIGNMENT_OP) {
			let op = self.bump();
			let p = self.condition();

			let Some(rhs) = self.required(p, "expression") else {
				break;
			};

			tail.push((op, rhs));
		}

		Parsed::Ok(ast::Assign { cond, tail })
	}

	/// `expr ('?' assign ':' assign)?`
	fn condition(&mut self) -> Parsed<ast::Condition> {
		let expr = matched!(self.expr());

		if self.eat("?").is_none() {
			return Parsed::Ok(ast::Condition {
				expr,
				ternary: None,
			});
		}

		let p = self.assign();

		let Some(then) = self.required(p, "expression") else {
			return Parsed::Ok(ast::Condition {
				expr,
				ternary: None,
			});
		};

		let otherwise = if self.expect(":").is_some() {
			let p = self.assign();
			self.required(p, "expression").map(Box::new)
		} else {
			None
		};

		Parsed::Ok(ast::Condition {
			expr,
			ternary: Some(ast::Ternary {
				then: Box::new(then),
				otherwise,
			}),
		})
	}

	/// `term (binary-op term)*`
	pub(super) fn expr(&mut self) -> Parsed<ast::Expr> {
		let head = matched!(self.expr_term());
		let mut tail = vec![];

		while self.at_flags(ReservedFlags::BINARY_OP) {
			let op = self.bump();
			let p = self.expr_term();

			let Some(rhs) = self.required(p, "expression") else {
				break;
			};

			tail.push((op, rhs));
		}

		Parsed::Ok(ast::Expr { head, tail })
	}

	fn expr_term(&mut self) -> Parsed<ast::ExprTerm> {
		if self.at("{") {
			return match self.nested_init_list() {
				Some(list) => Parsed::Ok(ast::ExprTerm::InitList(list)),
				None => Parsed::Recovered,
			};
		}

		let mut pre_ops = vec![];

		while self.at_flags(ReservedFlags::PREFIX_OP) {
			pre_ops.push(self.bump());
		}

		let value = match self.expr_value() {
			Parsed::Ok(v) => v,
			Parsed::NoMatch if pre_ops.is_empty() => return Parsed::NoMatch,
			Parsed::NoMatch => {
				self.error_expected("expression");
				return Parsed::Recovered;
			}
			Parsed::Recovered => return Parsed::Recovered,
		};

		let post_ops = self.post_ops();

		Parsed::Ok(ast::ExprTerm::Value(ast::ValueTerm {
			pre_ops,
			value,
			post_ops,
		}))
	}

	fn expr_value(&mut self) -> Parsed<ast::ExprValue> {
		let Some(token) = self.peek() else {
			return Parsed::NoMatch;
		};

		if token.is_reserved("void") {
			return Parsed::Ok(ast::ExprValue::Void(self.bump()));
		}

		if matches!(token.kind, TokenKind::Number | TokenKind::String)
			|| token.is_reserved("true")
			|| token.is_reserved("false")
			|| token.is_reserved("null")
		{
			return Parsed::Ok(ast::ExprValue::Literal(self.bump()));
		}

		if token.is_reserved("cast") {
			return self.cast();
		}

		if token.is_reserved("(") {
			self.bump();
			let p = self.assign();

			let Some(inner) = self.required(p, "expression") else {
				self.recover_until_close(")");
				return Parsed::Recovered;
			};

			let _ = self.expect(")");
			return Parsed::Ok(ast::ExprValue::Paren(Box::new(inner)));
		}

		if token.is_ident() && &*token.text == "function" && self.nth_at(1, "(") {
			let start = self.pos;
			let keyword = self.bump_contextual_keyword();
			self.skip_group();

			if self.at("{") {
				self.skip_group();
			}

			return Parsed::Ok(ast::ExprValue::Lambda(ast::Placeholder {
				keyword,
				span: self.span_from(start),
			}));
		}

		if token.reserved.contains(ReservedFlags::PRIMITIVE_TYPE) && self.nth_at(1, "(") {
			let ty = matched!(self.type_ref());
			let args = self.arg_list();
			return Parsed::Ok(ast::ExprValue::ConstructCall(ast::ConstructCall { ty, args }));
		}

		if token.is_ident() || token.is_reserved("::") {
			return self.scoped_value();
		}

		Parsed::NoMatch
	}

	/// A variable access, function call, or template construction,
	/// each of which may be qualified by a scope path.
	fn scoped_value(&mut self) -> Parsed<ast::ExprValue> {
		let start = self.pos;
		let scope = self.scope_path();

		let Some(ident) = self.eat_ident() else {
			self.error_expected("identifier");
			return Parsed::Ok(ast::ExprValue::VarAccess(ast::VarAccess { scope, ident: None }));
		};

		if self.at("(") {
			let args = self.arg_list();
			return Parsed::Ok(ast::ExprValue::FuncCall(ast::FuncCall { scope, ident, args }));
		}

		if self.at("<") && self.template_construct_ahead() {
			self.pos = start;
			let ty = matched!(self.type_ref());
			let args = self.arg_list();
			return Parsed::Ok(ast::ExprValue::ConstructCall(ast::ConstructCall { ty, args }));
		}

		Parsed::Ok(ast::ExprValue::VarAccess(ast::VarAccess {
			scope,
			ident: Some(ident),
		}))
	}

	/// `cast<T>(assign)`
	fn cast(&mut self) -> Parsed<ast::ExprValue> {
		let keyword = self.bump();

		if self.expect("<").is_none() {
			return Parsed::Recovered;
		}

		// The cast's own `<` counts towards the nesting of `>>`.
		self.type_depth += 1;
		let p = self.type_ref();
		let ty = self.required(p, "type");
		self.close_angle();
		self.type_depth -= 1;
		self.gt_debt = 0;

		let Some(ty) = ty else {
			return Parsed::Recovered;
		};

		if self.expect("(").is_none() {
			return Parsed::Recovered;
		}

		let p = self.assign();

		let Some(value) = self.required(p, "expression") else {
			self.recover_until_close(")");
			return Parsed::Recovered;
		};

		let _ = self.expect(")");

		Parsed::Ok(ast::ExprValue::Cast(ast::Cast {
			keyword,
			ty,
			value: Box::new(value),
		}))
	}

	fn post_ops(&mut self) -> Vec<ast::PostOp> {
		let mut ops = vec![];

		loop {
			if self.at(".") {
				let dot = self.bump();

				let Some(name) = self.eat_ident() else {
					self.error_expected("member name");
					ops.push(ast::PostOp::Member { dot, name: None });
					break;
				};

				if self.at("(") {
					let args = self.arg_list();
					ops.push(ast::PostOp::MethodCall { dot, name, args });
				} else {
					ops.push(ast::PostOp::Member {
						dot,
						name: Some(name),
					});
				}
			} else if self.at("[") {
				self.bump();
				ops.push(ast::PostOp::Index(self.args_until("]")));
			} else if self.at("(") {
				ops.push(ast::PostOp::Call(self.arg_list()));
			} else if self.at("++") || self.at("--") {
				ops.push(ast::PostOp::Increment(self.bump()));
			} else {
				break;
			}
		}

		ops
	}

	pub(super) fn arg_list(&mut self) -> ast::ArgList {
		if self.expect("(").is_none() {
			return ast::ArgList::default();
		}

		ast::ArgList {
			args: self.args_until(")"),
		}
	}

	/// Comma-separated, optionally named arguments; the opener is already consumed.
	fn args_until(&mut self, close: &str) -> Vec<ast::Arg> {
		let mut args = vec![];

		if self.eat(close).is_some() {
			return args;
		}

		loop {
			let name = if self.at_ident() && self.nth_at(1, ":") {
				let name = self.bump();
				self.bump();
				Some(name)
			} else {
				None
			};

			let p = self.assign();

			let Some(value) = self.required(p, "argument") else {
				self.recover_until_close(close);
				break;
			};

			args.push(ast::Arg { name, value });

			if self.eat(",").is_some() {
				continue;
			}

			if self.eat(close).is_none() {
				self.error_expected(&format!("`,` or `{close}`"));
				self.recover_until_close(close);
			}

			break;
		}

		args
	}

	/// Starts on the `{`. `None` if nested too deeply, in which case the
	/// rest of the enclosing level has been skipped.
	pub(super) fn nested_init_list(&mut self) -> Option<ast::InitList> {
		let ret = self.nested(Self::init_list);

		if ret.is_none() {
			self.skip_level();
		}

		ret
	}

	fn init_list(&mut self) -> ast::InitList {
		self.bump();
		let mut items = vec![];

		loop {
			if self.eat("}").is_some() {
				break;
			}

			if self.at("{") {
				if let Some(list) = self.nested_init_list() {
					items.push(ast::InitItem::List(list));
				}
			} else {
				let p = self.assign();

				let Some(item) = self.required(p, "initializer") else {
					self.recover_until_close("}");
					break;
				};

				items.push(ast::InitItem::Assign(item));
			}

			if self.eat(",").is_none() {
				let _ = self.expect("}");
				break;
			}
		}

		ast::InitList { items }
	}
}
