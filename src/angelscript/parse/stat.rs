//! Statements and statement blocks.

use crate::angelscript::{ast, lex::TokenKind};

use super::{Parsed, Parser};

impl Parser<'_, '_> {
	/// Starts on the `{`.
	pub(super) fn stat_block(&mut self) -> ast::StatBlock {
		let start = self.pos;
		self.bump();
		let mut stats = vec![];

		while let Some(token) = self.peek() {
			if token.is_reserved("}") {
				break;
			}

			let before = self.pos;

			match self.statement() {
				Parsed::Ok(stat) => stats.push(stat),
				Parsed::Recovered => {}
				Parsed::NoMatch => self.skip_unexpected(),
			}

			if self.pos == before {
				self.skip_unexpected();
			}
		}

		let _ = self.expect("}");

		ast::StatBlock {
			stats,
			span: self.span_from(start),
		}
	}

	pub(super) fn statement(&mut self) -> Parsed<ast::Stat> {
		self.nested(Self::any_statement).unwrap_or_else(|| {
			self.skip_statement();
			Parsed::Recovered
		})
	}

	/// Control flow first; failing that, a variable declaration;
	/// failing that, an expression statement.
	fn any_statement(&mut self) -> Parsed<ast::Stat> {
		let Some(token) = self.peek() else {
			return Parsed::NoMatch;
		};

		if token.kind == TokenKind::Reserved {
			match &*token.text {
				"if" => return self.if_stat(),
				"for" => return self.for_stat(),
				"while" => return self.while_stat(),
				"do" => return self.do_while(),
				"return" => return self.return_stat(),
				"break" => {
					let kw = self.bump();
					self.expect_semicolon();
					return Parsed::Ok(ast::Stat::Break(kw));
				}
				"continue" => {
					let kw = self.bump();
					self.expect_semicolon();
					return Parsed::Ok(ast::Stat::Continue(kw));
				}
				"{" => return Parsed::Ok(ast::Stat::Block(self.stat_block())),
				"switch" => return Parsed::Ok(ast::Stat::Placeholder(self.placeholder())),
				"try" => {
					let start = self.pos;
					let keyword = self.bump();
					self.skip_statement();

					if self.eat("catch").is_some() {
						self.skip_statement();
					}

					return Parsed::Ok(ast::Stat::Placeholder(ast::Placeholder {
						keyword,
						span: self.span_from(start),
					}));
				}
				_ => {}
			}
		}

		if self.looks_like_var_decl() {
			return self.local_var().map(ast::Stat::Var);
		}

		self.expr_stat().map(ast::Stat::Expr)
	}

	fn local_var(&mut self) -> Parsed<ast::Var> {
		let start = self.pos;
		let ty = matched!(self.type_ref());
		self.var_rest(start, None, ty)
	}

	fn expr_stat(&mut self) -> Parsed<ast::ExprStat> {
		if self.eat(";").is_some() {
			return Parsed::Ok(ast::ExprStat { value: None });
		}

		let value = matched!(self.assign());
		self.expect_semicolon();
		Parsed::Ok(ast::ExprStat { value: Some(value) })
	}

	/// `( assign )`, common to `if` and `while`.
	fn paren_condition(&mut self) -> Option<ast::Assign> {
		self.expect("(")?;
		let p = self.assign();

		let Some(cond) = self.required(p, "condition") else {
			self.recover_until_close(")");
			return None;
		};

		let _ = self.expect(")");
		Some(cond)
	}

	fn if_stat(&mut self) -> Parsed<ast::Stat> {
		self.bump();
		let mut branches = vec![];

		loop {
			let Some(cond) = self.paren_condition() else {
				break;
			};

			let p = self.statement();
			let then = self.required(p, "statement").map(Box::new);
			let malformed = then.is_none();
			branches.push(ast::Branch { cond, then });

			if malformed || self.eat("else").is_none() {
				break;
			}

			if self.eat("if").is_some() {
				continue;
			}

			let p = self.statement();
			let otherwise = self.required(p, "statement").map(Box::new);
			return Parsed::Ok(ast::Stat::If(ast::If { branches, otherwise }));
		}

		if branches.is_empty() {
			return Parsed::Recovered;
		}

		Parsed::Ok(ast::Stat::If(ast::If {
			branches,
			otherwise: None,
		}))
	}

	fn for_stat(&mut self) -> Parsed<ast::Stat> {
		let start = self.pos;
		self.bump();

		if self.expect("(").is_none() {
			return Parsed::Recovered;
		}

		let init = if self.looks_like_var_decl() {
			let p = self.local_var();
			self.required(p, "initializer").map(ast::Stat::Var)
		} else {
			let p = self.expr_stat();
			self.required(p, "initializer").map(ast::Stat::Expr)
		};

		let cond = match self.expr_stat() {
			Parsed::Ok(stat) => stat.value,
			Parsed::NoMatch => {
				self.error_expected("condition");
				None
			}
			Parsed::Recovered => None,
		};

		let mut incr = vec![];

		if self.eat(")").is_none() {
			loop {
				let p = self.assign();

				let Some(expr) = self.required(p, "expression") else {
					self.recover_until_close(")");
					break;
				};

				incr.push(expr);

				if self.eat(",").is_none() {
					let _ = self.expect(")");
					break;
				}
			}
		}

		let p = self.statement();
		let body = self.required(p, "statement").map(Box::new);

		Parsed::Ok(ast::Stat::For(ast::For {
			init: init.map(Box::new),
			cond,
			incr,
			body,
			span: self.span_from(start),
		}))
	}

	fn while_stat(&mut self) -> Parsed<ast::Stat> {
		self.bump();

		let Some(cond) = self.paren_condition() else {
			return Parsed::Recovered;
		};

		let p = self.statement();
		let body = self.required(p, "statement").map(Box::new);

		Parsed::Ok(ast::Stat::While(ast::While { cond, body }))
	}

	fn do_while(&mut self) -> Parsed<ast::Stat> {
		self.bump();
		let p = self.statement();
		let body = self.required(p, "statement").map(Box::new);

		if self.expect("while").is_none() {
			return Parsed::Ok(ast::Stat::DoWhile(ast::DoWhile { body, cond: None }));
		}

		let cond = self.paren_condition();
		self.expect_semicolon();

		Parsed::Ok(ast::Stat::DoWhile(ast::DoWhile { body, cond }))
	}

	fn return_stat(&mut self) -> Parsed<ast::Stat> {
		let keyword = self.bump();

		let value = if self.at(";") {
			None
		} else {
			let p = self.assign();
			self.required(p, "expression")
		};

		self.expect_semicolon();

		Parsed::Ok(ast::Stat::Return(ast::Return { keyword, value }))
	}
}
