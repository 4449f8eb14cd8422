//! Top-level and class-level declarations.

use crate::angelscript::{
	ast,
	lex::{Token, TokenIx},
};

use super::{Parsed, Parser};

/// Contextual words which may precede `class`, `interface`, `enum`, or `funcdef`.
const ENTITY_MODIFIERS: &[&str] = &["shared", "abstract", "final", "external"];

/// Contextual words which may follow a function's parameter list.
const FUNC_ATTRS: &[&str] = &["override", "final", "explicit", "property", "delete"];

impl Parser<'_, '_> {
	/// With `in_namespace`, stops before the closing brace of the namespace body.
	pub(super) fn script(&mut self, in_namespace: bool) -> ast::Script {
		let mut items = vec![];

		while let Some(token) = self.peek() {
			if in_namespace && token.is_reserved("}") {
				break;
			}

			if self.eat(";").is_some() {
				continue;
			}

			let start = self.pos;

			match self.item() {
				Parsed::Ok(item) => items.push(item),
				Parsed::Recovered => {}
				Parsed::NoMatch => self.skip_unexpected(),
			}

			if self.pos == start {
				self.skip_unexpected();
			}
		}

		ast::Script { items }
	}

	fn item(&mut self) -> Parsed<ast::Item> {
		self.entity_modifiers();

		let Some(token) = self.peek() else {
			return Parsed::NoMatch;
		};

		if token.is_reserved("namespace") {
			self.namespace().map(ast::Item::Namespace)
		} else if token.is_reserved("class") {
			self.class().map(ast::Item::Class)
		} else if token.is_reserved("interface") {
			self.interface().map(ast::Item::Interface)
		} else if token.is_reserved("enum") {
			self.enumeration().map(ast::Item::Enum)
		} else if ["import", "typedef", "mixin"]
			.iter()
			.any(|kw| token.is_reserved(kw))
		{
			Parsed::Ok(ast::Item::Placeholder(self.placeholder()))
		} else {
			self.decl(None).map(|member| match member {
				ast::Member::Func(func) => ast::Item::Func(func),
				ast::Member::Var(var) => ast::Item::Var(var),
				ast::Member::Placeholder(ph) => ast::Item::Placeholder(ph),
			})
		}
	}

	fn entity_modifiers(&mut self) {
		let mut n = 0;

		while self
			.nth(n)
			.is_some_and(|t| t.is_ident() && ENTITY_MODIFIERS.contains(&&*t.text))
		{
			n += 1;
		}

		let applies = self.nth(n).is_some_and(|t| {
			["class", "interface", "enum", "funcdef"]
				.iter()
				.any(|kw| t.is_reserved(kw))
		});

		if n > 0 && applies {
			for _ in 0..n {
				self.bump_contextual_keyword();
			}
		}
	}

	fn namespace(&mut self) -> Parsed<ast::Namespace> {
		let start = self.pos;
		self.bump();
		let mut names = vec![];

		loop {
			let Some(name) = self.expect_ident() else {
				return Parsed::Recovered;
			};

			names.push(name);

			if self.eat("::").is_none() {
				break;
			}
		}

		if self.expect("{").is_none() {
			return Parsed::Recovered;
		}

		let body = self.nested(|p| p.script(true)).unwrap_or_else(|| {
			self.skip_level();
			ast::Script::default()
		});
		let _ = self.expect("}");

		Parsed::Ok(ast::Namespace {
			names,
			body,
			span: self.span_from(start),
		})
	}

	fn class(&mut self) -> Parsed<ast::Class> {
		let start = self.pos;
		self.bump();

		let Some(name) = self.expect_ident() else {
			return Parsed::Recovered;
		};

		let template_params = if self.at("<") {
			self.template_params()
		} else {
			vec![]
		};

		// Forward declaration.
		if self.eat(";").is_some() {
			return Parsed::Ok(ast::Class {
				name,
				template_params,
				bases: vec![],
				members: vec![],
				span: self.span_from(start),
			});
		}

		let bases = self.base_list();
		let class_name = &*name.get(self.tokens).text;
		let members = self.member_block(Some(class_name));

		Parsed::Ok(ast::Class {
			name,
			template_params,
			bases,
			members,
			span: self.span_from(start),
		})
	}

	fn interface(&mut self) -> Parsed<ast::Interface> {
		let start = self.pos;
		self.bump();

		let Some(name) = self.expect_ident() else {
			return Parsed::Recovered;
		};

		if self.eat(";").is_some() {
			return Parsed::Ok(ast::Interface {
				name,
				bases: vec![],
				members: vec![],
				span: self.span_from(start),
			});
		}

		let bases = self.base_list();
		let members = self.member_block(None);

		Parsed::Ok(ast::Interface {
			name,
			bases,
			members,
			span: self.span_from(start),
		})
	}

	fn base_list(&mut self) -> Vec<ast::TypeRef> {
		let mut bases = vec![];

		if self.eat(":").is_none() {
			return bases;
		}

		loop {
			let p = self.type_ref();

			let Some(base) = self.required(p, "base type") else {
				break;
			};

			bases.push(base);

			if self.eat(",").is_none() {
				break;
			}
		}

		bases
	}

	fn member_block(&mut self, class_name: Option<&str>) -> Vec<ast::Member> {
		let mut members = vec![];

		if self.expect("{").is_none() {
			return members;
		}

		while let Some(token) = self.peek() {
			if token.is_reserved("}") {
				break;
			}

			if self.eat(";").is_some() {
				continue;
			}

			let start = self.pos;

			match self.decl(class_name) {
				Parsed::Ok(member) => members.push(member),
				Parsed::Recovered => {}
				Parsed::NoMatch => self.skip_unexpected(),
			}

			if self.pos == start {
				self.skip_unexpected();
			}
		}

		let _ = self.expect("}");
		members
	}

	fn enumeration(&mut self) -> Parsed<ast::Enum> {
		let start = self.pos;
		self.bump();

		let Some(name) = self.expect_ident() else {
			return Parsed::Recovered;
		};

		// An underlying type is accepted and ignored.
		if self.eat(":").is_some() {
			let p = self.type_ref();
			let _ = self.required(p, "type");
		}

		let mut members = vec![];

		if self.eat(";").is_none() && self.expect("{").is_some() {
			while let Some(token) = self.peek() {
				if token.is_reserved("}") {
					break;
				}

				let Some(name) = self.eat_ident() else {
					self.skip_unexpected();
					continue;
				};

				let value = if self.eat("=").is_some() {
					let p = self.expr();
					self.required(p, "expression")
				} else {
					None
				};

				members.push(ast::EnumMember { name, value });

				if self.eat(",").is_none() && !self.at("}") {
					self.error_expected("`,` or `}`");
				}
			}

			let _ = self.expect("}");
		}

		Parsed::Ok(ast::Enum {
			name,
			members,
			span: self.span_from(start),
		})
	}

	/// A function, variable, or virtual property, at the top level or
	/// (with `class_name`) inside a class body.
	pub(super) fn decl(&mut self, class_name: Option<&str>) -> Parsed<ast::Member> {
		let start = self.pos;

		if self.at("funcdef") {
			return Parsed::Ok(ast::Member::Placeholder(self.placeholder()));
		}

		let access = if self.at("private") || self.at("protected") {
			Some(self.bump())
		} else {
			None
		};

		if self.eat("~").is_some() {
			let Some(name) = self.expect_ident() else {
				return Parsed::Recovered;
			};

			return self
				.func_rest(start, access, None, false, true, name)
				.map(ast::Member::Func);
		}

		let is_ctor = class_name.is_some_and(|cn| {
			self.peek()
				.is_some_and(|t| t.is_ident() && &*t.text == cn)
				&& self.nth_at(1, "(")
		});

		if is_ctor {
			let name = self.bump();

			return self
				.func_rest(start, access, None, false, false, name)
				.map(ast::Member::Func);
		}

		let Some(mut end) = self.scan_type(self.pos) else {
			return self.decl_no_match(access);
		};

		if self.tokens.get(end).is_some_and(|t| t.is_reserved("&")) {
			end += 1;
		}

		if !self.tokens.get(end).is_some_and(Token::is_ident) {
			return self.decl_no_match(access);
		}

		let after_name = self.tokens.get(end + 1);
		let ty = matched!(self.type_ref());

		if after_name.is_some_and(|t| t.is_reserved("(") || t.is_reserved("<")) {
			let ret_ref = self.eat("&").is_some();
			let name = self.bump();

			self.func_rest(start, access, Some(ty), ret_ref, false, name)
				.map(ast::Member::Func)
		} else if after_name.is_some_and(|t| t.is_reserved("{")) {
			let name = self.bump();
			self.skip_group();

			Parsed::Ok(ast::Member::Placeholder(ast::Placeholder {
				keyword: name,
				span: self.span_from(start),
			}))
		} else {
			self.var_rest(start, access, ty).map(ast::Member::Var)
		}
	}

	fn decl_no_match(&mut self, access: Option<TokenIx>) -> Parsed<ast::Member> {
		if access.is_some() {
			self.error_expected("declaration");
			Parsed::Recovered
		} else {
			Parsed::NoMatch
		}
	}

	fn func_rest(
		&mut self,
		start: usize,
		access: Option<TokenIx>,
		ret: Option<ast::TypeRef>,
		ret_ref: bool,
		destructor: bool,
		name: TokenIx,
	) -> Parsed<ast::Func> {
		let template_params = if self.at("<") {
			self.template_params()
		} else {
			vec![]
		};

		let Some(params) = self.param_list() else {
			return Parsed::Recovered;
		};

		let is_const = self.eat("const").is_some();
		let mut attrs = vec![];

		while self
			.peek()
			.is_some_and(|t| t.is_ident() && FUNC_ATTRS.contains(&&*t.text))
		{
			attrs.push(self.bump_contextual_keyword());
		}

		let body = if self.at("{") {
			Some(self.stat_block())
		} else {
			if self.eat(";").is_none() {
				self.error_expected("`{` or `;`");
			}

			None
		};

		Parsed::Ok(ast::Func {
			access,
			ret,
			ret_ref,
			destructor,
			name,
			template_params,
			params,
			is_const,
			attrs,
			body,
			span: self.span_from(start),
		})
	}

	/// `None` if the opening parenthesis is missing.
	fn param_list(&mut self) -> Option<ast::ParamList> {
		self.expect("(")?;
		let mut list = ast::ParamList::default();

		if self.eat(")").is_some() {
			return Some(list);
		}

		if self.at("void") && self.nth_at(1, ")") {
			self.bump();
			self.bump();
			return Some(list);
		}

		loop {
			let p = self.type_ref();

			let Some(ty) = self.required(p, "parameter type") else {
				self.recover_until_close(")");
				break;
			};

			let mut is_ref = false;
			let mut modifier = None;

			if self.eat("&").is_some() {
				is_ref = true;

				if self.at("in") || self.at("out") || self.at("inout") {
					modifier = Some(self.bump());
				}
			}

			let name = self.eat_ident();

			let default = if self.eat("=").is_some() {
				let p = self.expr();
				self.required(p, "default value")
			} else {
				None
			};

			list.params.push(ast::Param {
				ty,
				modifier,
				is_ref,
				name,
				default,
			});

			if self.eat(",").is_some() {
				continue;
			}

			if self.eat(")").is_none() {
				self.error_expected("`,` or `)`");
				self.recover_until_close(")");
			}

			break;
		}

		Some(list)
	}

	/// Declarators after the type: `a = 1, b(2), c = {3};`
	pub(super) fn var_rest(
		&mut self,
		start: usize,
		access: Option<TokenIx>,
		ty: ast::TypeRef,
	) -> Parsed<ast::Var> {
		let mut decls = vec![];

		loop {
			let Some(name) = self.expect_ident() else {
				break;
			};

			let init = if self.eat("=").is_some() {
				if self.at("{") {
					self.nested_init_list().map(ast::VarInit::InitList)
				} else {
					let p = self.assign();
					self.required(p, "initializer").map(ast::VarInit::Assign)
				}
			} else if self.at("(") {
				Some(ast::VarInit::Args(self.arg_list()))
			} else {
				None
			};

			decls.push(ast::VarDecl { name, init });

			if self.eat(",").is_none() {
				break;
			}
		}

		self.expect_semicolon();

		Parsed::Ok(ast::Var {
			access,
			ty,
			decls,
			span: self.span_from(start),
		})
	}
}
