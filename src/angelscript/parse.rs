//! Error-tolerant recursive descent over the token stream.
//!
//! Every production reports one of three outcomes through [`Parsed`]. Callers
//! that loop over productions (the top level, class bodies, statement blocks)
//! skip exactly one token with a diagnostic whenever nothing matched, so that
//! parsing always terminates and always yields a tree.

/// Unwraps [`Parsed::Ok`]; any other outcome is returned from the enclosing function.
macro_rules! matched {
	($e:expr) => {
		match $e {
			Parsed::Ok(x) => x,
			Parsed::NoMatch => return Parsed::NoMatch,
			Parsed::Recovered => return Parsed::Recovered,
		}
	};
}

mod expr;
mod item;
mod stat;
mod types;

use text_size::TextRange;

use crate::{
	diag::{Diag, DiagSink},
	semtokens::{Highlight, SemToken, SemTokenFlags},
};

use super::{
	ast,
	lex::{Token, TokenIx, TokenKind},
	reserved::ReservedFlags,
};

#[derive(Debug)]
#[must_use]
pub enum Parsed<T> {
	/// The input does not begin this production. The cursor has not moved.
	NoMatch,
	/// The input began this production but broke off partway through.
	/// A diagnostic has been raised and the cursor has moved.
	Recovered,
	Ok(T),
}

impl<T> Parsed<T> {
	pub fn ok(self) -> Option<T> {
		match self {
			Self::Ok(t) => Some(t),
			Self::NoMatch | Self::Recovered => None,
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
		match self {
			Self::Ok(t) => Parsed::Ok(f(t)),
			Self::NoMatch => Parsed::NoMatch,
			Self::Recovered => Parsed::Recovered,
		}
	}
}

#[must_use]
pub fn parse(tokens: &[Token], sink: &mut dyn DiagSink) -> ast::Script {
	let mut parser = Parser {
		tokens,
		pos: 0,
		gt_debt: 0,
		type_depth: 0,
		depth: 0,
		sink,
	};

	parser.script(false)
}

pub(super) struct Parser<'t, 's> {
	tokens: &'t [Token],
	pos: usize,
	/// How many template argument lists a `>>` or `>>>` has already closed
	/// on behalf of the lists enclosing the current one.
	gt_debt: u32,
	type_depth: u32,
	/// How many nested productions enclose the cursor; see [`MAX_NESTING`].
	depth: u32,
	sink: &'s mut dyn DiagSink,
}

/// Bounds the recursion of every nesting production (expressions, statements,
/// initializer lists, namespaces, template argument lists) so that the parser
/// and the passes walking its tree stay within a small thread stack.
pub(super) const MAX_NESTING: u32 = 64;

impl<'t> Parser<'t, '_> {
	#[must_use]
	fn peek(&self) -> Option<&'t Token> {
		self.tokens.get(self.pos)
	}

	#[must_use]
	fn nth(&self, n: usize) -> Option<&'t Token> {
		self.tokens.get(self.pos + n)
	}

	#[must_use]
	fn at(&self, text: &str) -> bool {
		self.peek().is_some_and(|t| t.is_reserved(text))
	}

	#[must_use]
	fn nth_at(&self, n: usize, text: &str) -> bool {
		self.nth(n).is_some_and(|t| t.is_reserved(text))
	}

	#[must_use]
	fn at_ident(&self) -> bool {
		self.peek().is_some_and(Token::is_ident)
	}

	#[must_use]
	fn at_flags(&self, flags: ReservedFlags) -> bool {
		self.peek().is_some_and(|t| t.reserved.intersects(flags))
	}

	#[must_use]
	fn at_end(&self) -> bool {
		self.pos >= self.tokens.len()
	}

	/// Consumes the current token, annotating its lexical category.
	fn bump(&mut self) -> TokenIx {
		debug_assert!(!self.at_end());
		let ix = TokenIx(self.pos as u32);

		if let Some(token) = self.peek() {
			mark_lexical(token);
		}

		self.pos += 1;
		ix
	}

	fn eat(&mut self, text: &str) -> Option<TokenIx> {
		self.at(text).then(|| self.bump())
	}

	fn eat_ident(&mut self) -> Option<TokenIx> {
		self.at_ident().then(|| self.bump())
	}

	fn expect(&mut self, text: &str) -> Option<TokenIx> {
		let ret = self.eat(text);

		if ret.is_none() {
			self.error_expected(&format!("`{text}`"));
		}

		ret
	}

	fn expect_ident(&mut self) -> Option<TokenIx> {
		let ret = self.eat_ident();

		if ret.is_none() {
			self.error_expected("identifier");
		}

		ret
	}

	fn expect_semicolon(&mut self) {
		let _ = self.expect(";");
	}

	/// Turns [`Parsed::NoMatch`] into a diagnostic; the other failure has raised one already.
	fn required<T>(&mut self, parsed: Parsed<T>, what: &str) -> Option<T> {
		match parsed {
			Parsed::Ok(t) => Some(t),
			Parsed::NoMatch => {
				self.error_expected(what);
				None
			}
			Parsed::Recovered => None,
		}
	}

	fn error_expected(&mut self, what: &str) {
		let (span, found) = match self.peek() {
			Some(token) => (token.span, format!("found `{}`", token.text)),
			None => (self.eof_span(), "reached end of input".to_string()),
		};

		self.sink
			.raise(Diag::error(span, format!("expected {what}, {found}")));
	}

	/// Raises a diagnostic for the current token and steps past it.
	fn skip_unexpected(&mut self) {
		let Some(token) = self.peek() else {
			return;
		};

		let msg = if token.kind == TokenKind::Unknown {
			format!("unrecognized character `{}`", token.text)
		} else {
			format!("unexpected token `{}`", token.text)
		};

		self.sink.raise(Diag::error(token.span, msg));
		self.pos += 1;
	}

	#[must_use]
	fn eof_span(&self) -> TextRange {
		self.tokens
			.last()
			.map_or(TextRange::default(), |t| TextRange::empty(t.span.end()))
	}

	/// From the start of token `start` to the end of the last consumed token.
	#[must_use]
	fn span_from(&self, start: usize) -> TextRange {
		let Some(first) = self.tokens.get(start) else {
			return self.eof_span();
		};

		if self.pos <= start {
			return TextRange::empty(first.span.start());
		}

		TextRange::new(first.span.start(), self.tokens[self.pos - 1].span.end())
	}

	/// Runs `f` one level deeper. At [`MAX_NESTING`], `f` is not run and a
	/// diagnostic is raised; skipping the input is left to the caller.
	fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
		if self.depth >= MAX_NESTING {
			self.raise_too_deep();
			return None;
		}

		self.depth += 1;
		let ret = f(self);
		self.depth -= 1;
		Some(ret)
	}

	fn raise_too_deep(&mut self) {
		let span = self.peek().map_or_else(|| self.eof_span(), |t| t.span);

		self.sink.raise(Diag::error(
			span,
			format!("nesting exceeds the limit of {MAX_NESTING} levels"),
		));
	}

	/// Consumes tokens up to an unbalanced closing bracket or a `;` at
	/// nesting depth zero, neither of which is consumed.
	fn skip_level(&mut self) {
		let mut depth = 0_u32;

		while let Some(token) = self.peek() {
			if depth == 0 && (is_closer(token) || token.is_reserved(";")) {
				return;
			}

			if is_opener(token) {
				depth += 1;
			} else if is_closer(token) {
				depth -= 1;
			}

			self.bump();
		}
	}

	/// Consumes a bracketed group, starting on its opening bracket.
	fn skip_group(&mut self) {
		let mut depth = 0_u32;

		while let Some(token) = self.peek() {
			self.bump();

			if is_opener(token) {
				depth += 1;
			} else if is_closer(token) {
				depth = depth.saturating_sub(1);

				if depth == 0 {
					return;
				}
			}
		}
	}

	/// Consumes through a `;` or a brace group at nesting depth zero.
	/// Stops short of an unbalanced `}`.
	fn skip_statement(&mut self) {
		let mut depth = 0_u32;

		while let Some(token) = self.peek() {
			if depth == 0 && token.is_reserved("}") {
				return;
			}

			self.bump();

			if is_opener(token) {
				depth += 1;
			} else if is_closer(token) {
				depth = depth.saturating_sub(1);

				if depth == 0 && token.is_reserved("}") {
					return;
				}
			} else if depth == 0 && token.is_reserved(";") {
				return;
			}
		}
	}

	/// Skips to and through `close` at nesting depth zero, stopping short of
	/// a `;` or `}` which would end the enclosing construct.
	fn recover_until_close(&mut self, close: &str) {
		let mut depth = 0_u32;

		while let Some(token) = self.peek() {
			if depth == 0 {
				if token.is_reserved(close) {
					self.bump();
					return;
				}

				if token.is_reserved(";") || token.is_reserved("}") {
					return;
				}
			}

			if is_opener(token) {
				depth += 1;
			} else if is_closer(token) {
				depth = depth.saturating_sub(1);
			}

			self.bump();
		}
	}

	/// A recognized production whose contents are consumed wholesale.
	fn placeholder(&mut self) -> ast::Placeholder {
		let start = self.pos;
		let keyword = self.bump();
		self.skip_statement();

		ast::Placeholder {
			keyword,
			span: self.span_from(start),
		}
	}

	/// For contextual words like `shared` or `override`, which lex as identifiers.
	fn bump_contextual_keyword(&mut self) -> TokenIx {
		let ix = self.bump();
		ix.get(self.tokens).mark(SemToken::Keyword);
		ix
	}
}

#[must_use]
fn is_opener(token: &Token) -> bool {
	token.is_reserved("(") || token.is_reserved("[") || token.is_reserved("{")
}

#[must_use]
fn is_closer(token: &Token) -> bool {
	token.is_reserved(")") || token.is_reserved("]") || token.is_reserved("}")
}

const CONTROL_FLOW: &[&str] = &[
	"if", "else", "for", "while", "do", "return", "break", "continue", "switch", "case",
	"default", "try", "catch",
];

const OPERATOR_FLAGS: ReservedFlags = ReservedFlags::BINARY_OP
	.union(ReservedFlags::PREFIX_OP)
	.union(ReservedFlags::ASSIGNMENT_OP);

fn mark_lexical(token: &Token) {
	match token.kind {
		TokenKind::Number => token.mark_default(SemToken::Number),
		TokenKind::String => token.mark_default(SemToken::String),
		TokenKind::Reserved => {
			if token.reserved.contains(ReservedFlags::PRIMITIVE_TYPE) || token.is_reserved("auto") {
				token.mark_default(SemToken::BuiltinType);
			} else if !token.reserved.contains(ReservedFlags::MARK) {
				let flags = if CONTROL_FLOW.contains(&&*token.text) {
					SemTokenFlags::CONTROL_FLOW
				} else {
					SemTokenFlags::empty()
				};

				token.mark_default(Highlight {
					kind: SemToken::Keyword,
					flags,
				});
			} else if token.reserved.intersects(OPERATOR_FLAGS) {
				token.mark_default(SemToken::Operator);
			}
		}
		TokenKind::Identifier | TokenKind::Unknown => {}
	}
}

#[cfg(test)]
mod test {
	use proptest::prelude::*;

	use crate::angelscript::lex::tokenize;

	use super::*;

	fn parse_str(text: &str) -> (Vec<Token>, ast::Script, Vec<Diag>) {
		let tokens = tokenize(text);
		let mut diags = vec![];
		let script = parse(&tokens, &mut diags);
		(tokens, script, diags)
	}

	#[test]
	fn smoke() {
		let (tokens, script, diags) = parse_str("int add(int a, int b) { return a; }");
		assert!(diags.is_empty(), "{diags:#?}");
		assert_eq!(script.items.len(), 1);

		let ast::Item::Func(func) = &script.items[0] else {
			panic!("expected a function, found: {:#?}", script.items[0]);
		};

		assert_eq!(&*func.name.get(&tokens).text, "add");
		assert_eq!(func.params.params.len(), 2);

		let body = func.body.as_ref().unwrap();
		assert_eq!(body.stats.len(), 1);
		assert!(matches!(body.stats[0], ast::Stat::Return(_)));

		assert_eq!(
			tokens[10].highlight.get().map(|h| h.kind),
			Some(SemToken::Keyword)
		);
		assert_eq!(
			tokens[0].highlight.get().map(|h| h.kind),
			Some(SemToken::BuiltinType)
		);
	}

	#[test]
	fn recovery() {
		let (tokens, script, diags) = parse_str("int x = ; $ class Foo { int y; }");
		assert!(diags.len() >= 2);

		let class = script.items.iter().find_map(|item| match item {
			ast::Item::Class(c) => Some(c),
			_ => None,
		});

		let class = class.unwrap();
		assert_eq!(&*class.name.get(&tokens).text, "Foo");
		assert_eq!(class.members.len(), 1);
	}

	#[test]
	fn nested_template_closers() {
		let (_, script, diags) = parse_str("array<array<int>> a; dict<k, array<array<int>>> b;");
		assert!(diags.is_empty(), "{diags:#?}");
		assert_eq!(script.items.len(), 2);

		let ast::Item::Var(var) = &script.items[1] else {
			panic!()
		};

		assert_eq!(var.ty.template_args.len(), 2);
		let inner = &var.ty.template_args[1].template_args[0];
		assert_eq!(inner.template_args.len(), 1);

		let (_, _, diags) = parse_str("array<int>> a;");
		assert_eq!(diags.len(), 1);
	}

	#[test]
	fn if_degrades() {
		let (_, script, diags) = parse_str("void f() { if (a) }");
		assert_eq!(diags.len(), 1);

		let ast::Item::Func(func) = &script.items[0] else {
			panic!()
		};

		let ast::Stat::If(stat_if) = &func.body.as_ref().unwrap().stats[0] else {
			panic!()
		};

		assert_eq!(stat_if.branches.len(), 1);
		assert!(stat_if.branches[0].then.is_none());
		assert!(stat_if.otherwise.is_none());
	}

	#[test]
	fn postfix_chain() {
		let (_, script, diags) = parse_str("void f() { a.b().c[0]++; }");
		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Func(func) = &script.items[0] else {
			panic!()
		};

		let ast::Stat::Expr(ast::ExprStat { value: Some(assign) }) =
			&func.body.as_ref().unwrap().stats[0]
		else {
			panic!()
		};

		let ast::ExprTerm::Value(term) = &assign.cond.expr.head else {
			panic!()
		};

		assert_eq!(term.post_ops.len(), 4);
		assert!(matches!(term.post_ops[0], ast::PostOp::MethodCall { .. }));
		assert!(matches!(term.post_ops[1], ast::PostOp::Member { name: Some(_), .. }));
		assert!(matches!(term.post_ops[2], ast::PostOp::Index(_)));
		assert!(matches!(term.post_ops[3], ast::PostOp::Increment(_)));
	}

	#[test]
	fn comparison_versus_construction() {
		let (_, script, diags) = parse_str(indoc::indoc! {"
			void f() {
				bool x = a < b;
				array<int> y = array<int>(3);
				for (int i = 0; i < n; i++) { x = i > 0; }
			}
		"});

		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Func(func) = &script.items[0] else {
			panic!()
		};

		let stats = &func.body.as_ref().unwrap().stats;
		assert_eq!(stats.len(), 3);

		let ast::Stat::Var(y) = &stats[1] else {
			panic!()
		};

		let Some(ast::VarInit::Assign(init)) = &y.decls[0].init else {
			panic!()
		};

		let ast::ExprTerm::Value(term) = &init.cond.expr.head else {
			panic!()
		};

		assert!(matches!(term.value, ast::ExprValue::ConstructCall(_)));

		let ast::Stat::For(stat_for) = &stats[2] else {
			panic!()
		};

		assert!(stat_for.init.is_some());
		assert!(stat_for.cond.is_some());
		assert_eq!(stat_for.incr.len(), 1);
		assert!(matches!(
			stat_for.body.as_deref(),
			Some(ast::Stat::Block(b)) if b.stats.len() == 1
		));
	}

	#[test]
	fn placeholders() {
		let (_, script, diags) = parse_str(indoc::indoc! {r#"
			import void ext() from "other";
			funcdef bool Pred(int);
			class C {
				int prop { get { return 1; } set { } }
				void m() {
					switch (x) { case 1: break; default: break; }
					auto l = function(a) { return a; };
				}
			}
		"#});

		assert!(diags.is_empty(), "{diags:#?}");
		assert_eq!(script.items.len(), 3);
		assert!(matches!(script.items[0], ast::Item::Placeholder(_)));
		assert!(matches!(script.items[1], ast::Item::Placeholder(_)));

		let ast::Item::Class(class) = &script.items[2] else {
			panic!()
		};

		assert!(matches!(class.members[0], ast::Member::Placeholder(_)));

		let ast::Member::Func(m) = &class.members[1] else {
			panic!()
		};

		let stats = &m.body.as_ref().unwrap().stats;
		assert!(matches!(stats[0], ast::Stat::Placeholder(_)));
		assert!(matches!(stats[1], ast::Stat::Var(_)));
	}

	#[test]
	fn class_members() {
		let (tokens, script, diags) = parse_str(indoc::indoc! {"
			shared class Foo<T> : Base, ns::IFace {
				Foo() {}
				~Foo() {}
				private int x = 0, y;
				T get(uint i) const override { return data[i]; }
				void set(const T&in v, int n = 1);
			}
		"});

		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Class(class) = &script.items[0] else {
			panic!()
		};

		assert_eq!(class.template_params.len(), 1);
		assert_eq!(class.bases.len(), 2);
		assert!(class.bases[1].scope.is_some());
		assert_eq!(class.members.len(), 5);

		let ast::Member::Func(ctor) = &class.members[0] else {
			panic!()
		};

		assert!(ctor.ret.is_none());
		assert!(!ctor.destructor);

		let ast::Member::Func(dtor) = &class.members[1] else {
			panic!()
		};

		assert!(dtor.destructor);

		let ast::Member::Var(var) = &class.members[2] else {
			panic!()
		};

		assert!(var.access.is_some());
		assert_eq!(var.decls.len(), 2);

		let ast::Member::Func(get) = &class.members[3] else {
			panic!()
		};

		assert!(get.is_const);
		assert_eq!(get.attrs.len(), 1);

		let ast::Member::Func(set) = &class.members[4] else {
			panic!()
		};

		assert!(set.body.is_none());
		assert!(set.params.params[0].is_ref);
		assert!(set.params.params[1].default.is_some());
		assert_eq!(&*set.params.params[0].modifier.unwrap().get(&tokens).text, "in");
	}

	#[test]
	fn namespaces_and_enums() {
		let (tokens, script, diags) = parse_str(indoc::indoc! {"
			namespace a::b {
				enum Color { Red, Green = 2, Blue }
				int x = ::a::b::f() + Color::Red;
			}
		"});

		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Namespace(ns) = &script.items[0] else {
			panic!()
		};

		assert_eq!(ns.names.len(), 2);
		assert_eq!(ns.body.items.len(), 2);

		let ast::Item::Enum(e) = &ns.body.items[0] else {
			panic!()
		};

		assert_eq!(e.members.len(), 3);
		assert!(e.members[1].value.is_some());
		assert_eq!(&*e.members[2].name.get(&tokens).text, "Blue");
	}

	#[test]
	fn else_if_chain() {
		let mut text = "void f() { if (a) x;".to_string();

		for _ in 0..1000 {
			text.push_str(" else if (a) x;");
		}

		text.push_str(" else y; }");
		let (_, script, diags) = parse_str(&text);
		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Func(func) = &script.items[0] else {
			panic!()
		};

		let ast::Stat::If(stat_if) = &func.body.as_ref().unwrap().stats[0] else {
			panic!()
		};

		assert_eq!(stat_if.branches.len(), 1001);
		assert!(stat_if.otherwise.is_some());
	}

	#[test]
	fn nesting_limit() {
		let depth = MAX_NESTING as usize * 4;

		let parens = format!("int x = {}1{}; int y;", "(".repeat(depth), ")".repeat(depth));
		let braces = format!("void f() {}{} int z;", "{".repeat(depth), "}".repeat(depth + 1));
		let inits = format!("int[] w = {}{}; int y;", "{".repeat(depth), "}".repeat(depth));
		let types = format!("{}int{} t; int y;", "array<".repeat(depth), ">".repeat(depth));

		for text in [parens, braces, inits, types] {
			let (_, script, diags) = parse_str(&text);
			assert_eq!(diags.len(), 1, "{diags:#?}");
			assert!(diags[0].message.contains("nesting exceeds"));
			assert_eq!(script.items.len(), 2, "{text}");
		}
	}

	#[test]
	fn nesting_within_limit() {
		let depth = MAX_NESTING as usize - 2;
		let text = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
		let (_, script, diags) = parse_str(&text);
		assert!(diags.is_empty(), "{diags:#?}");
		assert_eq!(script.items.len(), 1);
	}

	#[test]
	fn long_operator_chains() {
		let text = format!(
			"int x = 1{}; void f() {{ y = y{}; }}",
			" + 1".repeat(10_000),
			" = y".repeat(10_000)
		);
		let (_, script, diags) = parse_str(&text);
		assert!(diags.is_empty(), "{diags:#?}");

		let ast::Item::Var(var) = &script.items[0] else {
			panic!()
		};

		let Some(ast::VarInit::Assign(init)) = &var.decls[0].init else {
			panic!()
		};

		assert!(init.tail.is_empty());
		assert_eq!(init.cond.expr.tail.len(), 10_000);
	}

	const SOUP: &[&str] = &[
		"int", "x", "(", ")", "{", "}", "[", "]", "<", ">", ">>", ";", ",", "=", "class",
		"namespace", "if", "else", "for", "while", "return", "cast", "::", ".", "@", "1",
		"\"s\"", "?", ":", "enum", "$", "~", "const", "&", "+", "++", "switch", "function",
	];

	proptest! {
		#[test]
		fn termination(words in prop::collection::vec(prop::sample::select(SOUP), 0..48)) {
			let text = words.join(" ");
			let (tokens, _, diags) = parse_str(&text);
			let end = tokens.last().map_or(0.into(), |t| t.span.end());

			for diag in diags {
				prop_assert!(diag.span.end() <= end);
			}
		}
	}
}
