//! Semantic token highlighting.
//!
//! All the categorization happened during parsing and resolution, which left
//! their annotations on the tokens. This only walks the tokens in order and
//! encodes what it finds, splitting escape sequences out of string literals.

use std::sync::OnceLock;

use lsp_types::SemanticToken;
use regex::Regex;
use text_size::{TextRange, TextSize};

use crate::semtokens::{Highlighter, SemToken};

use super::{
	lex::{Token, TokenKind},
	Analysis,
};

#[must_use]
pub fn semantic_tokens(analysis: &Analysis) -> Vec<SemanticToken> {
	let start_time = std::time::Instant::now();
	let mut hl = Highlighter::new(&analysis.lndx);

	for token in &analysis.tokens {
		let Some(highlight) = token.highlight.get() else {
			continue;
		};

		if token.kind == TokenKind::String && highlight.kind == SemToken::String {
			highlight_string_literal(&mut hl, token);
		} else {
			hl.advance_mod(highlight.kind, token.span, highlight.flags);
		}
	}

	tracing::debug!(
		"AngelScript semantic highlighting done in {}ms.",
		start_time.elapsed().as_millis()
	);

	hl.finish()
}

fn highlight_string_literal(hl: &mut Highlighter, token: &Token) {
	static REGEX: OnceLock<Regex> = OnceLock::new();

	// Heredocs take their contents verbatim.
	if token.text.starts_with(r#"""""#) {
		hl.advance(SemToken::String, token.span);
		return;
	}

	let rgx = REGEX.get_or_init(|| {
		Regex::new(r#"\\(?:x[A-Fa-f0-9]{1,8}|u[A-Fa-f0-9]{4}|U[A-Fa-f0-9]{8}|[0-9]+|.)"#)
			.unwrap()
	});

	let base = u32::from(token.span.start());
	let mut pos = token.span.start();

	for m in rgx.find_iter(&token.text) {
		let r = TextRange::new(
			TextSize::from(base + m.start() as u32),
			TextSize::from(base + m.end() as u32),
		);

		if r.start() > pos {
			hl.advance(SemToken::String, TextRange::new(pos, r.start()));
		}

		hl.advance(SemToken::EscapeSeq, r);
		pos = r.end();
	}

	hl.advance(SemToken::String, TextRange::new(pos, token.span.end()));
}

#[cfg(test)]
mod test {
	use crate::{config::Config, semtokens::SemTokenFlags};

	use super::*;

	#[test]
	fn smoke() {
		const SOURCE: &str = indoc::indoc! {r#"
			class Foo { int bar; }
			void main() {
				Foo f;
				f.bar = 3;
				string s = "a\nb";
			}
		"#};

		let analysis = Analysis::new(SOURCE, &Config::default());
		let hl = |text: &str| {
			analysis
				.tokens
				.iter()
				.find(|t| &*t.text == text)
				.and_then(|t| t.highlight.get())
		};

		assert_eq!(hl("class").unwrap().kind, SemToken::Keyword);
		assert_eq!(hl("Foo").unwrap().kind, SemToken::Class);
		assert!(hl("Foo").unwrap().flags.contains(SemTokenFlags::DECLARATION));
		assert_eq!(hl("bar").unwrap().kind, SemToken::Property);
		assert_eq!(hl("main").unwrap().kind, SemToken::Function);
		assert_eq!(hl("3").unwrap().kind, SemToken::Number);
		assert_eq!(hl("string").unwrap().kind, SemToken::BuiltinType);

		let toks = semantic_tokens(&analysis);
		let escapes = toks
			.iter()
			.filter(|t| t.token_type == SemToken::EscapeSeq as u32)
			.count();
		assert_eq!(escapes, 1);

		// `"a`, `\n`, `b"`.
		let strings = toks
			.iter()
			.filter(|t| t.token_type == SemToken::String as u32)
			.count();
		assert_eq!(strings, 2);
	}
}
