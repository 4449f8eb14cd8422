//! Analysis of [AngelScript] source.
//!
//! [AngelScript]: https://www.angelcode.com/angelscript/

pub mod ast;
pub mod builtin;
pub mod complete;
pub(crate) mod decl;
pub(crate) mod define;
pub mod goto;
pub mod highlight;
pub mod hover;
pub mod lex;
pub mod parse;
pub mod reserved;
pub mod resolve;
pub mod sema;
pub mod template;

use std::time::Instant;

use lsp_types::{Diagnostic, Url};
use rustc_hash::FxHashMap;
use text_size::TextSize;

use crate::{
	config::Config,
	diag::{Capped, Diag},
	lines::LineIndex,
};

use self::{
	lex::{Token, TokenIx},
	sema::{ScopeTree, SymbolKey},
};

/// Everything known about one version of one document.
#[derive(Debug)]
pub struct Analysis {
	pub lndx: LineIndex,
	pub tokens: Vec<Token>,
	pub script: ast::Script,
	pub tree: ScopeTree,
	/// The symbol each name token declares or refers to.
	pub token_symbols: FxHashMap<TokenIx, SymbolKey>,
	pub diags: Vec<Diag>,
	/// Diagnostics discarded for exceeding [`Config::max_diagnostics`].
	pub dropped: usize,
}

impl Analysis {
	#[must_use]
	pub fn new(text: &str, config: &Config) -> Self {
		let start_time = Instant::now();
		let lndx = LineIndex::new(text);
		let tokens = lex::tokenize(text);
		let mut sink = Capped::new(config.max_diagnostics);
		let script = parse::parse(&tokens, &mut sink);
		let (tree, token_symbols) = resolve::resolve(&tokens, &script, config, &mut sink);
		let dropped = sink.dropped();

		if dropped > 0 {
			tracing::debug!("Dropped {dropped} diagnostics over the configured limit.");
		}

		tracing::debug!(
			"Analyzed {} tokens in {}ms.",
			tokens.len(),
			start_time.elapsed().as_millis()
		);

		Self {
			lndx,
			tokens,
			script,
			tree,
			token_symbols,
			diags: sink.diags,
			dropped,
		}
	}

	#[must_use]
	pub fn lsp_diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
		self.diags
			.iter()
			.map(|d| d.to_lsp(&self.lndx, uri))
			.collect()
	}

	/// The token covering `offset`. An offset at the very end of a token
	/// counts as touching it, so a cursor after `foo` finds `foo`.
	#[must_use]
	pub fn token_at(&self, offset: TextSize) -> Option<TokenIx> {
		let ix = self
			.tokens
			.partition_point(|t| t.span.end() < offset);

		let token = self.tokens.get(ix)?;
		token.span.contains_inclusive(offset).then_some(TokenIx(ix as u32))
	}

	/// The symbol `token` refers to or declares.
	#[must_use]
	pub fn symbol_of(&self, token: TokenIx) -> Option<SymbolKey> {
		self.token_symbols.get(&token).copied()
	}
}
