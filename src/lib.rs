//! # AngelLS Core
//!
//! The analysis core of a language server for AngelScript: tokenizing, error-
//! tolerant parsing, and scope/symbol resolution with type deduction. The
//! transport that exchanges requests with an editor lives elsewhere and only
//! consumes what this library produces.

pub mod angelscript;
pub mod config;
pub mod diag;
pub mod error;
pub mod lines;
pub mod semtokens;
pub mod setup;

#[cfg(test)]
mod test;

use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHasher;

pub use angelscript::Analysis;
pub use config::Config;

pub type ErrorBox = Box<dyn std::error::Error + Send + Sync>;
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Tokenize, parse, and resolve one document version.
#[must_use]
pub fn analyze(text: &str, config: &Config) -> Analysis {
	angelscript::Analysis::new(text, config)
}

/// Analyze several independent documents, each in its own run.
///
/// No run observes another's state; the only shared data are the reserved-word
/// registry and the builtin types, which are read-only.
#[must_use]
pub fn analyze_all(texts: &[&str], config: &Config) -> Vec<Analysis> {
	// Force one-time initialization before fanning out.
	let _ = angelscript::reserved::registry();
	let _ = angelscript::builtin::builtins();

	texts
		.par_iter()
		.map(|text| Analysis::new(text, config))
		.collect()
}
