//! Go-to-definition over the references recorded during resolution.

use lsp_types::{GotoDefinitionResponse, Location, Position, Url};

use crate::error::Error;

use super::{lex::TokenKind, Analysis};

pub fn definition(
	analysis: &Analysis,
	uri: &Url,
	pos: Position,
) -> Result<Option<GotoDefinitionResponse>, Error> {
	let offset = analysis.lndx.offset_utf16(pos)?;

	let Some(ix) = analysis.token_at(offset) else {
		tracing::debug!("GotoDefinition miss - no token at {pos:?}.");
		return Ok(None);
	};

	if ix.get(&analysis.tokens).kind != TokenKind::Identifier {
		tracing::debug!("GotoDefinition miss - not an identifier.");
		return Ok(None);
	}

	let Some(symbol) = analysis.symbol_of(ix) else {
		tracing::debug!("GotoDefinition miss - unknown symbol.");
		return Ok(None);
	};

	let Some(declared) = analysis.tree.symbols[symbol].declared() else {
		return Ok(None);
	};

	let span = declared.get(&analysis.tokens).span;

	Ok(Some(GotoDefinitionResponse::Scalar(Location {
		uri: uri.clone(),
		range: analysis.lndx.range_utf16(span),
	})))
}

#[cfg(test)]
mod test {
	use crate::config::Config;

	use super::*;

	#[test]
	fn smoke() {
		const SOURCE: &str = indoc::indoc! {"
			namespace ns { int counter; }
			class Widget { void poke() {} }
			void main() {
				Widget w;
				w.poke();
				ns::counter = 1;
			}
		"};

		let analysis = Analysis::new(SOURCE, &Config::default());
		let uri = Url::parse("file:///test.as").unwrap();

		let go = |line: u32, character: u32| {
			match definition(&analysis, &uri, Position { line, character }).unwrap() {
				Some(GotoDefinitionResponse::Scalar(loc)) => Some(loc.range.start),
				_ => None,
			}
		};

		// `Widget` in `Widget w;`
		assert_eq!(go(3, 2), Some(Position { line: 1, character: 6 }));
		// `poke` in `w.poke();`
		assert_eq!(go(4, 4), Some(Position { line: 1, character: 20 }));
		// `counter` in `ns::counter = 1;`
		assert_eq!(go(5, 6), Some(Position { line: 0, character: 19 }));
		// `void`
		assert_eq!(go(2, 1), None);
	}
}
