//! Hover information for keywords and resolved identifiers.

mod keyword;

use lsp_types::{Hover, HoverContents, LanguageString, MarkedString, Position};

use crate::error::Error;

use super::{
	lex::TokenKind,
	sema::{SymbolKey, SymbolicFunction, SymbolicObject, SymbolicType, TypeSource, VariableKind},
	Analysis,
};

/// `Ok(None)` if there is nothing to say about what lies at `pos`.
pub fn hover(analysis: &Analysis, pos: Position) -> Result<Option<Hover>, Error> {
	let offset = analysis.lndx.offset_utf16(pos)?;

	let Some(ix) = analysis.token_at(offset) else {
		tracing::debug!("Hover miss - no token at {pos:?}.");
		return Ok(None);
	};

	let token = ix.get(&analysis.tokens);

	let contents = match token.kind {
		TokenKind::Reserved => keyword::hover_info_for(token),
		TokenKind::Identifier => analysis
			.symbol_of(ix)
			.map(|sym| symbol_hover(analysis, sym)),
		_ => None,
	};

	Ok(contents.map(|c| Hover {
		contents: c,
		range: Some(analysis.lndx.range_utf16(token.span)),
	}))
}

fn symbol_hover(analysis: &Analysis, key: SymbolKey) -> HoverContents {
	let code = match &analysis.tree.symbols[key] {
		SymbolicObject::Type(t) => format_type_info(analysis, t),
		SymbolicObject::Function(f) => format_function_info(analysis, f),
		SymbolicObject::Variable(v) => {
			let ty = v
				.ty
				.as_ref()
				.map_or_else(|| "?".to_string(), |t| analysis.tree.type_name(t));

			match v.kind {
				VariableKind::EnumMember => format!("{ty}::{}", v.name),
				VariableKind::Param => format!("{ty} {} (parameter)", v.name),
				_ => format!("{ty} {}", v.name),
			}
		}
	};

	HoverContents::Array(vec![MarkedString::LanguageString(LanguageString {
		language: "angelscript".to_string(),
		value: code,
	})])
}

#[must_use]
fn format_type_info(analysis: &Analysis, datum: &SymbolicType) -> String {
	let keyword = match datum.source {
		TypeSource::Class => "class",
		TypeSource::Interface => "interface",
		TypeSource::Enum => "enum",
		TypeSource::Template => return format!("{} (template parameter)", datum.name),
		_ => return datum.name.to_string(),
	};

	let mut decl = format!("{keyword} {}", datum.name);

	if let Some(params) = &datum.template_params {
		let names = params
			.iter()
			.map(|p| &*p.get(&analysis.tokens).text)
			.collect::<Vec<_>>();

		decl.push('<');
		decl.push_str(&names.join(", "));
		decl.push('>');
	}

	if let Some(bases) = &datum.bases {
		let names = bases
			.iter()
			.map(|b| analysis.tree.type_name(b))
			.collect::<Vec<_>>();

		decl.push_str(" : ");
		decl.push_str(&names.join(", "));
	}

	decl
}

#[must_use]
fn format_function_info(analysis: &Analysis, datum: &SymbolicFunction) -> String {
	let mut decl = String::new();

	if let Some(ret) = &datum.ret {
		decl.push_str(&analysis.tree.type_name(ret));
		decl.push(' ');
	}

	decl.push_str(&datum.name);

	if let Some(params) = &datum.template_params {
		let names = params
			.iter()
			.map(|p| &*p.get(&analysis.tokens).text)
			.collect::<Vec<_>>();

		decl.push('<');
		decl.push_str(&names.join(", "));
		decl.push('>');
	}

	let params = datum
		.param_names
		.iter()
		.enumerate()
		.map(|(i, name)| {
			let ty = datum
				.params
				.get(i)
				.and_then(Option::as_ref)
				.map_or_else(|| "?".to_string(), |t| analysis.tree.type_name(t));

			match name {
				Some(n) => format!("{ty} {}", n.get(&analysis.tokens).text),
				None => ty,
			}
		})
		.collect::<Vec<_>>();

	decl.push('(');
	decl.push_str(&params.join(", "));
	decl.push(')');
	decl
}

#[cfg(test)]
mod test {
	use crate::config::Config;

	use super::*;

	fn hover_text(source: &str, line: u32, character: u32) -> Option<String> {
		let analysis = Analysis::new(source, &Config::default());
		let hover = hover(&analysis, Position { line, character }).unwrap()?;

		let HoverContents::Array(contents) = hover.contents else {
			panic!("expected an array of hover contents");
		};

		match &contents[0] {
			MarkedString::LanguageString(ls) => Some(ls.value.clone()),
			MarkedString::String(s) => Some(s.clone()),
		}
	}

	#[test]
	fn smoke() {
		const SOURCE: &str = indoc::indoc! {"
			class Base {}
			class Derived : Base {}
			int add(int a, int b = 1) { return a; }
			void main() { Derived d; add(1); }
		"};

		assert_eq!(hover_text(SOURCE, 1, 7).unwrap(), "class Derived : Base");
		assert_eq!(hover_text(SOURCE, 2, 5).unwrap(), "int add(int a, int b)");
		assert_eq!(hover_text(SOURCE, 3, 23).unwrap(), "Derived d");
		assert!(hover_text(SOURCE, 3, 0).is_none());
		assert!(hover_text(SOURCE, 0, 12).is_none());
	}

	#[test]
	fn keyword() {
		assert_eq!(hover_text("namespace N {}", 0, 3).unwrap(), "namespace");
	}

	#[test]
	fn out_of_bounds() {
		let analysis = Analysis::new("int x;", &Config::default());

		assert!(hover(
			&analysis,
			Position {
				line: 5,
				character: 0
			}
		)
		.is_err());
	}
}
