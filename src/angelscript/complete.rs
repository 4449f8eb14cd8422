//! Completion, as read from the hints and symbol tables along the scope path.

use lsp_types::{CompletionItem, CompletionItemKind, Position};
use rustc_hash::FxHashSet;

use crate::error::Error;

use super::{
	builtin::builtins,
	sema::{
		DeducedType, Hint, ScopeKey, ScopeOwner, SymbolKey, SymbolicObject, TypeSource,
		VariableKind,
	},
	template::resolve_template_type,
	Analysis,
};

pub fn completions(analysis: &Analysis, pos: Position) -> Result<Vec<CompletionItem>, Error> {
	let offset = analysis.lndx.offset_utf16(pos)?;
	let tree = &analysis.tree;
	let scope = tree.scope_at(offset);
	let mut path = tree.ancestors(scope).collect::<Vec<_>>();
	path.reverse();

	// The innermost, most recent hint covering the cursor wins.
	let hint = path
		.iter()
		.flat_map(|s| tree.scopes[*s].hints.iter())
		.filter(|h| !matches!(h, Hint::Scope { .. }))
		.filter(|h| h.span().contains_inclusive(offset))
		.last();

	let mut items = Completions {
		analysis,
		seen: FxHashSet::default(),
		items: vec![],
	};

	match hint {
		Some(Hint::Type { ty, .. }) => items.members_of(ty),
		Some(Hint::Namespace { scope, .. }) => items.scope(*scope, None),
		_ => {
			for s in path.iter().rev() {
				items.scope(*s, None);
			}

			for b in builtins().iter().filter(|b| b.source != TypeSource::Any) {
				items.push(&b.name, CompletionItemKind::KEYWORD, None);
			}
		}
	}

	Ok(items.items)
}

struct Completions<'a> {
	analysis: &'a Analysis,
	/// Inner declarations shadow outer ones of the same name.
	seen: FxHashSet<&'a str>,
	items: Vec<CompletionItem>,
}

impl<'a> Completions<'a> {
	fn push(&mut self, label: &'a str, kind: CompletionItemKind, detail: Option<String>) {
		if !self.seen.insert(label) {
			return;
		}

		self.items.push(CompletionItem {
			label: label.to_string(),
			kind: Some(kind),
			detail,
			..Default::default()
		});
	}

	/// Symbols of `scope` and its named children.
	fn scope(&mut self, scope: ScopeKey, owner: Option<&DeducedType>) {
		let analysis: &'a Analysis = self.analysis;
		let tree = &analysis.tree;

		for (name, key) in &tree.scopes[scope].symbols {
			self.symbol(name, *key, owner);
		}

		for (name, child) in &tree.scopes[scope].children {
			if tree.scopes[*child].owner == Some(ScopeOwner::Namespace) {
				self.push(name, CompletionItemKind::MODULE, None);
			}
		}
	}

	fn symbol(&mut self, name: &'a str, key: SymbolKey, owner: Option<&DeducedType>) {
		let analysis: &'a Analysis = self.analysis;
		let tree = &analysis.tree;

		let (kind, detail) = match &tree.symbols[key] {
			SymbolicObject::Type(t) => {
				let kind = match t.source {
					TypeSource::Class => CompletionItemKind::CLASS,
					TypeSource::Interface => CompletionItemKind::INTERFACE,
					TypeSource::Enum => CompletionItemKind::ENUM,
					TypeSource::Template => CompletionItemKind::TYPE_PARAMETER,
					_ => CompletionItemKind::STRUCT,
				};

				(kind, None)
			}
			SymbolicObject::Function(f) => {
				let kind = if f.is_instance_member {
					CompletionItemKind::METHOD
				} else {
					CompletionItemKind::FUNCTION
				};

				(kind, f.ret.as_ref().map(|r| self.type_name(r, owner)))
			}
			SymbolicObject::Variable(v) => {
				let kind = match v.kind {
					VariableKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
					VariableKind::Member => CompletionItemKind::FIELD,
					_ => CompletionItemKind::VARIABLE,
				};

				(kind, v.ty.as_ref().map(|t| self.type_name(t, owner)))
			}
		};

		self.push(name, kind, detail);
	}

	/// Members of the type and each of its bases.
	fn members_of(&mut self, ty: &DeducedType) {
		let analysis: &'a Analysis = self.analysis;
		let tree = &analysis.tree;
		let mut visited = FxHashSet::default();
		let mut stack = vec![ty.symbol];

		while let Some(symbol) = stack.pop() {
			let Some(t) = tree.get_type(symbol) else {
				continue;
			};

			if let Some(members) = t.members {
				if !visited.insert(members) {
					continue;
				}

				self.scope(members, Some(ty));
			}

			if let Some(bases) = &t.bases {
				stack.extend(bases.iter().rev().map(|b| b.symbol));
			}
		}
	}

	#[must_use]
	fn type_name(&self, ty: &DeducedType, owner: Option<&DeducedType>) -> String {
		let tree = &self.analysis.tree;

		match owner.and_then(|o| o.translation.as_ref()) {
			Some(tl) => tree.type_name(&resolve_template_type(tree, tl, ty)),
			None => tree.type_name(ty),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::config::Config;

	use super::*;

	fn labels(source: &str, line: u32, character: u32) -> Vec<String> {
		let analysis = Analysis::new(source, &Config::default());

		completions(&analysis, Position { line, character })
			.unwrap()
			.into_iter()
			.map(|c| c.label)
			.collect()
	}

	#[test]
	fn members() {
		const SOURCE: &str = indoc::indoc! {"
			class Base { int hp; }
			class Player : Base { void jump() {} }
			void main() {
				Player p;
				p.
			}
		"};

		let labels = labels(SOURCE, 4, 3);
		assert!(labels.iter().any(|l| l == "jump"));
		assert!(labels.iter().any(|l| l == "hp"));
		assert!(!labels.iter().any(|l| l == "main"));
	}

	#[test]
	fn namespace() {
		const SOURCE: &str = indoc::indoc! {"
			namespace util { void helper() {} }
			void main() {
				util::
			}
		"};

		let labels = labels(SOURCE, 2, 7);
		assert_eq!(labels, ["helper"]);
	}

	#[test]
	fn scope_chain() {
		const SOURCE: &str = indoc::indoc! {"
			int global;
			namespace util {}
			void main(int arg) {
				int local;

			}
		"};

		let labels = labels(SOURCE, 4, 0);

		for expected in ["local", "arg", "main", "global", "util", "int"] {
			assert!(labels.iter().any(|l| l == expected), "missing `{expected}`");
		}
	}
}
