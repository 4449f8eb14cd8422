//! Substitution of template parameters by their bindings.

use super::sema::{DeducedType, ScopeTree, SymbolRef, TemplateTranslation, TypeSource};

/// If `ty` is a template parameter bound by `translation`, yields its binding
/// (a handle if either side was one). Bindings found on `ty` itself are
/// translated recursively. Functions pass through unchanged.
#[must_use]
pub fn resolve_template_type(
	tree: &ScopeTree,
	translation: &TemplateTranslation,
	ty: &DeducedType,
) -> DeducedType {
	let SymbolRef::Type(key) = ty.symbol else {
		return ty.clone();
	};

	let is_param = tree
		.symbols
		.get(key)
		.and_then(|s| s.as_type())
		.is_some_and(|t| t.source == TypeSource::Template);

	if is_param {
		let declared = tree.symbols[key].declared();

		if let Some(bound) = declared.and_then(|d| translation.get(&d)) {
			let mut ret = bound.clone();
			ret.is_handle |= ty.is_handle;
			return ret;
		}

		return ty.clone();
	}

	let Some(inner) = &ty.translation else {
		return ty.clone();
	};

	let mut ret = ty.clone();

	ret.translation = Some(
		inner
			.iter()
			.map(|(param, bound)| (*param, resolve_template_type(tree, translation, bound)))
			.collect(),
	);

	ret
}

/// Applies each translation in turn, left to right.
#[must_use]
pub fn resolve_template_types<'t>(
	tree: &ScopeTree,
	translations: impl IntoIterator<Item = &'t TemplateTranslation>,
	ty: &DeducedType,
) -> DeducedType {
	translations
		.into_iter()
		.fold(ty.clone(), |acc, tl| resolve_template_type(tree, tl, &acc))
}

#[cfg(test)]
mod test {
	use rustc_hash::FxHashMap;

	use crate::angelscript::{
		builtin::builtins,
		lex::TokenIx,
		sema::{SymbolicObject, SymbolicType},
	};

	use super::*;

	fn template_param(tree: &mut ScopeTree, declared: u32, name: &str) -> DeducedType {
		let key = tree
			.insert_symbol(
				tree.root,
				name,
				SymbolicObject::Type(SymbolicType {
					declared: Some(TokenIx(declared)),
					name: name.into(),
					source: TypeSource::Template,
					template_params: None,
					bases: None,
					members: None,
				}),
			)
			.unwrap();

		DeducedType::of_type(key, tree.root)
	}

	#[test]
	fn smoke() {
		let mut tree = ScopeTree::new();
		let t = template_param(&mut tree, 3, "T");
		let int = DeducedType::builtin(builtins().int());

		let mut tl = FxHashMap::default();
		tl.insert(TokenIx(3), int.clone());

		let resolved = resolve_template_type(&tree, &tl, &t);
		assert!(resolved.symbol.same_as(int.symbol));

		let resolved = resolve_template_type(&tree, &tl, &t.clone().into_handle());
		assert!(resolved.is_handle);

		// Non-parameters are returned as they are.
		let resolved = resolve_template_type(&tree, &tl, &int);
		assert!(resolved.symbol.same_as(int.symbol));
	}

	#[test]
	fn chained() {
		let mut tree = ScopeTree::new();
		let t = template_param(&mut tree, 3, "T");
		let u = template_param(&mut tree, 7, "U");
		let float = DeducedType::builtin(builtins().float());

		// `T` becomes `U`, then `U` becomes `float`.
		let mut first = FxHashMap::default();
		first.insert(TokenIx(3), u.clone());
		let mut second = FxHashMap::default();
		second.insert(TokenIx(7), float.clone());

		let resolved = resolve_template_types(&tree, [&first, &second], &t);
		assert!(resolved.symbol.same_as(float.symbol));

		let resolved = resolve_template_types(&tree, [&second, &first], &t);
		assert!(resolved.symbol.same_as(u.symbol));
	}
}
