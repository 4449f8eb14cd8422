//! Machinery shared by the resolver's passes: declaration, lookup, type
//! reference resolution, reference recording, and identifier highlighting.

use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};
use text_size::TextRange;

use crate::{
	config::Config,
	diag::{Diag, DiagSink},
	semtokens::{Highlight, SemToken, SemTokenFlags},
};

use super::{
	ast,
	builtin::{builtins, find_builtin_type},
	decl, define,
	lex::{Token, TokenIx, TokenKind},
	sema::{
		DeducedType, Hint, InsertError, Reference, ScopeKey, ScopeOwner, ScopeTree, SymbolKey,
		SymbolRef, SymbolicObject, SymbolicType, TypeSource, VariableKind,
	},
};

/// Build the scope tree for one parsed document, along with a map from each
/// name token to the symbol it declares or refers to.
#[must_use]
pub fn resolve(
	tokens: &[Token],
	script: &ast::Script,
	config: &Config,
	sink: &mut dyn DiagSink,
) -> (ScopeTree, FxHashMap<TokenIx, SymbolKey>) {
	let start_time = Instant::now();
	let mut ctx = ResolveContext::new(tokens, config, sink);
	let root = ctx.tree.root;

	decl::declare_script(&mut ctx, root, script);
	decl::sign_script(&mut ctx, root, script);
	decl::check_inheritance(&mut ctx);
	define::define_script(&mut ctx, root, script);

	tracing::debug!(
		"Resolved {} symbols in {} scopes in {}ms.",
		ctx.tree.symbols.len(),
		ctx.tree.scopes.len(),
		start_time.elapsed().as_millis()
	);

	let ResolveContext {
		tree, mut declared, ..
	} = ctx;

	for scope in tree.scopes.values() {
		for reference in &scope.references {
			declared.insert(reference.token, reference.symbol);
		}
	}

	(tree, declared)
}

pub(super) struct ResolveContext<'a> {
	pub(super) tokens: &'a [Token],
	pub(super) config: &'a Config,
	pub(super) tree: ScopeTree,
	pub(super) sink: &'a mut dyn DiagSink,
	/// Maps each declaring token to the symbol it introduced.
	pub(super) declared: FxHashMap<TokenIx, SymbolKey>,
	/// Maps the name token of each namespace, class, interface, enum, and
	/// function to the scope it opened.
	pub(super) scopes: FxHashMap<TokenIx, ScopeKey>,
}

impl<'a> ResolveContext<'a> {
	fn new(tokens: &'a [Token], config: &'a Config, sink: &'a mut dyn DiagSink) -> Self {
		Self {
			tokens,
			config,
			tree: ScopeTree::new(),
			sink,
			declared: FxHashMap::default(),
			scopes: FxHashMap::default(),
		}
	}

	#[must_use]
	pub(super) fn text(&self, token: TokenIx) -> &'a str {
		&token.get(self.tokens).text
	}

	#[must_use]
	pub(super) fn span(&self, token: TokenIx) -> TextRange {
		token.get(self.tokens).span
	}

	pub(super) fn raise(&mut self, diag: Diag) {
		self.sink.raise(diag);
	}

	/// Inserts `symbol` under `name` and marks its declaring token.
	/// Returns `None` if the name was taken, after reporting as much.
	pub(super) fn declare(
		&mut self,
		scope: ScopeKey,
		token: TokenIx,
		name: &str,
		symbol: SymbolicObject,
	) -> Option<SymbolKey> {
		match self.tree.insert_symbol(scope, name, symbol) {
			Ok(key) => {
				self.declared.insert(token, key);
				self.mark_symbol(token, key, true);
				Some(key)
			}
			Err(InsertError::Duplicate(prev)) => {
				self.redeclare_error(prev, self.span(token), name);
				None
			}
			Err(InsertError::Closed) => {
				tracing::error!("Attempted to declare `{name}` in a closed scope.");
				None
			}
		}
	}

	fn redeclare_error(&mut self, prev: SymbolKey, span: TextRange, name: &str) {
		let mut diag = Diag::error(span, format!("attempt to re-declare symbol `{name}`"));

		if let Some(declared) = self.tree.symbols[prev].declared() {
			diag = diag.with_related(self.span(declared), "original declaration is here");
		}

		self.raise(diag);
	}

	/// The scope of a namespace or a type named by `name`. Only a namespace
	/// may share its name with an existing child of `parent`, and only with
	/// another namespace; any other clash is reported, and the newcomer gets
	/// a scope of its own so that its contents still resolve.
	pub(super) fn named_scope(
		&mut self,
		parent: ScopeKey,
		name: TokenIx,
		owner: ScopeOwner,
		span: TextRange,
	) -> ScopeKey {
		let text = self.text(name);

		if let Some(&existing) = self.tree.scopes[parent].children.get(text) {
			let prev = &self.tree.scopes[existing];

			let reopens =
				owner == ScopeOwner::Namespace && prev.owner == Some(ScopeOwner::Namespace);

			if !reopens {
				let first = prev.spans.first().copied();
				let mut diag =
					Diag::error(self.span(name), format!("attempt to re-declare symbol `{text}`"));

				if let Some(first) = first {
					diag = diag.with_related(first, "original declaration is here");
				}

				self.raise(diag);
			}
		}

		self.tree.child_scope(parent, Some(text), owner, span)
	}

	/// For template parameters of classes and functions.
	pub(super) fn declare_template_params(&mut self, scope: ScopeKey, params: &[TokenIx]) {
		for param in params {
			let name = self.text(*param);

			let _ = self.declare(
				scope,
				*param,
				name,
				SymbolicObject::Type(SymbolicType {
					declared: Some(*param),
					name: name.into(),
					source: TypeSource::Template,
					template_params: None,
					bases: None,
					members: None,
				}),
			);
		}
	}

	// Lookup //////////////////////////////////////////////////////////////////

	/// Unqualified lookup: each enclosing scope in turn (searching the bases
	/// of enclosing classes), then the values of enclosing enums.
	#[must_use]
	pub(super) fn lookup(&self, scope: ScopeKey, name: &str) -> Option<(SymbolKey, ScopeKey)> {
		for s in self.tree.ancestors(scope) {
			if let Some(key) = self.tree.find_shallow(s, name) {
				return Some((key, s));
			}

			let Some(ScopeOwner::Class(class) | ScopeOwner::Interface(class)) =
				self.tree.scopes[s].owner
			else {
				continue;
			};

			let bases = self.tree.symbols[class]
				.as_type()
				.and_then(|t| t.bases.as_ref());

			for base in bases.into_iter().flatten() {
				if let Some(found) = self.find_member(base, name) {
					return Some(found);
				}
			}
		}

		self.tree.ancestors(scope).find_map(|s| {
			self.tree.scopes[s]
				.children
				.values()
				.filter(|c| matches!(self.tree.scopes[**c].owner, Some(ScopeOwner::Enum(_))))
				.find_map(|c| self.tree.find_shallow(*c, name).map(|k| (k, *c)))
		})
	}

	/// Searches the member scope of `ty`'s type, then those of its bases.
	#[must_use]
	pub(super) fn find_member(&self, ty: &DeducedType, name: &str) -> Option<(SymbolKey, ScopeKey)> {
		let mut visited = FxHashSet::default();
		let mut stack = vec![ty.symbol];

		while let Some(symbol) = stack.pop() {
			if let SymbolRef::Type(key) = symbol {
				if !visited.insert(key) {
					continue;
				}
			}

			let Some(t) = self.tree.get_type(symbol) else {
				continue;
			};

			if let Some(members) = t.members {
				if let Some(found) = self.tree.find_shallow(members, name) {
					return Some((found, members));
				}
			}

			if let Some(bases) = &t.bases {
				stack.extend(bases.iter().rev().map(|b| b.symbol));
			}
		}

		None
	}

	/// Whether `ty` names a type with members that could be looked up.
	#[must_use]
	pub(super) fn has_members(&self, ty: &DeducedType) -> bool {
		self.tree
			.get_type(ty.symbol)
			.is_some_and(|t| t.members.is_some())
	}

	/// Resolves `A::B::` to the scope it names, recording a namespace hint
	/// where the qualified name begins.
	pub(super) fn resolve_scope_path(
		&mut self,
		scope: ScopeKey,
		path: &ast::ScopePath,
	) -> Option<ScopeKey> {
		let mut current = path.global.map(|_| self.tree.root);

		for name in &path.names {
			let text = self.text(*name);

			let found = match current {
				Some(c) => self.tree.scopes[c].children.get(text).copied(),
				None => self.tree.find_scope_with_parent(scope, text),
			};

			let Some(found) = found else {
				if self.config.report_unresolved {
					self.raise(Diag::error(
						self.span(*name),
						format!("undefined namespace `{text}`"),
					));
				}

				return None;
			};

			match self.tree.scopes[found].owner {
				Some(
					ScopeOwner::Class(k)
					| ScopeOwner::Interface(k)
					| ScopeOwner::Enum(k)
					| ScopeOwner::Function(k),
				) => self.refer(scope, *name, k),
				_ => name.get(self.tokens).mark(SemToken::Namespace),
			}

			current = Some(found);
		}

		let target = current.unwrap_or(self.tree.root);

		if let Some(colons) = path.last_colons {
			let span = self.span_after(colons);

			self.tree.scopes[scope].hints.push(Hint::Namespace {
				span,
				scope: target,
			});
		}

		Some(target)
	}

	/// From the end of `token` through the end of the identifier following it,
	/// if there is one.
	#[must_use]
	pub(super) fn span_after(&self, token: TokenIx) -> TextRange {
		let start = self.span(token).end();

		let end = self
			.tokens
			.get(token.0 as usize + 1)
			.filter(|t| t.is_ident())
			.map_or(start, |t| t.span.end());

		TextRange::new(start, end)
	}

	// Types ///////////////////////////////////////////////////////////////////

	pub(super) fn resolve_type_ref(
		&mut self,
		scope: ScopeKey,
		tref: &ast::TypeRef,
	) -> Option<DeducedType> {
		let mut ret = self.resolve_datatype(scope, tref)?;

		let args = tref
			.template_args
			.iter()
			.map(|arg| self.resolve_type_ref(scope, arg))
			.collect::<Vec<_>>();

		let params = self
			.tree
			.get_type(ret.symbol)
			.and_then(|t| t.template_params.clone());

		match params {
			Some(params) if params.len() != args.len() => {
				self.raise(Diag::error(
					tref.span,
					format!(
						"expected {} template argument(s), found {}",
						params.len(),
						args.len()
					),
				));
			}
			Some(params) => {
				ret.translation = Some(
					params
						.into_iter()
						.zip(args)
						.filter_map(|(p, a)| a.map(|a| (p, a)))
						.collect(),
				);
			}
			None if !args.is_empty() => {
				self.raise(Diag::error(
					tref.span,
					format!("`{}` is not a template", self.tree.type_name(&ret)),
				));
			}
			None => {}
		}

		for suffix in &tref.suffixes {
			ret = match suffix {
				ast::TypeSuffix::Handle => ret.into_handle(),
				ast::TypeSuffix::Array => self.array_of(scope, ret, tref.span)?,
			};
		}

		Some(ret)
	}

	fn resolve_datatype(&mut self, scope: ScopeKey, tref: &ast::TypeRef) -> Option<DeducedType> {
		let token = tref.datatype.token;
		let tok = token.get(self.tokens);

		if tok.kind == TokenKind::Reserved {
			return find_builtin_type(tok).map(DeducedType::builtin);
		}

		let name = self.text(token);

		let found = match &tref.scope {
			Some(path) => {
				let target = self.resolve_scope_path(scope, path)?;
				self.tree.find_shallow(target, name).map(|k| (k, target))
			}
			None => self.lookup(scope, name),
		};

		let Some((key, found_in)) = found else {
			if name == self.config.string_type {
				tok.mark(SemToken::BuiltinType);
				return Some(DeducedType::builtin(&builtins().string_type));
			}

			if self.config.report_unresolved {
				self.raise(Diag::error(tok.span, format!("unknown type `{name}`")));
			}

			return None;
		};

		self.refer(scope, token, key);

		if self.tree.symbols[key].as_type().is_none() {
			self.raise(Diag::error(tok.span, format!("`{name}` is not a type")));
			return None;
		}

		Some(DeducedType::of_type(key, found_in))
	}

	/// `T[]`, as the configured array template bound to `T`.
	fn array_of(
		&mut self,
		scope: ScopeKey,
		elem: DeducedType,
		span: TextRange,
	) -> Option<DeducedType> {
		let global = self.tree.find_global_scope(scope);
		let name = self.config.array_type.as_str();

		let array = self.tree.find_shallow(global, name).and_then(|k| {
			let param = self.tree.symbols[k]
				.as_type()
				.and_then(|t| t.template_params.as_ref())
				.and_then(|p| p.first().copied())?;

			Some((k, param))
		});

		let Some((key, param)) = array else {
			if self.config.report_unresolved {
				self.raise(Diag::error(
					span,
					format!("array shorthand requires a template named `{name}`"),
				));
			}

			return None;
		};

		let mut ret = DeducedType::of_type(key, global);
		let mut translation = FxHashMap::default();
		translation.insert(param, elem);
		ret.translation = Some(translation);
		Some(ret)
	}

	/// Type symbol of the class (or interface) whose scope encloses `scope`.
	#[must_use]
	pub(super) fn enclosing_class(&self, scope: ScopeKey) -> Option<DeducedType> {
		self.tree.ancestors(scope).find_map(|s| {
			let Some(ScopeOwner::Class(k) | ScopeOwner::Interface(k)) = self.tree.scopes[s].owner
			else {
				return None;
			};

			let parent = self.tree.scopes[s].parent?;
			Some(DeducedType::of_type(k, parent))
		})
	}

	// References and highlights ///////////////////////////////////////////////

	pub(super) fn refer(&mut self, scope: ScopeKey, token: TokenIx, symbol: SymbolKey) {
		self.tree.scopes[scope]
			.references
			.push(Reference { token, symbol });

		self.mark_symbol(token, symbol, false);
	}

	pub(super) fn mark_symbol(&self, token: TokenIx, symbol: SymbolKey, declaration: bool) {
		let mut flags = if declaration {
			SemTokenFlags::DECLARATION
		} else {
			SemTokenFlags::empty()
		};

		let kind = match &self.tree.symbols[symbol] {
			SymbolicObject::Type(t) => match t.source {
				TypeSource::Class => SemToken::Class,
				TypeSource::Enum => SemToken::Enum,
				TypeSource::Template => SemToken::TypeParam,
				_ => SemToken::Type,
			},
			SymbolicObject::Function(f) => {
				if f.is_instance_member {
					flags.insert(SemTokenFlags::MEMBER);
					SemToken::Method
				} else {
					SemToken::Function
				}
			}
			SymbolicObject::Variable(v) => match v.kind {
				VariableKind::Global | VariableKind::Local => SemToken::Variable,
				VariableKind::Param => SemToken::Param,
				VariableKind::Member => {
					flags.insert(SemTokenFlags::MEMBER);
					SemToken::Property
				}
				VariableKind::EnumMember => {
					flags.insert(SemTokenFlags::READONLY);
					SemToken::EnumMember
				}
			},
		};

		token.get(self.tokens).mark(Highlight { kind, flags });
	}
}
