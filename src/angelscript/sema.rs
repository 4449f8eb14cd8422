//! The semantic model: a tree of lexical scopes, each with a symbol table.
//!
//! Scopes and symbols live in arenas owned by [`ScopeTree`] and refer to one
//! another by key. A scope's parent link is a plain key, so walking towards
//! the root never fights the borrow checker.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use text_size::{TextRange, TextSize};

use crate::FxIndexMap;

use super::lex::TokenIx;

new_key_type! {
	pub struct ScopeKey;
	pub struct SymbolKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOwner {
	Namespace,
	Class(SymbolKey),
	Interface(SymbolKey),
	Enum(SymbolKey),
	Function(SymbolKey),
	/// A statement block, a `for` header, or the body of a function which
	/// failed to declare.
	Block,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
	#[default]
	Open,
	/// No further symbols may be inserted.
	Closed,
}

#[derive(Debug, Default)]
pub struct SymbolScope {
	/// `None` only for the root.
	pub owner: Option<ScopeOwner>,
	pub parent: Option<ScopeKey>,
	pub children: FxIndexMap<Box<str>, ScopeKey>,
	pub anonymous: Vec<ScopeKey>,
	/// In declaration order.
	pub symbols: FxIndexMap<Box<str>, SymbolKey>,
	pub references: Vec<Reference>,
	pub hints: Vec<Hint>,
	pub state: ScopeState,
	/// Source ranges covered. Reopened namespaces have one per block;
	/// the root has none and covers the whole document.
	pub spans: Vec<TextRange>,
}

impl SymbolScope {
	#[must_use]
	pub fn covers(&self, offset: TextSize) -> bool {
		self.spans.iter().any(|s| s.contains_inclusive(offset))
	}
}

/// An identifier usage bound to the symbol it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
	pub token: TokenIx,
	pub symbol: SymbolKey,
}

#[derive(Debug, Clone)]
pub enum Hint {
	/// A child scope and the range it covers.
	Scope { span: TextRange, scope: ScopeKey },
	/// The type of the operand left of a `.`; covers what follows the dot.
	Type { span: TextRange, ty: DeducedType },
	/// The scope named by a `ns::` qualifier; covers what follows the `::`.
	Namespace { span: TextRange, scope: ScopeKey },
}

impl Hint {
	#[must_use]
	pub fn span(&self) -> TextRange {
		match self {
			Self::Scope { span, .. } | Self::Type { span, .. } | Self::Namespace { span, .. } => {
				*span
			}
		}
	}
}

// Symbols /////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum SymbolicObject {
	Type(SymbolicType),
	Function(SymbolicFunction),
	Variable(SymbolicVariable),
}

impl SymbolicObject {
	#[must_use]
	pub fn declared(&self) -> Option<TokenIx> {
		match self {
			Self::Type(t) => t.declared,
			Self::Function(f) => Some(f.declared),
			Self::Variable(v) => Some(v.declared),
		}
	}

	#[must_use]
	pub fn name(&self) -> &str {
		match self {
			Self::Type(t) => &t.name,
			Self::Function(f) => &f.name,
			Self::Variable(v) => &v.name,
		}
	}

	#[must_use]
	pub fn as_type(&self) -> Option<&SymbolicType> {
		match self {
			Self::Type(t) => Some(t),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_function(&self) -> Option<&SymbolicFunction> {
		match self {
			Self::Function(f) => Some(f),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_variable(&self) -> Option<&SymbolicVariable> {
		match self {
			Self::Variable(v) => Some(v),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
	Class,
	Interface,
	Enum,
	/// A template parameter, standing in for whatever type it gets bound to.
	Template,
	String,
	Bool,
	Number,
	Void,
	Any,
	Auto,
}

#[derive(Debug)]
pub struct SymbolicType {
	/// `None` for builtins.
	pub declared: Option<TokenIx>,
	pub name: Box<str>,
	pub source: TypeSource,
	pub template_params: Option<Vec<TokenIx>>,
	pub bases: Option<Vec<DeducedType>>,
	pub members: Option<ScopeKey>,
}

impl SymbolicType {
	#[must_use]
	pub(super) fn primitive(name: &str, source: TypeSource) -> Self {
		Self {
			declared: None,
			name: name.into(),
			source,
			template_params: None,
			bases: None,
			members: None,
		}
	}
}

#[derive(Debug)]
pub struct SymbolicFunction {
	pub declared: TokenIx,
	pub name: Box<str>,
	/// `None` wherever a parameter's type failed to resolve.
	pub params: Vec<Option<DeducedType>>,
	pub param_names: Vec<Option<TokenIx>>,
	/// How many trailing parameters have default arguments.
	pub defaults: usize,
	pub ret: Option<DeducedType>,
	pub is_instance_member: bool,
	pub template_params: Option<Vec<TokenIx>>,
	/// The next function of the same name in the same scope.
	pub next_overload: Option<SymbolKey>,
	/// Holds the function's template parameters and ordinary parameters.
	pub scope: Option<ScopeKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
	Global,
	Local,
	Param,
	Member,
	EnumMember,
}

#[derive(Debug)]
pub struct SymbolicVariable {
	pub declared: TokenIx,
	pub name: Box<str>,
	pub ty: Option<DeducedType>,
	pub kind: VariableKind,
	pub is_instance_member: bool,
}

// Deduced types ///////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy)]
pub enum SymbolRef {
	Builtin(&'static SymbolicType),
	Type(SymbolKey),
	Function(SymbolKey),
}

impl SymbolRef {
	/// Builtins compare by address.
	#[must_use]
	pub fn same_as(self, other: Self) -> bool {
		match (self, other) {
			(Self::Builtin(a), Self::Builtin(b)) => std::ptr::eq(a, b),
			(Self::Type(a), Self::Type(b)) | (Self::Function(a), Self::Function(b)) => a == b,
			_ => false,
		}
	}
}

/// Template parameter (by declaring token) to the type bound to it.
pub type TemplateTranslation = FxHashMap<TokenIx, DeducedType>;

#[derive(Debug, Clone)]
pub struct DeducedType {
	pub symbol: SymbolRef,
	/// Where the symbol was found. `None` for builtins.
	pub source_scope: Option<ScopeKey>,
	pub is_handle: bool,
	pub translation: Option<TemplateTranslation>,
}

impl DeducedType {
	#[must_use]
	pub fn builtin(ty: &'static SymbolicType) -> Self {
		Self {
			symbol: SymbolRef::Builtin(ty),
			source_scope: None,
			is_handle: false,
			translation: None,
		}
	}

	#[must_use]
	pub fn of_type(key: SymbolKey, scope: ScopeKey) -> Self {
		Self {
			symbol: SymbolRef::Type(key),
			source_scope: Some(scope),
			is_handle: false,
			translation: None,
		}
	}

	#[must_use]
	pub fn of_function(key: SymbolKey, scope: ScopeKey) -> Self {
		Self {
			symbol: SymbolRef::Function(key),
			source_scope: Some(scope),
			is_handle: false,
			translation: None,
		}
	}

	#[must_use]
	pub fn into_handle(mut self) -> Self {
		self.is_handle = true;
		self
	}
}

// The tree ////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
	/// The first declaration under this name, which is kept.
	Duplicate(SymbolKey),
	Closed,
}

#[derive(Debug)]
pub struct ScopeTree {
	pub scopes: SlotMap<ScopeKey, SymbolScope>,
	pub symbols: SlotMap<SymbolKey, SymbolicObject>,
	pub root: ScopeKey,
}

impl Default for ScopeTree {
	fn default() -> Self {
		Self::new()
	}
}

impl ScopeTree {
	#[must_use]
	pub fn new() -> Self {
		let mut scopes = SlotMap::with_key();
		let root = scopes.insert(SymbolScope::default());

		Self {
			scopes,
			symbols: SlotMap::with_key(),
			root,
		}
	}

	/// A named namespace which already exists is reopened and returned
	/// instead of being created anew. Any other clash with an existing named
	/// child yields an anonymous child, leaving the first one in place. Every
	/// call records `span` on the child and a scope-boundary hint on the parent.
	pub fn child_scope(
		&mut self,
		parent: ScopeKey,
		name: Option<&str>,
		owner: ScopeOwner,
		span: TextRange,
	) -> ScopeKey {
		let existing = name.and_then(|n| self.scopes[parent].children.get(n).copied());

		let reopened = existing.filter(|e| {
			owner == ScopeOwner::Namespace
				&& self.scopes[*e].owner == Some(ScopeOwner::Namespace)
		});

		let child = match reopened {
			Some(child) => {
				self.scopes[child].state = ScopeState::Open;
				child
			}
			None => {
				let child = self.scopes.insert(SymbolScope {
					owner: Some(owner),
					parent: Some(parent),
					..Default::default()
				});

				match name {
					Some(n) if existing.is_none() => {
						self.scopes[parent].children.insert(n.into(), child);
					}
					_ => self.scopes[parent].anonymous.push(child),
				}

				child
			}
		};

		self.scopes[child].spans.push(span);
		self.scopes[parent].hints.push(Hint::Scope { span, scope: child });
		child
	}

	/// Functions join the overload chain of a same-named function.
	/// Any other collision keeps the first declaration.
	pub fn insert_symbol(
		&mut self,
		scope: ScopeKey,
		name: &str,
		symbol: SymbolicObject,
	) -> Result<SymbolKey, InsertError> {
		debug_assert_eq!(
			self.scopes[scope].state,
			ScopeState::Open,
			"insertion of `{name}` into a closed scope"
		);

		if self.scopes[scope].state == ScopeState::Closed {
			return Err(InsertError::Closed);
		}

		let Some(&prev) = self.scopes[scope].symbols.get(name) else {
			let key = self.symbols.insert(symbol);
			self.scopes[scope].symbols.insert(name.into(), key);
			return Ok(key);
		};

		let both_functions = matches!(
			(&self.symbols[prev], &symbol),
			(SymbolicObject::Function(_), SymbolicObject::Function(_))
		);

		if !both_functions {
			return Err(InsertError::Duplicate(prev));
		}

		let tail = self.overloads(prev).last().unwrap_or(prev);
		let key = self.symbols.insert(symbol);

		if let SymbolicObject::Function(f) = &mut self.symbols[tail] {
			f.next_overload = Some(key);
		}

		Ok(key)
	}

	#[must_use]
	pub fn find_shallow(&self, scope: ScopeKey, name: &str) -> Option<SymbolKey> {
		self.scopes[scope].symbols.get(name).copied()
	}

	/// Also yields the scope the symbol was found in.
	#[must_use]
	pub fn find_with_parent(&self, scope: ScopeKey, name: &str) -> Option<(SymbolKey, ScopeKey)> {
		self.ancestors(scope)
			.find_map(|s| self.find_shallow(s, name).map(|sym| (sym, s)))
	}

	/// A named child scope of `scope` or of any of its ancestors.
	#[must_use]
	pub fn find_scope_with_parent(&self, scope: ScopeKey, name: &str) -> Option<ScopeKey> {
		self.ancestors(scope)
			.find_map(|s| self.scopes[s].children.get(name).copied())
	}

	#[must_use]
	pub fn find_global_scope(&self, scope: ScopeKey) -> ScopeKey {
		self.ancestors(scope).last().unwrap_or(scope)
	}

	/// `scope` itself, then each parent up to and including the root.
	pub fn ancestors(&self, scope: ScopeKey) -> impl Iterator<Item = ScopeKey> + '_ {
		std::iter::successors(Some(scope), |s| self.scopes[*s].parent)
	}

	/// `first` and every function chained after it.
	pub fn overloads(&self, first: SymbolKey) -> impl Iterator<Item = SymbolKey> + '_ {
		std::iter::successors(Some(first), |k| {
			self.symbols[*k].as_function().and_then(|f| f.next_overload)
		})
	}

	pub fn close(&mut self, scope: ScopeKey) {
		self.scopes[scope].state = ScopeState::Closed;
	}

	/// The innermost scope covering `offset`.
	#[must_use]
	pub fn scope_at(&self, offset: TextSize) -> ScopeKey {
		let mut current = self.root;

		'descend: loop {
			let scope = &self.scopes[current];

			for child in scope.children.values().chain(scope.anonymous.iter()) {
				if self.scopes[*child].covers(offset) {
					current = *child;
					continue 'descend;
				}
			}

			return current;
		}
	}

	#[must_use]
	pub fn get_type(&self, symbol: SymbolRef) -> Option<&SymbolicType> {
		match symbol {
			SymbolRef::Builtin(t) => Some(t),
			SymbolRef::Type(k) => self.symbols.get(k).and_then(SymbolicObject::as_type),
			SymbolRef::Function(_) => None,
		}
	}

	#[must_use]
	pub fn type_source(&self, symbol: SymbolRef) -> Option<TypeSource> {
		self.get_type(symbol).map(|t| t.source)
	}

	/// How a deduced type would be written in source, e.g. `array<int>@`.
	#[must_use]
	pub fn type_name(&self, ty: &DeducedType) -> String {
		let mut ret = match ty.symbol {
			SymbolRef::Builtin(t) => t.name.to_string(),
			SymbolRef::Type(k) | SymbolRef::Function(k) => self
				.symbols
				.get(k)
				.map_or_else(|| "?".to_string(), |s| s.name().to_string()),
		};

		let params = self
			.get_type(ty.symbol)
			.and_then(|t| t.template_params.as_ref());

		if let (Some(params), Some(translation)) = (params, &ty.translation) {
			let args = params
				.iter()
				.map(|p| {
					translation
						.get(p)
						.map_or_else(|| "?".to_string(), |t| self.type_name(t))
				})
				.collect::<Vec<_>>();

			ret.push('<');
			ret.push_str(&args.join(", "));
			ret.push('>');
		}

		if ty.is_handle {
			ret.push('@');
		}

		ret
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn function(declared: u32, name: &str) -> SymbolicObject {
		SymbolicObject::Function(SymbolicFunction {
			declared: TokenIx(declared),
			name: name.into(),
			params: vec![],
			param_names: vec![],
			defaults: 0,
			ret: None,
			is_instance_member: false,
			template_params: None,
			next_overload: None,
			scope: None,
		})
	}

	fn variable(declared: u32, name: &str) -> SymbolicObject {
		SymbolicObject::Variable(SymbolicVariable {
			declared: TokenIx(declared),
			name: name.into(),
			ty: None,
			kind: VariableKind::Global,
			is_instance_member: false,
		})
	}

	#[test]
	fn overload_chain() {
		let mut tree = ScopeTree::new();
		let root = tree.root;
		let f1 = tree.insert_symbol(root, "f", function(0, "f")).unwrap();
		let f2 = tree.insert_symbol(root, "f", function(1, "f")).unwrap();
		let f3 = tree.insert_symbol(root, "f", function(2, "f")).unwrap();

		assert_eq!(tree.find_shallow(root, "f"), Some(f1));
		assert_eq!(tree.overloads(f1).collect::<Vec<_>>(), [f1, f2, f3]);
		assert_eq!(tree.scopes[root].symbols.len(), 1);
	}

	#[test]
	fn duplicate_rejection() {
		let mut tree = ScopeTree::new();
		let root = tree.root;
		let x = tree.insert_symbol(root, "x", variable(0, "x")).unwrap();

		let class = SymbolicObject::Type(SymbolicType {
			declared: Some(TokenIx(1)),
			name: "x".into(),
			source: TypeSource::Class,
			template_params: None,
			bases: None,
			members: None,
		});

		assert_eq!(
			tree.insert_symbol(root, "x", class),
			Err(InsertError::Duplicate(x))
		);

		assert_eq!(tree.find_shallow(root, "x"), Some(x));
		assert!(tree.symbols[x].as_variable().is_some());
		assert_eq!(tree.symbols.len(), 1);
	}

	#[test]
	fn scope_chain() {
		let mut tree = ScopeTree::new();
		let root = tree.root;
		let span = |s: u32, e: u32| TextRange::new(s.into(), e.into());

		let class_sym = tree.insert_symbol(root, "C", variable(0, "C")).unwrap();
		tree.insert_symbol(root, "g", variable(1, "g")).unwrap();
		let class = tree.child_scope(root, Some("C"), ScopeOwner::Class(class_sym), span(0, 100));
		let method = tree.child_scope(class, None, ScopeOwner::Block, span(10, 50));

		assert_eq!(tree.find_global_scope(method), root);
		assert_eq!(tree.find_with_parent(method, "g").map(|f| f.1), Some(root));
		assert_eq!(tree.find_shallow(method, "g"), None);
		assert_eq!(tree.scope_at(20.into()), method);
		assert_eq!(tree.scope_at(70.into()), class);
		assert_eq!(tree.scope_at(200.into()), root);
		assert!(matches!(tree.scopes[root].hints[0], Hint::Scope { scope, .. } if scope == class));
	}

	#[test]
	fn namespace_reopening() {
		let mut tree = ScopeTree::new();
		let root = tree.root;
		let span = |s: u32, e: u32| TextRange::new(s.into(), e.into());

		let ns = tree.child_scope(root, Some("n"), ScopeOwner::Namespace, span(0, 10));
		tree.close(ns);
		let again = tree.child_scope(root, Some("n"), ScopeOwner::Namespace, span(20, 30));

		assert_eq!(ns, again);
		assert_eq!(tree.scopes[ns].state, ScopeState::Open);
		assert_eq!(tree.scopes[ns].spans.len(), 2);
		assert_eq!(tree.find_scope_with_parent(ns, "n"), Some(ns));
	}

	#[test]
	fn namespace_type_clash() {
		let mut tree = ScopeTree::new();
		let root = tree.root;
		let span = |s: u32, e: u32| TextRange::new(s.into(), e.into());

		let sym = tree.insert_symbol(root, "E", variable(0, "E")).unwrap();
		let enum_scope = tree.child_scope(root, Some("E"), ScopeOwner::Enum(sym), span(0, 10));
		tree.close(enum_scope);
		let ns = tree.child_scope(root, Some("E"), ScopeOwner::Namespace, span(20, 30));

		assert_ne!(ns, enum_scope);
		assert_eq!(tree.scopes[ns].state, ScopeState::Open);
		assert_eq!(tree.scopes[root].children["E"], enum_scope);
		assert_eq!(tree.scopes[root].anonymous, [ns]);

		let class = tree.child_scope(ns, Some("C"), ScopeOwner::Namespace, span(21, 22));
		let again = tree.child_scope(ns, Some("C"), ScopeOwner::Class(sym), span(23, 24));
		assert_ne!(class, again);
		assert_eq!(tree.scopes[again].owner, Some(ScopeOwner::Class(sym)));
	}
}
