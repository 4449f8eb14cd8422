//! The resolver's first two passes: symbol declaration, then signatures.
//!
//! Pass one introduces every namespace, type, function, and non-local variable
//! by name so that pass two can resolve type references regardless of the
//! order in which things were declared. Pass two fills in base lists, return
//! and parameter types, and the explicit types of variables.

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use text_size::TextRange;

use crate::{
	diag::Diag,
	semtokens::{Highlight, SemToken, SemTokenFlags},
};

use super::{
	ast,
	lex::TokenIx,
	resolve::ResolveContext,
	sema::{
		DeducedType, ScopeKey, ScopeOwner, SymbolKey, SymbolRef, SymbolicFunction,
		SymbolicObject, SymbolicType, SymbolicVariable, TypeSource, VariableKind,
	},
};

// Pass one ////////////////////////////////////////////////////////////////////

pub(super) fn declare_script(ctx: &mut ResolveContext, scope: ScopeKey, script: &ast::Script) {
	for item in &script.items {
		match item {
			ast::Item::Namespace(ns) => declare_namespace(ctx, scope, ns),
			ast::Item::Class(class) => declare_class(ctx, scope, class),
			ast::Item::Interface(iface) => declare_interface(ctx, scope, iface),
			ast::Item::Enum(enumeration) => declare_enum(ctx, scope, enumeration),
			ast::Item::Func(func) => declare_function(ctx, scope, func, false),
			ast::Item::Var(var) => declare_variables(ctx, scope, var, VariableKind::Global),
			ast::Item::Placeholder(_) => {}
		}
	}
}

fn declare_namespace(ctx: &mut ResolveContext, scope: ScopeKey, ns: &ast::Namespace) {
	let mut current = scope;

	for name in &ns.names {
		current = ctx.named_scope(current, *name, ScopeOwner::Namespace, ns.span);
		ctx.scopes.insert(*name, current);
		name.get(ctx.tokens).mark(Highlight {
			kind: SemToken::Namespace,
			flags: SemTokenFlags::DECLARATION,
		});
	}

	declare_script(ctx, current, &ns.body);
}

/// A type symbol and the named scope holding its members. If the name was
/// already taken, by a symbol or by a namespace, the members still get an
/// anonymous scope of their own so that their bodies resolve.
fn declare_type(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	name: TokenIx,
	span: TextRange,
	source: TypeSource,
	template_params: &[TokenIx],
) -> (Option<SymbolKey>, ScopeKey) {
	let text = ctx.text(name);

	let key = ctx.declare(
		scope,
		name,
		text,
		SymbolicObject::Type(SymbolicType {
			declared: Some(name),
			name: text.into(),
			source,
			template_params: (!template_params.is_empty()).then(|| template_params.to_vec()),
			bases: None,
			members: None,
		}),
	);

	let owner = match (key, source) {
		(None, _) => ScopeOwner::Block,
		(Some(k), TypeSource::Interface) => ScopeOwner::Interface(k),
		(Some(k), TypeSource::Enum) => ScopeOwner::Enum(k),
		(Some(k), _) => ScopeOwner::Class(k),
	};

	let members = match key {
		Some(_) => ctx.named_scope(scope, name, owner, span),
		None => ctx.tree.child_scope(scope, None, owner, span),
	};
	ctx.scopes.insert(name, members);

	if let Some(k) = key {
		if let SymbolicObject::Type(t) = &mut ctx.tree.symbols[k] {
			t.members = Some(members);
		}
	}

	(key, members)
}

fn declare_class(ctx: &mut ResolveContext, scope: ScopeKey, class: &ast::Class) {
	let (_, members) = declare_type(
		ctx,
		scope,
		class.name,
		class.span,
		TypeSource::Class,
		&class.template_params,
	);

	ctx.declare_template_params(members, &class.template_params);

	for member in &class.members {
		declare_member(ctx, members, member);
	}
}

fn declare_interface(ctx: &mut ResolveContext, scope: ScopeKey, iface: &ast::Interface) {
	let (_, members) = declare_type(
		ctx,
		scope,
		iface.name,
		iface.span,
		TypeSource::Interface,
		&[],
	);

	for member in &iface.members {
		declare_member(ctx, members, member);
	}
}

fn declare_enum(ctx: &mut ResolveContext, scope: ScopeKey, enumeration: &ast::Enum) {
	let (key, members) = declare_type(
		ctx,
		scope,
		enumeration.name,
		enumeration.span,
		TypeSource::Enum,
		&[],
	);
	let ty = key.map(|k| DeducedType::of_type(k, scope));

	for member in &enumeration.members {
		let text = ctx.text(member.name);

		let _ = ctx.declare(
			members,
			member.name,
			text,
			SymbolicObject::Variable(SymbolicVariable {
				declared: member.name,
				name: text.into(),
				ty: ty.clone(),
				kind: VariableKind::EnumMember,
				is_instance_member: false,
			}),
		);
	}

	ctx.tree.close(members);
}

fn declare_member(ctx: &mut ResolveContext, scope: ScopeKey, member: &ast::Member) {
	match member {
		ast::Member::Func(func) => declare_function(ctx, scope, func, true),
		ast::Member::Var(var) => declare_variables(ctx, scope, var, VariableKind::Member),
		ast::Member::Placeholder(_) => {}
	}
}

fn declare_function(ctx: &mut ResolveContext, scope: ScopeKey, func: &ast::Func, member: bool) {
	let text = ctx.text(func.name);

	let name: Box<str> = if func.destructor {
		format!("~{text}").into()
	} else {
		text.into()
	};

	let params = &func.params.params;

	let symbol = SymbolicObject::Function(SymbolicFunction {
		declared: func.name,
		name: name.clone(),
		params: vec![],
		param_names: params.iter().map(|p| p.name).collect(),
		defaults: params.iter().filter(|p| p.default.is_some()).count(),
		ret: None,
		is_instance_member: member,
		template_params: (!func.template_params.is_empty()).then(|| func.template_params.clone()),
		next_overload: None,
		scope: None,
	});

	let _ = ctx.declare(scope, func.name, &name, symbol);
}

fn declare_variables(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	var: &ast::Var,
	kind: VariableKind,
) {
	for decl in &var.decls {
		let text = ctx.text(decl.name);

		let _ = ctx.declare(
			scope,
			decl.name,
			text,
			SymbolicObject::Variable(SymbolicVariable {
				declared: decl.name,
				name: text.into(),
				ty: None,
				kind,
				is_instance_member: kind == VariableKind::Member,
			}),
		);
	}
}

// Pass two ////////////////////////////////////////////////////////////////////

/// Closes `scope` (and every namespace beneath it) once finished.
pub(super) fn sign_script(ctx: &mut ResolveContext, scope: ScopeKey, script: &ast::Script) {
	sign_items(ctx, scope, script);
	ctx.tree.close(scope);
}

fn sign_items(ctx: &mut ResolveContext, scope: ScopeKey, script: &ast::Script) {
	for item in &script.items {
		match item {
			ast::Item::Namespace(ns) => {
				let Some(inner) = ns.names.last().and_then(|n| ctx.scopes.get(n).copied()) else {
					continue;
				};

				sign_items(ctx, inner, &ns.body);

				for name in &ns.names {
					if let Some(&s) = ctx.scopes.get(name) {
						ctx.tree.close(s);
					}
				}
			}
			ast::Item::Class(class) => {
				sign_type(ctx, class.name, &class.bases, &class.members);
			}
			ast::Item::Interface(iface) => {
				sign_type(ctx, iface.name, &iface.bases, &iface.members);
			}
			ast::Item::Enum(_) | ast::Item::Placeholder(_) => {}
			ast::Item::Func(func) => sign_function(ctx, scope, func),
			ast::Item::Var(var) => sign_variables(ctx, scope, var),
		}
	}
}

fn sign_type(
	ctx: &mut ResolveContext,
	name: TokenIx,
	bases: &[ast::TypeRef],
	members: &[ast::Member],
) {
	let Some(&scope) = ctx.scopes.get(&name) else {
		return;
	};

	let resolved = bases
		.iter()
		.filter_map(|b| ctx.resolve_type_ref(scope, b))
		.collect::<Vec<_>>();

	if let Some(&key) = ctx.declared.get(&name) {
		if let SymbolicObject::Type(t) = &mut ctx.tree.symbols[key] {
			t.bases = (!resolved.is_empty()).then_some(resolved);
		}
	}

	for member in members {
		match member {
			ast::Member::Func(func) => sign_function(ctx, scope, func),
			ast::Member::Var(var) => sign_variables(ctx, scope, var),
			ast::Member::Placeholder(_) => {}
		}
	}

	ctx.tree.close(scope);
}

/// Opens the function's scope, since its template parameters must be visible
/// to its parameter and return types.
fn sign_function(ctx: &mut ResolveContext, scope: ScopeKey, func: &ast::Func) {
	let key = ctx.declared.get(&func.name).copied();
	let owner = key.map_or(ScopeOwner::Block, ScopeOwner::Function);
	let fn_scope = ctx.tree.child_scope(scope, None, owner, func.span);
	ctx.scopes.insert(func.name, fn_scope);
	ctx.declare_template_params(fn_scope, &func.template_params);

	// Without a symbol, there is nowhere to keep these; the body resolves them.
	let Some(key) = key else {
		return;
	};

	let ret = func
		.ret
		.as_ref()
		.and_then(|r| ctx.resolve_type_ref(fn_scope, r));

	let params = func
		.params
		.params
		.iter()
		.map(|p| ctx.resolve_type_ref(fn_scope, &p.ty))
		.collect::<Vec<_>>();

	if let SymbolicObject::Function(f) = &mut ctx.tree.symbols[key] {
		f.ret = ret;
		f.params = params;
		f.scope = Some(fn_scope);
	}
}

/// `auto` variables are left untyped until their initializers are deduced.
fn sign_variables(ctx: &mut ResolveContext, scope: ScopeKey, var: &ast::Var) {
	let ty = ctx.resolve_type_ref(scope, &var.ty);

	if ty
		.as_ref()
		.is_some_and(|t| ctx.tree.type_source(t.symbol) == Some(TypeSource::Auto))
	{
		return;
	}

	for decl in &var.decls {
		let Some(&key) = ctx.declared.get(&decl.name) else {
			continue;
		};

		if let SymbolicObject::Variable(v) = &mut ctx.tree.symbols[key] {
			v.ty = ty.clone();
		}
	}
}

/// Reports every class or interface that inherits from itself, directly or
/// not, and drops the offending bases so member lookup terminates.
pub(super) fn check_inheritance(ctx: &mut ResolveContext) {
	let mut graph = DiGraphMap::<SymbolKey, ()>::new();

	for (key, symbol) in &ctx.tree.symbols {
		let Some(bases) = symbol.as_type().and_then(|t| t.bases.as_ref()) else {
			continue;
		};

		graph.add_node(key);

		for base in bases {
			if let SymbolRef::Type(b) = base.symbol {
				graph.add_edge(key, b, ());
			}
		}
	}

	for scc in tarjan_scc(&graph) {
		let cyclic = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);

		if !cyclic {
			continue;
		}

		for key in &scc {
			let SymbolicObject::Type(t) = &mut ctx.tree.symbols[*key] else {
				continue;
			};

			if let Some(bases) = &mut t.bases {
				bases.retain(|b| !matches!(b.symbol, SymbolRef::Type(k) if scc.contains(&k)));
			}

			let name = t.name.clone();

			if let Some(declared) = t.declared {
				ctx.raise(Diag::error(
					ctx.span(declared),
					format!("`{name}` inherits from itself"),
				));
			}
		}
	}
}
