//! The resolver's third pass: definition.
//!
//! Function bodies get scopes of their own, locals are declared as they are
//! encountered (so a use before the declaration does not resolve), and every
//! expression has its type deduced. Identifier usages are bound to the symbols
//! they name as they are found.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{diag::Diag, semtokens::SemToken};

use super::{
	ast,
	builtin::builtins,
	lex::{TokenIx, TokenKind},
	reserved::ReservedFlags,
	resolve::ResolveContext,
	sema::{
		DeducedType, Hint, ScopeKey, ScopeOwner, SymbolKey, SymbolRef, SymbolicFunction,
		SymbolicObject, SymbolicType, SymbolicVariable, TemplateTranslation, TypeSource,
		VariableKind,
	},
	template::{resolve_template_type, resolve_template_types},
};

type ArgTypes = Vec<Option<DeducedType>>;

pub(super) fn define_script(ctx: &mut ResolveContext, scope: ScopeKey, script: &ast::Script) {
	for item in &script.items {
		match item {
			ast::Item::Namespace(ns) => {
				let Some(inner) = ns.names.last().and_then(|n| ctx.scopes.get(n).copied()) else {
					continue;
				};

				define_script(ctx, inner, &ns.body);
			}
			ast::Item::Class(class) => define_members(ctx, class.name, &class.members),
			ast::Item::Interface(iface) => define_members(ctx, iface.name, &iface.members),
			ast::Item::Enum(enumeration) => define_enum(ctx, enumeration),
			ast::Item::Func(func) => define_function(ctx, func),
			ast::Item::Var(var) => define_global(ctx, scope, var),
			ast::Item::Placeholder(_) => {}
		}
	}
}

fn define_members(ctx: &mut ResolveContext, name: TokenIx, members: &[ast::Member]) {
	let Some(&scope) = ctx.scopes.get(&name) else {
		return;
	};

	for member in members {
		match member {
			ast::Member::Func(func) => define_function(ctx, func),
			ast::Member::Var(var) => define_global(ctx, scope, var),
			ast::Member::Placeholder(_) => {}
		}
	}
}

fn define_enum(ctx: &mut ResolveContext, enumeration: &ast::Enum) {
	let Some(&scope) = ctx.scopes.get(&enumeration.name) else {
		return;
	};

	for member in &enumeration.members {
		if let Some(value) = &member.value {
			let _ = deduce_expr(ctx, scope, value);
		}
	}
}

/// Also handles member variables, which differ only in where they live.
fn define_global(ctx: &mut ResolveContext, scope: ScopeKey, var: &ast::Var) {
	let auto = is_auto(ctx, &var.ty);

	for decl in &var.decls {
		let init = define_init(ctx, scope, decl.init.as_ref());

		if !auto {
			continue;
		}

		let Some(&key) = ctx.declared.get(&decl.name) else {
			continue;
		};

		if let SymbolicObject::Variable(v) = &mut ctx.tree.symbols[key] {
			v.ty = init;
		}
	}
}

fn define_function(ctx: &mut ResolveContext, func: &ast::Func) {
	let Some(&fn_scope) = ctx.scopes.get(&func.name) else {
		return;
	};

	let symbol = ctx.declared.get(&func.name).copied();

	let known = symbol
		.and_then(|k| ctx.tree.symbols[k].as_function())
		.map(|f| f.params.clone());

	if known.is_none() {
		if let Some(ret) = &func.ret {
			let _ = ctx.resolve_type_ref(fn_scope, ret);
		}
	}

	for (i, param) in func.params.params.iter().enumerate() {
		let ty = match &known {
			Some(params) => params.get(i).cloned().flatten(),
			None => ctx.resolve_type_ref(fn_scope, &param.ty),
		};

		if let Some(default) = &param.default {
			let _ = deduce_expr(ctx, fn_scope, default);
		}

		let Some(name) = param.name else {
			continue;
		};

		let text = ctx.text(name);

		let _ = ctx.declare(
			fn_scope,
			name,
			text,
			SymbolicObject::Variable(SymbolicVariable {
				declared: name,
				name: text.into(),
				ty,
				kind: VariableKind::Param,
				is_instance_member: false,
			}),
		);
	}

	if let Some(body) = &func.body {
		for stat in &body.stats {
			define_stat(ctx, fn_scope, stat);
		}
	}

	ctx.tree.close(fn_scope);
}

// Statements //////////////////////////////////////////////////////////////////

fn define_stat(ctx: &mut ResolveContext, scope: ScopeKey, stat: &ast::Stat) {
	match stat {
		ast::Stat::Var(var) => define_local(ctx, scope, var),
		ast::Stat::If(if_stat) => {
			for branch in &if_stat.branches {
				let _ = deduce_assign(ctx, scope, &branch.cond);

				if let Some(then) = &branch.then {
					define_stat(ctx, scope, then);
				}
			}

			if let Some(otherwise) = &if_stat.otherwise {
				define_stat(ctx, scope, otherwise);
			}
		}
		ast::Stat::For(for_stat) => {
			let inner = ctx
				.tree
				.child_scope(scope, None, ScopeOwner::Block, for_stat.span);

			if let Some(init) = &for_stat.init {
				define_stat(ctx, inner, init);
			}

			if let Some(cond) = &for_stat.cond {
				let _ = deduce_assign(ctx, inner, cond);
			}

			for incr in &for_stat.incr {
				let _ = deduce_assign(ctx, inner, incr);
			}

			if let Some(body) = &for_stat.body {
				define_stat(ctx, inner, body);
			}

			ctx.tree.close(inner);
		}
		ast::Stat::While(while_stat) => {
			let _ = deduce_assign(ctx, scope, &while_stat.cond);

			if let Some(body) = &while_stat.body {
				define_stat(ctx, scope, body);
			}
		}
		ast::Stat::DoWhile(do_while) => {
			if let Some(body) = &do_while.body {
				define_stat(ctx, scope, body);
			}

			if let Some(cond) = &do_while.cond {
				let _ = deduce_assign(ctx, scope, cond);
			}
		}
		ast::Stat::Return(ret) => {
			if let Some(value) = &ret.value {
				let _ = deduce_assign(ctx, scope, value);
			}
		}
		ast::Stat::Block(block) => {
			let inner = ctx
				.tree
				.child_scope(scope, None, ScopeOwner::Block, block.span);

			for stat in &block.stats {
				define_stat(ctx, inner, stat);
			}

			ctx.tree.close(inner);
		}
		ast::Stat::Expr(expr_stat) => {
			if let Some(value) = &expr_stat.value {
				let _ = deduce_assign(ctx, scope, value);
			}
		}
		ast::Stat::Break(_) | ast::Stat::Continue(_) | ast::Stat::Placeholder(_) => {}
	}
}

/// Each initializer is deduced before its variable is declared,
/// so `int x = x;` does not refer to itself.
fn define_local(ctx: &mut ResolveContext, scope: ScopeKey, var: &ast::Var) {
	let auto = is_auto(ctx, &var.ty);

	let ty = if auto {
		None
	} else {
		ctx.resolve_type_ref(scope, &var.ty)
	};

	for decl in &var.decls {
		let init = define_init(ctx, scope, decl.init.as_ref());
		let text = ctx.text(decl.name);

		let _ = ctx.declare(
			scope,
			decl.name,
			text,
			SymbolicObject::Variable(SymbolicVariable {
				declared: decl.name,
				name: text.into(),
				ty: if auto { init } else { ty.clone() },
				kind: VariableKind::Local,
				is_instance_member: false,
			}),
		);
	}
}

fn define_init(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	init: Option<&ast::VarInit>,
) -> Option<DeducedType> {
	match init? {
		ast::VarInit::Assign(assign) => deduce_assign(ctx, scope, assign),
		ast::VarInit::InitList(list) => {
			deduce_init_list(ctx, scope, list);
			None
		}
		ast::VarInit::Args(args) => {
			let _ = deduce_args(ctx, scope, args);
			None
		}
	}
}

#[must_use]
fn is_auto(ctx: &ResolveContext, tref: &ast::TypeRef) -> bool {
	tref.datatype.token.get(ctx.tokens).is_reserved("auto")
}

// Expressions /////////////////////////////////////////////////////////////////

/// An assignment has the type of its left-hand side.
fn deduce_assign(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	assign: &ast::Assign,
) -> Option<DeducedType> {
	let lhs = deduce_condition(ctx, scope, &assign.cond);

	for (_, rhs) in &assign.tail {
		let _ = deduce_condition(ctx, scope, rhs);
	}

	lhs
}

/// A ternary has the type of its first branch.
fn deduce_condition(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	cond: &ast::Condition,
) -> Option<DeducedType> {
	let ty = deduce_expr(ctx, scope, &cond.expr);

	let Some(ternary) = &cond.ternary else {
		return ty;
	};

	let then = deduce_assign(ctx, scope, &ternary.then);

	if let Some(otherwise) = &ternary.otherwise {
		let _ = deduce_assign(ctx, scope, otherwise);
	}

	then
}

/// Comparison and logical operators bind loosest, so any one of them
/// makes the whole chain a `bool`. Otherwise the chain has the type of
/// its first term.
fn deduce_expr(ctx: &mut ResolveContext, scope: ScopeKey, expr: &ast::Expr) -> Option<DeducedType> {
	let head = deduce_term(ctx, scope, &expr.head);
	let mut boolean = false;

	for (op, rhs) in &expr.tail {
		let _ = deduce_term(ctx, scope, rhs);

		boolean |= op
			.get(ctx.tokens)
			.reserved
			.intersects(ReservedFlags::COMPARISON_OP | ReservedFlags::LOGICAL_OP);
	}

	if boolean {
		Some(DeducedType::builtin(&builtins().bool_type))
	} else {
		head
	}
}

fn deduce_term(ctx: &mut ResolveContext, scope: ScopeKey, term: &ast::ExprTerm) -> Option<DeducedType> {
	let value = match term {
		ast::ExprTerm::InitList(list) => {
			deduce_init_list(ctx, scope, list);
			return None;
		}
		ast::ExprTerm::Value(value) => value,
	};

	let mut ty = deduce_value(ctx, scope, &value.value);

	for op in &value.post_ops {
		ty = deduce_post_op(ctx, scope, ty, op);
	}

	for op in value.pre_ops.iter().rev() {
		ty = match ctx.text(*op) {
			"!" | "not" => Some(DeducedType::builtin(&builtins().bool_type)),
			"@" => ty.map(DeducedType::into_handle),
			_ => ty,
		};
	}

	ty
}

fn deduce_value(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	value: &ast::ExprValue,
) -> Option<DeducedType> {
	match value {
		ast::ExprValue::Void(_) => Some(DeducedType::builtin(&builtins().void_type)),
		ast::ExprValue::Literal(token) => deduce_literal(ctx, scope, *token),
		ast::ExprValue::VarAccess(access) => deduce_var_access(ctx, scope, access),
		ast::ExprValue::FuncCall(call) => deduce_call(ctx, scope, call),
		ast::ExprValue::ConstructCall(construct) => {
			let _ = deduce_args(ctx, scope, &construct.args);
			ctx.resolve_type_ref(scope, &construct.ty)
		}
		ast::ExprValue::Cast(cast) => {
			let _ = deduce_assign(ctx, scope, &cast.value);
			ctx.resolve_type_ref(scope, &cast.ty)
				.map(DeducedType::into_handle)
		}
		ast::ExprValue::Paren(inner) => deduce_assign(ctx, scope, inner),
		ast::ExprValue::Lambda(_) => None,
	}
}

fn deduce_literal(ctx: &ResolveContext, scope: ScopeKey, token: TokenIx) -> Option<DeducedType> {
	let tok = token.get(ctx.tokens);

	match tok.kind {
		TokenKind::Number => Some(DeducedType::builtin(number_type(&tok.text))),
		TokenKind::String => {
			let name = ctx.config.string_type.as_str();

			let declared = ctx
				.lookup(scope, name)
				.filter(|(k, _)| ctx.tree.symbols[*k].as_type().is_some());

			Some(match declared {
				Some((key, found)) => DeducedType::of_type(key, found),
				None => DeducedType::builtin(&builtins().string_type),
			})
		}
		TokenKind::Reserved if matches!(&*tok.text, "true" | "false") => {
			Some(DeducedType::builtin(&builtins().bool_type))
		}
		// `null`
		_ => None,
	}
}

/// `int` unless there is a fractional part or exponent (`double`),
/// or an `f` suffix (`float`).
#[must_use]
fn number_type(text: &str) -> &'static SymbolicType {
	let b = builtins();
	let lower = text.to_ascii_lowercase();

	if ["0x", "0b", "0o", "0d"].iter().any(|p| lower.starts_with(p)) {
		return b.int();
	}

	if lower.ends_with('f') {
		b.float()
	} else if lower.contains(|c| c == '.' || c == 'e') {
		b.double()
	} else {
		b.int()
	}
}

fn deduce_var_access(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	access: &ast::VarAccess,
) -> Option<DeducedType> {
	let Some(ident) = access.ident else {
		if let Some(path) = &access.scope {
			let _ = ctx.resolve_scope_path(scope, path);
		}

		return None;
	};

	if access.scope.is_none() && ctx.text(ident) == "this" {
		ident.get(ctx.tokens).mark(SemToken::Keyword);
		return ctx.enclosing_class(scope);
	}

	let (key, found) = find_value(ctx, scope, access.scope.as_ref(), ident)?;
	ctx.refer(scope, ident, key);
	value_of(ctx, key, found, None)
}

fn deduce_call(ctx: &mut ResolveContext, scope: ScopeKey, call: &ast::FuncCall) -> Option<DeducedType> {
	let args = deduce_args(ctx, scope, &call.args);

	if call.scope.is_none() && ctx.text(call.ident) == "super" {
		call.ident.get(ctx.tokens).mark(SemToken::Keyword);
		return None;
	}

	let (key, found) = find_value(ctx, scope, call.scope.as_ref(), call.ident)?;
	invoke(ctx, scope, call.ident, key, found, &args, None)
}

/// A call through `name`, which was found to be `key`: an overloaded
/// function, a type (constructor), or a variable holding something callable.
fn invoke(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	name: TokenIx,
	key: SymbolKey,
	found: ScopeKey,
	args: &[Option<DeducedType>],
	outer: Option<&TemplateTranslation>,
) -> Option<DeducedType> {
	if ctx.tree.symbols[key].as_function().is_some() {
		let chosen = pick_overload(ctx, key, args);
		ctx.refer(scope, name, chosen);
		return call_result(ctx, chosen, args, outer);
	}

	ctx.refer(scope, name, key);

	if ctx.tree.symbols[key].as_type().is_some() {
		return Some(DeducedType::of_type(key, found));
	}

	let ty = value_of(ctx, key, found, outer)?;
	call_value(ctx, &ty, args)
}

/// Looks up an identifier used as a value, reporting if it names nothing.
fn find_value(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	path: Option<&ast::ScopePath>,
	ident: TokenIx,
) -> Option<(SymbolKey, ScopeKey)> {
	let text = ctx.text(ident);

	let found = match path {
		Some(p) => {
			let target = ctx.resolve_scope_path(scope, p)?;
			ctx.tree.find_shallow(target, text).map(|k| (k, target))
		}
		None => ctx.lookup(scope, text),
	};

	if found.is_none() && ctx.config.report_unresolved {
		ctx.raise(Diag::error(
			ctx.span(ident),
			format!("unresolved identifier `{text}`"),
		));
	}

	found
}

/// The type of `key` used as a value, with `outer` substituted into
/// variable types.
fn value_of(
	ctx: &ResolveContext,
	key: SymbolKey,
	found: ScopeKey,
	outer: Option<&TemplateTranslation>,
) -> Option<DeducedType> {
	match &ctx.tree.symbols[key] {
		SymbolicObject::Variable(v) => {
			let ty = v.ty.as_ref()?;

			Some(match outer {
				Some(tl) => resolve_template_type(&ctx.tree, tl, ty),
				None => ty.clone(),
			})
		}
		SymbolicObject::Function(_) => Some(DeducedType::of_function(key, found)),
		SymbolicObject::Type(_) => Some(DeducedType::of_type(key, found)),
	}
}

/// Calling a function value, or an object through its `opCall`.
fn call_value(
	ctx: &ResolveContext,
	ty: &DeducedType,
	args: &[Option<DeducedType>],
) -> Option<DeducedType> {
	if let SymbolRef::Function(key) = ty.symbol {
		let chosen = pick_overload(ctx, key, args);
		return call_result(ctx, chosen, args, None);
	}

	let (key, _) = ctx.find_member(ty, "opCall")?;
	ctx.tree.symbols[key].as_function()?;
	let chosen = pick_overload(ctx, key, args);
	call_result(ctx, chosen, args, ty.translation.as_ref())
}

fn deduce_args(ctx: &mut ResolveContext, scope: ScopeKey, args: &ast::ArgList) -> ArgTypes {
	args.args
		.iter()
		.map(|arg| deduce_assign(ctx, scope, &arg.value))
		.collect()
}

fn deduce_init_list(ctx: &mut ResolveContext, scope: ScopeKey, list: &ast::InitList) {
	for item in &list.items {
		match item {
			ast::InitItem::Assign(assign) => {
				let _ = deduce_assign(ctx, scope, assign);
			}
			ast::InitItem::List(inner) => deduce_init_list(ctx, scope, inner),
		}
	}
}

fn deduce_post_op(
	ctx: &mut ResolveContext,
	scope: ScopeKey,
	ty: Option<DeducedType>,
	op: &ast::PostOp,
) -> Option<DeducedType> {
	match op {
		ast::PostOp::Member { dot, name } => {
			let ty = ty?;
			push_type_hint(ctx, scope, *dot, &ty);
			let name = (*name)?;
			let (key, found) = find_member(ctx, &ty, name)?;
			ctx.refer(scope, name, key);

			if ctx.tree.symbols[key].as_function().is_some() && ty.translation.is_some() {
				ctx.raise(Diag::info(
					ctx.span(name),
					"template parameters are not substituted into function values",
				));
			}

			value_of(ctx, key, found, ty.translation.as_ref())
		}
		ast::PostOp::MethodCall { dot, name, args } => {
			let arg_types = deduce_args(ctx, scope, args);
			let ty = ty?;
			push_type_hint(ctx, scope, *dot, &ty);
			let (key, found) = find_member(ctx, &ty, *name)?;
			invoke(ctx, scope, *name, key, found, &arg_types, ty.translation.as_ref())
		}
		ast::PostOp::Index(args) => {
			let arg_types = args
				.iter()
				.map(|arg| deduce_assign(ctx, scope, &arg.value))
				.collect::<ArgTypes>();

			let ty = ty?;
			let (key, _) = ctx.find_member(&ty, "opIndex")?;
			ctx.tree.symbols[key].as_function()?;
			let chosen = pick_overload(ctx, key, &arg_types);
			call_result(ctx, chosen, &arg_types, ty.translation.as_ref())
		}
		ast::PostOp::Call(args) => {
			let arg_types = deduce_args(ctx, scope, args);
			call_value(ctx, &ty?, &arg_types)
		}
		ast::PostOp::Increment(_) => ty,
	}
}

/// Records what the completion collaborator offers after `dot`.
fn push_type_hint(ctx: &mut ResolveContext, scope: ScopeKey, dot: TokenIx, ty: &DeducedType) {
	if ctx.tree.get_type(ty.symbol).is_none() {
		return;
	}

	let span = ctx.span_after(dot);

	ctx.tree.scopes[scope].hints.push(Hint::Type {
		span,
		ty: ty.clone(),
	});
}

/// Reports a miss only if `ty` has members at all; there is nothing to
/// say about members of primitives or of template parameters.
fn find_member(
	ctx: &mut ResolveContext,
	ty: &DeducedType,
	name: TokenIx,
) -> Option<(SymbolKey, ScopeKey)> {
	let text = ctx.text(name);
	let found = ctx.find_member(ty, text);

	if found.is_none() && ctx.config.report_unresolved && ctx.has_members(ty) {
		let ty_name = ctx.tree.type_name(ty);

		ctx.raise(Diag::error(
			ctx.span(name),
			format!("no member `{text}` in `{ty_name}`"),
		));
	}

	found
}

// Overloads ///////////////////////////////////////////////////////////////////

/// The first overload whose arity and parameter types fit `args`; failing
/// that, the first whose arity fits; failing that, `first`.
#[must_use]
fn pick_overload(ctx: &ResolveContext, first: SymbolKey, args: &[Option<DeducedType>]) -> SymbolKey {
	let chain = ctx
		.tree
		.overloads(first)
		.filter_map(|k| ctx.tree.symbols[k].as_function().map(|f| (k, f)))
		.filter(|(_, f)| arity_fits(f, args.len()))
		.collect::<Vec<_>>();

	chain
		.iter()
		.find(|(_, f)| {
			f.params.iter().zip(args).all(|(p, a)| match (p, a) {
				(Some(p), Some(a)) => conforms(ctx, a, p),
				_ => true,
			})
		})
		.or_else(|| chain.first())
		.map_or(first, |(k, _)| *k)
}

#[must_use]
fn arity_fits(func: &SymbolicFunction, args: usize) -> bool {
	let max = func.param_names.len();
	args <= max && args + func.defaults >= max
}

/// Whether an argument of type `arg` can be passed where `param` is expected.
#[must_use]
fn conforms(ctx: &ResolveContext, arg: &DeducedType, param: &DeducedType) -> bool {
	if arg.symbol.same_as(param.symbol) {
		return true;
	}

	let arg_src = ctx.tree.type_source(arg.symbol);
	let param_src = ctx.tree.type_source(param.symbol);

	match (arg_src, param_src) {
		(_, Some(TypeSource::Any | TypeSource::Template)) => true,
		(Some(TypeSource::Number | TypeSource::Enum), Some(TypeSource::Number)) => true,
		_ => derives_from(ctx, arg, param),
	}
}

#[must_use]
fn derives_from(ctx: &ResolveContext, ty: &DeducedType, ancestor: &DeducedType) -> bool {
	let mut visited = FxHashSet::default();
	let mut stack = vec![ty.symbol];

	while let Some(symbol) = stack.pop() {
		if symbol.same_as(ancestor.symbol) {
			return true;
		}

		let SymbolRef::Type(key) = symbol else {
			continue;
		};

		if !visited.insert(key) {
			continue;
		}

		if let Some(bases) = ctx.tree.get_type(symbol).and_then(|t| t.bases.as_ref()) {
			stack.extend(bases.iter().map(|b| b.symbol));
		}
	}

	false
}

/// The return type of `func`, with the caller's translation (`outer`)
/// applied first and then whatever `args` bind the function's own
/// template parameters to.
#[must_use]
fn call_result(
	ctx: &ResolveContext,
	func: SymbolKey,
	args: &[Option<DeducedType>],
	outer: Option<&TemplateTranslation>,
) -> Option<DeducedType> {
	let f = ctx.tree.symbols[func].as_function()?;
	let ret = f.ret.as_ref()?;
	let own = infer_translation(ctx, f, args);
	let translations = outer.into_iter().chain(own.as_ref());
	Some(resolve_template_types(&ctx.tree, translations, ret))
}

/// Binds each of the function's template parameters to the type of the first
/// argument passed where that parameter is expected.
#[must_use]
fn infer_translation(
	ctx: &ResolveContext,
	func: &SymbolicFunction,
	args: &[Option<DeducedType>],
) -> Option<TemplateTranslation> {
	let params = func.template_params.as_ref()?;
	let mut translation = FxHashMap::default();

	for (param, arg) in func.params.iter().zip(args) {
		let (Some(param), Some(arg)) = (param, arg) else {
			continue;
		};

		let SymbolRef::Type(key) = param.symbol else {
			continue;
		};

		let Some(declared) = ctx.tree.symbols[key].declared() else {
			continue;
		};

		if params.contains(&declared) {
			translation.entry(declared).or_insert_with(|| arg.clone());
		}
	}

	(!translation.is_empty()).then_some(translation)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn literal_types() {
		let b = builtins();
		assert!(std::ptr::eq(number_type("42"), b.int()));
		assert!(std::ptr::eq(number_type("0xFF"), b.int()));
		assert!(std::ptr::eq(number_type("1.5"), b.double()));
		assert!(std::ptr::eq(number_type("1e3"), b.double()));
		assert!(std::ptr::eq(number_type("1.5f"), b.float()));
		assert!(std::ptr::eq(number_type(".5F"), b.float()));
	}
}
