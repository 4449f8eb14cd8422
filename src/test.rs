//! End-to-end tests over whole documents.

use crate::{
	angelscript::{
		lex::TokenIx,
		sema::{ScopeOwner, SymbolicObject, TypeSource, VariableKind},
	},
	analyze, analyze_all, setup, Config,
};

#[test]
fn add() {
	setup::logging();

	let analysis = analyze("int add(int a, int b) { return a; }", &Config::default());
	assert_eq!(analysis.tokens.len(), 14);
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let key = tree.find_shallow(tree.root, "add").unwrap();
	let func = tree.symbols[key].as_function().unwrap();

	assert_eq!(func.params.len(), 2);
	assert!(!func.is_instance_member);
	assert_eq!(tree.type_name(func.ret.as_ref().unwrap()), "int");

	for param in &func.params {
		assert_eq!(tree.type_name(param.as_ref().unwrap()), "int");
	}

	// The `a` after `return`.
	let fn_scope = func.scope.unwrap();
	let reference = tree.scopes[fn_scope]
		.references
		.iter()
		.find(|r| r.token == TokenIx(11))
		.unwrap();

	let var = tree.symbols[reference.symbol].as_variable().unwrap();
	assert_eq!(&*var.name, "a");
	assert_eq!(var.kind, VariableKind::Param);
}

#[test]
fn overloads() {
	const SOURCE: &str = indoc::indoc! {"
		void f() {}
		void f(int a) {}
		void f(int a, float b) {}
		void main() { f(1, 2.0f); }
	"};

	let analysis = analyze(SOURCE, &Config::default());
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let first = tree.find_shallow(tree.root, "f").unwrap();
	let chain = tree.overloads(first).collect::<Vec<_>>();
	assert_eq!(chain.len(), 3);

	let arities = chain
		.iter()
		.map(|k| tree.symbols[*k].as_function().unwrap().params.len())
		.collect::<Vec<_>>();
	assert_eq!(arities, [0, 1, 2]);

	// The call in `main` picks the two-parameter overload.
	let call = analysis
		.tokens
		.iter()
		.rposition(|t| &*t.text == "f")
		.unwrap();
	assert_eq!(analysis.symbol_of(TokenIx(call as u32)), Some(chain[2]));
}

#[test]
fn redeclaration() {
	let analysis = analyze("int x; class x {}", &Config::default());
	assert_eq!(analysis.diags.len(), 1);
	assert!(analysis.diags[0].message.contains("re-declare"));
	assert!(analysis.diags[0].related.is_some());

	let tree = &analysis.tree;
	let key = tree.find_shallow(tree.root, "x").unwrap();
	assert!(matches!(tree.symbols[key], SymbolicObject::Variable(_)));
}

#[test]
fn scope_chain() {
	const SOURCE: &str = indoc::indoc! {"
		int g;
		class C {
			void m() { g = 1; }
		}
	"};

	let analysis = analyze(SOURCE, &Config::default());
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let class_scope = tree.scopes[tree.root].children["C"];
	let class_key = tree.find_shallow(tree.root, "C").unwrap();
	assert_eq!(
		tree.scopes[class_scope].owner,
		Some(ScopeOwner::Class(class_key))
	);

	let method_key = tree.find_shallow(class_scope, "m").unwrap();
	let method = tree.symbols[method_key].as_function().unwrap();
	assert!(method.is_instance_member);

	let method_scope = method.scope.unwrap();
	assert_eq!(tree.scopes[method_scope].parent, Some(class_scope));

	let (g, found_in) = tree.find_with_parent(method_scope, "g").unwrap();
	assert_eq!(found_in, tree.root);
	assert_eq!(tree.find_global_scope(method_scope), tree.root);
	assert!(tree.scopes[method_scope]
		.references
		.iter()
		.any(|r| r.symbol == g));
}

#[test]
fn templates() {
	const SOURCE: &str = indoc::indoc! {"
		class array<T> {
			T opIndex(int i) { T t; return t; }
			uint length() { return 0; }
		}
		int[] a;
		auto v = a[0];
		auto n = a.length();
	"};

	let analysis = analyze(SOURCE, &Config::default());
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let ty_of = |name: &str| {
		let key = tree.find_shallow(tree.root, name).unwrap();
		let var = tree.symbols[key].as_variable().unwrap();
		tree.type_name(var.ty.as_ref().unwrap())
	};

	assert_eq!(ty_of("a"), "array<int>");
	assert_eq!(ty_of("v"), "int");
	assert_eq!(ty_of("n"), "uint");

	let array = tree.find_shallow(tree.root, "array").unwrap();
	let array = tree.symbols[array].as_type().unwrap();
	assert_eq!(array.source, TypeSource::Class);
	assert_eq!(array.template_params.as_ref().unwrap().len(), 1);
}

#[test]
fn inheritance_cycle() {
	const SOURCE: &str = indoc::indoc! {"
		class A : B {}
		class B : A {}
		class C : A {}
	"};

	let analysis = analyze(SOURCE, &Config::default());

	assert!(analysis
		.diags
		.iter()
		.any(|d| d.message.contains("inherits from itself")));

	// Resolution still terminates, and `C` keeps its base.
	let tree = &analysis.tree;
	let c = tree.find_shallow(tree.root, "C").unwrap();
	let c = tree.symbols[c].as_type().unwrap();
	assert_eq!(c.bases.as_ref().map(Vec::len), Some(1));
}

#[test]
fn many_documents() {
	let analyses = analyze_all(
		&["int x;", "class x {}", "void x() { y; }"],
		&Config::default(),
	);

	assert_eq!(analyses.len(), 3);
	assert!(analyses[0].diags.is_empty());
	assert!(analyses[1].diags.is_empty());
	assert_eq!(analyses[2].diags.len(), 1);

	let kinds = analyses
		.iter()
		.map(|a| {
			let key = a.tree.find_shallow(a.tree.root, "x").unwrap();
			std::mem::discriminant(&a.tree.symbols[key])
		})
		.collect::<Vec<_>>();

	assert_ne!(kinds[0], kinds[1]);
	assert_ne!(kinds[1], kinds[2]);
}

#[test]
fn diagnostic_limit() {
	let config = Config {
		max_diagnostics: Some(1),
		..Default::default()
	};

	let analysis = analyze("int x; int x; int x; int x;", &config);
	assert_eq!(analysis.diags.len(), 1);
	assert_eq!(analysis.dropped, 2);

	let analysis = analyze("int x; int x; int x; int x;", &Config::default());
	assert_eq!(analysis.diags.len(), 3);
	assert_eq!(analysis.dropped, 0);
}

#[test]
fn long_expression() {
	let source = format!(
		"int x = 1{};\nauto y = x{} < 2;",
		" + 1".repeat(10_000),
		" * x".repeat(10_000)
	);
	let analysis = analyze(&source, &Config::default());
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let y = tree.find_shallow(tree.root, "y").unwrap();
	let y = tree.symbols[y].as_variable().unwrap();
	assert_eq!(tree.type_name(y.ty.as_ref().unwrap()), "bool");
}

#[test]
fn deep_parentheses() {
	let source = format!(
		"int x = {}1{};\nint y = x;",
		"(".repeat(10_000),
		")".repeat(10_000)
	);

	let analysis = analyze(&source, &Config::default());
	assert_eq!(analysis.diags.len(), 1, "{:#?}", analysis.diags);
	assert!(analysis.diags[0].message.contains("nesting exceeds"));

	// Everything after the deep initializer is still analyzed.
	let tree = &analysis.tree;
	let y = tree.find_shallow(tree.root, "y").unwrap();
	assert!(tree.symbols[y].as_variable().is_some());
}

#[test]
fn deep_template_arguments() {
	let source = format!(
		"class array<T> {{}}\n{}int{} a;\nint b;",
		"array<".repeat(300),
		">".repeat(300)
	);

	let analysis = analyze(&source, &Config::default());

	let nesting = analysis
		.diags
		.iter()
		.filter(|d| d.message.contains("nesting exceeds"))
		.count();
	assert_eq!(nesting, 1, "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	assert!(tree.find_shallow(tree.root, "a").is_some());
	assert!(tree.find_shallow(tree.root, "b").is_some());
}

#[test]
fn namespace_shares_type_name() {
	for source in [
		"enum E { A } namespace E { int x; }",
		"namespace E { int x; } enum E { A }",
	] {
		let analysis = analyze(source, &Config::default());
		assert_eq!(analysis.diags.len(), 1, "{source}: {:#?}", analysis.diags);
		assert!(analysis.diags[0].message.contains("re-declare"));
		assert!(analysis.diags[0].related.is_some());

		// Both bodies were declared, each in a scope of its own.
		let tree = &analysis.tree;
		let e = tree.find_shallow(tree.root, "E").unwrap();
		let members = tree.symbols[e].as_type().unwrap().members.unwrap();
		assert!(tree.find_shallow(members, "A").is_some());

		let x = tree.scopes.values().find_map(|s| s.symbols.get("x"));
		assert!(x.is_some());
	}
}

#[test]
fn token_symbols() {
	const SOURCE: &str = indoc::indoc! {"
		int g;
		void f(int a) { g = a; }
	"};

	let analysis = analyze(SOURCE, &Config::default());
	assert!(analysis.diags.is_empty(), "{:#?}", analysis.diags);

	let tree = &analysis.tree;
	let g = tree.find_shallow(tree.root, "g").unwrap();
	let ixs = |text: &str| {
		analysis
			.tokens
			.iter()
			.enumerate()
			.filter(|(_, t)| &*t.text == text)
			.map(|(i, _)| TokenIx(i as u32))
			.collect::<Vec<_>>()
	};

	// Declaration and use of `g` lead to the same symbol.
	for ix in ixs("g") {
		assert_eq!(analysis.symbol_of(ix), Some(g));
	}

	let a = ixs("a");
	assert_eq!(a.len(), 2);
	assert!(analysis.symbol_of(a[0]).is_some());
	assert_eq!(analysis.symbol_of(a[0]), analysis.symbol_of(a[1]));

	// Keywords and punctuation have no symbol.
	assert_eq!(analysis.symbol_of(ixs("void")[0]), None);
	assert_eq!(analysis.symbol_of(ixs(";")[0]), None);

	for scope in tree.scopes.values() {
		for reference in &scope.references {
			assert_eq!(analysis.symbol_of(reference.token), Some(reference.symbol));
		}
	}
}
