use lsp_types::{HoverContents, LanguageString, MarkedString};

use crate::angelscript::lex::Token;

#[must_use]
pub(super) fn hover_info_for(token: &Token) -> Option<HoverContents> {
	const DOCS_WHILE: &str = indoc::indoc! {
		"The `while` loop checks its condition before each iteration and runs
		its body for as long as the condition holds.

		The `do`-`while` loop checks its condition after each iteration, so its
		body always runs at least once.

		```angelscript
		while (i < 10)
			i++;

		do
		{
			i--;
		} while (i > 0);
		```"
	};

	const DOCS_IF_ELSE: &str = indoc::indoc! {
		"A conditional statement will, conditionally,
		choose a statement (or none) to execute.

		```angelscript
		if (a)
			b();
		else
		{
			c = d;
		}
		```"
	};

	const DOCS_ACCESS: &str = indoc::indoc! {
		"Class members marked `private` are only accessible from within the
		class itself. Members marked `protected` are also accessible from
		within derived classes."
	};

	let (kw, contents): (&str, &[&str]) = match &*token.text {
		"auto" => (
			"auto",
			&["Declares a variable whose type is deduced from its initializer."],
		),
		"break" => (
			"break",
			&["Exits the innermost enclosing loop or `switch` statement."],
		),
		"cast" => (
			"cast",
			&[indoc::indoc! {
				"`cast<T>(expr)` converts a handle to a handle of another type
				in the same class hierarchy. If the object is not of that type,
				the result is `null`.

				```angelscript
				Derived@ d = cast<Derived>(base);
				```"
			}],
		),
		"class" => (
			"class",
			&[indoc::indoc! {
				"Declares a script class. A class may inherit from one other class
				and implement any number of interfaces.

				```angelscript
				class Player : Entity, IDamageable
				{
					Player() {}
					void Hurt(int amount) override {}
				}
				```"
			}],
		),
		"const" => (
			"const",
			&["A `const` value or handle target cannot be modified. A `const` method cannot modify its object."],
		),
		"continue" => (
			"continue",
			&["Skips to the next iteration of the innermost enclosing loop."],
		),
		"do" => ("do", &[DOCS_WHILE]),
		"else" => ("else", &[DOCS_IF_ELSE]),
		"enum" => (
			"enum",
			&[indoc::indoc! {
				"Declares a set of named integer constants. Values not given
				explicitly are one greater than the previous value, starting at 0.

				```angelscript
				enum Color { Red, Green = 5, Blue }
				```"
			}],
		),
		"for" => (
			"for",
			&[indoc::indoc! {
				"```angelscript
				for (int i = 0; i < 10; i++)
					sum += i;
				```

				Variables declared in the initializer are only visible within the loop."
			}],
		),
		"funcdef" => (
			"funcdef",
			&["Declares a function signature, whose handles can refer to any function with a matching signature."],
		),
		"if" => ("if", &[DOCS_IF_ELSE]),
		"import" => (
			"import",
			&["Imports a function from another script module: `import void f() from \"module\";`"],
		),
		"interface" => (
			"interface",
			&["Declares a set of methods that implementing classes must provide. Interfaces cannot be instantiated."],
		),
		"namespace" => (
			"namespace",
			&[indoc::indoc! {
				"Groups declarations under a name. A namespace may be reopened any
				number of times; its members are accessed from outside with `::`.

				```angelscript
				namespace Math { float Pi = 3.14159f; }
				float tau = Math::Pi * 2;
				```"
			}],
		),
		"null" => (
			"null",
			&["The handle that refers to no object."],
		),
		"private" | "protected" => (&*token.text, &[DOCS_ACCESS]),
		"return" => (
			"return",
			&["Exits the current function, optionally yielding a value to the caller."],
		),
		"switch" => (
			"switch",
			&[indoc::indoc! {
				"Jumps to the `case` label matching the value of an integer expression,
				or to `default` if none match. Execution falls through to the next
				label unless stopped by `break`."
			}],
		),
		"while" => ("while", &[DOCS_WHILE]),
		_ => return None,
	};

	let mut ret = vec![];

	ret.push(MarkedString::LanguageString(LanguageString {
		language: "angelscript".to_string(),
		value: kw.to_string(),
	}));

	for c in contents {
		ret.push(MarkedString::String(c.to_string()));
	}

	#[cfg(debug_assertions)]
	tracing::debug!("Hover info hit: keyword");

	Some(HoverContents::Array(ret))
}
