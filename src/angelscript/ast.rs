//! The syntax tree. Nodes own their children and refer to tokens by index.

use text_size::TextRange;

use super::lex::TokenIx;

#[derive(Debug, Default)]
pub struct Script {
	pub items: Vec<Item>,
}

#[derive(Debug)]
pub enum Item {
	Namespace(Namespace),
	Class(Class),
	Interface(Interface),
	Enum(Enum),
	Func(Func),
	Var(Var),
	Placeholder(Placeholder),
}

/// A production that was recognized and consumed but whose contents are not
/// elaborated into nodes (`switch`, `import`, `funcdef`, lambdas, et cetera).
#[derive(Debug, Clone, Copy)]
pub struct Placeholder {
	pub keyword: TokenIx,
	pub span: TextRange,
}

// Declarations ////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct Namespace {
	/// `namespace A::B { }` yields `[A, B]`.
	pub names: Vec<TokenIx>,
	pub body: Script,
	pub span: TextRange,
}

#[derive(Debug)]
pub struct Class {
	pub name: TokenIx,
	pub template_params: Vec<TokenIx>,
	pub bases: Vec<TypeRef>,
	pub members: Vec<Member>,
	pub span: TextRange,
}

#[derive(Debug)]
pub struct Interface {
	pub name: TokenIx,
	pub bases: Vec<TypeRef>,
	pub members: Vec<Member>,
	pub span: TextRange,
}

#[derive(Debug)]
pub enum Member {
	Func(Func),
	Var(Var),
	Placeholder(Placeholder),
}

#[derive(Debug)]
pub struct Enum {
	pub name: TokenIx,
	pub members: Vec<EnumMember>,
	pub span: TextRange,
}

#[derive(Debug)]
pub struct EnumMember {
	pub name: TokenIx,
	pub value: Option<Expr>,
}

#[derive(Debug)]
pub struct Func {
	pub access: Option<TokenIx>,
	/// `None` for constructors and destructors.
	pub ret: Option<TypeRef>,
	pub ret_ref: bool,
	pub destructor: bool,
	pub name: TokenIx,
	pub template_params: Vec<TokenIx>,
	pub params: ParamList,
	pub is_const: bool,
	/// `override`, `final`, `explicit`, `property`.
	pub attrs: Vec<TokenIx>,
	/// `None` for forward declarations and interface methods.
	pub body: Option<StatBlock>,
	pub span: TextRange,
}

#[derive(Debug, Default)]
pub struct ParamList {
	pub params: Vec<Param>,
}

#[derive(Debug)]
pub struct Param {
	pub ty: TypeRef,
	/// `in`, `out`, or `inout` after a `&`.
	pub modifier: Option<TokenIx>,
	pub is_ref: bool,
	pub name: Option<TokenIx>,
	pub default: Option<Expr>,
}

#[derive(Debug)]
pub struct Var {
	pub access: Option<TokenIx>,
	pub ty: TypeRef,
	pub decls: Vec<VarDecl>,
	pub span: TextRange,
}

#[derive(Debug)]
pub struct VarDecl {
	pub name: TokenIx,
	pub init: Option<VarInit>,
}

#[derive(Debug)]
pub enum VarInit {
	Assign(Assign),
	InitList(InitList),
	Args(ArgList),
}

// Types ///////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct TypeRef {
	pub is_const: bool,
	pub scope: Option<ScopePath>,
	pub datatype: DataType,
	pub template_args: Vec<TypeRef>,
	pub suffixes: Vec<TypeSuffix>,
	pub span: TextRange,
}

/// An identifier, primitive type keyword, `?`, or `auto`.
#[derive(Debug, Clone, Copy)]
pub struct DataType {
	pub token: TokenIx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSuffix {
	/// `[]`
	Array,
	/// `@` or `@ const`
	Handle,
}

/// `::A::B::` in front of a name.
#[derive(Debug, Clone, Default)]
pub struct ScopePath {
	/// Leading `::`.
	pub global: Option<TokenIx>,
	pub names: Vec<TokenIx>,
	/// The last `::` of the path.
	pub last_colons: Option<TokenIx>,
}

// Statements //////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct StatBlock {
	pub stats: Vec<Stat>,
	pub span: TextRange,
}

#[derive(Debug)]
pub enum Stat {
	Var(Var),
	If(If),
	For(For),
	While(While),
	DoWhile(DoWhile),
	Return(Return),
	Break(TokenIx),
	Continue(TokenIx),
	Block(StatBlock),
	Expr(ExprStat),
	Placeholder(Placeholder),
}

/// An `if` with its `else if` chain flattened.
#[derive(Debug)]
pub struct If {
	/// Never empty.
	pub branches: Vec<Branch>,
	/// Dropped, along with any later branches, if a consequent is malformed.
	pub otherwise: Option<Box<Stat>>,
}

#[derive(Debug)]
pub struct Branch {
	pub cond: Assign,
	pub then: Option<Box<Stat>>,
}

#[derive(Debug)]
pub struct For {
	pub init: Option<Box<Stat>>,
	pub cond: Option<Assign>,
	pub incr: Vec<Assign>,
	pub body: Option<Box<Stat>>,
	pub span: TextRange,
}

#[derive(Debug)]
pub struct While {
	pub cond: Assign,
	pub body: Option<Box<Stat>>,
}

#[derive(Debug)]
pub struct DoWhile {
	pub body: Option<Box<Stat>>,
	pub cond: Option<Assign>,
}

#[derive(Debug)]
pub struct Return {
	pub keyword: TokenIx,
	pub value: Option<Assign>,
}

#[derive(Debug)]
pub struct ExprStat {
	/// `None` for an empty statement.
	pub value: Option<Assign>,
}

// Expressions /////////////////////////////////////////////////////////////////

/// `condition (assign-op condition)*`, right-associative.
#[derive(Debug)]
pub struct Assign {
	pub cond: Condition,
	pub tail: Vec<(TokenIx, Condition)>,
}

/// `expr ('?' assign ':' assign)?`
#[derive(Debug)]
pub struct Condition {
	pub expr: Expr,
	pub ternary: Option<Ternary>,
}

#[derive(Debug)]
pub struct Ternary {
	pub then: Box<Assign>,
	pub otherwise: Option<Box<Assign>>,
}

/// `term (binary-op term)*`
#[derive(Debug)]
pub struct Expr {
	pub head: ExprTerm,
	pub tail: Vec<(TokenIx, ExprTerm)>,
}

#[derive(Debug)]
pub enum ExprTerm {
	Value(ValueTerm),
	InitList(InitList),
}

#[derive(Debug)]
pub struct ValueTerm {
	pub pre_ops: Vec<TokenIx>,
	pub value: ExprValue,
	pub post_ops: Vec<PostOp>,
}

#[derive(Debug)]
pub enum ExprValue {
	Void(TokenIx),
	Literal(TokenIx),
	VarAccess(VarAccess),
	FuncCall(FuncCall),
	ConstructCall(ConstructCall),
	Cast(Cast),
	Paren(Box<Assign>),
	Lambda(Placeholder),
}

#[derive(Debug)]
pub struct VarAccess {
	pub scope: Option<ScopePath>,
	/// Absent when the user has typed `ns::` and nothing yet.
	pub ident: Option<TokenIx>,
}

#[derive(Debug)]
pub struct FuncCall {
	pub scope: Option<ScopePath>,
	pub ident: TokenIx,
	pub args: ArgList,
}

#[derive(Debug)]
pub struct ConstructCall {
	pub ty: TypeRef,
	pub args: ArgList,
}

#[derive(Debug)]
pub struct Cast {
	pub keyword: TokenIx,
	pub ty: TypeRef,
	pub value: Box<Assign>,
}

#[derive(Debug)]
pub enum PostOp {
	/// `.name`; the name is absent while the user is still typing it.
	Member { dot: TokenIx, name: Option<TokenIx> },
	MethodCall { dot: TokenIx, name: TokenIx, args: ArgList },
	Index(Vec<Arg>),
	Call(ArgList),
	/// `++` or `--`.
	Increment(TokenIx),
}

#[derive(Debug, Default)]
pub struct ArgList {
	pub args: Vec<Arg>,
}

#[derive(Debug)]
pub struct Arg {
	pub name: Option<TokenIx>,
	pub value: Assign,
}

#[derive(Debug)]
pub struct InitList {
	pub items: Vec<InitItem>,
}

#[derive(Debug)]
pub enum InitItem {
	Assign(Assign),
	List(InitList),
}
