//! Node shapes, grouped by kind: file/import forms, definitions, the
//! statement set and the full expression set.

use crate::arena::NodeId;
use veritype_common::ArgKind;

// =============================================================================
// File and imports
// =============================================================================

/// The root node of a single source file.
#[derive(Clone, Debug)]
pub struct FileNode {
    pub module_name: String,
    pub defs: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ImportNode {
    /// `(dotted module id, optional local alias)` pairs, one per
    /// comma-separated target in `import a.b as c, d`.
    pub ids: Vec<(String, Option<String>)>,
}

#[derive(Clone, Debug)]
pub struct ImportFromNode {
    pub module_id: String,
    /// `(imported name, optional local alias)` pairs.
    pub names: Vec<(String, Option<String>)>,
    /// Number of leading dots for relative imports (`from . import x`).
    pub relative: u32,
}

#[derive(Clone, Debug)]
pub struct ImportAllNode {
    pub module_id: String,
    pub relative: u32,
}

// =============================================================================
// Definitions
// =============================================================================

#[derive(Clone, Debug)]
pub struct ParamNode {
    pub name: String,
    pub kind: ArgKind,
    /// Syntactic type annotation, if the parameter carries one.
    pub annotation: NodeId,
    /// Default-value expression, if the parameter has one.
    pub default: NodeId,
}

#[derive(Clone, Debug)]
pub struct FuncDefNode {
    pub name: String,
    pub params: Vec<ParamNode>,
    /// Names bound by a class-level `<T>`-style variable list on a generic
    /// function; resolved by the binder into fresh function type variables.
    pub type_variables: Vec<String>,
    /// Syntactic return-type annotation; `NodeId::NONE` when absent.
    pub return_annotation: NodeId,
    pub body: NodeId,
    pub is_dynamically_typed: bool,
}

/// An `@overload`-grouped set of `FuncDefNode`s sharing one name.
#[derive(Clone, Debug)]
pub struct OverloadedFuncDefNode {
    pub name: String,
    pub items: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ClassDefNode {
    pub name: String,
    pub type_variables: Vec<String>,
    /// Base-type syntax; first entry (if any) is the superclass, the rest
    /// are interfaces, matching `TypeInfo.bases` ordering.
    pub base_types: Vec<NodeId>,
    pub body: Vec<NodeId>,
    pub is_interface: bool,
}

#[derive(Clone, Debug)]
pub struct VarDefNode {
    pub names: Vec<String>,
    pub annotation: NodeId,
    pub initializer: NodeId,
}

#[derive(Clone, Debug)]
pub struct BlockNode {
    pub stmts: Vec<NodeId>,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug)]
pub struct AssignmentStmtNode {
    /// Possibly more than one target for chained assignment (`a = b = rhs`)
    /// or a single tuple-expr target for destructuring.
    pub targets: Vec<NodeId>,
    pub rvalue: NodeId,
}

#[derive(Clone, Debug)]
pub struct IfStmtNode {
    pub conditions: Vec<NodeId>,
    pub bodies: Vec<NodeId>,
    pub else_body: NodeId,
}

#[derive(Clone, Debug)]
pub struct WhileStmtNode {
    pub condition: NodeId,
    pub body: NodeId,
    pub else_body: NodeId,
}

#[derive(Clone, Debug)]
pub struct ForStmtNode {
    pub index: NodeId,
    pub iterable: NodeId,
    pub body: NodeId,
    pub else_body: NodeId,
}

#[derive(Clone, Debug)]
pub struct TryStmtNode {
    pub body: NodeId,
    /// `(exception type expr, bound name, handler body)` per `except` clause.
    pub handlers: Vec<(NodeId, Option<String>, NodeId)>,
    pub else_body: NodeId,
    pub finally_body: NodeId,
}

#[derive(Clone, Debug)]
pub struct WithStmtNode {
    /// `(context-manager expr, bound name)` pairs.
    pub items: Vec<(NodeId, Option<String>)>,
    pub body: NodeId,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug)]
pub struct NameExprNode {
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct MemberExprNode {
    pub base: NodeId,
    pub member: String,
}

#[derive(Clone, Debug)]
pub struct CallArg {
    pub kind: ArgKind,
    /// Keyword name for `Named` args; `None` otherwise.
    pub name: Option<String>,
    pub value: NodeId,
}

#[derive(Clone, Debug)]
pub struct CallExprNode {
    pub callee: NodeId,
    pub args: Vec<CallArg>,
}

#[derive(Clone, Debug)]
pub struct IndexExprNode {
    pub base: NodeId,
    pub index: NodeId,
}

#[derive(Clone, Debug)]
pub struct SliceExprNode {
    pub lower: NodeId,
    pub upper: NodeId,
    pub step: NodeId,
}

#[derive(Clone, Debug)]
pub struct ComprehensionNode {
    pub element: NodeId,
    /// A second element for dict comprehensions' value part; `NONE` for
    /// list/set/generator comprehensions.
    pub value: NodeId,
    pub target: NodeId,
    pub iterable: NodeId,
    pub conditions: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct LambdaExprNode {
    pub params: Vec<ParamNode>,
    pub body: NodeId,
}

#[derive(Clone, Debug)]
pub struct CastExprNode {
    pub target_type: NodeId,
    pub expr: NodeId,
}

#[derive(Clone, Debug)]
pub struct TypeApplicationNode {
    pub base: NodeId,
    pub type_args: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Invert,
    Not,
}

#[derive(Clone, Debug)]
pub struct UnaryExprNode {
    pub op: UnaryOp,
    pub operand: NodeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Is,
    IsNot,
    In,
    NotIn,
}

#[derive(Clone, Debug)]
pub struct BinaryExprNode {
    pub op: BinaryOp,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprNode {
    pub condition: NodeId,
    pub if_expr: NodeId,
    pub else_expr: NodeId,
}

#[derive(Clone, Debug)]
pub struct SuperExprNode {
    /// Name of the class whose `__init__`/method context `super()` was
    /// called from; resolved by the binder.
    pub enclosing_class: Option<String>,
}

// =============================================================================
// Type-annotation syntax
// =============================================================================

/// Syntax for a type annotation, produced by the parser and resolved into a
/// `veritype_types::Type` by the semantic analyzer. Kept separate from
/// the general expression grammar because annotations have
/// their own small, non-evaluable shape (an unbound type plus generic
/// arguments), matching the original's `parsetype.py` / `UnboundType`
/// split from the general expression parser.
#[derive(Clone, Debug)]
pub enum TypeAnnNode {
    /// A possibly-generic name reference, e.g. `int` or `List<int>`.
    Name { name: String, args: Vec<NodeId> },
    Tuple(Vec<NodeId>),
    Callable {
        arg_types: Vec<NodeId>,
        arg_kinds: Vec<ArgKind>,
        arg_names: Vec<Option<String>>,
        ret: NodeId,
    },
}

// =============================================================================
// The node sum
// =============================================================================

#[derive(Clone, Debug)]
pub enum Node {
    File(FileNode),
    Import(ImportNode),
    ImportFrom(ImportFromNode),
    ImportAll(ImportAllNode),

    FuncDef(FuncDefNode),
    OverloadedFuncDef(OverloadedFuncDefNode),
    ClassDef(ClassDefNode),
    VarDef(VarDefNode),
    Block(BlockNode),

    ExpressionStmt(NodeId),
    AssignmentStmt(AssignmentStmtNode),
    ReturnStmt(NodeId),
    IfStmt(IfStmtNode),
    WhileStmt(WhileStmtNode),
    ForStmt(ForStmtNode),
    TryStmt(TryStmtNode),
    WithStmt(WithStmtNode),
    RaiseStmt(NodeId),
    Pass,
    Break,
    Continue,

    NameExpr(NameExprNode),
    MemberExpr(MemberExprNode),
    CallExpr(CallExprNode),
    IndexExpr(IndexExprNode),
    SliceExpr(SliceExprNode),
    IntExpr(i64),
    FloatExpr(u64), // bit-pattern of an f64; f64 is not Eq/Hash-friendly
    StrExpr(String),
    BytesExpr(Vec<u8>),
    NoneExpr,
    ParenExpr(NodeId),
    TupleExpr(Vec<NodeId>),
    ListExpr(Vec<NodeId>),
    DictExpr(Vec<(NodeId, NodeId)>),
    SetExpr(Vec<NodeId>),
    GeneratorExpr(ComprehensionNode),
    ListComprehension(ComprehensionNode),
    LambdaExpr(LambdaExprNode),
    CastExpr(CastExprNode),
    TypeApplication(TypeApplicationNode),
    UnaryExpr(UnaryExprNode),
    BinaryExpr(BinaryExprNode),
    ConditionalExpr(ConditionalExprNode),
    SuperExpr(SuperExprNode),

    TypeAnn(TypeAnnNode),
}

/// Helpers for building/reading the bit-pattern-encoded float literal.
pub fn float_to_node_bits(value: f64) -> u64 {
    value.to_bits()
}

pub fn node_bits_to_float(bits: u64) -> f64 {
    f64::from_bits(bits)
}
