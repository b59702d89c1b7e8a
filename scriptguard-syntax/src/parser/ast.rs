//! Abstract Syntax Tree types
//!
//! Every node carries the [`Span`] of the source text it was parsed from.
//! Names and literal values are owned so a tree outlives its source buffer.

use crate::span::Span;
use serde::Serialize;

// ============================================================================
// PROGRAM & IDENTIFIERS
// ============================================================================

/// The root of a parsed script or module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Block(BlockStatement),
    Empty(Span),
    Expression(ExpressionStatement),
    If(Box<IfStatement>),
    For(Box<ForStatement>),
    ForIn(Box<ForInStatement>),
    ForOf(Box<ForOfStatement>),
    While(Box<WhileStatement>),
    DoWhile(Box<DoWhileStatement>),
    Continue(JumpStatement),
    Break(JumpStatement),
    Return(ReturnStatement),
    With(Box<WithStatement>),
    Switch(SwitchStatement),
    Labeled(Box<LabeledStatement>),
    Throw(ThrowStatement),
    Try(Box<TryStatement>),
    Debugger(Span),
    Variable(VariableDeclaration),
    Function(Box<Function>),
    Class(Box<Class>),
    Import(ImportDeclaration),
    Export(Box<ExportDeclaration>),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(s) => s.span,
            Statement::Empty(span) | Statement::Debugger(span) => *span,
            Statement::Expression(s) => s.span,
            Statement::If(s) => s.span,
            Statement::For(s) => s.span,
            Statement::ForIn(s) => s.span,
            Statement::ForOf(s) => s.span,
            Statement::While(s) => s.span,
            Statement::DoWhile(s) => s.span,
            Statement::Continue(s) | Statement::Break(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::With(s) => s.span,
            Statement::Switch(s) => s.span,
            Statement::Labeled(s) => s.span,
            Statement::Throw(s) => s.span,
            Statement::Try(s) => s.span,
            Statement::Variable(s) => s.span,
            Statement::Function(s) => s.span,
            Statement::Class(s) => s.span,
            Statement::Import(s) => s.span,
            Statement::Export(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Statement,
    pub alternate: Option<Statement>,
    pub span: Span,
}

/// Initializer clause of a C-style `for`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Statement,
    pub span: Span,
}

/// Left-hand side of `for-in` / `for-of`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForHead {
    Variable(VariableDeclaration),
    Target(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForInStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForOfStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Statement,
    /// Location of `await` in `for await (...)`.
    pub await_span: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoWhileStatement {
    pub body: Statement,
    pub test: Expression,
    pub span: Span,
}

/// `break` / `continue`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithStatement {
    pub object: Expression,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    /// `None` for `default:`.
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Statement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowStatement {
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
    pub span: Span,
}

// ============================================================================
// FUNCTIONS & CLASSES
// ============================================================================

/// Function declaration, function expression or method body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub is_generator: bool,
    /// Location of the `async` modifier, if any.
    pub async_span: Option<Span>,
    pub span: Span,
}

impl Function {
    pub fn is_async(&self) -> bool {
        self.async_span.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrowBody {
    Expression(Expression),
    Block(BlockStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowFunction {
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub async_span: Option<Span>,
    pub span: Span,
}

impl ArrowFunction {
    pub fn is_async(&self) -> bool {
        self.async_span.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub id: Option<Identifier>,
    pub super_class: Option<Expression>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassMember {
    Method(MethodDefinition),
    Property(PropertyDefinition),
    StaticBlock(BlockStatement),
}

impl ClassMember {
    pub fn span(&self) -> Span {
        match self {
            ClassMember::Method(m) => m.span,
            ClassMember::Property(p) => p.span,
            ClassMember::StaticBlock(b) => b.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    pub key: PropertyKey,
    pub value: Function,
    pub kind: MethodKind,
    pub is_static: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDefinition {
    pub key: PropertyKey,
    pub value: Option<Expression>,
    pub is_static: bool,
    pub span: Span,
}

/// Key of an object property, class member or destructuring property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKey {
    Identifier(Identifier),
    String(StringLiteral),
    Number(NumberLiteral),
    Computed(Box<Expression>),
    Private(Identifier),
}

impl PropertyKey {
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(id) | PropertyKey::Private(id) => id.span,
            PropertyKey::String(s) => s.span,
            PropertyKey::Number(n) => n.span,
            PropertyKey::Computed(e) => e.span(),
        }
    }

    /// The key's name when it is statically known.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Identifier(id) => Some(&id.name),
            PropertyKey::String(s) => Some(&s.value),
            _ => None,
        }
    }
}

// ============================================================================
// MODULES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImportSpecifier {
    Default(Identifier),
    Namespace(Identifier),
    Named { imported: Identifier, local: Identifier },
}

impl ImportSpecifier {
    pub fn local(&self) -> &Identifier {
        match self {
            ImportSpecifier::Default(local)
            | ImportSpecifier::Namespace(local)
            | ImportSpecifier::Named { local, .. } => local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDeclaration {
    pub kind: ExportKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExportKind {
    /// `export var ...`, `export function ...`, `export class ...`.
    Declaration(Statement),
    DefaultExpression(Expression),
    DefaultFunction(Function),
    DefaultClass(Class),
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<StringLiteral>,
    },
    All {
        exported: Option<Identifier>,
        source: StringLiteral,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSpecifier {
    pub local: Identifier,
    pub exported: Identifier,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Template(TemplateLiteral),
    TaggedTemplate(Box<TaggedTemplateExpression>),
    This(Span),
    Super(Span),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(Box<Function>),
    Arrow(Box<ArrowFunction>),
    Class(Box<Class>),
    Unary(Box<UnaryExpression>),
    Update(Box<UpdateExpression>),
    Binary(Box<BinaryExpression>),
    Assignment(Box<AssignmentExpression>),
    Conditional(Box<ConditionalExpression>),
    Call(Box<CallExpression>),
    New(Box<NewExpression>),
    Member(Box<MemberExpression>),
    Sequence(SequenceExpression),
    /// Only valid inside array literals, argument lists and object literals.
    Spread(Box<SpreadElement>),
    Await(Box<AwaitExpression>),
    Yield(Box<YieldExpression>),
    Parenthesized(Box<ParenthesizedExpression>),
    ImportCall(Box<ImportCall>),
    MetaProperty(MetaProperty),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(e) => e.span,
            Expression::Literal(e) => e.span(),
            Expression::Template(e) => e.span,
            Expression::TaggedTemplate(e) => e.span,
            Expression::This(span) | Expression::Super(span) => *span,
            Expression::Array(e) => e.span,
            Expression::Object(e) => e.span,
            Expression::Function(e) => e.span,
            Expression::Arrow(e) => e.span,
            Expression::Class(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Update(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Assignment(e) => e.span,
            Expression::Conditional(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::New(e) => e.span,
            Expression::Member(e) => e.span,
            Expression::Sequence(e) => e.span,
            Expression::Spread(e) => e.span,
            Expression::Await(e) => e.span,
            Expression::Yield(e) => e.span,
            Expression::Parenthesized(e) => e.span,
            Expression::ImportCall(e) => e.span,
            Expression::MetaProperty(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expression {
        let mut expression = self;
        while let Expression::Parenthesized(inner) = expression {
            expression = &inner.expression;
        }
        expression
    }

    /// Span of the first token of this expression.
    pub fn leading_span(&self) -> Span {
        let mut expression = self;
        loop {
            expression = match expression {
                Expression::Binary(e) => &e.left,
                Expression::Assignment(e) => &e.target,
                Expression::Conditional(e) => &e.test,
                Expression::Call(e) => &e.callee,
                Expression::Member(e) => &e.object,
                Expression::TaggedTemplate(e) => &e.tag,
                Expression::Update(e) if !e.prefix => &e.argument,
                Expression::Sequence(e) => match e.expressions.first() {
                    Some(first) => first,
                    None => return e.span,
                },
                Expression::Arrow(arrow) if arrow.async_span.is_none() => {
                    return match arrow.params.first() {
                        // `x => x`
                        Some(param) if param.span().start == arrow.span.start => param.span(),
                        _ => arrow.span.leading(1),
                    };
                }
                other => return other.own_leading_span(),
            };
        }
    }

    /// Leading token of an expression that does not start with a
    /// subexpression.
    fn own_leading_span(&self) -> Span {
        let span = self.span();
        match self {
            Expression::Template(_)
            | Expression::Array(_)
            | Expression::Object(_)
            | Expression::Parenthesized(_) => span.leading(1),
            Expression::Function(function) => match function.async_span {
                Some(keyword) => keyword,
                None => span.leading("function".len()),
            },
            Expression::Arrow(arrow) => arrow.async_span.unwrap_or(span),
            Expression::Class(_) => span.leading("class".len()),
            Expression::Unary(unary) => span.leading(unary.operator.as_str().len()),
            Expression::Update(_) => span.leading(2),
            Expression::New(_) => span.leading("new".len()),
            Expression::Spread(_) => span.leading(3),
            Expression::Await(_) | Expression::Yield(_) => span.leading(5),
            Expression::ImportCall(_) => span.leading("import".len()),
            Expression::MetaProperty(meta) => meta.meta.span,
            _ => span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Null(Span),
    Boolean(BooleanLiteral),
    Number(NumberLiteral),
    BigInt(NumberLiteral),
    String(StringLiteral),
    RegExp(RegExpLiteral),
}

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Null(span) => *span,
            Literal::Boolean(l) => l.span,
            Literal::Number(l) | Literal::BigInt(l) => l.span,
            Literal::String(l) => l.span,
            Literal::RegExp(l) => l.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

/// Numeric literal kept as raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberLiteral {
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    /// Cooked value with escapes decoded.
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLiteral {
    /// Cooked text pieces, raw where an escape has no cooked value; always
    /// one more than `expressions`.
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedTemplateExpression {
    pub tag: Expression,
    pub quasi: TemplateLiteral,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpression {
    /// `None` marks a hole.
    pub elements: Vec<Option<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectMember {
    Property(ObjectProperty),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    Init,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Expression,
    pub kind: PropertyKind,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Expression,
    pub span: Span,
}

/// Binary and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    Instanceof,
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Shl,
    Shr,
    UShr,
    BitOr,
    BitXor,
    BitAnd,
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentExpression {
    pub operator: AssignmentOperator,
    pub target: Expression,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalExpression {
    pub test: Expression,
    pub consequent: Expression,
    pub alternate: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub callee: Expression,
    pub arguments: Vec<Expression>,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpression {
    pub callee: Expression,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemberProperty {
    /// `a.b`
    Static(Identifier),
    /// `a[b]`
    Computed(Expression),
    /// `a.#b`
    Private(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    pub object: Expression,
    pub property: MemberProperty,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadElement {
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwaitExpression {
    pub argument: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldExpression {
    pub argument: Option<Expression>,
    pub delegate: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesizedExpression {
    pub expression: Expression,
    pub span: Span,
}

/// Dynamic `import(...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportCall {
    pub source: Expression,
    /// The options argument, e.g. `{ with: { type: 'json' } }`.
    pub options: Option<Expression>,
    pub span: Span,
}

/// `new.target` / `import.meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaProperty {
    pub meta: Identifier,
    pub property: Identifier,
    pub span: Span,
}

// ============================================================================
// PATTERNS
// ============================================================================

/// Binding patterns: declarations, parameters and catch clauses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    Identifier(Identifier),
    Object(ObjectPattern),
    Array(ArrayPattern),
    Assignment(Box<AssignmentPattern>),
    Rest(Box<RestElement>),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.span,
            Pattern::Object(p) => p.span,
            Pattern::Array(p) => p.span,
            Pattern::Assignment(p) => p.span,
            Pattern::Rest(p) => p.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<Box<RestElement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayPattern {
    pub elements: Vec<Option<Pattern>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentPattern {
    pub target: Pattern,
    pub default: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestElement {
    pub argument: Pattern,
    pub span: Span,
}
