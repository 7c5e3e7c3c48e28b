use super::span::Span;
use super::types::{FuncId, ScopeId, TypeId, VarId};
use crate::backend::x86_64::{Condition, GpRegister};
use std::fmt;

pub type NumberLiteralValue = u64;

// Token definition
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'src> {
    Num(NumberLiteralValue),
    /// Raw string literal body, escapes not yet processed
    Str(&'src str),
    Ident(&'src str),
    Op(&'src str),
    Ctrl(char),
    // Keywords
    Return,
    If,
    Else,
    While,
    Do,
    For,
    Asm,
    Extern,
    Class,
    Public,
    Protected,
    Private,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Op(s) => write!(f, "{s}"),
            Token::Ctrl(c) => write!(f, "{c}"),
            Token::Return => write!(f, "return"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::Do => write!(f, "do"),
            Token::For => write!(f, "for"),
            Token::Asm => write!(f, "asm"),
            Token::Extern => write!(f, "extern"),
            Token::Class => write!(f, "class"),
            Token::Public => write!(f, "public"),
            Token::Protected => write!(f, "protected"),
            Token::Private => write!(f, "private"),
        }
    }
}

// Binary operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Compare(Condition),
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::Compare(cond) => write!(f, "{}", cond.symbol()),
        }
    }
}

/// A type as written in the source, e.g. `char*`.
#[derive(Clone, Debug)]
pub struct Type<'src> {
    pub name: &'src str,
    pub pointer_depth: usize,
    pub span: Span,
    pub description: Option<TypeId>,
}

impl<'src> Type<'src> {
    pub fn new(name: &'src str, pointer_depth: usize, span: Span) -> Self {
        Self {
            name,
            pointer_depth,
            span,
            description: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}{}", self.name, "*".repeat(self.pointer_depth))
    }
}

#[derive(Clone, Debug)]
pub struct Variable<'src> {
    pub name: &'src str,
    pub span: Span,
    pub description: Option<VarId>,
}

impl<'src> Variable<'src> {
    pub fn new(name: &'src str, span: Span) -> Self {
        Self {
            name,
            span,
            description: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct NumberLiteral {
    pub value: NumberLiteralValue,
}

#[derive(Clone, Debug)]
pub struct FunctionCall<'src> {
    pub name: &'src str,
    pub arguments: Vec<Expression<'src>>,
    pub span: Span,
    pub description: Option<FuncId>,
}

impl<'src> FunctionCall<'src> {
    pub fn new(name: &'src str, arguments: Vec<Expression<'src>>, span: Span) -> Self {
        Self {
            name,
            arguments,
            span,
            description: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BinaryOperation<'src> {
    pub op: BinaryOperator,
    pub lhs: Box<Expression<'src>>,
    pub rhs: Box<Expression<'src>>,
}

#[derive(Clone, Debug)]
pub struct Assign<'src> {
    pub lhs: Variable<'src>,
    pub rhs: Box<Expression<'src>>,
}

// Expression nodes
#[derive(Clone, Debug)]
pub enum Expression<'src> {
    NumberLiteral(NumberLiteral),
    Variable(Variable<'src>),
    FunctionCall(FunctionCall<'src>),
    BinaryOperation(BinaryOperation<'src>),
    Assign(Assign<'src>),
}

impl<'src> Expression<'src> {
    pub fn number(value: NumberLiteralValue) -> Self {
        Expression::NumberLiteral(NumberLiteral { value })
    }

    pub fn binary(op: BinaryOperator, lhs: Expression<'src>, rhs: Expression<'src>) -> Self {
        Expression::BinaryOperation(BinaryOperation {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn assign(lhs: Variable<'src>, rhs: Expression<'src>) -> Self {
        Expression::Assign(Assign {
            lhs,
            rhs: Box::new(rhs),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ReturnStatement<'src> {
    pub expression: Option<Expression<'src>>,
}

/// `"=rsi"(str)`: load `str` into `rsi` before the user block runs.
#[derive(Clone, Debug)]
pub struct BindingRequest<'src> {
    pub register: GpRegister,
    pub variable: Variable<'src>,
}

#[derive(Clone, Debug)]
pub struct InlineAsmStatement<'src> {
    pub asm_block: String,
    pub requests: Vec<BindingRequest<'src>>,
}

#[derive(Clone, Debug)]
pub struct Declaration<'src> {
    pub ty: Type<'src>,
    pub variable: Variable<'src>,
    pub initializer: Option<Expression<'src>>,
}

#[derive(Clone, Debug)]
pub enum Instruction<'src> {
    Return(ReturnStatement<'src>),
    InlineAsm(InlineAsmStatement<'src>),
    Declaration(Declaration<'src>),
    Expression(Expression<'src>),
}

#[derive(Clone, Debug)]
pub struct CodeBlock<'src> {
    pub statements: Vec<Statement<'src>>,
    /// Scope the block's declarations live in, set by decoration
    pub scope: Option<ScopeId>,
    /// Stack bytes declared directly in this block, released when it ends
    pub local_bytes: u32,
}

impl<'src> CodeBlock<'src> {
    pub fn new(statements: Vec<Statement<'src>>) -> Self {
        Self {
            statements,
            scope: None,
            local_bytes: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConditionalStatement<'src> {
    pub condition: Expression<'src>,
    pub if_body: CodeBlock<'src>,
    pub else_body: Option<CodeBlock<'src>>,
}

#[derive(Clone, Debug)]
pub struct WhileStatement<'src> {
    pub condition: Expression<'src>,
    pub body: CodeBlock<'src>,
}

#[derive(Clone, Debug)]
pub struct DoStatement<'src> {
    pub condition: Expression<'src>,
    pub body: CodeBlock<'src>,
}

#[derive(Clone, Debug)]
pub struct ForStatement<'src> {
    pub init: Declaration<'src>,
    pub condition: Option<Expression<'src>>,
    pub increment: Option<Expression<'src>>,
    pub body: CodeBlock<'src>,
    /// Scope shared by the init declaration, condition, increment and body
    pub scope: Option<ScopeId>,
    pub init_bytes: u32,
}

// Statement nodes
#[derive(Clone, Debug)]
pub enum Statement<'src> {
    Instruction(Instruction<'src>),
    Conditional(ConditionalStatement<'src>),
    CodeBlock(CodeBlock<'src>),
    While(WhileStatement<'src>),
    Do(DoStatement<'src>),
    For(ForStatement<'src>),
}

#[derive(Clone, Debug)]
pub struct FunctionParameter<'src> {
    pub ty: Type<'src>,
    /// Prototypes may leave parameters unnamed
    pub variable: Option<Variable<'src>>,
}

#[derive(Clone, Debug)]
pub struct FunctionDeclaration<'src> {
    pub is_extern: bool,
    pub return_type: Type<'src>,
    pub name: &'src str,
    pub span: Span,
    pub parameters: Vec<FunctionParameter<'src>>,
    pub description: Option<FuncId>,
}

#[derive(Clone, Debug)]
pub struct Function<'src> {
    pub return_type: Type<'src>,
    pub name: &'src str,
    pub span: Span,
    pub parameters: Vec<FunctionParameter<'src>>,
    pub body: CodeBlock<'src>,
    pub description: Option<FuncId>,
    pub scope: Option<ScopeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Attribute<'src> {
    pub ty: Type<'src>,
    pub name: &'src str,
}

#[derive(Clone, Debug)]
pub struct Method<'src> {
    pub return_type: Type<'src>,
    pub name: &'src str,
    pub parameters: Vec<FunctionParameter<'src>>,
    pub body: CodeBlock<'src>,
}

#[derive(Clone, Debug)]
pub struct Class<'src> {
    pub name: &'src str,
    pub span: Span,
    pub attributes: Vec<(Attribute<'src>, Visibility)>,
    pub methods: Vec<(Method<'src>, Visibility)>,
}

// Translation unit
#[derive(Clone, Debug, Default)]
pub struct TranslationUnit<'src> {
    pub function_declarations: Vec<FunctionDeclaration<'src>>,
    pub functions: Vec<Function<'src>>,
    pub classes: Vec<Class<'src>>,
}
