//! Statement and expression trees of synthesized method bodies.
//!
//! Every expression node carries its static type, so consumers never have to
//! re-run type inference.

use crate::symbols::Type;

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A braced sequence of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// The final statement, if any.
    pub fn last(&self) -> Option<&Statement> {
        self.statements.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `;`
    Empty,
    /// `T name;` or `T name = init;`
    LocalVar {
        name: String,
        ty: Type,
        init: Option<Expression>,
    },
    /// `if (condition) then else otherwise`. A missing `then` renders as `;`.
    If {
        condition: Expression,
        then_branch: Option<Box<Statement>>,
        else_branch: Box<Statement>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    /// An expression evaluated for its side effects.
    Expression(Expression),
    Return(Option<Expression>),
    Block(Block),
}

impl Statement {
    /// Whether this statement opens a nested scope or branch.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Statement::If { .. } | Statement::While { .. } | Statement::Block(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i32),
    Boolean(bool),
    /// The only literal of class and array types.
    Null,
}

/// Where a named variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Local,
    Param,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub const EQUALITY: [BinaryOp; 2] = [BinaryOp::Eq, BinaryOp::Ne];
    pub const RELATIONAL: [BinaryOp; 4] = [BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge];
    pub const ADDITIVE: [BinaryOp; 2] = [BinaryOp::Add, BinaryOp::Sub];
    pub const MULTIPLICATIVE: [BinaryOp; 3] = [BinaryOp::Mul, BinaryOp::Div, BinaryOp::Rem];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    /// Type of the operator's result.
    pub fn result_type(&self) -> Type {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                Type::INT
            }
            _ => Type::BOOLEAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal {
        value: LiteralValue,
        ty: Type,
    },
    /// Read of a local or parameter.
    VariableRead {
        name: String,
        kind: VarKind,
        ty: Type,
    },
    /// Field access. `target == None` reads through the implicit receiver.
    FieldRead {
        target: Option<Box<Expression>>,
        field: String,
        ty: Type,
    },
    ArrayRead {
        target: Box<Expression>,
        index: Box<Expression>,
        ty: Type,
    },
    /// Method call. `target == None` calls through the implicit receiver.
    Invocation {
        target: Option<Box<Expression>>,
        method: String,
        args: Vec<Expression>,
        ty: Type,
    },
    This {
        ty: Type,
    },
    /// `new T()`
    NewObject {
        ty: Type,
    },
    /// `new E[dim][]...` where `ty` is the full array type.
    NewArray {
        ty: Type,
        dim: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        ty: Type,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: Type,
    },
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
        ty: Type,
    },
}

impl Expression {
    /// The default literal of `ty`: `0`, `false` or `null`.
    pub fn default_literal(ty: &Type) -> Self {
        let value = match ty {
            t if *t == Type::INT => LiteralValue::Int(0),
            t if *t == Type::BOOLEAN => LiteralValue::Boolean(false),
            _ => LiteralValue::Null,
        };
        Expression::Literal {
            value,
            ty: ty.clone(),
        }
    }

    /// Static type of the expression.
    pub fn ty(&self) -> &Type {
        match self {
            Expression::Literal { ty, .. }
            | Expression::VariableRead { ty, .. }
            | Expression::FieldRead { ty, .. }
            | Expression::ArrayRead { ty, .. }
            | Expression::Invocation { ty, .. }
            | Expression::This { ty }
            | Expression::NewObject { ty }
            | Expression::NewArray { ty, .. }
            | Expression::Unary { ty, .. }
            | Expression::Binary { ty, .. }
            | Expression::Assignment { ty, .. } => ty,
        }
    }

    /// Whether the expression denotes a storage location.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expression::VariableRead { .. }
                | Expression::FieldRead { .. }
                | Expression::ArrayRead { .. }
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal { .. })
    }
}
