//! Java source rendering of a synthesized [`Program`].
//!
//! Expressions are printed with the minimal parentheses Java precedence
//! requires. Members reached through the implicit receiver print as
//! `this.name`.

use std::fmt::Write as _;

use crate::ast::{BinaryOp, Block, Expression, LiteralValue, Statement};
use crate::symbols::{ClassDecl, FieldDecl, MethodDecl, Program};

/// Number of spaces per indentation level.
const INDENT_WIDTH: usize = 4;

// Binding strength, higher binds tighter.
const PREC_ASSIGN: u8 = 1;
const PREC_OR: u8 = 3;
const PREC_AND: u8 = 4;
const PREC_EQUALITY: u8 = 8;
const PREC_RELATIONAL: u8 = 9;
const PREC_ADDITIVE: u8 = 11;
const PREC_MULTIPLICATIVE: u8 = 12;
const PREC_UNARY: u8 = 13;
/// Array creation cannot be indexed or dereferenced without parentheses.
const PREC_NEW_ARRAY: u8 = 14;
const PREC_POSTFIX: u8 = 15;

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => PREC_OR,
        BinaryOp::And => PREC_AND,
        BinaryOp::Eq | BinaryOp::Ne => PREC_EQUALITY,
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => PREC_RELATIONAL,
        BinaryOp::Add | BinaryOp::Sub => PREC_ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => PREC_MULTIPLICATIVE,
    }
}

fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Assignment { .. } => PREC_ASSIGN,
        Expression::Binary { op, .. } => binary_precedence(*op),
        Expression::Unary { .. } => PREC_UNARY,
        Expression::Literal {
            value: LiteralValue::Int(v),
            ..
        } if *v < 0 => PREC_UNARY,
        Expression::NewArray { .. } => PREC_NEW_ARRAY,
        _ => PREC_POSTFIX,
    }
}

/// Render every class of `program` as Java source.
pub fn render_program(program: &Program) -> String {
    let mut emitter = JavaEmitter::new();
    for (i, class) in program.classes.iter().enumerate() {
        if i > 0 {
            emitter.out.push('\n');
        }
        emitter.class(class);
    }
    emitter.finish()
}

/// Render a single expression, as it would appear in a statement.
pub fn render_expression(expr: &Expression) -> String {
    let mut emitter = JavaEmitter::new();
    emitter.expr(expr, 0);
    emitter.finish()
}

/// Render a single statement at indentation level zero.
pub fn render_statement(stmt: &Statement) -> String {
    let mut emitter = JavaEmitter::new();
    emitter.statement(stmt);
    emitter.finish()
}

/// Accumulates Java source text.
pub struct JavaEmitter {
    out: String,
    /// Current indentation level (number of indent units, not spaces).
    indent: usize,
}

impl Default for JavaEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaEmitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line_start(&mut self) {
        for _ in 0..self.indent * INDENT_WIDTH {
            self.out.push(' ');
        }
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    pub fn class(&mut self, class: &ClassDecl) {
        self.line_start();
        let _ = writeln!(self.out, "class {} {{", class.name);
        self.indent += 1;
        for field in &class.fields {
            self.field(field);
        }
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 || !class.fields.is_empty() {
                self.out.push('\n');
            }
            self.method(method);
        }
        self.indent -= 1;
        self.line_start();
        self.out.push_str("}\n");
    }

    fn field(&mut self, field: &FieldDecl) {
        self.line_start();
        let _ = writeln!(self.out, "public {} {};", field.ty, field.name);
    }

    fn method(&mut self, method: &MethodDecl) {
        self.line_start();
        self.out.push_str("public ");
        if method.is_static {
            self.out.push_str("static ");
        }
        let _ = write!(self.out, "{} {}(", method.return_type, method.name);
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            let _ = write!(self.out, "{} {}", param.ty, param.name);
        }
        self.out.push(')');
        if !method.thrown.is_empty() {
            let _ = write!(self.out, " throws {}", method.thrown.join(", "));
        }
        self.out.push(' ');
        match &method.body {
            Some(body) => self.block(body),
            None => self.block(&Block::default()),
        }
        self.out.push('\n');
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    /// `{`, the statements one level deeper, then `}` without a newline.
    fn block(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in &block.statements {
            self.statement(stmt);
            self.out.push('\n');
        }
        self.indent -= 1;
        self.line_start();
        self.out.push('}');
    }

    /// Write one indented statement without a trailing newline.
    pub fn statement(&mut self, stmt: &Statement) {
        self.line_start();
        match stmt {
            Statement::Empty => self.out.push(';'),
            Statement::LocalVar { name, ty, init } => {
                let _ = write!(self.out, "{ty} {name}");
                if let Some(init) = init {
                    self.out.push_str(" = ");
                    self.expr(init, PREC_ASSIGN);
                }
                self.out.push(';');
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.out.push_str("if (");
                self.expr(condition, 0);
                self.out.push(')');
                self.branch(then_branch.as_deref());
                if matches!(then_branch.as_deref(), Some(Statement::Block(_))) {
                    self.out.push_str(" else");
                } else {
                    self.out.push('\n');
                    self.line_start();
                    self.out.push_str("else");
                }
                self.branch(Some(else_branch.as_ref()));
            }
            Statement::While { condition, body } => {
                self.out.push_str("while (");
                self.expr(condition, 0);
                self.out.push(')');
                self.branch(Some(body.as_ref()));
            }
            Statement::Expression(expr) => {
                self.expr(expr, 0);
                self.out.push(';');
            }
            Statement::Return(None) => self.out.push_str("return;"),
            Statement::Return(Some(expr)) => {
                self.out.push_str("return ");
                self.expr(expr, 0);
                self.out.push(';');
            }
            Statement::Block(block) => self.block(block),
        }
    }

    /// Body of `if`, `else` or `while`. Blocks stay on the same line.
    fn branch(&mut self, stmt: Option<&Statement>) {
        match stmt {
            Some(Statement::Block(block)) => {
                self.out.push(' ');
                self.block(block);
            }
            Some(other) => {
                self.out.push('\n');
                self.indent += 1;
                self.statement(other);
                self.indent -= 1;
            }
            None => self.out.push_str(" ;"),
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    /// Write `expr`, parenthesized when it binds looser than `min_prec`.
    pub fn expr(&mut self, expr: &Expression, min_prec: u8) {
        let parens = precedence(expr) < min_prec;
        if parens {
            self.out.push('(');
        }
        self.expr_inner(expr);
        if parens {
            self.out.push(')');
        }
    }

    fn expr_inner(&mut self, expr: &Expression) {
        match expr {
            Expression::Literal { value, .. } => match value {
                LiteralValue::Int(v) => {
                    let _ = write!(self.out, "{v}");
                }
                LiteralValue::Boolean(b) => {
                    let _ = write!(self.out, "{b}");
                }
                LiteralValue::Null => self.out.push_str("null"),
            },
            Expression::VariableRead { name, .. } => self.out.push_str(name),
            Expression::FieldRead { target, field, .. } => {
                self.receiver(target.as_deref());
                self.out.push('.');
                self.out.push_str(field);
            }
            Expression::ArrayRead { target, index, .. } => {
                self.expr(target, PREC_POSTFIX);
                self.out.push('[');
                self.expr(index, 0);
                self.out.push(']');
            }
            Expression::Invocation {
                target,
                method,
                args,
                ..
            } => {
                self.receiver(target.as_deref());
                self.out.push('.');
                self.out.push_str(method);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg, PREC_ASSIGN);
                }
                self.out.push(')');
            }
            Expression::This { .. } => self.out.push_str("this"),
            Expression::NewObject { ty } => {
                let _ = write!(self.out, "new {ty}()");
            }
            Expression::NewArray { ty, dim } => {
                let _ = write!(self.out, "new {}[", ty.element());
                self.expr(dim, 0);
                self.out.push(']');
                for _ in 1..ty.dims() {
                    self.out.push_str("[]");
                }
            }
            Expression::Unary { op, operand, .. } => {
                self.out.push_str(op.as_str());
                // Nested unary operators and negative literals get parentheses
                // so `-(-x)` never prints as `--x`.
                self.expr(operand, PREC_NEW_ARRAY);
            }
            Expression::Binary {
                op, left, right, ..
            } => {
                let prec = binary_precedence(*op);
                self.expr(left, prec);
                let _ = write!(self.out, " {} ", op.as_str());
                self.expr(right, prec + 1);
            }
            Expression::Assignment { target, value, .. } => {
                self.expr(target, PREC_POSTFIX);
                self.out.push_str(" = ");
                self.expr(value, PREC_ASSIGN);
            }
        }
    }

    /// Explicit target, or `this` for the implicit receiver.
    fn receiver(&mut self, target: Option<&Expression>) {
        match target {
            Some(target) => self.expr(target, PREC_POSTFIX),
            None => self.out.push_str("this"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{UnaryOp, VarKind};
    use crate::symbols::{Parameter, Type};

    fn int(v: i32) -> Expression {
        Expression::Literal {
            value: LiteralValue::Int(v),
            ty: Type::INT,
        }
    }

    fn var(name: &str, ty: Type) -> Expression {
        Expression::VariableRead {
            name: name.into(),
            kind: VarKind::Local,
            ty,
        }
    }

    fn bin(op: BinaryOp, l: Expression, r: Expression) -> Expression {
        crate::expr::binary(op, l, r)
    }

    fn neg(e: Expression) -> Expression {
        Expression::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(e),
            ty: Type::INT,
        }
    }

    #[test]
    fn left_associative_binary_needs_no_parens() {
        let e = bin(
            BinaryOp::Sub,
            bin(BinaryOp::Sub, var("a", Type::INT), var("b", Type::INT)),
            var("c", Type::INT),
        );
        assert_eq!(render_expression(&e), "a - b - c");
    }

    #[test]
    fn right_nested_binary_gets_parens() {
        let e = bin(
            BinaryOp::Sub,
            var("a", Type::INT),
            bin(BinaryOp::Sub, var("b", Type::INT), var("c", Type::INT)),
        );
        assert_eq!(render_expression(&e), "a - (b - c)");
    }

    #[test]
    fn looser_operand_gets_parens() {
        let e = bin(
            BinaryOp::Mul,
            bin(BinaryOp::Add, int(1), int(2)),
            int(3),
        );
        assert_eq!(render_expression(&e), "(1 + 2) * 3");
    }

    #[test]
    fn double_negation_never_merges() {
        assert_eq!(render_expression(&neg(neg(var("x", Type::INT)))), "-(-x)");
        assert_eq!(render_expression(&neg(int(-5))), "-(-5)");
        assert_eq!(render_expression(&neg(int(5))), "-5");
    }

    #[test]
    fn negative_literal_as_left_operand() {
        let e = bin(BinaryOp::Add, int(-1), int(2));
        assert_eq!(render_expression(&e), "-1 + 2");
    }

    #[test]
    fn new_array_as_index_target_is_parenthesized() {
        let ty = Type::INT.array_of(2);
        let e = Expression::ArrayRead {
            target: Box::new(Expression::NewArray {
                ty: ty.clone(),
                dim: Box::new(int(3)),
            }),
            index: Box::new(int(0)),
            ty: Type::INT.array_of(1),
        };
        assert_eq!(render_expression(&e), "(new int[3][])[0]");
    }

    #[test]
    fn implicit_receiver_prints_this() {
        let field = Expression::FieldRead {
            target: None,
            field: "height".into(),
            ty: Type::INT,
        };
        let call = Expression::Invocation {
            target: None,
            method: "grow".into(),
            args: vec![int(1), field.clone()],
            ty: Type::BOOLEAN,
        };
        assert_eq!(render_expression(&field), "this.height");
        assert_eq!(render_expression(&call), "this.grow(1, this.height)");
    }

    #[test]
    fn chained_access_on_new_object() {
        let e = Expression::FieldRead {
            target: Some(Box::new(Expression::NewObject {
                ty: Type::class("Oak"),
            })),
            field: "rings".into(),
            ty: Type::INT,
        };
        assert_eq!(render_expression(&e), "new Oak().rings");
    }

    #[test]
    fn assignment_is_right_associative() {
        let e = Expression::Assignment {
            target: Box::new(var("a", Type::INT)),
            value: Box::new(Expression::Assignment {
                target: Box::new(var("b", Type::INT)),
                value: Box::new(int(1)),
                ty: Type::INT,
            }),
            ty: Type::INT,
        };
        assert_eq!(render_expression(&e), "a = b = 1");

        let nested = bin(BinaryOp::Add, e, int(2));
        assert_eq!(render_expression(&nested), "(a = b = 1) + 2");
    }

    #[test]
    fn if_without_then_renders_empty_statement() {
        let stmt = Statement::If {
            condition: Expression::Literal {
                value: LiteralValue::Boolean(true),
                ty: Type::BOOLEAN,
            },
            then_branch: None,
            else_branch: Box::new(Statement::Empty),
        };
        assert_eq!(render_statement(&stmt), "if (true) ;\nelse\n    ;");
    }

    #[test]
    fn if_with_block_branches() {
        let stmt = Statement::If {
            condition: var("flag", Type::BOOLEAN),
            then_branch: Some(Box::new(Statement::Block(Block::new(vec![
                Statement::Return(None),
            ])))),
            else_branch: Box::new(Statement::Block(Block::default())),
        };
        assert_eq!(
            render_statement(&stmt),
            "if (flag) {\n    return;\n} else {\n}"
        );
    }

    #[test]
    fn renders_class_with_members() {
        let mut class = ClassDecl::new("Oak");
        class.fields.push(FieldDecl {
            name: "rings".into(),
            ty: Type::INT.array_of(2),
        });
        class.methods.push(MethodDecl {
            name: "grow".into(),
            return_type: Type::BOOLEAN,
            params: vec![
                Parameter {
                    name: "amount".into(),
                    ty: Type::INT,
                },
                Parameter {
                    name: "other".into(),
                    ty: Type::class("Elm"),
                },
            ],
            thrown: vec!["Storm".into(), "Drought".into()],
            is_static: false,
            body: Some(Block::new(vec![
                Statement::LocalVar {
                    name: "tall".into(),
                    ty: Type::BOOLEAN,
                    init: None,
                },
                Statement::Return(Some(var("tall", Type::BOOLEAN))),
            ])),
        });
        let program = Program {
            classes: vec![class],
        };
        let expected = "\
class Oak {
    public int[][] rings;

    public boolean grow(int amount, Elm other) throws Storm, Drought {
        boolean tall;
        return tall;
    }
}
";
        assert_eq!(render_program(&program), expected);
    }

    #[test]
    fn renders_static_entry_point() {
        let mut class = ClassDecl::new("App");
        class.methods.push(MethodDecl {
            name: "main".into(),
            return_type: Type::VOID,
            params: vec![crate::assembler::entry_point_param()],
            thrown: Vec::new(),
            is_static: true,
            body: Some(Block::default()),
        });
        let program = Program {
            classes: vec![class],
        };
        assert_eq!(
            render_program(&program),
            "class App {\n    public static void main(java.lang.String[] args) {\n    }\n}\n"
        );
    }
}
