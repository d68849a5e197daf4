//! Whole-program checks: every synthesized program is re-checked for type
//! soundness, scoping and declaration rules.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;

use reforest::ast::{BinaryOp, Block, Expression, LiteralValue, Statement, UnaryOp, VarKind};
use reforest::profile::get_profile;
use reforest::symbols::{ClassDecl, MethodDecl, Parameter, Program, Type};
use reforest::{Settings, render_program, synthesize_program};

fn small() -> Settings {
    get_profile("small").unwrap()
}

fn synthesize(settings: &Settings, seed: u64) -> Program {
    synthesize_program(settings, &mut StdRng::seed_from_u64(seed)).unwrap()
}

// ----- Checker -----

/// Re-checks one method body against the declarations of its program.
struct Checker<'p> {
    program: &'p Program,
    class: &'p ClassDecl,
    method: &'p MethodDecl,
}

type Locals = Vec<(String, Type)>;

impl<'p> Checker<'p> {
    fn is_static(&self) -> bool {
        self.method.is_static
    }

    /// Parameters the body may read. The entry point's `args` is hidden.
    fn params(&self) -> &'p [Parameter] {
        if self.is_static() {
            &[]
        } else {
            &self.method.params
        }
    }

    fn where_(&self) -> String {
        format!("{}.{}", self.class.name, self.method.name)
    }

    fn check_type(&self, ty: &Type) {
        match ty {
            Type::Primitive(_) => {}
            Type::Class(name) => assert!(
                self.program.class(name).is_some(),
                "{}: unknown class {name}",
                self.where_()
            ),
            Type::Array(element, dims) => {
                assert!(*dims >= 1);
                assert!(!element.is_void() && !element.is_array());
                self.check_type(element);
            }
        }
    }

    fn check_body(&self) {
        let body = self.method.body.as_ref().expect("method has a body");
        let mut locals = Locals::new();
        self.check_block(body, &mut locals);
        if !self.method.return_type.is_void() {
            assert!(
                matches!(body.last(), Some(Statement::Return(Some(_)))),
                "{}: missing final return",
                self.where_()
            );
        }
    }

    fn check_block(&self, block: &Block, locals: &mut Locals) {
        for stmt in &block.statements {
            self.check_statement(stmt, locals);
        }
    }

    fn check_bare(&self, stmt: &Statement, locals: &Locals) {
        assert!(
            !matches!(stmt, Statement::LocalVar { .. } | Statement::Return(_)),
            "{}: {stmt:?} in bare position",
            self.where_()
        );
        // A bare statement never leaks declarations.
        let mut scratch = locals.clone();
        self.check_statement(stmt, &mut scratch);
        assert_eq!(scratch.len(), locals.len());
    }

    fn check_statement(&self, stmt: &Statement, locals: &mut Locals) {
        match stmt {
            Statement::Empty => {}
            Statement::LocalVar { name, ty, init } => {
                assert!(!ty.is_void());
                self.check_type(ty);
                assert!(
                    locals.iter().all(|(n, _)| n != name)
                        && self.params().iter().all(|p| &p.name != name),
                    "{}: local {name} shadows a visible variable",
                    self.where_()
                );
                if let Some(init) = init {
                    self.check_expr(init, locals, ty);
                }
                locals.push((name.clone(), ty.clone()));
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expr(condition, locals, &Type::BOOLEAN);
                if let Some(then) = then_branch {
                    assert!(
                        !matches!(then.as_ref(), Statement::Block(b) if b.is_empty()),
                        "empty then-block is not normalized"
                    );
                    self.check_bare(then, locals);
                }
                self.check_bare(else_branch, locals);
            }
            Statement::While { condition, body } => {
                self.check_expr(condition, locals, &Type::BOOLEAN);
                self.check_bare(body, locals);
            }
            Statement::Expression(expr) => {
                assert!(
                    matches!(
                        expr,
                        Expression::Invocation { .. } | Expression::Assignment { .. }
                    ),
                    "{}: expression statement {expr:?}",
                    self.where_()
                );
                self.check_expr(expr, locals, expr.ty());
            }
            Statement::Return(value) => match value {
                Some(expr) => self.check_expr(expr, locals, &self.method.return_type),
                None => assert!(self.method.return_type.is_void()),
            },
            Statement::Block(block) => {
                let mut inner = locals.clone();
                self.check_block(block, &mut inner);
            }
        }
    }

    fn class_of(&self, ty: &Type) -> &'p ClassDecl {
        match ty {
            Type::Class(name) => self
                .program
                .class(name)
                .unwrap_or_else(|| panic!("unknown class {name}")),
            other => panic!("{}: member access on {other}", self.where_()),
        }
    }

    fn check_expr(&self, expr: &Expression, locals: &Locals, expected: &Type) {
        assert_eq!(
            expr.ty(),
            expected,
            "{}: {expr:?} in a position of type {expected}",
            self.where_()
        );
        assert!(!expected.is_void() || matches!(expr, Expression::Invocation { .. }));
        match expr {
            Expression::Literal { value, ty } => match value {
                LiteralValue::Int(_) => assert_eq!(ty, &Type::INT),
                LiteralValue::Boolean(_) => assert_eq!(ty, &Type::BOOLEAN),
                LiteralValue::Null => assert!(ty.is_class() || ty.is_array()),
            },
            Expression::VariableRead { name, kind, ty } => {
                let found = match kind {
                    VarKind::Local => locals.iter().find(|(n, _)| n == name).map(|(_, t)| t),
                    VarKind::Param => self.params().iter().find(|p| &p.name == name).map(|p| &p.ty),
                };
                assert_eq!(found, Some(ty), "{}: {name} not in scope", self.where_());
            }
            Expression::FieldRead { target, field, ty } => {
                let class = match target {
                    Some(target) => {
                        self.check_expr(target, locals, target.ty());
                        self.class_of(target.ty())
                    }
                    None => {
                        assert!(!self.is_static(), "implicit field read in static body");
                        self.class
                    }
                };
                let decl = class.field(field).expect("field exists");
                assert_eq!(&decl.ty, ty);
            }
            Expression::ArrayRead { target, index, ty } => {
                self.check_expr(target, locals, target.ty());
                assert_eq!(target.ty().component().as_ref(), Some(ty));
                self.check_expr(index, locals, &Type::INT);
            }
            Expression::Invocation {
                target,
                method,
                args,
                ty,
            } => {
                let class = match target {
                    Some(target) => {
                        self.check_expr(target, locals, target.ty());
                        self.class_of(target.ty())
                    }
                    None => {
                        assert!(!self.is_static(), "implicit call in static body");
                        self.class
                    }
                };
                let decl = class.method(method).expect("method exists");
                assert!(!decl.is_static);
                assert_eq!(&decl.return_type, ty);
                assert_eq!(decl.params.len(), args.len());
                for (arg, param) in args.iter().zip(&decl.params) {
                    self.check_expr(arg, locals, &param.ty);
                }
            }
            Expression::This { ty } => {
                assert!(!self.is_static(), "`this` in static body");
                assert_eq!(ty, &self.class.reference());
            }
            Expression::NewObject { ty } => {
                assert!(ty.is_class());
                self.check_type(ty);
            }
            Expression::NewArray { ty, dim } => {
                assert!(ty.is_array());
                self.check_type(ty);
                self.check_expr(dim, locals, &Type::INT);
            }
            Expression::Unary { op, operand, ty } => {
                let operand_ty = match op {
                    UnaryOp::Neg => Type::INT,
                    UnaryOp::Not => Type::BOOLEAN,
                };
                assert_eq!(ty, &operand_ty);
                self.check_expr(operand, locals, &operand_ty);
            }
            Expression::Binary {
                op,
                left,
                right,
                ty,
            } => {
                assert_eq!(ty, &op.result_type());
                match op {
                    BinaryOp::Or | BinaryOp::And => {
                        self.check_expr(left, locals, &Type::BOOLEAN);
                        self.check_expr(right, locals, &Type::BOOLEAN);
                    }
                    BinaryOp::Eq | BinaryOp::Ne => {
                        assert!(!left.ty().is_void());
                        self.check_type(left.ty());
                        self.check_expr(left, locals, left.ty());
                        self.check_expr(right, locals, left.ty());
                    }
                    _ => {
                        self.check_expr(left, locals, &Type::INT);
                        self.check_expr(right, locals, &Type::INT);
                    }
                }
            }
            Expression::Assignment { target, value, ty } => {
                assert!(target.is_assignable(), "assignment to {target:?}");
                self.check_expr(target, locals, ty);
                self.check_expr(value, locals, ty);
            }
        }
    }
}

fn check_declarations(program: &Program) {
    let mut class_names = FxHashSet::default();
    for class in &program.classes {
        assert!(class_names.insert(&class.name), "duplicate class {}", class.name);

        let mut fields = FxHashSet::default();
        for field in &class.fields {
            assert!(fields.insert(&field.name), "duplicate field {}", field.name);
            assert!(!field.ty.is_void());
        }

        let mut methods = FxHashSet::default();
        for method in &class.methods {
            assert!(methods.insert(&method.name), "duplicate method {}", method.name);
            let mut params = FxHashSet::default();
            for param in &method.params {
                assert!(params.insert(&param.name), "duplicate parameter {}", param.name);
                assert!(!param.ty.is_void());
            }
        }
    }
}

fn check_program(program: &Program) {
    check_declarations(program);
    for (class, method) in program.methods() {
        let checker = Checker {
            program,
            class,
            method,
        };
        if !method.is_static {
            checker.check_type(&method.return_type);
            for param in &method.params {
                checker.check_type(&param.ty);
            }
            for field in &class.fields {
                checker.check_type(&field.ty);
            }
        }
        checker.check_body();
    }
}

// ----- Tests -----

#[test]
fn small_programs_are_well_typed() {
    let settings = small();
    for seed in 0..40 {
        check_program(&synthesize(&settings, seed));
    }
}

#[test]
fn default_programs_are_well_typed() {
    let settings = Settings::default();
    for seed in 0..5 {
        check_program(&synthesize(&settings, seed));
    }
}

#[test]
fn wide_programs_are_well_typed() {
    let settings = get_profile("wide").unwrap();
    for seed in 0..5 {
        check_program(&synthesize(&settings, seed));
    }
}

#[test]
fn array_heavy_programs_are_well_typed() {
    let settings = Settings {
        array_type_percentage: 0.9,
        ..small()
    };
    for seed in 0..20 {
        check_program(&synthesize(&settings, seed));
    }
}

#[test]
fn seed_42_is_reproducible() {
    let settings = small();
    let first = synthesize(&settings, 42);
    let second = synthesize(&settings, 42);
    assert_eq!(first, second);
    assert_eq!(render_program(&first), render_program(&second));
    assert!((1..=5).contains(&first.class_count()));
    for class in &first.classes {
        assert!(class.fields.len() + class.methods.len() <= 10 + 1);
    }

    let other = synthesize(&settings, 43);
    assert_ne!(render_program(&first), render_program(&other));
}

#[test]
fn rendered_program_declares_every_class() {
    let settings = small();
    let program = synthesize(&settings, 42);
    let source = render_program(&program);
    for class in &program.classes {
        assert!(source.contains(&format!("class {} {{", class.name)));
    }
    assert_eq!(
        source
            .matches("public static void main(java.lang.String[] args)")
            .count(),
        1
    );
}

#[test]
fn custom_word_list_drives_names() {
    let settings = Settings {
        words: vec!["ash".to_string(), "yew".to_string()],
        ..small()
    };
    let program = synthesize(&settings, 11);
    check_program(&program);
    for class in &program.classes {
        let lower = class.name.to_lowercase();
        let stripped = lower.trim_end_matches(|c: char| c.is_ascii_digit());
        assert!(
            stripped.replace("ash", "").replace("yew", "").is_empty(),
            "{} is not built from the word list",
            class.name
        );
    }
}
