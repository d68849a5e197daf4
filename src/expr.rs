//! Grammar-based expression generation.
//!
//! Expressions are generated top-down through the Java precedence layers
//! (assignment, `||`, `&&`, equality, relational, additive, multiplicative,
//! unary, postfix, primary). A layer either builds its operator, with operands
//! generated one complexity level deeper, or delegates to the next layer.
//!
//! Every expression returned from [`ExprGenerator::generate`] has exactly the
//! requested type. When the primary layer cannot produce a matching node the
//! postfix layer falls back to a literal.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, Expression, LiteralValue, UnaryOp};
use crate::error::ConfigError;
use crate::scope::AccessContext;
use crate::settings::{check_cap, check_probability};
use crate::symbols::{ClassDecl, FieldDecl, MethodDecl, Parameter, Type, find_class};
use crate::universe::{MAX_ARRAY_DIMS, TypeUniverse, array_dims};

// Cumulative thresholds of the primary production.
const PRIMARY_LITERAL: f64 = 0.3;
const PRIMARY_NEW_OBJECT: f64 = 0.4;
const PRIMARY_NEW_ARRAY: f64 = 0.5;
const PRIMARY_SYMBOL: f64 = 0.7;
const PRIMARY_INVOCATION: f64 = 0.8;
const PRIMARY_THIS: f64 = 0.9;

/// Configuration for expression generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExprConfig {
    /// Probability of `a || b` for a boolean request.
    pub logical_or_probability: f64,
    /// Probability of `a && b` for a boolean request.
    pub logical_and_probability: f64,
    /// Probability of `a == b` / `a != b` for a boolean request.
    pub equality_probability: f64,
    /// Chance to wrap the equality operand type in an array, retried up to
    /// `max_equality_array_wraps` times.
    pub equality_array_probability: f64,
    pub max_equality_array_wraps: usize,
    /// Probability of `a < b` and friends for a boolean request.
    pub relational_probability: f64,
    /// Probability of `a + b` / `a - b` for an int request.
    pub additive_probability: f64,
    /// Probability of `a * b`, `a / b` or `a % b` for an int request.
    pub multiplicative_probability: f64,
    /// Probability of `-a` / `!a`.
    pub unary_probability: f64,
    /// Above this complexity the postfix layer only produces literals.
    pub max_complexity: usize,
    /// Above this complexity the primary layer only produces literals.
    pub primary_literal_complexity: usize,
    /// Maximum number of chained member and index accesses.
    pub max_postfix_chain: usize,
}

impl Default for ExprConfig {
    fn default() -> Self {
        Self {
            logical_or_probability: 0.15,
            logical_and_probability: 0.09,
            equality_probability: 0.08,
            equality_array_probability: 0.05,
            max_equality_array_wraps: 2,
            relational_probability: 0.15,
            additive_probability: 0.2,
            multiplicative_probability: 0.1,
            unary_probability: 0.2,
            max_complexity: 10,
            primary_literal_complexity: 8,
            max_postfix_chain: 8,
        }
    }
}

impl ExprConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("expr.logical_or_probability", self.logical_or_probability)?;
        check_probability("expr.logical_and_probability", self.logical_and_probability)?;
        check_probability("expr.equality_probability", self.equality_probability)?;
        check_probability(
            "expr.equality_array_probability",
            self.equality_array_probability,
        )?;
        check_probability("expr.relational_probability", self.relational_probability)?;
        check_probability("expr.additive_probability", self.additive_probability)?;
        check_probability(
            "expr.multiplicative_probability",
            self.multiplicative_probability,
        )?;
        check_probability("expr.unary_probability", self.unary_probability)?;
        check_cap("expr.max_complexity", self.max_complexity, MAX_COMPLEXITY_CAP)?;
        check_cap(
            "expr.max_postfix_chain",
            self.max_postfix_chain,
            MAX_POSTFIX_CHAIN_CAP,
        )?;
        check_cap(
            "expr.max_equality_array_wraps",
            self.max_equality_array_wraps,
            MAX_ARRAY_DIMS,
        )?;
        if self.primary_literal_complexity > self.max_complexity {
            return Err(ConfigError::PrimaryCeilingAboveMax {
                primary: self.primary_literal_complexity,
                max: self.max_complexity,
            });
        }
        Ok(())
    }
}

/// Highest accepted `max_complexity`. Expression size is exponential in it.
pub const MAX_COMPLEXITY_CAP: usize = 16;

/// Highest accepted `max_postfix_chain`.
pub const MAX_POSTFIX_CHAIN_CAP: usize = 16;

/// Build a binary node typed with the operator's result type.
pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty: op.result_type(),
    }
}

/// A member of a class usable in an access chain.
#[derive(Clone, Copy)]
enum Member<'c> {
    Field(&'c FieldDecl),
    Method(&'c MethodDecl),
}

/// Expression generator.
pub struct ExprGenerator<'a, R> {
    rng: &'a mut R,
    config: &'a ExprConfig,
    universe: &'a TypeUniverse,
    classes: &'a [ClassDecl],
}

impl<'a, R: Rng> ExprGenerator<'a, R> {
    pub fn new(
        rng: &'a mut R,
        config: &'a ExprConfig,
        universe: &'a TypeUniverse,
        classes: &'a [ClassDecl],
    ) -> Self {
        Self {
            rng,
            config,
            universe,
            classes,
        }
    }

    /// Generate an expression of exactly type `ty`.
    pub fn generate(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        self.assignment(ctx, ty)
    }

    /// Whether a layer with the given probability builds its operator here.
    fn gate(&mut self, ctx: &AccessContext<'_>, probability: f64) -> bool {
        ctx.complexity() <= self.config.max_complexity && self.rng.gen_bool(probability)
    }

    // -----------------------------------------------------------------------
    // Operator layers
    // -----------------------------------------------------------------------

    /// `location = value`, or the logical-or expression unchanged.
    pub fn assignment(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        let expr = self.logical_or(ctx, ty);
        if !expr.is_assignable() {
            return expr;
        }
        let complexity = ctx.complexity();
        if self.rng.gen_range(0..complexity.max(1)) >= complexity / 3 + 1 {
            return expr;
        }
        let target_ty = expr.ty().clone();
        let value = self.assignment(&ctx.descend(), &target_ty);
        Expression::Assignment {
            target: Box::new(expr),
            value: Box::new(value),
            ty: target_ty,
        }
    }

    pub fn logical_or(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::BOOLEAN || !self.gate(ctx, self.config.logical_or_probability) {
            return self.logical_and(ctx, ty);
        }
        let inner = ctx.descend();
        let left = self.logical_or(&inner, ty);
        let right = self.logical_and(&inner, ty);
        binary(BinaryOp::Or, left, right)
    }

    pub fn logical_and(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::BOOLEAN || !self.gate(ctx, self.config.logical_and_probability) {
            return self.equality(ctx, ty);
        }
        let inner = ctx.descend();
        let left = self.logical_and(&inner, ty);
        let right = self.equality(&inner, ty);
        binary(BinaryOp::And, left, right)
    }

    /// Both operands share one type drawn from the field types, sometimes
    /// wrapped in an array.
    pub fn equality(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::BOOLEAN || !self.gate(ctx, self.config.equality_probability) {
            return self.relational(ctx, ty);
        }
        let mut operand_ty = self.universe.random_field_type(self.rng);
        for _ in 0..self.config.max_equality_array_wraps {
            if !self.rng.gen_bool(self.config.equality_array_probability) {
                break;
            }
            operand_ty = operand_ty.array_of(array_dims(self.rng));
        }
        let op = BinaryOp::EQUALITY[self.rng.gen_range(0..BinaryOp::EQUALITY.len())];
        let inner = ctx.descend();
        let left = self.equality(&inner, &operand_ty);
        let right = self.relational(&inner, &operand_ty);
        binary(op, left, right)
    }

    pub fn relational(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::BOOLEAN || !self.gate(ctx, self.config.relational_probability) {
            return self.additive(ctx, ty);
        }
        let op = BinaryOp::RELATIONAL[self.rng.gen_range(0..BinaryOp::RELATIONAL.len())];
        let inner = ctx.descend();
        let left = self.relational(&inner, &Type::INT);
        let right = self.additive(&inner, &Type::INT);
        binary(op, left, right)
    }

    pub fn additive(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::INT || !self.gate(ctx, self.config.additive_probability) {
            return self.multiplicative(ctx, ty);
        }
        let op = BinaryOp::ADDITIVE[self.rng.gen_range(0..BinaryOp::ADDITIVE.len())];
        let inner = ctx.descend();
        let left = self.additive(&inner, &Type::INT);
        let right = self.multiplicative(&inner, &Type::INT);
        binary(op, left, right)
    }

    pub fn multiplicative(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if *ty != Type::INT || !self.gate(ctx, self.config.multiplicative_probability) {
            return self.unary(ctx, ty);
        }
        let op = BinaryOp::MULTIPLICATIVE[self.rng.gen_range(0..BinaryOp::MULTIPLICATIVE.len())];
        let inner = ctx.descend();
        let left = self.multiplicative(&inner, &Type::INT);
        let right = self.unary(&inner, &Type::INT);
        binary(op, left, right)
    }

    /// `-x` for int, `!x` for boolean.
    pub fn unary(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        let op = if *ty == Type::INT {
            UnaryOp::Neg
        } else if *ty == Type::BOOLEAN {
            UnaryOp::Not
        } else {
            return self.postfix(ctx, ty);
        };
        if !self.gate(ctx, self.config.unary_probability) {
            return self.postfix(ctx, ty);
        }
        let operand = self.unary(&ctx.descend(), ty);
        Expression::Unary {
            op,
            operand: Box::new(operand),
            ty: ty.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Postfix and primary
    // -----------------------------------------------------------------------

    /// A primary expression, repaired to type `ty` by chained accesses or
    /// replaced by a literal.
    pub fn postfix(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Expression {
        if ctx.complexity() > self.config.max_complexity {
            return self.literal(ty);
        }
        let Some(expr) = self.primary(ctx, ty) else {
            tracing::trace!(%ty, "no primary candidate, using literal");
            return self.literal(ty);
        };
        if expr.ty() == ty {
            return expr;
        }
        if expr.ty().is_void() || expr.ty().is_primitive() {
            return self.literal(ty);
        }
        match self.postfix_chain(expr, &ctx.descend(), ty) {
            Some(expr) => expr,
            None => {
                tracing::trace!(%ty, "access chain missed, using literal");
                self.literal(ty)
            }
        }
    }

    /// Index arrays and follow members from `target` until the type is `ty`.
    fn postfix_chain(
        &mut self,
        target: Expression,
        ctx: &AccessContext<'_>,
        ty: &Type,
    ) -> Option<Expression> {
        let mut current = target;
        for _ in 0..self.config.max_postfix_chain {
            if current.ty() == ty {
                return Some(current);
            }
            let current_ty = current.ty().clone();
            current = if current_ty.can_index_into(ty) {
                let component = current_ty.component()?;
                let index = self.generate(ctx, &Type::INT);
                Expression::ArrayRead {
                    target: Box::new(current),
                    index: Box::new(index),
                    ty: component,
                }
            } else if let Type::Class(name) = &current_ty {
                self.member_access(current, name, ctx, ty)?
            } else {
                return None;
            };
        }
        (current.ty() == ty).then_some(current)
    }

    /// Read a field or call a non-void method of `target` that leads to `ty`.
    fn member_access(
        &mut self,
        target: Expression,
        class_name: &str,
        ctx: &AccessContext<'_>,
        ty: &Type,
    ) -> Option<Expression> {
        let class = find_class(self.classes, class_name)?;
        let fields = class
            .fields
            .iter()
            .filter(|f| f.ty.is_assignable_to(ty))
            .map(Member::Field);
        let methods = class
            .methods
            .iter()
            .filter(|m| !m.is_static && m.return_type.is_assignable_to(ty))
            .map(Member::Method);
        let members: Vec<Member<'a>> = fields.chain(methods).collect();
        if members.is_empty() {
            return None;
        }
        let access = match members[self.rng.gen_range(0..members.len())] {
            Member::Field(field) => Expression::FieldRead {
                target: Some(Box::new(target)),
                field: field.name.clone(),
                ty: field.ty.clone(),
            },
            Member::Method(method) => Expression::Invocation {
                target: Some(Box::new(target)),
                method: method.name.clone(),
                args: self.arguments(ctx, &method.params),
                ty: method.return_type.clone(),
            },
        };
        Some(access)
    }

    /// A primary expression, preferably of type `ty`. `None` when the drawn
    /// branch has nothing to offer.
    pub fn primary(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Option<Expression> {
        let r: f64 = self.rng.gen_range(0.0..1.0);
        if r < PRIMARY_LITERAL || ctx.complexity() > self.config.primary_literal_complexity {
            return Some(self.literal(ty));
        }
        if r < PRIMARY_NEW_OBJECT && ty.is_class() {
            return Some(Expression::NewObject { ty: ty.clone() });
        }
        if r < PRIMARY_NEW_ARRAY && ty.is_array() {
            let dim = self.generate(&ctx.descend(), &Type::INT);
            return Some(Expression::NewArray {
                ty: ty.clone(),
                dim: Box::new(dim),
            });
        }
        if r < PRIMARY_SYMBOL {
            return self.symbol_read(ctx, ty);
        }
        if r < PRIMARY_INVOCATION {
            return self.invocation(ctx, ty);
        }
        if r < PRIMARY_THIS {
            return ctx
                .receiver()
                .map(|class| Expression::This { ty: class.reference() });
        }
        Some(self.generate(&ctx.descend(), ty))
    }

    /// Read a visible variable, preferring ones that can produce `ty`.
    pub fn symbol_read(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Option<Expression> {
        let candidates = ctx.candidates_for(ty);
        if candidates.is_empty() {
            return None;
        }
        let var = candidates[self.rng.gen_range(0..candidates.len())];
        Some(var.read())
    }

    /// Call a method of the implicit receiver, preferring ones whose return
    /// type can produce `ty`. `None` in a static context or without methods.
    pub fn invocation(&mut self, ctx: &AccessContext<'_>, ty: &Type) -> Option<Expression> {
        let class = ctx.receiver()?;
        let instance: Vec<&MethodDecl> = class.methods.iter().filter(|m| !m.is_static).collect();
        if instance.is_empty() {
            return None;
        }
        let typed: Vec<&MethodDecl> = instance
            .iter()
            .copied()
            .filter(|m| m.return_type.is_assignable_to(ty))
            .collect();
        let pool = if typed.is_empty() { instance } else { typed };
        let method = pool[self.rng.gen_range(0..pool.len())];
        let args = self.arguments(ctx, &method.params);
        Some(Expression::Invocation {
            target: None,
            method: method.name.clone(),
            args,
            ty: method.return_type.clone(),
        })
    }

    fn arguments(&mut self, ctx: &AccessContext<'_>, params: &[Parameter]) -> Vec<Expression> {
        let inner = ctx.descend();
        params
            .iter()
            .map(|p| self.generate(&inner, &p.ty))
            .collect()
    }

    /// A random literal of type `ty`; `null` for class and array types.
    pub fn literal(&mut self, ty: &Type) -> Expression {
        let value = if *ty == Type::INT {
            LiteralValue::Int(self.rng.gen_range(i32::MIN..=i32::MAX))
        } else if *ty == Type::BOOLEAN {
            LiteralValue::Boolean(self.rng.gen_bool(0.5))
        } else {
            LiteralValue::Null
        };
        Expression::Literal {
            value,
            ty: ty.clone(),
        }
    }
}
