//! Statement and block generation.
//!
//! Statement kinds are drawn from the weighted sampler. Two positions exist:
//! - block position: any kind, declared locals stay visible to later siblings
//! - bare position (`if`/`while` bodies): no declarations, no `return`
//!
//! Disallowed draws are resampled a bounded number of times, after which an
//! empty statement is produced.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ast::{Block, Expression, Statement};
use crate::error::ConfigError;
use crate::expr::ExprGenerator;
use crate::names::IdentGen;
use crate::scope::{AccessContext, LocalVar};
use crate::settings::{Settings, StatementKind, check_cap, check_probability};
use crate::symbols::{ClassDecl, Type};
use crate::universe::TypeUniverse;
use crate::weighted::WeightedChoice;

/// Highest accepted `max_statement_complexity`. Nested statement count is
/// exponential in it.
pub const MAX_STATEMENT_COMPLEXITY_CAP: usize = 8;

/// Highest accepted `max_resample_attempts`.
pub const MAX_RESAMPLE_ATTEMPTS_CAP: usize = 256;

/// Configuration for statement generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// Probability that a local declaration has an initializer.
    pub initializer_probability: f64,
    /// Probability that an expression statement is a method call rather than
    /// an assignment.
    pub invocation_probability: f64,
    /// `if`, `while` and nested blocks are not generated at or above this
    /// complexity.
    pub max_statement_complexity: usize,
    /// Draws per statement (and name attempts per local) before giving up.
    pub max_resample_attempts: usize,
}

impl Default for StmtConfig {
    fn default() -> Self {
        Self {
            initializer_probability: 0.7,
            invocation_probability: 0.6,
            max_statement_complexity: 6,
            max_resample_attempts: 16,
        }
    }
}

impl StmtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("stmt.initializer_probability", self.initializer_probability)?;
        check_probability("stmt.invocation_probability", self.invocation_probability)?;
        check_cap(
            "stmt.max_statement_complexity",
            self.max_statement_complexity,
            MAX_STATEMENT_COMPLEXITY_CAP,
        )?;
        check_cap(
            "stmt.max_resample_attempts",
            self.max_resample_attempts,
            MAX_RESAMPLE_ATTEMPTS_CAP,
        )?;
        Ok(())
    }
}

/// Statement generator for method bodies.
pub struct StmtGenerator<'a, R> {
    rng: &'a mut R,
    settings: &'a Settings,
    sampler: &'a WeightedChoice<StatementKind>,
    universe: &'a TypeUniverse,
    classes: &'a [ClassDecl],
}

impl<'a, R: Rng> StmtGenerator<'a, R> {
    pub fn new(
        rng: &'a mut R,
        settings: &'a Settings,
        sampler: &'a WeightedChoice<StatementKind>,
        universe: &'a TypeUniverse,
        classes: &'a [ClassDecl],
    ) -> Self {
        Self {
            rng,
            settings,
            sampler,
            universe,
            classes,
        }
    }

    fn config(&self) -> &'a StmtConfig {
        &self.settings.stmt
    }

    fn expr(&mut self) -> ExprGenerator<'_, R> {
        ExprGenerator::new(self.rng, &self.settings.expr, self.universe, self.classes)
    }

    /// Generate a block.
    ///
    /// When `ctx` is a top-level method context (complexity 0) with a
    /// non-void return type, the block ends with a `return`.
    pub fn block(&mut self, ctx: &AccessContext<'_>) -> Block {
        let mut inner = ctx.enter_block();
        let count = self.rng.gen_range(0..=self.settings.max_statements_per_block);
        let mut statements = Vec::with_capacity(count + 1);
        for _ in 0..count {
            statements.push(self.block_statement(&mut inner));
        }
        if ctx.complexity() == 0 && !ctx.return_type().is_void() {
            statements.push(self.return_statement(&inner));
        }
        Block::new(statements)
    }

    /// A statement directly inside a block. May declare a local in `ctx`.
    pub fn block_statement(&mut self, ctx: &mut AccessContext<'_>) -> Statement {
        for _ in 0..self.config().max_resample_attempts {
            let kind = self.sampler.sample(self.rng);
            if kind.is_compound() && ctx.complexity() >= self.config().max_statement_complexity {
                continue;
            }
            return match kind {
                StatementKind::Empty => Statement::Empty,
                StatementKind::LocalVar => self.local_var(ctx),
                StatementKind::Expression => self.expression_statement(ctx),
                StatementKind::If => self.if_statement(ctx),
                StatementKind::While => self.while_statement(ctx),
                StatementKind::Return if ctx.complexity() > 1 => self.return_statement(ctx),
                StatementKind::Return => continue,
                StatementKind::Block => Statement::Block(self.block(ctx)),
            };
        }
        tracing::trace!(complexity = ctx.complexity(), "block statement resampling exhausted");
        Statement::Empty
    }

    /// A statement in bare position, the body of `if` or `while`.
    pub fn statement(&mut self, ctx: &AccessContext<'_>) -> Statement {
        for _ in 0..self.config().max_resample_attempts {
            let kind = self.sampler.sample(self.rng);
            if kind.is_compound() && ctx.complexity() >= self.config().max_statement_complexity {
                continue;
            }
            return match kind {
                StatementKind::LocalVar | StatementKind::Return => continue,
                StatementKind::Empty => Statement::Empty,
                StatementKind::Expression => self.expression_statement(ctx),
                StatementKind::If => self.if_statement(&ctx.descend()),
                StatementKind::While => self.while_statement(&ctx.descend()),
                StatementKind::Block => Statement::Block(self.block(&ctx.descend())),
            };
        }
        tracing::trace!(complexity = ctx.complexity(), "statement resampling exhausted");
        Statement::Empty
    }

    /// `T name [= init];`, declared in `ctx` afterwards.
    pub fn local_var(&mut self, ctx: &mut AccessContext<'_>) -> Statement {
        let ty = self
            .universe
            .pick_type(self.rng, false, self.settings.array_type_percentage);
        let Some(name) = self.fresh_local_name(ctx) else {
            return Statement::Empty;
        };
        let init = if self.rng.gen_bool(self.config().initializer_probability) {
            Some(self.expr().generate(ctx, &ty))
        } else {
            None
        };
        ctx.declare(LocalVar {
            name: name.clone(),
            ty: ty.clone(),
        });
        Statement::LocalVar { name, ty, init }
    }

    fn fresh_local_name(&mut self, ctx: &AccessContext<'_>) -> Option<String> {
        let ident = IdentGen::new(&self.settings.words, self.settings.approximate_name_length);
        for _ in 0..self.config().max_resample_attempts {
            let name = ident.lower_camel(self.rng);
            if !ctx.is_name_taken(&name) {
                return Some(name);
            }
        }
        tracing::trace!("no fresh local name found");
        None
    }

    pub fn if_statement(&mut self, ctx: &AccessContext<'_>) -> Statement {
        let condition = self.expr().generate(ctx, &Type::BOOLEAN);
        let then_branch = match self.statement(ctx) {
            Statement::Block(block) if block.is_empty() => None,
            other => Some(Box::new(other)),
        };
        let else_branch = Box::new(self.statement(ctx));
        Statement::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    pub fn while_statement(&mut self, ctx: &AccessContext<'_>) -> Statement {
        let condition = self.expr().generate(ctx, &Type::BOOLEAN);
        let body = Box::new(self.statement(ctx));
        Statement::While { condition, body }
    }

    /// A method call on the implicit receiver or an assignment to a visible
    /// variable. Empty when neither is possible.
    pub fn expression_statement(&mut self, ctx: &AccessContext<'_>) -> Statement {
        let inner = ctx.descend();
        if self.rng.gen_bool(self.config().invocation_probability) {
            let ty = self.universe.random_return_type(self.rng);
            if let Some(call) = self.expr().invocation(&inner, &ty) {
                return Statement::Expression(call);
            }
        }
        let variables = ctx.variables();
        if variables.is_empty() {
            return Statement::Empty;
        }
        let var = variables[self.rng.gen_range(0..variables.len())];
        let value = self.expr().generate(&inner, var.ty);
        Statement::Expression(Expression::Assignment {
            target: Box::new(var.read()),
            value: Box::new(value),
            ty: var.ty.clone(),
        })
    }

    /// `return;` in void context, `return expr;` otherwise.
    pub fn return_statement(&mut self, ctx: &AccessContext<'_>) -> Statement {
        let ty = ctx.return_type().clone();
        if ty.is_void() {
            return Statement::Return(None);
        }
        Statement::Return(Some(self.expr().logical_or(ctx, &ty)))
    }
}
