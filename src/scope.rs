//! Access context threaded through statement and expression generation.
//!
//! A context is a value. Plain descent ([`AccessContext::descend`]) shares the
//! local list with its parent; entering a block ([`AccessContext::enter_block`])
//! gives the child its own list, so locals declared inside never leak out.

use std::rc::Rc;

use crate::ast::{Expression, VarKind};
use crate::symbols::{ClassDecl, Parameter, Type};

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// A local variable visible in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
}

/// Where a visible variable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSource {
    Local,
    Param,
    /// A field of the receiver, read through the implicit `this`.
    Field,
}

/// A variable visible from the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable<'c> {
    pub name: &'c str,
    pub ty: &'c Type,
    pub source: VarSource,
}

impl Variable<'_> {
    /// An expression reading this variable.
    pub fn read(&self) -> Expression {
        let ty = self.ty.clone();
        let name = self.name.to_string();
        match self.source {
            VarSource::Local => Expression::VariableRead {
                name,
                kind: VarKind::Local,
                ty,
            },
            VarSource::Param => Expression::VariableRead {
                name,
                kind: VarKind::Param,
                ty,
            },
            VarSource::Field => Expression::FieldRead {
                target: None,
                field: name,
                ty,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// AccessContext
// ---------------------------------------------------------------------------

/// Everything a generator may reference at one point of a method body.
#[derive(Debug, Clone)]
pub struct AccessContext<'a> {
    locals: Rc<Vec<LocalVar>>,
    params: &'a [Parameter],
    /// The implicit receiver. `None` in a static context.
    receiver: Option<&'a ClassDecl>,
    enclosing: &'a ClassDecl,
    return_type: Type,
    complexity: usize,
}

impl<'a> AccessContext<'a> {
    /// Top-level context of an instance method body.
    pub fn method(class: &'a ClassDecl, params: &'a [Parameter], return_type: Type) -> Self {
        Self {
            locals: Rc::new(Vec::new()),
            params,
            receiver: Some(class),
            enclosing: class,
            return_type,
            complexity: 0,
        }
    }

    /// Context of a static method body: no receiver, no visible parameters.
    pub fn static_method(class: &'a ClassDecl, return_type: Type, complexity: usize) -> Self {
        Self {
            locals: Rc::new(Vec::new()),
            params: &[],
            receiver: None,
            enclosing: class,
            return_type,
            complexity,
        }
    }

    /// Same locals, one level deeper.
    pub fn descend(&self) -> Self {
        let mut child = self.clone();
        child.complexity += 1;
        child
    }

    /// Independent copy of the locals, one level deeper.
    pub fn enter_block(&self) -> Self {
        let mut child = self.descend();
        child.locals = Rc::new(self.locals.as_ref().clone());
        child
    }

    /// Declare a local in this context only.
    pub fn declare(&mut self, local: LocalVar) {
        Rc::make_mut(&mut self.locals).push(local);
    }

    pub fn complexity(&self) -> usize {
        self.complexity
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn receiver(&self) -> Option<&'a ClassDecl> {
        self.receiver
    }

    pub fn enclosing(&self) -> &'a ClassDecl {
        self.enclosing
    }

    pub fn is_static(&self) -> bool {
        self.receiver.is_none()
    }

    pub fn locals(&self) -> &[LocalVar] {
        &self.locals
    }

    pub fn params(&self) -> &'a [Parameter] {
        self.params
    }

    /// Whether a local or parameter already uses `name`.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.locals.iter().any(|l| l.name == name) || self.params.iter().any(|p| p.name == name)
    }

    /// All visible variables: locals, then parameters, then receiver fields.
    pub fn variables(&self) -> Vec<Variable<'_>> {
        let locals = self.locals.iter().map(|l| Variable {
            name: &l.name,
            ty: &l.ty,
            source: VarSource::Local,
        });
        let params = self.params.iter().map(|p| Variable {
            name: &p.name,
            ty: &p.ty,
            source: VarSource::Param,
        });
        let fields = self
            .receiver
            .into_iter()
            .flat_map(|c| c.fields.iter())
            .map(|f| Variable {
                name: &f.name,
                ty: &f.ty,
                source: VarSource::Field,
            });
        locals.chain(params).chain(fields).collect()
    }

    /// Visible variables that can produce `requested`, falling back to all
    /// visible variables when none can.
    pub fn candidates_for(&self, requested: &Type) -> Vec<Variable<'_>> {
        let all = self.variables();
        let typed: Vec<_> = all
            .iter()
            .copied()
            .filter(|v| v.ty.is_assignable_to(requested))
            .collect();
        if typed.is_empty() { all } else { typed }
    }
}
