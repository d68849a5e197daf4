//! Types and declarations of a synthesized program.
//!
//! The planner fills these in two steps:
//! 1. Plan phase: every class name, field and method signature
//! 2. Fill phase: method bodies, generated against the complete table
//!
//! Because all signatures exist before the first body is generated, a method
//! may use any class, including ones declared after its own.

use std::fmt;

use crate::ast::Block;

/// Primitive types of the generated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Boolean,
    Void,
}

impl PrimitiveType {
    /// Return the Java syntax for this primitive type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Void => "void",
        }
    }
}

/// Static type of a declaration or expression.
///
/// Arrays are kept flat: the element of an `Array` is never itself an array
/// and never `void`, and `dims` is at least one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `int`, `boolean` or `void`.
    Primitive(PrimitiveType),
    /// Reference to a class by name.
    Class(String),
    /// Array of `element` with the given number of dimensions.
    Array(Box<Type>, usize),
}

impl Type {
    pub const INT: Type = Type::Primitive(PrimitiveType::Int);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveType::Boolean);
    pub const VOID: Type = Type::Primitive(PrimitiveType::Void);

    /// Create a class reference type.
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    /// Wrap `self` in `dims` additional array dimensions.
    ///
    /// Wrapping an array adds to its dimensions instead of nesting.
    pub fn array_of(self, dims: usize) -> Self {
        debug_assert!(!self.is_void(), "void has no array type");
        if dims == 0 {
            return self;
        }
        match self {
            Type::Array(element, existing) => Type::Array(element, existing + dims),
            other => Type::Array(Box::new(other), dims),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Void))
    }

    /// `int` or `boolean`.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Primitive(PrimitiveType::Int) | Type::Primitive(PrimitiveType::Boolean)
        )
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(..))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    /// Number of array dimensions, zero for non-array types.
    pub fn dims(&self) -> usize {
        match self {
            Type::Array(_, dims) => *dims,
            _ => 0,
        }
    }

    /// The innermost element type (the type itself for non-arrays).
    pub fn element(&self) -> &Type {
        match self {
            Type::Array(element, _) => element,
            other => other,
        }
    }

    /// The type produced by indexing this array once.
    pub fn component(&self) -> Option<Type> {
        match self {
            Type::Array(element, 1) => Some(element.as_ref().clone()),
            Type::Array(element, dims) => Some(Type::Array(element.clone(), dims - 1)),
            _ => None,
        }
    }

    /// Whether indexing this array one or more times yields `target`.
    pub fn can_index_into(&self, target: &Type) -> bool {
        match self {
            Type::Array(element, dims) => {
                element.as_ref() == target.element() && target.dims() < *dims
            }
            _ => false,
        }
    }

    /// Whether a symbol of type `self` can serve where `requested` is wanted,
    /// either directly or after indexing.
    pub fn is_assignable_to(&self, requested: &Type) -> bool {
        self == requested || self.can_index_into(requested)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => f.write_str(p.as_str()),
            Type::Class(name) => f.write_str(name),
            Type::Array(element, dims) => {
                write!(f, "{element}")?;
                for _ in 0..*dims {
                    f.write_str("[]")?;
                }
                Ok(())
            }
        }
    }
}

/// A field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

/// A method of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Parameter>,
    /// Names of the declared thrown marker types. Rendered, never checked.
    pub thrown: Vec<String>,
    /// Only the synthesized entry point is static.
    pub is_static: bool,
    /// `None` until the fill phase has generated the body.
    pub body: Option<Block>,
}

impl MethodDecl {
    /// Whether a parameter with this name already exists.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }
}

/// A class declaration. Fields always precede methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// The type referring to this class.
    pub fn reference(&self) -> Type {
        Type::Class(self.name.clone())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A complete synthesized program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
}

impl Program {
    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Iterate over every method of every class, with its class.
    pub fn methods(&self) -> impl Iterator<Item = (&ClassDecl, &MethodDecl)> {
        self.classes
            .iter()
            .flat_map(|c| c.methods.iter().map(move |m| (c, m)))
    }

    /// Total number of methods, including the entry point.
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}

/// Look up a class by name in a slice of declarations.
pub fn find_class<'a>(classes: &'a [ClassDecl], name: &str) -> Option<&'a ClassDecl> {
    classes.iter().find(|c| c.name == name)
}
