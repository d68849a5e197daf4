//! The growing set of types available to declarations.

use rand::Rng;

use crate::symbols::Type;

/// Upper bound on array dimensions produced by [`array_dims`].
pub const MAX_ARRAY_DIMS: usize = 4;

/// Draw an array dimension count in `1..=4`, fewer dimensions being likelier.
pub fn array_dims<R: Rng>(rng: &mut R) -> usize {
    let u: u32 = rng.gen_range(1..25);
    MAX_ARRAY_DIMS + 1 - (u as f64).sqrt().floor() as usize
}

/// Types usable as fields and locals, and as method returns.
#[derive(Debug, Clone)]
pub struct TypeUniverse {
    field_types: Vec<Type>,
    return_types: Vec<Type>,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    /// A universe holding only the primitive types.
    pub fn new() -> Self {
        Self {
            field_types: vec![Type::INT, Type::BOOLEAN],
            return_types: vec![Type::INT, Type::BOOLEAN, Type::VOID],
        }
    }

    /// Make a class usable. Registering the same class twice is a no-op.
    pub fn register_class(&mut self, name: &str) {
        let ty = Type::class(name);
        if self.field_types.contains(&ty) {
            return;
        }
        self.field_types.push(ty.clone());
        self.return_types.push(ty);
    }

    pub fn field_types(&self) -> &[Type] {
        &self.field_types
    }

    pub fn return_types(&self) -> &[Type] {
        &self.return_types
    }

    /// Uniform pick among field types, without array wrapping.
    pub fn random_field_type<R: Rng>(&self, rng: &mut R) -> Type {
        self.field_types[rng.gen_range(0..self.field_types.len())].clone()
    }

    /// Uniform pick among return types (may be void), without array wrapping.
    pub fn random_return_type<R: Rng>(&self, rng: &mut R) -> Type {
        self.return_types[rng.gen_range(0..self.return_types.len())].clone()
    }

    /// Pick a declaration type, wrapping it in an array with probability
    /// `array_probability`. Void is never wrapped.
    pub fn pick_type<R: Rng>(&self, rng: &mut R, void_allowed: bool, array_probability: f64) -> Type {
        let ty = if void_allowed {
            self.random_return_type(rng)
        } else {
            self.random_field_type(rng)
        };
        if ty.is_void() || !rng.gen_bool(array_probability) {
            return ty;
        }
        ty.array_of(array_dims(rng))
    }

    /// Whether a symbol of type `candidate` can produce `requested`.
    pub fn is_assignable(candidate: &Type, requested: &Type) -> bool {
        candidate.is_assignable_to(requested)
    }
}
