//! Plan phase for generating declaration skeletons.
//!
//! The planner generates the structure of a program:
//! - Distinct class names, all registered in the type universe
//! - Fields and method signatures per class
//! - Parameters and thrown marker types per method
//!
//! This phase creates all names and signatures without generating bodies,
//! enabling forward references in the fill phase.

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::names::IdentGen;
use crate::settings::Settings;
use crate::symbols::{ClassDecl, FieldDecl, MethodDecl, Parameter};
use crate::universe::TypeUniverse;

/// Name reserved for the entry point.
pub const ENTRY_POINT_NAME: &str = "main";

/// Attempts to find a name not yet used in its namespace.
const NAME_ATTEMPTS: usize = 32;

/// Upper bound on thrown marker types per method.
pub const MAX_THROWN_TYPES: usize = 8;

/// Declarations without bodies, plus the types they may use.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub classes: Vec<ClassDecl>,
    pub universe: TypeUniverse,
}

/// Plan every class, field and method signature.
pub fn plan<R: Rng>(rng: &mut R, settings: &Settings) -> Skeleton {
    let ident = IdentGen::new(&settings.words, settings.approximate_name_length);

    let class_count = rng.gen_range(1..=settings.max_types);
    let names = plan_class_names(rng, &ident, class_count);

    let mut universe = TypeUniverse::new();
    for name in &names {
        universe.register_class(name);
    }

    let classes: Vec<ClassDecl> = names
        .into_iter()
        .map(|name| plan_class(rng, settings, &ident, &universe, name))
        .collect();

    tracing::debug!(
        requested = class_count,
        planned = classes.len(),
        "planned classes"
    );
    Skeleton { classes, universe }
}

/// Draw `count` distinct upper-camel names. Fewer are returned when
/// resampling runs out.
fn plan_class_names<R: Rng>(rng: &mut R, ident: &IdentGen<'_>, count: usize) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        if let Some(name) = fresh_name(|| ident.upper_camel(rng), |n| !seen.contains(n)) {
            seen.insert(name.clone());
            names.push(name);
        }
    }
    names
}

/// Draw names until one satisfies `is_free`, at most [`NAME_ATTEMPTS`] times.
fn fresh_name(
    mut draw: impl FnMut() -> String,
    is_free: impl Fn(&str) -> bool,
) -> Option<String> {
    (0..NAME_ATTEMPTS).map(|_| draw()).find(|name| is_free(name))
}

fn plan_class<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    ident: &IdentGen<'_>,
    universe: &TypeUniverse,
    name: String,
) -> ClassDecl {
    let mut class = ClassDecl::new(name);
    let member_count = rng.gen_range(0..=settings.max_type_members);
    for _ in 0..member_count {
        if rng.gen_bool(settings.field_to_method_ratio) {
            if let Some(field) = plan_field(rng, settings, ident, universe, &class) {
                class.fields.push(field);
            }
        } else if let Some(method) = plan_method_signature(rng, settings, ident, universe, &class) {
            class.methods.push(method);
        }
    }
    tracing::debug!(
        class = %class.name,
        fields = class.fields.len(),
        methods = class.methods.len(),
        "planned class members"
    );
    class
}

fn plan_field<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    ident: &IdentGen<'_>,
    universe: &TypeUniverse,
    class: &ClassDecl,
) -> Option<FieldDecl> {
    let name = fresh_name(|| ident.lower_camel(rng), |n| class.field(n).is_none())?;
    let ty = universe.pick_type(rng, false, settings.array_type_percentage);
    Some(FieldDecl { name, ty })
}

fn plan_method_signature<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    ident: &IdentGen<'_>,
    universe: &TypeUniverse,
    class: &ClassDecl,
) -> Option<MethodDecl> {
    let name = fresh_name(
        || ident.lower_camel(rng),
        |n| n != ENTRY_POINT_NAME && class.method(n).is_none(),
    )?;
    let return_type = universe.pick_type(rng, true, settings.array_type_percentage);

    let param_count = rng.gen_range(0..=settings.max_parameters);
    let mut params: Vec<Parameter> = Vec::with_capacity(param_count);
    for _ in 0..param_count {
        let Some(name) = fresh_name(
            || ident.lower_camel(rng),
            |n| params.iter().all(|p| p.name != n),
        ) else {
            continue;
        };
        let ty = universe.pick_type(rng, false, settings.array_type_percentage);
        params.push(Parameter { name, ty });
    }

    let thrown = plan_thrown_types(rng, settings, ident);
    Some(MethodDecl {
        name,
        return_type,
        params,
        thrown,
        is_static: false,
        body: None,
    })
}

/// Append marker type names while the coin succeeds, skipping duplicates.
/// At most [`MAX_THROWN_TYPES`] coins are flipped.
pub fn plan_thrown_types<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    ident: &IdentGen<'_>,
) -> Vec<String> {
    let mut thrown: Vec<String> = Vec::new();
    for _ in 0..MAX_THROWN_TYPES {
        if !rng.gen_bool(settings.thrown_type_probability) {
            break;
        }
        let name = ident.upper_camel(rng);
        if !thrown.contains(&name) {
            thrown.push(name);
        }
    }
    thrown
}
