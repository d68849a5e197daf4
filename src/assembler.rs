//! Whole-program synthesis: plan skeletons, fill bodies, add the entry point.

use rand::Rng;

use crate::ast::Block;
use crate::error::ConfigError;
use crate::names::IdentGen;
use crate::planner::{self, ENTRY_POINT_NAME, Skeleton};
use crate::scope::AccessContext;
use crate::settings::{Settings, StatementKind};
use crate::stmt::StmtGenerator;
use crate::symbols::{ClassDecl, MethodDecl, Parameter, Program, Type};
use crate::universe::TypeUniverse;
use crate::weighted::WeightedChoice;

/// Starting complexity of the entry point body.
const ENTRY_POINT_COMPLEXITY: usize = 2;

/// Synthesize a complete program.
///
/// Settings are validated before the first random draw. For fixed settings
/// and a fixed random stream the result is always the same.
pub fn synthesize_program<R: Rng>(settings: &Settings, rng: &mut R) -> Result<Program, ConfigError> {
    settings.validate()?;
    let sampler = settings.statement_sampler()?;

    let Skeleton {
        mut classes,
        universe,
    } = planner::plan(rng, settings);

    let mut bodies: Vec<Vec<Block>> = Vec::with_capacity(classes.len());
    let mut entry: Option<(usize, MethodDecl)> = None;
    let mut remaining = classes.len();
    for (idx, class) in classes.iter().enumerate() {
        bodies.push(fill_class(rng, settings, &sampler, &universe, &classes, class));

        if settings.entry_point && entry.is_none() {
            let selected = rng.gen_range(0..remaining) == 0;
            remaining -= 1;
            if selected {
                let main = entry_point(rng, settings, &sampler, &universe, &classes, class);
                entry = Some((idx, main));
            }
        }
    }

    for (class, class_bodies) in classes.iter_mut().zip(bodies) {
        for (method, body) in class.methods.iter_mut().zip(class_bodies) {
            method.body = Some(body);
        }
    }
    if let Some((idx, main)) = entry {
        tracing::debug!(class = %classes[idx].name, "added entry point");
        classes[idx].methods.push(main);
    }

    let program = Program { classes };
    tracing::debug!(
        classes = program.class_count(),
        methods = program.method_count(),
        "synthesized program"
    );
    Ok(program)
}

/// Generate the bodies of all methods of `class`, in declaration order.
#[tracing::instrument(skip_all, fields(class = %class.name))]
fn fill_class<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    sampler: &WeightedChoice<StatementKind>,
    universe: &TypeUniverse,
    classes: &[ClassDecl],
    class: &ClassDecl,
) -> Vec<Block> {
    let mut stmts = StmtGenerator::new(rng, settings, sampler, universe, classes);
    class
        .methods
        .iter()
        .map(|method| {
            let ctx = AccessContext::method(class, &method.params, method.return_type.clone());
            stmts.block(&ctx)
        })
        .collect()
}

/// The parameter of `main`. Never visible to the body.
pub fn entry_point_param() -> Parameter {
    Parameter {
        name: "args".to_string(),
        ty: Type::class("java.lang.String").array_of(1),
    }
}

/// `public static void main(String[] args)` for `class`, with a body that
/// cannot reach any instance member.
fn entry_point<R: Rng>(
    rng: &mut R,
    settings: &Settings,
    sampler: &WeightedChoice<StatementKind>,
    universe: &TypeUniverse,
    classes: &[ClassDecl],
    class: &ClassDecl,
) -> MethodDecl {
    let ident = IdentGen::new(&settings.words, settings.approximate_name_length);
    let thrown = planner::plan_thrown_types(rng, settings, &ident);
    let ctx = AccessContext::static_method(class, Type::VOID, ENTRY_POINT_COMPLEXITY);
    let body = StmtGenerator::new(rng, settings, sampler, universe, classes).block(&ctx);
    MethodDecl {
        name: ENTRY_POINT_NAME.to_string(),
        return_type: Type::VOID,
        params: vec![entry_point_param()],
        thrown,
        is_static: true,
        body: Some(body),
    }
}
