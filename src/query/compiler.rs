//! Derived-query compiler: predicate tree + arguments to AQL + bind variables.
//!
//! A [`DerivedQueryCompiler`] holds the mutable state of exactly one compile
//! pass (the argument stream and the bind map whose length is the bind
//! counter). [`DerivedQueryCompiler::compile`] consumes it, so the state can
//! never leak into a second invocation.

use serde::Serialize;
use tracing::{debug, trace};

use crate::query::assembler;
use crate::query::ast::{PartTree, PredicatePart, Sort};
use crate::query::binder::{ArgumentBinder, BindOutcome, BindRequest};
use crate::query::case;
use crate::query::clause::{self, ClauseContext, ClauseFragment};
use crate::query::conjunction::{ConjunctionBuilder, DisjunctionBuilder};
use crate::query::errors::Result;
use crate::query::metadata::EntityMetadata;
use crate::query::value::{Argument, BindVars};

/// Query text plus the bind variables it references.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// AQL text.
    pub query: String,
    /// Positional bind variables, keyed `"0"`, `"1"`, ...
    pub bind_vars: BindVars,
}

/// Single-use compiler state for one derived query.
pub struct DerivedQueryCompiler<'a, M: EntityMetadata + ?Sized> {
    metadata: &'a M,
    entity: String,
    collection: String,
    binder: ArgumentBinder,
}

impl<'a, M: EntityMetadata + ?Sized> DerivedQueryCompiler<'a, M> {
    /// Prepares a pass over `arguments` for `entity`.
    pub fn new(metadata: &'a M, entity: impl Into<String>, arguments: Vec<Argument>) -> Result<Self> {
        let entity = entity.into();
        let collection = metadata.collection_name(&entity)?;
        Ok(Self {
            metadata,
            entity,
            collection,
            binder: ArgumentBinder::new(arguments),
        })
    }

    /// Compiles `tree`, consuming arguments group by group, part by part.
    pub fn compile(mut self, tree: &PartTree, sort: Option<&Sort>) -> Result<CompiledQuery> {
        let mut disjunction = DisjunctionBuilder::new();
        for group in &tree.groups {
            let mut conjunction = ConjunctionBuilder::new();
            for part in group {
                conjunction.add(self.compile_part(part)?)?;
            }
            disjunction.add(conjunction.build())?;
        }
        let disjunction = disjunction.build();
        let query = assembler::assemble(&self.collection, &disjunction, tree, sort);
        if self.binder.remaining() > 0 {
            debug!(
                entity = %self.entity,
                unused = self.binder.remaining(),
                "derived.arguments.unused"
            );
        }
        let bind_vars = self.binder.finish();
        debug!(
            entity = %self.entity,
            binds = bind_vars.len(),
            query = %query,
            "derived.compile.done"
        );
        Ok(CompiledQuery { query, bind_vars })
    }

    fn compile_part(&mut self, part: &PredicatePart) -> Result<ClauseFragment> {
        let leaf = self.metadata.leaf_property(&self.entity, &part.property)?;
        let field = self.metadata.field_path(&self.entity, &part.property)?;
        let ignore_case = case::should_ignore_case(part, &leaf);
        let property = case::property_reference(&field, &leaf, ignore_case);
        let n = self.binder.next_key();
        let ctx = ClauseContext {
            collection: &self.collection,
            property: &property,
            ignore_case,
        };
        let synthesized = clause::synthesize(part.operator, &ctx, n)?;
        let outcome = self.binder.bind(BindRequest {
            operator: part.operator,
            arity: synthesized.arity,
            ignore_case,
            mode: synthesized.mode,
        })?;
        trace!(
            property = %part.property,
            operator = %part.operator,
            first = n,
            slots = outcome.slots(),
            "derived.compile.part"
        );
        Ok(match outcome {
            BindOutcome::GeoDonut => clause::donut(&self.collection, n),
            BindOutcome::Fixed(_) => synthesized.fragment,
        })
    }
}

/// Compiles `tree` with a fresh compiler state.
pub fn compile<M: EntityMetadata + ?Sized>(
    metadata: &M,
    entity: &str,
    tree: &PartTree,
    arguments: Vec<Argument>,
    sort: Option<&Sort>,
) -> Result<CompiledQuery> {
    DerivedQueryCompiler::new(metadata, entity, arguments)?.compile(tree, sort)
}
