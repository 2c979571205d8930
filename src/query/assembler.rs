//! Final query text assembly.

use tracing::debug;

use crate::query::ast::{PartTree, Sort};
use crate::query::conjunction::Disjunction;

/// Renders
/// `FOR e IN <source>[ FILTER p][ <collect>][ SORT ...][ LIMIT n] <action>`.
pub fn assemble(
    collection: &str,
    disjunction: &Disjunction,
    tree: &PartTree,
    sort: Option<&Sort>,
) -> String {
    if tree.distinct && !tree.count_projection {
        debug!(collection, "derived.distinct.without_count");
    }
    let source = disjunction.array.as_deref().unwrap_or(collection);
    let filter = match disjunction.predicate.as_deref() {
        Some(predicate) if !predicate.is_empty() => format!(" FILTER {predicate}"),
        _ => String::new(),
    };
    let collect = match (tree.count_projection, tree.distinct) {
        (true, true) => " COLLECT entity = e COLLECT WITH COUNT INTO length",
        (true, false) => " COLLECT WITH COUNT INTO length",
        (false, _) => "",
    };
    let limit = tree
        .max_results
        .map(|n| format!(" LIMIT {n}"))
        .unwrap_or_default();
    let action = if tree.delete {
        format!(" REMOVE e IN {collection}")
    } else if tree.count_projection {
        " RETURN length".to_string()
    } else {
        " RETURN e".to_string()
    };
    format!(
        "FOR e IN {source}{filter}{collect}{}{limit}{action}",
        sort_clause(sort)
    )
}

/// Renders `" SORT e.a ASC, e.b DESC"`, or nothing for an empty or missing
/// sort.
pub fn sort_clause(sort: Option<&Sort>) -> String {
    let Some(sort) = sort else {
        debug!("derived.sort.missing");
        return String::new();
    };
    if sort.is_empty() {
        return String::new();
    }
    let keys: Vec<String> = sort
        .iter()
        .map(|order| format!("e.{} {}", order.property, order.direction))
        .collect();
    format!(" SORT {}", keys.join(", "))
}
