//! Dependency ordering of declared tables.
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog::table::Table;
use crate::error::CycleError;

/// Order `tables` so that every table follows the tables it references.
///
/// Works in rounds: each round takes every table with no outstanding dependency, keeps them
/// in their current relative order, then clears them from the remaining tables. A round that
/// takes nothing means a cycle or a reference to an undeclared table. Every round before
/// that removes at least one table, so no more than `tables.len()` rounds ever run.
///
/// The input is left untouched; dependencies are regenerated on the returned copies.
pub fn compute_dependencies(tables: &[Table]) -> Result<Vec<Table>, CycleError> {
    let mut remaining: Vec<Table> = tables
        .iter()
        .cloned()
        .map(|mut table| {
            table.generate_dependencies();
            table
        })
        .collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut round = 0;

    while !remaining.is_empty() {
        round += 1;
        let (free, blocked): (Vec<Table>, Vec<Table>) =
            remaining.into_iter().partition(|table| !table.dependent());

        if free.is_empty() {
            return Err(cycle_error(&blocked, round));
        }

        debug!(
            round,
            tables = ?free.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "dependency round"
        );

        remaining = blocked;
        for table in &free {
            for other in remaining.iter_mut() {
                other.remove_dependency(table.name());
            }
        }
        ordered.extend(free);
    }

    Ok(ordered)
}

fn cycle_error(blocked: &[Table], rounds: usize) -> CycleError {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: BTreeMap<&str, NodeIndex> = blocked
        .iter()
        .map(|t| (t.name(), graph.add_node(t.name())))
        .collect();

    let mut missing = Vec::new();
    for table in blocked {
        for dependency in table.dependencies() {
            match nodes.get(dependency.as_str()) {
                Some(&target) => {
                    graph.add_edge(nodes[table.name()], target, ());
                }
                _ => missing.push((table.name().to_string(), dependency.clone())),
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut members: Vec<String> =
                component.iter().map(|&n| graph[n].to_string()).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();

    CycleError {
        unresolved: blocked.iter().map(|t| t.name().to_string()).collect(),
        cycles,
        missing,
        rounds,
    }
}
