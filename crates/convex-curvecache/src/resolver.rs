//! Dependency resolver: turns `CurveSpec.points[].deps` into a build order.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{CurveCacheError, CurveCacheResult};
use crate::spec::CurveSpec;

/// Computes a deterministic topological build order over a set of curve
/// specs.
///
/// Iteration order is over ids sorted lexicographically before insertion,
/// so ties between independent curves resolve the same way on every call
/// — the ordering guarantee that scenario S2 exercises (swapping the
/// declaration order in the request must not change the order of work).
///
/// # Errors
///
/// [`CurveCacheError::CurveDependencyCycle`] naming every curve id that
/// participates in at least one cycle, if the dependency graph is not a
/// DAG.
pub fn build_order(specs: &[CurveSpec]) -> CurveCacheResult<Vec<String>> {
    let mut ids: Vec<&str> = specs.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();

    let mut graph = DiGraph::<&str, ()>::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::with_capacity(ids.len());
    for id in &ids {
        nodes.insert(id, graph.add_node(id));
    }

    let by_id: HashMap<&str, &CurveSpec> = specs.iter().map(|s| (s.id.as_str(), s)).collect();
    for id in &ids {
        let spec = by_id[id];
        for dep in spec.dependency_ids() {
            let Some(&dep_node) = nodes.get(dep) else {
                // A dependency on a curve id that isn't part of this
                // request's spec set is a reference-resolution failure
                // raised earlier (CurveRegistry::handle), not a cycle —
                // the resolver only reasons about edges between curves it
                // knows about.
                continue;
            };
            graph.add_edge(dep_node, nodes[id], ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|n| graph[n].to_string()).collect()),
        Err(cycle) => {
            let cycle_ids = collect_cycle(&graph, cycle.node_id());
            Err(CurveCacheError::cycle(cycle_ids))
        }
    }
}

/// Expands a single cycle-participating node (as reported by
/// `petgraph::algo::toposort`) into every node reachable from it that can
/// reach back to it — i.e. every node on some cycle through it.
fn collect_cycle(graph: &DiGraph<&str, ()>, start: NodeIndex) -> Vec<String> {
    use petgraph::visit::Dfs;

    let mut forward = std::collections::HashSet::new();
    let mut dfs = Dfs::new(graph, start);
    while let Some(n) = dfs.next(graph) {
        forward.insert(n);
    }

    let reversed = petgraph::visit::Reversed(graph);
    let mut backward = std::collections::HashSet::new();
    let mut dfs_back = Dfs::new(&reversed, start);
    while let Some(n) = dfs_back.next(&reversed) {
        backward.insert(n);
    }

    let mut ids: Vec<String> = forward
        .intersection(&backward)
        .map(|&n| graph[n].to_string())
        .collect();
    ids.sort();
    ids
}
