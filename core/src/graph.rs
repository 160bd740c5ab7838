//! Schema graph assembly and pruning.
//!
//! The universe of possible entry types forms a directed graph: nodes are
//! entry types, edges are "may structurally contain". Cycles (a directory
//! type containing itself) and diamonds (two paths reaching one type) are
//! both legal, so nodes live in an arena keyed by type identifier and edges
//! are identifier references.
//!
//! Pruning removes every node and edge that cannot possibly lead to a node
//! satisfying a schema predicate, letting a walker skip whole subtrees
//! before fetching anything.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::schema::{Result, SchemaError, SchemaNode, TypeDescription};

/// The type universe rooted at one entry type.
#[derive(Debug)]
pub struct SchemaGraph {
    nodes: HashMap<String, SchemaNode>,
    root: String,
}

impl SchemaGraph {
    /// Assembles a graph from plugin-supplied descriptions.
    ///
    /// Descriptions are deduplicated by type identifier (first occurrence
    /// wins). Dangling child references and malformed metadata schemas are
    /// plugin bugs and fail loudly.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfind_core::{SchemaGraph, TypeDescription};
    ///
    /// let graph = SchemaGraph::assemble(
    ///     "fs/dir",
    ///     vec![
    ///         TypeDescription::new("fs/dir", "dir")
    ///             .with_child("fs/dir")
    ///             .with_child("fs/file"),
    ///         TypeDescription::new("fs/file", "file"),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.root().type_id(), "fs/dir");
    /// ```
    pub fn assemble(
        root: impl Into<String>,
        descriptions: Vec<TypeDescription>,
    ) -> Result<Self> {
        let root = root.into();
        let mut nodes: HashMap<String, SchemaNode> = HashMap::with_capacity(descriptions.len());

        for description in descriptions {
            let type_id = description.type_id.clone();
            if nodes.contains_key(&type_id) {
                debug!(type_id = %type_id, "Skipping duplicate type description");
                continue;
            }
            nodes.insert(type_id, SchemaNode::from_description(description)?);
        }

        if !nodes.contains_key(&root) {
            return Err(SchemaError::UnknownRootType(root));
        }
        for node in nodes.values() {
            for child in node.children() {
                if !nodes.contains_key(child) {
                    return Err(SchemaError::UnknownChildType {
                        parent: node.type_id().to_string(),
                        child: child.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes, root })
    }

    /// The root node.
    pub fn root(&self) -> &SchemaNode {
        // The constructor guarantees the root is present.
        &self.nodes[&self.root]
    }

    /// The root type identifier.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// Looks up a node by type identifier.
    pub fn node(&self, type_id: &str) -> Option<&SchemaNode> {
        self.nodes.get(type_id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes. Assembly always yields at least the
    /// root, so this only holds for a graph emptied by hand.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.nodes.values()
    }

    /// Prunes the graph to the minimal sub-graph that can still lead to a
    /// node satisfying `predicate`.
    ///
    /// Returns `None` when the root itself cannot lead to a satisfying node,
    /// meaning nothing can satisfy the query.
    ///
    /// A node is kept when it satisfies the predicate, or when any
    /// (transitive) child does. Nodes whose satisfiability rests purely on a
    /// dependency cycle among themselves are dropped: the keep computation
    /// below only ever resolves a node to *kept*, so anything still
    /// unresolved at the fixpoint has no satisfying node beneath it.
    pub fn prune<F>(mut self, predicate: F) -> Option<Self>
    where
        F: Fn(&SchemaNode) -> bool,
    {
        // Phase one: direct hits resolve to kept, childless misses resolve
        // to dropped, everything else is undetermined.
        let mut keep: HashMap<&str, bool> = HashMap::with_capacity(self.nodes.len());
        let mut undetermined: Vec<&str> = Vec::new();
        for node in self.nodes.values() {
            if predicate(node) {
                keep.insert(node.type_id(), true);
            } else if node.children().is_empty() {
                keep.insert(node.type_id(), false);
            } else {
                undetermined.push(node.type_id());
            }
        }

        // Phase two: propagate keeps upward until a full pass resolves
        // nothing new.
        loop {
            let mut resolved_any = false;
            undetermined.retain(|id| {
                let node = &self.nodes[*id];
                let kept_child = node
                    .children()
                    .iter()
                    .any(|child| keep.get(child.as_str()) == Some(&true));
                if kept_child {
                    keep.insert(*id, true);
                    resolved_any = true;
                    false
                } else {
                    true
                }
            });
            if !resolved_any {
                break;
            }
        }
        // Still-undetermined nodes depend only on each other; drop them.
        for id in undetermined {
            keep.insert(id, false);
        }

        if keep.get(self.root.as_str()) != Some(&true) {
            debug!(root = %self.root, "Schema prune dropped the root; nothing can satisfy the query");
            return None;
        }

        // Phase three: delete edges to dropped targets, visiting each
        // retained node exactly once even across cycles and diamonds.
        let kept: HashSet<String> = keep
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.to_string())
            .collect();
        drop(keep);

        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            // Assembled graphs have no dangling edges, so the lookup always
            // succeeds; the guard keeps evaluation total regardless.
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            node.children_mut().retain(|child| kept.contains(child));
            stack.extend(node.children().iter().cloned());
        }
        let before = self.nodes.len();
        self.nodes.retain(|id, _| visited.contains(id));
        debug!(
            kept = self.nodes.len(),
            dropped = before - self.nodes.len(),
            "Pruned schema graph"
        );
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(id: &str, children: &[&str]) -> TypeDescription {
        let mut description = TypeDescription::new(id, id);
        for child in children {
            description = description.with_child(*child);
        }
        description
    }

    fn ids(graph: &SchemaGraph) -> Vec<&str> {
        let mut ids: Vec<&str> = graph.nodes().map(SchemaNode::type_id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_assemble_rejects_dangling_child() {
        let err = SchemaGraph::assemble("a", vec![description("a", &["ghost"])]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownChildType {
                parent: "a".to_string(),
                child: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_assemble_rejects_unknown_root() {
        let err = SchemaGraph::assemble("missing", vec![description("a", &[])]).unwrap_err();
        assert_eq!(err, SchemaError::UnknownRootType("missing".to_string()));
    }

    #[test]
    fn test_assemble_dedupes_by_type_id() {
        let graph = SchemaGraph::assemble(
            "a",
            vec![
                description("a", &[]),
                TypeDescription::new("a", "duplicate").with_action("exec"),
            ],
        )
        .unwrap();
        assert_eq!(graph.len(), 1);
        // First occurrence wins.
        assert!(!graph.root().supports_action("exec"));
    }

    #[test]
    fn test_prune_keeps_only_paths_to_matches() {
        // A -> B -> D, A -> C; predicate true only on D.
        let graph = SchemaGraph::assemble(
            "A",
            vec![
                description("A", &["B", "C"]),
                description("B", &["D"]),
                description("C", &[]),
                description("D", &[]),
            ],
        )
        .unwrap();

        let pruned = graph.prune(|n| n.type_id() == "D").unwrap();
        assert_eq!(ids(&pruned), vec!["A", "B", "D"]);
        assert_eq!(pruned.node("A").unwrap().children(), &["B".to_string()]);
    }

    #[test]
    fn test_prune_root_miss_yields_none() {
        let graph = SchemaGraph::assemble(
            "A",
            vec![description("A", &["B"]), description("B", &[])],
        )
        .unwrap();
        assert!(graph.prune(|_| false).is_none());
    }

    #[test]
    fn test_prune_resolves_self_cycle_to_dropped() {
        // A -> B, B -> B; only A matches. B's keep status depends purely on
        // its own cycle, so B is dropped.
        let graph = SchemaGraph::assemble(
            "A",
            vec![description("A", &["B"]), description("B", &["B"])],
        )
        .unwrap();
        let pruned = graph.prune(|n| n.type_id() == "A").unwrap();
        assert_eq!(ids(&pruned), vec!["A"]);
        assert!(pruned.node("A").unwrap().children().is_empty());
    }

    #[test]
    fn test_prune_keeps_cycle_leading_to_match() {
        // dir -> dir, dir -> file; only file matches. The cycle stays
        // because it leads to a kept leaf.
        let graph = SchemaGraph::assemble(
            "dir",
            vec![
                description("dir", &["dir", "file"]),
                description("file", &[]),
            ],
        )
        .unwrap();
        let pruned = graph.prune(|n| n.type_id() == "file").unwrap();
        assert_eq!(ids(&pruned), vec!["dir", "file"]);
        assert_eq!(
            pruned.node("dir").unwrap().children(),
            &["dir".to_string(), "file".to_string()]
        );
    }

    #[test]
    fn test_prune_handles_diamonds_once() {
        // A -> B -> D, A -> C -> D.
        let graph = SchemaGraph::assemble(
            "A",
            vec![
                description("A", &["B", "C"]),
                description("B", &["D"]),
                description("C", &["D"]),
                description("D", &[]),
            ],
        )
        .unwrap();
        let pruned = graph.prune(|n| n.type_id() == "D").unwrap();
        assert_eq!(ids(&pruned), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_prune_propagates_through_chains() {
        // A -> B -> C -> D; only D matches. Phase two needs several passes.
        let graph = SchemaGraph::assemble(
            "A",
            vec![
                description("A", &["B"]),
                description("B", &["C"]),
                description("C", &["D"]),
                description("D", &[]),
            ],
        )
        .unwrap();
        let pruned = graph.prune(|n| n.type_id() == "D").unwrap();
        assert_eq!(ids(&pruned), vec!["A", "B", "C", "D"]);
    }
}
