//! Kind-indexed dispatcher.

use std::collections::HashMap;

use tracing::warn;

use super::{Node, Rule, RuleChainDispatcher};

/// Groups nodes by [`Node::kind`] so rules only visit the kinds they target.
///
/// Rules with no target kinds still see every node.
#[derive(Debug, Default)]
pub struct KindIndexedDispatcher {
    by_kind: HashMap<String, Vec<usize>>,
    indexed: usize,
}

impl KindIndexedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed nodes of `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, Vec::len)
    }
}

impl<N: Node, C> RuleChainDispatcher<N, C> for KindIndexedDispatcher {
    fn index_nodes(&mut self, nodes: &[N], _ctx: &mut C) {
        self.by_kind.clear();
        for (i, node) in nodes.iter().enumerate() {
            self.by_kind.entry(node.kind().to_string()).or_default().push(i);
        }
        self.indexed = nodes.len();
    }

    fn visit(&self, rule: &dyn Rule<N, C>, node: &N, ctx: &mut C) -> anyhow::Result<()> {
        rule.apply(std::slice::from_ref(node), ctx)
    }

    fn candidates(&self, rule: &dyn Rule<N, C>, nodes: &[N]) -> Vec<usize> {
        let kinds = rule.target_kinds();
        if kinds.is_empty() {
            return (0..nodes.len()).collect();
        }

        let mut positions: Vec<usize> = kinds
            .iter()
            .filter_map(|k| self.by_kind.get(*k))
            .flatten()
            .copied()
            // Positions left over from a longer unit must not index past `nodes`.
            .filter(|&i| i < nodes.len())
            .collect();
        if self.indexed != nodes.len() {
            warn!(
                indexed = self.indexed,
                nodes = nodes.len(),
                "candidates requested for nodes that were not indexed"
            );
        }
        // Keep document order when a rule targets several kinds.
        positions.sort_unstable();
        positions.dedup();
        positions
    }
}
