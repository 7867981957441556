//! Baseline dispatcher: no index, one `apply` call per node.

use super::{Rule, RuleChainDispatcher};

/// Fallback dispatcher used when a language has no better strategy.
///
/// Indexing is a no-op and every node is a candidate for every rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineDispatcher;

impl<N, C> RuleChainDispatcher<N, C> for BaselineDispatcher {
    fn index_nodes(&mut self, _nodes: &[N], _ctx: &mut C) {}

    fn visit(&self, rule: &dyn Rule<N, C>, node: &N, ctx: &mut C) -> anyhow::Result<()> {
        rule.apply(std::slice::from_ref(node), ctx)
    }

    fn candidates(&self, _rule: &dyn Rule<N, C>, nodes: &[N]) -> Vec<usize> {
        (0..nodes.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_visit_forwards_single_node() {
        let rule = RecordingRule { name: "r", kinds: &["Method"] };
        let dispatcher = BaselineDispatcher;
        let mut calls = Calls::new();

        dispatcher.visit(&rule, &node("Class", 7), &mut calls).unwrap();

        assert_eq!(calls, vec![("r".to_string(), vec![7])]);
    }

    #[test]
    fn test_index_has_no_effect() {
        let nodes = vec![node("Class", 1), node("Method", 2)];
        let rule = RecordingRule { name: "r", kinds: &[] };
        let mut dispatcher = BaselineDispatcher;
        let mut calls = Calls::new();

        RuleChainDispatcher::<TestNode, Calls>::index_nodes(&mut dispatcher, &nodes, &mut calls);

        assert!(calls.is_empty());
        assert_eq!(
            RuleChainDispatcher::<TestNode, Calls>::candidates(&dispatcher, &rule, &nodes),
            vec![0, 1]
        );
    }
}
