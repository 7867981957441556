//! Rule-chain dispatch: applying rules to parsed nodes.
//!
//! Dispatch is two-phase. A dispatcher first indexes all nodes of one
//! analysis unit, then each rule is visited with the nodes it cares about:
//!
//! ```text
//! nodes ──▶ index_nodes ──▶ candidates(rule) ──▶ visit(rule, node) ──▶ Rule::apply
//! ```
//!
//! The baseline dispatcher indexes nothing and offers every node to every
//! rule. The kind-indexed dispatcher groups nodes by [`Node::kind`] so a rule
//! only sees the kinds listed in [`Rule::target_kinds`].

mod baseline;
mod indexed;

pub use baseline::BaselineDispatcher;
pub use indexed::KindIndexedDispatcher;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A parsed syntax node, as seen by dispatchers.
pub trait Node {
    /// Syntactic category of the node (e.g., "MethodDeclaration").
    fn kind(&self) -> &str;
}

impl<T: Node + ?Sized> Node for &T {
    fn kind(&self) -> &str {
        (**self).kind()
    }
}

/// An analysis rule applied to nodes with an opaque execution context.
pub trait Rule<N, C> {
    /// Rule name, used in logs.
    fn name(&self) -> &str;

    /// Node kinds this rule wants to visit. Empty means every node.
    fn target_kinds(&self) -> &[&str] {
        &[]
    }

    /// Apply the rule to a list of nodes.
    fn apply(&self, nodes: &[N], ctx: &mut C) -> anyhow::Result<()>;
}

/// Strategy for dispatching rules to nodes.
pub trait RuleChainDispatcher<N, C> {
    /// Pre-process all nodes of one analysis unit.
    ///
    /// Called once per node set, before any `visit` for that set.
    fn index_nodes(&mut self, nodes: &[N], ctx: &mut C);

    /// Apply one rule to one node.
    fn visit(&self, rule: &dyn Rule<N, C>, node: &N, ctx: &mut C) -> anyhow::Result<()>;

    /// Positions in `nodes` that `rule` should be visited with.
    ///
    /// `nodes` must be the slice last passed to `index_nodes`.
    fn candidates(&self, rule: &dyn Rule<N, C>, nodes: &[N]) -> Vec<usize>;
}

/// Which dispatcher a language uses, chosen when its module is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStrategy {
    /// No indexing, every rule sees every node.
    #[default]
    Baseline,
    /// Index nodes by kind and visit rules only with their target kinds.
    KindIndexed,
}

impl DispatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStrategy::Baseline => "baseline",
            DispatchStrategy::KindIndexed => "kind-indexed",
        }
    }

    /// Create a fresh dispatcher for this strategy.
    pub fn dispatcher<N: Node, C>(&self) -> Box<dyn RuleChainDispatcher<N, C>> {
        match self {
            DispatchStrategy::Baseline => Box::new(BaselineDispatcher),
            DispatchStrategy::KindIndexed => Box::new(KindIndexedDispatcher::new()),
        }
    }
}

impl std::fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DispatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(DispatchStrategy::Baseline),
            "kind-indexed" | "kind_indexed" => Ok(DispatchStrategy::KindIndexed),
            _ => Err(format!("unknown dispatch strategy: {}", s)),
        }
    }
}

/// An ordered set of rules applied together to each analysis unit.
pub struct RuleChain<'r, N, C> {
    rules: Vec<&'r dyn Rule<N, C>>,
}

impl<'r, N, C> RuleChain<'r, N, C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Rules run in insertion order.
    pub fn add(&mut self, rule: &'r dyn Rule<N, C>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Index `nodes` once, then visit every rule with its candidate nodes.
    ///
    /// Stops at the first rule error.
    pub fn apply(
        &self,
        dispatcher: &mut dyn RuleChainDispatcher<N, C>,
        nodes: &[N],
        ctx: &mut C,
    ) -> anyhow::Result<()> {
        dispatcher.index_nodes(nodes, ctx);

        for rule in &self.rules {
            let candidates = dispatcher.candidates(*rule, nodes);
            trace!(rule = rule.name(), nodes = candidates.len(), "dispatching rule");
            for i in candidates {
                dispatcher.visit(*rule, &nodes[i], ctx)?;
            }
        }
        Ok(())
    }
}

impl<'r, N, C> Default for RuleChain<'r, N, C> {
    fn default() -> Self {
        Self::new()
    }
}
