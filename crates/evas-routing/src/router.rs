use std::cmp::Ordering;
use std::sync::Arc;

use evas_agents::AgentRegistry;
use evas_core::AgentDescriptor;
use thiserror::Error;

use crate::scorer::AgentProfile;
use crate::signals::tokenize;
use crate::types::{RankedAgent, RoutingConfig, Selection};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("no agents are registered")]
    NoCandidate,

    #[error("every agent is disqualified for this task (best alternative: {best})")]
    AllDisqualified { best: String },
}

/// Ranks registered agents for a task text
#[derive(Debug, Clone)]
pub struct Router {
    profiles: Vec<AgentProfile>,
    config: RoutingConfig,
}

impl Router {
    pub fn new(registry: &AgentRegistry, config: RoutingConfig) -> Self {
        let profiles = registry
            .iter()
            .map(|agent| AgentProfile::build(Arc::clone(agent)))
            .collect();
        Self { profiles, config }
    }

    pub fn with_defaults(registry: &AgentRegistry) -> Self {
        Self::new(registry, RoutingConfig::default())
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Rank every agent; fails only when there is nothing to rank
    pub fn select(&self, task: &str) -> Result<Selection, RouterError> {
        if self.profiles.is_empty() {
            return Err(RouterError::NoCandidate);
        }

        let tokens = tokenize(task);
        let mut ranked: Vec<RankedAgent> = self
            .profiles
            .iter()
            .map(|p| p.score(&tokens, &self.config))
            .collect();
        ranked.sort_by(compare_ranked);

        if let Some(top) = ranked.first() {
            tracing::debug!(
                agent = top.name(),
                score = top.score,
                qualified = top.is_qualified(),
                "routed task"
            );
        }

        Ok(Selection {
            task: task.to_string(),
            ranked,
        })
    }

    /// Top qualified agent for `task`
    pub fn select_agent(&self, task: &str) -> Result<Arc<AgentDescriptor>, RouterError> {
        let selection = self.select(task)?;
        match selection.primary() {
            Some(primary) => Ok(Arc::clone(&primary.agent)),
            None => Err(RouterError::AllDisqualified {
                best: selection
                    .ranked
                    .first()
                    .map(|r| r.name().to_string())
                    .unwrap_or_default(),
            }),
        }
    }

    /// Human-readable breakdown of a routing decision
    pub fn explain(&self, task: &str) -> String {
        let selection = match self.select(task) {
            Ok(selection) => selection,
            Err(e) => return format!("=== Agent Routing Decision ===\n{e}"),
        };

        let mut lines = vec![
            "=== Agent Routing Decision ===".to_string(),
            format!(
                "Task: {}{}",
                task.chars().take(100).collect::<String>(),
                if task.chars().count() > 100 { "..." } else { "" }
            ),
            format!("Keywords: {}", tokenize(task).join(", ")),
            format!(
                "Primary: {}",
                selection
                    .primary()
                    .map(|p| format!("{} (score {})", p.name(), p.score))
                    .unwrap_or_else(|| "none (all agents disqualified)".to_string())
            ),
            "".to_string(),
            "--- Ranking ---".to_string(),
        ];

        for (idx, r) in selection.qualified().enumerate() {
            lines.push(format!(
                "{:>2}. {} score={} cost={}",
                idx + 1,
                r.name(),
                r.score,
                r.agent.cost()
            ));
            for s in &r.signals {
                lines.push(format!(
                    "      +{} {} \"{}\" [{}]",
                    s.points,
                    s.kind.as_str(),
                    s.phrase,
                    s.keywords.join(", ")
                ));
            }
        }

        let disqualified: Vec<_> = selection.disqualified().collect();
        if !disqualified.is_empty() {
            lines.push("".to_string());
            lines.push("--- Disqualified ---".to_string());
            for r in disqualified {
                let Some(dq) = &r.disqualified else { continue };
                let redirect = dq
                    .redirect
                    .as_deref()
                    .map(|t| format!(" -> {t}"))
                    .unwrap_or_default();
                lines.push(format!(
                    "  - {} (score {}): avoid \"{}\" [{}]{}",
                    r.name(),
                    r.score,
                    dq.phrase,
                    dq.keywords.join(", "),
                    redirect
                ));
            }
        }

        lines.join("\n")
    }
}

fn compare_ranked(a: &RankedAgent, b: &RankedAgent) -> Ordering {
    b.is_qualified()
        .cmp(&a.is_qualified())
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.agent.cost().cmp(&b.agent.cost()))
        .then_with(|| a.agent.name.cmp(&b.agent.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evas_core::{AgentCategory, AgentCost, AgentMetadata};

    fn agent(name: &str, cost: AgentCost, metadata: AgentMetadata) -> AgentDescriptor {
        let metadata = AgentMetadata { cost, ..metadata };
        AgentDescriptor::new(name, "", "", metadata).with_tools(["Read"])
    }

    fn router(agents: Vec<AgentDescriptor>) -> Router {
        let mut registry = AgentRegistry::new();
        for a in agents {
            registry.register(a).unwrap();
        }
        Router::with_defaults(&registry)
    }

    fn base() -> AgentMetadata {
        AgentMetadata::new(AgentCategory::Exploration, AgentCost::Free)
    }

    #[test]
    fn empty_registry_has_no_candidate() {
        let r = router(vec![]);
        assert_eq!(r.select("anything").unwrap_err(), RouterError::NoCandidate);
        assert_eq!(r.select_agent("anything").unwrap_err(), RouterError::NoCandidate);
    }

    #[test]
    fn zero_scores_still_rank_everyone() {
        let r = router(vec![
            agent("b", AgentCost::Cheap, base()),
            agent("a", AgentCost::Cheap, base()),
        ]);
        let selection = r.select("unrelated words").unwrap();
        assert_eq!(selection.names(), vec!["a", "b"]);
        assert_eq!(selection.primary().unwrap().score, 0);
    }

    #[test]
    fn ties_break_on_cost_then_name() {
        let meta = base().use_when(["Searching ingredient data files"]);
        let r = router(vec![
            agent("zeta", AgentCost::Free, meta.clone()),
            agent("beta", AgentCost::Expensive, meta.clone()),
            agent("alpha", AgentCost::Free, meta),
        ]);
        let selection = r.select("ingredient data").unwrap();
        assert_eq!(selection.names(), vec!["alpha", "zeta", "beta"]);
        assert!(selection.ranked.iter().all(|r| r.score == 4));
    }

    #[test]
    fn avoided_agent_is_never_primary() {
        let eager = base()
            .trigger("Safety", "EWG ratings and CIR data")
            .avoid_when(["EWG safety ratings (use careful)"]);
        let careful = base().use_when(["CIR review"]);
        let r = router(vec![
            agent("eager", AgentCost::Free, eager),
            agent("careful", AgentCost::Expensive, careful),
        ]);

        let selection = r.select("EWG ratings summary").unwrap();
        assert_eq!(selection.primary().unwrap().name(), "careful");
        let last = selection.ranked.last().unwrap();
        assert_eq!(last.name(), "eager");
        assert!(last.score > 0);
        assert_eq!(
            last.disqualified.as_ref().unwrap().redirect.as_deref(),
            Some("careful")
        );
    }

    #[test]
    fn all_disqualified_is_reported() {
        let meta = base().avoid_when(["routine lookup"]);
        let r = router(vec![agent("only", AgentCost::Free, meta)]);

        assert!(r.select("routine lookup").unwrap().primary().is_none());
        assert_eq!(
            r.select_agent("routine lookup").unwrap_err(),
            RouterError::AllDisqualified {
                best: "only".to_string()
            }
        );
    }

    #[test]
    fn explain_lists_signals_and_disqualifications() {
        let meta = base()
            .use_when(["Finding files by pattern"])
            .avoid_when(["External documentation lookup (use librarian)"]);
        let r = router(vec![agent("explore", AgentCost::Free, meta)]);

        let text = r.explain("finding files");
        assert!(text.starts_with("=== Agent Routing Decision ==="));
        assert!(text.contains("Primary: explore (score 4)"));
        assert!(text.contains("+4 use_when \"Finding files by pattern\" [finding, files]"));

        let text = r.explain("external documentation");
        assert!(text.contains("Primary: none (all agents disqualified)"));
        assert!(text.contains("avoid \"External documentation lookup\" [external, documentation] -> librarian"));
    }
}
