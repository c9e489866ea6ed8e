use std::sync::Arc;

use evas_core::AgentDescriptor;
use serde::{Deserialize, Serialize, Serializer};

/// Scoring weights and thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Points per matched keyword of a trigger condition
    pub trigger_weight: u32,
    /// Points per matched keyword of a trigger domain
    pub domain_weight: u32,
    /// Points per matched keyword of a `useWhen` entry
    pub use_when_weight: u32,
    /// Points per matched keyword of the description
    pub description_weight: u32,
    /// Share of an `avoidWhen` entry's keywords (percent) the task must hit
    pub avoid_min_coverage_pct: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            trigger_weight: 3,
            domain_weight: 2,
            use_when_weight: 2,
            description_weight: 1,
            avoid_min_coverage_pct: 50,
        }
    }
}

impl RoutingConfig {
    /// Largest accepted per-keyword weight
    pub const MAX_WEIGHT: u32 = 1_000;

    /// Weights by config key, in declaration order
    pub fn weights(&self) -> [(&'static str, u32); 4] {
        [
            ("trigger_weight", self.trigger_weight),
            ("domain_weight", self.domain_weight),
            ("use_when_weight", self.use_when_weight),
            ("description_weight", self.description_weight),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Trigger,
    Domain,
    UseWhen,
    Description,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Trigger => "trigger",
            SignalKind::Domain => "domain",
            SignalKind::UseWhen => "use_when",
            SignalKind::Description => "description",
        }
    }
}

/// A metadata phrase that contributed to an agent's score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedSignal {
    pub kind: SignalKind,
    pub phrase: String,
    /// Phrase keywords found in the task
    pub keywords: Vec<String>,
    pub points: u32,
}

/// The `avoidWhen` entry that ruled an agent out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disqualification {
    pub phrase: String,
    /// Agent the entry points to instead, if it names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub keywords: Vec<String>,
}

/// One agent's standing for a task
#[derive(Debug, Clone, Serialize)]
pub struct RankedAgent {
    #[serde(serialize_with = "serialize_agent_name")]
    pub agent: Arc<AgentDescriptor>,
    pub score: u32,
    pub signals: Vec<MatchedSignal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualified: Option<Disqualification>,
}

impl RankedAgent {
    pub fn name(&self) -> &str {
        &self.agent.name
    }

    pub fn is_qualified(&self) -> bool {
        self.disqualified.is_none()
    }
}

fn serialize_agent_name<S>(agent: &Arc<AgentDescriptor>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&agent.name)
}

/// Every registered agent ranked for one task
///
/// Qualified agents come first, ordered by score (highest first), then cost
/// (cheapest first), then name. Disqualified agents follow in the same order.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub task: String,
    pub ranked: Vec<RankedAgent>,
}

impl Selection {
    /// Top qualified agent
    pub fn primary(&self) -> Option<&RankedAgent> {
        self.ranked.first().filter(|r| r.is_qualified())
    }

    /// Everything after the primary, disqualified agents included
    pub fn alternatives(&self) -> &[RankedAgent] {
        match self.primary() {
            Some(_) => &self.ranked[1..],
            None => &self.ranked,
        }
    }

    pub fn qualified(&self) -> impl Iterator<Item = &RankedAgent> {
        self.ranked.iter().filter(|r| r.is_qualified())
    }

    pub fn disqualified(&self) -> impl Iterator<Item = &RankedAgent> {
        self.ranked.iter().filter(|r| !r.is_qualified())
    }

    pub fn names(&self) -> Vec<&str> {
        self.ranked.iter().map(RankedAgent::name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RankedAgent> {
        self.ranked.iter().find(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
