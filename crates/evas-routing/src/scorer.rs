use std::sync::Arc;

use evas_core::AgentDescriptor;

use crate::signals::{matched_keywords, tokenize, Phrase};
use crate::types::{Disqualification, MatchedSignal, RankedAgent, RoutingConfig, SignalKind};

/// Pre-tokenized routing metadata of one agent
#[derive(Debug, Clone)]
pub struct AgentProfile {
    agent: Arc<AgentDescriptor>,
    triggers: Vec<(Phrase, Phrase)>,
    use_when: Vec<Phrase>,
    avoid_when: Vec<Phrase>,
    description: Vec<String>,
}

impl AgentProfile {
    pub fn build(agent: Arc<AgentDescriptor>) -> Self {
        let meta = &agent.metadata;
        let triggers = meta
            .triggers
            .iter()
            .map(|t| (Phrase::parse(&t.domain), Phrase::parse(&t.trigger)))
            .collect();
        let use_when = meta.use_when.iter().map(|p| Phrase::parse(p)).collect();
        let avoid_when = meta.avoid_when.iter().map(|p| Phrase::parse(p)).collect();
        let description = tokenize(&agent.description);

        Self {
            agent,
            triggers,
            use_when,
            avoid_when,
            description,
        }
    }

    pub fn agent(&self) -> &Arc<AgentDescriptor> {
        &self.agent
    }

    /// Score the agent against already tokenized task keywords
    pub fn score(&self, task: &[String], config: &RoutingConfig) -> RankedAgent {
        let name = self.agent.name.as_str();
        let alias = self.agent.prompt_alias();
        let mut signals = Vec::new();

        for (domain, trigger) in &self.triggers {
            if trigger.redirects_away_from(name, alias) || domain.redirects_away_from(name, alias)
            {
                continue;
            }
            push_signal(&mut signals, SignalKind::Trigger, trigger, task, config.trigger_weight);
            push_signal(&mut signals, SignalKind::Domain, domain, task, config.domain_weight);
        }

        for phrase in &self.use_when {
            if phrase.redirects_away_from(name, alias) {
                continue;
            }
            push_signal(&mut signals, SignalKind::UseWhen, phrase, task, config.use_when_weight);
        }

        let described = matched_keywords(&self.description, task);
        if !described.is_empty() {
            signals.push(MatchedSignal {
                kind: SignalKind::Description,
                phrase: self.agent.description.clone(),
                points: config.description_weight.saturating_mul(described.len() as u32),
                keywords: described,
            });
        }

        let score = signals
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.points));
        let disqualified = self.disqualification(task, config);

        RankedAgent {
            agent: Arc::clone(&self.agent),
            score,
            signals,
            disqualified,
        }
    }

    /// First `avoidWhen` entry the task covers well enough
    fn disqualification(&self, task: &[String], config: &RoutingConfig) -> Option<Disqualification> {
        self.avoid_when.iter().find_map(|phrase| {
            let total = phrase.keywords.len() as u32;
            let matched = phrase.matches(task);
            let hits = matched.len() as u32;
            let required = u64::from(total) * u64::from(config.avoid_min_coverage_pct.min(100));
            if hits == 0 || u64::from(hits) * 100 < required {
                return None;
            }
            Some(Disqualification {
                phrase: phrase.text.clone(),
                redirect: phrase.redirect.clone(),
                keywords: matched,
            })
        })
    }
}

fn push_signal(
    signals: &mut Vec<MatchedSignal>,
    kind: SignalKind,
    phrase: &Phrase,
    task: &[String],
    weight: u32,
) {
    let keywords = phrase.matches(task);
    if keywords.is_empty() {
        return;
    }
    signals.push(MatchedSignal {
        kind,
        phrase: phrase.text.clone(),
        points: weight.saturating_mul(keywords.len() as u32),
        keywords,
    });
}
