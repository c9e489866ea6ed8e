use evas_core::{AgentDescriptor, AgentOverrideConfig, AgentOverrides, ModelType};

#[derive(Debug, thiserror::Error)]
pub enum AgentConfigError {
    #[error("unknown model type: {0}")]
    UnknownModelType(String),
}

/// Lenient model parse: any id containing a tier name maps to that tier
pub fn parse_model_type(s: &str) -> Result<ModelType, AgentConfigError> {
    let lower = s.to_lowercase();
    if lower.contains("haiku") {
        Ok(ModelType::Haiku)
    } else if lower.contains("sonnet") {
        Ok(ModelType::Sonnet)
    } else if lower.contains("opus") {
        Ok(ModelType::Opus)
    } else {
        Err(AgentConfigError::UnknownModelType(s.to_string()))
    }
}

pub fn merge_agent_config(
    base: &AgentDescriptor,
    override_cfg: &AgentOverrideConfig,
) -> AgentDescriptor {
    let mut merged = base.clone();

    if let Some(model) = override_cfg.model.as_deref() {
        match parse_model_type(model) {
            Ok(mt) => merged.model = mt,
            Err(e) => tracing::warn!(agent = %base.name, "ignoring model override: {e}"),
        }
    }

    if let Some(prompt_append) = override_cfg.prompt_append.as_deref() {
        if !prompt_append.trim().is_empty() {
            merged.prompt = format!("{}\n\n{}", merged.prompt.trim_end(), prompt_append.trim());
        }
    }

    merged
}

/// Apply per-agent overrides; `enabled: false` drops the agent entirely
pub fn apply_overrides(
    agents: Vec<AgentDescriptor>,
    overrides: Option<&AgentOverrides>,
) -> Vec<AgentDescriptor> {
    let Some(overrides) = overrides else {
        return agents;
    };

    for name in overrides.keys() {
        if !agents.iter().any(|a| &a.name == name) {
            tracing::warn!(agent = %name, "override for unknown agent ignored");
        }
    }

    agents
        .into_iter()
        .filter_map(|agent| match overrides.get(&agent.name) {
            Some(cfg) if cfg.enabled == Some(false) => {
                tracing::debug!(agent = %agent.name, "agent disabled by override");
                None
            }
            Some(cfg) => Some(merge_agent_config(&agent, cfg)),
            None => Some(agent),
        })
        .collect()
}
