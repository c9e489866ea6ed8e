use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use evas_agents::{
    apply_overrides, builtin_descriptors, parse_model_type, strip_frontmatter, AgentRegistry,
    PromptLoader, EMBEDDED_PROMPTS,
};
use evas_config::{resolve_config, CustomAgentConfig, EvasConfig, ResolvedConfig};
use evas_core::{AgentDescriptor, DirectiveParser};
use evas_permissions::{AuditLog, CapabilityGate, GateError, Grant};
use evas_routing::{
    Dispatch, HandoffChain, HandoffCoordinator, HandoffError, Router, RouterError,
};

/// Everything a host needs to route tasks and police agents
#[derive(Debug, Clone)]
pub struct Runtime {
    config: EvasConfig,
    source: Option<PathBuf>,
    registry: Arc<AgentRegistry>,
    router: Router,
    gate: CapabilityGate,
    coordinator: HandoffCoordinator,
}

impl Runtime {
    /// Load `config_path`, or the discovered configuration file, or defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let resolved = resolve_config(config_path)?;
        Self::from_config(&resolved)
    }

    /// Built-in catalog with default settings
    pub fn builtin() -> Result<Self> {
        Self::from_config(&ResolvedConfig {
            config: EvasConfig::default(),
            path: None,
            format: None,
        })
    }

    pub fn from_config(resolved: &ResolvedConfig) -> Result<Self> {
        let config = &resolved.config;
        let base_dir = resolved.base_dir();

        let descriptors = build_descriptors(config, &base_dir)?;
        let parser = DirectiveParser::new(config.handoff.implementer.clone());
        let registry = Arc::new(
            AgentRegistry::load(descriptors, &parser).context("Failed to load agent registry")?,
        );

        let router = Router::new(&registry, config.routing.clone());
        let gate = CapabilityGate::new(
            Arc::clone(&registry),
            AuditLog::shared(config.audit.capacity),
        );
        let coordinator = HandoffCoordinator::new(Arc::clone(&registry))
            .with_parser(parser)
            .with_max_depth(config.handoff.max_depth);

        Ok(Self {
            config: config.clone(),
            source: resolved.path.clone(),
            registry,
            router,
            gate,
            coordinator,
        })
    }

    pub fn config(&self) -> &EvasConfig {
        &self.config
    }

    /// Configuration file in effect, `None` for defaults
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    pub fn coordinator(&self) -> &HandoffCoordinator {
        &self.coordinator
    }

    pub fn select_agent(&self, task: &str) -> Result<Arc<AgentDescriptor>, RouterError> {
        self.router.select_agent(task)
    }

    pub fn authorize_tool(&self, agent: &str, tool: &str) -> Result<Grant, GateError> {
        self.gate.authorize(agent, tool)
    }

    pub fn start_chain(&self, origin: &str) -> Result<HandoffChain, HandoffError> {
        self.coordinator.start_chain(origin)
    }

    pub fn on_agent_output(
        &self,
        chain: &mut HandoffChain,
        output: &str,
    ) -> Result<Option<Dispatch>, HandoffError> {
        self.coordinator.on_agent_output(chain, output)
    }
}

/// Built-in and custom agents with overrides applied
fn build_descriptors(config: &EvasConfig, base_dir: &Path) -> Result<Vec<AgentDescriptor>> {
    let loader = match &config.agents.prompts_dir {
        Some(dir) => PromptLoader::overlay(resolve_path(base_dir, dir), EMBEDDED_PROMPTS),
        None => PromptLoader::embedded(EMBEDDED_PROMPTS),
    };

    let mut agents = builtin_descriptors(&loader);
    for custom in &config.agents.custom {
        agents.push(custom_descriptor(custom, &loader, base_dir)?);
    }

    Ok(apply_overrides(agents, Some(&config.agents.overrides)))
}

fn custom_descriptor(
    custom: &CustomAgentConfig,
    loader: &PromptLoader,
    base_dir: &Path,
) -> Result<AgentDescriptor> {
    let prompt = match (&custom.prompt, &custom.prompt_file) {
        (Some(prompt), _) => prompt.clone(),
        (None, Some(file)) => {
            let path = resolve_path(base_dir, file);
            let content = fs::read_to_string(&path).with_context(|| {
                format!(
                    "Failed to read prompt for custom agent '{}': {}",
                    custom.name,
                    path.display()
                )
            })?;
            strip_frontmatter(&content)
        }
        (None, None) => loader.load(&custom.name),
    };

    let mut agent = AgentDescriptor::new(
        custom.name.clone(),
        custom.description.clone(),
        prompt,
        custom.metadata.clone(),
    )
    .with_tools(custom.tools.iter().cloned());

    if let Some(model) = custom.model.as_deref() {
        let model = parse_model_type(model)
            .with_context(|| format!("Invalid model for custom agent '{}'", custom.name))?;
        agent = agent.with_model(model);
    }

    tracing::debug!(agent = %agent.name, "custom agent configured");
    Ok(agent)
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evas_config::load_config_from_file;
    use evas_core::{AgentCategory, ModelType};
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> ResolvedConfig {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        load_config_from_file(&path).unwrap()
    }

    #[test]
    fn builtin_runtime_routes_and_gates() {
        let runtime = Runtime::builtin().unwrap();
        assert_eq!(runtime.registry().len(), 8);
        assert!(runtime.source().is_none());

        assert_eq!(
            runtime.select_agent("EU CosIng Annex 확인").unwrap().name,
            "regulatory-oracle"
        );
        assert!(runtime.authorize_tool("safety-oracle", "Read").is_ok());
        assert_eq!(
            runtime.authorize_tool("safety-oracle", "Write").unwrap_err(),
            GateError::CapabilityDenied {
                agent: "safety-oracle".to_string(),
                tool: "Write".to_string(),
            }
        );
        assert_eq!(runtime.gate().audit_log().len(), 1);
    }

    #[test]
    fn custom_agent_prompt_file_is_relative_to_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("prompts")).unwrap();
        fs::write(
            dir.path().join("prompts/packaging.md"),
            "---\nname: packaging-advisor\n---\nCheck container compatibility.",
        )
        .unwrap();

        let resolved = write_config(
            &dir,
            "evas.yaml",
            r#"
agents:
  custom:
    - name: packaging-advisor
      description: Packaging compatibility consultant
      prompt_file: prompts/packaging.md
      tools: [Read, Grep]
      model: claude-sonnet-4
      metadata:
        category: advisor
        cost: CHEAP
        useWhen: ["packaging container compatibility"]
"#,
        );

        let runtime = Runtime::from_config(&resolved).unwrap();
        let agent = runtime.registry().get("packaging-advisor").unwrap();
        assert_eq!(agent.prompt, "Check container compatibility.");
        assert_eq!(agent.model, ModelType::Sonnet);
        assert_eq!(agent.category(), AgentCategory::Advisor);
        assert_eq!(runtime.registry().len(), 9);
        assert_eq!(
            runtime
                .select_agent("packaging container compatibility")
                .unwrap()
                .name,
            "packaging-advisor"
        );
    }

    #[test]
    fn prompts_dir_overlays_embedded_prompts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("prompts")).unwrap();
        fs::write(dir.path().join("prompts/explore.md"), "Local explore prompt").unwrap();

        let resolved = write_config(
            &dir,
            "evas.json",
            r#"{"agents": {"prompts_dir": "prompts"}}"#,
        );
        let runtime = Runtime::from_config(&resolved).unwrap();

        assert_eq!(
            runtime.registry().get("explore").unwrap().prompt,
            "Local explore prompt"
        );
        assert_ne!(
            runtime.registry().get("librarian").unwrap().prompt,
            "Local explore prompt"
        );
    }

    #[test]
    fn mutation_tool_on_custom_advisor_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let resolved = write_config(
            &dir,
            "evas.json",
            r#"{"agents": {"custom": [{
                "name": "rogue-advisor",
                "prompt": "Advise.",
                "tools": ["Read", "Write"],
                "metadata": {"category": "advisor", "cost": "EXPENSIVE"}
            }]}}"#,
        );

        let err = Runtime::from_config(&resolved).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to load agent registry"));
        assert!(message.contains("rogue-advisor"));
    }

    #[test]
    fn disabling_escalation_target_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let resolved = write_config(
            &dir,
            "evas.json",
            r#"{"agents": {"overrides": {"regulatory-oracle": {"enabled": false}}}}"#,
        );
        assert!(Runtime::from_config(&resolved).is_err());
    }

    #[test]
    fn handoff_settings_are_applied() {
        let dir = TempDir::new().unwrap();
        let resolved = write_config(
            &dir,
            "evas.json",
            r#"{"handoff": {"max_depth": 1, "implementer": "cosmetic-junior"}}"#,
        );
        let runtime = Runtime::from_config(&resolved).unwrap();
        assert_eq!(runtime.coordinator().max_depth(), 1);

        let mut chain = runtime.start_chain("safety-oracle").unwrap();
        runtime
            .on_agent_output(&mut chain, "ESCALATE TO: regulatory-oracle")
            .unwrap()
            .unwrap();
        let err = runtime
            .on_agent_output(&mut chain, "IMPLEMENT: 배합 수정")
            .unwrap_err();
        assert!(matches!(err, HandoffError::DepthExceeded { max_depth: 1, .. }));
    }

    #[test]
    fn invalid_custom_model_is_reported() {
        let dir = TempDir::new().unwrap();
        let resolved = write_config(
            &dir,
            "evas.json",
            r#"{"agents": {"custom": [{
                "name": "helper",
                "prompt": "Help.",
                "tools": ["Read"],
                "model": "gpt-4o",
                "metadata": {"category": "utility", "cost": "FREE"}
            }]}}"#,
        );
        let err = Runtime::from_config(&resolved).unwrap_err();
        assert!(format!("{err:#}").contains("unknown model type: gpt-4o"));
    }
}
