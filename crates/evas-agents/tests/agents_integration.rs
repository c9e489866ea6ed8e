use evas_agents::{
    get_agent_definitions, strip_frontmatter, AgentFilter, AgentRegistry, PromptLoader,
    RegistryError, Violation, BUILTIN_AGENT_NAMES,
};
use evas_core::{
    AgentCategory, AgentCost, AgentDescriptor, AgentMetadata, AgentOverrideConfig,
    AgentOverrides, DirectiveParser,
};

fn load(descriptors: Vec<AgentDescriptor>) -> Result<AgentRegistry, RegistryError> {
    AgentRegistry::load(descriptors, &DirectiveParser::default())
}

#[test]
fn builtin_catalog_passes_validation() {
    let registry = load(get_agent_definitions(None)).unwrap();
    assert_eq!(registry.len(), BUILTIN_AGENT_NAMES.len());

    let advisors: Vec<_> = registry
        .list(AgentFilter::all().category(AgentCategory::Advisor))
        .map(|a| a.name.clone())
        .collect();
    assert_eq!(
        advisors,
        vec!["formulation-oracle", "regulatory-oracle", "safety-oracle"]
    );
}

#[test]
fn disabling_escalation_target_breaks_integrity() {
    let mut overrides = AgentOverrides::new();
    overrides.insert(
        "regulatory-oracle".to_string(),
        AgentOverrideConfig {
            enabled: Some(false),
            ..Default::default()
        },
    );

    let err = load(get_agent_definitions(Some(&overrides))).unwrap_err();
    let RegistryError::Integrity(report) = err else {
        panic!("expected integrity error");
    };
    assert_eq!(report.len(), 1);
    assert!(matches!(
        &report.violations[0],
        Violation::UnknownHandoffTarget { agent, target, .. }
            if agent == "safety-oracle" && target == "regulatory-oracle"
    ));
}

#[test]
fn disabling_implementer_breaks_formulation_handoff() {
    let mut overrides = AgentOverrides::new();
    overrides.insert(
        "cosmetic-junior".to_string(),
        AgentOverrideConfig {
            enabled: Some(false),
            ..Default::default()
        },
    );

    let Err(RegistryError::Integrity(report)) = load(get_agent_definitions(Some(&overrides)))
    else {
        panic!("expected integrity error");
    };
    assert!(report.iter().any(|v| v.agent() == "formulation-oracle"));
}

#[test]
fn advisor_with_write_fails_validation() {
    let mut defs = get_agent_definitions(None);
    let safety = defs.iter_mut().find(|a| a.name == "safety-oracle").unwrap();
    safety.tools.push("Write".to_string());

    let Err(RegistryError::Integrity(report)) = load(defs) else {
        panic!("expected integrity error");
    };
    assert!(report.to_string().contains("mutation tool 'Write'"));
}

#[test]
fn cheap_agents_listed_by_name() {
    let registry = load(get_agent_definitions(None)).unwrap();
    let cheap: Vec<_> = registry
        .list(AgentFilter::all().cost(AgentCost::Cheap))
        .map(|a| a.name.clone())
        .collect();
    assert_eq!(
        cheap,
        vec!["cosmetic-junior", "cosmetic-librarian", "explore", "librarian"]
    );
}

#[test]
fn custom_agent_can_join_builtin_catalog() {
    let mut defs = get_agent_definitions(None);
    defs.push(
        AgentDescriptor::new(
            "packaging-advisor",
            "Packaging compatibility",
            "Escalate unresolved cases.\n\nESCALATE TO: SafetyOracle\nISSUE: migration",
            AgentMetadata::new(AgentCategory::Advisor, AgentCost::Cheap),
        )
        .with_tools(["Read"]),
    );

    let registry = load(defs).unwrap();
    assert_eq!(
        registry.resolve("SafetyOracle").unwrap().name,
        "safety-oracle"
    );
}

#[test]
fn prompt_loader_embedded_map_strips_frontmatter() {
    static PROMPTS: &[(&str, &str)] = &[("a", "---\nname: a\n---\n\nHello")];
    let loader = PromptLoader::embedded(PROMPTS);
    assert_eq!(loader.load("a"), "Hello");
    assert!(loader.load("missing").contains("No prompt available"));
}

#[test]
fn frontmatter_is_dropped_from_prompt_files() {
    assert_eq!(
        strip_frontmatter("---\nname: x\nmodel: opus\n---\nBody"),
        "Body"
    );
}
