use std::sync::Arc;

use evas_agents::{get_agent_definitions, AgentRegistry};
use evas_core::{AgentCategory, AgentCost, AgentDescriptor, AgentMetadata, DirectiveParser};
use evas_routing::{HandoffCoordinator, HandoffError, Router};

fn builtin_registry() -> Arc<AgentRegistry> {
    Arc::new(
        AgentRegistry::load(get_agent_definitions(None), &DirectiveParser::default()).unwrap(),
    )
}

fn builtin(name: &str) -> AgentDescriptor {
    get_agent_definitions(None)
        .into_iter()
        .find(|a| a.name == name)
        .unwrap()
}

#[test]
fn internal_search_prefers_free_explore_over_librarian() {
    let mut explore = builtin("explore").with_tools(["Glob", "Grep", "Read"]);
    explore.metadata.cost = AgentCost::Free;
    let librarian =
        builtin("librarian").with_tools(["Read", "Grep", "Glob", "WebFetch", "WebSearch"]);

    let mut registry = AgentRegistry::new();
    registry.register(explore).unwrap();
    registry.register(librarian).unwrap();
    let router = Router::with_defaults(&registry);

    let selection = router.select("find internal function implementation").unwrap();
    assert_eq!(selection.names(), vec!["explore", "librarian"]);
    assert!(selection.ranked.iter().all(|r| r.is_qualified()));

    let explore = selection.get("explore").unwrap();
    assert!(explore
        .signals
        .iter()
        .any(|s| s.phrase == "Internal codebase search"));
}

#[test]
fn ewg_question_goes_to_safety_oracle() {
    let explorer_meta = AgentMetadata::new(AgentCategory::Exploration, AgentCost::Free)
        .trigger("성분 검색", "EWG 등급 빠른 조회")
        .avoid_when(["EWG safety ratings (use safety-oracle)"]);
    let explorer = AgentDescriptor::new("ingredient-explorer", "", "", explorer_meta)
        .with_tools(["Glob", "Grep", "Read"]);

    let mut registry = AgentRegistry::new();
    registry.register(explorer).unwrap();
    registry.register(builtin("safety-oracle")).unwrap();
    registry.register(builtin("cosmetic-librarian")).unwrap();
    let router = Router::with_defaults(&registry);

    let task = "What's the EWG rating for Retinol?";
    let selection = router.select(task).unwrap();
    assert_eq!(selection.primary().unwrap().name(), "safety-oracle");

    let last = selection.ranked.last().unwrap();
    assert_eq!(last.name(), "ingredient-explorer");
    assert!(last.score > 0);
    assert_eq!(
        last.disqualified.as_ref().unwrap().redirect.as_deref(),
        Some("safety-oracle")
    );
    assert_eq!(router.select_agent(task).unwrap().name, "safety-oracle");
}

#[test]
fn builtin_catalog_routing_is_deterministic() {
    let registry = builtin_registry();
    let router = Router::with_defaults(&registry);

    for task in [
        "What's the EWG rating for Retinol?",
        "HLB 계산 및 유화제 블렌드 최적화",
        "EU CosIng Annex 확인",
        "find internal function implementation",
    ] {
        let first = router.select(task).unwrap().names().join(",");
        for _ in 0..5 {
            assert_eq!(router.select(task).unwrap().names().join(","), first);
        }
    }

    assert_eq!(
        router.select_agent("What's the EWG rating for Retinol?").unwrap().name,
        "safety-oracle"
    );
    assert_eq!(
        router.select_agent("HLB 계산 및 유화제 블렌드 최적화").unwrap().name,
        "formulation-oracle"
    );
    assert_eq!(
        router.select_agent("EU CosIng Annex 확인").unwrap().name,
        "regulatory-oracle"
    );
}

#[test]
fn selection_serializes_agent_names() {
    let registry = builtin_registry();
    let router = Router::with_defaults(&registry);
    let json = serde_json::to_value(router.select("MoS 계산").unwrap()).unwrap();
    assert_eq!(json["ranked"][0]["agent"], "safety-oracle");
    assert_eq!(json["ranked"].as_array().unwrap().len(), 8);
}

#[test]
fn librarian_delegation_loop_is_caught() {
    let coordinator = HandoffCoordinator::new(builtin_registry());
    let mut chain = coordinator.start_chain("librarian").unwrap();

    let dispatch = coordinator
        .on_agent_output(
            &mut chain,
            "User wants PubMed studies.\n→ DELEGATE to cosmetic-librarian (has pubmed-search skill)",
        )
        .unwrap()
        .unwrap();
    assert_eq!(dispatch.target.name, "cosmetic-librarian");
    assert_eq!(dispatch.task, "(has pubmed-search skill)");

    let err = coordinator
        .on_agent_output(&mut chain, "DELEGATE TO: Librarian")
        .unwrap_err();
    assert!(matches!(err, HandoffError::Cycle { ref agent, .. } if agent == "librarian"));
    assert!(err.to_string().contains("manual intervention"));
}

#[test]
fn formulation_implement_reaches_junior() {
    let coordinator = HandoffCoordinator::new(builtin_registry());
    let mut chain = coordinator.start_chain("FormulationOracle").unwrap();

    let dispatch = coordinator
        .on_agent_output(
            &mut chain,
            "IMPLEMENT: 유화제 블렌드 조정\nPRIORITY: 1\nFILES_TO_MODIFY:\n- formulation.json",
        )
        .unwrap()
        .unwrap();
    assert_eq!(dispatch.target.name, "cosmetic-junior");
    assert_eq!(
        dispatch.task,
        "유화제 블렌드 조정\nPRIORITY: 1\nFILES_TO_MODIFY:\n- formulation.json"
    );

    let back = coordinator
        .on_agent_output(&mut chain, "ESCALATE TO: formulation-oracle")
        .unwrap_err();
    assert!(matches!(back, HandoffError::Cycle { .. }));
}
