//! Built-in agent catalog
//!
//! Descriptions, tool allowlists and routing metadata of the EVAS cosmetic
//! agents. Prompts are resolved through a [`PromptLoader`] so they can be
//! edited on disk or embedded in the binary.

use evas_core::{AgentCategory, AgentCost, AgentDescriptor, AgentMetadata, AgentOverrides, ModelType};

use crate::config::apply_overrides;
use crate::prompt_loader::PromptLoader;

pub const BUILTIN_AGENT_NAMES: [&str; 8] = [
    "explore",
    "librarian",
    "cosmetic-librarian",
    "ingredient-explorer",
    "formulation-oracle",
    "safety-oracle",
    "regulatory-oracle",
    "cosmetic-junior",
];

/// Built-in descriptors with embedded prompts and `overrides` applied
pub fn get_agent_definitions(overrides: Option<&AgentOverrides>) -> Vec<AgentDescriptor> {
    let loader = PromptLoader::embedded(crate::prompts::EMBEDDED_PROMPTS);
    get_agent_definitions_with_loader(&loader, overrides)
}

pub fn get_agent_definitions_with_loader(
    prompt_loader: &PromptLoader,
    overrides: Option<&AgentOverrides>,
) -> Vec<AgentDescriptor> {
    apply_overrides(builtin_descriptors(prompt_loader), overrides)
}

/// Every built-in descriptor, in catalog order
pub fn builtin_descriptors(loader: &PromptLoader) -> Vec<AgentDescriptor> {
    vec![
        explore(loader),
        librarian(loader),
        cosmetic_librarian(loader),
        ingredient_explorer(loader),
        formulation_oracle(loader),
        safety_oracle(loader),
        regulatory_oracle(loader),
        cosmetic_junior(loader),
    ]
}

fn explore(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Exploration, AgentCost::Cheap)
        .with_alias("Explore")
        .trigger("Internal codebase search", "Finding implementations, patterns, files")
        .trigger("Project structure", "Understanding code organization")
        .trigger("Code discovery", "Locating specific code by pattern")
        .trigger(
            "Formulation files",
            "Finding JSON formulations, batch data, ingredient lists",
        )
        .trigger(
            "Skill files",
            "Locating SKILL.md, scripts, references in skills/",
        )
        .use_when([
            "Finding files by pattern or name",
            "Searching for implementations in current project",
            "Understanding project structure",
            "Locating code by content or pattern",
            "Quick codebase exploration",
            "Finding formulation JSON files",
            "Locating skill definitions (SKILL.md)",
            "Searching ingredient data files",
        ])
        .avoid_when([
            "External documentation lookup (use librarian)",
            "GitHub/npm package research (use librarian)",
            "Complex architectural analysis (use oracle)",
            "When you already know the file location",
            "External cosmetic DB queries (use cosmetic-librarian)",
            "PubMed searches (use cosmetic-librarian)",
            "Quick INCI lookups (use ingredient-explorer)",
        ]);

    AgentDescriptor::new(
        "explore",
        "Fast codebase exploration and pattern search. Use for finding files, understanding structure, locating implementations. Searches INTERNAL codebase.",
        loader.load("explore"),
        metadata,
    )
    .with_tools(["Glob", "Grep", "Read"])
    .with_model(ModelType::Haiku)
}

fn librarian(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Exploration, AgentCost::Cheap)
        .with_alias("Librarian")
        .trigger("External documentation", "API references, official docs")
        .trigger("OSS implementations", "GitHub examples, package source")
        .trigger("Best practices", "Community patterns, recommendations")
        .trigger(
            "Cosmetic databases",
            "CosIng, ICID, INCI lookup (delegate to cosmetic-librarian)",
        )
        .trigger(
            "Ingredient research",
            "PubMed search, clinical studies (delegate to cosmetic-librarian)",
        )
        .trigger("Safety databases", "EWG, CIR data (delegate to safety-oracle)")
        .use_when([
            "Looking up official documentation",
            "Finding GitHub examples",
            "Researching npm/pip packages",
            "Stack Overflow solutions",
            "External API references",
        ])
        .avoid_when([
            "Internal codebase search (use explore)",
            "Current project files (use explore)",
            "When you already have the information",
            "Cosmetic ingredient database searches (use cosmetic-librarian)",
            "PubMed/clinical research (use cosmetic-librarian)",
            "Quick INCI/CAS lookups (use ingredient-explorer)",
            "Safety database queries (use safety-oracle)",
        ]);

    AgentDescriptor::new(
        "librarian",
        "Documentation researcher and external reference finder. Use for official docs, GitHub examples, OSS implementations, API references. Searches EXTERNAL resources, not internal codebase.",
        loader.load("librarian"),
        metadata,
    )
    .with_tools(["Read", "Grep", "Glob", "WebFetch", "WebSearch"])
    .with_model(ModelType::Sonnet)
}

fn cosmetic_librarian(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Exploration, AgentCost::Cheap)
        .with_alias("CosmeticLibrarian")
        .trigger("성분 연구", "INCI 정보, 효능, 작용 기전, 특성")
        .trigger("데이터베이스 조회", "CosIng, ICID, EWG, CIR 데이터")
        .trigger("트렌드 리서치", "시장 트렌드, 신원료, 특허")
        .use_when([
            "성분의 INCI명, CAS 번호, 기능 조회",
            "EU CosIng 데이터베이스 검색",
            "학술 논문 및 특허 검색",
            "시장 트렌드 및 신원료 동향",
            "공급사 및 원료 정보 검색",
        ])
        .avoid_when([
            "단순 파일 내 성분 검색 (ingredient-explorer 사용)",
            "배합 분석 필요 (formulation-oracle 사용)",
            "안전성 평가 필요 (safety-oracle 사용)",
            "규제 상세 분석 (regulatory-oracle 사용)",
        ]);

    AgentDescriptor::new(
        "cosmetic-librarian",
        "화장품 성분 연구 전문가. CosIng, ICID, CIR, EWG 데이터베이스 조회, 학술 문헌 검색, 트렌드 리서치 전문.",
        loader.load("cosmetic-librarian"),
        metadata,
    )
    .with_tools(["Read", "Grep", "Glob", "WebSearch", "WebFetch"])
    .with_model(ModelType::Sonnet)
}

fn ingredient_explorer(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Exploration, AgentCost::Free)
        .with_alias("IngredientExplorer")
        .trigger("로컬 성분 검색", "파일 내 성분 찾기, JSON 조회, 배합표 검색")
        .trigger("패턴 매칭", "성분명 검색, INCI 패턴, 농도 찾기")
        .trigger("프로젝트 구조", "스킬 파일 위치, 리소스 탐색")
        .use_when([
            "프로젝트 내 성분 데이터 빠른 검색",
            "배합표 파일에서 특정 성분 찾기",
            "JSON/CSV 성분 데이터베이스 조회",
            "스킬 및 리소스 파일 위치 확인",
            "간단한 패턴 매칭 검색",
        ])
        .avoid_when([
            "외부 데이터베이스 조회 필요 (cosmetic-librarian 사용)",
            "안전성 분석 필요 (safety-oracle 사용)",
            "배합 분석 필요 (formulation-oracle 사용)",
            "복잡한 다중 조건 검색 (oracle 에이전트 사용)",
        ]);

    AgentDescriptor::new(
        "ingredient-explorer",
        "성분 빠른 조회 전문가. 프로젝트 내 성분 데이터, 배합표, JSON 파일 빠른 검색. 경량 탐색 에이전트.",
        loader.load("ingredient-explorer"),
        metadata,
    )
    .with_tools(["Glob", "Grep", "Read"])
    .with_model(ModelType::Haiku)
}

fn formulation_oracle(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Advisor, AgentCost::Expensive)
        .with_alias("FormulationOracle")
        .trigger("배합/처방 설계", "HLB 계산, 유화 시스템, 점도 조절, pH 최적화")
        .trigger("성분 호환성", "성분 간 상호작용, 비호환성 분석, 안정성 예측")
        .trigger("제형 전략", "베이스 선택, 활성성분 안정화, 제형 유형 결정")
        .use_when([
            "HLB 계산 및 유화제 블렌드 최적화",
            "복합 성분 간 호환성 분석",
            "pH 민감 성분의 최적 조건 설계",
            "안정성 예측 및 문제 진단",
            "스케일업 시 배합 조정 전략",
        ])
        .avoid_when([
            "단순 성분 정보 조회 (ingredient-explorer 사용)",
            "규제 관련 질문 (regulatory-oracle 사용)",
            "안전성/독성 평가 (safety-oracle 사용)",
            "단순 배합표 작성 (cosmetic-junior 사용)",
        ]);

    AgentDescriptor::new(
        "formulation-oracle",
        "화장품 배합/처방 전문 컨설턴트. HLB 계산, 성분 호환성 분석, pH 최적화, 안정성 예측 전문가. READ-ONLY 분석 및 권장사항 제공.",
        loader.load("formulation-oracle"),
        metadata,
    )
    .with_tools(["Read", "Grep", "Glob", "Bash", "WebSearch"])
}

fn safety_oracle(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Advisor, AgentCost::Expensive)
        .with_alias("SafetyOracle")
        .trigger("성분 안전성", "EWG 등급, CIR 평가, 독성, 알레르기")
        .trigger("MoS 계산", "Margin of Safety, NOAEL, SED, 경피 흡수")
        .trigger("자극성 평가", "피부 자극, 눈 자극, 민감 피부, 코메도제닉")
        .use_when([
            "EWG Skin Deep 등급 종합 분석",
            "CIR 안전성 평가 검토",
            "MoS (Margin of Safety) 계산",
            "자극성/알레르기 위험 평가",
            "CPSR 안전성 보고서 검토",
        ])
        .avoid_when([
            "단순 성분 정보 조회 (ingredient-explorer 사용)",
            "배합/처방 관련 질문 (formulation-oracle 사용)",
            "규제 준수 확인 (regulatory-oracle 사용)",
            "트렌드/마케팅 분석 (cosmetic-librarian 사용)",
        ]);

    AgentDescriptor::new(
        "safety-oracle",
        "화장품 안전성 전문 컨설턴트. EWG/CIR 분석, MoS 계산, 자극성 예측, 코메도제닉 평가 전문가. READ-ONLY 분석 및 위험 평가 제공.",
        loader.load("safety-oracle"),
        metadata,
    )
    .with_tools(["Read", "Grep", "Glob", "Bash", "WebSearch", "WebFetch"])
}

fn regulatory_oracle(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Advisor, AgentCost::Expensive)
        .with_alias("RegulatoryOracle")
        .trigger("다국가 규제", "EU, 한국, 미국, 중국, 일본 규제 준수")
        .trigger("기능성 화장품", "한국 식약처 기능성 심사, 고시원료")
        .trigger("수출 인허가", "CPSR, NMPA 등록, FDA, 동물실험")
        .use_when([
            "다중 국가 규제 매트릭스 분석",
            "EU CosIng Annex 확인",
            "한국 기능성 고시원료 확인",
            "수출 요건 및 필요 서류 분석",
            "클레임 규제 검토",
        ])
        .avoid_when([
            "안전성 평가 (safety-oracle 사용)",
            "배합 관련 질문 (formulation-oracle 사용)",
            "단순 성분 조회 (ingredient-explorer 사용)",
            "트렌드 분석 (cosmetic-librarian 사용)",
        ]);

    AgentDescriptor::new(
        "regulatory-oracle",
        "화장품 규제 전문 컨설턴트. EU/한국/미국/중국/일본 규제 분석, CPSR, 기능성 심사, 수출 요건 전문가. READ-ONLY 규제 분석 제공.",
        loader.load("regulatory-oracle"),
        metadata,
    )
    .with_tools(["Read", "Grep", "Glob", "Bash", "WebSearch", "WebFetch"])
}

/// Receives `IMPLEMENT:` directives from the formulation oracle
fn cosmetic_junior(loader: &PromptLoader) -> AgentDescriptor {
    let metadata = AgentMetadata::new(AgentCategory::Specialist, AgentCost::Cheap)
        .with_alias("CosmeticJunior")
        .trigger("배합 구현", "배합표 작성, 배합 파일 수정, 배치 기록 업데이트")
        .use_when([
            "단순 배합표 작성",
            "IMPLEMENT 지시에 따른 배합 파일 수정",
            "배치 기록 및 공정 문서 업데이트",
        ])
        .avoid_when([
            "HLB 계산 및 제형 설계 (formulation-oracle 사용)",
            "안전성 평가 (safety-oracle 사용)",
            "규제 검토 (regulatory-oracle 사용)",
        ]);

    AgentDescriptor::new(
        "cosmetic-junior",
        "화장품 배합 구현 담당. 배합 설계 지시를 받아 배합표, 배치 기록 등 프로젝트 파일을 직접 수정.",
        loader.load("cosmetic-junior"),
        metadata,
    )
    .with_tools(["Read", "Write", "Edit", "Glob", "Grep", "Bash"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use evas_core::AgentOverrideConfig;
    use tempfile::tempdir;

    #[test]
    fn returns_all_known_agents_in_catalog_order() {
        let tmp = tempdir().unwrap();
        let loader = PromptLoader::directory(tmp.path());
        let defs = get_agent_definitions_with_loader(&loader, None);

        let names: Vec<_> = defs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, BUILTIN_AGENT_NAMES);
    }

    #[test]
    fn advisors_run_on_opus_and_never_mutate() {
        for agent in get_agent_definitions(None) {
            if agent.category() == AgentCategory::Advisor {
                assert_eq!(agent.model, ModelType::Opus, "{}", agent.name);
                assert_eq!(agent.mutation_tools().count(), 0, "{}", agent.name);
            }
        }
    }

    #[test]
    fn embedded_prompts_have_frontmatter_stripped() {
        let defs = get_agent_definitions(None);
        let safety = defs.iter().find(|a| a.name == "safety-oracle").unwrap();
        assert!(!safety.prompt.starts_with("---"));
        assert!(safety.prompt.contains("ESCALATE TO: regulatory-oracle"));
    }

    #[test]
    fn advisor_prompts_carry_reference_tables() {
        let defs = get_agent_definitions(None);
        let prompt = |name: &str| {
            defs.iter()
                .find(|a| a.name == name)
                .map(|a| a.prompt.clone())
                .unwrap()
        };

        let safety = prompt("safety-oracle");
        assert!(safety.starts_with("<Role>"));
        assert!(safety.contains("MoS = NOAEL × BW / (SED × 100)"));
        assert!(safety.contains("| Score | Level | Description |"));

        let regulatory = prompt("regulatory-oracle");
        assert!(regulatory.contains("## 1. EU 화장품 규제 (EC 1223/2009)"));
        assert!(regulatory.contains("## 6. ASEAN ACD"));
    }

    #[test]
    fn override_model_is_applied() {
        let mut overrides = AgentOverrides::new();
        overrides.insert(
            "librarian".to_string(),
            AgentOverrideConfig {
                model: Some("haiku".to_string()),
                ..Default::default()
            },
        );
        let defs = get_agent_definitions(Some(&overrides));
        let librarian = defs.iter().find(|a| a.name == "librarian").unwrap();
        assert_eq!(librarian.model, ModelType::Haiku);
    }
}
