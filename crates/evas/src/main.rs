//! EVAS - agent registry and router

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use evas::{Cli, Commands, Runtime};
use evas_agents::{AgentFilter, RegistryError};
use evas_config::resolve_config;
use evas_core::{AgentCategory, AgentCost, AgentDescriptor, ModelType};
use evas_routing::RouterError;
use serde::Serialize;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let resolved = resolve_config(cli.config.as_deref())?;
    evas_telemetry::init_subscriber(&resolved.config.telemetry);
    let runtime = Runtime::from_config(&resolved)?;

    match cli.command {
        Commands::Agents {
            category,
            cost,
            json,
        } => run_agents(&runtime, AgentFilter { category, cost }, json),
        Commands::Show { name, prompt } => run_show(&runtime, &name, prompt),
        Commands::Route {
            task,
            json,
            explain,
        } => run_route(&runtime, &task.join(" "), json, explain),
        Commands::Check => run_check(&runtime),
        Commands::Authorize { agent, tool } => run_authorize(&runtime, &agent, &tool),
        Commands::Handoff { from, file } => run_handoff(&runtime, &from, file.as_deref()),
    }
}

#[derive(Serialize)]
struct AgentSummary<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<&'a str>,
    category: AgentCategory,
    cost: AgentCost,
    model: ModelType,
    tools: &'a [String],
    description: &'a str,
}

impl<'a> From<&'a AgentDescriptor> for AgentSummary<'a> {
    fn from(agent: &'a AgentDescriptor) -> Self {
        Self {
            name: &agent.name,
            alias: agent.prompt_alias(),
            category: agent.category(),
            cost: agent.cost(),
            model: agent.model,
            tools: &agent.tools,
            description: &agent.description,
        }
    }
}

fn run_agents(runtime: &Runtime, filter: AgentFilter, json: bool) -> Result<()> {
    let agents: Vec<_> = runtime.registry().list(filter).collect();

    if json {
        let summaries: Vec<_> = agents
            .iter()
            .map(|a| AgentSummary::from(a.as_ref()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!("{}", "No agents match.".dimmed());
        return Ok(());
    }

    println!("{}", "Registered agents:".cyan().bold());
    println!("{}", "─".repeat(80).dimmed());
    for agent in agents {
        println!(
            "{} {} {} {} {}",
            format!("{:<22}", agent.name).yellow(),
            format!("{:<13}", agent.category().as_str()),
            format!("{:<10}", agent.cost().as_str()).cyan(),
            format!("{:<7}", agent.model.as_str()).dimmed(),
            agent.description
        );
    }
    Ok(())
}

fn run_show(runtime: &Runtime, name: &str, with_prompt: bool) -> Result<()> {
    let agent = runtime
        .registry()
        .resolve(name)
        .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

    match agent.prompt_alias() {
        Some(alias) => println!("{} ({})", agent.name.yellow().bold(), alias),
        None => println!("{}", agent.name.yellow().bold()),
    }
    println!("{}", agent.description.dimmed());
    println!("{}", "─".repeat(50).dimmed());
    println!("{}: {}", "Category".cyan(), agent.category());
    println!("{}: {}", "Cost".cyan(), agent.cost());
    println!("{}: {}", "Model".cyan(), agent.model);
    println!("{}: {}", "Tools".cyan(), agent.tools.join(", "));

    let metadata = &agent.metadata;
    if !metadata.triggers.is_empty() {
        println!("{}:", "Triggers".cyan());
        for t in &metadata.triggers {
            println!("  - {}: {}", t.domain, t.trigger);
        }
    }
    if !metadata.use_when.is_empty() {
        println!("{}:", "Use when".cyan());
        for item in &metadata.use_when {
            println!("  - {item}");
        }
    }
    if !metadata.avoid_when.is_empty() {
        println!("{}:", "Avoid when".cyan());
        for item in &metadata.avoid_when {
            println!("  - {item}");
        }
    }

    if with_prompt {
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", agent.prompt);
    }
    Ok(())
}

fn run_route(runtime: &Runtime, task: &str, json: bool, explain: bool) -> Result<()> {
    if explain {
        println!("{}", runtime.router().explain(task));
        return Ok(());
    }

    let selection = runtime.router().select(task)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    let primary = selection
        .primary()
        .ok_or_else(|| RouterError::AllDisqualified {
            best: selection
                .ranked
                .first()
                .map(|r| r.name().to_string())
                .unwrap_or_default(),
        })?;

    println!(
        "{} {} (score {}, {})",
        "Selected:".green().bold(),
        primary.name().yellow(),
        primary.score,
        primary.agent.cost()
    );

    let alternatives: Vec<_> = selection
        .alternatives()
        .iter()
        .filter(|r| r.is_qualified() && r.score > 0)
        .collect();
    if !alternatives.is_empty() {
        println!("{}", "Alternatives:".cyan());
        for r in alternatives {
            println!("  {} (score {}, {})", r.name(), r.score, r.agent.cost());
        }
    }

    let disqualified: Vec<_> = selection.disqualified().map(|r| r.name()).collect();
    if !disqualified.is_empty() {
        println!(
            "{} {}",
            "Disqualified:".dimmed(),
            disqualified.join(", ").dimmed()
        );
    }
    Ok(())
}

fn run_check(runtime: &Runtime) -> Result<()> {
    let registry = runtime.registry();
    let parser = runtime.coordinator().parser();

    let source = runtime
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!("{}: {}", "Config".cyan(), source);

    let mut edges = Vec::new();
    for agent in registry.iter() {
        for directive in parser.parse_all(&agent.prompt) {
            let target = registry
                .resolve(&directive.target)
                .map(|t| t.name.clone())
                .unwrap_or(directive.target);
            edges.push(format!(
                "{} -> {} ({})",
                agent.name,
                target,
                directive.kind.as_str()
            ));
        }
    }
    if !edges.is_empty() {
        println!("{}:", "Hand-offs".cyan());
        for edge in edges {
            println!("  {edge}");
        }
    }

    println!(
        "{} {} agents registered, integrity checks passed",
        "✓".green(),
        registry.len()
    );
    Ok(())
}

fn run_authorize(runtime: &Runtime, agent: &str, tool: &str) -> Result<()> {
    let grant = runtime.authorize_tool(agent, tool)?;
    println!(
        "{} {} may use {} ({})",
        "✓".green(),
        grant.agent().name.yellow(),
        grant.tool(),
        grant.class().as_str()
    );
    Ok(())
}

fn run_handoff(runtime: &Runtime, from: &str, file: Option<&Path>) -> Result<()> {
    let output = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent output: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read agent output from stdin")?;
            buf
        }
    };

    let mut chain = runtime.start_chain(from)?;
    match runtime.on_agent_output(&mut chain, &output)? {
        Some(dispatch) => {
            println!(
                "{} {} {} -> {}",
                "Hand-off:".green().bold(),
                dispatch.directive.kind.as_str(),
                dispatch.from,
                dispatch.target.name.yellow()
            );
            println!("{}", "Task:".cyan());
            for line in dispatch.task.lines() {
                println!("  {line}");
            }
        }
        None => println!("{}", "No hand-off directive found.".dimmed()),
    }
    Ok(())
}
