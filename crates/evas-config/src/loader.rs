use crate::schema::EvasConfig;
use anyhow::{anyhow, bail, Context, Result};
use evas_routing::RoutingConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Jsonc,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;

        match ext {
            "jsonc" => Some(Self::Jsonc),
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// A loaded configuration and where it came from
///
/// `path` and `format` are `None` when no file was found and defaults apply.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: EvasConfig,
    pub path: Option<PathBuf>,
    pub format: Option<ConfigFormat>,
}

impl ResolvedConfig {
    /// Directory that relative paths in the configuration are resolved against
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<EvasConfig> {
    resolve_config(config_path).map(|r| r.config)
}

/// Load `config_path`, or the first discovered file, or defaults
pub fn resolve_config(config_path: Option<&Path>) -> Result<ResolvedConfig> {
    if let Some(path) = config_path {
        return load_config_from_file(path);
    }

    match find_config_file() {
        Some(path) => load_config_from_file(&path),
        None => Ok(ResolvedConfig {
            config: EvasConfig::default(),
            path: None,
            format: None,
        }),
    }
}

pub fn load_config_from_file(path: &Path) -> Result<ResolvedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| anyhow!("Unknown config format for: {}", path.display()))?;

    let config = parse_config_content(&content, format)?;
    let config = expand_env_vars(config);
    validate(&config).with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(ResolvedConfig {
        config,
        path: Some(path.to_path_buf()),
        format: Some(format),
    })
}

fn parse_config_content(content: &str, format: ConfigFormat) -> Result<EvasConfig> {
    match format {
        ConfigFormat::Jsonc => json5::from_str(content).context("Failed to parse JSONC"),
        ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content).context("Failed to parse YAML"),
    }
}

fn validate(config: &EvasConfig) -> Result<()> {
    if config.handoff.max_depth == 0 {
        bail!("handoff.max_depth must be at least 1");
    }
    if config.handoff.implementer.trim().is_empty() {
        bail!("handoff.implementer must not be empty");
    }
    let routing = &config.routing;
    if !(1..=100).contains(&routing.avoid_min_coverage_pct) {
        bail!(
            "routing.avoid_min_coverage_pct must be between 1 and 100, got {}",
            routing.avoid_min_coverage_pct
        );
    }
    for (key, weight) in routing.weights() {
        if weight > RoutingConfig::MAX_WEIGHT {
            bail!(
                "routing.{key} must be at most {}, got {weight}",
                RoutingConfig::MAX_WEIGHT
            );
        }
    }
    for custom in &config.agents.custom {
        if custom.prompt.is_some() && custom.prompt_file.is_some() {
            bail!(
                "custom agent '{}' sets both prompt and prompt_file",
                custom.name
            );
        }
    }
    Ok(())
}

pub const CONFIG_CANDIDATES: &[&str] = &[
    "evas.jsonc",
    "evas.json",
    "evas.yml",
    "evas.yaml",
    ".evas.jsonc",
    ".evas.json",
    ".evas.yml",
    ".evas.yaml",
];

/// First candidate in the working directory, then in `~/.config/evas/`
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = find_config_file_in(Path::new(".")) {
        return Some(path);
    }

    let home = env::var("HOME").ok()?;
    find_config_file_in(&PathBuf::from(home).join(".config").join("evas"))
}

pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.exists())
}

fn expand_env_vars(mut config: EvasConfig) -> EvasConfig {
    if let Some(dir) = &config.agents.prompts_dir {
        config.agents.prompts_dir = Some(expand_env_string(dir));
    }
    for custom in config.agents.custom.iter_mut() {
        if let Some(file) = &custom.prompt_file {
            custom.prompt_file = Some(expand_env_string(file));
        }
    }
    config
}

fn expand_env_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        if chars.peek() == Some(&'{') {
            // ${VAR}
            chars.next();
            let var_name: String = chars.by_ref().take_while(|&c| c != '}').collect();
            match env::var(&var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => {
                    result.push_str("${");
                    result.push_str(&var_name);
                    result.push('}');
                }
            }
            continue;
        }

        // $VAR
        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                var_name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if var_name.is_empty() {
            result.push('$');
        } else if let Ok(value) = env::var(&var_name) {
            result.push_str(&value);
        } else {
            result.push('$');
            result.push_str(&var_name);
        }
    }

    result
}
