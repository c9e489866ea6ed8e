//! Prompt resolution for agent descriptors
//!
//! Prompts are opaque markdown handed to the host verbatim. They are compiled
//! in with [`embed_prompts!`](crate::embed_prompts) and can be replaced per
//! agent by `<name>.md` files in a prompts directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Agent name to prompt markdown, as produced by [`embed_prompts!`](crate::embed_prompts)
pub type PromptTable = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone)]
pub enum PromptSource {
    Embedded(PromptTable),
    /// `<dir>/<name>.md`, read at load time
    Directory(PathBuf),
    /// Directory first, then the embedded table
    Overlay { dir: PathBuf, embedded: PromptTable },
}

/// Resolves agent prompts, dropping any YAML frontmatter
#[derive(Debug, Clone)]
pub struct PromptLoader {
    source: PromptSource,
}

impl PromptLoader {
    pub fn embedded(table: PromptTable) -> Self {
        Self {
            source: PromptSource::Embedded(table),
        }
    }

    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: PromptSource::Directory(dir.into()),
        }
    }

    pub fn overlay(dir: impl Into<PathBuf>, embedded: PromptTable) -> Self {
        Self {
            source: PromptSource::Overlay {
                dir: dir.into(),
                embedded,
            },
        }
    }

    pub fn source(&self) -> &PromptSource {
        &self.source
    }

    pub fn try_load(&self, agent_name: &str) -> Option<String> {
        let raw = match &self.source {
            PromptSource::Embedded(table) => lookup(table, agent_name).map(str::to_string),
            PromptSource::Directory(dir) => read_from_dir(dir, agent_name),
            PromptSource::Overlay { dir, embedded } => read_from_dir(dir, agent_name)
                .or_else(|| lookup(embedded, agent_name).map(str::to_string)),
        };
        raw.map(|content| strip_frontmatter(&content))
    }

    /// Like [`try_load`](Self::try_load), with a placeholder for unknown agents
    pub fn load(&self, agent_name: &str) -> String {
        self.try_load(agent_name)
            .unwrap_or_else(|| missing_prompt(agent_name))
    }
}

fn lookup(table: PromptTable, agent_name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == agent_name)
        .map(|(_, content)| *content)
}

fn read_from_dir(dir: &Path, agent_name: &str) -> Option<String> {
    let path = dir.join(format!("{agent_name}.md"));
    match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "unreadable prompt file: {e}");
            None
        }
    }
}

/// Build a [`PromptTable`] from `include_str!` paths
///
/// ```ignore
/// static PROMPTS: evas_agents::PromptTable = evas_agents::embed_prompts!(
///     "explore" => "../prompts/explore.md",
///     "safety-oracle" => "../prompts/safety-oracle.md",
/// );
/// ```
#[macro_export]
macro_rules! embed_prompts {
    ($($name:literal => $path:literal),+ $(,)?) => {
        &[
            $(($name, include_str!($path))),+
        ]
    };
}

/// `prompts/` next to this crate's manifest
pub fn bundled_prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

/// Drop a leading `---` fenced block; unclosed blocks are left alone
pub fn strip_frontmatter(content: &str) -> String {
    let text = content.trim();
    let Some((fence, body)) = text
        .strip_prefix("---")
        .and_then(|rest| rest.split_once('\n'))
    else {
        return text.to_string();
    };
    if !fence.trim().is_empty() {
        return text.to_string();
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim() == "---" {
            return body[offset + line.len()..].trim().to_string();
        }
        offset += line.len();
    }
    text.to_string()
}

fn missing_prompt(agent_name: &str) -> String {
    format!("Agent: {agent_name}\n\nNo prompt available; add {agent_name}.md to the prompts directory.")
}
