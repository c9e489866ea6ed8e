//! Hand-off directive grammar
//!
//! Agents delegate work by emitting a small line-oriented block somewhere in
//! their output:
//!
//! ```text
//! ESCALATE TO: regulatory-oracle
//! ISSUE: Retinol - concentration limit
//! MARKETS: EU, KR
//!
//! → DELEGATE to cosmetic-librarian (has pubmed-search skill)
//!
//! IMPLEMENT: adjust emulsifier blend
//! PRIORITY: 2
//! FILES_TO_MODIFY:
//! - formulation.json: raise HLB to 11
//! ```
//!
//! Head keywords are upper-case; `to` may use any case and the colon is
//! optional. `IMPLEMENT:` carries no target and is routed to the configured
//! implementer agent. Upper-case `KEY: value` lines and `- item` lines
//! following a field belong to the block; anything else ends it.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Agent that receives `IMPLEMENT:` directives unless configured otherwise
pub const DEFAULT_IMPLEMENTER: &str = "cosmetic-junior";

lazy_static! {
    static ref ROUTE_HEAD: Regex = Regex::new(
        r"^\s*(?:→|->|=>)?\s*(ESCALATE|DELEGATE|HANDOFF|HAND OFF)\s+(?i:to)\b\s*:?\s*(.*)$"
    )
    .unwrap();
    static ref IMPLEMENT_HEAD: Regex =
        Regex::new(r"^\s*(?:→|->|=>)?\s*IMPLEMENT\s*:\s*(.*)$").unwrap();
    static ref FIELD_LINE: Regex =
        Regex::new(r"^\s*([A-Z][A-Z0-9_]*(?: [A-Z0-9_]+)*)\s*:\s*(.*)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^\s*[-*]\s+(.*)$").unwrap();
    static ref TARGET: Regex =
        Regex::new(r"^[*`_]*([A-Za-z0-9][A-Za-z0-9_-]*)[*`_]*(.*)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandoffKind {
    Escalate,
    Delegate,
    Implement,
}

impl HandoffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandoffKind::Escalate => "escalate",
            HandoffKind::Delegate => "delegate",
            HandoffKind::Implement => "implement",
        }
    }
}

/// One `KEY: value` line plus any list items under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffField {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

/// Context forwarded to the target agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffPayload {
    /// Text following the head (implement summary or delegate note)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<HandoffField>,
}

impl HandoffPayload {
    pub fn field(&self, key: &str) -> Option<&HandoffField> {
        self.fields.iter().find(|f| f.key.eq_ignore_ascii_case(key))
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.fields.is_empty()
    }

    /// Render the payload as the task description for the next agent
    pub fn to_task_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(summary) = &self.summary {
            lines.push(summary.clone());
        }
        for field in &self.fields {
            if field.value.is_empty() {
                lines.push(format!("{}:", field.key));
            } else {
                lines.push(format!("{}: {}", field.key, field.value));
            }
            for item in &field.items {
                lines.push(format!("- {item}"));
            }
        }
        lines.join("\n")
    }
}

/// A parsed hand-off directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffDirective {
    pub kind: HandoffKind,
    /// Target agent name or prompt alias, as written
    pub target: String,
    pub payload: HandoffPayload,
    /// 1-based line of the directive head
    pub line: usize,
}

/// Line-oriented directive parser
#[derive(Debug, Clone)]
pub struct DirectiveParser {
    implementer: String,
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new(DEFAULT_IMPLEMENTER)
    }
}

impl DirectiveParser {
    pub fn new(implementer: impl Into<String>) -> Self {
        Self {
            implementer: implementer.into(),
        }
    }

    pub fn implementer(&self) -> &str {
        &self.implementer
    }

    /// First directive in `text`, if any
    pub fn parse(&self, text: &str) -> Option<HandoffDirective> {
        self.parse_all(text).into_iter().next()
    }

    /// Every directive in `text`, in order of appearance
    pub fn parse_all(&self, text: &str) -> Vec<HandoffDirective> {
        let mut out = Vec::new();
        let mut current: Option<HandoffDirective> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end();

            if let Some(head) = self.parse_head(line, idx + 1) {
                out.extend(current.take());
                current = Some(head);
                continue;
            }

            let Some(directive) = current.as_mut() else {
                continue;
            };

            if let Some(caps) = FIELD_LINE.captures(line) {
                directive.payload.fields.push(HandoffField {
                    key: caps[1].to_string(),
                    value: caps[2].trim().to_string(),
                    items: Vec::new(),
                });
                continue;
            }

            if let Some(caps) = LIST_ITEM.captures(line) {
                if let Some(field) = directive.payload.fields.last_mut() {
                    field.items.push(caps[1].trim().to_string());
                    continue;
                }
            }

            out.extend(current.take());
        }

        out.extend(current);
        out
    }

    fn parse_head(&self, line: &str, line_no: usize) -> Option<HandoffDirective> {
        if let Some(caps) = IMPLEMENT_HEAD.captures(line) {
            return Some(HandoffDirective {
                kind: HandoffKind::Implement,
                target: self.implementer.clone(),
                payload: HandoffPayload {
                    summary: non_empty(&caps[1]),
                    fields: Vec::new(),
                },
                line: line_no,
            });
        }

        let caps = ROUTE_HEAD.captures(line)?;
        let kind = match &caps[1] {
            "ESCALATE" => HandoffKind::Escalate,
            _ => HandoffKind::Delegate,
        };
        let target = TARGET.captures(caps[2].trim())?;

        Some(HandoffDirective {
            kind,
            target: target[1].to_string(),
            payload: HandoffPayload {
                summary: non_empty(&target[2]),
                fields: Vec::new(),
            },
            line: line_no,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse the first directive using the default implementer
pub fn parse_handoff(text: &str) -> Option<HandoffDirective> {
    DirectiveParser::default().parse(text)
}
