//! Rule metadata
//!
//! Metadata is an immutable record built at compile time and passed by
//! reference to whatever needs it (engine, reporters, `parline rules`).

use crate::diagnostics::Severity;

/// Metadata associated with a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMetadata {
    /// Unique identifier for the rule (`category/name`)
    pub id: &'static str,
    /// Human-readable name for the rule
    pub name: &'static str,
    /// Short title
    pub title: &'static str,
    /// Message attached to every diagnostic
    pub message: &'static str,
    /// Detailed description of what the rule checks
    pub description: &'static str,
    /// Category this rule belongs to
    pub category: RuleCategory,
    /// Default severity level
    pub severity: Severity,
    /// Title of the code action offered as a fix
    pub fix_title: Option<&'static str>,
    /// Key identifying equivalent code actions for batch fixing
    pub fix_equivalence_key: Option<&'static str>,
}

impl RuleMetadata {
    pub fn is_fixable(&self) -> bool {
        self.fix_title.is_some()
    }
}

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Correctness issues such as syntax violations
    Correctness,
    /// Suspicious patterns that often indicate bugs
    Suspicious,
    /// Style and formatting preferences
    Style,
}

impl RuleCategory {
    /// Return the kebab-case slug used for IDs and filtering
    pub fn slug(&self) -> &'static str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Suspicious => "suspicious",
            RuleCategory::Style => "style",
        }
    }

    /// Parse a slug; unknown slugs yield `None`
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "correctness" | "syntax" => Some(RuleCategory::Correctness),
            "suspicious" => Some(RuleCategory::Suspicious),
            "style" | "formatting" => Some(RuleCategory::Style),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl serde::Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> serde::Deserialize<'de> for RuleCategory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        RuleCategory::from_slug(&slug)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rule category '{slug}'")))
    }
}

/// Adjacent parameters or arguments must not share a line
pub const PARAMETERS_ON_SEPARATE_LINES: RuleMetadata = RuleMetadata {
    id: "style/parameters-on-separate-lines",
    name: "parameters-on-separate-lines",
    title: "Parameters should be on separate lines",
    message: "Parameters should be on separate lines",
    description: "Reports every pair of adjacent parameters in a method declaration, or \
                  adjacent arguments in a call, where the second item starts on the line \
                  the first one ends on. The fix places every item of the list on its own \
                  line, indented one level deeper than the line holding the declaration \
                  or call.",
    category: RuleCategory::Style,
    severity: Severity::Warning,
    fix_title: Some("Place each parameter on a new line"),
    fix_equivalence_key: Some("PlaceEachParameterOnNewLine"),
};
