//! Rule model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Closed set of rule categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    WordSplitFix,
    SectionHeader,
    DenseList,
    MedicationList,
    AxisDiagnosis,
    Vitals,
    LabValue,
    MentalStatus,
    DischargeHeader,
    WhitespaceNormalize,
}

impl RuleCategory {
    /// Every category, in pipeline order
    pub const ALL: [RuleCategory; 10] = [
        RuleCategory::WordSplitFix,
        RuleCategory::AxisDiagnosis,
        RuleCategory::DischargeHeader,
        RuleCategory::SectionHeader,
        RuleCategory::MedicationList,
        RuleCategory::DenseList,
        RuleCategory::Vitals,
        RuleCategory::LabValue,
        RuleCategory::MentalStatus,
        RuleCategory::WhitespaceNormalize,
    ];

    /// Catalog identifier (kebab-case)
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::WordSplitFix => "word-split-fix",
            RuleCategory::SectionHeader => "section-header",
            RuleCategory::DenseList => "dense-list",
            RuleCategory::MedicationList => "medication-list",
            RuleCategory::AxisDiagnosis => "axis-diagnosis",
            RuleCategory::Vitals => "vitals",
            RuleCategory::LabValue => "lab-value",
            RuleCategory::MentalStatus => "mental-status",
            RuleCategory::DischargeHeader => "discharge-header",
            RuleCategory::WhitespaceNormalize => "whitespace-normalize",
        }
    }

    /// Priority assigned when a catalog entry does not set one
    pub fn default_priority(&self) -> i32 {
        match self {
            RuleCategory::WordSplitFix => 100,
            RuleCategory::AxisDiagnosis => 200,
            RuleCategory::DischargeHeader => 210,
            RuleCategory::SectionHeader => 300,
            RuleCategory::MedicationList => 400,
            RuleCategory::DenseList => 410,
            RuleCategory::Vitals => 500,
            RuleCategory::LabValue => 510,
            RuleCategory::MentalStatus => 600,
            RuleCategory::WhitespaceNormalize => 900,
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        RuleCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| format!("Unknown rule category: {s}"))
    }
}

/// Structural split performed by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// Line break before each match that is not at the start of a line
    BreakBefore,
    /// Header on its own line, content on the next
    DetachHeader,
    /// Delimited items become bulleted lines
    TildeBullets,
    /// "Label Value" pairs one per line
    MeasurementPairs,
    /// Each sub-label starts a new line
    SubLabels,
}

/// What a rule does with its matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Regex replacement template (`$1`, `${name}` expand)
    Replace(String),
    /// Structural split handled by the engine
    Split(SplitKind),
}

/// A single immutable rewrite rule
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    category: RuleCategory,
    matcher: Regex,
    priority: i32,
    action: RuleAction,
}

impl Rule {
    pub(crate) fn new(
        id: impl Into<String>,
        category: RuleCategory,
        matcher: Regex,
        priority: i32,
        action: RuleAction,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            matcher,
            priority,
            action,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    /// Apply a replacement rule to `text`
    ///
    /// Split rules are structural and return the input unchanged here; the
    /// engine interprets them.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.action {
            RuleAction::Replace(template) => self.matcher.replace_all(text, template.as_str()),
            RuleAction::Split(_) => Cow::Borrowed(text),
        }
    }
}
