//! Lexical query analysis: customer id extraction, capability detection and
//! complexity tiering.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use concierge_core::domain::agent::Capability;
use concierge_core::domain::customer::CustomerId;

use crate::providers::ProviderRegistry;

/// Tried in order against the lower-cased query; first match wins.
const CUSTOMER_ID_PATTERNS: &[&str] = &[
    r"customer\s+id\s*:?\s*(\d+)",
    r"id\s*:?\s*(\d+)",
    r"customer\s+(\d+)",
    r"\bi'm\s+customer\s+(\d+)",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Complex,
    MultiStep,
}

impl ComplexityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
            Self::MultiStep => "multi_step",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryAnalysis {
    pub raw_query: String,
    pub customer_id: Option<CustomerId>,
    pub required_capabilities: BTreeSet<Capability>,
    pub complexity_tier: ComplexityTier,
    pub needs_coordination: bool,
    #[serde(skip)]
    lowered: String,
}

impl QueryAnalysis {
    /// Lower-cased substring check against the raw query.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.lowered.contains(keyword)
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.mentions(keyword))
    }

    pub fn requires(&self, capability: Capability) -> bool {
        self.required_capabilities.contains(&capability)
    }
}

struct TierRule {
    name: &'static str,
    applies: fn(&str, &BTreeSet<Capability>) -> bool,
    tier: ComplexityTier,
    force_capabilities: bool,
}

const STAGE_ONE: &[TierRule] = &[
    TierRule {
        name: "active_customers_with_tickets",
        applies: active_customers_with_tickets,
        tier: ComplexityTier::MultiStep,
        force_capabilities: false,
    },
    TierRule {
        name: "multiple_capabilities",
        applies: multiple_capabilities,
        tier: ComplexityTier::Complex,
        force_capabilities: false,
    },
    TierRule {
        name: "listing",
        applies: listing,
        tier: ComplexityTier::Complex,
        force_capabilities: false,
    },
];

const STAGE_TWO: &[TierRule] = &[
    TierRule {
        name: "conjunction",
        applies: conjunction,
        tier: ComplexityTier::MultiStep,
        force_capabilities: false,
    },
    TierRule {
        name: "contact_update",
        applies: contact_update,
        tier: ComplexityTier::MultiStep,
        force_capabilities: false,
    },
    TierRule {
        name: "ticket_priority_report",
        applies: ticket_priority_report,
        tier: ComplexityTier::MultiStep,
        force_capabilities: true,
    },
];

fn active_customers_with_tickets(text: &str, _: &BTreeSet<Capability>) -> bool {
    text.contains("active customers") && text.contains("tickets")
}

fn multiple_capabilities(_: &str, capabilities: &BTreeSet<Capability>) -> bool {
    capabilities.len() > 1
}

fn listing(text: &str, _: &BTreeSet<Capability>) -> bool {
    ["all", "list", "show me", "get all"].iter().any(|k| text.contains(k))
}

fn conjunction(text: &str, _: &BTreeSet<Capability>) -> bool {
    ["and", "also", "then", "after"].iter().any(|k| text.contains(k))
}

fn contact_update(text: &str, _: &BTreeSet<Capability>) -> bool {
    (text.contains("update") || text.contains("change"))
        && (text.contains("email") || text.contains("phone"))
}

fn ticket_priority_report(text: &str, _: &BTreeSet<Capability>) -> bool {
    (text.contains("status") || text.contains("what is"))
        && text.contains("ticket")
        && text.contains("priority")
}

fn customer_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CUSTOMER_ID_PATTERNS.iter().filter_map(|pattern| Regex::new(pattern).ok()).collect()
    })
}

/// First customer id found in `lowered`. A capture too large for `i64` does
/// not count as a match for its pattern.
pub fn extract_customer_id(lowered: &str) -> Option<CustomerId> {
    customer_id_patterns().iter().find_map(|pattern| {
        pattern
            .captures(lowered)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse::<i64>().ok())
            .map(CustomerId)
    })
}

/// Classifies `query` against the providers in `registry`. Never fails.
pub fn analyze(query: &str, registry: &ProviderRegistry) -> QueryAnalysis {
    let lowered = query.to_lowercase();
    let customer_id = extract_customer_id(&lowered);

    let mut required_capabilities: BTreeSet<Capability> = registry
        .iter()
        .filter(|provider| provider.can_handle(query))
        .map(|provider| provider.capability())
        .collect();

    let mut complexity_tier = ComplexityTier::Simple;
    let mut needs_coordination = false;
    let mut matched_rules: Vec<&'static str> = Vec::new();

    for stage in [STAGE_ONE, STAGE_TWO] {
        let matched = stage.iter().find(|rule| (rule.applies)(&lowered, &required_capabilities));
        if let Some(rule) = matched {
            complexity_tier = rule.tier;
            needs_coordination = true;
            if rule.force_capabilities {
                required_capabilities.insert(Capability::Data);
                required_capabilities.insert(Capability::Support);
            }
            matched_rules.push(rule.name);
        }
    }

    tracing::debug!(
        event_name = "router.query.rules",
        rules = ?matched_rules,
        "complexity rules evaluated"
    );

    QueryAnalysis {
        raw_query: query.to_string(),
        customer_id,
        required_capabilities,
        complexity_tier,
        needs_coordination,
        lowered,
    }
}
