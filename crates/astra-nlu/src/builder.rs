//! Parameterized graph-query construction.
//!
//! Each intent maps to a fixed cypher template with its result cap and sort
//! order baked in. Free terms extracted from the utterance are bound as
//! parameters and substituted by the store engine itself; the template text
//! is `&'static str` and can never contain user input.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use astra_core::types::EntityCategory;

use crate::classifier::Intent;

// =============================================================================
// Templates
// =============================================================================

/// Identifier of a fixed cypher template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTemplate {
    /// Most-recent satellites, capped at 20.
    SatelliteList,
    /// Satellites narrowed by a bound `$term`, capped at 20.
    SatelliteSearch,
    /// Most-recent missions, capped at 15.
    MissionList,
    MissionSearch,
    /// Vehicles by payload capacity descending, capped at 10.
    VehicleList,
    VehicleSearch,
    /// Agencies by budget descending, capped at 12.
    AgencyList,
    AgencySearch,
    TechnologyList,
    TechnologySearch,
    /// Two named vehicles side by side.
    VehicleComparison,
    /// Aggregate entity counts.
    Statistics,
    /// Free-text content search for unrecognized input, capped at 5.
    ContentSearch,
}

impl QueryTemplate {
    /// The cypher text. Fixed at compile time; result caps and sort orders
    /// here are part of the contract.
    pub fn cypher(&self) -> &'static str {
        match self {
            Self::SatelliteList => {
                "MATCH (s:Satellite) \
                 RETURN s.name AS satellite_name, s.purpose AS purpose, \
                        s.launch_date AS launch_date, s.launch_vehicle AS launch_vehicle \
                 ORDER BY s.launch_date DESC LIMIT 20"
            }
            Self::SatelliteSearch => {
                "MATCH (s:Satellite) \
                 WHERE toLower(s.name) CONTAINS toLower($term) \
                    OR toLower(s.purpose) CONTAINS toLower($term) \
                 RETURN s.name AS satellite_name, s.purpose AS purpose, \
                        s.launch_date AS launch_date, s.launch_vehicle AS launch_vehicle \
                 ORDER BY s.launch_date DESC LIMIT 20"
            }
            Self::MissionList => {
                "MATCH (m:Mission) \
                 RETURN m.name AS mission_name, m.objective AS objective, \
                        m.status AS status, m.agency AS agency \
                 ORDER BY m.start_date DESC LIMIT 15"
            }
            Self::MissionSearch => {
                "MATCH (m:Mission) \
                 WHERE toLower(m.name) CONTAINS toLower($term) \
                    OR toLower(m.objective) CONTAINS toLower($term) \
                 RETURN m.name AS mission_name, m.objective AS objective, \
                        m.status AS status, m.agency AS agency \
                 ORDER BY m.start_date DESC LIMIT 15"
            }
            Self::VehicleList => {
                "MATCH (v:LaunchVehicle) \
                 RETURN v.name AS vehicle_name, v.full_name AS full_name, \
                        v.payload_capacity_kg AS payload_capacity_kg, \
                        v.success_rate AS success_rate, v.first_flight AS first_flight \
                 ORDER BY v.payload_capacity_kg DESC LIMIT 10"
            }
            Self::VehicleSearch => {
                "MATCH (v:LaunchVehicle) \
                 WHERE toLower(v.name) CONTAINS toLower($term) \
                    OR toLower(v.full_name) CONTAINS toLower($term) \
                 RETURN v.name AS vehicle_name, v.full_name AS full_name, \
                        v.payload_capacity_kg AS payload_capacity_kg, \
                        v.success_rate AS success_rate, v.first_flight AS first_flight \
                 ORDER BY v.payload_capacity_kg DESC LIMIT 10"
            }
            Self::AgencyList => {
                "MATCH (a:Agency) \
                 RETURN a.name AS agency_name, a.full_name AS full_name, \
                        a.country AS country, a.budget_usd AS budget_usd \
                 ORDER BY a.budget_usd DESC LIMIT 12"
            }
            Self::AgencySearch => {
                "MATCH (a:Agency) \
                 WHERE toLower(a.name) CONTAINS toLower($term) \
                    OR toLower(a.country) CONTAINS toLower($term) \
                 RETURN a.name AS agency_name, a.full_name AS full_name, \
                        a.country AS country, a.budget_usd AS budget_usd \
                 ORDER BY a.budget_usd DESC LIMIT 12"
            }
            Self::TechnologyList => {
                "MATCH (t:Technology) \
                 RETURN t.name AS name, t.description AS description \
                 ORDER BY t.name LIMIT 10"
            }
            Self::TechnologySearch => {
                "MATCH (t:Technology) \
                 WHERE toLower(t.name) CONTAINS toLower($term) \
                    OR toLower(t.description) CONTAINS toLower($term) \
                 RETURN t.name AS name, t.description AS description \
                 ORDER BY t.name LIMIT 10"
            }
            Self::VehicleComparison => {
                "MATCH (a:LaunchVehicle) WHERE toLower(a.name) = toLower($first) \
                 MATCH (b:LaunchVehicle) WHERE toLower(b.name) = toLower($second) \
                 RETURN a.name AS first_entity, b.name AS second_entity, \
                        [a.payload_capacity_kg, b.payload_capacity_kg] AS comparison_values"
            }
            Self::Statistics => {
                "MATCH (s:Satellite) WITH count(s) AS satellite_count \
                 MATCH (m:Mission) WITH satellite_count, count(m) AS mission_count \
                 MATCH (v:LaunchVehicle) \
                 WITH satellite_count, mission_count, count(v) AS vehicle_count \
                 MATCH (a:Agency) \
                 WITH satellite_count, mission_count, vehicle_count, count(a) AS agency_count \
                 MATCH (t:Technology) \
                 RETURN satellite_count, mission_count, vehicle_count, agency_count, \
                        count(t) AS technology_count"
            }
            Self::ContentSearch => {
                "MATCH (c:Content) \
                 WHERE toLower(c.text) CONTAINS toLower($term) \
                 RETURN c.text AS answer LIMIT 5"
            }
        }
    }
}

/// An executable query: template identifier plus bound parameters.
///
/// Immutable once built, constructed fresh per request, never owns a
/// connection.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery {
    pub template: QueryTemplate,
    pub params: serde_json::Map<String, Value>,
}

impl GraphQuery {
    fn new(template: QueryTemplate) -> Self {
        Self {
            template,
            params: serde_json::Map::new(),
        }
    }

    fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn cypher(&self) -> &'static str {
        self.template.cypher()
    }
}

/// Output of the builder: either a canned (sentinel) reply that short-
/// circuits execution, or a real query to run against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    Canned(Intent),
    Graph(GraphQuery),
}

/// Builder failures.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

// =============================================================================
// Term extraction
// =============================================================================

static COMPARISON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcompare\s+(.+?)\s+(?:and|with|to|vs\.?|versus)\s+(.+)")
        .expect("Invalid comparison regex")
});

static VS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:vs\.?|versus)\s+(.+)$").expect("Invalid vs regex")
});

/// Filler words dropped during term extraction.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "do", "does", "did", "list", "show", "me",
    "tell", "about", "give", "find", "search", "for", "what", "who", "all", "of", "in", "on",
    "by", "launched", "please", "and", "or", "with", "to", "top",
];

/// Category words dropped so "list satellites" extracts no term.
const CATEGORY_WORDS: &[&str] = &[
    "satellite",
    "satellites",
    "mission",
    "missions",
    "vehicle",
    "vehicles",
    "rocket",
    "rockets",
    "launcher",
    "launchers",
    "agency",
    "agencies",
    "technology",
    "technologies",
];

/// Extract the free term from an entity query, if any.
///
/// Drops stop words and category words, keeps the rest in order. Returns
/// `None` when nothing remains, in which case the unfiltered listing
/// template is used.
fn extract_term(text: &str) -> Option<String> {
    let kept: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .filter(|w| {
            let lower = w.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str()) && !CATEGORY_WORDS.contains(&lower.as_str())
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

/// Extract the two entity names from a comparison utterance.
fn extract_comparison_pair(text: &str) -> Option<(String, String)> {
    let caps = COMPARISON_RE
        .captures(text)
        .or_else(|| VS_RE.captures(text))?;
    let first = caps.get(1)?.as_str().trim();
    let second = caps.get(2)?.as_str().trim();
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first.to_string(), second.to_string()))
}

// =============================================================================
// QueryBuilder
// =============================================================================

/// Builds query plans from classified intents.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build the plan for an utterance with a known intent.
    ///
    /// Non-data intents return a sentinel plan; the pipeline renders a
    /// canned reply without touching the store.
    pub fn build(intent: Intent, raw_text: &str) -> QueryPlan {
        match intent {
            Intent::Greeting
            | Intent::Help
            | Intent::Capabilities
            | Intent::Suggestions
            | Intent::Farewell => QueryPlan::Canned(intent),
            Intent::EntityQuery(category) => {
                QueryPlan::Graph(Self::entity_query(category, raw_text))
            }
            Intent::Comparison => match extract_comparison_pair(raw_text) {
                Some((first, second)) => QueryPlan::Graph(
                    GraphQuery::new(QueryTemplate::VehicleComparison)
                        .with_param("first", first)
                        .with_param("second", second),
                ),
                // No extractable pair; fall back to a content search so the
                // turn still produces an answer (possibly "no results").
                None => QueryPlan::Graph(Self::fallback_query(raw_text)),
            },
            Intent::Statistics => QueryPlan::Graph(GraphQuery::new(QueryTemplate::Statistics)),
            Intent::Unrecognized => QueryPlan::Graph(Self::fallback_query(raw_text)),
        }
    }

    /// Fixed listing query for a caller-supplied category string, as used
    /// by the explore endpoint. Only the four listing categories are
    /// exposed there; anything else is an unknown category.
    pub fn listing(category: &str) -> Result<GraphQuery, BuildError> {
        match EntityCategory::parse(category) {
            Some(EntityCategory::Satellite) => Ok(GraphQuery::new(QueryTemplate::SatelliteList)),
            Some(EntityCategory::Mission) => Ok(GraphQuery::new(QueryTemplate::MissionList)),
            Some(EntityCategory::Vehicle) => Ok(GraphQuery::new(QueryTemplate::VehicleList)),
            Some(EntityCategory::Agency) => Ok(GraphQuery::new(QueryTemplate::AgencyList)),
            _ => Err(BuildError::UnknownCategory(category.to_string())),
        }
    }

    /// The aggregate count query used by the statistics endpoint.
    pub fn statistics() -> GraphQuery {
        GraphQuery::new(QueryTemplate::Statistics)
    }

    fn entity_query(category: EntityCategory, raw_text: &str) -> GraphQuery {
        let term = extract_term(raw_text);
        let (list, search) = match category {
            EntityCategory::Satellite => {
                (QueryTemplate::SatelliteList, QueryTemplate::SatelliteSearch)
            }
            EntityCategory::Mission => (QueryTemplate::MissionList, QueryTemplate::MissionSearch),
            EntityCategory::Vehicle => (QueryTemplate::VehicleList, QueryTemplate::VehicleSearch),
            EntityCategory::Agency => (QueryTemplate::AgencyList, QueryTemplate::AgencySearch),
            EntityCategory::Technology => {
                (QueryTemplate::TechnologyList, QueryTemplate::TechnologySearch)
            }
        };
        match term {
            Some(term) => GraphQuery::new(search).with_param("term", term),
            None => GraphQuery::new(list),
        }
    }

    fn fallback_query(raw_text: &str) -> GraphQuery {
        GraphQuery::new(QueryTemplate::ContentSearch).with_param("term", raw_text.trim())
    }
}
