// ============================================================================
// Result formatter
// ============================================================================
//
// Turns graph result rows into chat-sized messages. The shape of a result set
// is inferred from the first row's keys, each shape has a hard cap on rendered
// entries, and every outbound message carries the bot signature and respects
// the messaging length ceiling.

use serde_json::Value;

use astra_core::text;
use astra_core::types::ResultRow;

use crate::replies;

/// Outbound messages longer than this get truncated.
pub const MESSAGE_CEILING_CHARS: usize = 4000;
const TRUNCATION_POINT: usize = 3900;
const TRUNCATION_NOTICE: &str = "\n\n... (truncated)\nAsk for more specific details!";

const MAX_SATELLITES: usize = 8;
const MAX_MISSIONS: usize = 5;
const MAX_VEHICLES: usize = 3;
const MAX_AGENCIES: usize = 4;
const MAX_GENERIC: usize = 6;
const MAX_ACHIEVEMENTS: usize = 2;

/// Rendering shape of a result set, decided by the first row's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    SatelliteList,
    MissionInfo,
    VehicleInfo,
    AgencyInfo,
    Comparison,
    Statistics,
    Generic,
    Empty,
}

/// Key checks run in a fixed priority order; the first match wins, so a row
/// carrying both `satellite_name` and a `_count` key still renders as a
/// satellite list.
pub fn detect_shape(rows: &[ResultRow]) -> Shape {
    let Some(first) = rows.first() else {
        return Shape::Empty;
    };
    if first.contains_key("satellite_name") {
        Shape::SatelliteList
    } else if first.contains_key("mission_name") {
        Shape::MissionInfo
    } else if first.contains_key("vehicle_name") {
        Shape::VehicleInfo
    } else if first.contains_key("agency_name") {
        Shape::AgencyInfo
    } else if first.contains_key("comparison_values") {
        Shape::Comparison
    } else if first.keys().any(|k| k.ends_with("_count")) {
        Shape::Statistics
    } else {
        Shape::Generic
    }
}

pub struct ResponseFormatter {
    bot_name: String,
}

impl ResponseFormatter {
    pub fn new(bot_name: &str) -> Self {
        Self {
            bot_name: bot_name.to_string(),
        }
    }

    // ---- canned replies ----

    pub fn greeting(&self) -> String {
        self.assemble(replies::greeting(&self.bot_name))
    }

    pub fn help(&self) -> String {
        self.assemble(replies::help(&self.bot_name))
    }

    pub fn capabilities(&self) -> String {
        self.assemble(replies::capabilities(&self.bot_name))
    }

    pub fn suggestions(&self) -> String {
        self.assemble(replies::suggestions(&self.bot_name))
    }

    pub fn farewell(&self, interaction_count: u64) -> String {
        self.assemble(replies::farewell(&self.bot_name, interaction_count))
    }

    pub fn no_results(&self, query: &str) -> String {
        self.assemble(replies::no_results(query))
    }

    pub fn technical_issue(&self, query: &str) -> String {
        self.assemble(replies::technical_issue(query))
    }

    // ---- result rendering ----

    /// Formats graph rows for delivery. An empty result set falls back to the
    /// no-results reply echoing the original question.
    pub fn format_rows(&self, original_query: &str, rows: &[ResultRow]) -> String {
        match detect_shape(rows) {
            Shape::SatelliteList => self.assemble(self.render_satellites(rows)),
            Shape::MissionInfo => self.assemble(self.render_missions(rows)),
            Shape::VehicleInfo => self.assemble(self.render_vehicles(rows)),
            Shape::AgencyInfo => self.assemble(self.render_agencies(rows)),
            Shape::Comparison => self.assemble(self.render_comparison(rows)),
            Shape::Statistics => self.assemble(self.render_statistics(rows)),
            Shape::Generic => self.assemble(self.render_generic(rows)),
            Shape::Empty => self.no_results(original_query),
        }
    }

    fn render_satellites(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec![
            format!("🛰️ *Satellite Information* ({} found):", rows.len()),
            String::new(),
        ];
        for (i, row) in rows.iter().take(MAX_SATELLITES).enumerate() {
            let name = field_or(row, "satellite_name", "Unknown");
            lines.push(format!("*{}. {name}*", i + 1));
            lines.push(format!("   📅 Launch: {}", field_or(row, "launch_date", "N/A")));
            lines.push(format!("   🎯 Purpose: {}", field_or(row, "purpose", "N/A")));
            if let Some(vehicle) = field(row, "launch_vehicle") {
                lines.push(format!("   🚀 Vehicle: {vehicle}"));
            }
            lines.push(String::new());
        }
        if rows.len() > MAX_SATELLITES {
            lines.push(format!(
                "... and {} more satellites",
                rows.len() - MAX_SATELLITES
            ));
            lines.push(String::new());
        }
        lines.push("💡 Ask for details about any specific satellite!".to_string());
        lines
    }

    fn render_missions(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec![
            format!("🚀 *Mission Information* ({} found):", rows.len()),
            String::new(),
        ];
        for (i, row) in rows.iter().take(MAX_MISSIONS).enumerate() {
            lines.push(format!("*{}. {}*", i + 1, field_or(row, "mission_name", "Unknown")));
            lines.push(format!("   🎯 Goal: {}", field_or(row, "objective", "N/A")));
            lines.push(format!("   📊 Status: {}", field_or(row, "status", "N/A")));
            if let Some(agency) = field(row, "agency") {
                lines.push(format!("   🏢 Agency: {agency}"));
            }
            if let Some(Value::Array(achievements)) = row.get("achievements") {
                if !achievements.is_empty() {
                    lines.push("   🏆 Key achievements:".to_string());
                    for achievement in achievements.iter().take(MAX_ACHIEVEMENTS) {
                        lines.push(format!("     • {}", text_of(achievement)));
                    }
                }
            }
            lines.push(String::new());
        }
        lines
    }

    fn render_vehicles(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec!["🚀 *Launch Vehicle Information*:".to_string(), String::new()];
        for row in rows.iter().take(MAX_VEHICLES) {
            let name = field_or(row, "vehicle_name", "Unknown");
            lines.push(format!("*🚀 {name}*"));
            if let Some(full_name) = field(row, "full_name") {
                if full_name != name {
                    lines.push(format!("   Full name: {full_name}"));
                }
            }
            lines.push(format!(
                "   📦 Payload: {} kg",
                field_or(row, "payload_capacity_kg", "N/A")
            ));
            lines.push(format!(
                "   ✅ Success rate: {}%",
                field_or(row, "success_rate", "N/A")
            ));
            lines.push(format!(
                "   🗓️ First flight: {}",
                field_or(row, "first_flight", "N/A")
            ));
            lines.push(String::new());
        }
        lines
    }

    fn render_agencies(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec!["🏢 *Space Agencies*:".to_string(), String::new()];
        for row in rows.iter().take(MAX_AGENCIES) {
            let name = field_or(row, "agency_name", "Unknown");
            lines.push(format!("*{name}*"));
            if let Some(full_name) = field(row, "full_name") {
                if full_name != name {
                    lines.push(format!("   {full_name}"));
                }
            }
            lines.push(format!("   🌍 Country: {}", field_or(row, "country", "N/A")));
            if let Some(budget) = row.get("budget_usd").and_then(Value::as_f64) {
                lines.push(format!("   💰 Budget: ${:.1}B USD", budget / 1_000_000_000.0));
            }
            lines.push(String::new());
        }
        lines
    }

    fn render_comparison(&self, rows: &[ResultRow]) -> Vec<String> {
        // Comparison queries return a single row.
        let row = &rows[0];
        let first = field_or(row, "first_entity", "Entity 1");
        let second = field_or(row, "second_entity", "Entity 2");
        let mut lines = vec![
            "🔄 *Comparison Results*:".to_string(),
            String::new(),
            format!("*{first}* vs *{second}*"),
        ];
        if let Some(Value::Array(values)) = row.get("comparison_values") {
            if values.len() >= 2 {
                lines.push(format!(
                    "📊 Values: {} vs {}",
                    text_of(&values[0]),
                    text_of(&values[1])
                ));
            }
        }
        lines
    }

    fn render_statistics(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec!["📊 *Statistics*:".to_string(), String::new()];
        for row in rows {
            for (key, value) in row {
                if key.ends_with("_count") || key == "count" {
                    let category = title_case(&key.replace("_count", "").replace('_', " "));
                    lines.push(format!("📈 {category}: *{}*", text_of(value)));
                }
            }
        }
        lines
    }

    fn render_generic(&self, rows: &[ResultRow]) -> Vec<String> {
        let mut lines = vec![
            format!("🔍 *Search Results* ({} found):", rows.len()),
            String::new(),
        ];
        for (i, row) in rows.iter().take(MAX_GENERIC).enumerate() {
            let name = field(row, "name")
                .or_else(|| field(row, "satellite_name"))
                .or_else(|| field(row, "mission_name"))
                .unwrap_or_else(|| "Item".to_string());
            lines.push(format!("*{}. {name}*", i + 1));
            if let Some(description) = field(row, "description")
                .or_else(|| field(row, "purpose"))
                .or_else(|| field(row, "objective"))
            {
                lines.push(format!("   {description}"));
            }
            lines.push(String::new());
        }
        lines
    }

    /// Prepends the bot signature, joins the body, and applies the length
    /// ceiling. Messages over the ceiling are cut and carry a fixed notice.
    fn assemble(&self, body: Vec<String>) -> String {
        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format!("🚀 *{}* - Space Knowledge AI", self.bot_name));
        lines.push(String::new());
        lines.extend(body);
        let message = lines.join("\n");
        if message.chars().count() > MESSAGE_CEILING_CHARS {
            text::clip_with_notice(&message, TRUNCATION_POINT, TRUNCATION_NOTICE)
        } else {
            message
        }
    }
}

/// Non-null, non-empty field rendered as display text.
fn field(row: &ResultRow, key: &str) -> Option<String> {
    match row.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let rendered = text_of(value);
            if rendered.is_empty() {
                None
            } else {
                Some(rendered)
            }
        }
    }
}

fn field_or(row: &ResultRow, key: &str, default: &str) -> String {
    field(row, key).unwrap_or_else(|| default.to_string())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> ResultRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    fn formatter() -> ResponseFormatter {
        ResponseFormatter::new("Astra")
    }

    // ---- shape detection ----

    #[test]
    fn test_detect_shape_priority_order() {
        let satellites = vec![row(json!({"satellite_name": "Aryabhata", "mission_name": "x"}))];
        assert_eq!(detect_shape(&satellites), Shape::SatelliteList);

        let missions = vec![row(json!({"mission_name": "Chandrayaan-3"}))];
        assert_eq!(detect_shape(&missions), Shape::MissionInfo);

        let stats = vec![row(json!({"satellite_count": 104}))];
        assert_eq!(detect_shape(&stats), Shape::Statistics);

        let generic = vec![row(json!({"title": "something"}))];
        assert_eq!(detect_shape(&generic), Shape::Generic);

        assert_eq!(detect_shape(&[]), Shape::Empty);
    }

    #[test]
    fn test_detect_shape_count_key_beats_generic_only() {
        let rows = vec![row(json!({"vehicle_name": "PSLV", "launch_count": 60}))];
        assert_eq!(detect_shape(&rows), Shape::VehicleInfo);
    }

    // ---- satellite rendering ----

    #[test]
    fn test_satellites_capped_at_eight_with_overflow_note() {
        let rows: Vec<ResultRow> = (0..12)
            .map(|i| {
                row(json!({
                    "satellite_name": format!("SAT-{i}"),
                    "purpose": "Earth observation",
                    "launch_date": "2020-01-01",
                    "launch_vehicle": "PSLV"
                }))
            })
            .collect();
        let out = formatter().format_rows("list satellites", &rows);

        assert!(out.contains("(12 found)"));
        assert!(out.contains("*8. SAT-7*"));
        assert!(!out.contains("SAT-8"));
        assert!(out.contains("... and 4 more satellites"));
        assert!(out.contains("🚀 *Astra* - Space Knowledge AI"));
    }

    #[test]
    fn test_satellite_vehicle_line_skipped_when_absent() {
        let rows = vec![row(json!({
            "satellite_name": "Aryabhata",
            "purpose": "Science",
            "launch_date": "1975-04-19",
            "launch_vehicle": null
        }))];
        let out = formatter().format_rows("aryabhata", &rows);
        assert!(out.contains("📅 Launch: 1975-04-19"));
        assert!(!out.contains("🚀 Vehicle:"));
    }

    // ---- mission rendering ----

    #[test]
    fn test_missions_capped_at_five_with_achievements() {
        let rows: Vec<ResultRow> = (0..7)
            .map(|i| {
                row(json!({
                    "mission_name": format!("Mission-{i}"),
                    "objective": "Lunar landing",
                    "status": "Completed",
                    "agency": "ISRO",
                    "achievements": ["soft landing", "rover deployed", "extended ops"]
                }))
            })
            .collect();
        let out = formatter().format_rows("missions", &rows);

        assert!(out.contains("*5. Mission-4*"));
        assert!(!out.contains("Mission-5"));
        assert!(out.contains("🏆 Key achievements:"));
        assert!(out.contains("• soft landing"));
        assert!(out.contains("• rover deployed"));
        assert!(!out.contains("extended ops"));
    }

    // ---- vehicle rendering ----

    #[test]
    fn test_vehicles_capped_at_three() {
        let rows: Vec<ResultRow> = (0..4)
            .map(|i| {
                row(json!({
                    "vehicle_name": format!("LV-{i}"),
                    "full_name": format!("Launch Vehicle {i}"),
                    "payload_capacity_kg": 1750,
                    "success_rate": 94.5,
                    "first_flight": "1993"
                }))
            })
            .collect();
        let out = formatter().format_rows("rockets", &rows);

        assert!(out.contains("*🚀 LV-2*"));
        assert!(!out.contains("LV-3"));
        assert!(out.contains("📦 Payload: 1750 kg"));
        assert!(out.contains("✅ Success rate: 94.5%"));
    }

    #[test]
    fn test_vehicle_full_name_skipped_when_same() {
        let rows = vec![row(json!({
            "vehicle_name": "PSLV",
            "full_name": "PSLV",
            "payload_capacity_kg": 1750
        }))];
        let out = formatter().format_rows("pslv", &rows);
        assert!(!out.contains("Full name:"));
    }

    // ---- agency rendering ----

    #[test]
    fn test_agency_budget_rendered_in_billions() {
        let rows = vec![row(json!({
            "agency_name": "ISRO",
            "full_name": "Indian Space Research Organisation",
            "country": "India",
            "budget_usd": 1_900_000_000u64
        }))];
        let out = formatter().format_rows("agencies", &rows);

        assert!(out.contains("*ISRO*"));
        assert!(out.contains("Indian Space Research Organisation"));
        assert!(out.contains("🌍 Country: India"));
        assert!(out.contains("💰 Budget: $1.9B USD"));
    }

    // ---- comparison and statistics ----

    #[test]
    fn test_comparison_renders_two_entities_and_values() {
        let rows = vec![row(json!({
            "first_entity": "PSLV",
            "second_entity": "GSLV",
            "comparison_values": [1750, 2500, 9999]
        }))];
        let out = formatter().format_rows("compare pslv and gslv", &rows);

        assert!(out.contains("*PSLV* vs *GSLV*"));
        assert!(out.contains("📊 Values: 1750 vs 2500"));
        assert!(!out.contains("9999"));
    }

    #[test]
    fn test_statistics_titled_per_count_key() {
        let rows = vec![row(json!({
            "satellite_count": 104,
            "mission_count": 21,
            "launch_vehicle_count": 4
        }))];
        let out = formatter().format_rows("stats", &rows);

        assert!(out.contains("📈 Satellite: *104*"));
        assert!(out.contains("📈 Mission: *21*"));
        assert!(out.contains("📈 Launch Vehicle: *4*"));
    }

    // ---- generic, empty, ceiling ----

    #[test]
    fn test_generic_falls_back_through_name_keys() {
        let rows = vec![
            row(json!({"title": "?", "name": "NavIC", "description": "Navigation constellation"})),
            row(json!({"title": "?"})),
        ];
        let out = formatter().format_rows("navic", &rows);

        assert!(out.contains("*1. NavIC*"));
        assert!(out.contains("   Navigation constellation"));
        assert!(out.contains("*2. Item*"));
    }

    #[test]
    fn test_empty_rows_yield_no_results_reply() {
        let out = formatter().format_rows("xyzzy", &[]);
        assert!(out.contains("🔍 *No results found*"));
        assert!(out.contains("'xyzzy'"));
    }

    #[test]
    fn test_ceiling_truncates_with_notice() {
        let rows = vec![row(json!({
            "mission_name": "M",
            "objective": "o".repeat(5000),
            "status": "Ongoing"
        }))];
        let out = formatter().format_rows("missions", &rows);

        assert!(out.chars().count() < MESSAGE_CEILING_CHARS);
        assert!(out.ends_with("... (truncated)\nAsk for more specific details!"));
    }

    #[test]
    fn test_formatting_same_rows_twice_is_identical() {
        let rows = vec![
            row(json!({
                "satellite_name": "Cartosat-3",
                "purpose": "Earth observation",
                "launch_date": "2019-11-27",
                "launch_vehicle": "PSLV"
            })),
            row(json!({
                "satellite_name": "RISAT-2B",
                "purpose": "Radar imaging",
                "launch_date": "2019-05-22",
                "launch_vehicle": null
            })),
        ];
        let f = formatter();
        assert_eq!(
            f.format_rows("satellites", &rows),
            f.format_rows("satellites", &rows)
        );
    }

    #[test]
    fn test_short_message_untouched_by_ceiling() {
        let out = formatter().greeting();
        assert!(!out.contains("(truncated)"));
        assert!(out.starts_with("🚀 *Astra* - Space Knowledge AI\n\n"));
    }
}
