//! Canned reply catalogue.
//!
//! Every fixed conversational reply lives here as a list of message lines;
//! [`format`](crate::format) owns the signature header and length ceiling, so
//! these builders only produce the body.

/// Topics surfaced by the suggestion reply. Only the first six are shown.
pub const FEATURED_TOPICS: &[&str] = &[
    "🌙 Chandrayaan-3 lunar mission success",
    "🚀 PSLV: India's workhorse rocket",
    "🔴 Mars Orbiter Mission achievements",
    "👨‍🚀 Gaganyaan human spaceflight program",
    "⚡ Cryogenic engine technology",
    "🛰️ NavIC navigation constellation",
    "🏢 ISRO vs NASA comparison",
    "📡 SHAR launch center details",
];

pub fn greeting(bot_name: &str) -> Vec<String> {
    vec![
        format!("🚀 Namaste! I'm {bot_name}, your space assistant!"),
        "🌟 Ready to explore the cosmos of space technology?".to_string(),
        String::new(),
        "Try asking me:".to_string(),
        "• List ISRO satellites 🛰️".to_string(),
        "• Tell me about Chandrayaan-3 🌙".to_string(),
        "• Compare PSLV and GSLV 🚀".to_string(),
        "• ISRO achievements 🏆".to_string(),
        String::new(),
        "What would you like to know about space technology?".to_string(),
    ]
}

pub fn help(bot_name: &str) -> Vec<String> {
    vec![
        format!("🤖 {bot_name} can help you with:"),
        String::new(),
        "🛰️ *Satellites*: List, search, and learn about satellites".to_string(),
        "🚀 *Launch Vehicles*: PSLV, GSLV, LVM3 details".to_string(),
        "🌍 *Missions*: Chandrayaan, Mars Mission, Gaganyaan".to_string(),
        "🏢 *Agencies*: ISRO, NASA, and other space organizations".to_string(),
        "⚙️ *Technologies*: Engines, propulsion systems".to_string(),
        String::new(),
        "Just ask in simple English! Example:".to_string(),
        "'What satellites did ISRO launch in 2023?'".to_string(),
    ]
}

pub fn capabilities(bot_name: &str) -> Vec<String> {
    vec![
        format!("🧠 {bot_name}'s Intelligence Features:"),
        String::new(),
        "🔍 *Smart Search*: Find any space-related information".to_string(),
        "📊 *Comparisons*: Compare satellites, rockets, missions".to_string(),
        "📈 *Statistics*: Count missions, success rates, budgets".to_string(),
        "🏆 *Achievements*: Milestones and accomplishments".to_string(),
        "🌐 *Global*: Both Indian and international space data".to_string(),
        String::new(),
        "💡 *Pro tip*: Ask follow-up questions for deeper insights!".to_string(),
    ]
}

pub fn suggestions(bot_name: &str) -> Vec<String> {
    let mut lines = vec![
        format!("💡 *{bot_name}'s Featured Topics*:"),
        String::new(),
        "Here are some interesting space topics to explore:".to_string(),
    ];
    for (i, topic) in FEATURED_TOPICS.iter().take(6).enumerate() {
        lines.push(format!("{}. {topic}", i + 1));
    }
    lines.push(String::new());
    lines.push("Just type your question naturally!".to_string());
    lines.push("Example: 'Tell me about Chandrayaan-3'".to_string());
    lines
}

/// Farewell warmth scales with how much the user interacted this session.
pub fn farewell(bot_name: &str, interaction_count: u64) -> Vec<String> {
    let opener = if interaction_count <= 1 {
        format!("Thanks for trying {bot_name}! 🚀")
    } else if interaction_count <= 5 {
        format!("Thanks for the {interaction_count} questions! Keep exploring space! 🌟")
    } else {
        format!("Wow, {interaction_count} questions! You're a space enthusiast! 🚀🌟")
    };
    vec![
        opener,
        String::new(),
        "Feel free to come back anytime to explore".to_string(),
        "the fascinating world of space technology!".to_string(),
        String::new(),
        "🚀 Keep reaching for the stars! 🌟".to_string(),
    ]
}

pub fn no_results(query: &str) -> Vec<String> {
    vec![
        "🔍 *No results found*".to_string(),
        String::new(),
        format!("I couldn't find information about '{query}'."),
        String::new(),
        "💡 *Try these instead*:".to_string(),
        "• Use simpler terms (e.g., 'ISRO satellites')".to_string(),
        "• Check spelling".to_string(),
        "• Ask about space missions".to_string(),
        "• Type 'help' for more options".to_string(),
    ]
}

pub fn technical_issue(query: &str) -> Vec<String> {
    vec![
        "🔧 *Technical Issue*".to_string(),
        String::new(),
        format!("Sorry, I encountered a problem processing '{query}'."),
        String::new(),
        "Please try:".to_string(),
        "• Asking a simpler question".to_string(),
        "• Typing 'help' for options".to_string(),
        "• Trying again in a moment".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_names_the_bot() {
        let lines = greeting("Astra");
        assert!(lines[0].contains("Astra"));
    }

    #[test]
    fn test_suggestions_show_six_topics() {
        let lines = suggestions("Astra");
        let numbered = lines.iter().filter(|l| l.starts_with(char::is_numeric)).count();
        assert_eq!(numbered, 6);
    }

    // ---- farewell tiers ----

    #[test]
    fn test_farewell_first_contact() {
        assert_eq!(farewell("Astra", 0)[0], "Thanks for trying Astra! 🚀");
        assert_eq!(farewell("Astra", 1)[0], "Thanks for trying Astra! 🚀");
    }

    #[test]
    fn test_farewell_mid_tier_cites_count() {
        assert_eq!(
            farewell("Astra", 2)[0],
            "Thanks for the 2 questions! Keep exploring space! 🌟"
        );
        assert_eq!(
            farewell("Astra", 4)[0],
            "Thanks for the 4 questions! Keep exploring space! 🌟"
        );
        assert_eq!(
            farewell("Astra", 5)[0],
            "Thanks for the 5 questions! Keep exploring space! 🌟"
        );
    }

    #[test]
    fn test_farewell_enthusiast_tier() {
        assert!(farewell("Astra", 6)[0].starts_with("Wow, 6 questions!"));
        assert!(farewell("Astra", 9)[0].starts_with("Wow, 9 questions!"));
    }

    #[test]
    fn test_no_results_echoes_query() {
        let lines = no_results("xyzzy lander");
        assert!(lines.iter().any(|l| l.contains("'xyzzy lander'")));
    }
}
