//! Minimal TwiML rendering for webhook replies.
//!
//! Webhook responses carry the reply as a `<Message>` inside a `<Response>`
//! document with an XML declaration. Body text is entity-escaped.

/// Renders a messaging reply as a TwiML document.
pub fn message_response(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape(body)
    )
}

/// An empty `<Response/>`, sent when no reply should be delivered.
pub fn empty_response() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response/>".to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
