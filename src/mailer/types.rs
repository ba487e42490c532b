use serde::{Deserialize, Serialize};

/// Priority levels for outbound email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority, flagged for prompt attention in mail clients
    High,
    /// Normal priority (default)
    #[default]
    Normal,
    /// Low priority, can be deferred by mail clients
    Low,
}

impl Priority {
    /// Fixed mapping to the three de-facto priority header fields.
    pub fn headers(&self) -> [(&'static str, &'static str); 3] {
        match self {
            Priority::High => [
                ("X-Priority", "1"),
                ("X-MSMail-Priority", "High"),
                ("Importance", "high"),
            ],
            Priority::Normal => [
                ("X-Priority", "3"),
                ("X-MSMail-Priority", "Normal"),
                ("Importance", "normal"),
            ],
            Priority::Low => [
                ("X-Priority", "5"),
                ("X-MSMail-Priority", "Normal"),
                ("Importance", "low"),
            ],
        }
    }

    /// Lowercase label, used for metric labels and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// A request to send one templated email.
///
/// Immutable per call. The retry loop advances its own attempt counter;
/// `attempt` is only the starting index (0 for fresh requests).
#[derive(Debug, Clone, Deserialize)]
pub struct SendRequest {
    /// Recipient address ("user@example.com" or "Name <user@example.com>")
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Name of the template to render the body from
    pub template: String,

    /// Variables bound against the template (must be a JSON object)
    #[serde(default = "empty_context")]
    pub context: serde_json::Value,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Starting delivery attempt index
    #[serde(default)]
    pub attempt: u32,
}

fn empty_context() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A fully rendered message, ready for the transport.
///
/// Derived from a [`SendRequest`] and owned solely by the call that
/// produced it.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// Sender display name (process configuration)
    pub from_name: String,
    /// Sender address (process configuration)
    pub from_address: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Rendered HTML body
    pub body_html: String,
    /// Priority header fields, in header order
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_header_table() {
        assert_eq!(
            Priority::High.headers(),
            [
                ("X-Priority", "1"),
                ("X-MSMail-Priority", "High"),
                ("Importance", "high"),
            ]
        );
        assert_eq!(
            Priority::Normal.headers(),
            [
                ("X-Priority", "3"),
                ("X-MSMail-Priority", "Normal"),
                ("Importance", "normal"),
            ]
        );
        assert_eq!(
            Priority::Low.headers(),
            [
                ("X-Priority", "5"),
                ("X-MSMail-Priority", "Normal"),
                ("Importance", "low"),
            ]
        );
    }

    #[test]
    fn test_priority_deserializes_lowercase_only() {
        assert_eq!(
            serde_json::from_str::<Priority>("\"high\"").unwrap(),
            Priority::High
        );
        // Unknown values are a hard deserialization error, not a silent default
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_send_request_defaults() {
        let request: SendRequest = serde_json::from_value(serde_json::json!({
            "to": "user@example.com",
            "subject": "Hello",
            "template": "welcome",
        }))
        .unwrap();

        assert_eq!(request.priority, Priority::Normal);
        assert_eq!(request.attempt, 0);
        assert!(request.context.is_object());
    }
}
