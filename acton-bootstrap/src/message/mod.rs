//! Notification messages displayed at the top of a page
//!
//! Message titles and content are HTML. Links inside them are given the
//! Bootstrap `alert-link` class so they match the alert's colors.
//!
//! # Examples
//!
//! ```rust
//! use acton_bootstrap::message::{MessageLevel, NotificationMessage};
//!
//! let message = NotificationMessage::new(
//!     "Saved",
//!     r#"See <a href="/items">all items</a>."#,
//!     MessageLevel::Success,
//! );
//! assert!(message.content().contains(r#"class="alert-link""#));
//! assert_eq!(message.css_class(), "success");
//! ```

use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Class added to every link inside a message
pub const LINK_CLASS: &str = "alert-link";

/// Severity of a message, mapped to Bootstrap alert classes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageLevel {
    /// Informational message (blue)
    #[default]
    Info,
    /// Error message (red)
    Danger,
    /// Success message (green)
    Success,
    /// Warning message (yellow)
    Warning,
    /// Caller-supplied CSS class
    Custom(String),
}

impl MessageLevel {
    /// CSS class suffix for this level
    #[must_use]
    pub fn css_class(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Danger => "danger",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Custom(class) => class,
        }
    }
}

impl From<&str> for MessageLevel {
    fn from(class: &str) -> Self {
        match class {
            "info" => Self::Info,
            "danger" => Self::Danger,
            "success" => Self::Success,
            "warning" => Self::Warning,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// A message shown to the user, with pre-styled links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    title: String,
    content: String,
    level: MessageLevel,
}

impl NotificationMessage {
    /// Create a message, styling the links in `title` and `content`
    #[must_use]
    pub fn new(title: &str, content: &str, level: impl Into<MessageLevel>) -> Self {
        Self {
            title: style_links(title),
            content: style_links(content),
            level: level.into(),
        }
    }

    /// Create an info message
    #[must_use]
    pub fn info(title: &str, content: &str) -> Self {
        Self::new(title, content, MessageLevel::Info)
    }

    /// Create a success message
    #[must_use]
    pub fn success(title: &str, content: &str) -> Self {
        Self::new(title, content, MessageLevel::Success)
    }

    /// Create a warning message
    #[must_use]
    pub fn warning(title: &str, content: &str) -> Self {
        Self::new(title, content, MessageLevel::Warning)
    }

    /// Create a danger (error) message
    #[must_use]
    pub fn danger(title: &str, content: &str) -> Self {
        Self::new(title, content, MessageLevel::Danger)
    }

    /// HTML title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// HTML content
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Message level
    #[must_use]
    pub const fn level(&self) -> &MessageLevel {
        &self.level
    }

    /// CSS class suffix for the message level
    #[must_use]
    pub fn css_class(&self) -> &str {
        self.level.css_class()
    }
}

/// Add [`LINK_CLASS`] to every `<a>` element of an HTML fragment
///
/// Existing classes are kept. Other markup passes through untouched. If the
/// fragment cannot be rewritten it is returned as given.
#[must_use]
pub fn style_links(html: &str) -> String {
    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a", |el| {
                let class = match el.get_attribute("class") {
                    Some(existing) if existing.split_whitespace().any(|c| c == LINK_CLASS) => {
                        return Ok(());
                    }
                    Some(existing) if !existing.trim().is_empty() => {
                        format!("{} {LINK_CLASS}", existing.trim())
                    }
                    _ => LINK_CLASS.to_string(),
                };
                el.set_attribute("class", &class)?;
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match rewritten {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Could not style message links, keeping markup as given"
            );
            html.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_get_alert_link_class() {
        let message = NotificationMessage::new(
            "t",
            r##"<a href="#">x</a> <a class="z" href="#">y</a>"##,
            "info",
        );
        let content = message.content();
        let first = r##"class="alert-link">x</a>"##;
        let second = r##"<a class="z alert-link" href="#">y</a>"##;
        assert!(content.contains(first));
        assert!(content.contains(second));
        assert_eq!(content.matches("alert-link").count(), 2);
        assert_eq!(message.level(), &MessageLevel::Info);
    }

    #[test]
    fn test_content_without_links_is_unchanged() {
        let html = "<strong>Heads up!</strong> nothing to click";
        assert_eq!(style_links(html), html);
    }

    #[test]
    fn test_class_is_not_added_twice() {
        let html = r#"<a class="alert-link" href="/x">x</a>"#;
        assert_eq!(style_links(html), html);
    }

    #[test]
    fn test_title_links_are_styled() {
        let message = NotificationMessage::warning(r#"<a href="/login">Log in</a>"#, "again");
        assert!(message.title().contains(r#"class="alert-link""#));
        assert_eq!(message.css_class(), "warning");
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let styled = style_links(r#"<p>unclosed <a href="/x">link"#);
        assert!(styled.contains("alert-link"));
        assert!(styled.contains("unclosed"));
    }

    #[test]
    fn test_custom_level() {
        let message = NotificationMessage::new("t", "c", "secondary");
        let custom = MessageLevel::Custom("secondary".to_string());
        assert_eq!(message.level(), &custom);
        assert_eq!(message.css_class(), "secondary");
        assert_eq!(MessageLevel::from("danger"), MessageLevel::Danger);
    }
}
