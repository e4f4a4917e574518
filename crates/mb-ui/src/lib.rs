pub mod markup;

use askama::Template;
use mb_core::error::{AppError, Result};
use mb_core::models::Message;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    /// Current search term, echoed back into the search box
    pub search: &'a str,
    /// Newest first
    pub messages: Vec<MessageView<'a>>,
}

/// A message prepared for the page: body already rendered to HTML.
pub struct MessageView<'a> {
    pub id: &'a str,
    pub user: &'a str,
    pub time: &'a str,
    pub ip: &'a str,
    pub body: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl<'a> MessageView<'a> {
    pub fn from_message(message: &'a Message) -> Self {
        Self {
            id: &message.id,
            user: &message.user,
            time: &message.time,
            ip: &message.ip,
            body: markup::render(&message.text),
            upvotes: message.upvotes,
            downvotes: message.downvotes,
        }
    }
}

/// Renders the board page. `messages` is in storage order; the page shows
/// them newest first.
pub fn render_board(title: &str, search: &str, messages: &[Message]) -> Result<String> {
    IndexTemplate {
        title,
        search,
        messages: messages.iter().rev().map(MessageView::from_message).collect(),
    }
    .render()
    .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, user: &str, text: &str) -> Message {
        Message {
            id: id.into(),
            user: user.into(),
            ip: "203.0.113.9".into(),
            time: "2024-03-04 05:06:07".into(),
            text: text.into(),
            upvotes: 2,
            downvotes: 1,
        }
    }

    #[test]
    fn test_empty_board() {
        let html = render_board("Message Board", "", &[]).unwrap();
        assert!(html.contains("<title>Message Board</title>"));
        assert!(html.contains("No messages yet."));
    }

    #[test]
    fn test_newest_first() {
        let messages = [
            message("m1", "AAAA0001", "first-post"),
            message("m2", "AAAA0002", "second-post"),
        ];
        let html = render_board("Board", "", &messages).unwrap();

        let second = html.find("second-post").unwrap();
        let first = html.find("first-post").unwrap();
        assert!(second < first);
        assert!(!html.contains("No messages yet."));
    }

    #[test]
    fn test_message_fields_and_vote_hooks() {
        let html = render_board("Board", "", &[message("m1", "ABCD1234", "**hi**")]).unwrap();

        assert!(html.contains("<strong>ABCD1234</strong>"));
        assert!(html.contains("2024-03-04 05:06:07"));
        assert!(html.contains("IP: 203.0.113.9"));
        assert!(html.contains("<strong>hi</strong>"));
        assert!(html.contains(r#"id="up-m1">2<"#));
        assert!(html.contains(r#"id="down-m1">1<"#));
    }

    #[test]
    fn test_untrusted_fields_are_escaped() {
        let evil = message("m1", "<script>x</script>", "<script>y</script>");
        let html = render_board("Board", "\"><script>z</script>", &[evil]).unwrap();

        assert!(!html.contains("<script>x"));
        assert!(!html.contains("<script>y"));
        assert!(!html.contains("<script>z"));
    }

    #[test]
    fn test_search_term_is_echoed() {
        let html = render_board("Board", "hello", &[]).unwrap();
        assert!(html.contains(r#"value="hello""#));
    }
}
