use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "Hello! I'm Sentinel AI. Need advice on prevention or identifying symptoms?";
pub const SERVER_TROUBLE: &str = "Sorry, I'm having trouble connecting to the server.";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::bot(GREETING)],
            pending: false,
        }
    }
}

impl Transcript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record a user message and mark a reply as pending.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.pending = true;
        Some(text.to_string())
    }

    pub fn receive(&mut self, reply: impl Into<String>) {
        self.messages.push(ChatMessage::bot(reply));
        self.pending = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedLine {
    Header(String),
    Bullet(Vec<Segment>),
    Text(Vec<Segment>),
    Blank,
}

pub fn format_reply(reply: &str) -> Vec<FormattedLine> {
    reply.lines().map(format_line).collect()
}

fn format_line(line: &str) -> FormattedLine {
    let trimmed = line.trim_start();
    if let Some(header) = trimmed.strip_prefix("###") {
        return FormattedLine::Header(header.trim().to_string());
    }
    if let Some(item) = trimmed.strip_prefix('-') {
        return FormattedLine::Bullet(spans(item.trim_start()));
    }
    if trimmed.is_empty() {
        return FormattedLine::Blank;
    }
    FormattedLine::Text(spans(line))
}

/// Split on `**` pairs. An unmatched trailing marker is kept as plain text.
fn spans(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Plain(rest[..start].to_string()));
        }
        segments.push(Segment::Bold(after[..end].to_string()));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Plain(rest.to_string()));
    }
    segments
}
