//! Plain-text rendering of a session view
//!
//! Only reads `SessionView`; never touches the controller.

use crate::runtime::SessionView;
use crate::transcript::{Message, Role};

pub const TITLE: &str = "MyGPT";
pub const SUBTITLE: &str = "local client";
pub const THINKING: &str = "Thinking…";

/// Indent for continuation lines of multi-line messages
const CONTINUATION_INDENT: &str = "  ";

pub fn header() -> String {
    format!("{TITLE} · {SUBTITLE}\nType a message, /new for a new chat, /quit to leave.\n")
}

pub fn message(message: &Message) -> String {
    let mut lines = message.content.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("{}: {first}\n", message.role.display_name());
    for line in lines {
        out.push_str(CONTINUATION_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Provisional assistant turn shown while a reply is pending
pub fn placeholder() -> String {
    format!("{}: {THINKING}\n", Role::Assistant.display_name())
}

pub fn error_banner(error: &str) -> String {
    format!("[!] {error}\n")
}

pub fn busy_notice() -> String {
    "[…] Still waiting for the last reply.\n".to_string()
}

pub fn new_chat_divider() -> String {
    "──────── new chat ────────\n".to_string()
}

/// Messages from index `from` onward, then the pending placeholder and the
/// error banner when they apply.
pub fn view_from(view: &SessionView, from: usize) -> String {
    let mut out = String::new();
    for m in view.messages.iter().skip(from) {
        out.push_str(&message(m));
    }
    if view.pending {
        out.push_str(&placeholder());
    }
    if let Some(error) = &view.last_error {
        out.push_str(&error_banner(error));
    }
    out
}
