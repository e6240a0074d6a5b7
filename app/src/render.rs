//! Plain-text rendition of the counter page.

use counter_core::CounterState;

pub const TITLE: &str = "Counter Demo";
pub const PLACEHOLDER: &str = "Loading...";

pub fn button_label(state: &CounterState) -> &'static str {
    if state.loading {
        "[ Incrementing... ] (disabled)"
    } else {
        "[ Increment Counter ]"
    }
}

/// The page as lines of text. The message line is left out while empty.
pub fn render(state: &CounterState) -> String {
    let count = match state.count {
        Some(n) => n.to_string(),
        None => PLACEHOLDER.to_string(),
    };
    let mut lines = vec![TITLE.to_string(), count, button_label(state).to_string()];
    if !state.message.is_empty() {
        lines.push(state.message.clone());
    }
    lines.join("\n")
}
