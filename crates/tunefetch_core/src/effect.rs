use crate::Notice;

const CHOICE_PREFIX: &str = "choose|";
const MAX_LABEL_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a standalone message.
    Reply(Notice),
    /// Send a new status message that later `UpdateStatus` effects edit.
    PostStatus(Notice),
    /// Edit the current status message, or send a new one if there is none.
    UpdateStatus(Notice),
    /// Run discovery plus sequential extraction; answers with `Msg::SearchFinished`.
    Search { query: String },
    /// Post the inline menu; answers with `Msg::MenuPresented`.
    PresentChoices { buttons: Vec<ChoiceButton> },
    /// Re-run extraction on one page; answers with `Msg::AudioRecovered`.
    RecoverAudio { index: usize, page_url: String },
    /// Download to scratch storage, send, clean up; answers with `Msg::DeliveryFinished`.
    Deliver { title: String, audio_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceButton {
    pub label: String,
    pub payload: String,
}

impl ChoiceButton {
    pub fn new(index: usize, title: &str) -> Self {
        let label = format!("{}. {}", index + 1, title);
        Self {
            label: truncate_chars(&label, MAX_LABEL_CHARS),
            payload: choice_payload(index),
        }
    }
}

/// Callback payload for the option at `index` (zero-based).
pub fn choice_payload(index: usize) -> String {
    format!("{CHOICE_PREFIX}{index}")
}

/// Inverse of [`choice_payload`]; `None` for anything malformed.
pub fn parse_choice(payload: &str) -> Option<usize> {
    payload.strip_prefix(CHOICE_PREFIX)?.parse().ok()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
