use crate::{MenuId, TrackOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

/// How a delivery attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    FetchFailed,
    SendFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A recognised bot command.
    CommandReceived(Command),
    /// A slash-prefixed message that is not a known command.
    UnknownCommand,
    /// Plain text from the user, treated as a search query.
    TextReceived(String),
    /// Discovery and per-candidate extraction finished.
    SearchFinished(Vec<TrackOption>),
    /// The choice menu for the current result set was posted.
    MenuPresented { menu: MenuId },
    /// User pressed an inline button. `menu` is the message the button sits on.
    ChoicePressed { menu: Option<MenuId>, payload: String },
    /// Last-resort re-extraction for an option that had no audio URL.
    AudioRecovered {
        index: usize,
        audio_url: Option<String>,
    },
    /// Download + send finished; the scratch file is already gone.
    DeliveryFinished {
        title: String,
        outcome: DeliveryOutcome,
    },
}
