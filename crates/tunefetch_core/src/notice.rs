//! User-visible chat texts.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Greeting,
    Help,
    UnknownCommand,
    EmptyQuery,
    Searching { query: String },
    NothingFound,
    Found { count: usize },
    ChooseTrack,
    InvalidSelection,
    NoAudio { title: String },
    Downloading { title: String },
    Delivered { title: String },
    DownloadFailed { title: String },
    SendFailed { title: String },
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::Greeting => {
                "Hi! Send me a song or artist name and I'll find the track for you.".to_string()
            }
            Notice::Help => "Send a song title or artist name as a plain message.\n\
                 I'll search for matching tracks and show a menu; tap one to get the audio file.\n\n\
                 /start - greeting\n\
                 /help  - this message"
                .to_string(),
            Notice::UnknownCommand => {
                "Unknown command. Send a song or artist name, or /help.".to_string()
            }
            Notice::EmptyQuery => "Please send a song or artist name.".to_string(),
            Notice::Searching { query } => format!("🔎 Searching for \"{query}\"..."),
            Notice::NothingFound => "Nothing found. Try another query.".to_string(),
            Notice::Found { count } => format!("Found {count} track(s)."),
            Notice::ChooseTrack => "Choose a track:".to_string(),
            Notice::InvalidSelection => {
                "That choice is no longer available. Please search again or pick from the latest list."
                    .to_string()
            }
            Notice::NoAudio { title } => {
                format!("Couldn't find an audio file for \"{title}\". Try another option.")
            }
            Notice::Downloading { title } => format!("⬇️ Downloading \"{title}\"..."),
            Notice::Delivered { title } => format!("✅ Sent \"{title}\"."),
            Notice::DownloadFailed { title } => {
                format!("❌ Failed to download \"{title}\".")
            }
            Notice::SendFailed { title } => format!("❌ Failed to send \"{title}\"."),
        }
    }
}
