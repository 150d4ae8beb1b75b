//! Tunefetch core: pure per-conversation state machine.
mod effect;
mod msg;
mod notice;
mod state;
mod update;

pub use effect::{choice_payload, parse_choice, ChoiceButton, Effect};
pub use msg::{Command, DeliveryOutcome, Msg};
pub use notice::Notice;
pub use state::{Conversation, MenuId, Phase, SearchResultSet, TrackOption};
pub use update::update;
