use crate::{
    parse_choice, ChoiceButton, Command, Conversation, DeliveryOutcome, Effect, MenuId, Msg,
    Notice, Phase, SearchResultSet, TrackOption,
};

/// Pure update function: applies a message to a conversation and returns any effects.
pub fn update(mut state: Conversation, msg: Msg) -> (Conversation, Vec<Effect>) {
    let effects = match msg {
        Msg::CommandReceived(Command::Start) => vec![Effect::Reply(Notice::Greeting)],
        Msg::CommandReceived(Command::Help) => vec![Effect::Reply(Notice::Help)],
        Msg::UnknownCommand => vec![Effect::Reply(Notice::UnknownCommand)],
        Msg::TextReceived(raw) => {
            let query = raw.trim();
            if query.is_empty() {
                return (state, vec![Effect::Reply(Notice::EmptyQuery)]);
            }
            state.begin_search();
            vec![
                Effect::PostStatus(Notice::Searching {
                    query: query.to_string(),
                }),
                Effect::Search {
                    query: query.to_string(),
                },
            ]
        }
        Msg::SearchFinished(options) => {
            if state.phase() != Phase::Searching {
                return (state, Vec::new());
            }
            present_results(&mut state, options)
        }
        Msg::MenuPresented { menu } => {
            state.attach_menu(menu);
            Vec::new()
        }
        Msg::ChoicePressed { menu, payload } => choose(&mut state, menu, &payload),
        Msg::AudioRecovered { index, audio_url } => {
            let Some(option) = state
                .results()
                .and_then(|results| results.options().get(index))
                .cloned()
            else {
                return (state, Vec::new());
            };
            match audio_url {
                Some(audio_url) => {
                    state.store_audio(index, audio_url.clone());
                    start_delivery(&mut state, option.title, audio_url)
                }
                None => vec![Effect::Reply(Notice::NoAudio {
                    title: option.title,
                })],
            }
        }
        Msg::DeliveryFinished { title, outcome } => {
            state.set_phase(Phase::Idle);
            let notice = match outcome {
                DeliveryOutcome::Sent => Notice::Delivered { title },
                DeliveryOutcome::FetchFailed => Notice::DownloadFailed { title },
                DeliveryOutcome::SendFailed => Notice::SendFailed { title },
            };
            vec![Effect::UpdateStatus(notice)]
        }
    };

    (state, effects)
}

fn present_results(state: &mut Conversation, options: Vec<TrackOption>) -> Vec<Effect> {
    if options.is_empty() {
        state.replace_results(None);
        state.set_phase(Phase::Idle);
        return vec![Effect::UpdateStatus(Notice::NothingFound)];
    }

    let buttons = options
        .iter()
        .enumerate()
        .map(|(index, option)| ChoiceButton::new(index, &option.title))
        .collect();
    let count = options.len();
    state.replace_results(Some(SearchResultSet::new(options)));
    state.set_phase(Phase::PresentingChoices);
    vec![
        Effect::UpdateStatus(Notice::Found { count }),
        Effect::PresentChoices { buttons },
    ]
}

fn choose(state: &mut Conversation, menu: Option<MenuId>, payload: &str) -> Vec<Effect> {
    let invalid = vec![Effect::Reply(Notice::InvalidSelection)];
    if matches!(state.phase(), Phase::Searching | Phase::Delivering) {
        return invalid;
    }
    let Some(index) = parse_choice(payload) else {
        return invalid;
    };
    let Some(option) = state
        .results()
        .and_then(|results| results.resolve(menu, index))
        .cloned()
    else {
        return invalid;
    };

    match option.audio_url {
        Some(audio_url) => start_delivery(state, option.title, audio_url),
        None => vec![Effect::RecoverAudio {
            index,
            page_url: option.page_url,
        }],
    }
}

fn start_delivery(state: &mut Conversation, title: String, audio_url: String) -> Vec<Effect> {
    state.set_phase(Phase::Delivering);
    vec![
        Effect::PostStatus(Notice::Downloading {
            title: title.clone(),
        }),
        Effect::Deliver { title, audio_url },
    ]
}
