/// Identifies the chat message that carries a choice menu.
pub type MenuId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    PresentingChoices,
    Delivering,
}

/// One selectable search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOption {
    pub title: String,
    pub page_url: String,
    pub audio_url: Option<String>,
}

impl TrackOption {
    pub fn new(title: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page_url: page_url.into(),
            audio_url: None,
        }
    }

    pub fn with_audio(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }
}

/// Results of the most recent search, plus the menu message that shows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultSet {
    options: Vec<TrackOption>,
    menu: Option<MenuId>,
}

impl SearchResultSet {
    pub fn new(options: Vec<TrackOption>) -> Self {
        Self {
            options,
            menu: None,
        }
    }

    pub fn options(&self) -> &[TrackOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn menu(&self) -> Option<MenuId> {
        self.menu
    }

    /// A selection is only valid when it came from this set's own menu and
    /// indexes into it.
    pub fn resolve(&self, menu: Option<MenuId>, index: usize) -> Option<&TrackOption> {
        match (self.menu, menu) {
            (Some(expected), Some(actual)) if expected == actual => self.options.get(index),
            _ => None,
        }
    }
}

/// Per-conversation session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversation {
    phase: Phase,
    results: Option<SearchResultSet>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn results(&self) -> Option<&SearchResultSet> {
        self.results.as_ref()
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn begin_search(&mut self) {
        self.phase = Phase::Searching;
        self.results = None;
    }

    pub(crate) fn replace_results(&mut self, results: Option<SearchResultSet>) {
        self.results = results;
    }

    pub(crate) fn attach_menu(&mut self, menu: MenuId) -> bool {
        match self.results.as_mut() {
            Some(results) if results.menu.is_none() => {
                results.menu = Some(menu);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn store_audio(&mut self, index: usize, audio_url: String) {
        if let Some(option) = self
            .results
            .as_mut()
            .and_then(|results| results.options.get_mut(index))
        {
            option.audio_url = Some(audio_url);
        }
    }
}
