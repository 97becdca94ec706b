use std::collections::HashSet;

use dunder_core::{
    AgentConfig, ChatWidget, DispatchError, Dispatcher, ExternalPlayer, NormalizedReply, Page,
    Route, SubmitError,
};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub type ReplyTask = JoinHandle<Result<NormalizedReply, DispatchError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Sidebar,
    Chat,
}

/// Scroll and disclosure state of the rendered thread.
///
/// Kept apart from the messages themselves, which never change once stored.
#[derive(Debug, Clone)]
pub struct ConversationView {
    pub scroll: u16,
    /// Keep the newest entry in view
    pub follow: bool,
    pub selected: Option<usize>,
    pub expanded: HashSet<usize>,
    // Updated during render
    pub height: u16,
    pub max_scroll: u16,
    pub message_offsets: Vec<u16>,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self {
            scroll: 0,
            follow: true,
            selected: None,
            expanded: HashSet::new(),
            height: 0,
            max_scroll: 0,
            message_offsets: Vec::new(),
        }
    }
}

impl ConversationView {
    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
        if self.scroll >= self.max_scroll {
            self.follow = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
        self.selected = None;
    }

    pub fn toggle_expanded(&mut self, index: usize) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.follow = false;
        if let Some(&offset) = self.message_offsets.get(index) {
            let bottom = self.scroll.saturating_add(self.height);
            if offset < self.scroll || offset >= bottom {
                self.scroll = offset.min(self.max_scroll);
            }
        }
    }
}

/// A mounted chat page and everything that lives and dies with it.
pub struct ChatPage {
    pub widget: ChatWidget<ExternalPlayer>,
    pub input: String,
    pub cursor: usize,
    pub task: Option<ReplyTask>,
    pub view: ConversationView,
}

impl ChatPage {
    pub fn mount(agent: &'static AgentConfig, audio_player: Option<Vec<String>>) -> Self {
        Self {
            widget: ChatWidget::mount(agent, ExternalPlayer::new(audio_player)),
            input: String::new(),
            cursor: 0,
            task: None,
            view: ConversationView::default(),
        }
    }

    pub fn agent(&self) -> &'static AgentConfig {
        self.widget.agent()
    }

    pub fn is_busy(&self) -> bool {
        self.widget.is_busy()
    }

    pub fn message_count(&self) -> usize {
        self.widget.session().messages().len()
    }

    pub fn select_prev_message(&mut self) {
        let last = self.message_count().saturating_sub(1);
        let index = match self.view.selected {
            Some(i) => i.saturating_sub(1),
            None => last,
        };
        self.view.select(index);
    }

    pub fn select_next_message(&mut self) {
        let last = self.message_count().saturating_sub(1);
        match self.view.selected {
            Some(i) if i >= last => self.view.scroll_to_bottom(),
            Some(i) => self.view.select(i + 1),
            None => {}
        }
    }

    pub fn replay_selected(&mut self) -> bool {
        match self.view.selected {
            Some(i) => self.widget.replay(i),
            None => false,
        }
    }

    pub fn toggle_selected_details(&mut self) {
        let Some(i) = self.view.selected else {
            return;
        };
        let has_details = self
            .widget
            .session()
            .messages()
            .get(i)
            .map_or(false, |m| m.technical_data.is_some());
        if has_details {
            self.view.toggle_expanded(i);
        }
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            debug!(agent = self.agent().key, "dropping outstanding request");
            task.abort();
        }
    }
}

impl Drop for ChatPage {
    fn drop(&mut self) {
        self.abort();
    }
}

pub struct App {
    pub should_quit: bool,
    pub route: Route,
    pub sidebar_cursor: usize,
    pub focus: FocusPane,
    pub input_mode: InputMode,

    pub chat: Option<ChatPage>,
    pub dispatcher: Dispatcher,
    pub audio_player: Option<Vec<String>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub sidebar_area: Option<Rect>,
    pub thread_area: Option<Rect>,
}

impl App {
    pub fn new(dispatcher: Dispatcher, audio_player: Option<Vec<String>>, start: Route) -> Self {
        let mut app = Self {
            should_quit: false,
            route: Route::About,
            sidebar_cursor: 0,
            focus: FocusPane::Sidebar,
            input_mode: InputMode::Normal,
            chat: None,
            dispatcher,
            audio_player,
            animation_frame: 0,
            sidebar_area: None,
            thread_area: None,
        };
        app.mount(start);
        app
    }

    /// Switch pages. Moving to a different route discards the current chat
    /// session; re-selecting the current one keeps it.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        info!(from = self.route.path(), to = route.path(), "navigating");
        self.mount(route);
    }

    fn mount(&mut self, route: Route) {
        self.route = route;
        self.sidebar_cursor = Route::all().iter().position(|r| *r == route).unwrap_or(0);
        self.input_mode = InputMode::Normal;
        self.chat = match route.page() {
            Page::About => None,
            Page::Chat(agent) => Some(ChatPage::mount(agent, self.audio_player.clone())),
        };
        if self.chat.is_none() {
            self.focus = FocusPane::Sidebar;
        }
    }

    pub fn sidebar_down(&mut self) {
        let count = Route::all().len();
        self.sidebar_cursor = (self.sidebar_cursor + 1).min(count - 1);
    }

    pub fn sidebar_up(&mut self) {
        self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
    }

    pub fn open_sidebar_selection(&mut self) {
        if let Some(route) = Route::all().get(self.sidebar_cursor).copied() {
            self.navigate(route);
            if self.chat.is_some() {
                self.focus = FocusPane::Chat;
                self.input_mode = InputMode::Editing;
            }
        }
    }

    /// Send the typed text on the current chat page.
    pub fn submit_input(&mut self) -> Result<(), SubmitError> {
        let Some(page) = self.chat.as_mut() else {
            return Ok(());
        };

        let utterance = page.widget.submit(&page.input)?;
        page.input.clear();
        page.cursor = 0;
        page.view.scroll_to_bottom();

        let dispatcher = self.dispatcher.clone();
        let endpoint = page.agent().endpoint;
        page.task = Some(tokio::spawn(async move {
            dispatcher.send(endpoint, &utterance).await
        }));
        Ok(())
    }

    /// Settle the outstanding request of the current page if it has finished.
    pub async fn poll_reply(&mut self) {
        let Some(page) = self.chat.as_mut() else {
            return;
        };
        let finished = page.task.as_ref().map_or(false, |t| t.is_finished());
        if !finished {
            return;
        }
        let Some(task) = page.task.take() else {
            return;
        };

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "request task did not complete");
                Err(DispatchError::Task(e.to_string()))
            }
        };
        let message = page.widget.settle(outcome);
        debug!(is_error = message.is_error, has_audio = message.audio.is_some(), "reply settled");
        page.view.scroll_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.as_ref().map_or(false, |c| c.is_busy()) {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
