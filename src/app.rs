use std::collections::HashMap;

use ratatui::widgets::ListState;
use tracing::{debug, info, warn};

use crate::share::{ShareKind, SharePlatform};
use crate::source::{NewsItem, Topic};
use crate::sync::SyncMsg;
use crate::view::{Tab, ViewAction, ViewState};

/// A side effect requested by the view model.
///
/// [`App`] never performs I/O itself; it returns these and the main loop
/// hands them to [`crate::effects::Effects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-fetch news and topics.
    Refresh,
    /// Persist a favorite toggle on the backend.
    PersistFavorite(u64),
    /// Open a link in the system browser.
    OpenUrl(String),
    /// Put text on the system clipboard.
    CopyToClipboard(String),
    /// Record a share on the backend.
    Broadcast { news_id: u64, platform: SharePlatform },
    /// Ask the backend to pull its feeds, then refresh.
    Ingest,
}

/// Persistence outcome of a favorite toggle, as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteStatus {
    Pending,
    Saved,
    Failed(String),
}

/// Book-keeping for the favorite requests of one news item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSync {
    /// Requests sent but not yet answered.
    pub in_flight: u32,
    /// Error of the most recent answered request, if it failed.
    pub last_error: Option<String>,
}

impl FavoriteSync {
    pub fn status(&self) -> FavoriteStatus {
        match (&self.last_error, self.in_flight) {
            (_, n) if n > 0 => FavoriteStatus::Pending,
            (Some(e), _) => FavoriteStatus::Failed(e.clone()),
            (None, _) => FavoriteStatus::Saved,
        }
    }
}

pub struct App {
    /// News collection, in backend order.
    pub news: Vec<NewsItem>,
    /// Topic clusters, in backend order.
    pub topics: Vec<Topic>,
    /// True from a refresh request until the news fetch completes.
    pub loading: bool,
    /// Tab, share menus and detail view.
    pub view: ViewState,
    /// Favorite persistence per news id.
    pub favorite_sync: HashMap<u64, FavoriteSync>,
    /// Cursor in the main list.
    pub list_state: ListState,
    /// Cursor in the topic detail popup.
    pub detail_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Also record news shares on the backend.
    broadcast: bool,
}

impl App {
    pub fn new(broadcast: bool) -> Self {
        Self {
            news: Vec::new(),
            topics: Vec::new(),
            loading: false,
            view: ViewState::default(),
            favorite_sync: HashMap::new(),
            list_state: ListState::default(),
            detail_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            broadcast,
        }
    }

    // -- derived views -------------------------------------------------------

    /// News items with `is_favorite` set, in collection order.
    pub fn favorites(&self) -> impl Iterator<Item = &NewsItem> {
        self.news.iter().filter(|item| item.is_favorite)
    }

    /// News rows for the active tab (empty on the topics tab).
    pub fn visible_news(&self) -> Vec<&NewsItem> {
        match self.view.tab {
            Tab::All => self.news.iter().collect(),
            Tab::Favorites => self.favorites().collect(),
            Tab::Popular => Vec::new(),
        }
    }

    /// Number of rows in the main list for the active tab.
    pub fn row_count(&self) -> usize {
        match self.view.tab {
            Tab::All => self.news.len(),
            Tab::Favorites => self.favorites().count(),
            Tab::Popular => self.topics.len(),
        }
    }

    pub fn news_by_id(&self, id: u64) -> Option<&NewsItem> {
        self.news.iter().find(|item| item.id == id)
    }

    pub fn topic_by_id(&self, id: u64) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == id)
    }

    /// First open share menu whose target still exists, news before topics,
    /// with the target's title.
    pub fn share_target(&self) -> Option<(ShareKind, u64, &str)> {
        let news = self
            .view
            .news_menu
            .open_id()
            .and_then(|id| self.news_by_id(id))
            .map(|item| (ShareKind::News, item.id, item.title.as_str()));
        news.or_else(|| {
            self.view
                .topic_menu
                .open_id()
                .and_then(|id| self.topic_by_id(id))
                .map(|topic| (ShareKind::Topic, topic.id, topic.title.as_str()))
        })
    }

    /// News item under the cursor, on the news tabs.
    pub fn selected_news(&self) -> Option<&NewsItem> {
        let index = self.list_state.selected()?;
        self.visible_news().get(index).copied()
    }

    /// Topic under the cursor, on the topics tab.
    pub fn selected_topic_row(&self) -> Option<&Topic> {
        if self.view.tab != Tab::Popular {
            return None;
        }
        self.topics.get(self.list_state.selected()?)
    }

    /// Topic shown in the detail popup, if it still exists.
    pub fn detail_topic(&self) -> Option<&Topic> {
        self.view.selected_topic.and_then(|id| self.topic_by_id(id))
    }

    pub fn favorite_status(&self, id: u64) -> Option<FavoriteStatus> {
        self.favorite_sync.get(&id).map(FavoriteSync::status)
    }

    // -- navigation ----------------------------------------------------------

    /// The list the cursor keys currently move: the detail popup's article
    /// list when it is open, the main list otherwise.
    fn active_list(&mut self) -> (&mut ListState, usize) {
        let detail_len = self.detail_topic().map(|topic| topic.articles.len());
        match detail_len {
            Some(len) => (&mut self.detail_state, len),
            None => {
                let len = self.row_count();
                (&mut self.list_state, len)
            }
        }
    }

    pub fn select_next(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        let (state, len) = self.active_list();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let (state, len) = self.active_list();
        if len > 0 {
            state.select(Some(len - 1));
        }
    }

    /// Keep the main cursor inside the current rows after they change.
    fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    // -- view actions --------------------------------------------------------

    fn apply(&mut self, action: ViewAction) {
        self.view = self.view.apply(action);
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.apply(ViewAction::SelectTab(tab));
        self.list_state.select(None);
        self.clamp_selection();
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.view.tab.next());
    }

    pub fn toggle_share_menu(&mut self, id: u64, kind: ShareKind) {
        self.apply(ViewAction::ToggleMenu { id, kind });
    }

    /// Close both share menus.
    pub fn dismiss_menus(&mut self) {
        self.apply(ViewAction::DismissMenus);
    }

    pub fn open_topic(&mut self, id: u64) {
        self.apply(ViewAction::OpenTopic(id));
        self.detail_state = ListState::default();
        if self.detail_topic().is_some_and(|t| !t.articles.is_empty()) {
            self.detail_state.select(Some(0));
        }
    }

    pub fn close_topic(&mut self) {
        self.apply(ViewAction::CloseTopic);
    }

    /// `Esc`: close menus first, then the detail popup, then quit.
    pub fn escape(&mut self) {
        if self.view.open_menu().is_some() {
            self.dismiss_menus();
        } else if self.view.selected_topic.is_some() {
            self.close_topic();
        } else {
            self.quit = true;
        }
    }

    /// Open or close the share menu for the row under the cursor.
    ///
    /// News items can only be shared once they are favorited.
    pub fn toggle_share_menu_for_selection(&mut self) {
        if let Some(topic) = self.selected_topic_row() {
            let id = topic.id;
            self.toggle_share_menu(id, ShareKind::Topic);
            return;
        }
        match self.selected_news().map(|item| (item.id, item.is_favorite)) {
            Some((id, true)) => self.toggle_share_menu(id, ShareKind::News),
            Some((_, false)) => self.status = "Star an article (f) to share it".into(),
            None => {}
        }
    }

    // -- data actions --------------------------------------------------------

    /// Start a full reload of both collections.
    pub fn begin_refresh(&mut self) -> Command {
        self.loading = true;
        self.status = "Refreshing…".into();
        Command::Refresh
    }

    /// Flip the favorite flag of `id` locally and request persistence.
    ///
    /// Unknown ids are ignored.
    pub fn toggle_favorite(&mut self, id: u64) -> Option<Command> {
        let item = self.news.iter_mut().find(|item| item.id == id)?;
        item.is_favorite = !item.is_favorite;
        debug!(id, is_favorite = item.is_favorite, "favorite toggled locally");

        self.favorite_sync.entry(id).or_default().in_flight += 1;
        self.clamp_selection();
        Some(Command::PersistFavorite(id))
    }

    pub fn toggle_favorite_for_selection(&mut self) -> Option<Command> {
        let id = self.selected_news()?.id;
        self.toggle_favorite(id)
    }

    /// Share the news item or topic `id` on `platform`.
    ///
    /// Both menus close whether or not `id` still resolves; a stale id
    /// produces no commands.
    pub fn dispatch_share(
        &mut self,
        id: u64,
        platform: SharePlatform,
        kind: ShareKind,
    ) -> Vec<Command> {
        self.dismiss_menus();

        let target = match kind {
            ShareKind::News => self.news_by_id(id).map(|n| (n.title.clone(), n.url.clone())),
            ShareKind::Topic => self.topic_by_id(id).map(|t| (t.title.clone(), t.url.clone())),
        };
        let Some((title, url)) = target else {
            debug!(id, ?kind, "share target vanished");
            return Vec::new();
        };

        info!(id, ?kind, %platform, "sharing");
        self.status = format!("Shared to {platform}");
        let mut commands = vec![Command::OpenUrl(platform.share_url(&title, &url))];
        if self.broadcast && kind == ShareKind::News {
            commands.push(Command::Broadcast {
                news_id: id,
                platform,
            });
        }
        commands
    }

    /// Share whatever the open menu points at.
    pub fn dispatch_share_from_menu(&mut self, platform: SharePlatform) -> Vec<Command> {
        let target = self
            .share_target()
            .map(|(kind, id, _)| (kind, id))
            .or_else(|| self.view.open_menu());
        match target {
            Some((kind, id)) => self.dispatch_share(id, platform, kind),
            None => Vec::new(),
        }
    }

    /// Copy `url` to the clipboard.  Success is reported up front.
    pub fn copy_link(&mut self, url: &str) -> Command {
        self.status = "🔗 Link copied!".into();
        Command::CopyToClipboard(url.to_string())
    }

    /// Link of whatever the cursor points at: a detail-popup article, a
    /// topic, or a news item.
    pub fn selected_link(&self) -> Option<String> {
        if let Some(topic) = self.detail_topic() {
            let article = topic.articles.get(self.detail_state.selected()?)?;
            return Some(article.url.clone()).filter(|url| !url.is_empty());
        }
        if let Some(topic) = self.selected_topic_row() {
            return topic.link().map(String::from);
        }
        self.selected_news()
            .map(|item| item.url.clone())
            .filter(|url| !url.is_empty())
    }

    pub fn copy_selected_link(&mut self) -> Option<Command> {
        let url = self.selected_link()?;
        Some(self.copy_link(&url))
    }

    pub fn open_selected(&mut self) -> Option<Command> {
        self.selected_link().map(Command::OpenUrl)
    }

    /// `Enter`: drill into a topic, otherwise open the link under the cursor.
    pub fn activate_selection(&mut self) -> Option<Command> {
        if self.view.selected_topic.is_none() {
            if let Some(id) = self.selected_topic_row().map(|t| t.id) {
                self.open_topic(id);
                return None;
            }
        }
        self.open_selected()
    }

    pub fn begin_ingest(&mut self) -> Command {
        self.status = "Asking the server to fetch new articles…".into();
        Command::Ingest
    }

    // -- sync results --------------------------------------------------------

    /// Apply a message from the background sync tasks.
    ///
    /// May return a follow-up command (a finished ingest asks for a refresh).
    pub fn handle_sync(&mut self, msg: SyncMsg) -> Option<Command> {
        match msg {
            SyncMsg::News(Ok(items)) => {
                info!(count = items.len(), "news loaded");
                self.news = items;
                self.favorite_sync.retain(|_, sync| sync.in_flight > 0);
                self.loading = false;
                self.status = format!("Loaded {} articles", self.news.len());
                self.clamp_selection();
            }
            SyncMsg::News(Err(e)) => {
                warn!(error = %e, "fetching news failed");
                self.loading = false;
                self.status = "Ready".into();
            }
            SyncMsg::Topics(Ok(topics)) => {
                info!(count = topics.len(), "topics loaded");
                self.topics = topics;
                self.clamp_selection();
            }
            SyncMsg::Topics(Err(e)) => {
                warn!(error = %e, "fetching topics failed");
            }
            SyncMsg::Favorite { id, result } => self.settle_favorite(id, result),
            SyncMsg::Broadcast {
                news_id,
                platform,
                result,
            } => match result {
                Ok(()) => {
                    info!(news_id, %platform, "broadcast logged");
                    self.status = format!("Broadcast #{news_id} to {platform}");
                }
                Err(e) => {
                    warn!(news_id, %platform, error = %e, "broadcast failed");
                    self.status = format!("Broadcast to {platform} failed");
                }
            },
            SyncMsg::Ingest(Ok(report)) => {
                info!(new_items = report.new_items, "server ingest finished");
                let command = self.begin_refresh();
                self.status = format!("{} new articles, refreshing…", report.new_items);
                return Some(command);
            }
            SyncMsg::Ingest(Err(e)) => {
                warn!(error = %e, "server ingest failed");
                self.status = "Server fetch failed".into();
            }
        }
        None
    }

    fn settle_favorite(&mut self, id: u64, result: Result<Option<bool>, String>) {
        let sync = self.favorite_sync.entry(id).or_default();
        sync.in_flight = sync.in_flight.saturating_sub(1);
        let settled = sync.in_flight == 0;

        match result {
            Ok(server_flag) => {
                sync.last_error = None;
                let local_flag = self.news_by_id(id).map(|item| item.is_favorite);
                match (server_flag, local_flag) {
                    (Some(server), Some(local)) if settled && server != local => {
                        warn!(id, server, local, "favorite state diverged from server");
                    }
                    _ => debug!(id, ?server_flag, "favorite saved"),
                }
            }
            Err(e) => {
                warn!(id, error = %e, "saving favorite failed");
                sync.last_error = Some(e);
                self.status = format!("Could not save favorite #{id}");
            }
        }
    }
}
