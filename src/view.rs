//! Ephemeral UI state and its transitions.
//!
//! [`ViewState`] is a small `Copy` record: which tab is active, which share
//! menus are open, and which topic the detail view shows.  Every change
//! goes through [`ViewState::apply`], a pure function of the old state and a
//! [`ViewAction`], so the rendering layer never flips flags on its own.
//!
//! ## Menu state machine (per [`ShareKind`], independently)
//!
//! ```text
//! Closed      --toggle(id)-->  OpenFor(id)
//! OpenFor(id) --toggle(id)-->  Closed
//! OpenFor(id) --toggle(id2)--> OpenFor(id2)
//! OpenFor(_)  --dismiss---->   Closed
//! ```
//!
//! A share dispatch is a dismiss followed by the outbound effect.

use serde::{Deserialize, Serialize};

use crate::share::ShareKind;

/// Which collection the main list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Every news item, in backend order.
    #[default]
    All,
    /// Topic clusters, in backend (popularity) order.
    Popular,
    /// News items with `is_favorite == true`, in backend order.
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::All, Tab::Popular, Tab::Favorites];

    pub fn title(self) -> &'static str {
        match self {
            Tab::All => "All News",
            Tab::Popular => "Trending Topics",
            Tab::Favorites => "Favorites",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::All => 0,
            Tab::Popular => 1,
            Tab::Favorites => 2,
        }
    }

    /// The tab after this one, wrapping around.
    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

/// Open/closed state of one kind of share menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuState {
    #[default]
    Closed,
    OpenFor(u64),
}

impl MenuState {
    /// Toggle the menu for `id`: close it if it is open for `id`, otherwise
    /// open it for `id` (replacing any other open target).
    pub fn toggled(self, id: u64) -> MenuState {
        if self.is_open_for(id) {
            MenuState::Closed
        } else {
            MenuState::OpenFor(id)
        }
    }

    pub fn open_id(self) -> Option<u64> {
        match self {
            MenuState::Closed => None,
            MenuState::OpenFor(id) => Some(id),
        }
    }

    pub fn is_open_for(self, id: u64) -> bool {
        self.open_id() == Some(id)
    }
}

/// A user intent that changes only view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    SelectTab(Tab),
    ToggleMenu { id: u64, kind: ShareKind },
    /// Close both share menus.
    DismissMenus,
    OpenTopic(u64),
    CloseTopic,
}

/// All ephemeral dashboard view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub tab: Tab,
    pub news_menu: MenuState,
    pub topic_menu: MenuState,
    /// Topic shown in the detail popup, if any.
    pub selected_topic: Option<u64>,
}

impl ViewState {
    /// Return the state that results from `action`.
    pub fn apply(self, action: ViewAction) -> ViewState {
        match action {
            ViewAction::SelectTab(tab) => ViewState { tab, ..self },
            ViewAction::ToggleMenu { id, kind } => match kind {
                ShareKind::News => ViewState {
                    news_menu: self.news_menu.toggled(id),
                    ..self
                },
                ShareKind::Topic => ViewState {
                    topic_menu: self.topic_menu.toggled(id),
                    ..self
                },
            },
            ViewAction::DismissMenus => ViewState {
                news_menu: MenuState::Closed,
                topic_menu: MenuState::Closed,
                ..self
            },
            ViewAction::OpenTopic(id) => ViewState {
                selected_topic: Some(id),
                ..self
            },
            ViewAction::CloseTopic => ViewState {
                selected_topic: None,
                ..self
            },
        }
    }

    /// The open menu, preferring the news menu when both are open.
    pub fn open_menu(&self) -> Option<(ShareKind, u64)> {
        self.news_menu
            .open_id()
            .map(|id| (ShareKind::News, id))
            .or_else(|| self.topic_menu.open_id().map(|id| (ShareKind::Topic, id)))
    }
}
