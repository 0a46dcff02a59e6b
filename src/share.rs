//! Outbound share links.
//!
//! Each [`SharePlatform`] knows how to turn a title and an article URL into a
//! link that hands the story to that platform.  Both components are
//! percent-encoded before they are spliced into the template.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a story can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharePlatform {
    LinkedIn,
    WhatsApp,
    Email,
}

/// Which share menu an action targets.  The two kinds never affect each
/// other's open/closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareKind {
    News,
    Topic,
}

impl SharePlatform {
    /// Menu order.
    pub const ALL: [SharePlatform; 3] = [Self::LinkedIn, Self::WhatsApp, Self::Email];

    pub fn name(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::WhatsApp => "WhatsApp",
            Self::Email => "Email",
        }
    }

    /// Key that picks this platform while a share menu is open.
    pub fn hotkey(self) -> char {
        match self {
            Self::LinkedIn => 'l',
            Self::WhatsApp => 'w',
            Self::Email => 'e',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.hotkey() == c)
    }

    /// Build the outbound link for sharing `title` / `url` on this platform.
    pub fn share_url(self, title: &str, url: &str) -> String {
        let title = urlencoding::encode(title);
        let url = urlencoding::encode(url);
        match self {
            Self::LinkedIn => {
                format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
            }
            Self::WhatsApp => format!("https://wa.me/?text={title}%20-%20{url}"),
            Self::Email => format!("mailto:?subject={title}&body={title}%0A{url}"),
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
