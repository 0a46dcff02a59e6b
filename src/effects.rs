//! Executes the [`Command`]s the view model returns.
//!
//! Network commands go to the [`Syncer`]; links go to the system browser
//! and copies to the system clipboard.  None of these report back to the
//! user: failures are logged and otherwise ignored.

use arboard::Clipboard;
use tracing::{debug, warn};

use crate::app::Command;
use crate::source::NO_URL;
use crate::sync::Syncer;

pub struct Effects {
    syncer: Syncer,
    /// Created on first copy.  Kept alive because on X11/Wayland the
    /// clipboard owner must outlive the copy for other apps to paste it.
    clipboard: Option<Clipboard>,
}

impl Effects {
    pub fn new(syncer: Syncer) -> Self {
        Self {
            syncer,
            clipboard: None,
        }
    }

    pub fn run(&mut self, command: Command) {
        debug!(?command, "running command");
        match command {
            Command::Refresh => self.syncer.refresh(),
            Command::PersistFavorite(id) => self.syncer.persist_favorite(id),
            Command::Broadcast { news_id, platform } => self.syncer.broadcast(news_id, platform),
            Command::Ingest => self.syncer.ingest(),
            Command::OpenUrl(url) => open_url(&url),
            Command::CopyToClipboard(text) => self.copy(&text),
        }
    }

    pub fn run_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.run(command);
        }
    }

    fn copy(&mut self, text: &str) {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!(error = %e, "clipboard unavailable");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            if let Err(e) = clipboard.set_text(text.to_owned()) {
                warn!(error = %e, "copy to clipboard failed");
            }
        }
    }
}

/// Open `url` in a new browser window without waiting for it.
fn open_url(url: &str) {
    let Some(url) = openable(url) else {
        debug!(%url, "nothing to open");
        return;
    };
    if let Err(e) = open::that_detached(url) {
        warn!(%url, error = %e, "could not open link");
    }
}

/// The trimmed URL, unless it is blank or the backend's `"#"` placeholder.
fn openable(url: &str) -> Option<&str> {
    let url = url.trim();
    (!url.is_empty() && url != NO_URL).then_some(url)
}
