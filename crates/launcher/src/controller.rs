//! Launcher overlay state: the live query, its results and the highlighted row.

use crate::desktop_entry::{filter, scan, DesktopEntry};
use platform::ProcessSpawner;
use settings::constants::launcher;
use std::path::{Path, PathBuf};

/// The single launcher instance owned by the workspace.
pub struct LauncherController {
    applications_dir: PathBuf,
    query: String,
    results: Vec<DesktopEntry>,
    selected: usize,
    visible: bool,
}

impl LauncherController {
    pub fn new(applications_dir: impl Into<PathBuf>) -> Self {
        Self {
            applications_dir: applications_dir.into(),
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            visible: false,
        }
    }

    pub fn applications_dir(&self) -> &Path {
        &self.applications_dir
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[DesktopEntry] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Show the launcher with an empty query.
    pub fn open(&mut self) {
        self.reset();
        self.visible = true;
        tracing::debug!("Launcher opened");
    }

    /// Hide the launcher and forget the query. Closing a hidden launcher is a no-op.
    pub fn close(&mut self) {
        if self.visible {
            tracing::debug!("Launcher closed");
        }
        self.reset();
        self.visible = false;
    }

    /// Close if visible, else open. Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
        self.visible
    }

    /// Replace the query and rescan the applications directory.
    pub fn update_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    /// Drop the last character. Returns false when the query was already empty.
    pub fn pop_char(&mut self) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.refilter();
        true
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.results.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&DesktopEntry> {
        self.results.get(self.selected)
    }

    /// Every descriptor in the applications directory, unfiltered.
    pub fn all_entries(&self) -> Vec<DesktopEntry> {
        scan(&self.applications_dir).collect()
    }

    /// Launch `entry` without waiting for it. Failures are logged and dropped; the
    /// launcher stays open.
    pub fn invoke(&self, entry: &DesktopEntry, spawner: &dyn ProcessSpawner) {
        let Some(argv) = entry.argv() else {
            tracing::warn!("{:?} has no command to run", entry.name);
            return;
        };
        match spawner.spawn(&argv) {
            Ok(()) => tracing::info!("Launched {:?}", entry.name),
            Err(e) => tracing::warn!("Failed to launch {:?}: {:#}", entry.name, e),
        }
    }

    /// Invoke the highlighted result. Returns false when there is nothing to launch.
    pub fn invoke_selected(&self, spawner: &dyn ProcessSpawner) -> bool {
        match self.selected_entry() {
            Some(entry) => {
                self.invoke(entry, spawner);
                true
            }
            None => false,
        }
    }

    fn refilter(&mut self) {
        self.results = filter(
            scan(&self.applications_dir),
            &self.query,
            launcher::MAX_RESULTS,
        );
        self.selected = 0;
        tracing::trace!("Query {:?}: {} results", self.query, self.results.len());
    }

    fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }
}
