//! The fixed bank of terminal sessions.

use crate::backend::{FontDescriptor, SessionHandle, TerminalBackend};
use anyhow::{bail, Context, Result};
use settings::constants::{font, window};
use settings::SettingsStore;
use std::fmt;
use std::path::Path;

/// One terminal tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Position in the bank, stable for the process lifetime.
    pub id: usize,
    pub handle: SessionHandle,
    /// False when the shell failed to start; the tab stays addressable but empty.
    pub shell_running: bool,
}

/// Active tab position announced after every switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabInfo {
    pub index: usize,
    pub count: usize,
}

impl fmt::Display for TabInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}/{} | ALT+1..0",
            window::SHORT_NAME,
            self.index + 1,
            self.count
        )
    }
}

/// Owns every session, the active-tab pointer and the shared font size.
pub struct SessionRegistry {
    sessions: Vec<Session>,
    active_index: usize,
    font_size: i32,
    backend: Box<dyn TerminalBackend>,
    store: Box<dyn SettingsStore>,
}

impl SessionRegistry {
    /// Create `count` sessions, apply the persisted font and start `shell` in each.
    ///
    /// Every placeholder is created before any shell starts. Failing to create one is
    /// fatal; a shell that fails to start only leaves its tab empty.
    pub fn initialize(
        count: usize,
        mut backend: Box<dyn TerminalBackend>,
        store: Box<dyn SettingsStore>,
        shell: &Path,
    ) -> Result<Self> {
        if count == 0 {
            bail!("Session bank cannot be empty");
        }

        let font_size = store.font_size().clamp(font::MIN_SIZE, font::MAX_SIZE);
        let mut sessions = Vec::with_capacity(count);
        for id in 0..count {
            let handle = backend
                .create()
                .with_context(|| format!("Failed to create terminal session {}", id + 1))?;
            sessions.push(Session {
                id,
                handle,
                shell_running: false,
            });
        }

        let descriptor = FontDescriptor::terminal(font_size);
        for session in &mut sessions {
            backend.set_font(session.handle, &descriptor);
            match backend.spawn_shell(session.handle, shell) {
                Ok(()) => session.shell_running = true,
                Err(e) => tracing::warn!("Tab {} has no shell: {:#}", session.id + 1, e),
            }
        }

        tracing::info!(
            "Created {} sessions ({} with a shell), font {}",
            count,
            sessions.iter().filter(|s| s.shell_running).count(),
            descriptor
        );

        Ok(Self {
            sessions,
            active_index: 0,
            font_size,
            backend,
            store,
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_session(&self) -> &Session {
        &self.sessions[self.active_index]
    }

    pub fn font_size(&self) -> i32 {
        self.font_size
    }

    pub fn tab_info(&self) -> TabInfo {
        TabInfo {
            index: self.active_index,
            count: self.sessions.len(),
        }
    }

    /// Make `index` the active tab. Out of range is ignored and returns `None`;
    /// re-selecting the active tab still returns its info.
    pub fn switch_to(&mut self, index: usize) -> Option<TabInfo> {
        if index >= self.sessions.len() {
            tracing::debug!("Ignoring switch to tab index {}", index);
            return None;
        }
        self.active_index = index;
        tracing::debug!("Active tab {}", index + 1);
        Some(self.tab_info())
    }

    /// Change the shared font size by `delta`, clamped to the allowed range.
    ///
    /// Applied to every session, and persisted exactly once even when the clamp
    /// leaves the size unchanged.
    pub fn adjust_font_size(&mut self, delta: i32) -> i32 {
        self.font_size = self
            .font_size
            .saturating_add(delta)
            .clamp(font::MIN_SIZE, font::MAX_SIZE);

        let descriptor = FontDescriptor::terminal(self.font_size);
        for session in &self.sessions {
            self.backend.set_font(session.handle, &descriptor);
        }
        self.store.save_font_size(self.font_size);

        tracing::debug!("Font size {}", self.font_size);
        self.font_size
    }

    /// Reset scrollback and screen of the active session.
    pub fn clear_active(&mut self) {
        let handle = self.active_session().handle;
        self.backend.reset(handle, true, true);
    }

    pub fn copy_active(&mut self) {
        let handle = self.active_session().handle;
        self.backend.copy_selection(handle);
    }

    pub fn paste_active(&mut self) {
        let handle = self.active_session().handle;
        self.backend.paste_clipboard(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BackendCall, RecordingBackend};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use settings::MemoryStore;
    use test_case::test_case;

    const SHELL: &str = "/bin/sh";

    fn registry_with(font_size: i32) -> (SessionRegistry, RecordingBackend, MemoryStore) {
        let backend = RecordingBackend::new();
        let store = MemoryStore::new(font_size);
        let registry = SessionRegistry::initialize(
            10,
            Box::new(backend.clone()),
            Box::new(store.clone()),
            Path::new(SHELL),
        )
        .unwrap();
        (registry, backend, store)
    }

    fn registry() -> (SessionRegistry, RecordingBackend, MemoryStore) {
        registry_with(16)
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    #[test]
    fn initialize_creates_all_before_spawning() {
        let (registry, backend, _) = registry();
        let calls = backend.calls();

        assert_eq!(registry.len(), 10);
        assert!(calls[..10]
            .iter()
            .all(|call| matches!(call, BackendCall::Create(_))));
        let spawns = calls
            .iter()
            .filter(|call| matches!(call, BackendCall::SpawnShell(_, path) if path == Path::new(SHELL)))
            .count();
        assert_eq!(spawns, 10);
        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn initialize_applies_persisted_font() {
        let (registry, backend, store) = registry_with(20);
        assert_eq!(registry.font_size(), 20);
        let fonts = backend.fonts();
        assert_eq!(fonts.len(), 10);
        assert!(fonts.iter().all(|(_, f)| f.to_string() == "Courier New Bold 20"));
        assert!(store.saves().is_empty());
    }

    #[test]
    fn ids_are_positions() {
        let (registry, _, _) = registry();
        for (i, session) in registry.sessions().iter().enumerate() {
            assert_eq!(session.id, i);
        }
    }

    #[test]
    fn failed_placeholder_is_fatal() {
        let backend = RecordingBackend::new().fail_create_after(4);
        let result = SessionRegistry::initialize(
            10,
            Box::new(backend),
            Box::new(MemoryStore::new(16)),
            Path::new(SHELL),
        );
        assert!(result.is_err());
    }

    #[test]
    fn failed_shell_leaves_tab_addressable() {
        let backend = RecordingBackend::new().fail_spawn_for(SessionHandle(3));
        let mut registry = SessionRegistry::initialize(
            10,
            Box::new(backend),
            Box::new(MemoryStore::new(16)),
            Path::new(SHELL),
        )
        .unwrap();

        assert!(!registry.sessions()[3].shell_running);
        assert!(registry.sessions()[4].shell_running);
        assert!(registry.switch_to(3).is_some());
        assert_eq!(registry.active_index(), 3);
    }

    #[test]
    fn empty_bank_is_rejected() {
        let result = SessionRegistry::initialize(
            0,
            Box::new(RecordingBackend::new()),
            Box::new(MemoryStore::new(16)),
            Path::new(SHELL),
        );
        assert!(result.is_err());
    }

    // ========================================================================
    // Tab switching
    // ========================================================================

    #[test_case(0 ; "first")]
    #[test_case(2 ; "third")]
    #[test_case(9 ; "last")]
    fn switch_to_valid_index(index: usize) {
        let (mut registry, _, _) = registry();
        let info = registry.switch_to(index).unwrap();
        assert_eq!(info, TabInfo { index, count: 10 });
        assert_eq!(registry.active_index(), index);
    }

    #[test]
    fn switch_to_active_still_announces() {
        let (mut registry, _, _) = registry();
        registry.switch_to(4);
        assert_eq!(
            registry.switch_to(4).map(|info| info.to_string()),
            Some("ATermD - 5/10 | ALT+1..0".to_string())
        );
    }

    #[test]
    fn tab_info_display() {
        let info = TabInfo { index: 2, count: 10 };
        assert_eq!(info.to_string(), "ATermD - 3/10 | ALT+1..0");
    }

    // ========================================================================
    // Font size
    // ========================================================================

    #[test]
    fn font_change_applies_to_all_and_saves_once() {
        let (mut registry, backend, store) = registry();
        backend.clear_calls();

        assert_eq!(registry.adjust_font_size(1), 17);

        let fonts = backend.fonts();
        assert_eq!(fonts.len(), 10);
        assert!(fonts.iter().all(|(_, f)| f.size == 17));
        assert_eq!(store.saves(), vec![17]);
    }

    #[test]
    fn font_saturates_at_max() {
        let (mut registry, _, store) = registry();
        for _ in 0..20 {
            registry.adjust_font_size(1);
        }
        assert_eq!(registry.font_size(), 32);
        assert_eq!(store.saves().len(), 20);
        assert_eq!(store.saves().last(), Some(&32));
    }

    #[test]
    fn clamped_no_op_still_saves() {
        let (mut registry, _, store) = registry_with(8);
        assert_eq!(registry.adjust_font_size(-1), 8);
        assert_eq!(store.saves(), vec![8]);
    }

    #[test]
    fn extreme_delta_does_not_overflow() {
        let (mut registry, _, _) = registry();
        assert_eq!(registry.adjust_font_size(i32::MAX), 32);
        assert_eq!(registry.adjust_font_size(i32::MIN), 8);
    }

    // ========================================================================
    // Active-session operations
    // ========================================================================

    #[test]
    fn clear_resets_only_active() {
        let (mut registry, backend, _) = registry();
        registry.switch_to(6);
        backend.clear_calls();

        registry.clear_active();

        assert_eq!(
            backend.calls(),
            vec![BackendCall::Reset {
                handle: SessionHandle(6),
                clear_scrollback: true,
                clear_screen: true,
            }]
        );
    }

    #[test]
    fn copy_and_paste_target_active() {
        let (mut registry, backend, _) = registry();
        registry.switch_to(1);
        backend.clear_calls();

        registry.copy_active();
        registry.paste_active();

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::CopySelection(SessionHandle(1)),
                BackendCall::PasteClipboard(SessionHandle(1)),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_out_of_range_switch_is_ignored(start in 0usize..10, index in 10usize..10_000) {
            let (mut registry, _, _) = registry();
            registry.switch_to(start);
            prop_assert!(registry.switch_to(index).is_none());
            prop_assert_eq!(registry.active_index(), start);
        }

        #[test]
        fn prop_font_size_stays_in_range(deltas in prop::collection::vec(-40i32..40, 0..50)) {
            let (mut registry, _, store) = registry();
            for delta in &deltas {
                let size = registry.adjust_font_size(*delta);
                prop_assert!((font::MIN_SIZE..=font::MAX_SIZE).contains(&size));
            }
            prop_assert_eq!(store.saves().len(), deltas.len());
        }
    }
}
