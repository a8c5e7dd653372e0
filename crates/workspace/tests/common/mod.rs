//! Shared fixtures for workspace integration tests.
//!
//! Fakes for every collaborator the workspace talks to, each cloneable so a test can
//! keep a handle for inspection after boxing one into the workspace.

#![allow(dead_code)]

use anyhow::{bail, Result};
use atermd_workspace::{ContextMenu, MenuChoice, StatusLine, WindowHost, Workspace};
use launcher::LauncherController;
use parking_lot::Mutex;
use platform::{ProcessSpawner, WindowHints};
use settings::{ConfigStore, SettingsStore};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terminal::test_support::RecordingBackend;
use terminal::SessionRegistry;

pub use tempfile::{tempdir, TempDir};

// ============================================================================
// Window host
// ============================================================================

#[derive(Default)]
struct HostState {
    hints: Vec<WindowHints>,
    visible: bool,
    statuses: Vec<StatusLine>,
    launcher_renders: Vec<(bool, String)>,
    menus: Vec<ContextMenu>,
    menu_answers: VecDeque<Option<usize>>,
    messages: Vec<(String, String)>,
}

/// Records everything the workspace shows. Menu answers are scripted as indices into
/// [`ContextMenu::choices`].
#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                visible: true,
                ..HostState::default()
            })),
        }
    }

    /// The next context menu picks the choice at `index`, or is dismissed on `None`.
    pub fn answer_menu(&self, index: Option<usize>) {
        self.state.lock().menu_answers.push_back(index);
    }

    pub fn hints(&self) -> Vec<WindowHints> {
        self.state.lock().hints.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    pub fn last_status(&self) -> Option<StatusLine> {
        self.state.lock().statuses.last().cloned()
    }

    pub fn status_count(&self) -> usize {
        self.state.lock().statuses.len()
    }

    /// `(visible, query)` per launcher redraw.
    pub fn launcher_renders(&self) -> Vec<(bool, String)> {
        self.state.lock().launcher_renders.clone()
    }

    pub fn menus(&self) -> Vec<ContextMenu> {
        self.state.lock().menus.clone()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.state.lock().messages.clone()
    }
}

impl WindowHost for FakeHost {
    fn apply_hints(&mut self, hints: &WindowHints) {
        self.state.lock().hints.push(hints.clone());
    }

    fn toggle_visible(&mut self) {
        let mut state = self.state.lock();
        state.visible = !state.visible;
    }

    fn set_status(&mut self, status: &StatusLine) {
        self.state.lock().statuses.push(status.clone());
    }

    fn render_launcher(&mut self, launcher: &LauncherController) {
        self.state
            .lock()
            .launcher_renders
            .push((launcher.is_visible(), launcher.query().to_string()));
    }

    fn show_context_menu(&mut self, menu: &ContextMenu) -> Option<MenuChoice> {
        let mut state = self.state.lock();
        state.menus.push(menu.clone());
        let index = state.menu_answers.pop_front().flatten()?;
        menu.choices().get(index).map(|choice| (*choice).clone())
    }

    fn show_message(&mut self, title: &str, body: &str) {
        self.state
            .lock()
            .messages
            .push((title.to_string(), body.to_string()));
    }
}

// ============================================================================
// Process spawner
// ============================================================================

/// Records argv of every spawn; programs named in `failing` report an error.
#[derive(Clone, Default)]
pub struct RecordingSpawner {
    spawned: Arc<Mutex<Vec<Vec<String>>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, program: &str) {
        self.failing.lock().push(program.to_string());
    }

    pub fn spawned(&self) -> Vec<Vec<String>> {
        self.spawned.lock().clone()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, argv: &[String]) -> Result<()> {
        self.spawned.lock().push(argv.to_vec());
        if argv
            .first()
            .is_some_and(|program| self.failing.lock().contains(program))
        {
            bail!("{:?} not found", argv[0]);
        }
        Ok(())
    }
}

// ============================================================================
// Test environment
// ============================================================================

/// Temp config file and applications directory.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
    pub apps_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join(".config").join("alinuxd").join("conf.ini");
        let apps_dir = temp_dir.path().join("applications");
        std::fs::create_dir_all(&apps_dir).expect("Failed to create applications dir");
        Self {
            temp_dir,
            config_path,
            apps_dir,
        }
    }

    pub fn write_config(&self, content: &str) {
        let parent = self.config_path.parent().expect("config path has a parent");
        std::fs::create_dir_all(parent).expect("Failed to create config dir");
        std::fs::write(&self.config_path, content).expect("Failed to write config");
    }

    pub fn read_config(&self) -> Option<String> {
        std::fs::read_to_string(&self.config_path).ok()
    }

    /// Write `<file>.desktop` with the given `Name` and `Exec` (either may be omitted).
    pub fn add_app(&self, file: &str, name: Option<&str>, exec: Option<&str>) {
        let mut body = String::from("[Desktop Entry]\nType=Application\n");
        if let Some(name) = name {
            body.push_str(&format!("Name={}\n", name));
        }
        if let Some(exec) = exec {
            body.push_str(&format!("Exec={}\n", exec));
        }
        std::fs::write(self.apps_dir.join(format!("{}.desktop", file)), body)
            .expect("Failed to write descriptor");
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A workspace wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub env: TestEnv,
    pub workspace: Workspace,
    pub backend: RecordingBackend,
    pub host: FakeHost,
    pub spawner: RecordingSpawner,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_env(TestEnv::new())
    }

    /// Build against `env`, reading the font size from its config file.
    pub fn with_env(env: TestEnv) -> Self {
        let store = ConfigStore::load(&env.config_path);
        Self::with_store(env, Box::new(store))
    }

    pub fn with_store(env: TestEnv, store: Box<dyn SettingsStore>) -> Self {
        let backend = RecordingBackend::new();
        let host = FakeHost::new();
        let spawner = RecordingSpawner::new();

        let registry =
            SessionRegistry::initialize(10, Box::new(backend.clone()), store, Path::new("/bin/sh"))
                .expect("registry");
        let launcher = LauncherController::new(&env.apps_dir);
        let workspace = Workspace::new(
            registry,
            launcher,
            Box::new(host.clone()),
            Box::new(spawner.clone()),
        );

        Self {
            env,
            workspace,
            backend,
            host,
            spawner,
        }
    }

    /// Press a chord such as `alt-3`; returns whether the workspace consumed it.
    pub fn press(&mut self, chord: &str) -> bool {
        let stroke = actions::Keystroke::parse(chord).expect("valid chord");
        self.workspace.handle_key(&stroke)
    }

    /// Type plain characters one keystroke at a time.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let stroke = actions::Keystroke::char(c);
            self.workspace.handle_key(&stroke);
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
