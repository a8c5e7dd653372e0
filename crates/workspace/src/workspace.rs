//! Workspace: owns the session bank, the launcher and the router, and turns
//! keystrokes into effects on them.

mod context_menu;
mod host;
mod router;
mod status_bar;

pub use context_menu::{
    ContextMenu, MenuChoice, MenuItem, ABOUT_TEXT, ABOUT_TITLE, HELP_TEXT, HELP_TITLE,
};
pub use host::WindowHost;
pub use router::{HotkeyRouter, RouterMode};
pub use status_bar::{format_clock, StatusLine};

use actions::{Action, Keystroke};
use launcher::LauncherController;
use platform::{ProcessSpawner, WindowHints};
use settings::constants::{launcher as launcher_consts, window};
use terminal::SessionRegistry;

/// Single owner of all mutable shell state.
pub struct Workspace {
    registry: SessionRegistry,
    launcher: LauncherController,
    router: HotkeyRouter,
    host: Box<dyn WindowHost>,
    spawner: Box<dyn ProcessSpawner>,
}

impl Workspace {
    /// Apply the window hints and publish the initial status line.
    pub fn new(
        registry: SessionRegistry,
        launcher: LauncherController,
        mut host: Box<dyn WindowHost>,
        spawner: Box<dyn ProcessSpawner>,
    ) -> Self {
        host.apply_hints(&WindowHints::desktop(window::TITLE));
        let mut workspace = Self {
            registry,
            launcher,
            router: HotkeyRouter::new(),
            host,
            spawner,
        };
        workspace.refresh_status();
        workspace
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn launcher(&self) -> &LauncherController {
        &self.launcher
    }

    pub fn router(&self) -> &HotkeyRouter {
        &self.router
    }

    /// Route a key press. Returns false when the key should go to the active session.
    pub fn handle_key(&mut self, stroke: &Keystroke) -> bool {
        match self.router.classify(stroke) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => self.router.swallows_unbound(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!("Dispatching {}", action.name());

        if action.is_launcher_local() && !self.launcher.is_visible() {
            tracing::debug!("Ignoring {} while the launcher is hidden", action.name());
            return;
        }

        match action {
            Action::SwitchTab(index) => {
                if self.registry.switch_to(index).is_some() {
                    self.refresh_status();
                }
            }
            Action::ClearActive => self.registry.clear_active(),
            Action::AdjustFontSize(delta) => {
                self.registry.adjust_font_size(delta);
            }
            Action::ToggleWindow => self.host.toggle_visible(),
            Action::LaunchConfigTool => self.launch_config_tool(),
            Action::OpenContextMenu => self.open_context_menu(),
            Action::ToggleLauncher => {
                self.launcher.toggle();
                self.launcher_changed();
            }
            Action::LauncherInput(c) => {
                self.launcher.push_char(c);
                self.launcher_changed();
            }
            Action::LauncherBackspace => {
                if self.launcher.pop_char() {
                    self.launcher_changed();
                }
            }
            Action::LauncherSelectNext => {
                self.launcher.select_next();
                self.launcher_changed();
            }
            Action::LauncherSelectPrev => {
                self.launcher.select_prev();
                self.launcher_changed();
            }
            Action::LauncherConfirm => {
                self.launcher.invoke_selected(self.spawner.as_ref());
            }
            Action::LauncherDismiss => {
                self.launcher.close();
                self.launcher_changed();
            }
        }
    }

    /// Secondary mouse button over the window.
    pub fn handle_secondary_click(&mut self) {
        self.open_context_menu();
    }

    /// Once-a-second clock refresh.
    pub fn tick(&mut self) {
        self.refresh_status();
    }

    pub fn activate_menu_choice(&mut self, choice: MenuChoice) {
        match choice {
            MenuChoice::LaunchApp(entry) => self.launcher.invoke(&entry, self.spawner.as_ref()),
            MenuChoice::About => self.host.show_message(ABOUT_TITLE, ABOUT_TEXT),
            MenuChoice::Help => self.host.show_message(HELP_TITLE, HELP_TEXT),
            MenuChoice::Copy => self.registry.copy_active(),
            MenuChoice::Paste => self.registry.paste_active(),
            MenuChoice::WindowManagerConfig => self.launch_config_tool(),
        }
    }

    fn open_context_menu(&mut self) {
        let menu = ContextMenu::new(self.launcher.all_entries());
        if let Some(choice) = self.host.show_context_menu(&menu) {
            self.activate_menu_choice(choice);
        }
    }

    fn launch_config_tool(&mut self) {
        let argv = [launcher_consts::CONFIG_TOOL.to_string()];
        if let Err(e) = self.spawner.spawn(&argv) {
            tracing::warn!("Failed to start {}: {:#}", launcher_consts::CONFIG_TOOL, e);
        }
    }

    fn launcher_changed(&mut self) {
        self.router.set_mode(if self.launcher.is_visible() {
            RouterMode::LauncherFocused
        } else {
            RouterMode::Normal
        });
        self.host.render_launcher(&self.launcher);
    }

    fn refresh_status(&mut self) {
        let status = StatusLine::new(self.registry.tab_info(), chrono::Local::now());
        self.host.set_status(&status);
    }
}
