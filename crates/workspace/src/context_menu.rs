//! The popup menu opened by `p` or a secondary click.

use launcher::DesktopEntry;

pub const ABOUT_TITLE: &str = "About ALinuxD";
pub const ABOUT_TEXT: &str = "This is a retro-style Desktop Environment\n\
created for nostalgia feeling.\n\n\
ATermD is the desktop for this DE.";

pub const HELP_TITLE: &str = "ATermD Controls";
pub const HELP_TEXT: &str = "ALT+1..0 - Switch tabs\n\
ALT+D - Open launcher\n\
ALT+H - Hide/show window\n\
ALT+L - Clear terminal\n\
CTRL++/- - Change font size\n\
Super/Win - Open obconf\n\
P or right click - Context menu";

/// What activating a menu item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    LaunchApp(DesktopEntry),
    About,
    Help,
    Copy,
    Paste,
    WindowManagerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Entry { label: String, choice: MenuChoice },
    Submenu { label: String, items: Vec<MenuItem> },
}

impl MenuItem {
    fn entry(label: impl Into<String>, choice: MenuChoice) -> Self {
        MenuItem::Entry {
            label: label.into(),
            choice,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuItem::Entry { label, .. } | MenuItem::Submenu { label, .. } => label,
        }
    }
}

/// A fully built menu, rebuilt every time it opens so the Apps list is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    pub fn new(apps: Vec<DesktopEntry>) -> Self {
        let apps = apps
            .into_iter()
            .map(|entry| MenuItem::entry(entry.name.clone(), MenuChoice::LaunchApp(entry)))
            .collect();

        Self {
            items: vec![
                MenuItem::Submenu {
                    label: "Apps".into(),
                    items: apps,
                },
                MenuItem::entry("About", MenuChoice::About),
                MenuItem::entry("Help", MenuChoice::Help),
                MenuItem::entry("Copy", MenuChoice::Copy),
                MenuItem::entry("Paste", MenuChoice::Paste),
                MenuItem::entry("Window Manager Config", MenuChoice::WindowManagerConfig),
            ],
        }
    }

    /// Every activatable choice, depth first.
    pub fn choices(&self) -> Vec<&MenuChoice> {
        fn walk<'a>(items: &'a [MenuItem], out: &mut Vec<&'a MenuChoice>) {
            for item in items {
                match item {
                    MenuItem::Entry { choice, .. } => out.push(choice),
                    MenuItem::Submenu { items, .. } => walk(items, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }
}
