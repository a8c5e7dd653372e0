//! Terminal session core.
//!
//! The fixed bank of sessions, the shared font size and the PTY-backed terminal
//! collaborator. Nothing in here renders; the host draws whatever the backend hands it.

mod backend;
mod pty_backend;
mod pty_handler;
mod registry;
mod shell;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backend::{FontDescriptor, SessionHandle, TerminalBackend};
pub use pty_backend::PtyBackend;
pub use pty_handler::PtyHandler;
pub use registry::{Session, SessionRegistry, TabInfo};
pub use shell::{resolve_shell, resolve_shell_from};
