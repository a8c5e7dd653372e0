//! Login shell resolution.

use settings::constants::shell;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// `$SHELL` if executable, else `/bin/bash` if executable, else `/bin/sh`.
pub fn resolve_shell() -> PathBuf {
    let env_shell = std::env::var_os(shell::ENV_VAR);
    let resolved = resolve_shell_from(env_shell.as_deref());
    tracing::info!("Using shell {:?}", resolved);
    resolved
}

/// Resolution with the `$SHELL` value passed in.
pub fn resolve_shell_from(env_shell: Option<&OsStr>) -> PathBuf {
    if let Some(candidate) = env_shell.filter(|s| !s.is_empty()).map(Path::new) {
        if is_executable(candidate) {
            return candidate.to_path_buf();
        }
        tracing::debug!("$SHELL {:?} is not executable", candidate);
    }

    let primary = Path::new(shell::PRIMARY_FALLBACK);
    if is_executable(primary) {
        return primary.to_path_buf();
    }
    PathBuf::from(shell::SECONDARY_FALLBACK)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::os::unix::fs::PermissionsExt;

    fn fallback() -> PathBuf {
        if is_executable(Path::new("/bin/bash")) {
            PathBuf::from("/bin/bash")
        } else {
            PathBuf::from("/bin/sh")
        }
    }

    fn script(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn executable_env_shell_wins() {
        let dir = tempfile::tempdir().unwrap();
        let shell = script(dir.path(), "myshell", 0o755);
        assert_eq!(resolve_shell_from(Some(shell.as_os_str())), shell);
    }

    #[test]
    fn non_executable_env_shell_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let shell = script(dir.path(), "plain", 0o644);
        assert_eq!(resolve_shell_from(Some(shell.as_os_str())), fallback());
    }

    #[test]
    fn missing_env_shell_falls_back() {
        assert_eq!(
            resolve_shell_from(Some(OsStr::new("/nonexistent/zsh"))),
            fallback()
        );
        assert_eq!(resolve_shell_from(Some(OsStr::new(""))), fallback());
        assert_eq!(resolve_shell_from(None), fallback());
    }

    #[test]
    fn directory_is_not_a_shell() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_shell_from(Some(dir.path().as_os_str())), fallback());
    }

    #[test]
    #[serial]
    fn resolve_shell_reads_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(dir.path(), "envshell", 0o700);
        let previous = std::env::var_os(shell::ENV_VAR);

        std::env::set_var(shell::ENV_VAR, &path);
        let resolved = resolve_shell();
        match previous {
            Some(value) => std::env::set_var(shell::ENV_VAR, value),
            None => std::env::remove_var(shell::ENV_VAR),
        }

        assert_eq!(resolved, path);
    }
}
