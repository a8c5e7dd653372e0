//! Fire-and-forget process spawning.

use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

/// Starts external programs without waiting for them.
///
/// `argv[0]` is looked up on `PATH`. Implementations never block on the child and never
/// report its exit status.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
pub trait ProcessSpawner {
    fn spawn(&self, argv: &[String]) -> Result<()>;
}

/// Spawns real processes with `std::process::Command`.
///
/// Each child is reaped on a detached thread. Nothing else about it is tracked.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSpawner;

impl ProcessSpawner for NativeSpawner {
    fn spawn(&self, argv: &[String]) -> Result<()> {
        let Some((program, args)) = argv.split_first() else {
            bail!("Refusing to spawn an empty command");
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {:?}", program))?;

        tracing::info!("Spawned {:?} (pid {})", program, child.id());

        let program = program.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) => tracing::debug!("{:?} exited: {}", program, status),
            Err(e) => tracing::debug!("Wait for {:?}: {}", program, e),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn spawns_program_from_path() {
        assert!(NativeSpawner.spawn(&argv(&["true"])).is_ok());
    }

    #[test]
    fn missing_program_is_an_error() {
        let result = NativeSpawner.spawn(&argv(&["atermd-definitely-not-installed"]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_argv_is_an_error() {
        assert!(NativeSpawner.spawn(&[]).is_err());
    }

    #[test]
    fn mock_records_argv() {
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn()
            .withf(|argv: &[String]| argv.len() == 1 && argv[0] == "obconf")
            .times(1)
            .returning(|_| Ok(()));

        spawner.spawn(&argv(&["obconf"])).unwrap();
    }
}
