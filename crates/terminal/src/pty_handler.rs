//! PTY process management.

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// One shell running behind a pseudo-terminal.
///
/// A reader thread moves output bytes into a channel; the owner drains it with
/// [`read_output`](Self::read_output). Dropping the handler kills and reaps the shell.
pub struct PtyHandler {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    output_rx: Receiver<Vec<u8>>,
    exited: Arc<AtomicBool>,
    child: Box<dyn Child + Send + Sync>,
    _reader_thread: thread::JoinHandle<()>,
}

impl PtyHandler {
    /// Spawn `shell` in a new PTY of `rows` x `cols`.
    pub fn spawn(shell: &Path, rows: u16, cols: u16) -> Result<Self> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(shell);
        cmd.env("TERM", "xterm-256color");
        if let Some(home) = std::env::var_os("HOME") {
            cmd.cwd(home);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn {:?}", shell))?;
        // Only the child may hold the slave side, or the reader never sees EOF.
        let master = pair.master;
        drop(pair.slave);

        let writer = master
            .take_writer()
            .context("Failed to get PTY writer")?;

        let mut reader = master
            .try_clone_reader()
            .context("Failed to get PTY reader")?;

        let (output_tx, output_rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = mpsc::channel();

        let exited = Arc::new(AtomicBool::new(false));
        let exited_clone = exited.clone();

        let reader_thread = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => {
                        exited_clone.store(true, Ordering::SeqCst);
                        break;
                    }
                    Ok(n) => {
                        if output_tx.send(buf[..n].to_vec()).is_err() {
                            break; // Channel closed
                        }
                    }
                }
            }
        });

        Ok(Self {
            master,
            writer,
            output_rx,
            exited,
            child,
            _reader_thread: reader_thread,
        })
    }

    /// Write input bytes to the PTY.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Pending output, without blocking.
    pub fn read_output(&self) -> Vec<u8> {
        let mut output = Vec::new();
        while let Ok(data) = self.output_rx.try_recv() {
            output.extend_from_slice(&data);
        }
        output
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to resize PTY")?;
        Ok(())
    }
}

impl Drop for PtyHandler {
    fn drop(&mut self) {
        self.exited.store(true, Ordering::SeqCst);

        // ESRCH is expected if the shell already exited
        if let Err(e) = self.child.kill() {
            tracing::debug!("Kill child process: {}", e);
        }
        if let Err(e) = self.child.wait() {
            tracing::debug!("Wait for child process: {}", e);
        }

        tracing::debug!("PTY handler dropped, child process cleaned up");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn read_until(pty: &PtyHandler, needle: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            seen.extend(pty.read_output());
            if String::from_utf8_lossy(&seen).contains(needle) {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        String::from_utf8_lossy(&seen).into_owned()
    }

    #[test]
    fn echoes_through_shell() {
        let mut pty = PtyHandler::spawn(Path::new("/bin/sh"), 24, 80).unwrap();
        pty.write(b"echo pty-$((40 + 2))\n").unwrap();
        assert!(read_until(&pty, "pty-42").contains("pty-42"));
    }

    #[test]
    fn missing_shell_fails_to_spawn() {
        let result = PtyHandler::spawn(Path::new("/nonexistent/shell"), 24, 80);
        assert!(result.is_err());
    }

    #[test]
    fn exit_is_detected() {
        let mut pty = PtyHandler::spawn(Path::new("/bin/sh"), 24, 80).unwrap();
        pty.write(b"exit\n").unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pty.has_exited() && Instant::now() < deadline {
            let _ = pty.read_output();
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(pty.has_exited());
    }

    #[test]
    fn resize_succeeds() {
        let pty = PtyHandler::spawn(Path::new("/bin/sh"), 24, 80).unwrap();
        assert!(pty.resize(40, 120).is_ok());
    }
}
