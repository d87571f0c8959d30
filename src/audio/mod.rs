mod cpal_backend;
pub use self::cpal_backend::CpalBackend;

use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tracing::warn;

pub trait AudioBackend {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Backend that produces no sound. Stands in when no device is wanted,
/// e.g. in tests.
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

enum AudioCommand {
    Start(Sender<Result<()>>),
    Stop(Sender<Result<()>>),
    Shutdown,
}

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the audio backend running on its own thread.
///
/// cpal streams are not `Send`, so the backend lives on a dedicated thread
/// and is driven over a command channel; the handle itself can be shared
/// with the HTTP layer freely.
pub struct AudioHandle {
    commands: Sender<AudioCommand>,
}

impl AudioHandle {
    /// Spawn the audio thread. The factory runs on that thread, so the
    /// backend it builds never has to cross threads.
    pub fn spawn<F>(factory: F) -> Self
    where
        F: FnOnce() -> Box<dyn AudioBackend> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<AudioCommand>();
        thread::Builder::new()
            .name("audio".into())
            .spawn(move || {
                let mut backend = factory();
                for command in rx {
                    match command {
                        AudioCommand::Start(reply) => {
                            let _ = reply.send(backend.start());
                        }
                        AudioCommand::Stop(reply) => {
                            let _ = reply.send(backend.stop());
                        }
                        AudioCommand::Shutdown => break,
                    }
                }
                if let Err(err) = backend.stop() {
                    warn!(%err, "stopping audio backend on shutdown");
                }
            })
            .expect("spawning audio thread");
        Self { commands: tx }
    }

    pub fn start(&self) -> Result<()> {
        self.request(AudioCommand::Start)
    }

    pub fn stop(&self) -> Result<()> {
        self.request(AudioCommand::Stop)
    }

    fn request(&self, make: impl FnOnce(Sender<Result<()>>) -> AudioCommand) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.commands
            .send(make(reply_tx))
            .map_err(|_| anyhow!("audio thread is gone"))?;
        reply_rx
            .recv_timeout(REPLY_TIMEOUT)
            .map_err(|_| anyhow!("audio thread did not respond"))?
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_drives_backend_across_thread() {
        let handle = AudioHandle::spawn(|| Box::new(NullBackend));
        handle.start().unwrap();
        handle.stop().unwrap();
    }

    #[test]
    fn failure_is_propagated() {
        struct Failing;
        impl AudioBackend for Failing {
            fn start(&mut self) -> Result<()> {
                Err(anyhow!("device unavailable"))
            }
            fn stop(&mut self) -> Result<()> {
                Ok(())
            }
        }
        let handle = AudioHandle::spawn(|| Box::new(Failing));
        assert!(handle.start().is_err());
    }
}
