//! Line-oriented front end over [`SyncClipApp`].

use std::io::{self, Write};
use std::sync::Arc;

use sc_app::usecases::{CaptureOutcome, ConnectOrigin, PasteOutcome};
use sc_app::SyncClipApp;
use sc_core::ports::{ClockPort, DialOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::command::{Command, HELP};
use super::render;

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'a, W: Write> {
    app: &'a SyncClipApp,
    clock: Arc<dyn ClockPort>,
    out: W,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(app: &'a SyncClipApp, clock: Arc<dyn ClockPort>, out: W) -> Self {
        Self { app, clock, out }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.prompt()?;
        while let Some(line) = lines.next_line().await? {
            if self.execute(&line).await? == Flow::Quit {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// Parses and runs one input line. Only output errors are returned.
    pub async fn execute(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(command) => {
                debug!(?command, "Running command");
                self.dispatch(command).await
            }
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn prompt(&mut self) -> io::Result<()> {
        if self.app.is_ephemeral_armed() {
            write!(self.out, "syncclip [self-destruct]> ")?;
        } else {
            write!(self.out, "syncclip> ")?;
        }
        self.out.flush()
    }

    async fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        let now_ms = self.clock.now_ms();
        match command {
            Command::Nothing => {}
            Command::Add(text) => {
                let outcome = self.app.add_text(text).await;
                self.report_capture(&outcome)?;
            }
            Command::Ephemeral => {
                if self.app.toggle_ephemeral() {
                    writeln!(self.out, "The next clip will self-destruct.")?;
                } else {
                    writeln!(self.out, "Self-destruct disarmed.")?;
                }
            }
            Command::Paste => match self.app.paste().await {
                PasteOutcome::Captured(outcome) => self.report_capture(&outcome)?,
                // The notifier already reported these.
                PasteOutcome::Empty | PasteOutcome::Unavailable => {}
            },
            Command::List => {
                let clips = self.app.clips().await;
                let selected = self.app.selected().await.map(|clip| clip.id);
                write!(
                    self.out,
                    "{}",
                    render::render_list(&clips, selected.as_ref(), now_ms)
                )?;
            }
            Command::Show(reference) => match self.app.clip(reference.as_deref()).await {
                Ok(clip) => write!(self.out, "{}", render::render_clip(&clip, now_ms))?,
                Err(err) => self.report_error(&err)?,
            },
            Command::Select(reference) => match self.app.select(&reference).await {
                Ok(clip) => writeln!(self.out, "Selected {}", clip.preview(40))?,
                Err(err) => self.report_error(&err)?,
            },
            Command::Unselect => {
                self.app.clear_selection().await;
                writeln!(self.out, "Selection cleared.")?;
            }
            Command::Copy(reference) => {
                if let Err(err) = self.app.copy(reference.as_deref()).await {
                    self.report_error(&err)?;
                }
            }
            Command::Favorite(reference) => {
                match self.app.toggle_favorite(reference.as_deref()).await {
                    Ok((clip, true)) => writeln!(self.out, "Starred {}", clip.preview(40))?,
                    Ok((clip, false)) => writeln!(self.out, "Unstarred {}", clip.preview(40))?,
                    Err(err) => self.report_error(&err)?,
                }
            }
            Command::Delete(reference) => match self.app.delete(reference.as_deref()).await {
                Ok(clip) => writeln!(self.out, "Deleted {}", clip.preview(40))?,
                Err(err) => self.report_error(&err)?,
            },
            Command::Connect(link) => {
                match self.app.connect(&link, ConnectOrigin::User).await {
                    Ok(None | Some(DialOutcome::Dialing)) => {}
                    Ok(Some(DialOutcome::AlreadyConnected)) => {
                        writeln!(self.out, "Already connected to that device.")?
                    }
                    Ok(Some(DialOutcome::SelfDial)) => {
                        writeln!(self.out, "That link points at this device.")?
                    }
                    Err(err) => self.report_error(&err)?,
                }
            }
            Command::Peers => {
                let status = self.app.status().await;
                write!(self.out, "{}", render::render_peers(&status.peers))?;
            }
            Command::Share => {
                let status = self.app.status().await;
                write!(
                    self.out,
                    "{}",
                    render::render_share_links(&status.share_links)
                )?;
            }
            Command::Status => {
                let status = self.app.status().await;
                write!(
                    self.out,
                    "{}",
                    render::render_status(&status, self.app.is_ephemeral_armed())
                )?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn report_capture(&mut self, outcome: &CaptureOutcome) -> io::Result<()> {
        match outcome {
            CaptureOutcome::Added(clip) if clip.is_ephemeral() => writeln!(
                self.out,
                "Added [{}] {} (self-destructs)",
                clip.kind,
                clip.preview(40)
            ),
            CaptureOutcome::Added(clip) => {
                writeln!(self.out, "Added [{}] {}", clip.kind, clip.preview(40))
            }
            CaptureOutcome::Rejected(rejection) => writeln!(self.out, "Not added: {rejection}"),
        }
    }

    fn report_error(&mut self, err: &anyhow::Error) -> io::Result<()> {
        writeln!(self.out, "error: {err:#}")
    }
}
