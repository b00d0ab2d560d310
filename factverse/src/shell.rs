//! The interactive menu loop.
//!
//! The shell is a finite-state loop over [`State`]. Each step reads at most
//! one line and returns the next state; nothing re-enters the loop
//! recursively.

use crate::display::Display;
use crate::input::LineInput;
use crate::menu::{self, Action, MenuChoice, MenuLayout};
use factverse_core::category::CategoryInfo;
use factverse_core::{FactEntry, FactProvider, SessionRecorder};
use std::io;

/// Where the shell is in its menu flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Showing the category menu.
    Idle,
    /// A category was chosen; fetch and show a fact.
    CategorySelected(&'static CategoryInfo),
    /// A fact is on screen; waiting for the next action.
    AwaitingAction(&'static CategoryInfo),
    /// Leave through the exit sequence.
    Exit,
    /// Input closed or Ctrl-C at a prompt.
    Interrupted,
}

/// Startup options for the shell.
#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub animate: bool,
    /// Start with remote generation switched on.
    pub ai_mode: bool,
    /// Show the AI toggle in the menu.
    pub show_toggle: bool,
}

pub struct Shell {
    provider: FactProvider,
    recorder: SessionRecorder,
    input: LineInput,
    display: Display,
    layout: MenuLayout,
    ai_mode: bool,
}

impl Shell {
    pub fn new(
        provider: FactProvider,
        recorder: SessionRecorder,
        input: LineInput,
        options: ShellOptions,
    ) -> Self {
        let ai_mode = options.ai_mode && provider.has_remote();
        let layout = MenuLayout::new(options.show_toggle && provider.has_remote());
        Self {
            provider,
            recorder,
            input,
            display: Display::new(options.animate),
            layout,
            ai_mode,
        }
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn provider(&self) -> &FactProvider {
        &self.provider
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        self.display.banner(self.ai_mode).await?;

        let mut state = State::Idle;
        loop {
            tracing::debug!(?state, "shell step");
            state = match state {
                State::Idle => self.idle().await?,
                State::CategorySelected(info) => self.show_fact(info).await?,
                State::AwaitingAction(info) => self.await_action(info).await?,
                State::Exit => {
                    let saved = tokio::fs::try_exists(self.recorder.path())
                        .await
                        .unwrap_or(false);
                    self.display
                        .exit_sequence(saved.then(|| self.recorder.path()))
                        .await?;
                    return Ok(());
                }
                State::Interrupted => {
                    self.display.interrupted();
                    return Ok(());
                }
            };
        }
    }

    async fn idle(&mut self) -> io::Result<State> {
        self.display.menu(self.layout, self.ai_mode);
        let Some(line) = self.read_line("📥 Enter your command code: ").await? else {
            return Ok(State::Interrupted);
        };

        Ok(match self.layout.parse(&line) {
            MenuChoice::Category(info) => {
                self.display.clear()?;
                State::CategorySelected(info)
            }
            MenuChoice::ToggleAi => {
                self.ai_mode = !self.ai_mode;
                tracing::info!(ai_mode = self.ai_mode, "toggled AI mode");
                self.display.ai_toggled(self.ai_mode).await;
                self.display.clear()?;
                self.display.banner(self.ai_mode).await?;
                State::Idle
            }
            MenuChoice::Exit => State::Exit,
            MenuChoice::Invalid => {
                self.display.error(&format!(
                    "Invalid command code! Please select 1-{}.",
                    self.layout.exit_key()
                ));
                println!();
                State::Idle
            }
        })
    }

    async fn show_fact(&mut self, info: &'static CategoryInfo) -> io::Result<State> {
        self.display.fact_header(info.label, self.ai_mode).await?;

        let entry = self
            .provider
            .get_fact_until(info.key, self.ai_mode, ctrl_c())
            .await;
        self.display.fact(&entry).await?;
        self.display.actions();

        let question = format!(
            "💾 Save this fact to `{}`? [Y/n]: ",
            self.recorder.path().display()
        );
        let Some(answer) = self.read_line(&question).await? else {
            return Ok(State::Interrupted);
        };
        if menu::parse_save_answer(&answer) {
            self.save(&entry).await;
        }
        println!();

        Ok(State::AwaitingAction(info))
    }

    async fn await_action(&mut self, info: &'static CategoryInfo) -> io::Result<State> {
        let Some(line) = self.read_line("📥 Enter your choice: ").await? else {
            return Ok(State::Interrupted);
        };

        Ok(match menu::parse_action(&line) {
            Action::Another => {
                self.display.clear()?;
                State::CategorySelected(info)
            }
            Action::ChangeCategory => {
                self.display.clear()?;
                self.display.banner(self.ai_mode).await?;
                State::Idle
            }
            Action::Exit => State::Exit,
            Action::Invalid => {
                self.display
                    .error("Invalid choice! Please select 1, 2, or 3.");
                State::AwaitingAction(info)
            }
        })
    }

    async fn save(&mut self, entry: &FactEntry) {
        match self.recorder.record_entry(entry).await {
            Ok(()) => self.display.success("Fact saved successfully!"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save fact");
                self.display.error(&format!("Error saving fact: {e}"));
            }
        }
    }

    /// Prompt and read one line. `None` means input closed or Ctrl-C.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.display.prompt(prompt)?;
        tokio::select! {
            line = self.input.next_line() => match line {
                Some(Ok(line)) => Ok(Some(line)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            },
            _ = ctrl_c() => Ok(None),
        }
    }
}

/// Completes on Ctrl-C. Never completes if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
