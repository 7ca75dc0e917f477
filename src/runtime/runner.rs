use crate::navigation::NavCommand;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::reducer::Reducer;
use crate::runtime::state::{ExitReason, FormState};
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::renderer::Renderer;
use std::io;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(120);

pub struct Runtime {
    state: FormState,
    terminal: Terminal,
    key_bindings: KeyBindings,
    renderer: Renderer,
}

impl Runtime {
    pub fn new(state: FormState, terminal: Terminal) -> Self {
        Self {
            state,
            terminal,
            key_bindings: KeyBindings::new(),
            renderer: Renderer::default(),
        }
    }

    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    pub fn run(mut self) -> io::Result<ExitReason> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.render()?;
            while !self.state.should_exit() {
                let event = self.terminal.poll_event(POLL_INTERVAL)?;
                self.dispatch(event)?;
            }
            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)?;
        Ok(self
            .state
            .exit_reason()
            .cloned()
            .unwrap_or(ExitReason::Quit))
    }

    fn dispatch(&mut self, event: TerminalEvent) -> io::Result<()> {
        match event {
            TerminalEvent::Resize(size) => {
                self.terminal.set_size(size);
                self.render()
            }
            TerminalEvent::Key(key) => {
                let command = self
                    .key_bindings
                    .resolve(key)
                    .unwrap_or(Command::InputKey(key));
                self.process_command(command)
            }
            TerminalEvent::Tick => self.process_command(Command::Tick),
        }
    }

    fn process_command(&mut self, command: Command) -> io::Result<()> {
        let effects = Reducer::reduce(&mut self.state, command);
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let mut render_requested = false;
        for effect in effects {
            match effect {
                Effect::RequestRender => render_requested = true,
                Effect::Navigate(nav) => self.leave(nav),
            }
        }
        if render_requested {
            self.render()?;
        }
        Ok(())
    }

    /// The terminal host has no screen stack, so any navigation ends the
    /// flow and is reported to the caller.
    fn leave(&mut self, nav: NavCommand) {
        info!(?nav, "leaving personal info flow");
        self.state.request_exit(ExitReason::Left(nav));
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.renderer.render(&self.state);
        self.terminal.render(&frame)
    }
}
