//! Shell state, dispatch and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::config::ConfigManager;
use crate::errors::WizardError;
use crate::workflow::{Command, Outcome, Workflow};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) workflow: Workflow,
    pub(crate) config_manager: ConfigManager,
    pub(crate) theme: ColorfulTheme,
    runtime: Runtime,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        debug!(path = %config_manager.path().display(), "configuration loaded");

        // One worker is plenty for the verification timer.
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("passport-wizard-verifier")
            .enable_time()
            .build()?;

        Ok(Self {
            mode,
            registry,
            workflow: Workflow::new(config),
            config_manager,
            theme: ColorfulTheme::default(),
            runtime,
            running: true,
        })
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        if self.workflow.is_locked() {
            "passport[submitted]> ".to_string()
        } else {
            format!("passport[{}/4]> ", self.workflow.step().number())
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Sends one command to the workflow inside the verifier runtime, then
    /// prints any alerts it raised and explains non-applied outcomes.
    pub(crate) fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let result = {
            let _guard = self.runtime.enter();
            self.workflow.dispatch(command)
        };
        self.flush_alerts();
        let outcome = result?;

        match outcome {
            Outcome::Applied => {}
            Outcome::Rejected => {
                for (field, message) in self.workflow.snapshot().errors {
                    output::error(format!("{}: {message}", field.label()));
                }
            }
            Outcome::Ignored if self.workflow.is_locked() => {
                output::warning("The application has been submitted; editing is disabled.");
            }
            Outcome::Ignored => output::info("Nothing changed."),
            Outcome::Disabled(control) => {
                output::warning(format!("{control} is not available right now."));
            }
        }
        Ok(outcome)
    }

    /// Applies finished verifications; called before every prompt.
    pub(crate) fn poll_background(&mut self) {
        if self.workflow.poll_events() > 0 {
            output::success(self.workflow.payment().message());
        }
    }

    /// Blocks until the in-flight verification settles.
    pub(crate) fn wait_for_verification(&mut self) -> bool {
        let workflow = &mut self.workflow;
        self.runtime.block_on(workflow.wait_for_verification())
    }

    fn flush_alerts(&mut self) {
        for message in self.workflow.take_alerts() {
            output::alert(message);
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Field, Step};
    use crate::payment::PaymentState;
    use tempfile::{tempdir, TempDir};

    fn context() -> (ShellContext, TempDir) {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{ "verification_delay_ms": 5 }"#,
        )
        .unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let context = ShellContext::with_config_manager(CliMode::Script, manager).unwrap();
        (context, dir)
    }

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            context.process_line(line).unwrap();
        }
    }

    #[test]
    fn prompt_tracks_step() {
        let (context, _dir) = context();
        assert_eq!(context.prompt(), "passport[1/4]> ");
    }

    #[test]
    fn unknown_command_is_not_fatal() {
        let (mut context, _dir) = context();
        assert_eq!(
            context.process_line("nxet").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn bad_arguments_surface_as_errors() {
        let (mut context, _dir) = context();
        assert!(matches!(
            context.process_line("set nickname Bob"),
            Err(CommandError::Wizard(WizardError::UnknownField(_)))
        ));
        assert!(matches!(
            context.process_line("goto"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn full_session_reaches_submission() {
        let (mut context, _dir) = context();
        run(
            &mut context,
            &[
                "set firstName Ankit",
                "set lastName Sharma",
                "pick dob 1994-05-17",
                "select gender Male",
                "set nationality Indian",
                "set nid 123456789012",
                "select passportType Ordinary",
                "set address '12 MG Road'",
                "set city Pune",
                "set state Maharashtra",
                "set pincode 400001",
                "set mobile 9876543210",
                "set email ankit@example.in",
                "next",
                "attach photo photo.jpg",
                "attach idProof aadhaar.pdf",
                "attach addressProof bill.pdf",
                "attach birthCert birth.pdf",
                "next",
                "select payMethod card",
                "set cardName 'Ankit Sharma'",
                "set cardNumber '4111 1111 1111 1234'",
                "pick expiry 2029-07",
                "set cvv 123",
                "pay",
                "verify",
                "wait",
            ],
        );
        assert_eq!(context.workflow().payment().state(), PaymentState::Paid);
        assert_eq!(
            context.workflow().form().value(Field::CardNumber),
            "4111111111111234"
        );

        run(&mut context, &["confirm on", "next", "yes"]);
        assert_eq!(context.workflow().step(), Step::Confirmation);
        assert!(context.workflow().is_locked());
        assert_eq!(context.prompt(), "passport[submitted]> ");
    }
}
