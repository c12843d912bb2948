//! Inspection, configuration and shell commands.

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::utils::build_info;
use crate::validation::StepValidator;

use super::parse_step;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("status", "Show the current step", "status", cmd_status),
        CommandEntry::new("review", "Show the review summary", "review", cmd_review),
        CommandEntry::new("errors", "List the current field errors", "errors", cmd_errors),
        CommandEntry::new(
            "check",
            "Preview a step's validation without changing anything",
            "check [1-3]",
            cmd_check,
        ),
        CommandEntry::new(
            "config",
            "Show or change settings",
            "config [show | set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::lines(render::page(&context.workflow));
    Ok(())
}

fn cmd_review(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let items = crate::review::build_review(context.workflow.form());
    output::section("Review");
    output::lines([render::review_table(&items)]);
    Ok(())
}

fn cmd_errors(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let errors = context.workflow.errors();
    if errors.is_empty() {
        output::info("No field errors.");
        return Ok(());
    }
    for (field, message) in errors.iter() {
        output::error(format!("{}: {message}", field.label()));
    }
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step = match args.first() {
        Some(_) => parse_step(args.first(), "check [1-3]")?,
        None => context.workflow.step(),
    };
    let workflow = &context.workflow;
    let report = StepValidator::new(workflow.form(), workflow.payment()).report(step);
    if report.passed {
        output::success(format!("{step} passes validation."));
    } else {
        output::warning(format!("{step} has problems:"));
        for (field, message) in report.errors.iter() {
            output::error(format!("{}: {message}", field.label()));
        }
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            output::info(format!("  file: {}", context.config_manager.path().display()));
            for (key, value) in context.workflow.config().entries() {
                output::info(format!("  {key:<22} {value}"));
            }
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut config = context.config_manager.load()?;
            config.set(key, &value.join(" "))?;
            context.config_manager.save(&config)?;
            output::success(format!("Saved `{key}`."));
            output::hint("New settings apply the next time the wizard starts.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "Usage: config [show | set <key> <value>]".into(),
        )),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Passport Wizard {}", meta.version));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::info(format!("  Description: {}", entry.description));
                output::info(format!("  Usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Available commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    output::info("Field names: use the keys shown in `status`, e.g. firstName or payMethod.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
