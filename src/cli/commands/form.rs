//! Commands that edit form values.

use crossterm::event::{KeyCode, ModifierKeyCode};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::form::FieldKind;
use crate::workflow::{Command, Outcome};

use super::{expect_args, parse_field};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "set",
            "Type a value into a text field",
            "set <field> <value...>",
            cmd_set,
        ),
        CommandEntry::new(
            "key",
            "Press a single key while a field has focus",
            "key <field> <key>",
            cmd_key,
        ),
        CommandEntry::new(
            "pick",
            "Choose a date (YYYY-MM-DD) or month (YYYY-MM); omit value to clear",
            "pick <field> [value]",
            cmd_pick,
        ),
        CommandEntry::new(
            "select",
            "Choose a radio or dropdown option",
            "select <field> <option>",
            cmd_select,
        ),
        CommandEntry::new(
            "attach",
            "Choose files for an upload slot; no files clears it",
            "attach <field> [file...]",
            cmd_attach,
        ),
        CommandEntry::new(
            "confirm",
            "Tick or untick the confirmation checkbox",
            "confirm <on|off>",
            cmd_confirm,
        ),
    ]
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "set <field> <value...>";
    expect_args(args, 1, USAGE)?;
    let field = parse_field(args[0])?;
    let raw = args[1..].join(" ");

    let outcome = context.apply(Command::Input { field, raw })?;
    if outcome == Outcome::Applied {
        let value = context.workflow.form().value(field).to_string();
        match context.workflow.errors().get(field) {
            Some(message) => output::warning(format!("{}: {message} Kept `{value}`.", field.label())),
            None => output::success(format!("{} = {value}", field.label())),
        }
    } else if matches!(field.kind(), FieldKind::Date(_)) && !context.workflow.is_locked() {
        output::hint(format!("Use `pick {} <value>` for this field.", field.key()));
    }
    Ok(())
}

fn cmd_key(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "key <field> <key>";
    expect_args(args, 2, USAGE)?;
    let field = parse_field(args[0])?;
    let key = parse_key(args[1]).ok_or_else(|| {
        CommandError::InvalidArguments(format!("Unknown key `{}`.", args[1]))
    })?;

    if context.apply(Command::Key { field, key })? == Outcome::Applied {
        output::info(format!("{} accepted the key.", field.label()));
    }
    Ok(())
}

/// Names understood by `key`: a single character or a navigation key name.
fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(ch));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "esc" | "escape" => KeyCode::Esc,
        "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        _ => return None,
    };
    Some(code)
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "pick <field> [value]";
    expect_args(args, 1, USAGE)?;
    let field = parse_field(args[0])?;
    let value = args.get(1).copied().unwrap_or_default().to_string();

    if context.apply(Command::Pick { field, value })? == Outcome::Applied {
        let stored = context.workflow.form().value(field);
        if stored.is_empty() {
            output::success(format!("{} cleared.", field.label()));
        } else {
            output::success(format!("{} = {stored}", field.label()));
        }
    }
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "select <field> <option>";
    expect_args(args, 2, USAGE)?;
    let field = parse_field(args[0])?;
    let value = args[1..].join(" ");

    if context.apply(Command::Select { field, value })? == Outcome::Applied {
        output::success(format!(
            "{} = {}",
            field.label(),
            context.workflow.form().value(field)
        ));
    }
    Ok(())
}

fn cmd_attach(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "attach <field> [file...]";
    expect_args(args, 1, USAGE)?;
    let field = parse_field(args[0])?;
    let files = args[1..].iter().map(|name| name.to_string()).collect();

    if context.apply(Command::Attach { field, files })? == Outcome::Applied {
        let attached = context.workflow.form().files(field);
        if attached.is_empty() {
            output::success(format!("{} cleared.", field.label()));
        } else {
            output::success(format!("{}: {}", field.label(), attached.join(", ")));
        }
    }
    Ok(())
}

fn cmd_confirm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "confirm <on|off>";
    expect_args(args, 1, USAGE)?;
    let checked = match args[0].to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => true,
        "off" | "no" | "false" | "0" => false,
        _ => return Err(CommandError::InvalidArguments(format!("Usage: {USAGE}"))),
    };

    if context.apply(Command::SetConfirm(checked))? == Outcome::Applied {
        let state = if checked { "ticked" } else { "cleared" };
        output::success(format!("Confirmation {state}."));
    }
    Ok(())
}
