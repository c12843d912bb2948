//! Navigation, payment and confirmation commands.

use crate::cli::context::{CliMode, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::form::Step;
use crate::workflow::{Command, Outcome};

use super::parse_step;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("next", "Validate this step and continue", "next", cmd_next),
        CommandEntry::new("prev", "Go back one step", "prev", cmd_prev),
        CommandEntry::new(
            "goto",
            "Jump to a step from the stepper",
            "goto <1-4>",
            cmd_goto,
        ),
        CommandEntry::new("pay", "Generate the payment request", "pay", cmd_pay),
        CommandEntry::new("verify", "Verify the pending payment", "verify", cmd_verify),
        CommandEntry::new(
            "wait",
            "Block until payment verification finishes",
            "wait",
            cmd_wait,
        ),
        CommandEntry::new("yes", "Confirm and submit the application", "yes", cmd_yes),
        CommandEntry::new("no", "Decline and choose a step to edit", "no", cmd_no),
        CommandEntry::new("edit", "Edit a step after answering no", "edit <1-3>", cmd_edit),
    ]
}

fn show_page_if_applied(context: &ShellContext, outcome: Outcome) {
    if outcome == Outcome::Applied {
        output::lines(render::page(&context.workflow));
    }
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.apply(Command::Next)?;
    show_page_if_applied(context, outcome);
    Ok(())
}

fn cmd_prev(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.apply(Command::Prev)?;
    show_page_if_applied(context, outcome);
    Ok(())
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step = parse_step(args.first(), "goto <1-4>")?;
    let outcome = context.apply(Command::GoTo(step))?;
    show_page_if_applied(context, outcome);
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.apply(Command::GeneratePayment)? == Outcome::Applied {
        output::success(context.workflow.payment().message());
        output::hint("Run `verify` to complete the payment.");
    }
    Ok(())
}

fn cmd_verify(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.apply(Command::VerifyPayment)? == Outcome::Applied {
        output::info(context.workflow.payment().message());
        if context.mode == CliMode::Script {
            output::hint("Run `wait` to block until verification completes.");
        }
    }
    Ok(())
}

fn cmd_wait(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wait_for_verification() {
        output::success(context.workflow.payment().message());
    } else {
        output::info("No payment verification in progress.");
    }
    Ok(())
}

fn cmd_yes(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ready = context.workflow.step() == Step::Confirmation && !context.workflow.is_locked();
    if ready && !context.confirm("Submit the application? Editing will be disabled afterwards.")? {
        output::info("Submission cancelled.");
        return Ok(());
    }
    if context.apply(Command::ConfirmYes)? == Outcome::Applied {
        output::lines(render::page(&context.workflow));
    }
    Ok(())
}

fn cmd_no(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.apply(Command::ConfirmNo)? == Outcome::Applied {
        output::info(context.workflow.snapshot().confirm_note);
        output::hint("Use `edit 1`, `edit 2` or `edit 3` to choose a step.");
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let step = parse_step(args.first(), "edit <1-3>")?;
    let outcome = context.apply(Command::Edit(step))?;
    show_page_if_applied(context, outcome);
    Ok(())
}
