mod flow;
mod form;
mod system;

use crate::form::{Field, Step};

use super::context::CommandError;
use super::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in form::definitions()
        .into_iter()
        .chain(flow::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

fn expect_args(args: &[&str], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidArguments(format!("Usage: {usage}")));
    }
    Ok(())
}

fn parse_field(arg: &str) -> Result<Field, CommandError> {
    Ok(arg.parse::<Field>()?)
}

fn parse_step(arg: Option<&&str>, usage: &str) -> Result<Step, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {usage}")))?;
    Ok(arg.parse::<Step>()?)
}
