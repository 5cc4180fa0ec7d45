use canteen_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show | get <key> | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show_config(context),
        [action] if action.eq_ignore_ascii_case("show") => show_config(context),
        [action, key] if action.eq_ignore_ascii_case("get") => {
            io::print_info(format!("{key} = {}", context.config.get(key)?));
            Ok(())
        }
        [action, key, value @ ..] if action.eq_ignore_ascii_case("set") => {
            let value = value.join(" ");
            context.config.set(key, &value)?;
            context.persist_config()?;
            io::print_success(format!("{key} = {}", context.config.get(key)?));
            if *key == "data_dir" || *key == "backup_retention" {
                io::print_hint("Restart the shell to apply storage changes.");
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show | get <key> | set <key> <value>]".into(),
        )),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in Config::KEYS {
        let value = context.config.get(key)?;
        let shown = if value.is_empty() { "(default)" } else { value.as_str() };
        io::print_info(format!("  {key:<18} {shown}"));
    }
    io::print_hint(format!(
        "Stored in {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}
