use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "check",
            "Verify stored totals and report inconsistent records",
            "check",
            cmd_check,
        ),
        CommandEntry::new(
            "backups",
            "List sales backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace the sales file with a backup",
            "restore <backup name>",
            cmd_restore,
        ),
    ]
}

fn cmd_check(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = context.ledger.integrity_warnings()?;
    let count = context.ledger.all()?.len();
    if warnings.is_empty() {
        io::print_success(format!("{count} record(s) checked, no problems found."));
        return Ok(());
    }
    output_section("Integrity warnings");
    for warning in &warnings {
        io::print_warning(warning);
    }
    io::print_info(format!(
        "{count} record(s) checked, {} warning(s).",
        warnings.len()
    ));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.store.list_backups()?;
    output_section("Backups");
    if backups.is_empty() {
        io::print_info("No backups yet. One is taken before every change to the sales file.");
        return Ok(());
    }
    for backup in &backups {
        io::print_info(format!(
            "  {:<40} {}  {:>8} bytes",
            backup.name,
            backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            backup.size_bytes
        ));
    }
    io::print_hint(format!(
        "Keeping the latest {} backup(s).",
        context.store.retention()
    ));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: restore <backup name>".into()))?;

    let question = format!("Replace all current sales with `{name}`?");
    if !context.confirm(&question)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let records = context.store.restore_backup(name)?;
    io::print_success(format!(
        "Restored {} record(s) from {name}.",
        records.len()
    ));
    Ok(())
}
