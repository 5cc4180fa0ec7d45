use canteen_core::validation;
use canteen_domain::{DayKey, MonthKey, SaleDraft, SalePatch, SaleRecord};

use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "day",
            "Show or select the working day",
            "day [YYYY-MM-DD|today|prev|next]",
            cmd_day,
        ),
        CommandEntry::new(
            "month",
            "Show or select the report month",
            "month [YYYY-MM|current|prev|next]",
            cmd_month,
        ),
        CommandEntry::new(
            "add",
            "Record a sale on the selected day",
            "add <item> [price] [quantity]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change the item, price or quantity of a sale",
            "edit <#n|id> [item=<text>] [price=<amount>] [qty=<n>]",
            cmd_edit,
        ),
        CommandEntry::new(
            "remove",
            "Delete a sale",
            "remove <#n|id>",
            cmd_remove,
        )
        .with_aliases(&["rm"]),
        CommandEntry::new(
            "list",
            "List sales of the selected day or month",
            "list [day|month|YYYY-MM-DD|YYYY-MM]",
            cmd_list,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "total",
            "Show the total of the selected day or month",
            "total [day|month]",
            cmd_total,
        ),
    ]
}

fn cmd_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(arg) = args.first() {
        let current = context.selected_day.date();
        let day = match arg.to_lowercase().as_str() {
            "today" => context.ledger.today(),
            "prev" => current.pred_opt().map(DayKey::new).unwrap_or(context.selected_day),
            "next" => current.succ_opt().map(DayKey::new).unwrap_or(context.selected_day),
            _ => validation::parse_day(arg)?,
        };
        context.select_day(day);
    }

    let summary = context.ledger.day_summary(context.selected_day)?;
    io::print_info(format!(
        "Selected day: {} | {} sale(s), {} unit(s), {}",
        context.display_day(summary.day),
        summary.sale_count,
        summary.units_sold,
        context.money(summary.total)
    ));
    if context.selected_day > context.ledger.today() {
        io::print_warning("The selected day is in the future; new sales will be rejected.");
    }
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(arg) = args.first() {
        context.selected_month = match arg.to_lowercase().as_str() {
            "current" => context.ledger.today().month(),
            "prev" => context.selected_month.previous(),
            "next" => context.selected_month.next(),
            _ => validation::parse_month(arg)?,
        };
    }

    let summary = context.ledger.month_summary(context.selected_month)?;
    io::print_info(format!(
        "Selected month: {} | {} sale(s), {} unit(s), {}",
        summary.month,
        summary.sale_count,
        summary.units_sold,
        context.money(summary.total)
    ));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.can_prompt() {
        prompt_draft(context)?
    } else {
        draft_from_args(context, args)?
    };

    let record = context.ledger.append(context.selected_day, draft)?;
    io::print_success(format!(
        "Recorded {} on {} [{}]",
        describe(context, &record),
        record.date(),
        short_id(record.id())
    ));
    let total = context.ledger.daily_total(context.selected_day)?;
    io::print_info(format!("Day total: {}", context.money(total)));
    Ok(())
}

fn draft_from_args(context: &ShellContext, args: &[&str]) -> Result<SaleDraft, CommandError> {
    let (item, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: add <item> [price] [quantity]".into()))?;
    if rest.len() > 2 {
        return Err(CommandError::InvalidArguments(
            "too many arguments; quote item names that contain spaces".into(),
        ));
    }
    let unit_price = match rest.first() {
        Some(raw) => validation::parse_price(raw)?,
        None => context
            .catalog
            .find_by_name(item)?
            .map(|product| product.default_price)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "price required: no active product named `{item}`"
                ))
            })?,
    };
    let quantity = match rest.get(1) {
        Some(raw) => validation::parse_quantity(raw)?,
        None => 1,
    };
    Ok(SaleDraft::new(*item, unit_price).with_quantity(quantity))
}

fn prompt_draft(context: &ShellContext) -> Result<SaleDraft, CommandError> {
    let item = io::prompt_text(&context.theme, "Item", None)?;
    let suggested = context
        .catalog
        .find_by_name(&item)?
        .map(|product| product.default_price.to_string());
    let price = io::prompt_text(&context.theme, "Unit price", suggested)?;
    let quantity = io::prompt_text(&context.theme, "Quantity", Some("1".into()))?;
    Ok(SaleDraft::new(item, validation::parse_price(&price)?)
        .with_quantity(validation::parse_quantity(&quantity)?))
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (reference, fields) = args.split_first().ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: edit <#n|id> [item=<text>] [price=<amount>] [qty=<n>]".into(),
        )
    })?;
    let current = context.resolve_sale(reference)?;

    let patch = if fields.is_empty() && context.can_prompt() {
        prompt_patch(context, &current)?
    } else {
        patch_from_fields(fields)?
    };

    let updated = context.ledger.update(current.id(), patch)?;
    io::print_success(format!(
        "Updated [{}]: {}",
        short_id(updated.id()),
        describe(context, &updated)
    ));
    Ok(())
}

fn patch_from_fields(fields: &[&str]) -> Result<SalePatch, CommandError> {
    let mut patch = SalePatch::default();
    for field in fields {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{field}`"))
        })?;
        patch = match key.to_lowercase().as_str() {
            "item" => patch.item(value),
            "price" | "unit_price" => patch.unit_price(validation::parse_price(value)?),
            "qty" | "quantity" => patch.quantity(validation::parse_quantity(value)?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}` (use item, price or qty)"
                )))
            }
        };
    }
    Ok(patch)
}

fn prompt_patch(context: &ShellContext, current: &SaleRecord) -> Result<SalePatch, CommandError> {
    let item = io::prompt_text(&context.theme, "Item", Some(current.item().to_string()))?;
    let price = io::prompt_text(
        &context.theme,
        "Unit price",
        Some(current.unit_price().to_string()),
    )?;
    let quantity = io::prompt_text(
        &context.theme,
        "Quantity",
        Some(current.quantity().to_string()),
    )?;

    let mut patch = SalePatch::default();
    if item.trim() != current.item() {
        patch = patch.item(item);
    }
    let price = validation::parse_price(&price)?;
    if price != current.unit_price() {
        patch = patch.unit_price(price);
    }
    let quantity = validation::parse_quantity(&quantity)?;
    if quantity != current.quantity() {
        patch = patch.quantity(quantity);
    }
    Ok(patch)
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: remove <#n|id>".into()))?;
    let record = context.resolve_sale(reference)?;

    let question = format!("Delete {} from {}?", describe(context, &record), record.date());
    if !context.confirm(&question)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let removed = context.ledger.delete(record.id())?;
    io::print_success(format!(
        "Removed [{}] {}",
        short_id(removed.id()),
        removed.item()
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()) {
        None => list_day(context, context.selected_day),
        Some(arg) if arg == "day" => list_day(context, context.selected_day),
        Some(arg) if arg == "month" => list_month(context, context.selected_month),
        Some(arg) => {
            if let Ok(month) = arg.parse::<MonthKey>() {
                list_month(context, month)
            } else {
                list_day(context, validation::parse_day(&arg)?)
            }
        }
    }
}

fn list_day(context: &ShellContext, day: DayKey) -> CommandResult {
    let records = context.ledger.query_by_day(day)?;
    output_section(format!("Sales of {}", context.display_day(day)));
    if records.is_empty() {
        io::print_info("No sales recorded.");
        return Ok(());
    }
    for (index, record) in records.iter().enumerate() {
        io::print_info(format!("  #{:<3} {}", index + 1, row(context, record)));
    }
    let total = context.ledger.daily_total(day)?;
    io::print_info(format!("Total: {}", context.money(total)));
    Ok(())
}

fn list_month(context: &ShellContext, month: MonthKey) -> CommandResult {
    let records = context.ledger.query_by_month(month)?;
    output_section(format!("Sales of {month}"));
    if records.is_empty() {
        io::print_info("No sales recorded.");
        return Ok(());
    }
    for record in &records {
        io::print_info(format!("  {}  {}", record.date(), row(context, record)));
    }
    let total = context.ledger.monthly_total(month)?;
    io::print_info(format!("Total: {}", context.money(total)));
    Ok(())
}

fn cmd_total(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("day") => {
            let total = context.ledger.daily_total(context.selected_day)?;
            io::print_info(format!(
                "Total for {}: {}",
                context.selected_day,
                context.money(total)
            ));
        }
        Some("month") => {
            let total = context.ledger.monthly_total(context.selected_month)?;
            io::print_info(format!(
                "Total for {}: {}",
                context.selected_month,
                context.money(total)
            ));
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown period `{other}` (use day or month)"
            )))
        }
    }
    Ok(())
}

fn describe(context: &ShellContext, record: &SaleRecord) -> String {
    format!(
        "{} {} x {} = {}",
        record.item(),
        record.quantity(),
        context.money(record.unit_price()),
        context.money(record.total())
    )
}

pub(crate) fn row(context: &ShellContext, record: &SaleRecord) -> String {
    format!(
        "{:<24} {:>4} x {:>12} = {:>12}  [{}]",
        record.item(),
        record.quantity(),
        context.money(record.unit_price()),
        context.money(record.total()),
        short_id(record.id())
    )
}
