use canteen_core::{validation, AnalyticsService};
use canteen_domain::MonthKey;

use crate::cli::commands::sale::row;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const DEFAULT_TOP_LIMIT: usize = 10;
const DEFAULT_COMPARE_MONTHS: u32 = 6;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Month report grouped by day, or daily totals with --brief",
            "report [YYYY-MM] [--brief]",
            cmd_report,
        ),
        CommandEntry::new(
            "top",
            "Best selling items by units",
            "top [limit] [YYYY-MM | YYYY-MM-DD | <start> <end>]",
            cmd_top,
        ),
        CommandEntry::new(
            "stats",
            "Revenue, ticket and best day of a period",
            "stats [YYYY-MM | YYYY-MM-DD | <start> <end>]",
            cmd_stats,
        ),
        CommandEntry::new(
            "trend",
            "Revenue per weekday",
            "trend [YYYY-MM | YYYY-MM-DD | <start> <end>]",
            cmd_trend,
        ),
        CommandEntry::new(
            "compare",
            "Compare the last months up to the current one",
            "compare [months]",
            cmd_compare,
        ),
        CommandEntry::new(
            "categories",
            "Revenue per product category",
            "categories [YYYY-MM | YYYY-MM-DD | <start> <end>]",
            cmd_categories,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let brief = args.iter().any(|arg| arg.eq_ignore_ascii_case("--brief"));
    let month = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(raw) => validation::parse_month(raw)?,
        None => context.selected_month,
    };

    let summary = context.ledger.month_summary(month)?;
    output_section(format!("Report {month}"));
    if summary.sale_count == 0 {
        io::print_info("No sales recorded.");
        return Ok(());
    }

    if brief {
        let records = context.ledger.all()?;
        for entry in AnalyticsService::daily_revenue(&records, month) {
            io::print_info(format!(
                "  {:<28} {:>3} sale(s)  {:>12}",
                context.display_day(entry.day),
                entry.sale_count,
                context.money(entry.total)
            ));
        }
    } else {
        for bucket in context.ledger.group_by_day_within_month(month)? {
            io::print_info(format!(
                "{}  subtotal {}",
                context.display_day(bucket.day),
                context.money(bucket.total)
            ));
            for record in &bucket.records {
                io::print_info(format!("    {}", row(context, record)));
            }
        }
    }

    io::print_info(format!(
        "Month total: {} | {} sale(s), {} unit(s)",
        context.money(summary.total),
        summary.sale_count,
        summary.units_sold
    ));
    Ok(())
}

fn cmd_top(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed_limit = args
        .split_first()
        .and_then(|(first, rest)| first.parse::<usize>().ok().map(|limit| (limit, rest)));
    let (limit, range_args) = parsed_limit.unwrap_or((DEFAULT_TOP_LIMIT, args));
    let range = context.range_from_args(range_args)?;
    let records = context.ledger.all()?;
    let ranking = AnalyticsService::top_items(&records, range, limit)?;

    output_section(format!("Top items {range}"));
    if ranking.is_empty() {
        io::print_info("No sales in this period.");
        return Ok(());
    }
    for (position, entry) in ranking.iter().enumerate() {
        io::print_info(format!(
            "  {:>2}. {:<24} {:>5} unit(s) {:>7}  {:>12}",
            position + 1,
            entry.item,
            entry.units_sold,
            format!("{}%", entry.share_percent),
            context.money(entry.revenue)
        ));
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = context.range_from_args(args)?;
    let records = context.ledger.all()?;
    let stats = AnalyticsService::period_stats(&records, range);

    output_section(format!("Statistics {range}"));
    io::print_info(format!("  Revenue        : {}", context.money(stats.total)));
    io::print_info(format!("  Sales          : {}", stats.sale_count));
    io::print_info(format!(
        "  Average ticket : {}",
        context.money(stats.average_ticket)
    ));
    io::print_info(format!(
        "  Top item       : {}",
        stats.top_item.as_deref().unwrap_or("-")
    ));
    let best_day = stats
        .best_day
        .map(|day| context.display_day(day))
        .unwrap_or_else(|| "-".to_string());
    io::print_info(format!("  Best day       : {best_day}"));
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = context.range_from_args(args)?;
    let records = context.ledger.all()?;

    output_section(format!("Weekday trend {range}"));
    for entry in AnalyticsService::weekday_trend(&records, range) {
        io::print_info(format!(
            "  {:<4} {:>12} over {:>2} day(s), {:>12} per day",
            entry.weekday.to_string(),
            context.money(entry.total),
            entry.days_with_sales,
            context.money(entry.average_per_day)
        ));
    }
    Ok(())
}

fn cmd_compare(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = match args.first() {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a number of months"))
        })?,
        None => DEFAULT_COMPARE_MONTHS,
    };
    let records = context.ledger.all()?;
    let today = context.ledger.today();
    let comparison = AnalyticsService::monthly_comparison(&records, months, today)?;

    let current: MonthKey = today.month();
    output_section(format!("Last {months} month(s) up to {current}"));
    for entry in &comparison {
        io::print_info(format!(
            "  {}  {:>12}  {:>4} sale(s)  avg {:>12}",
            entry.month,
            context.money(entry.total),
            entry.sale_count,
            context.money(entry.average_ticket)
        ));
    }
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = context.range_from_args(args)?;
    let records = context.ledger.all()?;
    let products = context.catalog.all()?;
    let shares = AnalyticsService::sales_by_category(&records, range, &products);

    output_section(format!("Categories {range}"));
    if shares.is_empty() {
        io::print_info("No sales in this period.");
        return Ok(());
    }
    for share in &shares {
        io::print_info(format!(
            "  {:<20} {:>4} sale(s) {:>12} {:>7}",
            share.category,
            share.sale_count,
            context.money(share.revenue),
            format!("{}%", share.share_percent)
        ));
    }
    Ok(())
}
