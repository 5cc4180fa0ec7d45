use canteen_core::validation;
use canteen_domain::{Product, ProductDraft, ProductPatch};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "product [list [--all] [category] | add <name> <price> [category] | edit <name|id> [name=..] [price=..] [category=..] [active=on|off] | remove <name|id>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "product",
        "Manage the product catalog",
        USAGE,
        cmd_product,
    )]
}

fn cmd_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return list_products(context, &[]);
    };
    match action.to_lowercase().as_str() {
        "list" | "ls" => list_products(context, rest),
        "add" => add_product(context, rest),
        "edit" => edit_product(context, rest),
        "remove" | "rm" => remove_product(context, rest),
        _ => Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
}

fn list_products(context: &ShellContext, args: &[&str]) -> CommandResult {
    let include_inactive = args.iter().any(|arg| arg.eq_ignore_ascii_case("--all"));
    let category = args.iter().find(|arg| !arg.starts_with("--")).copied();
    let products = context.catalog.list(!include_inactive, category)?;

    match category {
        Some(name) => output_section(format!("Products in {name}")),
        None => output_section("Products"),
    }
    if products.is_empty() {
        io::print_info("No products registered.");
        return Ok(());
    }
    for product in &products {
        io::print_info(format!("  {}", describe(context, product)));
    }
    let categories = context.catalog.categories()?;
    if category.is_none() && !categories.is_empty() {
        io::print_hint(format!("Categories: {}", categories.join(", ")));
    }
    Ok(())
}

fn add_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, price, category) = match args {
        [name, price] => (*name, *price, None),
        [name, price, category] => (*name, *price, Some(*category)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: product add <name> <price> [category]".into(),
            ))
        }
    };
    let mut draft = ProductDraft::new(name, validation::parse_price(price)?);
    if let Some(category) = category {
        draft = draft.with_category(category);
    }

    let product = context.catalog.add(draft)?;
    io::print_success(format!("Added product {}", describe(context, &product)));
    Ok(())
}

fn edit_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (reference, fields) = args.split_first().ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: product edit <name|id> [name=..] [price=..] [category=..] [active=on|off]"
                .into(),
        )
    })?;
    let product = context.resolve_product(reference)?;
    let patch = patch_from_fields(fields)?;

    let updated = context.catalog.update(product.id, patch)?;
    io::print_success(format!("Updated product {}", describe(context, &updated)));
    Ok(())
}

fn patch_from_fields(fields: &[&str]) -> Result<ProductPatch, CommandError> {
    let mut patch = ProductPatch::default();
    for field in fields {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{field}`"))
        })?;
        match key.to_lowercase().as_str() {
            "name" => patch.name = Some(value.to_string()),
            "price" => patch.default_price = Some(validation::parse_price(value)?),
            "category" => patch.category = Some(value.to_string()),
            "active" => patch.active = Some(parse_switch(value)?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}` (use name, price, category or active)"
                )))
            }
        }
    }
    Ok(patch)
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{other}`"
        ))),
    }
}

fn remove_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: product remove <name|id>".into())
    })?;
    let product = context.resolve_product(reference)?;
    if !product.active {
        io::print_info(format!("{} is already inactive.", product.name));
        return Ok(());
    }

    let question = format!("Deactivate {}? Past sales are kept.", product.name);
    if !context.confirm(&question)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let product = context.catalog.deactivate(product.id)?;
    io::print_success(format!("Deactivated {}", product.name));
    Ok(())
}

fn describe(context: &ShellContext, product: &Product) -> String {
    let mut text = format!(
        "{:<24} {:>12}  {}",
        product.name,
        context.money(product.default_price),
        product.category.as_deref().unwrap_or("-")
    );
    if !product.active {
        text.push_str("  (inactive)");
    }
    text
}
