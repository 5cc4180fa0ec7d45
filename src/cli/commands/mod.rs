pub mod config;
pub mod product;
pub mod report;
pub mod sale;
pub mod storage;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(sale::definitions());
    commands.extend(report::definitions());
    commands.extend(product::definitions());
    commands.extend(storage::definitions());
    commands.extend(config::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}
