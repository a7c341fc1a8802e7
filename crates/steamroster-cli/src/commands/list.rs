use crate::cli::StatusFilter;
use crate::commands::common::{
    entry_to_list_item, format_roster_lines, select_entries, AppContext, RosterListItem,
};
use crate::error::CliError;

pub async fn run_list(
    ctx: &AppContext,
    status: StatusFilter,
    descending: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let entries = select_entries(ctx.record()?.load().await, status, descending);

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<RosterListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if entries.is_empty() {
        eprintln!("No friends recorded");
    } else {
        for line in format_roster_lines(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
