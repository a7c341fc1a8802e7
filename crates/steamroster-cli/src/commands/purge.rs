use steamroster_core::services::RosterRecord;

use crate::commands::common::{confirm, AppContext};
use crate::error::CliError;

pub async fn run_purge(ctx: &AppContext, assume_yes: bool) -> Result<(), CliError> {
    let record = ctx.record()?;
    purge_record(&record, assume_yes).await
}

pub async fn purge_record(record: &RosterRecord, assume_yes: bool) -> Result<(), CliError> {
    let removed = record
        .load()
        .await
        .iter()
        .filter(|entry| !entry.is_active())
        .count();
    if removed == 0 {
        println!("Nothing to purge");
        return Ok(());
    }

    confirm(
        &format!("Delete {removed} removed friend(s) from the record?"),
        assume_yes,
    )?;
    let report = record.purge().await?;
    println!(
        "Purged {} entries, {} remain",
        report.dropped, report.kept
    );
    Ok(())
}
