use steamroster_core::services::RosterRecord;

use crate::commands::common::{normalize_steam_id, AppContext};
use crate::error::CliError;

pub async fn run_remark(ctx: &AppContext, steam_id: &str, text: &[String]) -> Result<(), CliError> {
    let record = ctx.record()?;
    set_remark(&record, steam_id, text).await
}

pub async fn set_remark(
    record: &RosterRecord,
    steam_id: &str,
    text: &[String],
) -> Result<(), CliError> {
    let steam_id = normalize_steam_id(steam_id)?;
    let remark = text.join(" ").trim().to_string();

    if record.set_remark(&steam_id, &remark).await? {
        if remark.is_empty() {
            println!("Cleared remark for {steam_id}");
        } else {
            println!("Updated remark for {steam_id}");
        }
    } else {
        println!("Remark for {steam_id} unchanged");
    }
    Ok(())
}
