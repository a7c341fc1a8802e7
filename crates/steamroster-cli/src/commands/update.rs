use steamroster_core::services::UpdateReport;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_update(ctx: &AppContext, no_avatars: bool, as_json: bool) -> Result<(), CliError> {
    let task = if no_avatars {
        ctx.remote_service()?.spawn_update()
    } else {
        ctx.service()?.spawn_update()
    };
    let report = task.await??;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_update_report(&report));
    }
    Ok(())
}

pub fn format_update_report(report: &UpdateReport) -> String {
    if !report.saved {
        return "No friends returned; record left unchanged".to_string();
    }
    format!(
        "{} friends recorded ({} active): {} new, {} re-added, {} removed",
        report.total,
        report.active,
        report.summary.added,
        report.summary.readded,
        report.summary.removed
    )
}
