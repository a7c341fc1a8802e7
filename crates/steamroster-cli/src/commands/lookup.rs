use crate::commands::common::{format_profile_lines, AppContext};
use crate::error::CliError;

pub async fn run_lookup(ctx: &AppContext, code: &str, as_json: bool) -> Result<(), CliError> {
    let profile = ctx.remote_service()?.lookup_user(code).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        for line in format_profile_lines(&profile) {
            println!("{line}");
        }
    }
    Ok(())
}
