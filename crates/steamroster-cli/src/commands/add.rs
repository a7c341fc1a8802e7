use crate::commands::common::{confirm, format_profile_lines, AppContext};
use crate::error::CliError;

pub async fn run_add(ctx: &AppContext, code: &str, assume_yes: bool) -> Result<(), CliError> {
    let service = ctx.remote_service()?;
    let profile = service.lookup_user(code).await?;
    for line in format_profile_lines(&profile) {
        println!("{line}");
    }

    confirm(
        &format!("Send a friend request to {}?", profile.persona_name),
        assume_yes,
    )?;
    service.send_friend_request(&profile.steam_id).await?;
    println!(
        "Friend request sent to {} ({})",
        profile.persona_name, profile.steam_id
    );
    Ok(())
}
