use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_avatars(ctx: &AppContext) -> Result<(), CliError> {
    let changed = ctx.service()?.refresh_avatars().await?;
    if changed == 0 {
        println!("Avatars already up to date");
    } else {
        println!("Updated {changed} avatar(s)");
    }
    Ok(())
}
