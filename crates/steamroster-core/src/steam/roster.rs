//! Fetch the live friend set of the owner account.

use std::collections::HashMap;

use crate::avatar::{resolve_many, AvatarResolver};
use crate::models::{sanitize_display_name, LiveFriend};
use crate::steam::{SteamApiResult, SteamClient};

/// Friend list + summaries, normalized into [`LiveFriend`]s.
///
/// Avatars go through `avatars`; their failures never surface here. Any API
/// failure aborts the whole fetch.
pub async fn fetch_live_friends<A: AvatarResolver>(
    client: &SteamClient,
    avatars: &A,
) -> SteamApiResult<Vec<LiveFriend>> {
    let friends = client.friend_list().await?;
    let friend_since = friends
        .iter()
        .map(|friend| (friend.steamid.clone(), friend.friend_since))
        .collect::<HashMap<_, _>>();
    let ids = friends
        .into_iter()
        .map(|friend| friend.steamid)
        .collect::<Vec<_>>();

    let summaries = client.player_summaries(&ids).await?;
    let summaries = summaries
        .into_iter()
        .filter(|player| {
            let known = friend_since.contains_key(&player.steamid);
            if !known {
                tracing::debug!("Ignoring summary for non-friend {}", player.steamid);
            }
            known
        })
        .collect::<Vec<_>>();
    if summaries.len() < ids.len() {
        tracing::warn!(
            "{} friends had no player summary and were skipped",
            ids.len() - summaries.len()
        );
    }

    let avatar_requests = summaries
        .iter()
        .map(|player| (player.avatar.clone(), player.steamid.clone()))
        .collect();
    let avatar_refs = resolve_many(avatars, avatar_requests).await;

    Ok(summaries
        .into_iter()
        .zip(avatar_refs)
        .map(|(player, avatar_ref)| LiveFriend {
            friend_since: friend_since.get(&player.steamid).copied().unwrap_or_default(),
            display_name: sanitize_display_name(&player.personaname),
            account_id: player.steamid,
            avatar_ref,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::avatar::RemoteAvatars;
    use crate::config::ApiCredentials;
    use crate::test_support::{spawn_router, Reply};

    #[tokio::test]
    async fn fetch_normalizes_names_and_skips_missing_summaries() {
        let server = spawn_router(|_, target| {
            if target.contains("GetFriendList") {
                Reply::ok(
                    r#"{"friendslist":{"friends":[
                        {"steamid":"1","relationship":"friend","friend_since":1600000000},
                        {"steamid":"2","relationship":"friend","friend_since":1700000000},
                        {"steamid":"3","relationship":"friend","friend_since":1710000000}
                    ]}}"#,
                )
            } else {
                Reply::ok(
                    r#"{"response":{"players":[
                        {"steamid":"2","personaname":"b|o-b","avatar":"https://a/2.jpg"},
                        {"steamid":"1","personaname":"al:ice","avatar":"https://a/1.jpg"}
                    ]}}"#,
                )
            }
        })
        .await;
        let credentials = ApiCredentials::new("key", "0", None).unwrap();
        let client = SteamClient::with_base_url(credentials, &server.base_url).unwrap();

        let friends = fetch_live_friends(&client, &RemoteAvatars).await.unwrap();
        assert_eq!(
            friends,
            vec![
                LiveFriend {
                    account_id: "2".to_string(),
                    display_name: "b`o`b".to_string(),
                    avatar_ref: "https://a/2.jpg".to_string(),
                    friend_since: 1_700_000_000,
                },
                LiveFriend {
                    account_id: "1".to_string(),
                    display_name: "al`ice".to_string(),
                    avatar_ref: "https://a/1.jpg".to_string(),
                    friend_since: 1_600_000_000,
                },
            ]
        );
    }

    #[tokio::test]
    async fn fetch_stops_at_first_failing_call() {
        let server = spawn_router(|_, target| {
            if target.contains("GetFriendList") {
                Reply::ok(r#"{"friendslist":{"friends":[{"steamid":"1","friend_since":1}]}}"#)
            } else {
                Reply::status("429 Too Many Requests", "")
            }
        })
        .await;
        let credentials = ApiCredentials::new("key", "0", None).unwrap();
        let client = SteamClient::with_base_url(credentials, &server.base_url).unwrap();

        let error = fetch_live_friends(&client, &RemoteAvatars).await.unwrap_err();
        assert!(matches!(error, crate::steam::SteamApiError::RateLimited));
    }
}
