//! HTTP client for the Steam Web API endpoints used by steamroster.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiCredentials;
use crate::models::UserProfile;
use crate::steam::payload::{
    FriendListItem, FriendListResponse, OwnedGamesResponse, PlayerSummary, SummariesResponse,
};
use crate::steam::{SteamApiError, SteamApiResult};

pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";
/// Maximum ids `GetPlayerSummaries` accepts per call.
pub const SUMMARY_BATCH_SIZE: usize = 100;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const FRIEND_LIST_PATH: &str = "/ISteamUser/GetFriendList/v0001/";
const SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
const REMOVE_FRIEND_PATH: &str = "/ISteamUser/RemoveFriend/v1/";
const ADD_FRIEND_PATH: &str = "/ISteamUser/AddFriend/v1/";
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";

/// Build an HTTP client routed through `proxy` when one is given.
///
/// Without an explicit proxy the client ignores proxy environment variables.
pub fn build_http_client(proxy: Option<&str>) -> SteamApiResult<reqwest::Client> {
    let builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
    let builder = match proxy {
        Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy)?),
        None => builder.no_proxy(),
    };
    Ok(builder.build()?)
}

/// Steam Web API client bound to one credential set.
#[derive(Debug, Clone)]
pub struct SteamClient {
    base_url: String,
    credentials: ApiCredentials,
    client: reqwest::Client,
}

impl SteamClient {
    pub fn new(credentials: ApiCredentials) -> SteamApiResult<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Client against a different API host, used by tests and mirrors.
    pub fn with_base_url(
        credentials: ApiCredentials,
        base_url: impl Into<String>,
    ) -> SteamApiResult<Self> {
        let client = build_http_client(credentials.proxy())?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// Friend ids and `friend_since` times of the owner account.
    pub async fn friend_list(&self) -> SteamApiResult<Vec<FriendListItem>> {
        let response = self
            .client
            .get(self.url(FRIEND_LIST_PATH))
            .query(&[
                ("key", self.credentials.api_key()),
                ("steamid", self.credentials.steam_id()),
                ("relationship", "friend"),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SteamApiError::from_account_status(response.status()));
        }

        let payload = decode_json::<FriendListResponse>(response).await?;
        tracing::debug!("GetFriendList returned {} friends", payload.friendslist.friends.len());
        Ok(payload.friendslist.friends)
    }

    /// Player summaries for `steam_ids`, requested sequentially in batches of
    /// [`SUMMARY_BATCH_SIZE`].
    pub async fn player_summaries(&self, steam_ids: &[String]) -> SteamApiResult<Vec<PlayerSummary>> {
        let mut players = Vec::with_capacity(steam_ids.len());
        for batch in steam_ids.chunks(SUMMARY_BATCH_SIZE) {
            let response = self.request_summaries(&batch.join(",")).await?;
            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                return Err(SteamApiError::from_summary_status(status, &body));
            }

            let payload = decode_json::<SummariesResponse>(response).await?;
            tracing::debug!(
                "GetPlayerSummaries returned {} of {} requested players",
                payload.response.players.len(),
                batch.len()
            );
            players.extend(payload.response.players);
        }
        Ok(players)
    }

    /// Remove `friend_id` from the owner's friends list.
    pub async fn remove_friend(&self, friend_id: &str) -> SteamApiResult<()> {
        let response = self
            .client
            .post(self.url(REMOVE_FRIEND_PATH))
            .query(&[
                ("key", self.credentials.api_key()),
                ("steamid", self.credentials.steam_id()),
                ("friendid", friend_id),
            ])
            .send()
            .await?;
        ensure_account_ok(&response)
    }

    /// Send a friend request from the owner account to `friend_id`.
    pub async fn add_friend(&self, friend_id: &str) -> SteamApiResult<()> {
        let response = self
            .client
            .get(self.url(ADD_FRIEND_PATH))
            .query(&[
                ("key", self.credentials.api_key()),
                ("steamid", self.credentials.steam_id()),
                ("friendid", friend_id),
            ])
            .send()
            .await?;
        ensure_account_ok(&response)
    }

    /// Number of games owned by `steam_id`, or 0 when it cannot be read
    /// (private library, bad status, transport failure).
    pub async fn owned_game_count(&self, steam_id: &str) -> u32 {
        match self.fetch_owned_game_count(steam_id).await {
            Ok(count) => count,
            Err(error) => {
                tracing::warn!("Failed to read owned games for {steam_id}: {error}");
                0
            }
        }
    }

    /// Profile of a single user, including the owned game count.
    pub async fn lookup_user(&self, steam_id: &str) -> SteamApiResult<UserProfile> {
        let response = self.request_summaries(steam_id).await?;
        if response.status() != StatusCode::OK {
            return Err(SteamApiError::from_lookup_status(response.status()));
        }

        let payload = decode_json::<SummariesResponse>(response).await?;
        let player = payload
            .response
            .players
            .into_iter()
            .next()
            .ok_or_else(|| SteamApiError::UserNotFound(steam_id.to_string()))?;
        let game_count = self.owned_game_count(steam_id).await;

        Ok(UserProfile {
            steam_id: player.steamid,
            persona_name: player.personaname,
            profile_url: player.profileurl,
            avatar_url: if player.avatarfull.is_empty() {
                player.avatar
            } else {
                player.avatarfull
            },
            real_name: player.realname,
            country_code: player.loccountrycode,
            persona_state: player.personastate,
            created_at: player.timecreated,
            game_count,
        })
    }

    async fn fetch_owned_game_count(&self, steam_id: &str) -> SteamApiResult<u32> {
        let response = self
            .client
            .get(self.url(OWNED_GAMES_PATH))
            .query(&[
                ("key", self.credentials.api_key()),
                ("steamid", steam_id),
                ("include_played_free_games", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Err(SteamApiError::UnexpectedStatus(response.status().as_u16()));
        }

        let payload = decode_json::<OwnedGamesResponse>(response).await?;
        Ok(payload.response.game_count.unwrap_or(0))
    }

    async fn request_summaries(&self, steam_ids: &str) -> SteamApiResult<Response> {
        Ok(self
            .client
            .get(self.url(SUMMARIES_PATH))
            .query(&[("key", self.credentials.api_key()), ("steamids", steam_ids)])
            .send()
            .await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Read a JSON body, reporting shape mismatches as [`SteamApiError::InvalidPayload`].
async fn decode_json<T: DeserializeOwned>(response: Response) -> SteamApiResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|error| SteamApiError::InvalidPayload(error.to_string()))
}

fn ensure_account_ok(response: &Response) -> SteamApiResult<()> {
    if response.status() == StatusCode::OK {
        Ok(())
    } else {
        Err(SteamApiError::from_account_status(response.status()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{query_param, spawn_router, Reply};

    fn credentials() -> ApiCredentials {
        ApiCredentials::new("test-key", "76561198000000000", None).unwrap()
    }

    #[tokio::test]
    async fn friend_list_parses_payload_and_sends_credentials() {
        let server = spawn_router(|_, target| {
            assert_eq!(query_param(target, "key").as_deref(), Some("test-key"));
            assert_eq!(
                query_param(target, "steamid").as_deref(),
                Some("76561198000000000")
            );
            Reply::ok(
                r#"{"friendslist":{"friends":[
                    {"steamid":"76561198000000001","relationship":"friend","friend_since":1600000000},
                    {"steamid":"76561198000000002","relationship":"friend","friend_since":1700000000}
                ]}}"#,
            )
        })
        .await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();

        let friends = client.friend_list().await.unwrap();
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0].steamid, "76561198000000001");
        assert_eq!(friends[1].friend_since, 1_700_000_000);
        assert!(server.requests()[0].starts_with("GET /ISteamUser/GetFriendList/v0001/"));
    }

    #[tokio::test]
    async fn friend_list_maps_error_statuses() {
        for (status, check) in [
            ("401 Unauthorized", 401_u16),
            ("403 Forbidden", 403),
            ("500 Internal Server Error", 500),
            ("418 I'm a teapot", 418),
        ] {
            let server = spawn_router(move |_, _| Reply::status(status, "{}")).await;
            let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
            let error = client.friend_list().await.unwrap_err();
            match (check, error) {
                (401, SteamApiError::Auth)
                | (403, SteamApiError::Permission)
                | (500, SteamApiError::Server) => {}
                (418, SteamApiError::UnexpectedStatus(code)) => assert_eq!(code, 418),
                (code, other) => panic!("HTTP {code} mapped to {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn friend_list_without_friendslist_is_invalid_payload() {
        for body in ["{}", r#"{"friendslist":{}}"#, "not json"] {
            let server = spawn_router(move |_, _| Reply::ok(body)).await;
            let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
            let error = client.friend_list().await.unwrap_err();
            assert!(
                matches!(error, SteamApiError::InvalidPayload(_)),
                "{body} mapped to {error:?}"
            );
        }
    }

    #[tokio::test]
    async fn player_summaries_are_batched_by_hundred() {
        let server = spawn_router(|_, target| {
            let ids = query_param(target, "steamids").unwrap_or_default();
            let players = ids
                .split(',')
                .map(|id| format!(r#"{{"steamid":"{id}","personaname":"p{id}","avatar":"https://a/{id}.jpg"}}"#))
                .collect::<Vec<_>>()
                .join(",");
            Reply::ok(format!(r#"{{"response":{{"players":[{players}]}}}}"#))
        })
        .await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        let ids = (0..250).map(|n| n.to_string()).collect::<Vec<_>>();

        let players = client.player_summaries(&ids).await.unwrap();
        assert_eq!(players.len(), 250);
        assert_eq!(server.requests().len(), 3);
        assert_eq!(players[249].personaname, "p249");
    }

    #[tokio::test]
    async fn player_summaries_map_rate_limit_and_body() {
        let server = spawn_router(|_, _| Reply::status("429 Too Many Requests", "slow down")).await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        let error = client
            .player_summaries(&["1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(error, SteamApiError::RateLimited));

        let server = spawn_router(|_, _| Reply::status("400 Bad Request", "missing key")).await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        let error = client
            .player_summaries(&["1".to_string()])
            .await
            .unwrap_err();
        assert!(error.to_string().contains("missing key"));
    }

    #[tokio::test]
    async fn remove_friend_posts_friend_id() {
        let server = spawn_router(|method, target| {
            assert_eq!(method, "POST");
            assert_eq!(query_param(target, "friendid").as_deref(), Some("76561198000000009"));
            Reply::ok("{}")
        })
        .await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        client.remove_friend("76561198000000009").await.unwrap();

        let server = spawn_router(|_, _| Reply::status("403 Forbidden", "")).await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        assert!(matches!(
            client.remove_friend("1").await.unwrap_err(),
            SteamApiError::Permission
        ));
    }

    #[tokio::test]
    async fn add_friend_maps_error_statuses() {
        for (status, check) in [
            ("401 Unauthorized", 401_u16),
            ("403 Forbidden", 403),
            ("500 Internal Server Error", 500),
        ] {
            let server = spawn_router(move |_, _| Reply::status(status, "")).await;
            let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
            let error = client.add_friend("76561198000000009").await.unwrap_err();
            match (check, error) {
                (401, SteamApiError::Auth)
                | (403, SteamApiError::Permission)
                | (500, SteamApiError::Server) => {}
                (code, other) => panic!("HTTP {code} mapped to {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn lookup_user_maps_error_statuses() {
        let server = spawn_router(|_, _| Reply::status("401 Unauthorized", "")).await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        assert!(matches!(
            client.lookup_user("1").await.unwrap_err(),
            SteamApiError::Auth
        ));

        let server = spawn_router(|_, _| Reply::status("500 Internal Server Error", "")).await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        assert!(matches!(
            client.lookup_user("1").await.unwrap_err(),
            SteamApiError::Server
        ));
    }

    #[tokio::test]
    async fn lookup_user_combines_summary_and_game_count() {
        let server = spawn_router(|_, target| {
            if target.starts_with(OWNED_GAMES_PATH) {
                Reply::ok(r#"{"response":{"game_count":42,"games":[]}}"#)
            } else {
                Reply::ok(
                    r#"{"response":{"players":[{"steamid":"76561197960287930","personaname":"Rabscuttle",
                    "profileurl":"https://steamcommunity.com/id/gabelogannewell/","avatar":"https://a/s.jpg",
                    "avatarfull":"https://a/full.jpg","personastate":1,"loccountrycode":"US","timecreated":1063407589}]}}"#,
                )
            }
        })
        .await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();

        let profile = client.lookup_user("76561197960287930").await.unwrap();
        assert_eq!(profile.persona_name, "Rabscuttle");
        assert_eq!(profile.avatar_url, "https://a/full.jpg");
        assert_eq!(profile.game_count, 42);
        assert_eq!(profile.persona_state_label(), "online");
        assert_eq!(profile.country_code.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn lookup_user_reports_missing_player_and_private_games() {
        let server = spawn_router(|_, target| {
            if target.starts_with(OWNED_GAMES_PATH) {
                Reply::ok(r#"{"response":{}}"#)
            } else {
                Reply::ok(r#"{"response":{"players":[]}}"#)
            }
        })
        .await;
        let client = SteamClient::with_base_url(credentials(), &server.base_url).unwrap();
        assert!(matches!(
            client.lookup_user("1").await.unwrap_err(),
            SteamApiError::UserNotFound(_)
        ));
        assert_eq!(client.owned_game_count("1").await, 0);
    }
}
