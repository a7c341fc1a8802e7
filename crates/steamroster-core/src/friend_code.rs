//! Turn user-entered account identifiers into 64-bit Steam ids.
//!
//! Accepted forms, after removing spaces and dashes:
//! - a 17 digit SteamID64, returned unchanged
//! - `STEAM_X:Y:Z` legacy ids, read as `2Z + Y`
//! - `[U:1:N]` SteamID3 ids
//! - any other number, read as a 32-bit account id
//! - alphanumeric codes of 8+ characters, read as base58 account ids

use std::sync::LazyLock;

use regex::Regex;

/// SteamID64 of account id 0 in the public universe.
pub const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

static LEGACY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^STEAM_\d+:(\d+):(\d+)$").expect("Invalid regex"));
static STEAM_ID3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[U:1:(\d+)\]$").expect("Invalid regex"));

/// Parse a friend code or id into a SteamID64 string.
///
/// ```
/// use steamroster_core::friend_code::parse_friend_code;
///
/// assert_eq!(
///     parse_friend_code("STEAM_0:1:4491990").as_deref(),
///     Some("76561197969249709")
/// );
/// assert_eq!(parse_friend_code("not a code!"), None);
/// ```
#[must_use]
pub fn parse_friend_code(input: &str) -> Option<String> {
    let code: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .collect();
    if code.is_empty() {
        return None;
    }

    let is_numeric = code.chars().all(|c| c.is_ascii_digit());
    if is_numeric && code.len() == 17 {
        return Some(code);
    }

    if let Some(captures) = LEGACY_ID.captures(&code) {
        let y = captures[1].parse::<u64>().ok()?;
        let z = captures[2].parse::<u64>().ok()?;
        return offset_from_base(z.checked_mul(2)?.checked_add(y)?);
    }

    if let Some(captures) = STEAM_ID3.captures(&code) {
        return offset_from_base(captures[1].parse::<u64>().ok()?);
    }

    if is_numeric {
        return offset_from_base(code.parse::<u64>().ok()?);
    }

    if code.len() >= 8 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return offset_from_base(decode_base58(&code)?);
    }

    None
}

fn decode_base58(code: &str) -> Option<u64> {
    code.chars().try_fold(0_u64, |value, c| {
        let digit = BASE58_ALPHABET.find(c)? as u64;
        value.checked_mul(58)?.checked_add(digit)
    })
}

fn offset_from_base(account_id: u64) -> Option<String> {
    STEAM_ID64_BASE
        .checked_add(account_id)
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steam_id64_passes_through() {
        assert_eq!(
            parse_friend_code(" 76561197960287930 ").as_deref(),
            Some("76561197960287930")
        );
    }

    #[test]
    fn legacy_id_is_converted() {
        assert_eq!(
            parse_friend_code("STEAM_0:0:11101").as_deref(),
            Some("76561197960287930")
        );
        assert_eq!(
            parse_friend_code("STEAM_1:1:11101").as_deref(),
            Some("76561197960287931")
        );
    }

    #[test]
    fn legacy_id_accepts_any_auth_digit() {
        assert_eq!(
            parse_friend_code("STEAM_0:2:1").as_deref(),
            Some("76561197960265732")
        );
    }

    #[test]
    fn steam_id3_is_converted() {
        assert_eq!(
            parse_friend_code("[U:1:22202]").as_deref(),
            Some("76561197960287930")
        );
    }

    #[test]
    fn short_number_is_account_id() {
        assert_eq!(
            parse_friend_code("22202").as_deref(),
            Some("76561197960287930")
        );
        assert_eq!(
            parse_friend_code("222-02").as_deref(),
            Some("76561197960287930")
        );
    }

    #[test]
    fn base58_code_is_decoded() {
        // leading '1's are zero digits, 'A' is 9
        assert_eq!(
            parse_friend_code("1111111A").as_deref(),
            Some("76561197960265737")
        );
        assert_eq!(
            parse_friend_code("2222222a").map(|id| id.len()),
            Some(17)
        );
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(parse_friend_code(""), None);
        assert_eq!(parse_friend_code("abc"), None);
        assert_eq!(parse_friend_code("0OIl0OIl"), None);
        assert_eq!(parse_friend_code("STEAM_0:1"), None);
        assert_eq!(parse_friend_code("zzzzzzzzzzzzzzzzzzzzzzzz"), None);
    }
}
