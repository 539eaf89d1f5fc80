// Time-ordered media identifiers.
//
// Post and avatar ids carry their creation time in the high bits: the id
// shifted right by 23 is milliseconds since the platform epoch.

use chrono::{DateTime, Datelike, Utc};

/// 2011-08-24T21:07:01.721Z in Unix milliseconds.
pub const PLATFORM_EPOCH_MS: i64 = 1_314_220_021_721;

const TIMESTAMP_SHIFT: u32 = 23;
const VALID_YEARS: std::ops::RangeInclusive<i32> = 2010..=2030;

/// Decode the creation time embedded in a media id, if it lands in a sane range.
pub fn decode(id: u64) -> Option<DateTime<Utc>> {
    let since_epoch = i64::try_from(id >> TIMESTAMP_SHIFT).ok()?;
    let unix_ms = since_epoch.checked_add(PLATFORM_EPOCH_MS)?;
    DateTime::from_timestamp_millis(unix_ms).filter(|t| VALID_YEARS.contains(&t.year()))
}

/// Decode a textual id; non-numeric input decodes to nothing.
pub fn decode_str(id: &str) -> Option<DateTime<Utc>> {
    id.trim().parse::<u64>().ok().and_then(decode)
}

/// Leading numeric token of an avatar resource id (`"2891..._1234"` → `2891...`).
pub fn avatar_token(profile_pic_id: &str) -> Option<u64> {
    profile_pic_id
        .trim()
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse().ok())
}
