//! MQTT-style path patterns for subscriptions.
//!
//! - `+` matches exactly one level
//! - `#` matches the remaining levels, including none (must be last)
//!
//! `follow/+` matches `follow/42`; `sessions/#` matches `sessions`,
//! `sessions/feed` and `sessions/comments/7`.

/// Check whether `path` matches `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut segs = path.split('/');

    loop {
        match (pat.next(), segs.next()) {
            (Some("#"), _) => return pat.next().is_none(),
            (Some("+"), Some(_)) => {}
            (Some(p), Some(s)) if p == s => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
