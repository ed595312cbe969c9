/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A timestamp strictly later than `previous`, even if the clock has not
/// advanced (or went backwards) since it was taken.
pub fn bump(previous: i64) -> i64 {
    now_millis().max(previous.saturating_add(1))
}
