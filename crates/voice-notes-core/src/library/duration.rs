/// Format a capture length as `minutes:seconds`.
///
/// Rounds to the nearest whole second before splitting, so the seconds
/// field is always `00..=59` and zero-padded to two digits.
pub fn format_duration(millis: u64) -> String {
    let total_seconds = millis.saturating_add(500) / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    format!("{}:{:02}", minutes, seconds)
}
