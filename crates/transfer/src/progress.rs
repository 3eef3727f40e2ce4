/// Percent of the file complete once bytes up to `end` are accepted.
///
/// `floor(end * 100 / total)` in exact integer arithmetic, capped at 100.
/// An empty file counts as fully complete.
pub fn progress_percent(end: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = u128::from(end) * 100 / u128::from(total);
    percent.min(100) as u8
}
