/// Percentage of correct answers, rounded half up. An empty session scores 0.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    ((200 * score + total) / (2 * total)) as u32
}
