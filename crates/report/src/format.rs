//! Small formatting helpers shared by the reports.

use populator_core::Time;

const FILLED: char = '█';
const EMPTY: char = '░';

/// A bar `width` characters wide, filled in proportion to `percent`.
pub fn progress_bar(percent: u32, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let filled = (2 * percent * width + 100) / 200;
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// Calendar date, `YYYY-MM-DD`.
pub fn date(time: &Time) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Date and time, to the minute, in UTC.
pub fn timestamp(time: &Time) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn bar_widths() {
        assert_eq!(progress_bar(40, 10), "████░░░░░░");
        assert_eq!(progress_bar(0, 5), "░░░░░");
        assert_eq!(progress_bar(100, 5), "█████");
        assert_eq!(progress_bar(50, 30).chars().filter(|c| *c == FILLED).count(), 15);
        assert_eq!(progress_bar(33, 50).chars().count(), 50);
    }

    #[test]
    fn bar_rounds_half_up() {
        // 25% of 10 is 2.5 cells.
        assert_eq!(progress_bar(25, 10).chars().filter(|c| *c == FILLED).count(), 3);
    }

    #[test]
    fn dates() {
        let t = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(date(&t), "2024-03-07");
        assert_eq!(timestamp(&t), "2024-03-07 14:05 UTC");
    }
}
