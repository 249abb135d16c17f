// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Fixed-width number and date fragments used by the console charts.
//!
//! Axis labels are drawn with a bitmap font, so every label has to fit a
//! known number of glyph cells. The functions here never allocate more
//! characters than the chart expects for a given [`LabelMode`].

/// Metric prefixes indexed from `10^-6` up to `10^24`.
const METRIC_SUFFIXES: [&str; 11] = ["µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Display precision of an axis label.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelMode {
    /// `#.##`
    Hundredths,
    /// `##.#`
    Tenths,
    /// ` ###`
    Units,
}

impl LabelMode {
    /// The precision that follows this one when the scale escalates by a decade.
    pub fn next(self) -> Self {
        match self {
            Self::Hundredths => Self::Tenths,
            Self::Tenths => Self::Units,
            Self::Units => Self::Hundredths,
        }
    }
    /// Power of ten the raw step has to be multiplied by to be displayed in this mode.
    pub fn exponent(self) -> i32 {
        match self {
            Self::Hundredths => -2,
            Self::Tenths => -1,
            Self::Units => 0,
        }
    }
}

/// Rounds half up, the way browsers round numbers.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Formats `num` into exactly four glyph cells.
///
/// Values that do not fit the mode are rendered as a run of `:` so the
/// overflow is visible on the axis instead of silently truncated.
pub fn format_label(num: f64, mode: LabelMode) -> String {
    let scaled = match mode {
        LabelMode::Hundredths => num * 100.0,
        LabelMode::Tenths => num * 10.0,
        LabelMode::Units => num,
    };
    let rn = round_half_up(scaled);

    if !rn.is_finite() || !(0.0..=999.0).contains(&rn) {
        return match mode {
            LabelMode::Hundredths => ":.::",
            LabelMode::Tenths => "::.:",
            LabelMode::Units => " :::",
        }
        .into();
    }

    let rn = rn as u32;

    match mode {
        LabelMode::Hundredths => format!("{}.{}{}", rn / 100 % 10, rn / 10 % 10, rn % 10),
        LabelMode::Tenths => format!("{:>2}.{}", rn / 10, rn % 10),
        LabelMode::Units => format!("{:>4}", rn),
    }
}

/// Rounds to an integer and separates thousands with spaces, `1234567` becomes `1 234 567`.
pub fn group_thousands(num: f64) -> String {
    if !num.is_finite() {
        return num.to_string();
    }

    let sign = if num < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", round_half_up(num.abs()));

    let groups: Vec<&str> = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    format!("{}{}", sign, groups.join(" "))
}

/// Metric suffix for a scale index where `2` means no scaling.
///
/// Indices outside the table yield `?`.
pub fn metric_suffix(index: i32) -> &'static str {
    usize::try_from(index)
        .ok()
        .and_then(|i| METRIC_SUFFIXES.get(i))
        .copied()
        .unwrap_or("?")
}

/// Zero pads to two digits.
pub fn pad2(n: u32) -> String {
    format!("{:02}", n)
}

/// Hour tick label, `HH:00`.
pub fn format_hour(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Day tick label, `MM.DD`, both one based.
pub fn format_day(month: u32, day: u32) -> String {
    format!("{:02}.{:02}", month, day)
}

/// Month tick label, `MM`, one based.
pub fn format_month(month: u32) -> String {
    pad2(month)
}

/// Parses the leading integer of a string, skipping leading whitespace.
///
/// `" 12px"` gives `Some(12)`, `"-3deg"` gives `Some(-3)` and `"px"` gives `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or_else(|| rest.len());

    rest[..end].parse::<i64>().ok().map(|x| x * sign)
}

/// Formats a number of seconds as a countdown, `m:ss`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Advances a `m:ss` countdown by one second.
///
/// Returns `None` when the text is not a countdown. Otherwise returns the
/// new text and whether the countdown has expired. Unreadable parts count
/// as zero, so a garbled countdown expires immediately.
pub fn countdown_tick(text: &str) -> Option<(String, bool)> {
    let (minutes, seconds) = text.split_once(':')?;

    let minutes = parse_int_prefix(minutes).unwrap_or(0);
    let seconds = parse_int_prefix(seconds).unwrap_or(0);

    let left = minutes * 60 + seconds - 1;

    if left > 0 {
        let left = u32::try_from(left).unwrap_or(u32::MAX);

        Some((format_countdown(left), false))
    } else {
        Some(("0:00".into(), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label_hundredths() {
        assert_eq!(format_label(0.0, LabelMode::Hundredths), "0.00");
        assert_eq!(format_label(1.5, LabelMode::Hundredths), "1.50");
        assert_eq!(format_label(9.99, LabelMode::Hundredths), "9.99");
        assert_eq!(format_label(0.125, LabelMode::Hundredths), "0.13");
        assert_eq!(format_label(10.0, LabelMode::Hundredths), ":.::");
        assert_eq!(format_label(-1.0, LabelMode::Hundredths), ":.::");
    }

    #[test]
    fn test_format_label_tenths() {
        assert_eq!(format_label(0.0, LabelMode::Tenths), " 0.0");
        assert_eq!(format_label(2.0, LabelMode::Tenths), " 2.0");
        assert_eq!(format_label(12.3, LabelMode::Tenths), "12.3");
        assert_eq!(format_label(99.9, LabelMode::Tenths), "99.9");
        assert_eq!(format_label(100.0, LabelMode::Tenths), "::.:");
    }

    #[test]
    fn test_format_label_units() {
        assert_eq!(format_label(0.0, LabelMode::Units), "   0");
        assert_eq!(format_label(7.0, LabelMode::Units), "   7");
        assert_eq!(format_label(42.0, LabelMode::Units), "  42");
        assert_eq!(format_label(420.0, LabelMode::Units), " 420");
        assert_eq!(format_label(1000.0, LabelMode::Units), " :::");
        assert_eq!(format_label(f64::NAN, LabelMode::Units), " :::");
    }

    #[test]
    fn test_labels_are_four_cells() {
        for mode in [LabelMode::Hundredths, LabelMode::Tenths, LabelMode::Units] {
            for i in 0..1200 {
                let n = f64::from(i) / 7.0;

                assert_eq!(format_label(n, mode).chars().count(), 4, "{} {:?}", n, mode);
            }
        }
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(LabelMode::Hundredths.next(), LabelMode::Tenths);
        assert_eq!(LabelMode::Tenths.next(), LabelMode::Units);
        assert_eq!(LabelMode::Units.next(), LabelMode::Hundredths);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1 000");
        assert_eq!(group_thousands(1_234_567.0), "1 234 567");
        assert_eq!(group_thousands(2.5), "3");
        assert_eq!(group_thousands(-12_345.0), "-12 345");
    }

    #[test]
    fn test_metric_suffix() {
        assert_eq!(metric_suffix(0), "µ");
        assert_eq!(metric_suffix(2), "");
        assert_eq!(metric_suffix(3), "k");
        assert_eq!(metric_suffix(10), "Y");
        assert_eq!(metric_suffix(11), "?");
        assert_eq!(metric_suffix(-1), "?");
    }

    #[test]
    fn test_date_fragments() {
        assert_eq!(format_hour(0), "00:00");
        assert_eq!(format_hour(18), "18:00");
        assert_eq!(format_day(2, 9), "02.09");
        assert_eq!(format_day(12, 31), "12.31");
        assert_eq!(format_month(7), "07");
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("90"), Some(90));
        assert_eq!(parse_int_prefix(" -45deg"), Some(-45));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("deg"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn test_countdown_tick() {
        assert_eq!(countdown_tick("1:00"), Some(("0:59".into(), false)));
        assert_eq!(countdown_tick("10:05"), Some(("10:04".into(), false)));
        assert_eq!(countdown_tick("0:02"), Some(("0:01".into(), false)));
        assert_eq!(countdown_tick("0:01"), Some(("0:00".into(), true)));
        assert_eq!(countdown_tick("0:00"), Some(("0:00".into(), true)));
        assert_eq!(countdown_tick("x:y"), Some(("0:00".into(), true)));
        assert_eq!(countdown_tick("soon"), None);
    }
}
