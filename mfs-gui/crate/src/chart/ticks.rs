// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Time axis of a chart: resolutions, vertical grid lines and their labels.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use number_formatter::{format_day, format_hour, format_month, pad2};

/// Sampling granularity of a chart.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Resolution {
    OneMinute,
    SixMinutes,
    ThirtyMinutes,
    OneDay,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::OneMinute
    }
}

impl Resolution {
    pub fn index(self) -> usize {
        match self {
            Self::OneMinute => 0,
            Self::SixMinutes => 1,
            Self::ThirtyMinutes => 2,
            Self::OneDay => 3,
        }
    }
    /// Floors and clamps an arbitrary number onto a resolution.
    pub fn clamp(x: f64) -> Self {
        let x = if x.is_nan() { 0.0 } else { x.floor() };

        match x {
            x if x <= 0.0 => Self::OneMinute,
            x if x < 2.0 => Self::SixMinutes,
            x if x < 3.0 => Self::ThirtyMinutes,
            _ => Self::OneDay,
        }
    }
    /// Seconds covered by one sample (one pixel column).
    pub fn period(self) -> i64 {
        match self {
            Self::OneMinute => 60,
            Self::SixMinutes => 360,
            Self::ThirtyMinutes => 1800,
            Self::OneDay => 86400,
        }
    }
    pub fn granularity(self) -> &'static str {
        match self {
            Self::OneMinute => "1 minute",
            Self::SixMinutes => "6 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::OneDay => "1 day",
        }
    }
    /// Wall clock label of the sample `idx` columns back from `timestamp`.
    pub fn sample_date(self, timestamp: f64, idx: usize) -> String {
        let idx = i64::try_from(idx).unwrap_or(i64::MAX / self.period());

        let t = match utc(timestamp as i64 - idx * self.period()) {
            Some(t) => t,
            None => return format!("??? ({})", self.granularity()),
        };

        let day = format!("{}.{}", t.year(), format_day(t.month(), t.day()));

        match self {
            Self::OneDay => format!("{} ({})", day, self.granularity()),
            _ => format!(
                "{} {}:{} ({})",
                day,
                pad2(t.hour()),
                pad2(t.minute()),
                self.granularity()
            ),
        }
    }
    /// Vertical grid of a plot `chartx` pixels wide whose rightmost column is `timestamp`.
    pub fn grid(self, timestamp: f64, chartx: i64) -> Grid {
        let ts = timestamp as i64;

        let begin = match self {
            Self::OneMinute => utc(ts - chartx * 60),
            Self::SixMinutes => utc(ts - chartx * 360 - 3600),
            Self::ThirtyMinutes => utc(ts - chartx * 1800 - 43200),
            Self::OneDay => utc(ts - chartx * 86400),
        };

        match begin {
            Some(begin) => match self {
                Self::OneMinute => hourly_grid(&begin, chartx),
                Self::SixMinutes => six_minute_grid(&begin, chartx),
                Self::ThirtyMinutes => half_hour_grid(&begin, chartx),
                Self::OneDay => daily_grid(&begin, chartx),
            },
            None => Grid::default(),
        }
    }
}

fn utc(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Days in the zero based `month` of `year`.
pub fn month_days(year: i32, month: u32) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    if month != 1 {
        return DAYS.get(month as usize).copied().unwrap_or(31);
    }

    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;

    if leap {
        29
    } else {
        28
    }
}

/// Stroke pattern of a grid line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dash {
    Solid,
    /// `[1, 1]`
    Dotted,
    /// `[3, 1]`, used for period boundaries.
    Dashed,
    /// `[1, 3]`
    Sparse,
}

impl Dash {
    pub fn segments(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dotted => &[1.0, 1.0],
            Self::Dashed => &[3.0, 1.0],
            Self::Sparse => &[1.0, 3.0],
        }
    }
    pub fn offset(self) -> f64 {
        match self {
            Self::Solid => 0.0,
            Self::Dashed => 2.0,
            Self::Dotted | Self::Sparse => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    pub x: i64,
    /// Whether a short tick is drawn below the plot.
    pub mark: bool,
    pub dash: Dash,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub x: i64,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    pub lines: Vec<GridLine>,
    pub labels: Vec<Label>,
    /// Dash offset the horizontal grid uses so both grids share their dots.
    pub hoff: i64,
}

fn hourly_grid(begin: &DateTime<Utc>, chartx: i64) -> Grid {
    let offset = 59 - i64::from(begin.minute());
    let mut hour = begin.hour();
    let mut grid = Grid {
        hoff: offset % 2,
        ..Grid::default()
    };

    let mut i = offset - 60;

    while i < chartx + 60 {
        grid.labels.push(Label {
            x: i - 14,
            text: format_hour(hour),
        });
        grid.lines.push(GridLine {
            x: i,
            mark: true,
            dash: if hour % 6 == 0 { Dash::Dashed } else { Dash::Dotted },
        });

        hour = (hour + 1) % 24;
        i += 60;
    }

    grid
}

fn six_minute_grid(begin: &DateTime<Utc>, chartx: i64) -> Grid {
    let offset = 9 - i64::from(begin.minute() / 6);
    let mut hour = begin.hour();
    let mut grid = Grid {
        hoff: offset % 2,
        ..Grid::default()
    };

    let mut i = offset - 20;

    while i < chartx + 20 {
        if hour % 6 == 0 {
            grid.labels.push(Label {
                x: i - 14,
                text: format_hour(hour),
            });
        }

        let dash = match hour {
            0 => Dash::Dashed,
            h if h % 6 == 0 => Dash::Dotted,
            _ => Dash::Sparse,
        };

        grid.lines.push(GridLine {
            x: i,
            mark: hour % 6 == 0,
            dash,
        });

        hour = (hour + 1) % 24;
        i += 10;
    }

    grid
}

fn half_hour_grid(begin: &DateTime<Utc>, chartx: i64) -> Grid {
    let offset = 11 - i64::from((begin.minute() + 60 * (begin.hour() % 6)) / 30);
    let mut hour = begin.hour() / 6 * 6;
    let mut day = begin.day0();
    let mut month = begin.month0();
    let mut year = begin.year();
    let mut grid = Grid {
        hoff: offset % 2,
        ..Grid::default()
    };

    let mut i = offset - 24;

    while i < chartx + 24 {
        hour += 6;

        if hour == 24 {
            hour = 0;
            day += 1;

            if day == month_days(year, month) {
                day = 0;
                month += 1;

                if month == 12 {
                    month = 0;
                    year += 1;
                }
            }
        }

        if hour == 12 {
            grid.labels.push(Label {
                x: i - 14,
                text: format_day(month + 1, day + 1),
            });
        }

        let dash = match (day, hour) {
            (0, 0) => Dash::Dashed,
            (_, 0) => Dash::Dotted,
            _ => Dash::Sparse,
        };

        grid.lines.push(GridLine {
            x: i,
            mark: hour == 0,
            dash,
        });

        i += 12;
    }

    grid
}

fn daily_grid(begin: &DateTime<Utc>, chartx: i64) -> Grid {
    let mut month = begin.month0();
    let mut year = begin.year();
    let mut grid = Grid::default();

    let mut i = i64::from(month_days(year, month)) - i64::from(begin.day());

    while i < chartx + 31 {
        let days = i64::from(month_days(year, month));

        grid.labels.push(Label {
            x: i - 5 - days / 2,
            text: format_month(month + 1),
        });
        grid.lines.push(GridLine {
            x: i,
            mark: true,
            dash: if month == 11 { Dash::Dashed } else { Dash::Dotted },
        });

        month += 1;

        if month == 12 {
            month = 0;
            year += 1;
        }

        i += i64::from(month_days(year, month));
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_pairs(grid: &Grid) -> Vec<(i64, &str)> {
        grid.labels.iter().map(|x| (x.x, x.text.as_str())).collect()
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Resolution::clamp(-4.0), Resolution::OneMinute);
        assert_eq!(Resolution::clamp(f64::NAN), Resolution::OneMinute);
        assert_eq!(Resolution::clamp(1.9), Resolution::SixMinutes);
        assert_eq!(Resolution::clamp(2.0), Resolution::ThirtyMinutes);
        assert_eq!(Resolution::clamp(17.0), Resolution::OneDay);
    }

    #[test]
    fn test_month_days() {
        assert_eq!(month_days(2021, 0), 31);
        assert_eq!(month_days(2021, 1), 28);
        assert_eq!(month_days(2024, 1), 29);
        assert_eq!(month_days(1900, 1), 28);
        assert_eq!(month_days(2000, 1), 29);
        assert_eq!(month_days(2021, 10), 30);
    }

    #[test]
    fn test_sample_date() {
        let ts = 1_600_000_000.0;

        assert_eq!(
            Resolution::OneMinute.sample_date(ts, 0),
            "2020.09.13 12:26 (1 minute)"
        );
        assert_eq!(
            Resolution::SixMinutes.sample_date(ts, 10),
            "2020.09.13 11:26 (6 minutes)"
        );
        assert_eq!(
            Resolution::ThirtyMinutes.sample_date(ts, 2),
            "2020.09.13 11:26 (30 minutes)"
        );
        assert_eq!(Resolution::OneDay.sample_date(ts, 13), "2020.08.31 (1 day)");
    }

    #[test]
    fn test_hourly_grid() {
        let grid = Resolution::OneMinute.grid(1_600_000_000.0, 120);

        assert_eq!(grid.hoff, 1);
        assert_eq!(
            label_pairs(&grid),
            vec![(-41, "10:00"), (19, "11:00"), (79, "12:00"), (139, "13:00")]
        );
        assert_eq!(
            grid.lines.iter().map(|x| (x.x, x.dash)).collect::<Vec<_>>(),
            vec![
                (-27, Dash::Dotted),
                (33, Dash::Dotted),
                (93, Dash::Dashed),
                (153, Dash::Dotted)
            ]
        );
        assert!(grid.lines.iter().all(|x| x.mark));
    }

    #[test]
    fn test_six_minute_grid_marks_every_sixth_hour() {
        let grid = Resolution::SixMinutes.grid(1_600_000_000.0, 600);

        assert!(grid.labels.iter().all(|x| x.text == "00:00"
            || x.text == "06:00"
            || x.text == "12:00"
            || x.text == "18:00"));

        let marked = grid.lines.iter().filter(|x| x.mark).count();

        assert_eq!(marked, grid.labels.len());
        assert!(grid
            .lines
            .iter()
            .filter(|x| !x.mark)
            .all(|x| x.dash == Dash::Sparse));
    }

    #[test]
    fn test_half_hour_grid() {
        let grid = Resolution::ThirtyMinutes.grid(1_600_000_000.0, 24);

        assert_eq!(grid.hoff, 1);
        assert_eq!(label_pairs(&grid), vec![(9, "09.13")]);
        assert_eq!(
            grid.lines
                .iter()
                .filter(|x| x.mark)
                .map(|x| x.x)
                .collect::<Vec<_>>(),
            vec![-1, 47]
        );
    }

    #[test]
    fn test_half_hour_grid_leap_day() {
        let chartx = 96;
        let begin = Utc
            .with_ymd_and_hms(2024, 2, 28, 12, 0, 0)
            .single()
            .expect("valid date")
            .timestamp();
        let ts = begin + chartx * 1800 + 43200;

        let grid = Resolution::ThirtyMinutes.grid(ts as f64, chartx);

        assert_eq!(
            label_pairs(&grid),
            vec![(9, "02.29"), (57, "03.01"), (105, "03.02")]
        );

        let month_start = grid
            .lines
            .iter()
            .find(|x| x.dash == Dash::Dashed)
            .expect("month boundary");

        assert_eq!(month_start.x, 47);
    }

    #[test]
    fn test_daily_grid() {
        let grid = Resolution::OneDay.grid(1_600_000_000.0, 60);

        assert_eq!(grid.hoff, 0);
        assert_eq!(label_pairs(&grid), vec![(-4, "07"), (27, "08"), (57, "09")]);
        assert_eq!(
            grid.lines.iter().map(|x| x.x).collect::<Vec<_>>(),
            vec![16, 47, 77]
        );
    }
}
