//! Status bar content: tab info on the left, clock on the right.

use chrono::{DateTime, Local, TimeZone};
use settings::constants::status_bar;
use std::fmt;
use terminal::TabInfo;

/// One rendering of the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tab_info: String,
    pub clock: String,
}

impl StatusLine {
    pub fn new(tab_info: TabInfo, now: DateTime<Local>) -> Self {
        Self::at(tab_info, &now)
    }

    /// Status line for an arbitrary time zone (tests use `Utc`).
    pub fn at<Tz: TimeZone>(tab_info: TabInfo, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            tab_info: tab_info.to_string(),
            clock: format_clock(now),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.tab_info, self.clock)
    }
}

/// `14:03:09 | Mon 19 Oct 2026`
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format(status_bar::CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 9).unwrap()
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(&time()), "14:03:09 | Mon 19 Oct 2026");
    }

    #[test]
    fn status_line_combines_tab_and_clock() {
        let line = StatusLine::at(TabInfo { index: 0, count: 10 }, &time());
        assert_eq!(line.tab_info, "ATermD - 1/10 | ALT+1..0");
        assert_eq!(
            line.to_string(),
            "ATermD - 1/10 | ALT+1..0  14:03:09 | Mon 19 Oct 2026"
        );
    }
}
