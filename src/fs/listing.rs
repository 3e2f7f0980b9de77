//! Renders directory entries in the UNIX `ls -l` shape that FTP clients
//! parse heuristically.

use chrono::{DateTime, Datelike, Local, Timelike};
use std::time::SystemTime;

// Month names are hard coded so the output never depends on the process
// locale; clients match on the English abbreviations.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Entries modified within this window show a clock time, older ones the year.
const RECENT_DAYS: i64 = 180;

/// A directory entry: the entry's bare name plus its host metadata.
pub struct Fileinfo {
    /// The name of the entry within its directory
    pub name: String,
    /// The entry's metadata
    pub metadata: std::fs::Metadata,
}

impl Fileinfo {
    /// Formats the entry as a single `ls -l` style line, without terminator.
    pub fn format(&self, now: SystemTime) -> String {
        let len = self.metadata.len();
        let modified = self.metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        format_line(&self.name, self.metadata.is_dir(), len, modified, now)
    }
}

// The column layout:
//
//   <perms> <nlink:3> <owner:-8> <group:-8> <size:12> <mon:3> <day:2> <time_or_year:5> <name>
//
// Real permissions, link counts and ownership are not reported.
pub(crate) fn format_line(name: &str, is_dir: bool, len: u64, modified: SystemTime, now: SystemTime) -> String {
    let perms = if is_dir { "drwxrwxrwx" } else { "-rw-rw-rw-" };
    let size = if is_dir { 0 } else { len };
    let modified: DateTime<Local> = modified.into();
    let now: DateTime<Local> = now.into();
    let clock_or_year = if (now - modified).num_days().abs() < RECENT_DAYS {
        format!("{:02}:{:02}", modified.hour(), modified.minute())
    } else {
        modified.year().to_string()
    };
    format!(
        "{perms} {links:>3} {owner:<8} {group:<8} {size:>12} {month} {day:>2} {clock_or_year:>5} {name}",
        perms = perms,
        links = 1,
        owner = "owner",
        group = "group",
        size = size,
        month = MONTHS[modified.month0() as usize],
        day = modified.day(),
        clock_or_year = clock_or_year,
        name = name,
    )
}

/// Renders a full `LIST` payload: directories first, insertion order within
/// each group, each line CRLF terminated.
pub fn render_listing(entries: &[Fileinfo]) -> String {
    let now = SystemTime::now();
    let mut out = String::new();
    for entry in entries.iter().filter(|e| e.metadata.is_dir()) {
        out.push_str(&entry.format(now));
        out.push_str("\r\n");
    }
    for entry in entries.iter().filter(|e| !e.metadata.is_dir()) {
        out.push_str(&entry.format(now));
        out.push_str("\r\n");
    }
    out
}

/// Renders an `NLST` payload: bare names, one CRLF terminated line each.
pub fn render_names(entries: &[Fileinfo]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.name);
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn system_time(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> SystemTime {
        let dt = Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(dt.timestamp() as u64)
    }

    #[test]
    fn recent_file_shows_clock_time() {
        let modified = system_time(2024, 3, 5, 14, 30);
        let now = system_time(2024, 3, 6, 0, 0);
        let line = format_line("hello.txt", false, 12, modified, now);
        assert_eq!(line, "-rw-rw-rw-   1 owner    group              12 Mar  5 14:30 hello.txt");
    }

    #[test]
    fn old_file_shows_year() {
        let modified = system_time(2020, 1, 2, 3, 4);
        let now = system_time(2024, 3, 6, 0, 0);
        let line = format_line("archive.tar", false, 1048576, modified, now);
        assert_eq!(line, "-rw-rw-rw-   1 owner    group         1048576 Jan  2  2020 archive.tar");
    }

    #[test]
    fn directory_has_d_prefix_and_zero_size() {
        let modified = system_time(2024, 12, 24, 8, 15);
        let now = system_time(2024, 12, 31, 0, 0);
        let line = format_line("dir1", true, 4096, modified, now);
        assert_eq!(line, "drwxrwxrwx   1 owner    group               0 Dec 24 08:15 dir1");
    }

    #[test]
    fn time_or_year_field_is_five_columns() {
        let now = system_time(2024, 6, 1, 0, 0);
        let recent = format_line("a", false, 0, system_time(2024, 5, 1, 9, 5), now);
        let old = format_line("a", false, 0, system_time(1999, 5, 1, 9, 5), now);
        // Both variants occupy the same columns; the name starts at the same offset.
        assert_eq!(recent.find(" a").unwrap(), old.find(" a").unwrap());
        assert!(recent.contains("09:05"));
        assert!(old.contains(" 1999"));
    }
}
