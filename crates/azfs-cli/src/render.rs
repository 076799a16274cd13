//! `ls -l`-style rendering of listings.
//!
//! Owner, group and permission bits are fixed placeholders; the store has
//! none of these concepts.

use azfs_namespace::{DirectoryEntry, DELIMITER};
use azfs_store::ContainerInfo;
use chrono::{DateTime, Utc};

const TIME_FORMAT: &str = "%b %d %H:%M";
const PLACEHOLDER: &str = "rwxrwxrwx root root";

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// One `ls` line. Directories get a trailing delimiter and no size.
pub fn entry_line(entry: &DirectoryEntry) -> String {
    let time = format_time(&entry.last_modified);
    if entry.is_directory() {
        format!("d{PLACEHOLDER} - {time} {}{DELIMITER}", entry.name)
    } else {
        format!("-{PLACEHOLDER} {} {time} {}", entry.size, entry.name)
    }
}

/// One `lsdir` line.
pub fn container_line(container: &ContainerInfo) -> String {
    format!(
        "d{PLACEHOLDER} - {} {}",
        format_time(&container.last_modified),
        container.name
    )
}
