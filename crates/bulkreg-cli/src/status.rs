//! `bulkreg status`: print the progress file.

use std::fmt::Write;

use bulkreg_core::{DomainStatus, Records};

/// Render records as a table followed by totals.
pub fn render(records: &Records) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Domains ({}):", records.len());
    let _ = writeln!(
        out,
        "{:<24}  {:<42}  {:<10}  {:>8}  {}",
        "DOMAIN", "OWNER", "STATUS", "ATTEMPTS", "ERROR"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));

    for (domain, record) in records.iter() {
        let _ = writeln!(
            out,
            "{:<24}  {:<42}  {:<10}  {:>8}  {}",
            domain,
            record.owner,
            record.status,
            record.attempts,
            record.error.as_deref().map(first_line).unwrap_or("-")
        );
    }

    let _ = writeln!(
        out,
        "\nSuccess: {}  Failed: {}  NotStarted: {}",
        records.count(DomainStatus::Success),
        records.count(DomainStatus::Failed),
        records.count(DomainStatus::NotStarted)
    );
    out
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkreg_core::TrackingRecord;

    #[test]
    fn test_render() {
        let mut bob = TrackingRecord::new("bob", "0xB");
        bob.fail("gas estimation failed\nstack trace", None);
        let records: Records = vec![TrackingRecord::new("alice", "0xA"), bob]
            .into_iter()
            .collect();

        let out = render(&records);
        assert!(out.starts_with("Domains (2):"));
        assert!(out.contains("NotStarted"));
        assert!(out.contains("gas estimation failed"));
        assert!(!out.contains("stack trace"));
        assert!(out.contains("Success: 0  Failed: 1  NotStarted: 1"));
    }
}
