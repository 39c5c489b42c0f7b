//! Renders a `GlobalStats` snapshot into a human-readable summary or JSON.

use crate::stats::GlobalStats;

pub fn render_summary(stats: &GlobalStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "files: scanned={} matched={} skipped={} errored={}\n",
        stats.files_scanned, stats.files_matched, stats.files_skipped, stats.files_errored
    ));
    out.push_str(&format!(
        "records: total={} matched={} oversize_truncated={} orphan_continuations={}\n",
        stats.records_total, stats.records_matched, stats.records_oversize, stats.records_orphan
    ));
    out.push_str(&format!(
        "bytes_read={} wall_time_ms={}\n",
        stats.bytes_read,
        stats.wall_time_ns / 1_000_000
    ));
    if stats.absent_timestamp_records > 0 {
        out.push_str(&format!(
            "records_without_timestamp={} (passed temporal filters by default)\n",
            stats.absent_timestamp_records
        ));
    }
    if !stats.error_previews.is_empty() {
        out.push_str("errors:\n");
        let mut codes: Vec<_> = stats.error_previews.keys().collect();
        codes.sort();
        for code in codes {
            let paths = &stats.error_previews[code];
            out.push_str(&format!("  {code}: {} shown\n", paths.len()));
            for path in paths {
                out.push_str(&format!("    {path}\n"));
            }
        }
    }
    out
}

pub fn render_json(stats: &GlobalStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}
