use chainwatch_protocol::constants::{
    BLOCK_HASH_DISPLAY_LEN, ELLIPSIS, SUMMARY_HASH_DISPLAY_LEN, TXID_DISPLAY_LEN,
};

/// Display-only prefix of `value` followed by the ellipsis marker.
pub fn truncate_display(value: &str, len: usize) -> String {
    let prefix = value.chars().take(len).collect::<String>();
    format!("{prefix}{ELLIPSIS}")
}

pub fn short_hash(hash: &str) -> String {
    truncate_display(hash, BLOCK_HASH_DISPLAY_LEN)
}

pub fn short_txid(txid: &str) -> String {
    truncate_display(txid, TXID_DISPLAY_LEN)
}

pub fn short_tip_hash(hash: &str) -> String {
    truncate_display(hash, SUMMARY_HASH_DISPLAY_LEN)
}

/// Plain prefix without the marker, used inside notices.
pub fn txid_prefix(txid: &str) -> String {
    txid.chars().take(TXID_DISPLAY_LEN).collect()
}

pub fn fmt_block_time(ts_secs: f64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis((ts_secs * 1000.0) as i64)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_owned())
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
