use riskdash_core::stats::PanelValue;

/// Abbreviate large counts: `45360` → `45.4K`, below ten thousand unchanged
pub fn format_count(n: u64) -> String {
    match n {
        n if n >= 1_000_000_000 => format!("{:0.1}B", n as f64 / 1_000_000_000.0),
        n if n >= 1_000_000 => format!("{:0.1}M", n as f64 / 1_000_000.0),
        n if n >= 10_000 => format!("{:0.1}K", n as f64 / 1_000.0),
        _ => n.to_string(),
    }
}

pub fn format_panel_value(value: &PanelValue) -> String {
    match value {
        PanelValue::Count(n) => format_count(*n),
        PanelValue::Score(score) => format!("{:.1}", score),
    }
}
