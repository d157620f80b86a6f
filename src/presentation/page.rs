// Dashboard page layout
use crate::domain::dashboard::{DashboardView, IndicatorView};
use crate::presentation::svg::{bar_html, chart_svg, escape, gauge_svg};

const STYLES: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
.app-header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #111827; }
.logo { font-weight: 700; font-size: 1.4rem; }
.demo-badge { letter-spacing: 0.2em; color: #a855f7; }
.nav-btn { border: none; border-radius: 6px; padding: 0.5rem 1rem; font-weight: 600; background: #1f2937; color: inherit; }
.btn-start { background: #16a34a; } .btn-stop { background: #dc2626; }
.vertical-panels-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; padding: 1rem 2rem; }
.vertical-panel { background: #111827; border-radius: 12px; padding: 1rem; display: flex; flex-direction: column; }
.chart-svg { width: 100%; height: 200px; } .chart-bg { fill: #0b1220; }
.chart-target-band { fill: rgba(34, 197, 94, 0.12); } .chart-axis, .chart-grid-line { stroke: #334155; }
.chart-line { stroke: #38bdf8; stroke-width: 2; } .insulin-line { stroke: #a855f7; }
.chart-point { fill: #38bdf8; } .insulin-point { fill: #a855f7; }
.chart-y-label, .chart-x-label { fill: #94a3b8; font-size: 10px; }
.chart-empty { padding: 2rem; text-align: center; color: #64748b; }
.gauge-svg { width: 100%; } .gauge-arc-bg { stroke: #1e293b; stroke-width: 14; } .gauge-arc-fill { stroke-width: 14; stroke-linecap: round; }
.gauge-center { text-align: center; } .gauge-value { font-size: 2rem; font-weight: 700; }
.mechanic-box { background: #0b1220; border-radius: 8px; padding: 0.75rem; margin-top: 0.5rem; }
.rotation-bar-bg { height: 8px; background: #1e293b; border-radius: 4px; } .rotation-bar-fill { height: 8px; background: #3b82f6; border-radius: 4px; }
.cooler-active { background: #2563eb; } button[disabled] { opacity: 0.5; }
"#;

fn post_button(action: &str, class: &str, label: &str, enabled: bool) -> String {
    format!(
        r#"<form method="post" action="/commands/{action}?redirect=1"><button class="{class}" type="submit"{}>{}</button></form>"#,
        if enabled { "" } else { " disabled" },
        escape(label)
    )
}

fn gauge_block(gauge: &IndicatorView) -> String {
    let value = gauge
        .value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "--".to_string());
    format!(
        r#"<div class="gauge-root gauge-{}"><div class="gauge-header"><span class="gauge-label">Current Glucose</span><span class="gauge-time">Now</span></div>{}<div class="gauge-center"><div class="gauge-value">{}</div><div class="gauge-unit">mg/dL</div><div class="gauge-status-chip">{}</div></div></div>"#,
        gauge.status.css_class(),
        gauge_svg(gauge),
        value,
        gauge.status.label()
    )
}

pub fn render_page(view: &DashboardView) -> String {
    let header = &view.header;
    let glucose = &view.glucose;
    let algorithm = &view.algorithm;
    let mechanics = &view.mechanics;

    let toggle_class = if header.is_running { "nav-btn btn-stop" } else { "nav-btn btn-start" };
    let cooler_class = if mechanics.cooler_active { "cooler-btn cooler-active" } else { "cooler-btn" };
    let temp_color = if mechanics.cooler_active { "#60a5fa" } else { "#e2e8f0" };
    let motor_dot = if mechanics.motor_active { "#3b82f6" } else { "#22c55e" };

    let mut html = String::with_capacity(16 * 1024);
    html.push_str(r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta http-equiv="refresh" content="1"><title>Glucodose</title><style>"#);
    html.push_str(STYLES);
    html.push_str("</style></head><body>");

    html.push_str(&format!(
        r#"<header class="app-header"><div class="logo">Glucodose</div><div class="demo-badge">DEMO VERSION</div><div style="display: flex; gap: 1rem; align-items: center">{}<span class="nav-btn" style="color: {}">{}</span></div></header>"#,
        post_button("toggle", toggle_class, header.toggle_label, true),
        header.connection_accent,
        header.connection_label
    ));

    html.push_str(r#"<main class="app-main"><section class="card stats-card"><h2>Monitor Panel</h2><div class="vertical-panels-grid">"#);

    html.push_str(&format!(
        r#"<div class="vertical-panel"><h3 class="panel-title">Glucose Trend</h3>{}<div class="chart-wrapper">{}</div><div class="chart-legend-bottom"><span class="legend-dot legend-glucose"></span> Live BG</div></div>"#,
        gauge_block(&glucose.gauge),
        chart_svg(&glucose.chart, "glucose")
    ));

    html.push_str(&format!(
        r#"<div class="vertical-panel"><h3 class="panel-title">Gluco-1 (Algorithm)</h3><div class="chart-wrapper">{}</div><div class="panel-notes"><strong>Decision Logic:</strong><br>{}</div><div class="delivery-stats"><div class="delivery-item"><span class="item-label">Active IOB</span> <span class="item-value">{}</span></div><div class="delivery-item"><span class="item-label">Predicted BG</span> <span class="item-value" style="color: {}">{}</span></div><div class="delivery-item"><span class="item-label">Sug. Basal Rate</span> <span class="item-value">{}</span></div></div></div>"#,
        chart_svg(&algorithm.chart, "insulin"),
        escape(&algorithm.reason),
        algorithm.iob,
        algorithm.predicted_accent,
        algorithm.predicted_bg,
        algorithm.suggested_basal
    ));

    html.push_str(&format!(
        r#"<div class="vertical-panel"><h3 class="panel-title">Device Mechanics</h3><div class="loop-status"><span class="loop-dot" style="background: {}">&#9679;</span> Motor: {}</div><div class="mechanic-box"><div class="mechanic-label">Motor Rotation</div><div class="mechanic-big-value">{} <span class="mechanic-unit">rot</span></div>{}</div><div class="mechanic-box small"><div class="mechanic-label">Enc. Pulses</div><div class="mechanic-mid-value">{}</div></div><div class="mechanic-box small"><div class="mechanic-label">Plunger</div><div class="mechanic-mid-value">{} <span class="mechanic-unit-sm">mm</span></div></div><div class="mechanic-box"><div class="mechanic-label">Insulin Temp</div><div style="font-size: 1.4rem; font-weight: bold; color: {}">{}</div>{}</div>{}</div>"#,
        motor_dot,
        mechanics.motor_label,
        mechanics.rotations,
        bar_html(&mechanics.rotation_bar, "rotation-bar"),
        mechanics.pulses,
        mechanics.plunger_mm,
        temp_color,
        mechanics.insulin_temp,
        post_button("cooler", cooler_class, "❄️ COOL", true),
        post_button("spike", "view-history-btn", "INITIATE SEQUENCE", mechanics.spike_enabled)
    ));

    html.push_str(r#"</div></section></main><footer class="app-footer"><span>Glucodose System</span></footer></body></html>"#);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::domain::connection::ConnectionState;
    use crate::domain::telemetry::TelemetrySnapshot;

    #[test]
    fn test_idle_page() {
        let view = DashboardService::new().build(&TelemetrySnapshot::default(), ConnectionState::Connecting);
        let html = render_page(&view);

        assert!(html.contains("Connecting..."));
        assert!(html.contains("▶ START"));
        assert!(html.contains("Waiting..."));
        assert_eq!(html.matches("No data available").count(), 2);
        assert!(html.contains(r#"type="submit" disabled>INITIATE SEQUENCE"#));
    }

    #[test]
    fn test_reason_is_escaped() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.latest_recommendation.reason = "Pred 85 < 90. Suspending.".to_string();
        let view = DashboardService::new().build(&snapshot, ConnectionState::Connected);

        assert!(render_page(&view).contains("Pred 85 &lt; 90. Suspending."));
    }
}
