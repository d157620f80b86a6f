// SVG markup for charts and indicators
use crate::domain::dashboard::{ChartView, IndicatorView};
use std::fmt::Write;

/// Escape text for HTML/SVG content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a chart; `variant` adds kind-specific classes (e.g. `insulin`).
pub fn chart_svg(view: &ChartView, variant: &str) -> String {
    let plot = match view {
        ChartView::Empty { message } => {
            return format!(r#"<div class="chart-empty">{}</div>"#, escape(message));
        }
        ChartView::Plot(plot) => plot,
    };

    let (w, h, pad) = (plot.width, plot.height, plot.padding);
    let line_class = format!("chart-line {}-line", variant);
    let point_class = format!("chart-point {}-point", variant);
    let mut svg = String::new();

    // Writing into a String cannot fail, so results are ignored below
    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {w} {h}" preserveAspectRatio="none" class="chart-svg chart-{variant}" data-domain-min="{}" data-domain-max="{}" xmlns="http://www.w3.org/2000/svg">"#,
        plot.domain.0,
        plot.domain.1
    );
    let _ = write!(svg, r#"<rect x="0" y="0" width="{w}" height="{h}" class="chart-bg"/>"#);

    if let Some(band) = plot.band {
        let _ = write!(
            svg,
            r#"<rect x="{pad}" y="{:.2}" width="{}" height="{:.2}" class="chart-target-band"/>"#,
            band.top,
            w - pad * 2.0,
            band.bottom - band.top
        );
    }

    let _ = write!(
        svg,
        r#"<line x1="{pad}" y1="{0}" x2="{1}" y2="{0}" class="chart-axis"/><line x1="{pad}" y1="{pad}" x2="{pad}" y2="{0}" class="chart-axis"/>"#,
        h - pad,
        w - pad
    );

    for grid in &plot.gridlines {
        let _ = write!(
            svg,
            r#"<g><line x1="{}" y1="{y:.2}" x2="{}" y2="{y:.2}" class="chart-grid-line"/><text x="{}" y="{y:.2}" text-anchor="end" dominant-baseline="middle" class="chart-y-label">{}</text></g>"#,
            pad - 5.0,
            w - pad,
            pad - 10.0,
            escape(&grid.label),
            y = grid.y
        );
    }

    for label in &plot.x_labels {
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{}" text-anchor="middle" class="chart-x-label">{}</text>"#,
            label.x,
            h - pad + 14.0,
            escape(&label.text)
        );
    }

    let _ = write!(svg, r#"<path d="{}" class="{line_class}" fill="none"/>"#, plot.path);

    for point in &plot.points {
        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="4" class="{point_class}"><title>{}</title></circle>"#,
            point.x, point.y, point.value
        );
    }

    svg.push_str("</svg>");
    svg
}

const GAUGE_ARC: &str = "M 20 100 A 80 80 0 0 1 180 100";

/// Half-circle gauge; `percent` of the arc is stroked.
pub fn gauge_svg(view: &IndicatorView) -> String {
    format!(
        concat!(
            r#"<svg viewBox="0 0 200 110" class="gauge-svg gauge-{status}" xmlns="http://www.w3.org/2000/svg">"#,
            r#"<path class="gauge-arc-bg" d="{arc}" fill="none"/>"#,
            r#"<path class="gauge-arc-fill" d="{arc}" fill="none" pathLength="100" "#,
            r#"stroke-dasharray="100" stroke-dashoffset="{offset:.2}" stroke="{color}"/>"#,
            "</svg>"
        ),
        status = view.status.css_class(),
        arc = GAUGE_ARC,
        offset = view.arc_dash_offset(),
        color = view.status.accent(),
    )
}

/// Vertical meter rail filled from the bottom.
pub fn meter_svg(view: &IndicatorView) -> String {
    const RAIL_HEIGHT: f64 = 200.0;
    let fill = view.fill_percent() / 100.0 * RAIL_HEIGHT;
    let band_top = RAIL_HEIGHT
        - crate::domain::scale::scale(view.target_max.min(view.max), view.min, view.max, 0.0, RAIL_HEIGHT);
    let band_bottom = RAIL_HEIGHT
        - crate::domain::scale::scale(view.target_min.max(view.min), view.min, view.max, 0.0, RAIL_HEIGHT);

    format!(
        concat!(
            r#"<svg viewBox="0 0 40 {rail}" class="meter-svg meter-{status}" xmlns="http://www.w3.org/2000/svg">"#,
            r#"<rect x="0" y="0" width="40" height="{rail}" rx="6" class="meter-rail"/>"#,
            r#"<rect x="0" y="{band_top:.2}" width="40" height="{band_height:.2}" class="meter-target-band"/>"#,
            r#"<rect x="0" y="{fill_top:.2}" width="40" height="{fill:.2}" rx="6" class="meter-fill" fill="{color}"/>"#,
            "</svg>"
        ),
        rail = RAIL_HEIGHT,
        status = view.status.css_class(),
        band_top = band_top,
        band_height = band_bottom - band_top,
        fill_top = RAIL_HEIGHT - fill,
        fill = fill,
        color = view.status.accent(),
    )
}

/// Horizontal fill bar, used for the motor rotation readout.
pub fn bar_html(view: &IndicatorView, class: &str) -> String {
    format!(
        r#"<div class="{class}-bg"><div class="{class}-fill" style="width: {:.1}%"></div></div>"#,
        view.fill_percent()
    )
}
