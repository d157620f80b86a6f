// Scalar indicator renderer - shared clamp/scale/classify for gauges and meters
use crate::domain::dashboard::{IndicatorStatus, IndicatorView};
use crate::domain::scale::scale;

/// Length of the gauge arc, expressed as an SVG `pathLength`.
pub const GAUGE_ARC_LENGTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub min: f64,
    pub max: f64,
    pub target_min: f64,
    pub target_max: f64,
}

impl IndicatorConfig {
    /// Gauge shown on the glucose panel, widened to 400 for high-BG scenarios.
    pub fn glucose_gauge() -> Self {
        Self {
            min: 40.0,
            max: 400.0,
            target_min: 80.0,
            target_max: 160.0,
        }
    }

    pub fn glucose_meter() -> Self {
        Self {
            min: 40.0,
            max: 250.0,
            target_min: 80.0,
            target_max: 160.0,
        }
    }

    /// Motor rotation bar; there is no target band so everything is in range.
    pub fn rotation_bar() -> Self {
        Self {
            min: 0.0,
            max: 1.5,
            target_min: f64::NEG_INFINITY,
            target_max: f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarIndicatorRenderer {
    config: IndicatorConfig,
}

impl ScalarIndicatorRenderer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, value: Option<f64>) -> IndicatorView {
        let IndicatorConfig {
            min,
            max,
            target_min,
            target_max,
        } = self.config;

        let raw = value.unwrap_or(0.0);
        let clamped = raw.max(min).min(max);
        let percent = scale(clamped, min, max, 0.0, 100.0);

        // Classification looks at the raw value so off-scale readings still classify
        let status = if raw < target_min {
            IndicatorStatus::Low
        } else if raw > target_max {
            IndicatorStatus::High
        } else {
            IndicatorStatus::InRange
        };

        IndicatorView {
            value,
            percent,
            status,
            min,
            max,
            target_min,
            target_max,
        }
    }
}

impl IndicatorView {
    /// Dash offset that leaves `percent` of the gauge arc visible.
    pub fn arc_dash_offset(&self) -> f64 {
        GAUGE_ARC_LENGTH - self.percent / 100.0 * GAUGE_ARC_LENGTH
    }

    /// Fill height (or width) of a meter bar, in percent of the rail.
    pub fn fill_percent(&self) -> f64 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> ScalarIndicatorRenderer {
        ScalarIndicatorRenderer::new(IndicatorConfig::glucose_meter())
    }

    #[test]
    fn test_clamps_to_scale() {
        assert_eq!(meter().render(Some(40.0)).percent, 0.0);
        assert_eq!(meter().render(Some(12.0)).percent, 0.0);
        assert_eq!(meter().render(Some(250.0)).percent, 100.0);
        assert_eq!(meter().render(Some(900.0)).percent, 100.0);
        assert_eq!(meter().render(Some(145.0)).percent, 50.0);
    }

    #[test]
    fn test_classifies_raw_value() {
        let high = meter().render(Some(500.0));
        assert_eq!(high.percent, 100.0);
        assert_eq!(high.status, IndicatorStatus::High);
        assert_eq!(high.status.label(), "Above range");

        let low = meter().render(Some(-10.0));
        assert_eq!(low.percent, 0.0);
        assert_eq!(low.status, IndicatorStatus::Low);
        assert_eq!(low.status.label(), "Below range");

        let ok = meter().render(Some(120.0));
        assert_eq!(ok.status, IndicatorStatus::InRange);
        assert_eq!(ok.status.label(), "In target range");
    }

    #[test]
    fn test_target_edges_are_in_range() {
        assert_eq!(meter().render(Some(80.0)).status, IndicatorStatus::InRange);
        assert_eq!(meter().render(Some(160.0)).status, IndicatorStatus::InRange);
    }

    #[test]
    fn test_missing_value_reads_as_zero() {
        let view = meter().render(None);
        assert_eq!(view.value, None);
        assert_eq!(view.percent, 0.0);
        assert_eq!(view.status, IndicatorStatus::Low);
    }

    #[test]
    fn test_gauge_and_meter_presentation() {
        let view = meter().render(Some(145.0));
        assert_eq!(view.arc_dash_offset(), 50.0);
        assert_eq!(view.fill_percent(), 50.0);
    }

    #[test]
    fn test_rotation_bar_caps_at_full() {
        let bar = ScalarIndicatorRenderer::new(IndicatorConfig::rotation_bar());
        assert_eq!(bar.render(Some(0.75)).percent, 50.0);
        assert_eq!(bar.render(Some(3.0)).percent, 100.0);
        assert_eq!(bar.render(Some(3.0)).status, IndicatorStatus::InRange);
    }
}
