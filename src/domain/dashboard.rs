// Dashboard view models - everything the page needs, derived from one snapshot

/// One sample as the chart sees it: a time label and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub text: String,
}

/// Vertical extent of the reference band, in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRect {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlot {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub domain: (f64, f64),
    pub path: String,
    pub points: Vec<PlotPoint>,
    pub gridlines: Vec<Gridline>,
    pub x_labels: Vec<AxisLabel>,
    pub band: Option<BandRect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Empty { message: &'static str },
    Plot(ChartPlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStatus {
    Low,
    InRange,
    High,
}

impl IndicatorStatus {
    pub fn label(self) -> &'static str {
        match self {
            IndicatorStatus::Low => "Below range",
            IndicatorStatus::InRange => "In target range",
            IndicatorStatus::High => "Above range",
        }
    }

    /// CSS class suffix (`gauge-low`, `meter-in-range`, ...).
    pub fn css_class(self) -> &'static str {
        match self {
            IndicatorStatus::Low => "low",
            IndicatorStatus::InRange => "in-range",
            IndicatorStatus::High => "high",
        }
    }

    pub fn accent(self) -> &'static str {
        match self {
            IndicatorStatus::Low => "#f97316",
            IndicatorStatus::InRange => "#22c55e",
            IndicatorStatus::High => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorView {
    /// Raw value, `None` when nothing has been reported.
    pub value: Option<f64>,
    pub percent: f64,
    pub status: IndicatorStatus,
    pub min: f64,
    pub max: f64,
    pub target_min: f64,
    pub target_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub toggle_label: &'static str,
    pub is_running: bool,
    pub connection_label: &'static str,
    pub connection_accent: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlucosePanel {
    pub gauge: IndicatorView,
    pub meter: IndicatorView,
    pub chart: ChartView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmPanel {
    pub chart: ChartView,
    pub reason: String,
    pub iob: String,
    pub predicted_bg: String,
    pub predicted_accent: &'static str,
    pub suggested_basal: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MechanicsPanel {
    pub motor_label: &'static str,
    pub motor_active: bool,
    pub rotations: String,
    pub rotation_bar: IndicatorView,
    pub pulses: String,
    pub plunger_mm: String,
    pub insulin_temp: String,
    pub cooler_active: bool,
    pub spike_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub header: HeaderView,
    pub glucose: GlucosePanel,
    pub algorithm: AlgorithmPanel,
    pub mechanics: MechanicsPanel,
}
