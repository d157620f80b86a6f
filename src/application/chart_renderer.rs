// Series chart renderer - one parameterized implementation for every chart kind
use crate::domain::dashboard::{
    AxisLabel, BandRect, ChartPlot, ChartView, Gridline, PlotPoint, SeriesPoint,
};
use crate::domain::scale::{scale, scale_index};
use std::fmt::Write;

pub const EMPTY_CHART_MESSAGE: &str = "No data available";

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const CHART_PADDING: f64 = 20.0;

/// How axis values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Shortest exact representation, e.g. `80` or `254.5`.
    Raw,
    Fixed(usize),
}

impl ValueFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueFormat::Raw => value.to_string(),
            ValueFormat::Fixed(digits) => format!("{:.*}", digits, value),
        }
    }
}

/// Static configuration of one chart kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// The effective domain never starts above this value.
    pub domain_floor: f64,
    /// The effective domain never ends below this value.
    pub domain_ceil: f64,
    /// Reference range kept visible and shaded, e.g. the glucose target range.
    pub band: Option<(f64, f64)>,
    /// Adds a gridline halfway through the domain when there is no band.
    pub midline: bool,
    pub format: ValueFormat,
}

impl ChartConfig {
    pub fn glucose() -> Self {
        Self {
            domain_floor: 80.0,
            domain_ceil: 180.0,
            band: Some((80.0, 140.0)),
            midline: false,
            format: ValueFormat::Raw,
        }
    }

    pub fn insulin() -> Self {
        Self {
            domain_floor: 0.0,
            domain_ceil: 4.0,
            band: None,
            midline: true,
            format: ValueFormat::Fixed(1),
        }
    }

    /// `[min(data_min, floor), max(data_max, ceil)]`
    pub fn effective_domain(&self, series: &[SeriesPoint]) -> (f64, f64) {
        series.iter().fold((self.domain_floor, self.domain_ceil), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        })
    }
}

#[derive(Debug, Clone)]
pub struct SeriesChartRenderer {
    config: ChartConfig,
    width: f64,
    height: f64,
    padding: f64,
}

impl SeriesChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            padding: CHART_PADDING,
        }
    }

    pub fn render(&self, series: &[SeriesPoint]) -> ChartView {
        if series.is_empty() {
            return ChartView::Empty {
                message: EMPTY_CHART_MESSAGE,
            };
        }

        let domain = self.config.effective_domain(series);
        let to_x = |index: usize| {
            scale_index(index, series.len(), self.padding, self.width - self.padding)
        };
        let to_y = |value: f64| {
            scale(value, domain.0, domain.1, self.height - self.padding, self.padding)
        };

        let points: Vec<PlotPoint> = series
            .iter()
            .enumerate()
            .map(|(i, p)| PlotPoint {
                x: to_x(i),
                y: to_y(p.value),
                value: p.value,
            })
            .collect();

        let mut path = String::new();
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                path.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            // Writing into a String cannot fail
            let _ = write!(path, "{} {:.2} {:.2}", cmd, point.x, point.y);
        }

        let gridlines = self
            .reference_values(domain)
            .into_iter()
            .map(|value| Gridline {
                y: to_y(value),
                label: self.config.format.format(value),
            })
            .collect();

        let x_labels = series
            .iter()
            .enumerate()
            .map(|(i, p)| AxisLabel {
                x: to_x(i),
                text: p.label.clone(),
            })
            .collect();

        let band = self.config.band.map(|(low, high)| BandRect {
            top: to_y(high),
            bottom: to_y(low),
        });

        ChartView::Plot(ChartPlot {
            width: self.width,
            height: self.height,
            padding: self.padding,
            domain,
            path,
            points,
            gridlines,
            x_labels,
            band,
        })
    }

    fn reference_values(&self, (min, max): (f64, f64)) -> Vec<f64> {
        let mut values = vec![min];
        match self.config.band {
            Some((low, high)) => {
                values.push(low);
                values.push(high);
            }
            None if self.config.midline => values.push((min + max) / 2.0),
            None => {}
        }
        values.push(max);
        values
    }
}
