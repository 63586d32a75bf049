//! Hand-off of fitted lines to a plotting backend.
//!
//! The fit never reads from the sink; it only pushes error-barred points and
//! straight lines into it. Figure settings live in the sink's [`PlotConfig`].

use lm_core::Real;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset2D;
use crate::error::FitResult;
use crate::linreg::{FitConfig, RegressionResult, fit_with_dy};

/// Axis scaling of a figure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    LinLin,
    LinLog,
    LogLin,
    LogLog,
}

/// Figure settings, held by a sink rather than shared globally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
}

/// Points with error bars in both directions.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSeries {
    pub label: String,
    pub x: Vec<Real>,
    pub y: Vec<Real>,
    pub dy: Vec<Real>,
    pub dx: Vec<Real>,
}

/// Polyline through `(x, y)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub x: Vec<Real>,
    pub y: Vec<Real>,
}

/// Receiver of plot primitives.
pub trait PlotSink {
    fn config(&self) -> &PlotConfig;

    fn plot_data(&mut self, series: DataSeries);

    fn plot_line(&mut self, line: LineSeries);
}

/// Sink that keeps every series in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub config: PlotConfig,
    pub data: Vec<DataSeries>,
    pub lines: Vec<LineSeries>,
}

impl RecordingSink {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl PlotSink for RecordingSink {
    fn config(&self) -> &PlotConfig {
        &self.config
    }

    fn plot_data(&mut self, series: DataSeries) {
        self.data.push(series);
    }

    fn plot_line(&mut self, line: LineSeries) {
        self.lines.push(line);
    }
}

fn argmin_argmax(x: &[Real]) -> (usize, usize) {
    let mut lo = 0;
    let mut hi = 0;
    for (i, &v) in x.iter().enumerate() {
        if v < x[lo] {
            lo = i;
        }
        if v > x[hi] {
            hi = i;
        }
    }
    (lo, hi)
}

/// Fit the dataset and draw points, line of best fit and line of uncertainty.
///
/// Lines span from the smallest x minus its uncertainty to the largest x plus
/// its uncertainty. The points carry the y-uncertainties used in the final
/// pass. A non-empty `graph_name` prefixes every label.
pub fn linreg_plot(
    data: &Dataset2D,
    config: &FitConfig,
    sink: &mut dyn PlotSink,
    graph_name: &str,
) -> FitResult<RegressionResult> {
    let (result, dy) = fit_with_dy(data, config)?;

    let x = data.x();
    let dx = data
        .dx()
        .map_or_else(|| vec![0.0; x.len()], <[Real]>::to_vec);
    let (lo, hi) = argmin_argmax(x);
    let span = vec![x[lo] - dx[lo], x[hi] + dx[hi]];

    let prefix = if graph_name.is_empty() {
        String::new()
    } else {
        format!("{}: ", graph_name)
    };
    let data_label = if graph_name.is_empty() {
        String::new()
    } else {
        format!("{}data points", prefix)
    };

    sink.plot_data(DataSeries {
        label: data_label,
        x: x.to_vec(),
        y: data.y().to_vec(),
        dy,
        dx,
    });
    sink.plot_line(LineSeries {
        label: format!("{}line of best fit", prefix),
        x: span.clone(),
        y: span.iter().map(|&v| result.eval(v)).collect(),
    });
    sink.plot_line(LineSeries {
        label: format!("{}line of uncertainty", prefix),
        y: span.iter().map(|&v| result.eval_uncertainty_line(v)).collect(),
        x: span,
    });

    Ok(result)
}
