//! SVG chart output: return histogram, crossover signals and equity curve.

use crate::domain::crossover::{CrossoverRun, EquityPoint, PositionChange};
use crate::domain::error::FxError;
use crate::domain::ohlcv::PriceSeries;
use crate::ports::report_port::{CrossoverReport, MomentumReport, ReportPort};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const HISTOGRAM_BINS: usize = 15;

pub const MOMENTUM_RETURNS_FILE: &str = "momentum_returns.svg";
pub const CROSSOVER_SIGNALS_FILE: &str = "crossover_signals.svg";
pub const CROSSOVER_EQUITY_FILE: &str = "crossover_equity.svg";

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;

pub struct SvgReportAdapter {
    output_dir: PathBuf,
}

impl SvgReportAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write_chart(&self, file_name: &str, svg: &str) -> Result<(), FxError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, svg).map_err(|e| FxError::Report {
            reason: format!("failed to write {}: {e}", path.display()),
        })?;
        info!("chart written to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate range: widen to a unit interval around the value.
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, min + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Maps data coordinates into the padded plot area.
struct Frame {
    min_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Frame {
    fn new<I: IntoIterator<Item = f64>>(points: usize, ys: I) -> Self {
        let (min_y, max_y) = ys
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min_y, max_y) = if min_y.is_finite() {
            (min_y, max_y)
        } else {
            (0.0, 1.0)
        };

        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = max_y - min_y;
        Frame {
            min_y,
            scale_x: if points > 1 {
                plot_width / (points - 1) as f64
            } else {
                0.0
            },
            scale_y: if range > 0.0 {
                plot_height / range
            } else {
                1.0
            },
        }
    }

    fn x(&self, i: usize) -> f64 {
        PADDING + i as f64 * self.scale_x
    }

    fn y(&self, v: f64) -> f64 {
        HEIGHT - PADDING - (v - self.min_y) * self.scale_y
    }
}

fn svg_open(title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH:.0}\" height=\"{HEIGHT:.0}\" viewBox=\"0 0 {WIDTH:.0} {HEIGHT:.0}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         <text x=\"{:.0}\" y=\"{:.0}\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n\
         <line x1=\"{PADDING:.0}\" y1=\"{PADDING:.0}\" x2=\"{PADDING:.0}\" y2=\"{:.0}\" stroke=\"black\"/>\n\
         <line x1=\"{PADDING:.0}\" y1=\"{:.0}\" x2=\"{:.0}\" y2=\"{:.0}\" stroke=\"black\"/>\n",
        WIDTH / 2.0,
        PADDING / 2.0,
        escape(title),
        HEIGHT - PADDING,
        HEIGHT - PADDING,
        WIDTH - PADDING,
        HEIGHT - PADDING,
    )
}

fn axis_labels(x_label: &str, y_label: &str) -> String {
    format!(
        "<text x=\"{:.0}\" y=\"{:.0}\" text-anchor=\"middle\" font-size=\"12\">{}</text>\n\
         <text x=\"15\" y=\"{:.0}\" text-anchor=\"middle\" font-size=\"12\" transform=\"rotate(-90 15 {:.0})\">{}</text>\n",
        WIDTH / 2.0,
        HEIGHT - 10.0,
        escape(x_label),
        HEIGHT / 2.0,
        HEIGHT / 2.0,
        escape(y_label),
    )
}

fn polyline(points: &[(f64, f64)], stroke: &str, dashed: bool) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect();
    let dash = if dashed {
        " stroke-dasharray=\"6 3\""
    } else {
        ""
    };
    format!(
        "<polyline fill=\"none\" stroke=\"{stroke}\" stroke-width=\"1\"{dash} points=\"{}\"/>\n",
        coords.join(" ")
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn format_returns_histogram(returns: &[f64]) -> String {
    let bins = histogram(returns, HISTOGRAM_BINS);
    let mut svg = svg_open("Distribution of Daily Returns (London FX Momentum)");
    svg.push_str(&axis_labels("Daily Return", "Frequency"));

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    if max_count > 0 {
        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let bar_width = plot_width / bins.len() as f64;
        for (i, bin) in bins.iter().enumerate() {
            let h = bin.count as f64 / max_count as f64 * plot_height;
            svg.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"steelblue\" stroke=\"black\"><title>{:.5} to {:.5}: {}</title></rect>\n",
                PADDING + i as f64 * bar_width,
                HEIGHT - PADDING - h,
                bar_width,
                h,
                bin.lower,
                bin.upper,
                bin.count
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn format_signal_chart(series: &PriceSeries, run: &CrossoverRun) -> String {
    let bars = series.bars();
    let frame = Frame::new(
        bars.len(),
        bars.iter().map(|b| b.close).chain(
            run.fast
                .values
                .iter()
                .chain(run.slow.values.iter())
                .filter(|p| p.valid)
                .map(|p| p.value),
        ),
    );

    let line = |values: &mut dyn Iterator<Item = (usize, Option<f64>)>| -> Vec<(f64, f64)> {
        values
            .filter_map(|(i, v)| v.map(|v| (frame.x(i), frame.y(v))))
            .collect()
    };

    let mut svg = svg_open(&format!("{} SMA Crossover Strategy", series.symbol()));
    svg.push_str(&axis_labels("Date", "Price"));
    svg.push_str(&polyline(
        &line(&mut bars.iter().map(|b| Some(b.close)).enumerate()),
        "gray",
        false,
    ));
    svg.push_str(&polyline(
        &line(&mut (0..run.fast.len()).map(|i| (i, run.fast.value_at(i)))),
        "orange",
        true,
    ));
    svg.push_str(&polyline(
        &line(&mut (0..run.slow.len()).map(|i| (i, run.slow.value_at(i)))),
        "purple",
        true,
    ));

    for (i, point) in run.signals.iter().enumerate() {
        let Some(change) = point.change else {
            continue;
        };
        let anchor = run
            .fast
            .value_at(i)
            .or_else(|| bars.get(i).map(|b| b.close))
            .unwrap_or(frame.min_y);
        let (glyph, color) = match change {
            PositionChange::Enter => ("▲", "green"),
            PositionChange::Exit => ("▼", "red"),
        };
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\" fill=\"{color}\">{glyph}</text>\n",
            frame.x(i),
            frame.y(anchor) + 5.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn format_equity_chart(symbol: &str, equity_curve: &[EquityPoint]) -> String {
    let frame = Frame::new(equity_curve.len(), equity_curve.iter().map(|p| p.equity));
    let points: Vec<(f64, f64)> = equity_curve
        .iter()
        .enumerate()
        .map(|(i, p)| (frame.x(i), frame.y(p.equity)))
        .collect();

    let mut svg = svg_open(&format!("{symbol} Strategy Performance"));
    svg.push_str(&axis_labels("Date", "Equity (Growth of $1)"));
    svg.push_str(&polyline(&points, "blue", false));
    svg.push_str("</svg>\n");
    svg
}

impl ReportPort for SvgReportAdapter {
    fn report_momentum(&self, report: &MomentumReport<'_>) -> Result<(), FxError> {
        self.write_chart(
            MOMENTUM_RETURNS_FILE,
            &format_returns_histogram(&report.run.returns()),
        )
    }

    fn report_crossover(&self, report: &CrossoverReport<'_>) -> Result<(), FxError> {
        self.write_chart(
            CROSSOVER_SIGNALS_FILE,
            &format_signal_chart(report.series, report.run),
        )?;
        self.write_chart(
            CROSSOVER_EQUITY_FILE,
            &format_equity_chart(report.series.symbol(), &report.run.equity_curve),
        )
    }
}
