//! Bar-chart generation: parse comma-separated values/labels, compute bar
//! geometry, and rasterize to a PNG.

use std::path::PathBuf;

use crate::error::{OffgenError, OffgenResult};
use crate::fonts::FontMeasurer;
use crate::output::OutputDir;
use crate::raster::{FrameRgba, Raster, save_png};

/// Default figure size: a 6x4 inch figure at 100 dpi.
pub const CHART_WIDTH: u32 = 600;
/// See [`CHART_WIDTH`].
pub const CHART_HEIGHT: u32 = 400;

const BAR_RGBA: [u8; 4] = [135, 206, 235, 255]; // sky blue
const AXIS_RGBA: [u8; 4] = [64, 64, 64, 255];
const TEXT_RGBA: [u8; 4] = [0, 0, 0, 255];
const TITLE_SIZE_PX: u32 = 16;
const LABEL_SIZE_PX: u32 = 12;

/// Validated bar-chart description.
#[derive(Clone, Debug)]
pub struct BarChart {
    /// Bar values, one per bar. Negatives extend below the zero baseline.
    pub values: Vec<i64>,
    /// One label per bar.
    pub labels: Vec<String>,
    /// Title drawn centered above the plot.
    pub title: String,
}

impl BarChart {
    /// Build a chart from parsed values and optional labels.
    ///
    /// Missing labels default to `Item {i}`; provided labels must match the
    /// value count.
    pub fn new(values: Vec<i64>, labels: Option<Vec<String>>) -> OffgenResult<Self> {
        if values.is_empty() {
            return Err(OffgenError::validation("chart needs at least one value"));
        }
        let labels = match labels {
            Some(labels) => {
                if labels.len() != values.len() {
                    return Err(OffgenError::validation(format!(
                        "got {} labels for {} values",
                        labels.len(),
                        values.len()
                    )));
                }
                labels
            }
            None => (0..values.len()).map(|i| format!("Item {i}")).collect(),
        };
        Ok(Self {
            values,
            labels,
            title: "Bar Chart".to_string(),
        })
    }
}

/// Parse comma-separated integer values, trimming whitespace.
pub fn parse_values(input: &str) -> OffgenResult<Vec<i64>> {
    input
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| OffgenError::validation(format!("invalid chart value '{}'", v.trim())))
        })
        .collect()
}

/// Parse comma-separated labels; an empty/blank input means "no labels".
pub fn parse_labels(input: &str) -> Option<Vec<String>> {
    if input.trim().is_empty() {
        return None;
    }
    Some(input.split(',').map(|l| l.trim().to_string()).collect())
}

/// Plot rectangle in pixel space (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

/// One bar rectangle plus the slot center used for its label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Horizontal center of the bar's slot.
    pub slot_center_x: f64,
}

/// Compute bar rectangles and the zero-baseline y for `values` inside `plot`.
///
/// Values scale linearly between `min(values, 0)` and `max(values, 0)` so the
/// zero baseline is always inside the plot. Each bar takes 80% of its slot.
pub fn bar_geometry(values: &[i64], plot: PlotArea) -> (Vec<BarRect>, f64) {
    let vmax = values.iter().copied().max().unwrap_or(0).max(0) as f64;
    let vmin = values.iter().copied().min().unwrap_or(0).min(0) as f64;
    let span = (vmax - vmin).max(1.0);

    let map_y = |v: f64| plot.y + (vmax - v) / span * plot.h;
    let baseline = map_y(0.0);

    let n = values.len().max(1) as f64;
    let slot = plot.w / n;
    let bar_w = slot * 0.8;

    let bars = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = plot.x + i as f64 * slot + slot * 0.1;
            let vy = map_y(v as f64);
            BarRect {
                x,
                y: vy.min(baseline),
                w: bar_w,
                h: (vy - baseline).abs(),
                slot_center_x: plot.x + i as f64 * slot + slot / 2.0,
            }
        })
        .collect();

    (bars, baseline)
}

/// Rasterize a chart onto an in-memory frame.
pub fn render_chart(chart: &BarChart, font: &mut FontMeasurer) -> OffgenResult<FrameRgba> {
    let width = CHART_WIDTH;
    let height = CHART_HEIGHT;
    let plot = PlotArea {
        x: 40.0,
        y: 50.0,
        w: f64::from(width) - 60.0,
        h: f64::from(height) - 100.0,
    };

    let mut raster = Raster::new(width, height, [255, 255, 255, 255])?;

    let (bars, baseline) = bar_geometry(&chart.values, plot);
    for bar in &bars {
        raster.fill_rect(bar.x, bar.y, bar.w, bar.h, BAR_RGBA);
    }
    raster.fill_rect(plot.x, baseline - 0.5, plot.w, 1.0, AXIS_RGBA);

    raster.draw_text_centered(
        font,
        &chart.title,
        f64::from(width) / 2.0,
        14.0,
        TITLE_SIZE_PX,
        TEXT_RGBA,
    );
    for (bar, label) in bars.iter().zip(&chart.labels) {
        raster.draw_text_centered(
            font,
            label,
            bar.slot_center_x,
            plot.y + plot.h + 8.0,
            LABEL_SIZE_PX,
            TEXT_RGBA,
        );
    }

    raster.finish()
}

/// Render `chart` and write it as `chart_*.png` under `out`.
pub fn write_chart(
    chart: &BarChart,
    font_path: &std::path::Path,
    out: &OutputDir,
) -> OffgenResult<PathBuf> {
    let mut font = FontMeasurer::load_or_fallback(font_path);
    let frame = render_chart(chart, &mut font)?;
    let path = out.unique_path("chart", "png");
    save_png(&frame, &path)?;
    tracing::info!(path = %path.display(), bars = chart.values.len(), "wrote bar chart");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_values_accepts_padded_integers() {
        assert_eq!(parse_values("5, 3 ,7,2").unwrap(), vec![5, 3, 7, 2]);
    }

    #[test]
    fn parse_values_rejects_junk() {
        assert!(parse_values("5,x,7").is_err());
        assert!(parse_values("").is_err());
    }

    #[test]
    fn labels_default_to_item_n() {
        let chart = BarChart::new(vec![1, 2], None).unwrap();
        assert_eq!(chart.labels, vec!["Item 0", "Item 1"]);
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        assert!(BarChart::new(vec![1, 2], Some(vec!["only one".into()])).is_err());
    }

    const PLOT: PlotArea = PlotArea {
        x: 0.0,
        y: 0.0,
        w: 100.0,
        h: 100.0,
    };

    #[test]
    fn all_positive_values_put_the_baseline_at_the_plot_bottom() {
        let (bars, baseline) = bar_geometry(&[1, 2, 4], PLOT);
        assert_eq!(baseline, 100.0);
        // The tallest bar spans the full plot height.
        assert_eq!(bars[2].y, 0.0);
        assert_eq!(bars[2].h, 100.0);
        // Bars scale linearly against the maximum.
        assert!((bars[0].h - 25.0).abs() < 1e-9);
        assert!((bars[1].h - 50.0).abs() < 1e-9);
    }

    #[test]
    fn negative_values_extend_below_an_interior_baseline() {
        let (bars, baseline) = bar_geometry(&[2, -2], PLOT);
        assert_eq!(baseline, 50.0);
        assert_eq!(bars[0].y, 0.0);
        assert!((bars[0].h - 50.0).abs() < 1e-9);
        // The negative bar hangs off the baseline.
        assert_eq!(bars[1].y, baseline);
        assert!((bars[1].h - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bars_occupy_80_percent_of_their_slot() {
        let (bars, _) = bar_geometry(&[1, 1, 1, 1], PLOT);
        for bar in &bars {
            assert!((bar.w - 20.0).abs() < 1e-9);
        }
        assert!((bars[0].slot_center_x - 12.5).abs() < 1e-9);
    }

    #[test]
    fn all_zero_values_still_have_a_baseline_inside_the_plot() {
        let (bars, baseline) = bar_geometry(&[0, 0], PLOT);
        assert!(baseline >= PLOT.y && baseline <= PLOT.y + PLOT.h);
        for bar in &bars {
            assert_eq!(bar.h, 0.0);
        }
    }
}
