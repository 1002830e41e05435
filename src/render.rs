use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tempfile::NamedTempFile;

use crate::color::ColorMap;
use crate::config::PlotConfig;
use crate::data::group::GroupSeries;
use crate::error::PlotError;

const FONT: &str = "sans-serif";

/// Largest magnitude kept on either axis (and smallest `m`, as its inverse).
/// Beyond this the decade arithmetic leaves the f64 range.
const PLOTTABLE_LIMIT: f64 = 1e150;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Draw one line per series (ascending `n`) on a log-x chart and write it to
/// `config.output` as PNG.
///
/// The file is replaced atomically: on any failure the previous file at that
/// path, if there was one, is left as it was.
pub fn render(groups: &[GroupSeries], config: &PlotConfig) -> Result<(), PlotError> {
    let out = &config.output;

    let buffer = draw_chart(groups, config).map_err(|e| PlotError::render(out, e))?;
    let image = RgbImage::from_raw(config.width, config.height, buffer)
        .context("pixel buffer does not match canvas size")
        .map_err(|e| PlotError::render(out, e))?;

    write_atomic(out, |w| {
        image
            .write_to(w, ImageFormat::Png)
            .context("encoding PNG")
    })
    .map_err(|e| PlotError::render(out, e))?;

    log::info!(
        "Wrote {}x{} chart with {} series to {}",
        config.width,
        config.height,
        groups.len(),
        out.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Chart drawing
// ---------------------------------------------------------------------------

/// Rasterise the chart into an RGB buffer of `width * height * 3` bytes.
fn draw_chart(groups: &[GroupSeries], config: &PlotConfig) -> Result<Vec<u8>> {
    let (width, height) = (config.width, config.height);
    let mut buffer = vec![255u8; width as usize * height as usize * 3];

    let series: Vec<(&GroupSeries, Vec<(f64, f64)>)> = groups
        .iter()
        .map(|g| (g, drawable_points(g)))
        .collect();
    let (x_range, y_range) = axis_ranges(series.iter().flat_map(|(_, p)| p.iter().copied()));
    log::debug!("x range {x_range:?} (log), y range {y_range:?}");

    let colors = ColorMap::new(groups.iter().map(|g| &g.n));

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(config.title.as_str(), (FONT, 26).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range.clone().log_scale(), y_range.clone())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str())
            .axis_desc_style((FONT, 18).into_font())
            .label_style((FONT, 14).into_font())
            .x_label_formatter(&|x| format!("{x:e}"))
            .draw()?;

        // Dashed grid on both axes, minor decades included.
        let major = BLACK.mix(0.35).stroke_width(1);
        let minor = BLACK.mix(0.15).stroke_width(1);
        for (x, is_major) in log_grid(&x_range) {
            chart.draw_series(DashedLineSeries::new(
                vec![(x, y_range.start), (x, y_range.end)],
                6,
                4,
                if is_major { major } else { minor },
            ))?;
        }
        for y in linear_ticks(&y_range, 8) {
            chart.draw_series(DashedLineSeries::new(
                vec![(x_range.start, y), (x_range.end, y)],
                6,
                4,
                major,
            ))?;
        }

        for (group, points) in &series {
            let color = colors.color_for(&group.n);
            let marker = config.marker_size;
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(config.line_width),
                ))?
                .label(group.label())
                .legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(-10, 0), (10, 0)], color.stroke_width(2))
                        + Circle::new((0, 0), marker, color.filled())
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, marker, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, 15).into_font())
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK.mix(0.4))
            .draw()?;

        root.present()?;
    }

    Ok(buffer)
}

/// Points that can sit on a log-x axis; the rest are dropped with a warning.
fn drawable_points(group: &GroupSeries) -> Vec<(f64, f64)> {
    let points: Vec<(f64, f64)> = group
        .points
        .iter()
        .copied()
        .filter(|&(m, t)| is_plottable(m, t))
        .collect();

    let skipped = group.points.len() - points.len();
    if skipped > 0 {
        log::warn!(
            "{}: skipped {skipped} point(s) with non-positive m or values outside ±{PLOTTABLE_LIMIT:e}",
            group.label()
        );
    }
    points
}

/// NaN and infinities fail every comparison here.
fn is_plottable(m: f64, time: f64) -> bool {
    (1.0 / PLOTTABLE_LIMIT..=PLOTTABLE_LIMIT).contains(&m)
        && (-PLOTTABLE_LIMIT..=PLOTTABLE_LIMIT).contains(&time)
}

/// X spans the decades enclosing the data; y starts at zero (or the most
/// negative time) with 5% headroom above the maximum.
fn axis_ranges(points: impl Iterator<Item = (f64, f64)>) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = 0.0f64;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() {
        return (1.0..10.0, 0.0..1.0);
    }

    let lo = 10f64.powi(x_min.log10().floor() as i32);
    let mut hi = 10f64.powi(x_max.log10().ceil() as i32);
    if hi <= lo {
        hi = lo * 10.0;
    }

    let y_hi = if y_max > y_min {
        y_max + (y_max - y_min) * 0.05
    } else {
        y_min + 1.0
    };

    let usable = |v: f64| v.is_finite() && v != 0.0;
    if !(usable(lo) && usable(hi) && y_min.is_finite() && y_hi.is_finite()) {
        log::warn!("axis range {lo}..{hi} / {y_min}..{y_hi} out of bounds; using defaults");
        return (1.0..10.0, 0.0..1.0);
    }

    (lo..hi, y_min..y_hi)
}

/// Grid positions on a log axis: `d * 10^k` for d in 1..=9, flagged major
/// when d == 1.
fn log_grid(range: &Range<f64>) -> Vec<(f64, bool)> {
    if !(range.start > 0.0 && range.end.is_finite() && range.start < range.end) {
        return Vec::new();
    }
    let first = range.start.log10().floor() as i32;
    let last = range.end.log10().ceil() as i32;
    let eps = range.end * 1e-9;

    let mut lines = Vec::new();
    for k in first..=last {
        let decade = 10f64.powi(k);
        for d in 1..=9 {
            let v = d as f64 * decade;
            if v >= range.start - eps && v <= range.end + eps {
                lines.push((v, d == 1));
            }
        }
    }
    lines
}

/// "Nice" tick positions (steps of 1, 2 or 5 × 10^k), at most `max_ticks`.
fn linear_ticks(range: &Range<f64>, max_ticks: usize) -> Vec<f64> {
    let span = range.end - range.start;
    if span.is_nan() || span <= 0.0 || max_ticks == 0 {
        return Vec::new();
    }

    let raw = span / max_ticks as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|f| f * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);

    let first = (range.start / step).ceil() as i64;
    let last = (range.end / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

// ---------------------------------------------------------------------------
// Atomic output
// ---------------------------------------------------------------------------

/// Write `path` by filling a temporary sibling file and renaming it into
/// place. The temporary file is removed if `write` or the rename fails.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().context("flushing image data")?;
    }
    tmp.as_file().sync_all().context("syncing image data")?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("moving image into place at {}", path.display()))?;
    Ok(())
}
