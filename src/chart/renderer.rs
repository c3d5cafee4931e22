//! Bar chart renderer.
//!
//! Draws one single-series bar chart per call: labels on a categorical
//! x-axis in grouping order, one bar per group holding the summed value,
//! y-axis starting at zero. The visual style is the dashboard's house
//! style and is fixed per run.

use crate::analysis::{sum_by, Grouping};
use crate::chart::{ChartError, OutputFormat, Surface};
use crate::models::RenderedChart;
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use tracing::debug;

/// Fraction of a category slot a bar occupies.
const BAR_WIDTH: f64 = 0.8;

/// Visual style of rendered bar charts.
#[derive(Debug, Clone)]
pub struct BarChartStyle {
    /// Label of the single data series, shown in the legend.
    pub series_label: String,
    /// Fill color of the bars.
    pub fill: RGBColor,
    /// Opacity of the fill.
    pub fill_alpha: f64,
    /// Outline color of the bars.
    pub stroke: RGBColor,
    /// Outline width in pixels.
    pub border_width: u32,
    /// Width of the rendered chart in pixels.
    pub width: u32,
    /// Height of the rendered chart in pixels.
    pub height: u32,
    /// Output format charts are encoded in.
    pub format: OutputFormat,
}

impl Default for BarChartStyle {
    /// The house style: translucent teal fill, solid teal outline,
    /// one series labeled "Income", 800x600 PNG.
    fn default() -> Self {
        Self {
            series_label: "Income".to_string(),
            fill: RGBColor(75, 192, 192),
            fill_alpha: 0.2,
            stroke: RGBColor(75, 192, 192),
            border_width: 1,
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}

/// Byte length of the RGB8 pixel buffer for a `width` x `height` image.
///
/// Widened to usize before multiplying; the product of two large u32
/// dimensions does not fit in u32.
fn rgb_buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Parses a `#rrggbb` hex color; the leading `#` is optional.
pub fn parse_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBColor(r, g, b))
}

/// Renders a bar chart of `grouping` into `surface`.
///
/// Labels are the grouping keys in grouping order; each bar is the sum of
/// `value` over that group's rows. An empty grouping renders an empty chart.
/// The file is written to the surface's registered path.
pub fn render_bar_chart<R>(
    surface: &Surface,
    grouping: &Grouping<R>,
    value: fn(&R) -> f64,
    style: &BarChartStyle,
) -> Result<RenderedChart, ChartError> {
    let labels: Vec<String> = grouping.keys().to_vec();
    let values: Vec<f64> = grouping.iter().map(|(_, rows)| sum_by(rows, value)).collect();

    debug!(
        "Rendering {} bars into surface '{}' ({})",
        values.len(),
        surface.id(),
        surface.path().display()
    );

    match style.format {
        OutputFormat::Png => {
            let mut buffer = vec![0u8; rgb_buffer_len(style.width, style.height)];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
                    .into_drawing_area();
                draw_chart(&root, surface.title(), &labels, &values, style).map_err(|reason| {
                    ChartError::Draw {
                        surface: surface.id().to_string(),
                        reason,
                    }
                })?;
            }

            let mut png_bytes = Vec::new();
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, style.width, style.height, image::ColorType::Rgb8)
                .map_err(|source| ChartError::Encode {
                    surface: surface.id().to_string(),
                    source,
                })?;

            fs::write(surface.path(), &png_bytes).map_err(|source| ChartError::Write {
                path: surface.path().to_path_buf(),
                source,
            })?;
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (style.width, style.height))
                    .into_drawing_area();
                draw_chart(&root, surface.title(), &labels, &values, style).map_err(|reason| {
                    ChartError::Draw {
                        surface: surface.id().to_string(),
                        reason,
                    }
                })?;
            }

            fs::write(surface.path(), svg.as_bytes()).map_err(|source| ChartError::Write {
                path: surface.path().to_path_buf(),
                source,
            })?;
        }
    }

    Ok(RenderedChart {
        surface: surface.id().to_string(),
        path: surface.path().to_path_buf(),
        title: surface.title().to_string(),
        values: labels.into_iter().zip(values).collect(),
        width: style.width,
        height: style.height,
    })
}

/// Draws the chart onto an already-built drawing area.
///
/// Backend-agnostic so the PNG and SVG paths share the drawing code; errors
/// are stringified because plotters error types are generic over the backend.
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
    style: &BarChartStyle,
) -> Result<(), String> {
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let x_upper = labels.len().max(1) as f64;
    let y_max = values.iter().cloned().fold(0.0_f64, f64::max);
    let y_upper = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..x_upper, 0.0..y_upper)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x| {
            let idx = *x as usize;
            if idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| e.to_string())?;

    let fill_style = style.fill.mix(style.fill_alpha).filled();
    let outline_style = style.stroke.stroke_width(style.border_width);

    let mut first = true;
    for (idx, &y_val) in values.iter().enumerate() {
        let x_center = idx as f64 + 0.5;
        let coords = [
            (x_center - BAR_WIDTH / 2.0, 0.0),
            (x_center + BAR_WIDTH / 2.0, y_val),
        ];

        let series = chart
            .draw_series(std::iter::once(Rectangle::new(coords, fill_style)))
            .map_err(|e| e.to_string())?;

        if first {
            series.label(style.series_label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill_style)
            });
            first = false;
        }

        chart
            .draw_series(std::iter::once(Rectangle::new(coords, outline_style)))
            .map_err(|e| e.to_string())?;
    }

    if !values.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;

    Ok(())
}
