// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    COLOR_GRID_LINE, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND,
    FONT_SIZE_MAIN_TITLE, FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::error::TelemetryError;

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Y-axis tick label: "k"/"M" notation for large magnitudes (one decimal
/// for fractional thousands), one decimal for small fractional values,
/// integers otherwise.
pub fn format_y_axis_label(y: f64) -> String {
    if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1000.0 {
        let thousands = y / 1000.0;
        if thousands.fract() != 0.0 {
            format!("{:.1}k", thousands)
        } else {
            format!("{:.0}k", thousands)
        }
    } else if y.abs() < 10.0 && y.fract() != 0.0 {
        format!("{:.1}", y)
    } else {
        format!("{:.0}", y)
    }
}

/// Line color for the `index`-th series (category-10 cycle).
pub fn palette_color(index: usize) -> RGBColor {
    let palette = &colorous::CATEGORY10;
    let color = palette[index % palette.len()];
    RGBColor(color.r, color.g, color.b)
}

/// Splits a polyline at non-finite samples so gaps render as breaks.
pub fn finite_segments(data: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in data {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

fn draw_time_series_chart(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y: &f64| format_y_axis_label(*y))
        .bold_line_style(COLOR_GRID_LINE.stroke_width(1))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_series_count = 0;

    for s in &plot_config.series {
        let color = s.color;
        let mut labelled = false;

        for segment in finite_segments(&s.data) {
            let series = chart.draw_series(LineSeries::new(
                segment,
                color.stroke_width(s.stroke_width),
            ))?;

            // One legend entry per series, however many segments it has.
            if !labelled && !s.label.is_empty() {
                series.label(&s.label).legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 20, y)],
                        color.stroke_width(LINE_WIDTH_LEGEND),
                    )
                });
                labelled = true;
                legend_series_count += 1;
            }
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    Ok(())
}

fn render_time_series_plot(
    output_path: &Path,
    root_name: &str,
    plot_type_name: &str,
    plot_data: Option<PlotConfig>,
) -> Result<bool, Box<dyn Error>> {
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let area = root_area.margin(50, 5, 5, 5);

    let plotted = match plot_data {
        Some(plot_config) => {
            let has_data = plot_config
                .series
                .iter()
                .any(|s| s.data.iter().any(|(x, y)| x.is_finite() && y.is_finite()));
            let valid_ranges = plot_config.x_range.end > plot_config.x_range.start
                && plot_config.y_range.end > plot_config.y_range.start;
            if has_data && valid_ranges {
                draw_time_series_chart(&area, &plot_config)?;
                true
            } else {
                let reason = if !has_data {
                    "No data points"
                } else {
                    "Invalid ranges"
                };
                draw_unavailable_message(&area, plot_type_name, reason)?;
                false
            }
        }
        None => {
            draw_unavailable_message(&area, plot_type_name, "No rows left to plot")?;
            false
        }
    };

    root_area.present()?;
    Ok(plotted)
}

/// Renders one time-series chart to a PNG, or a placeholder message when
/// there is nothing to draw. Returns whether a chart was drawn.
pub fn draw_time_series_plot(
    output_path: &Path,
    root_name: &str,
    plot_type_name: &str,
    plot_data: Option<PlotConfig>,
) -> Result<bool, TelemetryError> {
    let plotted = render_time_series_plot(output_path, root_name, plot_type_name, plot_data)
        .map_err(|e| TelemetryError::Plot(e.to_string()))?;

    if plotted {
        println!("  Plot saved as '{}'.", output_path.display());
    } else {
        println!(
            "  '{}' saved with a placeholder message: no data available to plot.",
            output_path.display()
        );
    }
    Ok(plotted)
}


// src/plot_framework.rs
