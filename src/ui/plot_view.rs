use chrono::{Datelike, Duration, NaiveDate, Weekday};
use colorgrad::Gradient;
use eframe::egui::{self, Color32};
use egui_plot::{
    AxisHints, Bar, BarChart, Corner, GridMark, HPlacement, Legend, Line, Plot, PlotPoints,
};

use crate::config::PLOT_CONFIG;
use crate::series::AlignedSeries;

/// One week as the plot needs it: x coordinate, post count, real price and
/// the price remapped into the count axis' coordinate space.
#[derive(Clone)]
struct WeekRow {
    x: f64,
    post_count: u64,
    price: f64,
    bar_color: Color32,
}

#[derive(Clone)]
pub struct PlotCache {
    rows: Vec<WeekRow>,
    price_points: Vec<[f64; 2]>,
    count_max: f64,
    price_min: f64,
    price_span: f64,
}

#[derive(Default)]
pub struct PlotView {
    cache: Option<PlotCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn show_plot(&mut self, ui: &mut egui::Ui, aligned: &AlignedSeries) {
        // The aligned series never changes after startup, so this builds once
        let cache = self
            .cache
            .get_or_insert_with(|| calculate_plot_data(aligned))
            .clone();

        let legend = Legend::default().position(Corner::LeftTop);
        let rows_for_labels = cache.rows.clone();
        let (count_max, price_min, price_span) =
            (cache.count_max, cache.price_min, cache.price_span);

        Plot::new("pulse_plot")
            .legend(legend)
            .custom_x_axes(vec![create_x_axis()])
            .custom_y_axes(vec![
                create_count_axis(),
                create_price_axis(count_max, price_min, price_span),
            ])
            .x_grid_spacer(month_grid_spacer)
            .label_formatter(move |_name, point| describe_week(&rows_for_labels, point.x))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = cache
                    .rows
                    .iter()
                    .map(|row| {
                        Bar::new(row.x, row.post_count as f64)
                            .width(PLOT_CONFIG.bar_width_days)
                            .fill(row.bar_color)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(PLOT_CONFIG.count_axis_label, bars));

                plot_ui.line(
                    Line::new(
                        PLOT_CONFIG.price_axis_label,
                        PlotPoints::new(cache.price_points.clone()),
                    )
                    .color(PLOT_CONFIG.price_line_color)
                    .width(PLOT_CONFIG.price_line_width),
                );
            });
    }
}

fn calculate_plot_data(aligned: &AlignedSeries) -> PlotCache {
    let count_max = (aligned.max_count() as f64).max(1.0);
    let (price_min, price_max) = aligned.price_bounds();
    let price_span = price_max - price_min;

    let grad = colorgrad::GradientBuilder::new()
        .html_colors(PLOT_CONFIG.count_gradient_colors)
        .build::<colorgrad::CatmullRomGradient>()
        .expect("Failed to create color gradient");

    let rows: Vec<WeekRow> = aligned
        .weeks
        .iter()
        .map(|week| {
            let intensity = week.post_count as f64 / count_max;
            let color = to_egui_color(grad.at(intensity as f32))
                .linear_multiply(PLOT_CONFIG.bar_intensity_pct);
            WeekRow {
                x: week.week.days_since_epoch() as f64,
                post_count: week.post_count,
                price: week.price,
                bar_color: color,
            }
        })
        .collect();

    // The price line shares the bars' y axis, so each price is remapped into
    // count space; the right-hand axis formatter maps it back for display.
    // A flat series (price_span 0) pins the line to mid-height.
    let price_points: Vec<[f64; 2]> = rows
        .iter()
        .map(|row| {
            let y = if price_span > 0.0 {
                (row.price - price_min) / price_span * count_max
            } else {
                count_max * 0.5
            };
            [row.x, y]
        })
        .collect();

    PlotCache {
        rows,
        price_points,
        count_max,
        price_min,
        price_span,
    }
}

/// Hover text: snap the pointer to the nearest week and report it.
fn describe_week(rows: &[WeekRow], pointer_x: f64) -> String {
    let nearest = rows.iter().min_by(|a, b| {
        (a.x - pointer_x)
            .abs()
            .partial_cmp(&(b.x - pointer_x).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    match nearest {
        Some(row) if (row.x - pointer_x).abs() <= 7.0 => {
            let monday = NaiveDate::default() + Duration::days(row.x as i64);
            format!(
                "week of {}\n{} posts\n${:.0}",
                monday.format("%Y-%m-%d"),
                row.post_count,
                row.price
            )
        }
        _ => String::new(),
    }
}

// Helpers retained locally for calculate_plot_data
fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

/// Put one x grid mark on the first Monday of each month in view.
fn month_grid_spacer(input: egui_plot::GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let mut marks = Vec::new();
    for day in (min.floor() as i64)..=(max.ceil() as i64) {
        let date = NaiveDate::default() + Duration::days(day);
        if date.weekday() == Weekday::Mon && date.day() <= 7 {
            marks.push(GridMark {
                value: day as f64,
                step_size: 30.0,
            });
        }
    }
    marks
}

fn create_x_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(PLOT_CONFIG.x_axis_label)
        .formatter(|grid_mark, _range| {
            let date = NaiveDate::default() + Duration::days(grid_mark.value.round() as i64);
            date.format("%Y-%m-%d").to_string()
        })
}

fn create_count_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .label(PLOT_CONFIG.count_axis_label)
        .formatter(|grid_mark, _range| format!("{:.0}", grid_mark.value))
        .placement(HPlacement::Left)
}

fn create_price_axis(count_max: f64, price_min: f64, price_span: f64) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(PLOT_CONFIG.price_axis_label)
        .formatter(move |grid_mark, _range| {
            let price = grid_mark.value / count_max * price_span + price_min;
            format!("${:.0}", price)
        })
        .placement(HPlacement::Right)
}
