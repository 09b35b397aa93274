//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    pub window_title: &'static str,
    /// Bar width on the shared x axis, in days (weeks are 7 days apart).
    pub bar_width_days: f64,
    /// Gradient colors for post-count intensity, quiet weeks to loud weeks.
    pub count_gradient_colors: &'static [&'static str],
    /// Opacity applied to count bars so the price line stays readable on top.
    pub bar_intensity_pct: f32,
    pub price_line_color: Color32,
    pub price_line_width: f32,
    pub count_axis_label: &'static str,
    pub price_axis_label: &'static str,
    pub x_axis_label: &'static str,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    window_title: "Cafe Pulse - Post Volume vs Bitcoin",
    bar_width_days: 5.0,
    // From quiet weeks (deep blue) to busy weeks (firebrick)
    count_gradient_colors: &[
        "#1d4e89", // Steel blue
        "#87ceeb", // Sky blue
        "#ffb703", // Amber
        "#ff8c00", // Dark orange
        "#b22222", // Firebrick
    ],
    bar_intensity_pct: 0.85,
    price_line_color: Color32::from_rgb(255, 165, 0), // Orange
    price_line_width: 2.0,
    count_axis_label: "Posts per week",
    price_axis_label: "BTCUSDT weekly close",
    x_axis_label: "Week starting",
};
