use eframe::{Frame, egui};

use crate::config::{COLLECT, MARKET};
use crate::series::AlignedSeries;
use crate::ui::plot_view::PlotView;

pub struct CafePulseApp {
    aligned: AlignedSeries,
    plot_view: PlotView,
}

impl CafePulseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, aligned: AlignedSeries) -> Self {
        Self {
            aligned,
            plot_view: PlotView::new(),
        }
    }
}

impl eframe::App for CafePulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("summary").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Cafe Pulse");
                ui.separator();
                ui.label(format!(
                    "'{}' mentions across {} weeks",
                    COLLECT.keyword,
                    self.aligned.len()
                ));
                ui.separator();
                ui.label(format!("{} posts total", self.aligned.total_posts()));
                ui.separator();
                let (price_min, price_max) = self.aligned.price_bounds();
                ui.label(format!(
                    "{} ${:.0} .. ${:.0}",
                    MARKET.symbol, price_min, price_max
                ));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot_view.show_plot(ui, &self.aligned);
        });
    }
}
