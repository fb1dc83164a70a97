use egui::{Color32, Frame, Margin, RichText, Ui, Vec2b};
use egui_plot::{Bar, BarChart, Legend, Line, PlotPoints};

use crate::charts::{BarChartSpec, LineChartSpec};
use crate::pipeline::QualiReport;

/// Renders the three chart specs of one report in a single window. The app
/// consumes only the renderer-agnostic specs; it never reaches back into the
/// pipeline.
pub struct ChartApp {
    report: QualiReport,
}

impl ChartApp {
    pub fn new(report: QualiReport, _cc: &eframe::CreationContext<'_>) -> Self {
        Self { report }
    }

    fn show_line_chart(ui: &mut Ui, spec: &LineChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).color(Color32::WHITE).strong());
        egui_plot::Plot::new(spec.title.clone())
            .legend(Legend::default())
            .height(height)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .show(ui, |plot_ui| {
                for line in &spec.lines {
                    plot_ui.line(
                        Line::new(line.label.clone(), PlotPoints::new(line.points.clone()))
                            .color(parse_team_color(&line.color)),
                    );
                }
            });
    }

    fn show_bar_chart(ui: &mut Ui, spec: &BarChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).color(Color32::WHITE).strong());
        if let Some(annotation) = &spec.annotation {
            ui.label(RichText::new(annotation).color(Color32::YELLOW));
        }

        let bars: Vec<Bar> = spec
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new(i as f64, bar.lap_time_s)
                    .name(format!("{} {:.3}s", bar.driver, bar.lap_time_s))
                    .fill(parse_team_color(&bar.color))
            })
            .collect();

        egui_plot::Plot::new(spec.title.clone())
            .legend(Legend::default())
            .height(height)
            .x_axis_label(spec.x_label.clone())
            .y_axis_label(spec.y_label.clone())
            .include_y(spec.y_bounds.0)
            .include_y(spec.y_bounds.1)
            .auto_bounds(Vec2b::new(true, false))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(spec.title.clone(), bars));
            });
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(Frame::default().inner_margin(Margin::same(5)))
            .show(ctx, |ui| {
                let half = (ui.available_height() / 2.0 - 40.0).max(120.0);
                ui.columns(2, |columns| {
                    Self::show_line_chart(&mut columns[0], &self.report.charts.speed, half);
                    Self::show_bar_chart(&mut columns[1], &self.report.charts.lap_times, half);
                });
                ui.separator();
                Self::show_line_chart(ui, &self.report.charts.inputs, half);
            });
    }
}

// Team colors arrive as '#'-prefixed hex from the chart specs; anything
// unparsable falls back to gray instead of failing the frame.
fn parse_team_color(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}
