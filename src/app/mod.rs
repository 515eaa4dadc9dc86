use std::time::{Duration, Instant};

use eframe::egui::{self, Context, ProgressBar, RichText};

use crate::fetch::HttpFetcher;
use crate::trust::{GraphController, TIMEOUT_INTERVAL};

mod canvas;

const HEADER_MESSAGE: &str =
    "The graph below is based on your historical interactions with other users in the network.";

// The in-flight request has no deadline of its own, so poll it briskly.
const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(50);

pub struct TrustGraphApp {
    controller: GraphController<HttpFetcher>,
}

impl TrustGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, endpoint: String) -> Self {
        Self {
            controller: GraphController::new(HttpFetcher::new(endpoint, TIMEOUT_INTERVAL)),
        }
    }
}

impl eframe::App for TrustGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Minimization stands in for Qt's hide/show events: all timers and
        // the in-flight request stop while the window is out of sight.
        let minimized = ctx.input(|input| input.viewport().minimized.unwrap_or(false));
        if minimized {
            if self.controller.is_running() {
                self.controller.stop();
            }
        } else if !self.controller.is_running() {
            self.controller.start(now);
        }

        let _ = self.controller.tick(now);

        egui::TopBottomPanel::top("trust_graph_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(RichText::new(HEADER_MESSAGE).size(13.0));
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("trust_graph_status").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(self.controller.status_line());
                if let Some(percent) = self.controller.bootstrap_percent()
                    && percent < 100
                {
                    ui.add(
                        ProgressBar::new(percent as f32 / 100.0)
                            .desired_width(160.0)
                            .show_percentage(),
                    );
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::draw_trust_graph(ui, self.controller.view());
        });

        // Wake up again when the next timer is due instead of busy-spinning.
        if self.controller.has_in_flight() {
            ctx.request_repaint_after(IN_FLIGHT_REPAINT);
        } else if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
