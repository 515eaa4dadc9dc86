mod app;
mod fetch;
mod sched;
mod trust;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Trustview endpoint of the local core process.
    #[arg(long, default_value = "http://127.0.0.1:8085/trustview")]
    endpoint: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "trustview",
        options,
        Box::new(move |cc| Ok(Box::new(app::TrustGraphApp::new(cc, args.endpoint.clone())))),
    )
}
