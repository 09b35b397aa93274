#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use cafe_pulse::{Cli, build_aligned_series, run_app};

fn main() -> eframe::Result {
    use cafe_pulse::config::PLOT_CONFIG;
    use clap::Parser;
    use eframe::NativeOptions;
    use tokio::runtime::Runtime;

    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Collect + align (blocking; the GUI only starts once data is ready)
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let Some(aligned) = rt.block_on(build_aligned_series()) else {
        // Empty reference series or no posts at all; everything worth saying
        // has already been logged
        return Ok(());
    };

    if args.headless {
        for week in &aligned.weeks {
            log::info!(
                "{} | {:>5} posts | {:>12.2}",
                week.week,
                week.post_count,
                week.price
            );
        }
        return Ok(());
    }

    // D. Run Native App
    let options = NativeOptions::default();
    eframe::run_native(
        PLOT_CONFIG.window_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, aligned))),
    )
}
