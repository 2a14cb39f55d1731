use chrono::Local;
use daily_memento::services::LocalNotificationCenter;
use daily_memento::{App, AppConfig, AppError};
use photo_gallery::ImageSource;
use std::path::PathBuf;

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("daily-memento"),
    );

    #[cfg(not(target_os = "android"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn usage() {
    eprintln!("Usage: daily-memento [today | import <image>... | export <zip> | restore <zip>]");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    init_logging();
    log::info!("Starting Daily Memento v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    let today = Local::now().date_naive();
    let app = App::start(config, today)?;
    let integrity = app.spawn_integrity_check();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("today") => {}
        Some("import") => {
            let images: Vec<ImageSource> = args[1..]
                .iter()
                .map(|p| ImageSource::Path(PathBuf::from(p)))
                .collect();
            let summary = app.import(images, today).await;
            println!("Imported {} photos", summary.success_count());
            for failure in &summary.failures {
                println!("  #{} skipped: {}", failure.index + 1, failure.reason);
            }
        }
        Some("export") if args.len() == 2 => {
            if let Some(summary) = app.export_backup(&PathBuf::from(&args[1])) {
                println!("Exported {} photos, {} quotes", summary.photos, summary.custom_quotes);
            }
        }
        Some("restore") if args.len() == 2 => {
            if let Some(summary) = app.restore_backup(&PathBuf::from(&args[1])) {
                println!("Restored {} photos, {} files", summary.photos, summary.files);
            }
        }
        Some(_) => {
            usage();
            return Ok(());
        }
    }

    if let Ok(Some(report)) = integrity.await {
        if !report.is_clean() {
            println!("Repaired store: {} records removed", report.removed.len());
        }
    }

    match app.today_photo(today) {
        Some(photo) => println!("Photo of the day: day {} ({})", photo.day_number, photo.assigned_date),
        None => println!("No photos yet. Import some with `daily-memento import <image>...`"),
    }
    if let Some(quote) = app.today_quote(today) {
        println!("\"{}\" by {}", quote.text, quote.author);
    }

    let center = LocalNotificationCenter::default();
    app.schedule_reminder(&center, today);

    Ok(())
}
