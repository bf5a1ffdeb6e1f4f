use std::sync::Arc;

use sunshine_core::AppError;
use sunshine_data::{date, SqliteWeatherStore, WeatherClient, WeatherContract, WeatherRecord};
use sunshine_settings::{general_preferences, SettingsScreen, SettingsStore};
use sunshine_sync::{ForecastSource, SyncResult, SyncWorker};

/// Stand-in forecast source so the app has data to cache.
// TODO: replace with a real forecast backend once one is wired up.
struct SampleForecast;

impl ForecastSource for SampleForecast {
    fn fetch(&self) -> SyncResult<Vec<WeatherRecord>> {
        let today = date::normalized_utc_now();
        let conditions = [800, 801, 500, 600, 200];
        Ok(conditions
            .iter()
            .enumerate()
            .map(|(i, &weather_id)| WeatherRecord {
                date: today + i as i64 * date::DAY_IN_MILLIS,
                weather_id,
                min_temp: 4.0 + i as f64,
                max_temp: 12.0 + i as f64,
                humidity: 70.0,
                pressure: 1013.0,
                wind_speed: 5.0,
                degrees: 200,
            })
            .collect())
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Fatal: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Initialize core
    sunshine_core::init()?;
    let (config, _validation) = sunshine_core::Config::load_validated()?;
    std::fs::create_dir_all(&config.config_dir)?;

    let contract = WeatherContract::new(&config.data.authority)
        .map_err(|e| AppError::Service(e.to_string()))?;
    let store = SqliteWeatherStore::new(config.database_path())
        .map_err(|e| AppError::Service(e.to_string()))?;
    let client = WeatherClient::new(store);

    // Settings surface: load stored values, keep summaries current.
    let settings = Arc::new(
        SettingsStore::load(config.settings_path(), &general_preferences())
            .map_err(|e| AppError::Service(e.to_string()))?,
    );
    let screen = SettingsScreen::new(general_preferences(), settings);
    screen.start();
    for pref in screen.preferences() {
        if let Some(summary) = screen.summary(&pref.key) {
            tracing::info!("{}: {}", pref.title, summary);
        }
    }

    // One immediate sync, then read back the cached forecast.
    let (requester, worker) = SyncWorker::new(Arc::new(SampleForecast), client.clone());
    let worker_task = tokio::spawn(worker.run());
    requester.start_immediate_sync();
    drop(requester);
    worker_task
        .await
        .map_err(|e| AppError::Service(e.to_string()))?;

    let forecast = client.query(contract.selection_for_today_onwards()).await?;
    println!("Forecast from {}:", contract.content_uri());
    for record in &forecast {
        let day = date::date_for_millis(record.date)
            .map(|d| d.to_string())
            .unwrap_or_else(|| record.date.to_string());
        println!(
            "  {}  {:>3.0}° / {:>3.0}°  {}",
            day,
            record.max_temp,
            record.min_temp,
            record.condition().description()
        );
    }

    screen.stop();
    Ok(())
}
