//		Packages

use figment::{
	Figment,
	providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{
	io::stdout,
	path::PathBuf,
	time::Duration,
};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{
	EnvFilter,
	fmt::{format::FmtSpan, layer, writer::MakeWriterExt},
	layer::SubscriberExt,
	registry,
	util::SubscriberInitExt,
};
use updatecheck::{
	client::{Config as UpdaterConfig, Status, Updater},
	reporter::BugReporter,
	version::AppVersion,
};



//		Structs

//		Config																	
/// The main configuration options for the application.
#[derive(Deserialize, Serialize, SmartDefault)]
pub struct Config {
	//		Public properties													
	/// The name of the application.
	#[default = "example"]
	pub appname:          String,

	/// The platform to ask for releases for.
	#[default = "win"]
	pub platform:         String,

	/// The version of the application currently installed.
	#[default = "1.0.0.0"]
	pub version:          String,

	/// The location of the version check endpoint.
	#[default = "http://127.0.0.1:8000/check.php"]
	pub updater_check:    String,

	/// The location of the bug report endpoint. If not provided, the bug report
	/// step is skipped.
	pub updater_bugs:     Option<String>,

	/// The directory to download new releases into.
	#[default(PathBuf::from("updates"))]
	pub download_dir:     PathBuf,

	/// The connection and read timeout, in seconds.
	#[default = 30]
	pub timeout:          u64,

	/// A bug report to send, if any.
	pub bug_report:       Option<String>,
}



//		Functions

//		main																	
#[tokio::main]
async fn main() {
	registry()
		.with(
			EnvFilter::new("info,updatecheck=debug")
		)
		.with(
			layer()
				.with_writer(stdout.with_max_level(Level::DEBUG))
				.with_span_events(FmtSpan::NONE)
				.with_target(false)
		)
		.init()
	;
	let config: Config = Figment::from(Serialized::defaults(Config::default()))
		.merge(Toml::file("updater-cli.toml"))
		.merge(Env::raw())
		.extract()
		.expect("Error loading config")
	;
	let app_version: AppVersion = config.version.parse().expect("Invalid application version");
	let updater  = Updater::new(UpdaterConfig {
		api:      config.updater_check.parse().expect("Invalid version check URL"),
		appname:  config.appname.clone(),
		platform: config.platform.clone(),
		version:  Some(app_version),
		timeout:  Some(Duration::from_secs(config.timeout)),
	}).expect("Error creating updater");
	let receiver = updater.subscribe();
	info!("{} v{app_version} on {}", config.appname, config.platform);
	let _started = updater.check();
	while let Ok(status) = receiver.recv_async().await {
		match status {
			Status::CheckCompleted(None)                     => {
				warn!("No update information available");
				break;
			},
			Status::CheckCompleted(Some(app))                => {
				if !app.is_newer_than(&app_version) {
					info!("Already up to date");
					break;
				}
				info!("Version {} released {}", app.version(), app.release_date_local());
				info!("{}", app.message());
				let Some(target) = app.download_path(&config.download_dir) else {
					error!("Unusable file name {:?} suggested by the server", app.file_name());
					break;
				};
				let _started = updater.download(app.url(), &target);
			},
			Status::Downloading(_, percent)                  => info!("Downloaded {percent}%"),
			Status::DownloadCompleted(path)                  => {
				info!("Saved to {path:?}");
				break;
			},
			Status::DownloadFailed(path, err)                => {
				error!("Could not download to {path:?}: {err}");
				break;
			},
			other                                            => warn!("Unhandled status {other:?}"),
		}
	}
	if let (Some(url), Some(text)) = (config.updater_bugs, config.bug_report) {
		let reporter = BugReporter::new(url.parse().expect("Invalid bug report URL"), Some(Duration::from_secs(config.timeout)))
			.expect("Error creating bug reporter")
		;
		match reporter.bug_report(&config.appname, &config.version, &config.platform, "", &text).await {
			Some(ack) => info!("Bug report acknowledged: {ack:?}"),
			None      => warn!("Bug report could not be delivered"),
		}
	}
}
