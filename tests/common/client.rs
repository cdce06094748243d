//! Common shared client functionality for tests.

//		Packages

use core::time::Duration;
use flume::Receiver;
use rubedo::sugar::s;
use std::sync::Arc;
use tokio::time::timeout;
use updatecheck::{
	client::{Config, Status, Updater},
	version::AppVersion,
};



//		Functions

//		create_updater															
/// Creates an updater for the application `Foo` on platform `win`, at version
/// `1.0.0.0`.
pub(crate) fn create_updater(api: &str) -> Arc<Updater> {
	Updater::new(Config {
		api:      api.parse().unwrap(),
		appname:  s!("Foo"),
		platform: s!("win"),
		version:  Some(AppVersion::new(1, 0, 0, 0)),
		timeout:  Some(Duration::from_secs(5)),
	}).unwrap()
}

//		next_status																
/// Waits for the next status message.
pub(crate) async fn next_status(receiver: &Receiver<Status>) -> Status {
	timeout(Duration::from_secs(10), receiver.recv_async()).await.unwrap().unwrap()
}

//		wait_for_download														
/// Collects download progress until a terminal status arrives.
///
/// Returns the progress percentages in the order received, and the terminal
/// status.
///
pub(crate) async fn wait_for_download(receiver: &Receiver<Status>) -> (Vec<u8>, Status) {
	let mut progress = vec![];
	loop {
		match next_status(receiver).await {
			Status::Downloading(_, percent) => progress.push(percent),
			status                          => return (progress, status),
		}
	}
}

//		assert_quiet															
/// Asserts that no status message arrives for a short while.
pub(crate) async fn assert_quiet(receiver: &Receiver<Status>) {
	let extra = timeout(Duration::from_millis(300), receiver.recv_async()).await;
	assert!(extra.is_err(), "Unexpected status: {extra:?}");
}
