//! This module provides client-side functionality to add to an application.
//!
//! The [`Updater`] asks the update server whether a new release of the
//! application is available, and can download a release file in the
//! background. Outcomes are published as [`Status`] messages to every
//! subscriber, over channels obtained from [`Updater::subscribe()`].
//!

//		Modules

#[cfg(test)]
#[path = "tests/client.rs"]
mod tests;



//		Packages

use crate::{
	descriptor::{AppDescriptor, ResponseError},
	version::AppVersion,
};
use core::{
	fmt::{Display, self},
	sync::atomic::{AtomicBool, Ordering},
	time::Duration,
};
use flume::{Receiver, Sender, self};
use futures_util::StreamExt as _;
use parking_lot::Mutex;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Request, Response, StatusCode, Url};
use std::{
	error::Error,
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::{
	fs::File as AsyncFile,
	io::AsyncWriteExt as _,
	spawn,
};
use tracing::{debug, error, info};



//		Constants

/// The characters to percent-encode in query values: everything except the
/// RFC 3986 unreserved set.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');



//		Enums

//		UpdaterError															
/// Errors that can occur when checking for and downloading updates.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum UpdaterError {
	/// The connection dropped, or timed out, while a download was being
	/// received.
	DownloadInterrupted(Url, String),

	/// An HTTP error occurred, i.e. the status code returned does not indicate
	/// success.
	HttpError(Url, StatusCode),

	/// The HTTP request to the server failed.
	HttpRequestFailed(Url, String),

	/// The response body could not be read or decoded as text.
	InvalidBody(Url),

	/// The response body could not be interpreted.
	InvalidPayload(Url, ResponseError),

	/// The URL to make a request to is invalid.
	InvalidUrl(String, String),

	/// The HTTP client could not be set up.
	UnableToBuildHttpClient(String),

	/// The directory to download into did not exist and could not be created.
	UnableToCreateDirectory(PathBuf, String),

	/// A problem was encountered when trying to create a file for the download.
	UnableToCreateDownload(PathBuf, String),

	/// A problem was encountered when trying to write to the download file.
	UnableToWriteToDownload(PathBuf, String),
}

//󰭅		Display																	
impl Display for UpdaterError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", match *self {
			Self::DownloadInterrupted(ref url, ref msg)      => format!(  "Download from {url} was interrupted: {msg}"),
			Self::HttpError(ref url, ref status)             => format!(  "HTTP status code {status} received when calling {url}"),
			Self::HttpRequestFailed(ref url, ref msg)        => format!(  "HTTP request to {url} failed: {msg}"),
			Self::InvalidBody(ref url)                       => format!(  "Invalid HTTP body received from {url}"),
			Self::InvalidPayload(ref url, ref err)           => format!(  "Invalid payload received from {url}: {err}"),
			Self::InvalidUrl(ref url, ref msg)               => format!(r#"Invalid URL specified "{url}": {msg}"#),
			Self::UnableToBuildHttpClient(ref msg)           => format!(  "Unable to build HTTP client: {msg}"),
			Self::UnableToCreateDirectory(ref path, ref msg) => format!(r#"Unable to create download directory "{path:?}": {msg}"#),
			Self::UnableToCreateDownload(ref path, ref msg)  => format!(r#"Unable to create download file "{path:?}": {msg}"#),
			Self::UnableToWriteToDownload(ref path, ref msg) => format!(r#"Unable to write to download file "{path:?}": {msg}"#),
		})
	}
}

//󰭅		Error																	
impl Error for UpdaterError {}

//		Status																	
/// A notification published by the [`Updater`] to its subscribers.
///
/// Every accepted call to [`Updater::check()`] produces exactly one
/// [`CheckCompleted`](Status::CheckCompleted). Every accepted call to
/// [`Updater::download()`] produces zero or more
/// [`Downloading`](Status::Downloading) messages followed by exactly one of
/// [`DownloadCompleted`](Status::DownloadCompleted) or
/// [`DownloadFailed`](Status::DownloadFailed).
///
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
	/// A version check finished. The descriptor is absent if the server had no
	/// information, or if anything went wrong along the way.
	CheckCompleted(Option<AppDescriptor>),

	/// Part of a download has been written to the file. The percentage is in
	/// the range `0..=100`, and is `0` if the server did not say how large the
	/// file is.
	Downloading(PathBuf, u8),

	/// A download finished successfully.
	DownloadCompleted(PathBuf),

	/// A download failed.
	DownloadFailed(PathBuf, UpdaterError),
}



//		Structs

//		Config																	
/// The configuration options for the client.
#[cfg_attr(    feature = "reasons",  allow(clippy::exhaustive_structs, reason = "Provided for configuration"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::exhaustive_structs))]
#[derive(Clone, Debug)]
pub struct Config {
	//		Public properties													
	/// The URL of the version check endpoint. The query parameters describing
	/// the application are appended to it. For example,
	/// `https://updates.example.com/check.php`.
	pub api:      Url,

	/// The name of the application, as known to the server.
	pub appname:  String,

	/// The platform the application runs on, as known to the server.
	pub platform: String,

	/// The current version of the application. This is reported to the server
	/// when checking for updates, and is sent empty if not known.
	pub version:  Option<AppVersion>,

	/// How long to wait when connecting, and between reads, before giving up.
	/// If not provided, no timeout applies.
	pub timeout:  Option<Duration>,
}

//		Updater																	
/// A service to check for updates and download new releases.
///
/// Only one check and one download can be in progress at a time. Calls made
/// while one is already running are ignored. The work itself happens on Tokio
/// tasks, so [`check()`](Updater::check()) and
/// [`download()`](Updater::download()) must be called from within a Tokio
/// runtime, and they return straight away.
///
#[derive(Debug)]
pub struct Updater {
	//		Private properties													
	/// Whether a version check is currently in progress.
	checking:    AtomicBool,

	/// The configuration for the updater service.
	config:      Config,

	/// The destination of the download currently in progress, if any.
	download:    Mutex<Option<PathBuf>>,

	/// The HTTP client instance that is used for communicating with the
	/// server.
	http_client: Client,

	/// The channels that status messages are published to.
	subscribers: Mutex<Vec<Sender<Status>>>,
}

//󰭅		Updater																	
impl Updater {
	//		Constructors														

	//		new																	
	/// Creates a new updater service instance.
	///
	/// # Parameters
	///
	/// * `config` - The configuration for the updater service.
	///
	/// # Errors
	///
	/// * [`UpdaterError::UnableToBuildHttpClient`]
	///
	pub fn new(config: Config) -> Result<Arc<Self>, UpdaterError> {
		let http_client = http_client(config.timeout)?;
		Ok(Arc::new(Self {
			checking:    AtomicBool::new(false),
			config,
			download:    Mutex::new(None),
			http_client,
			subscribers: Mutex::new(vec![]),
		}))
	}

	//		Public methods														

	//		subscribe															
	/// Subscribes to status messages.
	///
	/// Each subscriber receives its own copy of every message published after
	/// it subscribed. Dropping the receiver unsubscribes.
	///
	pub fn subscribe(&self) -> Receiver<Status> {
		let (sender, receiver) = flume::unbounded();
		self.subscribers.lock().push(sender);
		receiver
	}

	//		check																
	/// Checks for updates in the background.
	///
	/// Returns `true` if a check was started, or `false` if one was already in
	/// progress, in which case nothing happens. The outcome is published as
	/// [`Status::CheckCompleted`], once the in-progress flag has been cleared,
	/// so a subscriber may start another check straight away.
	///
	pub fn check(self: &Arc<Self>) -> bool {
		if self.checking.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
			debug!("Update check already in progress");
			return false;
		}
		let updater = Arc::clone(self);
		drop(spawn(async move {
			info!("Checking for updates");
			let app = match updater.fetch_latest().await {
				Ok(app)  => {
					info!("Latest version of {} is {}", app.name(), app.version());
					Some(app)
				},
				Err(err) => {
					error!("Error checking for updates: {err}");
					None
				},
			};
			updater.checking.store(false, Ordering::SeqCst);
			updater.broadcast(&Status::CheckCompleted(app));
		}));
		true
	}

	//		download															
	/// Downloads a file in the background.
	///
	/// Returns `false` if a download is already in progress, in which case
	/// nothing happens. Otherwise the parent directory of `path` is created if
	/// it does not exist, and the file is streamed to `path`, with progress
	/// published as [`Status::Downloading`]. The outcome is published as either
	/// [`Status::DownloadCompleted`] or [`Status::DownloadFailed`], once the
	/// download has been cleared, so a subscriber may start another download
	/// straight away.
	///
	/// If the directory cannot be created, [`Status::DownloadFailed`] is
	/// published before this function returns, and no transfer is started.
	///
	/// # Parameters
	///
	/// * `url`  - The location to download from.
	/// * `path` - The file to save the download to.
	///
	pub fn download(self: &Arc<Self>, url: &str, path: &Path) -> bool {
		let mut active = self.download.lock();
		if let Some(ref current) = *active {
			debug!("Download to {current:?} already in progress, ignoring {url}");
			return false;
		}
		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			if let Err(err) = fs::create_dir_all(dir) {
				drop(active);
				let err = UpdaterError::UnableToCreateDirectory(dir.to_owned(), err.to_string());
				error!("Error preparing download: {err}");
				self.broadcast(&Status::DownloadFailed(path.to_owned(), err));
				return true;
			}
		}
		*active = Some(path.to_owned());
		drop(active);
		info!("Downloading {url} to {path:?}");
		let updater = Arc::clone(self);
		let url     = url.to_owned();
		let path    = path.to_owned();
		drop(spawn(async move {
			let result = updater.download_to_file(&url, &path).await;
			*updater.download.lock() = None;
			match result {
				Ok(())   => {
					info!("Download to {path:?} complete");
					updater.broadcast(&Status::DownloadCompleted(path));
				},
				Err(err) => {
					error!("Error downloading update file: {err}");
					updater.broadcast(&Status::DownloadFailed(path, err));
				},
			}
		}));
		true
	}

	//		is_checking															
	/// Whether a version check is currently in progress.
	pub fn is_checking(&self) -> bool {
		self.checking.load(Ordering::SeqCst)
	}

	//		active_download														
	/// The destination of the download currently in progress, if any.
	pub fn active_download(&self) -> Option<PathBuf> {
		self.download.lock().clone()
	}

	//		Private methods														

	//		broadcast															
	/// Publishes a status message to all subscribers.
	///
	/// Subscribers whose receivers have been dropped are removed.
	///
	fn broadcast(&self, status: &Status) {
		self.subscribers.lock().retain(|sender| sender.send(status.clone()).is_ok());
	}

	//		check_request														
	/// Builds the version check request.
	///
	/// The application details are appended to any query already present on
	/// the configured URL. Values are percent-encoded, leaving only the RFC 3986
	/// unreserved characters as they are, so a space is sent as `%20`.
	///
	/// # Errors
	///
	/// * [`UpdaterError::InvalidUrl`]
	///
	fn check_request(&self) -> Result<Request, UpdaterError> {
		let version = self.config.version.as_ref().map(ToString::to_string).unwrap_or_default();
		let params  = [
			("appname",  self.config.appname.as_str()),
			("platform", self.config.platform.as_str()),
			("version",  version.as_str()),
		]
			.iter()
			.map(|&(key, value)| format!("{key}={}", utf8_percent_encode(value, QUERY_VALUE)))
			.collect::<Vec<_>>()
			.join("&")
		;
		let mut url = self.config.api.clone();
		let query   = match url.query() {
			Some(existing) if !existing.is_empty() => format!("{existing}&{params}"),
			_                                      => params,
		};
		url.set_query(Some(&query));
		self.http_client
			.get(url)
			.build()
			.map_err(|err| UpdaterError::InvalidUrl(self.config.api.to_string(), err.to_string()))
	}

	//		fetch_latest														
	/// Asks the server for the latest release of the application.
	///
	/// # Errors
	///
	/// * [`UpdaterError::HttpError`]
	/// * [`UpdaterError::HttpRequestFailed`]
	/// * [`UpdaterError::InvalidBody`]
	/// * [`UpdaterError::InvalidPayload`]
	/// * [`UpdaterError::InvalidUrl`]
	///
	async fn fetch_latest(&self) -> Result<AppDescriptor, UpdaterError> {
		let request  = self.check_request()?;
		let url      = request.url().clone();
		let response = self.send(request).await?;
		let Ok(body) = response.text().await else {
			return Err(UpdaterError::InvalidBody(url));
		};
		AppDescriptor::from_xml(&body).map_err(|err| UpdaterError::InvalidPayload(url, err))
	}

	//		download_to_file													
	/// Streams a file from the server to disk, publishing progress.
	///
	/// # Errors
	///
	/// * [`UpdaterError::DownloadInterrupted`]
	/// * [`UpdaterError::HttpError`]
	/// * [`UpdaterError::HttpRequestFailed`]
	/// * [`UpdaterError::InvalidUrl`]
	/// * [`UpdaterError::UnableToCreateDownload`]
	/// * [`UpdaterError::UnableToWriteToDownload`]
	///
	async fn download_to_file(&self, url: &str, path: &Path) -> Result<(), UpdaterError> {
		let url         = Url::parse(url).map_err(|err| UpdaterError::InvalidUrl(url.to_owned(), err.to_string()))?;
		let request     = self.http_client.get(url.clone()).build().map_err(|err|
			UpdaterError::InvalidUrl(url.to_string(), err.to_string())
		)?;
		let response    = self.send(request).await?;
		let total       = response.content_length();
		let mut file    = AsyncFile::create(path).await.map_err(|err|
			UpdaterError::UnableToCreateDownload(path.to_owned(), err.to_string())
		)?;
		let mut stream  = response.bytes_stream();
		let mut written = 0_u64;
		while let Some(chunk) = stream.next().await {
			let chunk = chunk.map_err(|err| UpdaterError::DownloadInterrupted(url.clone(), err.to_string()))?;
			file.write_all(&chunk).await.map_err(|err|
				UpdaterError::UnableToWriteToDownload(path.to_owned(), err.to_string())
			)?;
			written = written.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
			self.broadcast(&Status::Downloading(path.to_owned(), percentage(written, total)));
		}
		file.flush().await.map_err(|err|
			UpdaterError::UnableToWriteToDownload(path.to_owned(), err.to_string())
		)?;
		Ok(())
	}

	//		send																
	/// Sends an HTTP request, and checks that the response is a success.
	///
	/// # Errors
	///
	/// * [`UpdaterError::HttpError`]
	/// * [`UpdaterError::HttpRequestFailed`]
	///
	async fn send(&self, request: Request) -> Result<Response, UpdaterError> {
		let url      = request.url().clone();
		let response = self.http_client.execute(request).await.map_err(|err|
			UpdaterError::HttpRequestFailed(url.clone(), err.to_string())
		)?;
		let status   = response.status();
		if !status.is_success() {
			return Err(UpdaterError::HttpError(url, status));
		}
		Ok(response)
	}
}



//		Functions

//		http_client																
/// Builds an HTTP client with the given connection and read timeout.
///
/// # Errors
///
/// * [`UpdaterError::UnableToBuildHttpClient`]
///
#[cfg_attr(    feature = "reasons",  allow(clippy::redundant_pub_crate, reason = "Internal use only"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::redundant_pub_crate))]
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client, UpdaterError> {
	let mut builder = Client::builder().user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
	if let Some(timeout) = timeout {
		builder = builder.connect_timeout(timeout).read_timeout(timeout);
	}
	builder.build().map_err(|err| UpdaterError::UnableToBuildHttpClient(err.to_string()))
}

//		percentage																
/// Works out how much of a download has been received, as a percentage.
///
/// Returns `0` if the total size is not known, and never more than `100`, even
/// if the server sends more than it said it would.
///
fn percentage(written: u64, total: Option<u64>) -> u8 {
	total
		.and_then(|total| written.saturating_mul(100).checked_div(total))
		.map_or(0, |percent| u8::try_from(percent.min(100)).unwrap_or(100))
}
