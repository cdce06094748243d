//! This module provides bug report submission to the update server.

//		Modules

#[cfg(test)]
#[path = "tests/reporter.rs"]
mod tests;



//		Packages

use crate::{
	client::{UpdaterError, http_client},
	responses::parse_bug_report_ack,
};
use core::time::Duration;
use reqwest::{Client, Url};
use tracing::{info, warn};



//		Enums

//		BugReportAck															
/// The acknowledgment sent by the server in response to a bug report.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum BugReportAck {
	/// The report was recorded against the application release with the given
	/// identifier.
	Accepted(i64),

	/// The server does not know the application, version, and platform
	/// combination that was reported against (error code `ERR001`).
	NotFound,

	/// The server sent an error code other than `ERR001`.
	Rejected(String),

	/// The response was well-formed, but contained neither an error code nor
	/// an application identifier.
	Unrecognised,
}



//		Structs

//		BugReporter																
/// Submits bug reports to the update server.
#[derive(Clone, Debug)]
pub struct BugReporter {
	//		Private properties													
	/// The URL of the bug report endpoint.
	api:         Url,

	/// The HTTP client instance used for submitting reports.
	http_client: Client,
}

//󰭅		BugReporter																
impl BugReporter {
	//		Constructors														

	//		new																	
	/// Creates a new bug reporter.
	///
	/// # Parameters
	///
	/// * `api`     - The URL of the bug report endpoint.
	/// * `timeout` - How long to wait when connecting, and between reads,
	///               before giving up. If not provided, no timeout applies.
	///
	/// # Errors
	///
	/// * [`UpdaterError::UnableToBuildHttpClient`]
	///
	pub fn new(api: Url, timeout: Option<Duration>) -> Result<Self, UpdaterError> {
		Ok(Self {
			api,
			http_client: http_client(timeout)?,
		})
	}

	//		Public methods														

	//		bug_report															
	/// Submits a bug report.
	///
	/// Failures are not returned as errors. If the report could not be
	/// delivered, or the response could not be understood, the outcome is
	/// logged and [`None`] is returned.
	///
	/// # Parameters
	///
	/// * `app_name`     - The name of the application.
	/// * `app_version`  - The version of the application.
	/// * `app_platform` - The platform the application runs on.
	/// * `email`        - The email address of the reporter.
	/// * `text`         - The description of the problem.
	///
	pub async fn bug_report(
		&self,
		app_name:     &str,
		app_version:  &str,
		app_platform: &str,
		email:        &str,
		text:         &str,
	) -> Option<BugReportAck> {
		info!("Submitting bug report for {app_name} v{app_version} on {app_platform}");
		match self.submit(&[
			("appname",  app_name),
			("platform", app_platform),
			("version",  app_version),
			("email",    email),
			("text",     text),
		]).await {
			Ok(ack) => {
				info!("Bug report acknowledged: {ack:?}");
				Some(ack)
			},
			Err(err) => {
				warn!("Error submitting bug report: {err}");
				None
			},
		}
	}

	//		Private methods														

	//		submit																
	/// Posts the form fields and interprets the response.
	///
	/// # Errors
	///
	/// * [`UpdaterError::HttpError`]
	/// * [`UpdaterError::HttpRequestFailed`]
	/// * [`UpdaterError::InvalidBody`]
	/// * [`UpdaterError::InvalidPayload`]
	///
	async fn submit(&self, fields: &[(&str, &str)]) -> Result<BugReportAck, UpdaterError> {
		let url      = self.api.clone();
		let response = self.http_client.post(url.clone()).form(fields).send().await.map_err(|err|
			UpdaterError::HttpRequestFailed(url.clone(), err.to_string())
		)?;
		let status   = response.status();
		if !status.is_success() {
			return Err(UpdaterError::HttpError(url, status));
		}
		let Ok(body) = response.text().await else {
			return Err(UpdaterError::InvalidBody(url));
		};
		parse_bug_report_ack(&body).map_err(|err| UpdaterError::InvalidPayload(url, err))
	}
}
