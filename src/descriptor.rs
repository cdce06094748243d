//! This module provides the application descriptor returned by version checks.
//!
//! An [`AppDescriptor`] describes the latest release of an application known to
//! the update server. It is only ever constructed from a complete, well-formed
//! server response: any missing or invalid field means that no descriptor is
//! produced at all.
//!

//		Modules

#[cfg(test)]
#[path = "tests/descriptor.rs"]
mod tests;



//		Packages

use crate::{
	responses::{AppElement, CheckResponse, check_well_formed},
	version::{AppVersion, VersionError},
};
use chrono::{DateTime, Local, Utc};
use core::fmt::{Display, self};
use std::{
	error::Error,
	path::{Path, PathBuf},
};



//		Enums

//		ResponseError															
/// Errors that can occur when interpreting a response body from the server.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ResponseError {
	/// The release date was not a representable number of seconds since the
	/// Unix epoch.
	InvalidReleaseDate(String),

	/// The version string could not be parsed.
	InvalidVersion(String, VersionError),

	/// The body was not well-formed XML, or did not have the expected
	/// structure.
	MalformedXml(String),
}

//󰭅		Display																	
impl Display for ResponseError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", match *self {
			Self::InvalidReleaseDate(ref value)      => format!(r#"Invalid release date "{value}""#),
			Self::InvalidVersion(ref value, ref err) => format!(r#"Invalid version "{value}": {err}"#),
			Self::MalformedXml(ref msg)              => format!(  "Malformed XML payload: {msg}"),
		})
	}
}

//󰭅		Error																	
impl Error for ResponseError {}



//		Structs

//		AppDescriptor															
/// The latest known release of an application.
///
/// Descriptors are immutable, and are handed over to subscribers when a version
/// check completes. The updater does not keep hold of them.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppDescriptor {
	//		Private properties													
	/// The server-assigned identifier of the release.
	id:           i64,

	/// The name of the application.
	name:         String,

	/// The version of the release.
	version:      AppVersion,

	/// The changes made in this release. This is free text, and may contain
	/// markup, which is not interpreted.
	changelog:    String,

	/// A message to show to the user about the release.
	message:      String,

	/// When the release was published.
	release_date: DateTime<Utc>,

	/// The suggested local file name for the release download.
	file_name:    String,

	/// The location to download the release from.
	url:          String,
}

//󰭅		AppDescriptor															
impl AppDescriptor {
	//		Constructors														

	//		from_xml															
	/// Parses a version check response body.
	///
	/// The body must be a well-formed XML document, with nothing after its
	/// root element, and the root must contain an `app` element describing the
	/// release. The release `id` may be given either as an attribute or as a
	/// child element, but not both.
	///
	/// # Parameters
	///
	/// * `xml` - The response body.
	///
	/// # Errors
	///
	/// * [`ResponseError::InvalidReleaseDate`]
	/// * [`ResponseError::InvalidVersion`]
	/// * [`ResponseError::MalformedXml`]
	///
	pub fn from_xml(xml: &str) -> Result<Self, ResponseError> {
		check_well_formed(xml)?;
		let response: CheckResponse = quick_xml::de::from_str(xml).map_err(|err|
			ResponseError::MalformedXml(err.to_string())
		)?;
		Self::from_element(response.app)
	}

	//		from_element														
	/// Converts the raw `app` element into a validated descriptor.
	///
	/// # Errors
	///
	/// * [`ResponseError::InvalidReleaseDate`]
	/// * [`ResponseError::InvalidVersion`]
	///
	pub(crate) fn from_element(element: AppElement) -> Result<Self, ResponseError> {
		let version      = element.version.parse::<AppVersion>().map_err(|err|
			ResponseError::InvalidVersion(element.version.clone(), err)
		)?;
		let release_date = epoch_to_datetime(element.release_date).ok_or_else(||
			ResponseError::InvalidReleaseDate(element.release_date.to_string())
		)?;
		Ok(Self {
			id:        element.id,
			name:      element.name,
			version,
			changelog: element.changelog,
			message:   element.message,
			release_date,
			file_name: element.file_name,
			url:       element.url,
		})
	}

	//		Public methods														

	//		id																	
	/// The server-assigned identifier of the release.
	#[must_use]
	pub const fn id(&self) -> i64 {
		self.id
	}

	//		name																
	/// The name of the application.
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	//		version																
	/// The version of the release.
	#[must_use]
	pub const fn version(&self) -> &AppVersion {
		&self.version
	}

	//		changelog															
	/// The changes made in this release.
	#[must_use]
	pub fn changelog(&self) -> &str {
		&self.changelog
	}

	//		message																
	/// A message to show to the user about the release.
	#[must_use]
	pub fn message(&self) -> &str {
		&self.message
	}

	//		release_date														
	/// When the release was published, in UTC.
	#[must_use]
	pub const fn release_date(&self) -> DateTime<Utc> {
		self.release_date
	}

	//		release_date_local													
	/// When the release was published, in the local timezone. This is intended
	/// for display.
	#[must_use]
	pub fn release_date_local(&self) -> DateTime<Local> {
		self.release_date.with_timezone(&Local)
	}

	//		file_name															
	/// The suggested local file name for the release download.
	#[must_use]
	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	//		url																	
	/// The location to download the release from.
	#[must_use]
	pub fn url(&self) -> &str {
		&self.url
	}

	//		is_newer_than														
	/// Checks whether this release is newer than the given version.
	#[must_use]
	pub fn is_newer_than(&self, version: &AppVersion) -> bool {
		self.version > *version
	}

	//		download_path														
	/// Works out where to save this release inside the given directory.
	///
	/// Only the final component of the suggested file name is used, so a name
	/// such as `../evil.exe` or `/usr/bin/evil` cannot place the file outside
	/// `dir`. Returns [`None`] if the name has no usable final component, for
	/// example if it is empty or `..`.
	///
	/// # Parameters
	///
	/// * `dir` - The directory downloads are kept in.
	///
	#[must_use]
	pub fn download_path(&self, dir: &Path) -> Option<PathBuf> {
		Path::new(&self.file_name).file_name().map(|name| dir.join(name))
	}
}



//		Functions

//		epoch_to_datetime														
/// Converts fractional seconds since the Unix epoch to a UTC timestamp.
///
/// The value is rounded to the nearest millisecond. Non-finite values, and
/// values outside the range that can be represented, produce [`None`].
///
#[cfg_attr(    feature = "reasons",  allow(clippy::cast_possible_truncation, reason = "Float to int casts saturate"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::cast_possible_truncation))]
fn epoch_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
	if !seconds.is_finite() {
		return None;
	}
	DateTime::from_timestamp_millis((seconds * 1_000.0).round() as i64)
}
