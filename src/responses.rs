//! This module provides the wire shapes of the update server's XML responses.

//		Modules

#[cfg(test)]
#[path = "tests/responses.rs"]
mod tests;



//		Packages

use crate::{
	descriptor::ResponseError,
	reporter::BugReportAck,
};
use core::str;
use quick_xml::{
	Reader,
	escape::resolve_predefined_entity,
	events::{BytesRef, BytesStart, Event},
};
use rubedo::sugar::s;
use serde::Deserialize;



//		Constants

/// The error code the server sends when the application, version, and platform
/// combination of a bug report is not known.
pub(crate) const ERR_NOT_FOUND: &str = "ERR001";



//		Structs

//		CheckResponse															
/// The document returned by the version check endpoint. The name of the root
/// element is not significant.
#[cfg_attr(    feature = "reasons",  allow(clippy::redundant_pub_crate, reason = "Internal use only"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::redundant_pub_crate))]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct CheckResponse {
	//		Crate-accessible properties											
	/// The release description.
	pub(crate) app: AppElement,
}

//		AppElement																
/// The `app` element of a version check response, before validation.
#[cfg_attr(    feature = "reasons",  allow(clippy::redundant_pub_crate, reason = "Internal use only"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::redundant_pub_crate))]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct AppElement {
	//		Crate-accessible properties											
	/// The release identifier. Normally a child element, but some servers send
	/// it as an attribute.
	#[serde(rename = "id", alias = "@id")]
	pub(crate) id:           i64,

	/// The application name.
	#[serde(rename = "@name")]
	pub(crate) name:         String,

	/// The unparsed release version.
	#[serde(rename = "@version")]
	pub(crate) version:      String,

	/// Seconds since the Unix epoch, in UTC.
	#[serde(rename = "@releasedate")]
	pub(crate) release_date: f64,

	/// The suggested download file name.
	#[serde(rename = "@filename")]
	pub(crate) file_name:    String,

	/// The download location.
	#[serde(rename = "@url")]
	pub(crate) url:          String,

	/// The release changelog.
	#[serde(default)]
	pub(crate) changelog:    String,

	/// The release message.
	#[serde(default)]
	pub(crate) message:      String,
}



//		Functions

//		check_well_formed														
/// Checks that a response body is a well-formed XML document.
///
/// The whole body is read, so that anything after the root element, such as
/// a second root or stray text, is rejected.
///
/// # Errors
///
/// * [`ResponseError::MalformedXml`]
///
#[cfg_attr(    feature = "reasons",  allow(clippy::redundant_pub_crate, reason = "Internal use only"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::redundant_pub_crate))]
pub(crate) fn check_well_formed(body: &str) -> Result<(), ResponseError> {
	walk_document(body, |_, _| Ok(()))
}

//		parse_bug_report_ack													
/// Parses the acknowledgment returned by the bug report endpoint.
///
/// The whole document is read, so that a body that is not well-formed is
/// rejected even if the interesting part appears before the problem. The
/// acknowledgment is taken from the first `ERRORCODE` or `app` element found
/// directly inside the root element. Error codes may use character
/// references and CDATA sections.
///
/// # Errors
///
/// * [`ResponseError::MalformedXml`]
///
#[cfg_attr(    feature = "reasons",  allow(clippy::redundant_pub_crate,     reason = "Internal use only"))]
#[cfg_attr(    feature = "reasons",  allow(clippy::wildcard_enum_match_arm, reason = "Other events carry nothing of interest"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::redundant_pub_crate, clippy::wildcard_enum_match_arm))]
pub(crate) fn parse_bug_report_ack(body: &str) -> Result<BugReportAck, ResponseError> {
	let mut ack:  Option<BugReportAck> = None;
	let mut code: Option<String>       = None;
	walk_document(body, |depth, event| {
		match *event {
			Event::Start(ref element) if depth == 1 && ack.is_none() && code.is_none() => {
				if element.name().as_ref() == b"ERRORCODE" {
					code = Some(String::new());
				} else {
					ack  = app_ack(element)?;
				}
			},
			Event::Empty(ref element) if depth == 1 && ack.is_none() && code.is_none() => {
				ack = if element.name().as_ref() == b"ERRORCODE" {
					Some(BugReportAck::Rejected(String::new()))
				} else {
					app_ack(element)?
				};
			},
			Event::End(_) if depth == 1 => {
				if let Some(value) = code.take() {
					ack = Some(code_ack(value));
				}
			},
			Event::Text(ref text) => {
				if let Some(ref mut value) = code {
					value.push_str(&text.decode().map_err(|err| ResponseError::MalformedXml(err.to_string()))?);
				}
			},
			Event::CData(ref data) => {
				if let Some(ref mut value) = code {
					value.push_str(&data.decode().map_err(|err| ResponseError::MalformedXml(err.to_string()))?);
				}
			},
			Event::GeneralRef(ref reference) => {
				if let Some(ref mut value) = code {
					value.push_str(&resolve_reference(reference)?);
				}
			},
			_ => {},
		}
		Ok(())
	})?;
	Ok(ack.unwrap_or(BugReportAck::Unrecognised))
}

//		walk_document															
/// Reads a whole XML document, checking that it is well-formed.
///
/// Each event is handed to `visit` along with its depth. For element events
/// this is the depth of the element itself, so the root is at `0`. For
/// content events it is the number of elements open around the content.
///
/// # Errors
///
/// * [`ResponseError::MalformedXml`]
///
#[cfg_attr(    feature = "reasons",  allow(clippy::wildcard_enum_match_arm, reason = "Other events carry nothing of interest"))]
#[cfg_attr(not(feature = "reasons"), allow(clippy::wildcard_enum_match_arm))]
fn walk_document<'a, F>(body: &'a str, mut visit: F) -> Result<(), ResponseError>
where
	F: FnMut(usize, &Event<'a>) -> Result<(), ResponseError>,
{
	let mut reader = Reader::from_str(body);
	reader.config_mut().trim_text(true);
	let mut depth: usize = 0;
	let mut roots: usize = 0;
	loop {
		let event = reader.read_event().map_err(|err| ResponseError::MalformedXml(err.to_string()))?;
		match event {
			Event::Start(_)                                      => {
				if depth == 0 {
					roots = roots.saturating_add(1);
				}
				visit(depth, &event)?;
				depth = depth.saturating_add(1);
			},
			Event::Empty(_)                                      => {
				if depth == 0 {
					roots = roots.saturating_add(1);
				}
				visit(depth, &event)?;
			},
			Event::End(_)                                        => {
				depth = depth.saturating_sub(1);
				visit(depth, &event)?;
			},
			Event::Text(ref text) if depth == 0                  => {
				if !text.is_empty() {
					return Err(ResponseError::MalformedXml(s!("Text found outside the root element")));
				}
			},
			Event::CData(_) | Event::GeneralRef(_) if depth == 0 => {
				return Err(ResponseError::MalformedXml(s!("Text found outside the root element")));
			},
			Event::Eof                                           => break,
			_                                                    => visit(depth, &event)?,
		}
		if roots > 1 {
			return Err(ResponseError::MalformedXml(s!("More than one root element found")));
		}
	}
	if depth != 0 {
		return Err(ResponseError::MalformedXml(s!("Unexpected end of document")));
	}
	if roots == 0 {
		return Err(ResponseError::MalformedXml(s!("No root element found")));
	}
	Ok(())
}

//		app_ack																	
/// Interprets an element found inside the acknowledgment root.
///
/// Only `app` elements with an `id` attribute are meaningful. Anything else
/// produces [`None`], so that the search carries on.
///
/// # Errors
///
/// * [`ResponseError::MalformedXml`]
///
fn app_ack(element: &BytesStart<'_>) -> Result<Option<BugReportAck>, ResponseError> {
	if element.name().as_ref() != b"app" {
		return Ok(None);
	}
	let Some(attribute) = element.try_get_attribute("id").map_err(|err| ResponseError::MalformedXml(err.to_string()))? else {
		return Ok(None);
	};
	let id = str::from_utf8(&attribute.value)
		.ok()
		.and_then(|value| value.trim().parse::<i64>().ok())
		.ok_or_else(|| ResponseError::MalformedXml(s!("Invalid app id attribute")))?
	;
	Ok(Some(BugReportAck::Accepted(id)))
}

//		code_ack																
/// Converts an error code sent by the server into an acknowledgment.
fn code_ack(code: String) -> BugReportAck {
	if code == ERR_NOT_FOUND {
		BugReportAck::NotFound
	} else {
		BugReportAck::Rejected(code)
	}
}

//		resolve_reference														
/// Resolves a character or predefined entity reference to its text.
///
/// # Errors
///
/// * [`ResponseError::MalformedXml`]
///
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, ResponseError> {
	if let Some(ch) = reference.resolve_char_ref().map_err(|err| ResponseError::MalformedXml(err.to_string()))? {
		return Ok(ch.to_string());
	}
	let name = reference.decode().map_err(|err| ResponseError::MalformedXml(err.to_string()))?;
	resolve_predefined_entity(&name)
		.map(ToOwned::to_owned)
		.ok_or_else(|| ResponseError::MalformedXml(format!("Unknown entity reference &{name};")))
}
