//! This module provides the dotted numeric version type used by update servers.
//!
//! Update servers describe releases using versions with between two and four
//! numeric components, such as `1.2` or `1.0.3.2`, which is a wider format
//! than semantic versioning allows. The [`AppVersion`] type parses, compares,
//! and displays these.
//!

//		Modules

#[cfg(test)]
#[path = "tests/version.rs"]
mod tests;



//		Packages

use core::{
	fmt::{Display, self},
	str::FromStr,
};
use rubedo::sugar::s;
use std::error::Error;



//		Constants

/// The minimum number of components a version must have.
const MIN_COMPONENTS: usize = 2;

/// The maximum number of components a version may have.
const MAX_COMPONENTS: usize = 4;



//		Enums

//		VersionError															
/// Errors that can occur when parsing a version string.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum VersionError {
	/// The version string was empty.
	Empty,

	/// The version string had too few or too many components. Between two and
	/// four are required.
	ComponentCount(usize),

	/// One of the components was not a non-negative integer.
	InvalidComponent(String),
}

//󰭅		Display																	
impl Display for VersionError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", match *self {
			Self::Empty                       => s!("Version string is empty"),
			Self::ComponentCount(count)       => format!(  "Version must have {MIN_COMPONENTS} to {MAX_COMPONENTS} components, found {count}"),
			Self::InvalidComponent(ref value) => format!(r#"Invalid version component "{value}""#),
		})
	}
}

//󰭅		Error																	
impl Error for VersionError {}



//		Structs

//		AppVersion																
/// An application version made up of dotted numeric components.
///
/// The first two components (major and minor) are mandatory, and the build and
/// revision components are optional. When comparing, a missing component sorts
/// before any present one, so `1.0` is lower than `1.0.0`.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AppVersion {
	//		Private properties													
	/// The major version component.
	major:    u32,

	/// The minor version component.
	minor:    u32,

	/// The build version component, if present.
	build:    Option<u32>,

	/// The revision version component, if present. This can only be present if
	/// the build component is.
	revision: Option<u32>,
}

//󰭅		AppVersion																
impl AppVersion {
	//		Constructors														

	//		new																	
	/// Creates a new version with all four components.
	#[must_use]
	pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
		Self {
			major,
			minor,
			build:    Some(build),
			revision: Some(revision),
		}
	}

	//		Public methods														

	//		major																
	/// The major version component.
	#[must_use]
	pub const fn major(&self) -> u32 {
		self.major
	}

	//		minor																
	/// The minor version component.
	#[must_use]
	pub const fn minor(&self) -> u32 {
		self.minor
	}

	//		build																
	/// The build version component, if present.
	#[must_use]
	pub const fn build(&self) -> Option<u32> {
		self.build
	}

	//		revision															
	/// The revision version component, if present.
	#[must_use]
	pub const fn revision(&self) -> Option<u32> {
		self.revision
	}
}

//󰭅		Display																	
impl Display for AppVersion {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)?;
		if let Some(build) = self.build {
			write!(f, ".{build}")?;
		}
		if let Some(revision) = self.revision {
			write!(f, ".{revision}")?;
		}
		Ok(())
	}
}

//󰭅		FromStr																	
impl FromStr for AppVersion {
	type Err = VersionError;

	//		from_str															
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Err(VersionError::Empty);
		}
		let components = trimmed
			.split('.')
			.map(|part| part.parse::<u32>().map_err(|_err| VersionError::InvalidComponent(part.to_owned())))
			.collect::<Result<Vec<u32>, VersionError>>()?
		;
		match *components.as_slice() {
			[major, minor]                  => Ok(Self { major, minor, build: None,        revision: None }),
			[major, minor, build]           => Ok(Self { major, minor, build: Some(build), revision: None }),
			[major, minor, build, revision] => Ok(Self::new(major, minor, build, revision)),
			_                               => Err(VersionError::ComponentCount(components.len())),
		}
	}
}
