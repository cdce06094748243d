//! The Updatecheck crate is an auto-update client library, providing the ability
//! for applications to ask an update server whether a new release is available,
//! download it in the background, and send bug reports.
//!



//		Global configuration

#![cfg_attr(feature = "reasons", feature(lint_reasons))]

//	Customisations of the standard linting configuration
#![cfg_attr(    feature = "reasons",  allow(clippy::multiple_crate_versions, reason = "Cannot resolve all these"))]
#![cfg_attr(not(feature = "reasons"), allow(clippy::multiple_crate_versions))]



//		Modules

pub mod client;
pub mod descriptor;
pub mod reporter;
pub mod version;

mod responses;



//		Packages
