//! Common shared mock server functionality for tests.

//		Packages

use core::time::Duration;
use std::{
	io::stdout,
	sync::Once,
};
use tracing::Level;
use tracing_subscriber::{
	EnvFilter,
	fmt::{format::FmtSpan, layer, writer::MakeWriterExt},
	layer::SubscriberExt,
	registry,
	util::SubscriberInitExt,
};
use wiremock::{
	Mock,
	MockServer,
	ResponseTemplate,
	matchers::{method, path},
};



//		Statics

pub(crate) static INIT: Once = Once::new();



//		Functions

//		initialize																
pub(crate) fn initialize() {
	INIT.call_once(|| {
		registry()
			.with(
				EnvFilter::new("updatecheck=debug,reqwest=info")
			)
			.with(
				layer()
					.with_writer(stdout.with_max_level(Level::DEBUG))
					.with_span_events(FmtSpan::NONE)
					.with_target(false)
			)
			.init()
		;
	});
}

//		check_response															
/// Builds a version check response body for the application `Foo`.
pub(crate) fn check_response(id: i64, version: &str) -> String {
	format!(
		r#"<?xml version="1.0" encoding="utf-8"?><root><app id="{id}" name="Foo" version="{version}" releasedate="1700000000" filename="Foo.exe" url="http://x/f.exe"><changelog>fix</changelog><message>hi</message></app></root>"#
	)
}

//		serve_check																
/// Starts a server that answers version checks at `/check.php`.
pub(crate) async fn serve_check(response: ResponseTemplate) -> MockServer {
	initialize();
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/check.php"))
		.respond_with(response)
		.mount(&server)
		.await
	;
	server
}

//		serve_file																
/// Starts a server that serves the given payload at `/f.exe`, after a delay.
pub(crate) async fn serve_file(payload: Vec<u8>, delay: Duration) -> MockServer {
	initialize();
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/f.exe"))
		.respond_with(ResponseTemplate::new(200).set_body_bytes(payload).set_delay(delay))
		.mount(&server)
		.await
	;
	server
}
