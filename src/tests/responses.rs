#![allow(non_snake_case)]

//		Packages

use super::*;
use claims::{assert_err, assert_err_eq, assert_matches, assert_ok, assert_ok_eq};



//		Tests

//		CheckResponse															
#[cfg(test)]
mod check_response {
	use super::*;

	//		deserialize															
	#[test]
	fn deserialize__id_element() {
		let xml = r#"<?xml version="1.0" encoding="utf-8"?>
			<root>
				<app name="Foo" version="1.0.1.0" releasedate="1700000000.5" filename="Foo.exe" url="http://x/f.exe">
					<id>7</id>
					<changelog>fix</changelog>
					<message>hi</message>
				</app>
			</root>
		"#;
		let response: CheckResponse = quick_xml::de::from_str(xml).unwrap();
		assert_eq!(response.app, AppElement {
			id:           7,
			name:         s!("Foo"),
			version:      s!("1.0.1.0"),
			release_date: 1_700_000_000.5,
			file_name:    s!("Foo.exe"),
			url:          s!("http://x/f.exe"),
			changelog:    s!("fix"),
			message:      s!("hi"),
		});
	}
	#[test]
	fn deserialize__id_attribute() {
		let xml = r#"<root><app id="7" name="Foo" version="1.0.1.0" releasedate="1700000000" filename="Foo.exe" url="http://x/f.exe"><changelog>fix</changelog><message>hi</message></app></root>"#;
		let response: CheckResponse = quick_xml::de::from_str(xml).unwrap();
		assert_eq!(response.app.id,        7);
		assert_eq!(response.app.changelog, "fix");
	}
	#[test]
	fn deserialize__optional_elements_missing() {
		let xml = r#"<root><app id="1" name="Foo" version="1.0" releasedate="0" filename="f" url="u"/></root>"#;
		let response: CheckResponse = quick_xml::de::from_str(xml).unwrap();
		assert_eq!(response.app.changelog, "");
		assert_eq!(response.app.message,   "");
	}
	#[test]
	fn deserialize__escaped_markup_in_changelog() {
		let xml = r#"<root><app id="1" name="Foo" version="1.0" releasedate="0" filename="f" url="u"><changelog>&lt;b&gt;Bold&lt;/b&gt; &amp; more</changelog></app></root>"#;
		let response: CheckResponse = quick_xml::de::from_str(xml).unwrap();
		assert_eq!(response.app.changelog, "<b>Bold</b> & more");
	}
	#[test]
	fn deserialize__err_missing_attribute() {
		let xml = r#"<root><app id="1" name="Foo" releasedate="0" filename="f" url="u"/></root>"#;
		assert_err!(quick_xml::de::from_str::<CheckResponse>(xml));
	}
	#[test]
	fn deserialize__err_missing_id() {
		let xml = r#"<root><app name="Foo" version="1.0" releasedate="0" filename="f" url="u"/></root>"#;
		assert_err!(quick_xml::de::from_str::<CheckResponse>(xml));
	}
	#[test]
	fn deserialize__err_missing_app() {
		assert_err!(quick_xml::de::from_str::<CheckResponse>("<root><other/></root>"));
	}
}

//		check_well_formed														
#[cfg(test)]
mod well_formed {
	use super::*;

	#[test]
	fn check_well_formed__ok() {
		assert_ok!(check_well_formed("<root/>"));
		assert_ok!(check_well_formed(r#"<?xml version="1.0"?><root><app id="1"/></root>"#));
		assert_ok!(check_well_formed("<!-- before -->\n<root>a &amp; b<![CDATA[<c>]]></root>\n<!-- after -->\n"));
	}
	#[test]
	fn check_well_formed__err_content_after_root() {
		for body in ["<root/><oops", "<root/><second/>", "<root/>junk", "<root/></root>", "<root/>&amp;", "<root/><![CDATA[x]]>"] {
			assert_matches!(check_well_formed(body), Err(ResponseError::MalformedXml(_)), "Body: {body}");
		}
	}
	#[test]
	fn check_well_formed__err_text_before_root() {
		assert_matches!(check_well_formed("junk<root/>"), Err(ResponseError::MalformedXml(_)));
	}
	#[test]
	fn check_well_formed__err_no_root() {
		assert_matches!(check_well_formed(""),                     Err(ResponseError::MalformedXml(_)));
		assert_matches!(check_well_formed(r#"<?xml version="1.0"?>"#), Err(ResponseError::MalformedXml(_)));
	}
	#[test]
	fn check_well_formed__err_unclosed() {
		assert_err_eq!(check_well_formed("<root><app>"), ResponseError::MalformedXml(s!("Unexpected end of document")));
	}
}

//		parse_bug_report_ack													
#[cfg(test)]
mod bug_report_ack {
	use super::*;

	#[test]
	fn parse_bug_report_ack__not_found() {
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>ERR001</ERRORCODE></root>"), BugReportAck::NotFound);
	}
	#[test]
	fn parse_bug_report_ack__not_found_escaped() {
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>ERR&#48;01</ERRORCODE></root>"),          BugReportAck::NotFound);
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>ERR&#x30;01</ERRORCODE></root>"),         BugReportAck::NotFound);
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE><![CDATA[ERR001]]></ERRORCODE></root>"), BugReportAck::NotFound);
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>\n\tERR001\n</ERRORCODE></root>"),       BugReportAck::NotFound);
	}
	#[test]
	fn parse_bug_report_ack__other_code_escaped() {
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>E&lt;1&gt;</ERRORCODE></root>"), BugReportAck::Rejected(s!("E<1>")));
	}
	#[test]
	fn parse_bug_report_ack__err_unknown_entity() {
		assert_err!(parse_bug_report_ack("<root><ERRORCODE>&bogus;</ERRORCODE></root>"));
	}
	#[test]
	fn parse_bug_report_ack__err_two_roots() {
		assert_err!(parse_bug_report_ack("<root><ERRORCODE>ERR001</ERRORCODE></root><root/>"));
	}
	#[test]
	fn parse_bug_report_ack__other_code() {
		assert_ok_eq!(parse_bug_report_ack("<root><ERRORCODE>ERR999</ERRORCODE></root>"), BugReportAck::Rejected(s!("ERR999")));
	}
	#[test]
	fn parse_bug_report_ack__accepted() {
		assert_ok_eq!(parse_bug_report_ack(r#"<?xml version="1.0"?><root><app id="42"></app></root>"#), BugReportAck::Accepted(42));
		assert_ok_eq!(parse_bug_report_ack(r#"<root><app id="42"/></root>"#),                           BugReportAck::Accepted(42));
	}
	#[test]
	fn parse_bug_report_ack__unrecognised() {
		assert_ok_eq!(parse_bug_report_ack("<root/>"),                      BugReportAck::Unrecognised);
		assert_ok_eq!(parse_bug_report_ack("<root><other>x</other></root>"), BugReportAck::Unrecognised);
		assert_ok_eq!(parse_bug_report_ack("<root><app/></root>"),          BugReportAck::Unrecognised);
	}
	#[test]
	fn parse_bug_report_ack__nested_elements_ignored() {
		assert_ok_eq!(parse_bug_report_ack(r#"<root><wrapper><app id="3"/></wrapper></root>"#), BugReportAck::Unrecognised);
	}
	#[test]
	fn parse_bug_report_ack__err_truncated() {
		assert_err!(parse_bug_report_ack("<root><ERRORCODE>ERR001</ERRORCODE>"));
	}
	#[test]
	fn parse_bug_report_ack__err_mismatched_tags() {
		assert_err!(parse_bug_report_ack("<root><ERRORCODE>ERR001</root></ERRORCODE>"));
	}
	#[test]
	fn parse_bug_report_ack__err_not_xml() {
		assert_err!(parse_bug_report_ack("Database connection failed"));
		assert_err!(parse_bug_report_ack(""));
	}
	#[test]
	fn parse_bug_report_ack__err_invalid_id() {
		assert_err!(parse_bug_report_ack(r#"<root><app id="abc"/></root>"#));
	}
}
