//! Scanner behaviour across chunk boundaries, malformed input and limits

use bytes::Bytes;
use proptest::prelude::*;
use rvoip_sip_wire::prelude::*;

const REGISTER: &[u8] = b"REGISTER sip:registrar.example.com SIP/2.0\r\n\
Via: SIP/2.0/UDP a.example.com:5060;branch=z9hG4bK776\r\n\
To: <sip:bob@example.com>\r\n\
From: <sip:alice@example.com>;tag=1928301774\r\n\
Call-ID: a84b4c76e66710\r\n\
CSeq: 314159 REGISTER\r\n\
Contact: <sip:alice@a.example.com>\r\n\
Expires: 7200\r\n\
Content-Length: 0\r\n\
\r\n";

// Folding, comma separated values, quotes and an unknown header, so every
// scanner state can be split across a chunk boundary.
const INVITE: &[u8] = b"\r\nINVITE sip:bob@biloxi.com SIP/2.0\r\n\
v: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK1,\r\n  SIP/2.0/TCP b.example.com;branch=z9hG4bK2\r\n\
To: Bob <sip:bob@biloxi.com>\r\n\
f: \"Alice, A.\" <sip:alice@atlanta.com>;tag=88\r\n\
i: 3848276298220188511@atlanta.com\r\n\
CSeq: 1 INVITE\r\n\
Contact: \"Al \\\"the\\\" Pal\" <sip:alice@pc33.atlanta.com>, <sip:x@y;p=\"a,b\">\r\n\
Subject: I know you're there,\r\n\tpick up the phone\r\n\
X-Custom: hello\r\n\
Supported:\r\n\
l: 0\r\n\
\r\n";

/// Feeds `data` split at `cuts`, passing the unconsumed tail back in front of
/// the next piece the way a stream transport would.
fn scan_in_pieces(data: &[u8], cuts: &[usize]) -> (ScanResult, Message) {
    let mut scanner = MessageScanner::new();
    let mut points: Vec<usize> = cuts.iter().map(|c| (*c).min(data.len())).collect();
    points.sort_unstable();
    points.push(data.len());

    let mut pending: Vec<u8> = Vec::new();
    let mut last = 0;
    let mut result = None;
    for end in points {
        if end < last {
            continue;
        }
        pending.extend_from_slice(&data[last..end]);
        last = end;
        let r = scanner.scan(Bytes::from(pending.clone()));
        if !r.needs_more_data() {
            result = Some(r);
            break;
        }
        pending.drain(..r.consumed);
        result = Some(r);
    }
    (result.unwrap(), scanner.take_message())
}

fn scan_once(data: &'static [u8]) -> (ScanResult, Message) {
    let mut scanner = MessageScanner::new();
    let result = scanner.scan(Bytes::from_static(data));
    (result, scanner.take_message())
}

fn scan_error(data: &'static [u8]) -> (ScanErrorKind, usize) {
    let (result, _) = scan_once(data);
    assert!(result.status.contains(ScanStatus::PARSE_ERROR), "{:?}", result);
    let err = result.error().unwrap();
    assert_eq!(err.offset, result.consumed);
    (err.kind, err.offset)
}

#[test]
fn test_register_scenario() {
    let (result, mut message) = scan_once(REGISTER);
    assert!(result.status.contains(ScanStatus::HEADERS_COMPLETE));
    assert!(result.status.contains(ScanStatus::DATA_BOUND_TO_MESSAGE));
    assert!(!result.status.contains(ScanStatus::NEED_MORE_DATA));
    assert_eq!(result.consumed, REGISTER.len());

    assert!(message.exists(HeaderId::Via));
    {
        let mut vias = message.header_multi(h::Vias);
        assert_eq!(vias.len(), 1);
        let via = vias.front_mut().unwrap();
        assert_eq!(via.host, "a.example.com");
        assert_eq!(via.port, Some(5060));
        assert_eq!(via.params.param(p::Branch).unwrap().as_str(), "z9hG4bK776");
    }
    assert_eq!(message.header(h::CSeq).unwrap().sequence, 314159);
    assert_eq!(message.header(h::CSeq).unwrap().method, "REGISTER");
    assert_eq!(message.header(h::ContentLength).unwrap().value, 0);
    assert_eq!(message.header(h::Expires).unwrap().value, 7200);
    assert_eq!(message.header(h::CallId).unwrap().value, "a84b4c76e66710");
}

#[test]
fn test_register_split_after_byte_50() {
    let (whole_result, whole) = scan_once(REGISTER);
    let (split_result, split) = scan_in_pieces(REGISTER, &[50]);
    assert!(split_result.is_complete());
    assert_eq!(split, whole);

    let mut split = split;
    assert_eq!(split.header(h::CSeq).unwrap().sequence, 314159);
    assert_eq!(split.header_multi(h::Vias).len(), 1);
    // body offset is relative to the last chunk
    assert_eq!(whole_result.consumed, REGISTER.len());
}

#[test]
fn test_first_call_reports_carried_bytes() {
    let mut scanner = MessageScanner::new();
    let result = scanner.scan(Bytes::copy_from_slice(&REGISTER[..50]));
    assert!(result.needs_more_data());
    // the start line is complete, the Via header is still open
    assert_eq!(result.consumed, 44);
    assert!(result.status.contains(ScanStatus::DATA_BOUND_TO_MESSAGE));
    assert_eq!(scanner.message().start_line(), "REGISTER sip:registrar.example.com SIP/2.0");
    assert!(!scanner.message().exists(HeaderId::Via));

    let result = scanner.scan_from(Bytes::copy_from_slice(&REGISTER[44..]), 6);
    assert!(result.is_complete());
    assert_eq!(result.consumed, REGISTER.len() - 44);
}

#[test]
fn test_invite_features() {
    let (result, mut message) = scan_once(INVITE);
    assert!(result.is_complete());
    assert_eq!(result.consumed, INVITE.len());
    assert!(message.is_request());

    let vias = message.header_multi(h::Vias);
    assert_eq!(vias.len(), 2);
    assert_eq!(vias.back().unwrap().transport, "TCP");
    assert_eq!(vias.back().unwrap().host, "b.example.com");

    let from = message.header(h::From).unwrap();
    assert_eq!(from.display_name.as_deref(), Some("Alice, A."));

    let contacts = message.raw_header(HeaderId::Contact).unwrap();
    assert_eq!(contacts.len(), 2);

    assert_eq!(
        message.header(h::Subject).unwrap().as_str(),
        "I know you're there, pick up the phone"
    );
    assert!(message.exists_unknown("X-CUSTOM"));
    assert_eq!(message.raw_header(HeaderId::Supported).unwrap().len(), 1);
    assert_eq!(message.header(h::ContentLength).unwrap().value, 0);
}

#[test]
fn test_leading_crlf_is_skipped() {
    let mut scanner = MessageScanner::new();
    let result = scanner.scan(Bytes::from_static(b"\r\n\r\n"));
    assert!(result.needs_more_data());
    assert_eq!(result.consumed, 4);
    assert!(!result.status.contains(ScanStatus::DATA_BOUND_TO_MESSAGE));
    assert_eq!(scanner.state(), ScanState::NewMessage);

    let result = scanner.scan(Bytes::from_static(b"OPTIONS sip:a@b SIP/2.0\r\n\r\n"));
    assert!(result.is_complete());
    assert_eq!(scanner.message().start_line(), "OPTIONS sip:a@b SIP/2.0");
}

#[test]
fn test_pipelined_messages() {
    let data = Bytes::from_static(
        b"OPTIONS sip:a@b SIP/2.0\r\nCSeq: 1 OPTIONS\r\n\r\nOPTIONS sip:a@b SIP/2.0\r\nCSeq: 2 OPTIONS\r\n\r\n",
    );
    let mut scanner = MessageScanner::new();
    let first = scanner.scan(data.clone());
    assert!(first.is_complete());
    let mut one = scanner.take_message();

    // a finished scanner ignores further input until reset
    let idle = scanner.scan(data.slice(first.consumed..));
    assert!(idle.is_complete());
    assert_eq!(idle.consumed, 0);

    scanner.reset();
    let second = scanner.scan(data.slice(first.consumed..));
    assert!(second.is_complete());
    assert_eq!(first.consumed + second.consumed, data.len());
    let mut two = scanner.take_message();

    assert_eq!(one.header(h::CSeq).unwrap().sequence, 1);
    assert_eq!(two.header(h::CSeq).unwrap().sequence, 2);
}

#[test]
fn test_bare_lf() {
    assert_eq!(
        scan_error(b"OPTIONS x SIP/2.0\nTo: x\r\n\r\n"),
        (ScanErrorKind::BareLf, 17)
    );
    assert_eq!(scan_error(b"\nOPTIONS x SIP/2.0\r\n\r\n"), (ScanErrorKind::BareLf, 0));
}

#[test]
fn test_cr_without_lf() {
    assert_eq!(
        scan_error(b"OPTIONS x SIP/2.0\r\nTo: x\rY\r\n\r\n"),
        (ScanErrorKind::CrWithoutLf, 25)
    );
    assert_eq!(
        scan_error(b"OPTIONS x SIP/2.0\r\nTo: x\r\n\rX"),
        (ScanErrorKind::CrWithoutLf, 27)
    );
}

#[test]
fn test_missing_colon() {
    assert_eq!(
        scan_error(b"OPTIONS x SIP/2.0\r\nTo\r\n\r\n"),
        (ScanErrorKind::MissingColon, 21)
    );
}

#[test]
fn test_whitespace_before_colon_is_accepted() {
    let (result, mut message) = scan_once(b"OPTIONS x SIP/2.0\r\nCSeq  : 7 OPTIONS\r\n\r\n");
    assert!(result.is_complete());
    assert_eq!(message.header(h::CSeq).unwrap().sequence, 7);
}

#[test]
fn test_invalid_header_name() {
    let (kind, offset) = scan_error(b"OPTIONS x SIP/2.0\r\nTo@: x\r\n\r\n");
    assert_eq!(kind, ScanErrorKind::InvalidHeaderName);
    assert_eq!(offset, 21);
}

#[test]
fn test_leading_whitespace_on_first_header() {
    assert_eq!(
        scan_error(b"OPTIONS x SIP/2.0\r\n To: x\r\n\r\n"),
        (ScanErrorKind::LeadingWhitespace, 19)
    );
}

#[test]
fn test_comma_opening_a_value() {
    let (kind, offset) = scan_error(b"OPTIONS x SIP/2.0\r\nVia: ,SIP/2.0/UDP h\r\n\r\n");
    assert_eq!(kind, ScanErrorKind::UnexpectedComma);
    assert_eq!(offset, 24);

    // the same byte is ordinary text in a header that is not split
    let (result, _) = scan_once(b"OPTIONS x SIP/2.0\r\nSubject: ,hi\r\n\r\n");
    assert!(result.is_complete());
}

#[test]
fn test_discardable_skips_offending_line() {
    let data = b"OPTIONS x SIP/2.0\r\nBad Header: v\r\nTo: x\r\n\r\n";
    let (result, _) = scan_once(data);
    assert_eq!(result.error().unwrap().kind, ScanErrorKind::InvalidHeaderName);
    assert_eq!(&data[result.discardable..], b"To: x\r\n\r\n");

    // without a line end the whole chunk can go
    let (result, _) = scan_once(b"OPTIONS x SIP/2.0\r\nBad Header");
    assert_eq!(result.discardable, 29);
}

#[test]
fn test_line_length_limit() {
    let config = ScannerConfig::default().with_max_line_length(20);
    let mut scanner = MessageScanner::with_config(config).unwrap();
    let result = scanner.scan(Bytes::from_static(b"OPTIONS sip:a@b SIP/2.0\r\n\r\n"));
    assert_eq!(result.error().unwrap().kind, ScanErrorKind::LineTooLong);
    assert_eq!(result.consumed, 20);
}

#[test]
fn test_zero_line_limit_is_refused() {
    let config = ScannerConfig::default().with_max_line_length(0);
    let err = MessageScanner::with_config(config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{}", err);
}

#[test]
fn test_header_count_limit() {
    let config = ScannerConfig::default().with_max_headers(2);
    let mut scanner = MessageScanner::with_config(config).unwrap();
    let result = scanner.scan(Bytes::from_static(
        b"OPTIONS x SIP/2.0\r\nTo: a\r\nFrom: b\r\nCSeq: 1 OPTIONS\r\n\r\n",
    ));
    assert_eq!(result.error().unwrap().kind, ScanErrorKind::TooManyHeaders);
    assert_eq!(result.consumed, 35);
}

#[test]
fn test_header_block_limit_spans_chunks() {
    let config = ScannerConfig::unlimited().with_max_header_block(30);
    let mut scanner = MessageScanner::with_config(config).unwrap();
    let first = scanner.scan(Bytes::from_static(b"OPTIONS x SIP/2.0\r\nTo: a"));
    assert!(first.needs_more_data());
    let mut next = b"OPTIONS x SIP/2.0\r\nTo: a"[first.consumed..].to_vec();
    next.extend_from_slice(b"bcdefghij\r\n\r\n");
    let second = scanner.scan(Bytes::from(next));
    assert_eq!(second.error().unwrap().kind, ScanErrorKind::HeaderBlockTooLarge);
}

#[test]
fn test_unterminated_angle_bracket() {
    let (kind, _) = scan_error(b"OPTIONS x SIP/2.0\r\nRoute: <sip:a@b\r\nTo: x\r\n\r\n");
    assert_eq!(kind, ScanErrorKind::UnterminatedValue);
}

#[test]
fn test_quoted_string_folds() {
    let (result, message) = scan_once(
        b"OPTIONS x SIP/2.0\r\nContact: \"Alice\r\n Smith\" <sip:a@b>, <sip:c@d>\r\n\r\n",
    );
    assert!(result.is_complete());
    assert_eq!(message.raw_header(HeaderId::Contact).unwrap().len(), 2);
}

#[test]
fn test_compact_and_long_forms_share_a_list() {
    let (_, mut message) = scan_once(
        b"OPTIONS x SIP/2.0\r\nv: SIP/2.0/UDP a.example.com\r\nVIA: SIP/2.0/UDP b.example.com\r\n\r\n",
    );
    let vias = message.header_multi(h::Vias);
    let hosts: Vec<&str> = vias.iter().map(|v| v.host.as_str()).collect();
    assert_eq!(hosts, vec!["a.example.com", "b.example.com"]);
}

proptest! {
    #[test]
    fn prop_fragmentation_equivalence(
        cuts in proptest::collection::vec(0usize..INVITE.len(), 1..5)
    ) {
        let (_, whole) = scan_once(INVITE);
        let (result, split) = scan_in_pieces(INVITE, &cuts);
        prop_assert!(result.is_complete(), "{:?}", result);
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn prop_register_any_single_cut(cut in 0usize..REGISTER.len()) {
        let (_, whole) = scan_once(REGISTER);
        let (result, split) = scan_in_pieces(REGISTER, &[cut]);
        prop_assert!(result.is_complete());
        prop_assert_eq!(split.encode(), whole.encode());
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn prop_byte_at_a_time(limit in 1usize..4) {
        let cuts: Vec<usize> = (1..REGISTER.len()).step_by(limit).collect();
        let (result, split) = scan_in_pieces(REGISTER, &cuts);
        prop_assert!(result.is_complete());
        let (_, whole) = scan_once(REGISTER);
        prop_assert_eq!(split, whole);
    }
}
