//! Lazy decoding, typed access and re-encoding of scanned messages

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

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rvoip_sip_wire=debug")
        .with_test_writer()
        .try_init();
}

fn parse(data: &'static [u8]) -> Message {
    Message::from_datagram(Bytes::from_static(data)).unwrap()
}

#[test]
fn test_bad_via_parameter_is_local() {
    let mut message = parse(
        b"OPTIONS sip:a@b SIP/2.0\r\n\
Via: SIP/2.0/UDP a.example.com:5060;branch=ok;ttl=xyz\r\n\
CSeq: 1 OPTIONS\r\n\r\n",
    );
    assert!(message.exists(HeaderId::Via));

    let mut vias = message.header_multi(h::Vias);
    let via = vias.front_mut().unwrap();
    assert_eq!(via.params.param(p::Branch).unwrap().as_str(), "ok");
    let err = via.params.param(p::Ttl).unwrap_err();
    let decode = err.as_decode().unwrap();
    assert!(decode.target.contains("ttl"), "{}", decode);
    // the failure is cached and does not disturb the other parameters
    assert!(via.params.param(p::Ttl).is_err());
    assert_eq!(via.params.param(p::Branch).unwrap().as_str(), "ok");

    assert_eq!(message.header(h::CSeq).unwrap().sequence, 1);
}

#[test]
fn test_unknown_header_round_trips_without_decode() {
    let data: &[u8] = b"OPTIONS sip:a@b SIP/2.0\r\nX-Custom: hello\r\n\r\n";
    let message = parse(b"OPTIONS sip:a@b SIP/2.0\r\nX-Custom: hello\r\n\r\n");
    assert_eq!(&message.encode()[..], data);

    let list = message.raw_unknown("x-custom").unwrap();
    assert_eq!(list.len(), 1);
    assert!(!list.front().unwrap().is_parsed());
}

#[test]
fn test_untouched_message_is_byte_identical() {
    let message = parse(REGISTER);
    assert_eq!(&message.encode()[..], REGISTER);

    let odd = b"OPTIONS sip:a@b SIP/2.0\r\nAllow:INVITE,  ACK ,BYE\r\nsubject:   folded\r\n   text\r\n\r\n";
    let message = parse(odd);
    assert_eq!(&message.encode()[..], &odd[..]);
}

#[test]
fn test_touched_single_header_is_rewritten() {
    let mut message = parse(REGISTER);
    message.header(h::CSeq).unwrap().sequence = 314160;

    let expected = String::from_utf8(REGISTER.to_vec())
        .unwrap()
        .replace("CSeq: 314159 REGISTER", "CSeq: 314160 REGISTER");
    assert_eq!(&message.encode()[..], expected.as_bytes());
}

#[test]
fn test_touched_multi_header_writes_one_line_per_value() {
    let mut message = parse(
        b"OPTIONS sip:a@b SIP/2.0\r\nVia: SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/UDP b.example.com;branch=z9hG4bK2\r\n\r\n",
    );
    {
        let mut vias = message.header_multi(h::Vias);
        vias.push_front(Via::new("TCP", "proxy.example.com", Some(5060)));
        assert_eq!(vias.len(), 3);
    }
    let encoded = message.encode();
    assert_eq!(
        &encoded[..],
        &b"OPTIONS sip:a@b SIP/2.0\r\n\
Via: SIP/2.0/TCP proxy.example.com:5060\r\n\
Via: SIP/2.0/UDP a.example.com;branch=z9hG4bK1\r\n\
Via: SIP/2.0/UDP b.example.com;branch=z9hG4bK2\r\n\r\n"[..]
    );
}

#[test]
fn test_container_operations() {
    let mut message = parse(b"OPTIONS sip:a@b SIP/2.0\r\nAllow: INVITE, ACK, BYE\r\n\r\n");
    let mut allow = message.header_multi(h::Allows);
    assert!(allow.find(&Token::new("ACK")));
    let removed = allow.erase(1).unwrap();
    assert_eq!(removed.value, "ACK");
    allow.reverse();
    allow.append(&[Token::new("CANCEL")]);
    let methods: Vec<String> = allow.iter().map(|t| t.value.clone()).collect();
    assert_eq!(methods, vec!["BYE", "INVITE", "CANCEL"]);

    let encoded = message.encode();
    assert!(encoded.ends_with(b"Allow: BYE\r\nAllow: INVITE\r\nAllow: CANCEL\r\n\r\n"));
}

#[test]
fn test_absent_headers_auto_vivify() {
    let mut message = parse(REGISTER);
    assert!(!message.exists(h::Routes));
    assert_eq!(message.header_multi(h::Routes).len(), 0);
    assert!(!message.exists(h::Routes));

    assert!(!message.exists(h::Subject));
    assert_eq!(message.header(h::Subject).unwrap().as_str(), "");
    assert!(message.exists(h::Subject));
}

#[test]
fn test_remove_and_exists() {
    let mut message = parse(REGISTER);
    assert!(message.exists(h::Contacts));
    let removed = message.remove(h::Contacts).unwrap();
    assert_eq!(removed.len(), 1);
    assert!(!message.exists(h::Contacts));
    assert!(!message.encode().windows(8).any(|w| w == b"Contact:"));
    assert!(message.remove(h::Contacts).is_none());
}

#[test]
fn test_decode_error_is_isolated_and_cached() {
    let mut message = parse(b"OPTIONS sip:a@b SIP/2.0\r\nCSeq: abc\r\nMax-Forwards: 70\r\n\r\n");
    let err = message.header(h::CSeq).unwrap_err();
    assert!(err.is_decode());
    assert!(err.as_decode().unwrap().target.starts_with("CSeq"));
    assert_eq!(message.header(h::CSeq).unwrap_err(), err);

    assert_eq!(message.header(h::MaxForwards).unwrap().value, 70);
    assert!(message.parse_all().is_err());
}

#[test]
fn test_bad_element_does_not_hide_its_siblings() {
    let mut message = parse(
        b"OPTIONS sip:a@b SIP/2.0\r\nContact: <sip:a@b>, @@@\r\nTo: <sip:c@d>\r\n\r\n",
    );
    {
        let contacts = message.header_multi(h::Contacts);
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts.front().unwrap().uri.host, "b");
        let failed: Vec<usize> = contacts.errors().map(|(i, _)| i).collect();
        assert_eq!(failed, vec![1]);
        assert!(contacts.get(1).is_none());
    }
    assert_eq!(message.header(h::To).unwrap().uri.host, "d");
}

#[test]
fn test_bad_via_line_keeps_good_via_typed() {
    let mut message = parse(
        b"OPTIONS sip:a@b SIP/2.0\r\n\
Via: SIP/2.0/UDP a.example.com;branch=good\r\n\
Via: ???\r\n\r\n",
    );
    for _ in 0..2 {
        let mut vias = message.header_multi(h::Vias);
        assert_eq!(vias.len(), 2);
        assert!(!vias.is_valid());
        let good = vias.get_mut(0).unwrap();
        assert_eq!(good.host, "a.example.com");
        assert_eq!(good.params.param(p::Branch).unwrap().as_str(), "good");
        assert!(vias.get(1).is_none());
        assert!(vias.error(1).unwrap().reason.contains("???"));
        let decoded: Vec<bool> = vias.entries().map(|e| e.is_ok()).collect();
        assert_eq!(decoded, vec![true, false]);
    }
    // the undecodable value is written back as received
    let encoded = message.encode();
    let text = String::from_utf8_lossy(&encoded);
    assert!(text.contains("\r\nVia: ???\r\n"), "{}", text);
}

#[test]
fn test_find_on_removed_list_keeps_header_grammar() {
    let mut message = parse(b"OPTIONS sip:a@b SIP/2.0\r\nAllow: INVITE\r\n\r\n");
    let mut allow = message.remove(h::Allows).unwrap();
    assert!(!allow.find(&CSeqCategory::new(1, "INVITE").into_value()));
    assert!(allow.find(&Token::new("INVITE").into_value()));
    let value = allow.front_mut().unwrap().materialize(FieldKind::Token).unwrap();
    assert_eq!(value.to_string(), "INVITE");
}

#[test]
fn test_decoding_one_field_leaves_others_raw() {
    let mut message = parse(REGISTER);
    message.header(h::CSeq).unwrap();
    assert!(message.raw_header(HeaderId::CSeq).unwrap().front().unwrap().is_parsed());
    assert!(!message.raw_header(HeaderId::To).unwrap().front().unwrap().is_parsed());
    assert!(!message.raw_header(HeaderId::Via).unwrap().front().unwrap().is_parsed());
}

#[test]
fn test_duplicate_single_header() {
    init_logging();
    let data: &[u8] =
        b"OPTIONS sip:a@b SIP/2.0\r\nTo: <sip:first@a>\r\nTo: <sip:second@a>\r\n\r\n";
    let mut message = Message::from_datagram(Bytes::copy_from_slice(data)).unwrap();
    assert!(!message.is_valid());
    assert_eq!(
        message.invalid_reasons(),
        &["Multiple values in single-value header To".to_string()]
    );
    assert_eq!(&message.encode()[..], data);
    assert_eq!(message.header(h::To).unwrap().uri.user.as_deref(), Some("first"));
}

#[test]
fn test_unknown_header_access() {
    let mut message = parse(b"OPTIONS sip:a@b SIP/2.0\r\nX-Custom: hello\r\nx-custom: again\r\n\r\n");
    {
        let mut custom = message.header_unknown("X-CUSTOM").unwrap();
        let values: Vec<&str> = custom.iter().map(|v| v.as_str()).collect();
        assert_eq!(values, vec!["hello", "again"]);
        custom.push_back(StringCategory::new("third"));
    }
    assert!(message
        .encode()
        .ends_with(b"X-Custom: hello\r\nX-Custom: again\r\nX-Custom: third\r\n\r\n"));
    assert!(message.remove_unknown("x-custom").is_some());
    assert!(!message.exists_unknown("X-Custom"));
}

#[test]
fn test_datagram_body_and_content_length() {
    let mut message = parse(b"MESSAGE sip:a@b SIP/2.0\r\nContent-Length: 5\r\n\r\nhello, and more");
    assert_eq!(message.body().unwrap(), &Bytes::from_static(b"hello"));

    message.set_body(Bytes::from_static(b"bye"));
    assert_eq!(message.header(h::ContentLength).unwrap().value, 3);
    assert!(message.encode().ends_with(b"Content-Length: 3\r\n\r\nbye"));

    // a malformed Content-Length keeps the whole remainder
    let message = parse(b"MESSAGE sip:a@b SIP/2.0\r\nContent-Length: many\r\n\r\nhello");
    assert_eq!(message.body().unwrap(), &Bytes::from_static(b"hello"));
}

#[test]
fn test_datagram_scan_error() {
    let err = Message::from_datagram(Bytes::from_static(b"OPTIONS sip:a@b SIP/2.0\r\nTo\r\n\r\n"))
        .unwrap_err();
    match err {
        Error::Scan(scan) => assert_eq!(scan.kind, ScanErrorKind::MissingColon),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_start_line_helpers() {
    let mut message = parse(REGISTER);
    assert!(message.is_request());
    assert!(!message.is_response());

    message.set_start_line("SIP/2.0 200 OK");
    assert!(message.is_response());
    assert!(message.encode().starts_with(b"SIP/2.0 200 OK\r\nVia: "));
}

#[test]
fn test_message_built_from_scratch() {
    let mut message = Message::new();
    message.set_start_line("BYE sip:bob@biloxi.com SIP/2.0");
    message
        .header_multi(h::Vias)
        .push_back(Via::new("UDP", "pc33.atlanta.com", None));
    *message.header(h::CSeq).unwrap() = CSeqCategory::new(2, "BYE");
    message.header(h::CallId).unwrap().value = "a84b4c76e66710".to_string();
    message.set_body(Bytes::new());

    assert_eq!(
        &message.encode()[..],
        &b"BYE sip:bob@biloxi.com SIP/2.0\r\n\
Via: SIP/2.0/UDP pc33.atlanta.com\r\n\
CSeq: 2 BYE\r\n\
Call-ID: a84b4c76e66710\r\n\
Content-Length: 0\r\n\r\n"[..]
    );

    // and it scans back to the same values
    let mut again = Message::from_datagram(message.encode()).unwrap();
    assert_eq!(again.header(h::CSeq).unwrap().method, "BYE");
}

#[test]
fn test_header_id_serde() {
    let json = serde_json::to_string(&HeaderId::CallId).unwrap();
    assert_eq!(json, "\"CallId\"");
    let back: HeaderId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, HeaderId::CallId);
}

fn mix_case(name: &str, mask: &[bool]) -> String {
    name.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_header_lookup_ignores_case(
        index in 0usize..HeaderId::COUNT,
        mask in proptest::collection::vec(any::<bool>(), 1..24)
    ) {
        let id = HeaderId::ALL[index];
        let name = mix_case(id.canonical_name(), &mask);
        prop_assert_eq!(HeaderId::lookup(name.as_bytes()), Some(id));
    }

    #[test]
    fn prop_param_lookup_ignores_case(
        index in 0usize..ParamId::ALL.len(),
        mask in proptest::collection::vec(any::<bool>(), 1..24)
    ) {
        let id = ParamId::ALL[index];
        let name = mix_case(id.canonical_name(), &mask);
        prop_assert_eq!(ParamId::lookup(name.as_bytes()), Some(id));
    }

    #[test]
    fn prop_extension_names_are_unknown(name in "[xX]-[a-zA-Z]{1,12}") {
        prop_assert_eq!(HeaderId::lookup(name.as_bytes()), None);
    }

    #[test]
    fn prop_untouched_unknown_headers_round_trip(
        value in "[a-zA-Z0-9;=,<>@. ]{0,40}"
    ) {
        let data = format!("OPTIONS sip:a@b SIP/2.0\r\nX-Ext: {}\r\n\r\n", value.trim());
        let message = Message::from_datagram(Bytes::from(data.clone())).unwrap();
        prop_assert_eq!(&message.encode()[..], data.as_bytes());
    }
}
