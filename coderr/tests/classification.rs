//! Classification and serialization behavior seen from outside the crate.

mod common;

use coderr::{
    Classify, Code, Context, Error, UNCODED, as_coded, errorf, is, is_coded, marshal_json, new,
    new_coded, render, unmarshal_json, unmarshal_json_str, with_stack, wrap,
};
use common::{init_test_logging, send_across};
use proptest::prelude::*;

const FIELD_NOT_FOUND: Code = Code::from_static("FieldNotFound");
const TABLE_NOT_FOUND: Code = Code::from_static("TableNotFound");

fn field_not_found(field: &str) -> Error {
    new_coded(FIELD_NOT_FOUND, format!("field not found: {field}"))
}

fn load_field(field: &str) -> coderr::Result<u32> {
    Err(field_not_found(field)).with_context(|| format!("loading field {field}"))
}

#[test]
fn test_field_not_found_scenario() {
    init_test_logging();
    let e = field_not_found("fld");

    assert!(is(&e, &FIELD_NOT_FOUND));
    assert!(!is(&e, &TABLE_NOT_FOUND));

    let wrapped = wrap(e, "with message");
    assert!(is(&wrapped, &FIELD_NOT_FOUND));
    assert!(!is_coded(&wrapped));
    assert_eq!(render(&wrapped), "with message: field not found: fld");
}

#[test]
fn test_result_context_keeps_code() {
    init_test_logging();
    let result = load_field("fld").context("building schema");

    assert!(result.is_code(&FIELD_NOT_FOUND));
    let err = result.expect_err("load_field always fails");
    assert_eq!(
        render(&err),
        "building schema: loading field fld: field not found: fld"
    );
}

#[test]
fn test_nil_never_classified() {
    assert!(!is(None, &UNCODED));
    let nothing: coderr::Result<()> = Ok(());
    assert!(!nothing.is_code(&FIELD_NOT_FOUND));
}

#[test]
fn test_foreign_chain_is_not_uncoded() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = wrap(with_stack(io), "opening catalog");
    assert!(!is(&err, &UNCODED));

    let err = errorf!("plain {}", "failure");
    assert!(!is(&err, &UNCODED));
    assert!(is(&new("plain failure"), &UNCODED));
}

#[test]
fn test_cross_boundary_round_trip() {
    init_test_logging();
    let err = wrap(wrap(field_not_found("fld"), "resolving column"), "planning query");
    let payload = marshal_json(&err);

    let restored = unmarshal_json(payload.as_bytes());
    assert!(is(&restored, &FIELD_NOT_FOUND));
    assert_eq!(render(&restored), render(&err));

    let coded = as_coded(&restored).expect("coded root");
    assert_eq!(coded.message(), "field not found: fld");
    assert_eq!(
        coded.wrapped(),
        Some("planning query: resolving column: field not found: fld")
    );

    // Wrapping the restored error again still classifies.
    let rewrapped = wrap(restored, "retrying");
    assert!(is(&rewrapped, &FIELD_NOT_FOUND));
    assert_eq!(
        render(&rewrapped),
        "retrying: planning query: resolving column: field not found: fld"
    );
}

#[test]
fn test_uncoded_and_foreign_roots_across_boundary() {
    init_test_logging();
    let uncoded = send_across(&wrap(new("disk full"), "saving"));
    assert!(is(&uncoded, &UNCODED));
    assert_eq!(render(&uncoded), "saving: disk full");

    let foreign = send_across(&wrap(errorf!("disk on fire"), "saving"));
    assert!(!is(&foreign, &UNCODED));
    assert!(is(&foreign, &Code::default()));
    assert_eq!(render(&foreign), "saving: disk on fire");
}

#[test]
fn test_malformed_payload_is_raw_text() {
    let err = unmarshal_json_str("not json");
    assert_eq!(render(&err), "not json");
    assert!(!is(&err, &UNCODED));
    assert!(!is(&err, &Code::default()));
}

fn code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,16}"
}

proptest! {
    #[test]
    fn prop_coded_matches_only_its_code(code in code_strategy(), other in code_strategy(), message in ".*") {
        let err = new_coded(Code::new(code.clone()), message);
        prop_assert!(is(&err, &Code::new(code.clone())));
        prop_assert_eq!(is(&err, &Code::new(other.clone())), code == other);
    }

    #[test]
    fn prop_wrapping_preserves_code(code in code_strategy(), layers in prop::collection::vec(".*", 0..8)) {
        let target = Code::new(code);
        let mut err = new_coded(target.clone(), "root");
        for layer in layers {
            err = wrap(err, layer);
        }
        prop_assert!(is(&err, &target));
    }

    #[test]
    fn prop_round_trip_preserves_text_and_code(
        code in code_strategy(),
        message in ".*",
        layers in prop::collection::vec("[a-z ]{0,12}", 0..4),
    ) {
        let target = Code::new(code);
        let mut err = new_coded(target.clone(), message);
        for layer in layers {
            err = wrap(err, layer);
        }

        let restored = send_across(&err);
        prop_assert!(is(&restored, &target));
        prop_assert_eq!(render(&restored), render(&err));
    }
}
