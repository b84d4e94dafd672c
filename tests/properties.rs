//! Property tests for the codec, request validation and selector misses.
//!
//! - Any schema-conformant value survives encode then decode unchanged.
//! - Decoding arbitrary bytes against any schema returns instead of
//!   panicking.
//! - A malformed sender or call data is a 400, whether or not a handler
//!   for the selector exists.
//! - Any selector without a handler is a 404 naming that exact selector.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use ccip_read_router::abi::{decode, encode, encode_hex, Address, ParamType, Value, WORD_SIZE};
use ccip_read_router::gateway::{parse_get, parse_post, GatewayConfig};
use ccip_read_router::{CallContext, CcipRouter, ResponseProfile};
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::json;
use tower::ServiceExt;

const SENDER: &str = "0x0000000000000000000000000000000000000000";
const FOO: &str = "function foo() pure returns (uint256)";
const FOO_SELECTOR: &str = "0xc2985578";

fn param_type() -> impl Strategy<Value = ParamType> {
    let leaf = prop_oneof![
        Just(ParamType::Address),
        Just(ParamType::Bool),
        (1..=32usize).prop_map(|n| ParamType::Uint(n * 8)),
        (1..=32usize).prop_map(|n| ParamType::Int(n * 8)),
        (1..=32usize).prop_map(ParamType::FixedBytes),
        Just(ParamType::Bytes),
        Just(ParamType::String),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| ParamType::Array(Box::new(t))),
            (inner.clone(), 1..4usize).prop_map(|(t, n)| ParamType::FixedArray(Box::new(t), n)),
            vec(inner, 1..4).prop_map(ParamType::Tuple),
        ]
    })
}

/// Values conforming to `ty`.
fn value_for(ty: &ParamType) -> BoxedStrategy<Value> {
    match ty {
        ParamType::Address => any::<[u8; 20]>()
            .prop_map(|bytes| Value::Address(Address(bytes)))
            .boxed(),
        ParamType::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        ParamType::Uint(bits) => {
            let unused = (256 - bits) / 8;
            any::<[u8; WORD_SIZE]>()
                .prop_map(move |mut word| {
                    word[..unused].fill(0);
                    Value::Uint(word)
                })
                .boxed()
        }
        ParamType::Int(bits) => {
            let unused = (256 - bits) / 8;
            any::<[u8; WORD_SIZE]>()
                .prop_map(move |mut word| {
                    if unused > 0 {
                        let fill = if word[unused] & 0x80 != 0 { 0xff } else { 0x00 };
                        word[..unused].fill(fill);
                    }
                    Value::Int(word)
                })
                .boxed()
        }
        ParamType::FixedBytes(len) => vec(any::<u8>(), *len).prop_map(Value::FixedBytes).boxed(),
        ParamType::Bytes => vec(any::<u8>(), 0..70).prop_map(Value::Bytes).boxed(),
        ParamType::String => "\\PC{0,16}".prop_map(Value::String).boxed(),
        ParamType::Array(inner) => vec(value_for(inner), 0..4).prop_map(Value::Array).boxed(),
        ParamType::FixedArray(inner, len) => vec(value_for(inner), *len)
            .prop_map(Value::FixedArray)
            .boxed(),
        ParamType::Tuple(components) => components
            .iter()
            .map(value_for)
            .collect::<Vec<_>>()
            .prop_map(Value::Tuple)
            .boxed(),
    }
}

fn schema_and_values() -> impl Strategy<Value = (Vec<ParamType>, Vec<Value>)> {
    vec(param_type(), 0..4).prop_flat_map(|types| {
        let values: Vec<_> = types.iter().map(value_for).collect();
        (Just(types), values)
    })
}

fn invalid_sender() -> impl Strategy<Value = String> {
    prop_oneof![
        "0x[0-9a-f]{0,39}",
        "0x[0-9a-f]{41,60}",
        "[0-9a-f]{40}",
        "0x[0-9a-f]{0,20}[g-zG-Z][0-9a-f]{0,19}",
    ]
}

fn invalid_call_data() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{1,16}",
        "0x([0-9a-f]{2}){0,8}[0-9a-f]",
        "0x[0-9a-f]{0,8}[g-zG-Z][0-9a-f]{0,8}",
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Status of one GET against a router serving `foo`.
fn get_status(sender: &str, call_data: &str) -> StatusCode {
    let mut router = CcipRouter::new();
    router
        .add(FOO, |_args, _ctx| async { Ok(Value::uint(42u64).into()) })
        .unwrap();
    let app = router.into_axum_router(&GatewayConfig::default());

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/{}/{}", sender, call_data))
        .body(Body::empty())
        .unwrap();
    runtime().block_on(async { app.oneshot(request).await.unwrap().status() })
}

proptest! {
    #[test]
    fn prop_encode_then_decode_is_identity((types, values) in schema_and_values()) {
        let encoded = encode(&types, &values).unwrap();
        prop_assert_eq!(encoded.len() % WORD_SIZE, 0);
        prop_assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn prop_decode_arbitrary_bytes_returns(types in vec(param_type(), 1..4), data in vec(any::<u8>(), 0..256)) {
        let _ = decode(&types, &data);
    }

    #[test]
    fn prop_invalid_sender_rejected(sender in invalid_sender()) {
        prop_assert!(parse_get(&sender, FOO_SELECTOR, ".json").is_err());

        let body = json!({ "sender": sender, "data": FOO_SELECTOR }).to_string();
        prop_assert!(parse_post(body.as_bytes()).is_err());
    }

    #[test]
    fn prop_invalid_call_data_rejected(data in invalid_call_data()) {
        prop_assert!(parse_get(SENDER, &data, "").is_err());

        let body = json!({ "sender": SENDER, "data": data }).to_string();
        prop_assert!(parse_post(body.as_bytes()).is_err());
    }

    #[test]
    fn prop_unknown_selector_is_not_found(
        selector in any::<[u8; 4]>(),
        args in vec(any::<u8>(), 0..64),
        flat in any::<bool>(),
    ) {
        let profile = if flat { ResponseProfile::Flat } else { ResponseProfile::Structured };
        let router = CcipRouter::with_profile(profile);

        let mut data = selector.to_vec();
        data.extend(args);
        let response = runtime().block_on(router.handle(CallContext::new(Address::ZERO, data)));

        let message = format!(
            "No implementation for function with selector {}",
            encode_hex(&selector)
        );
        let expected = match profile {
            ResponseProfile::Structured => json!({ "data": { "error": message } }),
            ResponseProfile::Flat => json!({ "message": message }),
        };
        prop_assert_eq!(response.status, 404);
        prop_assert_eq!(response.body, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_malformed_get_is_bad_request_with_handler_present(
        sender in invalid_sender(),
        data in invalid_call_data(),
    ) {
        // A malformed sender with the call data of a registered function.
        prop_assert_eq!(get_status(&sender, FOO_SELECTOR), StatusCode::BAD_REQUEST);
        // Malformed call data from a valid sender.
        prop_assert_eq!(get_status(SENDER, &data), StatusCode::BAD_REQUEST);
    }
}
