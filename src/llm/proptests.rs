//! Property-based tests for the wire format
//!
//! - Any non-blank string reply decodes to itself
//! - Bodies without a string `reply` are always protocol errors
//! - Request serialization preserves message order and content

use super::types::{CompletionRequest, CompletionResponse};
use super::CompletionErrorKind;
use crate::transcript::{Message, Role};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::System), Just(Role::User), Just(Role::Assistant)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), "[a-zA-Z0-9 _.!?,\"\\\\\n]{1,80}").prop_map(|(role, content)| Message { role, content })
}

/// JSON values that are not strings
fn arb_non_string_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        proptest::collection::vec("[a-z]{0,5}", 0..3).prop_map(|v| json!(v)),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_string_reply_round_trips(reply in "[a-zA-Z0-9_.!?,]{1}[a-zA-Z0-9 _.!?,\n]{0,100}") {
        let body = json!({ "reply": reply }).to_string();
        let decoded = CompletionResponse::decode(&body).unwrap();
        prop_assert_eq!(decoded.reply, reply);
    }

    #[test]
    fn prop_non_string_reply_is_protocol_error(value in arb_non_string_value()) {
        let body = json!({ "reply": value }).to_string();
        let err = CompletionResponse::decode(&body).unwrap_err();
        prop_assert_eq!(err.kind, CompletionErrorKind::Protocol);
    }

    #[test]
    fn prop_object_without_reply_is_protocol_error(key in "[a-z]{1,10}", text in "[a-z ]{0,20}") {
        prop_assume!(key != "reply");
        let mut object = serde_json::Map::new();
        object.insert(key, Value::String(text));
        let body = Value::Object(object).to_string();
        let err = CompletionResponse::decode(&body).unwrap_err();
        prop_assert_eq!(err.kind, CompletionErrorKind::Protocol);
    }

    #[test]
    fn prop_request_preserves_messages(messages in proptest::collection::vec(arb_message(), 1..10)) {
        let request = CompletionRequest::new(messages.clone());
        let value = serde_json::to_value(&request).unwrap();
        let wire = value["messages"].as_array().unwrap();

        prop_assert_eq!(wire.len(), messages.len());
        for (sent, original) in wire.iter().zip(&messages) {
            let role: Role = serde_json::from_value(sent["role"].clone()).unwrap();
            prop_assert_eq!(role, original.role);
            prop_assert_eq!(sent["content"].as_str().unwrap(), original.content.as_str());
            prop_assert_eq!(sent.as_object().unwrap().len(), 2);
        }
    }
}
