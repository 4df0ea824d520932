//! HTTP registry tests against a scripted transport
//!
//! Covers the wire shape of each operation and how registry failures surface.

mod common;

use common::*;
use schema_registry_client::request::Method;
use schema_registry_client::{
    CompatibilityLevel, HttpRegistry, Registry, RegistryError, SchemaReference, VersionId,
};

// =============================================================================
// Request shapes
// =============================================================================

#[tokio::test]
async fn test_register_posts_schema_and_references() {
    let transport = MockTransport::new();
    transport.route(Method::Post, "/subjects/orders-value/versions", 200, r#"{"id":12}"#);
    let registry = HttpRegistry::new(transport.clone());

    let reference =
        SchemaReference::new("com.acme.Customer", subject("customers-value"), version(3)).unwrap();
    let registered = registry
        .register(&subject("orders-value"), &schema(ORDER_SCHEMA), &[reference])
        .await
        .unwrap();
    assert_eq!(registered, id(12));

    let request = transport.last();
    assert_eq!(
        request.header("content-type"),
        Some("application/vnd.schemaregistry.v1+json")
    );
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["schema"], ORDER_SCHEMA);
    assert_eq!(body["references"][0]["name"], "com.acme.Customer");
    assert_eq!(body["references"][0]["subject"], "customers-value");
    assert_eq!(body["references"][0]["version"], 3);
}

#[tokio::test]
async fn test_subject_is_percent_encoded() {
    let transport = MockTransport::new();
    transport.route(Method::Get, "/subjects/team%2Forders/versions", 200, "[1,2,5]");
    let registry = HttpRegistry::new(transport.clone());

    let versions = registry
        .subject_versions(&subject("team/orders"))
        .await
        .unwrap();
    assert_eq!(versions, vec![version(1), version(2), version(5)]);
}

#[tokio::test]
async fn test_latest_version_uses_latest_segment() {
    let transport = MockTransport::new();
    transport.route(
        Method::Get,
        "/subjects/orders-value/versions/latest",
        200,
        subject_version_body("orders-value", 4, 21, ORDER_SCHEMA),
    );
    let registry = HttpRegistry::new(transport.clone());

    let latest = registry.latest_version(&subject("orders-value")).await.unwrap();
    assert_eq!(latest.version, version(4));
    assert_eq!(latest.id(), id(21));
    assert_eq!(latest.raw().as_str(), ORDER_SCHEMA);

    let same = registry
        .schema_for_subject_and_version(&subject("orders-value"), VersionId::Latest)
        .await
        .unwrap();
    assert_eq!(same, latest);
    assert_eq!(transport.count(), 2);
}

#[tokio::test]
async fn test_schema_id_looks_up_registered_schema() {
    let transport = MockTransport::new();
    transport.route(
        Method::Post,
        "/subjects/orders-value",
        200,
        subject_version_body("orders-value", 2, 33, ORDER_SCHEMA),
    );
    let registry = HttpRegistry::new(transport.clone());

    let found = registry
        .schema_id(&subject("orders-value"), &schema(ORDER_SCHEMA))
        .await
        .unwrap();
    assert_eq!(found, id(33));

    let versioned = registry
        .schema_version(&subject("orders-value"), &schema(ORDER_SCHEMA))
        .await
        .unwrap();
    assert_eq!(versioned.version, version(2));
}

#[tokio::test]
async fn test_compatibility_levels() {
    let transport = MockTransport::new();
    transport.route(Method::Get, "/config", 200, r#"{"compatibilityLevel":"BACKWARD"}"#);
    transport.route(Method::Put, "/config/orders-value", 200, r#"{"compatibility":"FULL"}"#);
    let registry = HttpRegistry::new(transport.clone());

    assert_eq!(
        registry.default_compatibility().await.unwrap(),
        CompatibilityLevel::Backward
    );
    assert_eq!(
        registry
            .set_subject_compatibility(&subject("orders-value"), CompatibilityLevel::Full)
            .await
            .unwrap(),
        CompatibilityLevel::Full
    );
    assert_eq!(
        transport.last().body.as_deref(),
        Some(r#"{"compatibility":"FULL"}"#)
    );
}

#[tokio::test]
async fn test_check_compatibility_against_version() {
    let transport = MockTransport::new();
    transport.route(
        Method::Post,
        "/compatibility/subjects/orders-value/versions/latest",
        200,
        r#"{"is_compatible":false}"#,
    );
    let registry = HttpRegistry::new(transport.clone());

    let compatible = registry
        .check_compatibility(&subject("orders-value"), VersionId::Latest, &schema(STRING_SCHEMA))
        .await
        .unwrap();
    assert!(!compatible);
}

#[tokio::test]
async fn test_delete_only_sends_permanent_when_requested() {
    let transport = MockTransport::new();
    transport.route(Method::Delete, "/subjects/orders-value", 200, "[1,2]");
    transport.route(Method::Delete, "/subjects/orders-value?permanent=true", 200, "[1,2]");
    transport.route(
        Method::Delete,
        "/subjects/orders-value/versions/2?permanent=true",
        200,
        "2",
    );
    let registry = HttpRegistry::new(transport.clone());
    let orders = subject("orders-value");

    registry.delete_subject(&orders, false).await.unwrap();
    assert_eq!(transport.last().path_and_query(), "/subjects/orders-value");

    let deleted = registry.delete_subject(&orders, true).await.unwrap();
    assert_eq!(deleted, vec![version(1), version(2)]);

    let removed = registry
        .delete_subject_version(&orders, version(2).into(), true)
        .await
        .unwrap();
    assert_eq!(removed, version(2));
}

#[tokio::test]
async fn test_subjects_listing() {
    let transport = MockTransport::new();
    transport.route(Method::Get, "/subjects", 200, r#"["a-value","b-key"]"#);
    let registry = HttpRegistry::new(transport.clone());

    let subjects = registry.subjects().await.unwrap();
    assert_eq!(subjects, vec![subject("a-value"), subject("b-key")]);
}

// =============================================================================
// Error surfacing
// =============================================================================

#[tokio::test]
async fn test_registry_error_codes_are_mapped() {
    let transport = MockTransport::new();
    transport.route(
        Method::Post,
        "/subjects/orders-value/versions",
        409,
        error_body(409, "Schema being registered is incompatible"),
    );
    transport.route(
        Method::Get,
        "/subjects/missing/versions/latest",
        404,
        error_body(40401, "Subject 'missing' not found."),
    );
    transport.route(
        Method::Get,
        "/schemas/ids/99",
        404,
        error_body(40403, "Schema 99 not found"),
    );
    let registry = HttpRegistry::new(transport.clone());

    let err = registry
        .register(&subject("orders-value"), &schema(ORDER_SCHEMA), &[])
        .await
        .unwrap_err();
    match err {
        RegistryError::IncompatibleSchema { message } => {
            assert_eq!(message, "Schema being registered is incompatible")
        }
        other => panic!("Expected IncompatibleSchema, got {:?}", other),
    }

    let err = registry.latest_version(&subject("missing")).await.unwrap_err();
    assert!(matches!(err, RegistryError::SubjectNotFound { .. }));
    assert_eq!(err.error_code(), Some(40401));

    let err = registry.schema_for_id(id(99)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unclassified_failures_keep_status() {
    let transport = MockTransport::new();
    transport.route(Method::Get, "/config", 502, "<html>Bad Gateway</html>");
    let registry = HttpRegistry::new(transport.clone());

    match registry.default_compatibility().await.unwrap_err() {
        RegistryError::UnmappedServer {
            status, error_code, ..
        } => {
            assert_eq!(status, 502);
            assert_eq!(error_code, None);
        }
        other => panic!("Expected UnmappedServer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body() {
    let transport = MockTransport::new();
    transport.route(Method::Get, "/schemas/ids/5", 200, r#"{"unexpected":true}"#);
    let registry = HttpRegistry::new(transport.clone());

    let err = registry.schema_for_id(id(5)).await.unwrap_err();
    assert!(matches!(err, RegistryError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_transport_failure_is_not_a_server_error() {
    let transport = MockTransport::new();
    transport.fail_with("connection reset");
    let registry = HttpRegistry::new(transport.clone());

    let err = registry.subjects().await.unwrap_err();
    match err {
        RegistryError::Transport(e) => assert_eq!(e.message(), "connection reset"),
        other => panic!("Expected Transport, got {:?}", other),
    }
}

// =============================================================================
// Blocking forms
// =============================================================================

mod blocking {
    use super::common::*;
    use schema_registry_client::request::Method;
    use schema_registry_client::{
        BlockingBridge, BlockingHttpRegistry, BlockingRegistry, HttpRegistry, RegistryError,
        VersionId,
    };

    #[test]
    fn test_blocking_registry_matches_async_wire_contract() {
        let transport = MockTransport::new();
        transport.route(
            Method::Get,
            "/subjects/orders-value/versions/3",
            200,
            subject_version_body("orders-value", 3, 40, ORDER_SCHEMA),
        );
        let registry = BlockingHttpRegistry::new(transport.clone());

        let found = registry
            .schema_for_subject_and_version(&subject("orders-value"), VersionId::number(3).unwrap())
            .unwrap();
        assert_eq!(found.id(), id(40));
        assert_eq!(transport.last().path, "/subjects/orders-value/versions/3");
    }

    #[test]
    fn test_bridge_returns_async_result() {
        let transport = MockTransport::new();
        transport.route(Method::Get, "/schemas/ids/8", 200, schema_body(STRING_SCHEMA));
        let bridge = BlockingBridge::new(HttpRegistry::new(transport.clone())).unwrap();

        let found = bridge.schema_for_id(id(8)).unwrap();
        assert_eq!(found.id, id(8));
        assert_eq!(found.raw.as_str(), STRING_SCHEMA);
    }

    #[test]
    fn test_bridge_reraises_registry_errors() {
        let transport = MockTransport::new();
        transport.route(
            Method::Get,
            "/subjects/orders-value/versions/9",
            404,
            error_body(40402, "Version 9 not found."),
        );
        let bridge = BlockingBridge::new(HttpRegistry::new(transport.clone())).unwrap();

        let err = bridge
            .schema_for_subject_and_version(&subject("orders-value"), VersionId::number(9).unwrap())
            .unwrap_err();
        match err {
            RegistryError::VersionNotFound { message } => {
                assert_eq!(message, "Version 9 not found.")
            }
            other => panic!("Expected VersionNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_bridge_reraises_transport_errors() {
        let transport = MockTransport::new();
        transport.fail_with("timed out");
        let bridge = BlockingBridge::new(HttpRegistry::new(transport.clone())).unwrap();

        assert!(matches!(
            bridge.subjects().unwrap_err(),
            RegistryError::Transport(_)
        ));
    }
}
