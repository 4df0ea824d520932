//! One behavioral suite, run against every cache backend

use schema_registry_client::cache::{
    FileStore, KeyValueStore, LruStore, MemoryCacheAdapter, StoreCacheAdapter,
};
use schema_registry_client::checksum::Checksum;
use schema_registry_client::{
    CacheAdapter, RawSchema, Schema, SchemaId, SubjectName, VersionNumber,
};
use tempfile::tempdir;

fn schema(id: i64, text: &str) -> Schema {
    Schema::new(SchemaId::new(id).unwrap(), RawSchema::parse(text).unwrap())
}

fn subject(name: &str) -> SubjectName {
    SubjectName::new(name).unwrap()
}

fn version(v: i64) -> VersionNumber {
    VersionNumber::new(v).unwrap()
}

fn check_backend(cache: &dyn CacheAdapter) {
    let order = schema(1, r#"{"type":"record","name":"Order","fields":[]}"#);
    let text = schema(2, r#"{"type":"string"}"#);
    let orders = subject("orders-value");

    // empty cache: every namespace misses without error
    assert!(cache.cached_schema_with_id(order.id).unwrap().is_none());
    assert!(!cache.has_schema_for_id(order.id).unwrap());
    assert!(cache
        .cached_schema_with_subject_and_version(&orders, version(1))
        .unwrap()
        .is_none());
    assert!(cache
        .cached_schema_id_by_hash(&Checksum::from("abc"))
        .unwrap()
        .is_none());

    // id namespace
    cache.cache_schema_with_id(&order).unwrap();
    assert_eq!(cache.cached_schema_with_id(order.id).unwrap(), Some(order.clone()));
    assert!(cache.has_schema_for_id(order.id).unwrap());
    assert!(!cache.has_schema_for_id(text.id).unwrap());

    // subject + version namespace is keyed by both parts
    cache
        .cache_schema_with_subject_and_version(&orders, version(1), &order)
        .unwrap();
    cache
        .cache_schema_with_subject_and_version(&orders, version(2), &text)
        .unwrap();
    assert_eq!(
        cache
            .cached_schema_with_subject_and_version(&orders, version(1))
            .unwrap(),
        Some(order.clone())
    );
    assert_eq!(
        cache
            .cached_schema_with_subject_and_version(&orders, version(2))
            .unwrap(),
        Some(text.clone())
    );
    assert!(!cache
        .has_schema_for_subject_and_version(&subject("payments-value"), version(1))
        .unwrap());

    // a subject ending in the separator does not collide with a shorter one
    cache
        .cache_schema_with_subject_and_version(&subject("a_1"), version(2), &text)
        .unwrap();
    assert!(!cache
        .has_schema_for_subject_and_version(&subject("a"), version(12))
        .unwrap());

    // hash namespace
    let hash = Checksum::of_schema(&text.raw);
    cache.cache_schema_id_by_hash(&hash, text.id).unwrap();
    assert_eq!(cache.cached_schema_id_by_hash(&hash).unwrap(), Some(text.id));
    assert!(cache.has_schema_id_for_hash(&hash).unwrap());

    // rewriting a fact is idempotent
    cache.cache_schema_with_id(&order).unwrap();
    assert_eq!(cache.cached_schema_with_id(order.id).unwrap(), Some(order.clone()));

    // the original text is kept verbatim
    let spaced = schema(3, "{ \"type\" : \"int\" }");
    cache.cache_schema_with_id(&spaced).unwrap();
    assert_eq!(
        cache
            .cached_schema_with_id(spaced.id)
            .unwrap()
            .unwrap()
            .raw
            .as_str(),
        "{ \"type\" : \"int\" }"
    );
}

#[test]
fn test_memory_backend() {
    check_backend(&MemoryCacheAdapter::new());
}

#[test]
fn test_lru_backend() {
    check_backend(&StoreCacheAdapter::new(LruStore::new(128)));
}

#[test]
fn test_file_backend() {
    let dir = tempdir().unwrap();
    check_backend(&StoreCacheAdapter::new(FileStore::open(dir.path()).unwrap()));
}

#[test]
fn test_file_backend_survives_reopen() {
    let dir = tempdir().unwrap();
    let order = schema(42, r#"{"type":"long"}"#);
    {
        let cache = StoreCacheAdapter::new(FileStore::open(dir.path()).unwrap());
        cache.cache_schema_with_id(&order).unwrap();
    }

    let cache = StoreCacheAdapter::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(cache.cached_schema_with_id(order.id).unwrap(), Some(order));
}

#[test]
fn test_lru_eviction_is_a_miss() {
    let cache = StoreCacheAdapter::new(LruStore::new(1));
    let first = schema(1, r#"{"type":"string"}"#);
    let second = schema(2, r#"{"type":"int"}"#);

    cache.cache_schema_with_id(&first).unwrap();
    cache.cache_schema_with_id(&second).unwrap();

    assert!(cache.cached_schema_with_id(first.id).unwrap().is_none());
    assert_eq!(cache.cached_schema_with_id(second.id).unwrap(), Some(second));
    assert_eq!(cache.store().len(), 1);
}

#[test]
fn test_corrupt_file_entry_is_an_error() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.set("schema:id:5", "{truncated".to_string()).unwrap();

    let cache = StoreCacheAdapter::new(store);
    assert!(cache.cached_schema_with_id(SchemaId::new(5).unwrap()).is_err());
}
