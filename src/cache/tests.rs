//! Backend contract tests.
//!
//! Every shipped backend must behave identically, so the same suite runs
//! against the memory backend and the durable backend.

use super::*;
use crate::config::Settings;
use serde_json::{Number, json};

const NOW: i64 = 1_700_000_000;

fn memory_backend(clock: &ManualClock) -> MemoryBackend {
    StoreBackend::memory(&Settings::multisite(1, 1)).with_clock(clock.clone())
}

fn durable_backend(clock: &ManualClock) -> DurableBackend<medium::MemoryMedium> {
    StoreBackend::durable(medium::MemoryMedium::new(), &Settings::multisite(1, 1))
        .with_clock(clock.clone())
}

fn groups(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

macro_rules! backend_contract {
    ($module:ident, $make:ident) => {
        mod $module {
            use super::*;

            fn backend() -> (impl CacheBackend, ManualClock) {
                let clock = ManualClock::new(NOW);
                ($make(&clock), clock)
            }

            #[test]
            fn test_add_does_not_overwrite() {
                let (mut b, _) = backend();
                assert!(b.add("k", json!("v"), "g", 0));
                assert!(!b.add("k", json!("v2"), "g", 0));
                assert_eq!(b.get("k", "g"), Some(json!("v")));
            }

            #[test]
            fn test_replace_requires_existing() {
                let (mut b, _) = backend();
                assert!(!b.replace("k", json!("v3"), "g", 0));
                assert_eq!(b.get("k", "g"), None);

                b.set("k", json!("v"), "g", 0);
                assert!(b.replace("k", json!("v3"), "g", 0));
                assert_eq!(b.get("k", "g"), Some(json!("v3")));
            }

            #[test]
            fn test_set_overwrites() {
                let (mut b, _) = backend();
                assert!(b.set("k", json!(1), "g", 0));
                assert!(b.set("k", json!(2), "g", 0));
                assert_eq!(b.get("k", "g"), Some(json!(2)));
            }

            #[test]
            fn test_same_key_in_different_groups() {
                let (mut b, _) = backend();
                b.set("k", json!("a"), "one", 0);
                b.set("k", json!("b"), "two", 0);
                assert_eq!(b.get("k", "one"), Some(json!("a")));
                assert_eq!(b.get("k", "two"), Some(json!("b")));
            }

            #[test]
            fn test_expiration_frees_slot() {
                let (mut b, clock) = backend();
                b.set("k", json!("v"), "g", 1);
                assert_eq!(b.get("k", "g"), Some(json!("v")));

                // Still live at the expiry second itself
                clock.advance(1);
                assert_eq!(b.get("k", "g"), Some(json!("v")));

                clock.advance(1);
                assert_eq!(b.get("k", "g"), None);
                assert!(b.add("k", json!("v2"), "g", 0));
                assert_eq!(b.get("k", "g"), Some(json!("v2")));
            }

            #[test]
            fn test_expired_entry_cannot_be_replaced_or_removed() {
                let (mut b, clock) = backend();
                b.set("k", json!("v"), "g", 5);
                clock.advance(10);

                assert!(!b.replace("k", json!("v2"), "g", 0));
                assert!(!b.remove("k", "g"));
                assert_eq!(b.incr("k", 1, "g"), None);
            }

            #[test]
            fn test_remove() {
                let (mut b, _) = backend();
                assert!(!b.remove("k", "g"));
                b.set("k", json!(1), "g", 0);
                assert!(b.remove("k", "g"));
                assert_eq!(b.get("k", "g"), None);
                assert!(!b.remove("k", "g"));
            }

            #[test]
            fn test_flush() {
                let (mut b, _) = backend();
                b.set("k1", json!(1), "one", 0);
                b.set("k2", json!(2), "two", 0);

                assert!(b.flush());
                assert_eq!(b.get("k1", "one"), None);
                assert_eq!(b.get("k2", "two"), None);
            }

            #[test]
            fn test_decr_clamps_at_zero() {
                let (mut b, _) = backend();
                b.set("k", json!(5), "g", 0);
                assert_eq!(b.decr("k", 10, "g"), Some(Number::from(0)));
                assert_eq!(b.get("k", "g"), Some(json!(0)));
            }

            #[test]
            fn test_incr_negative_offset_clamps_at_zero() {
                let (mut b, _) = backend();
                b.set("k", json!(3), "g", 0);
                assert_eq!(b.incr("k", -7, "g"), Some(Number::from(0)));
            }

            #[test]
            fn test_incr_non_numeric_counts_as_zero() {
                let (mut b, _) = backend();
                b.set("k", json!("x"), "g", 0);
                assert_eq!(b.incr("k", 1, "g"), Some(Number::from(1)));
                assert_eq!(b.incr("k", 2, "g"), Some(Number::from(3)));
                assert_eq!(b.get("k", "g"), Some(json!(3)));
            }

            #[test]
            fn test_incr_missing_entry() {
                let (mut b, _) = backend();
                assert_eq!(b.incr("k", 1, "g"), None);
                assert_eq!(b.decr("k", 1, "g"), None);
                assert_eq!(b.get("k", "g"), None);
            }

            #[test]
            fn test_incr_keeps_expiry() {
                let (mut b, clock) = backend();
                b.set("k", json!(1), "g", 10);
                b.incr("k", 1, "g");

                clock.advance(11);
                assert_eq!(b.get("k", "g"), None);
            }

            #[test]
            fn test_values_are_isolated() {
                let (mut b, _) = backend();
                let mut original = json!({"a": 1});
                b.set("k", original.clone(), "g", 0);
                original["a"] = json!(2);

                let mut fetched = b.get("k", "g").unwrap();
                assert_eq!(fetched["a"], json!(1));

                fetched["a"] = json!(3);
                assert_eq!(b.get("k", "g").unwrap()["a"], json!(1));
            }

            #[test]
            fn test_structured_values() {
                let (mut b, _) = backend();
                let value = json!({"list": [1, 2, null], "nested": {"ok": true}, "text": "é"});
                b.set("k", value.clone(), "g", 0);
                assert_eq!(b.get("k", "g"), Some(value));

                b.set("null", json!(null), "g", 0);
                assert_eq!(b.get("null", "g"), Some(json!(null)));
                assert!(!b.add("null", json!(1), "g", 0));
            }

            #[test]
            fn test_site_scoped_groups_follow_site() {
                let (mut b, _) = backend();
                b.set("k", json!("site1"), "posts", 0);

                assert!(b.switch_to_site(2));
                assert_eq!(b.get("k", "posts"), None);
                b.set("k", json!("site2"), "posts", 0);

                b.switch_to_site(1);
                assert_eq!(b.get("k", "posts"), Some(json!("site1")));
            }

            #[test]
            fn test_global_groups_ignore_scope() {
                let (mut b, _) = backend();
                b.add_global_groups(&groups(&["options"]));
                b.set("k", json!("shared"), "options", 0);

                b.switch_to_site(2);
                b.switch_to_network(3);
                assert_eq!(b.get("k", "options"), Some(json!("shared")));
            }

            #[test]
            fn test_network_groups_follow_network() {
                let (mut b, _) = backend();
                b.add_network_groups(&groups(&["users"]));
                b.set("k", json!("net1"), "users", 0);

                b.switch_to_site(2);
                assert_eq!(b.get("k", "users"), Some(json!("net1")));

                assert!(b.switch_to_network(2));
                assert_eq!(b.get("k", "users"), None);
            }

            #[test]
            fn test_reclassification_is_idempotent() {
                let (mut b, _) = backend();
                b.add_global_groups(&groups(&["g"]));
                b.set("k", json!(1), "g", 0);
                b.add_global_groups(&groups(&["g", "g"]));

                b.switch_to_site(2);
                assert_eq!(b.get("k", "g"), Some(json!(1)));
            }

            #[test]
            fn test_non_persistent_groups_still_cache() {
                let (mut b, _) = backend();
                b.add_non_persistent_groups(&groups(&["session"]));
                assert!(b.set("k", json!(1), "session", 0));
                assert_eq!(b.get("k", "session"), Some(json!(1)));
                assert_eq!(b.incr("k", 1, "session"), Some(Number::from(2)));
            }

            #[test]
            fn test_requirements_probe_is_repeatable() {
                let (b, _) = backend();
                assert!(b.check_requirements());
                assert!(b.check_requirements());
            }
        }
    };
}

backend_contract!(memory_contract, memory_backend);
backend_contract!(durable_contract, durable_backend);

#[test]
fn test_memory_backend_has_no_lifecycle() {
    let clock = ManualClock::new(NOW);
    let mut backend = memory_backend(&clock);
    assert!(backend.lifecycle().is_none());
}

#[test]
fn test_durable_survives_reload() {
    let medium = medium::MemoryMedium::new();
    let settings = Settings::default();

    let mut first = StoreBackend::durable(medium.clone(), &settings);
    first.set("k", json!({"a": 1}), "g", 0);
    first.add_non_persistent_groups(&groups(&["session"]));
    first.set("s", json!(1), "session", 0);

    let mut second = StoreBackend::durable(medium, &settings);
    second.add_non_persistent_groups(&groups(&["session"]));
    assert_eq!(second.get("k", "g"), Some(json!({"a": 1})));
    assert_eq!(second.get("s", "session"), None);
}

#[test]
fn test_durable_flush_leaves_other_namespaces() {
    let medium = medium::MemoryMedium::new();
    let settings = Settings::default();

    let mut ours = StoreBackend::durable(medium.clone(), &settings);
    let mut theirs = StoreBackend::new(
        DurableStore::new(medium.clone()).with_namespace("otherSite"),
        &settings,
    );
    medium.set_item("unrelated", "data").unwrap();

    ours.set("k", json!(1), "g", 0);
    theirs.set("k", json!(2), "g", 0);

    assert!(ours.flush());
    assert_eq!(ours.get("k", "g"), None);
    assert_eq!(theirs.get("k", "g"), Some(json!(2)));
    assert_eq!(medium.get_item("unrelated").unwrap(), Some("data".to_string()));
}

#[test]
fn test_durable_get_purges_corrupt_slot() {
    let medium = medium::MemoryMedium::new();
    let mut backend = StoreBackend::durable(medium.clone(), &Settings::default());

    medium
        .set_item("wpCache:default:site1_k", "not json at all")
        .unwrap();
    assert_eq!(backend.get("k", "default"), None);
    assert_eq!(medium.get_item("wpCache:default:site1_k").unwrap(), None);

    // The slot is free again
    assert!(backend.add("k", json!(1), "default", 0));
}

#[test]
fn test_durable_requirements_follow_medium() {
    let medium = medium::MemoryMedium::new();
    let backend = StoreBackend::durable(medium.clone(), &Settings::default());
    assert!(backend.check_requirements());

    medium.set_available(false);
    assert!(!backend.check_requirements());
}

#[test]
fn test_durable_init_sweeps_expired_entries() {
    let clock = ManualClock::new(NOW);
    let medium = medium::MemoryMedium::new();
    let mut backend =
        StoreBackend::durable(medium.clone(), &Settings::default()).with_clock(clock.clone());

    backend.set("short", json!(1), "g", 5);
    backend.set("long", json!(1), "g", 0);
    clock.advance(60);

    let lifecycle = backend.lifecycle().unwrap();
    lifecycle.init();
    assert_eq!(medium.len(), 1);
}

#[test]
fn test_durable_write_failure() {
    let medium = medium::MemoryMedium::new().with_quota(40);
    let mut backend = StoreBackend::durable(medium, &Settings::default());

    assert!(!backend.set("k", json!("a value far too large for the quota"), "g", 0));
    assert!(!backend.add("k", json!("a value far too large for the quota"), "g", 0));
    assert_eq!(backend.get("k", "g"), None);
}

#[cfg(feature = "redb")]
#[test]
fn test_durable_over_redb_survives_reopen() {
    use tempfile::TempDir;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cache.redb");
    let settings = Settings::default();

    {
        let medium = medium::RedbMedium::open(&path).unwrap();
        let mut backend = StoreBackend::durable(medium, &settings);
        backend.set("counter", json!(1), "stats", 0);
        backend.incr("counter", 4, "stats");
    }

    let medium = medium::RedbMedium::open(&path).unwrap();
    let mut backend = StoreBackend::durable(medium, &settings);
    assert_eq!(backend.get("counter", "stats"), Some(json!(5)));
    assert!(backend.flush());
    assert_eq!(backend.get("counter", "stats"), None);
}
