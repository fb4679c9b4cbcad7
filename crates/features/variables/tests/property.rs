mod fixtures;

use fixtures::memory_store;
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn listing_never_exposes_values(
        entries in prop::collection::vec(("[A-Z_][A-Z0-9_]{0,11}", any::<String>()), 1..8)
    ) {
        let listed = runtime().block_on(async {
            let store = memory_store();
            for (name, value) in &entries {
                store.set_variable("proj-1", name, value).await.unwrap();
            }
            store.list_variables("proj-1").await.unwrap()
        });

        prop_assert!(!listed.is_empty());
        for view in &listed {
            prop_assert!(!view.contains("value"));
            prop_assert!(view.contains("name"));
            prop_assert!(view.contains("id"));
        }
    }

    #[test]
    fn last_write_wins(values in prop::collection::vec(any::<String>(), 1..6)) {
        let (revealed, count) = runtime().block_on(async {
            let store = memory_store();
            for value in &values {
                store.set_variable("proj-1", "SECRET", value).await.unwrap();
            }
            (
                store.reveal("proj-1", "SECRET").await.unwrap(),
                store.count_variables("proj-1").await.unwrap(),
            )
        });

        prop_assert_eq!(revealed.as_str(), values[values.len() - 1].as_str());
        prop_assert_eq!(count, 1);
    }
}
