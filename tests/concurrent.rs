use std::sync::Arc;

use shardset::{ops, ShardSet};

const TASKS: usize = 8;
const ITEMS: usize = 1000;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_not_lost() {
    let set = ShardSet::new();

    let handles: Vec<_> = (0..TASKS)
        .map(|t| {
            let set = set.clone();
            tokio::task::spawn_blocking(move || {
                for i in 0..ITEMS {
                    set.insert(format!("{t}-{i}"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(set.len(), TASKS * ITEMS);
    assert_eq!(set.list().len(), TASKS * ITEMS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bulk_adds_of_overlapping_items() {
    let set = ShardSet::with_shards(4);

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let set = set.clone();
            tokio::task::spawn_blocking(move || set.add((0..ITEMS).map(|i| i.to_string())))
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        inserted += handle.await.unwrap();
    }

    // Every item was inserted by exactly one of the tasks.
    assert_eq!(inserted, ITEMS);
    assert_eq!(set.len(), ITEMS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_and_remove() {
    let set = ShardSet::new();
    set.add((0..ITEMS).map(|i| format!("keep-{i}")));

    let handles: Vec<_> = (0..TASKS)
        .map(|t| {
            let set = set.clone();
            tokio::task::spawn_blocking(move || {
                for i in 0..ITEMS {
                    let item = format!("{t}-{i}");
                    set.insert(item.clone());
                    assert!(set.contains(&item));
                    set.remove([item.as_str(), "never-there"]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(set.len(), ITEMS);
    assert!(set.has(["keep-0", "keep-999"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pop_drains_each_item_once() {
    let set = ShardSet::from_iter((0..ITEMS).map(|i| i.to_string()));

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let set = set.clone();
            tokio::task::spawn_blocking(move || {
                let mut popped = Vec::new();
                while let Some(item) = set.pop() {
                    popped.push(item);
                }
                popped
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }

    all.sort();
    all.dedup();
    assert_eq!(all.len(), ITEMS);
    assert!(set.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clear_while_adding_settles() {
    let set = ShardSet::new();

    let writer = {
        let set = set.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..ITEMS {
                set.insert(i.to_string());
            }
        })
    };
    let clearer = {
        let set = set.clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..10 {
                set.clear();
            }
        })
    };

    writer.await.unwrap();
    clearer.await.unwrap();

    // Whatever survived, the counter agrees with the contents.
    assert_eq!(set.len(), set.list().len());
    set.clear();
    assert!(set.is_empty());
}

#[test]
fn test_algebra_under_concurrent_mutation() {
    let a = Arc::new(ShardSet::from_iter((0..500).map(|i| i.to_string())));
    let b = ShardSet::from_iter((250..750).map(|i| i.to_string()));

    crossbeam_utils::thread::scope(|scope| {
        let a2 = Arc::clone(&a);
        scope.spawn(move |_| {
            for i in 1000..2000 {
                a2.insert(i.to_string());
            }
        });

        for _ in 0..10 {
            let both = ops::intersection(&[a.as_ref(), &b]);
            // Items added concurrently are never in `b`, so the overlap is fixed.
            assert_eq!(both.len(), 250);
            let _ = ops::union(&[a.as_ref(), &b]);
            let _ = a.is_subset(&b);
            let _ = a.is_equal(&b);
        }
    })
    .unwrap();

    assert_eq!(a.len(), 1500);
}
