//! End-to-end cart behaviour through the public store API.

use std::cell::RefCell;
use std::rc::Rc;

use turbo_cache::{Cache, FileStore, MemoryStore};
use turbo_cart::prelude::*;

fn product(id: i64, name: &str, price: u64) -> Product {
    Product::new(id, name, Price::from_minor(price), format!("/img/{}.jpg", id))
}

fn recorder(store: &CartStore) -> (Subscription, Rc<RefCell<Vec<CartSnapshot>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let sub = store.subscribe(move |s| log.borrow_mut().push(s.clone()));
    (sub, seen)
}

#[test]
fn adding_twice_merges_into_one_line() {
    let store = CartStore::in_memory();
    store.add_to_cart(product(1, "A", 10));
    store.add_to_cart(product(1, "A", 10));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.entries[0].quantity, 2);
    assert_eq!(snapshot.total_price, Price::from_minor(20));
}

#[test]
fn removing_one_line_leaves_the_other() {
    let store = CartStore::in_memory();
    store.add_to_cart(product(1, "A", 10));
    store.add_to_cart(product(2, "B", 5));
    store.remove_from_cart(&ProductId::from(1));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.entries[0].id, ProductId::from(2));
    assert_eq!(snapshot.total_items, 1);
    assert_eq!(snapshot.total_price, Price::from_minor(5));

    store.update_quantity(&ProductId::from(2), 0);
    let snapshot = store.snapshot();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.total_items, 0);
    assert_eq!(snapshot.total_price, Price::ZERO);
}

#[test]
fn reload_restores_entries_in_order() {
    let slot = MemoryStore::new();
    let first = CartStore::open(Cache::new(slot.clone()), StoreConfig::default());
    first.add_to_cart(product(2, "B", 5));
    first.add_to_cart(product(1, "A", 10));
    first.add_to_cart(product(1, "A", 10));
    let before = first.snapshot().entries;
    drop(first);

    let reopened = CartStore::open(Cache::new(slot), StoreConfig::default());
    assert_eq!(reopened.snapshot().entries, before);
}

#[test]
fn file_backed_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = CartStore::open(
            Cache::new(FileStore::open(dir.path()).unwrap()),
            StoreConfig::default(),
        );
        store.add_to_cart(Product::new("sku-9", "Poster", Price::from_minor(2500), ""));
        store.add_to_cart(product(4, "Pin", 300));
        store.update_quantity(&ProductId::from(4), 6);
    }

    let store = CartStore::open(Cache::open(dir.path()).unwrap(), StoreConfig::default());
    let snapshot = store.snapshot();
    let ids: Vec<ProductId> = snapshot.entries.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, vec![ProductId::from("sku-9"), ProductId::from(4)]);
    assert_eq!(snapshot.total_items, 7);
    assert_eq!(snapshot.total_price, Price::from_minor(2500 + 6 * 300));
}

#[test]
fn corrupt_slot_starts_empty_and_is_overwritten() {
    let slot = MemoryStore::new();
    slot.insert_raw("cart", "{{{{");

    let store = CartStore::open(Cache::new(slot.clone()), StoreConfig::default());
    assert!(store.snapshot().is_empty());

    store.add_to_cart(product(1, "A", 10));
    let reopened = CartStore::open(Cache::new(slot), StoreConfig::default());
    assert_eq!(reopened.snapshot().total_items, 1);
}

#[test]
fn subscribers_each_see_every_update() {
    let store = CartStore::in_memory();
    let (first, first_seen) = recorder(&store);
    let (second, second_seen) = recorder(&store);

    store.add_to_cart(product(1, "A", 10));

    for seen in [&first_seen, &second_seen] {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2, "primed once, notified once");
        assert!(seen[0].is_empty());
        assert_eq!(seen[1].total_items, 1);
    }

    first.unsubscribe();
    assert!(!first.is_active());
    store.add_to_cart(product(1, "A", 10));

    assert_eq!(first_seen.borrow().len(), 2);
    assert_eq!(second_seen.borrow().len(), 3);
    assert_eq!(second_seen.borrow()[2].total_items, 2);
    assert!(second.is_active());
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn notifications_follow_mutation_order() {
    let store = CartStore::in_memory();
    let (_sub, seen) = recorder(&store);

    store.add_to_cart(product(1, "A", 10));
    store.add_to_cart(product(2, "B", 5));
    store.update_quantity(&ProductId::from(1), 4);
    store.remove_from_cart(&ProductId::from(2));
    store.remove_from_cart(&ProductId::from(2));
    store.clear_cart();

    let revisions: Vec<u64> = seen.borrow().iter().map(|s| s.revision).collect();
    assert_eq!(revisions, vec![0, 1, 2, 3, 4, 5]);
    let items: Vec<u64> = seen.borrow().iter().map(|s| s.total_items).collect();
    assert_eq!(items, vec![0, 1, 2, 5, 4, 0]);
}

#[test]
fn listener_may_unsubscribe_itself() {
    let store = CartStore::in_memory();
    let calls = Rc::new(RefCell::new(0));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let counter = Rc::clone(&calls);
    let own = Rc::clone(&slot);
    let sub = store.subscribe(move |s| {
        *counter.borrow_mut() += 1;
        if s.total_items > 0 {
            if let Some(sub) = own.borrow().as_ref() {
                sub.unsubscribe();
            }
        }
    });
    *slot.borrow_mut() = Some(sub);

    store.add_to_cart(product(1, "A", 10));
    store.add_to_cart(product(1, "A", 10));

    assert_eq!(*calls.borrow(), 2);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn quota_failure_keeps_session_usable() {
    let slot = MemoryStore::with_quota(100);
    let store = CartStore::open(Cache::new(slot.clone()), StoreConfig::default());

    store.add_to_cart(product(1, "A", 10));
    assert!(store.persist_warning().is_none());

    store.add_to_cart(product(2, "A much longer product name that will not fit", 10));
    let warning = store.persist_warning().expect("write should exceed the quota");
    assert!(warning.to_string().contains("cart not saved"));
    assert_eq!(store.snapshot().len(), 2);

    // The slot still holds the last cart that fit.
    let reopened = CartStore::open(Cache::new(slot.share_with_quota(None)), StoreConfig::default());
    assert_eq!(reopened.snapshot().len(), 1);
}

#[test]
fn checkout_hands_off_and_clears() {
    let store = CartStore::in_memory();
    let (_sub, seen) = recorder(&store);
    store.add_to_cart(product(1, "A", 1000));

    let handoff = checkout(&store, &CheckoutConfig::new("34600111222")).unwrap();
    assert!(handoff.message.contains("\u{2022} A x1 - \u{20ac}10.00"));
    assert!(handoff.url.contains("text=Hola%21"));
    assert!(store.snapshot().is_empty());
    assert!(seen.borrow().last().unwrap().is_empty());
}
