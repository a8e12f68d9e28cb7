use component_macros::Component;
use di_abstractions::{Component as _, Implementation, Implements, Ref};

trait Store: Send + Sync {}

#[derive(Component)]
#[component(name = "tuple-store", tag = "memory")]
struct TupleStore(Implements<dyn Store>);

impl Store for TupleStore {}

#[derive(Component)]
struct Consumer {
    base: Implements<dyn Store>,
    store: Ref<dyn Store>,
    #[component(skip)]
    retries: u8,
}

impl Store for Consumer {}

fn main() {
    assert_eq!(TupleStore::component_name(), "tuple-store");
    assert_eq!(<TupleStore as Implementation>::tag(), Some("memory"));

    let consumer = Consumer::allocate();
    assert_eq!(consumer.references().len(), 1);
    assert_eq!(consumer.retries, 0);
    assert!(consumer.store.try_get().is_none());
    let _ = &consumer.base;
}
