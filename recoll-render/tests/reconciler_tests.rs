use pretty_assertions::assert_eq;
use recoll_model::{EntityCollection, EntityFactory};
use recoll_render::{Binding, CollectionScope, ItemContext, ListReconciler, MemoryHost, RenderHost};
use recoll_resource::mock::MockResource;
use recoll_types::{Params, Record, RecordId};
use serde_json::json;
use std::sync::Arc;

fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).unwrap()
}

fn setup() -> (Arc<MockResource>, EntityFactory) {
    let mock = Arc::new(MockResource::new().with_records(
        "todos",
        (1..=4).map(|n| record(json!({"id": n, "title": format!("t{n}")}))),
    ));
    let factory = EntityFactory::new(mock.clone());
    (mock, factory)
}

fn collection_of(factory: &EntityFactory, n: i64) -> EntityCollection {
    factory.collection_with(
        "todos",
        Params::new(),
        (1..=n).map(|id| record(json!({"id": id}))),
    )
}

fn list() -> ListReconciler<MemoryHost> {
    ListReconciler::from_expression("todo in todos", MemoryHost::new()).unwrap()
}

fn rendered_ids(list: &ListReconciler<MemoryHost>) -> Vec<Option<RecordId>> {
    list.host().rendered().iter().map(|ctx| ctx.entity().id()).collect()
}

// ── Setup ────────────────────────────────────────────────────────

#[test]
fn construction_places_anchor() {
    let list = list();
    assert_eq!(list.host().surface(), &[*list.anchor()]);
    assert_eq!(list.host().anchor_node(), Some(*list.anchor()));
    assert!(list.rendered().is_empty());
    assert_eq!(list.binding().alias(), "todo");
}

#[test]
fn malformed_expression_fails_at_setup() {
    assert!(ListReconciler::from_expression("todos", MemoryHost::new()).is_err());
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn renders_one_node_per_item_in_order() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 4);
    let mut list = list();

    assert_eq!(list.reconcile(Some(&todos)), 4);

    let expected: Vec<_> = (1..=4).map(|n| Some(RecordId::from(n))).collect();
    assert_eq!(rendered_ids(&list), expected);
    assert_eq!(list.host().surface()[0], *list.anchor());
    assert_eq!(list.host().surface().len(), 5);
}

#[test]
fn positional_flags_on_rendered_nodes() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 4);
    let mut list = list();
    list.reconcile(Some(&todos));

    let flags: Vec<_> = list
        .host()
        .rendered()
        .iter()
        .map(|ctx| {
            let p = ctx.position();
            (p.index, p.first, p.middle, p.last, p.even, p.odd)
        })
        .collect();
    assert_eq!(
        flags,
        vec![
            (0, true, false, false, true, false),
            (1, false, true, false, false, true),
            (2, false, true, false, true, false),
            (3, false, false, true, false, true),
        ]
    );
}

#[test]
fn single_item_is_first_and_last() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 1);
    let mut list = list();
    list.reconcile(Some(&todos));

    let ctx = list.host().rendered()[0];
    let p = ctx.position();
    assert!(p.first && p.last && !p.middle);
}

#[test]
fn nodes_expose_record_under_alias() {
    let (_, factory) = setup();
    let todos = factory.collection("todos", Params::new());
    todos.push(record(json!({"id": 7, "title": "x"})));

    let mut list = ListReconciler::new(Binding::parse("row in todos").unwrap(), MemoryHost::new());
    list.reconcile(Some(&todos));

    let ctx = list.host().rendered()[0];
    assert_eq!(ctx.lookup("row"), Some(json!({"id": 7, "title": "x"})));
    assert_eq!(ctx.lookup("todo"), None);
}

#[test]
fn every_cycle_recreates_every_node() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 3);
    let mut list = list();

    list.reconcile(Some(&todos));
    let first_nodes = list.rendered().to_vec();

    list.reconcile(Some(&todos));
    let second_nodes = list.rendered().to_vec();

    assert_eq!(list.host().created(), 6);
    assert_eq!(list.host().disposed(), 3);
    assert!(first_nodes.iter().all(|n| !second_nodes.contains(n)));
    assert_eq!(list.host().rendered().len(), 3);
}

#[test]
fn absent_collection_clears_surface() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 2);
    let mut list = list();
    list.reconcile(Some(&todos));

    assert_eq!(list.reconcile(None), 0);
    assert!(list.host().rendered().is_empty());
    assert_eq!(list.host().surface(), &[*list.anchor()]);
}

#[test]
fn empty_collection_renders_nothing() {
    let (_, factory) = setup();
    let todos = factory.collection("todos", Params::new());
    let mut list = list();
    assert_eq!(list.reconcile(Some(&todos)), 0);
    assert_eq!(list.host().created(), 0);
}

#[test]
fn order_follows_latest_mutation() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 3);
    let mut list = list();
    list.reconcile(Some(&todos));

    let first = todos.first().unwrap();
    todos.remove(&first);
    todos.push(&first);
    list.reconcile(Some(&todos));

    let expected: Vec<_> = [2, 3, 1].into_iter().map(|n| Some(RecordId::from(n))).collect();
    assert_eq!(rendered_ids(&list), expected);
    assert!(list.host().rendered()[2].position().last);
}

// ── Host contract ────────────────────────────────────────────────

/// Records every host call so cycle ordering can be checked.
#[derive(Default)]
struct TracingHost {
    next: u32,
    log: Vec<String>,
}

impl RenderHost for TracingHost {
    type Node = u32;

    fn anchor(&mut self) -> u32 {
        self.log.push("anchor 0".into());
        0
    }

    fn instantiate(&mut self, context: ItemContext) -> u32 {
        self.next += 1;
        self.log.push(format!("create {} at {}", self.next, context.index()));
        self.next
    }

    fn insert_after(&mut self, node: &u32, sibling: &u32) {
        self.log.push(format!("insert {node} after {sibling}"));
    }

    fn dispose(&mut self, node: u32) {
        self.log.push(format!("dispose {node}"));
    }
}

#[test]
fn disposal_precedes_creation_and_chains_from_anchor() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 2);
    let mut list = ListReconciler::from_expression("todo in todos", TracingHost::default()).unwrap();

    list.reconcile(Some(&todos));
    list.reconcile(Some(&todos));

    assert_eq!(
        list.host().log,
        vec![
            "anchor 0",
            "create 1 at 0",
            "insert 1 after 0",
            "create 2 at 1",
            "insert 2 after 1",
            "dispose 1",
            "dispose 2",
            "create 3 at 0",
            "insert 3 after 0",
            "create 4 at 1",
            "insert 4 after 3",
        ]
    );
}

// ── Watching a scope ─────────────────────────────────────────────

#[test]
fn first_watch_always_renders() {
    let scope = CollectionScope::new();
    let mut list = list();
    assert!(list.watch(&scope));
    assert!(!list.watch(&scope));
}

#[test]
fn watch_skips_unchanged_collection() {
    let (_, factory) = setup();
    let mut scope = CollectionScope::new();
    scope.insert("todos", collection_of(&factory, 2));
    let mut list = list();

    assert!(list.watch(&scope));
    assert!(!list.watch(&scope));
    assert_eq!(list.host().created(), 2);
}

#[test]
fn watch_reacts_to_push_and_remove() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 2);
    let mut scope = CollectionScope::new();
    scope.insert("todos", todos.clone());
    let mut list = list();
    list.watch(&scope);

    todos.push(record(json!({"id": 9})));
    assert!(list.watch(&scope));
    assert_eq!(list.rendered().len(), 3);

    let first = todos.first().unwrap();
    todos.remove(&first);
    assert!(list.watch(&scope));
    assert_eq!(list.rendered().len(), 2);
}

#[test]
fn watch_reacts_to_swapped_collection() {
    let (_, factory) = setup();
    let mut scope = CollectionScope::new();
    scope.insert("todos", collection_of(&factory, 2));
    let mut list = list();
    list.watch(&scope);

    scope.insert("todos", collection_of(&factory, 3));
    assert!(list.watch(&scope));
    assert_eq!(list.rendered().len(), 3);

    scope.remove("todos");
    assert!(list.watch(&scope));
    assert!(list.rendered().is_empty());
    assert!(!list.watch(&scope));
}

#[test]
fn field_edits_do_not_trigger_a_cycle() {
    let (_, factory) = setup();
    let todos = collection_of(&factory, 2);
    let mut scope = CollectionScope::new();
    scope.insert("todos", todos.clone());
    let mut list = list();
    list.watch(&scope);

    todos.first().unwrap().set("title", json!("renamed"));
    assert!(!list.watch(&scope));
    assert_eq!(
        list.host().rendered()[0].lookup("todo").unwrap()["title"],
        json!("renamed")
    );
}

#[tokio::test]
async fn renders_query_results_once_settled() {
    let (mock, factory) = setup();
    let todos = factory.collection("todos", Params::new());
    let mut scope = CollectionScope::new();
    scope.insert("todos", todos.clone());
    let mut list = list();

    mock.pause();
    todos.query(None);
    assert!(list.watch(&scope));
    assert!(list.rendered().is_empty());

    mock.resume();
    todos.wait().await.unwrap();
    assert!(list.watch(&scope));
    assert_eq!(list.rendered().len(), 4);
    let titles: Vec<_> = list
        .host()
        .rendered()
        .iter()
        .map(|ctx| ctx.record().get("title").cloned())
        .collect();
    assert_eq!(
        titles,
        vec![Some(json!("t1")), Some(json!("t2")), Some(json!("t3")), Some(json!("t4"))]
    );
}

#[tokio::test]
async fn entity_removal_shows_on_next_cycle() {
    let (mock, factory) = setup();
    let todos = factory.collection("todos", Params::new());
    todos.query(None).wait().await.unwrap();
    let mut scope = CollectionScope::new();
    scope.insert("todos", todos.clone());
    let mut list = list();
    list.watch(&scope);
    assert_eq!(list.rendered().len(), 4);

    mock.pause();
    todos.get(3).unwrap().remove();
    assert!(list.watch(&scope));
    let expected: Vec<_> = [1, 2, 4].into_iter().map(|n| Some(RecordId::from(n))).collect();
    assert_eq!(rendered_ids(&list), expected);
    mock.resume();
}
