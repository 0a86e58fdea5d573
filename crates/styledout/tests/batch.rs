//! Batch rendering over item lists.

use serde_json::json;

use styledout::{
    OutputCatalog, RenderRequest, RenderScope, Resolver, ReturnFormat, StyledError, StyledOutput,
};
use styledout_query::{
    Clause, DetailLookup, Item, MemoryStore, Op, Params, QueryBackend, QueryError, QueryId, Row,
    StoredQuery, Window,
};

fn fixture() -> (MemoryStore, OutputCatalog) {
    let mut store = MemoryStore::new();
    store.add_item(Item::new(1, "product").field("title", json!("Red Shoes")));
    store.add_item(Item::new(2, "product").field("title", json!("Blue Hat")));
    store.add_item(Item::new(3, "product").field("title", json!("Green Coat")));
    store.add_query(StoredQuery {
        id: 100,
        name: "one-product".into(),
        entity: "product".into(),
        clauses: vec![Clause::param("id", Op::Eq, "styled_id")],
        order_by: vec![],
        select: None,
    });

    let mut def = StyledOutput::new(10, "product-card", 100);
    def.format_item = r#"{"title": "{title}"}"#.into();
    def.format_empty = "null".into();
    let mut catalog = OutputCatalog::new();
    catalog.insert(def);

    (store, catalog)
}

/// Delegating backend that fails stored queries for one poisoned item id.
struct FailingBackend<'a> {
    inner: &'a MemoryStore,
    poisoned: u64,
}

impl QueryBackend for FailingBackend<'_> {
    fn run_stored(
        &self,
        id: QueryId,
        params: &Params,
        window: Window,
    ) -> Result<Vec<Row>, QueryError> {
        if params.get("styled_id") == Some(&json!(self.poisoned)) {
            return Err(QueryError::Execution {
                message: "replica unavailable".into(),
                source: None,
            });
        }
        self.inner.run_stored(id, params, window)
    }

    fn run_lookup(&self, lookup: &DetailLookup) -> Result<Vec<Row>, QueryError> {
        self.inner.run_lookup(lookup)
    }
}

#[test]
fn batch_renders_every_item_under_its_own_id() {
    let (store, catalog) = fixture();
    let resolver = Resolver::new(&catalog, &store);

    let outcome = resolver.render_for_items(
        &RenderScope::default(),
        10,
        &[1, 2, 3],
        &Params::new(),
        &RenderRequest::default(),
    );

    assert!(outcome.is_complete());
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.rendered[&1], r#"{"title": "Red Shoes"}"#);
    assert_eq!(outcome.rendered[&2], r#"{"title": "Blue Hat"}"#);
    assert_eq!(outcome.rendered[&3], r#"{"title": "Green Coat"}"#);
}

#[test]
fn batch_renders_format_empty_for_unknown_items() {
    let (store, catalog) = fixture();
    let resolver = Resolver::new(&catalog, &store);

    let outcome = resolver.render_for_items(
        &RenderScope::default(),
        10,
        &[1, 999],
        &Params::new(),
        &RenderRequest::default(),
    );

    assert!(outcome.is_complete());
    assert_eq!(outcome.rendered[&999], "null");
}

#[test]
fn batch_isolates_per_item_failures() {
    let (store, catalog) = fixture();
    let backend = FailingBackend {
        inner: &store,
        poisoned: 2,
    };
    let resolver = Resolver::new(&catalog, &backend);

    let outcome = resolver.render_for_items(
        &RenderScope::default(),
        10,
        &[1, 2, 3],
        &Params::new(),
        &RenderRequest::default(),
    );

    assert!(!outcome.is_complete());
    assert_eq!(outcome.rendered.len(), 2);
    assert!(outcome.rendered.contains_key(&1));
    assert!(outcome.rendered.contains_key(&3));
    assert!(matches!(
        outcome.failed[&2],
        StyledError::Query(QueryError::Execution { .. })
    ));
}

#[test]
fn batch_format_restriction_applies_to_every_item() {
    let (store, mut catalog) = fixture();
    let mut raw = StyledOutput::new(11, "raw-card", 100);
    raw.return_type = ReturnFormat::Raw;
    raw.format_item = "{title}".into();
    catalog.insert(raw);

    let resolver = Resolver::new(&catalog, &store);
    let request = RenderRequest {
        allowed_formats: Some(vec![ReturnFormat::Json]),
        ..RenderRequest::default()
    };

    let outcome = resolver.render_for_items(&RenderScope::default(), 11, &[1, 2], &Params::new(), &request);
    assert!(outcome.rendered.is_empty());
    assert_eq!(outcome.failed.len(), 2);
    assert!(outcome
        .failed
        .values()
        .all(|e| matches!(e, StyledError::NotAllowed { id: 11, .. })));
}

#[test]
fn batch_on_an_empty_item_list_is_empty() {
    let (store, catalog) = fixture();
    let resolver = Resolver::new(&catalog, &store);

    let outcome = resolver.render_for_items(
        &RenderScope::default(),
        10,
        &[],
        &Params::new(),
        &RenderRequest::default(),
    );
    assert!(outcome.is_empty());
    assert!(outcome.is_complete());
}
