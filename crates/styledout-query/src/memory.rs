//! In-memory backend for tests, demos, and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::QueryBackend;
use crate::clause::compare_values;
use crate::error::QueryError;
use crate::lookup::{DetailLookup, LANGUAGE_CODES};
use crate::params::Params;
use crate::stored::{Dir, StoredQuery, Window};
use crate::{ItemId, QueryId, Row};

/// An item: the unit a stored query selects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier, exposed to rows as the `id` column.
    pub id: ItemId,
    /// Entity type, matched against `StoredQuery::entity`.
    pub entity: String,
    /// Flat column map.
    #[serde(default)]
    pub fields: Row,
}

impl Item {
    /// Creates an item without columns.
    pub fn new(id: ItemId, entity: impl Into<String>) -> Self {
        Item {
            id,
            entity: entity.into(),
            fields: Row::new(),
        }
    }

    /// Adds a column, builder style.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    fn column(&self, name: &str) -> Option<Value> {
        if name == "id" {
            Some(Value::from(self.id))
        } else {
            self.fields.get(name).cloned()
        }
    }
}

/// A detail: one property value attached to an item, optionally translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    /// Owning item.
    pub item_id: ItemId,
    /// Detail key.
    pub key: String,
    /// Stored value.
    pub value: Value,
    /// Language code for translated details, `None` for untranslated ones.
    #[serde(default)]
    pub language: Option<String>,
}

/// A directed link between two items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link origin.
    pub source: ItemId,
    /// Link target.
    pub target: ItemId,
}

/// A complete in-memory data set implementing [`QueryBackend`].
///
/// The whole store is serde-deserializable so a workspace file can carry it:
///
/// ```json
/// {
///   "items": [{"id": 1, "entity": "product", "fields": {"title": "Shoes"}}],
///   "details": [{"item_id": 1, "key": "color", "value": "red"}],
///   "links": [{"source": 1, "target": 2}],
///   "queries": [{"id": 100, "name": "products", "entity": "product"}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    /// All items.
    #[serde(default)]
    pub items: Vec<Item>,
    /// All item details.
    #[serde(default)]
    pub details: Vec<Detail>,
    /// All item links.
    #[serde(default)]
    pub links: Vec<Link>,
    /// All stored queries.
    #[serde(default)]
    pub queries: Vec<StoredQuery>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Adds an item.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Adds an untranslated detail.
    pub fn add_detail(&mut self, item_id: ItemId, key: impl Into<String>, value: Value) {
        self.details.push(Detail {
            item_id,
            key: key.into(),
            value,
            language: None,
        });
    }

    /// Adds a translated detail.
    pub fn add_translation(
        &mut self,
        item_id: ItemId,
        key: impl Into<String>,
        language: impl Into<String>,
        value: Value,
    ) {
        self.details.push(Detail {
            item_id,
            key: key.into(),
            value,
            language: Some(language.into()),
        });
    }

    /// Adds a link.
    pub fn add_link(&mut self, source: ItemId, target: ItemId) {
        self.links.push(Link { source, target });
    }

    /// Adds a stored query.
    pub fn add_query(&mut self, query: StoredQuery) {
        self.queries.push(query);
    }

    /// Looks a stored query up by id.
    pub fn query(&self, id: QueryId) -> Option<&StoredQuery> {
        self.queries.iter().find(|q| q.id == id)
    }

    /// Looks an item up by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    fn detail_values(&self, item_id: ItemId, key: &str) -> Vec<&Value> {
        self.details
            .iter()
            .filter(|d| d.item_id == item_id && d.key == key && d.language.is_none())
            .map(|d| &d.value)
            .collect()
    }

    fn translation(&self, item_id: ItemId, key: &str, language: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|d| {
                d.item_id == item_id && d.key == key && d.language.as_deref() == Some(language)
            })
            .map(|d| &d.value)
    }

    fn project(item: &Item, select: Option<&Vec<String>>) -> Row {
        match select {
            Some(columns) => {
                let mut row = Row::new();
                for column in columns {
                    row.insert(
                        column.clone(),
                        item.column(column).unwrap_or(Value::Null),
                    );
                }
                row
            }
            None => {
                let mut row = item.fields.clone();
                row.insert("id".to_string(), Value::from(item.id));
                row
            }
        }
    }
}

impl QueryBackend for MemoryStore {
    fn run_stored(
        &self,
        id: QueryId,
        params: &Params,
        window: Window,
    ) -> Result<Vec<Row>, QueryError> {
        let query = self.query(id).ok_or(QueryError::UnknownQuery(id))?;

        let mut matches: Vec<&Item> = Vec::new();
        for item in self.items.iter().filter(|i| i.entity == query.entity) {
            let mut keep = true;
            for clause in &query.clauses {
                let column = item.column(&clause.field);
                if !clause.matches(column.as_ref(), params)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matches.push(item);
            }
        }

        if !query.order_by.is_empty() {
            matches.sort_by(|a, b| {
                for order in &query.order_by {
                    let left = a.column(&order.field);
                    let right = b.column(&order.field);
                    let ordering = match (&left, &right) {
                        (Some(l), Some(r)) => {
                            compare_values(l, r).unwrap_or(std::cmp::Ordering::Equal)
                        }
                        (Some(_), None) => std::cmp::Ordering::Greater,
                        (None, Some(_)) => std::cmp::Ordering::Less,
                        (None, None) => std::cmp::Ordering::Equal,
                    };
                    let ordering = match order.dir {
                        Dir::Asc => ordering,
                        Dir::Desc => ordering.reverse(),
                    };
                    if ordering != std::cmp::Ordering::Equal {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        Ok(matches
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|item| Self::project(item, query.select.as_ref()))
            .collect())
    }

    fn run_lookup(&self, lookup: &DetailLookup) -> Result<Vec<Row>, QueryError> {
        let rows = match lookup {
            DetailLookup::Single { item_id, key } => self
                .detail_values(*item_id, key)
                .first()
                .map(|v| value_row(v))
                .into_iter()
                .collect(),
            DetailLookup::Multi { item_id, key } => self
                .detail_values(*item_id, key)
                .into_iter()
                .map(value_row)
                .collect(),
            DetailLookup::Language { item_id, key } => {
                let mut row = Row::new();
                let mut any = false;
                for code in LANGUAGE_CODES {
                    let value = self.translation(*item_id, key, code);
                    any |= value.is_some();
                    row.insert(code.to_string(), value.cloned().unwrap_or(Value::Null));
                }
                if any { vec![row] } else { Vec::new() }
            }
            DetailLookup::Linked { item_id, key } => self
                .links
                .iter()
                .find(|l| l.source == *item_id)
                .and_then(|l| self.detail_values(l.target, key).first().copied())
                .map(value_row)
                .into_iter()
                .collect(),
        };
        Ok(rows)
    }
}

fn value_row(value: &Value) -> Row {
    let mut row = Row::new();
    row.insert("value".to_string(), value.clone());
    row
}
