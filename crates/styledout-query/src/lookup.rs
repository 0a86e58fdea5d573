//! Typed detail lookups behind the built-in placeholder keywords.

use crate::ItemId;

/// Language codes a [`DetailLookup::Language`] row carries, in column order.
///
/// The three-language shape is fixed; backends fill missing translations
/// with JSON null.
pub const LANGUAGE_CODES: [&str; 3] = ["nl", "vl", "fr"];

/// A property read for one item, executed through
/// [`QueryBackend::run_lookup`](crate::QueryBackend::run_lookup).
///
/// Row contract:
/// - `Single`, `Multi` and `Linked` rows carry the detail under a `value`
///   column. `Single` and `Linked` return at most one row; `Multi` returns
///   one row per detail value in storage order.
/// - `Language` returns at most one row with one column per entry of
///   [`LANGUAGE_CODES`]; no matching translations at all means no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLookup {
    /// First untranslated detail value of `key` on the item.
    Single {
        /// The item whose detail is read.
        item_id: ItemId,
        /// Detail key.
        key: String,
    },
    /// Every untranslated detail value of `key` on the item.
    Multi {
        /// The item whose details are read.
        item_id: ItemId,
        /// Detail key.
        key: String,
    },
    /// Translated values of `key`, one column per language.
    Language {
        /// The item whose translations are read.
        item_id: ItemId,
        /// Detail key.
        key: String,
    },
    /// First untranslated detail value of `key` on the first item linked
    /// from this one.
    Linked {
        /// The item whose outgoing link is followed.
        item_id: ItemId,
        /// Detail key on the linked item.
        key: String,
    },
}

impl DetailLookup {
    /// The item the lookup starts from.
    pub fn item_id(&self) -> ItemId {
        match self {
            DetailLookup::Single { item_id, .. }
            | DetailLookup::Multi { item_id, .. }
            | DetailLookup::Language { item_id, .. }
            | DetailLookup::Linked { item_id, .. } => *item_id,
        }
    }

    /// The detail key being read.
    pub fn key(&self) -> &str {
        match self {
            DetailLookup::Single { key, .. }
            | DetailLookup::Multi { key, .. }
            | DetailLookup::Language { key, .. }
            | DetailLookup::Linked { key, .. } => key,
        }
    }
}
