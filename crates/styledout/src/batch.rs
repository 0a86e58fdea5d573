//! Multi-item batch rendering.
//!
//! The products surface renders the same styled output once per item id.
//! Items resolve sequentially; one item failing does not abort the rest —
//! the error is recorded against its id and the batch keeps going.

use std::collections::BTreeMap;

use styledout_query::{ItemId, Params};

use crate::error::StyledError;
use crate::model::OutputId;
use crate::resolver::{RenderRequest, RenderScope, Resolver};

/// What a batch render produced, per item id.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully rendered items.
    pub rendered: BTreeMap<ItemId, String>,
    /// Items whose render failed, with the failure.
    pub failed: BTreeMap<ItemId, StyledError>,
}

impl BatchOutcome {
    /// Whether every requested item rendered.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of items the batch touched.
    pub fn len(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }

    /// Whether the batch touched no items at all.
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty() && self.failed.is_empty()
    }
}

impl Resolver<'_> {
    /// Renders one styled output for each item id.
    ///
    /// Every item gets its id bound as the `styled_id` parameter on top of
    /// the shared `params`; callers restrict formats for the whole batch
    /// (nested references included) through `request.allowed_formats`.
    pub fn render_for_items(
        &self,
        scope: &RenderScope,
        id: OutputId,
        item_ids: &[ItemId],
        params: &Params,
        request: &RenderRequest,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for &item_id in item_ids {
            let item_params = params.clone().with("styled_id", item_id);
            match self.render(scope, id, &item_params, request) {
                Ok(text) => {
                    outcome.rendered.insert(item_id, text);
                }
                Err(err) => {
                    outcome.failed.insert(item_id, err);
                }
            }
        }
        outcome
    }
}
