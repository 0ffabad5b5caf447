use serde_json::Value as JsonValue;

use memberportal_access::{TierHolder, explain_tier_access};
use memberportal_content::{
    ClassifiedItem, ContentDraft, ContentFeed, ContentFilter, ContentItem, ContentKind,
    ContentPatch, classify,
};
use memberportal_core::RecordId;

use super::ServiceError;
use crate::config::PortalConfig;
use crate::record_store::{Filter, Record, RecordStore, StoreError, to_record};

/// Content listings and the CRUD behind the content forms.
pub struct ContentService<S> {
    store: S,
    page_size: usize,
}

impl<S> ContentService<S>
where
    S: RecordStore,
{
    pub fn new(store: S, config: &PortalConfig) -> Self {
        Self {
            store,
            page_size: config.feed_page_size,
        }
    }

    /// The listing for one content kind, classified for `user`.
    ///
    /// Rows that cannot be decoded are skipped (and logged) rather than
    /// failing the whole listing.
    pub fn feed<U>(
        &self,
        kind: ContentKind,
        filter: &ContentFilter,
        user: &U,
    ) -> Result<ContentFeed, ServiceError>
    where
        U: TierHolder + ?Sized,
    {
        let rows = self.store.query(kind.table(), &Filter::new())?;
        let fetched = rows.len();

        let items: Vec<ContentItem> = rows
            .into_iter()
            .filter_map(|row| match decode(kind, row) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(%kind, error = %err, "skipping malformed content row");
                    None
                }
            })
            .collect();

        let feed = ContentFeed::build(items, filter, user, Some(self.page_size));

        tracing::debug!(
            %kind,
            fetched,
            accessible = feed.accessible_count,
            restricted = feed.restricted_count,
            filtered = !filter.is_empty(),
            "content feed built"
        );

        Ok(feed)
    }

    /// One item, classified for `user`. Restricted items are still returned
    /// so the view can render an upgrade prompt.
    pub fn get<U>(
        &self,
        kind: ContentKind,
        id: RecordId,
        user: &U,
    ) -> Result<Option<ClassifiedItem<ContentItem>>, ServiceError>
    where
        U: TierHolder + ?Sized,
    {
        let Some(row) = self.store.get(kind.table(), id)? else {
            return Ok(None);
        };
        let item = decode(kind, row)?;

        let decision = explain_tier_access(item.tier_restriction.as_deref(), user.membership_tier());
        if !decision.granted {
            tracing::debug!(%kind, %id, reason = %decision.reason, "item restricted for member");
        }

        Ok(classify(vec![item], user).pop())
    }

    pub fn create(&self, draft: &ContentDraft) -> Result<ContentItem, ServiceError> {
        draft.validate()?;

        let stored = self.store.insert(draft.kind.table(), to_record(draft)?)?;
        let item = decode(draft.kind, stored)?;

        tracing::info!(kind = %item.kind, id = %item.id, "content created");
        Ok(item)
    }

    pub fn update(
        &self,
        kind: ContentKind,
        id: RecordId,
        patch: &ContentPatch,
    ) -> Result<ContentItem, ServiceError> {
        patch.validate()?;

        let stored = self
            .store
            .update(kind.table(), id, to_record(patch)?)
            .map_err(|err| not_found_as_content(err, kind, id))?;

        tracing::info!(%kind, %id, "content updated");
        decode(kind, stored)
    }

    pub fn delete(&self, kind: ContentKind, id: RecordId) -> Result<(), ServiceError> {
        self.store
            .delete(kind.table(), id)
            .map_err(|err| not_found_as_content(err, kind, id))?;

        tracing::info!(%kind, %id, "content deleted");
        Ok(())
    }
}

fn not_found_as_content(err: StoreError, kind: ContentKind, id: RecordId) -> ServiceError {
    match err {
        StoreError::NotFound { .. } => ServiceError::ContentNotFound { kind, id },
        other => other.into(),
    }
}

/// Decode a row of `kind`'s table. Rows written by other clients may omit
/// `kind`; the table implies it.
fn decode(kind: ContentKind, mut row: Record) -> Result<ContentItem, ServiceError> {
    let kind_value = serde_json::to_value(kind).map_err(|e| ServiceError::Decode(e.to_string()))?;
    row.entry("kind").or_insert(kind_value);

    serde_json::from_value(JsonValue::Object(row)).map_err(|e| ServiceError::Decode(e.to_string()))
}
