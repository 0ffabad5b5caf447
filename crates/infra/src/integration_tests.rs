//! Integration tests for the full portal pipeline.
//!
//! Tests: Service write → RecordStore → ChangeBus → subscriber re-fetch → classified view
//!
//! Verifies:
//! - Writes publish table-scoped change notices
//! - A tier change is reflected on the next fetch (nothing is cached)
//! - Dashboards and feeds agree on the member's tier

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::time::Duration;

    use memberportal_access::Tier;
    use memberportal_content::{ContentDraft, ContentFilter, ContentKind};
    use memberportal_core::UserId;
    use memberportal_events::{ChangeKind, ChangeNotice, InMemoryChangeBus};

    use crate::config::PortalConfig;
    use crate::record_store::{InMemoryRecordStore, PublishingRecordStore, RecordStore};
    use crate::services::{
        ContentService, DashboardService, MemberProfile, PROFILES_TABLE, ProfileService,
    };

    type Store = Arc<PublishingRecordStore<InMemoryRecordStore, Arc<InMemoryChangeBus<ChangeNotice>>>>;

    fn setup() -> Store {
        let bus = Arc::new(InMemoryChangeBus::new());
        Arc::new(PublishingRecordStore::new(InMemoryRecordStore::new(), bus))
    }

    fn member(store: &Store, tier: &str) -> MemberProfile {
        ProfileService::new(store.clone())
            .create(&MemberProfile {
                id: UserId::new(),
                email: "owner@agency.test".to_string(),
                display_name: "Agency Owner".to_string(),
                tier: Some(tier.to_string()),
                is_admin: false,
            })
            .unwrap()
    }

    #[test]
    fn content_writes_notify_only_that_table() {
        let store = setup();
        let resources = store.subscribe(ContentKind::Resource.table());
        let offers = store.subscribe(ContentKind::Offer.table());
        let content = ContentService::new(store.clone(), &PortalConfig::default());

        let created = content
            .create(&ContentDraft::new(ContentKind::Resource, "Bid templates"))
            .unwrap();
        content.delete(ContentKind::Resource, created.id).unwrap();

        let notices = resources.drain();
        let kinds: Vec<ChangeKind> = notices.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Inserted, ChangeKind::Deleted]);
        assert!(notices.iter().all(|n| n.record_id == created.id));
        assert!(offers.drain().is_empty());
    }

    #[test]
    fn tier_change_is_visible_on_next_fetch() {
        let store = setup();
        let profiles = ProfileService::new(store.clone());
        let content = ContentService::new(store.clone(), &PortalConfig::default());

        let owner = member(&store, "Free Member");
        content
            .create(
                &ContentDraft::new(ContentKind::Opportunity, "Port tender")
                    .restricted_to("Full Member (Tier 2)")
                    .in_region("EMEA"),
            )
            .unwrap();

        // Subscriber thread: re-fetches the member's feed whenever the profile changes.
        let profile_changes = store.subscribe(PROFILES_TABLE);
        let (seen_tx, seen_rx) = mpsc::channel();
        let worker_store = store.clone();
        let user_id = owner.id;
        let worker = std::thread::spawn(move || {
            let profiles = ProfileService::new(worker_store.clone());
            let content = ContentService::new(worker_store, &PortalConfig::default());
            if let Ok(notice) = profile_changes.recv_timeout(Duration::from_secs(2)) {
                assert_eq!(notice.kind, ChangeKind::Updated);
                let profile = profiles.get(user_id).unwrap();
                let feed = content
                    .feed(ContentKind::Opportunity, &ContentFilter::default(), &profile)
                    .unwrap();
                let _ = seen_tx.send(feed.items[0].is_accessible);
            }
        });

        let before = content
            .feed(ContentKind::Opportunity, &ContentFilter::default(), &owner)
            .unwrap();
        assert!(!before.items[0].is_accessible);

        profiles.set_tier(owner.id, "gold agency").unwrap();

        let accessible_after = seen_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(accessible_after);
        worker.join().unwrap();
    }

    #[test]
    fn dashboard_and_feed_agree_on_tier() {
        let store = setup();
        let owner = member(&store, "associate agency (tier 1)");
        let content = ContentService::new(store.clone(), &PortalConfig::default());
        let dashboards = DashboardService::new(store.clone());

        for tier in ["Associate Member", "Full Member"] {
            content
                .create(&ContentDraft::new(ContentKind::Resource, tier).restricted_to(tier))
                .unwrap();
        }

        let view = dashboards.dashboard(owner.id).unwrap();
        assert_eq!(view.tier, Tier::Associate);
        assert!(view.sections.restricted.is_empty());

        let feed = content
            .feed(ContentKind::Resource, &ContentFilter::default(), &owner)
            .unwrap();
        assert_eq!(feed.accessible_count, 1);
        assert!(feed.items[0].is_exact_match);
        assert_eq!(feed.items[0].required_tier, view.tier);
        assert!(!feed.items[1].is_accessible);
    }

    #[test]
    fn publishing_store_passes_reads_through() {
        let store = setup();
        let owner = member(&store, "Gold Member");
        let rows = store
            .query(PROFILES_TABLE, &crate::record_store::Filter::new())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["display_name"], "Agency Owner");
        assert_eq!(ProfileService::new(store).get(owner.id).unwrap(), owner);
    }
}
