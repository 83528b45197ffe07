use std::collections::HashMap;
use std::sync::Arc;

use slicer::Rule;

use crate::store::{FeedStore, InsertOutcome};
use crate::{feed_id, normalize_host, FeedRecord, RegistryError, SourceProbe};

/// Outcome of a registration attempt.
#[derive(Debug, Clone)]
pub struct Registration {
    pub record: FeedRecord,
    /// False when the pair was already registered and the existing record
    /// was returned instead.
    pub created: bool,
}

/// Maps short feed ids to stored (host, rule) records.
///
/// Identity is keyed on the (host, rule) pair: the id is derived from the
/// composed `host#rule` string, so the same host registered under two
/// different rules yields two distinct feeds.
pub struct Registry {
    store: Arc<dyn FeedStore>,
    probe: Arc<dyn SourceProbe>,
}

impl Registry {
    pub fn new(store: Arc<dyn FeedStore>, probe: Arc<dyn SourceProbe>) -> Self {
        Self { store, probe }
    }

    /// Look up a stored record by id. Pure read, no side effects.
    pub async fn resolve(&self, id: &str) -> crate::Result<FeedRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Register a (host, rule) pair, validating the host on first sight.
    ///
    /// Re-registering an existing pair returns the stored record without
    /// re-validating it; the first registration is ground truth. Nothing is
    /// persisted when validation fails.
    pub async fn register(&self, host: &str, rule: Rule) -> crate::Result<Registration> {
        if host.trim().is_empty() {
            return Err(RegistryError::EmptyHost);
        }

        let host = normalize_host(host);
        let id = feed_id(&format!("{host}#{rule}"));

        if let Some(existing) = self.store.get(&id).await? {
            tracing::debug!(%id, %host, "feed already registered");
            return Ok(Registration {
                record: existing,
                created: false,
            });
        }

        self.probe.probe(&host).await?;

        let record = FeedRecord {
            id: id.clone(),
            host,
            rule,
        };

        match self.store.insert_if_absent(record).await? {
            InsertOutcome::Created(record) => {
                tracing::info!(%id, host = %record.host, rule = %record.rule, "registered feed");
                Ok(Registration {
                    record,
                    created: true,
                })
            }
            // A concurrent registration won the write; its record is
            // equivalent for this key.
            InsertOutcome::Existing(record) => Ok(Registration {
                record,
                created: false,
            }),
        }
    }

    /// Dump all stored records keyed by id (administrative listing).
    pub async fn dump(&self) -> crate::Result<HashMap<String, FeedRecord>> {
        let records = self.store.all().await?;
        Ok(records.into_iter().map(|r| (r.id.clone(), r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::MemoryFeedStore;

    /// Probe stub that accepts or rejects everything, counting calls.
    struct StubProbe {
        verdict: Option<RegistryError>,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn accepting() -> Self {
            Self {
                verdict: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn rejecting(err: RegistryError) -> Self {
            Self {
                verdict: Some(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SourceProbe for StubProbe {
        async fn probe(&self, _url: &str) -> crate::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.verdict {
                None => Ok(()),
                Some(RegistryError::NotXml(ct)) => Err(RegistryError::NotXml(ct.clone())),
                Some(RegistryError::BadStatus(code)) => Err(RegistryError::BadStatus(*code)),
                Some(RegistryError::Unreachable(msg)) => {
                    Err(RegistryError::Unreachable(msg.clone()))
                }
                Some(_) => unreachable!("stub only rejects with probe errors"),
            }
        }
    }

    fn registry_with(probe: StubProbe) -> (Registry, Arc<MemoryFeedStore>) {
        let store = Arc::new(MemoryFeedStore::new());
        let registry = Registry::new(store.clone(), Arc::new(probe));
        (registry, store)
    }

    #[tokio::test]
    async fn test_registration_is_idempotent() {
        let (registry, store) = registry_with(StubProbe::accepting());
        let rule = Rule::new(2).unwrap();

        let first = registry.register("example.com/feed", rule).await.unwrap();
        let second = registry.register("example.com/feed", rule).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.record.id, second.record.id);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_re_registration_skips_validation() {
        let probe = Arc::new(StubProbe::accepting());
        let store = Arc::new(MemoryFeedStore::new());
        let registry = Registry::new(store, probe.clone());
        let rule = Rule::new(2).unwrap();

        registry.register("example.com/feed", rule).await.unwrap();
        registry.register("example.com/feed", rule).await.unwrap();

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_same_host_different_rule_gets_distinct_id() {
        let (registry, store) = registry_with(StubProbe::accepting());

        let a = registry
            .register("example.com/feed", Rule::new(2).unwrap())
            .await
            .unwrap();
        let b = registry
            .register("example.com/feed", Rule::new(3).unwrap())
            .await
            .unwrap();

        assert_ne!(a.record.id, b.record.id);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_host_is_rejected_before_probe() {
        let (registry, store) = registry_with(StubProbe::accepting());

        let err = registry
            .register("   ", Rule::new(2).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::EmptyHost));
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_xml_host_is_never_persisted() {
        let (registry, store) =
            registry_with(StubProbe::rejecting(RegistryError::NotXml("text/html".into())));

        let err = registry
            .register("example.com/page", Rule::new(2).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::NotXml(_)));
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_registration_yields_one_record() {
        let (registry, store) = registry_with(StubProbe::accepting());
        let registry = Arc::new(registry);
        let rule = Rule::new(2).unwrap();

        let (a, b) = tokio::join!(
            registry.register("example.com/feed", rule),
            registry.register("example.com/feed", rule),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.record.id, b.record.id);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let (registry, _) = registry_with(StubProbe::accepting());

        let err = registry.resolve("zzzzzz").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_returns_registered_record() {
        let (registry, _) = registry_with(StubProbe::accepting());
        let rule = Rule::new(4).unwrap();

        let created = registry.register("example.com/feed", rule).await.unwrap();
        let resolved = registry.resolve(&created.record.id).await.unwrap();

        assert_eq!(resolved, created.record);
        assert_eq!(resolved.host, "https://www.example.com/feed");
        assert_eq!(resolved.rule, rule);
    }

    #[tokio::test]
    async fn test_dump_maps_ids_to_records() {
        let (registry, _) = registry_with(StubProbe::accepting());

        let a = registry
            .register("example.com/a", Rule::new(1).unwrap())
            .await
            .unwrap();
        let b = registry
            .register("example.com/b", Rule::new(2).unwrap())
            .await
            .unwrap();

        let dump = registry.dump().await.unwrap();
        assert_eq!(dump.len(), 2);
        assert_eq!(dump[&a.record.id], a.record);
        assert_eq!(dump[&b.record.id], b.record);
    }
}
