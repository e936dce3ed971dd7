use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::topology::{ClosParams, TopologyPayload};

/// Cache key: "<levels>-<numServers>-<switchDegree>-<uplinkNum>" as requested
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_params(params: &ClosParams) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            params.levels, params.servers, params.switch_degree, params.uplinks
        ))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store of previously computed responses, consulted by the HTTP layer only
#[async_trait::async_trait]
pub trait TopologyCache: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Option<Arc<TopologyPayload>>;
    async fn store(&self, key: CacheKey, payload: Arc<TopologyPayload>);
    async fn len(&self) -> usize;
}

/// Cache that never retains anything
pub struct NoopCache;

#[async_trait::async_trait]
impl TopologyCache for NoopCache {
    async fn lookup(&self, _key: &CacheKey) -> Option<Arc<TopologyPayload>> {
        None
    }

    async fn store(&self, _key: CacheKey, _payload: Arc<TopologyPayload>) {}

    async fn len(&self) -> usize {
        0
    }
}

#[derive(Default)]
struct MemoryInner {
    entries: HashMap<CacheKey, Arc<TopologyPayload>>,
    order: VecDeque<CacheKey>,
}

/// Bounded in-memory cache, evicting the oldest insertion once full
pub struct MemoryCache {
    capacity: usize,
    inner: RwLock<MemoryInner>,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(MemoryInner::default()),
        }
    }
}

#[async_trait::async_trait]
impl TopologyCache for MemoryCache {
    async fn lookup(&self, key: &CacheKey) -> Option<Arc<TopologyPayload>> {
        self.inner.read().await.entries.get(key).cloned()
    }

    async fn store(&self, key: CacheKey, payload: Arc<TopologyPayload>) {
        let mut inner = self.inner.write().await;
        if inner.entries.insert(key.clone(), payload).is_some() {
            return;
        }
        inner.order.push_back(key);
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                tracing::debug!("Evicted cached topology {}", oldest);
            }
        }
    }

    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}

/// Pick the cache implementation for a configured capacity (0 disables caching)
pub fn from_capacity(capacity: usize) -> Arc<dyn TopologyCache> {
    if capacity == 0 {
        Arc::new(NoopCache)
    } else {
        Arc::new(MemoryCache::new(capacity))
    }
}
