use crate::Location;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// 搜索缓存配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// 条目有效期
    pub ttl: Duration,
    /// 软容量上限，超出后触发批量淘汰
    pub capacity: usize,
    /// 每次淘汰的最旧条目数
    pub eviction_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            capacity: 1000,
            eviction_batch: 100,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    platforms: Vec<String>,
    inserted_at: Instant,
    sequence: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Location, CacheEntry>,
    next_sequence: u64,
}

/// 搜索结果缓存
///
/// 按查询位置缓存已排序的平台名称列表。过期条目在查询时只视为未命中，不会被主动删除；
/// 容量超限时一次性淘汰最旧的一批，而不是严格的 LRU。
/// 缓存无法感知数据变化，索引每次替换或清空时都必须调用 [`SearchCache::clear`]。
#[derive(Debug)]
pub struct SearchCache {
    config: CacheConfig,
    state: RwLock<CacheState>,
}

impl SearchCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// 读取未过期的缓存结果
    pub async fn get(&self, location: &Location) -> Option<Vec<String>> {
        let state = self.state.read().await;
        let entry = state.entries.get(location)?;
        if entry.inserted_at.elapsed() < self.config.ttl {
            Some(entry.platforms.clone())
        } else {
            debug!(location = %location, "Cache entry expired");
            None
        }
    }

    /// 写入结果，覆盖同一位置的旧条目
    pub async fn put(&self, location: Location, platforms: Vec<String>) {
        let mut state = self.state.write().await;

        if state.entries.len() > self.config.capacity {
            self.evict_oldest(&mut state);
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            location,
            CacheEntry {
                platforms,
                inserted_at: Instant::now(),
                sequence,
            },
        );
    }

    /// 清空全部条目
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
    }

    /// 当前条目数（含已过期但尚未淘汰的条目）
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    fn evict_oldest(&self, state: &mut CacheState) {
        let mut by_age: Vec<(Instant, u64, Location)> = state
            .entries
            .iter()
            .map(|(location, entry)| (entry.inserted_at, entry.sequence, location.clone()))
            .collect();
        by_age.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut evicted = 0usize;
        for (_, _, location) in by_age.into_iter().take(self.config.eviction_batch) {
            state.entries.remove(&location);
            evicted += 1;
        }

        debug!(
            evicted = evicted,
            remaining = state.entries.len(),
            "Search cache evicted oldest entries"
        );
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
