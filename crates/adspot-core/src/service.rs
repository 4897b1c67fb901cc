use crate::ingest::read_dataset;
use crate::{
    CacheConfig, IndexSnapshot, Location, LocationIndex, Platform, PlatformError, PlatformRecord,
    Result, SearchCache,
};
use serde::Serialize;
use tokio::io::AsyncBufRead;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// 索引统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub platform_count: usize,
    pub location_count: usize,
}

/// 一次数据集加载的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub valid_lines: usize,
    pub invalid_lines: usize,
    pub platform_count: usize,
    pub location_count: usize,
}

/// 广告平台服务
///
/// 组合位置索引与搜索缓存：写操作（加载、清空）持有索引写锁，在同一临界区内完成快照替换和缓存清空；
/// 读操作持有索引读锁，缓存自带独立的锁，因此未命中时回填缓存无需升级索引锁。
pub struct PlatformService {
    index: RwLock<LocationIndex>,
    cache: SearchCache,
}

impl PlatformService {
    /// 使用默认缓存配置创建服务
    pub fn new() -> Self {
        Self::with_cache_config(CacheConfig::default())
    }

    pub fn with_cache_config(config: CacheConfig) -> Self {
        Self {
            index: RwLock::new(LocationIndex::new()),
            cache: SearchCache::new(config),
        }
    }

    /// 整体替换平台数据
    ///
    /// 新快照在锁外构建；失败时索引与缓存都保持原状。
    ///
    /// # 错误
    /// * `FileLoad` - 平台列表为空
    pub async fn load(&self, platforms: Vec<Platform>) -> Result<IndexStats> {
        let snapshot = IndexSnapshot::build(platforms)?;
        let stats = IndexStats {
            platform_count: snapshot.platform_count(),
            location_count: snapshot.location_count(),
        };

        {
            let mut index = self.index.write().await;
            index.publish(snapshot);
            self.cache.clear().await;
        }

        info!(
            platforms = stats.platform_count,
            locations = stats.location_count,
            "Platform dataset loaded"
        );
        Ok(stats)
    }

    /// 校验接入层记录后加载
    ///
    /// # 错误
    /// * `InvalidLocation` / `Validation` - 任一记录不合法
    /// * `FileLoad` - 记录为空
    pub async fn load_records(
        &self,
        records: impl IntoIterator<Item = PlatformRecord>,
    ) -> Result<IndexStats> {
        let platforms = records
            .into_iter()
            .map(Platform::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.load(platforms).await
    }

    /// 从文本流读取并加载数据集
    ///
    /// 不合法的行会被跳过并记录日志；读取完成且至少有一条有效记录后才替换索引，
    /// 在此之前丢弃该 future 不会影响当前数据。
    ///
    /// # 错误
    /// * `FileLoad` - 读取失败或没有任何有效记录
    pub async fn load_from_reader<R>(&self, reader: R) -> Result<LoadReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let dataset = read_dataset(reader).await?;
        let valid_lines = dataset.platforms.len();
        let invalid_lines = dataset.skipped.len();

        if valid_lines == 0 {
            warn!(invalid_lines = invalid_lines, "Dataset contains no valid lines");
            return Err(PlatformError::file_load(
                "file contains no valid platform data",
            ));
        }

        let stats = self.load(dataset.platforms).await?;
        info!(
            valid_lines = valid_lines,
            invalid_lines = invalid_lines,
            "Dataset ingestion finished"
        );

        Ok(LoadReport {
            valid_lines,
            invalid_lines,
            platform_count: stats.platform_count,
            location_count: stats.location_count,
        })
    }

    /// 按位置字符串查询平台
    ///
    /// 空白或格式错误的位置返回空列表，不会报错。
    pub async fn search(&self, location: &str) -> Vec<String> {
        if location.trim().is_empty() {
            return Vec::new();
        }

        match Location::parse(location) {
            Ok(location) => self.search_location(&location).await,
            Err(e) => {
                warn!(location = %location, error = %e, "Malformed search location");
                Vec::new()
            }
        }
    }

    /// 查询在该位置或其任意祖先注册的平台，按字典序排列
    pub async fn search_location(&self, location: &Location) -> Vec<String> {
        let index = self.index.read().await;

        if let Some(cached) = self.cache.get(location).await {
            debug!(location = %location, "Search result served from cache");
            return cached;
        }

        let mut matches = index.exact_matches(location);
        matches.extend(index.ancestor_matches(location));
        let result: Vec<String> = matches.into_iter().collect();

        self.cache.put(location.clone(), result.clone()).await;

        debug!(location = %location, count = result.len(), "Search result computed");
        result
    }

    /// 当前平台数与位置数
    pub async fn stats(&self) -> IndexStats {
        let index = self.index.read().await;
        IndexStats {
            platform_count: index.platform_count(),
            location_count: index.location_count(),
        }
    }

    pub async fn platform_count(&self) -> usize {
        self.index.read().await.platform_count()
    }

    pub async fn location_count(&self) -> usize {
        self.index.read().await.location_count()
    }

    /// 清空全部数据和缓存
    pub async fn clear(&self) {
        let mut index = self.index.write().await;
        index.clear();
        self.cache.clear().await;
        info!("All platform data cleared");
    }

    /// 当前缓存条目数
    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}

impl Default for PlatformService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn platform(name: &str, paths: &[&str]) -> Platform {
        Platform::new(name, paths.iter().map(|p| Location::parse(p).unwrap())).unwrap()
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();

        assert_eq!(service.search("/ru/svrd/revda").await, vec!["A"]);
        assert_eq!(service.search("/ru").await, vec!["A"]);
        assert!(service.search("/xx").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_merges_ancestors_in_order() {
        let service = PlatformService::new();
        service
            .load(vec![platform("B", &["/ru/svrd"]), platform("A", &["/ru"])])
            .await
            .unwrap();

        assert_eq!(service.search("/ru/svrd/revda").await, vec!["A", "B"]);
        assert_eq!(service.search("/ru").await, vec!["A"]);
    }

    #[tokio::test]
    async fn test_search_malformed_returns_empty() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();

        assert!(service.search("").await.is_empty());
        assert!(service.search("   ").await.is_empty());
        assert!(service.search("ru").await.is_empty());
        assert!(service.search("/ru?x").await.is_empty());
        assert!(service.search("  /ru  ").await.is_empty());
        assert!(service.search("\t/ru").await.is_empty());
        assert_eq!(service.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_search_populates_cache() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();

        let first = service.search("/ru/msk").await;
        assert_eq!(service.cached_entries().await, 1);
        let second = service.search("/RU/MSK").await;
        assert_eq!(first, second);
        assert_eq!(service.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn test_load_empty_keeps_state_and_cache() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();
        service.search("/ru/msk").await;

        let result = service.load(Vec::new()).await;
        assert!(matches!(result, Err(PlatformError::FileLoad(_))));

        let stats = service.stats().await;
        assert_eq!(stats.platform_count, 1);
        assert_eq!(stats.location_count, 1);
        assert_eq!(service.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn test_load_invalidates_cache() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();
        assert_eq!(service.search("/ru/msk").await, vec!["A"]);

        service.load(vec![platform("B", &["/ru/msk"])]).await.unwrap();
        assert_eq!(service.cached_entries().await, 0);
        assert_eq!(service.search("/ru/msk").await, vec!["B"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let service = PlatformService::new();
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();
        assert_eq!(service.search("/ru").await, vec!["A"]);

        service.clear().await;

        let stats = service.stats().await;
        assert_eq!(stats, IndexStats { platform_count: 0, location_count: 0 });
        assert!(service.search("/ru").await.is_empty());
    }

    #[tokio::test]
    async fn test_load_records() {
        let service = PlatformService::new();
        let stats = service
            .load_records(vec![
                PlatformRecord::new("A", ["/ru"]),
                PlatformRecord::new("B", ["/ru/svrd", "/ru/msk"]),
            ])
            .await
            .unwrap();
        assert_eq!(stats.platform_count, 2);
        assert_eq!(stats.location_count, 3);

        let err = service
            .load_records(vec![PlatformRecord::new("C", ["bad"])])
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::InvalidLocation(_)));
        assert_eq!(service.platform_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_cache_is_recomputed() {
        let service = PlatformService::with_cache_config(CacheConfig {
            ttl: Duration::from_secs(10),
            capacity: 100,
            eviction_batch: 10,
        });
        service.load(vec![platform("A", &["/ru"])]).await.unwrap();
        assert_eq!(service.search("/ru/x").await, vec!["A"]);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(service.search("/ru/x").await, vec!["A"]);
        assert_eq!(service.cached_entries().await, 1);
    }
}
