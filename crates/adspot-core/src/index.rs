use crate::{Location, Platform, PlatformError, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// 索引快照
///
/// 精确位置 -> 在该位置注册的平台名称集合，以及完整的平台列表（仅用于统计）。
/// 快照构建完成后不再修改，只会被整体替换。
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    platforms: Vec<Platform>,
    by_location: HashMap<Location, BTreeSet<String>>,
}

impl IndexSnapshot {
    /// 在旁路构建新快照
    ///
    /// # 错误
    /// * `FileLoad` - 平台列表为空
    pub fn build(platforms: Vec<Platform>) -> Result<Self> {
        if platforms.is_empty() {
            return Err(PlatformError::file_load(
                "dataset contains no valid platform data",
            ));
        }

        let mut by_location: HashMap<Location, BTreeSet<String>> = HashMap::new();
        for platform in &platforms {
            for location in platform.locations() {
                by_location
                    .entry(location.clone())
                    .or_default()
                    .insert(platform.name().to_string());
            }
        }

        Ok(Self {
            platforms,
            by_location,
        })
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn location_count(&self) -> usize {
        self.by_location.len()
    }
}

/// 位置索引
///
/// 持有当前生效的快照；替换与清空都是一次 `Arc` 赋值，读者看到的要么是旧快照，要么是新快照。
#[derive(Debug, Default)]
pub struct LocationIndex {
    snapshot: Arc<IndexSnapshot>,
}

impl LocationIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 用新的平台列表整体替换索引
    ///
    /// # 错误
    /// * `FileLoad` - 平台列表为空，此时当前快照保持不变
    pub fn replace(&mut self, platforms: Vec<Platform>) -> Result<()> {
        let snapshot = IndexSnapshot::build(platforms)?;
        self.publish(snapshot);
        Ok(())
    }

    /// 发布已构建好的快照，丢弃旧快照
    pub fn publish(&mut self, snapshot: IndexSnapshot) {
        debug!(
            platforms = snapshot.platform_count(),
            locations = snapshot.location_count(),
            "Index snapshot published"
        );
        self.snapshot = Arc::new(snapshot);
    }

    /// 重置为空快照
    pub fn clear(&mut self) {
        self.snapshot = Arc::new(IndexSnapshot::default());
    }

    /// 恰好注册在 `location` 的平台
    pub fn exact_matches(&self, location: &Location) -> BTreeSet<String> {
        self.snapshot
            .by_location
            .get(location)
            .cloned()
            .unwrap_or_default()
    }

    /// 注册在 `location` 任一严格祖先上的平台并集
    pub fn ancestor_matches(&self, location: &Location) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for ancestor in location.ancestors() {
            if let Some(names) = self.snapshot.by_location.get(&ancestor) {
                result.extend(names.iter().cloned());
            }
        }
        result
    }

    pub fn platform_count(&self) -> usize {
        self.snapshot.platform_count()
    }

    pub fn location_count(&self) -> usize {
        self.snapshot.location_count()
    }
}
