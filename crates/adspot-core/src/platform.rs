use crate::{Location, PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 广告平台
///
/// 名称去除首尾空白后不能为空，至少注册在一个位置，位置去重并保持原有顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    name: String,
    locations: Vec<Location>,
}

impl Platform {
    /// 创建广告平台
    ///
    /// # 错误
    /// * `Validation` - 名称为空或没有任何位置
    pub fn new(name: &str, locations: impl IntoIterator<Item = Location>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlatformError::validation("platform name must not be empty"));
        }

        let mut unique: Vec<Location> = Vec::new();
        for location in locations {
            if !unique.contains(&location) {
                unique.push(location);
            }
        }
        if unique.is_empty() {
            return Err(PlatformError::validation(format!(
                "platform '{}' must declare at least one location",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            locations: unique,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// 平台是否覆盖给定位置（在该位置或其任意祖先注册）
    pub fn is_active_in(&self, location: &Location) -> bool {
        self.locations.iter().any(|own| own.is_ancestor_of(location))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, location) in self.locations.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", location)?;
        }
        Ok(())
    }
}

/// 接入层产出的原始记录：平台名称 + 位置字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub name: String,
    pub locations: Vec<String>,
}

impl PlatformRecord {
    pub fn new(name: impl Into<String>, locations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<PlatformRecord> for Platform {
    type Error = PlatformError;

    fn try_from(record: PlatformRecord) -> Result<Self> {
        let locations = record
            .locations
            .iter()
            .map(|raw| Location::parse(raw.trim()))
            .collect::<Result<Vec<_>>>()?;
        Platform::new(&record.name, locations)
    }
}
