use crate::{PlatformError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref LOCATION_PATTERN: Regex =
        Regex::new(r"^/[A-Za-z0-9/_-]+$").expect("location pattern must compile");
}

/// 层级位置路径，例如 `/ru/svrd/revda`
///
/// 大小写不敏感，内部统一保存为小写形式；相等性与哈希均基于规范化后的路径。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
    path: String,
}

impl Location {
    /// 解析并规范化位置路径
    ///
    /// 不做去空白处理，首尾带空白的输入视为格式错误。
    ///
    /// # 错误
    /// * `InvalidLocation` - 路径为空或不符合 `^/[A-Za-z0-9/_-]+$`
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(PlatformError::InvalidLocation(
                "location path must not be empty".to_string(),
            ));
        }
        if !LOCATION_PATTERN.is_match(path) {
            return Err(PlatformError::InvalidLocation(format!(
                "malformed location path: {}",
                path
            )));
        }

        Ok(Self {
            path: path.to_ascii_lowercase(),
        })
    }

    /// 规范化后的路径
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// 去掉最后一段后的父路径；一级路径没有父路径
    pub fn parent(&self) -> Option<Location> {
        let idx = self.path.rfind('/')?;
        // 前缀至少需要 "/x" 才是合法位置
        if idx < 2 {
            return None;
        }
        Some(Self {
            path: self.path[..idx].to_string(),
        })
    }

    /// 所有严格祖先，由近及远
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// `other` 与自身相同，或位于自身之下
    pub fn is_ancestor_of(&self, other: &Location) -> bool {
        match other.path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// 祖先位置迭代器
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<Location>,
}

impl Iterator for Ancestors {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for Location {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Location {
    type Error = PlatformError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.path
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(path: &str) -> Location {
        Location::parse(path).unwrap()
    }

    #[test]
    fn test_parse_normalizes_case() {
        let location = loc("/RU/Svrd/Revda");
        assert_eq!(location.as_str(), "/ru/svrd/revda");
        assert_eq!(location, loc("/ru/svrd/revda"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "   ", "ru", "/", "/ru svrd", "/ru.svrd", "\\ru", " /ru/msk ", "\t/ru", "/ru\n"] {
            assert!(
                matches!(Location::parse(bad), Err(PlatformError::InvalidLocation(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parent() {
        assert_eq!(loc("/ru/svrd/revda").parent(), Some(loc("/ru/svrd")));
        assert_eq!(loc("/ru/svrd").parent(), Some(loc("/ru")));
        assert_eq!(loc("/ru").parent(), None);
        assert_eq!(loc("//").parent(), None);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let ancestors: Vec<String> = loc("/ru/svrd/revda/center")
            .ancestors()
            .map(String::from)
            .collect();
        assert_eq!(ancestors, vec!["/ru/svrd/revda", "/ru/svrd", "/ru"]);

        assert_eq!(loc("/ru").ancestors().count(), 0);
    }

    #[test]
    fn test_ancestors_restartable() {
        let location = loc("/a/b/c");
        let first: Vec<Location> = location.ancestors().collect();
        let second: Vec<Location> = location.ancestors().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_ancestor_of() {
        let ru = loc("/ru");
        assert!(ru.is_ancestor_of(&loc("/ru")));
        assert!(ru.is_ancestor_of(&loc("/ru/svrd")));
        assert!(ru.is_ancestor_of(&loc("/RU/svrd/revda")));
        assert!(!ru.is_ancestor_of(&loc("/rus")));
        assert!(!ru.is_ancestor_of(&loc("/ua/ru")));
        assert!(!loc("/ru/svrd").is_ancestor_of(&ru));
    }

    #[test]
    fn test_serde_as_string() {
        let location = loc("/Ru/Msk");
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"/ru/msk\"");

        let back: Location = serde_json::from_str("\"/RU/MSK\"").unwrap();
        assert_eq!(back, location);

        assert!(serde_json::from_str::<Location>("\"ru\"").is_err());
    }
}
