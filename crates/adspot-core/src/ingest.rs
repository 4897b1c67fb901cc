//! 数据集解析
//!
//! 每行格式为 `名称:位置1,位置2,...`，空行忽略，不合法的行跳过并记录。

use crate::{Location, Platform, PlatformError, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// 解析后的数据集
#[derive(Debug, Default)]
pub struct ParsedDataset {
    pub platforms: Vec<Platform>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedDataset {
    fn accept(&mut self, line: &str, line_number: usize) {
        if line.trim().is_empty() {
            return;
        }

        match parse_line(line, line_number) {
            Ok(platform) => self.platforms.push(platform),
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping invalid dataset line");
                let reason = match e {
                    PlatformError::InvalidData { reason, .. } => reason,
                    other => other.to_string(),
                };
                self.skipped.push(SkippedLine {
                    line: line_number,
                    reason,
                });
            }
        }
    }
}

/// 解析单行
///
/// # 错误
/// * `InvalidData` - 缺少分隔符、名称为空、没有位置或位置格式错误
pub fn parse_line(line: &str, line_number: usize) -> Result<Platform> {
    let (name, locations) = line.split_once(':').ok_or_else(|| {
        PlatformError::invalid_data(line_number, "expected format 'Name:location1,location2'")
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PlatformError::invalid_data(
            line_number,
            "platform name must not be empty",
        ));
    }

    let locations = locations.trim();
    if locations.is_empty() {
        return Err(PlatformError::invalid_data(
            line_number,
            "locations must not be empty",
        ));
    }

    let mut parsed = Vec::new();
    for raw in locations.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let location = Location::parse(raw).map_err(|e| {
            PlatformError::invalid_data(line_number, format!("invalid location '{}': {}", raw, e))
        })?;
        parsed.push(location);
    }

    if parsed.is_empty() {
        return Err(PlatformError::invalid_data(
            line_number,
            "no valid location found",
        ));
    }

    Platform::new(name, parsed).map_err(|e| PlatformError::invalid_data(line_number, e.to_string()))
}

/// 解析内存中的完整文本
pub fn parse_dataset(text: &str) -> ParsedDataset {
    let mut dataset = ParsedDataset::default();
    for (i, line) in text.lines().enumerate() {
        dataset.accept(line, i + 1);
    }
    dataset
}

/// 从异步文本流逐行读取并解析
///
/// # 错误
/// * `FileLoad` - 底层读取失败（包括非 UTF-8 内容）
pub async fn read_dataset<R>(reader: R) -> Result<ParsedDataset>
where
    R: AsyncBufRead + Unpin,
{
    let mut dataset = ParsedDataset::default();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    loop {
        let line = lines.next_line().await.map_err(|e| {
            PlatformError::file_load(format!("failed to read dataset: {}", e))
        })?;
        let Some(line) = line else { break };
        line_number += 1;
        dataset.accept(&line, line_number);
    }

    Ok(dataset)
}

/// 上传文件校验策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// 最大文件大小（字节）
    pub max_bytes: usize,
    /// 允许的扩展名（不含点，大小写不敏感）
    pub allowed_extension: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_extension: "txt".to_string(),
        }
    }
}

impl UploadPolicy {
    /// 校验上传文件
    ///
    /// # 错误
    /// * `Validation` - 未提供文件、文件为空、超出大小限制或扩展名不被支持
    pub fn validate(&self, file_name: Option<&str>, len: usize) -> Result<()> {
        let file_name = match file_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(PlatformError::validation("no file provided")),
        };

        if len == 0 {
            return Err(PlatformError::validation("file is empty"));
        }

        if len > self.max_bytes {
            return Err(PlatformError::validation(format!(
                "file is too large, maximum size is {} bytes",
                self.max_bytes
            )));
        }

        let extension_ok = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.allowed_extension));
        if !extension_ok {
            return Err(PlatformError::validation(format!(
                "only .{} files are supported",
                self.allowed_extension
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    const SAMPLE: &str = "Yandex.Direct:/ru
Revda Worker:/ru/svrd/revda,/ru/svrd/pervik
Gazeta:/ru/msk,/ru/permobl,/ru/chelobl
Cool Ads:/ru/svrd
";

    #[test]
    fn test_parse_line() {
        let platform = parse_line(" Revda Worker : /ru/svrd/revda , /RU/svrd/pervik ", 1).unwrap();
        assert_eq!(platform.name(), "Revda Worker");
        assert_eq!(platform.locations().len(), 2);
        assert_eq!(platform.locations()[1].as_str(), "/ru/svrd/pervik");
    }

    #[test]
    fn test_parse_line_keeps_colon_in_locations_part() {
        let err = parse_line("A:/ru:/ua", 4).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidData { line: 4, .. }));
    }

    #[test]
    fn test_parse_line_errors() {
        let cases = [
            ("InvalidLine", "expected format"),
            (":/ru", "name must not be empty"),
            ("A:", "locations must not be empty"),
            ("A: , ,", "no valid location"),
            ("A:/ru,msk", "invalid location 'msk'"),
        ];
        for (line, expected) in cases {
            match parse_line(line, 7) {
                Err(PlatformError::InvalidData { line: 7, reason }) => {
                    assert!(reason.contains(expected), "{:?}: {}", line, reason)
                }
                other => panic!("{:?}: unexpected {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_parse_dataset_skips_invalid_and_blank() {
        let dataset = parse_dataset("A:/ru\n\nInvalidLine\n   \nB:/ru/svrd/revda\n");
        assert_eq!(dataset.platforms.len(), 2);
        assert_eq!(dataset.skipped.len(), 1);
        assert_eq!(dataset.skipped[0].line, 3);
    }

    #[tokio::test]
    async fn test_read_dataset_from_stream() {
        let mock = tokio_test::io::Builder::new()
            .read(b"Yandex.Direct:/ru\nRevda Worker:/ru/svrd/")
            .read(b"revda,/ru/svrd/pervik\r\nGazeta:/ru/msk\n")
            .build();

        let dataset = read_dataset(BufReader::new(mock)).await.unwrap();
        assert_eq!(dataset.platforms.len(), 3);
        assert_eq!(
            dataset.platforms[1].locations()[0].as_str(),
            "/ru/svrd/revda"
        );
        assert!(dataset.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_read_dataset_matches_parse_dataset() {
        let streamed = read_dataset(SAMPLE.as_bytes()).await.unwrap();
        let parsed = parse_dataset(SAMPLE);
        assert_eq!(streamed.platforms, parsed.platforms);
        assert_eq!(streamed.platforms.len(), 4);
    }

    #[tokio::test]
    async fn test_read_dataset_invalid_utf8() {
        let bytes: &[u8] = &[b'A', b':', 0xff, 0xfe, b'\n'];
        let result = read_dataset(bytes).await;
        assert!(matches!(result, Err(PlatformError::FileLoad(_))));
    }

    #[test]
    fn test_upload_policy() {
        let policy = UploadPolicy::default();
        assert!(policy.validate(Some("platforms.txt"), 100).is_ok());
        assert!(policy.validate(Some("PLATFORMS.TXT"), 100).is_ok());

        for (name, len) in [
            (None, 100),
            (Some(""), 100),
            (Some("platforms.txt"), 0),
            (Some("platforms.txt"), 10 * 1024 * 1024 + 1),
            (Some("platforms.csv"), 100),
            (Some("platforms"), 100),
        ] {
            assert!(
                matches!(policy.validate(name, len), Err(PlatformError::Validation(_))),
                "{:?} / {}",
                name,
                len
            );
        }
    }
}
