// 截图参数解析 - 合并请求参数与配置默认值

use crate::models::{ScreenRegion, ScreenshotOptions};
use std::collections::HashMap;

/// 请求中可选的覆盖参数
///
/// 来自 `/last?x=&y=&width=&height=&compress=&max_width=&max_height=`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOverrides {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub compress: Option<bool>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
}

impl CaptureOverrides {
    /// 从查询参数解析
    ///
    /// 无法解析的值视为未提供；宽高和最大宽高只接受正数。
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let int = |key: &str| params.get(key).and_then(|v| v.trim().parse::<i32>().ok());
        let positive = |key: &str| int(key).filter(|v| *v > 0);

        Self {
            x: int("x"),
            y: int("y"),
            width: positive("width"),
            height: positive("height"),
            compress: params.get("compress").and_then(|v| parse_bool(v)),
            max_width: positive("max_width"),
            max_height: positive("max_height"),
        }
    }

    /// 没有任何覆盖参数
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn has_region(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }
}

/// 合并配置默认值与请求覆盖参数
///
/// 只要出现任意一个覆盖参数，就构造全新的参数对象，不与默认值逐项合并：
/// 区域中未提供的字段为 0，单独给出最大宽高也会开启压缩。
pub fn resolve(defaults: &ScreenshotOptions, overrides: &CaptureOverrides) -> ScreenshotOptions {
    if overrides.is_empty() {
        return *defaults;
    }

    let region = overrides.has_region().then(|| {
        ScreenRegion::new(
            overrides.x.unwrap_or(0),
            overrides.y.unwrap_or(0),
            overrides.width.unwrap_or(0),
            overrides.height.unwrap_or(0),
        )
    });

    let compress = overrides.compress.unwrap_or(false)
        || overrides.max_width.is_some()
        || overrides.max_height.is_some();

    ScreenshotOptions {
        region,
        compress,
        max_width: overrides.max_width.unwrap_or(0),
        max_height: overrides.max_height.unwrap_or(0),
    }
}

/// 布尔值解析，接受 1/t/T/TRUE/true/True 与 0/f/F/FALSE/false/False
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn configured() -> ScreenshotOptions {
        ScreenshotOptions {
            region: Some(ScreenRegion::new(1, 2, 3, 4)),
            compress: true,
            max_width: 1920,
            max_height: 1080,
        }
    }

    #[test]
    fn test_no_overrides_returns_defaults() {
        let overrides = CaptureOverrides::from_query(&query(&[]));
        assert!(overrides.is_empty());
        assert_eq!(resolve(&configured(), &overrides), configured());
    }

    #[test]
    fn test_unparsable_values_are_ignored() {
        let overrides = CaptureOverrides::from_query(&query(&[
            ("x", "abc"),
            ("width", "-5"),
            ("compress", "maybe"),
            ("max_width", "0"),
            ("unrelated", "1"),
        ]));
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_full_region_override() {
        let overrides = CaptureOverrides::from_query(&query(&[
            ("x", "0"),
            ("y", "0"),
            ("width", "200"),
            ("height", "200"),
        ]));
        let resolved = resolve(&configured(), &overrides);
        assert_eq!(resolved.region, Some(ScreenRegion::new(0, 0, 200, 200)));
        // 默认值不参与合并
        assert!(!resolved.compress);
        assert_eq!((resolved.max_width, resolved.max_height), (0, 0));
    }

    #[test]
    fn test_partial_region_fills_zero() {
        let overrides = CaptureOverrides::from_query(&query(&[("x", "50"), ("width", "10")]));
        let resolved = resolve(&ScreenshotOptions::full_screen(), &overrides);
        assert_eq!(resolved.region, Some(ScreenRegion::new(50, 0, 10, 0)));
    }

    #[test]
    fn test_max_size_implies_compress() {
        let overrides = CaptureOverrides::from_query(&query(&[("max_width", "640")]));
        let resolved = resolve(&configured(), &overrides);
        assert!(resolved.compress);
        assert_eq!(resolved.region, None);
        assert_eq!((resolved.max_width, resolved.max_height), (640, 0));

        // 显式 compress=false 也会被最大宽高覆盖
        let overrides =
            CaptureOverrides::from_query(&query(&[("compress", "false"), ("max_height", "480")]));
        assert!(resolve(&configured(), &overrides).compress);
    }

    #[test]
    fn test_compress_flag_alone() {
        let overrides = CaptureOverrides::from_query(&query(&[("compress", "T")]));
        let resolved = resolve(&configured(), &overrides);
        assert!(resolved.compress);
        assert_eq!(resolved.region, None);
        assert!(!resolved.wants_resize());

        let overrides = CaptureOverrides::from_query(&query(&[("compress", "0")]));
        assert_eq!(overrides.compress, Some(false));
        assert!(!overrides.is_empty());
        assert_eq!(resolve(&configured(), &overrides), ScreenshotOptions::full_screen());
    }
}
