//! 时长字符串解析与格式化
//!
//! 配置文件中的截屏间隔沿用 "5s"、"1m30s"、"500ms" 这种写法，
//! 这里负责与 `std::time::Duration` 互转，并提供 serde 适配。

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// 单位及其纳秒数，较长的前缀必须排在前面
const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", NANOS_PER_SEC),
    ("m", 60 * NANOS_PER_SEC),
    ("h", 3600 * NANOS_PER_SEC),
];

/// 解析时长字符串
///
/// 支持多段组合（"1h2m3.5s"）和小数（"1.5s"），单独的 "0" 表示零。
/// 不接受负数。
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    if text.is_empty() {
        return Err(format!("无效的时长: {:?}", input));
    }
    if text.starts_with('-') {
        return Err(format!("时长不能为负数: {:?}", input));
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = text;
    let mut total_nanos: u128 = 0;

    while !rest.is_empty() {
        // 数字部分
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(format!("无效的时长: {:?}", input));
        }
        rest = &rest[number_len..];

        // 单位部分
        let (unit, unit_nanos) = UNITS
            .iter()
            .filter(|(unit, _)| rest.starts_with(unit))
            .max_by_key(|(unit, _)| unit.len())
            .ok_or_else(|| format!("时长缺少单位: {:?}", input))?;
        rest = &rest[unit.len()..];

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if fraction.contains('.') {
            return Err(format!("无效的时长: {:?}", input));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("无效的时长: {:?}", input))?
        };
        total_nanos = whole
            .checked_mul(*unit_nanos)
            .and_then(|v| total_nanos.checked_add(v))
            .ok_or_else(|| format!("时长溢出: {:?}", input))?;

        if !fraction.is_empty() {
            let digits: u32 = fraction.len().min(18) as u32;
            let fraction_value: u128 = fraction[..digits as usize]
                .parse()
                .map_err(|_| format!("无效的时长: {:?}", input))?;
            total_nanos += fraction_value * unit_nanos / 10u128.pow(digits);
        }
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SEC)
        .map_err(|_| format!("时长溢出: {:?}", input))?;
    Ok(Duration::new(secs, (total_nanos % NANOS_PER_SEC) as u32))
}

/// 格式化为 "1h2m3.5s" 形式，与 `parse_duration` 互逆
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos / 1_000_000, nanos % 1_000_000, 6));
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = decimal(total_secs % 60, nanos % NANOS_PER_SEC, 9);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn decimal(whole: u128, remainder: u128, width: usize) -> String {
    if remainder == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0width$}", remainder, width = width);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(*duration))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_duration(&text).map_err(serde::de::Error::custom)
}
