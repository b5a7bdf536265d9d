// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 屏幕区域（像素坐标）
///
/// 由请求参数或配置文件构造，构造后不再修改。
/// 坐标相对于虚拟屏幕原点，经过 `capture::resolve_region` 解析后
/// 才会落到虚拟屏幕的绝对坐标系中。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 宽或高不为正时视为空区域
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// 像素数量（空区域为 0）
    pub fn pixel_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.width as usize * self.height as usize
    }
}

/// 虚拟屏幕边界 - 覆盖所有活动显示器的外接矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VirtualScreenBounds {
    /// 原点X（多显示器时可能为负）
    #[serde(rename = "x")]
    pub origin_x: i32,
    /// 原点Y
    #[serde(rename = "y")]
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
}

impl VirtualScreenBounds {
    pub fn new(origin_x: i32, origin_y: i32, width: i32, height: i32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// 主显示器回退边界，原点固定为 (0, 0)
    pub fn primary(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// 整个虚拟屏幕对应的绝对坐标区域
    pub fn as_region(&self) -> ScreenRegion {
        ScreenRegion::new(self.origin_x, self.origin_y, self.width, self.height)
    }
}

/// 一次截图+编码的完整参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenshotOptions {
    /// None 表示整个虚拟屏幕
    pub region: Option<ScreenRegion>,
    /// 是否缩放
    pub compress: bool,
    /// 最大宽度（<=0 表示不限制）
    pub max_width: i32,
    /// 最大高度（<=0 表示不限制）
    pub max_height: i32,
}

impl ScreenshotOptions {
    /// 全屏、不缩放
    pub fn full_screen() -> Self {
        Self::default()
    }

    /// 预览图：全屏，缩放到 800x600 以内
    pub fn preview() -> Self {
        Self {
            region: None,
            compress: true,
            max_width: 800,
            max_height: 600,
        }
    }

    /// 只有开启压缩且至少设置了一个上限时才需要缩放
    pub fn wants_resize(&self) -> bool {
        self.compress && (self.max_width > 0 || self.max_height > 0)
    }
}

/// 截屏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// 按需模式：每次读取时截图
    #[serde(rename = "ondemand")]
    OnDemand,
    /// 实时模式：后台按间隔截图
    #[serde(rename = "realtime")]
    Realtime,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnDemand => "ondemand",
            Self::Realtime => "realtime",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 应用配置（对应 config.json）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub capture: CaptureConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9981,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 截屏配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// 截屏模式
    pub mode: CaptureMode,
    /// 实时模式下的截屏间隔，格式如 "5s"、"1m30s"
    #[serde(with = "crate::utils::duration")]
    pub interval: Duration,
    /// 截屏区域，null 表示全屏
    pub region: Option<ScreenRegion>,
    /// 压缩配置
    pub compression: CompressionConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mode: CaptureMode::OnDemand,
            interval: Duration::from_secs(5),
            region: None,
            compression: CompressionConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// 由配置生成默认截图参数
    pub fn default_options(&self) -> ScreenshotOptions {
        ScreenshotOptions {
            region: self.region,
            compress: self.compression.enabled,
            max_width: self.compression.max_width,
            max_height: self.compression.max_height,
        }
    }
}

/// 压缩（缩放）配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_width: 1920,
            max_height: 1080,
        }
    }
}
