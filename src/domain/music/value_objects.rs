//! Music Context - Value Objects

use serde::{Deserialize, Serialize};

use super::MusicError;

/// 每秒对应的生成 token 数（近似换算，不保证实际输出时长）
pub const TOKENS_PER_SECOND: i64 = 50;

/// 未指定时长时的默认值（秒）
pub const DEFAULT_DURATION_SECS: i64 = 10;

/// 音乐描述文本
///
/// 不做任何校验：空字符串也会原样交给模型
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 请求时长（秒）
///
/// 不变量: 无。零、负数、超大值都原样透传
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationSecs(i64);

impl DurationSecs {
    pub fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// 浮点时长向零截断
    pub fn from_f64(secs: f64) -> Result<Self, MusicError> {
        if !secs.is_finite() {
            return Err(MusicError::InvalidDuration(format!(
                "cannot convert {} to integer",
                secs
            )));
        }
        let truncated = secs.trunc();
        if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(MusicError::InvalidDuration(format!(
                "{} is out of range",
                secs
            )));
        }
        Ok(Self(truncated as i64))
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// 换算成模型的生成长度预算
    pub fn budget(&self) -> GenerationBudget {
        GenerationBudget(self.0.saturating_mul(TOKENS_PER_SECOND))
    }
}

impl Default for DurationSecs {
    fn default() -> Self {
        Self(DEFAULT_DURATION_SECS)
    }
}

impl std::str::FromStr for DurationSecs {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|_| {
            MusicError::InvalidDuration(format!("invalid literal for integer: '{}'", s))
        })
    }
}

impl std::fmt::Display for DurationSecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// 生成长度预算（模型内部 token 数，不是秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationBudget(i64);

impl GenerationBudget {
    pub fn from_tokens(tokens: i64) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> i64 {
        self.0
    }

    /// 按同一换算系数反推的近似秒数，非正预算记为 0
    pub fn approx_secs(&self) -> f64 {
        self.0.max(0) as f64 / TOKENS_PER_SECOND as f64
    }
}

/// 部署配置中的计算设备偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// 有 CUDA 就用 CUDA，否则 CPU
    #[default]
    Auto,
    Cuda,
    Cpu,
}

impl DevicePreference {
    /// 启动时根据硬件能力确定实际设备，之后不再变化
    pub fn resolve(self, cuda_available: bool) -> ComputeDevice {
        match self {
            DevicePreference::Cpu => ComputeDevice::Cpu,
            DevicePreference::Auto | DevicePreference::Cuda if cuda_available => {
                ComputeDevice::Cuda
            }
            DevicePreference::Auto | DevicePreference::Cuda => ComputeDevice::Cpu,
        }
    }
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevicePreference::Auto => write!(f, "auto"),
            DevicePreference::Cuda => write!(f, "cuda"),
            DevicePreference::Cpu => write!(f, "cpu"),
        }
    }
}

impl std::str::FromStr for DevicePreference {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda),
            "cpu" => Ok(DevicePreference::Cpu),
            _ => Err(MusicError::UnknownDevice(s.to_string())),
        }
    }
}

/// 实际运行推理的设备
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    Cuda,
    Cpu,
}

impl ComputeDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeDevice::Cuda => "cuda",
            ComputeDevice::Cpu => "cpu",
        }
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, ComputeDevice::Cuda)
    }
}

impl std::fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
