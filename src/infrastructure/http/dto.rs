//! Data Transfer Objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::{GenerateMusic, GenerationError};
use crate::domain::{Description, DurationSecs, MusicError};

// ============================================================================
// Generate DTOs
// ============================================================================

/// POST /generate 请求体
#[derive(Debug, Deserialize)]
pub struct GenerateMusicRequest {
    /// 缺省为空字符串
    #[serde(default)]
    pub description: String,

    /// 缺省 10 秒；整数、浮点（截断）、数字字符串、布尔（0/1）都接受
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: DurationSecs,
}

impl GenerateMusicRequest {
    /// 解析原始请求体，任何解析失败都归为 InvalidRequest
    pub fn from_json(body: &[u8]) -> Result<Self, GenerationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| GenerationError::invalid_request(e.to_string()))?;

        if !value.is_object() {
            return Err(GenerationError::invalid_request(
                "request body must be a JSON object",
            ));
        }

        serde_json::from_value(value).map_err(|e| GenerationError::invalid_request(e.to_string()))
    }

    pub fn into_command(self) -> GenerateMusic {
        GenerateMusic {
            description: Description::new(self.description),
            duration: self.duration,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<DurationSecs, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_duration(&value).map_err(serde::de::Error::custom)
}

/// 把 JSON 值转换为整数秒
pub fn coerce_duration(value: &Value) -> Result<DurationSecs, MusicError> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => Ok(DurationSecs::new(secs)),
            None => n
                .as_f64()
                .ok_or_else(|| MusicError::InvalidDuration(format!("{} is not a number", n)))
                .and_then(DurationSecs::from_f64),
        },
        Value::String(s) => s.parse(),
        Value::Bool(b) => Ok(DurationSecs::new(i64::from(*b))),
        other => Err(MusicError::InvalidDuration(format!(
            "expected a number or numeric string, got {}",
            other
        ))),
    }
}

/// 生成成功响应
#[derive(Debug, Serialize)]
pub struct GenerateMusicResponseDto {
    pub status: &'static str,
    pub file_path: String,
}

impl GenerateMusicResponseDto {
    pub fn success(file_path: impl Into<String>) -> Self {
        Self {
            status: "success",
            file_path: file_path.into(),
        }
    }
}
