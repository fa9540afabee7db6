use std::fs;
use serde::Deserialize;
use tracing::warn;

/// 课程接口的默认地址
pub const DEFAULT_ENDPOINT: &str = "https://www.jsonkeeper.com/b/7JF5";

const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// 读取工作目录下的 config.toml，缺失或解析失败时回退到默认值
    pub fn load_or_default() -> Config {
        let Ok(config_str) = fs::read_to_string(CONFIG_FILE) else {
            return Config::default();
        };

        match toml::from_str(&config_str) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "invalid {CONFIG_FILE}, falling back to defaults");
                Config::default()
            }
        }
    }
}
