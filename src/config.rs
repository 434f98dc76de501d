use crate::error::{ConfigError, MatchError};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 权重之和允许的误差
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub matcher: MatcherConfig,
}

/// 匹配器配置: 三个字段权重 + 匹配阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub serial_weight: f64,
    pub hsn_weight: f64,
    pub name_weight: f64,
    pub match_threshold: f64,
}

impl MatcherConfig {
    pub const DEFAULT_SERIAL_WEIGHT: f64 = 0.50;
    pub const DEFAULT_HSN_WEIGHT: f64 = 0.30;
    pub const DEFAULT_NAME_WEIGHT: f64 = 0.20;
    pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.70;

    /// 只替换阈值，权重不变
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// 校验: 权重非负且和为 1.0，阈值在 [0, 1]
    pub fn validate(&self) -> Result<(), MatchError> {
        let weights = [
            ("serial_weight", self.serial_weight),
            ("hsn_weight", self.hsn_weight),
            ("name_weight", self.name_weight),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, w
                )));
            }
        }

        let sum = self.serial_weight + self.hsn_weight + self.name_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidConfig(format!(
                "weights must sum to 1.0, got {}",
                sum
            )));
        }

        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(MatchError::InvalidConfig(format!(
                "match_threshold must be within [0, 1], got {}",
                self.match_threshold
            )));
        }

        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            serial_weight: Self::DEFAULT_SERIAL_WEIGHT,
            hsn_weight: Self::DEFAULT_HSN_WEIGHT,
            name_weight: Self::DEFAULT_NAME_WEIGHT,
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// 环境变量前缀: MATCHER__MATCH_THRESHOLD -> matcher.match_threshold
const ENV_PREFIX: &str = "MATCHER__";

impl AppConfig {
    /// 分层加载: 默认值 -> 配置文件 (可选) -> MATCHER__* 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let vars = std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX));
        Self::load_with_env(path, vars)
    }

    /// 同 load，环境变量由调用方提供
    pub fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let defaults = MatcherConfig::default();
        let mut builder = Config::builder()
            .set_default("matcher.serial_weight", defaults.serial_weight)?
            .set_default("matcher.hsn_weight", defaults.hsn_weight)?
            .set_default("matcher.name_weight", defaults.name_weight)?
            .set_default("matcher.match_threshold", defaults.match_threshold)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let env: Map<String, String> = vars.into_iter().collect();
        let cfg: AppConfig = builder
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .build()?
            .try_deserialize()?;

        cfg.matcher.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // 读写进程环境变量的用例串行执行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let cfg = MatcherConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.match_threshold, 0.70);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let cfg = MatcherConfig {
            serial_weight: 0.6,
            ..MatcherConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let cfg = MatcherConfig {
            serial_weight: 1.0,
            hsn_weight: -0.2,
            name_weight: 0.2,
            match_threshold: 0.7,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let cfg = MatcherConfig::default().with_threshold(1.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_reads_matcher_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("MATCHER__MATCH_THRESHOLD", "0.8");
        let cfg = AppConfig::load(None);
        std::env::remove_var("MATCHER__MATCH_THRESHOLD");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.matcher.match_threshold, 0.8);
        assert_eq!(cfg.matcher.serial_weight, MatcherConfig::DEFAULT_SERIAL_WEIGHT);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matcher]\nmatch_threshold = 0.6").unwrap();

        let vars = env(&[
            ("MATCHER__SERIAL_WEIGHT", "0.4"),
            ("MATCHER__HSN_WEIGHT", "0.4"),
        ]);
        let cfg = AppConfig::load_with_env(Some(file.path()), vars).unwrap();
        assert_eq!(cfg.matcher.serial_weight, 0.4);
        assert_eq!(cfg.matcher.hsn_weight, 0.4);
        assert_eq!(cfg.matcher.match_threshold, 0.6);
    }

    #[test]
    fn test_load_rejects_invalid_env_weights() {
        let vars = env(&[("MATCHER__NAME_WEIGHT", "0.5")]);
        let result = AppConfig::load_with_env(None, vars);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[matcher]\nserial_weight = 0.4\nhsn_weight = 0.4\n\
             name_weight = 0.2\nmatch_threshold = 0.6"
        )
        .unwrap();

        let _guard = ENV_LOCK.lock().unwrap();
        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.matcher.serial_weight, 0.4);
        assert_eq!(cfg.matcher.hsn_weight, 0.4);
        assert_eq!(cfg.matcher.match_threshold, 0.6);
    }

    #[test]
    fn test_load_rejects_invalid_file_weights() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matcher]\nserial_weight = 0.9").unwrap();

        let _guard = ENV_LOCK.lock().unwrap();
        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
