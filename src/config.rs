use std::{collections::HashSet, path::Path, path::PathBuf};

use figment::{providers::Format, Figment};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub system: ConfigSystem,
    #[serde(default)]
    pub detection: ConfigDetection,
    pub serial: Option<ConfigSerial>,
    pub sms: ConfigSms,
    pub audio: ConfigAudio,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigSystem {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Frame loop cadence in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for ConfigSystem {
    fn default() -> Self {
        ConfigSystem {
            log_level: default_log_level(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigDetection {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_allow_list")]
    pub allow_list: HashSet<String>,
}

impl Default for ConfigDetection {
    fn default() -> Self {
        ConfigDetection {
            confidence_threshold: default_confidence_threshold(),
            allow_list: default_allow_list(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigSerial {
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigSms {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigAudio {
    pub alert_sound_path: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_interval_ms() -> u64 {
    30
}

fn default_confidence_threshold() -> f32 {
    0.6
}

fn default_baud_rate() -> u32 {
    115_200
}

/// Species considered alert-worthy when no allow-list is configured.
fn default_allow_list() -> HashSet<String> {
    [
        "elephant",
        "bear",
        "zebra",
        "giraffe",
        "lion",
        "tiger",
        "leopard",
        "cheetah",
        "wolf",
        "fox",
        "panther",
        "jaguar",
        "coyote",
        "hyena",
        "rhinoceros",
        "hippopotamus",
        "buffalo",
        "deer",
        "moose",
        "bison",
        "goat",
        "pig",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, String> {
    let cfg: Config = Figment::new()
        .merge(figment::providers::Toml::file(path))
        .merge(figment::providers::Env::prefixed("WILDWATCH_").split("__"))
        .extract()
        .map_err(|e| e.to_string())?;

    if !(0.0..=1.0).contains(&cfg.detection.confidence_threshold) {
        return Err(format!(
            "confidence_threshold must be within [0, 1], got {}",
            cfg.detection.confidence_threshold
        ));
    }
    if cfg.detection.allow_list.is_empty() {
        return Err("allow_list must name at least one species".to_string());
    }
    if cfg.system.frame_interval_ms == 0 {
        return Err("frame_interval_ms must be at least 1".to_string());
    }
    if let Some(serial) = &cfg.serial {
        if serial.port.is_empty() {
            return Err("serial.port must not be empty".to_string());
        }
    }
    Ok(cfg)
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_minimal(jail: &mut figment::Jail, extra: &str) -> Result<(), figment::Error> {
        jail.create_file(
            "config.toml",
            &format!(
                "{}\n{}",
                indoc::indoc! {r#"
                    [sms]
                    account_sid = "AC123"
                    auth_token = "secret"
                    from = "+15550001111"
                    to = "+15552223333"

                    [audio]
                    alert_sound_path = "alert_cracker.mp3"
                "#},
                extra
            ),
        )?;
        Ok(())
    }

    #[test]
    fn test_defaults() {
        figment::Jail::expect_with(|jail| {
            write_minimal(jail, "")?;
            let cfg = load_config("config.toml").unwrap();
            assert_eq!(cfg.system.log_level, "info");
            assert_eq!(cfg.system.frame_interval_ms, 30);
            assert_eq!(cfg.detection.confidence_threshold, 0.6);
            assert!(cfg.detection.allow_list.contains("tiger"));
            assert!(!cfg.detection.allow_list.contains("dog"));
            assert_eq!(cfg.serial, None);
            Ok(())
        });
    }

    #[test]
    fn test_serial_baud_default() {
        figment::Jail::expect_with(|jail| {
            write_minimal(jail, "[serial]\nport = \"/dev/ttyUSB0\"\n")?;
            let cfg = load_config("config.toml").unwrap();
            assert_eq!(
                cfg.serial,
                Some(ConfigSerial {
                    port: "/dev/ttyUSB0".to_string(),
                    baud_rate: 115_200,
                })
            );
            Ok(())
        });
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        figment::Jail::expect_with(|jail| {
            write_minimal(jail, "[detection]\nconfidence_threshold = 1.5\n")?;
            let err = load_config("config.toml").unwrap_err();
            assert!(err.contains("confidence_threshold"), "{}", err);
            Ok(())
        });
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        figment::Jail::expect_with(|jail| {
            write_minimal(jail, "[detection]\nallow_list = []\n")?;
            let err = load_config("config.toml").unwrap_err();
            assert!(err.contains("allow_list"), "{}", err);
            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            write_minimal(jail, "")?;
            jail.set_env("WILDWATCH_SYSTEM__LOG_LEVEL", "debug");
            let cfg = load_config("config.toml").unwrap();
            assert_eq!(cfg.system.log_level, "debug");
            Ok(())
        });
    }
}
