//! Environment configuration for the presentation layer.

use std::env;

/// Render width used when `MINIAPP_CHAT_WIDTH` is absent or unusable.
pub const DEFAULT_WIDTH: usize = 72;

/// Narrowest width the bubble layout supports.
pub const MIN_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub width: usize,
    pub light_theme: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            light_theme: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            width: env_string_opt("MINIAPP_CHAT_WIDTH")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .map_or(DEFAULT_WIDTH, |width| width.max(MIN_WIDTH)),
            light_theme: env_flag("MINIAPP_CHAT_LIGHT"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EnvConfig, DEFAULT_WIDTH, MIN_WIDTH};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_apply_when_unset() {
        let _lock = env_lock();
        let _g1 = set_env_guard("MINIAPP_CHAT_WIDTH", None);
        let _g2 = set_env_guard("MINIAPP_CHAT_LIGHT", None);

        assert_eq!(EnvConfig::from_env(), EnvConfig::default());
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _g1 = set_env_guard("MINIAPP_CHAT_WIDTH", Some(" 100 "));
        let _g2 = set_env_guard("MINIAPP_CHAT_LIGHT", Some("1"));

        let config = EnvConfig::from_env();
        assert_eq!(config.width, 100);
        assert!(config.light_theme);
    }

    #[test]
    fn unusable_width_falls_back_or_clamps() {
        let _lock = env_lock();
        let _g1 = set_env_guard("MINIAPP_CHAT_WIDTH", Some("wide"));
        assert_eq!(EnvConfig::from_env().width, DEFAULT_WIDTH);

        let _g2 = set_env_guard("MINIAPP_CHAT_WIDTH", Some("3"));
        assert_eq!(EnvConfig::from_env().width, MIN_WIDTH);
    }
}
