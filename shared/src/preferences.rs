//! 本地偏好设置
//!
//! 只保存在浏览器存储中，不会发送到后端。存储中的旧数据缺字段时按默认值补齐，
//! 无法解析时整体回退到默认值。

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::UnknownOption;
use crate::session::TokenStorage;

/// 偏好设置在 localStorage 中的键
pub const PREFERENCES_KEY: &str = "reliefclaim_preferences";

macro_rules! choice {
    ($name:ident { $($variant:ident => $value:literal, $label:literal;)+ }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str() == s)
                    .ok_or_else(|| UnknownOption(s.to_string()))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

choice!(Theme {
    Light => "light", "Light";
    Dark => "dark", "Dark";
    System => "system", "System Default";
});

impl Theme {
    /// daisyUI 的 `data-theme` 值；跟随系统时不设置
    pub fn data_theme(&self) -> Option<&'static str> {
        match self {
            Theme::Light => Some("light"),
            Theme::Dark => Some("dark"),
            Theme::System => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

choice!(FontSize {
    Small => "small", "Small";
    Medium => "medium", "Medium";
    Large => "large", "Large";
});

impl FontSize {
    /// 根元素字号（px）
    pub fn root_px(&self) -> u8 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
}

choice!(Language {
    En => "en", "English";
    Es => "es", "Español";
    Fr => "fr", "Français";
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
    pub show_profile: bool,
    pub share_usage_data: bool,
    pub theme: Theme,
    pub font_size: FontSize,
    pub language: Language,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            sms_notifications: false,
            show_profile: true,
            share_usage_data: false,
            theme: Theme::default(),
            font_size: FontSize::default(),
            language: Language::default(),
        }
    }
}

impl Preferences {
    pub fn load<S: TokenStorage>(storage: &S) -> Self {
        let Some(raw) = storage.load(PREFERENCES_KEY) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "stored preferences unreadable, using defaults");
            Self::default()
        })
    }

    /// 返回是否写入成功
    pub fn save<S: TokenStorage>(&self, storage: &S) -> bool {
        match serde_json::to_string(self) {
            Ok(raw) => storage.store(PREFERENCES_KEY, &raw),
            Err(e) => {
                warn!(error = %e, "failed to encode preferences");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::MemoryStorage;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let storage = MemoryStorage::default();
        let prefs = Preferences::load(&storage);
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.email_notifications);
        assert!(!prefs.sms_notifications);
    }

    #[test]
    fn test_saved_preferences_survive_reload() {
        let storage = MemoryStorage::default();
        let prefs = Preferences {
            theme: Theme::Dark,
            font_size: FontSize::Large,
            language: Language::Fr,
            sms_notifications: true,
            ..Preferences::default()
        };
        assert!(prefs.save(&storage));

        let reloaded = Preferences::load(&storage.clone());
        assert_eq!(reloaded, prefs);
    }

    #[test]
    fn test_partial_and_corrupt_entries() {
        let storage = MemoryStorage::default();
        storage.store(PREFERENCES_KEY, r#"{"theme":"dark"}"#);
        let prefs = Preferences::load(&storage);
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.push_notifications);

        storage.store(PREFERENCES_KEY, "not json");
        assert_eq!(Preferences::load(&storage), Preferences::default());
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("system".parse::<Theme>(), Ok(Theme::System));
        assert_eq!("es".parse::<Language>().map(|l| l.label()), Ok("Español"));
        assert!("huge".parse::<FontSize>().is_err());
        assert_eq!(Theme::System.data_theme(), None);
    }
}
