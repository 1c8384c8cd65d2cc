use serde::{Deserialize, Serialize};

/// Window configuration. Compiled in; there is no config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Game1: Text/Tiles".into(),
            width: 480,
            height: 480,
        }
    }
}

impl AppConfig {
    /// Width over height of the drawable surface.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
