//! Viewer settings and option types.

/// Which effects are mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EffectMode {
    /// Cursor particle trail only.
    Trail,
    /// Perspective grid only.
    Grid,
    /// Grid backdrop with the trail on top.
    #[default]
    Both,
}

impl EffectMode {
    pub const ALL: [EffectMode; 3] = [EffectMode::Trail, EffectMode::Grid, EffectMode::Both];

    pub fn label(&self) -> &'static str {
        match self {
            EffectMode::Trail => "Trail",
            EffectMode::Grid => "Grid",
            EffectMode::Both => "Grid + Trail",
        }
    }

    pub fn has_trail(&self) -> bool {
        matches!(self, EffectMode::Trail | EffectMode::Both)
    }

    pub fn has_grid(&self) -> bool {
        matches!(self, EffectMode::Grid | EffectMode::Both)
    }
}

/// Page background behind the transparent effect layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backdrop {
    #[default]
    Dark,
    Light,
}

impl Backdrop {
    pub fn label(&self) -> &'static str {
        match self {
            Backdrop::Dark => "Dark",
            Backdrop::Light => "Light",
        }
    }

    pub fn color(&self) -> eframe::egui::Color32 {
        match self {
            Backdrop::Dark => eframe::egui::Color32::from_rgb(9, 9, 11),
            Backdrop::Light => eframe::egui::Color32::from_rgb(250, 250, 250),
        }
    }
}

/// Runtime knobs exposed in the side panel.
#[derive(Clone, Debug)]
pub struct ViewerSettings {
    pub effect_mode: EffectMode,
    /// Raster downscale factor (1 = one canvas pixel per screen point).
    pub scale: u32,
    /// Simulate a touch-first device when mounting.
    pub coarse_pointer: bool,
    /// Stop ticking the effects; the last frame stays on screen.
    pub paused: bool,
    pub backdrop: Backdrop,
    pub show_stats: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            effect_mode: EffectMode::default(),
            scale: 1,
            coarse_pointer: false,
            paused: false,
            backdrop: Backdrop::default(),
            show_stats: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_mode_layers() {
        assert!(EffectMode::Both.has_trail() && EffectMode::Both.has_grid());
        assert!(EffectMode::Trail.has_trail() && !EffectMode::Trail.has_grid());
        assert!(!EffectMode::Grid.has_trail() && EffectMode::Grid.has_grid());
    }
}
