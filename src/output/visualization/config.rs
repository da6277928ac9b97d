//! Plot configuration shared by the time-series plots

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust,ignore
/// use coronal_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::temperature("Nanoflare, 200 s");
/// config.electron_color = RED;
/// config.width = 1920;
/// config.height = 1080;
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title
    pub title: String,

    /// X-axis label (default: "Time (s)")
    pub xlabel: String,

    /// Y-axis label
    pub ylabel: String,

    /// Electron (or single) curve color (default: BLUE)
    pub electron_color: RGBColor,

    /// Ion curve color (default: RED)
    pub ion_color: RGBColor,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "Time (s)".to_string(),
            ylabel: String::new(),
            electron_color: BLUE,
            ion_color: RED,
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Electron and ion temperature vs time
    pub fn temperature(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Loop Temperature".to_string()),
            ylabel: "Temperature (MK)".to_string(),
            ..Self::default()
        }
    }

    /// Density vs time
    pub fn density(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Loop Density".to_string()),
            ylabel: "Density (1e9 cm^-3)".to_string(),
            ..Self::default()
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert_eq!(config.xlabel, "Time (s)");
        assert!(config.show_grid);
    }

    #[test]
    fn test_temperature_config() {
        assert_eq!(PlotConfig::temperature(NO_TITLE).title, "Loop Temperature");
        assert_eq!(PlotConfig::temperature("Nanoflare").title, "Nanoflare");
        assert_eq!(PlotConfig::temperature(NO_TITLE).ylabel, "Temperature (MK)");
    }

    #[test]
    fn test_density_config_with_string() {
        let config = PlotConfig::density(format!("L = {} Mm", 40));
        assert_eq!(config.title, "L = 40 Mm");
    }
}
