use crate::foundation::error::{KokubanError, KokubanResult};
use crate::foundation::geom::Anchor;
use crate::template::color::ColorDef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Board theme carried by both configuration formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardVariant {
    /// Dark slate board with white text.
    Black,
    /// Dark green chalkboard, the historical default.
    #[default]
    Green,
    /// Light board with dark text.
    White,
}

impl BoardVariant {
    /// Default background color for the variant.
    pub fn bg_color(self) -> ColorDef {
        match self {
            BoardVariant::Black => ColorDef::rgba(0.078, 0.090, 0.110, 1.0),
            BoardVariant::Green => ColorDef::rgba(0.090, 0.278, 0.184, 1.0),
            BoardVariant::White => ColorDef::rgba(0.957, 0.945, 0.910, 1.0),
        }
    }

    /// Default text color for the variant.
    pub fn text_color(self) -> ColorDef {
        match self {
            BoardVariant::Black | BoardVariant::Green => ColorDef::rgba(1.0, 1.0, 1.0, 1.0),
            BoardVariant::White => ColorDef::rgba(0.133, 0.133, 0.133, 1.0),
        }
    }

    /// Resolve a legacy free-form style string; unknown values fall back to
    /// the green board.
    pub(crate) fn from_legacy_style(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "blackboard" | "dark" => Self::Black,
            "white" | "whiteboard" | "light" => Self::White,
            "green" | "greenboard" | "chalkboard" => Self::Green,
            other => {
                tracing::debug!(style = other, "unknown legacy board style, using green");
                Self::Green
            }
        }
    }
}

/// Where the title field is drawn relative to the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePlacement {
    /// Dedicated band above the grid, left-aligned.
    #[default]
    Left,
    /// Dedicated band above the grid, centered.
    Center,
    /// No dedicated band; the title is laid out as a grid field.
    Inline,
}

/// Field values for one board, keyed by the fixed semantic vocabulary.
///
/// Every value is an opaque string; the engine never validates business
/// content. The serialized form of this struct doubles as the content
/// component of sprite-cache keys, so field order is fixed by declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlackboardInfo {
    /// 工事名, the project title.
    pub project_name: Option<String>,
    /// 撮影日, shot date or datetime as the collaborator recorded it.
    pub timestamp: Option<String>,
    /// 工種, work type.
    pub work_type: Option<String>,
    /// 天候, weather at the time of the shot.
    pub weather: Option<String>,
    /// 種別, work category.
    pub work_category: Option<String>,
    /// 細別, work detail.
    pub work_detail: Option<String>,
    /// 施工者, contractor name.
    pub contractor: Option<String>,
    /// 場所, shot location.
    pub location: Option<String>,
    /// 測点, station / chainage.
    pub station: Option<String>,
    /// 立会者, witness name.
    pub witness: Option<String>,
    /// 備考, free-form remarks.
    pub remarks: Option<String>,
}

impl BlackboardInfo {
    /// Serialize into the canonical JSON used for cache keys.
    ///
    /// Field order is the struct declaration order, so equal values always
    /// produce equal strings.
    pub fn canonical_json(&self) -> KokubanResult<String> {
        serde_json::to_string(self)
            .map_err(|e| KokubanError::serde(format!("serialize blackboard info: {e}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemplateDef {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) fields: Vec<String>,
    #[serde(default)]
    pub(crate) default_values: BTreeMap<String, String>,
    pub(crate) design_settings: DesignSettingsDef,
    // Kept its snake_case spelling from the release that introduced it.
    #[serde(default, rename = "layout_id")]
    pub(crate) layout_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum DesignSettingsDef {
    Legacy(LegacyDesignDef),
    Modern(LayoutConfigDef),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct PositionDef {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

/// The percent-based design shape written by the original board editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyDesignDef {
    pub(crate) position: PositionDef,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) style: String,
    #[serde(default)]
    pub(crate) font_size: Option<f64>,
    #[serde(default)]
    pub(crate) bg_color: Option<ColorDef>,
    #[serde(default)]
    pub(crate) text_color: Option<ColorDef>,
    #[serde(default)]
    pub(crate) opacity: Option<f64>,
}

/// The grouped, all-optional modern layout shape; groups merge over defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayoutConfigDef {
    #[serde(default)]
    pub(crate) board: Option<BoardGroupDef>,
    #[serde(default)]
    pub(crate) grid: Option<GridGroupDef>,
    #[serde(default)]
    pub(crate) typography: Option<TypographyGroupDef>,
    #[serde(default)]
    pub(crate) safe_area: Option<SafeAreaGroupDef>,
    #[serde(default)]
    pub(crate) style: Option<StyleGroupDef>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardGroupDef {
    #[serde(default)]
    pub(crate) x: Option<f64>,
    #[serde(default)]
    pub(crate) y: Option<f64>,
    #[serde(default)]
    pub(crate) w: Option<f64>,
    #[serde(default)]
    pub(crate) h: Option<f64>,
    #[serde(default)]
    pub(crate) anchor: Option<Anchor>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GridGroupDef {
    #[serde(default)]
    pub(crate) columns: Option<u32>,
    #[serde(default)]
    pub(crate) gap: Option<f64>,
    #[serde(default)]
    pub(crate) title_placement: Option<TitlePlacement>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TypographyGroupDef {
    #[serde(default)]
    pub(crate) base: Option<f64>,
    #[serde(default)]
    pub(crate) scale_title: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SafeAreaGroupDef {
    #[serde(default)]
    pub(crate) top: Option<f64>,
    #[serde(default)]
    pub(crate) bottom: Option<f64>,
    #[serde(default)]
    pub(crate) left: Option<f64>,
    #[serde(default)]
    pub(crate) right: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StyleGroupDef {
    #[serde(default)]
    pub(crate) variant: Option<BoardVariant>,
    #[serde(default)]
    pub(crate) opacity: Option<f64>,
    #[serde(default)]
    pub(crate) bg_color: Option<ColorDef>,
    #[serde(default)]
    pub(crate) text_color: Option<ColorDef>,
}

/// Boundary template object: ordered field labels plus design settings.
///
/// This is the JSON-facing record an external collaborator persists. It is
/// adapted into one canonical layout before any drawing happens; see
/// [`crate::template::adapter::adapt`].
#[derive(Debug, Clone)]
pub struct Template {
    def: TemplateDef,
}

impl Template {
    /// Parse a template from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> KokubanResult<Self> {
        let def: TemplateDef = serde_json::from_reader(r)
            .map_err(|e| KokubanError::validation(format!("parse template JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a template from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KokubanResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KokubanError::validation(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a template from an in-memory JSON string.
    pub fn from_json(s: &str) -> KokubanResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Stable template identifier, part of every sprite-cache key.
    pub fn id(&self) -> &str {
        &self.def.id
    }

    /// Human-readable template name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Ordered field labels to display.
    ///
    /// The first label that resolves to the title key is rendered in the
    /// title placement; a remarks label is rendered as the wrapped block.
    pub fn fields(&self) -> &[String] {
        &self.def.fields
    }

    /// Template-level fallback value for a field label, when the board
    /// record leaves it empty.
    pub fn default_value(&self, label: &str) -> Option<&str> {
        self.def.default_values.get(label).map(String::as_str)
    }

    pub(crate) fn def(&self) -> &TemplateDef {
        &self.def
    }

    pub(crate) fn from_def(def: TemplateDef) -> Self {
        Self { def }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
