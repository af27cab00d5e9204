use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{font::FontFace, template::Template},
    data::table::Table,
    foundation::{
        core::{AnchorPoint, PreviewGeometry},
        error::{CertError, CertResult},
    },
    session::run::RunInputs,
    transform::TextStyle,
};

/// JSON job description: every input of a run in one file.
///
/// ```json
/// {
///   "template": "template.png",
///   "data": "names.csv",
///   "font": "fonts/Serif.ttf",
///   "column": "Full Name",
///   "anchor": { "x": 400.0, "y": 310.0 },
///   "style": { "font_size": 36.0, "color_hex": "#1a1a1a" },
///   "out_dir": "out"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Template image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// CSV path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    /// Font file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    /// Name column; auto-selected when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Anchor in preview pixels; preview center when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorPoint>,
    /// Preview geometry the anchor was captured on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewGeometry>,
    /// Text styling.
    #[serde(default)]
    pub style: TextStyle,
    /// Directory the archive is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

impl JobFile {
    /// Parse a job file. Relative paths are resolved against the job file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> CertResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        let mut job = Self::from_json(&text)
            .map_err(|e| CertError::validation(format!("job file '{}': {e}", path.display())))?;
        if let Some(base) = path.parent() {
            job.resolve_relative_to(base);
        }
        Ok(job)
    }

    /// Parse job JSON without touching the filesystem.
    pub fn from_json(text: &str) -> CertResult<Self> {
        serde_json::from_str(text).map_err(|e| CertError::validation(e.to_string()))
    }

    /// Rebase every relative path onto `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for p in [
            &mut self.template,
            &mut self.data,
            &mut self.font,
            &mut self.out_dir,
        ]
        .into_iter()
        .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// Load every referenced file. Inputs that are not set stay `None` so the pre-flight check
    /// can name them.
    pub fn load_inputs(&self) -> CertResult<RunInputs> {
        Ok(RunInputs {
            template: self.template.as_deref().map(Template::from_path).transpose()?,
            table: self.data.as_deref().map(Table::from_path).transpose()?,
            font: self.font.as_deref().map(FontFace::from_path).transpose()?,
            name_column: self.column.clone(),
            anchor: self.anchor,
            preview: self.preview,
            style: self.style.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/job.rs"]
mod tests;
