//! Output renderers for derived options, dispatched by format name.

use anyhow::{anyhow, Result};
use optinspect::{command, Inspection};
use serde::Serialize;

/// Options derived from one descriptor.
#[derive(Serialize)]
pub struct Report {
    pub function: String,
    #[serde(flatten)]
    pub inspection: Inspection,
}

/// Trait for rendering reports into a specific output format.
pub trait Renderer {
    fn render(&self, reports: &[Report]) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(JsonRenderer)),
        "help" => Ok(Box::new(HelpRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or help", format)),
    }
}

/// JSON array with one `{function, options, warnings}` object per report.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, reports: &[Report]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(reports)?;
        out.push('\n');
        Ok(out)
    }
}

/// The `--help` text clap renders for each derived command.
pub struct HelpRenderer;

impl Renderer for HelpRenderer {
    fn render(&self, reports: &[Report]) -> Result<String> {
        let pages: Vec<String> = reports
            .iter()
            .map(|report| {
                command::build(&report.function, &report.inspection.options)
                    .render_help()
                    .to_string()
            })
            .collect();
        Ok(pages.join("\n"))
    }
}
