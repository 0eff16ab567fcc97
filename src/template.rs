//! Rendering of the `message-weather` email template
//!
//! The HTML and plain-text variants are embedded at compile time and
//! rendered with tera. HTML output is autoescaped; the text variant is not.

use anyhow::{Context as _, Result};
use tera::{Context, Tera};

use crate::email::{EmailJob, TEMPLATE_NAME};

/// Subject and bodies produced from an [`EmailJob`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Wraps the tera engine with the templates this service ships
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut engine = Tera::default();
        engine
            .add_raw_templates(vec![
                (
                    "message-weather.html",
                    include_str!("../templates/message-weather.html"),
                ),
                (
                    "message-weather.txt",
                    include_str!("../templates/message-weather.txt"),
                ),
            ])
            .context("Failed to load email templates")?;

        Ok(Self { engine })
    }

    /// Render the job's template with its locals
    pub fn render(&self, job: &EmailJob) -> Result<RenderedEmail> {
        let context = Context::from_serialize(&job.locals)
            .context("Failed to build template context")?;

        let html = self
            .engine
            .render(&format!("{}.html", job.template_name), &context)
            .with_context(|| format!("Failed to render {}.html", job.template_name))?;
        let text = self
            .engine
            .render(&format!("{}.txt", job.template_name), &context)
            .with_context(|| format!("Failed to render {}.txt", job.template_name))?;

        Ok(RenderedEmail {
            subject: format!("Message for {}", job.locals.name),
            text,
            html,
        })
    }
}
