//! Server-rendered views
//!
//! All templates are embedded in the binary and registered with tera at
//! startup, so a deployed binary has no template directory to lose.

use anyhow::{Context as _, Result};
use tera::{Context, Tera};

/// Template engine over the embedded page templates
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Build the engine and register every template.
    ///
    /// Fails at startup on a syntax error in any template.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("index.html", include_str!("../../templates/index.html")),
            ("login.html", include_str!("../../templates/login.html")),
            ("register.html", include_str!("../../templates/register.html")),
            ("news_form.html", include_str!("../../templates/news_form.html")),
        ])
        .context("Failed to compile templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("Failed to render template: {}", template))
    }
}
