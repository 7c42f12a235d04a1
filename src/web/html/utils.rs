use html_minifier::HTMLMinifier;
use tera::Context;
use thiserror::Error;
use tracing::error;

use crate::State;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("rendering error")]
    Tera(#[from] tera::Error),
}

/// Renders a template and minifies the result, falling back to the unminified
/// HTML when the minifier chokes on it.
pub(super) fn render(
    state: &State,
    template: &'static str,
    context: &Context,
) -> Result<String, TemplateError> {
    let rendered = state.tera.render(template, context)?;

    let mut minifier = HTMLMinifier::new();
    if let Err(err) = minifier.digest(&rendered) {
        error!(template, "failed to minify HTML: {}", err);
        return Ok(rendered);
    }

    match std::str::from_utf8(minifier.get_html()) {
        Ok(minified) => Ok(minified.to_string()),
        Err(err) => {
            error!(template, "minified HTML is not UTF-8: {}", err);
            Ok(rendered)
        },
    }
}
