//! Config command implementation.

use codesync::errors::Result;
use codesync::interface::Context;

/// Renders the effective configuration as TOML.
pub fn render_config(ctx: &Context) -> Result<String> {
    Ok(toml::to_string_pretty(&ctx.config)?)
}

/// Executes the config command -- prints the effective resolved configuration.
pub fn config(ctx: &Context) -> Result<()> {
    print!("{}", render_config(ctx)?);
    Ok(())
}
