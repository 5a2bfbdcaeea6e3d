//! Render a form page using all three widget modules
//!
//! Run with: `cargo run --example form_page`
//!
//! The page is written to stdout.

use acton_bootstrap::prelude::*;
use std::io;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    acton_bootstrap::observability::init()?;

    let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/templates");
    let scratch = tempfile::tempdir()?;
    let config = BootstrapUiConfig::new()
        .with_template_dir(templates)
        .with_compile_dir(scratch.path().join("templates_c"))
        .with_cache_dir(scratch.path().join("cache"))
        .with_request_path("/forms/form-page.php");
    let mut ui = BootstrapUi::new(config)?;

    ui.add_message(
        "Danger",
        r##"<a href="#">link1</a> <a class="test" href="#">link2</a> not link"##,
        MessageLevel::Danger,
    );
    ui.add_message("Saved", "Everything is fine.", MessageLevel::Success);

    ui.assign("form_action", "/forms/form-page.php");

    for module in [MODULE_DATEPICKER, MODULE_COLORPICKER, MODULE_SORTABLE] {
        ui.enable(module)?;
    }

    ui.display_to("form-page.html", io::stdout().lock())?;
    Ok(())
}
