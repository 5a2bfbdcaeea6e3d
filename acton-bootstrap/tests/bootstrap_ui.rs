//! Integration tests for the BootstrapUi facade
//!
//! Every test constructs the process-wide facade, so all of them run serially.

use acton_bootstrap::prelude::*;
use acton_bootstrap::ui::{VAR_CATEGORY, VAR_NAME, VAR_NAVBAR_ACTIVE, VAR_URL};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

const DUMP_TEMPLATE: &str = "\
{% for m in ui_messages %}[{{ m.class }}|{{ m.title }}|{{ m.content }}]{% endfor %}
{% for s in ui_stylesheets %}<css {{ s.key }}={{ s.url }}>{% endfor %}
{% for s in ui_scripts %}<js {{ s.key }}={{ s.url }}>{% endfor %}
{% for s in ui_script_snippets %}<code {{ s.key }}>{{ s.code }}{% endfor %}
";

/// UI root with built-in templates, plus application template and config dirs
fn fixture() -> (TempDir, BootstrapUiConfig) {
    let root = TempDir::new().unwrap();
    for dir in ["templates", "configs", "app-templates", "app-configs"] {
        fs::create_dir_all(root.path().join(dir)).unwrap();
    }
    let templates = root.path().join("templates");
    fs::write(templates.join("dump.html"), DUMP_TEMPLATE).unwrap();
    fs::write(templates.join("greeting.html"), "built-in {{ name }}").unwrap();

    let config = BootstrapUiConfig::new()
        .with_ui_root(root.path())
        .with_template_dir(root.path().join("app-templates"))
        .with_config_dir(root.path().join("app-configs"));
    (root, config)
}

fn var(ui: &BootstrapUi, name: &str) -> Option<String> {
    ui.variable(name).map(ToString::to_string)
}

#[test]
#[serial]
fn test_second_instance_is_rejected() {
    let (_root, config) = fixture();
    let ui = BootstrapUi::new(config.clone()).unwrap();
    assert!(BootstrapUi::is_live());

    let second = BootstrapUi::new(config.clone());
    assert!(matches!(second, Err(BootstrapUiError::SingletonViolation)));

    // The first instance is untouched
    assert_eq!(ui.base_url(), "http://localhost");

    drop(ui);
    assert!(!BootstrapUi::is_live());
    assert!(BootstrapUi::new(config).is_ok());
}

#[test]
#[serial]
fn test_missing_template_dir_fails_and_releases_slot() {
    let (root, config) = fixture();
    let missing = root.path().join("not-there");
    let config = config.with_template_dir(missing.clone());

    let err = BootstrapUi::new(config).unwrap_err();
    assert!(matches!(err, BootstrapUiError::MissingFiles { .. }));
    assert_eq!(err.path(), Some(missing.as_path()));
    assert!(missing.is_dir(), "missing directory was not created");
    assert!(!BootstrapUi::is_live());
}

#[test]
#[serial]
fn test_compile_dir_that_is_a_file_fails() {
    let (root, config) = fixture();
    let file = root.path().join("compiled");
    fs::write(&file, "not a directory").unwrap();

    let err = BootstrapUi::new(config.with_compile_dir(file.clone())).unwrap_err();
    assert!(matches!(err, BootstrapUiError::UnwritableDirectory { .. }));
    assert_eq!(err.path(), Some(file.as_path()));
    assert!(!BootstrapUi::is_live());
}

#[test]
#[serial]
fn test_initial_state() {
    let (root, config) = fixture();
    let ui = BootstrapUi::new(config.with_request_path("/forms/my-first_page.php?x=1")).unwrap();

    let template_keys: Vec<String> = ui.template_dirs().into_keys().collect();
    assert_eq!(template_keys, ["app", "BootstrapUi"]);
    let templates = root.path().join("templates");
    assert_eq!(ui.template_dirs()["BootstrapUi"], templates);

    let config_keys: Vec<&str> = ui.config_dirs().keys().map(String::as_str).collect();
    assert_eq!(config_keys, ["app", "BootstrapUi"]);

    assert_eq!(ui.compile_dir(), root.path().join("templates_c"));
    assert_eq!(ui.cache_dir(), root.path().join("cache"));
    assert!(ui.compile_dir().is_dir());
    assert!(ui.cache_dir().is_dir());

    let stylesheets = ui.stylesheets(None);
    assert_eq!(stylesheets.len(), 1);
    assert_eq!(
        stylesheets["BootstrapUi"],
        "http://localhost/css/bootstrap-ui.css"
    );
    assert!(ui.scripts(None).is_empty());
    assert!(ui.script_snippets(None).is_empty());
    assert!(ui.messages().is_empty());

    assert_eq!(var(&ui, VAR_URL).as_deref(), Some("http://localhost"));
    assert_eq!(var(&ui, VAR_NAME).as_deref(), Some("My First Page"));
    assert_eq!(var(&ui, VAR_CATEGORY).as_deref(), Some("Forms"));
    assert_eq!(var(&ui, VAR_NAVBAR_ACTIVE).as_deref(), Some("false"));
    let datepicker = var(&ui, "module_datepicker");
    assert_eq!(datepicker.as_deref(), Some(MODULE_DATEPICKER));
}

#[test]
#[serial]
fn test_set_request_path_updates_page_meta() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    ui.set_request_path("/admin/user_list.php");
    assert_eq!(var(&ui, VAR_NAME).as_deref(), Some("User List"));
    assert_eq!(var(&ui, VAR_CATEGORY).as_deref(), Some("Admin"));
}

#[test]
#[serial]
fn test_enable_unknown_module_changes_nothing() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();
    let stylesheets = ui.stylesheets(None);

    assert!(!ui.enable("someone/bootstrap-carousel").unwrap());
    assert_eq!(ui.stylesheets(None), stylesheets);
    assert!(ui.scripts(None).is_empty());
    assert!(ui.script_snippets(None).is_empty());
}

#[test]
#[serial]
fn test_enable_module_registers_assets_once() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    assert!(ui.enable(MODULE_SORTABLE).unwrap());
    let stylesheets = ui.stylesheets(None);
    let scripts = ui.scripts(None);

    assert_eq!(
        stylesheets[MODULE_SORTABLE],
        "http://localhost/vendor/bower-asset/bootstrap-sortable/Contents/bootstrap-sortable.css"
    );
    let script_keys: Vec<&str> = scripts.keys().map(String::as_str).collect();
    let required = format!("required by {MODULE_SORTABLE}");
    assert_eq!(script_keys, [required.as_str(), MODULE_SORTABLE]);
    assert!(ui.script_snippets(None).is_empty());

    assert!(ui.enable(MODULE_SORTABLE).unwrap());
    assert_eq!(ui.stylesheets(None), stylesheets);
    assert_eq!(ui.scripts(None), scripts);
}

#[test]
#[serial]
fn test_enable_module_with_snippet_registers_assets_once() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    assert!(ui.enable(MODULE_DATEPICKER).unwrap());
    let stylesheets = ui.stylesheets(None);
    let scripts = ui.scripts(None);
    let snippets = ui.script_snippets(None);

    let snippet_keys: Vec<&str> = snippets.keys().map(String::as_str).collect();
    assert_eq!(snippet_keys, [MODULE_DATEPICKER]);
    assert_eq!(scripts.len(), 1);

    assert!(ui.enable(MODULE_DATEPICKER).unwrap());
    assert_eq!(ui.stylesheets(None), stylesheets);
    assert_eq!(ui.scripts(None), scripts);
    assert_eq!(ui.script_snippets(None), snippets);
}

#[test]
#[serial]
fn test_enable_every_module() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    for module in UiModule::ALL {
        ui.enable_module(module).unwrap();
    }

    // Base stylesheet plus one per module
    assert_eq!(ui.stylesheets(None).len(), 4);
    assert_eq!(ui.script_snippets(None).len(), 2);
    let snippets = ui.script_snippets(Some(MODULE_DATEPICKER));
    assert!(snippets[MODULE_DATEPICKER].contains("datepicker("));
}

#[test]
#[serial]
fn test_non_url_stylesheet_is_rejected() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    let err = ui.add_stylesheet("not a url", None).unwrap_err();
    assert!(matches!(err, BootstrapUiError::NotAUrl(_)));
    assert_eq!(ui.stylesheets(None).len(), 1);
}

#[test]
#[serial]
fn test_display_renders_messages_and_assets_in_order() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    let link = r#"See <a href="/list">the list</a>"#;
    ui.add_message("Saved", link, MessageLevel::Success);
    ui.add_message("Heads up", "plain text", "custom");
    let cdn = ["https://cdn.test/a.js", "https://cdn.test/b.js"];
    ui.add_script(cdn, None).unwrap();
    ui.add_script_snippet("init();", Some("init")).unwrap();

    let html = ui.display("dump.html").unwrap();

    assert!(html.contains("[success|Saved|See <a "));
    assert!(html.contains(r#"class="alert-link""#));
    assert!(html.contains(r#"href="/list""#));
    assert!(html.contains("[custom|Heads up|plain text]"));
    let base_css = "<css BootstrapUi=http://localhost/css/bootstrap-ui.css>";
    assert!(html.contains(base_css));
    assert!(html.contains("<code init>init();"));

    let first = html.find("<js app-1=https://cdn.test/a.js>").unwrap();
    let second = html.find("<js app-2=https://cdn.test/b.js>").unwrap();
    assert!(first < second);

    let messages = html.find("[success").unwrap();
    let custom = html.find("[custom").unwrap();
    assert!(messages < custom);
}

#[test]
#[serial]
fn test_display_after_clear_messages() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    ui.add_message("Saved", "done", MessageLevel::Info);
    let html = ui.display("dump.html").unwrap();
    assert!(html.contains("[info|Saved|done]"));

    ui.clear_messages();
    let html = ui.display("dump.html").unwrap();
    assert!(!html.contains("[info"));
}

#[test]
#[serial]
fn test_display_to_writer() {
    let (_root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    let mut out = Vec::new();
    ui.display_to("greeting.html", &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "built-in ");
}

#[test]
#[serial]
fn test_app_template_overrides_built_in() {
    let (root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();
    ui.assign(VAR_NAME, "Home");
    assert_eq!(ui.display("greeting.html").unwrap(), "built-in Home");

    let theme = root.path().join("theme");
    fs::create_dir_all(&theme).unwrap();
    fs::write(theme.join("greeting.html"), "themed {{ name }}").unwrap();

    ui.add_template_dir(&theme, Some("theme")).unwrap();
    let keys: Vec<String> = ui.template_dirs().into_keys().collect();
    assert_eq!(keys, ["theme", "app", "BootstrapUi"]);
    assert_eq!(ui.display("greeting.html").unwrap(), "themed Home");
}

#[test]
#[serial]
fn test_add_template_dir_replaces_app_in_place() {
    let (root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();

    let other = root.path().join("other");
    fs::create_dir_all(&other).unwrap();
    ui.add_template_dir(&other, None).unwrap();

    let dirs = ui.template_dirs();
    let (key, path) = dirs.get_index(0).unwrap();
    assert_eq!(key, "app");
    assert_eq!(path, &other);
    assert_eq!(dirs.len(), 2);
}

#[test]
#[serial]
fn test_add_template_dir_rejects_missing_dir() {
    let (root, config) = fixture();
    let mut ui = BootstrapUi::new(config).unwrap();
    let before = ui.template_dirs();

    let missing = root.path().join("nope");
    let err = ui.add_template_dir(missing, Some("x")).unwrap_err();
    assert!(matches!(err, BootstrapUiError::MissingFiles { .. }));
    assert_eq!(ui.template_dirs(), before);
}

#[test]
#[serial]
fn test_assign_html_is_not_escaped() {
    let (root, config) = fixture();
    fs::write(
        root.path().join("app-templates/body.html"),
        "{{ raw }}|{{ text }}",
    )
    .unwrap();
    let mut ui = BootstrapUi::new(config).unwrap();

    ui.assign_html("raw", "<b>bold</b>");
    ui.assign("text", "<b>bold</b>");
    assert_eq!(
        ui.display("body.html").unwrap(),
        "<b>bold</b>|&lt;b&gt;bold&lt;&#x2f;b&gt;"
    );
}

#[test]
#[serial]
fn test_load_config_file() {
    let (root, config) = fixture();
    fs::write(
        root.path().join("app-configs/site.toml"),
        "title = \"Reports\"\n\n[owner]\nname = \"Ops\"\n",
    )
    .unwrap();
    fs::write(
        root.path().join("app-templates/site.html"),
        "{{ title }}/{{ owner.name }}",
    )
    .unwrap();
    let mut ui = BootstrapUi::new(config).unwrap();

    ui.load_config_file("site.toml").unwrap();
    assert_eq!(ui.display("site.html").unwrap(), "Reports/Ops");

    assert!(matches!(
        ui.load_config_file("absent.toml"),
        Err(TemplateError::ConfigNotFound(_))
    ));
}

#[test]
#[serial]
fn test_built_in_page() {
    let scratch = TempDir::new().unwrap();
    let config = BootstrapUiConfig::new()
        .with_compile_dir(scratch.path().join("templates_c"))
        .with_cache_dir(scratch.path().join("cache"))
        .with_request_path("/forms/sign-up.php");
    let mut ui = BootstrapUi::new(config).unwrap();

    ui.load_config_file("bootstrap-ui.toml").unwrap();
    assert_eq!(var(&ui, "bootstrap_version").as_deref(), Some("3.3.7"));

    let link = r#"Read <a href="/help">the help</a>"#;
    ui.add_message("Welcome", link, MessageLevel::Warning);
    ui.enable(MODULE_DATEPICKER).unwrap();

    let html = ui.display_page().unwrap();
    assert!(html.contains("<h1>Sign Up</h1>"));
    let base_css = r#"href="http://localhost/css/bootstrap-ui.css""#;
    assert!(html.contains(base_css));
    assert!(html.contains("alert alert-warning"));
    assert!(html.contains("bootstrap-datepicker.min.js"));
    assert!(html.contains(".datepicker("));
}

#[test]
#[serial]
fn test_secure_site_urls() {
    let (_root, mut config) = fixture();
    config.site.secure = true;
    config.site.server_name = "example.com".to_string();
    config.site.ui_path = "/ui/".to_string();
    let mut ui = BootstrapUi::new(config).unwrap();

    assert_eq!(ui.base_url(), "https://example.com/ui");
    ui.enable(MODULE_COLORPICKER).unwrap();
    let scripts = ui.scripts(None);
    let vendor = "https://example.com/ui/vendor/bower-asset/";
    assert!(scripts[MODULE_COLORPICKER].starts_with(vendor));
}
