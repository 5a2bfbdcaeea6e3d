//! Third-party widget bundles that can be enabled on a page
//!
//! Each [`UiModule`] names a fixed set of registry additions: one stylesheet,
//! its scripts (prerequisites first) and an optional initialization snippet.
//! Asset paths are relative to the vendor asset root of the page.

use std::fmt;
use std::str::FromStr;

/// Identifier of the datepicker module
pub const MODULE_DATEPICKER: &str = "eternicode/bootstrap-datepicker";

/// Identifier of the colorpicker module
pub const MODULE_COLORPICKER: &str = "mjolnic/bootstrap-colorpicker";

/// Identifier of the sortable tables module
pub const MODULE_SORTABLE: &str = "drvic10k/bootstrap-sortable";

/// Supported widget bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiModule {
    /// `eternicode/bootstrap-datepicker`
    Datepicker,
    /// `mjolnic/bootstrap-colorpicker`
    Colorpicker,
    /// `drvic10k/bootstrap-sortable`
    Sortable,
}

/// Script loaded by a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleScript {
    /// Path below the vendor asset root
    pub path: &'static str,
    /// Whether this is a library the module depends on rather than the module itself
    pub prerequisite: bool,
}

/// Registry additions performed when a module is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Stylesheet path below the vendor asset root
    pub stylesheet: &'static str,
    /// Scripts in load order
    pub scripts: &'static [ModuleScript],
    /// Initialization snippet run after the scripts load
    pub snippet: Option<&'static str>,
}

const DATEPICKER: ModuleDescriptor = ModuleDescriptor {
    stylesheet: "bower-asset/bootstrap-datepicker/dist/css/bootstrap-datepicker.min.css",
    scripts: &[ModuleScript {
        path: "bower-asset/bootstrap-datepicker/dist/js/bootstrap-datepicker.min.js",
        prerequisite: false,
    }],
    snippet: Some(
        "$('.input-group.date').datepicker({\n\
         \torientation: 'top auto',\n\
         \tautoclose: true,\n\
         \ttodayHighlight: true\n\
         });",
    ),
};

const COLORPICKER: ModuleDescriptor = ModuleDescriptor {
    stylesheet:
        "bower-asset/xaguilars-bootstrap-colorpicker/dist/css/bootstrap-colorpicker.min.css",
    scripts: &[ModuleScript {
        path: "bower-asset/xaguilars-bootstrap-colorpicker/dist/js/bootstrap-colorpicker.min.js",
        prerequisite: false,
    }],
    snippet: Some("$('.input-group.color').colorpicker();"),
};

const SORTABLE: ModuleDescriptor = ModuleDescriptor {
    stylesheet: "bower-asset/bootstrap-sortable/Contents/bootstrap-sortable.css",
    scripts: &[
        ModuleScript {
            path: "bower-asset/moment/min/moment.min.js",
            prerequisite: true,
        },
        ModuleScript {
            path: "bower-asset/bootstrap-sortable/Scripts/bootstrap-sortable.js",
            prerequisite: false,
        },
    ],
    snippet: None,
};

impl UiModule {
    /// Every supported module
    pub const ALL: [Self; 3] = [Self::Datepicker, Self::Colorpicker, Self::Sortable];

    /// Identifier accepted by [`BootstrapUi::enable`](crate::ui::BootstrapUi::enable)
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Datepicker => MODULE_DATEPICKER,
            Self::Colorpicker => MODULE_COLORPICKER,
            Self::Sortable => MODULE_SORTABLE,
        }
    }

    /// Look up a module by identifier
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|module| module.identifier() == identifier)
    }

    /// Registry additions for this module
    #[must_use]
    pub const fn descriptor(self) -> &'static ModuleDescriptor {
        match self {
            Self::Datepicker => &DATEPICKER,
            Self::Colorpicker => &COLORPICKER,
            Self::Sortable => &SORTABLE,
        }
    }

    /// Registry key for one of this module's scripts
    #[must_use]
    pub fn script_key(self, script: &ModuleScript) -> String {
        if script.prerequisite {
            format!("required by {}", self.identifier())
        } else {
            self.identifier().to_string()
        }
    }
}

impl fmt::Display for UiModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error returned when parsing an unknown module identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown UI module: {0}")]
pub struct UnknownModule(pub String);

impl FromStr for UiModule {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s).ok_or_else(|| UnknownModule(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for module in UiModule::ALL {
            assert_eq!(module.identifier().parse::<UiModule>(), Ok(module));
        }
        assert_eq!(
            "twbs/bootstrap".parse::<UiModule>(),
            Err(UnknownModule("twbs/bootstrap".to_string()))
        );
    }

    #[test]
    fn test_sortable_loads_moment_first() {
        let descriptor = UiModule::Sortable.descriptor();
        assert_eq!(descriptor.scripts.len(), 2);
        assert!(descriptor.scripts[0].prerequisite);
        assert!(descriptor.scripts[0].path.contains("moment"));
        assert!(descriptor.snippet.is_none());
        assert_eq!(
            UiModule::Sortable.script_key(&descriptor.scripts[0]),
            "required by drvic10k/bootstrap-sortable"
        );
        assert_eq!(
            UiModule::Sortable.script_key(&descriptor.scripts[1]),
            MODULE_SORTABLE
        );
    }

    #[test]
    fn test_pickers_have_snippets() {
        assert!(UiModule::Datepicker
            .descriptor()
            .snippet
            .is_some_and(|s| s.contains(".input-group.date")));
        assert!(UiModule::Colorpicker
            .descriptor()
            .snippet
            .is_some_and(|s| s.contains(".input-group.color")));
    }
}
