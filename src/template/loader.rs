//! Template loader module.
//!
//! Page templates are compiled into the binary. A template directory may
//! override any of them by providing a file with the same relative path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Result, TemplateEngine, TemplateError};

/// Built-in templates: (name, path relative to the template directory, content).
pub const BUILTIN_TEMPLATES: &[(&str, &str, &str)] = &[
    ("base", "base.html", include_str!("../../templates/base.html")),
    ("index", "posts/index.html", include_str!("../../templates/posts/index.html")),
    (
        "group_list",
        "posts/group_list.html",
        include_str!("../../templates/posts/group_list.html"),
    ),
    ("profile", "posts/profile.html", include_str!("../../templates/posts/profile.html")),
    (
        "post_detail",
        "posts/post_detail.html",
        include_str!("../../templates/posts/post_detail.html"),
    ),
    (
        "create_post",
        "posts/create_post.html",
        include_str!("../../templates/posts/create_post.html"),
    ),
    ("login", "users/login.html", include_str!("../../templates/users/login.html")),
    ("error", "core/error.html", include_str!("../../templates/core/error.html")),
    (
        "post_card",
        "includes/post_card.html",
        include_str!("../../templates/includes/post_card.html"),
    ),
    (
        "paginator",
        "includes/paginator.html",
        include_str!("../../templates/includes/paginator.html"),
    ),
];

/// Builds a [`TemplateEngine`] from the built-in templates and overrides.
#[derive(Debug)]
pub struct TemplateLoader {
    /// Directory searched for overrides.
    base_path: Option<PathBuf>,
}

impl TemplateLoader {
    /// Loader using only the built-in templates.
    pub fn builtin() -> Self {
        Self { base_path: None }
    }

    /// Loader that prefers files under `base_path`.
    ///
    /// A missing directory is not an error; the built-in templates are used.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: Some(base_path.as_ref().to_path_buf()),
        }
    }

    /// Get the override directory.
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    /// Read the source of a template, preferring an override file.
    fn source(&self, name: &str, relative_path: &str, builtin: &str) -> Result<String> {
        if let Some(base) = &self.base_path {
            let path = base.join(relative_path);
            if path.is_file() {
                debug!("Template '{}' overridden by {:?}", name, path);
                return fs::read_to_string(&path).map_err(|e| {
                    TemplateError::Render(format!("Failed to read template '{name}': {e}"))
                });
            }
        }
        Ok(builtin.to_string())
    }

    /// Parse every template into a new engine.
    pub fn load(&self) -> Result<TemplateEngine> {
        let mut engine = TemplateEngine::new();
        for (name, relative_path, builtin) in BUILTIN_TEMPLATES {
            let source = self.source(name, relative_path, builtin)?;
            engine.load(*name, &source).map_err(|e| match e {
                TemplateError::Parse(msg) => TemplateError::Parse(format!("{name}: {msg}")),
                other => other,
            })?;
        }
        info!("Loaded {} templates", BUILTIN_TEMPLATES.len());
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateContext;

    #[test]
    fn test_builtin_templates_parse() {
        let engine = TemplateLoader::builtin().load().unwrap();
        for (name, _, _) in BUILTIN_TEMPLATES {
            assert!(engine.has_template(name), "{name}");
        }
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let loader = TemplateLoader::new("/nonexistent/templates");
        let engine = loader.load().unwrap();
        assert!(engine.has_template("index"));
    }

    #[test]
    fn test_override_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("core")).unwrap();
        fs::write(dir.path().join("core/error.html"), "custom {{status}}").unwrap();

        let engine = TemplateLoader::new(dir.path()).load().unwrap();
        let mut context = TemplateContext::new();
        context.set("status", 404_i64);

        assert_eq!(engine.render("error", &context).unwrap(), "custom 404");
    }

    #[test]
    fn test_broken_override_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.html"), "{{#if user}}").unwrap();

        let err = TemplateLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, TemplateError::Parse(ref msg) if msg.starts_with("base:")));
    }
}
