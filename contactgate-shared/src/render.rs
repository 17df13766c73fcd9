/// HTML views
///
/// Templates are compiled into the binary and registered once when the
/// [`Renderer`] is built. Every `{{value}}` is HTML-escaped by Handlebars.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::contacts::{ContactRow, GroupedContacts};

const HEAD: &str = include_str!("../templates/layout_head.hbs");
const LOGIN: &str = include_str!("../templates/login.hbs");
const REGISTER: &str = include_str!("../templates/register.hbs");
const CONTACTS: &str = include_str!("../templates/contacts.hbs");
const EXPORT: &str = include_str!("../templates/export.hbs");

/// Error type for view rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

#[derive(Serialize)]
struct ContactsView<'a> {
    username: &'a str,
    total: usize,
    groups: &'a GroupedContacts,
}

#[derive(Serialize)]
struct ExportView<'a> {
    contacts: &'a [ContactRow],
}

/// Compiled template registry
///
/// Cheap to share behind an `Arc`; rendering takes `&self`.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

impl Renderer {
    /// Compiles every view
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();

        registry.register_partial("head", HEAD).map_err(Box::new)?;
        for (name, source) in [
            ("login", LOGIN),
            ("register", REGISTER),
            ("contacts", CONTACTS),
            ("export", EXPORT),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    /// Login form
    pub fn login_page(&self) -> Result<String, RenderError> {
        Ok(self.registry.render("login", &json!({}))?)
    }

    /// Registration form
    pub fn register_page(&self) -> Result<String, RenderError> {
        Ok(self.registry.render("register", &json!({}))?)
    }

    /// Grouped contact tables for `username`
    pub fn contacts_page(&self, username: &str, groups: &GroupedContacts) -> Result<String, RenderError> {
        let view = ContactsView {
            username,
            total: groups.total_rows(),
            groups,
        };
        Ok(self.registry.render("contacts", &view)?)
    }

    /// Standalone flat table written by the export tool
    pub fn export_page(&self, contacts: &[ContactRow]) -> Result<String, RenderError> {
        Ok(self.registry.render("export", &ExportView { contacts })?)
    }
}
