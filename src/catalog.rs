//! Rendering diagnostics to text.
//!
//! Diagnostics only carry a kind and interpolation values. A
//! [`MessageCatalog`] maps them to text; [`EnglishCatalog`] is the one the
//! CLI uses.

use crate::validation::{Diagnostic, DiagnosticKind};

/// Lookup from a diagnostic to a rendered message.
pub trait MessageCatalog {
    /// Returns the message template for a kind, with `%{name}` placeholders.
    fn template(&self, kind: DiagnosticKind) -> &str;

    /// Renders a diagnostic by interpolating its payload into the template.
    fn render(&self, diagnostic: &Diagnostic) -> String {
        interpolate(self.template(diagnostic.kind), diagnostic)
    }
}

/// Replaces `%{name}` placeholders with payload values.
///
/// Placeholders without a payload value are left as they are.
pub fn interpolate(template: &str, diagnostic: &Diagnostic) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match diagnostic.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Built-in English messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn template(&self, kind: DiagnosticKind) -> &str {
        match kind {
            DiagnosticKind::NoPlaybook => "`playbook` must be set.",
            DiagnosticKind::PlaybookPathInvalid => {
                "`playbook` does not exist on the %{filesystem}: %{path}"
            }
            DiagnosticKind::ExtraVarsInvalid => {
                "`extra_vars` must be a mapping or a path to an existing file. \
                Received: %{value} (as %{type})"
            }
            DiagnosticKind::RawArgumentsInvalid => {
                "`raw_arguments` must be a list of strings. Received: %{value} (as %{type})"
            }
            DiagnosticKind::InventoryPathInvalid => {
                "`inventory_path` does not exist on the %{filesystem}: %{path}"
            }
            DiagnosticKind::StrictBoolean => {
                "`%{attribute}` must be a boolean (true or false). Received: %{value} (as %{type})"
            }
            DiagnosticKind::VaultPasswordFileInvalid => {
                "`vault_password_file` does not exist on the %{filesystem}: %{path}"
            }
            DiagnosticKind::GalaxyRoleFileInvalid => {
                "`galaxy_role_file` does not exist on the %{filesystem}: %{path}"
            }
        }
    }
}
