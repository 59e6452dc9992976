//! Validation of finalized provisioner configs.
//!
//! [`validate`] runs every check and collects problems as [`Diagnostic`]s
//! instead of failing on the first one. Each diagnostic is a message kind
//! plus the values to interpolate into it; turning that into text is left to
//! a [`MessageCatalog`](crate::catalog::MessageCatalog).

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use tracing::{debug, warn};

use crate::error::ProvisionerError;
use crate::machine::Machine;
use crate::provisioner::value::{render_value, type_name};
use crate::provisioner::{ExtraVars, ProvisionerConfig, RawArguments, StrictBool};
use crate::variant::{Filesystem, Variant};

/// Diagnostics grouped by provisioner label, in check order.
pub type Diagnostics = BTreeMap<String, Vec<Diagnostic>>;

/// Kind of problem found in a provisioner config.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    NoPlaybook,
    PlaybookPathInvalid,
    ExtraVarsInvalid,
    RawArgumentsInvalid,
    InventoryPathInvalid,
    StrictBoolean,
    VaultPasswordFileInvalid,
    GalaxyRoleFileInvalid,
}

/// A single validation finding: what went wrong and the values describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub payload: BTreeMap<&'static str, String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            kind,
            payload: BTreeMap::new(),
        }
    }

    /// Adds an interpolation value.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.payload.insert(key, value.into());
        self
    }

    /// Returns an interpolation value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.payload.get(key).map(String::as_str)
    }

    fn type_mismatch(kind: DiagnosticKind, value: &serde_yaml::Value) -> Self {
        Self::new(kind)
            .with("type", type_name(value))
            .with("value", render_value(value))
    }

    fn missing_path(kind: DiagnosticKind, filesystem: Filesystem, path: &Utf8Path) -> Self {
        Self::new(kind)
            .with("path", path.as_str())
            .with("filesystem", filesystem.to_string())
    }
}

/// How to treat guest-side paths that do not exist.
///
/// A guest path may legitimately appear later, e.g. when it is created by a
/// synced folder at boot. `Error` reports it like a host path, `Warn` only
/// logs it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GuestPathPolicy {
    #[default]
    Error,
    Warn,
}

/// Validates a finalized config for one variant against one machine.
///
/// Returns exactly one label entry, possibly with an empty list. Only
/// failures of the machine's filesystem checks are returned as errors.
pub fn validate(
    config: &ProvisionerConfig,
    machine: &dyn Machine,
    variant: Variant,
    policy: GuestPathPolicy,
) -> Result<Diagnostics, ProvisionerError> {
    let mut validator = Validator {
        machine,
        variant,
        policy,
        found: Vec::new(),
    };

    validator.check_playbook(config)?;
    validator.check_extra_vars(config)?;
    validator.check_raw_arguments(config);
    validator.check_inventory_path(config)?;
    validator.check_sudo(config);
    validator.check_vault_password_file(config)?;
    validator.check_galaxy_role_file(config)?;

    let label = variant.label();
    debug!("{}: {} diagnostic(s)", label, validator.found.len());

    let mut diagnostics = Diagnostics::new();
    diagnostics.insert(label, validator.found);
    Ok(diagnostics)
}

/// Merges `other` into `into`, appending lists that share a label.
pub fn merge(into: &mut Diagnostics, other: Diagnostics) {
    for (label, found) in other {
        into.entry(label).or_default().extend(found);
    }
}

/// Counts all diagnostics across labels.
pub fn count(diagnostics: &Diagnostics) -> usize {
    diagnostics.values().map(Vec::len).sum()
}

struct Validator<'a> {
    machine: &'a dyn Machine,
    variant: Variant,
    policy: GuestPathPolicy,
    found: Vec<Diagnostic>,
}

impl Validator<'_> {
    fn exists(&self, filesystem: Filesystem, path: &Utf8Path) -> Result<bool, ProvisionerError> {
        self.machine.path_exists(filesystem, path)
    }

    /// Records a missing path, honoring the guest path policy.
    fn report_missing(&mut self, filesystem: Filesystem, diagnostic: Diagnostic) {
        if filesystem == Filesystem::Guest && self.policy == GuestPathPolicy::Warn {
            warn!(
                kind = %diagnostic.kind,
                path = diagnostic.get("path").or(diagnostic.get("value")).unwrap_or_default(),
                "{}: guest path does not exist yet",
                self.variant.label(),
            );
            return;
        }
        self.found.push(diagnostic);
    }

    /// Checks an optional path on the variant's filesystem.
    fn check_variant_path(
        &mut self,
        path: Option<&Utf8Path>,
        kind: DiagnosticKind,
    ) -> Result<(), ProvisionerError> {
        let Some(path) = path else {
            return Ok(());
        };
        let filesystem = self.variant.filesystem();
        if !self.exists(filesystem, path)? {
            self.report_missing(filesystem, Diagnostic::missing_path(kind, filesystem, path));
        }
        Ok(())
    }

    fn check_playbook(&mut self, config: &ProvisionerConfig) -> Result<(), ProvisionerError> {
        match config.playbook() {
            None => {
                self.found.push(Diagnostic::new(DiagnosticKind::NoPlaybook));
                Ok(())
            }
            Some(playbook) => {
                self.check_variant_path(Some(playbook), DiagnosticKind::PlaybookPathInvalid)
            }
        }
    }

    fn check_extra_vars(&mut self, config: &ProvisionerConfig) -> Result<(), ProvisionerError> {
        match &config.extra_vars {
            None | Some(ExtraVars::Inline(_)) => {}
            Some(extra_vars @ ExtraVars::File(path)) => {
                let filesystem = self.variant.filesystem();
                if !self.exists(filesystem, path)? {
                    let diagnostic = Diagnostic::type_mismatch(
                        DiagnosticKind::ExtraVarsInvalid,
                        &extra_vars.to_value(),
                    );
                    self.report_missing(filesystem, diagnostic);
                }
            }
            Some(ExtraVars::Invalid(value)) => {
                self.found
                    .push(Diagnostic::type_mismatch(DiagnosticKind::ExtraVarsInvalid, value));
            }
        }
        Ok(())
    }

    fn check_raw_arguments(&mut self, config: &ProvisionerConfig) {
        match &config.raw_arguments {
            None | Some(RawArguments::List(_)) => {}
            // Only reachable when validating a config that was never finalized.
            Some(RawArguments::Line(_)) => {}
            Some(RawArguments::Invalid(value)) => {
                self.found
                    .push(Diagnostic::type_mismatch(DiagnosticKind::RawArgumentsInvalid, value));
            }
        }
    }

    fn check_inventory_path(&mut self, config: &ProvisionerConfig) -> Result<(), ProvisionerError> {
        let Some(inventory) = config.inventory_path.as_deref() else {
            return Ok(());
        };
        // The inventory is always read on the host.
        if !self.exists(Filesystem::Host, inventory)? {
            self.found.push(Diagnostic::missing_path(
                DiagnosticKind::InventoryPathInvalid,
                Filesystem::Host,
                inventory,
            ));
        }
        Ok(())
    }

    fn check_sudo(&mut self, config: &ProvisionerConfig) {
        if let Some(StrictBool::Invalid(value)) = &config.sudo {
            self.found.push(
                Diagnostic::type_mismatch(DiagnosticKind::StrictBoolean, value)
                    .with("attribute", "sudo"),
            );
        }
    }

    fn check_vault_password_file(
        &mut self,
        config: &ProvisionerConfig,
    ) -> Result<(), ProvisionerError> {
        self.check_variant_path(
            config.vault_password_file.as_deref(),
            DiagnosticKind::VaultPasswordFileInvalid,
        )
    }

    fn check_galaxy_role_file(
        &mut self,
        config: &ProvisionerConfig,
    ) -> Result<(), ProvisionerError> {
        self.check_variant_path(
            config.galaxy_role_file.as_deref(),
            DiagnosticKind::GalaxyRoleFileInvalid,
        )
    }
}
