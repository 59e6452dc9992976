//! Ansible provisioner configuration.
//!
//! A [`ProvisionerConfig`] starts out as whatever the user declared, with
//! unset settings left as `None`. [`ProvisionerConfig::finalize`] fills in the
//! defaults and coerces loose shapes into canonical ones; after that the
//! config is treated as read-only and can be validated against any number of
//! machines.
//!
//! ## Lifecycle
//!
//! 1. **Deserialize** from a manifest (or build programmatically)
//! 2. [`finalize()`](ProvisionerConfig::finalize) once
//! 3. [`validate()`](crate::validation::validate) per machine

pub mod value;

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use tracing::debug;

pub use value::{ExtraVars, RawArguments, StrictBool};

/// Default command used to install Galaxy roles.
///
/// `%{role_file}` and `%{roles_path}` are substituted by the caller that
/// builds the command line.
pub const DEFAULT_GALAXY_COMMAND: &str =
    "ansible-galaxy install --role-file=%{role_file} --roles-path=%{roles_path} --force";

/// Settings shared by the remote and local Ansible provisioners.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionerConfig {
    /// Extra variables, inline or from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_vars: Option<ExtraVars>,

    /// Command template used to install Galaxy roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub galaxy_command: Option<String>,

    /// Galaxy role requirements file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub galaxy_role_file: Option<Utf8PathBuf>,

    /// Directory Galaxy roles are installed into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub galaxy_roles_path: Option<Utf8PathBuf>,

    /// Inventory groups and their member hosts.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,

    /// Per-host inventory variables.
    #[serde(default)]
    pub host_vars: BTreeMap<String, Mapping>,

    /// Static inventory file or directory on the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_path: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Playbook to run. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook: Option<Utf8PathBuf>,

    /// Arguments appended verbatim to the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_arguments: Option<RawArguments>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at_task: Option<String>,

    /// Whether to escalate privileges on the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo: Option<StrictBool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_password_file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl ProvisionerConfig {
    /// Creates an empty config with every setting unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty config that runs the given playbook.
    pub fn with_playbook(playbook: impl Into<Utf8PathBuf>) -> Self {
        Self {
            playbook: Some(playbook.into()),
            ..Self::default()
        }
    }

    /// Applies defaults to unset settings and canonicalizes loose ones.
    ///
    /// Explicitly set values are never replaced, which makes this safe to
    /// call more than once. A `raw_arguments` string is split on whitespace.
    pub fn finalize(&mut self) {
        if self.galaxy_command.is_none() {
            self.galaxy_command = Some(DEFAULT_GALAXY_COMMAND.to_string());
        }
        if self.sudo.is_none() {
            self.sudo = Some(StrictBool::Bool(false));
        }
        if self.verbose.is_none() {
            self.verbose = Some(false);
        }
        if let Some(RawArguments::Line(_)) = self.raw_arguments {
            self.raw_arguments = self.raw_arguments.take().map(RawArguments::into_list);
            debug!("split raw_arguments into {:?}", self.raw_arguments);
        }
    }

    /// Consumes the config and returns its finalized form.
    pub fn finalized(mut self) -> Self {
        self.finalize();
        self
    }

    /// Returns the Galaxy command template.
    pub fn galaxy_command(&self) -> &str {
        self.galaxy_command.as_deref().unwrap_or(DEFAULT_GALAXY_COMMAND)
    }

    /// Returns the playbook path, if set.
    pub fn playbook(&self) -> Option<&Utf8Path> {
        self.playbook.as_deref()
    }

    /// Returns true only when `sudo` is the literal `true`.
    pub fn sudo_enabled(&self) -> bool {
        self.sudo.as_ref().and_then(StrictBool::as_bool).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    /// Returns the raw arguments once they are in list form.
    pub fn raw_argument_list(&self) -> &[String] {
        self.raw_arguments
            .as_ref()
            .and_then(RawArguments::as_list)
            .unwrap_or_default()
    }
}
