//! Manifest loading.
//!
//! A manifest is a YAML file listing provisioner declarations together with
//! the machine context they are validated against.

use std::fs::File;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::error::ProvisionerError;
use crate::machine::{DEFAULT_GUEST_WORKDIR, GuestFilesystem, LocalMachine};
use crate::provisioner::ProvisionerConfig;
use crate::validation::{self, Diagnostics, GuestPathPolicy};
use crate::variant::Variant;

/// A single provisioner declaration.
///
/// The `type` field in YAML selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Declaration {
    /// Ansible runs on the host.
    Remote(ProvisionerConfig),
    /// Ansible runs inside the guest.
    Local(ProvisionerConfig),
}

// Read through a `Mapping` so YAML tags nested in the config (`!vault`) survive;
// serde's internally tagged representation cannot buffer them.
impl<'de> Deserialize<'de> for Declaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut mapping = Mapping::deserialize(deserializer)?;
        let variant = match mapping.remove("type") {
            Some(value) => Variant::deserialize(value).map_err(de::Error::custom)?,
            None => return Err(de::Error::missing_field("type")),
        };
        let config = ProvisionerConfig::deserialize(Value::Mapping(mapping))
            .map_err(de::Error::custom)?;

        Ok(match variant {
            Variant::Remote => Self::Remote(config),
            Variant::Local => Self::Local(config),
        })
    }
}

impl Declaration {
    pub fn variant(&self) -> Variant {
        match self {
            Self::Remote(_) => Variant::Remote,
            Self::Local(_) => Variant::Local,
        }
    }

    pub fn config(&self) -> &ProvisionerConfig {
        match self {
            Self::Remote(config) | Self::Local(config) => config,
        }
    }

    pub fn config_mut(&mut self) -> &mut ProvisionerConfig {
        match self {
            Self::Remote(config) | Self::Local(config) => config,
        }
    }
}

fn default_guest_workdir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_GUEST_WORKDIR)
}

/// Provisioner declarations and the machine they target.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project directory host-relative paths resolve against.
    ///
    /// Defaults to the directory containing the manifest.
    #[serde(default)]
    pub root: Option<Utf8PathBuf>,

    /// Host directory holding the guest filesystem.
    #[serde(default)]
    pub guest_root: Option<Utf8PathBuf>,

    /// Guest directory guest-relative paths resolve against.
    #[serde(default = "default_guest_workdir")]
    pub guest_workdir: Utf8PathBuf,

    /// Treatment of missing guest-side paths.
    #[serde(default)]
    pub guest_paths: GuestPathPolicy,

    #[serde(default)]
    pub provisioners: Vec<Declaration>,
}

impl Manifest {
    /// Resolves relative `root` and `guest_root` against `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: &Utf8Path) {
        let root = match self.root.take() {
            Some(root) if root.is_relative() => base_dir.join(root),
            Some(root) => root,
            None => base_dir.to_path_buf(),
        };
        self.root = Some(root);

        if let Some(ref mut guest_root) = self.guest_root
            && guest_root.is_relative()
        {
            *guest_root = base_dir.join(&*guest_root);
        }
    }

    /// Finalizes every declaration.
    pub fn finalize(&mut self) {
        for declaration in &mut self.provisioners {
            declaration.config_mut().finalize();

            let config = declaration.config();
            debug!(
                "finalized {} provisioner: playbook={:?}, sudo={}, verbose={}, raw_arguments={:?}",
                declaration.variant(),
                config.playbook(),
                config.sudo_enabled(),
                config.verbose(),
                config.raw_argument_list(),
            );
        }
    }

    /// Builds the machine context described by this manifest.
    pub fn machine(&self) -> LocalMachine {
        let root = self.root.clone().unwrap_or_else(|| Utf8PathBuf::from("."));
        let machine = LocalMachine::new(root);
        match &self.guest_root {
            Some(guest_root) => machine.with_guest(
                GuestFilesystem::new(guest_root.clone())
                    .with_workdir(self.guest_workdir.clone()),
            ),
            None => machine,
        }
    }

    /// Validates every declaration and merges the results.
    ///
    /// Declarations of the same variant share a label, so their diagnostics
    /// end up in one list in declaration order.
    pub fn validate(&self) -> Result<Diagnostics, ProvisionerError> {
        let machine = self.machine();
        let mut report = Diagnostics::new();
        for (index, declaration) in self.provisioners.iter().enumerate() {
            debug!(
                "validating provisioner {}/{} ({})",
                index + 1,
                self.provisioners.len(),
                declaration.variant()
            );
            let found = validation::validate(
                declaration.config(),
                &machine,
                declaration.variant(),
                self.guest_paths,
            )?;
            validation::merge(&mut report, found);
        }
        Ok(report)
    }
}

/// Loads a manifest and resolves its paths relative to the manifest file.
///
/// Declarations are returned as written; call [`Manifest::finalize`] before
/// validating them.
pub fn load_manifest(path: &Utf8Path) -> Result<Manifest, ProvisionerError> {
    let file = File::open(path).map_err(|e| ProvisionerError::io(path.to_string(), e))?;
    let reader = BufReader::new(file);
    let mut manifest: Manifest = serde_yaml::from_reader(reader)
        .map_err(|e| ProvisionerError::Config(format!("YAML parse error: {}: {}", path, e)))?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    manifest.resolve_paths(&base_dir);

    info!(
        "loaded {} provisioner declaration(s) from {}",
        manifest.provisioners.len(),
        path
    );
    Ok(manifest)
}
