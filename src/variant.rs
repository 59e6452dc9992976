//! Provisioner variants.
//!
//! The same rule set serves both ways of running Ansible. The variant only
//! decides which filesystem path checks look at and how diagnostics are
//! labelled.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Filesystem a path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Filesystem {
    /// The machine running the provisioner.
    Host,
    /// The machine being provisioned.
    Guest,
}

/// Where the external tool is invoked from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Ansible runs on the host against the guest over the network.
    Remote,
    /// Ansible runs inside the guest.
    Local,
}

impl Variant {
    /// Returns the label diagnostics for this variant are reported under.
    pub fn label(&self) -> String {
        format!("ansible {} provisioner", self)
    }

    /// Returns the filesystem that playbook and vars paths resolve against.
    pub fn filesystem(&self) -> Filesystem {
        match self {
            Self::Remote => Filesystem::Host,
            Self::Local => Filesystem::Guest,
        }
    }
}
