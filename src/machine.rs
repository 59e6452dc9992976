//! Machine contexts used for path existence checks.
//!
//! The validator never touches the filesystem directly. It asks a
//! [`Machine`] whether a path exists on either the host or the guest.

use std::fs;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tracing::trace;

use crate::error::ProvisionerError;
use crate::variant::Filesystem;

/// Default working directory for guest-relative paths.
pub const DEFAULT_GUEST_WORKDIR: &str = "/vagrant";

/// Capability to test path existence on a machine.
pub trait Machine {
    /// Returns whether `path` exists on the given filesystem.
    ///
    /// `Ok(false)` means the path is definitely absent. Any failure to find
    /// out is returned as an error.
    fn path_exists(
        &self,
        filesystem: Filesystem,
        path: &Utf8Path,
    ) -> Result<bool, ProvisionerError>;
}

/// Guest filesystem reachable from the host as a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestFilesystem {
    /// Host directory holding the guest's `/`.
    pub root: Utf8PathBuf,
    /// Guest directory relative paths are resolved against.
    pub workdir: Utf8PathBuf,
}

impl GuestFilesystem {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            workdir: Utf8PathBuf::from(DEFAULT_GUEST_WORKDIR),
        }
    }

    pub fn with_workdir(mut self, workdir: impl Into<Utf8PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Maps a guest path to its location on the host.
    ///
    /// `..` components are resolved lexically and never climb above the
    /// guest root.
    pub fn host_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        let guest_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        };

        let mut parts: Vec<&str> = Vec::new();
        for component in guest_path.components() {
            match component {
                Utf8Component::Normal(part) => parts.push(part),
                Utf8Component::ParentDir => {
                    parts.pop();
                }
                Utf8Component::RootDir | Utf8Component::CurDir | Utf8Component::Prefix(_) => {}
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        resolved
    }
}

/// A machine whose host and guest filesystems are both local directories.
///
/// Host-relative paths resolve against `root` (the project directory).
/// Guest paths resolve inside `guest`, if one was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMachine {
    root: Utf8PathBuf,
    guest: Option<GuestFilesystem>,
}

impl LocalMachine {
    /// Creates a machine with only the host filesystem available.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            guest: None,
        }
    }

    pub fn with_guest(mut self, guest: GuestFilesystem) -> Self {
        self.guest = Some(guest);
        self
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn guest(&self) -> Option<&GuestFilesystem> {
        self.guest.as_ref()
    }

    fn resolve(
        &self,
        filesystem: Filesystem,
        path: &Utf8Path,
    ) -> Result<Utf8PathBuf, ProvisionerError> {
        match filesystem {
            Filesystem::Host if path.is_absolute() => Ok(path.to_path_buf()),
            Filesystem::Host => Ok(self.root.join(path)),
            Filesystem::Guest => match &self.guest {
                Some(guest) => Ok(guest.host_path(path)),
                None => Err(ProvisionerError::Guest(format!(
                    "cannot check '{}': guest filesystem is not available",
                    path
                ))),
            },
        }
    }
}

impl Machine for LocalMachine {
    fn path_exists(
        &self,
        filesystem: Filesystem,
        path: &Utf8Path,
    ) -> Result<bool, ProvisionerError> {
        let resolved = self.resolve(filesystem, path)?;
        trace!("checking {} path {} at {}", filesystem, path, resolved);

        // Guest symlinks may point at absolute guest paths, so they are not followed.
        let metadata = match filesystem {
            Filesystem::Host => fs::metadata(&resolved),
            Filesystem::Guest => fs::symlink_metadata(&resolved),
        };

        match metadata {
            Ok(_) => Ok(true),
            Err(e)
                if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) =>
            {
                Ok(false)
            }
            Err(e) => Err(ProvisionerError::io(
                format!("failed to inspect {} path: {}", filesystem, resolved),
                e,
            )),
        }
    }
}
