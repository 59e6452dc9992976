use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use ansible_provisioner::ProvisionerError;
use ansible_provisioner::config::{Manifest, load_manifest};
use ansible_provisioner::machine::{GuestFilesystem, LocalMachine};
use ansible_provisioner::variant::{Filesystem, Variant};

/// File that exists on the filesystem a test case resolves paths against.
#[allow(dead_code)]
pub const EXISTING_FILE: &str = "playbook.yml";

/// File that exists nowhere.
#[allow(dead_code)]
pub const NON_EXISTING_FILE: &str = "does_not_exist.yml";

/// Inventory file that exists on the host for every case.
#[allow(dead_code)]
pub const EXISTING_INVENTORY: &str = "inventory";

/// One row of the variant table shared by the validation suites.
#[allow(dead_code)]
pub struct Case {
    pub variant: Variant,
    pub label: &'static str,
    pub filesystem: Filesystem,
}

#[allow(dead_code)]
pub const CASES: &[Case] = &[
    Case {
        variant: Variant::Remote,
        label: "ansible remote provisioner",
        filesystem: Filesystem::Host,
    },
    Case {
        variant: Variant::Local,
        label: "ansible local provisioner",
        filesystem: Filesystem::Guest,
    },
];

/// Creates a temporary directory and returns it with its UTF-8 path.
#[allow(dead_code)]
pub fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .expect("path should be valid UTF-8");
    (temp_dir, path)
}

/// Writes a file, creating parent directories as needed.
#[allow(dead_code)]
pub fn write_file(path: &Utf8Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent directory");
    }
    fs::write(path, content).expect("failed to write file");
}

/// A project directory on the host plus a guest rootfs next to it.
///
/// `EXISTING_FILE` is created on the filesystem of the case being tested,
/// and `EXISTING_INVENTORY` always on the host.
#[allow(dead_code)]
pub struct MachineFixture {
    _project: TempDir,
    _rootfs: TempDir,
    pub project: Utf8PathBuf,
    pub rootfs: Utf8PathBuf,
    pub machine: LocalMachine,
}

#[allow(dead_code)]
pub fn machine_fixture(case: &Case) -> MachineFixture {
    let (project_guard, project) = utf8_tempdir();
    let (rootfs_guard, rootfs) = utf8_tempdir();
    let guest = GuestFilesystem::new(&rootfs);

    let existing = match case.filesystem {
        Filesystem::Host => project.join(EXISTING_FILE),
        Filesystem::Guest => guest.host_path(Utf8Path::new(EXISTING_FILE)),
    };
    write_file(&existing, "- hosts: all\n");
    write_file(&project.join(EXISTING_INVENTORY), "default ansible_host=127.0.0.1\n");

    let machine = LocalMachine::new(&project).with_guest(guest);
    MachineFixture {
        _project: project_guard,
        _rootfs: rootfs_guard,
        project,
        rootfs,
        machine,
    }
}

/// Writes `yaml` to a manifest file in a fresh directory and loads it.
///
/// The directory is returned so that relative paths in the manifest can be
/// populated by the caller.
#[allow(dead_code)]
pub fn load_manifest_from_yaml(yaml: &str) -> Result<(TempDir, Manifest), ProvisionerError> {
    let (guard, dir) = utf8_tempdir();
    let path = dir.join("provisioners.yml");
    write_file(&path, yaml);
    let manifest = load_manifest(&path)?;
    Ok((guard, manifest))
}
