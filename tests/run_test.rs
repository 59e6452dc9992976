mod helpers;

use ansible_provisioner::cli::{self, CommonArgs, FinalizeArgs, ValidateArgs};
use ansible_provisioner::{ProvisionerError, run_finalize, run_validate};

fn common(file: camino::Utf8PathBuf) -> CommonArgs {
    CommonArgs {
        file,
        log_level: cli::LogLevel::Error,
    }
}

#[test]
fn run_validate_succeeds_on_valid_manifest() {
    let (_guard, dir) = helpers::utf8_tempdir();
    helpers::write_file(&dir.join("site.yml"), "- hosts: all\n");
    helpers::write_file(&dir.join("inventory"), "default\n");
    helpers::write_file(&dir.join("rootfs/vagrant/site.yml"), "- hosts: localhost\n");
    helpers::write_file(
        &dir.join("provisioners.yml"),
        concat!(
            "guest_root: rootfs\n",
            "provisioners:\n",
            "- type: remote\n",
            "  playbook: site.yml\n",
            "  inventory_path: inventory\n",
            "- type: local\n",
            "  playbook: site.yml\n",
        ),
    );

    let opts = ValidateArgs {
        common: common(dir.join("provisioners.yml")),
    };
    run_validate(&opts).expect("run_validate should succeed");
}

#[test]
fn run_validate_fails_when_diagnostics_are_reported() {
    let (_guard, dir) = helpers::utf8_tempdir();
    helpers::write_file(&dir.join("provisioners.yml"), "provisioners:\n- type: remote\n");

    let opts = ValidateArgs {
        common: common(dir.join("provisioners.yml")),
    };
    let err = run_validate(&opts).expect_err("missing playbook should fail validation");
    assert!(matches!(
        err.downcast_ref::<ProvisionerError>(),
        Some(ProvisionerError::Validation(_))
    ));
    assert!(err.to_string().contains("1 diagnostic(s)"), "got: {}", err);
}

#[test]
fn run_validate_reports_missing_manifest() {
    let (_guard, dir) = helpers::utf8_tempdir();
    let opts = ValidateArgs {
        common: common(dir.join("missing.yml")),
    };
    let err = run_validate(&opts).expect_err("missing manifest should fail");
    assert!(format!("{:#}", err).contains("failed to load manifest"), "got: {:#}", err);
}

#[test]
fn run_finalize_prints_finalized_declarations() {
    let (_guard, dir) = helpers::utf8_tempdir();
    helpers::write_file(
        &dir.join("provisioners.yml"),
        "provisioners:\n- type: remote\n  playbook: site.yml\n  raw_arguments: --diff --check\n",
    );

    let opts = FinalizeArgs {
        common: common(dir.join("provisioners.yml")),
    };
    let mut out = Vec::new();
    run_finalize(&opts, &mut out).expect("run_finalize should succeed");

    let output = String::from_utf8(out).expect("output should be UTF-8");
    assert!(output.contains("type: remote"), "got: {}", output);
    assert!(output.contains("sudo: false"), "got: {}", output);
    assert!(output.contains("- --diff"), "got: {}", output);
    assert!(output.contains("- --check"), "got: {}", output);
    assert!(output.contains("ansible-galaxy install"), "got: {}", output);
}
