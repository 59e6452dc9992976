//! Tests for shell completion functionality.

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};

use ansible_provisioner::cli::{Cli, Commands};

/// Test parsing the completions command for all supported shells.
#[test]
fn test_completions_command_parsing() -> Result<()> {
    let shells = [
        ("bash", Shell::Bash),
        ("zsh", Shell::Zsh),
        ("fish", Shell::Fish),
        ("powershell", Shell::PowerShell),
        ("elvish", Shell::Elvish),
    ];

    for (shell_str, expected_shell) in shells {
        let args = Cli::parse_from(["ansible-provisioner", "completions", shell_str]);
        match args.command {
            Commands::Completions(opts) => {
                assert_eq!(opts.shell, expected_shell, "Mismatched shell for '{}'", shell_str);
            }
            _ => panic!("Expected Completions command for shell '{}'", shell_str),
        }
    }

    Ok(())
}

/// Test that completion generation produces output for every supported shell.
#[test]
fn test_completions_generation() -> Result<()> {
    let mut cmd = Cli::command();
    let mut buffer = Vec::new();

    for shell in Shell::value_variants() {
        buffer.clear();
        generate(*shell, &mut cmd, "ansible-provisioner", &mut buffer);
        assert!(!buffer.is_empty(), "Generated completion for {:?} was empty", shell);
    }

    Ok(())
}

/// Test that completions mention every subcommand.
#[test]
fn test_completion_contents() -> Result<()> {
    let mut cmd = Cli::command();

    for shell in [Shell::Bash, Shell::Fish] {
        let mut buffer = Vec::new();
        generate(shell, &mut cmd, "ansible-provisioner", &mut buffer);
        let output = String::from_utf8(buffer)?;

        for pattern in ["validate", "finalize", "completions"] {
            assert!(
                output.contains(pattern),
                "Pattern '{}' not found in {:?} completions",
                pattern,
                shell
            );
        }
    }

    Ok(())
}

#[test]
fn test_completions_invalid_shell() {
    let result = Cli::try_parse_from(["ansible-provisioner", "completions", "invalid-shell"]);
    assert!(result.is_err());
}
