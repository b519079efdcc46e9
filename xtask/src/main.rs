use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the storage glue workspace",
    long_about = "A unified CLI for CI checks, running the bucket bootstrap program,\n\
                  and packaging the event notifier Lambda."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci,
    /// Run the bucket bootstrap program against a bucket
    Bootstrap {
        /// Bucket to create, upload into, and list
        #[arg(long, env = "SAMPLE_BUCKET")]
        bucket: String,
        /// Sample key strategy (timestamp or uuid)
        #[arg(long, default_value = "timestamp")]
        key_strategy: String,
    },
    /// Build and package the event notifier as a Lambda zip
    LambdaPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Directory the zip is written to
        #[arg(long, default_value = "dist")]
        dist_dir: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

type TaskResult = Result<(), String>;

const NOTIFIER_BIN: &str = "event_notifier";

fn banner(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> TaskResult {
    let command_line = format!("cargo {}", args.join(" "));
    eprintln!("+ {command_line}");
    let status = Command::new("cargo")
        .args(args)
        .status()
        .map_err(|error| format!("could not start cargo: {error}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`{command_line}` exited with {status}"))
    }
}

/// Fails early when the Lambda target is missing; skipped when rustup is not
/// on the path.
fn require_target(target: &str) -> TaskResult {
    let output = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            eprintln!("warning: could not query rustup; assuming `{target}` is installed");
            return Ok(());
        }
    };

    let installed = String::from_utf8_lossy(&output.stdout);
    if installed.lines().any(|line| line.trim() == target) {
        Ok(())
    } else {
        Err(format!(
            "rust target `{target}` is not installed; run `rustup target add {target}`"
        ))
    }
}

/// Where the notifier binary is built and where its zip is written.
#[derive(Debug, PartialEq, Eq)]
struct NotifierArtifact {
    binary: PathBuf,
    zip: PathBuf,
}

impl NotifierArtifact {
    fn locate(target: &str, profile: BuildProfile, dist_dir: &Path) -> Self {
        let executable = if target.contains("windows") {
            format!("{NOTIFIER_BIN}.exe")
        } else {
            NOTIFIER_BIN.to_string()
        };
        Self {
            binary: Path::new("target")
                .join(target)
                .join(profile.dir_name())
                .join(executable),
            zip: dist_dir.join(format!("{NOTIFIER_BIN}.zip")),
        }
    }
}

/// The provided.al2023 runtime executes an entry named `bootstrap`.
fn write_bootstrap_zip(binary: &Path, zip_path: &Path) -> ZipResult<()> {
    let mut source = File::open(binary)?;
    let mut zip = ZipWriter::new(File::create(zip_path)?);
    zip.start_file(
        "bootstrap",
        FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755),
    )?;
    io::copy(&mut source, &mut zip)?;
    zip.finish()?;
    Ok(())
}

fn package_notifier_lambda(target: &str, profile: BuildProfile, dist_dir: &Path) -> TaskResult {
    require_target(target)?;

    banner("Build event notifier binary");
    let mut args = vec![
        "build",
        "-p",
        "storage_glue_aws",
        "--bin",
        NOTIFIER_BIN,
        "--target",
        target,
    ];
    args.extend(profile.as_cargo_flag());
    cargo(&args)?;

    banner("Package Lambda zip artifact");
    let artifact = NotifierArtifact::locate(target, profile, dist_dir);
    fs::create_dir_all(dist_dir)
        .map_err(|error| format!("cannot create {}: {error}", dist_dir.display()))?;
    write_bootstrap_zip(&artifact.binary, &artifact.zip).map_err(|error| {
        format!(
            "cannot package {} into {}: {error}",
            artifact.binary.display(),
            artifact.zip.display()
        )
    })?;

    eprintln!("\nPackaged artifact:\n- {}", artifact.zip.display());
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() -> TaskResult {
    banner("Check formatting");
    cargo(&["fmt", "--all", "--", "--check"])?;

    banner("Clippy");
    cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])?;

    for package in ["storage_glue_core", "storage_glue_aws"] {
        banner(&format!("Test {package}"));
        cargo(&["test", "-p", package])?;
    }
    Ok(())
}

// ── main ───────────────────────────────────────────────────────────

fn run(command: Commands) -> TaskResult {
    match command {
        Commands::Ci => ci_check(),
        Commands::Bootstrap {
            bucket,
            key_strategy,
        } => cargo(&[
            "run",
            "-p",
            "storage_glue_aws",
            "--bin",
            "bucket_bootstrap",
            "--",
            "--bucket",
            &bucket,
            "--key-strategy",
            &key_strategy,
        ]),
        Commands::LambdaPackage {
            target,
            profile,
            dist_dir,
        } => package_notifier_lambda(&target, profile, Path::new(&dist_dir)),
    }
}

fn main() {
    if let Err(message) = run(Cli::parse().command) {
        eprintln!("error: {message}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use zip::ZipArchive;

    use super::*;

    #[test]
    fn locates_release_artifact_for_linux_target() {
        let artifact = NotifierArtifact::locate(
            "x86_64-unknown-linux-gnu",
            BuildProfile::Release,
            Path::new("dist"),
        );
        assert_eq!(
            artifact,
            NotifierArtifact {
                binary: PathBuf::from("target/x86_64-unknown-linux-gnu/release/event_notifier"),
                zip: PathBuf::from("dist/event_notifier.zip"),
            }
        );
    }

    #[test]
    fn windows_targets_use_exe_suffix() {
        let artifact =
            NotifierArtifact::locate("x86_64-pc-windows-msvc", BuildProfile::Debug, Path::new("out"));
        assert!(artifact.binary.ends_with("debug/event_notifier.exe"));
    }

    #[test]
    fn zip_holds_executable_bootstrap_entry() {
        let dir = std::env::temp_dir().join(format!("xtask-zip-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let binary = dir.join("event_notifier");
        let zip_path = dir.join("event_notifier.zip");
        fs::write(&binary, b"\x7fELF fake binary").expect("write binary");

        write_bootstrap_zip(&binary, &zip_path).expect("zip should be written");

        let mut archive = ZipArchive::new(File::open(&zip_path).expect("open zip")).expect("read zip");
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_name("bootstrap").expect("bootstrap entry");
        assert_eq!(entry.unix_mode().map(|mode| mode & 0o777), Some(0o755));
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).expect("read entry");
        assert_eq!(contents, b"\x7fELF fake binary");

        drop(entry);
        fs::remove_dir_all(&dir).expect("clean up temp dir");
    }

    #[test]
    fn missing_binary_is_reported_not_panicked() {
        let dir = std::env::temp_dir().join(format!("xtask-missing-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");

        let result = write_bootstrap_zip(&dir.join("absent"), &dir.join("out.zip"));

        assert!(result.is_err());
        fs::remove_dir_all(&dir).expect("clean up temp dir");
    }
}
