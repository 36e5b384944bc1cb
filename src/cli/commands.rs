//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::NamedSource;
use tracing::{info, warn};

use crate::config::Config;
use crate::emit::FileHeader;
use crate::generator::GenerateError;
use crate::jobs::plan_groups;
use crate::loader::{FsLoader, LoadError};
use crate::persist::{FsSink, write_all};
use crate::scheduler::{JobError, Scheduler};
use crate::schema::config_schema;
use crate::version::KMGEN_VERSION;

use super::{CliError, CliResult, ExitCode};

/// Options of the default command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config: PathBuf,
    /// Print artifacts to stdout instead of writing them.
    pub print_only: bool,
    pub routines: usize,
    pub header: bool,
}

/// Directory that configured paths are relative to.
fn config_dir(config: &Path) -> PathBuf {
    match config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Generate every artifact described by the config.
///
/// Configuration and write errors are fatal; a failing group is reported and skipped.
pub fn generate(options: &GenerateOptions) -> CliResult<ExitCode> {
    let config = Config::load(&options.config).map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let root = config_dir(&options.config);

    let header = options.header.then(|| FileHeader::now(KMGEN_VERSION));
    let settings = config
        .generator_settings(header)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    let groups = plan_groups(&config);
    if groups.is_empty() {
        warn!(config = %options.config.display(), "no mappings configured");
        return Ok(ExitCode::SUCCESS);
    }

    let scheduler = Scheduler::new(options.routines, Arc::new(settings), Arc::new(FsLoader::new(&root)))
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let report = scheduler.schedule(groups).collect();
    for error in &report.errors {
        report_job_error(error);
    }

    if options.print_only {
        for artifact in &report.artifacts {
            println!("// {}\n{}", artifact.path, artifact.text());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let written = write_all(&mut FsSink::new(&root), &report.artifacts)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;
    info!(files = written.len(), failed_groups = report.errors.len(), "generation finished");
    Ok(ExitCode::SUCCESS)
}

/// Log a failed group; syntax errors are also rendered with their source snippet.
fn report_job_error(error: &JobError) {
    warn!(dir = %error.dir, error = %error.error, "group skipped");
    if let GenerateError::SourceLoad(LoadError::Syntax {
        path,
        source_text,
        errors,
    }) = &error.error
    {
        for err in errors {
            let report = miette::Report::new(err.clone())
                .with_source_code(NamedSource::new(path.clone(), source_text.clone()));
            eprintln!("{report:?}");
        }
    }
}

/// Print or write the JSON Schema of `km.toml`.
pub fn export_schema(out: Option<&Path>) -> CliResult<ExitCode> {
    let schema = config_schema().map_err(|e| CliError::failure(format!("Error rendering schema: {e}")))?;
    match out {
        Some(path) => {
            fs::write(path, format!("{schema}\n"))
                .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", path.display())))?;
            info!(path = %path.display(), "wrote schema");
        }
        None => println!("{schema}"),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kmgen-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_config_dir() {
        assert_eq!(config_dir(Path::new("km.toml")), PathBuf::from("."));
        assert_eq!(config_dir(Path::new("gen/km.toml")), PathBuf::from("gen"));
    }

    #[test]
    fn test_generate_writes_artifacts_next_to_config() {
        let dir = scratch("generate");
        fs::create_dir_all(dir.join("p")).unwrap();
        fs::write(dir.join("p/p.go"), "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n").unwrap();
        fs::write(dir.join("p/k.go"), "package p\n\ntype K struct {\n\ta int\n\tB string\n}\n").unwrap();
        fs::write(
            dir.join("km.toml"),
            "[settings]\nmodule = \"example.com/m\"\n[[mappings]]\n[mappings.source]\nname = \"P\"\npath = \"p/p.go\"\n[[mappings.destination]]\nname = \"K\"\npath = \"p/k.go\"\n",
        )
        .unwrap();

        let options = GenerateOptions {
            config: dir.join("km.toml"),
            print_only: false,
            routines: 2,
            header: false,
        };
        assert_eq!(generate(&options).unwrap(), ExitCode::SUCCESS);
        let generated = fs::read_to_string(dir.join("p/km_gen.go")).unwrap();
        assert_eq!(
            generated,
            "package p\n\nfunc (dest K) FromP(src P) K {\n\tdest.a = src.a\n\tdest.B = src.B\n\treturn dest\n}\n"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_generate_fails_on_missing_module() {
        let dir = scratch("module");
        fs::write(dir.join("km.toml"), "[settings]\nstyle = \"value\"\n").unwrap();
        let options = GenerateOptions {
            config: dir.join("km.toml"),
            print_only: true,
            routines: 1,
            header: true,
        };
        let err = generate(&options).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("settings.module is required"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_schema_to_file() {
        let dir = scratch("schema");
        let out = dir.join("km.schema.json");
        export_schema(Some(&out)).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("\"mappings\""));
        fs::remove_dir_all(&dir).unwrap();
    }
}
