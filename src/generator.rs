//! One work group in, one `km_gen.go` out.
//!
//! [`process_group`] runs the whole pipeline for a group on the calling thread: load and extract
//! both endpoints of every job, decide how the source type is qualified, match fields, render each
//! function and lay out the file. Any error aborts the group, and a failed group never yields a
//! partial artifact.

use std::sync::Arc;

use kmgen_syntax::ast::{ImportSpec, SourceFile};
use thiserror::Error;
use tracing::{debug, warn};

use crate::conversions::{ConversionKind, ConversionTable};
use crate::emit::functions::{MappingSignature, render_map_destination, render_mapping};
use crate::emit::plugins::render_plugin;
use crate::emit::{FileHeader, GoFile, GoImport, Plugin, Style};
use crate::extract::{self, ExtractError};
use crate::jobs::{Job, MappingSpec, PluginSpec, WorkGroup};
use crate::loader::{LoadError, SourceLoader};
use crate::matcher::{Decision, MatchContext, match_fields};
use crate::model::{TypeModel, TypeShape, TypeSignature};
use crate::qualify::{self, ModulePath, QualifiedEquivalence, TypeEquivalence, VerbatimEquivalence};

/// File name of every generated artifact.
pub const GENERATED_FILE_NAME: &str = "km_gen.go";

/// Everything a worker needs besides the group itself.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSettings {
    pub style: Style,
    pub module: ModulePath,
    pub conversions: ConversionTable,
    /// `None` leaves the header out, which keeps output byte-stable across runs.
    pub header: Option<FileHeader>,
}

/// Output of one group; `path` is relative to the configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: String,
    pub content: Vec<u8>,
}

impl GeneratedArtifact {
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{path}: {source}")]
    TypeNotFound {
        path: String,
        #[source]
        source: ExtractError,
    },
    #[error("no work to process")]
    NoWork,
    #[error("unsupported job '{job}': {reason}")]
    UnsupportedJobShape { job: String, reason: String },
    #[error(transparent)]
    SourceLoad(#[from] LoadError),
    #[error("directory '{dir}' mixes packages '{expected}' and '{found}'")]
    PackageMismatch {
        dir: String,
        expected: String,
        found: String,
    },
}

/// Artifact path for a directory: `<dir>/km_gen.go`, `km_gen.go` at the root.
pub fn artifact_path(dir: &str) -> String {
    qualify::clean(&format!("{dir}/{GENERATED_FILE_NAME}"))
}

/// Render every job of `group` into a single file.
///
/// ## Errors
/// - [`GenerateError::NoWork`] for an empty group.
/// - The first job error; remaining jobs of the group are not attempted.
#[tracing::instrument(skip_all, fields(dir = %group.dir, jobs = group.jobs.len()))]
pub fn process_group(
    group: &WorkGroup,
    loader: &dyn SourceLoader,
    settings: &GeneratorSettings,
) -> Result<GeneratedArtifact, GenerateError> {
    if group.jobs.is_empty() {
        return Err(GenerateError::NoWork);
    }

    let mut builder = FileBuilder {
        dir: &group.dir,
        loader,
        settings,
        file: None,
    };
    for job in &group.jobs {
        debug!(%job, "rendering job");
        match job {
            Job::Mapping(spec) => builder.mapping(spec)?,
            Job::Plugin(spec) => builder.plugin(job, spec)?,
        }
    }
    let Some(file) = builder.file else {
        return Err(GenerateError::NoWork);
    };

    let path = artifact_path(&group.dir);
    let rendered = file.render(settings.header.as_ref());
    if let Some(err) = &rendered.format_error {
        warn!(path = %path, error = %err, "writing unformatted output");
    }
    Ok(GeneratedArtifact {
        path,
        content: rendered.text.into_bytes(),
    })
}

struct FileBuilder<'a> {
    dir: &'a str,
    loader: &'a dyn SourceLoader,
    settings: &'a GeneratorSettings,
    file: Option<GoFile>,
}

impl FileBuilder<'_> {
    fn load_model(&self, path: &str, name: &str) -> Result<(TypeModel, Arc<SourceFile>), GenerateError> {
        let file = self.loader.load(path)?;
        let model = extract::extract(&file, name).map_err(|source| GenerateError::TypeNotFound {
            path: path.to_string(),
            source,
        })?;
        Ok((model, file))
    }

    /// The file being built; every job must agree on its package.
    fn file_for(&mut self, package: &str) -> Result<&mut GoFile, GenerateError> {
        let file = self.file.get_or_insert_with(|| GoFile::new(package));
        if file.package != package {
            return Err(GenerateError::PackageMismatch {
                dir: self.dir.to_string(),
                expected: file.package.clone(),
                found: package.to_string(),
            });
        }
        Ok(file)
    }

    fn mapping(&mut self, spec: &MappingSpec) -> Result<(), GenerateError> {
        let (destination, destination_file) = self.load_model(&spec.destination.path, &spec.destination.name)?;
        let (source, source_file) = self.load_model(&spec.source.path, &spec.source.name)?;
        let mut imports = Vec::new();

        let same_dir = qualify::same_directory(&spec.source.path, &spec.destination.path);
        let source_qualified = qualify::qualified_name(&source.package, &source.name, same_dir);
        let signature = MappingSignature {
            style: self.settings.style,
            destination: &destination.name,
            source: &source.name,
            source_qualified: &source_qualified,
        };

        let text = if destination.is_map_type() {
            if source.shape != TypeShape::Record {
                return Err(unsupported(spec, "map destinations need a struct source"));
            }
            let fields = source.fields.iter().filter(|f| {
                let admitted = !spec.ignored.contains(&f.name) && (same_dir || f.is_exported());
                if !admitted {
                    debug!(field = %f.name, "leaving field out of map destination");
                }
                admitted
            });
            render_map_destination(&signature, fields)
        } else {
            let equivalence: Box<dyn TypeEquivalence> = if same_dir {
                Box::new(VerbatimEquivalence)
            } else {
                let module = &self.settings.module;
                Box::new(QualifiedEquivalence {
                    source_package: source.package.clone(),
                    destination_package: destination.package.clone(),
                    destination_imports_source: module.is_imported(&destination_file.import_paths(), &spec.source.path),
                    source_imports_destination: module.is_imported(&source_file.import_paths(), &spec.destination.path),
                })
            };
            let ctx = MatchContext {
                ignored: &spec.ignored,
                aliases: &spec.aliases,
                same_scope: same_dir,
                equivalence: equivalence.as_ref(),
                conversions: &self.settings.conversions,
            };
            let plan = match_fields(&destination.fields, &source, &ctx);
            debug!(
                assigned = plan.assignments().count(),
                skipped = plan.skipped().count(),
                "matched fields"
            );
            // Assertions spell the destination field type, which may name other packages.
            for entry in plan.assignments() {
                if let Decision::Convert(_, ConversionKind::MapExtract) = entry.decision {
                    imports.extend(spelled_imports(&entry.dest_type, &destination_file));
                }
            }
            render_mapping(&signature, &plan)
        };

        if !same_dir {
            imports.push(GoImport::from(self.settings.module.import_path(&spec.source.path)));
        }
        let file = self.file_for(&destination.package)?;
        file.imports.extend(imports);
        file.functions.push(text);
        Ok(())
    }

    fn plugin(&mut self, job: &Job, spec: &PluginSpec) -> Result<(), GenerateError> {
        let (model, source_file) = self.load_model(&spec.target.path, &spec.target.name)?;
        if model.shape != TypeShape::Record {
            return Err(GenerateError::UnsupportedJobShape {
                job: job.to_string(),
                reason: format!("{} is not a struct type", model.name),
            });
        }
        let text = render_plugin(self.settings.style, spec.plugin, &model);
        let imports: Vec<GoImport> = match spec.plugin {
            Plugin::ToMap => Vec::new(),
            Plugin::FromMap => model
                .fields
                .iter()
                .filter(|f| f.is_exported())
                .flat_map(|f| spelled_imports(&f.ty, &source_file))
                .collect(),
        };
        let file = self.file_for(&model.package)?;
        file.imports.extend(imports);
        file.functions.push(text);
        Ok(())
    }
}

fn unsupported(spec: &MappingSpec, reason: &str) -> GenerateError {
    GenerateError::UnsupportedJobShape {
        job: Job::Mapping(spec.clone()).to_string(),
        reason: reason.to_string(),
    }
}

/// Imports `file` uses for the qualifiers in `ty`.
fn spelled_imports(ty: &TypeSignature, file: &SourceFile) -> Vec<GoImport> {
    let specs: Vec<&ImportSpec> = file.imports.iter().map(|i| &i.node).collect();
    qualify::imports_for(ty.as_str(), &specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::config::Endpoint;
    use crate::emit::Plugin;
    use crate::loader::MemoryLoader;

    fn endpoint(name: &str, path: &str) -> Endpoint {
        Endpoint {
            name: name.into(),
            path: path.into(),
        }
    }

    fn mapping(source: Endpoint, destination: Endpoint) -> Job {
        Job::Mapping(MappingSpec {
            source,
            destination,
            ignored: BTreeSet::new(),
            aliases: Default::default(),
        })
    }

    #[test]
    fn test_artifact_path() {
        assert_eq!(artifact_path("."), "km_gen.go");
        assert_eq!(artifact_path("internal/user"), "internal/user/km_gen.go");
        assert_eq!(artifact_path("/test"), "/test/km_gen.go");
    }

    #[test]
    fn test_empty_group_is_no_work() {
        let group = WorkGroup {
            dir: "p".into(),
            jobs: Vec::new(),
        };
        let err = process_group(&group, &MemoryLoader::new(), &GeneratorSettings::default()).unwrap_err();
        assert!(matches!(err, GenerateError::NoWork));
        assert_eq!(err.to_string(), "no work to process");
    }

    #[test]
    fn test_missing_type_names_the_file() {
        let loader = MemoryLoader::new().with_source("p/p.go", "package p\n\ntype P struct {\n\tA int\n}\n");
        let group = WorkGroup {
            dir: "p".into(),
            jobs: vec![mapping(endpoint("P", "p/p.go"), endpoint("Missing", "p/p.go"))],
        };
        let err = process_group(&group, &loader, &GeneratorSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "p/p.go: type(Missing): specified type not found");
    }

    #[test]
    fn test_plugin_on_map_type_is_unsupported() {
        let loader = MemoryLoader::new().with_source("p/p.go", "package p\n\ntype M map[string]any\n");
        let group = WorkGroup {
            dir: "p".into(),
            jobs: vec![Job::Plugin(PluginSpec {
                target: endpoint("M", "p/p.go"),
                plugin: Plugin::ToMap,
            })],
        };
        let err = process_group(&group, &loader, &GeneratorSettings::default()).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedJobShape { ref job, .. } if job == "M.ToMap"));
    }

    #[test]
    fn test_map_to_map_is_unsupported() {
        let loader = MemoryLoader::new().with_source("p/p.go", "package p\n\ntype A map[string]any\n\ntype B map[string]any\n");
        let group = WorkGroup {
            dir: "p".into(),
            jobs: vec![mapping(endpoint("A", "p/p.go"), endpoint("B", "p/p.go"))],
        };
        let err = process_group(&group, &loader, &GeneratorSettings::default()).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedJobShape { .. }));
    }

    #[test]
    fn test_mixed_packages_in_one_directory() {
        let loader = MemoryLoader::new()
            .with_source("p/a.go", "package a\n\ntype A struct {\n\tX int\n}\n")
            .with_source("p/b.go", "package b\n\ntype B struct {\n\tX int\n}\n");
        let group = WorkGroup {
            dir: "p".into(),
            jobs: vec![
                mapping(endpoint("B", "p/b.go"), endpoint("A", "p/a.go")),
                mapping(endpoint("A", "p/a.go"), endpoint("B", "p/b.go")),
            ],
        };
        let err = process_group(&group, &loader, &GeneratorSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::PackageMismatch { ref expected, ref found, .. } if expected == "a" && found == "b"
        ));
    }
}
