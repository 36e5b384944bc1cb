//! Turning the configuration into units of work.
//!
//! Every destination of a mapping is one [`Job::Mapping`]; every plugin is one [`Job::Plugin`]
//! against the mapping's source type. Jobs are grouped by the directory they render into, so each
//! `km_gen.go` is produced by exactly one [`WorkGroup`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::{Config, Endpoint};
use crate::emit::Plugin;
use crate::qualify;

impl Endpoint {
    /// Directory of the file, in forward-slash form.
    pub fn dir(&self) -> String {
        qualify::dir_of(&self.path)
    }
}

/// Generate `Destination.FromSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSpec {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub ignored: BTreeSet<String>,
    /// Destination field → source field.
    pub aliases: BTreeMap<String, String>,
}

/// Generate `ToMap` or `FromMap` for a single type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    pub target: Endpoint,
    pub plugin: Plugin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Mapping(MappingSpec),
    Plugin(PluginSpec),
}

impl Job {
    /// Directory whose `km_gen.go` receives this job's function.
    pub fn output_dir(&self) -> String {
        match self {
            Job::Mapping(spec) => spec.destination.dir(),
            Job::Plugin(spec) => spec.target.dir(),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Mapping(spec) => write!(f, "{} <- {}", spec.destination.name, spec.source.name),
            Job::Plugin(spec) => write!(f, "{}.{}", spec.target.name, spec.plugin.method_name()),
        }
    }
}

/// All jobs rendering into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkGroup {
    pub dir: String,
    pub jobs: Vec<Job>,
}

/// Expand the configuration into jobs and group them by output directory.
///
/// Groups come back sorted by directory; jobs keep configuration order inside a group.
pub fn plan_groups(config: &Config) -> Vec<WorkGroup> {
    let mut groups: BTreeMap<String, Vec<Job>> = BTreeMap::new();
    for mapping in &config.mappings {
        for destination in &mapping.destination {
            let job = Job::Mapping(MappingSpec {
                source: mapping.source.clone(),
                destination: destination.endpoint(),
                ignored: destination.ignore.iter().cloned().collect(),
                aliases: destination.map.clone(),
            });
            groups.entry(job.output_dir()).or_default().push(job);
        }
        for plugin in &mapping.plugins {
            let job = Job::Plugin(PluginSpec {
                target: mapping.source.clone(),
                plugin: *plugin,
            });
            groups.entry(job.output_dir()).or_default().push(job);
        }
    }
    groups
        .into_iter()
        .map(|(dir, jobs)| WorkGroup { dir, jobs })
        .collect()
}
