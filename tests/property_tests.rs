//! Property-based tests for kmgen
//!
//! Random struct layouts are rendered as Go source, run through the real pipeline, and checked
//! against invariants that must hold for any input.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use kmgen::config::Endpoint;
use kmgen::conversions::ConversionTable;
use kmgen::emit::plugins::render_plugin;
use kmgen::check_formatted;
use kmgen::emit::{GoFile, Plugin, Style};
use kmgen::extract::extract;
use kmgen::generator::{GeneratorSettings, process_group};
use kmgen::jobs::{Job, MappingSpec, WorkGroup};
use kmgen::loader::MemoryLoader;
use kmgen::matcher::{Decision, MatchContext, match_fields};
use kmgen::qualify::{ModulePath, VerbatimEquivalence};
use kmgen::scheduler::Scheduler;
use kmgen_syntax::parser::parse_source;
use proptest::prelude::*;

const TYPES: &[&str] = &[
    "int",
    "string",
    "int64",
    "bool",
    "[]byte",
    "*Meta",
    "map[string]int",
    "time.Time",
    "struct{X int}",
    "interface{M()}",
];

/// Exported field names with a type each, in name order.
fn fields_strategy() -> impl Strategy<Value = BTreeMap<String, &'static str>> {
    prop::collection::btree_map("[A-Z][a-z0-9]{0,5}", prop::sample::select(TYPES), 1..8)
}

fn go_struct(name: &str, fields: &BTreeMap<String, &str>) -> String {
    let mut out = format!("type {name} struct {{\n");
    for (field, ty) in fields {
        out.push_str(&format!("\t{field} {ty}\n"));
    }
    out.push_str("}\n");
    out
}

fn endpoint(name: &str, path: &str) -> Endpoint {
    Endpoint {
        name: name.into(),
        path: path.into(),
    }
}

fn job(source: Endpoint, destination: Endpoint, ignored: BTreeSet<String>) -> Job {
    Job::Mapping(MappingSpec {
        source,
        destination,
        ignored,
        aliases: BTreeMap::new(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: identical declarations copy every field and skip none
    #[test]
    fn identical_types_copy_every_field(fields in fields_strategy()) {
        let source = format!("package p\n\n{}\n{}", go_struct("P", &fields), go_struct("K", &fields));
        let file = parse_source(&source).unwrap();
        let p = extract(&file, "P").unwrap();
        let k = extract(&file, "K").unwrap();

        let ignored = BTreeSet::new();
        let aliases = BTreeMap::new();
        let conversions = ConversionTable::default();
        let ctx = MatchContext {
            ignored: &ignored,
            aliases: &aliases,
            same_scope: true,
            equivalence: &VerbatimEquivalence,
            conversions: &conversions,
        };
        let plan = match_fields(&k.fields, &p, &ctx);
        prop_assert_eq!(plan.len(), fields.len());
        prop_assert_eq!(plan.skipped().count(), 0);
        for entry in plan.iter() {
            prop_assert_eq!(&entry.decision, &Decision::Copy(entry.dest_path.clone()));
        }
    }

    /// Property: an ignored field is never assigned, whatever its type
    #[test]
    fn ignored_fields_never_assigned(
        fields in fields_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let names: Vec<&String> = fields.keys().collect();
        let ignored: BTreeSet<String> = picks.iter().map(|i| i.get(&names).to_string()).collect();

        let loader = MemoryLoader::new()
            .with_source("p/p.go", format!("package p\n\n{}", go_struct("P", &fields)))
            .with_source("p/k.go", format!("package p\n\n{}", go_struct("K", &fields)));
        let group = WorkGroup {
            dir: "p".into(),
            jobs: vec![job(endpoint("P", "p/p.go"), endpoint("K", "p/k.go"), ignored.clone())],
        };
        let artifact = process_group(&group, &loader, &GeneratorSettings::default()).unwrap();
        let text = artifact.text();
        for name in fields.keys() {
            let assignment = format!("dest.{name} = ");
            prop_assert_eq!(text.contains(&assignment), !ignored.contains(name), "{}", text);
        }
    }

    /// Property: ToMap writes exactly the keys FromMap reads back, with the field types, and the
    /// rendered file is already laid out
    #[test]
    fn plugins_agree_on_keys(fields in fields_strategy()) {
        let file = parse_source(&format!("package p\n\n{}", go_struct("T", &fields))).unwrap();
        let model = extract(&file, "T").unwrap();
        let to_map = render_plugin(Style::Value, Plugin::ToMap, &model);
        let from_map = render_plugin(Style::Value, Plugin::FromMap, &model);

        for (name, ty) in &fields {
            let written = format!("result[\"{name}\"] = dest.{name}\n");
            let read = format!("if v, ok := src[\"{name}\"].({ty}); ok {{\n\t\tdest.{name} = v\n");
            prop_assert!(to_map.contains(&written), "{}", to_map);
            prop_assert!(from_map.contains(&read), "{}", from_map);
        }
        prop_assert_eq!(to_map.matches("result[").count(), fields.len());
        prop_assert_eq!(from_map.matches("if v, ok").count(), fields.len());

        let mut go = GoFile::new("p");
        go.functions.push(to_map);
        go.functions.push(from_map);
        let rendered = go.render(None);
        prop_assert!(rendered.format_error.is_none(), "{:?}", rendered.format_error);
        prop_assert!(check_formatted(&rendered.text).unwrap(), "{}", rendered.text);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: output does not depend on the number of workers
    #[test]
    fn worker_count_is_invisible(
        source in fields_strategy(),
        destinations in prop::collection::vec(fields_strategy(), 1..6),
        workers in 2usize..6,
    ) {
        let mut loader = MemoryLoader::new().with_source("src/src.go", format!("package src\n\n{}", go_struct("S", &source)));
        let mut groups = Vec::new();
        for (i, fields) in destinations.iter().enumerate() {
            let path = format!("d{i}/d.go");
            loader = loader.with_source(&path, format!("package d{i}\n\n{}", go_struct("D", fields)));
            groups.push(WorkGroup {
                dir: format!("d{i}"),
                jobs: vec![job(endpoint("S", "src/src.go"), endpoint("D", &path), BTreeSet::new())],
            });
        }

        let settings = Arc::new(GeneratorSettings {
            module: ModulePath::new("example.com/m", ""),
            ..GeneratorSettings::default()
        });
        let loader: Arc<MemoryLoader> = Arc::new(loader);
        let serial = Scheduler::new(1, Arc::clone(&settings), loader.clone()).unwrap().schedule(groups.clone()).collect();
        let parallel = Scheduler::new(workers, settings, loader).unwrap().schedule(groups).collect();

        prop_assert!(serial.is_clean());
        prop_assert_eq!(serial.artifacts.len(), destinations.len());
        prop_assert_eq!(serial.artifacts, parallel.artifacts);
    }
}
