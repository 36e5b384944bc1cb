//! Field matching.
//!
//! The matcher walks the destination's fields in declaration order and decides, for each one, where
//! its value comes from. The whole plan is computed before any code is rendered.
//!
//! ## Resolution order
//!
//! For every destination field, first match wins:
//!
//! 1. Ignored (by bare name or dotted path) → skip.
//! 2. Unexported while the two types are in different packages → skip, except embedded records
//!    whose fields are then planned as promoted fields of the embedding level.
//! 3. Map-shaped source → guarded assertion keyed by the alias target or the field's own name.
//! 4. A source field with the same name, else the aliased source field.
//! 5. No source field → recurse into an embedded destination record against the same source scope,
//!    or skip as unmatched.
//! 6. Equivalent types → copy.
//! 7. Both sides are records → recurse, producing dotted paths.
//! 8. Both sides are basic kinds in the conversion table → cast.
//! 9. Anything else → skip as incompatible.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

use crate::conversions::{ConversionKind, ConversionTable};
use crate::model::{Field, TypeModel, TypeSignature};
use crate::qualify::TypeEquivalence;

/// Why a destination field receives no assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    Unexported,
    Unmatched,
    Incompatible,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Ignored => "ignored",
            SkipReason::Unexported => "unexported",
            SkipReason::Unmatched => "unmatched",
            SkipReason::Incompatible => "incompatible",
        };
        f.write_str(s)
    }
}

/// What to do with one destination field.
///
/// The string carried by `Copy` and `Convert` is the source path (`Meta.Value`) or, for
/// [`ConversionKind::MapExtract`], the map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Copy(String),
    Convert(String, ConversionKind),
    Skip(SkipReason),
}

/// One entry of a [`MatchPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    /// Dotted path below `dest` (`Name`, `Meta.Value`).
    pub dest_path: String,
    pub dest_type: TypeSignature,
    pub decision: Decision,
}

/// Per-field decisions in destination declaration order (depth first for nested records).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPlan {
    pub entries: Vec<FieldPlan>,
}

impl MatchPlan {
    pub fn iter(&self) -> impl Iterator<Item = &FieldPlan> {
        self.entries.iter()
    }

    /// Entries that produce an assignment.
    pub fn assignments(&self) -> impl Iterator<Item = &FieldPlan> {
        self.entries.iter().filter(|e| !matches!(e.decision, Decision::Skip(_)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, SkipReason)> {
        self.entries.iter().filter_map(|e| match e.decision {
            Decision::Skip(reason) => Some((e.dest_path.as_str(), reason)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-job inputs that shape matching.
pub struct MatchContext<'a> {
    pub ignored: &'a BTreeSet<String>,
    /// Destination field (name or dotted path) → source field (name or dotted path).
    pub aliases: &'a BTreeMap<String, String>,
    /// Both types are declared in the same package; unexported fields are visible.
    pub same_scope: bool,
    pub equivalence: &'a dyn TypeEquivalence,
    pub conversions: &'a ConversionTable,
}

impl MatchContext<'_> {
    fn is_ignored(&self, name: &str, path: &str) -> bool {
        self.ignored.contains(path) || self.ignored.contains(name)
    }

    fn alias_for(&self, name: &str, path: &str) -> Option<&str> {
        self.aliases
            .get(path)
            .or_else(|| self.aliases.get(name))
            .map(String::as_str)
    }
}

/// Lookup of source fields visible at one nesting level.
///
/// Includes fields promoted from embedded records. Outer names shadow promoted ones, and the
/// first promotion of a name wins.
pub struct SourceIndex<'f> {
    entries: HashMap<&'f str, (String, &'f Field)>,
}

impl<'f> SourceIndex<'f> {
    pub fn new(fields: &'f [Field], base: &str) -> Self {
        let mut entries = HashMap::new();
        let mut promoted = Vec::new();
        for field in fields {
            let path = join_path(base, &field.name);
            if let (true, Some(children)) = (field.embedded, &field.children) {
                // `src.base.ID` does not compile outside the package; `src.ID` does.
                let prefix = if field.is_exported() { path.clone() } else { base.to_string() };
                promoted.push((prefix, children.as_slice()));
            }
            entries.entry(field.name.as_str()).or_insert((path, field));
        }
        for (path, children) in promoted {
            for (name, entry) in SourceIndex::new(children, &path).entries {
                entries.entry(name).or_insert(entry);
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<(&str, &'f Field)> {
        self.entries.get(name).map(|(path, field)| (path.as_str(), *field))
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}.{name}")
    }
}

/// Follow a dotted path from the root source fields (`Meta.Value`).
fn resolve_path<'f>(root: &'f [Field], path: &str) -> Option<&'f Field> {
    let mut fields = root;
    let mut found = None;
    for segment in path.split('.') {
        let field = fields.iter().find(|f| f.name == segment)?;
        fields = field.children.as_deref().unwrap_or(&[]);
        found = Some(field);
    }
    found
}

/// Build the plan for mapping `source` into `destination` fields.
pub fn match_fields(destination: &[Field], source: &TypeModel, ctx: &MatchContext<'_>) -> MatchPlan {
    let mut planner = Planner {
        ctx,
        source_root: &source.fields,
        entries: Vec::new(),
    };
    if source.is_map_type() {
        planner.plan_from_map(destination, "");
    } else {
        let index = SourceIndex::new(&source.fields, "");
        planner.plan_level(destination, "", &index);
    }
    MatchPlan {
        entries: planner.entries,
    }
}

struct Planner<'a, 'f> {
    ctx: &'a MatchContext<'a>,
    source_root: &'f [Field],
    entries: Vec<FieldPlan>,
}

impl<'f> Planner<'_, 'f> {
    fn push(&mut self, path: String, field: &Field, decision: Decision) {
        if let Decision::Skip(reason) = decision {
            debug!(field = %path, %reason, "skipping field");
        }
        self.entries.push(FieldPlan {
            dest_path: path,
            dest_type: field.ty.clone(),
            decision,
        });
    }

    /// Rules 1 and 2. Returns the skip reason when the field is filtered out.
    fn filtered(&self, field: &Field, path: &str) -> Option<SkipReason> {
        if self.ctx.is_ignored(&field.name, path) {
            Some(SkipReason::Ignored)
        } else if !field.is_exported() && !self.ctx.same_scope {
            Some(SkipReason::Unexported)
        } else {
            None
        }
    }

    /// Children of an unexported embedded record seen from another package. They stay reachable
    /// as promoted fields (`dest.ID`), so they are planned at the embedding level.
    fn promoted_through_unexported<'d>(&self, field: &'d Field, path: &str) -> Option<&'d [Field]> {
        if !field.embedded || field.is_exported() || self.ctx.same_scope || self.ctx.is_ignored(&field.name, path) {
            return None;
        }
        field.children.as_deref()
    }

    fn plan_from_map(&mut self, destination: &[Field], base: &str) {
        for field in destination {
            let path = join_path(base, &field.name);
            if let Some(reason) = self.filtered(field, &path) {
                self.push(path, field, Decision::Skip(reason));
                continue;
            }
            if field.ty.is_anonymous_struct() {
                self.push(path, field, Decision::Skip(SkipReason::Incompatible));
                continue;
            }
            let key = self.ctx.alias_for(&field.name, &path).unwrap_or(&field.name).to_string();
            self.push(path, field, Decision::Convert(key, ConversionKind::MapExtract));
        }
    }

    fn plan_level(&mut self, destination: &[Field], base: &str, index: &SourceIndex<'f>) {
        for field in destination {
            let path = join_path(base, &field.name);
            if let Some(children) = self.promoted_through_unexported(field, &path) {
                self.plan_level(children, base, index);
                continue;
            }
            if let Some(reason) = self.filtered(field, &path) {
                self.push(path, field, Decision::Skip(reason));
                continue;
            }

            let Some((source_path, source)) = self.lookup(field, &path, index) else {
                match &field.children {
                    Some(children) if field.embedded => self.plan_level(children, &path, index),
                    _ => self.push(path, field, Decision::Skip(SkipReason::Unmatched)),
                }
                continue;
            };

            if !source.is_exported() && !self.ctx.same_scope {
                self.push(path, field, Decision::Skip(SkipReason::Unexported));
                continue;
            }

            if self.ctx.equivalence.equivalent(&field.ty, &source.ty) {
                self.push(path, field, Decision::Copy(source_path));
            } else if let (Some(dest_children), Some(source_children)) = (&field.children, &source.children) {
                let nested = SourceIndex::new(source_children, &source_path);
                self.plan_level(dest_children, &path, &nested);
            } else if self.ctx.conversions.is_convertible(&source.ty, &field.ty) {
                self.push(path, field, Decision::Convert(source_path, ConversionKind::Cast));
            } else {
                debug!(
                    field = %path,
                    from = %source.ty,
                    to = %field.ty,
                    "no conversion between field types"
                );
                self.push(path, field, Decision::Skip(SkipReason::Incompatible));
            }
        }
    }

    /// Rule 4: exact name first, then the alias table.
    fn lookup(&self, field: &Field, path: &str, index: &SourceIndex<'f>) -> Option<(String, &'f Field)> {
        if let Some((source_path, source)) = index.get(&field.name) {
            return Some((source_path.to_string(), source));
        }
        let target = self.ctx.alias_for(&field.name, path)?;
        if target.contains('.') {
            return resolve_path(self.source_root, target).map(|f| (target.to_string(), f));
        }
        index.get(target).map(|(source_path, source)| (source_path.to_string(), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeShape;
    use crate::qualify::{QualifiedEquivalence, VerbatimEquivalence};

    fn record(fields: Vec<Field>) -> TypeModel {
        TypeModel {
            package: "p".into(),
            name: "S".into(),
            fields,
            shape: TypeShape::Record,
        }
    }

    struct Fixture {
        ignored: BTreeSet<String>,
        aliases: BTreeMap<String, String>,
        same_scope: bool,
        conversions: ConversionTable,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ignored: BTreeSet::new(),
                aliases: BTreeMap::new(),
                same_scope: true,
                conversions: ConversionTable::default(),
            }
        }

        fn run(&self, dest: &[Field], source: &TypeModel) -> MatchPlan {
            let ctx = MatchContext {
                ignored: &self.ignored,
                aliases: &self.aliases,
                same_scope: self.same_scope,
                equivalence: &VerbatimEquivalence,
                conversions: &self.conversions,
            };
            match_fields(dest, source, &ctx)
        }
    }

    fn decisions(plan: &MatchPlan) -> Vec<(&str, &Decision)> {
        plan.iter().map(|e| (e.dest_path.as_str(), &e.decision)).collect()
    }

    fn copy(s: &str) -> Decision {
        Decision::Copy(s.to_string())
    }

    #[test]
    fn test_identical_fields_copy() {
        let fields = vec![Field::new("a", "int"), Field::new("B", "string")];
        let plan = Fixture::new().run(&fields, &record(fields.clone()));
        assert_eq!(decisions(&plan), vec![("a", &copy("a")), ("B", &copy("B"))]);
        assert_eq!(plan.skipped().count(), 0);
    }

    #[test]
    fn test_ignore_beats_name_match() {
        let fields = vec![Field::new("a", "int"), Field::new("B", "string")];
        let mut fx = Fixture::new();
        fx.ignored.insert("B".into());
        let plan = fx.run(&fields, &record(fields.clone()));
        assert_eq!(
            decisions(&plan),
            vec![("a", &copy("a")), ("B", &Decision::Skip(SkipReason::Ignored))]
        );
    }

    #[test]
    fn test_unexported_skipped_across_packages() {
        let fields = vec![Field::new("a", "int"), Field::new("B", "string")];
        let mut fx = Fixture::new();
        fx.same_scope = false;
        let plan = fx.run(&fields, &record(fields.clone()));
        assert_eq!(
            decisions(&plan),
            vec![("a", &Decision::Skip(SkipReason::Unexported)), ("B", &copy("B"))]
        );
    }

    #[test]
    fn test_alias_used_when_name_missing() {
        let dest = vec![Field::new("a", "int"), Field::new("C", "string")];
        let source = record(vec![Field::new("a", "int"), Field::new("B", "string")]);
        let mut fx = Fixture::new();
        fx.aliases.insert("C".into(), "B".into());
        let plan = fx.run(&dest, &source);
        assert_eq!(decisions(&plan), vec![("a", &copy("a")), ("C", &copy("B"))]);
    }

    #[test]
    fn test_exact_name_beats_alias() {
        let dest = vec![Field::new("C", "string")];
        let source = record(vec![Field::new("B", "string"), Field::new("C", "string")]);
        let mut fx = Fixture::new();
        fx.aliases.insert("C".into(), "B".into());
        assert_eq!(decisions(&fx.run(&dest, &source)), vec![("C", &copy("C"))]);
    }

    #[test]
    fn test_unmatched_incompatible_and_cast() {
        let dest = vec![
            Field::new("Missing", "int"),
            Field::new("Count", "int64"),
            Field::new("Flag", "string"),
            Field::new("Ratio", "float64"),
        ];
        let source = record(vec![
            Field::new("Count", "int"),
            Field::new("Flag", "bool"),
            Field::new("Ratio", "int8"),
        ]);
        let plan = Fixture::new().run(&dest, &source);
        assert_eq!(
            decisions(&plan),
            vec![
                ("Missing", &Decision::Skip(SkipReason::Unmatched)),
                ("Count", &Decision::Convert("Count".into(), ConversionKind::Cast)),
                ("Flag", &Decision::Skip(SkipReason::Incompatible)),
                ("Ratio", &Decision::Skip(SkipReason::Incompatible)),
            ]
        );
    }

    #[test]
    fn test_nested_records_recurse_with_dotted_paths() {
        let dest = vec![
            Field::new("Meta", "struct{Value string; Extra int}")
                .with_children(vec![Field::new("Value", "string"), Field::new("Extra", "int")]),
        ];
        let source = record(vec![
            Field::new("Meta", "Meta").with_children(vec![Field::new("Value", "string")]),
        ]);
        let mut fx = Fixture::new();
        fx.ignored.insert("Meta.Extra".into());
        let plan = fx.run(&dest, &source);
        assert_eq!(
            decisions(&plan),
            vec![
                ("Meta.Value", &copy("Meta.Value")),
                ("Meta.Extra", &Decision::Skip(SkipReason::Ignored)),
            ]
        );
    }

    #[test]
    fn test_promoted_source_fields() {
        let dest = vec![Field::new("ID", "int"), Field::new("Name", "string")];
        let source = record(vec![
            Field::new("Base", "Base")
                .embedded()
                .with_children(vec![Field::new("ID", "int"), Field::new("Name", "int")]),
            Field::new("Name", "string"),
        ]);
        let plan = Fixture::new().run(&dest, &source);
        assert_eq!(decisions(&plan), vec![("ID", &copy("Base.ID")), ("Name", &copy("Name"))]);
    }

    #[test]
    fn test_embedded_destination_flattens_against_source() {
        let dest = vec![
            Field::new("Base", "Base")
                .embedded()
                .with_children(vec![Field::new("ID", "int")]),
        ];
        let source = record(vec![Field::new("ID", "int")]);
        let plan = Fixture::new().run(&dest, &source);
        assert_eq!(decisions(&plan), vec![("Base.ID", &copy("ID"))]);
    }

    #[test]
    fn test_unexported_embedded_destination_promotes_across_packages() {
        let dest = vec![
            Field::new("base", "base")
                .embedded()
                .with_children(vec![Field::new("ID", "int"), Field::new("name", "string")]),
            Field::new("Title", "string"),
        ];
        let source = record(vec![
            Field::new("ID", "int"),
            Field::new("name", "string"),
            Field::new("Title", "string"),
        ]);
        let mut fx = Fixture::new();
        fx.same_scope = false;
        let plan = fx.run(&dest, &source);
        assert_eq!(
            decisions(&plan),
            vec![
                ("ID", &copy("ID")),
                ("name", &Decision::Skip(SkipReason::Unexported)),
                ("Title", &copy("Title")),
            ]
        );

        fx.ignored.insert("base".into());
        let plan = fx.run(&dest, &source);
        assert_eq!(
            decisions(&plan),
            vec![("base", &Decision::Skip(SkipReason::Ignored)), ("Title", &copy("Title"))]
        );
    }

    #[test]
    fn test_unexported_embedded_source_uses_promoted_path() {
        let dest = vec![Field::new("ID", "int"), Field::new("Name", "string")];
        let source = record(vec![
            Field::new("base", "base")
                .embedded()
                .with_children(vec![Field::new("ID", "int")]),
            Field::new("Name", "string"),
        ]);
        let mut fx = Fixture::new();
        fx.same_scope = false;
        let plan = fx.run(&dest, &source);
        assert_eq!(decisions(&plan), vec![("ID", &copy("ID")), ("Name", &copy("Name"))]);
    }

    #[test]
    fn test_dotted_alias_target() {
        let dest = vec![Field::new("Value", "string")];
        let source = record(vec![
            Field::new("Meta", "Meta").with_children(vec![Field::new("Value", "int"), Field::new("Raw", "string")]),
        ]);
        let mut fx = Fixture::new();
        fx.aliases.insert("Value".into(), "Meta.Raw".into());
        let plan = fx.run(&dest, &source);
        assert_eq!(decisions(&plan), vec![("Value", &copy("Meta.Raw"))]);
    }

    #[test]
    fn test_map_source_extracts_every_field() {
        let dest = vec![
            Field::new("Field1", "string"),
            Field::new("Field2", "int"),
            Field::new("Inline", "struct{X int}"),
            Field::new("Renamed", "bool"),
        ];
        let source = TypeModel {
            package: "p".into(),
            name: "M".into(),
            fields: vec![Field::new("key", "string"), Field::new("value", "any")],
            shape: TypeShape::Map,
        };
        let mut fx = Fixture::new();
        fx.aliases.insert("Renamed".into(), "renamed_key".into());
        let plan = fx.run(&dest, &source);
        assert_eq!(
            decisions(&plan),
            vec![
                ("Field1", &Decision::Convert("Field1".into(), ConversionKind::MapExtract)),
                ("Field2", &Decision::Convert("Field2".into(), ConversionKind::MapExtract)),
                ("Inline", &Decision::Skip(SkipReason::Incompatible)),
                ("Renamed", &Decision::Convert("renamed_key".into(), ConversionKind::MapExtract)),
            ]
        );
    }

    #[test]
    fn test_qualified_types_copy_only_when_imported() {
        let dest = vec![Field::new("Meta", "p.MetaData")];
        let source = record(vec![Field::new("Meta", "MetaData")]);
        let ignored = BTreeSet::new();
        let aliases = BTreeMap::new();
        let conversions = ConversionTable::default();

        for (imported, expected) in [(true, copy("Meta")), (false, Decision::Skip(SkipReason::Incompatible))] {
            let equivalence = QualifiedEquivalence {
                source_package: "p".into(),
                destination_package: "test".into(),
                destination_imports_source: imported,
                source_imports_destination: false,
            };
            let ctx = MatchContext {
                ignored: &ignored,
                aliases: &aliases,
                same_scope: false,
                equivalence: &equivalence,
                conversions: &conversions,
            };
            let plan = match_fields(&dest, &source, &ctx);
            assert_eq!(plan.entries[0].decision, expected);
        }
    }
}
