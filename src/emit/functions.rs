//! Mapping functions: one `From<Source>` conversion per destination/source pair.

use crate::conversions::ConversionKind;
use crate::format::FormatWriter;
use crate::matcher::{Decision, MatchPlan};
use crate::model::Field;

use super::{Style, quote};

/// Names used in a mapping function's signature.
#[derive(Debug, Clone, Copy)]
pub struct MappingSignature<'a> {
    pub style: Style,
    pub destination: &'a str,
    /// Bare source type name, used in the function name.
    pub source: &'a str,
    /// Source type as written in the destination package (`p.P` across packages).
    pub source_qualified: &'a str,
}

/// `func ...` line without the opening brace.
///
/// `param` is the non-receiver parameter list; `result` the result type, if any.
pub(crate) fn function_head(
    style: Style,
    destination: &str,
    method: &str,
    param: Option<&str>,
    result: Option<&str>,
) -> String {
    let result = result.map(|r| format!(" {r}")).unwrap_or_default();
    match style {
        Style::Pointer => format!("func (dest *{destination}) {method}({}){result}", param.unwrap_or_default()),
        Style::Value => format!("func (dest {destination}) {method}({}){result}", param.unwrap_or_default()),
        Style::Standalone => {
            let params = match param {
                Some(p) => format!("dest {destination}, {p}"),
                None => format!("dest {destination}"),
            };
            format!("func {destination}{method}({params}){result}")
        }
    }
}

/// Head of a function that updates `dest`: value-like styles return it.
pub(crate) fn mutator_head(style: Style, destination: &str, method: &str, param: &str) -> String {
    let result = style.returns_dest().then_some(destination);
    function_head(style, destination, method, Some(param), result)
}

impl MappingSignature<'_> {
    fn head(&self) -> String {
        let method = format!("From{}", self.source);
        mutator_head(
            self.style,
            self.destination,
            &method,
            &format!("src {}", self.source_qualified),
        )
    }
}

/// Render a struct destination from a match plan.
pub fn render_mapping(sig: &MappingSignature<'_>, plan: &MatchPlan) -> String {
    let mut w = FormatWriter::default();
    w.block(&sig.head(), |w| {
        for entry in plan.assignments() {
            let dest = &entry.dest_path;
            match &entry.decision {
                Decision::Copy(source) => w.writeln(&format!("dest.{dest} = src.{source}")),
                Decision::Convert(source, ConversionKind::Cast) => {
                    w.writeln(&format!("dest.{dest} = {}(src.{source})", entry.dest_type));
                }
                Decision::Convert(key, ConversionKind::MapExtract) => {
                    let guard = format!("if v, ok := src[{}].({}); ok", quote(key), entry.dest_type);
                    w.block(&guard, |w| w.writeln(&format!("dest.{dest} = v")));
                }
                Decision::Skip(_) => {}
            }
        }
        if sig.style.returns_dest() {
            w.writeln("return dest");
        }
    });
    w.finish()
}

/// Render a map destination: every admitted source field becomes a key.
///
/// `fields` are the source's top-level fields already filtered by the caller.
pub fn render_map_destination<'f>(sig: &MappingSignature<'_>, fields: impl IntoIterator<Item = &'f Field>) -> String {
    let target = match sig.style {
        Style::Pointer => "(*dest)",
        Style::Value | Style::Standalone => "dest",
    };
    let mut w = FormatWriter::default();
    w.block(&sig.head(), |w| {
        for field in fields {
            w.writeln(&format!("{target}[{}] = src.{}", quote(&field.name), field.name));
        }
        if sig.style.returns_dest() {
            w.writeln("return dest");
        }
    });
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{FieldPlan, SkipReason};
    use crate::model::TypeSignature;

    fn plan(entries: Vec<(&str, &str, Decision)>) -> MatchPlan {
        MatchPlan {
            entries: entries
                .into_iter()
                .map(|(path, ty, decision)| FieldPlan {
                    dest_path: path.to_string(),
                    dest_type: TypeSignature::from(ty),
                    decision,
                })
                .collect(),
        }
    }

    fn sig(style: Style) -> MappingSignature<'static> {
        MappingSignature {
            style,
            destination: "K",
            source: "P",
            source_qualified: "p.P",
        }
    }

    #[test]
    fn test_heads_per_style() {
        let empty = MatchPlan::default();
        assert_eq!(render_mapping(&sig(Style::Pointer), &empty), "func (dest *K) FromP(src p.P) {\n}\n");
        assert_eq!(
            render_mapping(&sig(Style::Value), &empty),
            "func (dest K) FromP(src p.P) K {\n\treturn dest\n}\n"
        );
        assert_eq!(
            render_mapping(&sig(Style::Standalone), &empty),
            "func KFromP(dest K, src p.P) K {\n\treturn dest\n}\n"
        );
    }

    #[test]
    fn test_assignment_forms() {
        let plan = plan(vec![
            ("A", "int", Decision::Copy("A".into())),
            ("Meta.Value", "string", Decision::Copy("Meta.Value".into())),
            ("Count", "int64", Decision::Convert("Total".into(), ConversionKind::Cast)),
            ("Name", "string", Decision::Convert("name".into(), ConversionKind::MapExtract)),
            ("Hidden", "int", Decision::Skip(SkipReason::Ignored)),
        ]);
        let out = render_mapping(&sig(Style::Pointer), &plan);
        insta::assert_snapshot!(out, @r###"
func (dest *K) FromP(src p.P) {
	dest.A = src.A
	dest.Meta.Value = src.Meta.Value
	dest.Count = int64(src.Total)
	if v, ok := src["name"].(string); ok {
		dest.Name = v
	}
}
"###);
    }

    #[test]
    fn test_map_destination_forms() {
        let fields = [Field::new("Field1", "string"), Field::new("Field2", "int")];
        assert_eq!(
            render_map_destination(&sig(Style::Value), fields.iter()),
            "func (dest K) FromP(src p.P) K {\n\tdest[\"Field1\"] = src.Field1\n\tdest[\"Field2\"] = src.Field2\n\treturn dest\n}\n"
        );
        assert!(render_map_destination(&sig(Style::Pointer), fields.iter()).contains("\t(*dest)[\"Field1\"] = src.Field1\n"));
    }
}
