//! `ToMap`/`FromMap` helpers generated for a single struct type.
//!
//! Only exported top-level fields take part; embedded and nested records are copied whole.

use crate::format::FormatWriter;
use crate::model::TypeModel;

use super::functions::{function_head, mutator_head};
use super::{Plugin, Style, quote};

const ANY_MAP: &str = "map[string]any";

pub fn render_plugin(style: Style, plugin: Plugin, model: &TypeModel) -> String {
    match plugin {
        Plugin::ToMap => render_to_map(style, model),
        Plugin::FromMap => render_from_map(style, model),
    }
}

fn render_to_map(style: Style, model: &TypeModel) -> String {
    let head = function_head(style, &model.name, Plugin::ToMap.method_name(), None, Some(ANY_MAP));
    let mut w = FormatWriter::default();
    w.block(&head, |w| {
        w.writeln(&format!("result := make({ANY_MAP})"));
        for field in model.fields.iter().filter(|f| f.is_exported()) {
            w.writeln(&format!("result[{}] = dest.{}", quote(&field.name), field.name));
        }
        w.writeln("return result");
    });
    w.finish()
}

fn render_from_map(style: Style, model: &TypeModel) -> String {
    let head = mutator_head(
        style,
        &model.name,
        Plugin::FromMap.method_name(),
        &format!("src {ANY_MAP}"),
    );
    let mut w = FormatWriter::default();
    w.block(&head, |w| {
        for field in model.fields.iter().filter(|f| f.is_exported()) {
            let guard = format!("if v, ok := src[{}].({}); ok", quote(&field.name), field.ty);
            w.block(&guard, |w| w.writeln(&format!("dest.{} = v", field.name)));
        }
        if style.returns_dest() {
            w.writeln("return dest");
        }
    });
    w.finish()
}
