//! End-to-end generation over in-memory Go sources
//!
//! Each test writes a small `km.toml`, registers the Go files it names with a `MemoryLoader`, and
//! checks the generated `km_gen.go` text.

use kmgen::config::Config;
use kmgen::emit::FileHeader;
use kmgen::format_go_source;
use kmgen::generator::{GenerateError, GeneratedArtifact, process_group};
use kmgen::jobs::plan_groups;
use kmgen::loader::MemoryLoader;

const MODULE: &str = "github.com/acme/app";

fn config(style: &str, mappings: &str) -> Config {
    let text = format!("[settings]\nstyle = \"{style}\"\nmodule = \"{MODULE}\"\n\n{mappings}");
    let config = Config::from_toml_str(&text).unwrap();
    config.validate().unwrap();
    config
}

fn mapping(source: (&str, &str), destination: (&str, &str), extra: &str) -> String {
    format!(
        "[[mappings]]\n[mappings.source]\nname = \"{}\"\npath = \"{}\"\n[[mappings.destination]]\nname = \"{}\"\npath = \"{}\"\n{extra}\n",
        source.0, source.1, destination.0, destination.1
    )
}

fn run(config: &Config, loader: &MemoryLoader, header: Option<FileHeader>) -> Vec<Result<GeneratedArtifact, GenerateError>> {
    let settings = config.generator_settings(header).unwrap();
    plan_groups(config)
        .iter()
        .map(|group| process_group(group, loader, &settings))
        .collect()
}

/// The text of the only artifact of the batch.
fn generate(config: &Config, loader: &MemoryLoader) -> String {
    let mut results = run(config, loader, None);
    assert_eq!(results.len(), 1, "expected one work group");
    let artifact = results.remove(0).unwrap();
    artifact.text().into_owned()
}

// ============================================================================
// Same package
// ============================================================================

#[test]
fn test_same_package_different_files() {
    let loader = MemoryLoader::new()
        .with_source("p/p.go", "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n")
        .with_source("p/k.go", "package p\n\ntype K struct {\n\ta int\n\tB string\n}\n");
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "p/k.go"), ""));

    let out = generate(&config, &loader);
    assert!(out.contains("func (dest K) FromP(src P) K {\n\tdest.a = src.a\n\tdest.B = src.B\n\treturn dest\n}"));
    assert_eq!(
        out,
        "package p\n\nfunc (dest K) FromP(src P) K {\n\tdest.a = src.a\n\tdest.B = src.B\n\treturn dest\n}\n"
    );
}

#[test]
fn test_same_package_same_file() {
    let loader = MemoryLoader::new().with_source(
        "p.go",
        "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n\ntype K struct {\n\ta int\n\tB string\n}\n",
    );
    let config = config("", &mapping(("P", "p.go"), ("K", "p.go"), ""));

    let results = run(&config, &loader, None);
    let artifact = results[0].as_ref().unwrap();
    assert_eq!(artifact.path, "km_gen.go");
    assert!(artifact.text().contains("\tdest.a = src.a\n\tdest.B = src.B\n\treturn dest\n"));
}

#[test]
fn test_ignored_field_is_omitted() {
    let loader = MemoryLoader::new().with_source(
        "p/p.go",
        "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n\ntype K struct {\n\ta int\n\tB string\n}\n",
    );
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "p/p.go"), "ignore = [\"B\"]"));

    let out = generate(&config, &loader);
    assert!(!out.contains("dest.B"));
    assert!(out.contains("func (dest K) FromP(src P) K {\n\tdest.a = src.a\n\treturn dest\n}"));
}

#[test]
fn test_alias_copies_from_renamed_field() {
    let loader = MemoryLoader::new().with_source(
        "p/p.go",
        "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n\ntype K struct {\n\ta int\n\tC string\n}\n",
    );
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "p/p.go"), "map = { C = \"B\" }"));

    let out = generate(&config, &loader);
    assert!(out.contains("func (dest K) FromP(src P) K {\n\tdest.a = src.a\n\tdest.C = src.B\n\treturn dest\n}"));
}

#[test]
fn test_casts_nested_records_and_promoted_fields() {
    let loader = MemoryLoader::new().with_source(
        "model/model.go",
        r#"package model

type Base struct {
	ID int64
}

type Row struct {
	Base
	Count int32
	Meta  struct {
		Value string
		Extra int
	}
	Flags []string
}

type Model struct {
	ID    int64
	Count int
	Meta  struct {
		Value string
	}
	Flags []byte
}
"#,
    );
    let config = config("pointer", &mapping(("Row", "model/model.go"), ("Model", "model/model.go"), ""));

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package model

func (dest *Model) FromRow(src Row) {
	dest.ID = src.Base.ID
	dest.Count = int(src.Count)
	dest.Meta.Value = src.Meta.Value
}
"###);
}

// ============================================================================
// Across packages
// ============================================================================

#[test]
fn test_different_packages_qualify_source_and_drop_unexported() {
    let loader = MemoryLoader::new()
        .with_source("p/p.go", "package p\n\ntype P struct {\n\ta int\n\tB string\n}\n")
        .with_source("test/k.go", "package k\n\ntype K struct {\n\ta int\n\tB string\n}\n");
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "test/k.go"), ""));

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package k

import (
	"github.com/acme/app/p"
)

func (dest K) FromP(src p.P) K {
	dest.B = src.B
	return dest
}
"###);
}

#[test]
fn test_unexported_embedded_destination_assigns_promoted_fields() {
    let loader = MemoryLoader::new()
        .with_source("p/p.go", "package p\n\ntype P struct {\n\tID int\n\tTitle string\n}\n")
        .with_source(
            "test/k.go",
            "package k\n\ntype base struct {\n\tID int\n\tname string\n}\n\ntype K struct {\n\tbase\n\tTitle string\n}\n",
        );
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "test/k.go"), ""));

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package k

import (
	"github.com/acme/app/p"
)

func (dest K) FromP(src p.P) K {
	dest.ID = src.ID
	dest.Title = src.Title
	return dest
}
"###);
}

const META_SOURCE: &str = "package p\n\ntype P struct {\n\ta int\n\tB string\n\tMeta MetaData\n}\n\ntype MetaData struct{}\n";

#[test]
fn test_destination_field_qualified_with_imported_source_package() {
    let loader = MemoryLoader::new().with_source("bli/p.go", META_SOURCE).with_source(
        "bla/l.go",
        "package l\n\nimport \"github.com/acme/app/bli\"\n\ntype L struct {\n\ta int\n\tB string\n\tMeta p.MetaData\n}\n",
    );
    let config = config("value", &mapping(("P", "bli/p.go"), ("L", "bla/l.go"), ""));

    let out = generate(&config, &loader);
    assert!(out.contains("func (dest L) FromP(src p.P) L {\n\tdest.B = src.B\n\tdest.Meta = src.Meta\n\treturn dest\n}"));
}

#[test]
fn test_destination_field_qualified_with_unrelated_package() {
    let loader = MemoryLoader::new().with_source("bli/p.go", META_SOURCE).with_source(
        "bla/l.go",
        "package l\n\nimport p \"github.com/acme/app/x\"\n\ntype L struct {\n\ta int\n\tB string\n\tMeta p.MetaData\n}\n",
    );
    let config = config("value", &mapping(("P", "bli/p.go"), ("L", "bla/l.go"), ""));

    let out = generate(&config, &loader);
    assert!(out.contains("func (dest L) FromP(src p.P) L {\n\tdest.B = src.B\n\treturn dest\n}"));
}

#[test]
fn test_source_field_qualified_with_destination_package() {
    let destination = "package l\n\ntype L struct {\n\ta int\n\tB string\n\tMeta MetaData\n}\n\ntype MetaData struct{}\n";
    let loader = MemoryLoader::new()
        .with_source(
            "bli/file.go",
            "package p\n\nimport \"github.com/acme/app/bla\"\n\ntype P struct {\n\ta int\n\tB string\n\tMeta l.MetaData\n}\n",
        )
        .with_source("bla/file.go", destination);
    let config = config("value", &mapping(("P", "bli/file.go"), ("L", "bla/file.go"), ""));
    let out = generate(&config, &loader);
    assert!(out.contains("\tdest.B = src.B\n\tdest.Meta = src.Meta\n\treturn dest\n"));

    let loader = MemoryLoader::new()
        .with_source(
            "bli/file.go",
            "package p\n\nimport \"github.com/acme/app/blo\"\n\ntype P struct {\n\ta int\n\tB string\n\tMeta l.MetaData\n}\n",
        )
        .with_source("bla/file.go", destination);
    let out = generate(&config, &loader);
    assert!(out.contains("func (dest L) FromP(src p.P) L {\n\tdest.B = src.B\n\treturn dest\n}"));
}

// ============================================================================
// Map shapes and plugins
// ============================================================================

#[test]
fn test_typed_map_source_uses_guarded_assertions() {
    let loader = MemoryLoader::new().with_source(
        "data/data.go",
        "package data\n\ntype Bag map[string]any\n\ntype Raw = Bag\n\ntype S struct {\n\tField1 string\n\tField2 int\n}\n",
    );
    let config = config("value", &mapping(("Raw", "data/data.go"), ("S", "data/data.go"), "map = { Field2 = \"field_2\" }"));

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package data

func (dest S) FromRaw(src Raw) S {
	if v, ok := src["Field1"].(string); ok {
		dest.Field1 = v
	}
	if v, ok := src["field_2"].(int); ok {
		dest.Field2 = v
	}
	return dest
}
"###);
}

#[test]
fn test_struct_into_map_destination() {
    let loader = MemoryLoader::new().with_source(
        "data/data.go",
        "package data\n\ntype S struct {\n\tField1 string\n\tfield2 int\n\tSecret string\n}\n\ntype M map[string]any\n",
    );
    let config = config("standalone", &mapping(("S", "data/data.go"), ("M", "data/data.go"), "ignore = [\"Secret\"]"));

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package data

func MFromS(dest M, src S) M {
	dest["Field1"] = src.Field1
	dest["field2"] = src.field2
	return dest
}
"###);
}

#[test]
fn test_plugins_render_into_source_directory() {
    let loader = MemoryLoader::new().with_source(
        "bank/account.go",
        "package bank\n\ntype Account struct {\n\tID int64\n\towner string\n\tTags []string\n}\n",
    );
    let config = config(
        "pointer",
        "[[mappings]]\nplugins = [\"ToMap\", \"FromMap\"]\n[mappings.source]\nname = \"Account\"\npath = \"bank/account.go\"\n",
    );

    insta::assert_snapshot!(generate(&config, &loader), @r###"
package bank

func (dest *Account) ToMap() map[string]any {
	result := make(map[string]any)
	result["ID"] = dest.ID
	result["Tags"] = dest.Tags
	return result
}

func (dest *Account) FromMap(src map[string]any) {
	if v, ok := src["ID"].(int64); ok {
		dest.ID = v
	}
	if v, ok := src["Tags"].([]string); ok {
		dest.Tags = v
	}
}
"###);
}

#[test]
fn test_from_map_spells_literal_and_qualified_field_types() {
    let loader = MemoryLoader::new().with_source(
        "event/event.go",
        r#"package event

import (
	"time"
)

type Event struct {
	Name   string
	At     time.Time
	Inline struct {
		Count int
		Label string
	}
	Hook interface{ Fire() error }
}
"#,
    );
    let config = config(
        "value",
        "[[mappings]]\nplugins = [\"FromMap\"]\n[mappings.source]\nname = \"Event\"\npath = \"event/event.go\"\n",
    );

    let out = generate(&config, &loader);
    insta::assert_snapshot!(out, @r###"
package event

import (
	"time"
)

func (dest Event) FromMap(src map[string]any) Event {
	if v, ok := src["Name"].(string); ok {
		dest.Name = v
	}
	if v, ok := src["At"].(time.Time); ok {
		dest.At = v
	}
	if v, ok := src["Inline"].(struct{Count int; Label string}); ok {
		dest.Inline = v
	}
	if v, ok := src["Hook"].(interface{Fire() error}); ok {
		dest.Hook = v
	}
	return dest
}
"###);
    assert_eq!(format_go_source(&out).unwrap(), out);
}

#[test]
fn test_map_source_imports_packages_of_asserted_types() {
    let loader = MemoryLoader::new().with_source(
        "data/data.go",
        "package data\n\nimport \"github.com/google/uuid\"\n\ntype Bag map[string]any\n\ntype S struct {\n\tID   uuid.UUID\n\tTags []string\n}\n",
    );
    let config = config("value", &mapping(("Bag", "data/data.go"), ("S", "data/data.go"), ""));

    let out = generate(&config, &loader);
    insta::assert_snapshot!(out, @r###"
package data

import (
	"github.com/google/uuid"
)

func (dest S) FromBag(src Bag) S {
	if v, ok := src["ID"].(uuid.UUID); ok {
		dest.ID = v
	}
	if v, ok := src["Tags"].([]string); ok {
		dest.Tags = v
	}
	return dest
}
"###);
    assert_eq!(format_go_source(&out).unwrap(), out);
}

// ============================================================================
// Groups and headers
// ============================================================================

#[test]
fn test_group_shares_one_import_block_and_header() {
    let loader = MemoryLoader::new()
        .with_source("db/row.go", "package db\n\ntype Row struct {\n\tID int\n\tEmail string\n}\n")
        .with_source("api/req.go", "package api\n\ntype Req struct {\n\tEmail string\n}\n")
        .with_source("user/user.go", "package user\n\ntype User struct {\n\tID int\n\tEmail string\n}\n")
        .with_source("user/profile.go", "package user\n\ntype Profile struct {\n\tID int\n\tEmail string\n}\n");
    let mappings = [
        mapping(("Row", "db/row.go"), ("User", "user/user.go"), ""),
        mapping(("Req", "api/req.go"), ("User", "user/user.go"), ""),
        mapping(("Row", "db/row.go"), ("Profile", "user/profile.go"), "ignore = [\"ID\"]"),
    ]
    .concat();
    let config = config("value", &mappings);

    let header = FileHeader::new("2026-03-01T12:30:00Z", "0.3.0");
    let results = run(&config, &loader, Some(header));
    let artifact = results[0].as_ref().unwrap();
    assert_eq!(artifact.path, "user/km_gen.go");
    insta::assert_snapshot!(artifact.text(), @r###"
// Code generated by kmgen; DO NOT EDIT.
// Generated at: 2026-03-01T12:30:00Z
// kmgen version: 0.3.0

package user

import (
	"github.com/acme/app/api"
	"github.com/acme/app/db"
)

func (dest User) FromRow(src db.Row) User {
	dest.ID = src.ID
	dest.Email = src.Email
	return dest
}

func (dest User) FromReq(src api.Req) User {
	dest.Email = src.Email
	return dest
}

func (dest Profile) FromRow(src db.Row) Profile {
	dest.Email = src.Email
	return dest
}
"###);
}

#[test]
fn test_missing_type_fails_only_its_group() {
    let loader = MemoryLoader::new()
        .with_source("p/p.go", "package p\n\ntype P struct {\n\tB string\n}\n")
        .with_source("k/k.go", "package k\n\ntype S struct {\n\tB string\n}\n")
        .with_source("q/q.go", "package q\n\ntype Q struct {\n\tB string\n}\n");
    let mappings = [
        mapping(("P", "p/p.go"), ("K", "k/k.go"), ""),
        mapping(("P", "p/p.go"), ("Q", "q/q.go"), ""),
    ]
    .concat();
    let config = config("value", &mappings);

    let results = run(&config, &loader, None);
    assert_eq!(results.len(), 2);
    match &results[0] {
        Err(err @ GenerateError::TypeNotFound { .. }) => {
            assert_eq!(err.to_string(), "k/k.go: type(K): specified type not found");
        }
        other => panic!("expected TypeNotFound, got {other:?}"),
    }
    assert_eq!(results[1].as_ref().unwrap().path, "q/km_gen.go");
}

#[test]
fn test_syntax_error_is_a_load_error() {
    let loader = MemoryLoader::new()
        .with_source("p/p.go", "package p\n\ntype P struct {\n\tB \"oops\n}\n")
        .with_source("k/k.go", "package k\n\ntype K struct {\n\tB string\n}\n");
    let config = config("value", &mapping(("P", "p/p.go"), ("K", "k/k.go"), ""));
    let results = run(&config, &loader, None);
    assert!(matches!(results[0], Err(GenerateError::SourceLoad(_))));
}
