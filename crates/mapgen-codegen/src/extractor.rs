//! Source file parser that fills the type catalog from Rust source.
//!
//! Every struct and enum becomes a candidate type. Named struct fields become
//! the ordered property list; tuple structs, unit structs and enums are
//! catalogued without properties. The `map_to`, `property_map` and
//! `register` helper attributes are read into [`Directive`]s.

use std::fs;
use std::path::{Component, Path};

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, ExprPath, Fields, Item, Lit, Meta};
use walkdir::WalkDir;

use crate::resolver::{MAP_TO, PROPERTY_MAP, REGISTER};
use crate::types::{Directive, DirectiveValue, TypeInfo, TypeShape};
use crate::CodeGenerator;

const DIRECTIVES: [&str; 3] = [MAP_TO, PROPERTY_MAP, REGISTER];

/// Read the directive attributes of one item. Malformed ones are skipped.
fn extract_directives(attrs: &[Attribute], type_name: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    for attr in attrs {
        let Some(name) = DIRECTIVES.iter().find(|name| attr.path().is_ident(name)) else {
            continue;
        };
        match parse_directive(attr, name) {
            Ok(directive) => directives.push(directive),
            Err(err) => {
                tracing::warn!(type_name = %type_name, error = %err, "skipping malformed `{name}` attribute");
            }
        }
    }
    directives
}

fn parse_directive(attr: &Attribute, name: &str) -> syn::Result<Directive> {
    let mut directive = Directive::new(name);
    if let Meta::Path(_) = attr.meta {
        return Ok(directive);
    }
    attr.parse_nested_meta(|meta| parse_entry(meta, &mut directive))?;
    Ok(directive)
}

/// `key = value`, `key(...)` or a bare `key` flag.
fn parse_entry(meta: ParseNestedMeta<'_>, directive: &mut Directive) -> syn::Result<()> {
    let key = match meta.path.get_ident() {
        Some(ident) => ident.to_string(),
        None => return Err(meta.error("expected an argument name")),
    };

    if meta.input.peek(syn::Token![=]) {
        let expr: Expr = meta.value()?.parse()?;
        directive.push(key, expr_to_value(&expr)?);
    } else if meta.input.peek(syn::token::Paren) {
        let mut nested = Directive::new(key.clone());
        meta.parse_nested_meta(|inner| parse_entry(inner, &mut nested))?;
        directive.push(key, DirectiveValue::Nested(nested));
    } else {
        directive.push(key, DirectiveValue::Bool(true));
    }
    Ok(())
}

fn expr_to_value(expr: &Expr) -> syn::Result<DirectiveValue> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(DirectiveValue::Str(lit.value())),
        Expr::Lit(ExprLit {
            lit: Lit::Bool(lit), ..
        }) => Ok(DirectiveValue::Bool(lit.value)),
        Expr::Path(ExprPath { path, qself: None, .. }) => {
            let segments: Vec<_> = path.segments.iter().map(|s| s.ident.to_string()).collect();
            let mut written = segments.join("::");
            if path.leading_colon.is_some() {
                written.insert_str(0, "::");
            }
            Ok(DirectiveValue::Type(written))
        }
        _ => Err(syn::Error::new_spanned(
            expr,
            "expected a string, a boolean or a type path",
        )),
    }
}

fn extract_properties(fields: &Fields) -> (TypeShape, Option<Vec<String>>) {
    match fields {
        Fields::Named(named) => (
            TypeShape::Record,
            Some(
                named
                    .named
                    .iter()
                    .filter_map(|field| field.ident.as_ref().map(ToString::to_string))
                    .collect(),
            ),
        ),
        Fields::Unnamed(_) | Fields::Unit => (TypeShape::NonRecord, None),
    }
}

/// Collect the types of `items`, descending into inline modules.
fn collect_items(items: &[Item], module_path: &str, out: &mut Vec<TypeInfo>) {
    for item in items {
        match item {
            Item::Struct(s) => {
                let qualified_name = format!("{module_path}::{}", s.ident);
                let (shape, properties) = extract_properties(&s.fields);
                out.push(TypeInfo {
                    directives: extract_directives(&s.attrs, &qualified_name),
                    shape,
                    properties,
                    qualified_name,
                });
            }
            Item::Enum(e) => {
                let qualified_name = format!("{module_path}::{}", e.ident);
                out.push(TypeInfo {
                    directives: extract_directives(&e.attrs, &qualified_name),
                    shape: TypeShape::NonRecord,
                    properties: None,
                    qualified_name,
                });
            }
            Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    collect_items(items, &format!("{module_path}::{}", m.ident), out);
                }
            }
            _ => {}
        }
    }
}

/// Parse Rust source into catalog entries. Unparsable sources yield nothing.
fn parse_source(source: &str, module_path: &str) -> Vec<TypeInfo> {
    let file = match syn::parse_file(source) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(module_path = %module_path, error = %err, "skipping unparsable source");
            return Vec::new();
        }
    };

    let mut types = Vec::new();
    collect_items(&file.items, module_path, &mut types);
    types
}

/// Module path of a file below a source root: `lib.rs`/`main.rs` map to the
/// root, `mod.rs` to its directory.
fn module_path_for(root: &Path, file: &Path, root_module: &str) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(file_name) = segments.pop() {
        let stem = file_name.trim_end_matches(".rs");
        let is_root = segments.is_empty() && (stem == "lib" || stem == "main");
        if stem != "mod" && !is_root {
            segments.push(stem.to_string());
        }
    }

    let mut path = root_module.to_string();
    for segment in segments {
        path.push_str("::");
        path.push_str(&segment);
    }
    path
}

impl CodeGenerator {
    /// Parse a single Rust source file; its types are qualified with the
    /// configured module path.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut generator = CodeGenerator::new();
    /// generator.set_module_path("crate::model").add_source_file("src/model.rs")?;
    /// generator.write_to_file(out_dir.join("mappers.rs"))?;
    /// ```
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<&mut Self> {
        let source = fs::read_to_string(path)?;
        Ok(self.add_source_str(&source))
    }

    /// Parse Rust source from a string.
    pub fn add_source_str(&mut self, source: &str) -> &mut Self {
        let module_path = self.config().module_path.clone();
        for info in parse_source(source, &module_path) {
            self.add_type(info);
        }
        self
    }

    /// Recursively scan a source root for `.rs` files.
    ///
    /// Module paths are derived from file locations below `path`, starting at
    /// the configured module path.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut generator = CodeGenerator::new();
    /// generator.add_source_dir("src/")?;
    /// generator.write_to_dir("src/mappers")?;
    /// ```
    pub fn add_source_dir(&mut self, path: impl AsRef<Path>) -> std::io::Result<&mut Self> {
        let root = path.as_ref();
        let root_module = self.config().module_path.clone();
        let walker = WalkDir::new(root).sort_by_file_name();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let file = entry.path();
            if file.extension().map(|e| e == "rs").unwrap_or(false) {
                let source = fs::read_to_string(file)?;
                let module_path = module_path_for(root, file, &root_module);
                for info in parse_source(&source, &module_path) {
                    self.add_type(info);
                }
            }
        }
        Ok(self)
    }
}
