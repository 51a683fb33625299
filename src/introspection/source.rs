//! Builds a [`Registry`] from parsed Rust sources.
//!
//! Structs become classes and their named fields properties, unit-only enums become
//! enumeration classes, documented functions and methods become
//! [`MethodDescriptor`]s. The metadata the extractors need beyond plain types is read
//! from attributes:
//!
//! ```ignore
//! /// A vehicle
//! #[serde(rename_all = "camelCase")]
//! #[swagger(alias = "Ride", discriminator(column = "kind", map(car = "Car", bike = "Bike")))]
//! pub struct Vehicle {
//!     #[swagger(read_only, groups("public"), since = "1.1")]
//!     #[validate(length(min = 1, max = 32), not_blank, groups("create"))]
//!     pub plate_number: String,
//! }
//!
//! /// Fetch a vehicle.
//! ///
//! /// @param id: int The vehicle id
//! /// @return Vehicle
//! /// @throws NotFound
//! #[swagger(get = "/vehicles/{id}", tag = "vehicles", param(location = "path", name = "id"))]
//! pub fn show(id: u32) -> Vehicle { .. }
//! ```
//!
//! Rust type names are normalized to the type aliases the extractors understand, both in
//! field types and in doc tags (`Vec<User>` is documented as `User[]`).

use super::{
    Annotation, ClassDescriptor, Constraint, ConstraintKind, DocBlock, MethodDescriptor,
    PropertyDescriptor, Registry, TypeDescriptor,
};
use crate::parser::ParsedFile;
use crate::schema::{Any, HttpMethod, Parameter, ParameterLocation};
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use log::{debug, warn};
use serde_json::{Number, Value};
use syn::meta::ParseNestedMeta;
use syn::parse::Parse;
use syn::visit::Visit;
use syn::{parenthesized, Attribute, Expr, ExprLit, ExprUnary, Lit, LitStr, Token, Type, UnOp};

const VOID: &str = "void";

/// Collects classes, constraints, hierarchies and documented methods from source files
pub struct SourceIntrospector;

impl SourceIntrospector {
    pub fn introspect(files: &[ParsedFile]) -> Registry {
        let mut visitor = SourceVisitor::default();
        for file in files {
            debug!("Introspecting {}", file.path.display());
            visitor.visit_file(&file.syntax_tree);
        }
        debug!(
            "Introspected {} classes and {} methods",
            visitor.registry.class_count(),
            visitor.registry.method_count()
        );
        visitor.registry
    }
}

#[derive(Default)]
struct SourceVisitor {
    registry: Registry,
    /// Self type of the `impl` block being visited
    current_impl: Option<String>,
}

/// Maps a Rust scalar to its type alias
fn primitive_alias(ident: &str) -> Option<&'static str> {
    let alias = match ident {
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => "int",
        "i64" | "u64" | "i128" | "u128" | "isize" | "usize" => "long",
        "f32" => "float",
        "f64" => "double",
        "bool" => "boolean",
        "String" | "str" | "char" | "Uuid" => "string",
        "NaiveDate" => "date",
        "DateTime" | "NaiveDateTime" | "SystemTime" => "DateTime",
        _ => return None,
    };
    Some(alias)
}

/// Normalized descriptor of a Rust type, `None` for types without a schema
pub fn type_descriptor(ty: &Type) -> Option<TypeDescriptor> {
    match ty {
        Type::Path(type_path) => path_descriptor(&type_path.path),
        Type::Reference(reference) => type_descriptor(&reference.elem),
        Type::Slice(slice) => Some(TypeDescriptor::list(type_descriptor(&slice.elem)?)),
        Type::Array(array) => Some(TypeDescriptor::list(type_descriptor(&array.elem)?)),
        Type::Paren(paren) => type_descriptor(&paren.elem),
        Type::Group(group) => type_descriptor(&group.elem),
        _ => None,
    }
}

fn path_descriptor(path: &syn::Path) -> Option<TypeDescriptor> {
    let segment = path.segments.last()?;
    let ident = segment.ident.to_string();
    let args: Vec<&Type> = match &segment.arguments {
        syn::PathArguments::AngleBracketed(generics) => generics
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    match ident.as_str() {
        "Option" | "Box" | "Rc" | "Arc" | "Cow" | "Result" => type_descriptor(args.first()?),
        "Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "IndexSet" => {
            Some(TypeDescriptor::list(type_descriptor(args.first()?)?))
        }
        "HashMap" | "BTreeMap" | "IndexMap" => Some(TypeDescriptor::map(
            type_descriptor(args.first()?)?,
            type_descriptor(args.get(1)?)?,
        )),
        _ => Some(TypeDescriptor::named(
            primitive_alias(&ident).unwrap_or(ident.as_str()),
        )),
    }
}

/// Normalizes a type written in a doc tag; text that is not a Rust type is kept
fn normalize_doc_type(name: &str) -> String {
    match syn::parse_str::<Type>(name) {
        Ok(Type::Tuple(tuple)) if tuple.elems.is_empty() => VOID.to_string(),
        Ok(ty) => type_descriptor(&ty)
            .map(|descriptor| descriptor.type_name())
            .unwrap_or_else(|| name.to_string()),
        Err(_) => name.to_string(),
    }
}

/// Apply a serde `rename_all` rule
fn rename_with(rule: &str, name: &str) -> Option<String> {
    let renamed = match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_upper_camel_case(),
        "camelCase" => name.to_lower_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        "SCREAMING-KEBAB-CASE" => name.to_shouty_kebab_case(),
        _ => return None,
    };
    Some(renamed)
}

/// Concatenated `///` comments
fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(name_value) => match &name_value.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').unwrap_or(&line).to_string())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Consume the value of an attribute entry nobody here cares about
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _content;
        parenthesized!(_content in meta.input);
    }
    Ok(())
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    Ok(meta.value()?.parse::<LitStr>()?.value())
}

/// `name("a", "b", ..)`
fn string_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    parenthesized!(content in meta.input);
    let values = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
    Ok(values.iter().map(LitStr::value).collect())
}

fn literal_value(lit: &Lit) -> Option<Value> {
    match lit {
        Lit::Str(text) => Some(Value::String(text.value())),
        Lit::Bool(flag) => Some(Value::Bool(flag.value)),
        Lit::Int(_) | Lit::Float(_) => number_value(&Expr::Lit(ExprLit {
            attrs: Vec::new(),
            lit: lit.clone(),
        }))
        .map(Value::Number),
        _ => None,
    }
}

fn number_value(expr: &Expr) -> Option<Number> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<u64>().ok().map(Number::from),
        Expr::Lit(ExprLit {
            lit: Lit::Float(float),
            ..
        }) => float.base10_parse::<f64>().ok().and_then(Number::from_f64),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => {
            let number = number_value(expr)?;
            match number.as_u64() {
                Some(int) => i64::try_from(int).ok().map(|int| Number::from(-int)),
                None => number.as_f64().and_then(|float| Number::from_f64(-float)),
            }
        }
        _ => None,
    }
}

/// `name(min = .., max = ..)` with unsigned bounds
fn unsigned_bounds(meta: &ParseNestedMeta) -> syn::Result<(Option<u64>, Option<u64>)> {
    let (mut min, mut max) = (None, None);
    meta.parse_nested_meta(|bound| {
        let value = bound.value()?.parse::<syn::LitInt>()?.base10_parse::<u64>()?;
        if bound.path.is_ident("min") {
            min = Some(value);
        } else if bound.path.is_ident("max") {
            max = Some(value);
        } else {
            return Err(bound.error("expected `min` or `max`"));
        }
        Ok(())
    })?;
    Ok((min, max))
}

fn numeric_bounds(meta: &ParseNestedMeta) -> syn::Result<(Option<Number>, Option<Number>)> {
    let (mut min, mut max) = (None, None);
    meta.parse_nested_meta(|bound| {
        let expr = bound.value()?.parse::<Expr>()?;
        let value = number_value(&expr).ok_or_else(|| bound.error("expected a number"))?;
        if bound.path.is_ident("min") {
            min = Some(value);
        } else if bound.path.is_ident("max") {
            max = Some(value);
        } else {
            return Err(bound.error("expected `min` or `max`"));
        }
        Ok(())
    })?;
    Ok((min, max))
}

#[derive(Default)]
struct SerdeOptions {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
}

fn serde_options(attrs: &[Attribute]) -> SerdeOptions {
    let mut options = SerdeOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                options.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("rename_all") && meta.input.peek(Token![=]) {
                options.rename_all = Some(string_value(&meta)?);
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                options.skip = true;
            } else {
                skip_value(&meta)?;
            }
            Ok(())
        });
        if let Err(e) = parsed {
            debug!("Ignoring unreadable serde attribute: {}", e);
        }
    }
    options
}

#[derive(Default)]
struct ClassOptions {
    alias: Option<String>,
    extends: Option<String>,
    discriminator: Option<(String, Vec<(String, String)>)>,
}

fn class_options(attrs: &[Attribute]) -> syn::Result<ClassOptions> {
    let mut options = ClassOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("swagger")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                options.alias = Some(string_value(&meta)?);
            } else if meta.path.is_ident("extends") {
                options.extends = Some(string_value(&meta)?);
            } else if meta.path.is_ident("discriminator") {
                let mut column = None;
                let mut map = Vec::new();
                meta.parse_nested_meta(|entry| {
                    if entry.path.is_ident("column") {
                        column = Some(string_value(&entry)?);
                    } else if entry.path.is_ident("map") {
                        entry.parse_nested_meta(|mapping| {
                            let value = mapping
                                .path
                                .get_ident()
                                .map(|ident| ident.to_string())
                                .ok_or_else(|| mapping.error("expected a discriminator value"))?;
                            map.push((value, string_value(&mapping)?));
                            Ok(())
                        })?;
                    } else {
                        return Err(entry.error("expected `column` or `map`"));
                    }
                    Ok(())
                })?;
                let column = column.ok_or_else(|| meta.error("discriminator needs a `column`"))?;
                options.discriminator = Some((column, map));
            } else {
                return Err(meta.error("unsupported swagger attribute on a type"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Applies field-level `#[swagger(..)]` settings to a property
fn apply_property_options(attrs: &[Attribute], property: &mut PropertyDescriptor) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("swagger")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("read_only") {
                property.read_only = true;
            } else if meta.path.is_ident("groups") {
                property.groups = string_list(&meta)?;
            } else if meta.path.is_ident("since") {
                property.since = Some(string_value(&meta)?);
            } else if meta.path.is_ident("until") {
                property.until = Some(string_value(&meta)?);
            } else {
                return Err(meta.error("unsupported swagger attribute on a field"));
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Constraints of the `#[validate(..)]` attributes of a field
fn field_constraints(attrs: &[Attribute]) -> syn::Result<Vec<Constraint>> {
    let mut constraints = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("validate")) {
        let mut kinds = Vec::new();
        let mut groups = Vec::new();
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("length") {
                let (min, max) = unsigned_bounds(&meta)?;
                kinds.push(ConstraintKind::Length { min, max });
            } else if meta.path.is_ident("count") {
                let (min, max) = unsigned_bounds(&meta)?;
                kinds.push(ConstraintKind::Count { min, max });
            } else if meta.path.is_ident("range") {
                let (min, max) = numeric_bounds(&meta)?;
                kinds.push(ConstraintKind::Range { min, max });
            } else if meta.path.is_ident("choice") {
                let content;
                parenthesized!(content in meta.input);
                let literals = content.parse_terminated(<Lit as Parse>::parse, Token![,])?;
                let choices = literals
                    .iter()
                    .map(|lit| literal_value(lit).map(Any::new))
                    .collect::<Option<Vec<Any>>>()
                    .ok_or_else(|| meta.error("choices must be string, number or bool literals"))?;
                kinds.push(ConstraintKind::Choice(choices));
            } else if meta.path.is_ident("not_blank") {
                kinds.push(ConstraintKind::NotBlank);
            } else if meta.path.is_ident("groups") {
                groups = string_list(&meta)?;
            } else {
                return Err(meta.error("unsupported validation constraint"));
            }
            Ok(())
        })?;
        constraints.extend(
            kinds
                .into_iter()
                .map(|kind| Constraint::new(kind).with_groups(groups.clone())),
        );
    }
    Ok(constraints)
}

fn method_annotations(attrs: &[Attribute]) -> syn::Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("swagger")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                annotations.push(Annotation::Tag(string_value(&meta)?));
                return Ok(());
            }
            if meta.path.is_ident("param") {
                annotations.push(Annotation::Parameter(parameter_annotation(&meta)?));
                return Ok(());
            }
            let method = meta
                .path
                .get_ident()
                .and_then(|ident| HttpMethod::parse(&ident.to_string()))
                .ok_or_else(|| meta.error("unsupported swagger attribute on a function"))?;
            annotations.push(Annotation::Route {
                method,
                path: string_value(&meta)?,
            });
            Ok(())
        })?;
    }
    Ok(annotations)
}

/// `param(location = "query", name = "page", type = "integer", ..)`
fn parameter_annotation(meta: &ParseNestedMeta) -> syn::Result<Parameter> {
    let mut location = ParameterLocation::Query;
    let mut name = None;
    let mut schema_type = None;
    let mut format = None;
    let mut required = None;
    let mut description = None;

    meta.parse_nested_meta(|entry| {
        if entry.path.is_ident("location") {
            let value = string_value(&entry)?;
            location = ParameterLocation::parse(&value)
                .ok_or_else(|| entry.error(format!("unknown parameter location `{}`", value)))?;
        } else if entry.path.is_ident("name") {
            name = Some(string_value(&entry)?);
        } else if entry.path.is_ident("type") {
            schema_type = Some(string_value(&entry)?);
        } else if entry.path.is_ident("format") {
            format = Some(string_value(&entry)?);
        } else if entry.path.is_ident("required") {
            required = Some(entry.value()?.parse::<syn::LitBool>()?.value);
        } else if entry.path.is_ident("description") {
            description = Some(string_value(&entry)?);
        } else {
            return Err(entry.error("unsupported parameter setting"));
        }
        Ok(())
    })?;

    let name = name.ok_or_else(|| meta.error("param needs a `name`"))?;
    let mut parameter = Parameter::new(location, name);
    parameter.set_description(description);
    if required.is_some() {
        parameter.set_required(required);
    }
    if let Some(general) = parameter.as_general_mut() {
        general.schema_type = schema_type;
        general.format = format;
    }
    Ok(parameter)
}

impl SourceVisitor {
    fn register_struct(&mut self, node: &syn::ItemStruct) -> syn::Result<()> {
        let name = node.ident.to_string();
        let options = class_options(&node.attrs)?;
        let serde = serde_options(&node.attrs);
        let doc = doc_text(&node.attrs).map(|text| DocBlock::parse(&text));

        let mut class = ClassDescriptor::new(&name);
        class.summary = doc.as_ref().and_then(|doc| doc.summary.clone());
        class.description = doc.and_then(|doc| doc.description);
        class.parent = options.extends;
        class.alias = options.alias;

        let mut constraints = Vec::new();
        if let syn::Fields::Named(fields) = &node.fields {
            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let field_name = ident.to_string();
                let field_serde = serde_options(&field.attrs);
                if field_serde.skip {
                    debug!("Skipping {}.{}", name, field_name);
                    continue;
                }
                let Some(type_ref) = type_descriptor(&field.ty) else {
                    warn!("Unsupported type for {}.{}", name, field_name);
                    continue;
                };

                let mut property = PropertyDescriptor::new(&field_name, type_ref);
                property.serialized_name = field_serde.rename.or_else(|| {
                    serde
                        .rename_all
                        .as_deref()
                        .and_then(|rule| rename_with(rule, &field_name))
                });
                property.summary = doc_text(&field.attrs)
                    .and_then(|text| DocBlock::parse(&text).summary);
                apply_property_options(&field.attrs, &mut property)?;

                for constraint in field_constraints(&field.attrs)? {
                    constraints.push((field_name.clone(), constraint));
                }
                class.properties.push(property);
            }
        }

        for (field_name, constraint) in constraints {
            self.registry.register_constraint(&name, &field_name, constraint);
        }

        if let Some((column, map)) = options.discriminator {
            self.registry.register_inheritance(&name, &column, map);
        }
        self.registry.register_class(class);
        Ok(())
    }

    fn register_enum(&mut self, node: &syn::ItemEnum) {
        let name = node.ident.to_string();
        if node
            .variants
            .iter()
            .any(|variant| !matches!(variant.fields, syn::Fields::Unit))
        {
            debug!("Skipping enum {} with data-carrying variants", name);
            return;
        }

        let serde = serde_options(&node.attrs);
        let variants: Vec<String> = node
            .variants
            .iter()
            .map(|variant| {
                let ident = variant.ident.to_string();
                serde_options(&variant.attrs)
                    .rename
                    .or_else(|| {
                        serde
                            .rename_all
                            .as_deref()
                            .and_then(|rule| rename_with(rule, &ident))
                    })
                    .unwrap_or(ident)
            })
            .collect();

        let mut class = ClassDescriptor::new(&name).with_variants(variants);
        if let Some(doc) = doc_text(&node.attrs).map(|text| DocBlock::parse(&text)) {
            class.summary = doc.summary;
            class.description = doc.description;
        }
        self.registry.register_class(class);
    }

    fn register_function(&mut self, name: &syn::Ident, attrs: &[Attribute]) -> syn::Result<()> {
        let text = doc_text(attrs);
        let deprecated = attrs.iter().any(|attr| attr.path().is_ident("deprecated"));
        let annotated = attrs.iter().any(|attr| attr.path().is_ident("swagger"));
        if text.is_none() && !deprecated && !annotated {
            return Ok(());
        }

        let mut doc = DocBlock::parse(text.as_deref().unwrap_or_default());
        doc.map_types(normalize_doc_type);
        if deprecated {
            doc.mark_deprecated(None);
        }

        let mut method = MethodDescriptor::new(name.to_string(), doc);
        method.class = self.current_impl.clone();
        method.annotations = method_annotations(attrs)?;
        debug!("Found documented method {}", method.qualified_name());
        self.registry.register_method(method);
        Ok(())
    }
}

impl<'ast> Visit<'ast> for SourceVisitor {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        if let Err(e) = self.register_struct(node) {
            warn!("Skipping struct {}: {}", node.ident, e);
        }
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.register_enum(node);
        syn::visit::visit_item_enum(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let outer = self.current_impl.take();
        if let Err(e) = self.register_function(&node.sig.ident, &node.attrs) {
            warn!("Skipping function {}: {}", node.sig.ident, e);
        }
        syn::visit::visit_item_fn(self, node);
        self.current_impl = outer;
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let self_type = match type_descriptor(&node.self_ty) {
            Some(TypeDescriptor::Named(name)) => Some(name),
            _ => None,
        };
        let outer = std::mem::replace(&mut self.current_impl, self_type);
        syn::visit::visit_item_impl(self, node);
        self.current_impl = outer;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        if let Err(e) = self.register_function(&node.sig.ident, &node.attrs) {
            warn!("Skipping method {}: {}", node.sig.ident, e);
        }
        syn::visit::visit_impl_item_fn(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::{
        ClassKind, DocTag, InheritanceMetadataProvider, TypeIntrospector,
        ValidationMetadataProvider,
    };
    use crate::parser::AstParser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::Path;

    fn introspect(source: &str) -> Registry {
        let parsed = AstParser::parse_str(Path::new("lib.rs"), source).unwrap();
        SourceIntrospector::introspect(&[parsed])
    }

    #[test]
    fn test_struct_fields_and_serde() {
        let registry = introspect(
            r#"
            mod models {
                /// A customer.
                ///
                /// Buys things.
                #[serde(rename_all = "camelCase")]
                pub struct Customer {
                    /// Identifier
                    pub id: u64,
                    pub display_name: Option<String>,
                    #[serde(rename = "mail")]
                    pub email: String,
                    #[serde(skip)]
                    pub password_hash: String,
                    pub tags: Vec<String>,
                    pub scores: HashMap<String, f32>,
                    pub orders: Option<Vec<Box<Order>>>,
                    pub created_at: DateTime<Utc>,
                }
            }
            "#,
        );

        let customer = registry.class("Customer").unwrap();
        assert_eq!(customer.summary.as_deref(), Some("A customer."));
        assert_eq!(customer.description.as_deref(), Some("Buys things."));

        let fields: Vec<(&str, Option<&str>, String)> = customer
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.serialized_name.as_deref(), p.type_ref.type_name()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("id", Some("id"), "long".to_string()),
                ("display_name", Some("displayName"), "string".to_string()),
                ("email", Some("mail"), "string".to_string()),
                ("tags", Some("tags"), "string[]".to_string()),
                ("scores", Some("scores"), "float[]".to_string()),
                ("orders", Some("orders"), "Order[]".to_string()),
                ("created_at", Some("createdAt"), "DateTime".to_string()),
            ]
        );
        assert_eq!(customer.properties[0].summary.as_deref(), Some("Identifier"));
        assert!(matches!(customer.properties[4].type_ref, TypeDescriptor::Map(_, _)));
    }

    #[test]
    fn test_swagger_and_validate_attributes() {
        let registry = introspect(
            r#"
            #[swagger(alias = "Ride", discriminator(column = "kind", map(car = "Car", bike = "Bike")))]
            pub struct Vehicle {
                pub kind: String,
                #[swagger(read_only, groups("public", "admin"), since = "1.1", until = "2.0")]
                #[validate(length(min = 1, max = 32), not_blank, groups("create"))]
                pub plate: String,
                #[validate(range(min = -10, max = 2.5))]
                #[validate(choice("a", 1, true))]
                pub level: f64,
            }

            #[swagger(extends = "Vehicle")]
            pub struct Car {
                #[validate(count(max = 4))]
                pub seats: Vec<Seat>,
            }
            "#,
        );

        let vehicle = registry.class("Vehicle").unwrap();
        assert_eq!(vehicle.alias.as_deref(), Some("Ride"));
        let plate = vehicle.property("plate").unwrap();
        assert!(plate.read_only);
        assert_eq!(plate.groups, vec!["public", "admin"]);
        assert_eq!(plate.since.as_deref(), Some("1.1"));
        assert_eq!(plate.until.as_deref(), Some("2.0"));

        let constraints = registry.constraints("Vehicle");
        assert_eq!(constraints.len(), 2);
        assert_eq!(constraints[0].property, "plate");
        assert_eq!(
            constraints[0].constraints,
            vec![
                Constraint::new(ConstraintKind::Length {
                    min: Some(1),
                    max: Some(32)
                })
                .with_groups(["create"]),
                Constraint::new(ConstraintKind::NotBlank).with_groups(["create"]),
            ]
        );
        assert_eq!(
            constraints[1].constraints,
            vec![
                Constraint::new(ConstraintKind::Range {
                    min: Some(Number::from(-10)),
                    max: Number::from_f64(2.5)
                }),
                Constraint::new(ConstraintKind::Choice(vec![
                    Any::new(json!("a")),
                    Any::new(json!(1)),
                    Any::new(json!(true)),
                ])),
            ]
        );

        assert_eq!(registry.class("Car").unwrap().parent.as_deref(), Some("Vehicle"));
        let car = registry.inheritance("Car").unwrap();
        assert_eq!(car.value.as_deref(), Some("car"));
        assert!(registry.inheritance("Vehicle").unwrap().root);
        assert_eq!(
            registry.constraints("Car")[0].constraints[0].kind,
            ConstraintKind::Count {
                min: None,
                max: Some(4)
            }
        );
    }

    #[test]
    fn test_unit_enums_only() {
        let registry = introspect(
            r#"
            #[serde(rename_all = "snake_case")]
            pub enum Status { Active, OnHold, #[serde(rename = "gone")] Deleted }
            pub enum Shape { Circle(f64), Square { side: f64 } }
            "#,
        );

        assert_eq!(
            registry.class("Status").unwrap().kind,
            ClassKind::Enum(vec!["active".into(), "on_hold".into(), "gone".into()])
        );
        assert!(registry.class("Shape").is_none());
    }

    #[test]
    fn test_documented_methods_and_annotations() {
        let registry = introspect(
            r#"
            pub struct OrderController;

            impl OrderController {
                /// List orders.
                ///
                /// @param page: int Page number
                /// @return Vec<Order> The orders
                /// @throws NotFound
                #[swagger(get = "/orders", tag = "orders")]
                #[swagger(param(location = "query", name = "page", type = "integer", required = false, description = "Page"))]
                pub fn list(&self, page: u32) -> Vec<Order> { Vec::new() }

                /// @return ()
                #[deprecated]
                pub fn purge(&self) {}

                fn helper(&self) {}
            }

            /// Health check.
            pub fn health() -> bool { true }
            "#,
        );

        let methods = registry.methods();
        let names: Vec<String> = methods.iter().map(|m| m.qualified_name()).collect();
        assert_eq!(names, vec!["OrderController.list", "OrderController.purge", "health"]);

        let list = methods[0];
        assert_eq!(list.doc.summary.as_deref(), Some("List orders."));
        assert!(list.doc.tags.contains(&DocTag::Return {
            types: vec!["Order[]".to_string()],
            description: Some("The orders".to_string()),
        }));
        assert_eq!(list.routes().collect::<Vec<_>>(), vec![(HttpMethod::Get, "/orders")]);

        let mut page = Parameter::new(ParameterLocation::Query, "page");
        page.set_description(Some("Page".to_string()));
        page.set_required(Some(false));
        if let Some(general) = page.as_general_mut() {
            general.schema_type = Some("integer".to_string());
        }
        assert_eq!(
            list.annotations,
            vec![
                Annotation::Route {
                    method: HttpMethod::Get,
                    path: "/orders".to_string()
                },
                Annotation::Tag("orders".to_string()),
                Annotation::Parameter(page),
            ]
        );

        let purge = methods[1];
        assert!(purge.doc.is_deprecated());
        assert!(purge.doc.tags.contains(&DocTag::Return {
            types: vec!["void".to_string()],
            description: None,
        }));
    }

    #[test]
    fn test_doc_tag_types_in_rustfmt_style() {
        let registry = introspect(
            r#"
            /// Find users.
            ///
            /// @param filters: HashMap<String, String> Active filters
            /// @return Result<User, ApiError> The matching user
            pub fn find(filters: HashMap<String, String>) -> Result<User, ApiError> { todo!() }
            "#,
        );

        let find = registry.methods()[0];
        assert_eq!(
            find.doc.tags,
            vec![
                DocTag::Param {
                    name: "filters".to_string(),
                    type_name: Some("string[]".to_string()),
                    description: Some("Active filters".to_string()),
                },
                DocTag::Return {
                    types: vec!["User".to_string()],
                    description: Some("The matching user".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_invalid_attribute_skips_the_item() {
        let registry = introspect(
            r#"
            pub struct Broken {
                #[validate(length(min = "one"))]
                pub name: String,
            }
            pub struct Fine { pub name: String }
            "#,
        );

        assert!(registry.class("Broken").is_none());
        assert!(registry.class("Fine").is_some());
    }

    #[test]
    fn test_doc_type_normalization() {
        assert_eq!(normalize_doc_type("Vec<Option<User>>"), "User[]");
        assert_eq!(normalize_doc_type("u64"), "long");
        assert_eq!(normalize_doc_type("()"), "void");
        assert_eq!(normalize_doc_type("User[]"), "User[]");
        assert_eq!(normalize_doc_type("int"), "int");
    }
}
