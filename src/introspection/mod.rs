//! Metadata consumed by the extractors.
//!
//! Extractors never look at source code directly. They query three narrow traits:
//! [`TypeIntrospector`] for classes and documented methods, [`ValidationMetadataProvider`]
//! for validation constraints and [`InheritanceMetadataProvider`] for discriminator
//! mappings. [`Registry`] implements all three in memory and is filled either by hand
//! or by the [`source::SourceIntrospector`].

pub mod docblock;
pub mod naming;
pub mod source;

pub use docblock::{DocBlock, DocTag};
pub use naming::{
    CamelCaseNamingStrategy, IdenticalNamingStrategy, PropertyNamingStrategy,
    SerializedNameStrategy,
};

use crate::schema::{Any, HttpMethod, Parameter};
use indexmap::IndexMap;
use serde_json::Number;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Group that constraints without explicit groups belong to
pub const DEFAULT_VALIDATION_GROUP: &str = "Default";

/// Declared type of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A primitive alias or a class name
    Named(String),
    /// Collection of the element type
    List(Box<TypeDescriptor>),
    /// Map from key type to value type
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(key), Box::new(value))
    }

    /// Whether this is the string type, the only key type rendered as an object map
    pub fn is_string(&self) -> bool {
        matches!(self, TypeDescriptor::Named(name) if name == "string")
    }

    /// Type name in the doc-tag notation (`T[]` for lists)
    pub fn type_name(&self) -> String {
        match self {
            TypeDescriptor::Named(name) => name.clone(),
            TypeDescriptor::List(element) => format!("{}[]", element.type_name()),
            TypeDescriptor::Map(_, value) => format!("{}[]", value.type_name()),
        }
    }
}

/// Whether a class is a plain object or an enumeration of names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClassKind {
    #[default]
    Object,
    Enum(Vec<String>),
}

/// Introspected class (a Rust struct or unit enum)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDescriptor {
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Class this one extends
    pub parent: Option<String>,
    pub kind: ClassKind,
    /// Own properties in declaration order
    pub properties: Vec<PropertyDescriptor>,
    /// Definition name used instead of the class name
    pub alias: Option<String>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = ClassKind::Enum(variants.into_iter().map(Into::into).collect());
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// Introspected property of a class
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Explicit wire name, overrides the naming strategy
    pub serialized_name: Option<String>,
    pub type_ref: TypeDescriptor,
    /// Serializer groups, empty means always exposed
    pub groups: Vec<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub read_only: bool,
    pub summary: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_ref: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            serialized_name: None,
            type_ref,
            groups: Vec::new(),
            since: None,
            until: None,
            read_only: false,
            summary: None,
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_serialized_name(mut self, name: impl Into<String>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    pub fn with_versions(mut self, since: Option<&str>, until: Option<&str>) -> Self {
        self.since = since.map(str::to_string);
        self.until = until.map(str::to_string);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Attribute attached to a documented method
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Parameter(Parameter),
    Tag(String),
    /// HTTP method and path template the method is served at
    Route { method: HttpMethod, path: String },
}

/// Introspected method (or free function) with its parsed documentation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodDescriptor {
    pub name: String,
    /// Owning type for methods of an `impl` block
    pub class: Option<String>,
    pub doc: DocBlock,
    pub annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, doc: DocBlock) -> Self {
        Self {
            name: name.into(),
            doc,
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// `Class.method` or just the function name
    pub fn qualified_name(&self) -> String {
        match &self.class {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }

    pub fn routes(&self) -> impl Iterator<Item = (HttpMethod, &str)> {
        self.annotations.iter().filter_map(|annotation| match annotation {
            Annotation::Route { method, path } => Some((*method, path.as_str())),
            _ => None,
        })
    }
}

/// Validation constraint kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    Length { min: Option<u64>, max: Option<u64> },
    Range { min: Option<Number>, max: Option<Number> },
    Count { min: Option<u64>, max: Option<u64> },
    Choice(Vec<Any>),
    NotBlank,
}

/// A constraint and the validation groups it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Empty means the default group
    pub groups: Vec<String>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            groups: Vec::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ConstraintKind::Length { .. } => "Length",
            ConstraintKind::Range { .. } => "Range",
            ConstraintKind::Count { .. } => "Count",
            ConstraintKind::Choice(_) => "Choice",
            ConstraintKind::NotBlank => "NotBlank",
        }
    }

    /// Whether the constraint applies when validating any of the requested groups
    pub fn in_groups(&self, requested: &BTreeSet<String>) -> bool {
        if self.groups.is_empty() {
            return requested.contains(DEFAULT_VALIDATION_GROUP);
        }
        self.groups.iter().any(|group| requested.contains(group))
    }
}

/// Constraints declared on one property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyConstraints {
    pub property: String,
    pub constraints: Vec<Constraint>,
}

/// Discriminator mapping of a class taking part in an inheritance hierarchy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InheritanceMapping {
    pub discriminator_column: String,
    /// Discriminator value -> class name, in declaration order
    pub discriminator_map: IndexMap<String, String>,
    /// Whether the class is the root of the hierarchy
    pub root: bool,
    /// Discriminator value identifying this class
    pub value: Option<String>,
}

/// Access to introspected classes and documented methods
pub trait TypeIntrospector {
    fn class(&self, name: &str) -> Option<&ClassDescriptor>;

    fn methods(&self) -> Vec<&MethodDescriptor>;

    /// Parent chain of a class, nearest parent first. Stops on unknown classes and cycles.
    fn ancestors(&self, name: &str) -> Vec<&ClassDescriptor> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(name.to_string());
        let mut current = self.class(name).and_then(|class| class.parent.clone());
        while let Some(parent_name) = current {
            if !seen.insert(parent_name.clone()) {
                break;
            }
            match self.class(&parent_name) {
                Some(parent) => {
                    current = parent.parent.clone();
                    ancestors.push(parent);
                }
                None => break,
            }
        }
        ancestors
    }
}

/// Per-class validation metadata
pub trait ValidationMetadataProvider {
    /// Constrained properties declared by the class itself
    fn constraints(&self, class: &str) -> &[PropertyConstraints];
}

/// Per-class inheritance metadata
pub trait InheritanceMetadataProvider {
    fn inheritance(&self, class: &str) -> Option<&InheritanceMapping>;
}

/// In-memory metadata registry
#[derive(Debug, Default)]
pub struct Registry {
    classes: IndexMap<String, ClassDescriptor>,
    methods: Vec<MethodDescriptor>,
    constraints: HashMap<String, Vec<PropertyConstraints>>,
    inheritance: HashMap<String, InheritanceMapping>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(&mut self, class: ClassDescriptor) -> &mut Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    pub fn register_method(&mut self, method: MethodDescriptor) -> &mut Self {
        self.methods.push(method);
        self
    }

    /// Add a constraint to a class property, keeping declaration order
    pub fn register_constraint(
        &mut self,
        class: &str,
        property: &str,
        constraint: Constraint,
    ) -> &mut Self {
        let entries = self.constraints.entry(class.to_string()).or_default();
        match entries.iter_mut().find(|entry| entry.property == property) {
            Some(entry) => entry.constraints.push(constraint),
            None => entries.push(PropertyConstraints {
                property: property.to_string(),
                constraints: vec![constraint],
            }),
        }
        self
    }

    /// Declare a class as the root of a discriminated hierarchy.
    ///
    /// Every mapped class except the root receives its own mapping with its value.
    pub fn register_inheritance<I, V, C>(&mut self, root: &str, column: &str, map: I) -> &mut Self
    where
        I: IntoIterator<Item = (V, C)>,
        V: Into<String>,
        C: Into<String>,
    {
        let discriminator_map: IndexMap<String, String> = map
            .into_iter()
            .map(|(value, class)| (value.into(), class.into()))
            .collect();

        for (value, class) in &discriminator_map {
            let mapping = InheritanceMapping {
                discriminator_column: column.to_string(),
                discriminator_map: discriminator_map.clone(),
                root: class == root,
                value: Some(value.clone()),
            };
            self.inheritance.insert(class.clone(), mapping);
        }

        let root_value = discriminator_map
            .iter()
            .find(|(_, class)| class.as_str() == root)
            .map(|(value, _)| value.clone());
        self.inheritance.insert(
            root.to_string(),
            InheritanceMapping {
                discriminator_column: column.to_string(),
                discriminator_map,
                root: true,
                value: root_value,
            },
        );
        self
    }

    /// Set the definition name used for a class
    pub fn set_alias(&mut self, class: &str, alias: &str) -> bool {
        match self.classes.get_mut(class) {
            Some(descriptor) => {
                descriptor.alias = Some(alias.to_string());
                true
            }
            None => false,
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl TypeIntrospector for Registry {
    fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    fn methods(&self) -> Vec<&MethodDescriptor> {
        self.methods.iter().collect()
    }
}

impl ValidationMetadataProvider for Registry {
    fn constraints(&self, class: &str) -> &[PropertyConstraints] {
        self.constraints
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl InheritanceMetadataProvider for Registry {
    fn inheritance(&self, class: &str) -> Option<&InheritanceMapping> {
        self.inheritance.get(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestors_nearest_first_and_cycle_safe() {
        let mut registry = Registry::new();
        registry
            .register_class(ClassDescriptor::new("Base"))
            .register_class(ClassDescriptor::new("Middle").with_parent("Base"))
            .register_class(ClassDescriptor::new("Leaf").with_parent("Middle"))
            .register_class(ClassDescriptor::new("Ping").with_parent("Pong"))
            .register_class(ClassDescriptor::new("Pong").with_parent("Ping"));

        let names: Vec<&str> = registry
            .ancestors("Leaf")
            .iter()
            .map(|class| class.name.as_str())
            .collect();
        assert_eq!(names, vec!["Middle", "Base"]);

        let cyclic: Vec<&str> = registry
            .ancestors("Ping")
            .iter()
            .map(|class| class.name.as_str())
            .collect();
        assert_eq!(cyclic, vec!["Pong"]);
    }

    #[test]
    fn test_constraint_groups() {
        let default = Constraint::new(ConstraintKind::NotBlank);
        let admin = Constraint::new(ConstraintKind::NotBlank).with_groups(["admin"]);
        let requested: BTreeSet<String> = [DEFAULT_VALIDATION_GROUP.to_string()].into();

        assert!(default.in_groups(&requested));
        assert!(!admin.in_groups(&requested));
        assert!(admin.in_groups(&["admin".to_string()].into()));
    }

    #[test]
    fn test_register_constraint_groups_by_property() {
        let mut registry = Registry::new();
        registry
            .register_constraint("User", "name", Constraint::new(ConstraintKind::NotBlank))
            .register_constraint(
                "User",
                "name",
                Constraint::new(ConstraintKind::Length {
                    min: Some(1),
                    max: None,
                }),
            );

        let constraints = registry.constraints("User");
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].constraints.len(), 2);
        assert!(registry.constraints("Unknown").is_empty());
    }

    #[test]
    fn test_register_inheritance() {
        let mut registry = Registry::new();
        registry.register_inheritance("Vehicle", "kind", [("car", "Car"), ("bike", "Bike")]);

        let root = registry.inheritance("Vehicle").unwrap();
        assert!(root.root);
        assert_eq!(root.value, None);

        let car = registry.inheritance("Car").unwrap();
        assert!(!car.root);
        assert_eq!(car.value.as_deref(), Some("car"));
        assert_eq!(car.discriminator_column, "kind");
    }

    #[test]
    fn test_type_name_notation() {
        let nested = TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::named("int")));
        assert_eq!(nested.type_name(), "int[][]");
        assert!(TypeDescriptor::named("string").is_string());
    }
}
