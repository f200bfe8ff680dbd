//! Package registry and type resolution.
//!
//! The registry owns the tree of package namespace nodes built from the
//! full descriptor set. It follows a two-phase contract: a build phase
//! (sequential [`PackageRegistry::register`] calls) and a frozen read-only
//! phase in which resolution and conversion run; nothing mutates the tree
//! after construction. Nodes live in an arena and refer to their parent by
//! index, a non-owning back-reference used only for upward name-resolution
//! walks.

use std::collections::HashMap;

use tracing::debug;

use crate::descriptor::{FileDescriptor, MessageDescriptor};

/// Arena index of a package node.
pub(crate) type NodeId = usize;

const ROOT: NodeId = 0;

/// One segment of the package namespace.
#[derive(Debug)]
struct PackageNode<'a> {
    /// Fully-qualified name with a leading separator; empty for the root.
    name: String,
    parent: Option<NodeId>,
    /// Immediate children, keyed by single path segments.
    children: HashMap<String, NodeId>,
    /// Message definitions declared in this package, by local name.
    types: HashMap<String, &'a MessageDescriptor>,
}

/// The package tree for one conversion run, borrowing the immutable
/// descriptor set.
#[derive(Debug)]
pub struct PackageRegistry<'a> {
    nodes: Vec<PackageNode<'a>>,
}

impl<'a> Default for PackageRegistry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PackageRegistry<'a> {
    /// Create a registry holding only the unnamed root package.
    pub fn new() -> Self {
        Self {
            nodes: vec![PackageNode {
                name: String::new(),
                parent: None,
                children: HashMap::new(),
                types: HashMap::new(),
            }],
        }
    }

    /// Build a registry from a complete descriptor set, registering every
    /// top-level message of every file.
    pub fn from_files(files: &'a [FileDescriptor]) -> Self {
        let mut registry = Self::new();
        for file in files {
            for message in &file.messages {
                registry.register(file.package.as_deref(), message);
            }
        }
        registry
    }

    /// Register one message definition under its package.
    ///
    /// Walks the dotted package name from the root, creating missing nodes
    /// as needed. Cannot fail; re-registration under the same name replaces
    /// the previous definition (schema identifiers are unique, so this does
    /// not happen with well-formed input).
    pub fn register(&mut self, package: Option<&str>, message: &'a MessageDescriptor) {
        let mut current = ROOT;
        if let Some(package) = package {
            for segment in package.split('.') {
                // A leading separator produces an empty first segment.
                if current == ROOT && segment.is_empty() {
                    continue;
                }
                current = self.child_or_insert(current, segment);
            }
        }
        self.nodes[current]
            .types
            .insert(message.name.clone(), message);
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(&existing) = self.nodes[parent].children.get(segment) {
            return existing;
        }
        let name = format!("{}.{}", self.nodes[parent].name, segment);
        let id = self.nodes.len();
        self.nodes.push(PackageNode {
            name,
            parent: Some(parent),
            children: HashMap::new(),
            types: HashMap::new(),
        });
        self.nodes[parent].children.insert(segment.to_string(), id);
        id
    }

    /// The node for a dotted package name, if that package was registered.
    pub(crate) fn lookup_package(&self, package: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for segment in package.split('.') {
            if current == ROOT && segment.is_empty() {
                continue;
            }
            current = *self.nodes[current].children.get(segment)?;
        }
        Some(current)
    }

    /// The fully-qualified name of a package node (empty for the root).
    pub(crate) fn node_name(&self, node: NodeId) -> &str {
        &self.nodes[node].name
    }

    pub(crate) fn root(&self) -> NodeId {
        ROOT
    }

    /// Walk a dotted path through a message's nested-type list only.
    ///
    /// One candidate strategy among several; a missing segment is reported
    /// to the caller as `None`, not treated as an error.
    pub fn relative_nested_lookup(
        message: &'a MessageDescriptor,
        path: &str,
    ) -> Option<&'a MessageDescriptor> {
        let mut current = message;
        for component in path.split('.') {
            match current.nested_types.iter().find(|n| n.name == component) {
                Some(nested) => current = nested,
                None => {
                    debug!(
                        component = %component,
                        message = %current.name,
                        "no such nested message"
                    );
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Resolve a field's declared type name to a concrete message
    /// definition and its fully-qualified name.
    ///
    /// Strategies, in order: nested lookup relative to the enclosing
    /// message (non-absolute names only), the current package's type map,
    /// ancestor packages, and finally an absolute walk from the root. Only
    /// exhaustion of every strategy yields `None`; the caller turns that
    /// into a terminal error.
    pub(crate) fn resolve(
        &self,
        scope: NodeId,
        type_name: &str,
        enclosing: Option<(&str, &'a MessageDescriptor)>,
    ) -> Option<(String, &'a MessageDescriptor)> {
        if let Some(absolute) = type_name.strip_prefix('.') {
            return self.resolve_in(ROOT, absolute);
        }

        if let Some((enclosing_name, enclosing_message)) = enclosing {
            if let Some(found) = Self::relative_nested_lookup(enclosing_message, type_name) {
                return Some((format!("{enclosing_name}.{type_name}"), found));
            }
        }

        let mut node = Some(scope);
        while let Some(current) = node {
            if let Some(found) = self.resolve_in(current, type_name) {
                return Some(found);
            }
            node = self.nodes[current].parent;
        }
        None
    }

    /// Resolve a dotted name inside one package node: the first segment may
    /// name a local type (remaining segments walk nested types) or a child
    /// package (remaining segments recurse).
    fn resolve_in(&self, node: NodeId, name: &str) -> Option<(String, &'a MessageDescriptor)> {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };

        if let Some(&message) = self.nodes[node].types.get(head) {
            let base = format!("{}.{}", self.nodes[node].name, head);
            return match rest {
                None => Some((base, message)),
                Some(rest) => Self::relative_nested_lookup(message, rest)
                    .map(|nested| (format!("{base}.{rest}"), nested)),
            };
        }

        let &child = self.nodes[node].children.get(head)?;
        rest.and_then(|rest| self.resolve_in(child, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MessageDescriptor;

    fn message(name: &str) -> MessageDescriptor {
        MessageDescriptor::new(name)
    }

    #[test]
    fn test_register_and_lookup_package() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some("com.example"), &person);

        let node = registry.lookup_package("com.example").unwrap();
        assert_eq!(registry.node_name(node), ".com.example");
        assert!(registry.lookup_package("com.missing").is_none());
    }

    #[test]
    fn test_register_skips_leading_separator() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some(".com.example"), &person);

        assert!(registry.lookup_package("com.example").is_some());
    }

    #[test]
    fn test_register_without_package_lands_in_root() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(None, &person);

        let (qualified, _) = registry.resolve(registry.root(), "Person", None).unwrap();
        assert_eq!(qualified, ".Person");
    }

    #[test]
    fn test_resolve_in_current_package() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some("com.example"), &person);

        let scope = registry.lookup_package("com.example").unwrap();
        let (qualified, found) = registry.resolve(scope, "Person", None).unwrap();
        assert_eq!(qualified, ".com.example.Person");
        assert_eq!(found.name, "Person");
    }

    #[test]
    fn test_resolve_walks_up_ancestors() {
        let shared = message("Shared");
        let leaf = message("Leaf");
        let mut registry = PackageRegistry::new();
        registry.register(Some("com"), &shared);
        registry.register(Some("com.example.deep"), &leaf);

        let scope = registry.lookup_package("com.example.deep").unwrap();
        let (qualified, _) = registry.resolve(scope, "Shared", None).unwrap();
        assert_eq!(qualified, ".com.Shared");
    }

    #[test]
    fn test_resolve_absolute() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some("com.example"), &person);

        let elsewhere = registry.root();
        let (qualified, _) = registry
            .resolve(elsewhere, ".com.example.Person", None)
            .unwrap();
        assert_eq!(qualified, ".com.example.Person");
    }

    #[test]
    fn test_resolve_nested_through_registered_type() {
        let parent = message("Parent").with_nested_type(message("Child"));
        let mut registry = PackageRegistry::new();
        registry.register(Some("pkg"), &parent);

        let scope = registry.lookup_package("pkg").unwrap();
        let (qualified, found) = registry.resolve(scope, "Parent.Child", None).unwrap();
        assert_eq!(qualified, ".pkg.Parent.Child");
        assert_eq!(found.name, "Child");
    }

    #[test]
    fn test_resolve_prefers_enclosing_nested() {
        let enclosing = message("Outer").with_nested_type(message("Inner"));
        let mut registry = PackageRegistry::new();
        registry.register(Some("pkg"), &enclosing);

        let scope = registry.lookup_package("pkg").unwrap();
        let (qualified, _) = registry
            .resolve(scope, "Inner", Some((".pkg.Outer", &enclosing)))
            .unwrap();
        assert_eq!(qualified, ".pkg.Outer.Inner");
    }

    #[test]
    fn test_relative_nested_lookup_missing_segment() {
        let parent = message("Parent").with_nested_type(message("Child"));
        assert!(PackageRegistry::relative_nested_lookup(&parent, "Child").is_some());
        assert!(PackageRegistry::relative_nested_lookup(&parent, "Child.Grandchild").is_none());
        assert!(PackageRegistry::relative_nested_lookup(&parent, "Other").is_none());
    }

    #[test]
    fn test_resolve_exhausted_strategies() {
        let person = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some("com.example"), &person);

        let scope = registry.lookup_package("com.example").unwrap();
        assert!(registry.resolve(scope, "Missing", None).is_none());
        assert!(registry.resolve(scope, ".com.Missing", None).is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let first = message("Person").with_nested_type(message("Marker"));
        let second = message("Person");
        let mut registry = PackageRegistry::new();
        registry.register(Some("pkg"), &first);
        registry.register(Some("pkg"), &second);

        let scope = registry.lookup_package("pkg").unwrap();
        let (_, found) = registry.resolve(scope, "Person", None).unwrap();
        assert!(found.nested_types.is_empty());
    }
}
