use std::sync::Arc;

use indexmap::IndexMap;

use super::{EndpointContext, Method};
use crate::schema::{DiscoveryDocument, ResourceSchema};

/// A node of the generated client tree: named methods and nested resources.
///
/// The tree mirrors the `resources`/`methods` layout of the discovery document,
/// in declaration order. A method and a resource may share a name.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    methods: IndexMap<String, Method>,
    resources: IndexMap<String, Resource>,
}

impl Resource {
    /// Returns the method with this name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Returns the nested resource with this name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Methods of this node, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Method)> {
        self.methods.iter().map(|(name, method)| (name.as_str(), method))
    }

    /// Nested resources of this node, in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources
            .iter()
            .map(|(name, resource)| (name.as_str(), resource))
    }

    /// Finds a method by dotted path, e.g. `"files.permissions.list"`.
    pub fn lookup(&self, path: &str) -> Option<&Method> {
        let (parents, name) = match path.rsplit_once('.') {
            Some((parents, name)) => (Some(parents), name),
            None => (None, path),
        };

        let mut node = self;
        for segment in parents.into_iter().flat_map(|it| it.split('.')) {
            node = node.resource(segment)?;
        }
        node.method(name)
    }

    /// Adds the methods and resources of `schema` to this node, recursively.
    ///
    /// `root` is passed down unchanged so every method resolves its path against
    /// the top-level `rootUrl` and `servicePath`.
    pub(crate) fn apply(
        &mut self,
        root: &Arc<DiscoveryDocument>,
        schema: &ResourceSchema,
        context: &Arc<EndpointContext>,
    ) {
        for (name, method) in &schema.methods {
            let method = Method::synthesize(Arc::clone(root), method.clone(), Arc::clone(context));
            self.methods.insert(name.clone(), method);
        }

        for (name, resource) in &schema.resources {
            self.resources
                .entry(name.clone())
                .or_default()
                .apply(root, resource, context);
        }
    }
}
