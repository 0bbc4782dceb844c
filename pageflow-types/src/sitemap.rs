//! Sitemap nodes and the flat, ordered sitemap.
//!
//! The flat sitemap maps a request path to its routing metadata. Key order is
//! significant: the first entry is the site's home page.

use crate::ids::{ContentId, PageId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Redirect attached to a sitemap node.
///
/// Accepts both the bare-string and the `{ url, target }` payload shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RedirectRepr")]
pub struct Redirect {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RedirectRepr {
    Url(String),
    Full {
        url: String,
        #[serde(default)]
        target: Option<String>,
    },
}

impl From<RedirectRepr> for Redirect {
    fn from(repr: RedirectRepr) -> Self {
        match repr {
            RedirectRepr::Url(url) => Self { url, target: None },
            RedirectRepr::Full { url, target } => Self { url, target },
        }
    }
}

/// Where a node is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub menu: bool,
    pub sitemap: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            menu: true,
            sitemap: true,
        }
    }
}

/// Routing metadata for a single path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNode {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub menu_text: String,
    #[serde(rename = "pageID")]
    pub page_id: PageId,
    /// Content item bound to this path ("dynamic" page), if any.
    #[serde(rename = "contentID", default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    #[serde(default)]
    pub redirect: Option<Redirect>,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub visible: Visibility,
}

impl SitemapNode {
    /// Creates a plain page node.
    #[must_use]
    pub fn new(path: impl Into<String>, page_id: PageId) -> Self {
        Self {
            path: path.into(),
            title: String::new(),
            name: String::new(),
            menu_text: String::new(),
            page_id,
            content_id: None,
            redirect: None,
            is_folder: false,
            visible: Visibility::default(),
        }
    }

    /// Binds a content item to this node.
    #[must_use]
    pub fn with_content(mut self, content_id: ContentId) -> Self {
        self.content_id = Some(content_id);
        self
    }

    /// Sets a redirect target.
    #[must_use]
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(Redirect {
            url: url.into(),
            target: None,
        });
        self
    }

    /// Marks the node as a folder.
    #[must_use]
    pub fn folder(mut self) -> Self {
        self.is_folder = true;
        self
    }

    /// The bound content item, when the binding is a real (positive) ID.
    #[must_use]
    pub fn bound_content(&self) -> Option<ContentId> {
        self.content_id.filter(ContentId::is_bound)
    }

    #[must_use]
    pub fn has_redirect(&self) -> bool {
        self.redirect.as_ref().is_some_and(|r| !r.url.is_empty())
    }

    /// Whether the node produces a page of its own. Redirects and folders don't.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        !self.has_redirect() && !self.is_folder
    }
}

/// A sitemap node together with its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedSitemapNode {
    #[serde(flatten)]
    pub node: SitemapNode,
    #[serde(default)]
    pub children: Vec<NestedSitemapNode>,
}

/// Flat sitemap for one channel and language, keyed by path in service order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sitemap(IndexMap<String, SitemapNode>);

impl Sitemap {
    /// Creates an empty sitemap.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builds a sitemap keyed by each node's own path, keeping iteration order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = SitemapNode>) -> Self {
        Self(nodes.into_iter().map(|n| (n.path.clone(), n)).collect())
    }

    /// Inserts a node under an explicit path key.
    pub fn insert(&mut self, path: impl Into<String>, node: SitemapNode) {
        self.0.insert(path.into(), node);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact key lookup.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&SitemapNode> {
        self.0.get(path)
    }

    /// The home node: the first entry in key order.
    #[must_use]
    pub fn home(&self) -> Option<(&str, &SitemapNode)> {
        self.0.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves a request path. `/` maps to [`Sitemap::home`], anything else
    /// is looked up verbatim.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&SitemapNode> {
        self.lookup_entry(path).map(|(_, node)| node)
    }

    /// Like [`Sitemap::lookup`], also returning the matched key.
    #[must_use]
    pub fn lookup_entry(&self, path: &str) -> Option<(&str, &SitemapNode)> {
        if path == "/" {
            self.home()
        } else {
            self.0.get_key_value(path).map(|(k, v)| (k.as_str(), v))
        }
    }

    /// Iterates `(path, node)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SitemapNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Paths that render a page of their own, in key order.
    pub fn routable_paths(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, node)| node.is_routable())
            .map(|(path, _)| path)
    }

    /// First path whose node is bound to `content_id`.
    #[must_use]
    pub fn path_for_content(&self, content_id: ContentId) -> Option<&str> {
        self.iter()
            .find(|(_, node)| node.content_id == Some(content_id))
            .map(|(path, _)| path)
    }

    /// Rebuilds the nested tree from path prefixes. A node's parent is the
    /// nearest ancestor path present in the sitemap; nodes without one are
    /// roots. Sibling order follows key order.
    #[must_use]
    pub fn nested(&self) -> Vec<NestedSitemapNode> {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.0.len()];
        let mut roots = Vec::new();

        for (index, path) in self.0.keys().enumerate() {
            match self.parent_index(path) {
                Some(parent) => children[parent].push(index),
                None => roots.push(index),
            }
        }

        roots
            .into_iter()
            .filter_map(|index| self.build_nested(index, &children))
            .collect()
    }

    fn parent_index(&self, path: &str) -> Option<usize> {
        let mut current = path.trim_end_matches('/');
        while let Some(cut) = current.rfind('/') {
            if cut == 0 {
                break;
            }
            current = &current[..cut];
            if let Some(index) = self.0.get_index_of(current) {
                return Some(index);
            }
        }
        None
    }

    fn build_nested(&self, index: usize, children: &[Vec<usize>]) -> Option<NestedSitemapNode> {
        let (path, node) = self.0.get_index(index)?;
        let mut node = node.clone();
        if node.path.is_empty() {
            node.path = path.clone();
        }
        Some(NestedSitemapNode {
            node,
            children: children[index]
                .iter()
                .filter_map(|&child| self.build_nested(child, children))
                .collect(),
        })
    }
}

impl FromIterator<(String, SitemapNode)> for Sitemap {
    fn from_iter<T: IntoIterator<Item = (String, SitemapNode)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
