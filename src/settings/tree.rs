//! Hierarchical settings store with change notification and JSON persistence

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use super::{
    defaults::{default_root, is_excluded},
    value::{Leaf, Listener, SubscriptionId, Value, ValueKind},
};
use crate::error::SettingsError;

/// A node in the settings tree
#[derive(Debug)]
pub enum Node {
    Group(Group),
    Leaf(Leaf),
}

/// Named children kept in declaration order
#[derive(Debug, Default)]
pub struct Group {
    children: Vec<(String, Node)>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leaf(mut self, name: &str, leaf: Leaf) -> Self {
        self.children.push((name.to_string(), Node::Leaf(leaf)));
        self
    }

    pub fn with_group(mut self, name: &str, group: Group) -> Self {
        self.children.push((name.to_string(), Node::Group(group)));
        self
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }
}

/// Settings tree bound to an optional JSON file.
///
/// The first access on a tree with a bound but unread file loads it.
#[derive(Debug)]
pub struct SettingsTree {
    root: Group,
    path: Option<PathBuf>,
    loaded: bool,
    next_subscription: u64,
}

impl Default for SettingsTree {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SettingsTree {
    /// Create a tree holding the built-in defaults
    pub fn new(path: Option<PathBuf>) -> Self {
        Self::with_root(default_root(), path)
    }

    pub fn with_root(root: Group, path: Option<PathBuf>) -> Self {
        Self {
            root,
            path,
            loaded: false,
            next_subscription: 0,
        }
    }

    /// Currently bound settings file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn ensure_loaded(&mut self) -> Result<(), SettingsError> {
        if !self.loaded && self.path.is_some() {
            // Only ever attempted once, even if it fails
            self.loaded = true;
            debug!("Lazily loading settings file");
            self.read(None)?;
        }
        Ok(())
    }

    fn node(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('.');
        let mut node = self.root.child(segments.next()?)?;
        for segment in segments {
            node = match node {
                Node::Group(group) => group.child(segment)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    fn leaf(&self, path: &str) -> Option<&Leaf> {
        match self.node(path)? {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    fn leaf_mut(&mut self, path: &str) -> Option<&mut Leaf> {
        let mut segments = path.split('.');
        let mut node = self.root.child_mut(segments.next()?)?;
        for segment in segments {
            node = match node {
                Node::Group(group) => group.child_mut(segment)?,
                Node::Leaf(_) => return None,
            };
        }
        match node {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    /// Get the value of the leaf at a dotted path such as `colour.primary`
    pub fn get(&mut self, path: &str) -> Result<Value, SettingsError> {
        self.ensure_loaded()?;
        self.leaf(path)
            .map(|leaf| leaf.value().clone())
            .ok_or_else(|| SettingsError::KeyNotFound(path.to_string()))
    }

    /// Get the value at `path`, or `default` if no such leaf exists.
    /// Never mutates the tree beyond the one-off lazy load.
    pub fn get_or(&mut self, path: &str, default: impl Into<Value>) -> Value {
        if let Err(e) = self.ensure_loaded() {
            warn!("Failed to load settings file: {}", e);
        }
        self.leaf(path)
            .map(|leaf| leaf.value().clone())
            .unwrap_or_else(|| default.into())
    }

    pub fn get_int(&mut self, path: &str) -> Result<i64, SettingsError> {
        self.get(path)?
            .as_int()
            .ok_or_else(|| SettingsError::invalid(path, "not an integer setting"))
    }

    pub fn get_str(&mut self, path: &str) -> Result<String, SettingsError> {
        match self.get(path)? {
            Value::Str(s) => Ok(s),
            Value::Int(_) => Err(SettingsError::invalid(path, "not a text setting")),
        }
    }

    /// Declared type of the leaf at `path`
    pub fn kind(&self, path: &str) -> Option<ValueKind> {
        self.leaf(path).map(Leaf::kind)
    }

    /// Replace a leaf's value and synchronously notify its listeners
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), SettingsError> {
        self.ensure_loaded()?;
        let leaf = self
            .leaf_mut(path)
            .ok_or_else(|| SettingsError::KeyNotFound(path.to_string()))?;
        let value = leaf.kind().convert(path, value.into())?;
        leaf.store(value);
        Ok(())
    }

    /// Register a listener called with the new value on every later `set` of `path`
    pub fn subscribe<F>(&mut self, path: &str, listener: F) -> Result<SubscriptionId, SettingsError>
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.ensure_loaded()?;
        let id = SubscriptionId(self.next_subscription);
        let leaf = self
            .leaf_mut(path)
            .ok_or_else(|| SettingsError::KeyNotFound(path.to_string()))?;
        leaf.subscribe(id, Box::new(listener) as Listener);
        self.next_subscription += 1;
        Ok(id)
    }

    pub fn unsubscribe(&mut self, path: &str, id: SubscriptionId) -> bool {
        self.leaf_mut(path)
            .map(|leaf| leaf.unsubscribe(id))
            .unwrap_or(false)
    }

    /// Child names of a group in declaration order; an empty path lists the top level
    pub fn keys(&self, group_path: &str) -> Result<Vec<String>, SettingsError> {
        let group = if group_path.is_empty() {
            &self.root
        } else {
            match self.node(group_path) {
                Some(Node::Group(group)) => group,
                _ => return Err(SettingsError::KeyNotFound(group_path.to_string())),
            }
        };
        Ok(group.children().map(|(name, _)| name.to_string()).collect())
    }

    /// Load values from the bound file, or from `from` which then becomes bound.
    ///
    /// Every document value is converted before any leaf changes, so a failed
    /// read leaves the tree and the bound path as they were.
    pub fn read(&mut self, from: Option<&Path>) -> Result<(), SettingsError> {
        let target = match from {
            Some(path) => path.to_path_buf(),
            None => self
                .path
                .clone()
                .ok_or_else(|| SettingsError::FileNotFound("settings filename not provided".into()))?,
        };
        if !target.exists() {
            return Err(SettingsError::FileNotFound(format!(
                "settings file does not exist ({})",
                target.display()
            )));
        }

        let mut updates = Vec::new();
        if fs::metadata(&target)?.len() > 0 {
            let contents = fs::read_to_string(&target)?;
            let document: serde_json::Value = serde_json::from_str(&contents)?;
            collect_updates(&self.root, "", &document, &mut updates)?;
        }

        self.path = Some(target);
        self.loaded = true;
        let count = updates.len();
        for (path, value) in updates {
            if let Some(leaf) = self.leaf_mut(&path) {
                leaf.store(value);
            }
        }
        info!("Loaded {} settings from {}", count, self.path_display());
        Ok(())
    }

    /// Write every persisted group to the bound file, or to `to` which then becomes bound
    pub fn write(&mut self, to: Option<&Path>) -> Result<(), SettingsError> {
        let target = match to {
            Some(path) => path.to_path_buf(),
            None => self
                .path
                .clone()
                .ok_or_else(|| SettingsError::FileNotFound("settings filename not provided".into()))?,
        };

        let text = serde_json::to_string_pretty(&self.dump())?;
        fs::write(&target, text)?;

        self.path = Some(target);
        self.loaded = true;
        info!("Saved settings to {}", self.path_display());
        Ok(())
    }

    /// Persisted groups as a JSON document with sorted keys
    pub fn dump(&self) -> serde_json::Value {
        dump_group(&self.root, true)
    }

    /// Every group, including display mirrors, as a JSON document
    pub fn dump_all(&self) -> serde_json::Value {
        dump_group(&self.root, false)
    }

    fn path_display(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn collect_updates(
    group: &Group,
    prefix: &str,
    document: &serde_json::Value,
    updates: &mut Vec<(String, Value)>,
) -> Result<(), SettingsError> {
    let map = document.as_object().ok_or_else(|| {
        let at = if prefix.is_empty() { "<root>" } else { prefix };
        SettingsError::invalid(at, "expected an object")
    })?;

    for (name, node) in group.children() {
        if prefix.is_empty() && is_excluded(name) {
            continue;
        }
        let Some(raw) = map.get(name) else {
            continue;
        };
        let path = join(prefix, name);
        match node {
            Node::Group(child) => {
                if !raw.is_null() {
                    collect_updates(child, &path, raw, updates)?;
                }
            }
            Node::Leaf(leaf) => {
                if let Some(value) = leaf.kind().from_json(&path, raw)? {
                    updates.push((path, value));
                }
            }
        }
    }
    Ok(())
}

fn dump_group(group: &Group, top_level_persisted: bool) -> serde_json::Value {
    let mut sorted = BTreeMap::new();
    for (name, node) in group.children() {
        if top_level_persisted && is_excluded(name) {
            continue;
        }
        let value = match node {
            Node::Group(child) => dump_group(child, false),
            Node::Leaf(leaf) => leaf.value().to_json(),
        };
        sorted.insert(name.to_string(), value);
    }
    serde_json::Value::Object(sorted.into_iter().collect())
}
