use indexmap::map::{Iter, Keys};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::QueryError;
use crate::lexer::Token;
use crate::walk::{traverse, Visitor, Walk};

/// Child nodes of a container, keyed by name or `edit` key in insertion order.
pub type Children = IndexMap<String, ConfigNode>;

/// A node of the parsed configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigNode {
    /// `set <name> <values...>`
    Set(SetCommand),
    /// `unset <name>`
    Unset(UnsetCommand),
    /// `config <name>` block holding settings directly.
    Object(ConfigObject),
    /// `config <name>` block holding `edit` entries.
    Table(ConfigTable),
    /// Detached scope root.
    Root(ConfigRoot),
}

impl ConfigNode {
    /// Name the node was declared under.
    pub fn name(&self) -> &str {
        match self {
            Self::Set(node) => &node.name,
            Self::Unset(node) => &node.name,
            Self::Object(node) => &node.name,
            Self::Table(node) => &node.name,
            Self::Root(node) => &node.name,
        }
    }

    /// Short lowercase label for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Unset(_) => "unset",
            Self::Object(_) => "object",
            Self::Table(_) => "table",
            Self::Root(_) => "root",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Set(_) | Self::Unset(_))
    }

    /// Children of a container node, `None` for leaves.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Set(_) | Self::Unset(_) => None,
            Self::Object(node) => Some(&node.children),
            Self::Table(node) => Some(&node.entries),
            Self::Root(node) => Some(&node.children),
        }
    }

    pub fn as_set(&self) -> Option<&SetCommand> {
        match self {
            Self::Set(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_unset(&self) -> Option<&UnsetCommand> {
        match self {
            Self::Unset(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigObject> {
        match self {
            Self::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ConfigTable> {
        match self {
            Self::Table(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&ConfigRoot> {
        match self {
            Self::Root(node) => Some(node),
            _ => None,
        }
    }

    /// Resolve `path` below this node. An empty path resolves to the node itself.
    pub fn get(&self, path: &str) -> Option<&ConfigNode> {
        self.lookup(path).ok()
    }

    /// Like [`ConfigNode::get`] but reports which segment failed.
    pub fn lookup(&self, path: &str) -> Result<&ConfigNode, QueryError> {
        if path_spans(path).is_empty() {
            return Ok(self);
        }
        match self.children() {
            Some(children) => resolve(children, path),
            None => Err(QueryError::KeyNotFound {
                path: path.to_string(),
                segment: path.trim().to_string(),
            }),
        }
    }

    /// Breadth-first walk over this node and all descendants.
    pub fn walk<'a>(&'a self, delimiter: &str) -> Walk<'a> {
        Walk::from_node(self, delimiter)
    }
}

impl From<SetCommand> for ConfigNode {
    fn from(node: SetCommand) -> Self {
        Self::Set(node)
    }
}

impl From<UnsetCommand> for ConfigNode {
    fn from(node: UnsetCommand) -> Self {
        Self::Unset(node)
    }
}

impl From<ConfigObject> for ConfigNode {
    fn from(node: ConfigObject) -> Self {
        Self::Object(node)
    }
}

impl From<ConfigTable> for ConfigNode {
    fn from(node: ConfigTable) -> Self {
        Self::Table(node)
    }
}

impl From<ConfigRoot> for ConfigNode {
    fn from(node: ConfigRoot) -> Self {
        Self::Root(node)
    }
}

/// A `set` command. Values are raw strings, never coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetCommand {
    name: String,
    values: Vec<Token>,
}

impl SetCommand {
    pub(crate) fn new(name: impl Into<String>, values: Vec<Token>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional values in declaration order.
    pub fn values(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.text.as_str()).collect()
    }

    /// Values together with their quoting.
    pub fn tokens(&self) -> &[Token] {
        &self.values
    }

    /// The value of a single-value setting.
    pub fn value(&self) -> Option<&str> {
        match self.values.as_slice() {
            [only] => Some(only.text.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An `unset` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsetCommand {
    name: String,
}

impl UnsetCommand {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A `config` block whose body holds settings and nested blocks directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigObject {
    name: String,
    children: Children,
}

impl ConfigObject {
    pub(crate) fn new(name: impl Into<String>, children: Children) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// A `config` block made of `edit <key> ... next` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigTable {
    name: String,
    // Every value is a `ConfigNode::Object`; only `ConfigTable::new` fills it.
    entries: Children,
}

impl ConfigTable {
    pub(crate) fn new(name: impl Into<String>, entries: Vec<ConfigObject>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), ConfigNode::Object(entry)))
            .collect();
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Body of the entry declared with `edit <key>`.
    pub fn entry(&self, key: &str) -> Option<&ConfigObject> {
        self.entries.get(key).and_then(ConfigNode::as_object)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ConfigObject)> {
        self.entries
            .iter()
            .filter_map(|(key, node)| node.as_object().map(|obj| (key.as_str(), obj)))
    }
}

/// Top-level scope: the global configuration or one VDOM.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigRoot {
    name: String,
    children: Children,
}

impl ConfigRoot {
    pub(crate) fn new(name: impl Into<String>, children: Children) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Top-level blocks, optionally restricted to names starting with the
    /// words of `prefix` (`"router"` matches `"router bgp"`).
    pub fn sections<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a str, &'a ConfigNode)> + 'a {
        let wanted: Vec<&str> = prefix.map(|p| p.split_whitespace().collect()).unwrap_or_default();
        self.children.iter().filter_map(move |(key, node)| {
            if node.is_leaf() {
                return None;
            }
            let words: Vec<&str> = key.split_whitespace().collect();
            words
                .starts_with(&wanted)
                .then_some((key.as_str(), node))
        })
    }
}

impl From<ConfigObject> for ConfigRoot {
    fn from(object: ConfigObject) -> Self {
        Self {
            name: object.name,
            children: object.children,
        }
    }
}

/// Read access shared by [`ConfigObject`], [`ConfigTable`] and [`ConfigRoot`].
pub trait Container {
    fn name(&self) -> &str;

    fn children(&self) -> &Children;

    /// Direct child by exact key.
    fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children().get(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.children().contains_key(key)
    }

    fn len(&self) -> usize {
        self.children().len()
    }

    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// `(key, node)` pairs in insertion order.
    fn iter(&self) -> Iter<'_, String, ConfigNode> {
        self.children().iter()
    }

    fn keys(&self) -> Keys<'_, String, ConfigNode> {
        self.children().keys()
    }

    /// Resolve a `/` or space separated path through nested containers.
    ///
    /// The longest run of words naming a child is tried first, falling back
    /// to shorter runs when the rest of the path does not resolve below it.
    /// `"system interface wan1 ip"` finds `ip` in entry `wan1` of table
    /// `system interface`, and keys holding `/` such as `10.1.1.0/24` match
    /// across the separator.
    fn get(&self, path: &str) -> Option<&ConfigNode> {
        self.lookup(path).ok()
    }

    fn lookup(&self, path: &str) -> Result<&ConfigNode, QueryError> {
        resolve(self.children(), path)
    }

    fn object(&self, path: &str) -> Result<&ConfigObject, QueryError> {
        let node = self.lookup(path)?;
        node.as_object().ok_or_else(|| wrong_kind(path, "object", node))
    }

    fn table(&self, path: &str) -> Result<&ConfigTable, QueryError> {
        let node = self.lookup(path)?;
        node.as_table().ok_or_else(|| wrong_kind(path, "table", node))
    }

    fn set(&self, path: &str) -> Result<&SetCommand, QueryError> {
        let node = self.lookup(path)?;
        node.as_set().ok_or_else(|| wrong_kind(path, "set", node))
    }

    /// Value of a single-value `set`.
    fn opt(&self, path: &str) -> Result<&str, QueryError> {
        let set = self.set(path)?;
        set.value().ok_or_else(|| QueryError::NotSingleValue {
            key: path.to_string(),
            count: set.len(),
        })
    }

    /// Like [`Container::opt`], with `default` when the path does not exist.
    fn opt_or<'a>(&'a self, path: &str, default: &'a str) -> Result<&'a str, QueryError> {
        match self.opt(path) {
            Err(QueryError::KeyNotFound { .. }) => Ok(default),
            other => other,
        }
    }

    /// Whether `path` is a single-value `set` equal to `value`.
    fn same(&self, path: &str, value: &str) -> bool {
        self.opt(path).is_ok_and(|v| v == value)
    }

    /// Breadth-first walk over all descendants, keys joined by `delimiter`.
    fn walk<'a>(&'a self, delimiter: &str) -> Walk<'a> {
        Walk::from_children(self.children(), delimiter)
    }

    /// Depth-first traversal calling `visitor` on every descendant.
    fn traverse<V: Visitor>(&self, visitor: &mut V)
    where
        Self: Sized,
    {
        traverse(self.children(), visitor);
    }
}

impl Container for ConfigObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &Children {
        &self.children
    }
}

impl Container for ConfigTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &Children {
        &self.entries
    }
}

impl Container for ConfigRoot {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &Children {
        &self.children
    }
}

/// Byte spans of the words of `path`, split on whitespace and `/`.
fn path_spans(path: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in path.char_indices() {
        let separator = c == '/' || c.is_whitespace();
        match (start, separator) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, path.len()));
    }
    spans
}

/// Words `spans` rejoined with `/` where the path had one, a single space otherwise.
fn normalized_key(path: &str, spans: &[(usize, usize)]) -> String {
    let mut key = String::new();
    for (i, &(start, end)) in spans.iter().enumerate() {
        if i > 0 {
            let gap = &path[spans[i - 1].1..start];
            key.push(if gap.contains('/') { '/' } else { ' ' });
        }
        key.push_str(&path[start..end]);
    }
    key
}

fn wrong_kind(path: &str, expected: &'static str, node: &ConfigNode) -> QueryError {
    QueryError::WrongKind {
        key: path.to_string(),
        expected,
        found: node.kind(),
    }
}

fn resolve<'a>(children: &'a Children, path: &str) -> Result<&'a ConfigNode, QueryError> {
    let spans = path_spans(path);
    let mut deepest = 0;
    descend(children, path, &spans, 0, &mut deepest).ok_or_else(|| QueryError::KeyNotFound {
        path: path.to_string(),
        segment: spans
            .get(deepest)
            .map_or("", |&(start, end)| &path[start..end])
            .to_string(),
    })
}

/// Depth-first match of `spans[from..]` below `children`, longest key first.
///
/// A key may span several words across either separator, so both
/// `"firewall address/10.1.1.0/24"` and `"system interface wan1"` resolve.
/// `deepest` records the furthest word no child matched.
fn descend<'a>(
    children: &'a Children,
    path: &str,
    spans: &[(usize, usize)],
    from: usize,
    deepest: &mut usize,
) -> Option<&'a ConfigNode> {
    if from == spans.len() {
        return None;
    }
    for to in (from + 1..=spans.len()).rev() {
        let raw = &path[spans[from].0..spans[to - 1].1];
        let Some(node) = children
            .get(raw)
            .or_else(|| children.get(normalized_key(path, &spans[from..to]).as_str()))
        else {
            continue;
        };
        if to == spans.len() {
            return Some(node);
        }
        match node.children() {
            Some(next) => {
                if let Some(found) = descend(next, path, spans, to, deepest) {
                    return Some(found);
                }
            }
            None => *deepest = (*deepest).max(to),
        }
    }
    *deepest = (*deepest).max(from);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, values: &[&str]) -> ConfigNode {
        SetCommand::new(name, values.iter().map(|v| Token::bare(*v)).collect()).into()
    }

    fn sample_root() -> ConfigRoot {
        let mut wan1 = Children::new();
        wan1.insert("ip".into(), set("ip", &["10.0.0.1", "255.255.255.0"]));
        wan1.insert("status".into(), set("status", &["up"]));
        let table = ConfigTable::new("system interface", vec![ConfigObject::new("wan1", wan1)]);

        let mut global = Children::new();
        global.insert("hostname".into(), set("hostname", &["fw01"]));
        global.insert("timezone".into(), UnsetCommand::new("timezone").into());

        let mut children = Children::new();
        children.insert(
            "system global".into(),
            ConfigObject::new("system global", global).into(),
        );
        children.insert("system interface".into(), table.into());
        ConfigRoot::new("global", children)
    }

    #[test]
    fn get_resolves_space_and_slash_paths() {
        let root = sample_root();

        let by_space = root.get("system interface wan1 ip").expect("space path");
        let by_slash = root.get("system interface/wan1/ip").expect("slash path");
        assert_eq!(by_space, by_slash);
        assert_eq!(
            by_space.as_set().map(SetCommand::values),
            Some(vec!["10.0.0.1", "255.255.255.0"])
        );
    }

    #[test]
    fn lookup_names_the_missing_segment() {
        let root = sample_root();
        let err = root.lookup("system interface/wan9").unwrap_err();
        assert_eq!(
            err,
            QueryError::KeyNotFound {
                path: "system interface/wan9".to_string(),
                segment: "wan9".to_string(),
            }
        );
    }

    #[test]
    fn lookup_falls_back_to_shorter_word_runs() {
        let mut interface = Children::new();
        interface.insert("x".into(), set("x", &["1"]));
        let mut system = Children::new();
        system.insert(
            "interface".into(),
            ConfigObject::new("interface", interface).into(),
        );

        let mut children = Children::new();
        children.insert("system".into(), ConfigObject::new("system", system).into());
        children.insert(
            "system interface".into(),
            ConfigObject::new("system interface", Children::new()).into(),
        );
        let root = ConfigRoot::new("global", children);

        let x = root.set("system interface x").expect("x below system/interface");
        assert_eq!(x.values(), vec!["1"]);
        assert!(root.object("system interface").is_ok_and(|o| o.is_empty()));
        assert_eq!(
            root.lookup("system interface y").unwrap_err(),
            QueryError::KeyNotFound {
                path: "system interface y".to_string(),
                segment: "y".to_string(),
            }
        );
    }

    #[test]
    fn leaves_do_not_navigate_further() {
        let root = sample_root();
        let hostname = root.get("system global hostname").expect("hostname");
        assert!(hostname.get("anything").is_none());
        assert_eq!(hostname.get(""), Some(hostname));
    }

    #[test]
    fn typed_accessors_check_kind() {
        let root = sample_root();
        assert!(root.object("system global").is_ok());
        assert!(root.table("system interface").is_ok());
        assert_eq!(
            root.table("system global").unwrap_err(),
            QueryError::WrongKind {
                key: "system global".to_string(),
                expected: "table",
                found: "object",
            }
        );

        let global = root.object("system global").expect("global");
        assert_eq!(global.opt("hostname"), Ok("fw01"));
        assert_eq!(global.opt_or("admintimeout", "5"), Ok("5"));
        assert!(global.same("hostname", "fw01"));
        assert!(!global.same("timezone", "fw01"));

        let table = root.table("system interface").expect("table");
        assert!(matches!(
            table.object("wan1").and_then(|e| e.opt("ip")),
            Err(QueryError::NotSingleValue { count: 2, .. })
        ));
        assert!(table.entry("wan1").is_some());
    }

    #[test]
    fn sections_filter_by_word_prefix() {
        let root = sample_root();
        let names: Vec<&str> = root.sections(Some("system")).map(|(k, _)| k).collect();
        assert_eq!(names, vec!["system global", "system interface"]);

        let names: Vec<&str> = root.sections(Some("system  global")).map(|(k, _)| k).collect();
        assert_eq!(names, vec!["system global"]);

        assert_eq!(root.sections(Some("sys")).count(), 0);
        assert_eq!(root.sections(None).count(), 2);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let root = sample_root();
        let keys: Vec<&String> = root.keys().collect();
        assert_eq!(keys, ["system global", "system interface"]);
    }
}
