use indexmap::IndexMap;
use serde::Serialize;

use crate::error::QueryError;
use crate::header::ConfigHeader;
use crate::tree::ConfigRoot;

/// A parsed FortiGate configuration.
///
/// Without VDOMs, [`Config::root`] holds every top-level block. With VDOMs it
/// holds the `config global` block and each VDOM gets its own root in
/// [`Config::vdoms`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    header: ConfigHeader,
    root: ConfigRoot,
    vdoms: IndexMap<String, ConfigRoot>,
}

impl Config {
    pub(crate) fn new(
        header: ConfigHeader,
        root: ConfigRoot,
        vdoms: IndexMap<String, ConfigRoot>,
    ) -> Self {
        Self {
            header,
            root,
            vdoms,
        }
    }

    pub fn has_vdom(&self) -> bool {
        !self.vdoms.is_empty()
    }

    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    /// VDOM roots by name, in declaration order. Empty without VDOMs.
    pub fn vdoms(&self) -> &IndexMap<String, ConfigRoot> {
        &self.vdoms
    }

    pub fn vdom(&self, name: &str) -> Result<&ConfigRoot, QueryError> {
        if !self.has_vdom() {
            return Err(QueryError::NoVdoms);
        }
        self.vdoms
            .get(name)
            .ok_or_else(|| QueryError::NoSuchVdom(name.to_string()))
    }

    /// The VDOM root for `Some(name)`, the global root for `None`.
    pub fn scope(&self, vdom: Option<&str>) -> Result<&ConfigRoot, QueryError> {
        match vdom {
            Some(name) => self.vdom(name),
            None => Ok(&self.root),
        }
    }

    pub fn header(&self) -> &ConfigHeader {
        &self.header
    }
}
