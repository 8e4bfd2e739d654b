use serde::Serialize;

const VERSION_PREFIX: &str = "#config-version=";

/// Comment lines found before the first command of an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigHeader {
    comments: Vec<String>,
}

/// Decoded `#config-version=` line, e.g.
/// `#config-version=FGT60F-7.2.3-FW-build1262-221109:opmode=0:vdom=1:user=admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigVersion {
    /// Hardware model, `FGT60F`.
    pub model: String,
    /// FortiOS version, `7.2.3`.
    pub version: String,
    /// Remaining build tag, `FW-build1262-221109`.
    pub build: Option<String>,
    /// `key=value` fields after the first `:`.
    pub fields: Vec<(String, String)>,
}

impl ConfigVersion {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl ConfigHeader {
    pub fn new(comments: Vec<String>) -> Self {
        Self { comments }
    }

    /// Raw comment lines including the leading `#`.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The last `#config-version=` line, decoded.
    pub fn config_version(&self) -> Option<ConfigVersion> {
        let raw = self
            .comments
            .iter()
            .rev()
            .find_map(|c| c.strip_prefix(VERSION_PREFIX))?;

        let mut parts = raw.split(':');
        let firmware = parts.next().unwrap_or_default();
        let mut firmware_parts = firmware.splitn(3, '-');
        let model = firmware_parts.next().unwrap_or_default().to_string();
        let version = firmware_parts.next().unwrap_or_default().to_string();
        let build = firmware_parts.next().map(str::to_string);

        let fields = parts
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (p.to_string(), String::new()),
            })
            .collect();

        Some(ConfigVersion {
            model,
            version,
            build,
            fields,
        })
    }

    pub fn model(&self) -> Option<String> {
        self.config_version().map(|v| v.model)
    }

    pub fn version(&self) -> Option<String> {
        self.config_version().map(|v| v.version)
    }
}
