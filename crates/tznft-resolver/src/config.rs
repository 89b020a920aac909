//! Key-value configuration store.
//!
//! Configuration is one JSON document addressed by dotted keys, e.g.
//! `availableNetworks.sandbox.providerUrl`. Components receive the store as an
//! explicit context: resolvers and query paths get [`ConfigRead`], only the
//! bootstrap orchestrator and the configuration commands get [`ConfigWrite`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

use tznft_types::{Address, Result, SecretKey, TznftError};

/// Dotted key layout of the configuration document.
pub mod keys {
    pub const ACTIVE_NETWORK: &str = "activeNetwork";
    pub const AVAILABLE_NETWORKS: &str = "availableNetworks";
    pub const SANDBOX_START: &str = "sandbox.startCommand";
    pub const SANDBOX_STOP: &str = "sandbox.stopCommand";
    pub const INSPECTOR_CODE: &str = "contracts.inspector";
    pub const NFT_CODE: &str = "contracts.nft";

    pub fn network(network: &str) -> String {
        format!("{}.{}", AVAILABLE_NETWORKS, network)
    }

    pub fn provider_url(network: &str) -> String {
        format!("{}.providerUrl", self::network(network))
    }

    pub fn inspector(network: &str) -> String {
        format!("{}.inspector", self::network(network))
    }

    pub fn aliases(network: &str) -> String {
        format!("{}.aliases", self::network(network))
    }

    pub fn alias(network: &str, alias: &str) -> String {
        format!("{}.{}", aliases(network), alias)
    }
}

/// An alias entry: an address and, for signing identities, its secret key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretKey>,
}

/// Read-only view of the configuration.
pub trait ConfigRead: Send + Sync {
    /// Raw value at a dotted key.
    fn get(&self, key: &str) -> Option<Value>;

    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.trim().is_empty())
    }

    fn active_network(&self) -> Result<String> {
        self.get_str(keys::ACTIVE_NETWORK)
            .ok_or(TznftError::ActiveNetworkNotSet)
    }

    fn provider_url(&self, network: &str) -> Option<String> {
        self.get_str(&keys::provider_url(network))
    }

    fn inspector(&self, network: &str) -> Option<String> {
        self.get_str(&keys::inspector(network))
    }

    /// Alias entry in `network`. A malformed entry is reported as absent.
    fn alias(&self, network: &str, alias: &str) -> Option<AliasRecord> {
        let value = self.get(&keys::alias(network, alias))?;
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(network, alias, error = %e, "ignoring malformed alias entry");
                None
            }
        }
    }

    fn alias_names(&self, network: &str) -> Vec<String> {
        match self.get(&keys::aliases(network)) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn network_names(&self) -> Vec<String> {
        match self.get(keys::AVAILABLE_NETWORKS) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Read-write capability over the configuration.
pub trait ConfigWrite: ConfigRead {
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<Option<Value>>;
}

/// JSON-document configuration, optionally backed by a file.
///
/// Writes to a file-backed config are persisted immediately.
#[derive(Debug, Clone)]
pub struct JsonConfig {
    doc: Value,
    path: Option<PathBuf>,
}

impl JsonConfig {
    /// Default document: a local sandbox with its two funded accounts and a
    /// public test network.
    pub fn default_document() -> Value {
        json!({
            "activeNetwork": "sandbox",
            "availableNetworks": {
                "sandbox": {
                    "providerUrl": "http://localhost:20000",
                    "aliases": {
                        "bob": {
                            "address": "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6",
                            "secret": "edsk3RFfvaFaxbHx8BMtEW1rKQcPtDML3LXjNqMNLCzC3wLC1bWbAt"
                        },
                        "alice": {
                            "address": "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
                            "secret": "edsk3QoqBuvdamxouPhin7swCvkQNgq4jP5KZPbwWNnwdZpSpJiEbq"
                        }
                    }
                },
                "testnet": {
                    "providerUrl": "https://rpc.ghostnet.teztnets.com",
                    "aliases": {}
                }
            },
            "sandbox": {
                "startCommand": "docker run --rm --name tznft-sandbox --detach -p 20000:20000 -e block_time=3 oxheadalpha/flextesa:20230901 nairobibox start",
                "stopCommand": "docker kill tznft-sandbox"
            },
            "contracts": {
                "inspector": "contracts/inspector.tz",
                "nft": "contracts/fa2_fixed_collection_token.tz"
            }
        })
    }

    pub fn in_memory(doc: Value) -> Self {
        Self { doc, path: None }
    }

    /// Load from `path`, falling back to the default document if the file does
    /// not exist yet. Nothing is written until the first mutation.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                doc: Self::default_document(),
                path: Some(path.to_path_buf()),
            })
        }
    }

    /// Write `doc` to `path`, replacing any existing file.
    pub fn create(path: &Path, doc: Value) -> Result<Self> {
        let config = Self {
            doc,
            path: Some(path.to_path_buf()),
        };
        config.save()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            TznftError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let doc: Value = serde_json::from_str(&data).map_err(|e| {
            TznftError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        if !doc.is_object() {
            return Err(TznftError::config(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }
        Ok(Self {
            doc,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// Write the document to its backing file, if any.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| TznftError::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, data + "\n")?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.doc, |node, segment| node.as_object()?.get(segment))
    }
}

impl ConfigRead for JsonConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).cloned()
    }
}

impl ConfigWrite for JsonConfig {
    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(TznftError::config("empty configuration key"));
        };

        let mut node = &mut self.doc;
        for segment in parents {
            node = object_mut(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        object_mut(node).insert(last.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let (parent_key, last) = match key.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, key),
        };
        let parent = match parent_key {
            Some(parent_key) => key_path_mut(&mut self.doc, parent_key),
            None => Some(&mut self.doc),
        };
        let removed = parent
            .and_then(Value::as_object_mut)
            .and_then(|map| map.remove(last));
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }
}

/// Coerce `node` into an object, replacing scalars on the path.
fn object_mut(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("replaced with an object above"),
    }
}

fn key_path_mut<'a>(doc: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.')
        .try_fold(doc, |node, segment| node.as_object_mut()?.get_mut(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_document_reads() {
        let config = JsonConfig::in_memory(JsonConfig::default_document());
        assert_eq!(config.active_network().unwrap(), "sandbox");
        assert_eq!(
            config.provider_url("sandbox").as_deref(),
            Some("http://localhost:20000")
        );
        let bob = config.alias("sandbox", "bob").unwrap();
        assert_eq!(bob.address.as_str(), "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6");
        assert!(bob.secret.is_some());
        assert!(config.inspector("sandbox").is_none());
    }

    #[test]
    fn test_missing_active_network() {
        let config = JsonConfig::in_memory(json!({}));
        assert!(matches!(
            config.active_network(),
            Err(TznftError::ActiveNetworkNotSet)
        ));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut config = JsonConfig::in_memory(json!({}));
        config
            .set(&keys::inspector("sandbox"), json!("KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton"))
            .unwrap();
        assert_eq!(
            config.inspector("sandbox").as_deref(),
            Some("KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton")
        );
    }

    #[test]
    fn test_remove() {
        let mut config = JsonConfig::in_memory(JsonConfig::default_document());
        let removed = config.remove(&keys::alias("sandbox", "alice")).unwrap();
        assert!(removed.is_some());
        assert!(config.alias("sandbox", "alice").is_none());
        assert!(config.remove("no.such.key").unwrap().is_none());
    }

    #[test]
    fn test_file_backed_writes_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tznft.json");

        let mut config = JsonConfig::load_or_default(&path).unwrap();
        assert!(!path.exists());
        config.set(keys::ACTIVE_NETWORK, json!("testnet")).unwrap();
        assert!(path.exists());

        let reloaded = JsonConfig::load(&path).unwrap();
        assert_eq!(reloaded.active_network().unwrap(), "testnet");
        assert!(reloaded.alias("sandbox", "bob").is_some());
    }

    #[test]
    fn test_create_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tznft.json");
        std::fs::write(&path, "{\"activeNetwork\": \"testnet\"}").unwrap();

        JsonConfig::create(&path, JsonConfig::default_document()).unwrap();
        let reloaded = JsonConfig::load(&path).unwrap();
        assert_eq!(reloaded.active_network().unwrap(), "sandbox");
    }

    #[test]
    fn test_load_rejects_non_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tznft.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            JsonConfig::load(&path),
            Err(TznftError::Config { .. })
        ));
    }
}
