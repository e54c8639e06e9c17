#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use chremoas_bootstrap::client::{Cache, ConfigStore};
use chremoas_bootstrap::config::Config;
use chremoas_bootstrap::{BootstrapError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    String(Vec<u8>),
    Set(BTreeSet<String>),
}

/// In memory cache that can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryCache {
    pub entries: HashMap<String, Entry>,
    pub commands: Vec<String>,
    pub fail_ping: bool,
    pub fail_set: bool,
    pub fail_delete: bool,
    pub fail_members: Vec<String>,
}

impl MemoryCache {
    pub fn members(&self, key: &str) -> BTreeSet<String> {
        match self.entries.get(key) {
            Some(Entry::Set(members)) => members.clone(),
            Some(entry) => panic!("{} is not a set: {:?}", key, entry),
            None => BTreeSet::new(),
        }
    }

    pub fn string(&self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(Entry::String(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

fn refused(what: &str) -> BootstrapError {
    BootstrapError::Internal(format!("{} refused", what).into())
}

#[async_trait]
impl Cache for MemoryCache {
    async fn ping(&mut self) -> Result<chrono::Duration> {
        self.commands.push("PING".into());
        if self.fail_ping {
            return Err(refused("PING"));
        }
        Ok(chrono::Duration::zero())
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.commands.push(format!("SET {}", key));
        if self.fail_set {
            return Err(refused("SET"));
        }
        self.entries
            .insert(key.to_owned(), Entry::String(value.to_vec()));
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<u64> {
        self.commands.push(format!("DEL {}", key));
        if self.fail_delete {
            return Err(refused("DEL"));
        }
        Ok(self.entries.remove(key).map_or(0, |_| 1))
    }

    async fn add_to_set(&mut self, key: &str, member: &str) -> Result<bool> {
        self.commands.push(format!("SADD {} {}", key, member));
        if self.fail_members.iter().any(|m| m == member) {
            return Err(refused("SADD"));
        }
        match self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Set(BTreeSet::new()))
        {
            Entry::Set(members) => Ok(members.insert(member.to_owned())),
            Entry::String(_) => Err(refused("WRONGTYPE")),
        }
    }
}

/// In memory config store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub values: Mutex<HashMap<String, Vec<u8>>>,
    pub puts: Mutex<Vec<String>>,
    pub fail_keys: Vec<String>,
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.puts.lock().unwrap().push(key.to_owned());
        if self.fail_keys.iter().any(|k| k == key) {
            return Err(refused("PUT"));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}

pub const CONFIG_YAML: &str = r#"redis:
  description: Chremoas Server Admins
  namespace: net.4amlunch.dev
  admins:
    - alice
    - bob
consul:
  config:
    namespace: chremoas-test
"#;

/// Write content to a temp file and load it. The publish path points at
/// the same file.
pub fn load_config(content: &str) -> (tempfile::NamedTempFile, Config) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let mut config = tokio_test::block_on(Config::load_file(file.path())).unwrap();
    config.consul.config.file = file.path().to_owned();

    (file, config)
}
