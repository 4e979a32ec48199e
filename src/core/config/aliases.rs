use std::collections::BTreeMap;

use log::debug;

use super::{ConfigError, ConfigFile, ConfigRecord};

/// Alias name to replacement text. Every mutation is written through to
/// the backing config file when one is attached.
#[derive(Debug, Default)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
    file: Option<ConfigFile>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the table from `file` and keeps it as the write-through target.
    pub fn load(file: ConfigFile) -> Result<Self, ConfigError> {
        let record = file.load()?;
        Ok(Self {
            aliases: record.aliases,
            file: Some(file),
        })
    }

    /// An empty table that still writes through to `file`.
    pub fn empty_backed_by(file: ConfigFile) -> Self {
        Self {
            aliases: BTreeMap::new(),
            file: Some(file),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// All aliases in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Defines or overwrites `name`. If the config cannot be saved the
    /// previous value is restored.
    pub fn define(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let previous = self.aliases.insert(name.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.aliases.insert(name.to_string(), old),
                None => self.aliases.remove(name),
            };
            return Err(e);
        }
        debug!("alias {}='{}' defined", name, value);
        Ok(())
    }

    /// Removes `name`, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> Result<bool, ConfigError> {
        let Some(old) = self.aliases.remove(name) else {
            return Ok(false);
        };
        if let Err(e) = self.persist() {
            self.aliases.insert(name.to_string(), old);
            return Err(e);
        }
        debug!("alias {} removed", name);
        Ok(true)
    }

    /// Replaces the first token with the tokens of its alias, once. The
    /// replacement is never looked up again.
    pub fn expand(&self, tokens: Vec<String>) -> Vec<String> {
        let Some(replacement) = tokens.first().and_then(|first| self.get(first)) else {
            return tokens;
        };

        debug!("expanding alias {} -> {}", tokens[0], replacement);
        replacement
            .split_whitespace()
            .map(String::from)
            .chain(tokens.into_iter().skip(1))
            .collect()
    }

    fn persist(&self) -> Result<(), ConfigError> {
        match &self.file {
            Some(file) => file.save(&ConfigRecord {
                aliases: self.aliases.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_define_and_get() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la").expect("define");
        assert_eq!(table.get("ll"), Some("ls -la"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_expand_appends_remaining_tokens() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la").expect("define");
        assert_eq!(table.expand(tokens("ll /home x")), tokens("ls -la /home x"));
    }

    #[test]
    fn test_expand_is_single_level() {
        let mut table = AliasTable::new();
        table.define("a", "b --one").expect("define");
        table.define("b", "echo nested").expect("define");
        assert_eq!(table.expand(tokens("a z")), tokens("b --one z"));
    }

    #[test]
    fn test_expand_only_first_token() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la").expect("define");
        assert_eq!(table.expand(tokens("echo ll")), tokens("echo ll"));
    }

    #[test]
    fn test_iter_sorted() {
        let mut table = AliasTable::new();
        table.define("zz", "1").expect("define");
        table.define("aa", "2").expect("define");
        let names: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["aa", "zz"]);
    }

    #[test]
    fn test_mutations_write_through() {
        let dir = TempDir::new().expect("tempdir");
        let file = ConfigFile::new(dir.path().join("config.json"));

        let mut table = AliasTable::load(file.clone()).expect("load");
        table.define("gs", "git status").expect("define");
        table.define("ll", "ls -la").expect("define");
        assert_eq!(file.load().expect("load").aliases.len(), 2);

        assert!(table.remove("gs").expect("remove"));
        assert!(!table.remove("gs").expect("remove"));
        let on_disk = file.load().expect("load");
        assert_eq!(on_disk.aliases.len(), 1);
        assert!(on_disk.aliases.contains_key("ll"));
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = TempDir::new().expect("tempdir");
        let file = ConfigFile::new(dir.path().join("missing").join("config.json"));
        let mut table = AliasTable::empty_backed_by(file);

        assert!(table.define("ll", "ls").is_err());
        assert_eq!(table.get("ll"), None);
    }
}
