//! Extra token rules for a schema, loaded from TOML.
//!
//! ```toml
//! [[rules]]
//! owner = "em"
//! token = "i"
//! parse = "mark"
//!
//! [[rules]]
//! owner = "doc"
//! token = "html_block"
//! parse = "ignore"
//! no_close_token = true
//! ```

use log::debug;
use markdown_doctree::{Attrs, ParseRule, SchemaBuilder, SchemaError};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid rule #{index} in {config_path}: {reason}")]
    InvalidRule {
        config_path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("Rule for token `{token}` cannot be applied: {source}")]
    Schema { token: String, source: SchemaError },
}

/// The declarative rule kinds; custom handlers can only be added in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Block,
    Mark,
    Leaf,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRule {
    /// Name of the node or mark type that claims the token.
    pub owner: String,
    pub token: String,
    pub parse: RuleKind,
    #[serde(default)]
    pub no_close_token: bool,
    /// Static attributes. `Null` values are not written out; a missing key
    /// already falls back to the declared default.
    #[serde(
        default,
        skip_serializing_if = "Attrs::is_empty",
        serialize_with = "serialize_set_attrs"
    )]
    pub attrs: Attrs,
}

fn serialize_set_attrs<S: Serializer>(attrs: &Attrs, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(attrs.iter().filter(|(_, value)| !value.is_null()))
}

impl TokenRule {
    /// Token name and whether it arrives as a single token.
    fn claim(&self) -> (&str, bool) {
        let single = self.no_close_token || self.parse == RuleKind::Leaf;
        (self.token.as_str(), single)
    }

    fn problem(&self) -> Option<&'static str> {
        if self.owner.trim().is_empty() {
            Some("owner is empty")
        } else if self.token.trim().is_empty() {
            Some("token is empty")
        } else if !self.no_close_token
            && matches!(self.parse, RuleKind::Block | RuleKind::Mark | RuleKind::Ignore)
            && (self.token.ends_with("_open") || self.token.ends_with("_close"))
        {
            Some("token must name the pair without its _open/_close suffix")
        } else {
            None
        }
    }

    pub fn to_parse_rule(&self) -> ParseRule {
        let rule = match self.parse {
            RuleKind::Block => ParseRule::block(&self.token),
            RuleKind::Mark => ParseRule::mark(&self.token),
            RuleKind::Leaf => ParseRule::leaf(&self.token),
            RuleKind::Ignore => ParseRule::ignore(&self.token),
        };
        let rule = if self.attrs.is_empty() {
            rule
        } else {
            rule.with_attrs(self.attrs.clone())
        };
        if self.no_close_token {
            rule.no_close_token()
        } else {
            rule
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub rules: Vec<TokenRule>,
}

impl ParserConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: ParserConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate(config_path)?;

        debug!(
            "loaded {} token rules from {}",
            config.rules.len(),
            config_path.display()
        );
        Ok(Some(config))
    }

    /// Rejects rules that are malformed on their own or that claim a token
    /// an earlier rule in the same file already claims.
    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let mut claimed = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let reason = match rule.problem() {
                Some(problem) => problem.to_string(),
                None if !claimed.insert(rule.claim()) => {
                    format!("token `{}` is already claimed by an earlier rule", rule.token)
                }
                None => continue,
            };
            return Err(ConfigError::InvalidRule {
                config_path: config_path.to_path_buf(),
                index,
                reason,
            });
        }
        Ok(())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Attaches every rule to its owner type. Rules that contradict their
    /// owner (a `mark` rule on a node type, say) are accepted here and
    /// rejected when the schema's token handlers are built.
    pub fn apply(&self, builder: SchemaBuilder) -> Result<SchemaBuilder, ConfigError> {
        self.rules.iter().try_fold(builder, |builder, rule| {
            builder
                .add_rule(&rule.owner, rule.to_parse_rule())
                .map_err(|source| ConfigError::Schema {
                    token: rule.token.clone(),
                    source,
                })
        })
    }
}
