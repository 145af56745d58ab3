//! Configuration document loading and validation.
//!
//! The configuration is a JSON document enumerating assets and news
//! sources. Loading produces validated, immutable [`AssetSpec`] and
//! [`SourceSpec`] descriptors or fails with a [`ConfigError`] naming the
//! offending key path. No network activity happens here.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::news::SourceKind;
use crate::provider::ProviderId;
use crate::{AssetCategory, ConfigError, Symbol};

/// Default bound on extracted items per news source.
pub const DEFAULT_MAX_ITEMS: usize = 3;

/// Default model routed through the summarizer endpoint.
pub const DEFAULT_SUMMARY_MODEL: &str = "openrouter/auto";

/// Validated descriptor of one asset to fetch. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub symbol: Symbol,
    pub provider: ProviderId,
    /// Identifier understood by the provider (exchange-qualified ticker,
    /// CSV code). Defaults to the symbol itself.
    pub provider_symbol: String,
    pub name: String,
    pub category: AssetCategory,
}

/// Which assets a news source covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCoverage {
    /// Wildcard: items are associated by keyword match against every
    /// configured asset's symbol and display name.
    All,
    /// Explicit subset of configured asset symbols.
    Symbols(Vec<Symbol>),
}

/// Validated descriptor of one news source. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub kind: SourceKind,
    /// Query templates tried in order; the first tier yielding any items
    /// wins. `{symbols}` and `{names}` expand to the covered assets.
    pub queries: Vec<String>,
    pub coverage: SourceCoverage,
    pub max_items: usize,
}

impl SourceSpec {
    /// Symbols this source covers, resolved against the asset list.
    pub fn covered_symbols<'a>(&'a self, assets: &'a [AssetSpec]) -> Vec<&'a Symbol> {
        match &self.coverage {
            SourceCoverage::All => assets.iter().map(|asset| &asset.symbol).collect(),
            SourceCoverage::Symbols(symbols) => symbols.iter().collect(),
        }
    }
}

/// Complete validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub assets: Vec<AssetSpec>,
    pub sources: Vec<SourceSpec>,
    pub summary_model: String,
}

impl Config {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a configuration document.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(input).map_err(|error| ConfigError::Parse {
                message: error.to_string(),
            })?;
        raw.validate()
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    assets: Option<Vec<RawAsset>>,
    sources: Option<Vec<RawSource>>,
    summary: Option<RawSummary>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    symbol: Option<String>,
    provider: Option<String>,
    provider_symbol: Option<String>,
    name: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
    kind: Option<String>,
    queries: Option<Vec<String>>,
    symbols: Option<Vec<String>>,
    max_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    model: Option<String>,
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let mut assets = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in self.assets.unwrap_or_default().into_iter().enumerate() {
            let asset = raw.validate(index)?;
            if !seen.insert(asset.symbol.clone()) {
                return Err(ConfigError::DuplicateSymbol {
                    path: format!("assets[{index}].symbol"),
                    symbol: asset.symbol.to_string(),
                });
            }
            assets.push(asset);
        }

        let mut sources = Vec::new();
        for (index, raw) in self.sources.unwrap_or_default().into_iter().enumerate() {
            sources.push(raw.validate(index, &assets)?);
        }

        let summary_model = self
            .summary
            .and_then(|summary| summary.model)
            .unwrap_or_else(|| String::from(DEFAULT_SUMMARY_MODEL));

        Ok(Config {
            assets,
            sources,
            summary_model,
        })
    }
}

impl RawAsset {
    fn validate(self, index: usize) -> Result<AssetSpec, ConfigError> {
        let symbol_path = format!("assets[{index}].symbol");
        let raw_symbol = self
            .symbol
            .ok_or(ConfigError::MissingField { path: symbol_path.clone() })?;
        let symbol = Symbol::parse(&raw_symbol).map_err(|error| ConfigError::InvalidValue {
            path: symbol_path,
            message: error.to_string(),
        })?;

        let provider_path = format!("assets[{index}].provider");
        let raw_provider = self
            .provider
            .ok_or(ConfigError::MissingField { path: provider_path.clone() })?;
        let provider = parse_provider(&raw_provider).ok_or(ConfigError::InvalidValue {
            path: provider_path,
            message: format!("unknown provider '{raw_provider}', expected yahoo or stooq"),
        })?;

        let provider_symbol = match self.provider_symbol {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyField {
                    path: format!("assets[{index}].provider_symbol"),
                });
            }
            Some(value) => value.trim().to_owned(),
            None => symbol.to_string(),
        };

        let name = match self.name {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyField {
                    path: format!("assets[{index}].name"),
                });
            }
            Some(value) => value.trim().to_owned(),
            None => symbol.to_string(),
        };

        let category = match self.category {
            Some(raw) => parse_category(&raw).ok_or(ConfigError::InvalidValue {
                path: format!("assets[{index}].category"),
                message: format!("unknown category '{raw}'"),
            })?,
            None => AssetCategory::Other,
        };

        Ok(AssetSpec {
            symbol,
            provider,
            provider_symbol,
            name,
            category,
        })
    }
}

impl RawSource {
    fn validate(self, index: usize, assets: &[AssetSpec]) -> Result<SourceSpec, ConfigError> {
        let name_path = format!("sources[{index}].name");
        let name = self
            .name
            .ok_or(ConfigError::MissingField { path: name_path.clone() })?;
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyField { path: name_path });
        }

        let kind_path = format!("sources[{index}].kind");
        let raw_kind = self
            .kind
            .ok_or(ConfigError::MissingField { path: kind_path.clone() })?;
        let kind = parse_kind(&raw_kind).ok_or(ConfigError::InvalidValue {
            path: kind_path,
            message: format!("unknown source kind '{raw_kind}', expected gdelt or yahoo_finance"),
        })?;

        let queries_path = format!("sources[{index}].queries");
        let queries = self
            .queries
            .ok_or(ConfigError::MissingField { path: queries_path.clone() })?;
        if queries.is_empty() || queries.iter().all(|query| query.trim().is_empty()) {
            return Err(ConfigError::EmptyField { path: queries_path });
        }

        let coverage = match self.symbols {
            None => SourceCoverage::All,
            Some(raw_symbols) => {
                if raw_symbols.is_empty() {
                    return Err(ConfigError::EmptyField {
                        path: format!("sources[{index}].symbols"),
                    });
                }
                let mut symbols = Vec::with_capacity(raw_symbols.len());
                for (sym_index, raw_symbol) in raw_symbols.iter().enumerate() {
                    let path = format!("sources[{index}].symbols[{sym_index}]");
                    let symbol =
                        Symbol::parse(raw_symbol).map_err(|error| ConfigError::InvalidValue {
                            path: path.clone(),
                            message: error.to_string(),
                        })?;
                    if !assets.iter().any(|asset| asset.symbol == symbol) {
                        return Err(ConfigError::UnknownSymbolReference {
                            path,
                            symbol: symbol.to_string(),
                        });
                    }
                    symbols.push(symbol);
                }
                SourceCoverage::Symbols(symbols)
            }
        };

        let max_items = self.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
        if max_items == 0 {
            return Err(ConfigError::InvalidValue {
                path: format!("sources[{index}].max_items"),
                message: String::from("must be at least 1"),
            });
        }

        Ok(SourceSpec {
            name: name.trim().to_owned(),
            kind,
            queries,
            coverage,
            max_items,
        })
    }
}

fn parse_provider(input: &str) -> Option<ProviderId> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yahoo" => Some(ProviderId::Yahoo),
        "stooq" => Some(ProviderId::Stooq),
        _ => None,
    }
}

fn parse_kind(input: &str) -> Option<SourceKind> {
    match input.trim().to_ascii_lowercase().as_str() {
        "gdelt" => Some(SourceKind::Gdelt),
        "yahoo_finance" => Some(SourceKind::YahooFinance),
        _ => None,
    }
}

fn parse_category(input: &str) -> Option<AssetCategory> {
    match input.trim().to_ascii_lowercase().as_str() {
        "equity" => Some(AssetCategory::Equity),
        "etf" => Some(AssetCategory::Etf),
        "index" => Some(AssetCategory::Index),
        "crypto" => Some(AssetCategory::Crypto),
        "forex" => Some(AssetCategory::Forex),
        "commodity" => Some(AssetCategory::Commodity),
        "other" => Some(AssetCategory::Other),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "assets": [
            {"symbol": "XAU", "provider": "yahoo", "provider_symbol": "GC=F",
             "name": "Gold Futures", "category": "commodity"},
            {"symbol": "BTC", "provider": "stooq", "provider_symbol": "btcusd",
             "name": "Bitcoin", "category": "crypto"}
        ],
        "sources": [
            {"name": "gdelt-markets", "kind": "gdelt",
             "queries": ["{names} market", "{symbols} price"],
             "symbols": ["XAU"]},
            {"name": "yahoo-wire", "kind": "yahoo_finance",
             "queries": ["{symbols}"], "max_items": 5}
        ]
    }"#;

    #[test]
    fn loads_valid_config() {
        let config = Config::from_json(VALID).expect("config should load");
        assert_eq!(config.assets.len(), 2);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.assets[0].provider, ProviderId::Yahoo);
        assert_eq!(config.sources[1].max_items, 5);
        assert_eq!(config.sources[1].coverage, SourceCoverage::All);
        assert_eq!(config.summary_model, DEFAULT_SUMMARY_MODEL);
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let input = r#"{
            "assets": [
                {"symbol": "XAU", "provider": "yahoo"},
                {"symbol": "xau", "provider": "stooq"}
            ]
        }"#;
        let err = Config::from_json(input).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::DuplicateSymbol { ref path, .. } if path == "assets[1].symbol"
        ));
    }

    #[test]
    fn rejects_missing_symbol_with_key_path() {
        let input = r#"{"assets": [{"provider": "yahoo"}]}"#;
        let err = Config::from_json(input).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::MissingField { ref path } if path == "assets[0].symbol"
        ));
    }

    #[test]
    fn rejects_source_referencing_unknown_symbol() {
        let input = r#"{
            "assets": [{"symbol": "XAU", "provider": "yahoo"}],
            "sources": [{"name": "wire", "kind": "gdelt",
                         "queries": ["gold"], "symbols": ["ETH"]}]
        }"#;
        let err = Config::from_json(input).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::UnknownSymbolReference { ref path, ref symbol }
                if path == "sources[0].symbols[0]" && symbol == "ETH"
        ));
    }

    #[test]
    fn defaults_provider_symbol_and_name_to_symbol() {
        let input = r#"{"assets": [{"symbol": "spx", "provider": "stooq"}]}"#;
        let config = Config::from_json(input).expect("config should load");
        assert_eq!(config.assets[0].provider_symbol, "SPX");
        assert_eq!(config.assets[0].name, "SPX");
        assert_eq!(config.assets[0].category, AssetCategory::Other);
    }

    #[test]
    fn rejects_zero_max_items() {
        let input = r#"{
            "assets": [{"symbol": "XAU", "provider": "yahoo"}],
            "sources": [{"name": "wire", "kind": "gdelt",
                         "queries": ["gold"], "max_items": 0}]
        }"#;
        let err = Config::from_json(input).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref path, .. } if path == "sources[0].max_items"
        ));
    }
}
