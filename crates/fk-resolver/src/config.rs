// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolver settings, read from environment variables.
//!
//! - `INDEXER_FK_ON_DELETE`: referential action on delete (default `no action`)
//! - `INDEXER_FK_ON_UPDATE`: referential action on update (default `no action`)
//! - `INDEXER_FK_MAX_LIST_REFERENCES`: list references allowed per entity (default 10)

use std::collections::HashMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ON_DELETE_ENV: &str = "INDEXER_FK_ON_DELETE";
pub const ON_UPDATE_ENV: &str = "INDEXER_FK_ON_UPDATE";
pub const MAX_LIST_REFERENCES_ENV: &str = "INDEXER_FK_MAX_LIST_REFERENCES";

/// Maximum number of list (many-to-many) references an entity may declare.
pub const DEFAULT_MAX_LIST_REFERENCES: usize = 10;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(values: [(&str, &str); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    Restrict,
}

impl ReferentialAction {
    /// Parse a user-supplied action. Case, `_` and `-` are not significant (`SET_NULL`, `set-null`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ");

        match normalized.as_str() {
            "no action" | "noaction" => Some(Self::NoAction),
            "cascade" => Some(Self::Cascade),
            "set null" | "setnull" => Some(Self::SetNull),
            "restrict" => Some(Self::Restrict),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
        }
    }
}

impl Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
    pub max_list_references: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
            max_list_references: DEFAULT_MAX_LIST_REFERENCES,
        }
    }
}

impl ResolverConfig {
    /// Read the configuration, falling back to defaults for unset variables.
    pub fn from_env(env: &dyn Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let action = |key: &'static str, default: ReferentialAction| match env.get(key) {
            Some(value) => ReferentialAction::parse(&value)
                .ok_or(ConfigError::InvalidReferentialAction { key, value }),
            None => Ok(default),
        };

        let max_list_references = match env.get(MAX_LIST_REFERENCES_ENV) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(max) if max > 0 => max,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: MAX_LIST_REFERENCES_ENV,
                        value,
                    });
                }
            },
            None => defaults.max_list_references,
        };

        Ok(Self {
            on_delete: action(ON_DELETE_ENV, defaults.on_delete)?,
            on_update: action(ON_UPDATE_ENV, defaults.on_update)?,
            max_list_references,
        })
    }
}
