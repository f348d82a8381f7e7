//! Hashing operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, HASH};
use crate::domain::Result;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashType {
    #[default]
    Sha256,
    Sha512,
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl FromStr for HashType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(format!(
                "unsupported hash_type '{other}'. Must be one of: sha256, sha512"
            )),
        }
    }
}

/// Replaces the span with a lowercase hex digest
///
/// An optional `salt` is appended to the input before hashing. Without a salt
/// the output is deterministic, so equal values hash equally across calls.
pub struct Hash;

impl Hash {
    fn hash_type(config: &OperatorConfig, entity_type: &str) -> Result<HashType> {
        match config.optional_str("hash_type", entity_type)? {
            None => Ok(HashType::default()),
            Some(s) => s.parse().map_err(|e: String| config.invalid(entity_type, e)),
        }
    }

    fn digest(hash_type: HashType, input: &[u8]) -> String {
        match hash_type {
            HashType::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(input);
                format!("{:x}", hasher.finalize())
            }
            HashType::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(input);
                format!("{:x}", hasher.finalize())
            }
        }
    }
}

impl Operator for Hash {
    fn name(&self) -> &str {
        HASH
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        Self::hash_type(config, entity_type)?;
        config.optional_str("salt", entity_type)?;
        Ok(())
    }

    fn operate(
        &self,
        original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        let hash_type = Self::hash_type(config, ctx.entity_type)?;
        let salt = config.optional_str("salt", ctx.entity_type)?.unwrap_or("");

        let mut input = Vec::with_capacity(original.len() + salt.len());
        input.extend_from_slice(original.as_bytes());
        input.extend_from_slice(salt.as_bytes());

        Ok(Operated::text(Self::digest(hash_type, &input)))
    }
}
