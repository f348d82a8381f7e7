//! Operator registry
//!
//! Maps operator names to implementations and entity types to operator
//! configurations. Built once at startup; lookups afterwards are read-only.
//!
//! Resolution order for an entity type:
//! 1. per-call override for that entity type
//! 2. per-call `DEFAULT` override
//! 3. configured default for that entity type
//! 4. configured `DEFAULT`
//! 5. system default: `replace` with `<ENTITY_TYPE>`
//!
//! Every resolved configuration is validated by its operator before it is
//! returned, so a bad batch fails before any text is mutated.

use crate::anonymization::operators::{self, Operator, OperatorConfig};
use crate::domain::{Result, ShroudError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Key applying an override to every entity type without a specific one
pub const DEFAULT_ENTITY: &str = "DEFAULT";

/// Per-call operator configuration keyed by entity type
pub type OperatorOverrides = HashMap<String, OperatorConfig>;

/// Name-keyed operator table plus per-entity defaults
///
/// # Examples
///
/// ```
/// use shroud::anonymization::operators::OperatorConfig;
/// use shroud::anonymization::registry::OperatorRegistry;
///
/// let registry = OperatorRegistry::new()
///     .with_default("EMAIL_ADDRESS", OperatorConfig::redact())?;
///
/// assert_eq!(registry.resolve("EMAIL_ADDRESS", None)?.name, "redact");
/// assert_eq!(registry.resolve("PERSON", None)?.name, "replace");
/// # Ok::<(), shroud::domain::ShroudError>(())
/// ```
#[derive(Clone)]
pub struct OperatorRegistry {
    operators: BTreeMap<String, Arc<dyn Operator>>,
    defaults: HashMap<String, OperatorConfig>,
}

impl OperatorRegistry {
    /// Registry with all built-in operators and no entity defaults
    pub fn new() -> Self {
        let mut registry = Self {
            operators: BTreeMap::new(),
            defaults: HashMap::new(),
        };
        for operator in operators::builtin_operators() {
            registry.register(operator);
        }
        registry
    }

    /// Register (or replace) an operator under its own name
    pub fn register(&mut self, operator: Arc<dyn Operator>) {
        tracing::trace!(operator = operator.name(), "Registered operator");
        self.operators.insert(operator.name().to_string(), operator);
    }

    /// Set the configured default for an entity type
    ///
    /// # Errors
    ///
    /// Fails if the operator is unknown or its parameters are invalid.
    pub fn with_default(
        mut self,
        entity_type: impl Into<String>,
        config: OperatorConfig,
    ) -> Result<Self> {
        let entity_type = entity_type.into();
        self.validate(&config, &entity_type)?;
        self.defaults.insert(entity_type, config);
        Ok(self)
    }

    /// Registered operator names, sorted
    pub fn operator_names(&self) -> Vec<&str> {
        self.operators.keys().map(String::as_str).collect()
    }

    /// Look up an operator implementation by name
    pub fn operator(&self, name: &str) -> Result<&Arc<dyn Operator>> {
        self.operators
            .get(name)
            .ok_or_else(|| ShroudError::UnknownOperator {
                name: name.to_string(),
            })
    }

    /// Resolve and validate the operator configuration for an entity type
    pub fn resolve(
        &self,
        entity_type: &str,
        overrides: Option<&OperatorOverrides>,
    ) -> Result<OperatorConfig> {
        let config = overrides
            .and_then(|o| o.get(entity_type).or_else(|| o.get(DEFAULT_ENTITY)))
            .or_else(|| {
                self.defaults
                    .get(entity_type)
                    .or_else(|| self.defaults.get(DEFAULT_ENTITY))
            })
            .cloned()
            .unwrap_or_else(|| OperatorConfig::replace(None));

        self.validate(&config, entity_type)?;
        Ok(config)
    }

    /// Resolve every distinct entity type up front
    ///
    /// Returns the first failure; nothing is applied if any entity type fails.
    pub fn resolve_all<'a, I>(
        &self,
        entity_types: I,
        overrides: Option<&OperatorOverrides>,
    ) -> Result<HashMap<String, OperatorConfig>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved = HashMap::new();
        for entity_type in entity_types {
            if !resolved.contains_key(entity_type) {
                let config = self.resolve(entity_type, overrides)?;
                resolved.insert(entity_type.to_string(), config);
            }
        }
        Ok(resolved)
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        self.operator(&config.name)?.validate(config, entity_type)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.operator_names())
            .field("defaults", &self.defaults)
            .finish()
    }
}
