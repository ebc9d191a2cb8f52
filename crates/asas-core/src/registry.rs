//! Catalogue of detection methods and the currently active one.

use crate::error::DetectionError;
use crate::statebased::StateBased;
use crate::strategy::{DetectionStrategy, NoDetection};

/// Console name of the inert method.
pub const OFF: &str = "OFF";
/// Console keyword for "first registered method".
pub const ON: &str = "ON";

/// Registered detection methods, in registration order.
///
/// Exactly one method is active at a time. `selected == None` means the
/// inert [`NoDetection`] method is active.
pub struct StrategyRegistry {
    inert: NoDetection,
    strategies: Vec<Box<dyn DetectionStrategy>>,
    selected: Option<usize>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRegistry {
    /// An empty registry with detection switched off.
    pub fn new() -> Self {
        Self {
            inert: NoDetection,
            strategies: Vec::new(),
            selected: None,
        }
    }

    /// A registry holding the methods shipped with this crate, switched off.
    pub fn with_builtin() -> Self {
        Self {
            strategies: vec![Box::new(StateBased)],
            ..Self::new()
        }
    }

    /// Add a method. Names are matched exactly and must be unique.
    pub fn register(&mut self, strategy: Box<dyn DetectionStrategy>) -> Result<(), DetectionError> {
        let name = strategy.name();
        if name == OFF || name == ON {
            return Err(DetectionError::ReservedName(name.to_string()));
        }
        if self.position(name).is_some() {
            return Err(DetectionError::DuplicateMethod(name.to_string()));
        }
        self.strategies.push(strategy);
        Ok(())
    }

    /// Known method names, with the inert method listed first as `OFF`.
    pub fn list_names(&self) -> Vec<String> {
        std::iter::once(OFF.to_string())
            .chain(self.strategies.iter().map(|s| s.name().to_string()))
            .collect()
    }

    pub fn active(&self) -> &dyn DetectionStrategy {
        match self.selected {
            Some(idx) => self.strategies[idx].as_ref(),
            None => &self.inert,
        }
    }

    /// Name of the active method, `OFF` when detection is disabled.
    pub fn active_name(&self) -> &str {
        self.active().name()
    }

    pub fn is_off(&self) -> bool {
        self.selected.is_none()
    }

    /// Activate a method by name and return the name that became active.
    ///
    /// `OFF` selects the inert method and `ON` the first registered one.
    /// On error the active method is unchanged.
    pub fn select(&mut self, name: &str) -> Result<&str, DetectionError> {
        self.selected = match name {
            OFF => None,
            ON => {
                if self.strategies.is_empty() {
                    return Err(DetectionError::NoMethodsRegistered);
                }
                Some(0)
            }
            _ => Some(self.position(name).ok_or_else(|| DetectionError::UnknownMethod {
                name: name.to_string(),
                available: self.list_names().join(", "),
            })?),
        };
        Ok(self.active_name())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.strategies.iter().position(|s| s.name() == name)
    }
}
