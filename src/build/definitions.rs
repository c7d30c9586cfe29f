use crate::result::{CcBuildError, Result};
use crate::utils::console;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: SmolStr,
    pub value: SmolStr,
}

/** Insertion-ordered preprocessor definitions injected into every compile
 *
 * # Behavior
 * - `define` inserts or overwrites and never fails; redefining an existing
 *   name keeps its position and emits a `[!]` warning naming the old and
 *   new value
 * - `undefine` removes a name and is a `NotFound` error when it is absent
 * - `render_flags` produces one `-DNAME=VALUE` argument per definition in
 *   insertion order, ready to append to a compiler invocation
 *
 * The registry is tiny in practice, so it is a plain vector with linear
 * lookups rather than a map.
 */
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<Definition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let name = name.into();
        let value = value.into();

        if let Some(existing) = self.definitions.iter_mut().find(|d| d.name == name) {
            console::warn(format!(
                "Redefining key '{}' from '{}' to '{}'",
                name, existing.value, value
            ));
            existing.value = value;
            return;
        }

        self.definitions.push(Definition { name, value });
    }

    pub fn undefine(&mut self, name: &str) -> Result<()> {
        let index = self
            .definitions
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| {
                CcBuildError::NotFound(
                    format!("Attempt to undefine key '{}' which does not exist", name).into(),
                )
            })?;

        self.definitions.remove(index);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn render_flags(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|d| format!("-D{}={}", d.name, d.value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
