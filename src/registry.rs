//! Benchmark area registry.
//!
//! Areas are registered explicitly at startup; the CLI looks them up by name
//! and runs either the requested ones or every default area.

use crate::error::{MeasureError, Result};
use crate::harness::Harness;

/// A group of related benchmarks.
pub trait BenchmarkArea {
    /// Name of the area (e.g., "MethodCalls"); also the result category
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Whether the area runs when no areas are named explicitly
    fn is_default(&self) -> bool {
        true
    }

    /// Measure every benchmark in the area through the harness timers
    fn run(&self, harness: &mut Harness) -> Result<()>;
}

/// All known benchmark areas, in registration order
pub struct AreaRegistry {
    areas: Vec<Box<dyn BenchmarkArea>>,
}

impl AreaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { areas: Vec::new() }
    }

    /// Register an area
    pub fn register<A: BenchmarkArea + 'static>(&mut self, area: A) {
        self.areas.push(Box::new(area));
    }

    /// Get all registered areas
    pub fn all(&self) -> &[Box<dyn BenchmarkArea>] {
        &self.areas
    }

    /// Areas run when none are requested
    pub fn defaults(&self) -> Vec<&dyn BenchmarkArea> {
        self.areas
            .iter()
            .filter(|a| a.is_default())
            .map(|a| a.as_ref())
            .collect()
    }

    /// Find an area by name, ignoring ASCII case
    pub fn find(&self, name: &str) -> Option<&dyn BenchmarkArea> {
        self.areas
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .map(|a| a.as_ref())
    }

    /// List area names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.areas.iter().map(|a| a.name()).collect()
    }

    /// Resolve requested names, or the defaults when `names` is empty
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&dyn BenchmarkArea>> {
        if names.is_empty() {
            return Ok(self.defaults());
        }
        names
            .iter()
            .map(|name| {
                self.find(name.as_ref()).ok_or_else(|| MeasureError::UnknownArea {
                    name: name.as_ref().to_string(),
                })
            })
            .collect()
    }
}

impl Default for AreaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default registry with all areas
pub fn build_registry() -> AreaRegistry {
    let mut registry = AreaRegistry::new();

    registry.register(crate::areas::method_calls::MethodCallsArea);
    registry.register(crate::areas::arrays::ArraysArea);
    registry.register(crate::areas::control_flow::ControlFlowArea);
    registry.register(crate::areas::random::RandomArea);
    registry.register(crate::areas::objects::ObjectsArea);
    registry.register(crate::areas::sorting::SortingArea);

    registry
}
