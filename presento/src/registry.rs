//! Registries for presenters, transformers and naming strategies
//!
//! Nested projection rules and presenters name their collaborators by
//! identifier. The registry maps those identifiers to factories, transformers
//! with prebuilt hook tables, and naming strategy functions.
//!
//! A process-wide instance is available through [`Registry::global`];
//! tests and embedders can build isolated registries with [`Registry::new`].

use crate::presenter::{Handle, Present, Presenter};
use crate::transformer::{RegisteredTransformer, Transformation, Transformer};
use ahash::AHashMap;
use presento_format::casing::{kebab_to_camel_case, snake_to_camel_case};
use presento_format::{PresentoError, ProjectionLimits, Result};
use serde_json::{Map, Value};
use std::ops::RangeInclusive;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Function turning a property name into a hook identifier
pub type NamingStrategy = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Everything a factory needs to build a nested presenter
pub struct NestedContext<'a> {
    /// Sub-record resolved from the rule's path
    pub data: Value,
    /// Transformer override from the rule
    pub transformer: Option<String>,
    /// Extra constructor arguments from the rule
    pub args: &'a [Value],
    /// Depth the nested presenter runs at (top-level presenters are 0)
    pub depth: usize,
    /// Limits inherited from the parent presenter
    pub limits: &'a ProjectionLimits,
    /// Registry the parent presenter resolves against
    pub registry: &'a Arc<Registry>,
}

/// Result of instantiating a registered identifier
pub enum Built {
    /// Object exposing the presenter capability
    Presenter(Box<dyn Handle>),
    /// Object without the presenter capability
    Inert,
}

/// Trait for building nested presenters by identifier
pub trait PresenterFactory: Send + Sync {
    /// Accepted number of extra arguments
    fn arity(&self) -> RangeInclusive<usize> {
        0..=usize::MAX
    }

    /// Build the object for a nested rule
    fn build(&self, ctx: NestedContext<'_>) -> Result<Built>;
}

/// Factory wrapping a presenter definition constructor
struct DefinitionFactory<F> {
    construct: F,
    arity: RangeInclusive<usize>,
}

impl<F, P> PresenterFactory for DefinitionFactory<F>
where
    F: Fn(&[Value]) -> Result<P> + Send + Sync,
    P: Present + 'static,
{
    fn arity(&self) -> RangeInclusive<usize> {
        self.arity.clone()
    }

    fn build(&self, ctx: NestedContext<'_>) -> Result<Built> {
        let definition = (self.construct)(ctx.args)?;
        Ok(Built::Presenter(Box::new(Presenter::nested(definition, ctx))))
    }
}

/// Factory for identifiers that resolve to non-presenters
struct InertFactory;

impl PresenterFactory for InertFactory {
    fn build(&self, _ctx: NestedContext<'_>) -> Result<Built> {
        Ok(Built::Inert)
    }
}

/// Registry of presenters, transformers and naming strategies
pub struct Registry {
    presenters: RwLock<AHashMap<String, Arc<dyn PresenterFactory>>>,
    transformers: RwLock<AHashMap<String, Arc<RegisteredTransformer>>>,
    strategies: RwLock<AHashMap<String, NamingStrategy>>,
}

impl Registry {
    /// Create a registry holding only the built-in naming strategies
    pub fn new() -> Self {
        let mut strategies: AHashMap<String, NamingStrategy> = AHashMap::new();
        strategies.insert("to_camel_case".to_string(), Arc::new(snake_to_camel_case));
        strategies.insert(
            "kebab_to_camel_case".to_string(),
            Arc::new(kebab_to_camel_case),
        );

        Self {
            presenters: RwLock::new(AHashMap::new()),
            transformers: RwLock::new(AHashMap::new()),
            strategies: RwLock::new(strategies),
        }
    }

    /// Get the global singleton instance
    pub fn global() -> Arc<Self> {
        static INSTANCE: OnceLock<Arc<Registry>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(Registry::new())).clone()
    }

    /// Register a presenter built from a definition constructor
    ///
    /// The constructor receives the rule's extra arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if a presenter with the same name is already registered
    pub fn register_presenter<F, P>(&self, name: impl Into<String>, construct: F) -> Result<()>
    where
        F: Fn(&[Value]) -> Result<P> + Send + Sync + 'static,
        P: Present + 'static,
    {
        self.register_presenter_with_arity(name, 0..=usize::MAX, construct)
    }

    /// Register a presenter accepting only `arity` extra arguments
    pub fn register_presenter_with_arity<F, P>(
        &self,
        name: impl Into<String>,
        arity: RangeInclusive<usize>,
        construct: F,
    ) -> Result<()>
    where
        F: Fn(&[Value]) -> Result<P> + Send + Sync + 'static,
        P: Present + 'static,
    {
        self.register_factory(name, Arc::new(DefinitionFactory { construct, arity }))
    }

    /// Register an identifier whose instances cannot present
    ///
    /// Nested rules naming it emit their own wire form as a literal.
    pub fn register_inert(&self, name: impl Into<String>) -> Result<()> {
        self.register_factory(name, Arc::new(InertFactory))
    }

    /// Register a custom presenter factory
    pub fn register_factory(
        &self,
        name: impl Into<String>,
        factory: Arc<dyn PresenterFactory>,
    ) -> Result<()> {
        let name = name.into();
        let mut presenters = self
            .presenters
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if presenters.contains_key(&name) {
            return Err(PresentoError::PresenterAlreadyRegistered { name });
        }

        presenters.insert(name, factory);
        Ok(())
    }

    /// Unregister a presenter by name
    pub fn unregister_presenter(&self, name: &str) -> Option<Arc<dyn PresenterFactory>> {
        self.presenters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Check if a presenter is registered
    pub fn has_presenter(&self, name: &str) -> bool {
        self.presenters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// List registered presenter names, sorted
    pub fn presenters(&self) -> Vec<String> {
        let presenters = self
            .presenters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = presenters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate the presenter registered as `name`
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is unknown or the argument count is outside
    /// the factory's arity
    pub fn build_presenter(&self, name: &str, ctx: NestedContext<'_>) -> Result<Built> {
        let factory = self
            .presenters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| PresentoError::UnknownPresenter {
                name: name.to_string(),
            })?;

        let arity = factory.arity();
        if !arity.contains(&ctx.args.len()) {
            return Err(PresentoError::PresenterArity {
                presenter: name.to_string(),
                min: *arity.start(),
                max: *arity.end(),
                found: ctx.args.len(),
            });
        }

        factory.build(ctx)
    }

    /// Register a transformer, building its hook table once
    ///
    /// # Errors
    ///
    /// Returns an error if a transformer with the same name is already registered
    pub fn register_transformer(
        &self,
        name: impl Into<String>,
        transformer: Arc<dyn Transformer>,
    ) -> Result<()> {
        let name = name.into();
        let mut transformers = self
            .transformers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if transformers.contains_key(&name) {
            return Err(PresentoError::TransformerAlreadyRegistered { name });
        }

        let registered = Arc::new(RegisteredTransformer::new(name.clone(), transformer));
        transformers.insert(name, registered);
        Ok(())
    }

    /// Unregister a transformer by name
    pub fn unregister_transformer(&self, name: &str) -> Option<Arc<RegisteredTransformer>> {
        self.transformers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Get a registered transformer by name
    pub fn transformer(&self, name: &str) -> Option<Arc<RegisteredTransformer>> {
        self.transformers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Register a naming strategy usable by transformers
    ///
    /// # Errors
    ///
    /// Returns an error if a strategy with the same name is already registered
    pub fn register_naming_strategy<F>(&self, name: impl Into<String>, strategy: F) -> Result<()>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        let mut strategies = self
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if strategies.contains_key(&name) {
            return Err(PresentoError::NamingStrategyAlreadyRegistered { name });
        }

        strategies.insert(name, Arc::new(strategy));
        Ok(())
    }

    /// Get a naming strategy by name
    pub fn naming_strategy(&self, name: &str) -> Option<NamingStrategy> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Run the transformer registered as `name` over a keyed record
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is unknown or its naming strategy
    /// cannot be resolved; no hook runs in either case
    pub fn transform(&self, name: &str, record: Map<String, Value>) -> Result<Map<String, Value>> {
        let transformer = self
            .transformer(name)
            .ok_or_else(|| PresentoError::UnknownTransformer {
                name: name.to_string(),
            })?;

        let transformation = Transformation::new(&transformer, self)?;
        Ok(transformation.apply(record))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
