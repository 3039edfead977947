//! Extractor registry.
//!
//! Maps a leaf type tag to one extractor per operation kind, plus a JSON
//! decoder per tag. Support for a new result family is added by registering
//! handlers through a [`Collaborator`]; the dispatcher never changes.
//!
//! The process-wide registry is built once by [`initialize`] (or lazily by
//! [`global`]) and is read-only afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::{ExtractOptions, FitResult, Kind, LeafType, TypeTag};
use crate::error::{Result, TidyError};
use crate::table::Table;

/// Converts one leaf result into a table.
pub type Extractor = Box<dyn Fn(&dyn FitResult, &ExtractOptions) -> Result<Table> + Send + Sync>;

/// Builds a leaf result from its JSON object.
pub type Decoder = Box<dyn Fn(serde_json::Value) -> Result<Box<dyn FitResult>> + Send + Sync>;

/// A source of registrations (one per supported result family).
pub trait Collaborator: Sync {
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut Registry);
}

#[derive(Default)]
pub struct Registry {
    glance: HashMap<TypeTag, Extractor>,
    tidy: HashMap<TypeTag, Extractor>,
    augment: HashMap<TypeTag, Extractor>,
    decoders: HashMap<TypeTag, Decoder>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("glance", &self.tags(Kind::Glance))
            .field("tidy", &self.tags(Kind::Tidy))
            .field("augment", &self.tags(Kind::Augment))
            .field("decoders", &self.decoder_tags())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated by `collaborators`, in order.
    pub fn with_collaborators(collaborators: &[&dyn Collaborator]) -> Self {
        let mut registry = Self::new();
        for c in collaborators {
            tracing::debug!(collaborator = c.name(), "registering extractors");
            c.register(&mut registry);
        }
        registry
    }

    fn table(&self, kind: Kind) -> &HashMap<TypeTag, Extractor> {
        match kind {
            Kind::Glance => &self.glance,
            Kind::Tidy => &self.tidy,
            Kind::Augment => &self.augment,
        }
    }

    fn table_mut(&mut self, kind: Kind) -> &mut HashMap<TypeTag, Extractor> {
        match kind {
            Kind::Glance => &mut self.glance,
            Kind::Tidy => &mut self.tidy,
            Kind::Augment => &mut self.augment,
        }
    }

    /// Associate `handler` with `tag` for `kind`. Last registration wins.
    pub fn register<F>(&mut self, kind: Kind, tag: TypeTag, handler: F)
    where
        F: Fn(&dyn FitResult, &ExtractOptions) -> Result<Table> + Send + Sync + 'static,
    {
        if self.table_mut(kind).insert(tag, Box::new(handler)).is_some() {
            tracing::debug!(%kind, %tag, "extractor replaced");
        }
    }

    /// Typed form of [`Registry::register`]: the handler receives `&T`.
    pub fn register_for<T, F>(&mut self, kind: Kind, handler: F)
    where
        T: LeafType,
        F: Fn(&T, &ExtractOptions) -> Result<Table> + Send + Sync + 'static,
    {
        self.register(kind, T::TAG, move |value, opts| handler(downcast::<T>(value)?, opts));
    }

    /// Register the JSON decoder for `tag`. Last registration wins.
    pub fn register_decoder<F>(&mut self, tag: TypeTag, decoder: F)
    where
        F: Fn(serde_json::Value) -> Result<Box<dyn FitResult>> + Send + Sync + 'static,
    {
        self.decoders.insert(tag, Box::new(decoder));
    }

    /// Find the most specific extractor for `value`.
    ///
    /// The exact tag wins; otherwise each supertype is tried in turn. Returns
    /// the handler together with the view of `value` it was registered for.
    pub fn resolve<'r, 'v>(&'r self, kind: Kind, value: &'v dyn FitResult) -> Result<(&'r Extractor, &'v dyn FitResult)> {
        let handlers = self.table(kind);
        let mut current = Some(value);
        while let Some(view) = current {
            if let Some(handler) = handlers.get(&view.type_tag()) {
                return Ok((handler, view));
            }
            current = view.supertype();
        }
        Err(TidyError::UnsupportedType {
            kind,
            type_name: value.type_tag().name().to_string(),
        })
    }

    /// Resolve and invoke in one step.
    pub fn extract(&self, kind: Kind, value: &dyn FitResult, opts: &ExtractOptions) -> Result<Table> {
        let (handler, view) = self.resolve(kind, value)?;
        tracing::debug!(%kind, tag = %value.type_tag(), resolved = %view.type_tag(), "extracting leaf");
        handler(view, opts)
    }

    /// Whether `name` is a registered leaf type (has a decoder).
    pub fn is_leaf_tag(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Decode a leaf object whose `"type"` member is `name`.
    pub fn decode(&self, name: &str, value: serde_json::Value) -> Result<Box<dyn FitResult>> {
        let decoder = self.decoders.get(name).ok_or_else(|| TidyError::UnsupportedJson {
            found: format!("object of type '{name}'"),
        })?;
        decoder(value)
    }

    /// Tags with an extractor for `kind`, sorted.
    pub fn tags(&self, kind: Kind) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.table(kind).keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn decoder_tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.decoders.keys().copied().collect();
        tags.sort();
        tags
    }
}

/// Downcast a resolved view to its concrete type.
pub fn downcast<T: LeafType>(value: &dyn FitResult) -> Result<&T> {
    value.as_any().downcast_ref::<T>().ok_or_else(|| TidyError::HandlerMismatch {
        tag: T::TAG.name(),
        found: value.type_tag().name().to_string(),
    })
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Build the process-wide registry from `collaborators`.
///
/// Only the first call has an effect; later calls return the registry built
/// by the first one. Must run before any extraction that uses [`global`].
pub fn initialize(collaborators: &[&dyn Collaborator]) -> &'static Registry {
    let mut fresh = false;
    let registry = GLOBAL.get_or_init(|| {
        fresh = true;
        Registry::with_collaborators(collaborators)
    });
    if fresh {
        tracing::info!(
            collaborators = collaborators.len(),
            leaf_types = registry.decoder_tags().len(),
            "extractor registry initialized"
        );
    } else {
        tracing::debug!("extractor registry already initialized");
    }
    registry
}

/// The process-wide registry, initialized with the built-in collaborators
/// on first use.
pub fn global() -> &'static Registry {
    match GLOBAL.get() {
        Some(registry) => registry,
        None => initialize(&crate::models::builtin_collaborators()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use crate::models::{MinimizerResult, ModelResult};
    use crate::table::Value;

    fn marker(label: &'static str) -> impl Fn(&dyn FitResult, &ExtractOptions) -> Result<Table> + Send + Sync {
        move |_, _| Table::from_record([("handler", Value::from(label))])
    }

    fn handler_label(table: &Table) -> Value {
        table.column("handler").unwrap().values()[0].clone()
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = Registry::new();
        registry.register(Kind::Glance, MinimizerResult::TAG, marker("first"));
        registry.register(Kind::Glance, MinimizerResult::TAG, marker("second"));

        let result = fixtures::minimizer_result(3);
        let table = registry.extract(Kind::Glance, &result, &ExtractOptions::default()).unwrap();
        assert_eq!(handler_label(&table), Value::from("second"));
    }

    #[test]
    fn exact_tag_beats_supertype() {
        let mut registry = Registry::new();
        registry.register(Kind::Glance, MinimizerResult::TAG, marker("base"));
        registry.register(Kind::Glance, ModelResult::TAG, marker("derived"));

        let model = fixtures::model_result(2, 10);
        let table = registry.extract(Kind::Glance, &model, &ExtractOptions::default()).unwrap();
        assert_eq!(handler_label(&table), Value::from("derived"));

        let base = fixtures::minimizer_result(2);
        let table = registry.extract(Kind::Glance, &base, &ExtractOptions::default()).unwrap();
        assert_eq!(handler_label(&table), Value::from("base"));
    }

    #[test]
    fn falls_back_to_supertype_view() {
        let mut registry = Registry::new();
        registry.register(Kind::Tidy, MinimizerResult::TAG, marker("base"));

        let model = fixtures::model_result(2, 10);
        let (_, view) = registry.resolve(Kind::Tidy, &model).unwrap();
        assert_eq!(view.type_tag(), MinimizerResult::TAG);
        assert!(downcast::<MinimizerResult>(view).is_ok());
    }

    #[test]
    fn unresolved_type_is_named() {
        let registry = Registry::new();
        let model = fixtures::model_result(2, 10);
        let Err(err) = registry.resolve(Kind::Augment, &model) else {
            panic!("expected UnsupportedType");
        };
        match err {
            TidyError::UnsupportedType { kind, type_name } => {
                assert_eq!(kind, Kind::Augment);
                assert_eq!(type_name, "ModelResult");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn typed_registration_reports_mismatch() {
        let mut registry = Registry::new();
        // Deliberately register a ModelResult handler under the base tag.
        registry.register(Kind::Tidy, MinimizerResult::TAG, |value, _| {
            downcast::<ModelResult>(value).map(|_| Table::new())
        });
        let base = fixtures::minimizer_result(1);
        let err = registry.extract(Kind::Tidy, &base, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, TidyError::HandlerMismatch { .. }), "got {err}");
    }

    #[test]
    fn builtin_registry_knows_all_leaf_types() {
        let registry = Registry::with_collaborators(&crate::models::builtin_collaborators());
        for tag in ["MinimizerResult", "ModelResult", "OptimizeResult", "OlsResult"] {
            assert!(registry.is_leaf_tag(tag), "{tag} should have a decoder");
        }
        assert!(!registry.is_leaf_tag("Histogram"));
        assert!(registry.tags(Kind::Augment).contains(&ModelResult::TAG));
        assert!(!registry.tags(Kind::Augment).contains(&MinimizerResult::TAG));
    }

    #[test]
    fn initialize_is_idempotent() {
        let first = initialize(&crate::models::builtin_collaborators());
        let second = initialize(&[]);
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, global()));
    }
}
