//! Serializers that narrow their output fields from the request.
//!
//! [`QueryFieldsSerializer`] is the behavior: implement the three accessors and
//! every other capability has a default that can be overridden per host type.
//! [`Serializer`] is a ready-made host built through [`SerializerBuilder`],
//! which runs selection exactly once during `build()`.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::SelectorConfig;
use crate::error::{QueryFieldsError, Result};
use crate::fields::{Field, FieldSet, ForcedFields};
use crate::params::QueryParams;
use crate::request::{RequestContext, SerializerContext};
use crate::selector::{
    compute_drop_set, forced_drop_set, FieldSpec, Selection, SELECTABLE_METHOD,
};

/// Request-driven field selection for a host that owns a [`FieldSet`].
pub trait QueryFieldsSerializer {
    /// The host's field type.
    type Field;

    /// The declared fields still in play.
    fn fields(&self) -> &FieldSet<Self::Field>;

    /// Mutable access used to remove dropped fields.
    fn fields_mut(&mut self) -> &mut FieldSet<Self::Field>;

    /// Construction context, read by the default [`get_request`](Self::get_request).
    fn context(&self) -> &SerializerContext;

    /// Parameter names and delimiter for this host type.
    fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::default()
    }

    /// The request this serializer renders for.
    ///
    /// Returns [`QueryFieldsError::MisconfiguredSerializer`] when the context
    /// carries no request. Overrides may return other errors; those are never
    /// swallowed.
    fn get_request(&self) -> Result<Arc<dyn RequestContext>> {
        self.context()
            .request()
            .cloned()
            .ok_or(QueryFieldsError::MisconfiguredSerializer)
    }

    /// The request method, `None` when the request has none.
    fn get_method(&self, request: &dyn RequestContext) -> Option<String> {
        request.method().map(str::to_string)
    }

    /// The request's query parameters.
    fn get_query_params(&self, request: &dyn RequestContext) -> QueryParams {
        request.query_params()
    }

    /// Narrow the field set.
    ///
    /// A missing request leaves the fields untouched and yields
    /// [`Selection::NoRequest`]. Any other error from
    /// [`get_request`](Self::get_request) is returned.
    fn apply_selection(&mut self, forced: Option<&ForcedFields>) -> Result<Selection> {
        match self.try_apply_selection(forced) {
            Err(err) if err.is_misconfigured() => {
                debug!("no request in serializer context, skipping field selection");
                Ok(Selection::NoRequest)
            }
            other => other,
        }
    }

    /// Like [`apply_selection`](Self::apply_selection), but a missing request
    /// is returned as an error too.
    fn try_apply_selection(&mut self, forced: Option<&ForcedFields>) -> Result<Selection> {
        if let Some(forced) = forced.filter(|forced| !forced.is_empty()) {
            let drop = forced_drop_set(self.fields().names(), forced);
            let dropped = self.fields_mut().remove_all(&drop);
            debug!(
                kept = self.fields().len(),
                dropped = dropped.len(),
                "applied forced fields"
            );
            return Ok(Selection::Forced { dropped });
        }

        let request = self.get_request()?;

        let method = self.get_method(request.as_ref());
        if method.as_deref() != Some(SELECTABLE_METHOD) {
            trace!(method = ?method, "method not filtered");
            return Ok(Selection::MethodNotFiltered { method });
        }

        let params = self.get_query_params(request.as_ref());
        let spec = FieldSpec::from_params(&params, &self.selector_config());
        trace!(include = ?spec.include, exclude = ?spec.exclude, "parsed field spec");

        if spec.is_empty() {
            return Ok(Selection::NoPreference);
        }

        let drop = compute_drop_set(self.fields().names(), &spec);
        let dropped = self.fields_mut().remove_all(&drop);
        debug!(
            kept = self.fields().len(),
            dropped = ?dropped,
            "applied query field selection"
        );

        Ok(Selection::Filtered { dropped })
    }
}

/// A serializer host that renders JSON objects from its remaining fields.
#[derive(Debug)]
pub struct Serializer<F> {
    fields: FieldSet<F>,
    context: SerializerContext,
    config: SelectorConfig,
    selection: Selection,
}

impl<F: Field> Serializer<F> {
    pub fn builder(fields: FieldSet<F>) -> SerializerBuilder<F> {
        SerializerBuilder::new(fields)
    }

    /// Outcome of the selection that ran when this serializer was built.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Render the remaining fields of `instance`, in declaration order.
    pub fn to_representation(&self, instance: &Value) -> Value {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, field)| (name.to_string(), field.to_representation(instance)))
            .collect();
        Value::Object(object)
    }

    /// Render each instance of a list.
    pub fn to_representation_many(&self, instances: &[Value]) -> Value {
        Value::Array(
            instances
                .iter()
                .map(|instance| self.to_representation(instance))
                .collect(),
        )
    }
}

impl<F> QueryFieldsSerializer for Serializer<F> {
    type Field = F;

    fn fields(&self) -> &FieldSet<F> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut FieldSet<F> {
        &mut self.fields
    }

    fn context(&self) -> &SerializerContext {
        &self.context
    }

    fn selector_config(&self) -> SelectorConfig {
        self.config.clone()
    }
}

/// Builder for [`Serializer`]. Created by [`Serializer::builder`].
pub struct SerializerBuilder<F> {
    fields: FieldSet<F>,
    context: SerializerContext,
    config: SelectorConfig,
    forced: Option<ForcedFields>,
}

impl<F: Field> SerializerBuilder<F> {
    pub fn new(fields: FieldSet<F>) -> Self {
        Self {
            fields,
            context: SerializerContext::default(),
            config: SelectorConfig::default(),
            forced: None,
        }
    }

    pub fn context(mut self, context: SerializerContext) -> Self {
        self.context = context;
        self
    }

    /// Shorthand for a context carrying `request`.
    pub fn request<R: RequestContext + 'static>(self, request: R) -> Self {
        self.context(SerializerContext::with_request(request))
    }

    pub fn config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep exactly these fields, ignoring the request entirely.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forced = Some(names.into_iter().collect());
        self
    }

    /// Validate the config and build, running field selection once.
    ///
    /// Fails on an invalid config or on a request lookup error other than
    /// a missing request.
    pub fn build(self) -> Result<Serializer<F>> {
        let (mut serializer, forced) = self.assemble()?;
        serializer.selection = serializer.apply_selection(forced.as_ref())?;
        Ok(serializer)
    }

    /// Build, propagating a missing request as an error.
    pub fn build_strict(self) -> Result<Serializer<F>> {
        let (mut serializer, forced) = self.assemble()?;
        serializer.selection = serializer.try_apply_selection(forced.as_ref())?;
        Ok(serializer)
    }

    // The forced names are handed back separately and never stored.
    fn assemble(self) -> Result<(Serializer<F>, Option<ForcedFields>)> {
        self.config.validate()?;
        let serializer = Serializer {
            fields: self.fields,
            context: self.context,
            config: self.config,
            selection: Selection::NoPreference,
        };
        Ok((serializer, self.forced))
    }
}
