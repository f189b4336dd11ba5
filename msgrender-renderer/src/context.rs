//! Rendering context: placeholder scanning, resolution, and substitution.

use indexmap::IndexMap;
use serde_json::Value;

use msgrender_core::{
    fetcher, ConfigError, ContextDefinition, PathError, Placeholder, PlaceholderInfo,
    Placeholders, Rendered, Template,
};

use crate::error::RenderError;
use crate::substitute::substitute;

/// Per-call rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Substitute even when some used placeholder resolved to `""`.
    pub allow_incomplete: bool,
}

impl RenderOptions {
    pub fn allow_incomplete() -> Self {
        Self {
            allow_incomplete: true,
        }
    }
}

/// Named placeholder configuration plus the logic to render templates
/// against records.
///
/// The configuration is read-only during rendering; it only changes through
/// [`RenderingContext::set_placeholders_config`], which replaces it whole.
#[derive(Debug, Clone)]
pub struct RenderingContext {
    context_type: String,
    name: String,
    placeholders: Placeholders,
}

impl RenderingContext {
    pub fn new(
        context_type: impl Into<String>,
        name: impl Into<String>,
        placeholders: Placeholders,
    ) -> Self {
        Self {
            context_type: context_type.into(),
            name: name.into(),
            placeholders,
        }
    }

    /// Build a context from any [`ContextDefinition`].
    pub fn from_definition<D>(definition: &D) -> Result<Self, ConfigError>
    where
        D: ContextDefinition + ?Sized,
    {
        Ok(Self::new(
            definition.context_type(),
            definition.name(),
            definition.define_placeholders()?,
        ))
    }

    pub fn context_type(&self) -> &str {
        &self.context_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full configuration, used or not.
    pub fn placeholders_in_config(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Replace the whole placeholder configuration.
    pub fn set_placeholders_config(&mut self, placeholders: Placeholders) -> &mut Self {
        self.placeholders = placeholders;
        self
    }

    /// Title, description, and sample for every configured placeholder.
    pub fn placeholders_info(&self) -> IndexMap<String, PlaceholderInfo> {
        self.placeholders
            .iter()
            .map(|(key, p)| (key.clone(), PlaceholderInfo::from(p)))
            .collect()
    }

    /// The configured placeholders whose key occurs anywhere in `template`.
    pub fn placeholders_used_in(&self, template: &Template) -> Placeholders {
        self.placeholders.filtered(|key, _| template.contains(key))
    }

    // NOTE: plain substring containment. A key that is a substring of another
    // key (`_A_` inside `_A_1_`) counts as used whenever the longer one is
    // present, even though substitution will replace the longer one. Existing
    // templates rely on this, so it is kept.
    fn used<'a>(
        &'a self,
        template: &'a Template,
    ) -> impl Iterator<Item = (&'a String, &'a Placeholder)> + 'a {
        self.placeholders
            .iter()
            .filter(move |(key, _)| template.contains(key))
    }

    /// Resolve every used placeholder against `record`.
    ///
    /// Values are trimmed; an empty value is replaced by the placeholder's
    /// `empty` fallback when one is configured. The result may still contain
    /// `""` entries.
    pub fn resolve_values(
        &self,
        template: &Template,
        record: &Value,
    ) -> Result<IndexMap<String, String>, PathError> {
        self.used(template)
            .map(|(key, placeholder)| {
                let text = fetcher::resolve_text(&placeholder.fetcher, record)?;
                let text = if text.is_empty() {
                    placeholder.empty.clone().unwrap_or_default()
                } else {
                    text
                };
                Ok((key.clone(), text))
            })
            .collect()
    }

    /// Example values for every used placeholder.
    pub fn sample_values(&self, template: &Template) -> IndexMap<String, String> {
        self.used(template)
            .map(|(key, placeholder)| (key.clone(), placeholder.sample_value().to_owned()))
            .collect()
    }

    /// `true` if every used placeholder resolves to a non-empty value.
    pub fn is_complete(&self, template: &Template, record: &Value) -> Result<bool, PathError> {
        Ok(self
            .resolve_values(template, record)?
            .values()
            .all(|value| !value.is_empty()))
    }

    /// Render `template` against `record`; incomplete data is an error.
    pub fn render(&self, template: &Template, record: &Value) -> Result<Rendered, RenderError> {
        self.render_with(template, record, RenderOptions::default())
    }

    pub fn render_with(
        &self,
        template: &Template,
        record: &Value,
        options: RenderOptions,
    ) -> Result<Rendered, RenderError> {
        let values = self.resolve_values(template, record)?;
        self.finish(template, values, options)
    }

    /// Render a dynamically-typed template.
    ///
    /// Fails with [`RenderError::InvalidInput`] unless `template` is a string
    /// or an object of strings.
    pub fn render_value(
        &self,
        template: Value,
        record: &Value,
        options: RenderOptions,
    ) -> Result<Rendered, RenderError> {
        let template = Template::from_value(template)?;
        self.render_with(&template, record, options)
    }

    /// Render `template` with sample values instead of live data.
    pub fn render_sample(&self, template: &Template) -> Result<Rendered, RenderError> {
        self.render_sample_with(template, RenderOptions::default())
    }

    pub fn render_sample_with(
        &self,
        template: &Template,
        options: RenderOptions,
    ) -> Result<Rendered, RenderError> {
        let values = self.sample_values(template);
        self.finish(template, values, options)
    }

    fn finish(
        &self,
        template: &Template,
        values: IndexMap<String, String>,
        options: RenderOptions,
    ) -> Result<Rendered, RenderError> {
        if !options.allow_incomplete && values.values().any(String::is_empty) {
            tracing::debug!(
                context = %self.context_type,
                "template has unresolved placeholders"
            );
            return Err(RenderError::IncompleteData {
                template: template.clone(),
                placeholders: values,
            });
        }

        Ok(match template {
            Template::Single(text) => Rendered::Single(substitute(text, &values)),
            Template::Bundle(texts) => Rendered::Bundle(
                texts
                    .iter()
                    .map(|(key, text)| (key.clone(), substitute(text, &values)))
                    .collect(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgrender_core::Fetcher;
    use serde_json::json;

    fn plh_context() -> RenderingContext {
        let placeholders = Placeholders::new()
            .with(
                "_PLH_1_",
                Placeholder::new("[object].property")
                    .title("Placeholder 1")
                    .description("Description 1")
                    .sample("Place 1"),
            )
            .and_then(|p| {
                p.with(
                    "_PLH_2_",
                    Placeholder::new("[object].not.existent.property")
                        .title("Placeholder 2")
                        .description("Description 2")
                        .empty_fallback("(none)"),
                )
            })
            .and_then(|p| {
                p.with(
                    "_PLH_3_",
                    Placeholder::new(Fetcher::callback(|r| r["object"]["property"].clone()))
                        .title("Placeholder 3")
                        .description("Description 3")
                        .sample("Place 3")
                        .empty_fallback("(none)"),
                )
            })
            .and_then(|p| {
                p.with(
                    "_PLH_4_",
                    Placeholder::new(Fetcher::callback(|_| json!("")))
                        .title("Placeholder 4")
                        .description("Description 4")
                        .sample("Place 4"),
                )
            })
            .expect("valid placeholders");
        RenderingContext::new("context", "Context", placeholders)
    }

    fn record() -> Value {
        json!({ "object": { "property": "value 1" } })
    }

    #[test]
    fn resolve_values_covers_only_used_placeholders() {
        let ctx = plh_context();
        let values = ctx
            .resolve_values(&Template::from("_PLH_1_ _PLH_2_"), &record())
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["_PLH_1_"], "value 1");
        assert_eq!(values["_PLH_2_"], "(none)");
        assert!(!values.contains_key("_PLH_3_"));
    }

    #[test]
    fn placeholders_info_lists_documentation_fields() {
        let info = plh_context().placeholders_info();
        assert_eq!(info.len(), 4);
        assert_eq!(info["_PLH_1_"].title, "Placeholder 1");
        assert_eq!(info["_PLH_1_"].description, "Description 1");
        assert_eq!(info["_PLH_1_"].sample.as_deref(), Some("Place 1"));
        assert_eq!(info["_PLH_2_"].title, "Placeholder 2");
        assert!(info["_PLH_2_"].sample.is_none());
    }

    #[test]
    fn render_substitutes_paths_callbacks_and_fallbacks() {
        let out = plh_context()
            .render(&Template::from("{_PLH_1_} =_PLH_2_= __PLH_3__"), &record())
            .unwrap();
        assert_eq!(out, Rendered::Single("{value 1} =(none)= _value 1_".into()));
    }

    #[test]
    fn render_with_insufficient_data_fails() {
        let template = Template::from("{_PLH_1_} =_PLH_2_= __PLH_4__");
        let err = plh_context().render(&template, &record()).unwrap_err();
        assert!(matches!(err, RenderError::IncompleteData { .. }));
        assert_eq!(err.missing(), ["_PLH_4_"]);
        if let RenderError::IncompleteData { template: t, placeholders } = &err {
            assert_eq!(t, &template);
            assert_eq!(placeholders["_PLH_1_"], "value 1");
        }
    }

    #[test]
    fn allow_incomplete_substitutes_empty_values() {
        let out = plh_context()
            .render_with(
                &Template::from("[_PLH_4_]"),
                &record(),
                RenderOptions::allow_incomplete(),
            )
            .unwrap();
        assert_eq!(out.as_single(), Some("[]"));
    }

    #[test]
    fn render_sample_uses_sample_then_fallback() {
        let out = plh_context()
            .render_sample(&Template::from("{_PLH_1_} =_PLH_2_= __PLH_3__"))
            .unwrap();
        assert_eq!(out.as_single(), Some("{Place 1} =(none)= _Place 3_"));
    }

    #[test]
    fn render_sample_without_sample_or_fallback_is_incomplete() {
        let placeholders = Placeholders::new()
            .with("%X%", Placeholder::new("x"))
            .unwrap();
        let ctx = RenderingContext::new("t", "T", placeholders);
        let err = ctx.render_sample(&Template::from("%X%")).unwrap_err();
        assert_eq!(err.missing(), ["%X%"]);
    }

    #[test]
    fn shorter_key_inside_longer_key_counts_as_used() {
        let placeholders = Placeholders::new()
            .with("_A_", Placeholder::new("a"))
            .and_then(|p| p.with("_A_1_", Placeholder::new("a1")))
            .unwrap();
        let ctx = RenderingContext::new("t", "T", placeholders);
        let used = ctx.placeholders_used_in(&Template::from("only _A_1_ here"));
        assert_eq!(used.keys().collect::<Vec<_>>(), ["_A_", "_A_1_"]);
    }

    #[test]
    fn bundle_is_rendered_member_by_member() {
        let placeholders = Placeholders::new()
            .with("%NAME%", Placeholder::new("user.name"))
            .unwrap();
        let ctx = RenderingContext::new("t", "T", placeholders);
        let template = Template::from([("a", "%NAME%"), ("b", "static")]);
        let out = ctx
            .render(&template, &json!({ "user": { "name": "Bo" } }))
            .unwrap();
        let bundle = out.as_bundle().unwrap();
        assert_eq!(bundle["a"], "Bo");
        assert_eq!(bundle["b"], "static");
    }

    #[test]
    fn bundle_fails_as_a_unit() {
        let placeholders = Placeholders::new()
            .with("%NAME%", Placeholder::new("user.name"))
            .unwrap();
        let ctx = RenderingContext::new("t", "T", placeholders);
        let template = Template::from([("subject", "static"), ("body", "Hi %NAME%")]);
        assert!(ctx.render(&template, &json!({ "user": {} })).is_err());
    }

    #[test]
    fn render_value_rejects_non_template_shapes() {
        let ctx = plh_context();
        let err = ctx
            .render_value(json!(["_PLH_1_"]), &record(), RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }

    #[test]
    fn malformed_path_propagates() {
        let placeholders = Placeholders::new()
            .with("%X%", Placeholder::new("a..b"))
            .unwrap();
        let ctx = RenderingContext::new("t", "T", placeholders);
        let err = ctx.render(&Template::from("%X%"), &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::Path(_)));
    }

    #[test]
    fn set_placeholders_config_replaces_everything() {
        let mut ctx = plh_context();
        ctx.set_placeholders_config(
            Placeholders::new()
                .with("%ONLY%", Placeholder::new("x"))
                .unwrap(),
        );
        assert_eq!(ctx.placeholders_in_config().len(), 1);
        assert!(ctx.placeholders_in_config().contains_key("%ONLY%"));
    }
}
