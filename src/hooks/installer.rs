//! Hook installer
//!
//! Attaches one interceptor to a result source: on the first bulk
//! mechanism it supports, and on every single-result operation.

use std::sync::Arc;

use serde_json::Value;

use super::context::QueryContext;
use super::errors::{HookError, HookResult};
use super::options::LeanGettersOptions;
use super::source::{bulk_interceptor, single_interceptor, BulkHook, ResultSource, SingleResultOp};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::schema::{GetterResult, Schema};
use crate::walker::{apply_getters, WalkContext};

/// Lean getters bound to one schema
#[derive(Debug, Clone)]
pub struct LeanGetters {
    schema: Arc<Schema>,
    options: LeanGettersOptions,
    metrics: Arc<MetricsRegistry>,
}

/// Outcome of a successful installation
#[derive(Debug, Clone)]
pub struct Installation {
    /// Bulk mechanism the interceptor was registered on
    pub bulk_hook: BulkHook,
    /// Counters shared with every registered interceptor
    pub metrics: Arc<MetricsRegistry>,
}

impl LeanGetters {
    pub fn new(schema: impl Into<Arc<Schema>>, options: LeanGettersOptions) -> Self {
        Self::with_metrics(schema, options, Arc::new(MetricsRegistry::new()))
    }

    /// Share an existing metrics registry
    pub fn with_metrics(
        schema: impl Into<Arc<Schema>>,
        options: LeanGettersOptions,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            schema: schema.into(),
            options,
            metrics,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn options(&self) -> &LeanGettersOptions {
        &self.options
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Whether getters run for this query
    pub fn enabled_for(&self, ctx: &QueryContext) -> bool {
        self.options.resolve(ctx.lean.getters)
    }

    /// The interceptor body: resolves enablement, then walks the result.
    ///
    /// Getter errors are counted and returned unchanged. Reporting them is
    /// left to the caller.
    pub fn apply(&self, result: &mut Value, ctx: &QueryContext) -> GetterResult<()> {
        self.metrics.increment_results_intercepted();

        if !self.enabled_for(ctx) {
            self.metrics.increment_results_skipped();
            if Logger::enabled(Event::GettersSkipped.severity()) {
                let query_id = ctx.query_id.to_string();
                log_event_with_fields(
                    Event::GettersSkipped,
                    &[("schema", self.schema.name()), ("query_id", query_id.as_str())],
                );
            }
            return Ok(());
        }

        let documents = match result {
            Value::Null => 0,
            Value::Array(items) => items.len() as u64,
            _ => 1,
        };

        let walk = WalkContext::enabled(&ctx.projection);
        match apply_getters(&self.schema, result, &walk) {
            Ok(_) => {
                self.metrics.add_documents_walked(documents);
                if Logger::enabled(Event::GettersApplied.severity()) {
                    let query_id = ctx.query_id.to_string();
                    let count = documents.to_string();
                    log_event_with_fields(
                        Event::GettersApplied,
                        &[
                            ("schema", self.schema.name()),
                            ("query_id", query_id.as_str()),
                            ("documents", count.as_str()),
                        ],
                    );
                }
                Ok(())
            }
            Err(err) => {
                self.metrics.increment_getter_failures();
                Err(err)
            }
        }
    }

    /// Registers interceptors on `source`.
    ///
    /// The bulk interceptor goes on the first mechanism in
    /// [`BulkHook::PRIORITY`] the source supports. Missing hook points are
    /// detected before anything is registered. A registration the source
    /// refuses afterwards aborts installation and leaves earlier
    /// registrations in place.
    pub fn install<S>(&self, source: &mut S) -> HookResult<Installation>
    where
        S: ResultSource + ?Sized,
    {
        let bulk_hook = BulkHook::PRIORITY
            .into_iter()
            .find(|hook| source.supports_bulk_hook(*hook))
            .ok_or(HookError::NoBulkHookPoint)?;
        if let Some(op) = SingleResultOp::ALL
            .into_iter()
            .find(|op| !source.supports_single_hook(*op))
        {
            return Err(HookError::Unsupported(op.name()));
        }

        let bulk = self.clone();
        source.register_bulk_hook(
            bulk_hook,
            bulk_interceptor(move |result, ctx| bulk.apply(result, ctx)),
        )?;
        log_event_with_fields(
            Event::BulkHookSelected,
            &[("schema", self.schema.name()), ("hook", bulk_hook.name())],
        );

        let single = self.clone();
        let interceptor = single_interceptor(move |result, ctx| match result {
            Some(doc) => single.apply(doc, ctx),
            None => Ok(()),
        });
        for op in SingleResultOp::ALL {
            source.register_single_hook(op, Arc::clone(&interceptor))?;
            log_event_with_fields(
                Event::SingleHookRegistered,
                &[("schema", self.schema.name()), ("operation", op.name())],
            );
        }

        let default_getters = if self.options.default_getters() {
            "true"
        } else {
            "false"
        };
        log_event_with_fields(
            Event::HooksInstalled,
            &[
                ("schema", self.schema.name()),
                ("hook", bulk_hook.name()),
                ("default_getters", default_getters),
            ],
        );

        Ok(Installation {
            bulk_hook,
            metrics: Arc::clone(&self.metrics),
        })
    }
}

/// Installs lean getters for `schema` on `source`
pub fn install<S>(
    source: &mut S,
    schema: impl Into<Arc<Schema>>,
    options: LeanGettersOptions,
) -> HookResult<Installation>
where
    S: ResultSource + ?Sized,
{
    LeanGetters::new(schema, options).install(source)
}
