//! In-memory collection
//!
//! Stores plain documents in insertion order and answers queries with
//! projected copies. Registered interceptors run on the copies after the
//! storage lock is released.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use uuid::Uuid;

use super::errors::{EngineError, EngineResult};
use super::filter::Filter;
use super::options::{Capabilities, QueryOptions};
use super::update::Update;
use crate::hooks::{
    BulkHook, BulkInterceptor, HookError, HookResult, QueryContext, ResultSource,
    SingleInterceptor, SingleResultOp,
};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::schema::GetterResult;

/// An in-memory collection of plain documents
pub struct Collection {
    name: String,
    documents: RwLock<Vec<Value>>,
    capabilities: Capabilities,
    bulk: Option<(BulkHook, BulkInterceptor)>,
    single: HashMap<SingleResultOp, SingleInterceptor>,
    metrics: Arc<MetricsRegistry>,
}

impl Collection {
    /// Collection exposing every hook point
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capabilities(name, Capabilities::all())
    }

    pub fn with_capabilities(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
            capabilities,
            bulk: None,
            single: HashMap::new(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Share a metrics registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Bulk mechanism currently registered, if any
    pub fn bulk_hook(&self) -> Option<BulkHook> {
        self.bulk.as_ref().map(|(hook, _)| *hook)
    }

    /// Whether an interceptor is registered on `op`
    pub fn has_single_hook(&self, op: SingleResultOp) -> bool {
        self.single.contains_key(&op)
    }

    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Stored documents as-is, bypassing projection and interceptors
    pub fn raw_documents(&self) -> EngineResult<Vec<Value>> {
        Ok(self.read()?.clone())
    }

    /// Inserts a document, assigning a UUID `_id` if it has none.
    ///
    /// Returns the document's `_id`.
    pub fn insert(&self, mut document: Value) -> EngineResult<Value> {
        let id = match document.as_object_mut() {
            Some(obj) => obj
                .entry("_id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
                .clone(),
            None => return Err(EngineError::InvalidDocument("expected an object")),
        };

        let mut documents = self.write()?;
        if documents.iter().any(|doc| doc.get("_id") == Some(&id)) {
            return Err(EngineError::DuplicateId(id.to_string()));
        }
        documents.push(document);
        Ok(id)
    }

    /// Every matching document.
    ///
    /// With the item-map hook the interceptor sees each record; with a
    /// transform hook it sees the whole list once.
    pub fn find(&self, filter: &Value, options: &QueryOptions) -> EngineResult<Vec<Value>> {
        let ctx = Self::context(options);
        let result = self.find_inner(filter, options, &ctx);
        self.observe("find", &ctx, result)
    }

    /// Every matching document, intercepted one record at a time
    pub fn cursor(&self, filter: &Value, options: &QueryOptions) -> EngineResult<Cursor> {
        let ctx = Self::context(options);
        let result = Filter::parse(filter)
            .and_then(|filter| self.matching(&filter, options))
            .map(|records| Cursor {
                records: records.into_iter(),
                interceptor: self.bulk.as_ref().map(|(_, interceptor)| Arc::clone(interceptor)),
                ctx: ctx.clone(),
            });
        self.observe("cursor", &ctx, result)
    }

    /// First matching document
    pub fn find_one(&self, filter: &Value, options: &QueryOptions) -> EngineResult<Option<Value>> {
        let ctx = Self::context(options);
        let result = self.find_one_inner(filter, options, &ctx);
        self.observe(SingleResultOp::FindOne.name(), &ctx, result)
    }

    /// Updates the first matching document.
    ///
    /// Returns the document before the update, or after it with
    /// `return_new`.
    pub fn find_one_and_update(
        &self,
        filter: &Value,
        update: &Value,
        options: &QueryOptions,
    ) -> EngineResult<Option<Value>> {
        let ctx = Self::context(options);
        let result = self.find_one_and_update_inner(filter, update, options, &ctx);
        self.observe(SingleResultOp::FindOneAndUpdate.name(), &ctx, result)
    }

    /// Removes the first matching document and returns it
    pub fn find_one_and_delete(
        &self,
        filter: &Value,
        options: &QueryOptions,
    ) -> EngineResult<Option<Value>> {
        let ctx = Self::context(options);
        let result = self.find_one_and_delete_inner(filter, options, &ctx);
        self.observe(SingleResultOp::FindOneAndDelete.name(), &ctx, result)
    }

    /// Replaces the first matching document, keeping its `_id`
    pub fn find_one_and_replace(
        &self,
        filter: &Value,
        replacement: &Value,
        options: &QueryOptions,
    ) -> EngineResult<Option<Value>> {
        let ctx = Self::context(options);
        let result = self.find_one_and_replace_inner(filter, replacement, options, &ctx);
        self.observe(SingleResultOp::FindOneAndReplace.name(), &ctx, result)
    }

    fn find_inner(
        &self,
        filter: &Value,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> EngineResult<Vec<Value>> {
        let filter = Filter::parse(filter)?;
        let records = self.matching(&filter, options)?;
        Ok(self.run_bulk(records, ctx)?)
    }

    fn find_one_inner(
        &self,
        filter: &Value,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> EngineResult<Option<Value>> {
        let filter = Filter::parse(filter)?;
        let record = self
            .read()?
            .iter()
            .find(|doc| filter.matches(doc))
            .map(|doc| options.projection.apply(doc));
        Ok(self.run_single(SingleResultOp::FindOne, record, ctx)?)
    }

    fn find_one_and_update_inner(
        &self,
        filter: &Value,
        update: &Value,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> EngineResult<Option<Value>> {
        let filter = Filter::parse(filter)?;
        let update = Update::parse(update)?;

        let returned = {
            let mut documents = self.write()?;
            match documents.iter_mut().find(|doc| filter.matches(doc)) {
                Some(doc) => {
                    let before = doc.clone();
                    update.apply(doc);
                    Some(if options.return_new { doc.clone() } else { before })
                }
                None => None,
            }
        };

        let record = returned.map(|doc| options.projection.apply(&doc));
        Ok(self.run_single(SingleResultOp::FindOneAndUpdate, record, ctx)?)
    }

    fn find_one_and_delete_inner(
        &self,
        filter: &Value,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> EngineResult<Option<Value>> {
        let filter = Filter::parse(filter)?;

        let removed = {
            let mut documents = self.write()?;
            documents
                .iter()
                .position(|doc| filter.matches(doc))
                .map(|index| documents.remove(index))
        };

        let record = removed.map(|doc| options.projection.apply(&doc));
        Ok(self.run_single(SingleResultOp::FindOneAndDelete, record, ctx)?)
    }

    fn find_one_and_replace_inner(
        &self,
        filter: &Value,
        replacement: &Value,
        options: &QueryOptions,
        ctx: &QueryContext,
    ) -> EngineResult<Option<Value>> {
        let filter = Filter::parse(filter)?;
        if !replacement.is_object() {
            return Err(EngineError::InvalidDocument("replacement must be an object"));
        }

        let returned = {
            let mut documents = self.write()?;
            match documents.iter_mut().find(|doc| filter.matches(doc)) {
                Some(doc) => {
                    let id = doc.get("_id").cloned().unwrap_or(Value::Null);
                    let mut next = replacement.clone();
                    if let Some(obj) = next.as_object_mut() {
                        if obj.get("_id").map_or(false, |new_id| new_id != &id) {
                            return Err(EngineError::InvalidUpdate("_id is immutable".to_string()));
                        }
                        obj.insert("_id".to_string(), id);
                    }
                    let before = std::mem::replace(doc, next);
                    Some(if options.return_new { doc.clone() } else { before })
                }
                None => None,
            }
        };

        let record = returned.map(|doc| options.projection.apply(&doc));
        Ok(self.run_single(SingleResultOp::FindOneAndReplace, record, ctx)?)
    }

    /// Projected copies of every matching document, in insertion order
    fn matching(&self, filter: &Filter, options: &QueryOptions) -> EngineResult<Vec<Value>> {
        Ok(self
            .read()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .map(|doc| options.projection.apply(doc))
            .collect())
    }

    fn run_bulk(&self, mut records: Vec<Value>, ctx: &QueryContext) -> GetterResult<Vec<Value>> {
        let (hook, interceptor) = match &self.bulk {
            Some(registered) => registered,
            None => return Ok(records),
        };

        match hook {
            BulkHook::ItemMap => {
                for record in records.iter_mut() {
                    interceptor(record, ctx)?;
                }
                Ok(records)
            }
            BulkHook::ResultTransform | BulkHook::OptionsTransform => {
                let mut list = Value::Array(records);
                interceptor(&mut list, ctx)?;
                Ok(match list {
                    Value::Array(items) => items,
                    other => vec![other],
                })
            }
        }
    }

    fn run_single(
        &self,
        op: SingleResultOp,
        mut record: Option<Value>,
        ctx: &QueryContext,
    ) -> GetterResult<Option<Value>> {
        if let Some(interceptor) = self.single.get(&op) {
            interceptor(record.as_mut(), ctx)?;
        }
        Ok(record)
    }

    fn context(options: &QueryOptions) -> QueryContext {
        QueryContext::new()
            .with_lean(options.lean)
            .with_projection(options.projection.clone())
    }

    fn observe<T>(
        &self,
        operation: &'static str,
        ctx: &QueryContext,
        result: EngineResult<T>,
    ) -> EngineResult<T> {
        match &result {
            Ok(_) => {
                self.metrics.increment_queries_executed();
                if Logger::enabled(Event::QueryExecuted.severity()) {
                    let query_id = ctx.query_id.to_string();
                    log_event_with_fields(
                        Event::QueryExecuted,
                        &[
                            ("collection", self.name.as_str()),
                            ("operation", operation),
                            ("query_id", query_id.as_str()),
                        ],
                    );
                }
            }
            Err(err) => {
                self.metrics.increment_queries_rejected();
                if Logger::enabled(Event::QueryRejected.severity()) {
                    let query_id = ctx.query_id.to_string();
                    let reason = err.to_string();
                    log_event_with_fields(
                        Event::QueryRejected,
                        &[
                            ("collection", self.name.as_str()),
                            ("operation", operation),
                            ("query_id", query_id.as_str()),
                            ("error", reason.as_str()),
                        ],
                    );
                }
            }
        }
        result
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Vec<Value>>> {
        self.documents
            .read()
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Vec<Value>>> {
        self.documents
            .write()
            .map_err(|e| EngineError::Storage(e.to_string()))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("bulk_hook", &self.bulk_hook())
            .field("single_hooks", &self.single.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResultSource for Collection {
    fn supports_bulk_hook(&self, hook: BulkHook) -> bool {
        self.capabilities.supports_bulk(hook)
    }

    fn supports_single_hook(&self, op: SingleResultOp) -> bool {
        self.capabilities.supports_single(op)
    }

    fn register_bulk_hook(&mut self, hook: BulkHook, interceptor: BulkInterceptor) -> HookResult<()> {
        if !self.capabilities.supports_bulk(hook) {
            return Err(HookError::Unsupported(hook.name()));
        }
        if let Some((registered, _)) = &self.bulk {
            return Err(HookError::AlreadyRegistered(registered.name()));
        }
        self.bulk = Some((hook, interceptor));
        Ok(())
    }

    fn register_single_hook(
        &mut self,
        op: SingleResultOp,
        interceptor: SingleInterceptor,
    ) -> HookResult<()> {
        if !self.capabilities.supports_single(op) {
            return Err(HookError::Unsupported(op.name()));
        }
        if self.single.contains_key(&op) {
            return Err(HookError::AlreadyRegistered(op.name()));
        }
        self.single.insert(op, interceptor);
        Ok(())
    }
}

/// Lazily intercepted query results
pub struct Cursor {
    records: std::vec::IntoIter<Value>,
    interceptor: Option<BulkInterceptor>,
    ctx: QueryContext,
}

impl Iterator for Cursor {
    type Item = EngineResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = self.records.next()?;
        if let Some(interceptor) = &self.interceptor {
            if let Err(err) = interceptor(&mut record, &self.ctx) {
                return Some(Err(err.into()));
            }
        }
        Some(Ok(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("remaining", &self.records.len())
            .field("query_id", &self.ctx.query_id)
            .finish()
    }
}
