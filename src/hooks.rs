//! Lifecycle hook mediation for the persistence engine's write path.
//!
//! The engine invokes [`HookPipeline::before_insert`] /
//! [`HookPipeline::before_update`] before committing a write, passing an
//! operation context that may carry a skip-touch flag. Hooks are named,
//! composable steps run in registration order — an explicit pipeline
//! instead of override/super-call chains, so an engine base hook (default
//! values, validation) composes before timestamp stamping rather than
//! being replaced by it.
//!
//! Stamping never fails: it only mutates in-memory field values, guarded by
//! the kind's timestamp policy and the context flag.

use crate::kind::RecordKind;
use chrono::{DateTime, Utc};
use log::trace;
use std::sync::Arc;

/// Operation context the persistence engine passes into the write path.
#[derive(Debug, Clone, Default)]
pub struct WriteContext {
    skip_touch: bool,
}

impl WriteContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress audit-timestamp stamping for this operation.
    pub fn skip_touch(mut self) -> Self {
        self.skip_touch = true;
        self
    }

    /// Whether this operation suppresses timestamp stamping.
    pub fn skips_touch(&self) -> bool {
        self.skip_touch
    }
}

/// Records that carry audit-timestamp columns.
///
/// Implemented by the engine's record types so [`TouchHook`] can stamp
/// them without knowing their layout.
pub trait Stamped {
    fn set_created_at(&mut self, ts: DateTime<Utc>);
    fn set_updated_at(&mut self, ts: DateTime<Utc>);
}

/// One named step of the write pipeline.
///
/// Hooks are infallible by contract: they mutate in-memory state before
/// the engine serializes the write, and a hook with nothing to do leaves
/// the record untouched. Both methods default to no-ops, so a hook only
/// overrides the transition points it cares about.
pub trait WriteHook<R>: Send + Sync {
    /// Called before an INSERT is committed.
    fn before_insert(&self, _record: &mut R, _ctx: &WriteContext) {}

    /// Called before an UPDATE is committed.
    fn before_update(&self, _record: &mut R, _ctx: &WriteContext) {}
}

/// Stamps audit timestamps on writes.
///
/// Pre-insert sets both `created_at` and `updated_at`; pre-update advances
/// `updated_at` only. Nothing is stamped when the kind has timestamps
/// disabled or the context carries the skip-touch flag.
pub struct TouchHook {
    kind: Arc<RecordKind>,
}

impl TouchHook {
    pub fn new(kind: Arc<RecordKind>) -> Self {
        TouchHook { kind }
    }

    fn enabled(&self, ctx: &WriteContext) -> bool {
        self.kind.timestamps_enabled() && !ctx.skips_touch()
    }
}

impl<R: Stamped> WriteHook<R> for TouchHook {
    fn before_insert(&self, record: &mut R, ctx: &WriteContext) {
        if !self.enabled(ctx) {
            return;
        }
        let now = Utc::now();
        trace!("touching record-kind {:?} on insert", self.kind.name());
        record.set_created_at(now);
        record.set_updated_at(now);
    }

    fn before_update(&self, record: &mut R, ctx: &WriteContext) {
        if !self.enabled(ctx) {
            return;
        }
        trace!("touching record-kind {:?} on update", self.kind.name());
        record.set_updated_at(Utc::now());
    }
}

/// Ordered composition of write hooks.
///
/// The engine builds one pipeline per record-kind and runs it at each
/// transition point; hooks execute in the order they were pushed.
///
/// # Example
///
/// ```no_run
/// use relmap::{HookPipeline, RecordKind, TouchHook, WriteContext};
/// # struct PetRecord;
/// # impl relmap::Stamped for PetRecord {
/// #     fn set_created_at(&mut self, _ts: chrono::DateTime<chrono::Utc>) {}
/// #     fn set_updated_at(&mut self, _ts: chrono::DateTime<chrono::Utc>) {}
/// # }
///
/// let pet = RecordKind::builder("Pet").build().unwrap();
/// let pipeline: HookPipeline<PetRecord> =
///     HookPipeline::new().push(TouchHook::new(pet));
///
/// let mut record = PetRecord;
/// pipeline.before_insert(&mut record, &WriteContext::new());
/// ```
pub struct HookPipeline<R> {
    hooks: Vec<Box<dyn WriteHook<R>>>,
}

impl<R> HookPipeline<R> {
    pub fn new() -> Self {
        HookPipeline { hooks: Vec::new() }
    }

    /// Append a hook; it runs after every hook pushed before it.
    pub fn push(mut self, hook: impl WriteHook<R> + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run all pre-insert steps in registration order.
    pub fn before_insert(&self, record: &mut R, ctx: &WriteContext) {
        for hook in &self.hooks {
            hook.before_insert(record, ctx);
        }
    }

    /// Run all pre-update steps in registration order.
    pub fn before_update(&self, record: &mut R, ctx: &WriteContext) {
        for hook in &self.hooks {
            hook.before_update(record, ctx);
        }
    }
}

impl<R> Default for HookPipeline<R> {
    fn default() -> Self {
        Self::new()
    }
}
