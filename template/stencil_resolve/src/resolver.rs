//! The parameter resolver: name → accessor, memoized.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::source::{DataSource, MemberKind};
use crate::value::Value;

/// A resolved value-extraction function for one parameter name.
///
/// Accessors are created once, at resolution time, and shared by every
/// compiled segment that mentions the parameter. They carry no per-render
/// state and tolerate an absent data source: `None` in, `None` out, never
/// a panic.
pub struct Accessor<T> {
    get: Arc<dyn Fn(Option<&T>) -> Option<Value> + Send + Sync>,
}

impl<T> Accessor<T> {
    fn new(get: impl Fn(Option<&T>) -> Option<Value> + Send + Sync + 'static) -> Self {
        Accessor { get: Arc::new(get) }
    }

    /// Extract the parameter's value from a data-source instance.
    pub fn value(&self, source: Option<&T>) -> Option<Value> {
        (self.get)(source)
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Accessor {
            get: Arc::clone(&self.get),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Resolution failure: the parameter name matched no binding and no member.
///
/// The field is `data_source` rather than `source` so the derive does not
/// mistake it for the error's cause.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown parameter '{parameter}' for data source `{data_source}`")]
    UnknownParameter {
        parameter: String,
        data_source: String,
    },
}

/// Maps parameter names to [`Accessor`]s for one data-source type.
///
/// Resolution order, first match wins:
///
/// 1. an explicit binding with a submember whose bound name matches —
///    produces the two-level null-safe chain (absent source → absent,
///    absent member value → absent, else probe the value for the
///    submember);
/// 2. an explicit binding without a submember whose bound name matches;
/// 3. an implicit member whose own name matches exactly, properties
///    scanned before fields, fields before methods;
/// 4. otherwise [`ResolveError::UnknownParameter`].
///
/// Every outcome — including failure — is memoized, so a name is scanned
/// at most once per resolver lifetime. The cache is insert-if-absent
/// behind a mutex, so one resolver may be shared across compilations and
/// threads as a pure memoization optimization.
pub struct Resolver<T: DataSource> {
    cache: Mutex<FxHashMap<String, Result<Accessor<T>, ResolveError>>>,
    scans: AtomicUsize,
}

impl<T: DataSource> Resolver<T> {
    pub fn new() -> Self {
        Resolver {
            cache: Mutex::new(FxHashMap::default()),
            scans: AtomicUsize::new(0),
        }
    }

    /// Resolve a parameter name to an accessor.
    pub fn resolve(&self, parameter: &str) -> Result<Accessor<T>, ResolveError> {
        let mut cache = self.cache.lock();
        if let Some(cached) = cache.get(parameter) {
            trace!(parameter, "resolver cache hit");
            return cached.clone();
        }
        let resolved = self.scan(parameter);
        trace!(parameter, ok = resolved.is_ok(), "resolved parameter");
        cache.insert(parameter.to_owned(), resolved.clone());
        resolved
    }

    /// How many member-table scans this resolver has performed. Stays flat
    /// across repeated lookups of the same name.
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    fn scan(&self, parameter: &str) -> Result<Accessor<T>, ResolveError> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        // Explicit bindings that name a submember win over everything.
        for binding in T::bindings() {
            if binding.bound_name() != parameter {
                continue;
            }
            if let Some(submember) = binding.submember {
                let get = binding.get;
                return Ok(Accessor::new(move |source: Option<&T>| {
                    source.and_then(get).and_then(|v| v.field(submember))
                }));
            }
        }

        // Then explicit bindings without one.
        for binding in T::bindings() {
            if binding.bound_name() == parameter && binding.submember.is_none() {
                let get = binding.get;
                return Ok(Accessor::new(move |source: Option<&T>| source.and_then(get)));
            }
        }

        // Implicit match by the member's own name, with a fixed kind
        // precedence regardless of table order.
        for kind in [MemberKind::Property, MemberKind::Field, MemberKind::Method] {
            if let Some(member) = T::members()
                .iter()
                .find(|m| m.kind == kind && m.name == parameter)
            {
                let get = member.get;
                return Ok(Accessor::new(move |source: Option<&T>| source.and_then(get)));
            }
        }

        Err(ResolveError::UnknownParameter {
            parameter: parameter.to_owned(),
            data_source: T::source_name().to_owned(),
        })
    }
}

impl<T: DataSource> Default for Resolver<T> {
    fn default() -> Self {
        Resolver::new()
    }
}
