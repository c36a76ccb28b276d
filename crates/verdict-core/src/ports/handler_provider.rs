//! HandlerProvider port - ハンドラインスタンスの解決
//!
//! DI コンテナに相当する外部の能力です。キーに対応するハンドラが
//! 無ければ `None`（= 未登録）を返します。
//!
//! # 実装
//! - **HandlerRegistry**（typed::registry）: 起動時に明示登録するテーブル

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::typed::handler::{Handler, erase};
use crate::typed::request::Request;

/// Identifies the handler capability for a `(request, output)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    request: TypeId,
    output: TypeId,
}

impl HandlerKey {
    pub fn of<R: Request>() -> Self {
        Self {
            request: TypeId::of::<R>(),
            output: TypeId::of::<R::Output>(),
        }
    }

    pub fn request(&self) -> TypeId {
        self.request
    }
}

/// A handler instance found by a provider.
///
/// `instance` is the type-erased `Arc<dyn Handler<R>>`; only the binding for
/// `R` knows how to call it.
#[derive(Clone)]
pub struct ResolvedHandler {
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
    pub(crate) type_name: &'static str,
}

impl ResolvedHandler {
    /// Wrap a handler for `R`; `type_name` is what tracing reports as the handler type.
    pub fn from_handler<R: Request>(handler: Arc<dyn Handler<R>>, type_name: &'static str) -> Self {
        Self {
            instance: erase(handler),
            type_name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for ResolvedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedHandler")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Source of handler instances.
///
/// # Thread Safety
/// - `Send + Sync`: dispatch は並行に呼ばれる
pub trait HandlerProvider: Send + Sync {
    fn resolve(&self, key: &HandlerKey) -> Option<ResolvedHandler>;
}
