//! Dispatcher - Request の型から Handler を引いて実行する
//!
//! # 学習ポイント
//! - `TypeId` をキーにした binding キャッシュ（DashMap）
//! - monomorphized な invoke thunk を `fn` ポインタとして保存する
//! - `tracing` の span を `.instrument()` で async 処理に付ける
//!
//! binding は request 型ごとに一度だけ作られ、以降は共有されます。
//! ハンドラ本体は毎回 provider から解決します（スコープ付きの provider を想定）。

use std::any::{Any, TypeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::{Instrument, Span, debug, error, field, info, info_span, warn};
use ulid::Ulid;

use super::cancel::{CancelSignal, Cancelled};
use super::handler::{ErasedFuture, ErasedHandler, ErasedPart, Fault, invoke_erased};
use super::request::{Reply, Request, short_type_name};
use crate::ports::{HandlerKey, HandlerProvider};

type InvokeFn =
    fn(ErasedHandler, Box<dyn Any + Send>, CancelSignal) -> Result<ErasedFuture, ErasedPart>;

/// Per-request-type invocation recipe.
struct Binding {
    key: HandlerKey,
    request_name: &'static str,
    output_name: &'static str,
    invoke: InvokeFn,
}

impl Binding {
    fn of<R: Request>() -> Self {
        Self {
            key: HandlerKey::of::<R>(),
            request_name: short_type_name::<R>(),
            output_name: short_type_name::<R::Output>(),
            invoke: invoke_erased::<R>,
        }
    }
}

/// DispatchError は dispatch 自体の失敗
///
/// ドメイン上の失敗（NotFound など）はここには来ません。handler が返した
/// outcome としてそのまま呼び出し元に届きます。
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No handler registered for request type {request}")]
    HandlerNotFound { request: String },

    /// handler が返した fault。元のエラーは downcast で取り出せる
    #[error("{0}")]
    HandlerFault(#[source] Fault),

    #[error("dispatch was cancelled")]
    Cancelled,

    #[error("handler resolved for {request} does not handle that request type")]
    BindingMismatch { request: String },
}

impl DispatchError {
    /// The handler's own error, if this is a fault.
    pub fn fault(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::HandlerFault(fault) => Some(fault.as_ref()),
            _ => None,
        }
    }

    pub fn into_fault(self) -> Option<Fault> {
        match self {
            Self::HandlerFault(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HandlerNotFound { .. })
    }
}

/// Routes a request to the handler registered for its type.
///
/// # Thread Safety
/// - `Send + Sync`: `Arc<Dispatcher>` を複数タスクから同時に使える
/// - binding キャッシュのロックは `.await` をまたいで保持しない
///
/// # 使用例
/// ```ignore
/// let dispatcher = Dispatcher::new(Arc::new(registry));
/// let outcome = dispatcher.dispatch(GetUser { id: 1 }).await?;
/// ```
pub struct Dispatcher {
    provider: Arc<dyn HandlerProvider>,
    bindings: DashMap<TypeId, Arc<Binding>>,
    resolutions: AtomicUsize,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn HandlerProvider>) -> Self {
        Self {
            provider,
            bindings: DashMap::new(),
            resolutions: AtomicUsize::new(0),
        }
    }

    /// Dispatch without a cancellation source.
    pub async fn dispatch<R: Request>(&self, request: R) -> Result<R::Output, DispatchError> {
        self.dispatch_with(request, CancelSignal::none()).await
    }

    /// Dispatch and hand `cancel` to the handler untouched.
    pub async fn dispatch_with<R: Request>(
        &self,
        request: R,
        cancel: CancelSignal,
    ) -> Result<R::Output, DispatchError> {
        let binding = self.binding::<R>();
        let span = info_span!(
            "dispatch",
            dispatch_id = %Ulid::new(),
            request_type = binding.request_name,
            result_type = binding.output_name,
            handler_type = field::Empty,
            success = field::Empty,
            status_code = field::Empty,
        );
        self.run::<R>(binding, request, cancel)
            .instrument(span)
            .await
    }

    /// Number of bindings built so far. Each request type is built once.
    pub fn binding_count(&self) -> usize {
        self.resolutions.load(Ordering::Acquire)
    }

    fn binding<R: Request>(&self) -> Arc<Binding> {
        let id = TypeId::of::<R>();
        if let Some(binding) = self.bindings.get(&id) {
            return Arc::clone(binding.value());
        }
        // entry() holds the shard lock, so concurrent first calls build one binding
        let entry = self.bindings.entry(id).or_insert_with(|| {
            self.resolutions.fetch_add(1, Ordering::AcqRel);
            let binding = Binding::of::<R>();
            debug!(
                request_type = binding.request_name,
                result_type = binding.output_name,
                "binding created"
            );
            Arc::new(binding)
        });
        Arc::clone(entry.value())
    }

    async fn run<R: Request>(
        &self,
        binding: Arc<Binding>,
        request: R,
        cancel: CancelSignal,
    ) -> Result<R::Output, DispatchError> {
        let span = Span::current();

        let Some(resolved) = self.provider.resolve(&binding.key) else {
            warn!("no handler registered");
            return Err(DispatchError::HandlerNotFound {
                request: binding.request_name.to_string(),
            });
        };
        span.record("handler_type", resolved.type_name());

        let mismatch = || DispatchError::BindingMismatch {
            request: binding.request_name.to_string(),
        };
        let future = (binding.invoke)(resolved.instance, Box::new(request), cancel)
            .map_err(|part| {
                error!(?part, "resolved handler has the wrong type");
                mismatch()
            })?;

        match future.await {
            Ok(output) => {
                let output = output.downcast::<R::Output>().map_err(|_| mismatch())?;
                span.record("success", output.is_success());
                span.record("status_code", output.status().as_u16());
                debug!("dispatch completed");
                Ok(*output)
            }
            Err(fault) if fault.is::<Cancelled>() => {
                info!("handler observed cancellation");
                Err(DispatchError::Cancelled)
            }
            Err(fault) => {
                span.record("success", false);
                error!(error = %fault, "handler fault");
                Err(DispatchError::HandlerFault(fault))
            }
        }
    }
}
