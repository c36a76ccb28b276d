//! Handler trait - Request を処理して結果を返す Handler の定義
//!
//! # 学習ポイント
//! - ジェネリック trait (Handler<R>)
//! - Type erasure: `Arc<dyn Handler<R>>` を `Arc<dyn Any>` に包んで登録し、
//!   dispatch 時に binding の invoke thunk が元の型に戻す

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::cancel::CancelSignal;
use super::request::Request;

/// A defect inside handler logic.
///
/// The boxed error is handed back to the dispatch caller as-is, so it can be
/// downcast to its concrete type.
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Handler は Request を処理して `R::Output` を返す
///
/// # 使用例
/// ```ignore
/// struct GetUserHandler;
///
/// #[async_trait]
/// impl Handler<GetUser> for GetUserHandler {
///     async fn handle(&self, req: GetUser, _cancel: CancelSignal) -> Result<TypedOutcome<User>, Fault> {
///         Ok(TypedOutcome::ok(User { id: req.id }))
///     }
/// }
/// ```
///
/// A domain failure (not found, validation, ...) is an `Ok` outcome carrying
/// an error. `Err` is reserved for defects and cancellation.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    async fn handle(&self, request: R, cancel: CancelSignal) -> Result<R::Output, Fault>;
}

pub(crate) type ErasedOutput = Box<dyn Any + Send>;
pub(crate) type ErasedFuture = Pin<Box<dyn Future<Output = Result<ErasedOutput, Fault>> + Send>>;

/// Stored form of a handler instance inside a provider.
pub(crate) type ErasedHandler = Arc<dyn Any + Send + Sync>;

/// Erase a handler so it can live in a type-keyed table.
pub(crate) fn erase<R: Request>(handler: Arc<dyn Handler<R>>) -> ErasedHandler {
    Arc::new(handler)
}

/// Which half of an erased call had the wrong concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErasedPart {
    Handler,
    Request,
}

/// Monomorphized invoke thunk stored in a binding.
pub(crate) fn invoke_erased<R: Request>(
    handler: ErasedHandler,
    request: Box<dyn Any + Send>,
    cancel: CancelSignal,
) -> Result<ErasedFuture, ErasedPart> {
    let handler = handler
        .downcast::<Arc<dyn Handler<R>>>()
        .map_err(|_| ErasedPart::Handler)?;
    let request = request.downcast::<R>().map_err(|_| ErasedPart::Request)?;
    Ok(Box::pin(async move {
        let output = handler.handle(*request, cancel).await?;
        Ok(Box::new(output) as ErasedOutput)
    }))
}
