//! Typed - 型付き Request / Handler API
//!
//! Request の型そのものがルーティングキーです。文字列のコマンド名は
//! 使わず、Handler との対応付けを型で保証します。
//!
//! # 二層構造
//! - **表層（Typed）**: `Request` trait, `Handler<R>` trait - 型安全
//! - **内部（Erased）**: `Arc<dyn Any>` + invoke thunk - type erasure

pub mod cancel;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod request;

// 主要な trait/型 を再エクスポート
pub use self::cancel::{CancelSignal, CancelSource, Cancelled};
pub use self::dispatcher::{DispatchError, Dispatcher};
pub use self::handler::{Fault, Handler};
pub use self::registry::{HandlerRegistry, RegistryError};
pub use self::request::{Reply, Request, short_type_name};
