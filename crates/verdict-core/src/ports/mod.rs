//! Ports - 抽象化レイヤー
//!
//! dispatch が依存する外部能力をここで trait として定義します。
//! 実装の詳細（どこからハンドラを得るか）は隠蔽されます。

pub mod handler_provider;

pub use self::handler_provider::{HandlerKey, HandlerProvider, ResolvedHandler};
