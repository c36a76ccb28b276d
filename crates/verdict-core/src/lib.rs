//! verdict-core
//!
//! Outcome algebra, type-routed dispatch and response projection.
//!
//! # モジュール構成
//! - **domain**: Outcome / TypedOutcome / ResultError / Failure などの値型
//! - **ports**: 抽象化レイヤー（HandlerProvider）
//! - **typed**: 型付き Request / Handler API と Dispatcher
//! - **projection**: Outcome → Envelope → Response
//! - **app**: AppBuilder（登録と起動時検証）

pub mod app;
pub mod domain;
pub mod ports;
pub mod projection;
pub mod typed;
