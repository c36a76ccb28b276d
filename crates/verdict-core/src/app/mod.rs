//! App - アプリケーション層
//!
//! handler の登録、dispatcher、projection の設定をまとめて組み立てます。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: 登録と起動時検証
//! - **App**: dispatch → project を一度に行う入口

pub mod builder;

pub use self::builder::{App, AppBuilder, BuildError};
