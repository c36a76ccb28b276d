//! Projection - Outcome を wire 形式の envelope に変換する
//!
//! # 構成
//! - **options**: naming policy と object envelope の切り替え（TOML から読める）
//! - **naming**: キー名の変換
//! - **envelope**: Message / Object / Items / Page の型付き envelope
//! - **projector**: Outcome → Envelope の判定
//! - **response**: status / headers / body をまとめた応答

pub mod envelope;
pub mod naming;
pub mod options;
pub mod projector;
pub mod response;

pub use self::envelope::{
    Envelope, ErrorPayload, ItemsEnvelope, MessageEnvelope, ObjectEnvelope, PageEnvelope,
};
pub use self::naming::NamingPolicy;
pub use self::options::{ConfigError, ProjectionOptions};
pub use self::projector::{ResponseProjector, project, project_reply};
pub use self::response::{DEFAULT_RETRY_AFTER_SECS, Response};
