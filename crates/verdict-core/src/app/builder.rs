//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use tracing::error;

use crate::domain::{CastError, Failure, FailureKind, Outcome};
use crate::ports::HandlerKey;
use crate::projection::{ProjectionOptions, Response, ResponseProjector};
use crate::typed::{
    CancelSignal, Dispatcher, Handler, HandlerRegistry, RegistryError, Request, short_type_name,
};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .register::<GetUser, _>(GetUserHandler)?
///     .expect::<GetUser>()
///     .options(ProjectionOptions::from_path("verdict.toml")?)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect::<R>() で handler が必要な request 型を宣言
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば BuildError を返す（初回 dispatch まで待たない）
pub struct AppBuilder {
    registry: HandlerRegistry,
    expected: Vec<(HandlerKey, &'static str)>,
    options: ProjectionOptions,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing handlers for request types: {0:?}. These requests were expected but not registered.")]
    MissingHandlers(Vec<&'static str>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            expected: Vec::new(),
            options: ProjectionOptions::default(),
        }
    }

    /// Handler を登録
    pub fn register<R: Request, H: Handler<R> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<R, H>(handler)?;
        Ok(self)
    }

    /// `R` must have a handler when `build()` runs.
    pub fn expect<R: Request>(mut self) -> Self {
        self.expected
            .push((HandlerKey::of::<R>(), short_type_name::<R>()));
        self
    }

    pub fn options(mut self, options: ProjectionOptions) -> Self {
        self.options = options;
        self
    }

    /// # 検証
    /// - expect() で宣言された request 型が全て登録されているかチェック
    /// - 不足があれば BuildError::MissingHandlers を返す
    pub fn build(self) -> Result<App, BuildError> {
        let missing: Vec<&'static str> = self
            .expected
            .iter()
            .filter(|(key, _)| !self.registry.contains_key(key))
            .map(|(_, name)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingHandlers(missing));
        }
        Ok(App {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(self.registry))),
            projector: ResponseProjector::new(self.options),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は dispatcher と projector をまとめたもの
///
/// `respond` は dispatch → widen → project を一度に行い、hosting boundary
/// にそのまま返せる [`Response`] を作ります。
pub struct App {
    dispatcher: Arc<Dispatcher>,
    projector: ResponseProjector,
}

impl App {
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn options(&self) -> &ProjectionOptions {
        self.projector.options()
    }

    pub async fn respond<R>(&self, request: R) -> Response
    where
        R: Request,
        R::Output: TryInto<Outcome>,
        <R::Output as TryInto<Outcome>>::Error: Into<CastError>,
    {
        self.respond_with(request, CancelSignal::none()).await
    }

    pub async fn respond_with<R>(&self, request: R, cancel: CancelSignal) -> Response
    where
        R: Request,
        R::Output: TryInto<Outcome>,
        <R::Output as TryInto<Outcome>>::Error: Into<CastError>,
    {
        let options = self.projector.options();
        let output = match self.dispatcher.dispatch_with(request, cancel).await {
            Ok(output) => output,
            Err(err) => return Response::from_dispatch_error(&err, options),
        };
        let widened: Result<Outcome, CastError> = output.try_into().map_err(Into::into);
        match widened {
            Ok(outcome) => Response::from_outcome(&outcome, options),
            Err(err) => {
                error!(
                    error = %err,
                    request_type = short_type_name::<R>(),
                    "outcome could not be projected"
                );
                Response::from_outcome(&Outcome::failure(Failure::of(FailureKind::Fault)), options)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StatusCode, TypedOutcome};
    use crate::typed::Fault;
    use crate::typed::handler::fixtures::{
        Echo, EchoHandler, Locked, LockedHandler, Lookup, LookupHandler, Unregistered,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_build_success() {
        let app = AppBuilder::new()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .expect::<Echo>()
            .build();
        assert!(app.is_ok());
    }

    #[test]
    fn test_build_missing_handlers() {
        let app = AppBuilder::new()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .expect::<Echo>()
            .expect::<Locked>()
            .build();
        assert!(matches!(
            app,
            Err(BuildError::MissingHandlers(missing)) if missing == vec!["Locked"]
        ));
    }

    #[test]
    fn test_build_no_expectations() {
        let app = AppBuilder::new()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .build();
        assert!(app.is_ok());
    }

    #[tokio::test]
    async fn respond_projects_typed_output() {
        let app = AppBuilder::new()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .build()
            .unwrap();
        let response = app
            .respond(Echo {
                text: "hi".to_string(),
            })
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), Some(&json!({"data": "Processed: hi"})));
    }

    #[tokio::test]
    async fn respond_maps_domain_failure_and_missing_handler() {
        let app = AppBuilder::new()
            .register::<Locked, _>(LockedHandler)
            .unwrap()
            .register::<Lookup, _>(LookupHandler)
            .unwrap()
            .options(ProjectionOptions::default().with_object_envelope(false))
            .build()
            .unwrap();

        let locked = app.respond(Locked).await;
        assert_eq!(locked.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bare = app.respond(Lookup(5)).await;
        assert_eq!(bare.body(), Some(&json!({"id": 5})));

        let missing = app.respond(Unregistered).await;
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.dispatcher().binding_count(), 3);
    }

    /// Output whose map keys are not strings, so it has no JSON form.
    struct Grid;

    impl Request for Grid {
        type Output = TypedOutcome<HashMap<(u8, u8), u8>>;
    }

    struct GridHandler;

    #[async_trait]
    impl Handler<Grid> for GridHandler {
        async fn handle(
            &self,
            _req: Grid,
            _cancel: CancelSignal,
        ) -> Result<TypedOutcome<HashMap<(u8, u8), u8>>, Fault> {
            let mut cells = HashMap::new();
            cells.insert((0, 0), 1);
            Ok(TypedOutcome::ok(cells))
        }
    }

    #[tokio::test]
    async fn respond_falls_back_to_500_when_output_cannot_be_encoded() {
        let app = AppBuilder::new()
            .register::<Grid, _>(GridHandler)
            .unwrap()
            .build()
            .unwrap();

        // dispatch itself succeeds; only widening fails
        assert!(app.dispatcher().dispatch(Grid).await.is_ok());

        let response = app.respond(Grid).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body(),
            Some(&json!({
                "message": "An unexpected error occurred.",
                "error": {"message": "An unexpected error occurred."}
            }))
        );
    }
}
