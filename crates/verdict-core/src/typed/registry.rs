//! HandlerRegistry - Handler の登録と管理
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - Generic methods での登録と型安全性
//! - Arc による共有所有権
//!
//! 起動時に組み立て（可変）、実行時は読み取り専用で使います。

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{ErasedHandler, Handler, erase};
use super::request::{Request, short_type_name};
use crate::ports::{HandlerKey, HandlerProvider, ResolvedHandler};

struct Entry {
    instance: ErasedHandler,
    handler_name: &'static str,
    request_name: &'static str,
}

/// Static table of handlers keyed by request type.
///
/// # 使用例
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register::<GetUser, _>(GetUserHandler)?;
/// let dispatcher = Dispatcher::new(Arc::new(registry));
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, Entry>,
}

/// RegistryError は HandlerRegistry の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Handler for request type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<R: Request, H: Handler<R> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.insert::<R>(Arc::new(handler), short_type_name::<H>())
    }

    /// Register a handler instance that is shared with other owners.
    pub fn register_shared<R: Request, H: Handler<R> + 'static>(
        &mut self,
        handler: Arc<H>,
    ) -> Result<(), RegistryError> {
        self.insert::<R>(handler, short_type_name::<H>())
    }

    fn insert<R: Request>(
        &mut self,
        handler: Arc<dyn Handler<R>>,
        handler_name: &'static str,
    ) -> Result<(), RegistryError> {
        let key = HandlerKey::of::<R>();
        let request_name = short_type_name::<R>();
        if self.handlers.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(request_name));
        }
        self.handlers.insert(
            key,
            Entry {
                instance: erase(handler),
                handler_name,
                request_name,
            },
        );
        Ok(())
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.contains_key(&HandlerKey::of::<R>())
    }

    pub fn contains_key(&self, key: &HandlerKey) -> bool {
        self.handlers.contains_key(key)
    }

    /// Short names of every request type with a handler.
    pub fn registered_requests(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|e| e.request_name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl HandlerProvider for HandlerRegistry {
    fn resolve(&self, key: &HandlerKey) -> Option<ResolvedHandler> {
        self.handlers.get(key).map(|entry| ResolvedHandler {
            instance: Arc::clone(&entry.instance),
            type_name: entry.handler_name,
        })
    }
}
