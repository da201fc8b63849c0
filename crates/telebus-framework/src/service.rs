//! Tower integration.
//!
//! [`BusService`] exposes a [`CommandBus`] as a `tower::Service<Arc<Update>>`,
//! so timeouts, concurrency limits and similar middleware can wrap dispatch:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use tower::limit::ConcurrencyLimitLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(ConcurrencyLimitLayer::new(16))
//!     .service(BusService::new(bus, api));
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use telebus_core::{BoxedApi, Update};
use tower::Service;

use crate::bus::{CommandBus, DispatchReport};
use crate::error::CommandError;

/// A cloneable service dispatching updates through a shared bus.
#[derive(Clone)]
pub struct BusService {
    bus: Arc<CommandBus>,
    api: BoxedApi,
}

impl BusService {
    pub fn new(bus: Arc<CommandBus>, api: BoxedApi) -> Self {
        Self { bus, api }
    }

    pub fn bus(&self) -> &Arc<CommandBus> {
        &self.bus
    }
}

impl std::fmt::Debug for BusService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusService")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl Service<Arc<Update>> for BusService {
    type Response = DispatchReport;
    type Error = CommandError;
    type Future = BoxFuture<'static, Result<DispatchReport, CommandError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, update: Arc<Update>) -> Self::Future {
        let bus = self.bus.clone();
        let api = self.api.clone();
        async move { bus.handler(api.as_ref(), &update).await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;
    use telebus_core::{ApiResult, BotApi, Message, MessageEntity};
    use tower::ServiceExt;

    use super::*;
    use crate::command::command;

    struct NullApi;

    #[async_trait]
    impl BotApi for NullApi {
        async fn call_api(&self, _method: &str, _params: Value) -> ApiResult<Value> {
            Ok(Value::Bool(true))
        }
    }

    #[test]
    fn test_oneshot_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut bus = CommandBus::new();
        bus.add_command(command("ping").handler(move |_api, _inv| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }.boxed()
        }))
        .unwrap();

        let service = BusService::new(Arc::new(bus), Arc::new(NullApi));
        let update = Arc::new(Update {
            update_id: 3,
            message: Some(Message {
                text: Some("/ping".into()),
                entities: vec![MessageEntity::bot_command(0, 5)],
                ..Default::default()
            }),
            ..Default::default()
        });

        let report = tokio_test::block_on(service.oneshot(update)).unwrap();
        assert_eq!(report.invoked, ["ping"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
