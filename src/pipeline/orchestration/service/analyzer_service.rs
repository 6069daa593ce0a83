use std::pin::Pin;
use std::sync::Arc;

use futures::Future;
use futures::task::Context;
use futures::task::Poll;
use tower::{BoxError, Service};

use crate::pipeline::context::{AnalyzedState, DecodedState, ImageContext};
use crate::pipeline::orchestration::processing_pipeline::AnalyzerStep;

#[derive(Clone)]
pub struct AnalyzerService {
    inner: Arc<dyn AnalyzerStep>,
}

impl AnalyzerService {
    pub fn new(inner: Box<dyn AnalyzerStep>) -> Self {
        Self {
            inner: Arc::from(inner),
        }
    }
}

impl Service<ImageContext<DecodedState>> for AnalyzerService {
    type Response = ImageContext<AnalyzedState>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ImageContext<DecodedState>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let analysis = inner.analyze(&req).await?;
            Ok(req.into_analyzed(analysis))
        })
    }
}
