use crate::infrastructure::monitoring::MonitoringManager;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

/// Counts requests and records response times for `/metrics`
#[derive(Clone)]
pub struct MetricsMiddleware {
    monitoring_manager: Arc<MonitoringManager>,
}

impl MetricsMiddleware {
    pub fn new(monitoring_manager: Arc<MonitoringManager>) -> Self {
        Self { monitoring_manager }
    }
}

impl<S> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = MetricsService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService {
            service: Rc::new(service),
            monitoring_manager: Arc::clone(&self.monitoring_manager),
        }))
    }
}

pub struct MetricsService<S> {
    service: Rc<S>,
    monitoring_manager: Arc<MonitoringManager>,
}

impl<S> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let monitoring_manager = Arc::clone(&self.monitoring_manager);
        let start_time = Instant::now();

        Box::pin(async move {
            monitoring_manager.increment_metric("requests_total").await;

            let path = req.path().to_string();
            let method = req.method().to_string();

            let res = service.call(req).await;

            let response_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
            monitoring_manager.record_response_time(response_time_ms).await;

            match res {
                Ok(res) => {
                    let status = res.status();
                    if status.is_success() {
                        monitoring_manager.increment_metric("requests_successful").await;
                    } else {
                        monitoring_manager.increment_metric("requests_failed").await;
                    }
                    log::debug!("{method} {path} - {status} in {response_time_ms:.1}ms");
                    Ok(res)
                }
                Err(e) => {
                    monitoring_manager.increment_metric("requests_failed").await;
                    log::error!("{method} {path} failed after {response_time_ms:.1}ms: {e}");
                    Err(e)
                }
            }
        })
    }
}
