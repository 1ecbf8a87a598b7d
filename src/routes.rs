use crate::{
    api::{dashboard, department, employee, overtime},
    config::Config,
    error::json_error_handler,
    store::SessionSource,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};

pub type ApiLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer-IP limiter shared by every worker.
pub fn build_limiter(requests_per_min: u32) -> Result<ApiLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

/// Mounts the API under `config.api_prefix`. `P` is the store registered as app data.
pub fn configure<P: SessionSource>(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    limiter: &ApiLimiter,
) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(limiter))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard::<P>)))
            .service(
                web::resource("/departments")
                    .route(web::get().to(department::list_departments::<P>)),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees::<P>))
                            .route(web::post().to(employee::create_employee::<P>)),
                    )
                    // /employees/lookup, registered ahead of /{id}
                    .service(
                        web::resource("/lookup")
                            .route(web::get().to(employee::lookup_employees::<P>)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee::<P>))
                            .route(web::put().to(employee::update_employee::<P>))
                            .route(web::delete().to(employee::delete_employee::<P>)),
                    ),
            )
            .service(
                web::scope("/overtimes")
                    // /overtimes
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::list_overtimes::<P>))
                            .route(web::post().to(overtime::create_overtime::<P>)),
                    )
                    // /overtimes/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(overtime::get_overtime::<P>))
                            .route(web::put().to(overtime::update_overtime::<P>))
                            .route(web::delete().to(overtime::delete_overtime::<P>)),
                    ),
            ),
    );
}
