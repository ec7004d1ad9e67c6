pub mod handlers;

use actix_web::web;
use handlers::{liquidation, portfolio, system};

/// Register every route of the dashboard API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health)
        .service(system::metrics)
        .service(system::networks)
        .service(portfolio::connect_wallet)
        .service(portfolio::disconnect_wallet)
        .service(portfolio::get_api_key)
        .service(portfolio::set_api_key)
        .service(portfolio::get_portfolio)
        .service(portfolio::refresh_portfolio)
        .service(liquidation::open_session)
        .service(liquidation::session_status)
        .service(liquidation::close_session)
        .service(liquidation::set_destination)
        .service(liquidation::swap_submitted)
        .service(liquidation::drain_notifications);
}
