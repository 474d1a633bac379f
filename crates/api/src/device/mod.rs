pub mod register_device;

use actix_web::web;
use register_device::register_device_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/device", web::post().to(register_device_controller));
}
