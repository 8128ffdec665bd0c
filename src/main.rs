use clap::Parser;
use tracing::info;

use crate::{
    config::{Config, StartArgs},
    state::Portal,
};

pub mod catalog;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod state;
pub mod upload;
pub mod views;

#[tokio::main]
async fn main() {
    let StartArgs {
        config_path,
        address: host,
        port,
        log_level: level,
    } = StartArgs::parse();

    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::read(config_path).expect("invalid config file");

    let addr = format!("{host}:{port}");

    let state = Portal::new(config);

    info!("Now listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("error while starting TCP listener");

    let router = router::router(state);

    axum::serve(listener, router)
        .await
        .expect("error while starting server");
}
