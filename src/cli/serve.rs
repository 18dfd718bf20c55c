use crate::{config, info, server};

pub async fn serve() {
    info!("Starting photo frame server on {}", config::server_addr());
    server::start_api_server().await;
}
