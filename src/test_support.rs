//! Helpers shared by unit tests that talk to real HTTP endpoints.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub(crate) async fn serve_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("loopback listener should bind");
    let address = listener
        .local_addr()
        .expect("listener should expose its address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stub server should run");
    });
    format!("http://{address}")
}

/// Returns a loopback base URL on which nothing is listening.
pub(crate) async fn refused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("loopback listener should bind");
    let address = listener
        .local_addr()
        .expect("listener should expose its address");
    drop(listener);
    format!("http://{address}")
}
