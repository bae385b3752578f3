use std::{net::SocketAddr, sync::Arc};

use movie_catalog::{
    AppState, app,
    client::{CatalogClient, ClientError},
    config::Config,
    db,
    models::{MovieDraft, MovieKind, MoviePatch},
    store::MovieStore,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServer {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let db = db::connect_and_migrate("sqlite::memory:", 1).await.expect("in-memory database");
        let state =
            Arc::new(AppState { config: Arc::new(Config::default()), store: MovieStore::new(db) });

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app(state))
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("server error");
        });

        Self { addr, shutdown_tx, handle }
    }

    fn client(&self) -> CatalogClient {
        CatalogClient::new(reqwest::Client::new(), format!("http://{}/", self.addr))
    }

    async fn stop(self) {
        self.shutdown_tx.send(()).ok();
        self.handle.await.unwrap();
    }
}

fn draft(title: &str) -> MovieDraft {
    MovieDraft {
        title: title.to_string(),
        kind: MovieKind::Movie,
        director: "George Lucas".to_string(),
        budget: 11_000_000.0,
        location: "Tunisia".to_string(),
        duration: "121 min".to_string(),
        year: 1977,
    }
}

#[tokio::test]
async fn client_round_trip_against_server() {
    let server = TestServer::start().await;
    let client = server.client();

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let first = client.create(&draft("Star Wars")).await.unwrap();
    client.create(&draft("American Graffiti")).await.unwrap();
    client.create(&draft("The War of the Worlds")).await.unwrap();

    let listed = client.list(1, 10).await.unwrap();
    assert_eq!(listed.total_movies, 3);
    assert_eq!(listed.data.len(), 3);

    let found = client.search("war", 1, 10).await.unwrap();
    let titles: Vec<&str> = found.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["The War of the Worlds", "Star Wars"]);

    let patch = MoviePatch { year: Some(1978), ..Default::default() };
    let updated = client.update(first.id, &patch).await.unwrap();
    assert_eq!(updated.year, 1978);
    assert_eq!(updated.title, "Star Wars");

    client.delete(first.id).await.unwrap();
    let err = client.delete(first.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }), "{err}");

    server.stop().await;
}

#[tokio::test]
async fn client_surfaces_validation_failures() {
    let server = TestServer::start().await;
    let client = server.client();

    let mut bad = draft("Too Early");
    bad.year = 1850;
    match client.create(&bad).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Validation failed");
        },
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(client.list(1, 10).await.unwrap().total_movies, 0);

    server.stop().await;
}
