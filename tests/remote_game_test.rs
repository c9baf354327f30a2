//! Remote topology: coordinators polling a real server over loopback HTTP.

use connect4::{
    AppState, ConsoleView, GameBackend, GameOutcome, HeuristicBot, HttpGameClient,
    RemoteCoordinator, Seat, StatusReply, serve,
};
use connect4_engine::{Icon, PlayerId};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const POLL: Duration = Duration::from_millis(20);

/// Starts a server on an ephemeral port. Dropping the sender stops it.
async fn spawn_server() -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve(listener, AppState::new(), async {
        rx.await.ok();
    }));
    (url, tx)
}

fn remote_bot(name: &str, url: &str) -> RemoteCoordinator {
    let seat = Seat::new(
        name,
        HttpGameClient::new(url),
        HeuristicBot::new(Duration::ZERO),
        ConsoleView::new(std::io::sink(), false),
    );
    RemoteCoordinator::new(Box::new(seat), POLL)
}

#[tokio::test]
async fn test_two_remote_bots_finish_the_same_game() {
    let (url, _shutdown) = spawn_server().await;

    let (first, second) = tokio::join!(
        remote_bot("Remote_A", &url).run(),
        remote_bot("Remote_B", &url).run(),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(first.outcome(), second.outcome());
    assert_eq!(first.turn_number(), second.turn_number());

    let client = HttpGameClient::new(url.as_str());
    let status = client.status().await.unwrap().ready().unwrap();
    assert!(status.is_over());
    assert_eq!(*first.turn_number(), status.turn_number);
    if let GameOutcome::Won(winner) = first.outcome() {
        assert_eq!(Some(winner), status.winner.as_ref());
    }
}

#[tokio::test]
async fn test_status_is_not_ready_with_one_player() {
    let (url, _shutdown) = spawn_server().await;
    let client = HttpGameClient::new(format!("{url}/"));

    let icon = client.register(&PlayerId::parse("solo").unwrap()).await.unwrap();
    assert_eq!(icon, Icon::X);
    assert!(matches!(client.status().await.unwrap(), StatusReply::NotReady));

    let icon = client.register(&PlayerId::parse("duo").unwrap()).await.unwrap();
    assert_eq!(icon, Icon::O);
    let status = client.status().await.unwrap().ready().unwrap();
    assert_eq!(status.turn_number, 0);
    assert_eq!(status.active_icon, Some(Icon::X));
}

#[tokio::test]
async fn test_remote_player_fails_without_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = remote_bot("Lonely", &url).run().await.unwrap_err();
    assert!(err.to_string().contains("Failed to register"));
}

#[tokio::test]
async fn test_remote_player_gives_up_after_repeated_poll_failures() {
    let (url, shutdown) = spawn_server().await;

    // Registered alone, the player keeps polling until the server goes away.
    let run = tokio::spawn(remote_bot("Stranded", &url).with_max_poll_failures(2).run());
    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("coordinator kept polling a dead server")
        .unwrap();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Lost contact"), "got {err:#}");
}
