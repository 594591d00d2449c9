//! Remote conservation checks against a scripted mock server.

use std::time::Duration;

use bytes::BytesMut;
use craftcon_client::{ClientConfig, RconClient};
use craftcon_protocol::{decode, encode, Frame};
use craftcon_verify::verify_from_remote;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const PASSWORD: &str = "sesame";

async fn bind_server() -> (ClientConfig, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("bound socket has an addr");

    let mut config =
        ClientConfig::new(addr.ip().to_string(), addr.port(), PASSWORD);
    config.auth_timeout = Duration::from_millis(500);
    config.command_timeout = Duration::from_millis(500);
    (config, listener)
}

async fn read_frame(stream: &mut TcpStream, buf: &mut BytesMut) -> Frame {
    loop {
        if let Some(frame) = decode(buf).expect("well-formed frame") {
            return frame;
        }
        let n = stream.read_buf(buf).await.expect("read should succeed");
        assert!(n > 0, "client closed before sending a full frame");
    }
}

async fn accept_and_auth(listener: &TcpListener) -> (TcpStream, BytesMut) {
    let (mut stream, _) = listener.accept().await.expect("should accept");
    let mut buf = BytesMut::new();
    let auth = read_frame(&mut stream, &mut buf).await;
    assert_eq!(auth.body, PASSWORD);
    stream
        .write_all(&encode(&Frame::auth_response(auth.id)))
        .await
        .expect("auth response write");
    (stream, buf)
}

#[tokio::test]
async fn test_verify_from_remote_conserved_scores_is_ok() {
    let (config, listener) = bind_server().await;
    let server = tokio::spawn(async move {
        let (mut stream, mut buf) = accept_and_auth(&listener).await;

        let first = read_frame(&mut stream, &mut buf).await;
        assert_eq!(first.body, "scoreboard players get alpha resonance");
        stream
            .write_all(&encode(&Frame::response(first.id, "alpha has 7 [resonance]")))
            .await
            .unwrap();

        let second = read_frame(&mut stream, &mut buf).await;
        assert_eq!(second.body, "scoreboard players get omega resonance");
        stream
            .write_all(&encode(&Frame::response(second.id, "omega has 8 [resonance]")))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let client = RconClient::connect(&config).await.unwrap();
    let report = verify_from_remote(&client, "resonance").await;

    assert!(report.ok, "report should be ok: {:?}", report.failure);
    assert_eq!(report.alpha, 7.0);
    assert_eq!(report.omega, 8.0);
    assert_eq!(report.sum, 15.0);
    client.close().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_verify_from_remote_broken_sum_is_reported() {
    let (config, listener) = bind_server().await;
    let server = tokio::spawn(async move {
        let (mut stream, mut buf) = accept_and_auth(&listener).await;
        for score in ["alpha has 9 [resonance]", "omega has 9 [resonance]"] {
            let cmd = read_frame(&mut stream, &mut buf).await;
            stream
                .write_all(&encode(&Frame::response(cmd.id, score)))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let client = RconClient::connect(&config).await.unwrap();
    let report = verify_from_remote(&client, "resonance").await;

    assert!(!report.ok);
    assert_eq!(report.sum, 18.0);
    assert_eq!(report.residual, 3.0);
    assert!(report.failure.is_some());
    client.close().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_verify_from_remote_malformed_reply_fails_strictly() {
    // A reply with no score line must never be coerced to a number.
    let (config, listener) = bind_server().await;
    let server = tokio::spawn(async move {
        let (mut stream, mut buf) = accept_and_auth(&listener).await;
        let cmd = read_frame(&mut stream, &mut buf).await;
        stream
            .write_all(&encode(&Frame::response(
                cmd.id,
                "Unknown scoreboard objective 'resonance'",
            )))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let client = RconClient::connect(&config).await.unwrap();
    let report = verify_from_remote(&client, "resonance").await;

    assert!(!report.ok);
    let failure = report.failure.expect("must carry a reason");
    assert!(failure.contains("alpha"), "reason names the score: {failure}");
    client.close().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_verify_from_remote_server_hangup_fails_strictly() {
    let (config, listener) = bind_server().await;
    let server = tokio::spawn(async move {
        let (stream, _) = accept_and_auth(&listener).await;
        drop(stream);
    });

    let client = RconClient::connect(&config).await.unwrap();
    let report = verify_from_remote(&client, "resonance").await;

    assert!(!report.ok);
    assert!(report.failure.is_some());
    client.close().await;
    server.await.unwrap();
}
