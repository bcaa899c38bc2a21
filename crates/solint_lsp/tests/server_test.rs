mod common;

use std::time::Duration;

use common::{recv_msg, send_msg};
use solint_lsp::Backend;
use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::LspService;
use tower_lsp::lsp_types::Url;

async fn next_diagnostics(rx: &mut UnboundedReceiver<String>) -> String {
    let wait = async {
        loop {
            let msg = rx.recv().await.expect("server closed the connection");
            if msg.contains("textDocument/publishDiagnostics") {
                return msg;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("no diagnostics published")
}

#[tokio::test]
async fn test_open_and_close_publish_diagnostics() {
    let (client_read, server_write) = tokio::io::duplex(4096);
    let (server_read, client_write) = tokio::io::duplex(4096);

    let (service, socket) = LspService::new(Backend::new);
    tokio::spawn(async move {
        tower_lsp::Server::new(server_read, server_write, socket)
            .serve(service)
            .await;
    });

    let mut reader = tokio::io::BufReader::new(client_read);
    let mut writer = client_write;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(msg) = recv_msg(&mut reader).await {
            if tx.send(msg).is_err() {
                break;
            }
        }
    });

    // Test mode runs every pass without waiting.
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join(".solint.json"), r#"{ "testMode": true }"#).unwrap();
    let root_uri = Url::from_file_path(temp_dir.path()).unwrap();

    let init_req = format!(
        r#"{{"jsonrpc":"2.0","id":1,"method":"initialize","params":{{"rootUri":"{}","capabilities":{{}}}}}}"#,
        root_uri
    );
    send_msg(&mut writer, &init_req).await;
    let resp = rx.recv().await.unwrap();
    assert!(resp.contains("solint-lsp"), "unexpected response: {resp}");

    send_msg(
        &mut writer,
        r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#,
    )
    .await;

    let notes_uri = Url::from_file_path(temp_dir.path().join("notes.md")).unwrap();
    let did_open_notes = format!(
        r#"{{"jsonrpc":"2.0","method":"textDocument/didOpen","params":{{"textDocument":{{"uri":"{}","languageId":"markdown","version":1,"text":"uint"}}}}}}"#,
        notes_uri
    );
    send_msg(&mut writer, &did_open_notes).await;

    let file_uri = Url::from_file_path(temp_dir.path().join("Foo.sol")).unwrap();
    let did_open = format!(
        r#"{{"jsonrpc":"2.0","method":"textDocument/didOpen","params":{{"textDocument":{{"uri":"{}","languageId":"solidity","version":1,"text":"contract C {{ uint x; }}"}}}}}}"#,
        file_uri
    );
    send_msg(&mut writer, &did_open).await;

    let published = next_diagnostics(&mut rx).await;
    assert!(published.contains(file_uri.as_str()), "{published}");
    assert!(published.contains("Use uint256 directly."), "{published}");
    assert!(published.contains(r#""source":"solint""#), "{published}");

    // Drain the remaining passes for the open.
    for _ in 0..2 {
        next_diagnostics(&mut rx).await;
    }

    let did_close = format!(
        r#"{{"jsonrpc":"2.0","method":"textDocument/didClose","params":{{"textDocument":{{"uri":"{}"}}}}}}"#,
        file_uri
    );
    send_msg(&mut writer, &did_close).await;

    let cleared = next_diagnostics(&mut rx).await;
    assert!(cleared.contains(file_uri.as_str()), "{cleared}");
    assert!(cleared.contains(r#""diagnostics":[]"#), "{cleared}");
}
