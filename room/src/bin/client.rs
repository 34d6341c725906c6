use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::connect_async;

#[tokio::main]
async fn main() {
    let url = std::env::args().nth(1).unwrap_or_else(|| "ws://127.0.0.1:8080/ws".to_string());
    // modes: join <room_id> <sid> <name> [buyin] | ready <room_id> <sid> | start <room_id> <sid>
    //        action <room_id> <sid> <fold|check|call|raise> [amount] | leave <room_id> <sid>
    let mode = std::env::args().nth(2).unwrap_or_else(|| "join".to_string());
    let room_id = std::env::args().nth(3).unwrap_or_else(|| "demo".to_string());
    let sid = std::env::args().nth(4).unwrap_or_else(|| format!("c-{}", std::process::id()));

    let (mut ws, _resp) = connect_async(url.as_str()).await.expect("connect");

    let msg = match mode.as_str() {
        "join" => {
            let name = std::env::args().nth(5).unwrap_or_else(|| sid.clone());
            let buyin: u64 = std::env::args().nth(6).and_then(|s| s.parse().ok()).unwrap_or(1000);
            serde_json::json!({"type":"join","room_id":room_id,"sid":sid,"name":name,"buyin":buyin})
        }
        "ready" => serde_json::json!({"type":"ready","room_id":room_id,"sid":sid,"ready":true}),
        "start" => serde_json::json!({"type":"start","room_id":room_id,"sid":sid}),
        "action" => {
            let action = std::env::args().nth(5).unwrap_or_else(|| "check".to_string());
            let amount: Option<u64> = std::env::args().nth(6).and_then(|s| s.parse().ok());
            serde_json::json!({"type":"action","room_id":room_id,"sid":sid,"action":action,"amount":amount})
        }
        "leave" => serde_json::json!({"type":"leave","room_id":room_id,"sid":sid}),
        other => {
            eprintln!("unknown mode: {other}");
            return;
        }
    };
    ws.send(tokio_tungstenite::tungstenite::Message::Text(msg.to_string())).await.unwrap();

    let mut reads = 0;
    while reads < 20 {
        let Some(Ok(frame)) = ws.next().await else { break };
        let txt = frame.to_string();
        println!("<- {txt}");
        if let Ok(v) = serde_json::from_str::<Value>(&txt) {
            if v.get("type").and_then(|t| t.as_str()) == Some("error") {
                break;
            }
        }
        reads += 1;
    }
}
