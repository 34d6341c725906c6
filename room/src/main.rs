use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use poker_room::{ClientAction, Room, RoomConfig, ServerEvent};
use texas_engine::ActionInput;

type ClientTx = mpsc::UnboundedSender<Message>;

enum ActorMsg {
    Client { sid: String, action: ClientAction },
    Subscribe { sid: String, tx: ClientTx },
}

/// One room per actor task, draining a single-consumer `UnboundedReceiver`
/// — the pattern already in the teacher's `TableActor` — so every
/// mutating entry point for a given room is serialized for free, per
/// spec §5, with no explicit `Mutex<Room>` needed.
struct RoomActor {
    room: Room,
    rx: mpsc::UnboundedReceiver<ActorMsg>,
    subscribers: HashMap<String, ClientTx>,
}

impl RoomActor {
    fn spawn(room_id: String, config: RoomConfig) -> mpsc::UnboundedSender<ActorMsg> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut actor = RoomActor {
            room: Room::new(room_id, config),
            rx,
            subscribers: HashMap::new(),
        };
        tokio::spawn(async move {
            while let Some(msg) = actor.rx.recv().await {
                match msg {
                    ActorMsg::Subscribe { sid, tx } => {
                        actor.subscribers.insert(sid.clone(), tx);
                        actor.send_to(&sid, &ServerEvent::Welcome { room_id: actor.room.id.clone() });
                        actor.broadcast_snapshot();
                    }
                    ActorMsg::Client { sid, action } => actor.handle(sid, action),
                }
            }
        });
        tx
    }

    fn handle(&mut self, sid: String, action: ClientAction) {
        match action {
            ClientAction::Join { name, buyin, .. } => match self.room.join(&sid, &name, buyin) {
                Ok(seat) => self.send_to(&sid, &ServerEvent::Joined { seat }),
                Err(e) => self.send_to(&sid, &ServerEvent::Error { message: e.to_string() }),
            },
            ClientAction::Leave { .. } => {
                self.room.leave(&sid);
                self.subscribers.remove(&sid);
            }
            ClientAction::Ready { ready, .. } => {
                if let Err(e) = self.room.set_ready(&sid, ready) {
                    self.send_to(&sid, &ServerEvent::Error { message: e.to_string() });
                }
            }
            ClientAction::Start { .. } => {
                if let Err(e) = self.room.start_hand() {
                    self.send_to(&sid, &ServerEvent::Error { message: e.to_string() });
                }
            }
            ClientAction::Action { action, amount, .. } => match parse_action_input(&action, amount) {
                Ok(input) => {
                    if let Err(e) = self.room.apply_action(&sid, input) {
                        self.send_to(&sid, &ServerEvent::Error { message: e.to_string() });
                    }
                }
                Err(message) => self.send_to(&sid, &ServerEvent::Error { message }),
            },
            ClientAction::Buyin { amount, .. } => {
                if let Err(e) = self.room.buyin(&sid, amount) {
                    self.send_to(&sid, &ServerEvent::Error { message: e.to_string() });
                }
            }
            ClientAction::Chat { text, .. } => {
                let name = self.room.name_of(&sid).unwrap_or_else(|| sid.clone());
                self.room.add_chat(&sid, &name, &text);
                self.broadcast(&ServerEvent::Chat { sid: sid.clone(), name, text });
            }
        }
        self.broadcast_snapshot();
    }

    fn broadcast_snapshot(&mut self) {
        let public = self.room.public_state();
        self.broadcast(&ServerEvent::Snapshot { public });
        let sids: Vec<String> = self.subscribers.keys().cloned().collect();
        for sid in sids {
            let private = self.room.private_state(&sid);
            self.send_to(&sid, &ServerEvent::Private { private });
        }
    }

    fn broadcast(&mut self, evt: &ServerEvent) {
        let Ok(msg) = serde_json::to_string(evt) else { return };
        self.subscribers.retain(|_, tx| tx.send(Message::Text(msg.clone())).is_ok());
    }

    fn send_to(&mut self, sid: &str, evt: &ServerEvent) {
        if let Some(tx) = self.subscribers.get(sid) {
            if let Ok(msg) = serde_json::to_string(evt) {
                let _ = tx.send(Message::Text(msg));
            }
        }
    }
}

fn parse_action_input(action: &str, amount: Option<u64>) -> Result<ActionInput, String> {
    match action {
        "fold" => Ok(ActionInput::Fold),
        "check" => Ok(ActionInput::Check),
        "call" => Ok(ActionInput::Call),
        "raise" => amount
            .map(|amount| ActionInput::Raise { amount })
            .ok_or_else(|| "raise requires an amount".to_string()),
        _ => Err("unknown action".to_string()),
    }
}

type RoomMap = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<ActorMsg>>>>;

async fn ws_handler(ws: WebSocketUpgrade, State(rooms): State<RoomMap>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, rooms))
}

async fn handle_socket(socket: WebSocket, rooms: RoomMap) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(msg) = client_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut subscribed_to: Option<(String, String)> = None;

    while let Some(Ok(Message::Text(text))) = ws_rx.next().await {
        let Ok(cmd) = serde_json::from_str::<ClientAction>(&text) else {
            let _ = client_tx.send(Message::Text("{\"type\":\"error\",\"message\":\"bad_json\"}".into()));
            continue;
        };
        let room_id = cmd.room_id().to_string();
        let sid = cmd.sid().to_string();

        let tx = {
            let mut map = rooms.lock().await;
            map.entry(room_id.clone())
                .or_insert_with(|| RoomActor::spawn(room_id.clone(), RoomConfig::default()))
                .clone()
        };

        let needs_subscribe = subscribed_to.as_ref() != Some(&(room_id.clone(), sid.clone()));
        if needs_subscribe {
            let _ = tx.send(ActorMsg::Subscribe { sid: sid.clone(), tx: client_tx.clone() });
            subscribed_to = Some((room_id, sid.clone()));
        }
        let _ = tx.send(ActorMsg::Client { sid, action: cmd });
    }

    let _ = writer.await;
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let rooms: RoomMap = Arc::new(Mutex::new(HashMap::new()));
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .nest_service("/", ServeDir::new("public"))
        .with_state(rooms);

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
