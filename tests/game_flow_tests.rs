use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rand::SeedableRng;
use tower::ServiceExt; // for `oneshot`

use arcade::round::GuessRound;
use arcade::score::ScoreService;
use arcade::{
    AppState, InMemoryPlayerRepository, InMemoryRoundStore, InMemoryScoreRepository, RoundStore,
};

struct TestServer {
    app: Router,
    state: AppState,
    round_store: Arc<InMemoryRoundStore>,
}

impl TestServer {
    fn new() -> Self {
        let round_store = Arc::new(InMemoryRoundStore::new());
        let state = AppState::new(
            Arc::new(InMemoryPlayerRepository::new()),
            round_store.clone(),
            Arc::new(ScoreService::new(Arc::new(InMemoryScoreRepository::new()))),
        );
        Self {
            app: arcade::app(state.clone()),
            state,
            round_store,
        }
    }

    async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        Self::read(response).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        Self::read(response).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Pins the guessing round target for a player so tests can drive the
    /// round deterministically
    async fn pin_guess_target(&self, player_name: &str, target: i32) -> String {
        let player = self
            .state
            .player_repository
            .get_or_create(player_name)
            .await
            .unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut round = GuessRound::start(&mut rng);
        round.target = target;
        self.round_store.put_guess_round(&player.id, round).await;
        player.id
    }
}

#[tokio::test]
async fn guess_round_flows_from_first_guess_to_ledger() {
    let server = TestServer::new();
    let player_id = server.pin_guess_target("alice", 50).await;

    let (status, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "alice", "guess": 10}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hint"], "too_low");
    assert_eq!(json["attempts"], 1);

    let (_, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "alice", "guess": 90}))
        .await;
    assert_eq!(json["hint"], "too_high");
    assert_eq!(json["attempts"], 2);

    let (_, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "alice", "guess": 50}))
        .await;
    assert_eq!(json["hint"], "correct");
    assert_eq!(json["attempts"], 3);
    assert_eq!(json["score"], 97);

    // The round state is gone and the ledger saw the write
    assert!(server.round_store.get_guess_round(&player_id).await.is_none());

    let (status, json) = server.get("/api/players/alice/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_games"], 1);
    assert_eq!(json["highest_score"], 97);

    let (_, json) = server.get("/api/games/number_guess/stats").await;
    assert_eq!(json["play_count"], 1);
    assert_eq!(json["average_score"], 97.0);
}

#[tokio::test]
async fn abandoned_round_starts_fresh() {
    let server = TestServer::new();
    server.pin_guess_target("bob", 50).await;

    server
        .post("/api/guess", serde_json::json!({"player_name": "bob", "guess": 10}))
        .await;

    let (status, json) = server
        .post("/api/guess/reset", serde_json::json!({"player_name": "bob"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], true);

    // Next guess opens a brand-new round with attempts starting over
    let (_, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "bob", "guess": 42}))
        .await;
    assert_eq!(json["attempts"], 1);
}

#[tokio::test]
async fn tic_tac_toe_win_reaches_leaderboard() {
    let server = TestServer::new();

    let (status, json) = server
        .post(
            "/api/tictactoe/move",
            serde_json::json!({
                "player_name": "carol",
                "board": ["X", "X", "", "O", "O", "", "", "", ""],
                "position": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["winner"], "X");
    assert_eq!(json["message"], "You win!");

    let (status, json) = server
        .get("/api/scores/leaderboard?game=tic_tac_toe")
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["player_name"], "carol");
    assert_eq!(entries[0]["score"], 100);
    assert_eq!(entries[0]["is_personal_best"], true);
}

#[tokio::test]
async fn tic_tac_toe_round_trip_against_the_computer() {
    let server = TestServer::new();

    // Open in a corner; the computer must answer with a legal mark
    let (status, json) = server
        .post(
            "/api/tictactoe/move",
            serde_json::json!({
                "player_name": "dave",
                "board": ["", "", "", "", "", "", "", "", ""],
                "position": 0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["winner"].is_null());

    let board: Vec<String> = json["board"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap().to_string())
        .collect();
    assert_eq!(board.iter().filter(|c| c.as_str() == "X").count(), 1);
    assert_eq!(board.iter().filter(|c| c.as_str() == "O").count(), 1);

    // Feed the echoed board back for the next move
    let open_index = board.iter().position(|c| c.is_empty()).unwrap();
    let (status, _) = server
        .post(
            "/api/tictactoe/move",
            serde_json::json!({
                "player_name": "dave",
                "board": board,
                "position": open_index
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rps_wins_accumulate_scores_and_stats() {
    let server = TestServer::new();

    let mut first_win_seen = false;
    for _ in 0..200 {
        let (status, json) = server
            .post(
                "/api/rps",
                serde_json::json!({"player_name": "erin", "choice": "rock"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        if json["result"] == "win" {
            first_win_seen = true;
            assert!(json["wins"].as_u64().unwrap() >= 1);
            break;
        }
    }
    assert!(first_win_seen, "expected at least one win in 200 rounds");

    let (status, json) = server.get("/api/players/erin/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["highest_score"], 10);

    let (_, json) = server.get("/api/games/rock_paper_scissors/stats").await;
    assert_eq!(json["average_score"], 10.0);
}

#[tokio::test]
async fn personal_best_demotion_is_visible_over_http() {
    let server = TestServer::new();

    // First round: three attempts, score 97
    server.pin_guess_target("frank", 30).await;
    server
        .post("/api/guess", serde_json::json!({"player_name": "frank", "guess": 10}))
        .await;
    server
        .post("/api/guess", serde_json::json!({"player_name": "frank", "guess": 20}))
        .await;
    let (_, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "frank", "guess": 30}))
        .await;
    assert_eq!(json["score"], 97);

    // Second round: one attempt, score 99, demoting the first record
    server.pin_guess_target("frank", 31).await;
    let (_, json) = server
        .post("/api/guess", serde_json::json!({"player_name": "frank", "guess": 31}))
        .await;
    assert_eq!(json["score"], 99);

    let (_, json) = server
        .get("/api/scores/leaderboard?game=number_guess")
        .await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Exactly one personal best, on the higher score
    let bests: Vec<_> = entries
        .iter()
        .filter(|e| e["is_personal_best"] == true)
        .collect();
    assert_eq!(bests.len(), 1);
    assert_eq!(bests[0]["score"], entries[0]["score"]);

    let (_, json) = server.get("/api/players/frank/stats").await;
    assert_eq!(json["total_games"], 2);
}

#[tokio::test]
async fn recent_scores_cover_all_games() {
    let server = TestServer::new();

    server.pin_guess_target("gina", 77).await;
    server
        .post("/api/guess", serde_json::json!({"player_name": "gina", "guess": 77}))
        .await;
    server
        .post(
            "/api/tictactoe/move",
            serde_json::json!({
                "player_name": "gina",
                "board": ["X", "X", "", "O", "O", "", "", "", ""],
                "position": 2
            }),
        )
        .await;

    let (status, json) = server.get("/api/scores/recent").await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Highest score first: the tic-tac-toe 100 beats the guess 99
    assert_eq!(entries[0]["game"], "tic_tac_toe");
    assert_eq!(entries[0]["score"], 100);
    assert_eq!(entries[1]["game"], "number_guess");
}

#[tokio::test]
async fn invalid_inputs_are_rejected_without_side_effects() {
    let server = TestServer::new();

    let (status, _) = server
        .post("/api/guess", serde_json::json!({"player_name": "harry", "guess": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/api/tictactoe/move",
            serde_json::json!({
                "player_name": "harry",
                "board": ["X", "banana", "", "", "", "", "", "", ""],
                "position": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing reached the ledger
    let (status, _) = server.get("/api/players/harry/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
