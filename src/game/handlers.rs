use axum::{extract::State, Json};
use tracing::{debug, info, instrument};

use super::board::{Board, BoardOutcome, Marker};
use super::guess::{evaluate_guess, guess_score, GuessHint};
use super::opponent::choose_opponent_move;
use super::rps::{evaluate_choice, RpsChoice, RpsOutcome, RPS_WIN_SCORE};
use super::types::{
    GuessRequest, GuessResponse, MoveRequest, MoveResponse, ResetRequest, ResetResponse,
    RpsRequest, RpsResponse,
};
use super::{GameError, TIC_TAC_TOE_WIN_SCORE};
use crate::player::PlayerModel;
use crate::round::GuessRound;
use crate::score::GameKind;
use crate::shared::{AppError, AppState};

/// Resolves the acting player, generating a guest name when the request
/// carries none. The resolved name is echoed back in every response.
async fn resolve_player(
    state: &AppState,
    player_name: &Option<String>,
) -> Result<PlayerModel, AppError> {
    let name = match player_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => PlayerModel::guest_name(),
    };
    state.player_repository.get_or_create(&name).await
}

/// HTTP handler for a number-guessing attempt
///
/// POST /api/guess
/// Starts a round on the first guess, hints on misses, and on a correct
/// guess completes the round and writes the score to the ledger.
#[instrument(name = "number_guess", skip(state, request))]
pub async fn number_guess(
    State(state): State<AppState>,
    Json(request): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    let player = resolve_player(&state, &request.player_name).await?;

    let mut round = match state.round_store.get_guess_round(&player.id).await {
        Some(round) => round,
        None => {
            debug!(player_id = %player.id, "Starting new guess round");
            let mut rng = rand::rng();
            GuessRound::start(&mut rng)
        }
    };

    // Validate before touching any state; a bad guess leaves the round as-is
    let hint = evaluate_guess(request.guess, round.target).map_err(AppError::from)?;
    round.record_attempt();

    match hint {
        GuessHint::Correct => {
            let attempts = round.attempts;
            let score = guess_score(attempts);
            let duration_ms = round.elapsed().num_milliseconds();

            // The ledger write comes first: if it fails the round stays in
            // the store and the winning guess can be retried
            state
                .score_service
                .record_score(
                    &player.id,
                    GameKind::NumberGuess,
                    score,
                    attempts as i32,
                    Some(duration_ms),
                )
                .await?;
            state.round_store.clear_guess_round(&player.id).await;

            info!(
                player_id = %player.id,
                attempts,
                score,
                "Guess round completed"
            );

            Ok(Json(GuessResponse {
                player_name: player.name,
                guess: request.guess,
                hint,
                attempts,
                score: Some(score),
                message: Some(format!(
                    "Congratulations! You guessed it in {} attempts! Score: {}",
                    attempts, score
                )),
            }))
        }
        GuessHint::TooLow | GuessHint::TooHigh => {
            let attempts = round.attempts;
            state.round_store.put_guess_round(&player.id, round).await;

            let message = match hint {
                GuessHint::TooLow => "Too low! Try a higher number.",
                _ => "Too high! Try a lower number.",
            };

            Ok(Json(GuessResponse {
                player_name: player.name,
                guess: request.guess,
                hint,
                attempts,
                score: None,
                message: Some(message.to_string()),
            }))
        }
    }
}

/// HTTP handler for abandoning the active guessing round
///
/// POST /api/guess/reset
#[instrument(name = "guess_reset", skip(state, request))]
pub async fn guess_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, AppError> {
    let player = resolve_player(&state, &request.player_name).await?;
    let cleared = state.round_store.clear_guess_round(&player.id).await;

    info!(player_id = %player.id, cleared, "Guess round reset");
    Ok(Json(ResetResponse {
        player_name: player.name,
        cleared,
    }))
}

/// HTTP handler for a tic-tac-toe move
///
/// POST /api/tictactoe/move
/// Applies the player's mark, then the computer's answer, evaluating the
/// board after each. A player win writes a fixed score to the ledger.
#[instrument(name = "tic_tac_toe_move", skip(state, request))]
pub async fn tic_tac_toe_move(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let player = resolve_player(&state, &request.player_name).await?;

    let mut board = Board::parse(&request.board).map_err(AppError::from)?;
    if board.evaluate().is_terminal() {
        return Err(GameError::RoundOver.into());
    }

    board
        .place(request.position, Marker::X)
        .map_err(AppError::from)?;

    match board.evaluate() {
        BoardOutcome::Winner(Marker::X) => {
            state
                .score_service
                .record_score(&player.id, GameKind::TicTacToe, TIC_TAC_TOE_WIN_SCORE, 1, None)
                .await?;

            info!(player_id = %player.id, "Player won tic-tac-toe round");
            return Ok(Json(MoveResponse {
                player_name: player.name,
                board: board.to_wire(),
                winner: Some("X".to_string()),
                message: Some("You win!".to_string()),
            }));
        }
        BoardOutcome::Draw => {
            return Ok(Json(MoveResponse {
                player_name: player.name,
                board: board.to_wire(),
                winner: Some("Draw".to_string()),
                message: Some("It's a draw!".to_string()),
            }));
        }
        _ => {}
    }

    // Computer's answer; RNG stays scoped so the handler future is Send
    let computer_move = {
        let mut rng = rand::rng();
        choose_opponent_move(&board, &mut rng)
    };
    if let Some(index) = computer_move {
        board
            .place(index, Marker::O)
            .map_err(AppError::from)?;
        debug!(index, "Computer placed its mark");
    }

    let (winner, message) = match board.evaluate() {
        BoardOutcome::Winner(Marker::O) => {
            (Some("O".to_string()), Some("Computer wins!".to_string()))
        }
        BoardOutcome::Draw => (Some("Draw".to_string()), Some("It's a draw!".to_string())),
        _ => (None, None),
    };

    Ok(Json(MoveResponse {
        player_name: player.name,
        board: board.to_wire(),
        winner,
        message,
    }))
}

/// HTTP handler for a rock-paper-scissors round
///
/// POST /api/rps
/// Plays one round against a random computer choice, updates the session
/// tally, and writes a winning round to the ledger.
#[instrument(name = "rps_play", skip(state, request))]
pub async fn rps_play(
    State(state): State<AppState>,
    Json(request): Json<RpsRequest>,
) -> Result<Json<RpsResponse>, AppError> {
    let player = resolve_player(&state, &request.player_name).await?;

    let computer_choice = {
        let mut rng = rand::rng();
        RpsChoice::random(&mut rng)
    };
    let result = evaluate_choice(request.choice, computer_choice);

    let mut streak = state
        .round_store
        .get_rps_streak(&player.id)
        .await
        .unwrap_or_default();
    streak.record(result == RpsOutcome::Win);

    if result == RpsOutcome::Win {
        state
            .score_service
            .record_score(
                &player.id,
                GameKind::RockPaperScissors,
                RPS_WIN_SCORE,
                streak.games_played as i32,
                None,
            )
            .await?;
    }

    let response = RpsResponse {
        player_name: player.name,
        player_choice: request.choice,
        computer_choice,
        result,
        games_played: streak.games_played,
        wins: streak.wins,
        win_rate: streak.win_rate(),
    };
    state.round_store.put_rps_streak(&player.id, streak).await;

    info!(
        player_id = %player.id,
        player_choice = %request.choice,
        computer_choice = %computer_choice,
        result = %result,
        "Rock-paper-scissors round played"
    );
    Ok(Json(response))
}

/// HTTP handler for clearing the rock-paper-scissors tally
///
/// POST /api/rps/reset
#[instrument(name = "rps_reset", skip(state, request))]
pub async fn rps_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, AppError> {
    let player = resolve_player(&state, &request.player_name).await?;
    let cleared = state.round_store.clear_rps_streak(&player.id).await;

    info!(player_id = %player.id, cleared, "Rock-paper-scissors tally reset");
    Ok(Json(ResetResponse {
        player_name: player.name,
        cleared,
    }))
}
