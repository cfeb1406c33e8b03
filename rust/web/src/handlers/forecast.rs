use coup_engine::errors::GameError;
use coup_engine::forecast::{self, ForecastReport};
use coup_engine::hand::Hand;
use coup_engine::tableau::{decide, Decision};
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::Response;

use super::{error_response, success_response};

/// Slot labels per side, in deal order. Missing trailing slots are unknown.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub player: Vec<String>,
    #[serde(default)]
    pub banker: Vec<String>,
}

impl ForecastRequest {
    fn hands(&self) -> Result<(Hand, Hand), GameError> {
        Ok((
            Hand::parse_labels(&self.player)?,
            Hand::parse_labels(&self.banker)?,
        ))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TableauQuery {
    pub player: u8,
    pub banker: u8,
    pub third: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableauResponse {
    pub player_total: u8,
    pub banker_total: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_third: Option<u8>,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Enumerates every completion of a partially dealt coup.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/forecast`
///
/// # Request Format
/// ```json
/// { "player": ["K", "4"], "banker": ["6", "?", "no-card"] }
/// ```
/// Labels are `""`/`"?"` for an unknown card, `"-"`/`"no-card"` for a slot
/// that stays empty, and `A`, `2`-`10`, `J`, `Q`, `K` for a known rank.
///
/// # Response Format
/// - **200 OK**: a `ForecastReport`. Pending and inconsistent hands are still
///   `200`; the `status` field tells them apart.
/// - **400 Bad Request**: `invalid_card` or `too_many_cards`
pub async fn forecast(request: ForecastRequest) -> Response {
    let (player, banker) = match request.hands() {
        Ok(hands) => hands,
        Err(err) => return error_response(err),
    };

    let report: ForecastReport = forecast::forecast(&player, &banker).report();
    tracing::debug!(
        player = %player,
        banker = %banker,
        status = ?report.status,
        enumerated = report.enumerated,
        "forecast computed"
    );
    success_response(StatusCode::OK, report)
}

/// Third-card decision for two-card totals.
///
/// `GET /api/tableau?player=4&banker=3&third=8`. Totals above 9 or a third
/// card value above 9 answer `400`.
pub async fn tableau(query: TableauQuery) -> Response {
    match decide(query.player, query.banker, query.third) {
        Ok(decision) => success_response(
            StatusCode::OK,
            TableauResponse {
                player_total: query.player,
                banker_total: query.banker,
                player_third: query.third,
                decision,
            },
        ),
        Err(err) => error_response(err),
    }
}
