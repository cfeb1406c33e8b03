pub mod forecast;
pub mod health;
pub mod roads;

use serde::Serialize;
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::{self, Response};
use warp::Reply;

use crate::errors::IntoErrorResponse;

pub use forecast::{forecast, tableau, ForecastRequest, TableauQuery, TableauResponse};
pub use health::health;
pub use roads::{
    create_road_session, delete_road_session, get_roads, record_result, reset_roads, undo_result,
    RecordResultRequest,
};

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

fn error_response<E: IntoErrorResponse>(err: E) -> Response {
    err.into_http_response()
}
